//! Application router configuration.

use axum::{Router, response::Redirect, routing::get};
use tower_http::services::ServeDir;

use crate::{
    AppState, dashboard::get_dashboard_page, endpoints, not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;

    use crate::{AppState, endpoints, routing::build_router};

    fn test_server() -> TestServer {
        // No request reaches the sales API in these tests, so any URL works.
        let router = build_router(AppState::new("http://localhost:1"));

        TestServer::new(router)
    }

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let server = test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.header("location"),
            endpoints::DASHBOARD_VIEW,
            "expected redirect to the dashboard"
        );
    }

    #[tokio::test]
    async fn unknown_route_renders_the_404_page() {
        let server = test_server();

        let response = server.get("/nao-existe").await;

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_text_contains("404");
    }
}
