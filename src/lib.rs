//! Painel de Vendas is a web dashboard over a remote sales API.
//!
//! This library serves a single server-rendered page. Every filter change in
//! the sidebar re-submits the current widget state as a query string, and the
//! handler re-runs the whole pipeline from scratch: fetch the filtered records
//! from the remote API, apply the local seller filter, aggregate, build the
//! charts, render. No state is kept between reruns and nothing is cached.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::response::{IntoResponse, Response};
use axum_server::Handle;
use tokio::signal;

mod api;
mod app_state;
mod dashboard;
mod endpoints;
mod filters;
mod html;
mod not_found;
mod routing;

pub use app_state::AppState;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur while building the dashboard.
///
/// There is deliberately no finer taxonomy: any failure aborts the current
/// rerun and renders the generic error page, and the next interaction starts
/// a fresh rerun.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request to the sales API could not be sent or the transfer failed.
    #[error("request to the sales API failed: {0}")]
    ApiRequest(String),

    /// The sales API answered with a non-success status code.
    #[error("the sales API returned status {0}")]
    ApiStatus(u16),

    /// The response body could not be parsed as a list of sale records.
    #[error("could not parse the sales API response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Error::InvalidResponse(error.to_string())
        } else {
            Error::ApiRequest(error.to_string())
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // The details are only logged on the server. The client gets the
        // generic error page and can retry with the next interaction.
        tracing::error!("aborting the current render: {self}");
        html::render_internal_server_error()
    }
}
