//! Implements a struct that holds the state shared by the request handlers.

use crate::api::SalesApi;

/// The state of the dashboard server.
///
/// There is no database and no session state: the only thing handlers share
/// is the client for the remote sales API.
#[derive(Debug, Clone)]
pub struct AppState {
    pub(crate) sales_api: SalesApi,
}

impl AppState {
    /// Create a new [AppState] with a client for the sales API at `api_url`.
    ///
    /// `api_url` is the full endpoint URL, e.g. `https://labdados.com/produtos`.
    pub fn new(api_url: &str) -> Self {
        Self {
            sales_api: SalesApi::new(reqwest::Client::new(), api_url),
        }
    }
}
