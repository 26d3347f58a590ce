//! Salesboard is a reporting service for a collection of product sales.
//!
//! This library provides a JSON REST API over a SQLite store: a searchable,
//! paged listing of transactions, monthly sales statistics, a price range
//! histogram, a category distribution, and a dashboard that combines them.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod pagination;
pub mod report;
mod routing;
pub mod transaction;

pub use app_state::AppState;
pub use database_id::TransactionId;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::{PageRequest, PaginationConfig};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
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

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A query parameter was missing a valid value, e.g. a page number of
    /// zero or a page size that is not a number.
    ///
    /// The client should fix the request, retrying it unchanged will fail again.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A product feed could not be stored, e.g. it was not a JSON array of
    /// products or a product had a negative price.
    #[error("invalid seed data: {0}")]
    InvalidSeedData(String),

    /// The product feed could not be downloaded, e.g. the host refused the
    /// connection or answered with an error status.
    #[error("the product feed is unavailable: {0}")]
    FeedUnavailable(String),

    /// The transaction store could not be read or written.
    ///
    /// The requested operation fails as a whole, no partial or default data
    /// is returned. The error string should only be logged on the server.
    #[error("the transaction store is unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::StoreUnavailable(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::InvalidParameter(_) | Error::InvalidSeedData(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::FeedUnavailable(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            // Store details are not intended to be shown to the client.
            Error::StoreUnavailable(ref detail) => {
                tracing::error!("Responding with store unavailable: {detail}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "the transaction store is unavailable, check the server logs for more details"
                        .to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
