//! Centavo is a small personal-finance web service: authenticated users
//! submit and list financial transactions, and a seed endpoint bootstraps
//! default accounts and categories for a new user.
//!
//! All persistence and identity verification is delegated to a hosted
//! Postgres-with-auth platform. This crate is the thin HTTP layer in front
//! of it: handlers validate a few fields, stamp the caller's identity onto
//! every query, and forward the request through the store layer.

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

mod auth;
mod config;
mod endpoints;
mod logging;
mod routing;
mod seed;
mod sign_in;
mod state;
mod stores;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use auth::Identity;
pub use config::UpstreamConfig;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use state::AppState;
pub use stores::{PgUpstreamStore, SeedStore, TransactionStore};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
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

/// The errors that may occur while serving a request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The client sent a transaction whose amount is missing or not a finite
    /// number.
    #[error("Invalid or missing 'amount' (must be number)")]
    InvalidAmount,

    /// The client sent a transaction type outside the closed set.
    #[error("Invalid 'type' — must be 'expense', 'income' or 'transfer'")]
    InvalidTransactionType,

    /// The upstream data service rejected a query or insert.
    ///
    /// The error string is for server-side logs only. Clients receive a
    /// fixed generic message so upstream internals are never disclosed.
    #[error("upstream request failed: {0}")]
    Upstream(String),
}

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        Error::Upstream(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::InvalidAmount | Error::InvalidTransactionType => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::Upstream(detail) => {
                tracing::error!("upstream request failed: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Upstream request failed".to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
