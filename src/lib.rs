//! Centsible is a personal-finance tracking backend: budgets, savings pots
//! and transactions, scoped per user and served over a bearer-token JSON API.
//!
//! The library exposes the router, the shared application state and the
//! crate-wide error type; the `server` binary wires them to an HTTP listener.

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
mod auth;
mod budget;
mod db;
mod endpoints;
mod money;
mod overview;
mod pot;
mod routing;
mod transaction;
mod validation;

pub use app_state::AppState;
pub use auth::UserId;
pub use db::initialize as initialize_db;
pub use routing::build_router;
pub use validation::FieldErrors;

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

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more fields of an entity failed validation.
    ///
    /// The map holds every violated field alongside its human-readable
    /// messages, so a client can surface all problems at once.
    #[error("validation failed")]
    Validation(FieldErrors),

    /// The requested resource was not found.
    ///
    /// The client should check that the ID is correct and that the resource
    /// has been created by the authenticated user.
    #[error("the requested {entity} could not be found")]
    NotFound {
        /// The kind of entity that was requested, e.g. "pot".
        entity: &'static str,
        /// The ID that did not match any row owned by the user.
        id: i64,
    },

    /// The request carried no bearer token, or the token failed validation.
    #[error("missing or invalid bearer token")]
    Unauthenticated,

    /// A pot's stored total changed between the read and the conditional
    /// write of a deposit or withdrawal. The client may retry.
    #[error("the pot balance changed while the update was in progress")]
    BalanceConflict,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    Sql(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::Sql(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(field_errors) => {
                (StatusCode::BAD_REQUEST, Json(field_errors)).into_response()
            }
            Error::NotFound { entity, id } => {
                tracing::debug!("{entity} {id} not found");
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "message": format!("Object with {entity} id does not exist"),
                    })),
                )
                    .into_response()
            }
            Error::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid token" })),
            )
                .into_response(),
            Error::BalanceConflict => (
                StatusCode::CONFLICT,
                Json(json!({ "error": "The pot was updated concurrently, try again" })),
            )
                .into_response(),
            // Errors not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
