use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use taskpile_shared::ErrorResponse;
use thiserror::Error;

/// Failures coming out of the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("connection lock poisoned")]
    Poisoned,
}

/// Handler-boundary error taxonomy. Every store-call failure is converted to
/// one of these before it leaves a handler.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("store unavailable while trying to {action}: {detail}")]
    StoreUnavailable {
        action: &'static str,
        detail: String,
    },
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Adapter for `map_err`: tags a store failure with the operation the
    /// handler was attempting, e.g. `.map_err(AppError::store("fetch tasks"))`.
    pub fn store(action: &'static str) -> impl Fn(StoreError) -> AppError {
        move |err| AppError::StoreUnavailable {
            action,
            detail: err.to_string(),
        }
    }

    /// Message safe to send to the client. Store detail stays server-side.
    pub fn client_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::StoreUnavailable { action, .. } => format!("Failed to {action}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::StoreUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Self::StoreUnavailable { action, detail } = self {
            log::error!("store failure while trying to {action}: {detail}");
        }
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.client_message()))
    }
}
