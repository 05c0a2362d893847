use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by the session manager and the resource clients.
///
/// Status failures keep only the resource label and the status code; the server's
/// error body is dropped.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Login failed: {0}")]
    LoginFailed(#[source] reqwest::Error),
    #[error("Failed to fetch {resource}")]
    FetchFailed {
        resource: &'static str,
        status: StatusCode,
    },
    #[error("Failed to create {resource}")]
    CreateFailed {
        resource: &'static str,
        status: StatusCode,
    },
    #[error("Failed to update {resource}")]
    UpdateFailed {
        resource: &'static str,
        status: StatusCode,
    },
    #[error("Failed to delete {resource}")]
    DeleteFailed {
        resource: &'static str,
        status: StatusCode,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("token store error: {0}")]
    Store(#[from] std::io::Error),
}

impl Error {
    /// HTTP status of a rejected CRUD call, if that is what failed.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::FetchFailed { status, .. }
            | Self::CreateFailed { status, .. }
            | Self::UpdateFailed { status, .. }
            | Self::DeleteFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
