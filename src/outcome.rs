//! Tagged result of a single feed request.

use std::fmt;

/// Detail prefix for a 403 response; the raw body is appended.
pub const FORBIDDEN: &str = "forbidden: invalid key or insufficient permission";

/// Result of one fetch, distinguishing caller faults, upstream faults and
/// transport faults.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Success(T),
    /// Caller-caused failure (bad key, bad parameters, permission).
    ClientError { status: u16, detail: String },
    /// Upstream or parsing defect. `status` is `None` when the failure
    /// happened after the response was handled (e.g. a local write).
    ServerError { status: Option<u16>, detail: String },
    /// The connection could not be established or did not complete.
    Unreachable(String),
}

/// Discriminant of a [`FetchOutcome`], useful for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    ClientError,
    ServerError,
    Unreachable,
}

impl<T> FetchOutcome<T> {
    pub fn client_error(status: u16, detail: impl Into<String>) -> Self {
        Self::ClientError {
            status,
            detail: detail.into(),
        }
    }

    pub fn server_error(status: Option<u16>, detail: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            detail: detail.into(),
        }
    }

    /// Outcome for a status code the caller has no specific handling for.
    pub fn unexpected_status(status: u16) -> Self {
        Self::server_error(Some(status), format!("unexpected status {}", status))
    }

    /// Outcome for a 403, carrying the raw body for diagnostics.
    pub fn forbidden(body: &str) -> Self {
        Self::client_error(403, format!("{}: {}", FORBIDDEN, body))
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success(_) => OutcomeKind::Success,
            Self::ClientError { .. } => OutcomeKind::ClientError,
            Self::ServerError { .. } => OutcomeKind::ServerError,
            Self::Unreachable(_) => OutcomeKind::Unreachable,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Failure detail, or `None` on success.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::ClientError { detail, .. } | Self::ServerError { detail, .. } => Some(detail),
            Self::Unreachable(cause) => Some(cause),
        }
    }

    /// Transform the success value, passing failures through untouched.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> FetchOutcome<U> {
        match self {
            Self::Success(value) => FetchOutcome::Success(f(value)),
            Self::ClientError { status, detail } => FetchOutcome::ClientError { status, detail },
            Self::ServerError { status, detail } => FetchOutcome::ServerError { status, detail },
            Self::Unreachable(cause) => FetchOutcome::Unreachable(cause),
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::ClientError => "client error",
            Self::ServerError => "server error",
            Self::Unreachable => "unreachable",
        };
        f.write_str(name)
    }
}
