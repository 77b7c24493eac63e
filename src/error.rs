//! Error types.
//!
//! - `ForecastError`: failures of the ARIMA fit itself (typed, `thiserror`)
//! - `AppError`: what the pipeline reports to its callers; the HTTP layer maps
//!   the kind to a status code and the CLI maps it to an exit code

use thiserror::Error;

/// Broad failure class of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested department is not present in the source data.
    NotFound,
    /// Everything else: load, parse, model fit, rendering, I/O.
    Internal,
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Process exit code used by the offline `forecast` command.
    pub fn exit_code(&self) -> u8 {
        match self.kind {
            ErrorKind::NotFound => 2,
            ErrorKind::Internal => 1,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        AppError::internal(format!("Model fit failed: {err}"))
    }
}

/// Failures raised while fitting or forecasting an ARIMA model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unsupported model order: {0}")]
    Unsupported(String),
}
