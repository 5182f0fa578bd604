use thiserror::Error;

/// Failures that can occur while serving a prediction request.
///
/// Only `UnsupportedStock` is the caller's fault; everything else is a
/// server-side condition and is reported to clients generically while the
/// full detail goes to the log.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Stock not supported: {requested}. Supported stocks: {supported}")]
    UnsupportedStock { requested: String, supported: String },

    #[error("Insufficient history: {rows} rows available, at least {min} required")]
    InsufficientHistory { rows: usize, min: usize },

    #[error("Malformed price data in {path}: {reason}")]
    MalformedData { path: String, reason: String },

    #[error("Price history has no volume column, but the model expects {expected} inputs")]
    MissingVolume { expected: usize },

    #[error("Model invocation failed: {reason}")]
    ModelFailure { reason: String },

    #[error("Failed to read price history from {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PredictError {
    /// True when the failure was caused by the request itself.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PredictError::UnsupportedStock { .. })
    }
}
