use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unsupported word-by-word locale: {0}")]
    InvalidLocale(String),

    #[error("Preference backend rejected the request ({status}): {message}")]
    BackendRejected { status: u16, message: String },

    #[error("No preference backend configured")]
    BackendUnavailable,

    #[error("Preference save did not finish in time")]
    PersistTimedOut,

    #[error("No async runtime to persist on")]
    NoRuntime,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl AppError {
    /// Whether the failure came from the persistence path.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            AppError::BackendRejected { .. }
                | AppError::BackendUnavailable
                | AppError::PersistTimedOut
                | AppError::Unauthorized
                | AppError::Reqwest(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
