use thiserror::Error;

use crate::datatype::Kind;

#[derive(Error, Debug)]
pub enum NeormError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),
    #[error("Unsupported driver: {0}")]
    UnsupportedDriver(String),
    #[error("invalid sql type {0}")]
    UnsupportedType(Kind),
    #[error("Model is not set")]
    ModelNotSet,
    #[error("Dialect is not set")]
    DialectNotSet,
    #[error("Cursor rows were already handed out")]
    CursorConsumed,
}

pub type Result<T> = std::result::Result<T, NeormError>;

// Helper conversions
impl From<::config::ConfigError> for NeormError {
    fn from(e: ::config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
