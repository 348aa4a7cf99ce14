//! Application layer errors

use thiserror::Error;

/// Errors raised by the chat client collaborator
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unknown room: {0}")]
    UnknownRoom(String),
}

/// Failures reported by plugin handlers.
///
/// These never leave the dispatch engine; they are logged at the
/// isolation boundary and swallowed.
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Client error: {0}")]
    Client(#[from] BotError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Handler panicked: {0}")]
    Panicked(String),
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store not attached for {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
