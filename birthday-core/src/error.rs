//! Error types for birthday-board.

use thiserror::Error;

/// Errors that can end a refresh cycle or a command.
#[derive(Error, Debug)]
pub enum BoardError {
    #[error("HTTP error: {0}")]
    Network(String),

    #[error("No data found in spreadsheet")]
    EmptyData,

    #[error(
        "Required columns not found: {}. Available columns: {}",
        .missing.join(", "),
        .available.join(", ")
    )]
    Schema {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BoardError {
    /// Short machine-friendly name of the error kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BoardError::Network(_) => "network",
            BoardError::EmptyData => "empty",
            BoardError::Schema { .. } => "schema",
            BoardError::Config(_) => "config",
            BoardError::Io(_) => "io",
        }
    }
}

impl From<reqwest::Error> for BoardError {
    fn from(e: reqwest::Error) -> Self {
        BoardError::Network(e.to_string())
    }
}

impl From<config::ConfigError> for BoardError {
    fn from(e: config::ConfigError) -> Self {
        BoardError::Config(e.to_string())
    }
}

/// Result type alias for birthday-board operations.
pub type BoardResult<T> = Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_missing_and_available_columns() {
        let err = BoardError::Schema {
            missing: vec!["Birthday".to_string()],
            available: vec!["Name".to_string(), "Email".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "Required columns not found: Birthday. Available columns: Name, Email"
        );
        assert_eq!(err.kind(), "schema");
    }
}
