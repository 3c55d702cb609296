use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("I/O error during {operation} on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("Database error: {0}")]
    Database(String),
    #[error("Pattern error: {0}")]
    Pattern(String),
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ToolError>;

impl ToolError {
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), operation, source }
    }
}

// Helper conversions
impl From<rusqlite::Error> for ToolError {
    fn from(e: rusqlite::Error) -> Self { Self::Database(e.to_string()) }
}
impl From<config::ConfigError> for ToolError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<regex::Error> for ToolError {
    fn from(e: regex::Error) -> Self { Self::Pattern(e.to_string()) }
}
