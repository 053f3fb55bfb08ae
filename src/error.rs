//! Error types for t2press

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for t2press
#[derive(Debug, Error)]
pub enum PressError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Not a t2press site: {0}")]
    NotASite(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Notion API error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl PressError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PressError::MissingCredential(_) => 2,
            PressError::NotASite(_) => 3,
            PressError::Api { .. } | PressError::Http(_) => 4,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            PressError::MissingCredential(var) => {
                format!(
                    "Missing credential: {}\n\n\
                    Suggestions:\n\
                    • Export NOTION_TOKEN with your integration secret\n\
                    • Export NOTION_DATABASE_ID with the id of the posts database\n\
                    • Share the database with your integration in Notion",
                    var
                )
            }
            PressError::NotASite(path) => {
                format!(
                    "Not a t2press site: {}\n\n\
                    Suggestions:\n\
                    • Run 't2press init' in this directory to scaffold a site\n\
                    • Pass --root to point at an existing site directory",
                    path.display()
                )
            }
            PressError::Api {
                status,
                code,
                message,
            } => {
                let hint = match *status {
                    401 => "Check that NOTION_TOKEN is a valid integration secret",
                    404 => "Check NOTION_DATABASE_ID and that the database is shared with the integration",
                    429 => "Notion rate limit reached; wait a moment and rebuild",
                    _ => "Rebuild once the Notion API is reachable again",
                };
                format!(
                    "Notion API error ({} {}): {}\n\n\
                    Suggestions:\n\
                    • {}",
                    status, code, message, hint
                )
            }
            PressError::Template(err) => {
                // tera hides the interesting part in the source chain
                let mut msg = format!("Template error: {}", err);
                let mut source = std::error::Error::source(err);
                while let Some(cause) = source {
                    msg.push_str(&format!("\n  caused by: {}", cause));
                    source = cause.source();
                }
                msg
            }
            PressError::Config(msg) => {
                if msg.contains("table_headers") {
                    format!(
                        "{}\n\n\
                        Valid table header policies: positional, prefix\n\
                        Example: table_headers = \"prefix\"",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using PressError
pub type Result<T> = std::result::Result<T, PressError>;
