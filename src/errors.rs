// src/errors.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShowroomError {
    #[error("Failed to read catalog at {}: {source}", path.display())]
    CatalogRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed catalog at {}: {source}", path.display())]
    CatalogParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unknown brand '{0}'")]
    UnknownBrand(String),

    #[error("No motorcycle with slug '{0}'")]
    UnknownSlug(String),

    #[error("Invalid range '{0}': expected MIN..MAX, MIN.. or ..MAX")]
    InvalidRange(String),

    #[error("No catalog configured: pass --catalog or set [catalog].path in config.toml")]
    NoCatalog,

    #[error("JSON serialization error: {0}")]
    JsonSerializationError(#[from] serde_json::Error),
}
