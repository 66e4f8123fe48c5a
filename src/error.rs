use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("grid size must be at least 1")]
    ZeroGridSize,

    #[error("grid size {0} is too large")]
    GridTooLarge(usize),

    #[error("a {grid_size}x{grid_size} card needs {needed} terms, config has {available}")]
    NotEnoughTerms {
        grid_size: usize,
        needed: usize,
        available: usize,
    },

    #[error("invalid hex color {0:?}, expected RRGGBB (e.g. 1a1b26)")]
    InvalidColor(String),
}
