use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[error("Directory already exists: {}", .0.display())]
    DirectoryExists(PathBuf),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Instrument '{instrument}' is split into {divisions} books, but the split table has no entry for {divisions}")]
    UnknownDivision { instrument: String, divisions: u32 },
    #[error("Chart '{slug}' is invalid: {reason}")]
    InvalidChart { slug: String, reason: String },
    #[error("Last B-side id must be between {min} and {max}, got {max_id}")]
    InvalidMaxId { max_id: u32, min: u32, max: u32 },
    #[error("Chart selection failed: {0}")]
    Selection(String),
    #[cfg(feature = "serde")]
    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, LibraryError>;
