use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // -- Config
    #[error("Malformed API credentials, expected `username:key`.")]
    MalformedCredentials,
    #[error("Requests per minute must be a positive integer, got {0}.")]
    InvalidRate(u32),

    // -- Input / Output
    #[error("Couldn't open input file {path}: {source}")]
    InputOpen {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Handles must be UTF-8. A line that isn't ends the run here instead of being
    /// sent as raw bytes, and identifiers are whitespace-trimmed before use.
    #[error("Couldn't read a line from input file {path}: {source}")]
    InputRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Couldn't open output file {path}: {source}")]
    OutputOpen {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Couldn't write to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    // -- Limiter
    #[error("Rate limiter can't ever grant a permit, its capacity is {0} cells.")]
    Limiter(u32),

    // -- Network
    #[error("Couldn't build the URL for program {identifier}: {source}")]
    Url {
        identifier: String,
        source: reqwest::Error,
    },
    #[error("Request for program {identifier} failed: {source}")]
    Request {
        identifier: String,
        source: reqwest::Error,
    },
    #[error("Couldn't read response body for program {identifier}: {source}")]
    Body {
        identifier: String,
        source: reqwest::Error,
    },
}

impl Error {
    /// Errors that only concern a single program and leave the run itself intact.
    pub fn is_per_identifier(&self) -> bool {
        matches!(
            self,
            Error::Url { .. } | Error::Request { .. } | Error::Body { .. }
        )
    }
}
