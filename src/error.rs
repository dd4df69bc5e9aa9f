use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors surfaced by parameter generation, key handling, certificates and artifact I/O.
#[derive(Debug, Error)]
pub enum Error {
    /// An artifact file could not be opened, read, or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A persisted integer record or a certificate is structurally malformed.
    #[error("decode error: {0}")]
    Decode(String),

    /// A hash, sign, or verify primitive failed, e.g. on corrupt key material.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// A bounded search loop ran out of attempts.
    #[error("generation exhausted: no {what} found after {attempts} attempts")]
    GenerationExhausted { what: &'static str, attempts: usize },

    /// An input outside the operation's contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Error::Decode(msg.into())
    }

    pub fn crypto(msg: impl Into<String>) -> Self {
        Error::Crypto(msg.into())
    }

    pub fn exhausted(what: &'static str, attempts: usize) -> Self {
        Error::GenerationExhausted { what, attempts }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
