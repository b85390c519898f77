//! Error types for docqc library.

use std::io;
use thiserror::Error;

/// Result type alias for docqc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of an [`Error`].
///
/// Front ends map these to their own representation (exit codes, status
/// codes); the library never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The container could not be opened or lacks a mandatory part.
    Package,
    /// The container opened but its content is structurally invalid.
    MalformedDocument,
    /// Invalid checker configuration or acronym data.
    Config,
    /// Report serialization failed.
    Render,
}

/// Error types that can occur while loading and checking documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the package.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a zip-based document package.
    #[error("Unknown file format: not a document package")]
    NotAPackage,

    /// The zip container is damaged or unreadable.
    #[error("Corrupt package: {0}")]
    CorruptArchive(String),

    /// A mandatory part is missing from the package.
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// A part could not be parsed as XML.
    #[error("XML error in {part}: {reason}")]
    Xml {
        /// Offending part name
        part: String,
        /// Parser message
        reason: String,
    },

    /// A paragraph, run or style referenced a style id that does not exist.
    #[error("Missing style '{style_id}' referenced in {part}")]
    MissingStyle {
        /// Part holding the reference
        part: String,
        /// Unresolved style id
        style_id: String,
    },

    /// Style inheritance (`basedOn`) forms a cycle or exceeds the depth limit.
    #[error("Circular style inheritance at '{style_id}' in {part}")]
    StyleCycle {
        /// Part holding the styles
        part: String,
        /// Style where the cycle was detected
        style_id: String,
    },

    /// Numbering definitions reference each other in a loop.
    #[error("Circular numbering reference at num {num_id} in {part}")]
    CircularNumbering {
        /// Part holding the numbering definitions
        part: String,
        /// Numbering instance where the loop was detected
        num_id: u32,
    },

    /// Structurally invalid content that does not fit the other variants.
    #[error("Malformed {part}: {reason}")]
    Malformed {
        /// Offending part name
        part: String,
        /// What was wrong
        reason: String,
    },

    /// Invalid configuration or acronym data.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error during report rendering (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) | Error::NotAPackage | Error::CorruptArchive(_) | Error::MissingPart(_) => {
                ErrorKind::Package
            }
            Error::Xml { .. }
            | Error::MissingStyle { .. }
            | Error::StyleCycle { .. }
            | Error::CircularNumbering { .. }
            | Error::Malformed { .. } => ErrorKind::MalformedDocument,
            Error::Config(_) => ErrorKind::Config,
            Error::Render(_) => ErrorKind::Render,
        }
    }

    /// Name of the part this error refers to, if any.
    pub fn part(&self) -> Option<&str> {
        match self {
            Error::MissingPart(part) => Some(part),
            Error::Xml { part, .. }
            | Error::MissingStyle { part, .. }
            | Error::StyleCycle { part, .. }
            | Error::CircularNumbering { part, .. }
            | Error::Malformed { part, .. } => Some(part),
            _ => None,
        }
    }

    pub(crate) fn xml(part: &str, err: impl std::fmt::Display) -> Self {
        Error::Xml {
            part: part.to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::FileNotFound => Error::MissingPart("<unknown>".to_string()),
            zip::result::ZipError::InvalidArchive(_) => Error::NotAPackage,
            other => Error::CorruptArchive(other.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml {
            part: "<unknown>".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
