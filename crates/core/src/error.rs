//! Error types for the folio document reconstruction library.

use thiserror::Error;

/// Primary error type for document reconstruction operations.
#[derive(Error, Debug)]
pub enum DocError {
    #[error("malformed {name} attribute: {value:?}")]
    MalformedAttribute { name: &'static str, value: String },

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DocError {
    pub(crate) fn malformed(name: &'static str, value: impl Into<String>) -> Self {
        Self::MalformedAttribute {
            name,
            value: value.into(),
        }
    }
}

/// Convenience Result type alias for DocError.
pub type Result<T> = std::result::Result<T, DocError>;
