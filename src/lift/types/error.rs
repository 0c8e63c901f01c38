//! Custom error types for the lift-codec crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
///
/// Only whole-document problems are errors. A missing attribute, language tag
/// or sub-element inside an entry degrades to an empty value instead.
#[derive(Debug, Error)]
pub enum LiftError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error reported by the XML writer.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The text is not well-formed XML.
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// The document has no `<lift>` root element.
    #[error("Invalid LIFT document: no <lift> root element found")]
    MissingRoot,

    /// The `<lift>` root holds no `<entry>` elements.
    #[error("Invalid LIFT document: no <entry> elements found")]
    NoEntries,
}

impl LiftError {
    /// Returns `true` for errors describing an unrecognisable document, as
    /// opposed to I/O failures.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            LiftError::Malformed(_) | LiftError::MissingRoot | LiftError::NoEntries
        )
    }
}

/// A convenience `Result` type alias using the crate's `LiftError` type.
pub type Result<T> = std::result::Result<T, LiftError>;
