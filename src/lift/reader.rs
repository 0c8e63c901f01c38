//! Reading LIFT documents into the structured model.

use std::path::Path;

use log::info;

use super::codec::{encoding, xml};
use super::format::parse;
use super::types::error::Result;
use super::types::models::LiftDocument;

/// Parses LIFT document text.
///
/// # Errors
/// Returns an error if:
/// - The text is not well-formed XML ([`LiftError::Malformed`])
/// - There is no `<lift>` root ([`LiftError::MissingRoot`])
/// - The root holds no `<entry>` ([`LiftError::NoEntries`])
///
/// No partial document is returned on failure.
///
/// [`LiftError::Malformed`]: super::types::error::LiftError::Malformed
/// [`LiftError::MissingRoot`]: super::types::error::LiftError::MissingRoot
/// [`LiftError::NoEntries`]: super::types::error::LiftError::NoEntries
pub fn parse_lift(text: &str) -> Result<LiftDocument> {
    let tree = xml::parse_tree(text)?;
    parse::parse_document(&tree)
}

/// Reads and parses the LIFT file at `path`, honouring a byte-order mark.
pub fn read_lift_file(path: impl AsRef<Path>) -> Result<LiftDocument> {
    let path = path.as_ref();
    info!("Opening LIFT file: {}", path.display());
    let text = encoding::read_document(path)?;
    parse_lift(&text)
}
