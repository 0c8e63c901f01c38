//! Text decoding for LIFT documents read from disk.
//!
//! LIFT files are normally UTF-8, but documents exported by some tools carry
//! a UTF-16 byte-order mark. The BOM decides the encoding; without one the
//! bytes are read as UTF-8, replacing invalid sequences.

use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};

use crate::lift::types::error::Result;

/// Decodes document bytes to text, stripping any byte-order mark.
pub fn decode_document(bytes: &[u8]) -> String {
    let (encoding, bom_len) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => {
            debug!("Byte-order mark detected: {}", encoding.name());
            (encoding, bom_len)
        }
        None => (UTF_8, 0),
    };

    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    if had_errors {
        warn!(
            "Document is not valid {}; malformed sequences were replaced",
            encoding.name()
        );
    }
    text.into_owned()
}

/// Reads and decodes a document from `path`.
pub fn read_document(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    debug!("Reading document from {}", path.display());
    let bytes = fs::read(path)?;
    Ok(decode_document(&bytes))
}

/// Writes document text to `path` as UTF-8.
pub fn write_document(path: impl AsRef<Path>, text: &str) -> Result<()> {
    let path = path.as_ref();
    debug!("Writing {} bytes to {}", text.len(), path.display());
    fs::write(path, text)?;
    Ok(())
}
