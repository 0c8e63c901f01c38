//! Writing the structured model back to LIFT document text.
//!
//! Each entry is overlaid on a copy of the fragment it was read from, so
//! content the model does not represent survives a read/edit/write cycle.
//! The records passed in are never modified.

use std::path::Path;

use log::{debug, info};

use super::codec::{encoding, xml};
use super::format::build;
use super::types::error::Result;
use super::types::models::{Entry, Metadata, DEFAULT_LIFT_VERSION};
use super::types::tree::{RawNode, RawObject};

/// Settings for [`LiftWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// Tool name recorded in the `producer` attribute.
    pub producer_name: String,
    pub producer_version: String,
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            producer_name: env!("CARGO_PKG_NAME").to_string(),
            producer_version: env!("CARGO_PKG_VERSION").to_string(),
            indent: 2,
        }
    }
}

/// Serializes entries and metadata into a LIFT document.
#[derive(Debug, Clone, Default)]
pub struct LiftWriter {
    options: WriterOptions,
}

impl LiftWriter {
    pub fn new(options: WriterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Value of the root `producer` attribute, recording the tool that
    /// originally produced the document.
    pub fn producer_attribute(&self, metadata: &Metadata) -> String {
        format!(
            "{}/{} (based on {})",
            self.options.producer_name,
            self.options.producer_version,
            metadata.lift_attributes.producer
        )
    }

    /// Builds the complete document text.
    ///
    /// # Errors
    /// Only a failure of the underlying XML writer is reported; entry content
    /// is not validated.
    pub fn write(&self, entries: &[Entry], metadata: &Metadata) -> Result<String> {
        let mut lift = RawObject::new();
        lift.set_attribute("producer", self.producer_attribute(metadata));
        let version = match metadata.lift_attributes.version.as_str() {
            "" => DEFAULT_LIFT_VERSION,
            version => version,
        };
        lift.set_attribute("version", version);

        if let Some(header) = &metadata.header {
            debug!("Writing captured document header");
            lift.insert("header", header.clone());
        }
        lift.set_slot("entry", entries.iter().map(build::build_entry).collect());

        let mut document = RawObject::new();
        document.insert("lift", RawNode::Object(lift));
        let text = xml::write_tree(&document, self.options.indent)?;

        info!("Wrote {} entries ({} bytes)", entries.len(), text.len());
        Ok(text)
    }

    /// Writes the document to `path` as UTF-8.
    pub fn write_file(
        &self,
        path: impl AsRef<Path>,
        entries: &[Entry],
        metadata: &Metadata,
    ) -> Result<()> {
        let text = self.write(entries, metadata)?;
        encoding::write_document(path, &text)
    }
}

/// Writes `entries` with default [`WriterOptions`].
pub fn write_lift(entries: &[Entry], metadata: &Metadata) -> Result<String> {
    LiftWriter::default().write(entries, metadata)
}

/// Writes `entries` to `path` with default [`WriterOptions`].
pub fn write_lift_file(
    path: impl AsRef<Path>,
    entries: &[Entry],
    metadata: &Metadata,
) -> Result<()> {
    LiftWriter::default().write_file(path, entries, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lift::reader::parse_lift;
    use crate::lift::types::models::{LiftAttributes, Sense};

    fn sample_entry() -> Entry {
        let mut entry = Entry::new("g1", "taboo_g1");
        entry.date_created = "2024-01-01T00:00:00Z".to_string();
        entry.date_modified = "2024-01-02T00:00:00Z".to_string();
        entry.set_form("mnr", "taboo");
        let mut sense = Sense::new("s1");
        sense.glosses.insert("en", "forbidden");
        entry.push_sense(sense);
        entry
    }

    #[test]
    fn default_options() {
        let options = WriterOptions::default();
        assert_eq!(options.producer_name, "lift-codec");
        assert_eq!(options.indent, 2);
        assert!(!options.producer_version.is_empty());
    }

    #[test]
    fn producer_records_lineage() {
        let writer = LiftWriter::new(WriterOptions {
            producer_name: "tool".to_string(),
            producer_version: "1.2".to_string(),
            indent: 2,
        });
        let metadata = Metadata {
            lift_attributes: LiftAttributes {
                producer: "SIL.FLEx 9.1".to_string(),
                version: "0.13".to_string(),
            },
            header: None,
        };
        assert_eq!(writer.producer_attribute(&metadata), "tool/1.2 (based on SIL.FLEx 9.1)");

        let text = writer.write(&[sample_entry()], &metadata).expect("write");
        assert!(text.contains(r#"producer="tool/1.2 (based on SIL.FLEx 9.1)""#));
        assert!(text.contains(r#"version="0.13""#));
    }

    #[test]
    fn blank_version_falls_back() {
        let mut metadata = Metadata::default();
        metadata.lift_attributes.version.clear();
        let text = write_lift(&[sample_entry()], &metadata).expect("write");
        assert!(text.contains(r#"version="0.13""#));
    }

    #[test]
    fn document_starts_with_declaration() {
        let text = write_lift(&[sample_entry()], &Metadata::default()).expect("write");
        assert!(text.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(text.contains("<lift "));
        assert!(text.contains("<text>forbidden</text>"));
    }

    #[test]
    fn written_document_reads_back() {
        let entry = sample_entry();
        let text = write_lift(std::slice::from_ref(&entry), &Metadata::default()).expect("write");
        let doc = parse_lift(&text).expect("reparse");
        let back = &doc.entries[0];
        assert_eq!(back.guid, entry.guid);
        assert_eq!(back.word(), "taboo");
        assert_eq!(back.senses()[0].glosses, entry.senses()[0].glosses);
        assert!(doc.metadata.lift_attributes.producer.starts_with("lift-codec/"));
    }

    #[test]
    fn empty_entry_list_writes_bare_root() {
        let text = write_lift(&[], &Metadata::default()).expect("write");
        assert!(!text.contains("<entry"));
        assert!(parse_lift(&text).is_err());
    }
}
