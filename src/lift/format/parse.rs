//! Intermediate tree → structured model.
//!
//! Only the absence of the `<lift>` root or of any `<entry>` is an error.
//! Everything below the entry level degrades to empty values.

use log::{debug, info, trace};

use crate::lift::types::error::{LiftError, Result};
use crate::lift::types::models::{
    Entry, Example, GrammaticalInfo, LangMap, LiftAttributes, LiftDocument, Metadata, Note,
    Relation, Reversal, Sense, Translation, DEFAULT_LIFT_VERSION, DEFAULT_PRODUCER,
};
use crate::lift::types::tree::{RawNode, RawObject};
use crate::lift::utils::{attr_opt, attr_or_empty, children, lang_map, traits};

/// Language given to the body of a note written as bare text.
pub const BARE_NOTE_LANG: &str = "en";

/// Builds the document from the tree produced by
/// [`parse_tree`](crate::lift::codec::xml::parse_tree).
pub fn parse_document(document: &RawObject) -> Result<LiftDocument> {
    let lift = document.get("lift").ok_or(LiftError::MissingRoot)?;
    let lift = lift.as_object().ok_or(LiftError::NoEntries)?;
    let entry_nodes = lift.get("entry").ok_or(LiftError::NoEntries)?.items();

    let metadata = Metadata {
        lift_attributes: LiftAttributes {
            producer: non_empty_attribute(lift, "producer", DEFAULT_PRODUCER),
            version: non_empty_attribute(lift, "version", DEFAULT_LIFT_VERSION),
        },
        header: lift.get("header").cloned(),
    };
    if metadata.header.is_some() {
        debug!("Captured document header");
    }

    let entries: Vec<Entry> = entry_nodes.iter().map(parse_entry).collect();
    info!(
        "Parsed {} entries (producer='{}', version={})",
        entries.len(),
        metadata.lift_attributes.producer,
        metadata.lift_attributes.version
    );

    Ok(LiftDocument { entries, metadata })
}

fn non_empty_attribute(obj: &RawObject, name: &str, fallback: &str) -> String {
    obj.attribute(name)
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Parses one `<entry>` node, keeping the node itself as the raw fragment.
pub fn parse_entry(node: &RawNode) -> Entry {
    let mut entry = Entry::new(attr_or_empty(node, "guid"), attr_or_empty(node, "id"));
    entry.date_created = attr_or_empty(node, "dateCreated");
    entry.date_modified = attr_or_empty(node, "dateModified");
    entry.order = attr_opt(node, "order");

    let forms = node
        .as_object()
        .and_then(|obj| obj.get("lexical-unit"))
        .map(|unit| lang_map(children(unit, "form")))
        .unwrap_or_default();
    entry.set_forms(forms);

    entry.traits = traits(node);
    entry.relations = children(node, "relation").iter().map(parse_relation).collect();
    entry.notes = children(node, "note").iter().map(parse_note).collect();
    entry.set_senses(children(node, "sense").iter().map(parse_sense).collect());
    entry.set_raw(node.as_object().cloned());

    trace!(
        "Parsed entry guid='{}' word='{}' ({} senses)",
        entry.guid,
        entry.word(),
        entry.senses().len()
    );
    entry
}

fn parse_relation(node: &RawNode) -> Relation {
    Relation {
        relation_type: attr_or_empty(node, "type"),
        ref_id: attr_or_empty(node, "ref"),
        order: attr_opt(node, "order"),
        traits: traits(node),
    }
}

/// Parses one `<sense>` node, keeping the node itself as the raw fragment.
pub fn parse_sense(node: &RawNode) -> Sense {
    let mut sense = Sense::new(attr_or_empty(node, "id"));
    sense.order = attr_opt(node, "order");

    let obj = node.as_object();
    sense.grammatical_info = obj
        .and_then(|obj| obj.get("grammatical-info"))
        .map(|gi| GrammaticalInfo {
            value: attr_or_empty(gi, "value"),
            traits: traits(gi),
        })
        .filter(|gi| !gi.is_blank());

    sense.glosses = lang_map(children(node, "gloss"));
    sense.definitions = obj
        .and_then(|obj| obj.get("definition"))
        .map(|def| lang_map(children(def, "form")))
        .unwrap_or_default();
    sense.examples = children(node, "example").iter().map(parse_example).collect();
    sense.reversals = children(node, "reversal")
        .iter()
        .map(|rev| Reversal {
            reversal_type: attr_or_empty(rev, "type"),
            forms: lang_map(children(rev, "form")),
        })
        .collect();
    sense.set_raw(obj.cloned());
    sense
}

fn parse_example(node: &RawNode) -> Example {
    Example {
        source: attr_opt(node, "source"),
        forms: lang_map(children(node, "form")),
        translations: children(node, "translation")
            .iter()
            .map(|t| Translation {
                translation_type: attr_or_empty(t, "type"),
                forms: lang_map(children(t, "form")),
            })
            .collect(),
        notes: children(node, "note").iter().map(parse_note).collect(),
    }
}

fn parse_note(node: &RawNode) -> Note {
    match node {
        RawNode::Text(text) => {
            let mut forms = LangMap::new();
            if !text.is_empty() {
                forms.insert(BARE_NOTE_LANG, text.as_str());
            }
            Note {
                note_type: None,
                forms,
            }
        }
        other => {
            let form_nodes = children(other, "form");
            let forms = match other.as_object().and_then(RawObject::text) {
                Some(text) if form_nodes.is_empty() && !text.is_empty() => {
                    let mut forms = LangMap::new();
                    forms.insert(BARE_NOTE_LANG, text);
                    forms
                }
                _ => lang_map(form_nodes),
            };
            Note {
                note_type: attr_opt(other, "type"),
                forms,
            }
        }
    }
}
