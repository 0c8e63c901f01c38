//! Structured model → intermediate tree, overlaid on captured fragments.
//!
//! An entry or sense with a captured fragment starts from a deep copy of it;
//! one without starts from an empty object. Every slot the model owns is then
//! replaced wholesale when the model holds a value and removed when it does
//! not. Slots the model never reads stay exactly as captured.

use log::trace;

use crate::lift::types::models::{
    Entry, Example, GrammaticalInfo, LangMap, Note, Relation, Reversal, Sense, Trait, Translation,
};
use crate::lift::types::tree::{RawNode, RawObject};

/// Builds the `<entry>` node for `entry`.
pub fn build_entry(entry: &Entry) -> RawNode {
    let mut base = match entry.raw() {
        Some(raw) => {
            trace!("Overlaying entry guid='{}' on captured fragment", entry.guid);
            raw.clone()
        }
        None => {
            trace!("Building entry guid='{}' from scratch", entry.guid);
            RawObject::new()
        }
    };

    base.set_attribute("dateCreated", entry.date_created.as_str());
    base.set_attribute("dateModified", entry.date_modified.as_str());
    base.set_attribute("id", entry.entry_id.as_str());
    base.set_attribute("guid", entry.guid.as_str());
    set_optional_attribute(&mut base, "order", entry.order.as_deref());

    set_container(&mut base, "lexical-unit", entry.forms());
    base.set_slot("trait", entry.traits.iter().map(build_trait).collect());
    base.set_slot("relation", entry.relations.iter().map(build_relation).collect());
    base.set_slot("sense", entry.senses().iter().map(build_sense).collect());
    base.set_slot("note", entry.notes.iter().map(build_note).collect());

    RawNode::Object(base)
}

/// Builds the `<sense>` node for `sense`.
pub fn build_sense(sense: &Sense) -> RawNode {
    let mut base = sense.raw().cloned().unwrap_or_default();

    base.set_attribute("id", sense.id.as_str());
    set_optional_attribute(&mut base, "order", sense.order.as_deref());

    match &sense.grammatical_info {
        Some(gi) if !gi.is_blank() => {
            base.insert("grammatical-info", build_grammatical_info(gi));
        }
        _ => {
            base.remove("grammatical-info");
        }
    }

    base.set_slot("gloss", build_forms(&sense.glosses));
    set_container(&mut base, "definition", &sense.definitions);
    base.set_slot("example", sense.examples.iter().map(build_example).collect());
    base.set_slot("reversal", sense.reversals.iter().map(build_reversal).collect());

    RawNode::Object(base)
}

/// Wraps a built object, collapsing an empty one to the empty text node the
/// reader produces for a bare element.
fn element(obj: RawObject) -> RawNode {
    if obj.is_empty() {
        RawNode::Text(String::new())
    } else {
        RawNode::Object(obj)
    }
}

fn set_optional_attribute(base: &mut RawObject, name: &str, value: Option<&str>) {
    match value {
        Some(value) => base.set_attribute(name, value),
        None => {
            base.remove_attribute(name);
        }
    }
}

/// Replaces a wrapper element holding only `<form>` children, such as
/// `<lexical-unit>` or `<definition>`, or removes it when `forms` is empty.
fn set_container(base: &mut RawObject, name: &str, forms: &LangMap) {
    let items = if forms.is_empty() {
        Vec::new()
    } else {
        vec![element(forms_object(forms))]
    };
    base.set_slot(name, items);
}

fn forms_object(forms: &LangMap) -> RawObject {
    let mut obj = RawObject::new();
    obj.set_slot("form", build_forms(forms));
    obj
}

/// One `<form lang="..."><text>...</text></form>`-shaped node per language.
fn build_forms(forms: &LangMap) -> Vec<RawNode> {
    forms
        .iter()
        .map(|(lang, text)| {
            let mut form = RawObject::new();
            form.set_attribute("lang", lang);
            form.set_slot("text", vec![RawNode::Text(text.to_string())]);
            element(form)
        })
        .collect()
}

fn build_trait(t: &Trait) -> RawNode {
    let mut obj = RawObject::new();
    obj.set_attribute("name", t.name.as_str());
    obj.set_attribute("value", t.value.as_str());
    element(obj)
}

fn build_relation(relation: &Relation) -> RawNode {
    let mut obj = RawObject::new();
    obj.set_attribute("type", relation.relation_type.as_str());
    obj.set_attribute("ref", relation.ref_id.as_str());
    if let Some(order) = &relation.order {
        obj.set_attribute("order", order.as_str());
    }
    obj.set_slot("trait", relation.traits.iter().map(build_trait).collect());
    element(obj)
}

fn build_grammatical_info(gi: &GrammaticalInfo) -> RawNode {
    let mut obj = RawObject::new();
    obj.set_attribute("value", gi.value.as_str());
    obj.set_slot("trait", gi.traits.iter().map(build_trait).collect());
    element(obj)
}

fn build_example(example: &Example) -> RawNode {
    let mut obj = RawObject::new();
    if let Some(source) = example.source.as_deref().filter(|s| !s.is_empty()) {
        obj.set_attribute("source", source);
    }
    obj.set_slot("form", build_forms(&example.forms));
    obj.set_slot(
        "translation",
        example.translations.iter().map(build_translation).collect(),
    );
    obj.set_slot("note", example.notes.iter().map(build_note).collect());
    element(obj)
}

fn build_translation(translation: &Translation) -> RawNode {
    let mut obj = RawObject::new();
    obj.set_attribute("type", translation.translation_type.as_str());
    obj.set_slot("form", build_forms(&translation.forms));
    element(obj)
}

fn build_reversal(reversal: &Reversal) -> RawNode {
    let mut obj = RawObject::new();
    obj.set_attribute("type", reversal.reversal_type.as_str());
    obj.set_slot("form", build_forms(&reversal.forms));
    element(obj)
}

fn build_note(note: &Note) -> RawNode {
    let mut obj = RawObject::new();
    if let Some(note_type) = note.note_type.as_deref().filter(|t| !t.is_empty()) {
        obj.set_attribute("type", note_type);
    }
    obj.set_slot("form", build_forms(&note.forms));
    element(obj)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(node: &RawNode) -> &RawObject {
        node.as_object().expect("object node")
    }

    #[test]
    fn new_entry_omits_empty_fields() {
        let mut entry = Entry::new("g1", "e1");
        entry.set_form("mnr", "taboo");

        let node = build_entry(&entry);
        let obj = object(&node);
        assert_eq!(obj.attribute("guid"), Some("g1"));
        assert_eq!(obj.attribute("id"), Some("e1"));
        assert!(obj.contains_key("lexical-unit"));
        for slot in ["trait", "relation", "sense", "note", "@_order"] {
            assert!(!obj.contains_key(slot), "unexpected {}", slot);
        }
    }

    #[test]
    fn forced_slots_are_sequences_and_others_scalars() {
        let mut entry = Entry::new("g1", "e1");
        entry.set_form("mnr", "taboo");
        let mut sense = Sense::new("s1");
        sense.definitions.insert("en", "not allowed");
        entry.push_sense(sense);

        let node = build_entry(&entry);
        let obj = object(&node);
        assert!(matches!(obj.get("sense"), Some(RawNode::List(items)) if items.len() == 1));

        let unit = object(obj.get("lexical-unit").expect("lexical-unit"));
        assert!(matches!(unit.get("form"), Some(RawNode::List(_))));

        let sense = object(&obj.child_items("sense")[0]);
        assert!(matches!(sense.get("definition"), Some(RawNode::Object(_))));
    }

    #[test]
    fn blank_grammatical_info_is_removed() {
        let mut sense = Sense::new("s1");
        sense.grammatical_info = Some(GrammaticalInfo::new(""));
        let node = build_sense(&sense);
        assert!(!object(&node).contains_key("grammatical-info"));
    }

    #[test]
    fn blank_value_with_traits_is_written() {
        let mut sense = Sense::new("s1");
        let mut gi = GrammaticalInfo::new("");
        gi.traits.push(Trait::new("type", "x"));
        sense.grammatical_info = Some(gi);
        let node = build_sense(&sense);
        let gi = object(object(&node).get("grammatical-info").expect("grammatical-info"));
        assert_eq!(gi.attribute("value"), Some(""));
        assert_eq!(gi.child_items("trait").len(), 1);
    }

    #[test]
    fn relation_without_fields_is_written_blank() {
        let mut entry = Entry::new("g1", "e1");
        entry.relations.push(Relation::default());
        let node = build_entry(&entry);
        let relation = object(&object(&node).child_items("relation")[0]);
        assert_eq!(relation.attribute("type"), Some(""));
        assert_eq!(relation.attribute("ref"), Some(""));
    }
}
