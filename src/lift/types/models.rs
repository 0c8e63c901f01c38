//! Core data structures for the structured lexicon model.
//!
//! This module defines the records the reader produces and the writer consumes:
//! - Entries, senses and examples
//! - Relations, traits, notes, translations and reversals
//! - Document-level metadata
//!
//! Entries and senses may carry the raw fragment they were parsed from. The
//! fragment is read-only outside the crate; callers edit the structured fields
//! and the writer reconciles them with the fragment.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::tree::{RawNode, RawObject};

/// Producer recorded when a document does not name one.
pub const DEFAULT_PRODUCER: &str = "unknown";

/// LIFT version written when metadata does not carry one.
pub const DEFAULT_LIFT_VERSION: &str = "0.13";

/// Mapping from language tag to text.
///
/// Keys are unique and keep their insertion order; assigning an existing key
/// keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LangMap(Vec<(String, String)>);

impl LangMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == lang)
            .map(|(_, text)| text.as_str())
    }

    /// Inserts or replaces the text for `lang`, returning the previous text.
    pub fn insert(&mut self, lang: impl Into<String>, text: impl Into<String>) -> Option<String> {
        let lang = lang.into();
        let text = text.into();
        match self.0.iter_mut().find(|(key, _)| *key == lang) {
            Some((_, slot)) => Some(std::mem::replace(slot, text)),
            None => {
                self.0.push((lang, text));
                None
            }
        }
    }

    pub fn remove(&mut self, lang: &str) -> Option<String> {
        let index = self.0.iter().position(|(key, _)| key == lang)?;
        Some(self.0.remove(index).1)
    }

    /// The first text in insertion order.
    pub fn first_value(&self) -> Option<&str> {
        self.0.first().map(|(_, text)| text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(lang, text)| (lang.as_str(), text.as_str()))
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, text)| text.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LangMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = LangMap::new();
        for (lang, text) in iter {
            map.insert(lang, text);
        }
        map
    }
}

impl Serialize for LangMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (lang, text) in self.iter() {
            map.serialize_entry(lang, text)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LangMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LangMapVisitor;

        impl<'de> Visitor<'de> for LangMapVisitor {
            type Value = LangMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of language tag to text")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<LangMap, A::Error> {
                let mut map = LangMap::new();
                while let Some((lang, text)) = access.next_entry::<String, String>()? {
                    map.insert(lang, text);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(LangMapVisitor)
    }
}

/// A name/value pair such as `morph-type = stem`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trait {
    pub name: String,
    pub value: String,
}

impl Trait {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A typed cross-reference to another entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    #[serde(rename = "type")]
    pub relation_type: String,
    #[serde(rename = "ref")]
    pub ref_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default)]
    pub traits: Vec<Trait>,
}

/// A note with an optional type and multilingual body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub note_type: Option<String>,
    #[serde(default)]
    pub forms: LangMap,
}

/// A translation of an example sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(rename = "type")]
    pub translation_type: String,
    #[serde(default)]
    pub forms: LangMap,
}

/// A reversal-index cross-reference of a sense.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reversal {
    #[serde(rename = "type")]
    pub reversal_type: String,
    #[serde(default)]
    pub forms: LangMap,
}

/// Grammatical category of a sense.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammaticalInfo {
    pub value: String,
    #[serde(default)]
    pub traits: Vec<Trait>,
}

impl GrammaticalInfo {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            traits: Vec::new(),
        }
    }

    /// `true` when there is neither a value nor a trait to write.
    pub fn is_blank(&self) -> bool {
        self.value.is_empty() && self.traits.is_empty()
    }
}

/// An example sentence illustrating a sense.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub forms: LangMap,
    #[serde(default)]
    pub translations: Vec<Translation>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

/// One meaning of an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sense {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default)]
    pub grammatical_info: Option<GrammaticalInfo>,
    #[serde(default)]
    pub glosses: LangMap,
    #[serde(default)]
    pub definitions: LangMap,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub reversals: Vec<Reversal>,
    #[serde(rename = "rawSense", default, skip_serializing_if = "Option::is_none")]
    raw: Option<RawObject>,
}

impl Sense {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// The fragment this sense was parsed from, if any.
    pub fn raw(&self) -> Option<&RawObject> {
        self.raw.as_ref()
    }

    pub(crate) fn set_raw(&mut self, raw: Option<RawObject>) {
        self.raw = raw;
    }

    /// Non-empty grammatical category value.
    pub fn part_of_speech(&self) -> Option<&str> {
        self.grammatical_info
            .as_ref()
            .map(|gi| gi.value.as_str())
            .filter(|value| !value.is_empty())
    }
}

/// One dictionary headword unit.
///
/// `word` and `sense_pos_list` are derived: they are recomputed by every method
/// that mutates `forms` or `senses` and cannot be set directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub guid: String,
    pub entry_id: String,
    #[serde(default)]
    pub date_created: String,
    #[serde(default)]
    pub date_modified: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default)]
    forms: LangMap,
    #[serde(default)]
    word: String,
    #[serde(default)]
    pub traits: Vec<Trait>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    senses: Vec<Sense>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    sense_pos_list: Vec<String>,
    #[serde(rename = "rawEntry", default, skip_serializing_if = "Option::is_none")]
    raw: Option<RawObject>,
}

impl Entry {
    pub fn new(guid: impl Into<String>, entry_id: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            entry_id: entry_id.into(),
            ..Self::default()
        }
    }

    pub fn forms(&self) -> &LangMap {
        &self.forms
    }

    /// Primary display word: the first form in insertion order.
    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn set_forms(&mut self, forms: LangMap) {
        self.forms = forms;
        self.word = derive_word(&self.forms);
    }

    pub fn set_form(&mut self, lang: impl Into<String>, text: impl Into<String>) {
        self.forms.insert(lang, text);
        self.word = derive_word(&self.forms);
    }

    pub fn remove_form(&mut self, lang: &str) -> Option<String> {
        let removed = self.forms.remove(lang);
        self.word = derive_word(&self.forms);
        removed
    }

    pub fn senses(&self) -> &[Sense] {
        &self.senses
    }

    pub fn set_senses(&mut self, senses: Vec<Sense>) {
        self.senses = senses;
        self.sense_pos_list = derive_pos_list(&self.senses);
    }

    pub fn push_sense(&mut self, sense: Sense) {
        self.senses.push(sense);
        self.sense_pos_list = derive_pos_list(&self.senses);
    }

    /// Mutates the senses in place, then recomputes the part-of-speech index.
    pub fn edit_senses<R>(&mut self, edit: impl FnOnce(&mut Vec<Sense>) -> R) -> R {
        let result = edit(&mut self.senses);
        self.sense_pos_list = derive_pos_list(&self.senses);
        result
    }

    /// Deduplicated part-of-speech values across senses, in first-seen order.
    pub fn sense_pos_list(&self) -> &[String] {
        &self.sense_pos_list
    }

    /// The fragment this entry was parsed from, if any.
    pub fn raw(&self) -> Option<&RawObject> {
        self.raw.as_ref()
    }

    pub(crate) fn set_raw(&mut self, raw: Option<RawObject>) {
        self.raw = raw;
    }

    /// Recomputes `word` and `sense_pos_list` from their source fields.
    ///
    /// Needed after deserializing, where the derived fields are taken as stored.
    pub fn refresh_derived(&mut self) {
        self.word = derive_word(&self.forms);
        self.sense_pos_list = derive_pos_list(&self.senses);
    }

    /// Value of the `morph-type` trait, if present.
    pub fn morph_type(&self) -> Option<&str> {
        self.traits
            .iter()
            .find(|t| t.name == MORPH_TYPE_TRAIT)
            .map(|t| t.value.as_str())
    }
}

/// Name of the trait carrying an entry's morphological type.
pub const MORPH_TYPE_TRAIT: &str = "morph-type";

fn derive_word(forms: &LangMap) -> String {
    forms.first_value().unwrap_or_default().to_string()
}

fn derive_pos_list(senses: &[Sense]) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for pos in senses.iter().filter_map(Sense::part_of_speech) {
        if !values.iter().any(|v| v == pos) {
            values.push(pos.to_string());
        }
    }
    values
}

/// Producer and version attributes of the `<lift>` root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiftAttributes {
    pub producer: String,
    pub version: String,
}

impl Default for LiftAttributes {
    fn default() -> Self {
        Self {
            producer: DEFAULT_PRODUCER.to_string(),
            version: DEFAULT_LIFT_VERSION.to_string(),
        }
    }
}

/// Document-level metadata, replaced wholesale on every import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub lift_attributes: LiftAttributes,
    /// The `<header>` element captured verbatim.
    #[serde(default)]
    pub header: Option<RawNode>,
}

/// Result of reading a LIFT document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiftDocument {
    pub entries: Vec<Entry>,
    pub metadata: Metadata,
}
