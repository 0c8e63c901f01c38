//! In-memory lexicon holding the entries of one imported document.
//!
//! Entries are keyed by guid and iterate in key order. Every mutation marks the
//! lexicon dirty until the next import or [`Lexicon::clear`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use log::{debug, info};
use uuid::Uuid;

use super::reader::{parse_lift, read_lift_file};
use super::search::{self, SortDirection, SortKey};
use super::types::error::Result;
use super::types::models::{
    Entry, GrammaticalInfo, LangMap, Metadata, Sense, Trait, MORPH_TYPE_TRAIT,
};
use super::writer::{LiftWriter, WriterOptions};

/// Morph type given to entries created from scratch.
pub const DEFAULT_MORPH_TYPE: &str = "stem";

/// Settings for a [`Lexicon`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconConfig {
    /// Language of headword forms on new entries.
    pub vernacular_lang: String,
    /// Language of glosses and definitions on new entries.
    pub analysis_lang: String,
    pub writer: WriterOptions,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            vernacular_lang: "mnr".to_string(),
            analysis_lang: "en".to_string(),
            writer: WriterOptions::default(),
        }
    }
}

/// Browse criteria for [`Lexicon::query`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Free-text search; blank means no search.
    pub text: String,
    pub pos: Option<String>,
    pub morph_type: Option<String>,
    /// Ordering used when no search text is given.
    pub sort_by: SortKey,
    pub direction: SortDirection,
}

/// Current UTC time as an RFC 3339 timestamp with millisecond precision.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Default)]
pub struct Lexicon {
    config: LexiconConfig,
    entries: BTreeMap<String, Entry>,
    metadata: Option<Metadata>,
    dirty: bool,
}

impl Lexicon {
    pub fn new(config: LexiconConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &LexiconConfig {
        &self.config
    }

    /// Replaces the whole lexicon with the entries and metadata of `text`.
    ///
    /// Returns the number of entries read. On error the lexicon is left as it
    /// was.
    pub fn import_lift(&mut self, text: &str) -> Result<usize> {
        let document = parse_lift(text)?;
        Ok(self.replace(document.entries, document.metadata))
    }

    /// Same as [`import_lift`](Self::import_lift), reading from `path`.
    pub fn import_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let document = read_lift_file(path)?;
        Ok(self.replace(document.entries, document.metadata))
    }

    fn replace(&mut self, entries: Vec<Entry>, metadata: Metadata) -> usize {
        self.entries.clear();
        let count = entries.len();
        for entry in entries {
            self.entries.insert(entry.guid.clone(), entry);
        }
        if self.entries.len() < count {
            debug!(
                "{} entries shared a guid with a later entry and were replaced",
                count - self.entries.len()
            );
        }
        self.metadata = Some(metadata);
        self.dirty = false;
        info!("Imported {} entries", count);
        count
    }

    /// Stores `entry`, replacing any entry with the same guid.
    ///
    /// The modification date is set to now and derived fields are recomputed.
    pub fn save_entry(&mut self, entry: Entry) -> &Entry {
        let now = timestamp_now();
        self.store(entry, &now)
    }

    /// Saves every entry with one shared modification date.
    pub fn bulk_save(&mut self, entries: impl IntoIterator<Item = Entry>) -> usize {
        let now = timestamp_now();
        let mut saved = 0;
        for entry in entries {
            self.store(entry, &now);
            saved += 1;
        }
        debug!("Bulk saved {} entries", saved);
        saved
    }

    fn store(&mut self, mut entry: Entry, now: &str) -> &Entry {
        entry.date_modified = now.to_string();
        entry.refresh_derived();
        self.dirty = true;
        let guid = entry.guid.clone();
        let slot = self.entries.entry(guid).or_default();
        *slot = entry;
        slot
    }

    pub fn delete_entry(&mut self, guid: &str) -> Option<Entry> {
        let removed = self.entries.remove(guid);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    /// Deletes every listed entry, returning how many existed.
    pub fn delete_entries<'a>(&mut self, guids: impl IntoIterator<Item = &'a str>) -> usize {
        let removed = guids
            .into_iter()
            .filter(|guid| self.entries.remove(*guid).is_some())
            .count();
        self.dirty = true;
        removed
    }

    /// A blank entry ready for editing. It is not stored until saved.
    pub fn create_new_entry(&self) -> Entry {
        let guid = Uuid::new_v4().to_string();
        let now = timestamp_now();

        let mut entry = Entry::new(guid.as_str(), format!("new_{}", guid));
        entry.date_created = now.clone();
        entry.date_modified = now;
        entry.set_form(self.config.vernacular_lang.as_str(), "");
        entry.traits.push(Trait::new(MORPH_TYPE_TRAIT, DEFAULT_MORPH_TYPE));

        let mut sense = Sense::new(Uuid::new_v4().to_string());
        sense.grammatical_info = Some(GrammaticalInfo::new(""));
        sense.glosses = blank_text(&self.config.analysis_lang);
        sense.definitions = blank_text(&self.config.analysis_lang);
        entry.push_sense(sense);
        entry
    }

    /// Writes every entry, in guid order, as a LIFT document.
    ///
    /// Uses the metadata of the last import, or the defaults when nothing was
    /// imported.
    pub fn export_lift(&self) -> Result<String> {
        let entries: Vec<Entry> = self.entries.values().cloned().collect();
        let default_metadata = Metadata::default();
        let metadata = self.metadata.as_ref().unwrap_or(&default_metadata);
        LiftWriter::new(self.config.writer.clone()).write(&entries, metadata)
    }

    /// Removes all entries and metadata.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.metadata = None;
        self.dirty = false;
    }

    pub fn get(&self, guid: &str) -> Option<&Entry> {
        self.entries.get(guid)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// `true` when entries changed since the last import.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn sense_count(&self) -> usize {
        self.entries.values().map(|e| e.senses().len()).sum()
    }

    pub fn example_count(&self) -> usize {
        self.entries
            .values()
            .flat_map(|e| e.senses())
            .map(|s| s.examples.len())
            .sum()
    }

    /// Distinct non-empty grammatical categories, sorted.
    pub fn unique_pos_values(&self) -> Vec<String> {
        let values: BTreeSet<&str> = self
            .entries
            .values()
            .flat_map(|e| e.senses())
            .filter_map(Sense::part_of_speech)
            .collect();
        values.into_iter().map(str::to_string).collect()
    }

    /// Distinct `morph-type` trait values, sorted.
    pub fn unique_morph_types(&self) -> Vec<String> {
        let values: BTreeSet<&str> = self
            .entries
            .values()
            .flat_map(|e| &e.traits)
            .filter(|t| t.name == MORPH_TYPE_TRAIT)
            .map(|t| t.value.as_str())
            .collect();
        values.into_iter().map(str::to_string).collect()
    }

    /// Entries matching `query`: filtered by category and morph type, then
    /// ranked by the search text, or sorted when there is none.
    pub fn query(&self, query: &Query) -> Vec<&Entry> {
        let mut result: Vec<&Entry> = self.entries.values().collect();
        if let Some(pos) = query.pos.as_deref() {
            result = search::filter_by_pos(result, pos);
        }
        if let Some(morph_type) = query.morph_type.as_deref() {
            result = search::filter_by_morph_type(result, morph_type);
        }
        if query.text.trim().is_empty() {
            search::sort_entries(result, query.sort_by, query.direction)
        } else {
            search::search_entries(result, &query.text)
        }
    }
}

fn blank_text(lang: &str) -> LangMap {
    let mut map = LangMap::new();
    map.insert(lang, "");
    map
}
