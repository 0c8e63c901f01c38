//! Ranked search, filtering and sorting over entries.
//!
//! All functions borrow the entries they are given and return references, so
//! they compose: filter first, then either search or sort.

use std::cmp::Ordering;

use log::debug;

use super::types::models::{Entry, MORPH_TYPE_TRAIT};

const WORD_EXACT: u32 = 100;
const WORD_PREFIX: u32 = 50;
const WORD_CONTAINS: u32 = 25;
const FORM_CONTAINS: u32 = 10;
const DEFINITION_CONTAINS: u32 = 8;
const GLOSS_CONTAINS: u32 = 8;
const GLOSS_EXACT: u32 = 20;
const EXAMPLE_CONTAINS: u32 = 3;

/// Lowercases `text` and folds the accented letters of the orthography to
/// their plain counterparts, so `püŵa` matches `puwa`.
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'ü' => 'u',
            'ŵ' => 'w',
            'ŷ' => 'y',
            other => other,
        })
        .collect()
}

/// Relevance of `entry` for an already normalized query.
fn score(entry: &Entry, query: &str, terms: &[&str]) -> u32 {
    let word = normalize(entry.word());
    let mut score = if word == query {
        WORD_EXACT
    } else if word.starts_with(query) {
        WORD_PREFIX
    } else if word.contains(query) {
        WORD_CONTAINS
    } else {
        0
    };

    for &term in terms {
        let contains = |text: &str| normalize(text).contains(term);

        score += FORM_CONTAINS
            * entry.forms().values().filter(|t| contains(*t)).count() as u32;
        for sense in entry.senses() {
            score += DEFINITION_CONTAINS
                * sense.definitions.values().filter(|t| contains(*t)).count() as u32;
            for gloss in sense.glosses.values() {
                let gloss = normalize(gloss);
                if gloss.contains(term) {
                    score += GLOSS_CONTAINS;
                }
                if gloss == term {
                    score += GLOSS_EXACT;
                }
            }
            for example in &sense.examples {
                let translations = example.translations.iter().flat_map(|t| t.forms.values());
                score += EXAMPLE_CONTAINS
                    * example
                        .forms
                        .values()
                        .chain(translations)
                        .filter(|t| contains(*t))
                        .count() as u32;
            }
        }
    }
    score
}

/// Ranks entries against `query`, most relevant first.
///
/// A blank query returns every entry in its original order. Otherwise only
/// entries with a positive score are kept; ties keep their original order.
pub fn search_entries<'a>(
    entries: impl IntoIterator<Item = &'a Entry>,
    query: &str,
) -> Vec<&'a Entry> {
    let query = normalize(query.trim());
    if query.is_empty() {
        return entries.into_iter().collect();
    }
    let terms: Vec<&str> = query.split_whitespace().collect();

    let mut scored: Vec<(u32, &Entry)> = entries
        .into_iter()
        .map(|entry| (score(entry, &query, &terms), entry))
        .filter(|(score, _)| *score > 0)
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    debug!("Search '{}' matched {} entries", query, scored.len());
    scored.into_iter().map(|(_, entry)| entry).collect()
}

/// Entries with at least one sense of grammatical category `pos`.
pub fn filter_by_pos<'a>(
    entries: impl IntoIterator<Item = &'a Entry>,
    pos: &str,
) -> Vec<&'a Entry> {
    entries
        .into_iter()
        .filter(|entry| entry.senses().iter().any(|s| s.part_of_speech() == Some(pos)))
        .collect()
}

/// Entries carrying a `morph-type` trait with value `morph_type`.
pub fn filter_by_morph_type<'a>(
    entries: impl IntoIterator<Item = &'a Entry>,
    morph_type: &str,
) -> Vec<&'a Entry> {
    entries
        .into_iter()
        .filter(|entry| {
            entry
                .traits
                .iter()
                .any(|t| t.name == MORPH_TYPE_TRAIT && t.value == morph_type)
        })
        .collect()
}

/// Field to order browse results by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Word,
    DateModified,
    DateCreated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Stable sort of `entries`. Words compare case-insensitively, with exact
/// text breaking ties; timestamps compare as text, which orders RFC 3339
/// values chronologically.
pub fn sort_entries<'a>(
    entries: impl IntoIterator<Item = &'a Entry>,
    by: SortKey,
    direction: SortDirection,
) -> Vec<&'a Entry> {
    let mut sorted: Vec<&Entry> = entries.into_iter().collect();
    sorted.sort_by(|a, b| {
        let ordering = match by {
            SortKey::Word => compare_words(a.word(), b.word()),
            SortKey::DateModified => a.date_modified.cmp(&b.date_modified),
            SortKey::DateCreated => a.date_created.cmp(&b.date_created),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    sorted
}

fn compare_words(a: &str, b: &str) -> Ordering {
    normalize(a).cmp(&normalize(b)).then_with(|| a.cmp(b))
}
