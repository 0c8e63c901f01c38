use lift_codec::{
    read_lift_file, write_lift_file, Lexicon, LexiconConfig, LiftError, Query, SortDirection,
    SortKey,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture_path(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    for part in parts {
        p.push(part);
    }
    p
}

fn loaded() -> Lexicon {
    let mut lexicon = Lexicon::new(LexiconConfig::default());
    let count = lexicon
        .import_file(fixture_path(&["tests", "fixtures", "sample.lift"]))
        .expect("import sample");
    assert_eq!(count, 3);
    lexicon
}

fn words(lexicon: &Lexicon, query: &Query) -> Vec<String> {
    lexicon
        .query(query)
        .iter()
        .map(|e| e.word().to_string())
        .collect()
}

#[test]
fn sample_statistics() {
    let lexicon = loaded();
    assert_eq!(lexicon.entry_count(), 3);
    assert_eq!(lexicon.sense_count(), 4);
    assert_eq!(lexicon.example_count(), 2);
    assert_eq!(lexicon.unique_pos_values(), ["adj", "n"]);
    assert_eq!(lexicon.unique_morph_types(), ["root", "stem"]);
}

#[test]
fn search_ranks_and_folds_accents() {
    let lexicon = loaded();
    let search = |text: &str| {
        words(
            &lexicon,
            &Query {
                text: text.to_string(),
                ..Query::default()
            },
        )
    };

    assert_eq!(search("puku"), ["püku"]);
    assert_eq!(search("forbidden"), ["taboo"]);
    assert_eq!(search("pine forbidden"), ["taboo", "tuba"]);
    assert!(search("zzz").is_empty());
}

#[test]
fn browse_filters_and_sorts() {
    let lexicon = loaded();
    assert_eq!(words(&lexicon, &Query::default()), ["püku", "taboo", "tuba"]);
    assert_eq!(
        words(
            &lexicon,
            &Query {
                morph_type: Some("stem".to_string()),
                sort_by: SortKey::DateCreated,
                direction: SortDirection::Descending,
                ..Query::default()
            }
        ),
        ["tuba", "taboo"]
    );
    assert_eq!(
        words(
            &lexicon,
            &Query {
                pos: Some("adj".to_string()),
                ..Query::default()
            }
        ),
        ["taboo"]
    );
}

#[test]
fn edit_export_and_reimport() {
    let mut lexicon = loaded();

    let mut entry = lexicon.create_new_entry();
    entry.set_form("mnr", "tɨka");
    entry.edit_senses(|senses| senses[0].glosses.insert("en", "eat"));
    let guid = entry.guid.clone();
    lexicon.save_entry(entry);

    let mut puku = lexicon
        .get("77c1e2d3-aaaa-4bbb-8ccc-ddddeeeeffff")
        .cloned()
        .expect("puku");
    puku.notes.clear();
    lexicon.save_entry(puku);
    assert!(lexicon.delete_entry("a1b2c3d4-0000-4000-8000-000000000001").is_some());
    assert!(lexicon.is_dirty());

    let text = lexicon.export_lift().expect("export");
    let mut reloaded = Lexicon::default();
    assert_eq!(reloaded.import_lift(&text).expect("reimport"), 3);

    let created = reloaded.get(&guid).expect("new entry");
    assert_eq!(created.word(), "tɨka");
    assert_eq!(created.morph_type(), Some("stem"));
    assert_eq!(created.senses()[0].glosses.get("en"), Some("eat"));
    assert!(created.senses()[0].definitions.is_empty());

    let puku = reloaded
        .get("77c1e2d3-aaaa-4bbb-8ccc-ddddeeeeffff")
        .expect("puku");
    assert!(puku.notes.is_empty());
    assert!(puku.raw().map(|raw| raw.contains_key("etymology")).unwrap_or(false));
    assert!(reloaded.get("a1b2c3d4-0000-4000-8000-000000000001").is_none());
}

#[test]
fn files_round_trip_through_disk() {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("out.lift");

    let doc = read_lift_file(fixture_path(&["tests", "fixtures", "sample.lift"])).expect("read");
    write_lift_file(&path, &doc.entries, &doc.metadata).expect("write");
    let back = read_lift_file(&path).expect("read back");
    assert_eq!(back.entries.len(), doc.entries.len());
    assert_eq!(back.metadata.header, doc.metadata.header);
}

#[test]
fn utf16_documents_with_bom_are_read() {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("utf16.lift");
    let text = r#"<?xml version="1.0"?>
<lift version="0.13"><entry guid="g"><lexical-unit><form lang="mnr"><text>püku</text></form></lexical-unit></entry></lift>"#;

    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    fs::write(&path, bytes).expect("write fixture");

    let doc = read_lift_file(&path).expect("read");
    assert_eq!(doc.entries[0].word(), "püku");
}

#[test]
fn failed_import_keeps_previous_contents() {
    let mut lexicon = loaded();
    let err = lexicon.import_lift("<dictionary/>").expect_err("must fail");
    assert!(matches!(err, LiftError::MissingRoot));
    assert_eq!(lexicon.entry_count(), 3);
}
