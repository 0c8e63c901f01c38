//! # lift-codec
//!
//! A lossless reader and writer for LIFT (Lexicon Interchange FormaT) documents.
//!
//! Entries are parsed into a structured model that keeps the XML fragment each
//! entry and sense came from. Writing overlays the edited model on that
//! fragment, so elements the model does not represent (pronunciations,
//! etymologies, custom fields) pass through unchanged.
pub mod lift;

// Re-export the main types for convenience
pub use lift::{
    models::{
        Entry,
        Example,
        GrammaticalInfo,
        LangMap,
        LiftAttributes,
        LiftDocument,
        Metadata,
        Note,
        Relation,
        Reversal,
        Sense,
        Trait,
        Translation,
    },
    parse_lift,
    read_lift_file,
    search::{SortDirection, SortKey},
    store::{Lexicon, LexiconConfig, Query},
    write_lift,
    write_lift_file,
    LiftError,
    LiftWriter,
    RawNode,
    RawObject,
    Result,
    WriterOptions,
};
