//! Mapping between the intermediate tree and the structured model.
//!
//! - [`shape`]: naming and grouping rules both directions agree on
//! - [`parse`]: tree → entries and metadata
//! - [`build`]: entries → tree, overlaid on captured fragments

pub mod build;
pub mod parse;
pub mod shape;
