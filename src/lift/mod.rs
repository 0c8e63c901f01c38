//! LIFT document reading, writing and editing.
//!
//! - [`reader`] / [`writer`]: document text ⇄ structured model
//! - [`format`]: the mapping between the model and the intermediate tree
//! - [`codec`]: XML text ⇄ tree, byte decoding
//! - [`store`] / [`search`]: an editable lexicon built on top

pub mod codec;
pub mod format;
pub mod reader;
pub mod search;
pub mod store;
pub mod types;
pub mod writer;
mod utils;

pub use reader::{parse_lift, read_lift_file};
pub use types::error::{LiftError, Result};
pub use types::models;
pub use types::tree::{RawNode, RawObject};
pub use writer::{write_lift, write_lift_file, LiftWriter, WriterOptions};
