//! Codec layer between bytes, XML text and the intermediate tree.
//!
//! # Submodules
//!
//! - [`encoding`][]: Byte-order-mark aware decoding of document bytes
//! - [`xml`][]: XML text ⇄ [`RawObject`](crate::lift::types::tree::RawObject) tree

pub mod encoding;
pub mod xml;
