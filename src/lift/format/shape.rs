//! The tree-shape contract shared by the reader and the writer.
//!
//! Both directions of the codec build the same intermediate tree, so they must
//! agree on three things:
//! - which element names always form an ordered sequence, even for a single
//!   occurrence (forced-array elements);
//! - how attributes are told apart from child elements (a key prefix);
//! - under which key the direct text of an element is stored.
//!
//! The reader consults [`is_forced_array`] while grouping children, and the
//! writer builds every child slot through [`sequence`], so a written tree is
//! exactly the tree the reader rebuilds from the written text.

use crate::lift::types::tree::RawNode;

/// Bumped whenever any constant in this module changes meaning.
pub const SHAPE_VERSION: u32 = 1;

/// Prefix marking attribute keys inside a [`RawObject`](crate::lift::types::tree::RawObject).
pub const ATTRIBUTE_PREFIX: &str = "@_";

/// Key holding the direct text of an element that also carries attributes or children.
pub const TEXT_NODE_NAME: &str = "#text";

/// Element names that are always parsed (and written) as ordered sequences.
pub const FORCED_ARRAY_ELEMENTS: &[&str] = &[
    "entry", "sense", "form", "example", "note", "trait", "relation", "gloss", "reversal",
    "field", "range",
];

/// Returns `true` if `name` must always be represented as a sequence.
pub fn is_forced_array(name: &str) -> bool {
    FORCED_ARRAY_ELEMENTS.contains(&name)
}

/// Builds the tree key for an attribute name, e.g. `lang` → `@_lang`.
pub fn attribute_key(name: &str) -> String {
    format!("{}{}", ATTRIBUTE_PREFIX, name)
}

/// Returns the bare attribute name if `key` is an attribute key.
pub fn attribute_name(key: &str) -> Option<&str> {
    key.strip_prefix(ATTRIBUTE_PREFIX)
}

/// Builds the node stored under a child slot named `name`.
///
/// Forced-array names always yield a list. Any other name yields its single
/// item directly, and a list when it holds zero or several items, which is how
/// the reader groups repeated elements.
pub fn sequence(name: &str, mut items: Vec<RawNode>) -> RawNode {
    if is_forced_array(name) || items.len() != 1 {
        RawNode::List(items)
    } else {
        items.remove(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_keys_round_trip() {
        let key = attribute_key("lang");
        assert_eq!(key, "@_lang");
        assert_eq!(attribute_name(&key), Some("lang"));
        assert_eq!(attribute_name("lexical-unit"), None);
        assert_eq!(attribute_name(TEXT_NODE_NAME), None);
    }

    #[test]
    fn forced_names_always_build_lists() {
        for name in FORCED_ARRAY_ELEMENTS {
            let node = sequence(name, vec![RawNode::Text("x".to_string())]);
            assert!(matches!(node, RawNode::List(ref items) if items.len() == 1), "{}", name);
        }
    }

    #[test]
    fn other_names_collapse_single_items() {
        let node = sequence("translation", vec![RawNode::Text("x".to_string())]);
        assert_eq!(node, RawNode::Text("x".to_string()));

        let node = sequence(
            "translation",
            vec![RawNode::Text("a".to_string()), RawNode::Text("b".to_string())],
        );
        assert!(matches!(node, RawNode::List(ref items) if items.len() == 2));
    }
}
