//! Loosely-typed tree mirroring the element, attribute and text layout of a
//! LIFT document.
//!
//! The reader captures one of these per entry, per sense and for the document
//! header, and the writer clones and patches them on export. Every structured
//! record owns its fragment outright; there is no sharing between records.

use serde::{Deserialize, Serialize};

use crate::lift::format::shape::{self, TEXT_NODE_NAME};

/// One node of the intermediate tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawNode {
    /// Text content of an element without attributes or children.
    Text(String),
    /// Value of an attribute, stored under an `@_`-prefixed key.
    Attr(String),
    /// Ordered sequence of same-named elements.
    List(Vec<RawNode>),
    /// Element with attributes and/or children.
    Object(RawObject),
}

impl RawNode {
    /// Scalar value of a text or attribute node.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawNode::Text(s) | RawNode::Attr(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&RawObject> {
        match self {
            RawNode::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[RawNode]> {
        match self {
            RawNode::List(items) => Some(items),
            _ => None,
        }
    }

    /// Views the node as a sequence: a list yields its items, anything else
    /// yields itself as a one-element slice.
    pub fn items(&self) -> &[RawNode] {
        match self {
            RawNode::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }
}

/// Ordered mapping of name to node. Names are unique; replacing a name keeps
/// its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawObject {
    fields: Vec<(String, RawNode)>,
}

impl RawObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&RawNode> {
        self.fields.iter().find(|(key, _)| key == name).map(|(_, node)| node)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RawNode> {
        self.fields
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, node)| node)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Inserts or replaces `name`, returning the previous node.
    pub fn insert(&mut self, name: impl Into<String>, node: RawNode) -> Option<RawNode> {
        let name = name.into();
        match self.get_mut(&name) {
            Some(slot) => Some(std::mem::replace(slot, node)),
            None => {
                self.fields.push((name, node));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<RawNode> {
        let index = self.fields.iter().position(|(key, _)| key == name)?;
        Some(self.fields.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawNode)> {
        self.fields.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Value of the attribute `name` (given without prefix).
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.get(&shape::attribute_key(name)).and_then(RawNode::as_str)
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.insert(shape::attribute_key(name), RawNode::Attr(value.into()));
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<RawNode> {
        self.remove(&shape::attribute_key(name))
    }

    /// Direct text stored under the reserved text key.
    pub fn text(&self) -> Option<&str> {
        self.get(TEXT_NODE_NAME).and_then(RawNode::as_str)
    }

    /// Items of the child slot `name`; empty when the slot is absent.
    pub fn child_items(&self, name: &str) -> &[RawNode] {
        self.get(name).map(RawNode::items).unwrap_or(&[])
    }

    /// Replaces the child slot `name` wholesale, or removes it when `items`
    /// is empty.
    pub fn set_slot(&mut self, name: &str, items: Vec<RawNode>) {
        if items.is_empty() {
            self.remove(name);
        } else {
            self.insert(name, shape::sequence(name, items));
        }
    }
}

impl<K: Into<String>> FromIterator<(K, RawNode)> for RawObject {
    fn from_iter<I: IntoIterator<Item = (K, RawNode)>>(iter: I) -> Self {
        let mut obj = RawObject::new();
        for (key, node) in iter {
            obj.insert(key, node);
        }
        obj
    }
}
