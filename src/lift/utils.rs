//! Low-level accessors over the intermediate tree.
//!
//! None of these fail: absent or oddly shaped input yields an empty value.

use crate::lift::format::shape::TEXT_NODE_NAME;
use crate::lift::types::models::{LangMap, Trait};
use crate::lift::types::tree::RawNode;

/// Text of a text-bearing node.
///
/// Handles the three shapes seen in documents: a plain scalar, an object
/// carrying its text under `#text`, and anything else, which is coerced by
/// concatenating the text found inside it.
pub fn extract_text(node: &RawNode) -> String {
    match node {
        RawNode::Text(s) | RawNode::Attr(s) => s.clone(),
        RawNode::Object(obj) => match obj.get(TEXT_NODE_NAME) {
            Some(text) => extract_text(text),
            None => obj
                .iter()
                .filter(|(_, child)| !matches!(child, RawNode::Attr(_)))
                .map(|(_, child)| extract_text(child))
                .collect(),
        },
        RawNode::List(items) => items.iter().map(extract_text).collect(),
    }
}

/// Text of the `<text>` child of a form, gloss or similar element.
pub fn form_text(form: &RawNode) -> String {
    form.as_object()
        .and_then(|obj| obj.get("text"))
        .map(extract_text)
        .unwrap_or_default()
}

/// Attribute value of `node`, or empty when missing.
pub fn attr_or_empty(node: &RawNode, name: &str) -> String {
    node.as_object()
        .and_then(|obj| obj.attribute(name))
        .unwrap_or_default()
        .to_string()
}

/// Attribute value of `node`, treating a missing or empty value as absent.
pub fn attr_opt(node: &RawNode, name: &str) -> Option<String> {
    node.as_object()
        .and_then(|obj| obj.attribute(name))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Items of the child slot `name` of `node`; empty when `node` is not an
/// object or the slot is absent.
pub fn children<'a>(node: &'a RawNode, name: &str) -> &'a [RawNode] {
    node.as_object()
        .map(|obj| obj.child_items(name))
        .unwrap_or(&[])
}

/// Builds a language map from `form` elements. Forms missing either the
/// `lang` attribute or text are skipped.
pub fn lang_map(forms: &[RawNode]) -> LangMap {
    let mut map = LangMap::new();
    for form in forms {
        let Some(lang) = attr_opt(form, "lang") else {
            continue;
        };
        let text = form_text(form);
        if !text.is_empty() {
            map.insert(lang, text);
        }
    }
    map
}

/// Reads the `trait` children of `node`.
pub fn traits(node: &RawNode) -> Vec<Trait> {
    children(node, "trait")
        .iter()
        .map(|t| Trait::new(attr_or_empty(t, "name"), attr_or_empty(t, "value")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lift::codec::xml::parse_tree;

    fn first_root(xml: &str) -> RawNode {
        let doc = parse_tree(xml).expect("parse");
        let root = doc.iter().next().map(|(_, node)| node.clone()).expect("root element");
        root
    }

    #[test]
    fn text_of_handles_all_shapes() {
        assert_eq!(extract_text(&RawNode::Text("plain".into())), "plain");

        let with_span = first_root(r#"<text>a <span lang="en">b</span> c</text>"#);
        assert_eq!(extract_text(&with_span), "a  c");

        let span_only = first_root(r#"<text><span lang="en">inner</span></text>"#);
        assert_eq!(extract_text(&span_only), "inner");

        let list = RawNode::List(vec![RawNode::Text("x".into()), RawNode::Text("y".into())]);
        assert_eq!(extract_text(&list), "xy");
    }

    #[test]
    fn form_text_is_empty_when_missing() {
        let form = first_root(r#"<form lang="en"/>"#);
        assert_eq!(form_text(&form), "");
        assert_eq!(form_text(&RawNode::Text("bare".into())), "");
    }

    #[test]
    fn lang_map_skips_incomplete_forms() {
        let parent = first_root(
            r#"<p>
                <form lang="mnr"><text>taboo</text></form>
                <form><text>no language</text></form>
                <form lang="en"><text></text></form>
                <form lang="es"><text>tabú</text></form>
            </p>"#,
        );
        let map = lang_map(children(&parent, "form"));
        let pairs: Vec<(&str, &str)> = map.iter().collect();
        assert_eq!(pairs, vec![("mnr", "taboo"), ("es", "tabú")]);
    }

    #[test]
    fn traits_default_missing_attributes() {
        let parent = first_root(r#"<p><trait name="morph-type"/></p>"#);
        assert_eq!(traits(&parent), vec![Trait::new("morph-type", "")]);
    }
}
