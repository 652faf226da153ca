//! Lenient tree builder.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! A much-reduced tree construction stage: one stack of open elements, no
//! insertion modes. The injected preview document always carries explicit
//! `<html>`/`<head>`/`<body>` tags, so no implicit structure is synthesized;
//! bare fragments simply hang off the document node. Leniency rules:
//!
//! - an end tag with no matching open element is ignored (with a warning)
//! - an end tag that skips levels implicitly closes everything above it
//! - elements left open at end of input are implicitly closed
//! - void elements never go on the stack

use boxlens_common::warning::warn_once;
use boxlens_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::{MarkupTokenizer, Token};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Tree builder over a token stream.
///
/// # Example
/// ```
/// use boxlens_markup::parse_markup;
///
/// let tree = parse_markup("<div id=\"content\"><p>hi</p></div>");
/// assert!(tree.element_by_id("content").is_some());
/// ```
pub struct MarkupParser {
    tokens: Vec<Token>,
}

impl MarkupParser {
    /// Create a parser over an already-produced token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        MarkupParser { tokens }
    }

    /// Build the DOM tree. Never fails; problems are warned and tolerated.
    #[must_use]
    pub fn run(self) -> DomTree {
        let mut tree = DomTree::new();
        // [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
        let mut open_elements: Vec<(NodeId, String)> = Vec::new();

        let current = |stack: &[(NodeId, String)]| -> NodeId {
            stack.last().map_or(NodeId::ROOT, |&(id, _)| id)
        };

        for token in self.tokens {
            match token {
                Token::Doctype => {}
                Token::StartTag {
                    name,
                    attrs,
                    self_closing,
                } => {
                    let mut map = AttributesMap::new();
                    for attr in attrs {
                        // "duplicate-attribute parse error... the new
                        //  attribute must be ignored."
                        let _ = map.entry(attr.name).or_insert(attr.value);
                    }
                    let element = tree.alloc(NodeType::Element(ElementData {
                        tag_name: name.clone(),
                        attrs: map,
                    }));
                    tree.append_child(current(&open_elements), element);

                    let is_void = VOID_ELEMENTS.contains(&name.as_str());
                    if !is_void && !self_closing {
                        open_elements.push((element, name));
                    }
                }
                Token::EndTag { name } => {
                    let matching = open_elements
                        .iter()
                        .rposition(|(_, open_name)| *open_name == name);
                    match matching {
                        Some(index) => {
                            if index + 1 < open_elements.len() {
                                warn_once(
                                    "Markup",
                                    &format!("'</{name}>' implicitly closed nested elements"),
                                );
                            }
                            open_elements.truncate(index);
                        }
                        None => {
                            warn_once("Markup", &format!("unmatched end tag '</{name}>' ignored"));
                        }
                    }
                }
                Token::Text(text) => {
                    let node = tree.alloc(NodeType::Text(text));
                    tree.append_child(current(&open_elements), node);
                }
                Token::Comment(comment) => {
                    let node = tree.alloc(NodeType::Comment(comment));
                    tree.append_child(current(&open_elements), node);
                }
            }
        }

        if !open_elements.is_empty() {
            warn_once("Markup", "unclosed elements at end of input");
        }

        tree
    }
}

/// Parse markup into a DOM tree: tokenize, then build.
///
/// The single entry point the render surface uses. Lenient end to end:
/// any input — malformed, truncated, or empty — yields a tree.
#[must_use]
pub fn parse_markup(markup: &str) -> DomTree {
    let mut tokenizer = MarkupTokenizer::new(markup);
    tokenizer.run();
    MarkupParser::new(tokenizer.into_tokens()).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_structure() {
        let tree = parse_markup("<div><p>one</p><p>two</p></div>");
        let div = tree.children(tree.root())[0];
        assert_eq!(tree.as_element(div).unwrap().tag_name, "div");
        assert_eq!(tree.children(div).len(), 2);
    }

    #[test]
    fn void_elements_take_no_children() {
        let tree = parse_markup("<br>text");
        let children = tree.children(tree.root());
        assert_eq!(children.len(), 2);
        assert_eq!(tree.as_element(children[0]).unwrap().tag_name, "br");
        assert_eq!(tree.as_text(children[1]), Some("text"));
    }

    #[test]
    fn unclosed_elements_are_implicitly_closed() {
        let tree = parse_markup("<div><span>dangling");
        let div = tree.children(tree.root())[0];
        let span = tree.children(div)[0];
        assert_eq!(tree.text_content(span), "dangling");
    }

    #[test]
    fn unmatched_end_tag_is_ignored() {
        let tree = parse_markup("</p><div>x</div>");
        let children = tree.children(tree.root());
        assert_eq!(children.len(), 1);
        assert_eq!(tree.as_element(children[0]).unwrap().tag_name, "div");
    }

    #[test]
    fn end_tag_skipping_levels_closes_them() {
        let tree = parse_markup("<div><span>inner</div>after");
        let root_children = tree.children(tree.root());
        // "after" lands at the root, not inside span.
        assert_eq!(tree.as_text(root_children[1]), Some("after"));
    }

    #[test]
    fn duplicate_attributes_keep_the_first() {
        let tree = parse_markup("<div class=\"a\" class=\"b\"></div>");
        let div = tree.children(tree.root())[0];
        assert!(tree.as_element(div).unwrap().has_class("a"));
        assert!(!tree.as_element(div).unwrap().has_class("b"));
    }

    #[test]
    fn empty_input_yields_just_the_document() {
        let tree = parse_markup("");
        assert!(tree.children(tree.root()).is_empty());
    }

    #[test]
    fn full_injected_document_shape() {
        let tree = parse_markup(
            "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"/></head>\
             <body><div id=\"content\"><p>hello</p></div></body></html>",
        );
        assert!(tree.document_element().is_some());
        assert!(tree.body().is_some());
        let content = tree.element_by_id("content").unwrap();
        assert_eq!(tree.descendants(content).len(), 2); // <p> and its text
    }
}
