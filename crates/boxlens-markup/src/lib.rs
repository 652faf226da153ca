//! Lenient HTML tokenizer and tree builder for the boxlens render surface.
//!
//! # Scope
//!
//! The render surface accepts arbitrary, untrusted, possibly half-typed
//! markup straight out of a live editor, so this parser's contract is
//! leniency: any input produces a tree, never an error. Tolerated problems
//! are reported through the deduplicated warning sink instead.
//!
//! This is a deliberately small subset of
//! [WHATWG § 13.2 Parsing HTML documents](https://html.spec.whatwg.org/multipage/parsing.html):
//! - data/tag/attribute tokenizer states, comments, DOCTYPE skipping
//! - RAWTEXT handling for `<style>` and `<script>` payloads
//! - a stack-of-open-elements tree builder with implicit closes
//!
//! # Not implemented
//!
//! - character references (preview text shows them verbatim)
//! - foster parenting, the adoption agency algorithm, table modes
//! - namespaces / foreign content

/// Tree construction from the token stream.
pub mod parser;
/// Tokenizer for converting raw markup into tokens.
pub mod tokenizer;

pub use parser::{MarkupParser, parse_markup};
pub use tokenizer::{Attribute, MarkupTokenizer, Token};
