//! Lenient markup tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! A reduced state machine in the spec's shape: each state consumes one
//! input character (or reconsumes the previous one) and may emit tokens.
//! Where the spec raises a parse error, this tokenizer picks the most
//! forgiving continuation and keeps going.

use strum_macros::Display;

use boxlens_common::warning::warn_once;

/// One name/value attribute pair on a start tag.
///
/// [§ 13.1.2.3 Attributes](https://html.spec.whatwg.org/multipage/syntax.html#attributes-2)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name, lowercased.
    pub name: String,
    /// Attribute value; empty for valueless attributes.
    pub value: String,
}

/// Tokens emitted by the tokenizer.
///
/// Text is accumulated into runs rather than emitted per character; the
/// tree builder never needs finer granularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A start tag such as `<div class="a">`.
    StartTag {
        /// Tag name, lowercased.
        name: String,
        /// Attributes in source order (first occurrence wins on duplicates).
        attrs: Vec<Attribute>,
        /// `<br/>`-style self-closing flag.
        self_closing: bool,
    },
    /// An end tag such as `</div>`.
    EndTag {
        /// Tag name, lowercased.
        name: String,
    },
    /// A run of character data.
    Text(String),
    /// A comment, `<!-- ... -->`.
    Comment(String),
    /// A DOCTYPE declaration (contents ignored by the tree builder).
    Doctype,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The subset of tokenizer states this preview parser needs. Each variant
/// maps to the same-named state in the spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    ///
    /// Also where DOCTYPE contents are skimmed off; the tree builder only
    /// cares that a DOCTYPE existed, never about its internals.
    BogusComment,
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    MarkupDeclarationOpen,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    CommentEndDash,
    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    CommentEnd,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    ///
    /// Entered after a `<style>` or `<script>` start tag; everything up to
    /// the matching end tag is one text run.
    RawText,
}

/// Builder for the start/end tag currently being tokenized.
#[derive(Debug, Default)]
struct TagBuilder {
    name: String,
    attrs: Vec<Attribute>,
    self_closing: bool,
    is_end_tag: bool,
}

impl TagBuilder {
    fn start_attribute(&mut self) {
        self.attrs.push(Attribute {
            name: String::new(),
            value: String::new(),
        });
    }

    fn append_to_name(&mut self, c: char) {
        self.name.push(c.to_ascii_lowercase());
    }

    fn append_to_attr_name(&mut self, c: char) {
        if let Some(attr) = self.attrs.last_mut() {
            attr.name.push(c.to_ascii_lowercase());
        }
    }

    fn append_to_attr_value(&mut self, c: char) {
        if let Some(attr) = self.attrs.last_mut() {
            attr.value.push(c);
        }
    }
}

/// Lenient markup tokenizer.
///
/// # Example
/// ```
/// use boxlens_markup::MarkupTokenizer;
///
/// let mut tokenizer = MarkupTokenizer::new("<p class=\"wide\">hi</p>");
/// tokenizer.run();
/// assert_eq!(tokenizer.into_tokens().len(), 3);
/// ```
pub struct MarkupTokenizer {
    input: Vec<char>,
    pos: usize,
    state: TokenizerState,
    reconsume: bool,
    current: Option<char>,
    tokens: Vec<Token>,
    text_buffer: String,
    comment_buffer: String,
    current_tag: Option<TagBuilder>,
    /// Tag name whose end tag terminates the current RAWTEXT run.
    raw_text_end_tag: String,
}

/// Elements whose content is RAWTEXT rather than markup.
///
/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#raw-text-elements)
/// "Raw text elements: script, style"
const RAW_TEXT_ELEMENTS: [&str; 2] = ["style", "script"];

impl MarkupTokenizer {
    /// Create a tokenizer over `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        MarkupTokenizer {
            input: input.chars().collect(),
            pos: 0,
            state: TokenizerState::Data,
            reconsume: false,
            current: None,
            tokens: Vec::new(),
            text_buffer: String::new(),
            comment_buffer: String::new(),
            current_tag: None,
            raw_text_end_tag: String::new(),
        }
    }

    /// Consume the whole input, populating the token stream.
    pub fn run(&mut self) {
        loop {
            if self.reconsume {
                self.reconsume = false;
            } else {
                self.current = self.consume();
            }

            let Some(c) = self.current else {
                self.handle_eof();
                break;
            };

            match self.state {
                TokenizerState::Data => self.handle_data_state(c),
                TokenizerState::TagOpen => self.handle_tag_open_state(c),
                TokenizerState::EndTagOpen => self.handle_end_tag_open_state(c),
                TokenizerState::TagName => self.handle_tag_name_state(c),
                TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(c),
                TokenizerState::AttributeName => self.handle_attribute_name_state(c),
                TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(c),
                TokenizerState::AttributeValueDoubleQuoted => {
                    self.handle_attribute_value_quoted_state(c, '"');
                }
                TokenizerState::AttributeValueSingleQuoted => {
                    self.handle_attribute_value_quoted_state(c, '\'');
                }
                TokenizerState::AttributeValueUnquoted => {
                    self.handle_attribute_value_unquoted_state(c);
                }
                TokenizerState::AfterAttributeValueQuoted => {
                    self.handle_after_attribute_value_quoted_state(c);
                }
                TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(c),
                TokenizerState::MarkupDeclarationOpen => {
                    self.handle_markup_declaration_open_state(c);
                }
                TokenizerState::BogusComment => self.handle_bogus_comment_state(c),
                TokenizerState::Comment => self.handle_comment_state(c),
                TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(c),
                TokenizerState::CommentEnd => self.handle_comment_end_state(c),
                TokenizerState::RawText => self.handle_raw_text_state(c),
            }
        }
    }

    /// Take the accumulated tokens, consuming the tokenizer.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.pos).copied();
        self.pos += 1;
        c
    }

    /// Peek at upcoming characters without consuming them.
    fn lookahead(&self, len: usize) -> String {
        self.input
            .iter()
            .skip(self.pos)
            .take(len)
            .collect::<String>()
    }

    fn skip(&mut self, len: usize) {
        self.pos += len;
    }

    fn switch_to(&mut self, state: TokenizerState) {
        self.state = state;
    }

    fn reconsume_in(&mut self, state: TokenizerState) {
        self.reconsume = true;
        self.state = state;
    }

    fn flush_text(&mut self) {
        if !self.text_buffer.is_empty() {
            let text = std::mem::take(&mut self.text_buffer);
            self.tokens.push(Token::Text(text));
        }
    }

    fn emit_current_tag(&mut self) {
        let Some(tag) = self.current_tag.take() else {
            return;
        };
        if tag.is_end_tag {
            self.tokens.push(Token::EndTag { name: tag.name });
            return;
        }
        // Raw text elements swallow everything up to their end tag.
        if !tag.self_closing && RAW_TEXT_ELEMENTS.contains(&tag.name.as_str()) {
            self.raw_text_end_tag = tag.name.clone();
            self.switch_to(TokenizerState::RawText);
        }
        self.tokens.push(Token::StartTag {
            name: tag.name,
            attrs: tag.attrs,
            self_closing: tag.self_closing,
        });
    }

    /// EOF is never an error: flush what we have and drop any half-open
    /// construct, warning once about dropped tags.
    fn handle_eof(&mut self) {
        if self.current_tag.is_some() {
            warn_once("Markup", "input ended inside a tag; tag dropped");
        }
        if self.state == TokenizerState::Comment
            || self.state == TokenizerState::CommentEndDash
            || self.state == TokenizerState::CommentEnd
        {
            let comment = std::mem::take(&mut self.comment_buffer);
            self.tokens.push(Token::Comment(comment));
        }
        self.flush_text();
    }

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self, c: char) {
        if c == '<' {
            self.switch_to(TokenizerState::TagOpen);
        } else {
            self.text_buffer.push(c);
        }
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self, c: char) {
        match c {
            '!' => self.switch_to(TokenizerState::MarkupDeclarationOpen),
            '/' => self.switch_to(TokenizerState::EndTagOpen),
            c if c.is_ascii_alphabetic() => {
                self.flush_text();
                self.current_tag = Some(TagBuilder::default());
                self.reconsume_in(TokenizerState::TagName);
            }
            _ => {
                // "invalid-first-character-of-tag-name parse error...
                //  Emit a U+003C LESS-THAN SIGN character token."
                self.text_buffer.push('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self, c: char) {
        if c.is_ascii_alphabetic() {
            self.flush_text();
            self.current_tag = Some(TagBuilder {
                is_end_tag: true,
                ..TagBuilder::default()
            });
            self.reconsume_in(TokenizerState::TagName);
        } else if c == '>' {
            // "missing-end-tag-name parse error. Switch to the data state."
            warn_once("Markup", "empty end tag '</>' ignored");
            self.switch_to(TokenizerState::Data);
        } else {
            warn_once("Markup", "'</' not followed by a tag name");
            self.reconsume_in(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self, c: char) {
        match c {
            c if c.is_ascii_whitespace() => self.switch_to(TokenizerState::BeforeAttributeName),
            '/' => self.switch_to(TokenizerState::SelfClosingStartTag),
            '>' => {
                self.emit_current_tag();
                if self.state != TokenizerState::RawText {
                    self.switch_to(TokenizerState::Data);
                }
            }
            _ => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.append_to_name(c);
                }
            }
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self, c: char) {
        match c {
            c if c.is_ascii_whitespace() => {}
            '/' | '>' => self.reconsume_in(TokenizerState::TagName),
            _ => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.start_attribute();
                }
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self, c: char) {
        match c {
            c if c.is_ascii_whitespace() => self.switch_to(TokenizerState::BeforeAttributeName),
            '/' | '>' => self.reconsume_in(TokenizerState::TagName),
            '=' => self.switch_to(TokenizerState::BeforeAttributeValue),
            _ => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.append_to_attr_name(c);
                }
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self, c: char) {
        match c {
            c if c.is_ascii_whitespace() => {}
            '"' => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            '\'' => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            '>' => {
                // "missing-attribute-value parse error."
                warn_once("Markup", "attribute with '=' but no value");
                self.reconsume_in(TokenizerState::TagName);
            }
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// and [§ 13.2.5.37](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    fn handle_attribute_value_quoted_state(&mut self, c: char, quote: char) {
        if c == quote {
            self.switch_to(TokenizerState::AfterAttributeValueQuoted);
        } else if let Some(tag) = self.current_tag.as_mut() {
            tag.append_to_attr_value(c);
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self, c: char) {
        match c {
            c if c.is_ascii_whitespace() => self.switch_to(TokenizerState::BeforeAttributeName),
            '>' => self.reconsume_in(TokenizerState::TagName),
            _ => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.append_to_attr_value(c);
                }
            }
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self, c: char) {
        match c {
            c if c.is_ascii_whitespace() => self.switch_to(TokenizerState::BeforeAttributeName),
            '/' => self.switch_to(TokenizerState::SelfClosingStartTag),
            '>' => self.reconsume_in(TokenizerState::TagName),
            _ => {
                // "missing-whitespace-between-attributes parse error.
                //  Reconsume in the before attribute name state."
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self, c: char) {
        if c == '>' {
            if let Some(tag) = self.current_tag.as_mut() {
                tag.self_closing = true;
            }
            self.emit_current_tag();
            if self.state != TokenizerState::RawText {
                self.switch_to(TokenizerState::Data);
            }
        } else {
            // "unexpected-solidus-in-tag parse error."
            self.reconsume_in(TokenizerState::BeforeAttributeName);
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    fn handle_markup_declaration_open_state(&mut self, c: char) {
        if c == '-' && self.lookahead(1) == "-" {
            self.skip(1);
            self.flush_text();
            self.comment_buffer.clear();
            self.switch_to(TokenizerState::Comment);
        } else if c.eq_ignore_ascii_case(&'d')
            && self.lookahead(6).eq_ignore_ascii_case("octype")
        {
            self.skip(6);
            self.flush_text();
            self.tokens.push(Token::Doctype);
            self.switch_to(TokenizerState::BogusComment);
        } else {
            // "incorrectly-opened-comment parse error."
            self.reconsume_in(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    ///
    /// Everything up to `>` is discarded (also used to skim DOCTYPE innards).
    fn handle_bogus_comment_state(&mut self, c: char) {
        if c == '>' {
            self.switch_to(TokenizerState::Data);
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn handle_comment_state(&mut self, c: char) {
        if c == '-' {
            self.switch_to(TokenizerState::CommentEndDash);
        } else {
            self.comment_buffer.push(c);
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    fn handle_comment_end_dash_state(&mut self, c: char) {
        if c == '-' {
            self.switch_to(TokenizerState::CommentEnd);
        } else {
            self.comment_buffer.push('-');
            self.reconsume_in(TokenizerState::Comment);
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    fn handle_comment_end_state(&mut self, c: char) {
        match c {
            '>' => {
                let comment = std::mem::take(&mut self.comment_buffer);
                self.tokens.push(Token::Comment(comment));
                self.switch_to(TokenizerState::Data);
            }
            '-' => self.comment_buffer.push('-'),
            _ => {
                self.comment_buffer.push_str("--");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    ///
    /// Simplified: scan for `</name` (case-insensitive) of the element that
    /// opened the run; anything else is character data.
    fn handle_raw_text_state(&mut self, c: char) {
        if c == '<' {
            let close = format!("/{}", self.raw_text_end_tag);
            if self.lookahead(close.len()).eq_ignore_ascii_case(&close) {
                self.skip(close.len());
                self.flush_text();
                let name = std::mem::take(&mut self.raw_text_end_tag);
                // Skim to the closing '>' of the end tag.
                while let Some(rest) = self.consume() {
                    if rest == '>' {
                        break;
                    }
                }
                self.tokens.push(Token::EndTag { name });
                self.switch_to(TokenizerState::Data);
                return;
            }
        }
        self.text_buffer.push(c);
    }
}
