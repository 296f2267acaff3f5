/*!
 * SSML subset parser.
 *
 * Walks the element tree depth-first, dispatching on the tag name. Span tags
 * record a directive when they open and complete it when they close; point
 * tags record a directive and force a word boundary. Text nodes (including
 * the text that trails an element) are appended in document order.
 *
 * A document that is not well-formed, or whose root is not `<speak>`, is not
 * an error for callers of `parse`: the raw input comes back as the text with
 * an empty timeline.
 */

use log::{debug, warn};
use roxmltree::{Document, Edge, Node};
use serde::{Deserialize, Serialize};

use crate::app_config::ParserConfig;
use crate::errors::MarkupError;
use crate::markup::accumulator::{Mark, TextAccumulator};
use crate::markup::attributes;
use crate::text_normalizer::TextNormalizer;
use crate::timeline::{Anchor, Directive, DirectivePayload, DirectiveTimeline, InterpretAs};

/// SSML 1.1 namespace
pub const SSML_NAMESPACE: &str = "http://www.w3.org/2001/10/synthesis";

/// Designated top-level element
pub const ROOT_TAG: &str = "speak";

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Result of parsing one markup document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedMarkup {
    /// Clean text for the synthesizer
    pub text: String,
    /// Directives in document order
    pub timeline: DirectiveTimeline,
    /// `xml:lang` of the root element, when declared
    pub language: Option<String>,
}

impl ParsedMarkup {
    /// Fallback result: the raw input as text, no directives
    pub fn plain_text(raw: &str) -> Self {
        Self {
            text: raw.to_string(),
            timeline: DirectiveTimeline::empty(),
            language: None,
        }
    }

    pub fn into_parts(self) -> (String, DirectiveTimeline) {
        (self.text, self.timeline)
    }
}

impl From<ParsedMarkup> for (String, DirectiveTimeline) {
    fn from(parsed: ParsedMarkup) -> Self {
        parsed.into_parts()
    }
}

/// Supported tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Voice,
    Prosody,
    Break,
    Emphasis,
    SayAs,
    Sub,
    Audio,
    Paragraph,
    Sentence,
    Phoneme,
    /// Walked for its text, no directive
    Transparent,
}

impl TagKind {
    fn of(node: &Node<'_, '_>) -> Self {
        let tag = node.tag_name();
        if !matches!(tag.namespace(), None | Some(SSML_NAMESPACE)) {
            return TagKind::Transparent;
        }

        match tag.name() {
            "voice" => TagKind::Voice,
            "prosody" => TagKind::Prosody,
            "break" => TagKind::Break,
            "emphasis" => TagKind::Emphasis,
            "say-as" => TagKind::SayAs,
            "sub" => TagKind::Sub,
            "audio" => TagKind::Audio,
            "p" | "paragraph" => TagKind::Paragraph,
            "s" | "sentence" => TagKind::Sentence,
            "phoneme" => TagKind::Phoneme,
            _ => TagKind::Transparent,
        }
    }
}

/// Markup parser, stateless between calls
#[derive(Debug, Clone, Default)]
pub struct MarkupParser {
    config: ParserConfig,
}

impl MarkupParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a document, falling back to plain text on any markup error
    pub fn parse(&self, markup: &str) -> ParsedMarkup {
        match self.try_parse(markup) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Treating input as plain text: {}", e);
                ParsedMarkup::plain_text(markup)
            }
        }
    }

    /// Parse a document, reporting markup errors
    pub fn try_parse(&self, markup: &str) -> Result<ParsedMarkup, MarkupError> {
        let document = Document::parse(markup).map_err(|e| MarkupError::Syntax(e.to_string()))?;
        let root = document.root_element();

        let root_name = root.tag_name().name();
        let root_ok = root_name == ROOT_TAG && matches!(root.tag_name().namespace(), None | Some(SSML_NAMESPACE));
        if self.config.strict_root && !root_ok {
            return Err(MarkupError::RootMismatch {
                expected: ROOT_TAG.to_string(),
                found: root_name.to_string(),
            });
        }

        let mut walker = Walker {
            text: TextAccumulator::new(),
            timeline: DirectiveTimeline::empty(),
            max_depth: self.config.max_depth,
        };
        walker.walk_children(root, 1)?;

        let parsed = ParsedMarkup {
            text: walker.text.finish(),
            timeline: walker.timeline,
            language: root.attribute((XML_NAMESPACE, "lang")).map(str::to_string),
        };

        debug!(
            "Parsed markup: {} chars of text, {} directives",
            parsed.text.chars().count(),
            parsed.timeline.len()
        );

        Ok(parsed)
    }
}

/// Parse with the default configuration
pub fn parse(markup: &str) -> ParsedMarkup {
    MarkupParser::new().parse(markup)
}

struct Walker {
    text: TextAccumulator,
    timeline: DirectiveTimeline,
    max_depth: usize,
}

impl Walker {
    fn walk_children(&mut self, node: Node<'_, '_>, depth: usize) -> Result<(), MarkupError> {
        if depth > self.max_depth {
            return Err(MarkupError::TooDeep(self.max_depth));
        }

        for child in node.children() {
            if child.is_element() {
                self.walk_element(child, depth + 1)?;
            } else if child.is_text() {
                self.text.push(child.text().unwrap_or_default());
            }
        }

        Ok(())
    }

    fn walk_element(&mut self, node: Node<'_, '_>, depth: usize) -> Result<(), MarkupError> {
        match TagKind::of(&node) {
            TagKind::Voice => {
                let name = node.attribute("name").unwrap_or_default().to_string();
                self.span(node, depth, DirectivePayload::Voice { name })?;
            }
            TagKind::Prosody => {
                let payload = DirectivePayload::Prosody {
                    rate: attributes::parse_rate(node.attribute("rate")),
                    pitch: attributes::parse_pitch(node.attribute("pitch")),
                    volume: attributes::parse_volume(node.attribute("volume")),
                    text: String::new(),
                };
                self.span(node, depth, payload)?;
            }
            TagKind::Emphasis => {
                let payload = DirectivePayload::Emphasis {
                    level: attributes::parse_emphasis_level(node.attribute("level")),
                    text: String::new(),
                };
                self.span(node, depth, payload)?;
            }
            TagKind::Paragraph => {
                self.text.boundary();
                self.span(node, depth, DirectivePayload::Paragraph { text: String::new() })?;
                self.text.boundary();
            }
            TagKind::Sentence => {
                self.text.boundary();
                self.walk_children(node, depth)?;
                self.text.boundary();
            }
            TagKind::Phoneme => {
                // Backends take plain text: speak the written form, keep `ph` on the directive only
                let payload = DirectivePayload::Phoneme {
                    alphabet: node.attribute("alphabet").map(str::to_string),
                    ph: node.attribute("ph").unwrap_or_default().to_string(),
                    text: String::new(),
                };
                self.span(node, depth, payload)?;
            }
            TagKind::SayAs => {
                let interpret_as = attributes::parse_interpret_as(node.attribute("interpret-as"));
                let resolved = resolve_say_as(interpret_as, &descendant_text(node));
                self.replaced(
                    &resolved,
                    DirectivePayload::SayAs {
                        interpret_as,
                        format: node.attribute("format").map(str::to_string),
                        text: resolved.clone(),
                    },
                );
            }
            TagKind::Sub => {
                let original = descendant_text(node);
                let alias = match node.attribute("alias") {
                    Some(alias) => TextNormalizer::normalize(alias),
                    None => {
                        debug!("<sub> without alias, keeping original text");
                        original.clone()
                    }
                };
                self.replaced(&alias, DirectivePayload::Sub { alias: alias.clone(), original });
            }
            TagKind::Break => {
                let (duration_ms, strength) =
                    attributes::parse_break(node.attribute("time"), node.attribute("strength"));
                self.point(DirectivePayload::Break { duration_ms, strength });
            }
            TagKind::Audio => {
                let src = node.attribute("src").unwrap_or_default().to_string();
                self.point(DirectivePayload::AudioInsert { src });
            }
            TagKind::Transparent => {
                self.walk_children(node, depth)?;
            }
        }

        Ok(())
    }

    /// Record a span directive, walk its children, then close the span
    fn span(&mut self, node: Node<'_, '_>, depth: usize, payload: DirectivePayload) -> Result<(), MarkupError> {
        let mark = self.text.mark();
        let slot = self.timeline.push(Directive {
            payload,
            anchor: Anchor::Span { start: self.text.offset(), end: self.text.offset() },
        });

        self.walk_children(node, depth)?;
        self.close_span(slot, mark);
        Ok(())
    }

    /// Record a span whose text replaces the element content
    fn replaced(&mut self, replacement: &str, payload: DirectivePayload) {
        let mark = self.text.mark();
        let slot = self.timeline.push(Directive {
            payload,
            anchor: Anchor::Span { start: self.text.offset(), end: self.text.offset() },
        });

        self.text.push(replacement);
        self.close_span(slot, mark);
    }

    fn close_span(&mut self, slot: usize, mark: Mark) {
        let (start, end, span_text) = self.text.since(mark);
        if let Some(directive) = self.timeline.slot_mut(slot) {
            directive.anchor = Anchor::Span { start, end };
            directive.set_span_text(span_text);
        }
    }

    /// Record a point directive at the current position
    fn point(&mut self, payload: DirectivePayload) {
        self.timeline.push(Directive {
            payload,
            anchor: Anchor::Point { offset: self.text.offset() },
        });
        self.text.boundary();
    }
}

/// Normalized text below `node`, read the way the main walk reads it.
///
/// Breaks, audio inserts, sentences and paragraphs still separate words;
/// audio fallback content is skipped.
fn descendant_text(node: Node<'_, '_>) -> String {
    let mut raw = String::new();
    let mut skipping: Option<Node<'_, '_>> = None;

    for edge in node.traverse() {
        match edge {
            Edge::Open(_) if skipping.is_some() => {}
            Edge::Open(child) if child.is_text() => raw.push_str(child.text().unwrap_or_default()),
            Edge::Open(child) if child.is_element() && child != node => match TagKind::of(&child) {
                TagKind::Break | TagKind::Paragraph | TagKind::Sentence => raw.push(' '),
                TagKind::Audio => {
                    raw.push(' ');
                    skipping = Some(child);
                }
                _ => {}
            },
            Edge::Close(child) => {
                if skipping == Some(child) {
                    skipping = None;
                } else if skipping.is_none()
                    && child.is_element()
                    && matches!(TagKind::of(&child), TagKind::Paragraph | TagKind::Sentence)
                {
                    raw.push(' ');
                }
            }
            Edge::Open(_) => {}
        }
    }
    TextNormalizer::normalize(&raw)
}

/// Apply the `say-as` reading to already-normalized text.
///
/// Only `characters` and `spell-out` change the text; other interpretations
/// pass it through as written.
fn resolve_say_as(interpret_as: InterpretAs, text: &str) -> String {
    if interpret_as.is_spelled() {
        text.chars()
            .filter(|c| !c.is_whitespace())
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        text.to_string()
    }
}
