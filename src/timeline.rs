/*!
 * Directive timeline data model.
 *
 * A `DirectiveTimeline` is the ordered list of every directive found in a
 * markup document, in document order. Span directives cover a range of the
 * clean text; point directives sit between two text runs and carry no text.
 * The timeline is assembled by the markup parser and is read-only afterwards.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a directive sits in the clean text, in `char` offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Anchor {
    /// Covers `start..end` of the clean text
    Span { start: usize, end: usize },
    /// Insertion point before the character at `offset`
    Point { offset: usize },
}

impl Anchor {
    /// Whether the anchor is an insertion point
    pub fn is_point(&self) -> bool {
        matches!(self, Anchor::Point { .. })
    }

    /// First character offset the anchor touches
    pub fn start(&self) -> usize {
        match *self {
            Anchor::Span { start, .. } => start,
            Anchor::Point { offset } => offset,
        }
    }

    /// One past the last character offset the anchor touches
    pub fn end(&self) -> usize {
        match *self {
            Anchor::Span { end, .. } => end,
            Anchor::Point { offset } => offset,
        }
    }
}

/// Break strength as written in `<break strength="...">`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BreakStrength {
    None,
    XWeak,
    Weak,
    Medium,
    Strong,
    XStrong,
    /// Only an explicit `time` was given
    Unset,
}

impl BreakStrength {
    /// Pause length used when no explicit time is given
    pub fn default_duration_ms(&self) -> u32 {
        match self {
            BreakStrength::None => 0,
            BreakStrength::XWeak => 100,
            BreakStrength::Weak => 200,
            BreakStrength::Medium | BreakStrength::Unset => 400,
            BreakStrength::Strong => 700,
            BreakStrength::XStrong => 1000,
        }
    }
}

/// Emphasis level as written in `<emphasis level="...">`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmphasisLevel {
    Strong,
    Moderate,
    Reduced,
    None,
}

impl EmphasisLevel {
    /// Linear gain applied for this level
    pub fn gain(&self) -> f32 {
        match self {
            EmphasisLevel::Strong => 1.5,
            EmphasisLevel::Moderate => 1.2,
            EmphasisLevel::Reduced => 0.8,
            EmphasisLevel::None => 1.0,
        }
    }
}

/// `<say-as interpret-as="...">` interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterpretAs {
    Characters,
    SpellOut,
    Telephone,
    Date,
    Cardinal,
    Ordinal,
    Fraction,
    Measure,
    Time,
    Address,
    Other,
}

impl InterpretAs {
    /// Whether the text is read out one character at a time
    pub fn is_spelled(&self) -> bool {
        matches!(self, InterpretAs::Characters | InterpretAs::SpellOut)
    }
}

/// Pitch change requested by `<prosody pitch>`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pitch {
    /// Shift in semitones
    Semitones(f32),
    /// Relative change, 0.1 = +10%
    Relative(f32),
}

impl Default for Pitch {
    fn default() -> Self {
        Pitch::Semitones(0.0)
    }
}

/// Volume change requested by `<prosody volume>`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Volume {
    /// Gain in decibels
    Decibels(f32),
    /// Literal amplitude factor
    Relative(f32),
}

impl Volume {
    /// Linear amplitude factor for this volume
    pub fn gain(&self) -> f32 {
        match *self {
            Volume::Decibels(db) => 10f32.powf(db / 20.0),
            Volume::Relative(factor) => factor,
        }
    }
}

/// Directive payload, one variant per supported tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DirectivePayload {
    Voice {
        name: String,
    },
    Prosody {
        rate: f32,
        pitch: Pitch,
        volume: Option<Volume>,
        text: String,
    },
    Break {
        duration_ms: u32,
        strength: BreakStrength,
    },
    Emphasis {
        level: EmphasisLevel,
        text: String,
    },
    SayAs {
        interpret_as: InterpretAs,
        format: Option<String>,
        text: String,
    },
    Sub {
        alias: String,
        original: String,
    },
    AudioInsert {
        src: String,
    },
    Paragraph {
        text: String,
    },
    Phoneme {
        alphabet: Option<String>,
        ph: String,
        text: String,
    },
}

/// Payload discriminant, used to filter a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Voice,
    Prosody,
    Break,
    Emphasis,
    SayAs,
    Sub,
    AudioInsert,
    Paragraph,
    Phoneme,
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DirectiveKind::Voice => "voice",
            DirectiveKind::Prosody => "prosody",
            DirectiveKind::Break => "break",
            DirectiveKind::Emphasis => "emphasis",
            DirectiveKind::SayAs => "say-as",
            DirectiveKind::Sub => "sub",
            DirectiveKind::AudioInsert => "audio",
            DirectiveKind::Paragraph => "p",
            DirectiveKind::Phoneme => "phoneme",
        };
        write!(f, "{}", name)
    }
}

/// A single timeline record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    #[serde(flatten)]
    pub payload: DirectivePayload,
    pub anchor: Anchor,
}

impl Directive {
    /// Payload discriminant
    pub fn kind(&self) -> DirectiveKind {
        match self.payload {
            DirectivePayload::Voice { .. } => DirectiveKind::Voice,
            DirectivePayload::Prosody { .. } => DirectiveKind::Prosody,
            DirectivePayload::Break { .. } => DirectiveKind::Break,
            DirectivePayload::Emphasis { .. } => DirectiveKind::Emphasis,
            DirectivePayload::SayAs { .. } => DirectiveKind::SayAs,
            DirectivePayload::Sub { .. } => DirectiveKind::Sub,
            DirectivePayload::AudioInsert { .. } => DirectiveKind::AudioInsert,
            DirectivePayload::Paragraph { .. } => DirectiveKind::Paragraph,
            DirectivePayload::Phoneme { .. } => DirectiveKind::Phoneme,
        }
    }

    /// Text the directive covers; empty for point directives and voices
    pub fn text(&self) -> &str {
        match &self.payload {
            DirectivePayload::Prosody { text, .. }
            | DirectivePayload::Emphasis { text, .. }
            | DirectivePayload::SayAs { text, .. }
            | DirectivePayload::Paragraph { text }
            | DirectivePayload::Phoneme { text, .. } => text,
            DirectivePayload::Sub { alias, .. } => alias,
            DirectivePayload::Voice { .. }
            | DirectivePayload::Break { .. }
            | DirectivePayload::AudioInsert { .. } => "",
        }
    }

    /// Span text slot, filled in by the parser once the element closes
    pub(crate) fn set_span_text(&mut self, span_text: &str) {
        match &mut self.payload {
            DirectivePayload::Prosody { text, .. }
            | DirectivePayload::Emphasis { text, .. }
            | DirectivePayload::Paragraph { text }
            | DirectivePayload::Phoneme { text, .. } => *text = span_text.to_string(),
            _ => {}
        }
    }
}

/// Ordered, immutable list of directives in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectiveTimeline {
    directives: Vec<Directive>,
}

impl DirectiveTimeline {
    /// An empty timeline
    pub fn empty() -> Self {
        Self::default()
    }

    /// Iterate in document order
    pub fn iter(&self) -> std::slice::Iter<'_, Directive> {
        self.directives.iter()
    }

    /// All directives of one kind, in document order
    pub fn directives_of_kind(&self, kind: DirectiveKind) -> Vec<&Directive> {
        self.directives.iter().filter(|d| d.kind() == kind).collect()
    }

    /// Directive at a timeline slot
    pub fn get(&self, index: usize) -> Option<&Directive> {
        self.directives.get(index)
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Name of the first `<voice>` in the document, if any
    pub fn first_voice(&self) -> Option<&str> {
        self.directives.iter().find_map(|d| match &d.payload {
            DirectivePayload::Voice { name } if !name.is_empty() => Some(name.as_str()),
            _ => None,
        })
    }

    pub(crate) fn push(&mut self, directive: Directive) -> usize {
        self.directives.push(directive);
        self.directives.len() - 1
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut Directive> {
        self.directives.get_mut(index)
    }
}

impl<'a> IntoIterator for &'a DirectiveTimeline {
    type Item = &'a Directive;
    type IntoIter = std::slice::Iter<'a, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.directives.iter()
    }
}
