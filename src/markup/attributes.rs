/*!
 * Attribute value grammars for the supported markup tags.
 *
 * Every parser here is total: a value that matches no known grammar falls
 * back to the documented default and is logged at debug level, so a bad
 * attribute never aborts a document.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::timeline::{BreakStrength, EmphasisLevel, InterpretAs, Pitch, Volume};

/// Signed decimal with an optional unit suffix
static MEASURE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?)(\d+(?:\.\d+)?|\.\d+)\s*(%|st|dB|db|DB|Hz|hz)?\s*$")
        .expect("Invalid measure regex")
});

/// `<break time>` grammar: decimal followed by `ms` or `s`
static TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?|\.\d+)\s*(ms|s)\s*$").expect("Invalid time regex")
});

/// Default prosody rate
pub const DEFAULT_RATE: f32 = 1.0;

/// Named rate keywords and their multipliers
const RATE_KEYWORDS: &[(&str, f32)] = &[
    ("x-slow", 0.5),
    ("slow", 0.75),
    ("medium", 1.0),
    ("default", 1.0),
    ("fast", 1.5),
    ("x-fast", 2.0),
];

/// Named pitch keywords, in semitones
const PITCH_KEYWORDS: &[(&str, f32)] = &[
    ("x-low", -6.0),
    ("low", -3.0),
    ("medium", 0.0),
    ("default", 0.0),
    ("high", 3.0),
    ("x-high", 6.0),
];

/// Named volume keywords, in decibels
const VOLUME_KEYWORDS: &[(&str, f32)] = &[
    ("x-soft", -12.0),
    ("soft", -6.0),
    ("medium", 0.0),
    ("default", 0.0),
    ("loud", 6.0),
    ("x-loud", 12.0),
];

struct Measure<'a> {
    signed: bool,
    value: f32,
    unit: Option<&'a str>,
}

fn parse_measure(raw: &str) -> Option<Measure<'_>> {
    let caps = MEASURE_REGEX.captures(raw)?;
    let sign = caps.get(1).map_or("", |m| m.as_str());
    let magnitude: f32 = caps.get(2)?.as_str().parse().ok()?;
    let value = if sign == "-" { -magnitude } else { magnitude };

    Some(Measure {
        signed: !sign.is_empty(),
        value,
        unit: caps.get(3).map(|m| m.as_str()),
    })
}

fn keyword(table: &[(&str, f32)], raw: &str) -> Option<f32> {
    let raw = raw.trim();
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(raw))
        .map(|(_, value)| *value)
}

/// Parse `<prosody rate>` into a multiplier (1.0 = normal).
///
/// Accepts the rate keywords, `N%` (150% = 1.5, signed +20% = 1.2) and bare
/// positive multipliers. Anything else is 1.0.
pub fn parse_rate(raw: Option<&str>) -> f32 {
    let Some(raw) = raw else {
        return DEFAULT_RATE;
    };

    if let Some(value) = keyword(RATE_KEYWORDS, raw) {
        return value;
    }

    let rate = match parse_measure(raw) {
        Some(Measure { signed: true, value, unit: Some("%") }) => 1.0 + value / 100.0,
        Some(Measure { signed: false, value, unit: Some("%") }) => value / 100.0,
        Some(Measure { value, unit: None, .. }) => value,
        _ => f32::NAN,
    };

    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        debug!("Unsupported prosody rate '{}', using {}", raw, DEFAULT_RATE);
        DEFAULT_RATE
    }
}

/// Parse `<prosody pitch>`: `Nst`, `N%` or a pitch keyword; otherwise no change
pub fn parse_pitch(raw: Option<&str>) -> Pitch {
    let Some(raw) = raw else {
        return Pitch::default();
    };

    if let Some(semitones) = keyword(PITCH_KEYWORDS, raw) {
        return Pitch::Semitones(semitones);
    }

    match parse_measure(raw) {
        Some(Measure { value, unit: Some("st"), .. }) => Pitch::Semitones(value),
        Some(Measure { value, unit: Some("%"), .. }) => Pitch::Relative(value / 100.0),
        _ => {
            debug!("Unsupported prosody pitch '{}', leaving pitch unchanged", raw);
            Pitch::default()
        }
    }
}

/// Parse `<prosody volume>`: `NdB`, `N%` or a volume keyword.
///
/// `None` means the volume is left unchanged.
pub fn parse_volume(raw: Option<&str>) -> Option<Volume> {
    let raw = raw?;

    if raw.trim().eq_ignore_ascii_case("silent") {
        return Some(Volume::Relative(0.0));
    }
    if let Some(db) = keyword(VOLUME_KEYWORDS, raw) {
        return Some(Volume::Decibels(db));
    }

    match parse_measure(raw) {
        Some(Measure { value, unit: Some(unit), .. }) if unit.eq_ignore_ascii_case("db") => {
            Some(Volume::Decibels(value))
        }
        Some(Measure { signed: true, value, unit: Some("%") }) => {
            Some(Volume::Relative((1.0 + value / 100.0).max(0.0)))
        }
        Some(Measure { signed: false, value, unit: Some("%") }) => Some(Volume::Relative(value / 100.0)),
        _ => {
            debug!("Unsupported prosody volume '{}', leaving volume unchanged", raw);
            None
        }
    }
}

/// Parse `<break time>` into milliseconds
pub fn parse_time_ms(raw: &str) -> Option<u32> {
    let caps = TIME_REGEX.captures(raw)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    let ms = match caps.get(2)?.as_str() {
        "ms" => value,
        _ => value * 1000.0,
    };
    let ms = ms.round();
    if ms > u32::MAX as f64 {
        debug!("Break time '{}' out of range, clamping to {} ms", raw.trim(), u32::MAX);
        return Some(u32::MAX);
    }
    Some(ms as u32)
}

/// Parse `<break strength>`
pub fn parse_break_strength(raw: &str) -> Option<BreakStrength> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "none" => Some(BreakStrength::None),
        "x-weak" => Some(BreakStrength::XWeak),
        "weak" => Some(BreakStrength::Weak),
        "medium" => Some(BreakStrength::Medium),
        "strong" => Some(BreakStrength::Strong),
        "x-strong" => Some(BreakStrength::XStrong),
        _ => None,
    }
}

/// Resolve the two `<break>` attributes into `(duration_ms, strength)`.
///
/// A valid `time` wins; an unknown or missing strength without a valid time
/// falls back to medium.
pub fn parse_break(time: Option<&str>, strength: Option<&str>) -> (u32, BreakStrength) {
    let duration = time.and_then(|raw| {
        let parsed = parse_time_ms(raw);
        if parsed.is_none() {
            debug!("Unsupported break time '{}'", raw);
        }
        parsed
    });
    let strength_value = strength.and_then(|raw| {
        let parsed = parse_break_strength(raw);
        if parsed.is_none() {
            debug!("Unsupported break strength '{}'", raw);
        }
        parsed
    });

    match (duration, strength_value) {
        (Some(ms), Some(strength)) => (ms, strength),
        (Some(ms), None) => (ms, BreakStrength::Unset),
        (None, Some(strength)) => (0, strength),
        (None, None) => (0, BreakStrength::Medium),
    }
}

/// Parse `<emphasis level>`; missing or unknown levels are moderate
pub fn parse_emphasis_level(raw: Option<&str>) -> EmphasisLevel {
    match raw.map(|r| r.trim().to_ascii_lowercase()).as_deref() {
        Some("strong") => EmphasisLevel::Strong,
        Some("moderate") | None => EmphasisLevel::Moderate,
        Some("reduced") => EmphasisLevel::Reduced,
        Some("none") => EmphasisLevel::None,
        Some(other) => {
            debug!("Unsupported emphasis level '{}', using moderate", other);
            EmphasisLevel::Moderate
        }
    }
}

/// Parse `<say-as interpret-as>`
pub fn parse_interpret_as(raw: Option<&str>) -> InterpretAs {
    match raw.map(|r| r.trim().to_ascii_lowercase()).as_deref() {
        Some("characters") => InterpretAs::Characters,
        Some("spell-out") => InterpretAs::SpellOut,
        Some("telephone") => InterpretAs::Telephone,
        Some("date") => InterpretAs::Date,
        Some("cardinal") | Some("number") => InterpretAs::Cardinal,
        Some("ordinal") => InterpretAs::Ordinal,
        Some("fraction") => InterpretAs::Fraction,
        Some("measure") | Some("unit") => InterpretAs::Measure,
        Some("time") => InterpretAs::Time,
        Some("address") => InterpretAs::Address,
        _ => InterpretAs::Other,
    }
}
