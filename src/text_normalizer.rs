/*!
 * Text cleanup for synthesis input.
 *
 * `TextNormalizer::normalize` is the canonical cleanup applied to every text
 * run the markup parser emits: characters outside the allow-list are
 * dropped, whitespace runs collapse to one space and the ends are trimmed.
 * The free functions below form the cleaner chain used to fold text further
 * (ASCII transliteration, case folding) before it reaches a synthesizer.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::NormalizerConfig;

/// Anything that is not a word character, whitespace or allowed punctuation
static DISALLOWED_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[^\w\s.,?!;:'"\-]"#).expect("Invalid disallowed-symbol regex")
});

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Invalid whitespace regex")
});

static AUX_SYMBOL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[<>()\[\]"]+"#).expect("Invalid auxiliary-symbol regex")
});

/// Cleans raw text before synthesis
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    config: NormalizerConfig,
}

impl TextNormalizer {
    /// Create a normalizer with extra folding options
    pub fn with_config(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Strip disallowed symbols, collapse whitespace and trim.
    ///
    /// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
    pub fn normalize(text: &str) -> String {
        collapse_whitespace(&strip_symbols(text))
    }

    /// Normalize and then apply the configured folding.
    ///
    /// The result is itself normalized, so feeding it back in is a no-op.
    pub fn prepare(&self, text: &str) -> String {
        let mut result = Self::normalize(text);

        if self.config.ascii_only {
            result = convert_to_ascii(&result);
        }
        if self.config.lowercase {
            result = lowercase(&result);
        }

        // Transliteration can introduce symbols outside the allow-list
        if self.config.ascii_only {
            result = Self::normalize(&result);
        }

        result
    }
}

/// Remove every character outside the allow-list, leaving whitespace as is
pub fn strip_symbols(text: &str) -> String {
    DISALLOWED_REGEX.replace_all(text, "").into_owned()
}

/// Collapse whitespace runs into single spaces and trim both ends
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

/// Transliterate to the closest ASCII equivalent
pub fn convert_to_ascii(text: &str) -> String {
    deunicode::deunicode(text)
}

/// Lowercase the text
pub fn lowercase(text: &str) -> String {
    text.to_lowercase()
}

/// Drop brackets, angle brackets and double quotes
pub fn remove_aux_symbols(text: &str) -> String {
    AUX_SYMBOL_REGEX.replace_all(text, "").into_owned()
}

/// Cleaner chain for English input: ASCII, lowercase, drop auxiliary symbols, collapse
pub fn english_cleaners(text: &str) -> String {
    let text = convert_to_ascii(text);
    let text = lowercase(&text);
    let text = remove_aux_symbols(&text);
    collapse_whitespace(&text)
}
