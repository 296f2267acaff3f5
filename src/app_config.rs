use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the pipeline configuration including defaults
/// and validation of the loaded settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Markup parser settings
    #[serde(default)]
    pub parser: ParserConfig,

    /// Text normalization settings applied before synthesis
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Directive replay settings
    #[serde(default)]
    pub applier: ApplierConfig,

    /// Final polish settings
    #[serde(default)]
    pub enhancer: EnhancerConfig,

    /// Synthesizer request defaults
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Markup parser configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ParserConfig {
    /// Require the root element to be `<speak>`
    #[serde(default = "default_true")]
    pub strict_root: bool,

    /// Maximum element nesting depth before the document is rejected
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict_root: true,
            max_depth: default_max_depth(),
        }
    }
}

/// Extra folding applied to clean text before it reaches the synthesizer
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NormalizerConfig {
    /// Transliterate non-ASCII characters to their closest ASCII form
    #[serde(default)]
    pub ascii_only: bool,

    /// Lowercase the text
    #[serde(default)]
    pub lowercase: bool,
}

/// Audio directive applier configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApplierConfig {
    /// Lowest accepted prosody rate; smaller values are clamped
    #[serde(default = "default_min_rate")]
    pub min_rate: f32,

    /// Highest accepted prosody rate; larger values are clamped
    #[serde(default = "default_max_rate")]
    pub max_rate: f32,

    /// Lowest sample rate the applier accepts
    #[serde(default = "default_min_sample_rate")]
    pub min_sample_rate: u32,

    /// Highest sample rate the applier accepts
    #[serde(default = "default_max_sample_rate")]
    pub max_sample_rate: u32,

    /// Longest pause a single break may insert; longer breaks are clamped
    #[serde(default = "default_max_break_ms")]
    pub max_break_ms: u32,

    /// Upper bound on the rendered output length, in seconds of audio
    #[serde(default = "default_max_output_seconds")]
    pub max_output_seconds: u32,

    /// Directory `<audio src>` paths are resolved against
    #[serde(default)]
    pub clip_dir: Option<String>,
}

impl Default for ApplierConfig {
    fn default() -> Self {
        Self {
            min_rate: default_min_rate(),
            max_rate: default_max_rate(),
            min_sample_rate: default_min_sample_rate(),
            max_sample_rate: default_max_sample_rate(),
            max_break_ms: default_max_break_ms(),
            max_output_seconds: default_max_output_seconds(),
            clip_dir: None,
        }
    }
}

/// Enhancer (smoothing + compression) configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnhancerConfig {
    /// Run the enhancer after directive replay
    #[serde(default)]
    pub enabled: bool,

    /// Compressor threshold, in (0, 1]
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Compressor ratio, at least 1.0
    #[serde(default = "default_ratio")]
    pub ratio: f32,

    /// Number of smooth/compress/normalize passes
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: default_threshold(),
            ratio: default_ratio(),
            iterations: default_iterations(),
        }
    }
}

/// Defaults for synthesizer requests
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SynthesisConfig {
    /// Voice used when the document names none
    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// Language used when the document declares none
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Sample rate of the silent buffer used when there is no text to speak
    #[serde(default = "default_sample_rate")]
    pub default_sample_rate: u32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            default_voice: default_voice(),
            default_language: default_language(),
            default_sample_rate: default_sample_rate(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_depth() -> usize {
    64
}

fn default_min_rate() -> f32 {
    0.25
}

fn default_max_rate() -> f32 {
    4.0
}

fn default_min_sample_rate() -> u32 {
    8_000
}

fn default_max_sample_rate() -> u32 {
    192_000
}

fn default_max_break_ms() -> u32 {
    10_000
}

fn default_max_output_seconds() -> u32 {
    600
}

fn default_threshold() -> f32 {
    0.8
}

fn default_ratio() -> f32 {
    4.0
}

fn default_iterations() -> u32 {
    1
}

fn default_voice() -> String {
    "default".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_sample_rate() -> u32 {
    22_050
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.parser.max_depth == 0 {
            return Err(anyhow!("parser.max_depth must be at least 1"));
        }

        let applier = &self.applier;
        if !(applier.min_rate.is_finite() && applier.min_rate > 0.0) {
            return Err(anyhow!("applier.min_rate must be a positive number, got {}", applier.min_rate));
        }
        if !applier.max_rate.is_finite() || applier.max_rate < applier.min_rate {
            return Err(anyhow!(
                "applier.max_rate ({}) must be >= applier.min_rate ({})",
                applier.max_rate, applier.min_rate
            ));
        }
        if applier.min_sample_rate == 0 || applier.max_sample_rate < applier.min_sample_rate {
            return Err(anyhow!(
                "Invalid sample rate range: {}..={}",
                applier.min_sample_rate, applier.max_sample_rate
            ));
        }
        if applier.max_output_seconds == 0 {
            return Err(anyhow!("applier.max_output_seconds must be at least 1"));
        }

        let enhancer = &self.enhancer;
        if !(enhancer.threshold > 0.0 && enhancer.threshold <= 1.0) {
            return Err(anyhow!("enhancer.threshold must be in (0, 1], got {}", enhancer.threshold));
        }
        if !(enhancer.ratio >= 1.0) {
            return Err(anyhow!("enhancer.ratio must be >= 1.0, got {}", enhancer.ratio));
        }

        if self.synthesis.default_voice.trim().is_empty() {
            return Err(anyhow!("synthesis.default_voice must not be empty"));
        }
        let fallback_rate = self.synthesis.default_sample_rate;
        if fallback_rate < applier.min_sample_rate || fallback_rate > applier.max_sample_rate {
            return Err(anyhow!(
                "synthesis.default_sample_rate {} is outside {}..={}",
                fallback_rate, applier.min_sample_rate, applier.max_sample_rate
            ));
        }

        Ok(())
    }
}
