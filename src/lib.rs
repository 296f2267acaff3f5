/*!
 * # ssml-prosody - SSML markup directives for speech synthesis
 *
 * A Rust library that turns speech markup into clean text plus a typed
 * directive timeline, and replays that timeline over synthesized audio.
 *
 * ## Features
 *
 * - Parse a subset of SSML (`speak`, `voice`, `prosody`, `break`, `emphasis`,
 *   `say-as`, `sub`, `audio`, `p`, `s`, `phoneme`)
 * - Text normalization and cleaner chain for synthesizer input
 * - Silence insertion, gain, emphasis and rate changes on mono PCM
 * - Optional smoothing/compression polish pass
 * - Pluggable synthesizer backends
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `text_normalizer`: Text cleanup before synthesis
 * - `markup`: Markup parsing into text and a directive timeline
 * - `timeline`: Directive data model
 * - `audio`: Directive replay, enhancement, clip sources and WAV I/O
 * - `synthesis`: Synthesizer trait and backends
 * - `pipeline`: Controller running the whole chain
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod audio;
pub mod errors;
pub mod file_utils;
pub mod markup;
pub mod pipeline;
pub mod synthesis;
pub mod text_normalizer;
pub mod timeline;

// Re-export main types for easier usage
pub use app_config::Config;
pub use audio::{AudioDirectiveApplier, Enhancer, PcmBuffer};
pub use errors::{AppError, AudioError, MarkupError, PipelineError, SynthesisError};
pub use markup::{parse, MarkupParser, ParsedMarkup};
pub use pipeline::{RenderedSpeech, SpeechPipeline};
pub use synthesis::{SynthesisRequest, Synthesizer};
pub use text_normalizer::TextNormalizer;
pub use timeline::{Anchor, Directive, DirectiveKind, DirectivePayload, DirectiveTimeline};
