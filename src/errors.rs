/*!
 * Error types for the ssml-prosody library.
 *
 * This module contains custom error types for the different stages of the
 * pipeline, using the thiserror crate for ergonomic error definitions.
 * Markup errors are recoverable and never leave the parser's public `parse`
 * entry point; audio and synthesis errors are reported to the caller.
 */

use thiserror::Error;

/// Errors that can occur while reading a markup document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarkupError {
    /// The document is not well-formed XML
    #[error("Markup syntax error: {0}")]
    Syntax(String),

    /// The root element is not the expected container
    #[error("Invalid root element: expected <{expected}>, found <{found}>")]
    RootMismatch {
        /// Tag name the root must have
        expected: String,
        /// Tag name actually found
        found: String,
    },

    /// Element nesting exceeds the configured limit
    #[error("Markup nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Errors that can occur while transforming PCM audio
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    /// A sample rate of zero was supplied
    #[error("Sample rate must be greater than zero")]
    InvalidSampleRate,

    /// The sample rate is outside the supported range
    #[error("Unsupported sample rate {rate} Hz (supported: {min}..={max} Hz)")]
    UnsupportedSampleRate {
        /// Rate supplied by the caller
        rate: u32,
        /// Lowest accepted rate
        min: u32,
        /// Highest accepted rate
        max: u32,
    },

    /// Replaying the timeline would exceed the configured output length
    #[error("Output of {samples} samples exceeds the limit of {limit} samples")]
    OutputTooLong {
        /// Length the output would have reached
        samples: usize,
        /// Longest output allowed at the working sample rate
        limit: usize,
    },

    /// A signal-processing parameter is out of range
    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f32,
    },
}

/// Errors reported by a synthesizer backend
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// The backend failed to produce audio
    #[error("Synthesis failed: {0}")]
    Failed(String),

    /// There was no text to synthesize
    #[error("Nothing to synthesize: clean text is empty")]
    EmptyText,

    /// I/O failure while reading backend resources
    #[error("Synthesizer I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from a full pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Error from the synthesizer backend
    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    /// Error while applying directives or enhancing
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error reading or writing an input or output file
    #[error("File error: {0}")]
    File(String),

    /// Error from the pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(format!("{:#}", error))
    }
}
