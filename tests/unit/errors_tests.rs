/*!
 * Tests for error types and conversions
 */

use ssml_prosody::errors::{AppError, AudioError, MarkupError, PipelineError, SynthesisError};

#[test]
fn test_markupError_rootMismatch_shouldDisplayBothTags() {
    let error = MarkupError::RootMismatch {
        expected: "speak".to_string(),
        found: "html".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("<speak>"));
    assert!(display.contains("<html>"));
}

#[test]
fn test_markupError_syntax_shouldDisplayCorrectly() {
    let error = MarkupError::Syntax("unexpected end of stream".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Markup syntax error"));
    assert!(display.contains("unexpected end of stream"));
}

#[test]
fn test_audioError_unsupportedSampleRate_shouldDisplayRange() {
    let error = AudioError::UnsupportedSampleRate { rate: 4_000, min: 8_000, max: 192_000 };
    let display = format!("{}", error);
    assert!(display.contains("4000"));
    assert!(display.contains("8000..=192000"));
}

#[test]
fn test_audioError_invalidParameter_shouldNameParameter() {
    let error = AudioError::InvalidParameter { name: "ratio", value: 0.5 };
    assert_eq!(format!("{}", error), "Invalid parameter ratio: 0.5");
}

#[test]
fn test_pipelineError_fromAudioError_shouldWrapCorrectly() {
    let pipeline_error: PipelineError = AudioError::InvalidSampleRate.into();
    match &pipeline_error {
        PipelineError::Audio(AudioError::InvalidSampleRate) => {}
        other => panic!("Expected Audio variant, got {:?}", other),
    }
    assert!(format!("{}", pipeline_error).contains("Sample rate must be greater than zero"));
}

#[test]
fn test_pipelineError_fromSynthesisError_shouldWrapCorrectly() {
    let pipeline_error: PipelineError = SynthesisError::EmptyText.into();
    assert!(matches!(pipeline_error, PipelineError::Synthesis(SynthesisError::EmptyText)));
}

#[test]
fn test_synthesisError_fromIoError_shouldWrapCorrectly() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "voice.wav missing");
    let error: SynthesisError = io_error.into();
    assert!(format!("{}", error).contains("voice.wav missing"));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let error: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(error, AppError::Unknown(ref msg) if msg == "boom"));
}

#[test]
fn test_appError_fromAnyhowWithContext_shouldKeepChain() {
    let error: AppError = anyhow::anyhow!("disk full").context("Failed to write output").into();
    assert!(matches!(error, AppError::Unknown(ref msg) if msg == "Failed to write output: disk full"));
}

#[test]
fn test_appError_fromPipelineError_shouldWrapCorrectly() {
    let pipeline_error = PipelineError::Audio(AudioError::OutputTooLong { samples: 20, limit: 10 });
    let error: AppError = pipeline_error.into();
    assert!(matches!(error, AppError::Pipeline(PipelineError::Audio(_))));
    assert!(format!("{}", error).contains("exceeds the limit of 10 samples"));
}
