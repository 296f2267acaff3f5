/*!
 * Tests for replaying directives over PCM audio
 */

use ssml_prosody::app_config::ApplierConfig;
use ssml_prosody::audio::applier::{effective_break_ms, silence_samples, time_stretch};
use ssml_prosody::audio::{AudioDirectiveApplier, MemoryClipSource};
use ssml_prosody::errors::AudioError;
use ssml_prosody::markup::parse;
use ssml_prosody::timeline::{BreakStrength, DirectiveTimeline};

use crate::common;

const SR: u32 = 16_000;

fn apply(markup: &str, pcm: &[f32]) -> Vec<f32> {
    let parsed = parse(markup);
    AudioDirectiveApplier::new().apply(pcm, SR, &parsed.timeline).unwrap()
}

/// Test that a strong break appends exactly 700 ms of silence
#[test]
fn test_apply_withStrongBreak_shouldAppendSilence() {
    let pcm = common::sine(1_000, SR);
    let out = apply(r#"<speak>x<break strength="strong"/></speak>"#, &pcm);

    let silence = (700 * SR / 1000) as usize;
    assert_eq!(out.len(), pcm.len() + silence);
    assert!(out[pcm.len()..].iter().all(|&x| x == 0.0));
}

/// Test break durations for explicit times and bare breaks
#[test]
fn test_apply_withTimedAndBareBreaks_shouldUseResolvedDurations() {
    let pcm = common::sine(100, SR);
    let out = apply(r#"<speak>a<break time="250ms"/>b<break/></speak>"#, &pcm);
    assert_eq!(out.len(), 100 + silence_samples(250, SR) + silence_samples(400, SR));

    let zero = apply(r#"<speak>a<break time="0ms"/></speak>"#, &pcm);
    assert_eq!(zero.len(), 100);
}

/// Test that rate 2.0 halves the buffer length
#[test]
fn test_apply_withDoubleRate_shouldHalveLength() {
    let pcm = common::sine(1_000, SR);
    let out = apply(r#"<speak><prosody rate="2.0">quick</prosody></speak>"#, &pcm);
    assert_eq!(out.len(), 500);

    let slow = apply(r#"<speak><prosody rate="x-slow">slow</prosody></speak>"#, &pcm);
    assert_eq!(slow.len(), 2_000);
}

/// Test that extreme rates are clamped to the configured range
#[test]
fn test_apply_withExtremeRate_shouldClamp() {
    let pcm = common::sine(1_000, SR);
    assert_eq!(apply(r#"<speak><prosody rate="10">x</prosody></speak>"#, &pcm).len(), 250);
    assert_eq!(apply(r#"<speak><prosody rate="5%">x</prosody></speak>"#, &pcm).len(), 4_000);

    let config = ApplierConfig { max_rate: 2.0, ..ApplierConfig::default() };
    let parsed = parse(r#"<speak><prosody rate="x-fast">x</prosody><prosody rate="3">y</prosody></speak>"#);
    let out = AudioDirectiveApplier::with_config(config).apply(&pcm, SR, &parsed.timeline).unwrap();
    assert_eq!(out.len(), 250);
}

/// Test that the output is peak normalized
#[test]
fn test_apply_shouldPeakNormalize() {
    let pcm = common::sine(800, SR);
    let out = apply(r#"<speak><emphasis level="reduced">x</emphasis></speak>"#, &pcm);

    assert_eq!(out.len(), pcm.len());
    assert!((common::peak(&out) - 1.0).abs() < 1e-6);

    // Whole-buffer gain followed by normalization keeps the waveform shape
    let scale = common::peak(&pcm);
    for (a, b) in pcm.iter().zip(&out) {
        assert!((a / scale - b).abs() < 1e-5);
    }
}

/// Test that silent volume zeroes the buffer and normalization is skipped
#[test]
fn test_apply_withSilentVolume_shouldProduceSilence() {
    let pcm = common::sine(200, SR);
    let out = apply(r#"<speak><prosody volume="silent">shh</prosody></speak>"#, &pcm);
    assert_eq!(out.len(), 200);
    assert!(out.iter().all(|&x| x == 0.0));
}

/// Test that the caller's buffer is never modified
#[test]
fn test_apply_shouldNotMutateInput() {
    let pcm = common::sine(500, SR);
    let copy = pcm.clone();
    let _ = apply(
        r#"<speak><prosody rate="fast" volume="+6dB">a</prosody><emphasis>b</emphasis><break/></speak>"#,
        &pcm,
    );
    assert_eq!(pcm, copy);
}

/// Test the fatal sample rate checks
#[test]
fn test_apply_withBadSampleRate_shouldFail() {
    let applier = AudioDirectiveApplier::new();
    let timeline = DirectiveTimeline::empty();

    assert_eq!(applier.apply(&[0.1], 0, &timeline).unwrap_err(), AudioError::InvalidSampleRate);
    assert!(matches!(
        applier.apply(&[0.1], 384_000, &timeline),
        Err(AudioError::UnsupportedSampleRate { rate: 384_000, .. })
    ));
}

/// Test that unavailable audio inserts are skipped
#[test]
fn test_apply_withMissingClip_shouldBeNoOp() {
    let pcm = common::sine(300, SR);
    let out = apply(r#"<speak>a<audio src="https://example.com/bell.wav"/>b</speak>"#, &pcm);
    assert_eq!(out.len(), 300);
}

/// Test that available audio inserts are appended at the working rate
#[test]
fn test_apply_withMemoryClip_shouldAppendResampledClip() {
    let pcm = common::sine(300, SR);
    let clips = MemoryClipSource::new().with_clip("bell", vec![0.25; 80], 8_000);
    let applier = AudioDirectiveApplier::new().with_clips(Box::new(clips));
    let parsed = parse(r#"<speak>a<audio src="bell"/></speak>"#);

    let out = applier.apply(&pcm, SR, &parsed.timeline).unwrap();

    assert_eq!(out.len(), 300 + 160);
}

/// Test that text-only directives leave the audio alone
#[test]
fn test_apply_withTextOnlyDirectives_shouldKeepLength() {
    let pcm = common::sine(400, SR);
    let out = apply(
        r#"<speak><voice name="v"><p><say-as interpret-as="characters">ab</say-as> <sub alias="c">d</sub> <phoneme ph="x">e</phoneme></p></voice></speak>"#,
        &pcm,
    );
    assert_eq!(out.len(), 400);
}

/// Test that an empty input with only breaks yields pure silence
#[test]
fn test_apply_withEmptyInput_shouldOnlyHoldBreaks() {
    let out = apply(r#"<speak><break strength="weak"/></speak>"#, &[]);
    assert_eq!(out.len(), silence_samples(200, SR));
    assert!(out.iter().all(|&x| x == 0.0));
}

#[test]
fn test_effectiveBreakMs_withStrengthOnly_shouldUseTable() {
    assert_eq!(effective_break_ms(0, BreakStrength::XWeak), 100);
    assert_eq!(effective_break_ms(0, BreakStrength::Medium), 400);
    assert_eq!(effective_break_ms(1200, BreakStrength::Unset), 1200);
}

#[test]
fn test_timeStretch_withNonPositiveRate_shouldCopy() {
    let input = vec![0.1, 0.2, 0.3];
    assert_eq!(time_stretch(&input, 0.0), input);
    assert_eq!(time_stretch(&input, -1.0), input);
    assert_eq!(time_stretch(&input, f64::NAN), input);
}

/// Test that an oversized break is clamped instead of exhausting memory
#[test]
fn test_apply_withHugeBreak_shouldClampToMaxBreak() {
    let parsed = parse(r#"<speak>a<break time="4000000s"/>b</speak>"#);
    let out = AudioDirectiveApplier::new().apply(&[0.5; 10], 192_000, &parsed.timeline).unwrap();
    assert_eq!(out.len(), 10 + silence_samples(10_000, 192_000));

    let config = ApplierConfig { max_break_ms: 50, ..ApplierConfig::default() };
    let parsed = parse(r#"<speak>a<break time="99999999999ms"/>b</speak>"#);
    let out = AudioDirectiveApplier::with_config(config).apply(&[0.5; 10], SR, &parsed.timeline).unwrap();
    assert_eq!(out.len(), 10 + silence_samples(50, SR));
}

/// Test that growth past the output limit is reported as an error
#[test]
fn test_apply_pastOutputLimit_shouldReturnOutputTooLong() {
    let config = ApplierConfig { max_output_seconds: 1, ..ApplierConfig::default() };
    let applier = AudioDirectiveApplier::with_config(config);
    let pcm = common::sine(4_000, SR);

    let breaks = parse(r#"<speak>a<break time="10s"/>b<break time="10s"/></speak>"#);
    let err = applier.apply(&pcm, SR, &breaks.timeline).unwrap_err();
    assert!(matches!(err, AudioError::OutputTooLong { limit: 16_000, .. }));

    let slow = parse(
        r#"<speak><prosody rate="25%">a</prosody><prosody rate="25%">b</prosody></speak>"#,
    );
    let err = applier.apply(&pcm, SR, &slow.timeline).unwrap_err();
    assert_eq!(err, AudioError::OutputTooLong { samples: 64_000, limit: 16_000 });
}

/// Test that clip inserts count toward the output limit
#[test]
fn test_apply_withClipPastOutputLimit_shouldFail() {
    let config = ApplierConfig { max_output_seconds: 1, ..ApplierConfig::default() };
    let clips = MemoryClipSource::new().with_clip("long.wav", vec![0.1; 20_000], SR);
    let applier = AudioDirectiveApplier::with_config(config).with_clips(Box::new(clips));

    let parsed = parse(r#"<speak>x<audio src="long.wav"/></speak>"#);
    let err = applier.apply(&[0.2; 100], SR, &parsed.timeline).unwrap_err();
    assert_eq!(err, AudioError::OutputTooLong { samples: 20_100, limit: 16_000 });
}
