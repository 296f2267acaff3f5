/*!
 * Tests for the enhancer signal helpers
 */

use ssml_prosody::app_config::EnhancerConfig;
use ssml_prosody::audio::{compress, peak_normalize, smooth, smooth_and_normalize, Enhancer};
use ssml_prosody::errors::AudioError;

use crate::common;

#[test]
fn test_compress_withConstantOne_shouldYieldPointEightFive() {
    let out = compress(&[1.0; 64], 0.8, 4.0).unwrap();
    assert_eq!(out.len(), 64);
    assert!(out.iter().all(|&x| (x - 0.85).abs() < 1e-6));
}

#[test]
fn test_compress_withUnitRatio_shouldBeIdentity() {
    let input = vec![0.9, -1.2, 0.3];
    let out = compress(&input, 0.5, 1.0).unwrap();
    for (a, b) in input.iter().zip(&out) {
        assert!((a - b).abs() < 1e-6);
    }
}

#[test]
fn test_compress_withInvalidThreshold_shouldReportParameter() {
    assert_eq!(
        compress(&[0.5], -0.1, 2.0).unwrap_err(),
        AudioError::InvalidParameter { name: "threshold", value: -0.1 }
    );
}

#[test]
fn test_peakNormalize_shouldMatchExample() {
    let mut buffer = vec![0.5, -2.0, 1.0];
    assert!(peak_normalize(&mut buffer));
    assert_eq!(buffer, vec![0.25, -1.0, 0.5]);
}

#[test]
fn test_peakNormalize_withNonFinitePeak_shouldLeaveBuffer() {
    let mut buffer = vec![0.5, f32::INFINITY];
    assert!(!peak_normalize(&mut buffer));
    assert_eq!(buffer[0], 0.5);
}

#[test]
fn test_smooth_shouldKeepLengthAndAverage() {
    let out = smooth(&[0.0, 3.0, 0.0]);
    assert_eq!(out, vec![1.0, 1.0, 1.0]);
}

#[test]
fn test_smoothAndNormalize_withZeroIterations_shouldReturnInput() {
    let input = common::sine(32, 16_000);
    assert_eq!(smooth_and_normalize(&input, 0), input);
}

#[test]
fn test_smoothAndNormalize_withSilence_shouldStaySilent() {
    let out = smooth_and_normalize(&[0.0; 16], 4);
    assert!(out.iter().all(|&x| x == 0.0));
}

#[test]
fn test_enhancer_new_withBadRatio_shouldFail() {
    let config = EnhancerConfig { ratio: 0.5, ..EnhancerConfig::default() };
    assert!(Enhancer::new(&config).is_err());
}

#[test]
fn test_enhancer_polish_shouldRunConfiguredPasses() {
    let config = EnhancerConfig { iterations: 2, ..EnhancerConfig::default() };
    let enhancer = Enhancer::new(&config).unwrap();
    let input = common::sine(256, 16_000);

    assert_eq!(enhancer.polish(&input), enhancer.smooth_and_normalize(&input, 2));
    assert!((common::peak(&enhancer.polish(&input)) - 1.0).abs() < 1e-5);
}
