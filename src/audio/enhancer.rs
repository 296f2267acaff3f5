//! Enhancer
//!
//! Stateless dynamics and smoothing helpers shared by the directive applier
//! and the optional final polish pass.
//!
//! * `compress` – soft-knee-free downward compressor above a threshold
//! * `smooth` – 3-tap moving average over edge-replicated input
//! * `peak_normalize` – scale so the loudest sample sits at ±1.0

use log::debug;

use crate::app_config::EnhancerConfig;
use crate::errors::AudioError;

/// Compress every sample whose magnitude exceeds `threshold`.
///
/// `|x| > t` becomes `sign(x) * (t + (|x| - t) / ratio)`; quieter samples
/// pass through untouched.
pub fn compress(buffer: &[f32], threshold: f32, ratio: f32) -> Result<Vec<f32>, AudioError> {
    validate_dynamics(threshold, ratio)?;
    Ok(compress_unchecked(buffer, threshold, ratio))
}

fn compress_unchecked(buffer: &[f32], threshold: f32, ratio: f32) -> Vec<f32> {
    buffer
        .iter()
        .map(|&x| {
            let magnitude = x.abs();
            if magnitude > threshold {
                (threshold + (magnitude - threshold) / ratio).copysign(x)
            } else {
                x
            }
        })
        .collect()
}

fn validate_dynamics(threshold: f32, ratio: f32) -> Result<(), AudioError> {
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(AudioError::InvalidParameter { name: "threshold", value: threshold });
    }
    if !(ratio >= 1.0 && ratio.is_finite()) {
        return Err(AudioError::InvalidParameter { name: "ratio", value: ratio });
    }
    Ok(())
}

/// 3-tap moving average; the first and last samples are replicated at the edges
pub fn smooth(buffer: &[f32]) -> Vec<f32> {
    let n = buffer.len();
    if n == 0 {
        return Vec::new();
    }

    (0..n)
        .map(|i| {
            let prev = buffer[i.saturating_sub(1)];
            let next = buffer[(i + 1).min(n - 1)];
            (prev + buffer[i] + next) / 3.0
        })
        .collect()
}

/// Divide by the peak magnitude so the loudest sample sits at ±1.0.
///
/// Empty, silent or non-finite buffers are left unchanged; returns whether
/// scaling happened.
pub fn peak_normalize(buffer: &mut [f32]) -> bool {
    let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    if peak == 0.0 || !peak.is_finite() {
        debug!("Skipping peak normalization on degenerate buffer ({} samples)", buffer.len());
        return false;
    }

    for sample in buffer.iter_mut() {
        *sample /= peak;
    }
    true
}

/// Repeated smooth → compress → normalize polish
#[derive(Debug, Clone)]
pub struct Enhancer {
    threshold: f32,
    ratio: f32,
    iterations: u32,
}

impl Default for Enhancer {
    fn default() -> Self {
        let config = EnhancerConfig::default();
        Self {
            threshold: config.threshold,
            ratio: config.ratio,
            iterations: config.iterations,
        }
    }
}

impl Enhancer {
    /// Create an enhancer, validating the compressor settings
    pub fn new(config: &EnhancerConfig) -> Result<Self, AudioError> {
        validate_dynamics(config.threshold, config.ratio)?;
        Ok(Self {
            threshold: config.threshold,
            ratio: config.ratio,
            iterations: config.iterations,
        })
    }

    /// Run exactly `iterations` passes of smooth, compress and peak-normalize
    pub fn smooth_and_normalize(&self, buffer: &[f32], iterations: u32) -> Vec<f32> {
        let mut current = buffer.to_vec();
        for _ in 0..iterations {
            current = compress_unchecked(&smooth(&current), self.threshold, self.ratio);
            peak_normalize(&mut current);
        }
        current
    }

    /// Polish with the configured number of passes
    pub fn polish(&self, buffer: &[f32]) -> Vec<f32> {
        self.smooth_and_normalize(buffer, self.iterations)
    }
}

/// `Enhancer::smooth_and_normalize` with the default compressor settings
pub fn smooth_and_normalize(buffer: &[f32], iterations: u32) -> Vec<f32> {
    Enhancer::default().smooth_and_normalize(buffer, iterations)
}
