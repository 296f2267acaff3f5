/*!
 * Directive replay over a synthesized waveform.
 *
 * The applier walks the timeline in document order and applies each
 * directive's audio effect to a working copy of the input:
 *
 * - prosody volume and emphasis scale the whole buffer
 * - prosody rate time-stretches the whole buffer
 * - breaks append silence, audio inserts append a clip
 *
 * The result is peak-normalized once every directive has been replayed.
 * Breaks are clamped to `max_break_ms`, and any step that would grow the
 * buffer past `max_output_seconds` of audio fails with `OutputTooLong`.
 */

use log::{debug, warn};

use crate::app_config::ApplierConfig;
use crate::audio::clips::{ClipSource, NoClips};
use crate::audio::enhancer::peak_normalize;
use crate::errors::AudioError;
use crate::timeline::{BreakStrength, DirectivePayload, DirectiveTimeline, Pitch, Volume};

/// Linear-interpolation time stretch.
///
/// `rate > 1` shortens the buffer, `rate < 1` lengthens it; the output holds
/// `round(N / rate)` samples. Non-finite or non-positive rates return a copy.
pub fn time_stretch(samples: &[f32], rate: f64) -> Vec<f32> {
    if samples.is_empty() || !rate.is_finite() || rate <= 0.0 || rate == 1.0 {
        return samples.to_vec();
    }

    let out_len = (samples.len() as f64 / rate).round() as usize;
    let last = samples.len() - 1;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let pos = i as f64 * rate;
        let idx = pos.floor() as usize;
        if idx >= last {
            out.push(samples[last]);
            continue;
        }
        let frac = (pos - idx as f64) as f32;
        out.push(samples[idx] * (1.0 - frac) + samples[idx + 1] * frac);
    }
    out
}

/// Pause length a break directive stands for
pub fn effective_break_ms(duration_ms: u32, strength: BreakStrength) -> u32 {
    if strength == BreakStrength::Unset || duration_ms > 0 {
        duration_ms
    } else {
        strength.default_duration_ms()
    }
}

/// Number of zero samples for a pause of `duration_ms`
pub fn silence_samples(duration_ms: u32, sample_rate: u32) -> usize {
    (duration_ms as u64 * sample_rate as u64 / 1000) as usize
}

/// Applies a directive timeline to raw PCM
#[derive(Debug)]
pub struct AudioDirectiveApplier {
    config: ApplierConfig,
    clips: Box<dyn ClipSource>,
}

impl Default for AudioDirectiveApplier {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioDirectiveApplier {
    /// Applier with default limits and no clip source
    pub fn new() -> Self {
        Self::with_config(ApplierConfig::default())
    }

    pub fn with_config(config: ApplierConfig) -> Self {
        Self {
            config,
            clips: Box::new(NoClips),
        }
    }

    /// Replace the source used for `<audio>` inserts
    pub fn with_clips(mut self, clips: Box<dyn ClipSource>) -> Self {
        self.clips = clips;
        self
    }

    pub fn config(&self) -> &ApplierConfig {
        &self.config
    }

    /// Replay `timeline` over `pcm` and return the transformed buffer.
    ///
    /// The caller's buffer is never modified.
    pub fn apply(
        &self,
        pcm: &[f32],
        sample_rate: u32,
        timeline: &DirectiveTimeline,
    ) -> Result<Vec<f32>, AudioError> {
        self.check_sample_rate(sample_rate)?;
        let limit = (self.config.max_output_seconds as u64 * sample_rate as u64) as usize;

        let mut out = pcm.to_vec();
        for directive in timeline {
            match &directive.payload {
                DirectivePayload::Prosody { rate, pitch, volume, .. } => {
                    if let Some(volume) = volume {
                        scale(&mut out, volume_gain(volume));
                    }
                    let rate = self.clamp_rate(*rate);
                    if rate != 1.0 {
                        let stretched = (out.len() as f64 / rate as f64).round() as usize;
                        check_length(stretched, limit)?;
                        out = time_stretch(&out, rate as f64);
                    }
                    if *pitch != Pitch::default() {
                        debug!("Pitch change {:?} accepted but not applied", pitch);
                    }
                }
                DirectivePayload::Break { duration_ms, strength } => {
                    let ms = self.clamp_break(effective_break_ms(*duration_ms, *strength));
                    let count = silence_samples(ms, sample_rate);
                    check_length(out.len().saturating_add(count), limit)?;
                    out.resize(out.len() + count, 0.0);
                }
                DirectivePayload::Emphasis { level, .. } => {
                    scale(&mut out, level.gain());
                }
                DirectivePayload::AudioInsert { src } => {
                    if let Some(clip) = self.clips.load(src, sample_rate) {
                        check_length(out.len().saturating_add(clip.len()), limit)?;
                        out.extend_from_slice(&clip);
                    }
                }
                DirectivePayload::Voice { .. }
                | DirectivePayload::SayAs { .. }
                | DirectivePayload::Sub { .. }
                | DirectivePayload::Paragraph { .. }
                | DirectivePayload::Phoneme { .. } => {}
            }
        }

        peak_normalize(&mut out);
        Ok(out)
    }

    fn check_sample_rate(&self, sample_rate: u32) -> Result<(), AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate);
        }
        let (min, max) = (self.config.min_sample_rate, self.config.max_sample_rate);
        if sample_rate < min || sample_rate > max {
            return Err(AudioError::UnsupportedSampleRate { rate: sample_rate, min, max });
        }
        Ok(())
    }

    fn clamp_break(&self, ms: u32) -> u32 {
        if ms > self.config.max_break_ms {
            debug!("Break of {} ms clamped to {} ms", ms, self.config.max_break_ms);
            return self.config.max_break_ms;
        }
        ms
    }

    fn clamp_rate(&self, rate: f32) -> f32 {
        if !rate.is_finite() {
            warn!("Non-finite prosody rate {}, using 1.0", rate);
            return 1.0;
        }
        rate.clamp(self.config.min_rate, self.config.max_rate)
    }
}

fn check_length(samples: usize, limit: usize) -> Result<(), AudioError> {
    if samples > limit {
        return Err(AudioError::OutputTooLong { samples, limit });
    }
    Ok(())
}

fn volume_gain(volume: &Volume) -> f32 {
    let gain = volume.gain();
    if gain.is_finite() && gain >= 0.0 { gain } else { 1.0 }
}

fn scale(buffer: &mut [f32], gain: f32) {
    if gain == 1.0 {
        return;
    }
    for sample in buffer.iter_mut() {
        *sample *= gain;
    }
}
