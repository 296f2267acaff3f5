/*!
 * Post-synthesis audio stage.
 *
 * - `applier`: replays a directive timeline over a synthesized waveform
 * - `enhancer`: compression, smoothing and peak normalization
 * - `clips`: sources for `<audio>` inserts
 * - `wav`: WAV decode/encode for mono float PCM
 */

pub mod applier;
pub mod clips;
pub mod enhancer;
pub mod wav;

pub use applier::AudioDirectiveApplier;
pub use clips::{ClipSource, MemoryClipSource, NoClips, WavClipSource};
pub use enhancer::{compress, peak_normalize, smooth, smooth_and_normalize, Enhancer};

/// Mono float PCM at a fixed sample rate
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PcmBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl PcmBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }

    /// Length in milliseconds, rounded down
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }
}
