/*!
 * Sources for `<audio src="...">` inserts.
 *
 * A clip source turns an insert's `src` into PCM at the working sample rate.
 * A source that cannot deliver the clip returns `None`; the applier then
 * treats the insert as a no-op.
 */

use log::warn;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{Component, Path, PathBuf};

use crate::audio::applier::time_stretch;
use crate::audio::wav;

/// Resolves audio insert sources
pub trait ClipSource: Send + Sync + Debug {
    /// Load the clip named by `src`, resampled to `sample_rate`
    fn load(&self, src: &str, sample_rate: u32) -> Option<Vec<f32>>;
}

/// Resample `samples` from `from_rate` to `to_rate` with linear interpolation
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }
    time_stretch(samples, from_rate as f64 / to_rate as f64)
}

/// Source that never has any clips
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClips;

impl ClipSource for NoClips {
    fn load(&self, src: &str, _sample_rate: u32) -> Option<Vec<f32>> {
        warn!("Audio insert '{}' skipped: no clip source configured", src);
        None
    }
}

/// In-memory clips keyed by `src`
#[derive(Debug, Default, Clone)]
pub struct MemoryClipSource {
    clips: HashMap<String, (Vec<f32>, u32)>,
}

impl MemoryClipSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clip recorded at `sample_rate`
    pub fn with_clip(mut self, src: &str, samples: Vec<f32>, sample_rate: u32) -> Self {
        self.clips.insert(src.to_string(), (samples, sample_rate));
        self
    }
}

impl ClipSource for MemoryClipSource {
    fn load(&self, src: &str, sample_rate: u32) -> Option<Vec<f32>> {
        match self.clips.get(src) {
            Some((samples, rate)) => Some(resample(samples, *rate, sample_rate)),
            None => {
                warn!("Audio insert '{}' not found", src);
                None
            }
        }
    }
}

/// WAV files below a base directory
#[derive(Debug, Clone)]
pub struct WavClipSource {
    base_dir: PathBuf,
}

impl WavClipSource {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Map `src` to a path inside the base directory.
    ///
    /// Remote URLs, absolute paths and paths climbing out of the base
    /// directory are refused.
    fn resolve(&self, src: &str) -> Option<PathBuf> {
        let local = src.strip_prefix("file://").unwrap_or(src);
        if local.contains("://") {
            return None;
        }

        let relative = Path::new(local);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if local.is_empty() || escapes {
            return None;
        }

        Some(self.base_dir.join(relative))
    }
}

impl ClipSource for WavClipSource {
    fn load(&self, src: &str, sample_rate: u32) -> Option<Vec<f32>> {
        let Some(path) = self.resolve(src) else {
            warn!("Audio insert '{}' is not a local clip path", src);
            return None;
        };

        match wav::read_wav(&path) {
            Ok(clip) => Some(resample(&clip.samples, clip.sample_rate, sample_rate)),
            Err(e) => {
                warn!("Audio insert '{}' unavailable: {:#}", src, e);
                None
            }
        }
    }
}
