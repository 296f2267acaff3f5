use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};

use crate::audio::wav;
use crate::errors::SynthesisError;
use crate::synthesis::{SynthesisRequest, SynthesizedAudio, Synthesizer};

/// Synthesizer that returns a WAV file rendered ahead of time.
///
/// The request text is ignored; this lets the directive stage run against
/// output from an external engine.
#[derive(Debug, Clone)]
pub struct PrerenderedSynthesizer {
    path: PathBuf,
}

impl PrerenderedSynthesizer {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Synthesizer for PrerenderedSynthesizer {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesizedAudio, SynthesisError> {
        debug!(
            "Loading pre-rendered audio {:?} for {} chars (voice '{}')",
            self.path,
            request.text.chars().count(),
            request.voice
        );

        let bytes = tokio::fs::read(&self.path).await?;
        wav::decode_wav_bytes(&bytes).map_err(|e| SynthesisError::Failed(format!("{:#}", e)))
    }

    fn name(&self) -> &str {
        "prerendered"
    }
}
