/*!
 * Synthesizer backends.
 *
 * The acoustic model sits outside this crate; a backend only has to turn
 * clean text into mono PCM:
 * - `mock`: deterministic tone generator with scripted failure modes
 * - `prerendered`: replays a WAV recorded ahead of time
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::audio::PcmBuffer;
use crate::errors::SynthesisError;

/// Audio produced by a synthesizer
pub type SynthesizedAudio = PcmBuffer;

/// Input handed to a synthesizer
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    /// Clean text to speak
    pub text: String,
    /// Voice identifier
    pub voice: String,
    /// Language tag
    pub language: String,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, voice: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
            language: language.into(),
        }
    }
}

/// Common trait for all synthesizer backends
///
/// Backends receive the whole clean text at once; per-span prosody is
/// applied afterwards by the directive applier.
#[async_trait]
pub trait Synthesizer: Send + Sync + Debug {
    /// Render `request.text` to PCM
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesizedAudio, SynthesisError>;

    /// Short backend name for logging
    fn name(&self) -> &str;
}

pub mod mock;
pub mod prerendered;

pub use mock::{MockBehavior, MockSynthesizer};
pub use prerendered::PrerenderedSynthesizer;
