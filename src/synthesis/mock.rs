/*!
 * Mock synthesizer for testing.
 *
 * - `MockSynthesizer::working()` - one sine tone per character of text
 * - `MockSynthesizer::failing()` - always fails with an error
 * - `MockSynthesizer::silent()` - returns an all-zero buffer
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::audio::PcmBuffer;
use crate::errors::SynthesisError;
use crate::synthesis::{SynthesisRequest, SynthesizedAudio, Synthesizer};

/// Behavior mode for the mock synthesizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a tone
    Working,
    /// Always fails with an error
    Failing,
    /// Succeeds with silence
    Silent,
}

/// Mock synthesizer recording every request it receives
#[derive(Debug, Clone)]
pub struct MockSynthesizer {
    behavior: MockBehavior,
    sample_rate: u32,
    samples_per_char: usize,
    request_count: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<SynthesisRequest>>>,
}

impl MockSynthesizer {
    /// Create a new mock synthesizer with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            sample_rate: 16_000,
            samples_per_char: 160,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn silent() -> Self {
        Self::new(MockBehavior::Silent)
    }

    /// Output sample rate
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Samples generated per character of input text
    pub fn with_samples_per_char(mut self, samples_per_char: usize) -> Self {
        self.samples_per_char = samples_per_char;
        self
    }

    /// Number of synthesize calls made so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of every request received, oldest first
    pub fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn tone(&self, chars: usize) -> Vec<f32> {
        let len = chars * self.samples_per_char;
        let step = 2.0 * std::f32::consts::PI * 220.0 / self.sample_rate.max(1) as f32;
        (0..len).map(|i| 0.5 * (i as f32 * step).sin()).collect()
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesizedAudio, SynthesisError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if request.text.is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        let chars = request.text.chars().count();
        match self.behavior {
            MockBehavior::Working => Ok(PcmBuffer::new(self.tone(chars), self.sample_rate)),
            MockBehavior::Silent => Ok(PcmBuffer::new(vec![0.0; chars * self.samples_per_char], self.sample_rate)),
            MockBehavior::Failing => Err(SynthesisError::Failed(format!(
                "Mock synthesizer failure for voice '{}'",
                request.voice
            ))),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
