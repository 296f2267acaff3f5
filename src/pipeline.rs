use anyhow::{Context, Result};
use log::{debug, info};
use std::sync::Arc;

use crate::app_config::Config;
use crate::audio::{AudioDirectiveApplier, Enhancer, PcmBuffer, WavClipSource};
use crate::errors::PipelineError;
use crate::markup::{MarkupParser, ParsedMarkup};
use crate::synthesis::{SynthesisRequest, Synthesizer};
use crate::text_normalizer::TextNormalizer;

// @module: Markup-to-audio pipeline controller

/// Output of one pipeline run
#[derive(Debug, Clone)]
pub struct RenderedSpeech {
    /// Parse result the audio was rendered from
    pub parsed: ParsedMarkup,
    /// Text actually sent to the synthesizer
    pub spoken_text: String,
    /// Final audio
    pub audio: PcmBuffer,
}

/// Runs markup through parse, synthesis, directive replay and enhancement
#[derive(Debug)]
pub struct SpeechPipeline {
    // @field: App configuration
    config: Config,
    parser: MarkupParser,
    normalizer: TextNormalizer,
    applier: AudioDirectiveApplier,
    enhancer: Option<Enhancer>,
    synthesizer: Arc<dyn Synthesizer>,
}

impl SpeechPipeline {
    /// Create a pipeline from a validated configuration
    pub fn new(config: Config, synthesizer: Arc<dyn Synthesizer>) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let mut applier = AudioDirectiveApplier::with_config(config.applier.clone());
        if let Some(dir) = &config.applier.clip_dir {
            debug!("Audio inserts resolve below {:?}", dir);
            applier = applier.with_clips(Box::new(WavClipSource::new(dir)));
        }

        let enhancer = if config.enhancer.enabled {
            Some(Enhancer::new(&config.enhancer).context("Invalid enhancer settings")?)
        } else {
            None
        };

        Ok(Self {
            parser: MarkupParser::with_config(config.parser.clone()),
            normalizer: TextNormalizer::with_config(config.normalizer.clone()),
            applier,
            enhancer,
            synthesizer,
            config,
        })
    }

    /// Replace the directive applier, e.g. to install a clip source
    pub fn with_applier(mut self, applier: AudioDirectiveApplier) -> Self {
        self.applier = applier;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse a markup document with the configured parser
    pub fn parse(&self, markup: &str) -> ParsedMarkup {
        self.parser.parse(markup)
    }

    /// Render a markup document to audio
    pub async fn render(&self, markup: &str) -> Result<RenderedSpeech, PipelineError> {
        let parsed = self.parser.parse(markup);
        let spoken_text = self.normalizer.prepare(&parsed.text);

        let voice = parsed
            .timeline
            .first_voice()
            .unwrap_or(self.config.synthesis.default_voice.as_str())
            .to_string();
        let language = parsed
            .language
            .clone()
            .unwrap_or_else(|| self.config.synthesis.default_language.clone());

        info!(
            "Synthesizing {} chars with '{}' (voice '{}', {} directives)",
            spoken_text.chars().count(),
            self.synthesizer.name(),
            voice,
            parsed.timeline.len()
        );

        // Nothing to speak: breaks and inserts still play over silence
        let raw = if spoken_text.is_empty() {
            debug!("No spoken text, skipping '{}'", self.synthesizer.name());
            PcmBuffer::new(Vec::new(), self.config.synthesis.default_sample_rate)
        } else {
            self.synthesizer
                .synthesize(SynthesisRequest::new(spoken_text.clone(), voice, language))
                .await?
        };

        let mut samples = self.applier.apply(&raw.samples, raw.sample_rate, &parsed.timeline)?;
        if let Some(enhancer) = &self.enhancer {
            samples = enhancer.polish(&samples);
        }

        let audio = PcmBuffer::new(samples, raw.sample_rate);
        debug!(
            "Rendered {} ms of audio ({} -> {} samples)",
            audio.duration_ms(),
            raw.samples.len(),
            audio.samples.len()
        );

        Ok(RenderedSpeech {
            parsed,
            spoken_text,
            audio,
        })
    }
}
