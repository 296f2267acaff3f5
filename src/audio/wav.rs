use std::io::{Cursor, Read};
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::audio::PcmBuffer;

// @module: WAV decode/encode for mono float PCM

/// Decode WAV data from any reader, down-mixing to mono
pub fn decode_wav<R: Read>(reader: R) -> Result<PcmBuffer> {
    let mut reader = hound::WavReader::new(reader).context("Failed to read WAV header")?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(anyhow!("WAV file declares zero channels"));
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .context("Failed to decode float samples")?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()
                .context("Failed to decode integer samples")?
        }
    };

    let channels = spec.channels as usize;
    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    Ok(PcmBuffer::new(samples, spec.sample_rate))
}

/// Decode WAV bytes held in memory
pub fn decode_wav_bytes(bytes: &[u8]) -> Result<PcmBuffer> {
    decode_wav(Cursor::new(bytes))
}

/// Read a WAV file from disk
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<PcmBuffer> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open WAV file: {:?}", path))?;
    decode_wav(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to decode WAV file: {:?}", path))
}

/// Map float samples to 16-bit PCM, clamping to [-1, 1]
pub fn f32_to_pcm16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&x| {
            let x = if x.is_finite() { x.clamp(-1.0, 1.0) } else { 0.0 };
            if x >= 0.0 {
                (x * 32767.0).round() as i16
            } else {
                (x * 32768.0).round() as i16
            }
        })
        .collect()
}

/// Encode mono 16-bit WAV into memory
pub fn encode_wav_pcm16(audio: &PcmBuffer) -> Result<Vec<u8>> {
    if audio.sample_rate == 0 {
        return Err(anyhow!("sample_rate must be > 0"));
    }
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut buf = Cursor::new(Vec::<u8>::new());
    {
        let mut writer = hound::WavWriter::new(&mut buf, spec).context("Failed to create WAV writer")?;
        for sample in f32_to_pcm16(&audio.samples) {
            writer.write_sample(sample).context("Failed to write WAV sample")?;
        }
        writer.finalize().context("Failed to finalize WAV data")?;
    }
    Ok(buf.into_inner())
}

/// Write mono 16-bit WAV to disk, creating parent directories
pub fn write_wav<P: AsRef<Path>>(path: P, audio: &PcmBuffer) -> Result<()> {
    let bytes = encode_wav_pcm16(audio)?;
    let content_path = path.as_ref();
    if let Some(parent) = content_path.parent() {
        crate::file_utils::FileManager::ensure_dir(parent)?;
    }
    std::fs::write(content_path, bytes)
        .with_context(|| format!("Failed to write WAV file: {:?}", content_path))
}
