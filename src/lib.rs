//! # sance-rs
//!
//! A Rust library that turns Lojban utterances into IPA-annotated SSML and
//! keeps an on-disk cache of the matching audio.
//!
//! ## Features
//!
//! - **Phonetic transcription**: rule-table transliteration with glide,
//!   diphthong and stress handling, prosodic breaks and particle fusion
//! - **Cached acquisition**: local cache, then a remote archive, then live
//!   synthesis, with per-attempt deadlines and exponential backoff
//! - **Amazon Polly**: SigV4-signed synthesis backend (`polly` feature, on by default)
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! sance-rs = { version = "2026.2", features = ["polly"] }
//! ```
//!
//! ```ignore
//! use std::sync::Arc;
//! use sance_rs::engines::polly::PollyEngine;
//! use sance_rs::phonetics::SimpleMorphology;
//! use sance_rs::sance::{HttpArchive, Orchestrator, OrchestratorConfig};
//! use sance_rs::SpeechSynthesizer;
//!
//! let engine = PollyEngine::from_env()?;
//! let archive = HttpArchive::from_env(engine.format())?;
//! let orchestrator = Orchestrator::new(
//!     OrchestratorConfig::default(),
//!     Arc::new(SimpleMorphology),
//!     Arc::new(archive),
//!     Arc::new(engine),
//! )?;
//!
//! let report = orchestrator.run(&["coi ro do".to_string()]).await;
//! println!("{} written, {} failed", report.written(), report.failed().count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engines;
pub mod error;
pub mod phonetics;
pub mod sance;

use std::io::Cursor;
use std::path::Path;

use async_trait::async_trait;

pub use error::{AcquireError, ConfigError};

/// Encoding of the audio produced by a synthesizer and stored in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioFormat {
    /// Ogg Vorbis stream, stored as-is.
    #[default]
    OggVorbis,
    /// MP3 stream, stored as-is.
    Mp3,
    /// Raw signed 16-bit little-endian mono PCM, stored wrapped in a WAV container.
    Pcm { sample_rate: u32 },
}

impl AudioFormat {
    /// File extension of the stored artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::OggVorbis => "ogg",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Pcm { .. } => "wav",
        }
    }
}

/// The result of a synthesis (markup-to-speech) operation.
///
/// Holds the audio exactly as the provider returned it.
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// Encoded audio (or raw PCM bytes for [`AudioFormat::Pcm`])
    pub audio: Vec<u8>,
    /// Encoding of `audio`
    pub format: AudioFormat,
}

impl SynthesisResult {
    /// Bytes of the artifact as it should appear on disk.
    ///
    /// Compressed formats pass through untouched; PCM is wrapped in a
    /// 16-bit mono WAV container so the cached file is playable.
    pub fn to_file_bytes(&self) -> Result<Vec<u8>, hound::Error> {
        let sample_rate = match self.format {
            AudioFormat::Pcm { sample_rate } => sample_rate,
            _ => return Ok(self.audio.clone()),
        };

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::with_capacity(self.audio.len() + 44));
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
            for pair in self.audio.chunks_exact(2) {
                writer.write_sample(i16::from_le_bytes([pair[0], pair[1]]))?;
            }
            writer.finalize()?;
        }
        Ok(cursor.into_inner())
    }

    /// Write the artifact to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<(), AcquireError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_file_bytes()?)?;
        Ok(())
    }

    /// Duration of the audio in seconds. Only known for PCM output.
    pub fn duration_secs(&self) -> Option<f64> {
        match self.format {
            AudioFormat::Pcm { sample_rate } if sample_rate > 0 => {
                Some((self.audio.len() / 2) as f64 / sample_rate as f64)
            }
            _ => None,
        }
    }
}

/// Common interface for markup-to-speech backends.
///
/// Implementations receive the SSML produced by
/// [`phonetics::Transcriber`] and return the provider's audio. They are
/// shared across concurrent resolver pipelines, so they must be `Send + Sync`.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Short backend name used in log lines.
    fn name(&self) -> &str;

    /// Format of the audio returned by [`SpeechSynthesizer::synthesize`].
    fn format(&self) -> AudioFormat;

    /// Synthesize speech from SSML markup.
    async fn synthesize(&self, markup: &str) -> Result<SynthesisResult, AcquireError>;
}
