//! Speech synthesis engines.
//!
//! Each engine implements [`SpeechSynthesizer`](crate::SpeechSynthesizer).
//!
//! # Available Engines
//!
//! Enable engines via Cargo features:
//! - `polly` - Amazon Polly (REST, SigV4 signed; enabled by default)

#[cfg(feature = "polly")]
pub mod polly;
