//! Lojban-to-SSML phonetic transcription.
//!
//! Turns a parsed, category-tagged token sequence into Polly-style SSML where
//! every word (or run of fused particles) is wrapped in an IPA `<phoneme>`
//! element.
//!
//! # Pipeline
//!
//! ```text
//! tokens ─► normalize ─► canonicalize ─► stress ─► transliterate ─┐
//!                    └─► prosody (breaks, glottal stop) ──────────┴─► units ─► fuse ─► render
//! ```
//!
//! | Stage | Module | Notes |
//! |---|---|---|
//! | word normalization | [`token`] | dot-wrapping of vowel-initial and consonant-final words |
//! | glides, diphthongs, `'` | [`canon`] | `u`/`i` before a vowel become `w`/`ɩ` |
//! | stress | [`stress`] | marks the syllable before a final two-nucleus ending |
//! | rule table | [`rules`] | longest match first, declaration order on ties |
//! | breaks | [`prosody`] | sentence separators, questions, terminators |
//! | fusion + SSML | [`transcriber`] | adjacent particles share one `<phoneme>` |
//!
//! # Examples
//!
//! ```rust
//! use sance_rs::phonetics::{Category, ParseResult, Token, Transcriber};
//!
//! let parsed = ParseResult::success(vec![
//!     Token::new(Category::Particle, "i"),
//!     Token::new(Category::RootPredicate, "klama"),
//! ]);
//! let ssml = Transcriber::new().transcribe(&parsed);
//! assert!(ssml.starts_with("<speak><prosody rate=\"x-slow\"><s></s><s>"));
//! ```
//!
//! Transcription never fails: a failed parse yields an empty string, and
//! characters without a rule pass through unchanged.

pub mod canon;
pub mod morphology;
pub mod prosody;
pub mod rules;
pub mod stress;
pub mod token;
pub mod transcriber;

pub use canon::{canonicalize, WordCache};
pub use morphology::SimpleMorphology;
pub use prosody::{Directive, Prosody};
pub use rules::{Lookahead, RuleEntry, RuleTable};
pub use stress::assign_stress;
pub use token::{Category, ParseResult, ParseStatus, Parser, Token};
pub use transcriber::{PhoneticUnit, Transcriber};
