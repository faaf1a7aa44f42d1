//! Amazon Polly speech synthesis.
//!
//! Requests go straight to the Polly REST endpoint
//! (`POST https://polly.{region}.amazonaws.com/v1/speech`, or the `endpoint`
//! override) and are signed with AWS Signature Version 4 by `aws-sigv4`.
//!
//! # Configuration
//!
//! | Variable | Purpose |
//! |---|---|
//! | `AWS_ACCESS_KEY` (or `AWS_ACCESS_KEY_ID`) | access key id |
//! | `AWS_SECRET_KEY` (or `AWS_SECRET_ACCESS_KEY`) | secret key |
//! | `AWS_SESSION_TOKEN` | optional, for temporary credentials |
//!
//! Missing credentials are reported as [`ConfigError::MissingEnv`] when the
//! engine is built, before any request is made.
//!
//! # Defaults
//!
//! Lojban has no Polly voice of its own. The German neural voice `Vicki`
//! pronounces IPA `<phoneme>` tags well, so it is the default:
//!
//! | Setting | Value |
//! |---|---|
//! | voice | `Vicki` |
//! | engine | `neural` |
//! | language | `de-DE` |
//! | format | `ogg_vorbis` |
//! | region | `us-east-1` |
//!
//! [`ConfigError::MissingEnv`]: crate::ConfigError::MissingEnv

pub mod engine;
pub mod signer;

pub use engine::{PollyCredentials, PollyEngine, PollyError, PollyParams};
