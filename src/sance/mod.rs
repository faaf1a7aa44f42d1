//! Audio acquisition for batches of utterances.
//!
//! Every utterance goes through the same fallback chain, stopping at the
//! first success:
//!
//! ```text
//! local cache ──miss──► remote archive ──miss──► transcribe + synthesize ──► Failed
//!      │ hit                  │ hit (store)               │ ok (store)
//!      ▼                      ▼                           ▼
//!    Local              RemoteArchive                Synthesized
//! ```
//!
//! The archive and synthesis stages each run under a [`RetryPolicy`]: every
//! attempt races a deadline, and failed attempts are retried after an
//! exponentially growing delay. The [`Orchestrator`] drives the chain over a
//! batch in fixed-size groups; a group finishes completely before the next
//! one starts.
//!
//! # Cache layout
//!
//! ```text
//! data/sance/
//! ├── coi_ro_do.ogg
//! └── mi_klama.ogg
//! ```
//!
//! File names come from [`slugify`]: spaces become `_`, dots are dropped, and
//! the result is cut to 250 characters. Utterances that collide after
//! truncation share one file.

pub mod archive;
pub mod config;
pub mod orchestrator;
pub mod resolver;
pub mod retry;
pub mod slug;
pub mod store;

pub use archive::{ArchiveConfig, AudioArchive, HttpArchive};
pub use config::{OrchestratorConfig, OrchestratorConfigBuilder};
pub use orchestrator::{BatchReport, ItemReport, Orchestrator};
pub use resolver::{CacheRecord, Location, Resolver, Stage};
pub use retry::{with_deadline, RetryPolicy};
pub use slug::{slugify, slugify_with_limit, MAX_SLUG_LEN};
pub use store::LocalStore;
