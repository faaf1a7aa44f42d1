use std::fmt;
use std::sync::{Arc, Mutex};

use super::archive::AudioArchive;
use super::retry::RetryPolicy;
use super::slug::{slugify_with_limit, MAX_SLUG_LEN};
use super::store::LocalStore;
use crate::phonetics::{Parser, Transcriber, WordCache};
use crate::{AcquireError, SpeechSynthesizer};

/// Retried stage of the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Archive,
    Synthesis,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Archive => f.write_str("archive fetch"),
            Stage::Synthesis => f.write_str("synthesis"),
        }
    }
}

/// Where the audio for an utterance came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Local,
    RemoteArchive,
    Synthesized,
}

/// Proof that audio for an utterance is in the local cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    pub key: String,
    pub location: Location,
}

/// Runs one utterance through local cache, remote archive and live synthesis.
pub struct Resolver {
    store: LocalStore,
    archive: Arc<dyn AudioArchive>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    parser: Arc<dyn Parser>,
    transcriber: Transcriber,
    words: Mutex<WordCache>,
    policy: RetryPolicy,
    slug_limit: usize,
}

impl Resolver {
    pub fn new(
        store: LocalStore,
        parser: Arc<dyn Parser>,
        archive: Arc<dyn AudioArchive>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            store,
            archive,
            synthesizer,
            parser,
            transcriber: Transcriber::new(),
            words: Mutex::new(WordCache::new()),
            policy: RetryPolicy::default(),
            slug_limit: MAX_SLUG_LEN,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_slug_limit(mut self, limit: usize) -> Self {
        self.slug_limit = limit;
        self
    }

    pub fn with_transcriber(mut self, transcriber: Transcriber) -> Self {
        self.transcriber = transcriber;
        self
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn slug(&self, utterance: &str) -> String {
        slugify_with_limit(utterance, self.slug_limit)
    }

    /// SSML for `utterance`, or an empty string if it cannot be spoken.
    pub fn markup(&self, utterance: &str) -> String {
        let parsed = self.parser.parse(utterance);
        // a poisoned cache only ever holds complete entries
        let mut words = self.words.lock().unwrap_or_else(|e| e.into_inner());
        self.transcriber.transcribe_with_cache(&parsed, &mut words)
    }

    /// Make sure audio for `utterance` is in the local cache.
    pub async fn resolve(&self, utterance: &str) -> Result<CacheRecord, AcquireError> {
        log::info!("getting audio for {utterance:?}");
        let key = self.slug(utterance);

        if self.store.exists(&key).await {
            log::debug!("{utterance}: found in local cache");
            return Ok(CacheRecord {
                key,
                location: Location::Local,
            });
        }

        let archive = self.archive.as_ref();
        let slug = key.as_str();
        let archived = self
            .policy
            .run(Stage::Archive, utterance, move || archive.fetch(slug))
            .await;
        match archived {
            Ok(bytes) => match self.store.save(&key, &bytes).await {
                Ok(_) => {
                    log::info!("{utterance}: downloaded from archive");
                    return Ok(CacheRecord {
                        key,
                        location: Location::RemoteArchive,
                    });
                }
                // an archived copy that cannot be kept counts as a miss
                Err(e) => log::warn!("{utterance}: could not store archived audio ({e})"),
            },
            Err(e) => log::debug!("{utterance}: archive miss ({e})"),
        }

        log::info!("{utterance}: generating via {}", self.synthesizer.name());
        let markup = self.markup(utterance);
        if markup.is_empty() {
            log::warn!("{utterance}: no phonetic markup, skipping synthesis");
            return Err(AcquireError::Unsynthesizable(utterance.to_string()));
        }

        let synthesizer = self.synthesizer.as_ref();
        let markup = markup.as_str();
        let result = self
            .policy
            .run(Stage::Synthesis, utterance, move || async move {
                synthesizer.synthesize(markup).await.map(Some)
            })
            .await?;

        self.store.save_result(&key, &result).await?;
        Ok(CacheRecord {
            key,
            location: Location::Synthesized,
        })
    }
}
