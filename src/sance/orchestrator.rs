use std::sync::Arc;

use futures::future::join_all;

use super::archive::AudioArchive;
use super::config::OrchestratorConfig;
use super::resolver::{CacheRecord, Location, Resolver};
use super::store::LocalStore;
use crate::phonetics::Parser;
use crate::{AcquireError, ConfigError, SpeechSynthesizer};

/// Outcome for one utterance of a batch.
#[derive(Debug)]
pub struct ItemReport {
    pub utterance: String,
    pub result: Result<CacheRecord, AcquireError>,
}

/// Per-item outcomes, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    /// Items whose audio is now in the local cache.
    pub fn written(&self) -> usize {
        self.items.iter().filter(|i| i.result.is_ok()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(|i| i.result.is_err())
    }

    pub fn count(&self, location: Location) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(&i.result, Ok(r) if r.location == location))
            .count()
    }
}

/// Resolves batches of utterances a fixed number at a time.
pub struct Orchestrator {
    resolver: Resolver,
    concurrency: usize,
}

impl Orchestrator {
    /// Validate `config` and wire up the fallback chain.
    ///
    /// Cached files use the extension of the synthesizer's output format.
    pub fn new(
        config: OrchestratorConfig,
        parser: Arc<dyn Parser>,
        archive: Arc<dyn AudioArchive>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = LocalStore::new(&config.cache_dir, synthesizer.format());
        let resolver = Resolver::new(store, parser, archive, synthesizer)
            .with_policy(config.retry_policy())
            .with_slug_limit(config.slug_limit);
        Ok(Self {
            resolver,
            concurrency: config.concurrency,
        })
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Resolve every utterance. Failures are logged and reported, never fatal.
    pub async fn run(&self, utterances: &[String]) -> BatchReport {
        log::info!(
            "acquiring audio for {} utterances, {} at a time",
            utterances.len(),
            self.concurrency
        );

        let mut report = BatchReport::default();
        for group in utterances.chunks(self.concurrency) {
            let results = join_all(group.iter().map(|u| self.resolver.resolve(u))).await;
            for (utterance, result) in group.iter().zip(results) {
                if let Err(e) = &result {
                    log::error!("{utterance}: not downloaded ({e})");
                }
                report.items.push(ItemReport {
                    utterance: utterance.clone(),
                    result,
                });
            }
        }

        log::info!(
            "audio batch done: {} written, {} failed",
            report.written(),
            report.items.len() - report.written()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::Orchestrator;
    use crate::phonetics::SimpleMorphology;
    use crate::sance::resolver::mock::{MockArchive, MockSynthesizer};
    use crate::sance::{Location, OrchestratorConfig};
    use crate::{AcquireError, AudioFormat, ConfigError, SpeechSynthesizer, SynthesisResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const WORDS: [&str; 5] = ["klama", "coi", "mi", "do", "pendo"];

    /// Takes 10s for "klama" and 1s for anything else, recording start and end.
    #[derive(Default)]
    struct TimedSynthesizer {
        live: AtomicUsize,
        peak: AtomicUsize,
        events: Mutex<Vec<String>>,
    }

    impl TimedSynthesizer {
        fn record(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }

        fn position(&self, event: &str) -> usize {
            let events = self.events.lock().unwrap();
            events.iter().position(|e| e == event).unwrap()
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for TimedSynthesizer {
        fn name(&self) -> &str {
            "timed"
        }

        fn format(&self) -> AudioFormat {
            AudioFormat::OggVorbis
        }

        async fn synthesize(&self, markup: &str) -> Result<SynthesisResult, AcquireError> {
            let word = WORDS
                .iter()
                .find(|w| markup.contains(&format!(">{w}<")))
                .copied()
                .unwrap_or("?");

            let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(live, Ordering::SeqCst);
            self.record(format!("start {word}"));

            let secs = if word == "klama" { 10 } else { 1 };
            tokio::time::sleep(Duration::from_secs(secs)).await;

            self.record(format!("end {word}"));
            self.live.fetch_sub(1, Ordering::SeqCst);
            Ok(SynthesisResult {
                audio: word.as_bytes().to_vec(),
                format: AudioFormat::OggVorbis,
            })
        }
    }

    fn utterances(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn one_failing_item_does_not_abort_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let config = OrchestratorConfig::builder()
            .cache_dir(dir.path())
            .build()
            .unwrap();
        let archive = Arc::new(MockArchive::default());
        let synth = Arc::new(MockSynthesizer {
            fail_on: Some("laːmaː"),
            ..MockSynthesizer::default()
        });
        let orchestrator = Orchestrator::new(
            config,
            Arc::new(SimpleMorphology),
            archive.clone(),
            synth.clone(),
        )
        .unwrap();

        let batch = utterances(&["coi", "mi", "klama", "do", "pendo"]);
        let report = orchestrator.run(&batch).await;

        assert_eq!(report.items.len(), 5);
        assert_eq!(report.written(), 4);
        assert_eq!(report.count(Location::Synthesized), 4);

        let failed: Vec<_> = report.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].utterance, "klama");
        assert!(matches!(failed[0].result, Err(AcquireError::Exhausted { .. })));

        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 4);

        // every item misses the archive five times; only "klama" retries synthesis
        assert_eq!(archive.calls.load(Ordering::SeqCst), 25);
        assert_eq!(synth.calls.load(Ordering::SeqCst), 4 + 5);
    }

    #[tokio::test(start_paused = true)]
    async fn second_run_is_served_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let config = OrchestratorConfig::builder()
            .cache_dir(dir.path())
            .concurrency(3usize)
            .build()
            .unwrap();
        let archive = Arc::new(MockArchive::default());
        let synth = Arc::new(MockSynthesizer::default());
        let orchestrator = Orchestrator::new(
            config,
            Arc::new(SimpleMorphology),
            archive.clone(),
            synth.clone(),
        )
        .unwrap();

        let batch = utterances(&["coi ro do", "mi klama"]);
        orchestrator.run(&batch).await;
        let synth_calls = synth.calls.load(Ordering::SeqCst);
        let archive_calls = archive.calls.load(Ordering::SeqCst);

        let report = orchestrator.run(&batch).await;
        assert_eq!(report.count(Location::Local), 2);
        assert_eq!(synth.calls.load(Ordering::SeqCst), synth_calls);
        assert_eq!(archive.calls.load(Ordering::SeqCst), archive_calls);
    }

    #[test]
    fn invalid_config_refuses_to_start() {
        let config = OrchestratorConfig {
            concurrency: 0,
            ..OrchestratorConfig::default()
        };
        let result = Orchestrator::new(
            config,
            Arc::new(SimpleMorphology),
            Arc::new(MockArchive::default()),
            Arc::new(MockSynthesizer::default()),
        );
        assert!(matches!(result, Err(ConfigError::Zero("concurrency"))));
    }

    #[tokio::test(start_paused = true)]
    async fn groups_run_in_lockstep() {
        let dir = tempfile::tempdir().unwrap();
        let config = OrchestratorConfig::builder()
            .cache_dir(dir.path())
            .max_attempts(1u32)
            .build()
            .unwrap();
        let synth = Arc::new(TimedSynthesizer::default());
        let orchestrator = Orchestrator::new(
            config,
            Arc::new(SimpleMorphology),
            Arc::new(MockArchive::default()),
            synth.clone(),
        )
        .unwrap();

        // groups: [klama coi] [mi do] [pendo]
        let report = orchestrator.run(&utterances(&WORDS)).await;
        assert_eq!(report.count(Location::Synthesized), 5);
        assert_eq!(synth.peak.load(Ordering::SeqCst), 2);

        // the fast member of the first group finishes, but the next group
        // still waits for the slow one
        assert!(synth.position("end coi") < synth.position("end klama"));
        for next in ["start mi", "start do"] {
            assert!(synth.position("end klama") < synth.position(next));
        }
        for next in ["end mi", "end do"] {
            assert!(synth.position(next) < synth.position("start pendo"));
        }
    }
}
