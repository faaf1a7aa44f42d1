use std::sync::Arc;
use std::time::Instant;

use sance_rs::{
    engines::polly::PollyEngine,
    phonetics::{Parser, SimpleMorphology, Transcriber},
    sance::{HttpArchive, Location, Orchestrator, OrchestratorConfig},
    SpeechSynthesizer,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut utterances: Vec<String> = std::env::args().skip(1).collect();
    if utterances.is_empty() {
        utterances = vec!["coi ro do".to_string(), ".i mi klama le zarci".to_string()];
    }
    utterances.sort();
    utterances.dedup();

    let parser = Arc::new(SimpleMorphology);
    let transcriber = Transcriber::new();
    for utterance in &utterances {
        println!("{utterance}\n  {}", transcriber.transcribe(&parser.parse(utterance)));
    }

    let engine = PollyEngine::from_env()?;
    let archive = HttpArchive::from_env(engine.format())?;
    let orchestrator = Orchestrator::new(
        OrchestratorConfig::default(),
        parser,
        Arc::new(archive),
        Arc::new(engine),
    )?;

    let start = Instant::now();
    let report = orchestrator.run(&utterances).await;
    println!(
        "Done in {:.2?}: {} cached, {} downloaded, {} synthesized, {} failed",
        start.elapsed(),
        report.count(Location::Local),
        report.count(Location::RemoteArchive),
        report.count(Location::Synthesized),
        report.failed().count()
    );
    Ok(())
}
