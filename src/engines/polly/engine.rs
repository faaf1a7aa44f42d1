use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use super::signer::sign_json_post;
use crate::{AcquireError, AudioFormat, ConfigError, SpeechSynthesizer, SynthesisResult};

const SPEECH_PATH: &str = "/v1/speech";

/// Voice and output settings sent with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollyParams {
    /// Polly voice id, e.g. `"Vicki"`.
    pub voice: String,
    /// `"neural"` or `"standard"`.
    pub engine: String,
    pub language: String,
    pub format: AudioFormat,
    pub region: String,
    /// Base URL replacing the regional endpoint, e.g. a VPC endpoint or a local mock.
    pub endpoint: Option<String>,
}

impl Default for PollyParams {
    fn default() -> Self {
        Self {
            voice: "Vicki".to_string(),
            engine: "neural".to_string(),
            language: "de-DE".to_string(),
            format: AudioFormat::OggVorbis,
            region: "us-east-1".to_string(),
            endpoint: None,
        }
    }
}

/// AWS credentials. The secret never shows up in `Debug` output.
#[derive(Debug)]
pub struct PollyCredentials {
    pub access_key: String,
    pub secret_key: SecretString,
    pub session_token: Option<SecretString>,
}

impl PollyCredentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: SecretString::from(secret_key.into()),
            session_token: None,
        }
    }

    /// Read `AWS_ACCESS_KEY`/`AWS_SECRET_KEY`, falling back to the standard
    /// `AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY`. `AWS_SESSION_TOKEN` is optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_key = first_env(&["AWS_ACCESS_KEY", "AWS_ACCESS_KEY_ID"])
            .ok_or(ConfigError::MissingEnv("AWS_ACCESS_KEY"))?;
        let secret_key = first_env(&["AWS_SECRET_KEY", "AWS_SECRET_ACCESS_KEY"])
            .ok_or(ConfigError::MissingEnv("AWS_SECRET_KEY"))?;
        Ok(Self {
            access_key,
            secret_key: SecretString::from(secret_key),
            session_token: first_env(&["AWS_SESSION_TOKEN"]).map(SecretString::from),
        })
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

#[derive(thiserror::Error, Debug)]
pub enum PollyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Polly returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Invalid request body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Signing failed: {0}")]
    Signing(String),
    #[error("Polly returned no audio")]
    EmptyAudio,
}

impl From<PollyError> for AcquireError {
    fn from(e: PollyError) -> Self {
        match e {
            PollyError::Http(e) => AcquireError::Http(e),
            PollyError::Api { status, message } => AcquireError::Status { status, message },
            other => AcquireError::Provider(other.to_string()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SpeechRequest<'a> {
    engine: &'a str,
    language_code: &'a str,
    output_format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample_rate: Option<String>,
    text: &'a str,
    text_type: &'static str,
    voice_id: &'a str,
}

/// Amazon Polly over its REST API, signed with SigV4.
///
/// ```rust,no_run
/// use sance_rs::engines::polly::PollyEngine;
/// use sance_rs::SpeechSynthesizer;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = PollyEngine::from_env()?;
/// let audio = engine
///     .synthesize(r#"<speak><phoneme alphabet="ipa" ph="ʃɔj">coi</phoneme></speak>"#)
///     .await?;
/// println!("{} bytes of {}", audio.audio.len(), audio.format.extension());
/// # Ok(())
/// # }
/// ```
pub struct PollyEngine {
    client: reqwest::Client,
    credentials: PollyCredentials,
    params: PollyParams,
}

impl PollyEngine {
    pub fn new(credentials: PollyCredentials, params: PollyParams) -> Result<Self, ConfigError> {
        let region_ok = !params.region.is_empty()
            && params
                .region
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !region_ok {
            return Err(ConfigError::Region(params.region));
        }
        if let Some(endpoint) = &params.endpoint {
            if reqwest::Url::parse(endpoint).is_err() {
                return Err(ConfigError::Endpoint(endpoint.clone()));
            }
        }

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Ok(Self {
            client,
            credentials,
            params,
        })
    }

    /// Credentials from the environment and the default voice.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(PollyCredentials::from_env()?, PollyParams::default())
    }

    pub fn params(&self) -> &PollyParams {
        &self.params
    }

    /// Base URL requests go to: the override, or the regional Polly endpoint.
    pub fn endpoint(&self) -> String {
        match &self.params.endpoint {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => regional_endpoint(&self.params.region),
        }
    }

    fn request_body(&self, markup: &str) -> Result<Vec<u8>, serde_json::Error> {
        let (output_format, sample_rate) = match self.params.format {
            AudioFormat::OggVorbis => ("ogg_vorbis", None),
            AudioFormat::Mp3 => ("mp3", None),
            AudioFormat::Pcm { sample_rate } => ("pcm", Some(sample_rate.to_string())),
        };
        serde_json::to_vec(&SpeechRequest {
            engine: &self.params.engine,
            language_code: &self.params.language,
            output_format,
            sample_rate,
            text: markup,
            text_type: "ssml",
            voice_id: &self.params.voice,
        })
    }

    async fn request(&self, markup: &str) -> Result<Vec<u8>, PollyError> {
        let url = format!("{}{SPEECH_PATH}", self.endpoint());
        let body = self.request_body(markup)?;
        let signed = sign_json_post(
            &self.credentials,
            &self.params.region,
            &url,
            &body,
            std::time::SystemTime::now(),
        )?;

        let mut request = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        for (name, value) in &signed {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.body(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let throttled = response
                .headers()
                .get("x-amzn-errortype")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.contains("Throttling"));
            let text = response.text().await.unwrap_or_default();
            return Err(PollyError::Api {
                // throttling comes back as 400 but is worth retrying
                status: if throttled { 429 } else { status.as_u16() },
                message: error_message(&text),
            });
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(PollyError::EmptyAudio);
        }
        Ok(audio.to_vec())
    }
}

fn regional_endpoint(region: &str) -> String {
    let suffix = if region.starts_with("cn-") {
        "amazonaws.com.cn"
    } else {
        "amazonaws.com"
    };
    format!("https://polly.{region}.{suffix}")
}

/// Pull `message`/`Message` out of an AWS JSON error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("Message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl SpeechSynthesizer for PollyEngine {
    fn name(&self) -> &str {
        "Amazon Polly"
    }

    fn format(&self) -> AudioFormat {
        self.params.format
    }

    async fn synthesize(&self, markup: &str) -> Result<SynthesisResult, AcquireError> {
        log::debug!(
            "Polly request: voice={} engine={} {} chars",
            self.params.voice,
            self.params.engine,
            markup.len()
        );
        let audio = self.request(markup).await?;
        log::debug!("Polly returned {} bytes", audio.len());
        Ok(SynthesisResult {
            audio,
            format: self.params.format,
        })
    }
}
