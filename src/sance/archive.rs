use std::time::Duration;

use async_trait::async_trait;

use crate::{AcquireError, AudioFormat, ConfigError};

/// Environment variable naming the `owner/repo` that hosts published audio.
pub const REPO_ENV: &str = "THIS_REPO_NAME";

const GITHUB_PAGES_BASE: &str =
    "https://raw.githubusercontent.com/{repo}/gh-pages/data/sance/?raw=true";

/// Read-only store of previously published audio.
#[async_trait]
pub trait AudioArchive: Send + Sync {
    /// Fetch the artifact for `slug`. `Ok(None)` means the archive does not have it.
    async fn fetch(&self, slug: &str) -> Result<Option<Vec<u8>>, AcquireError>;
}

/// Where archived audio lives.
///
/// Artifacts are `<base>/<slug>.<ext>`; the query string of the base URL is
/// kept on every artifact URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    pub base_url: reqwest::Url,
    pub extension: &'static str,
}

impl ArchiveConfig {
    pub fn new(base_url: &str, format: AudioFormat) -> Result<Self, ConfigError> {
        let base_url = reqwest::Url::parse(base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ConfigError::ArchiveUrl(base_url.to_string()))?;
        Ok(Self {
            base_url,
            extension: format.extension(),
        })
    }

    /// The `gh-pages` branch of a GitHub repository.
    pub fn github_pages(repo: &str, format: AudioFormat) -> Result<Self, ConfigError> {
        Self::new(&GITHUB_PAGES_BASE.replace("{repo}", repo), format)
    }

    /// [`ArchiveConfig::github_pages`] for the repository named in `THIS_REPO_NAME`.
    pub fn from_env(format: AudioFormat) -> Result<Self, ConfigError> {
        let repo = std::env::var(REPO_ENV)
            .ok()
            .filter(|r| !r.trim().is_empty())
            .ok_or(ConfigError::MissingEnv(REPO_ENV))?;
        Self::github_pages(repo.trim(), format)
    }

    /// Artifact URL; the file name is percent-encoded as one path segment.
    pub fn url_for(&self, slug: &str) -> reqwest::Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&format!("{slug}.{}", self.extension));
        }
        url
    }
}

/// Archive served over plain HTTP GET.
pub struct HttpArchive {
    client: reqwest::Client,
    config: ArchiveConfig,
}

impl HttpArchive {
    pub fn new(config: ArchiveConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("sance-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    pub fn from_env(format: AudioFormat) -> Result<Self, ConfigError> {
        Ok(Self::new(ArchiveConfig::from_env(format)?))
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }
}

#[async_trait]
impl AudioArchive for HttpArchive {
    async fn fetch(&self, slug: &str) -> Result<Option<Vec<u8>>, AcquireError> {
        let url = self.config.url_for(slug);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            log::debug!("archive has no {url}");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AcquireError::Status {
                status: status.as_u16(),
                message: format!("GET {url}"),
            });
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(None);
        }
        Ok(Some(body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::{ArchiveConfig, AudioArchive, HttpArchive};
    use crate::{AcquireError, AudioFormat, ConfigError};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn github_pages_url() {
        let config =
            ArchiveConfig::github_pages("la-lojban/sutysisku", AudioFormat::OggVorbis).unwrap();
        assert_eq!(
            config.url_for("coi_ro_do").as_str(),
            "https://raw.githubusercontent.com/la-lojban/sutysisku/gh-pages/data/sance/coi_ro_do.ogg?raw=true"
        );
    }

    #[test]
    fn base_without_trailing_slash_uses_format_extension() {
        let config = ArchiveConfig::new("http://localhost/audio", AudioFormat::Mp3).unwrap();
        assert_eq!(config.url_for("mi").as_str(), "http://localhost/audio/mi.mp3");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let config = ArchiveConfig::new("http://localhost/sance/", AudioFormat::OggVorbis).unwrap();
        assert_eq!(
            config.url_for("xu_do_klama?#50%").as_str(),
            "http://localhost/sance/xu_do_klama%3F%2350%25.ogg"
        );
    }

    #[test]
    fn invalid_base_is_rejected() {
        let err = ArchiveConfig::new("mailto:sance", AudioFormat::Mp3).unwrap_err();
        assert!(matches!(err, ConfigError::ArchiveUrl(_)));
        let err = ArchiveConfig::new("not a url", AudioFormat::Mp3).unwrap_err();
        assert!(matches!(err, ConfigError::ArchiveUrl(_)));
    }

    fn archive_for(server: &MockServer) -> HttpArchive {
        let base = format!("{}/sance/", server.uri());
        HttpArchive::new(ArchiveConfig::new(&base, AudioFormat::OggVorbis).unwrap())
    }

    #[tokio::test]
    async fn hit_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sance/coi.ogg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"OggS".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let body = archive_for(&server).fetch("coi").await.unwrap();
        assert_eq!(body.as_deref(), Some(&b"OggS"[..]));
    }

    #[tokio::test]
    async fn not_found_is_a_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let body = archive_for(&server).fetch("coi").await.unwrap();
        assert_eq!(body, None);
    }

    #[tokio::test]
    async fn empty_body_is_a_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let body = archive_for(&server).fetch("coi").await.unwrap();
        assert_eq!(body, None);
    }

    #[tokio::test]
    async fn server_errors_keep_their_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = archive_for(&server).fetch("coi").await.unwrap_err();
        assert!(matches!(err, AcquireError::Status { status: 503, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn escaped_slug_reaches_the_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sance/xu%3F.ogg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"OggS".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let body = archive_for(&server).fetch("xu?").await.unwrap();
        assert!(body.is_some());
    }
}
