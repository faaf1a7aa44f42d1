//! AWS Signature Version 4 for Polly requests, via `aws-sigv4`.

use std::time::SystemTime;

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use secrecy::ExposeSecret;

use super::engine::{PollyCredentials, PollyError};

const SERVICE: &str = "polly";
const CONTENT_TYPE: &str = "application/json";

/// Headers (`x-amz-date`, `authorization`, optionally `x-amz-security-token`)
/// that sign a JSON `POST` of `body` to `url` at time `now`.
pub fn sign_json_post(
    credentials: &PollyCredentials,
    region: &str,
    url: &str,
    body: &[u8],
    now: SystemTime,
) -> Result<Vec<(String, String)>, PollyError> {
    let identity = Credentials::new(
        credentials.access_key.clone(),
        credentials.secret_key.expose_secret().to_string(),
        credentials
            .session_token
            .as_ref()
            .map(|t| t.expose_secret().to_string()),
        None,
        "sance-rs",
    )
    .into();

    let params = v4::SigningParams::builder()
        .identity(&identity)
        .region(region)
        .name(SERVICE)
        .time(now)
        .settings(SigningSettings::default())
        .build()
        .map_err(|e| PollyError::Signing(e.to_string()))?
        .into();

    let request = SignableRequest::new(
        "POST",
        url,
        [("content-type", CONTENT_TYPE)].into_iter(),
        SignableBody::Bytes(body),
    )
    .map_err(|e| PollyError::Signing(e.to_string()))?;

    let (instructions, _signature) = sign(request, &params)
        .map_err(|e| PollyError::Signing(e.to_string()))?
        .into_parts();

    Ok(instructions
        .headers()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::sign_json_post;
    use crate::engines::polly::PollyCredentials;
    use secrecy::SecretString;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    const URL: &str = "https://polly.us-east-1.amazonaws.com/v1/speech";
    const BODY: &[u8] = br#"{"Text":"<speak>coi</speak>"}"#;

    // 2026-01-02T03:04:05Z
    fn now() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_767_323_045)
    }

    fn credentials() -> PollyCredentials {
        PollyCredentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
    }

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn signs_speech_request() {
        let headers = sign_json_post(&credentials(), "us-east-1", URL, BODY, now()).unwrap();

        assert_eq!(header(&headers, "x-amz-date"), Some("20260102T030405Z"));
        assert_eq!(header(&headers, "x-amz-security-token"), None);
        assert_eq!(
            header(&headers, "authorization"),
            Some(
                "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20260102/us-east-1/polly/aws4_request, \
                 SignedHeaders=content-type;host;x-amz-date, \
                 Signature=1c3f4a8bd0893171d79172f633e869bd1f4d4487b7bb36b2859c64fb40e147b6"
            )
        );
    }

    #[test]
    fn session_token_is_sent() {
        let mut credentials = credentials();
        credentials.session_token = Some(SecretString::from("session-token".to_string()));
        let headers = sign_json_post(&credentials, "us-east-1", URL, BODY, now()).unwrap();

        assert_eq!(header(&headers, "x-amz-security-token"), Some("session-token"));
        let authorization = header(&headers, "authorization").unwrap();
        assert!(authorization.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20260102/us-east-1/polly/aws4_request"
        ));
    }
}
