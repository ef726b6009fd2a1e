//! Image uploads for event artwork.
//!
//! Handlers depend on the [`ImageUploader`] trait; production uses
//! [`CloudinaryUploader`], and [`DisabledUploader`] stands in when no
//! credentials are configured.

use crate::config::CloudinaryCredentials;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use thiserror::Error;

/// Default Cloudinary API base URL.
pub const CLOUDINARY_API_URL: &str = "https://api.cloudinary.com/v1_1";

/// Digest used to sign upload requests.
///
/// Cloudinary accounts verify SHA-1 signatures unless they are switched to
/// SHA-256 in the account security settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
    /// SHA-1 (Cloudinary default)
    #[default]
    Sha1,
    /// SHA-256
    Sha256,
}

impl FromStr for SignatureAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(Self::Sha1),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            other => Err(format!("unknown signature algorithm: {other}")),
        }
    }
}

/// Errors from image uploads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// No upload provider is configured.
    #[error("Image uploads are not configured")]
    NotConfigured,

    /// The payload is neither a data URI nor an http(s) URL.
    #[error("File must be a data URI or an http(s) URL")]
    InvalidFile,

    /// The request to the provider failed.
    #[error("Upload request failed: {0}")]
    RequestFailed(String),

    /// The provider rejected the upload.
    #[error("Upload rejected (status {status}): {message}")]
    Rejected {
        /// HTTP status returned by the provider
        status: u16,
        /// Provider error message
        message: String,
    },
}

/// A stored image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedImage {
    /// HTTPS URL of the image
    #[serde(rename = "secure_url")]
    pub url: String,
    /// Provider-side identifier
    pub public_id: String,
}

/// Boxed future returned by [`ImageUploader::upload`].
pub type UploadFuture<'a> =
    Pin<Box<dyn Future<Output = Result<UploadedImage, UploadError>> + Send + 'a>>;

/// Stores images with an external provider.
pub trait ImageUploader: Send + Sync {
    /// Upload `file` (a data URI or remote URL). `now` names the image.
    ///
    /// # Errors
    ///
    /// See [`UploadError`].
    fn upload(&self, file: String, now: DateTime<Utc>) -> UploadFuture<'_>;
}

/// Uploader used when no provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledUploader;

impl ImageUploader for DisabledUploader {
    fn upload(&self, _file: String, _now: DateTime<Utc>) -> UploadFuture<'_> {
        Box::pin(async { Err(UploadError::NotConfigured) })
    }
}

fn is_uploadable(file: &str) -> bool {
    file.starts_with("data:") || file.starts_with("https://") || file.starts_with("http://")
}

/// Cloudinary signature: the sorted `key=value` pairs joined by `&`, followed
/// by the API secret, hashed with `algorithm`.
fn sign(params: &[(&str, &str)], api_secret: &str, algorithm: SignatureAlgorithm) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_unstable_by_key(|(key, _)| *key);
    let payload = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    let payload = format!("{payload}{api_secret}");
    match algorithm {
        SignatureAlgorithm::Sha1 => format!("{:x}", Sha1::digest(payload.as_bytes())),
        SignatureAlgorithm::Sha256 => format!("{:x}", Sha256::digest(payload.as_bytes())),
    }
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    file: &'a str,
    api_key: &'a str,
    timestamp: i64,
    folder: &'a str,
    public_id: &'a str,
    signature: String,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Signed uploads to Cloudinary's upload API.
///
/// Requests are signed with the credentials' [`SignatureAlgorithm`], which
/// must match the account setting.
#[derive(Clone)]
pub struct CloudinaryUploader {
    client: Client,
    credentials: CloudinaryCredentials,
    api_url: String,
}

impl std::fmt::Debug for CloudinaryUploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryUploader")
            .field("cloud_name", &self.credentials.cloud_name)
            .field("folder", &self.credentials.folder)
            .finish_non_exhaustive()
    }
}

impl CloudinaryUploader {
    /// Create an uploader for the given account.
    #[must_use]
    pub fn new(credentials: CloudinaryCredentials) -> Self {
        Self {
            client: Client::new(),
            credentials,
            api_url: CLOUDINARY_API_URL.to_string(),
        }
    }

    /// Point the uploader at another API base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Public ID given to an image uploaded at `now`.
    #[must_use]
    pub fn public_id(now: DateTime<Utc>) -> String {
        format!("event_{}", now.timestamp_millis())
    }

    async fn send(&self, file: String, now: DateTime<Utc>) -> Result<UploadedImage, UploadError> {
        if !is_uploadable(&file) {
            return Err(UploadError::InvalidFile);
        }

        let public_id = Self::public_id(now);
        let timestamp = now.timestamp();
        let timestamp_text = timestamp.to_string();
        let signature = sign(
            &[
                ("folder", self.credentials.folder.as_str()),
                ("public_id", public_id.as_str()),
                ("timestamp", timestamp_text.as_str()),
            ],
            &self.credentials.api_secret,
            self.credentials.signature_algorithm,
        );

        let request = UploadRequest {
            file: &file,
            api_key: &self.credentials.api_key,
            timestamp,
            folder: &self.credentials.folder,
            public_id: &public_id,
            signature,
        };

        let response = self
            .client
            .post(format!(
                "{}/{}/image/upload",
                self.api_url, self.credentials.cloud_name
            ))
            .json(&request)
            .send()
            .await
            .map_err(|e| UploadError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<UploadedImage>()
                .await
                .map_err(|e| UploadError::RequestFailed(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ProviderError>(&body)
            .map_or(body, |e| e.error.message);
        Err(UploadError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

impl ImageUploader for CloudinaryUploader {
    fn upload(&self, file: String, now: DateTime<Utc>) -> UploadFuture<'_> {
        Box::pin(self.send(file, now))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn credentials() -> CloudinaryCredentials {
        CloudinaryCredentials {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "abcd".to_string(),
            folder: "event_platform".to_string(),
            signature_algorithm: SignatureAlgorithm::Sha1,
        }
    }

    #[test]
    fn signature_sorts_params_and_appends_secret() {
        let params = [
            ("timestamp", "1700000000"),
            ("public_id", "event_1700000000000"),
            ("folder", "event_platform"),
        ];
        assert_eq!(
            sign(&params, "abcd", SignatureAlgorithm::Sha1),
            "d610a1233e9a31acc8aeb173adf4056d00aa0a66"
        );
        assert_eq!(
            sign(&params, "abcd", SignatureAlgorithm::Sha256),
            "f03b784dc46ab9f5ca3f9e7882b09212b8895fc9626548cb6c67a689c173f79c"
        );
    }

    #[test]
    fn signature_algorithm_defaults_to_sha1() {
        assert_eq!(SignatureAlgorithm::default(), SignatureAlgorithm::Sha1);
        assert_eq!("SHA-256".parse::<SignatureAlgorithm>(), Ok(SignatureAlgorithm::Sha256));
        assert_eq!("sha1".parse::<SignatureAlgorithm>(), Ok(SignatureAlgorithm::Sha1));
        assert!("md5".parse::<SignatureAlgorithm>().is_err());
    }

    #[test]
    fn public_id_uses_millis() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(CloudinaryUploader::public_id(now), "event_1700000000000");
    }

    #[test]
    fn uploaded_image_reads_provider_fields() {
        let image: UploadedImage = serde_json::from_str(
            r#"{"secure_url":"https://res.cloudinary.com/demo/x.jpg","public_id":"event_platform/event_1","bytes":10}"#,
        )
        .unwrap();
        assert_eq!(image.url, "https://res.cloudinary.com/demo/x.jpg");
        assert_eq!(image.public_id, "event_platform/event_1");
    }

    #[tokio::test]
    async fn rejects_plain_strings_before_calling_provider() {
        let uploader = CloudinaryUploader::new(credentials()).with_api_url("http://127.0.0.1:9");
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(
            uploader.upload("not a file".to_string(), now).await,
            Err(UploadError::InvalidFile)
        );
    }

    #[tokio::test]
    async fn disabled_uploader_reports_not_configured() {
        assert_eq!(
            DisabledUploader.upload("data:image/png;base64,AA==".to_string(), Utc::now()).await,
            Err(UploadError::NotConfigured)
        );
    }

    proptest::proptest! {
        #[test]
        fn signature_ignores_param_order(
            folder in "[a-z_]{1,12}",
            public_id in "[a-z0-9_]{1,20}",
            timestamp in 0_i64..4_000_000_000,
        ) {
            let timestamp = timestamp.to_string();
            let forward = [("folder", folder.as_str()), ("public_id", public_id.as_str()), ("timestamp", timestamp.as_str())];
            let mut reversed = forward;
            reversed.reverse();

            let signature = sign(&forward, "secret", SignatureAlgorithm::Sha1);
            proptest::prop_assert_eq!(&signature, &sign(&reversed, "secret", SignatureAlgorithm::Sha1));
            proptest::prop_assert_eq!(signature.len(), 40);
            proptest::prop_assert_ne!(signature, sign(&forward, "other-secret", SignatureAlgorithm::Sha1));
            proptest::prop_assert_eq!(sign(&forward, "secret", SignatureAlgorithm::Sha256).len(), 64);
        }
    }
}
