// src/storage/r2.rs
//! Cloudflare R2 through its S3-compatible endpoint.

use super::sigv4::{encode_path, CanonicalRequest, SigV4Signer};
use super::ObjectStore;
use crate::config::ObjectStoreSettings;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use reqwest::{header, Client};

const REGION: &str = "auto";
const SERVICE: &str = "s3";

#[derive(Clone)]
pub struct R2ObjectStore {
    client: Client,
    settings: ObjectStoreSettings,
    retry: RetryPolicy,
}

impl R2ObjectStore {
    pub fn new(settings: ObjectStoreSettings) -> Result<Self, AppError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            settings,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn host(&self) -> String {
        format!("{}.r2.cloudflarestorage.com", self.settings.account_id)
    }

    fn canonical_path(&self, key: &str) -> String {
        format!(
            "/{}/{}",
            encode_path(&self.settings.bucket),
            encode_path(key.trim_start_matches('/'))
        )
    }

    /// Where the object can be read once uploaded.
    pub fn public_url(&self, key: &str) -> String {
        match &self.settings.public_base_url {
            Some(base) => base.join_key(key),
            None => format!("https://{}{}", self.host(), self.canonical_path(key)),
        }
    }

    async fn put_once(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), AppError> {
        let host = self.host();
        let path = self.canonical_path(key);
        let signer = SigV4Signer {
            access_key_id: &self.settings.access_key_id,
            secret_access_key: self.settings.secret_access_key.expose(),
            region: REGION,
            service: SERVICE,
        };
        let signed = signer.sign(
            &CanonicalRequest {
                method: "PUT",
                host: &host,
                path: &path,
                content_type,
                payload: bytes,
            },
            chrono::Utc::now(),
        )?;

        let url = format!("https://{}{}", host, path);
        log::debug!("PUT {} ({} bytes)", url, bytes.len());
        let response = self
            .client
            .put(url)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-amz-date", signed.amz_date)
            .header("x-amz-content-sha256", signed.content_sha256)
            .header(header::AUTHORIZATION, signed.authorization)
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::ObjectStore {
                status: status.as_u16(),
                message: text.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect(),
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ObjectStore for R2ObjectStore {
    async fn put_object(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, AppError> {
        retry_with_backoff(|| self.put_once(key, bytes, content_type), &self.retry).await?;
        let url = self.public_url(key);
        log::info!("Uploaded {} bytes to {}", bytes.len(), url);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Secret, ValidatedUrl};

    fn settings(public: Option<&str>) -> ObjectStoreSettings {
        ObjectStoreSettings {
            account_id: "acct".to_string(),
            access_key_id: "key".to_string(),
            secret_access_key: Secret::new("secret", "R2_SECRET_ACCESS_KEY").unwrap(),
            bucket: "media".to_string(),
            public_base_url: public.map(|u| ValidatedUrl::parse(u).unwrap()),
        }
    }

    #[test]
    fn public_url_prefers_configured_base() {
        let store = R2ObjectStore::new(settings(Some("https://cdn.example.com/"))).unwrap();
        assert_eq!(
            store.public_url("audio/intro.mp3"),
            "https://cdn.example.com/audio/intro.mp3"
        );
    }

    #[test]
    fn public_url_falls_back_to_endpoint() {
        let store = R2ObjectStore::new(settings(None)).unwrap();
        assert_eq!(
            store.public_url("audio/intro.mp3"),
            "https://acct.r2.cloudflarestorage.com/media/audio/intro.mp3"
        );
    }
}
