//! Read access to the external blob store holding uploaded materials.
//!
//! Uploads are handled by the storage service itself; this side only ever
//! downloads a stored object so the extractor can read it.

use url::Url;

use crate::config::MAX_MATERIAL_BYTES;
use crate::error::AppError;

pub struct MaterialStorage {
    client: reqwest::Client,
    base_url: Url,
}

impl MaterialStorage {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        // A trailing slash matters to Url::join; normalize once here.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: Url::parse(&normalized)?,
        })
    }

    /// Downloads one stored object by its path.
    pub async fn fetch(&self, path: &str) -> Result<Vec<u8>, AppError> {
        if path.is_empty() || path.starts_with('/') || path.contains("..") {
            return Err(AppError::BadRequest("Invalid material path".to_string()));
        }

        let url = self
            .base_url
            .join(path)
            .map_err(|e| AppError::BadRequest(format!("Invalid material path: {}", e)))?;

        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Material download failed: {}", e)))?;

        if !res.status().is_success() {
            return Err(AppError::UpstreamError(format!(
                "Material download failed: HTTP {}",
                res.status()
            )));
        }

        let bytes = res
            .bytes()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Material download failed: {}", e)))?;

        if bytes.len() > MAX_MATERIAL_BYTES {
            return Err(AppError::BadRequest(
                "Material exceeds the 10 MB size limit".to_string(),
            ));
        }

        Ok(bytes.to_vec())
    }
}
