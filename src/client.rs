use crate::{
    domain::WallApi,
    errors::ApiError,
    models::{NewPhoto, Photo, Speech, SpeechId},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{self, info};
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpWallApi {
    client: Client,
    base_url: Url,
}

impl HttpWallApi {
    /// Creates a client for the backend rooted at `base_url`.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        info!(%base_url, "Initializing HttpWallApi");
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }

    /// Joins path segments onto the base URL, keeping any base path prefix.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Base URL '{}' cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &Url) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|source| ApiError::Network {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "Backend returned an error status");
            return Err(ApiError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");
        let response = self.send(self.client.get(url.clone()), &url).await?;
        response.json::<T>().await.map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl WallApi for HttpWallApi {
    async fn list_photos(&self) -> Result<Vec<Photo>, ApiError> {
        let photos: Vec<Photo> = self.get_json(self.endpoint(&["images"])?).await?;
        tracing::debug!("Backend returned {} photos", photos.len());
        Ok(photos)
    }

    /// Posts `createdBy`, `caption` and `file` as a multipart form.
    async fn create_photo(&self, photo: &NewPhoto) -> Result<(), ApiError> {
        let url = self.endpoint(&["images"])?;
        tracing::debug!(%url, file = ?photo.file, "POST multipart photo");

        let file_part = multipart::Part::bytes(photo.file.bytes.clone())
            .file_name(photo.file.file_name.clone())
            .mime_str(&photo.file.content_type)
            .with_context(|| format!("Invalid content type '{}'", photo.file.content_type))?;

        let form = multipart::Form::new()
            .text("createdBy", photo.created_by.clone())
            .text("caption", photo.caption.clone())
            .part("file", file_part);

        self.send(self.client.post(url.clone()).multipart(form), &url).await?;
        tracing::info!(file_name = %photo.file.file_name, "Photo uploaded");
        Ok(())
    }

    async fn list_speeches(&self) -> Result<Vec<Speech>, ApiError> {
        let speeches: Vec<Speech> = self.get_json(self.endpoint(&["speeches"])?).await?;
        tracing::debug!("Backend returned {} speeches", speeches.len());
        Ok(speeches)
    }

    async fn delete_speech(&self, id: &SpeechId) -> Result<(), ApiError> {
        let url = self.endpoint(&["speeches", id.as_str()])?;
        tracing::debug!(speech_id = %id, %url, "DELETE speech");
        self.send(self.client.delete(url.clone()), &url).await?;
        Ok(())
    }
}
