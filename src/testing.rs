//! In-memory backend for unit tests.

use crate::{
    domain::WallApi,
    errors::ApiError,
    models::{NewPhoto, Photo, Speech, SpeechId},
};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;

pub fn speech(id: &str, header: &str) -> Speech {
    Speech {
        id: SpeechId::from(id),
        header: header.to_string(),
        content: format!("{header} body"),
        from: "tester".to_string(),
    }
}

#[derive(Default)]
pub struct FakeWallApi {
    photos: Mutex<Vec<Photo>>,
    speeches: Mutex<Vec<Speech>>,
    uploads: Mutex<Vec<NewPhoto>>,
    calls: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    /// Remaining failures per speech id, and the status they answer with.
    delete_failures: Mutex<HashMap<String, (usize, StatusCode)>>,
    fail_list_photos: Mutex<bool>,
    fail_list_speeches: Mutex<bool>,
    fail_create: Mutex<bool>,
}

impl FakeWallApi {
    pub fn with_photos(photos: Vec<Photo>) -> Self {
        let api = Self::default();
        *api.photos.lock().unwrap() = photos;
        api
    }

    pub fn with_speeches(speeches: Vec<Speech>) -> Self {
        let api = Self::default();
        *api.speeches.lock().unwrap() = speeches;
        api
    }

    pub fn fail_list_photos(&self, fail: bool) {
        *self.fail_list_photos.lock().unwrap() = fail;
    }

    pub fn fail_list_speeches(&self, fail: bool) {
        *self.fail_list_speeches.lock().unwrap() = fail;
    }

    pub fn fail_create(&self, fail: bool) {
        *self.fail_create.lock().unwrap() = fail;
    }

    /// Makes the next `times` deletions of `id` fail with a 500.
    pub fn fail_delete(&self, id: &str, times: usize) {
        self.fail_delete_with(id, times, StatusCode::INTERNAL_SERVER_ERROR);
    }

    pub fn fail_delete_with(&self, id: &str, times: usize, status: StatusCode) {
        self.delete_failures
            .lock()
            .unwrap()
            .insert(id.to_string(), (times, status));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<NewPhoto> {
        self.uploads.lock().unwrap().clone()
    }

    /// Ids whose deletion succeeded, in completion order.
    pub fn deleted_ids(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn delete_attempts(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("DELETE ")).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn server_error(path: &str) -> ApiError {
        Self::status(StatusCode::INTERNAL_SERVER_ERROR, path)
    }

    fn status(status: StatusCode, path: &str) -> ApiError {
        ApiError::Status {
            status,
            url: format!("fake://{path}"),
        }
    }
}

#[async_trait]
impl WallApi for FakeWallApi {
    async fn list_photos(&self) -> Result<Vec<Photo>, ApiError> {
        self.record("GET /images".into());
        if *self.fail_list_photos.lock().unwrap() {
            return Err(Self::server_error("/images"));
        }
        Ok(self.photos.lock().unwrap().clone())
    }

    async fn create_photo(&self, photo: &NewPhoto) -> Result<(), ApiError> {
        self.record("POST /images".into());
        if *self.fail_create.lock().unwrap() {
            return Err(Self::server_error("/images"));
        }
        self.uploads.lock().unwrap().push(photo.clone());
        Ok(())
    }

    async fn list_speeches(&self) -> Result<Vec<Speech>, ApiError> {
        self.record("GET /speeches".into());
        if *self.fail_list_speeches.lock().unwrap() {
            return Err(Self::server_error("/speeches"));
        }
        Ok(self.speeches.lock().unwrap().clone())
    }

    async fn delete_speech(&self, id: &SpeechId) -> Result<(), ApiError> {
        self.record(format!("DELETE /speeches/{id}"));
        {
            let mut failures = self.delete_failures.lock().unwrap();
            if let Some((remaining, status)) = failures.get_mut(id.as_str()) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(Self::status(*status, "/speeches"));
                }
            }
        }
        let mut speeches = self.speeches.lock().unwrap();
        let before = speeches.len();
        speeches.retain(|s| &s.id != id);
        if speeches.len() == before {
            return Err(Self::status(StatusCode::NOT_FOUND, "/speeches"));
        }
        self.deleted.lock().unwrap().push(id.to_string());
        Ok(())
    }
}
