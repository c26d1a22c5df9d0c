use crate::errors::ApiError;
use crate::models::{NewPhoto, Photo, Speech, SpeechId};
use async_trait::async_trait;

/// Operations the wall needs from its backend.
#[async_trait]
pub trait WallApi: Send + Sync + 'static { // Send+Sync+'static required for Arc<dyn>
    /// Lists every photo in backend order.
    async fn list_photos(&self) -> Result<Vec<Photo>, ApiError>;

    /// Uploads a new photo. The created record is not needed by the wall.
    async fn create_photo(&self, photo: &NewPhoto) -> Result<(), ApiError>;

    /// Lists the unread speeches in reading order.
    async fn list_speeches(&self) -> Result<Vec<Speech>, ApiError>;

    /// Removes a consumed speech.
    async fn delete_speech(&self, id: &SpeechId) -> Result<(), ApiError>;
}
