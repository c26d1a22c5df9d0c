use crate::{
    domain::WallApi,
    errors::{FileError, ValidationError},
    models::{ImageFile, NewPhoto},
};
use std::{path::Path, time::Duration};
use tokio::io::AsyncReadExt;
use tracing;

/// Largest accepted upload: 5 MiB.
pub const MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// Shown under the caption field as `n/200`. Not enforced.
pub const CAPTION_DISPLAY_LIMIT: usize = 200;

pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload photo. Please try again!";

/// Checks size first, then that the payload is an image.
pub fn validate_file(file: &ImageFile) -> Result<(), ValidationError> {
    if file.size() > MAX_FILE_BYTES {
        return Err(ValidationError::FileTooLarge { size: file.size() });
    }
    if !file.content_type.starts_with("image/") {
        return Err(ValidationError::NotAnImage {
            content_type: file.content_type.clone(),
        });
    }
    Ok(())
}

/// Reads a file from disk and guesses its content type from the extension.
///
/// Oversized files are rejected from their metadata. At most
/// `MAX_FILE_BYTES + 1` bytes are ever read into memory.
pub async fn load_image_file(path: impl AsRef<Path>) -> Result<ImageFile, FileError> {
    let path = path.as_ref();
    let declared = tokio::fs::metadata(path).await?.len();
    if declared > MAX_FILE_BYTES {
        tracing::debug!(path = %path.display(), size = declared, "File rejected before reading");
        return Err(ValidationError::FileTooLarge { size: declared }.into());
    }

    let mut bytes = Vec::new();
    tokio::fs::File::open(path)
        .await?
        .take(MAX_FILE_BYTES + 1)
        .read_to_end(&mut bytes)
        .await?;
    // Devices and growing files can report a smaller length than they yield.
    if bytes.len() as u64 > MAX_FILE_BYTES {
        return Err(ValidationError::FileTooLarge {
            size: bytes.len() as u64,
        }
        .into());
    }

    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    tracing::debug!(%file_name, %content_type, size = bytes.len(), "Loaded file from disk");
    Ok(ImageFile {
        file_name,
        content_type,
        bytes,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Validating,
    Submitting,
    /// Upload accepted; the banner is up until [`UploadForm::finish`] resets the form.
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The backend accepted the photo.
    Uploaded,
    /// Rejected before any network call.
    Invalid(ValidationError),
    /// The backend call failed; fields are kept for a retry.
    Failed,
    /// A submission is already in flight or the success banner is showing.
    Busy,
}

#[derive(Debug, Clone)]
pub struct UploadForm {
    created_by: String,
    caption: String,
    file: Option<ImageFile>,
    phase: UploadPhase,
    error: Option<String>,
    success_delay: Duration,
}

impl UploadForm {
    pub fn new(success_delay: Duration) -> Self {
        Self {
            created_by: String::new(),
            caption: String::new(),
            file: None,
            phase: UploadPhase::Idle,
            error: None,
            success_delay,
        }
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.created_by = author.into();
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    /// Validates the file as soon as it is picked, like the file input does.
    pub fn select_file(&mut self, file: ImageFile) -> Result<(), ValidationError> {
        match validate_file(&file) {
            Ok(()) => {
                tracing::debug!(file = ?file, "File selected");
                self.file = Some(file);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::debug!(file = ?file, error = %e, "File rejected");
                self.reject_file(&e);
                Err(e)
            }
        }
    }

    /// Clears the selection and shows why the picked file was refused.
    pub fn reject_file(&mut self, error: &ValidationError) {
        self.file = None;
        self.error = Some(error.user_message());
    }

    pub fn clear_file(&mut self) {
        self.file = None;
        self.error = None;
    }

    pub fn author(&self) -> &str {
        &self.created_by
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn file(&self) -> Option<&ImageFile> {
        self.file.as_ref()
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `"n/200"` under the caption box.
    pub fn caption_counter(&self) -> String {
        format!("{}/{}", self.caption.chars().count(), CAPTION_DISPLAY_LIMIT)
    }

    /// The submit control is disabled while submitting and while the banner shows.
    pub fn can_submit(&self) -> bool {
        matches!(self.phase, UploadPhase::Idle)
    }

    fn validated(&self) -> Result<NewPhoto, ValidationError> {
        let created_by = self.created_by.trim();
        let caption = self.caption.trim();
        let file = match &self.file {
            Some(file) if !created_by.is_empty() && !caption.is_empty() => file,
            _ => return Err(ValidationError::MissingFields),
        };
        validate_file(file)?;

        Ok(NewPhoto {
            created_by: created_by.to_string(),
            caption: caption.to_string(),
            file: file.clone(),
        })
    }

    /// Validates, then posts the form. Nothing is sent when validation fails.
    pub async fn submit(&mut self, api: &dyn WallApi) -> UploadOutcome {
        if !self.can_submit() {
            return UploadOutcome::Busy;
        }

        self.phase = UploadPhase::Validating;
        let new_photo = match self.validated() {
            Ok(photo) => photo,
            Err(e) => {
                self.error = Some(e.user_message());
                self.phase = UploadPhase::Idle;
                return UploadOutcome::Invalid(e);
            }
        };

        self.phase = UploadPhase::Submitting;
        self.error = None;

        match api.create_photo(&new_photo).await {
            Ok(()) => {
                self.phase = UploadPhase::Success;
                UploadOutcome::Uploaded
            }
            Err(e) => {
                tracing::error!(error = %e, "Upload error");
                self.error = Some(UPLOAD_FAILED_MESSAGE.to_string());
                self.phase = UploadPhase::Idle;
                UploadOutcome::Failed
            }
        }
    }

    /// Holds the success banner for the configured delay, then clears every field.
    pub async fn finish(&mut self) {
        if self.phase != UploadPhase::Success {
            return;
        }
        tokio::time::sleep(self.success_delay).await;
        self.reset();
    }

    fn reset(&mut self) {
        self.created_by.clear();
        self.caption.clear();
        self.file = None;
        self.error = None;
        self.phase = UploadPhase::Idle;
    }
}
