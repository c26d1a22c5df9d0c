use crate::{
    config::Config,
    domain::WallApi,
    errors::UiError,
    gallery::{Gallery, PhotoCard},
    letter::{FlushReport, Letter},
    models::PhotoId,
    upload::{UploadForm, UploadOutcome},
};
use std::{sync::Arc, time::Duration};
use tracing;

/// What sits on top of the wall. Only one overlay can be up at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiMode {
    #[default]
    None,
    UploadOpen,
    LetterOpen,
    PhotoDetail(PhotoId),
}

/// The whole page: gallery underneath, at most one overlay above it.
pub struct App {
    api: Arc<dyn WallApi>,
    title: String,
    subtitle: String,
    mode: UiMode,
    gallery: Gallery,
    form: UploadForm,
    letter: Letter,
    success_delay: Duration,
}

impl App {
    pub fn new(api: Arc<dyn WallApi>, config: &Config) -> Self {
        Self {
            api,
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            mode: UiMode::None,
            gallery: Gallery::new(config.viewport_width),
            form: UploadForm::new(config.success_delay),
            letter: Letter::new(config.flip_delay, config.retry_max_elapsed),
            success_delay: config.success_delay,
        }
    }

    /// Replaces the letter, e.g. to use a different retry policy.
    pub fn with_letter(mut self, letter: Letter) -> Self {
        self.letter = letter;
        self
    }

    /// First render: fetch the gallery.
    pub async fn mount(&mut self) {
        tracing::info!(title = %self.title, "Mounting photo wall");
        self.gallery.load(self.api.as_ref()).await;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn mode(&self) -> &UiMode {
        &self.mode
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn form(&self) -> &UploadForm {
        &self.form
    }

    pub fn letter(&self) -> &Letter {
        &self.letter
    }

    pub fn resize(&mut self, width: u32) {
        self.gallery.resize(width);
    }

    /// Opens a fresh upload form, or closes the open one.
    pub fn toggle_upload(&mut self) {
        if self.mode == UiMode::UploadOpen {
            self.mode = UiMode::None;
        } else {
            self.form = UploadForm::new(self.success_delay);
            self.mode = UiMode::UploadOpen;
        }
        tracing::debug!(mode = ?self.mode, "Upload form toggled");
    }

    /// Shows the letter (fetching its speeches) or dismisses it.
    ///
    /// Dismissing deletes nothing; only [`App::close_letter`] consumes speeches.
    pub async fn toggle_letter(&mut self) {
        if self.mode == UiMode::LetterOpen {
            self.mode = UiMode::None;
        } else {
            self.mode = UiMode::LetterOpen;
            self.letter.load(self.api.as_ref()).await;
        }
        tracing::debug!(mode = ?self.mode, "Letter toggled");
    }

    pub fn show_photo(&mut self, id: &PhotoId) -> Result<(), UiError> {
        if self.gallery.find(id).is_none() {
            return Err(UiError::UnknownPhoto(id.clone()));
        }
        self.mode = UiMode::PhotoDetail(id.clone());
        Ok(())
    }

    /// The enlarged card for the photo detail overlay.
    pub fn selected_photo(&self) -> Option<PhotoCard> {
        match &self.mode {
            UiMode::PhotoDetail(id) => self.gallery.find(id).and_then(PhotoCard::from_photo),
            _ => None,
        }
    }

    /// Closes whatever overlay is up.
    pub fn dismiss(&mut self) {
        self.mode = UiMode::None;
    }

    pub fn form_mut(&mut self) -> Result<&mut UploadForm, UiError> {
        match self.mode {
            UiMode::UploadOpen => Ok(&mut self.form),
            _ => Err(UiError::UploadHidden),
        }
    }

    /// Submits the form. On success the banner is held, the gallery refetched
    /// and the form closed.
    pub async fn submit_upload(&mut self) -> Result<UploadOutcome, UiError> {
        let api = Arc::clone(&self.api);
        let outcome = self.form_mut()?.submit(api.as_ref()).await;

        if outcome == UploadOutcome::Uploaded {
            tracing::info!("Photo uploaded, refreshing gallery");
            self.form.finish().await;
            self.gallery.load(api.as_ref()).await;
            self.mode = UiMode::None;
        }
        Ok(outcome)
    }

    fn letter_mut(&mut self) -> Result<&mut Letter, UiError> {
        match self.mode {
            UiMode::LetterOpen => Ok(&mut self.letter),
            _ => Err(UiError::LetterHidden),
        }
    }

    pub fn open_letter(&mut self) -> Result<(), UiError> {
        Ok(self.letter_mut()?.open()?)
    }

    pub async fn next_speech(&mut self) -> Result<usize, UiError> {
        Ok(self.letter_mut()?.advance().await?)
    }

    /// The letter's own close action: deletes what was read, folds the envelope.
    pub async fn close_letter(&mut self) -> Result<FlushReport, UiError> {
        let api = Arc::clone(&self.api);
        Ok(self.letter_mut()?.close(api.as_ref()).await?)
    }

    /// Retries deletions that failed on an earlier close.
    pub async fn retry_deletions(&mut self) -> FlushReport {
        let api = Arc::clone(&self.api);
        self.letter.retry_pending(api.as_ref()).await
    }
}
