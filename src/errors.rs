use crate::models::PhotoId;
use reqwest::StatusCode;
use thiserror::Error;

// --- Backend / transport errors ---

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Backend answered {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("Could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid request: {0}")]
    Client(#[from] anyhow::Error),
}

impl ApiError {
    /// The backend no longer has the resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// Transport failures, server errors, timeouts and throttling may succeed later.
    /// Other client errors and malformed requests will not.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network { .. } => true,
            ApiError::Status { status, .. } => {
                status.is_server_error()
                    || *status == StatusCode::REQUEST_TIMEOUT
                    || *status == StatusCode::TOO_MANY_REQUESTS
            }
            ApiError::Decode { .. } | ApiError::Client(_) => false,
        }
    }
}

// --- Upload form validation ---

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("All fields must be filled!")]
    MissingFields,
    #[error("File is too large! Maximum 5MB")]
    FileTooLarge { size: u64 },
    #[error("File must be an image!")]
    NotAnImage { content_type: String },
}

impl ValidationError {
    /// The inline message shown next to the form.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Why a file picked from disk could not be loaded.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Could not read file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Rejected(#[from] ValidationError),
}

// --- Letter and root UI transitions ---

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterError {
    #[error("The letter is still loading")]
    Loading,
    #[error("Every speech has already been read")]
    AlreadyRead,
    #[error("The letter is not open")]
    NotOpened,
    #[error("The letter is already open")]
    AlreadyOpened,
    #[error("This is the last speech")]
    AtLastSpeech,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    #[error("The upload form is not open")]
    UploadHidden,
    #[error("The letter is not showing")]
    LetterHidden,
    #[error("No photo with ID: {0}")]
    UnknownPhoto(PhotoId),
    #[error(transparent)]
    Letter(#[from] LetterError),
}

// --- Top-level errors for the terminal front end ---

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Ui(#[from] UiError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
