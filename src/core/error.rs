use thiserror::Error;

/// Failures surfaced by session and gallery operations.
///
/// The `Display` text is what ends up in the `error` field of a
/// `{ success: false }` response.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("No video loaded")]
    NoVideoLoaded,

    #[error("No gallery folder configured")]
    NoGalleryConfigured,

    #[error("Cancelled")]
    Cancelled,

    #[error("No frame numbers left for {0}")]
    FrameNumbersExhausted(String),

    #[error("{0}")]
    Filesystem(#[from] std::io::Error),
}

impl GalleryError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GalleryError::Cancelled)
    }
}

pub type GalleryResult<T> = Result<T, GalleryError>;
