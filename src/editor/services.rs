//! Collaborators the editor drives: acquisition, persistence, presentation.
//!
//! Acquisition and saving are asynchronous from the editor's point of view.
//! Implementations receive an [`IntentSender`] and post their completion as
//! an intent once the work is done.

use crate::core::error::{AcquireError, SaveError};
use crate::core::types::ImageValue;
use crate::editor::IntentSender;

/// Supplies source images, e.g. a photo picker.
pub trait ImageSource {
    /// Begin acquiring an image. Completion arrives later as
    /// `Intent::ImagePicked` or `Intent::PickCancelled` on `reply`.
    fn request_image(&mut self, reply: IntentSender) -> Result<(), AcquireError>;
}

/// Persists edited images, e.g. a photo library.
pub trait PhotoLibrary {
    /// Begin saving `image`. Completion arrives later as
    /// `Intent::SaveFinished` on `reply`.
    fn save(&mut self, image: ImageValue, reply: IntentSender);
}

/// The presentation layer.
pub trait Presenter {
    /// Show a rendered image.
    fn display(&mut self, image: &ImageValue);
    /// Show the blocking overlay while an image is being acquired.
    fn show_overlay(&mut self);
    /// Dismiss the blocking overlay.
    fn hide_overlay(&mut self);
    /// Show a user-visible notification.
    fn notify(&mut self, notification: Notification);
}

/// A user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short heading
    pub title: String,
    /// Body text
    pub message: String,
}

impl Notification {
    /// Create a notification.
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Save requested before anything was rendered.
    pub fn nothing_to_save() -> Self {
        Self::new("Error", "Please select an image")
    }

    /// Save completed.
    pub fn saved() -> Self {
        Self::new("Saved!", "Your altered image has been saved to your photos.")
    }

    /// Save failed.
    pub fn save_failed(error: &SaveError) -> Self {
        Self::new("Save error", error.to_string())
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}
