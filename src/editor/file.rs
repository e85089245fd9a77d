//! File-backed collaborators used by the command line tool.

use crate::core::error::{AcquireError, SaveError};
use crate::core::types::{ImageFormat, ImageValue};
use crate::editor::services::{ImageSource, Notification, PhotoLibrary, Presenter};
use crate::editor::{Intent, IntentSender};
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// Picks a fixed image file. A missing file counts as a cancelled pick.
pub struct FileImageSource {
    path: PathBuf,
}

impl FileImageSource {
    /// Source that picks `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImageSource for FileImageSource {
    fn request_image(&mut self, reply: IntentSender) -> Result<(), AcquireError> {
        if !self.path.is_file() {
            log::warn!("{} does not exist", self.path.display());
            reply.send(Intent::PickCancelled);
            return Ok(());
        }

        let image = ImageValue::from_path(&self.path).map_err(|e| {
            AcquireError::Unavailable(format!("{}: {}", self.path.display(), e))
        })?;
        reply.send(Intent::ImagePicked(image));
        Ok(())
    }
}

/// Where a [`DirectoryLibrary`] writes.
enum Target {
    /// Numbered PNG files inside a directory
    Directory(PathBuf),
    /// One explicit path, overwritten on every save
    File(PathBuf),
}

/// Saves into a directory of numbered files, or to one explicit path.
pub struct DirectoryLibrary {
    target: Target,
}

impl DirectoryLibrary {
    /// Save as `<dir>/instafilter-<n>.png`, picking the first free `n`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            target: Target::Directory(dir.into()),
        }
    }

    /// Save to `path`, format taken from its extension.
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            target: Target::File(path.into()),
        }
    }

    fn next_path(&self) -> PathBuf {
        match &self.target {
            Target::File(path) => path.clone(),
            Target::Directory(dir) => (1..)
                .map(|n| dir.join(format!("instafilter-{}.png", n)))
                .find(|candidate| !candidate.exists())
                .unwrap_or_else(|| dir.join("instafilter.png")),
        }
    }

    fn write(path: &Path, image: ImageValue) -> Result<(), SaveError> {
        let write_error = |reason: String| SaveError::Write {
            path: path.display().to_string(),
            reason,
        };

        let format = ImageFormat::from_path(path);
        let Some(encoding) = format.to_image_format() else {
            return Err(write_error("unsupported file extension".to_string()));
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }

        // JPEG has no alpha channel
        let pixels = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.image().to_rgb8()),
            _ => image.into_image(),
        };
        pixels
            .save_with_format(path, encoding)
            .map_err(|e| write_error(e.to_string()))
    }
}

impl PhotoLibrary for DirectoryLibrary {
    fn save(&mut self, image: ImageValue, reply: IntentSender) {
        let path = self.next_path();
        let result = Self::write(&path, image);
        if result.is_ok() {
            log::info!("Wrote {}", path.display());
        }
        reply.send(Intent::SaveFinished(result));
    }
}

/// Presents through the log.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn display(&mut self, image: &ImageValue) {
        log::info!("Preview updated ({}x{})", image.width(), image.height());
    }

    fn show_overlay(&mut self) {
        log::debug!("Loading...");
    }

    fn hide_overlay(&mut self) {
        log::debug!("Loading done");
    }

    fn notify(&mut self, notification: Notification) {
        log::info!("{}", notification);
    }
}
