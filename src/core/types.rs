//! Core value types shared by the engine and the editing pipeline.
//!
//! Images are held behind an `Arc` so a picked source image can be bound to a
//! filter, kept in the session and shown by the presenter without copying
//! pixel data.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A value bound to a filter parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Image data
    Image(ImageValue),
    /// 64-bit floating point number
    Float(f64),
    /// 2D vector (x, y)
    Vector2(f64, f64),
}

/// Image wrapper with metadata and shared pixel storage.
#[derive(Debug, Clone)]
pub struct ImageValue {
    /// Image metadata (dimensions, format, etc.)
    pub metadata: ImageMetadata,
    data: Arc<DynamicImage>,
}

impl PartialEq for ImageValue {
    fn eq(&self, other: &Self) -> bool {
        if self.metadata != other.metadata {
            return false;
        }
        Arc::ptr_eq(&self.data, &other.data) || self.data.as_bytes() == other.data.as_bytes()
    }
}

/// Image metadata without the pixel data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageMetadata {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Image format
    pub format: ImageFormat,
    /// Whether the image has an alpha channel
    pub has_alpha: bool,
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
    Tiff,
    Bmp,
    Unknown,
}

/// Integer rectangle describing the region a filter produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// The single user-facing slider value, always within `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Intensity(f64);

// ============================================================================
// Value Implementation
// ============================================================================

impl Value {
    /// Try to get this value as an image reference.
    pub fn as_image(&self) -> Option<&ImageValue> {
        if let Value::Image(img) = self {
            Some(img)
        } else {
            None
        }
    }

    /// Try to get this value as a float.
    pub fn as_float(&self) -> Option<f64> {
        if let Value::Float(f) = self {
            Some(*f)
        } else {
            None
        }
    }

    /// Try to get this value as a 2D vector.
    pub fn as_vector2(&self) -> Option<(f64, f64)> {
        if let Value::Vector2(x, y) = self {
            Some((*x, *y))
        } else {
            None
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Image(img) => write!(f, "Image({}x{})", img.metadata.width, img.metadata.height),
            Value::Float(fl) => write!(f, "{:.4}", fl),
            Value::Vector2(x, y) => write!(f, "Vec2({:.2}, {:.2})", x, y),
        }
    }
}

// ============================================================================
// ImageValue Implementation
// ============================================================================

fn has_alpha(image: &DynamicImage) -> bool {
    matches!(
        image,
        DynamicImage::ImageRgba8(_)
            | DynamicImage::ImageRgba16(_)
            | DynamicImage::ImageRgba32F(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLumaA16(_)
    )
}

impl ImageValue {
    /// Create a new ImageValue from a DynamicImage.
    pub fn new(image: DynamicImage) -> Self {
        Self {
            metadata: ImageMetadata {
                width: image.width(),
                height: image.height(),
                format: ImageFormat::Unknown,
                has_alpha: has_alpha(&image),
            },
            data: Arc::new(image),
        }
    }

    /// Load an image from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, image::ImageError> {
        let path = path.as_ref();
        let mut value = Self::new(image::open(path)?);
        value.metadata.format = ImageFormat::from_path(path);
        Ok(value)
    }

    /// Shared reference to the underlying image.
    pub fn image(&self) -> &DynamicImage {
        &self.data
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.metadata.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.metadata.height
    }

    /// Full bounds of this image.
    pub fn extent(&self) -> Extent {
        Extent::new(0, 0, self.metadata.width, self.metadata.height)
    }

    /// Geometric center `(width / 2, height / 2)`.
    pub fn center(&self) -> (f64, f64) {
        (
            self.metadata.width as f64 / 2.0,
            self.metadata.height as f64 / 2.0,
        )
    }

    /// Take ownership of the underlying image, cloning if it is shared.
    pub fn into_image(self) -> DynamicImage {
        Arc::try_unwrap(self.data).unwrap_or_else(|arc| (*arc).clone())
    }
}

// ============================================================================
// ImageFormat Implementation
// ============================================================================

impl ImageFormat {
    /// Determine image format from file path extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            "gif" => ImageFormat::Gif,
            "webp" => ImageFormat::WebP,
            "tiff" | "tif" => ImageFormat::Tiff,
            "bmp" => ImageFormat::Bmp,
            _ => ImageFormat::Unknown,
        }
    }

    /// Convert to image crate's ImageFormat.
    pub fn to_image_format(&self) -> Option<image::ImageFormat> {
        match self {
            ImageFormat::Jpeg => Some(image::ImageFormat::Jpeg),
            ImageFormat::Png => Some(image::ImageFormat::Png),
            ImageFormat::Gif => Some(image::ImageFormat::Gif),
            ImageFormat::WebP => Some(image::ImageFormat::WebP),
            ImageFormat::Tiff => Some(image::ImageFormat::Tiff),
            ImageFormat::Bmp => Some(image::ImageFormat::Bmp),
            ImageFormat::Unknown => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Jpeg => write!(f, "JPEG"),
            ImageFormat::Png => write!(f, "PNG"),
            ImageFormat::Gif => write!(f, "GIF"),
            ImageFormat::WebP => write!(f, "WebP"),
            ImageFormat::Tiff => write!(f, "TIFF"),
            ImageFormat::Bmp => write!(f, "BMP"),
            ImageFormat::Unknown => write!(f, "Unknown"),
        }
    }
}

// ============================================================================
// Extent / Intensity
// ============================================================================

impl Extent {
    /// Create a new extent.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Whether the extent covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersection with `(0, 0, width, height)`.
    pub fn clamp_to(&self, width: u32, height: u32) -> Extent {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Extent {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }
}

impl Intensity {
    /// Lowest slider position.
    pub const MIN: Intensity = Intensity(0.0);
    /// Highest slider position.
    pub const MAX: Intensity = Intensity(1.0);

    /// Create an intensity, clamping into `[0, 1]`. NaN becomes 0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// The raw slider value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(0.5)
    }
}

impl From<f64> for Intensity {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Intensity> for f64 {
    fn from(value: Intensity) -> Self {
        value.0
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn solid(width: u32, height: u32) -> ImageValue {
        ImageValue::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([10, 20, 30, 255]),
        )))
    }

    #[test]
    fn test_intensity_clamps() {
        assert_eq!(Intensity::new(1.5).value(), 1.0);
        assert_eq!(Intensity::new(-0.2).value(), 0.0);
        assert_eq!(Intensity::new(f64::NAN).value(), 0.0);
        assert_eq!(Intensity::new(0.3).value(), 0.3);
    }

    #[test]
    fn test_image_center_and_extent() {
        let img = solid(101, 40);
        assert_eq!(img.center(), (50.5, 20.0));
        assert_eq!(img.extent(), Extent::new(0, 0, 101, 40));
        assert!(img.metadata.has_alpha);
    }

    #[test]
    fn test_image_equality_compares_pixels() {
        let a = solid(4, 4);
        let b = solid(4, 4);
        assert_eq!(a, b);
        assert_eq!(a, a.clone());
        assert_ne!(a, solid(4, 5));
    }

    #[test]
    fn test_extent_clamp() {
        let e = Extent::new(2, 2, 10, 10).clamp_to(5, 8);
        assert_eq!(e, Extent::new(2, 2, 3, 6));
        assert!(Extent::new(0, 0, 0, 3).is_empty());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ImageFormat::from_path(Path::new("a.JPG")), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path(Path::new("a")), ImageFormat::Unknown);
    }
}
