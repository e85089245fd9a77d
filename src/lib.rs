//! # Instafilter - Photo filter editing core
//!
//! Instafilter applies one image filter at a time to a photo, driven by a
//! single intensity slider. It takes care of choosing a filter and mapping
//! the slider onto whichever parameters that filter declares. It also
//! renders the result and hands it to a photo library.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use instafilter::prelude::*;
//!
//! let pipeline = ProcessingPipeline::default();
//! let mut session =
//!     SessionState::with_default_filter(&pipeline, FilterId::SepiaTone, Intensity::new(0.8));
//!
//! let photo = ImageValue::from_path("input.jpg")?;
//! if let RenderResult::Image(image) = session.set_image(&pipeline, photo) {
//!     image.image().save("output.png")?;
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: value types, parameter roles, the kernel trait and errors
//! - [`engine`]: the image engine seam and its CPU implementation
//! - [`filters`]: kernel registry and the built-in kernels
//! - [`pipeline`]: filter catalog, binding policy, rendering and session state
//! - [`editor`]: intent-driven controller over pluggable collaborators
//! - [`config`]: TOML configuration
//!
//! ## Adding a Kernel
//!
//! Implement [`FilterKernel`](core::FilterKernel) and register a factory:
//!
//! ```rust,ignore
//! use instafilter::prelude::*;
//!
//! #[derive(Clone)]
//! struct Invert;
//!
//! impl FilterKernel for Invert {
//!     fn metadata(&self) -> KernelMetadata {
//!         KernelMetadata::builder("CIInvert", "Invert")
//!             .category(Category::ColorEffect)
//!             .build()
//!     }
//!
//!     fn apply(&self, params: &BoundParameters) -> Result<DynamicImage, KernelError> {
//!         let mut image = params.image()?.image().clone();
//!         image.invert();
//!         Ok(image)
//!     }
//!
//!     fn clone_box(&self) -> Box<dyn FilterKernel> {
//!         Box::new(self.clone())
//!     }
//! }
//!
//! let mut engine = CpuEngine::new();
//! engine.registry_mut().register(|| Box::new(Invert));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod editor;
pub mod engine;
pub mod filters;
pub mod pipeline;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use instafilter::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{Extent, ImageFormat, ImageValue, Intensity, Value};
    pub use crate::core::param::{Constraint, ParameterDefinition, ParameterRole};
    pub use crate::core::kernel::{BoundParameters, Category, FilterKernel, KernelMetadata};

    // Errors
    pub use crate::core::error::{
        AcquireError, CatalogError, CatalogResult, ConfigError, KernelError, SaveError,
    };

    // Engine
    pub use crate::engine::{CpuEngine, FilterHandle, ImageEngine};
    pub use crate::filters::registry::{FilterRegistry, KernelFactory};

    // Pipeline
    pub use crate::pipeline::{
        FilterCatalog, FilterId, ParameterPolicy, ProcessingPipeline, RenderResult, SessionState,
    };

    // Editor
    pub use crate::config::EditorConfig;
    pub use crate::editor::{
        DirectoryLibrary, Editor, FileImageSource, ImageSource, Intent, IntentSender,
        LogPresenter, Notification, PhotoLibrary, Presenter,
    };

    pub use image::DynamicImage;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "instafilter");
    }

    #[test]
    fn test_every_catalog_filter_is_registered() {
        let engine = CpuEngine::new();
        let catalog = FilterCatalog::new();

        for id in catalog.ids() {
            let handle = catalog.make(&engine, id).unwrap();
            assert_eq!(handle.name(), id.engine_name());
        }
    }

    #[test]
    fn test_end_to_end_twirl() {
        let pipeline = ProcessingPipeline::new(Arc::new(CpuEngine::new()));
        let mut session = SessionState::with_default_filter(
            &pipeline,
            FilterId::TwirlDistortion,
            Intensity::default(),
        );

        let photo = ImageValue::new(DynamicImage::new_rgba8(400, 300));
        let result = session.set_image(&pipeline, photo);

        let image = result.image().unwrap();
        assert_eq!((image.width(), image.height()), (400, 300));
        assert_eq!(
            session.filter().unwrap().parameter(ParameterRole::Center),
            Some(&Value::Vector2(200.0, 150.0))
        );
    }
}
