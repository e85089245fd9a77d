//! Processing pipeline: bind, render, report.

use crate::core::error::CatalogResult;
use crate::core::types::{ImageValue, Intensity};
use crate::engine::{FilterHandle, ImageEngine};
use crate::pipeline::catalog::{FilterCatalog, FilterId};
use crate::pipeline::policy::ParameterPolicy;
use std::sync::Arc;

/// Outcome of one render.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderResult {
    /// A displayable image.
    Image(ImageValue),
    /// Nothing to show: a precondition was missing or the engine produced no
    /// output. The previous display stays as it is.
    None,
}

impl RenderResult {
    /// The rendered image, if any.
    pub fn image(&self) -> Option<&ImageValue> {
        match self {
            RenderResult::Image(image) => Some(image),
            RenderResult::None => None,
        }
    }

    /// Consume into the rendered image, if any.
    pub fn into_image(self) -> Option<ImageValue> {
        match self {
            RenderResult::Image(image) => Some(image),
            RenderResult::None => None,
        }
    }

    /// Whether an image was produced.
    pub fn is_image(&self) -> bool {
        matches!(self, RenderResult::Image(_))
    }
}

/// Combines the engine, the catalog and the binding policy.
#[derive(Clone)]
pub struct ProcessingPipeline {
    engine: Arc<dyn ImageEngine>,
    catalog: FilterCatalog,
    policy: ParameterPolicy,
}

impl ProcessingPipeline {
    /// Pipeline over `engine` with the full catalog and standard policy.
    pub fn new(engine: Arc<dyn ImageEngine>) -> Self {
        Self {
            engine,
            catalog: FilterCatalog::new(),
            policy: ParameterPolicy::new(),
        }
    }

    /// Replace the catalog.
    pub fn with_catalog(mut self, catalog: FilterCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the policy.
    pub fn with_policy(mut self, policy: ParameterPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The engine renders go through.
    pub fn engine(&self) -> &dyn ImageEngine {
        self.engine.as_ref()
    }

    /// The filter catalog.
    pub fn catalog(&self) -> &FilterCatalog {
        &self.catalog
    }

    /// The binding policy.
    pub fn policy(&self) -> &ParameterPolicy {
        &self.policy
    }

    /// Instantiate `id` through the catalog.
    pub fn make_filter(&self, id: FilterId) -> CatalogResult<FilterHandle> {
        self.catalog.make(self.engine.as_ref(), id)
    }

    /// Bind `image` and `intensity` into `handle` and render its full output.
    ///
    /// Mutates only the handle's bound parameters.
    pub fn render(
        &self,
        handle: &mut FilterHandle,
        image: &ImageValue,
        intensity: Intensity,
    ) -> RenderResult {
        self.policy.apply(handle, image, intensity);

        let Some(extent) = handle.output_extent() else {
            log::debug!("{}: no output extent", handle.name());
            return RenderResult::None;
        };

        match self.engine.render(handle, extent) {
            Some(output) => {
                log::debug!(
                    "{}: rendered {}x{} at intensity {}",
                    handle.name(),
                    output.width(),
                    output.height(),
                    intensity
                );
                RenderResult::Image(output)
            }
            None => {
                log::debug!("{}: engine produced no output", handle.name());
                RenderResult::None
            }
        }
    }
}

impl Default for ProcessingPipeline {
    fn default() -> Self {
        Self::new(Arc::new(crate::engine::CpuEngine::new()))
    }
}
