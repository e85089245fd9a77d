//! CPU engine backed by the filter registry.

use crate::core::kernel::Category;
use crate::core::types::{Extent, ImageValue};
use crate::engine::{FilterHandle, ImageEngine};
use crate::filters::registry::FilterRegistry;
use image::GenericImageView;
use indexmap::IndexSet;

/// Renders filters on the CPU using the kernels in a [`FilterRegistry`].
pub struct CpuEngine {
    registry: FilterRegistry,
}

impl CpuEngine {
    /// Engine with the built-in kernels registered.
    pub fn new() -> Self {
        Self::with_registry(FilterRegistry::with_builtins())
    }

    /// Engine over a custom registry.
    pub fn with_registry(registry: FilterRegistry) -> Self {
        Self { registry }
    }

    /// The backing registry.
    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    /// Mutable access to the backing registry.
    pub fn registry_mut(&mut self) -> &mut FilterRegistry {
        &mut self.registry
    }
}

impl Default for CpuEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageEngine for CpuEngine {
    fn registered_filter_names(&self, categories: &[Category]) -> IndexSet<String> {
        self.registry.names_in_categories(categories)
    }

    fn instantiate(&self, name: &str) -> Option<FilterHandle> {
        self.registry.create(name).map(FilterHandle::new)
    }

    fn render(&self, handle: &FilterHandle, extent: Extent) -> Option<ImageValue> {
        if extent.is_empty() {
            log::debug!("{}: empty extent, nothing to render", handle.name());
            return None;
        }

        let output = match handle.kernel().apply(handle.parameters()) {
            Ok(output) => output,
            Err(e) => {
                log::warn!("{}: render failed: {}", handle.name(), e);
                return None;
            }
        };

        let bounds = extent.clamp_to(output.width(), output.height());
        if bounds.is_empty() {
            return None;
        }
        let full = bounds.x == 0
            && bounds.y == 0
            && bounds.width == output.width()
            && bounds.height == output.height();
        let output = if full {
            output
        } else {
            output
                .view(bounds.x, bounds.y, bounds.width, bounds.height)
                .to_image()
                .into()
        };

        Some(ImageValue::new(output))
    }
}
