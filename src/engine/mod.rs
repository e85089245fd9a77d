//! Image-processing engine seam.
//!
//! The editing pipeline only talks to an engine through [`ImageEngine`]:
//! list registered filter names, instantiate one by name, and render a bound
//! handle. [`CpuEngine`] is the built-in implementation backed by the filter
//! registry.

pub mod cpu;
pub mod handle;

use crate::core::kernel::Category;
use crate::core::types::{Extent, ImageValue};
use indexmap::IndexSet;

pub use cpu::CpuEngine;
pub use handle::FilterHandle;

/// An image-processing engine that owns all pixel computation.
pub trait ImageEngine: Send + Sync {
    /// Names of the filters registered under any of `categories`.
    ///
    /// An empty category slice selects every registered filter.
    fn registered_filter_names(&self, categories: &[Category]) -> IndexSet<String>;

    /// Instantiate a filter by engine name.
    fn instantiate(&self, name: &str) -> Option<FilterHandle>;

    /// Render a bound filter over `extent`. `None` means the engine produced
    /// no output for the current bindings.
    fn render(&self, handle: &FilterHandle, extent: Extent) -> Option<ImageValue>;
}
