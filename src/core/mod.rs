//! Core types and traits for the instafilter editing core.
//!
//! This module contains the foundational types shared by the engine and the
//! editing pipeline:
//! - Value types (images, scalars, points)
//! - Parameter roles and definitions
//! - The kernel trait and metadata
//! - Error types

pub mod types;
pub mod param;
pub mod error;
pub mod kernel;

// Re-export commonly used types
pub use types::{Extent, ImageFormat, ImageMetadata, ImageValue, Intensity, Value};
pub use param::{Constraint, ParameterDefinition, ParameterRole};
pub use error::{AcquireError, CatalogError, ConfigError, KernelError, SaveError};
pub use kernel::{BoundParameters, Category, FilterKernel, KernelMetadata};
