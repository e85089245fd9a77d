//! Filter-parameter mapping and application pipeline.
//!
//! - [`catalog`]: supported filters and their engine names
//! - [`policy`]: how the intensity value drives declared parameters
//! - [`render`]: bind, render and report
//! - [`session`]: state carried between user events

pub mod catalog;
pub mod policy;
pub mod render;
pub mod session;

pub use catalog::{FilterCatalog, FilterId};
pub use policy::ParameterPolicy;
pub use render::{ProcessingPipeline, RenderResult};
pub use session::SessionState;
