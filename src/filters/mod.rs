//! Filter module.
//!
//! Contains the kernel registry and the built-in kernel implementations.

pub mod registry;
pub mod builtin;

pub use registry::{FilterRegistry, KernelFactory};
