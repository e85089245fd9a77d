//! Error types for instafilter.
//!
//! Uses thiserror for structured errors. None of these are fatal to an
//! editing session: the editor recovers from each of them locally.

use thiserror::Error;

/// Errors resolving or instantiating a filter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The identifier names no filter in the catalog.
    #[error("Filter '{identifier}' not found in catalog")]
    NotFound {
        /// Identifier as given
        identifier: String,
    },

    /// The engine does not register, or cannot instantiate, the filter.
    #[error("Filter '{name}' is not supported by the engine")]
    Unsupported {
        /// Engine name that was looked up
        name: String,
    },
}

/// Errors raised by a kernel while computing its output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// No image is bound to the kernel's input.
    #[error("Kernel '{kernel}' has no input image bound")]
    MissingImage {
        /// Engine name of the kernel
        kernel: String,
    },

    /// A parameter holds a value of the wrong kind.
    #[error("Parameter '{key}' has the wrong type")]
    WrongType {
        /// Engine key of the parameter
        key: &'static str,
    },
}

/// Errors starting an image acquisition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcquireError {
    /// Another request has not completed yet.
    #[error("An image request is already in flight")]
    AlreadyPending,

    /// The source cannot supply images right now.
    #[error("Image source unavailable: {0}")]
    Unavailable(String),
}

/// Errors persisting an image to the library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    /// Writing the image failed.
    #[error("Could not write {path}: {reason}")]
    Write {
        /// Target that was written
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// The library cannot accept images right now.
    #[error("Photo library unavailable: {0}")]
    Unavailable(String),
}

/// Errors loading the editor configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Read {
        /// File that was read
        path: String,
        /// I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration.
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Error Utilities
// ============================================================================

impl CatalogError {
    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            CatalogError::NotFound { .. } => {
                Some("Run 'list' to see the available filters".to_string())
            }
            CatalogError::Unsupported { name } => Some(format!(
                "Check that '{}' is enabled and its category is configured",
                name
            )),
        }
    }
}

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
