//! Filter registry for managing the kernels an engine can instantiate.

use crate::core::kernel::{Category, FilterKernel, KernelMetadata};
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;

/// Factory function for creating kernel instances.
pub type KernelFactory = Arc<dyn Fn() -> Box<dyn FilterKernel> + Send + Sync>;

/// Registry entry containing metadata and factory.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Factory function to create instances.
    pub factory: KernelFactory,
    /// Cached metadata (avoids creating instance just to get metadata).
    pub metadata: KernelMetadata,
    /// Whether this filter is enabled.
    pub enabled: bool,
}

/// Registry for all available kernels, keyed by engine name.
pub struct FilterRegistry {
    filters: IndexMap<String, RegistryEntry>,
}

impl FilterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            filters: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with built-in kernels.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::filters::builtin::register_all(&mut registry);
        registry
    }

    /// Register a kernel type. Re-registering a name replaces the entry.
    pub fn register<F>(&mut self, factory: F)
    where
        F: Fn() -> Box<dyn FilterKernel> + Send + Sync + 'static,
    {
        // Create a temporary instance to get metadata
        let instance = factory();
        let metadata = instance.metadata();
        let name = metadata.name.clone();

        let entry = RegistryEntry {
            factory: Arc::new(factory),
            metadata,
            enabled: true,
        };

        if self.filters.insert(name.clone(), entry).is_some() {
            log::debug!("Replaced registered kernel {}", name);
        }
    }

    /// Create a new instance of a kernel by name. Disabled entries yield None.
    pub fn create(&self, name: &str) -> Option<Box<dyn FilterKernel>> {
        self.filters.get(name).filter(|e| e.enabled).map(|e| (e.factory)())
    }

    /// Get metadata for a kernel without creating an instance.
    pub fn get_metadata(&self, name: &str) -> Option<&KernelMetadata> {
        self.filters.get(name).map(|e| &e.metadata)
    }

    /// Check if a kernel is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Names of enabled kernels in any of `categories`; all of them if empty.
    pub fn names_in_categories(&self, categories: &[Category]) -> IndexSet<String> {
        self.filters
            .iter()
            .filter(|(_, entry)| entry.enabled)
            .filter(|(_, entry)| {
                categories.is_empty() || categories.contains(&entry.metadata.category)
            })
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Enable or disable a kernel.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        if let Some(entry) = self.filters.get_mut(name) {
            entry.enabled = enabled;
            true
        } else {
            false
        }
    }

    /// Get the total number of registered kernels.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Get enabled kernels grouped by category for display.
    pub fn grouped_by_category(&self) -> IndexMap<Category, Vec<&KernelMetadata>> {
        let mut grouped: IndexMap<Category, Vec<&KernelMetadata>> = IndexMap::new();

        for entry in self.filters.values() {
            if entry.enabled {
                grouped
                    .entry(entry.metadata.category)
                    .or_default()
                    .push(&entry.metadata);
            }
        }

        for kernels in grouped.values_mut() {
            kernels.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        }

        grouped
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::IdentityKernel;

    #[test]
    fn test_register_and_create() {
        let mut registry = FilterRegistry::new();
        registry.register(|| Box::new(IdentityKernel));

        assert!(registry.contains("CIIdentity"));
        assert!(registry.create("CIIdentity").is_some());
        assert!(registry.create("CIMissing").is_none());
    }

    #[test]
    fn test_builtins_registered() {
        let registry = FilterRegistry::with_builtins();
        assert_eq!(registry.len(), 7);
        for name in [
            "CISepiaTone",
            "CIBumpDistortion",
            "CIGaussianBlur",
            "CIPixellate",
            "CITwirlDistortion",
            "CIUnsharpMask",
            "CIVignette",
        ] {
            assert!(registry.contains(name), "{} missing", name);
        }
    }

    #[test]
    fn test_category_filtering() {
        let registry = FilterRegistry::with_builtins();

        let all = registry.names_in_categories(&[]);
        assert_eq!(all.len(), 7);

        let distortions = registry.names_in_categories(&[Category::Distortion]);
        assert!(distortions.contains("CITwirlDistortion"));
        assert!(distortions.contains("CIBumpDistortion"));
        assert!(!distortions.contains("CIGaussianBlur"));

        let blurs = registry.names_in_categories(&[Category::Blur, Category::Sharpen]);
        assert_eq!(
            blurs.into_iter().collect::<Vec<_>>(),
            vec!["CIGaussianBlur".to_string(), "CIUnsharpMask".to_string()]
        );
    }

    #[test]
    fn test_enable_disable() {
        let mut registry = FilterRegistry::with_builtins();

        registry.set_enabled("CIVignette", false);
        assert!(registry.create("CIVignette").is_none());
        assert!(!registry.names_in_categories(&[]).contains("CIVignette"));

        registry.set_enabled("CIVignette", true);
        assert!(registry.create("CIVignette").is_some());
        assert!(!registry.set_enabled("CIMissing", true));
    }

    #[test]
    fn test_reregister_replaces_entry() {
        let mut registry = FilterRegistry::with_builtins();
        registry.register(|| Box::new(IdentityKernel));
        registry.register(|| Box::new(IdentityKernel));

        assert_eq!(registry.len(), 8);
        let grouped = registry.grouped_by_category();
        assert_eq!(grouped[&Category::Custom].len(), 1);
        assert_eq!(grouped[&Category::Distortion].len(), 2);
    }
}
