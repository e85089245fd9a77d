//! Filter catalog: the filters the editor offers and their engine names.

use crate::core::error::{CatalogError, CatalogResult};
use crate::core::kernel::Category;
use crate::engine::{FilterHandle, ImageEngine};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix shared by every engine filter name.
pub const ENGINE_NAMESPACE: &str = "CI";

/// Identifier of a filter the editor can apply.
///
/// Serialized as its camelCase identifier. Deserialization accepts every
/// spelling [`FromStr`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[allow(missing_docs)]
pub enum FilterId {
    SepiaTone,
    BumpDistortion,
    GaussianBlur,
    Pixellate,
    TwirlDistortion,
    UnsharpMask,
    Vignette,
}

impl FilterId {
    /// Every filter, in menu order.
    pub fn all() -> &'static [FilterId] {
        &[
            FilterId::SepiaTone,
            FilterId::BumpDistortion,
            FilterId::GaussianBlur,
            FilterId::Pixellate,
            FilterId::TwirlDistortion,
            FilterId::UnsharpMask,
            FilterId::Vignette,
        ]
    }

    /// The camelCase identifier.
    pub fn identifier(&self) -> &'static str {
        match self {
            FilterId::SepiaTone => "sepiaTone",
            FilterId::BumpDistortion => "bumpDistortion",
            FilterId::GaussianBlur => "gaussianBlur",
            FilterId::Pixellate => "pixellate",
            FilterId::TwirlDistortion => "twirlDistortion",
            FilterId::UnsharpMask => "unsharpMask",
            FilterId::Vignette => "vignette",
        }
    }

    /// Engine name: the namespace followed by the identifier with its first
    /// letter upper-cased ("twirlDistortion" becomes "CITwirlDistortion").
    pub fn engine_name(&self) -> String {
        let identifier = self.identifier();
        let mut chars = identifier.chars();
        let mut name = String::with_capacity(ENGINE_NAMESPACE.len() + identifier.len());
        name.push_str(ENGINE_NAMESPACE);
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
        name
    }

    /// Reverse of [`FilterId::engine_name`].
    pub fn from_engine_name(name: &str) -> Option<FilterId> {
        Self::all().iter().copied().find(|id| id.engine_name() == name)
    }

    /// Human-readable label for menus.
    pub fn display_name(&self) -> &'static str {
        match self {
            FilterId::SepiaTone => "Sepia Tone",
            FilterId::BumpDistortion => "Bump Distortion",
            FilterId::GaussianBlur => "Gaussian Blur",
            FilterId::Pixellate => "Pixellate",
            FilterId::TwirlDistortion => "Twirl Distortion",
            FilterId::UnsharpMask => "Unsharp Mask",
            FilterId::Vignette => "Vignette",
        }
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for FilterId {
    type Err = CatalogError;

    /// Accepts the camelCase identifier, its snake_case spelling, or the
    /// engine name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s.chars().filter(|c| *c != '_').collect::<String>().to_lowercase();
        FilterId::all()
            .iter()
            .copied()
            .find(|id| {
                id.identifier().to_lowercase() == folded
                    || id.engine_name().to_lowercase() == folded
            })
            .ok_or_else(|| CatalogError::NotFound {
                identifier: s.to_string(),
            })
    }
}

impl TryFrom<String> for FilterId {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FilterId> for String {
    fn from(id: FilterId) -> Self {
        id.identifier().to_string()
    }
}

/// Maps filter identifiers to engine names and instantiates them.
#[derive(Debug, Clone)]
pub struct FilterCatalog {
    names: IndexMap<FilterId, String>,
    categories: Vec<Category>,
}

impl FilterCatalog {
    /// Catalog of every filter, matching every engine category.
    pub fn new() -> Self {
        Self::with_filters(FilterId::all().iter().copied())
    }

    /// Catalog restricted to `ids`.
    pub fn with_filters(ids: impl IntoIterator<Item = FilterId>) -> Self {
        Self {
            names: ids.into_iter().map(|id| (id, id.engine_name())).collect(),
            categories: Vec::new(),
        }
    }

    /// Restrict registry lookups to `categories`; empty means all.
    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    /// Categories used for registry lookups.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Filters in this catalog, in menu order.
    pub fn ids(&self) -> impl Iterator<Item = FilterId> + '_ {
        self.names.keys().copied()
    }

    /// Engine name for `id`.
    pub fn resolve(&self, id: FilterId) -> CatalogResult<&str> {
        self.names
            .get(&id)
            .map(String::as_str)
            .ok_or_else(|| CatalogError::NotFound {
                identifier: id.identifier().to_string(),
            })
    }

    /// Instantiate `id` on `engine`.
    ///
    /// Fails with `Unsupported` when the engine does not register the name
    /// under the catalog's categories, or cannot instantiate it.
    pub fn make(&self, engine: &dyn ImageEngine, id: FilterId) -> CatalogResult<FilterHandle> {
        let name = self.resolve(id)?;

        if !engine.registered_filter_names(&self.categories).contains(name) {
            return Err(CatalogError::Unsupported {
                name: name.to_string(),
            });
        }

        engine.instantiate(name).ok_or_else(|| CatalogError::Unsupported {
            name: name.to_string(),
        })
    }
}

impl Default for FilterCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::param::ParameterRole;
    use crate::engine::CpuEngine;
    use serde::de::value::{Error as ValueError, StrDeserializer};
    use serde::de::IntoDeserializer;

    #[test]
    fn test_engine_names() {
        assert_eq!(FilterId::TwirlDistortion.engine_name(), "CITwirlDistortion");
        assert_eq!(FilterId::SepiaTone.engine_name(), "CISepiaTone");
        assert_eq!(FilterId::Pixellate.engine_name(), "CIPixellate");
        assert_eq!(
            FilterId::from_engine_name("CIUnsharpMask"),
            Some(FilterId::UnsharpMask)
        );
    }

    #[test]
    fn test_parse_identifiers() {
        assert_eq!("gaussianBlur".parse::<FilterId>(), Ok(FilterId::GaussianBlur));
        assert_eq!("gaussian_blur".parse::<FilterId>(), Ok(FilterId::GaussianBlur));
        assert_eq!("CIVignette".parse::<FilterId>(), Ok(FilterId::Vignette));
        assert_eq!(
            "colorInvert".parse::<FilterId>(),
            Err(CatalogError::NotFound {
                identifier: "colorInvert".to_string()
            })
        );
    }

    #[test]
    fn test_serde_uses_identifier_spellings() {
        let input: StrDeserializer<'_, ValueError> = "twirl_distortion".into_deserializer();
        assert_eq!(FilterId::deserialize(input), Ok(FilterId::TwirlDistortion));
        assert_eq!(String::from(FilterId::UnsharpMask), "unsharpMask");
        assert!(FilterId::try_from("colorInvert".to_string()).is_err());
    }

    #[test]
    fn test_every_filter_makes_a_handle() {
        let engine = CpuEngine::new();
        let catalog = FilterCatalog::new();

        for id in catalog.ids() {
            let handle = catalog.make(&engine, id).unwrap();
            assert_eq!(handle.name(), id.engine_name());
            for role in handle.declared_roles() {
                assert!(ParameterRole::all().contains(&role));
            }
        }
    }

    #[test]
    fn test_restricted_catalog_reports_not_found() {
        let catalog = FilterCatalog::with_filters([FilterId::SepiaTone]);
        assert!(catalog.resolve(FilterId::SepiaTone).is_ok());
        assert!(matches!(
            catalog.resolve(FilterId::Vignette),
            Err(CatalogError::NotFound { .. })
        ));
    }

    #[test]
    fn test_unregistered_filter_is_unsupported() {
        let mut engine = CpuEngine::new();
        engine.registry_mut().set_enabled("CIGaussianBlur", false);
        let catalog = FilterCatalog::new();

        assert_eq!(
            catalog.make(&engine, FilterId::GaussianBlur).unwrap_err(),
            CatalogError::Unsupported {
                name: "CIGaussianBlur".to_string()
            }
        );
    }

    #[test]
    fn test_category_restriction() {
        let engine = CpuEngine::new();
        let catalog = FilterCatalog::new().with_categories(vec![Category::Blur]);

        assert!(catalog.make(&engine, FilterId::GaussianBlur).is_ok());
        assert!(matches!(
            catalog.make(&engine, FilterId::TwirlDistortion),
            Err(CatalogError::Unsupported { .. })
        ));
    }
}
