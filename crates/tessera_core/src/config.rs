//! Registry configuration

use serde::{Deserialize, Serialize};

/// Default prefix of `$ref` paths.
pub const DEFAULT_REF_PREFIX: &str = "#/components/schemas";

/// Settings fixed when a [`Registry`](crate::registry::Registry) is created.
///
/// Deserializable so it can live in an application's config file; missing
/// keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RegistryConfig {
    /// Prefix joined with the canonical name to form a `$ref` path
    pub ref_prefix: String,
    /// Register named primitives once and reference them at every use site
    pub ref_for_named_primitives: bool,
    /// Longest alias chain followed before reporting a cycle
    pub max_alias_hops: usize,
    /// Deepest nesting decomposed before giving up
    pub max_depth: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            ref_prefix: DEFAULT_REF_PREFIX.to_string(),
            ref_for_named_primitives: false,
            max_alias_hops: 16,
            max_depth: 32,
        }
    }
}

impl RegistryConfig {
    #[must_use]
    pub fn with_ref_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ref_prefix = prefix.into();
        self
    }

    #[must_use]
    pub const fn with_ref_for_named_primitives(mut self, enabled: bool) -> Self {
        self.ref_for_named_primitives = enabled;
        self
    }

    #[must_use]
    pub const fn with_max_alias_hops(mut self, hops: usize) -> Self {
        self.max_alias_hops = hops;
        self
    }

    #[must_use]
    pub const fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
