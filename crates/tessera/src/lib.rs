//! Tessera - named, deduplicated JSON schemas for Rust types
//!
//! Types describe themselves through [`Describe`] (usually derived), and a
//! [`Registry`] turns those descriptions into schemas. Named types are stored
//! once under `#/components/schemas/{Name}` and referenced everywhere else.
//!
//! ```
//! use tessera::{Describe, Registry};
//!
//! #[derive(Describe)]
//! struct Page<T> {
//!     items: Vec<T>,
//!     next: Option<String>,
//! }
//!
//! #[derive(Describe)]
//! struct User {
//!     name: String,
//! }
//!
//! let registry = Registry::default();
//! let page = registry.schema(&Page::<User>::describe(), false, None).unwrap();
//! assert_eq!(page.ref_path.as_deref(), Some("#/components/schemas/PageUser"));
//!
//! // the stored document behind the reference
//! let stored = registry.schema_from_type(&Page::<User>::describe()).unwrap();
//! assert!(stored.ref_path.is_none());
//! assert_eq!(registry.schema_from_ref("#/components/schemas/PageUser"), Some(stored));
//! assert!(registry.schema_from_ref("#/components/schemas/User").is_some());
//! ```

// Re-export tessera_core so users don't need to depend on it directly
pub mod schema {
    pub use tessera_core::schema::*;
}

pub mod descriptor {
    pub use tessera_core::descriptor::*;
}

pub mod error {
    pub use tessera_core::error::*;
}

pub mod config {
    pub use tessera_core::config::*;
}

pub use tessera_core::{
    BuildFailure, Components, DefaultNamer, Describe, Field, NameHint, Primitive, Registry,
    RegistryConfig, Result, Schema, SchemaError, SchemaNamer, SchemaType, Shape, TypeBuilder,
    TypeDescriptor, TypePath,
};

// Derive macro, same name as the trait
pub use tessera_macro::Describe;

// Re-export serde_json for rendering components
pub use serde_json;
