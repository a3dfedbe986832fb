//! Core of tessera: schema documents, type descriptors, the namer and the
//! registry that ties them together.

pub mod config;
pub mod describe;
pub mod descriptor;
pub mod error;
pub mod hint;
pub mod namer;
pub mod registry;
pub mod schema;

pub use config::RegistryConfig;
pub use describe::Describe;
pub use descriptor::{Field, Primitive, Shape, TypeBuilder, TypeDescriptor};
pub use error::{BuildFailure, Result, SchemaError, TypePath};
pub use hint::NameHint;
pub use namer::{DefaultNamer, SchemaNamer};
pub use registry::Registry;
pub use schema::{Components, Schema, SchemaType};
