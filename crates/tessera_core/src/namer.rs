//! Canonical schema names for type descriptors.

use crate::{
    descriptor::{Shape, TypeDescriptor},
    hint::{NameHint, capitalize_first},
};

/// Maps a type descriptor to the name its schema is registered under.
///
/// Returning `None` means the type cannot be named, typically an anonymous
/// type without a hint; the registry reports it as a build failure.
pub trait SchemaNamer: Send + Sync {
    fn name(&self, ty: &TypeDescriptor, hint: Option<&NameHint>) -> Option<String>;
}

impl<F> SchemaNamer for F
where
    F: Fn(&TypeDescriptor, Option<&NameHint>) -> Option<String> + Send + Sync,
{
    fn name(&self, ty: &TypeDescriptor, hint: Option<&NameHint>) -> Option<String> {
        self(ty, hint)
    }
}

/// Default naming rules.
///
/// - pointers are transparent;
/// - a declared name is used verbatim;
/// - primitives use fixed names (`Int64`, `String`, `Time`, ...);
/// - unnamed lists are `List` + element, unnamed maps `Map` + key + value;
/// - named types are their capitalized name followed by the names of their
///   type arguments, so nested generics flatten into one identifier;
/// - anything left without a name falls back to the hint.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNamer;

impl SchemaNamer for DefaultNamer {
    fn name(&self, ty: &TypeDescriptor, hint: Option<&NameHint>) -> Option<String> {
        structural_name(ty).or_else(|| {
            hint.filter(|h| !h.is_empty())
                .map(NameHint::to_name)
        })
    }
}

fn structural_name(ty: &TypeDescriptor) -> Option<String> {
    let ty = ty.strip_pointers();
    if let Some(declared) = ty.declared_name() {
        return Some(declared.to_string());
    }
    if ty.name().is_empty() {
        return match ty.shape() {
            Shape::Primitive(primitive) => Some(primitive.schema_name().to_string()),
            Shape::List(element) => Some(format!("List{}", structural_name(element)?)),
            Shape::Map { key, value } => Some(format!(
                "Map{}{}",
                structural_name(key)?,
                structural_name(value)?
            )),
            Shape::Pointer(_) | Shape::Struct(_) | Shape::Opaque => None,
        };
    }

    let mut name = capitalize_first(ty.name());
    for arg in ty.type_args() {
        name.push_str(&structural_name(arg)?);
    }
    Some(name)
}
