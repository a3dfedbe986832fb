//! Attribute extraction for `#[derive(Describe)]`.
//!
//! Reads `#[schema(...)]`, the subset of `#[serde(...)]` that changes the
//! shape of the serialized data, and doc comments.

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use syn::{Attribute, Expr, ExprLit, Lit, LitStr, Type, meta::ParseNestedMeta};

/// Collect `///` doc lines into one description.
pub fn extract_doc_comment(attrs: &[Attribute]) -> Option<String> {
    let mut doc_lines = Vec::new();

    for attr in attrs {
        if attr.path().is_ident("doc")
            && let syn::Meta::NameValue(meta_nv) = &attr.meta
            && let Expr::Lit(ExprLit {
                lit: Lit::Str(lit_str),
                ..
            }) = &meta_nv.value
        {
            let line = lit_str.value();
            // rustdoc keeps the space after `///`
            let trimmed = line.strip_prefix(' ').unwrap_or(&line);
            doc_lines.push(trimmed.to_string());
        }
    }

    if doc_lines.is_empty() {
        None
    } else {
        Some(doc_lines.join("\n").trim().to_string())
    }
}

/// Strips the `r#` prefix from raw identifiers.
pub fn strip_raw_prefix(ident: &str) -> &str {
    ident.strip_prefix("r#").unwrap_or(ident)
}

pub fn is_option_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|s| s.ident == "Option"),
        _ => false,
    }
}

/// Apply a serde `rename_all` rule to a field identifier.
pub fn rename_field(field_name: &str, rename_all: Option<&str>) -> String {
    match rename_all {
        Some("lowercase") => field_name.to_lowercase(),
        Some("UPPERCASE") => field_name.to_uppercase(),
        Some("PascalCase") => field_name.to_upper_camel_case(),
        Some("camelCase") => field_name.to_lower_camel_case(),
        Some("snake_case") => field_name.to_snake_case(),
        Some("SCREAMING_SNAKE_CASE") => field_name.to_shouty_snake_case(),
        Some("kebab-case") => field_name.to_kebab_case(),
        Some("SCREAMING-KEBAB-CASE") => field_name.to_shouty_kebab_case(),
        _ => field_name.to_string(),
    }
}

/// Consume the value or argument list of a nested meta item we do not use.
fn skip_meta_value(meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let _content;
        syn::parenthesized!(_content in meta.input);
    }
    Ok(())
}

/// `#[schema(name = "...", description = "...")]`
#[derive(Debug, Default)]
pub struct SchemaAttrs {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl SchemaAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("schema")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    out.name = Some(lit.value());
                } else if meta.path.is_ident("description") {
                    let lit: LitStr = meta.value()?.parse()?;
                    out.description = Some(lit.value());
                } else {
                    return Err(meta.error("unknown schema attribute, expected `name` or `description`"));
                }
                Ok(())
            })?;
        }
        Ok(out)
    }
}

/// Container-level `#[serde(...)]` keys
#[derive(Debug, Default)]
pub struct SerdeContainerAttrs {
    pub rename_all: Option<String>,
}

impl SerdeContainerAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    let lit: LitStr = meta.value()?.parse()?;
                    out.rename_all = Some(lit.value());
                    Ok(())
                } else {
                    skip_meta_value(&meta)
                }
            })?;
        }
        Ok(out)
    }
}

/// Field-level `#[serde(...)]` keys
#[derive(Debug, Default)]
pub struct SerdeFieldAttrs {
    pub rename: Option<String>,
    pub skip: bool,
    pub default: bool,
}

impl SerdeFieldAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let lit: LitStr = meta.value()?.parse()?;
                    out.rename = Some(lit.value());
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    out.skip = true;
                    Ok(())
                } else if meta.path.is_ident("default") {
                    out.default = true;
                    skip_meta_value(&meta)
                } else {
                    skip_meta_value(&meta)
                }
            })?;
        }
        Ok(out)
    }
}
