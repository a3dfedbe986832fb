mod attrs;
mod describe_impl;

use proc_macro::TokenStream;

/// Derive macro for `tessera::Describe`
///
/// Supported on structs with named fields and on single-field tuple structs
/// (newtypes). Recognised attributes:
///
/// - `#[schema(name = "...")]` on the type: schema name used verbatim
/// - `#[schema(description = "...")]` on the type or a field; doc comments
///   are used when absent
/// - `#[serde(rename_all = "...")]`, `#[serde(rename = "...")]`,
///   `#[serde(skip)]` and `#[serde(default)]`
///
/// `Option<T>` fields and `#[serde(default)]` fields are not required.
#[proc_macro_derive(Describe, attributes(schema))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    describe_impl::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
