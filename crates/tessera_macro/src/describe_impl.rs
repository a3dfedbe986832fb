use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DataStruct, DeriveInput, Fields, parse_quote};

use crate::attrs::{
    SchemaAttrs, SerdeContainerAttrs, SerdeFieldAttrs, extract_doc_comment, is_option_type,
    rename_field, strip_raw_prefix,
};

pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let type_name = strip_raw_prefix(&ident.to_string()).to_string();
    let schema_attrs = SchemaAttrs::from_attrs(&input.attrs)?;
    let serde_attrs = SerdeContainerAttrs::from_attrs(&input.attrs)?;

    let mut generics = input.generics.clone();
    let type_params: Vec<_> = generics.type_params().map(|p| p.ident.clone()).collect();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::tessera::Describe));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let type_args = type_params
        .iter()
        .map(|p| quote!(.type_arg(<#p as ::tessera::Describe>::describe())));
    let declared_name = schema_attrs.name.map(|name| quote!(.declared_name(#name)));
    let description = schema_attrs
        .description
        .or_else(|| extract_doc_comment(&input.attrs))
        .map(|doc| quote!(.description(#doc)));

    let builder = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(named),
            ..
        }) => {
            let mut fields = Vec::with_capacity(named.named.len());
            for field in &named.named {
                if let Some(tokens) = field_tokens(field, serde_attrs.rename_all.as_deref())? {
                    fields.push(tokens);
                }
            }
            quote! {
                ::tessera::TypeBuilder::structure(::core::module_path!(), #type_name)
                    #(#type_args)*
                    #declared_name
                    #description
                    #(#fields)*
            }
        }
        Data::Struct(DataStruct {
            fields: Fields::Unnamed(unnamed),
            ..
        }) if unnamed.unnamed.len() == 1 => {
            let inner = &unnamed.unnamed[0].ty;
            quote! {
                ::tessera::TypeBuilder::newtype(
                    ::core::module_path!(),
                    #type_name,
                    <#inner as ::tessera::Describe>::describe(),
                )
                    #(#type_args)*
                    #declared_name
                    #description
            }
        }
        Data::Struct(_) => {
            return Err(syn::Error::new_spanned(
                ident,
                "Describe can only be derived for structs with named fields or single-field tuple structs",
            ));
        }
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                ident,
                "Describe can only be derived for structs",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::tessera::Describe for #ident #ty_generics #where_clause {
            fn describe() -> ::tessera::TypeDescriptor {
                #builder.build()
            }
        }
    })
}

/// `.field(...)` call for one named field, or `None` when serde skips it.
fn field_tokens(field: &syn::Field, rename_all: Option<&str>) -> syn::Result<Option<TokenStream>> {
    let serde_attrs = SerdeFieldAttrs::from_attrs(&field.attrs)?;
    if serde_attrs.skip {
        return Ok(None);
    }
    let schema_attrs = SchemaAttrs::from_attrs(&field.attrs)?;
    if schema_attrs.name.is_some() {
        return Err(syn::Error::new_spanned(
            field,
            "`name` is a type attribute; use `#[serde(rename = \"...\")]` on fields",
        ));
    }
    let Some(ident) = &field.ident else {
        return Err(syn::Error::new_spanned(field, "expected a named field"));
    };

    let json_name = serde_attrs
        .rename
        .unwrap_or_else(|| rename_field(strip_raw_prefix(&ident.to_string()), rename_all));
    let description = schema_attrs
        .description
        .or_else(|| extract_doc_comment(&field.attrs))
        .map(|doc| quote!(.description(#doc)));
    let required = !(serde_attrs.default || is_option_type(&field.ty));
    let ty = &field.ty;

    Ok(Some(quote! {
        .field(
            ::tessera::Field::deferred(#json_name, <#ty as ::tessera::Describe>::describe)
                #description
                .required(#required)
        )
    }))
}
