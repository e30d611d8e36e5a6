//! FromRow derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Field, Fields, Ident, Result};

/// How a field is filled from the row
enum Source {
    /// Required column
    Column,
    /// Column that falls back to `Default` when absent or NULL
    ColumnOrDefault,
    /// Never read
    Skip,
}

struct FieldConfig {
    ident: Ident,
    /// Column name to read (may be renamed)
    column_name: String,
    source: Source,
    ty: syn::Type,
}

fn parse_field_config(field: &Field) -> Result<FieldConfig> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new(field.span(), "tuple structs are not supported"))?;

    let mut column_name = ident.to_string();
    let mut source = Source::Column;

    for attr in &field.attrs {
        if attr.path().is_ident("schemagen") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value = meta.value()?;
                    let lit: syn::LitStr = value.parse()?;
                    column_name = lit.value();
                } else if meta.path.is_ident("skip") {
                    source = Source::Skip;
                } else if meta.path.is_ident("default") {
                    if !matches!(source, Source::Skip) {
                        source = Source::ColumnOrDefault;
                    }
                } else {
                    return Err(meta.error(format!(
                        "unknown schemagen attribute `{}`",
                        meta.path
                            .get_ident()
                            .map(|i| i.to_string())
                            .unwrap_or_default()
                    )));
                }
                Ok(())
            })?;
        }
    }

    Ok(FieldConfig {
        ident,
        column_name,
        source,
        ty: field.ty.clone(),
    })
}

pub fn derive_from_row_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return Err(Error::new(input.span(), "only named fields are supported")),
        },
        _ => return Err(Error::new(input.span(), "only structs are supported")),
    };

    let field_configs: Vec<FieldConfig> = fields
        .iter()
        .map(parse_field_config)
        .collect::<Result<Vec<_>>>()?;

    let field_extractions: Vec<TokenStream> = field_configs
        .iter()
        .map(|config| {
            let field_ident = &config.ident;
            let column_name = &config.column_name;
            let ty = &config.ty;

            match config.source {
                Source::Skip => quote! {
                    #field_ident: <#ty as std::default::Default>::default()
                },
                Source::Column => quote! {
                    #field_ident: schemagen::RowExt::get::<#ty>(row, #column_name)?
                },
                Source::ColumnOrDefault => quote! {
                    #field_ident: match schemagen::RowExt::get::<Option<#ty>>(row, #column_name) {
                        Ok(value) => value.unwrap_or_default(),
                        Err(schemagen::Error::ColumnNotFound(_)) => {
                            <#ty as std::default::Default>::default()
                        }
                        Err(e) => return Err(e),
                    }
                },
            }
        })
        .collect();

    let column_names: Vec<&str> = field_configs
        .iter()
        .filter(|c| !matches!(c.source, Source::Skip))
        .map(|c| c.column_name.as_str())
        .collect();

    let expanded = quote! {
        impl #impl_generics schemagen::FromRow for #name #ty_generics #where_clause {
            fn from_row<R: schemagen::Row>(row: &R) -> schemagen::Result<Self> {
                Ok(Self {
                    #(#field_extractions),*
                })
            }

            fn column_names() -> &'static [&'static str] {
                &[#(#column_names),*]
            }
        }
    };

    Ok(expanded)
}
