//! Derive macros for schemagen
//!
//! Provides `FromRow`, which maps catalog rows onto plain structs. The macro
//! is re-exported from the `schemagen` crate, so users typically don't need
//! to depend on this crate directly.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod from_row;

/// Derive macro for mapping catalog rows to Rust structs.
///
/// This macro generates an implementation of the `FromRow` trait.
///
/// # Attributes
///
/// - `#[schemagen(rename = "column_name")]` - Read a differently named column
/// - `#[schemagen(skip)]` - Don't read this field; use `Default`
/// - `#[schemagen(default)]` - Use `Default` when the column is missing or NULL
///
/// # Example
///
/// ```ignore
/// use schemagen::FromRow;
///
/// #[derive(FromRow)]
/// pub struct ColumnRow {
///     #[schemagen(rename = "COLUMN_NAME")]
///     pub name: String,
///     pub is_nullable: bool,
///     #[schemagen(default)]
///     pub column_comment: String,
/// }
/// ```
#[proc_macro_derive(FromRow, attributes(schemagen))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::derive_from_row_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
