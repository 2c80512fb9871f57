//! Derive macros for `cbor-kit`.
//!
//! - `#[derive(ToValue)]` also emits `ArrayElem`, `Record` for structs with named fields, and
//!   `Kind` when the struct carries `#[cbor(kind = "...")]`.
//! - `#[derive(FromValue)]` emits the inverse mapping.

extern crate proc_macro;

mod attrs;
mod decode;
mod encode;
mod types;
mod util;

use proc_macro::TokenStream;
use syn::{parse_macro_input, Data, DeriveInput};

use crate::attrs::ensure_no_cbor_attrs;
use crate::decode::{decode_enum, decode_struct};
use crate::encode::{encode_enum, encode_struct};

#[proc_macro_derive(ToValue, attributes(cbor))]
pub fn derive_to_value(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = match &input.data {
        Data::Struct(data) => encode_struct(&input.ident, &input.generics, &input.attrs, data),
        Data::Enum(data) => ensure_no_cbor_attrs(&input.attrs, "enums")
            .and_then(|()| encode_enum(&input.ident, &input.generics, data)),
        Data::Union(u) => Err(syn::Error::new(
            u.union_token.span,
            "ToValue cannot be derived for unions",
        )),
    };
    TokenStream::from(out.unwrap_or_else(syn::Error::into_compile_error))
}

#[proc_macro_derive(FromValue, attributes(cbor))]
pub fn derive_from_value(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = match &input.data {
        Data::Struct(data) => decode_struct(&input.ident, &input.generics, data),
        Data::Enum(data) => decode_enum(&input.ident, &input.generics, data),
        Data::Union(u) => Err(syn::Error::new(
            u.union_token.span,
            "FromValue cannot be derived for unions",
        )),
    };
    TokenStream::from(out.unwrap_or_else(syn::Error::into_compile_error))
}
