use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataEnum, DataStruct, Fields, Generics, Ident, LitStr};

use crate::attrs::{ensure_no_cbor_attrs, parse_field_attrs, parse_variant_attrs, ConverterKind};
use crate::types::{enum_shape, kind_check, type_mentions_self, EnumShape, UnionVariant};
use crate::util::{extend_where, wire_name};

pub(crate) fn decode_struct(
    name: &Ident,
    generics: &Generics,
    data: &DataStruct,
) -> syn::Result<TokenStream> {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let type_name = LitStr::new(&name.to_string(), name.span());

    match &data.fields {
        Fields::Named(fields) => {
            let mut inits = Vec::new();
            let mut bounds = Vec::new();

            for field in &fields.named {
                let attr = parse_field_attrs(&field.attrs)?;
                let Some(ident) = &field.ident else {
                    continue;
                };
                let ty = &field.ty;
                let mentions_self = type_mentions_self(ty, name);

                if attr.skip {
                    if !mentions_self {
                        bounds.push((ty, quote!(::core::default::Default)));
                    }
                    inits.push(quote! { #ident: ::core::default::Default::default(), });
                    continue;
                }

                let key = wire_name(attr.rename, ident);
                let decode_ts = match &attr.converter {
                    None => {
                        if !mentions_self {
                            bounds.push((ty, quote!(::cbor_kit::FromValue)));
                        }
                        quote!(<#ty as ::cbor_kit::FromValue>::from_value(v))
                    }
                    Some(c) => {
                        let path = &c.path;
                        match c.kind {
                            ConverterKind::String => quote! {
                                ::cbor_kit::__private::expect_text(v)
                                    .and_then(<#path as ::cbor_kit::StringConverter<#ty>>::from_string)
                            },
                            ConverterKind::Binary => quote! {
                                ::cbor_kit::__private::expect_bytes(v)
                                    .and_then(<#path as ::cbor_kit::BinaryConverter<#ty>>::from_binary)
                            },
                            ConverterKind::Value => quote! {
                                <#path as ::cbor_kit::ValueConverter<#ty>>::from_value(v)
                            },
                        }
                    }
                };

                let absent = if attr.required {
                    quote! {
                        return ::core::result::Result::Err(
                            ::cbor_kit::__private::missing_field(#type_name, #key),
                        )
                    }
                } else {
                    if !mentions_self {
                        bounds.push((ty, quote!(::core::default::Default)));
                    }
                    quote!(::core::default::Default::default())
                };

                inits.push(quote! {
                    #ident: match map.get_str(#key) {
                        ::core::option::Option::Some(v) => {
                            #decode_ts.map_err(|e| e.with_key(#key))?
                        }
                        ::core::option::Option::None => #absent,
                    },
                });
            }

            let decode_where_clause = extend_where(where_clause, bounds);

            Ok(quote! {
                impl #impl_generics ::cbor_kit::FromValue for #name #ty_generics #decode_where_clause {
                    fn from_value(value: &::cbor_kit::Value) -> ::core::result::Result<Self, ::cbor_kit::CborError> {
                        let map = ::cbor_kit::__private::expect_map(value)?;
                        ::core::result::Result::Ok(Self {
                            #(#inits)*
                        })
                    }
                }
            })
        }

        Fields::Unnamed(fields) => {
            let mut items = Vec::new();
            let mut bounds = Vec::new();

            for (idx, field) in fields.unnamed.iter().enumerate() {
                ensure_no_cbor_attrs(&field.attrs, "tuple struct fields")?;
                let ty = &field.ty;
                if !type_mentions_self(ty, name) {
                    bounds.push((ty, quote!(::cbor_kit::FromValue)));
                }
                items.push(quote! { <#ty as ::cbor_kit::FromValue>::from_value(&items[#idx])? });
            }

            let len = items.len();
            let decode_where_clause = extend_where(where_clause, bounds);

            Ok(quote! {
                impl #impl_generics ::cbor_kit::FromValue for #name #ty_generics #decode_where_clause {
                    fn from_value(value: &::cbor_kit::Value) -> ::core::result::Result<Self, ::cbor_kit::CborError> {
                        let items = ::cbor_kit::__private::expect_array(value, #len)?.as_slice();
                        ::core::result::Result::Ok(Self(#(#items),*))
                    }
                }
            })
        }

        Fields::Unit => Ok(quote! {
            impl #impl_generics ::cbor_kit::FromValue for #name #ty_generics #where_clause {
                fn from_value(value: &::cbor_kit::Value) -> ::core::result::Result<Self, ::cbor_kit::CborError> {
                    <() as ::cbor_kit::FromValue>::from_value(value)?;
                    ::core::result::Result::Ok(Self)
                }
            }
        }),
    }
}

pub(crate) fn decode_enum(
    name: &Ident,
    generics: &Generics,
    data: &DataEnum,
) -> syn::Result<TokenStream> {
    match enum_shape(data)? {
        EnumShape::Fieldless => decode_fieldless(name, generics, data),
        EnumShape::Union(variants) => Ok(decode_union(name, generics, &variants)),
    }
}

fn decode_fieldless(
    name: &Ident,
    generics: &Generics,
    data: &DataEnum,
) -> syn::Result<TokenStream> {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let type_name = LitStr::new(&name.to_string(), name.span());

    let mut arms = Vec::new();
    for variant in &data.variants {
        let v_attr = parse_variant_attrs(&variant.attrs)?;
        let vname = wire_name(v_attr.rename, &variant.ident);
        let ident = &variant.ident;
        arms.push(quote! { #vname => ::core::result::Result::Ok(Self::#ident) });
    }

    Ok(quote! {
        impl #impl_generics ::cbor_kit::FromValue for #name #ty_generics #where_clause {
            fn from_value(value: &::cbor_kit::Value) -> ::core::result::Result<Self, ::cbor_kit::CborError> {
                match ::cbor_kit::__private::expect_text(value)? {
                    #(#arms,)*
                    other => ::core::result::Result::Err(
                        ::cbor_kit::__private::unknown_variant(#type_name, other),
                    ),
                }
            }
        }
    })
}

fn decode_union(name: &Ident, generics: &Generics, variants: &[UnionVariant<'_>]) -> TokenStream {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let type_name = LitStr::new(&name.to_string(), name.span());

    let mut kind_checks = Vec::new();
    let mut arms = Vec::new();
    let mut bounds = Vec::new();

    for variant in variants {
        let ident = variant.ident;
        let ty = variant.ty;
        let is_self = type_mentions_self(ty, name);
        if !is_self {
            bounds.push((ty, quote!(::cbor_kit::FromValue)));
        }

        match variant.category {
            Some(cat) => {
                let cat_ts = cat.to_category_ts();
                arms.push(quote! {
                    #cat_ts => <#ty as ::cbor_kit::FromValue>::from_value(value).map(Self::#ident)
                });
            }
            None => {
                if !is_self {
                    bounds.push((ty, quote!(::cbor_kit::Kind)));
                }
                kind_checks.push(quote! {
                    if ::cbor_kit::__private::has_kind(
                        map,
                        <#ty as ::cbor_kit::Kind>::KIND_KEY,
                        <#ty as ::cbor_kit::Kind>::KIND,
                    ) {
                        return <#ty as ::cbor_kit::FromValue>::from_value(value).map(Self::#ident);
                    }
                });
            }
        }
    }

    let by_kind = if kind_checks.is_empty() {
        quote!()
    } else {
        quote! {
            if let ::cbor_kit::Value::Map(map) = value {
                #(#kind_checks)*
            }
        }
    };

    let decode_where_clause = extend_where(where_clause, bounds);
    let (kind_assert, kind_assert_use) = kind_check(name, generics, variants, "DECODE");

    quote! {
        #kind_assert

        impl #impl_generics ::cbor_kit::FromValue for #name #ty_generics #decode_where_clause {
            fn from_value(value: &::cbor_kit::Value) -> ::core::result::Result<Self, ::cbor_kit::CborError> {
                #kind_assert_use
                #by_kind
                match value.category() {
                    #(#arms,)*
                    _ => ::core::result::Result::Err(
                        ::cbor_kit::__private::unresolvable_union(#type_name),
                    ),
                }
            }
        }
    }
}
