use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Attribute, DataEnum, DataStruct, Fields, Generics, Ident};

use crate::attrs::{
    ensure_no_cbor_attrs, parse_field_attrs, parse_struct_attrs, parse_variant_attrs,
    ConverterKind,
};
use crate::types::{enum_shape, kind_check, type_mentions_self, EnumShape, UnionVariant};
use crate::util::{extend_where, wire_name};

fn converter_kind_ts(kind: Option<ConverterKind>) -> TokenStream {
    match kind {
        None => quote!(::core::option::Option::None),
        Some(ConverterKind::String) => {
            quote!(::core::option::Option::Some(::cbor_kit::ConverterKind::String))
        }
        Some(ConverterKind::Binary) => {
            quote!(::core::option::Option::Some(::cbor_kit::ConverterKind::Binary))
        }
        Some(ConverterKind::Value) => {
            quote!(::core::option::Option::Some(::cbor_kit::ConverterKind::Value))
        }
    }
}

pub(crate) fn encode_struct(
    name: &Ident,
    generics: &Generics,
    attrs: &[Attribute],
    data: &DataStruct,
) -> syn::Result<TokenStream> {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let s_attr = parse_struct_attrs(attrs)?;

    match &data.fields {
        Fields::Named(fields) => {
            let mut entries = Vec::new();
            let mut infos = Vec::new();
            let mut bounds = Vec::new();

            for field in &fields.named {
                let attr = parse_field_attrs(&field.attrs)?;
                let Some(ident) = &field.ident else {
                    continue;
                };
                let ty = &field.ty;
                let key = wire_name(attr.rename.clone(), ident);
                let field_name = ident.unraw().to_string();
                let skip = attr.skip;
                let skip_if = attr.skip_if.is_some();
                let required = attr.required;
                let converter = converter_kind_ts(attr.converter.as_ref().map(|c| c.kind));
                infos.push(quote! {
                    ::cbor_kit::FieldInfo {
                        name: #field_name,
                        key: #key,
                        skip: #skip,
                        skip_if: #skip_if,
                        required: #required,
                        converter: #converter,
                    }
                });

                if attr.skip {
                    continue;
                }

                let value_ts = match &attr.converter {
                    None => {
                        if !type_mentions_self(ty, name) {
                            bounds.push((ty, quote!(::cbor_kit::ToValue)));
                        }
                        quote!(::cbor_kit::ToValue::to_value(&self.#ident, ctx))
                    }
                    Some(c) => {
                        let path = &c.path;
                        match c.kind {
                            ConverterKind::String => quote! {
                                ctx.text(&<#path as ::cbor_kit::StringConverter<#ty>>::to_string(&self.#ident))
                            },
                            ConverterKind::Binary => quote! {
                                ctx.bytes(&<#path as ::cbor_kit::BinaryConverter<#ty>>::to_binary(&self.#ident))
                            },
                            ConverterKind::Value => quote! {
                                <#path as ::cbor_kit::ValueConverter<#ty>>::to_value(&self.#ident, ctx)
                            },
                        }
                    }
                };

                let push = quote! { m.push(ctx.text(#key), #value_ts); };
                entries.push(match &attr.skip_if {
                    Some(pred) => quote! {
                        if !#pred(&self.#ident) {
                            #push
                        }
                    },
                    None => push,
                });
            }

            let len = entries.len();
            let map_binding = if entries.is_empty() {
                quote!(let m)
            } else {
                quote!(let mut m)
            };
            let encode_where_clause = extend_where(where_clause, bounds);

            let kind_impl = s_attr.kind.as_ref().map(|kind| {
                let key = s_attr
                    .kind_key
                    .as_ref()
                    .map_or_else(|| quote!(::cbor_kit::DEFAULT_KIND_KEY), |k| quote!(#k));
                quote! {
                    impl #impl_generics ::cbor_kit::Kind for #name #ty_generics #where_clause {
                        const KIND_KEY: &'static str = #key;
                        const KIND: &'static str = #kind;
                    }
                }
            });

            Ok(quote! {
                impl #impl_generics ::cbor_kit::ToValue for #name #ty_generics #encode_where_clause {
                    fn to_value(&self, ctx: &::cbor_kit::Context) -> ::cbor_kit::Value {
                        #map_binding = ctx.map_with_capacity(#len);
                        #(#entries)*
                        ::cbor_kit::Value::Map(m)
                    }
                }

                impl #impl_generics ::cbor_kit::Record for #name #ty_generics #where_clause {
                    const FIELDS: &'static [::cbor_kit::FieldInfo] = &[#(#infos),*];
                }

                impl #impl_generics ::cbor_kit::ArrayElem for #name #ty_generics #where_clause {}

                #kind_impl
            })
        }

        Fields::Unnamed(fields) => {
            if let Some(kind) = &s_attr.kind {
                return Err(syn::Error::new(
                    kind.span(),
                    "`cbor(kind=...)` requires a struct with named fields",
                ));
            }
            let mut items = Vec::new();
            let mut bounds = Vec::new();

            for (idx, field) in fields.unnamed.iter().enumerate() {
                ensure_no_cbor_attrs(&field.attrs, "tuple struct fields")?;
                let index = syn::Index::from(idx);

                if !type_mentions_self(&field.ty, name) {
                    bounds.push((&field.ty, quote!(::cbor_kit::ToValue)));
                }

                items.push(quote! { a.push(::cbor_kit::ToValue::to_value(&self.#index, ctx)); });
            }

            let len = items.len();
            let encode_where_clause = extend_where(where_clause, bounds);

            Ok(quote! {
                impl #impl_generics ::cbor_kit::ToValue for #name #ty_generics #encode_where_clause {
                    fn to_value(&self, ctx: &::cbor_kit::Context) -> ::cbor_kit::Value {
                        let mut a = ctx.array_with_capacity(#len);
                        #(#items)*
                        ::cbor_kit::Value::Array(a)
                    }
                }

                impl #impl_generics ::cbor_kit::ArrayElem for #name #ty_generics #where_clause {}
            })
        }

        Fields::Unit => {
            if let Some(kind) = &s_attr.kind {
                return Err(syn::Error::new(
                    kind.span(),
                    "`cbor(kind=...)` requires a struct with named fields",
                ));
            }
            Ok(quote! {
                impl #impl_generics ::cbor_kit::ToValue for #name #ty_generics #where_clause {
                    fn to_value(&self, _ctx: &::cbor_kit::Context) -> ::cbor_kit::Value {
                        ::cbor_kit::Value::Null
                    }
                }

                impl #impl_generics ::cbor_kit::ArrayElem for #name #ty_generics #where_clause {}
            })
        }
    }
}

pub(crate) fn encode_enum(
    name: &Ident,
    generics: &Generics,
    data: &DataEnum,
) -> syn::Result<TokenStream> {
    match enum_shape(data)? {
        EnumShape::Fieldless => encode_fieldless(name, generics, data),
        EnumShape::Union(variants) => Ok(encode_union(name, generics, &variants)),
    }
}

fn encode_fieldless(
    name: &Ident,
    generics: &Generics,
    data: &DataEnum,
) -> syn::Result<TokenStream> {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut arms = Vec::new();
    for variant in &data.variants {
        let v_attr = parse_variant_attrs(&variant.attrs)?;
        let vname = wire_name(v_attr.rename, &variant.ident);
        let ident = &variant.ident;
        arms.push(quote! { Self::#ident => ctx.text(#vname) });
    }

    Ok(quote! {
        impl #impl_generics ::cbor_kit::ToValue for #name #ty_generics #where_clause {
            fn to_value(&self, ctx: &::cbor_kit::Context) -> ::cbor_kit::Value {
                match self { #(#arms),* }
            }
        }

        impl #impl_generics ::cbor_kit::ArrayElem for #name #ty_generics #where_clause {}
    })
}

fn encode_union(name: &Ident, generics: &Generics, variants: &[UnionVariant<'_>]) -> TokenStream {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut arms = Vec::new();
    let mut bounds = Vec::new();
    let v0 = format_ident!("v0");

    for variant in variants {
        let ident = variant.ident;
        let ty = variant.ty;
        let is_self = type_mentions_self(ty, name);
        if !is_self {
            bounds.push((ty, quote!(::cbor_kit::ToValue)));
        }

        if variant.category.is_some() {
            arms.push(quote! {
                Self::#ident(#v0) => ::cbor_kit::ToValue::to_value(#v0, ctx)
            });
            continue;
        }

        if !is_self {
            bounds.push((ty, quote!(::cbor_kit::Kind)));
        }
        arms.push(quote! {
            Self::#ident(#v0) => {
                let mut out = ::cbor_kit::ToValue::to_value(#v0, ctx);
                ::cbor_kit::__private::prefix_kind(
                    ctx,
                    &mut out,
                    <#ty as ::cbor_kit::Kind>::KIND_KEY,
                    <#ty as ::cbor_kit::Kind>::KIND,
                );
                out
            }
        });
    }

    let (kind_assert, kind_assert_use) = kind_check(name, generics, variants, "ENCODE");

    let encode_where_clause = extend_where(where_clause, bounds);

    quote! {
        #kind_assert

        impl #impl_generics ::cbor_kit::ToValue for #name #ty_generics #encode_where_clause {
            fn to_value(&self, ctx: &::cbor_kit::Context) -> ::cbor_kit::Value {
                #kind_assert_use
                match self { #(#arms),* }
            }
        }

        impl #impl_generics ::cbor_kit::ArrayElem for #name #ty_generics #where_clause {}
    }
}
