use proc_macro2::{TokenStream, TokenTree};
use quote::{format_ident, quote, ToTokens};
use syn::{GenericArgument, Generics, Ident, LitStr, Path, PathArguments, Type};

use crate::util::extend_where;

/// Value category a union variant's payload type maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum VariantCategory {
    Boolean,
    Integral,
    Floating,
    Text,
    Binary,
    Array,
    Map,
}

impl VariantCategory {
    pub(crate) const COUNT: usize = 7;

    pub(crate) fn idx(self) -> usize {
        match self {
            VariantCategory::Boolean => 0,
            VariantCategory::Integral => 1,
            VariantCategory::Floating => 2,
            VariantCategory::Text => 3,
            VariantCategory::Binary => 4,
            VariantCategory::Array => 5,
            VariantCategory::Map => 6,
        }
    }

    pub(crate) fn to_category_ts(self) -> TokenStream {
        match self {
            VariantCategory::Boolean => quote!(::cbor_kit::Category::Boolean),
            VariantCategory::Integral => quote!(::cbor_kit::Category::Integral),
            VariantCategory::Floating => quote!(::cbor_kit::Category::Floating),
            VariantCategory::Text => quote!(::cbor_kit::Category::Text),
            VariantCategory::Binary => quote!(::cbor_kit::Category::Binary),
            VariantCategory::Array => quote!(::cbor_kit::Category::Array),
            VariantCategory::Map => quote!(::cbor_kit::Category::Map),
        }
    }
}

fn single_type_arg<'a>(ty: &'a Type, outer: &str) -> Option<&'a Type> {
    let Type::Path(tp) = ty else { return None };
    let seg = tp.path.segments.last()?;
    if seg.ident != outer {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    let mut iter = args.args.iter();
    let Some(GenericArgument::Type(inner)) = iter.next() else {
        return None;
    };
    if iter.next().is_some() {
        return None;
    }
    Some(inner)
}

pub(crate) fn type_is_ident(ty: &Type, name: &str) -> bool {
    let Type::Path(tp) = ty else { return false };
    let Some(seg) = tp.path.segments.last() else {
        return false;
    };
    seg.ident == name
}

fn path_might_be_self(path: &Path, self_ident: &Ident) -> bool {
    let Some(last) = path.segments.last() else {
        return false;
    };
    if last.ident != *self_ident {
        return false;
    }
    if path.segments.len() == 1 {
        return true;
    }
    path.segments
        .iter()
        .take(path.segments.len() - 1)
        .all(|seg| matches!(seg.ident.to_string().as_str(), "crate" | "self" | "super"))
}

/// Whether `ty` may name the type being derived, in which case no where-bound is emitted for it.
pub(crate) fn type_mentions_self(ty: &Type, self_ident: &Ident) -> bool {
    match ty {
        Type::Path(tp) => {
            if tp.qself.is_none() && path_might_be_self(&tp.path, self_ident) {
                return true;
            }
            if let Some(q) = &tp.qself {
                if type_mentions_self(&q.ty, self_ident) {
                    return true;
                }
            }
            tp.path.segments.iter().any(|seg| match &seg.arguments {
                PathArguments::AngleBracketed(args) => args.args.iter().any(|arg| match arg {
                    GenericArgument::Type(inner) => type_mentions_self(inner, self_ident),
                    _ => false,
                }),
                _ => false,
            })
        }
        Type::Reference(tr) => type_mentions_self(&tr.elem, self_ident),
        Type::Tuple(tt) => tt.elems.iter().any(|t| type_mentions_self(t, self_ident)),
        Type::Array(ta) => type_mentions_self(&ta.elem, self_ident),
        Type::Slice(ts) => type_mentions_self(&ts.elem, self_ident),
        Type::Group(tg) => type_mentions_self(&tg.elem, self_ident),
        Type::Paren(tp) => type_mentions_self(&tp.elem, self_ident),
        _ => false,
    }
}

/// Category of a scalar or container payload type, or `None` for records that need `Kind`.
pub(crate) fn type_category(ty: &Type) -> Option<VariantCategory> {
    match ty {
        Type::Reference(tr) => type_category(&tr.elem),
        Type::Group(tg) => type_category(&tg.elem),
        Type::Paren(tp) => type_category(&tp.elem),
        Type::Slice(ts) => {
            if type_is_ident(&ts.elem, "u8") {
                Some(VariantCategory::Binary)
            } else {
                Some(VariantCategory::Array)
            }
        }
        Type::Path(tp) => {
            let seg = tp.path.segments.last()?;
            match seg.ident.to_string().as_str() {
                "bool" => Some(VariantCategory::Boolean),
                "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64"
                | "usize" => Some(VariantCategory::Integral),
                "f32" | "f64" => Some(VariantCategory::Floating),
                "String" | "str" => Some(VariantCategory::Text),
                "MapEntries" | "BTreeMap" | "HashMap" => Some(VariantCategory::Map),
                "Box" => type_category(single_type_arg(ty, "Box")?),
                "Vec" => {
                    let inner = single_type_arg(ty, "Vec")?;
                    if type_is_ident(inner, "u8") {
                        Some(VariantCategory::Binary)
                    } else {
                        Some(VariantCategory::Array)
                    }
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// One variant of a kind-tagged union: `Variant(Payload)`.
pub(crate) struct UnionVariant<'a> {
    pub(crate) ident: &'a Ident,
    pub(crate) ty: &'a Type,
    /// `None` for record payloads, which are told apart by their `Kind` tag.
    pub(crate) category: Option<VariantCategory>,
}

fn tokens_name_self(tokens: TokenStream) -> bool {
    tokens.into_iter().any(|tt| match tt {
        TokenTree::Ident(ident) => ident == "Self",
        TokenTree::Group(group) => tokens_name_self(group.stream()),
        _ => false,
    })
}

/// Assertion that the union's record variants carry pairwise distinct kind tags.
///
/// Returns the item to emit next to the impl and a statement that forces evaluation from inside
/// the generated method. Non-generic unions get a free `const _` checked at definition; generic
/// ones get an inherent const named after `derive`, checked once the method is monomorphized.
pub(crate) fn kind_check(
    name: &Ident,
    generics: &Generics,
    variants: &[UnionVariant<'_>],
    derive: &str,
) -> (TokenStream, TokenStream) {
    let records: Vec<&UnionVariant<'_>> =
        variants.iter().filter(|v| v.category.is_none()).collect();

    let mut asserts = Vec::new();
    for (i, a) in records.iter().enumerate() {
        for b in &records[i + 1..] {
            let (ta, tb) = (a.ty, b.ty);
            let msg = LitStr::new(
                &format!(
                    "`{name}::{}` and `{name}::{}` share a kind tag",
                    a.ident, b.ident
                ),
                a.ident.span(),
            );
            asserts.push(quote! {
                assert!(
                    !::cbor_kit::__private::same_kind(
                        <#ta as ::cbor_kit::Kind>::KIND_KEY,
                        <#ta as ::cbor_kit::Kind>::KIND,
                        <#tb as ::cbor_kit::Kind>::KIND_KEY,
                        <#tb as ::cbor_kit::Kind>::KIND,
                    ),
                    #msg
                );
            });
        }
    }
    if asserts.is_empty() {
        return (quote!(), quote!());
    }

    let eager = generics.params.is_empty()
        && !records
            .iter()
            .any(|v| tokens_name_self(v.ty.to_token_stream()));
    if eager {
        return (quote! { const _: () = { #(#asserts)* }; }, quote!());
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let bounds = records
        .iter()
        .filter(|v| !type_mentions_self(v.ty, name))
        .map(|v| (v.ty, quote!(::cbor_kit::Kind)))
        .collect();
    let check_where_clause = extend_where(where_clause, bounds);
    let check = format_ident!("__CBOR_KIT_{}_KIND_CHECK", derive);
    (
        quote! {
            impl #impl_generics #name #ty_generics #check_where_clause {
                #[doc(hidden)]
                const #check: () = { #(#asserts)* };
            }
        },
        quote! {
            #[allow(clippy::let_unit_value)]
            let () = Self::#check;
        },
    )
}

pub(crate) enum EnumShape<'a> {
    /// Every variant is a unit variant.
    Fieldless,
    /// Every variant wraps exactly one payload.
    Union(Vec<UnionVariant<'a>>),
}

pub(crate) fn enum_shape(data: &syn::DataEnum) -> syn::Result<EnumShape<'_>> {
    use syn::spanned::Spanned;
    use syn::Fields;

    if data.variants.is_empty() {
        return Err(syn::Error::new(
            data.enum_token.span(),
            "cannot map an enum without variants",
        ));
    }
    if data
        .variants
        .iter()
        .all(|v| matches!(v.fields, Fields::Unit))
    {
        return Ok(EnumShape::Fieldless);
    }

    let mut seen: [Option<&Ident>; VariantCategory::COUNT] = [None; VariantCategory::COUNT];
    let mut out = Vec::new();
    for variant in &data.variants {
        let Fields::Unnamed(fields) = &variant.fields else {
            return Err(syn::Error::new(
                variant.span(),
                "enum variants must be all unit variants or all single-field tuple variants",
            ));
        };
        let Some(field) = fields.unnamed.first().filter(|_| fields.unnamed.len() == 1) else {
            return Err(syn::Error::new(
                variant.span(),
                "union variants must wrap exactly one field",
            ));
        };
        crate::attrs::ensure_no_cbor_attrs(&variant.attrs, "union variants")?;
        crate::attrs::ensure_no_cbor_attrs(&field.attrs, "union variant fields")?;

        let category = type_category(&field.ty);
        if let Some(cat) = category {
            if let Some(prev) = seen[cat.idx()] {
                return Err(syn::Error::new(
                    variant.span(),
                    format!("union variants `{prev}` and `{}` map to the same category", variant.ident),
                ));
            }
            seen[cat.idx()] = Some(&variant.ident);
        }
        out.push(UnionVariant {
            ident: &variant.ident,
            ty: &field.ty,
            category,
        });
    }
    Ok(EnumShape::Union(out))
}
