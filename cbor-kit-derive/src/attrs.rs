use proc_macro2::Span;
use syn::{spanned::Spanned, Attribute, LitStr, Path};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ConverterKind {
    String,
    Binary,
    Value,
}

#[derive(Clone)]
pub(crate) struct Converter {
    pub(crate) kind: ConverterKind,
    pub(crate) path: Path,
}

#[derive(Default, Clone)]
pub(crate) struct FieldAttr {
    pub(crate) rename: Option<LitStr>,
    pub(crate) skip: bool,
    pub(crate) skip_if: Option<Path>,
    pub(crate) required: bool,
    pub(crate) converter: Option<Converter>,
}

#[derive(Default, Clone)]
pub(crate) struct VariantAttr {
    pub(crate) rename: Option<LitStr>,
}

#[derive(Default, Clone)]
pub(crate) struct StructAttr {
    pub(crate) kind: Option<LitStr>,
    pub(crate) kind_key: Option<LitStr>,
}

pub(crate) fn ensure_no_cbor_attrs(attrs: &[Attribute], ctx: &str) -> syn::Result<()> {
    for a in attrs {
        if a.path().is_ident("cbor") {
            return Err(syn::Error::new(
                a.span(),
                format!("`#[cbor(...)]` is not supported on {ctx}"),
            ));
        }
    }
    Ok(())
}

fn set_converter(
    out: &mut FieldAttr,
    meta: &syn::meta::ParseNestedMeta<'_>,
    kind: ConverterKind,
) -> syn::Result<()> {
    if out.converter.is_some() {
        return Err(meta.error("a field takes at most one converter"));
    }
    let lit: LitStr = meta.value()?.parse()?;
    out.converter = Some(Converter {
        kind,
        path: lit.parse()?,
    });
    Ok(())
}

pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttr> {
    let mut out = FieldAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("cbor") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                if out.skip {
                    return Err(meta.error("duplicate `cbor(skip)`"));
                }
                out.skip = true;
                return Ok(());
            }
            if meta.path.is_ident("required") {
                if out.required {
                    return Err(meta.error("duplicate `cbor(required)`"));
                }
                out.required = true;
                return Ok(());
            }
            if meta.path.is_ident("rename") {
                if out.rename.is_some() {
                    return Err(meta.error("duplicate `cbor(rename=...)`"));
                }
                out.rename = Some(meta.value()?.parse()?);
                return Ok(());
            }
            if meta.path.is_ident("skip_if") {
                if out.skip_if.is_some() {
                    return Err(meta.error("duplicate `cbor(skip_if=...)`"));
                }
                let lit: LitStr = meta.value()?.parse()?;
                out.skip_if = Some(lit.parse()?);
                return Ok(());
            }
            if meta.path.is_ident("with_string") {
                return set_converter(&mut out, &meta, ConverterKind::String);
            }
            if meta.path.is_ident("with_binary") {
                return set_converter(&mut out, &meta, ConverterKind::Binary);
            }
            if meta.path.is_ident("with") {
                return set_converter(&mut out, &meta, ConverterKind::Value);
            }
            Err(meta.error(
                "unsupported `cbor(...)` field attribute (allowed: rename, skip, skip_if, \
                 required, with_string, with_binary, with)",
            ))
        })?;
    }

    if out.skip
        && (out.rename.is_some()
            || out.required
            || out.skip_if.is_some()
            || out.converter.is_some())
    {
        return Err(syn::Error::new(
            Span::call_site(),
            "`cbor(skip)` cannot be combined with other field attributes",
        ));
    }

    Ok(out)
}

pub(crate) fn parse_variant_attrs(attrs: &[Attribute]) -> syn::Result<VariantAttr> {
    let mut out = VariantAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("cbor") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if out.rename.is_some() {
                    return Err(meta.error("duplicate `cbor(rename=...)` on variant"));
                }
                out.rename = Some(meta.value()?.parse()?);
                return Ok(());
            }
            Err(meta.error("unsupported `cbor(...)` variant attribute (allowed: rename)"))
        })?;
    }
    Ok(out)
}

pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttr> {
    let mut out = StructAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("cbor") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("kind") {
                if out.kind.is_some() {
                    return Err(meta.error("duplicate `cbor(kind=...)`"));
                }
                out.kind = Some(meta.value()?.parse()?);
                return Ok(());
            }
            if meta.path.is_ident("kind_key") {
                if out.kind_key.is_some() {
                    return Err(meta.error("duplicate `cbor(kind_key=...)`"));
                }
                out.kind_key = Some(meta.value()?.parse()?);
                return Ok(());
            }
            Err(meta.error("unsupported `cbor(...)` struct attribute (allowed: kind, kind_key)"))
        })?;
    }

    if out.kind.is_none() {
        if let Some(key) = &out.kind_key {
            return Err(syn::Error::new(
                key.span(),
                "`cbor(kind_key=...)` requires `cbor(kind=...)`",
            ));
        }
    }

    Ok(out)
}
