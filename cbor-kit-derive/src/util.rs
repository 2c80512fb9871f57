use proc_macro2::TokenStream;
use syn::ext::IdentExt;
use syn::{parse_quote, Ident, LitStr, Type, WhereClause, WherePredicate};

pub(crate) fn add_where_bound(wc: &mut WhereClause, ty: &Type, bound: TokenStream) {
    let pred: WherePredicate = parse_quote!(#ty: #bound);
    wc.predicates.push(pred);
}

/// Extend the item's own where clause with `(type, bound)` pairs.
pub(crate) fn extend_where(
    base: Option<&WhereClause>,
    bounds: Vec<(&Type, TokenStream)>,
) -> Option<WhereClause> {
    let mut out = base.cloned();
    if !bounds.is_empty() {
        let wc = out.get_or_insert_with(|| WhereClause {
            where_token: Default::default(),
            predicates: Default::default(),
        });
        for (ty, bound) in bounds {
            add_where_bound(wc, ty, bound);
        }
    }
    out
}

/// Wire name of an identifier: the rename if present, else the identifier without `r#`.
pub(crate) fn wire_name(rename: Option<LitStr>, ident: &Ident) -> LitStr {
    rename.unwrap_or_else(|| LitStr::new(&ident.unraw().to_string(), ident.span()))
}
