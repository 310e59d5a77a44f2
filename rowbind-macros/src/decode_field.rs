use rowbind_core::parse_tag;
use syn::{Field, Ident, LitStr, Meta, Type};

pub(crate) struct FieldMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) tag: Option<String>,
    pub(crate) json: bool,
}

/// Reads the `#[db]` attribute of a field, `None` when the field has none.
pub(crate) fn decode_field(field: &Field) -> syn::Result<Option<FieldMetadata>> {
    let Some(attr) = field.attrs.iter().find(|v| v.path().is_ident("db")) else {
        return Ok(None);
    };
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new_spanned(field, "Expected a named field"))?;
    let tag = match &attr.meta {
        Meta::Path(..) => None,
        Meta::List(..) => Some(attr.parse_args::<LitStr>()?.value()),
        Meta::NameValue(..) => {
            return Err(syn::Error::new_spanned(
                attr,
                "Expected #[db] or #[db(\"name,flags\")]",
            ));
        }
    };
    let json = match &tag {
        Some(tag) => {
            parse_tag(tag)
                .map_err(|e| syn::Error::new_spanned(attr, e.to_string()))?
                .json
        }
        None => false,
    };
    Ok(Some(FieldMetadata {
        ident,
        ty: field.ty.clone(),
        tag,
        json,
    }))
}
