use crate::decode_field::FieldMetadata;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemStruct;

pub(crate) fn record_trait(item: &ItemStruct, fields: &[FieldMetadata]) -> TokenStream {
    let name = &item.ident;
    let name_str = name.to_string();
    let defs = fields.iter().map(|f| {
        let field_name = f.ident.to_string();
        let ty = &f.ty;
        let tag = match &f.tag {
            Some(v) => quote!(Some(#v)),
            None => quote!(None),
        };
        let kind = if f.json {
            quote!(::rowbind::FieldKind::Opaque)
        } else {
            quote!(<#ty as ::rowbind::Column>::kind())
        };
        quote! {
            ::rowbind::FieldDef {
                name: #field_name,
                tag: #tag,
                kind: #kind,
            }
        }
    });
    let read = fields.iter().enumerate().map(|(i, f)| {
        let ident = &f.ident;
        if f.json {
            quote!([#i] => ::rowbind::FieldValue::to_json(&self.#ident),)
        } else {
            quote! {
                [#i] => ::rowbind::Column::to_field(&self.#ident),
                [#i, rest @ ..] => ::rowbind::Column::read_nested(&self.#ident, rest),
            }
        }
    });
    let write = fields.iter().enumerate().map(|(i, f)| {
        let ident = &f.ident;
        if f.json {
            quote! {
                [#i] => {
                    self.#ident = ::rowbind::FieldValue::from_json(value)?;
                    Ok(())
                }
            }
        } else {
            quote! {
                [#i] => {
                    self.#ident = ::rowbind::Column::from_field(value)?;
                    Ok(())
                }
                [#i, rest @ ..] => ::rowbind::Column::write_nested(&mut self.#ident, rest, value),
            }
        }
    });
    quote! {
        impl ::rowbind::Record for #name {
            const RECORD_TYPE: ::rowbind::RecordType = ::rowbind::RecordType {
                name: #name_str,
                type_id: ::std::any::TypeId::of::<#name>,
                fields: {
                    fn fields() -> &'static [::rowbind::FieldDef] {
                        static FIELDS: ::std::sync::LazyLock<::std::vec::Vec<::rowbind::FieldDef>> =
                            ::std::sync::LazyLock::new(|| ::std::vec![#(#defs),*]);
                        FIELDS.as_slice()
                    }
                    fields
                },
            };

            fn read(&self, path: &[usize]) -> ::rowbind::Result<::rowbind::FieldValue> {
                match path {
                    #(#read)*
                    _ => Err(::rowbind::Error::InvalidFieldPath {
                        record: #name_str,
                        path: path.to_vec(),
                    }),
                }
            }

            fn write(&mut self, path: &[usize], value: ::rowbind::FieldValue) -> ::rowbind::Result<()> {
                match path {
                    #(#write)*
                    _ => Err(::rowbind::Error::InvalidFieldPath {
                        record: #name_str,
                        path: path.to_vec(),
                    }),
                }
            }
        }
    }
}
