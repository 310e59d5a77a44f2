use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemStruct;

/// A derived record can itself be a field: flattened when embedded, refused
/// as a plain column.
pub(crate) fn column_trait(item: &ItemStruct) -> TokenStream {
    let name = &item.ident;
    quote! {
        impl ::rowbind::Column for #name {
            fn kind() -> ::rowbind::FieldKind {
                ::rowbind::FieldKind::Embedded(<Self as ::rowbind::Record>::RECORD_TYPE)
            }
            fn to_field(&self) -> ::rowbind::Result<::rowbind::FieldValue> {
                Err(::rowbind::Error::UnsupportedStructColumn {
                    column: ::std::string::String::new(),
                })
            }
            fn from_field(_value: ::rowbind::FieldValue) -> ::rowbind::Result<Self> {
                Err(::rowbind::Error::UnsupportedStructColumn {
                    column: ::std::string::String::new(),
                })
            }
            fn read_nested(&self, path: &[usize]) -> ::rowbind::Result<::rowbind::FieldValue> {
                <Self as ::rowbind::Record>::read(self, path)
            }
            fn write_nested(
                &mut self,
                path: &[usize],
                value: ::rowbind::FieldValue,
            ) -> ::rowbind::Result<()> {
                <Self as ::rowbind::Record>::write(self, path, value)
            }
        }
    }
}
