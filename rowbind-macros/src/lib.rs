mod column_trait;
mod decode_field;
mod record_trait;

use column_trait::column_trait;
use decode_field::decode_field;
use proc_macro::TokenStream;
use quote::quote;
use record_trait::record_trait;
use syn::{Fields, ItemStruct, parse_macro_input};

/// Implements `Record` and `Column` for a struct with named fields.
///
/// Fields are mapped with `#[db("name[,flag]*[,key:value]*")]`. A bare
/// `#[db]` flattens the columns of an embedded record into this one. Fields
/// without the attribute are not stored.
#[proc_macro_derive(Record, attributes(db))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    if !item.generics.params.is_empty() {
        return syn::Error::new_spanned(&item.generics, "Record cannot be derived for generic types")
            .to_compile_error()
            .into();
    }
    let Fields::Named(named) = &item.fields else {
        return syn::Error::new_spanned(&item, "Record can only be derived for structs with named fields")
            .to_compile_error()
            .into();
    };
    let fields = match named
        .named
        .iter()
        .filter_map(|f| decode_field(f).transpose())
        .collect::<syn::Result<Vec<_>>>()
    {
        Ok(v) => v,
        Err(e) => return e.to_compile_error().into(),
    };
    let record = record_trait(&item, &fields);
    let column = column_trait(&item);
    quote! {
        #record
        #column
    }
    .into()
}
