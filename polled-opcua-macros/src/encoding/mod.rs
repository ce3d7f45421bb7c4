use attribute::EncodingFieldAttribute;
use binary::{generate_binary_decode_impl, generate_binary_encode_impl};
use proc_macro2::TokenStream;
use syn::DeriveInput;

use crate::utils::{EmptyAttribute, StructItem};

mod attribute;
mod binary;

pub(crate) type EncodingStruct = StructItem<EncodingFieldAttribute, EmptyAttribute>;

pub(crate) fn parse_encoding_input(input: DeriveInput) -> syn::Result<EncodingStruct> {
    EncodingStruct::from_input(input)
}

pub enum EncodingToImpl {
    BinaryEncode,
    BinaryDecode,
}

pub fn generate_encoding_impl(
    input: DeriveInput,
    target: EncodingToImpl,
) -> syn::Result<TokenStream> {
    let input = parse_encoding_input(input)?;

    match target {
        EncodingToImpl::BinaryEncode => generate_binary_encode_impl(input),
        EncodingToImpl::BinaryDecode => generate_binary_decode_impl(input),
    }
}
