#![warn(missing_docs)]

//! Crate containing procedural macros used by the polled OPC-UA stack.

mod encoding;
mod utils;

use encoding::{generate_encoding_impl, EncodingToImpl};
use proc_macro::TokenStream;
use syn::parse_macro_input;

#[proc_macro_derive(BinaryEncodable, attributes(opcua))]
/// Derive the `BinaryEncodable` trait on this struct, creating code
/// to write the struct to an OPC-UA binary stream.
///
/// All fields must be marked with `opcua(ignore)` or implement `BinaryEncodable`.
pub fn derive_binary_encodable(item: TokenStream) -> TokenStream {
    match generate_encoding_impl(parse_macro_input!(item), EncodingToImpl::BinaryEncode) {
        Ok(r) => r.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

#[proc_macro_derive(BinaryDecodable, attributes(opcua))]
/// Derive the `BinaryDecodable` trait on this struct, creating code
/// to read the struct from an OPC-UA binary stream.
///
/// All fields must be marked with `opcua(ignore)` or implement `BinaryDecodable`.
pub fn derive_binary_decodable(item: TokenStream) -> TokenStream {
    match generate_encoding_impl(parse_macro_input!(item), EncodingToImpl::BinaryDecode) {
        Ok(r) => r.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
