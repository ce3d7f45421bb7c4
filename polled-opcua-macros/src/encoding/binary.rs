use proc_macro2::TokenStream;
use quote::quote;

use super::EncodingStruct;

pub fn generate_binary_encode_impl(strct: EncodingStruct) -> syn::Result<TokenStream> {
    let mut byte_len_body = quote! {};
    let mut encode_body = quote! {};

    for field in strct.fields {
        if field.attr.ignore {
            continue;
        }

        let ident = field.ident;
        byte_len_body.extend(quote! {
            size += opcua::types::BinaryEncodable::byte_len(&self.#ident);
        });
        encode_body.extend(quote! {
            opcua::types::BinaryEncodable::encode(&self.#ident, stream)?;
        });
    }
    let ident = strct.ident;

    Ok(quote! {
        impl opcua::types::BinaryEncodable for #ident {
            #[allow(unused)]
            fn byte_len(&self) -> usize {
                let mut size = 0usize;
                #byte_len_body
                size
            }
            #[allow(unused)]
            fn encode<S: std::io::Write + ?Sized>(
                &self,
                stream: &mut S,
            ) -> opcua::types::EncodingResult<()> {
                #encode_body
                Ok(())
            }
        }
    })
}

pub fn generate_binary_decode_impl(strct: EncodingStruct) -> syn::Result<TokenStream> {
    let mut decode_impl = quote! {};
    let mut decode_build = quote! {};

    let mut has_context = false;
    for field in strct.fields {
        if field.attr.ignore {
            let ident = field.ident;
            decode_build.extend(quote! {
                #ident: Default::default(),
            });
            continue;
        }

        let ident = field.ident;
        let ident_string = ident.to_string();
        if ident_string == "request_header" {
            decode_impl.extend(quote! {
                let request_header: opcua::types::RequestHeader =
                    opcua::types::BinaryDecodable::decode(stream, options)?;
                let __request_handle = request_header.request_handle;
            });
            decode_build.extend(quote! {
                request_header,
            });
            has_context = true;
        } else if ident_string == "response_header" {
            decode_impl.extend(quote! {
                let response_header: opcua::types::ResponseHeader =
                    opcua::types::BinaryDecodable::decode(stream, options)?;
                let __request_handle = response_header.request_handle;
            });
            decode_build.extend(quote! {
                response_header,
            });
            has_context = true;
        } else if has_context {
            decode_build.extend(quote! {
                #ident: opcua::types::BinaryDecodable::decode(stream, options)
                    .map_err(|e| e.with_request_handle(__request_handle))?,
            });
        } else {
            decode_build.extend(quote! {
                #ident: opcua::types::BinaryDecodable::decode(stream, options)?,
            });
        }
    }

    let ident = strct.ident;

    Ok(quote! {
        impl opcua::types::BinaryDecodable for #ident {
            #[allow(unused_variables)]
            fn decode<S: std::io::Read + ?Sized>(
                stream: &mut S,
                options: &opcua::types::DecodingOptions,
            ) -> opcua::types::EncodingResult<Self> {
                #decode_impl
                Ok(Self {
                    #decode_build
                })
            }
        }
    })
}
