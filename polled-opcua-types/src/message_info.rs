// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Traits describing service messages and the request / response pairing
//! used by the generic service dispatcher.

use crate::{
    encoding::{BinaryDecodable, BinaryEncodable},
    object_ids::ObjectId,
    request_header::RequestHeader,
    response_header::ResponseHeader,
};

/// Trait implemented by every message, exposing the id of its binary encoding.
pub trait MessageInfo {
    /// The id of the default binary encoding of the message.
    fn type_id(&self) -> ObjectId;
}

/// Trait implemented by service request messages. A request knows its response
/// type, which is how the typed service surface stays a set of thin shims over
/// a single generic dispatcher.
pub trait UaRequest: BinaryEncodable + BinaryDecodable + MessageInfo {
    /// The type of the response to this request.
    type Response: UaResponse;

    /// The common request header.
    fn request_header(&self) -> &RequestHeader;

    /// Mutable access to the common request header, used by the dispatcher to
    /// stamp the handle, timestamp and timeout hint before sending.
    fn request_header_mut(&mut self) -> &mut RequestHeader;
}

/// Trait implemented by service response messages.
///
/// `Default` is required so a response body can be synthesized when a request
/// fails without ever receiving one: the body is zero-initialized and the
/// failure is carried in `response_header.service_result`.
pub trait UaResponse: BinaryEncodable + BinaryDecodable + MessageInfo + Default {
    /// The common response header.
    fn response_header(&self) -> &ResponseHeader;

    /// Mutable access to the common response header.
    fn response_header_mut(&mut self) -> &mut ResponseHeader;
}

/// Implements [`MessageInfo`] for a type against its default binary encoding id.
#[macro_export]
macro_rules! message_info {
    ($ty:ident, $enc:ident) => {
        impl $crate::MessageInfo for $ty {
            fn type_id(&self) -> $crate::ObjectId {
                $crate::ObjectId::$enc
            }
        }
    };
}

/// Implements [`UaRequest`] and [`UaResponse`] for a request / response pair.
/// The structs must have `request_header` / `response_header` fields.
#[macro_export]
macro_rules! service_pair {
    ($req:ident, $resp:ident) => {
        impl $crate::UaRequest for $req {
            type Response = $resp;

            fn request_header(&self) -> &$crate::RequestHeader {
                &self.request_header
            }

            fn request_header_mut(&mut self) -> &mut $crate::RequestHeader {
                &mut self.request_header
            }
        }

        impl $crate::UaResponse for $resp {
            fn response_header(&self) -> &$crate::ResponseHeader {
                &self.response_header
            }

            fn response_header_mut(&mut self) -> &mut $crate::ResponseHeader {
                &mut self.response_header
            }
        }
    };
}

/// Generates an enumeration encoded on the wire as its integer representation.
#[macro_export]
macro_rules! ua_enum {
    (
        $(#[$attr:meta])*
        pub enum $name:ident: $repr:ty {
            $($(#[$vattr:meta])* $variant:ident = $value:literal),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq)]
        #[repr($repr)]
        pub enum $name {
            $(
                $(#[$vattr])*
                $variant = $value,
            )*
        }

        impl TryFrom<$repr> for $name {
            type Error = $crate::Error;

            fn try_from(value: $repr) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok($name::$variant), )*
                    r => Err($crate::Error::decoding(format!(
                        concat!("Invalid value {} for enum ", stringify!($name)), r
                    ))),
                }
            }
        }

        impl $crate::BinaryEncodable for $name {
            fn byte_len(&self) -> usize {
                std::mem::size_of::<$repr>()
            }

            fn encode<S: std::io::Write + ?Sized>(
                &self,
                stream: &mut S,
            ) -> $crate::EncodingResult<()> {
                (*self as $repr).encode(stream)
            }
        }

        impl $crate::BinaryDecodable for $name {
            fn decode<S: std::io::Read + ?Sized>(
                stream: &mut S,
                options: &$crate::DecodingOptions,
            ) -> $crate::EncodingResult<Self> {
                let value = <$repr as $crate::BinaryDecodable>::decode(stream, options)?;
                Self::try_from(value)
            }
        }
    };
}
