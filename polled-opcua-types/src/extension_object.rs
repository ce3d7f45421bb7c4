// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the implementation of `ExtensionObject`.

use std::{
    any::Any,
    fmt::Debug,
    io::{Cursor, Read, Write},
};

use crate::{
    byte_string::ByteString,
    encoding::{
        read_u8, write_u8, BinaryDecodable, BinaryEncodable, DecodingOptions, EncodingResult,
        Error,
    },
    message_info::MessageInfo,
    node_id::NodeId,
    type_loader::TypeLoaderCollection,
};

/// Trait implemented by messages carried in extension object bodies, allowing
/// dynamically loaded custom types to be inspected and re-encoded.
pub trait DynEncodable: Any + Debug {
    /// The byte length of the encoded body.
    fn byte_len_dyn(&self) -> usize;

    /// Encode the body to the stream.
    fn encode_dyn(&self, stream: &mut dyn Write) -> EncodingResult<()>;

    /// The node id of the binary encoding of this type.
    fn binary_type_id(&self) -> NodeId;

    /// Consume the box and return the inner value as `Any` for downcasting.
    fn into_dyn_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T> DynEncodable for T
where
    T: BinaryEncodable + MessageInfo + Any + Debug,
{
    fn byte_len_dyn(&self) -> usize {
        self.byte_len()
    }

    fn encode_dyn(&self, stream: &mut dyn Write) -> EncodingResult<()> {
        self.encode(stream)
    }

    fn binary_type_id(&self) -> NodeId {
        MessageInfo::type_id(self).into()
    }

    fn into_dyn_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A structure serialized with its type identifier so it can carry any
/// structured type. The body is kept in its raw binary form; typed access
/// goes through [`ExtensionObject::decode_inner`] or a type loader.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ExtensionObject {
    /// The node id of the binary encoding of the body.
    pub type_id: NodeId,
    /// The encoded body, `None` when the object carries no body.
    pub body: Option<Vec<u8>>,
}

impl BinaryEncodable for ExtensionObject {
    fn byte_len(&self) -> usize {
        let mut size = self.type_id.byte_len() + 1;
        if let Some(ref body) = self.body {
            size += 4 + body.len();
        }
        size
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.type_id.encode(stream)?;
        match &self.body {
            Some(body) => {
                write_u8(stream, 0x1)?;
                ByteString::from(body.as_slice()).encode(stream)
            }
            None => write_u8(stream, 0x0),
        }
    }
}

impl BinaryDecodable for ExtensionObject {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let type_id = NodeId::decode(stream, options)?;
        let encoding = read_u8(stream)?;
        let body = match encoding {
            0x0 => None,
            0x1 => ByteString::decode(stream, options)?.value,
            // XML bodies are not supported by this stack.
            other => {
                return Err(Error::decoding(format!(
                    "Unsupported extension object encoding {other}"
                )));
            }
        };
        Ok(ExtensionObject { type_id, body })
    }
}

impl ExtensionObject {
    /// Creates a null extension object, i.e. one with no value or payload.
    pub fn null() -> ExtensionObject {
        ExtensionObject {
            type_id: NodeId::null(),
            body: None,
        }
    }

    /// Tests for null node id.
    pub fn is_null(&self) -> bool {
        self.type_id.is_null()
    }

    /// Creates an extension object from a message, encoding it as the body.
    pub fn from_message<T: BinaryEncodable + MessageInfo>(value: &T) -> ExtensionObject {
        ExtensionObject {
            type_id: value.type_id().into(),
            body: Some(value.encode_to_vec()),
        }
    }

    /// Decodes the body as the supplied type. The caller is expected to have checked the
    /// type id first.
    pub fn decode_inner<T: BinaryDecodable>(
        &self,
        options: &DecodingOptions,
    ) -> EncodingResult<T> {
        let Some(ref body) = self.body else {
            return Err(Error::decoding("Extension object has no body"));
        };
        let mut stream = Cursor::new(body);
        T::decode(&mut stream, options)
    }

    /// Decodes the body against the supplied type loaders, returning `None` when no loader
    /// recognizes the type id.
    pub fn decode_known(
        &self,
        loaders: &TypeLoaderCollection,
        options: &DecodingOptions,
    ) -> Option<EncodingResult<Box<dyn DynEncodable>>> {
        let num_id = if self.type_id.namespace == 0 {
            self.type_id.as_u32()?
        } else {
            return None;
        };
        let body = self.body.as_ref()?;
        let mut stream = Cursor::new(body);
        loaders.load_from_binary(num_id, &mut stream, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_object_round_trip() {
        for value in [
            ExtensionObject::null(),
            ExtensionObject {
                type_id: NodeId::new(0, 321u32),
                body: Some(vec![1, 2, 3, 4]),
            },
        ] {
            let buf = value.encode_to_vec();
            assert_eq!(buf.len(), value.byte_len());
            let mut stream = std::io::Cursor::new(buf);
            let decoded =
                ExtensionObject::decode(&mut stream, &DecodingOptions::default()).unwrap();
            assert_eq!(decoded, value);
        }
    }
}
