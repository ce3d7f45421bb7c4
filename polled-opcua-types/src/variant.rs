// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the implementation of `Variant`.

use std::io::{Read, Write};

use crate::{
    byte_string::ByteString,
    date_time::DateTime,
    encoding::{
        read_i32, read_u8, write_i32, write_u8, BinaryDecodable, BinaryEncodable, DecodingOptions,
        EncodingResult, Error,
    },
    extension_object::ExtensionObject,
    guid::Guid,
    localized_text::LocalizedText,
    node_id::NodeId,
    qualified_name::QualifiedName,
    status_code::StatusCode,
    string::UAString,
};

/// The numeric ids of the scalar types a variant can hold.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum VariantScalarTypeId {
    Boolean = 1,
    SByte = 2,
    Byte = 3,
    Int16 = 4,
    UInt16 = 5,
    Int32 = 6,
    UInt32 = 7,
    Int64 = 8,
    UInt64 = 9,
    Float = 10,
    Double = 11,
    String = 12,
    DateTime = 13,
    Guid = 14,
    ByteString = 15,
    NodeId = 17,
    StatusCode = 19,
    QualifiedName = 20,
    LocalizedText = 21,
    ExtensionObject = 22,
}

impl TryFrom<u8> for VariantScalarTypeId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        Ok(match value {
            1 => Self::Boolean,
            2 => Self::SByte,
            3 => Self::Byte,
            4 => Self::Int16,
            5 => Self::UInt16,
            6 => Self::Int32,
            7 => Self::UInt32,
            8 => Self::Int64,
            9 => Self::UInt64,
            10 => Self::Float,
            11 => Self::Double,
            12 => Self::String,
            13 => Self::DateTime,
            14 => Self::Guid,
            15 => Self::ByteString,
            17 => Self::NodeId,
            19 => Self::StatusCode,
            20 => Self::QualifiedName,
            21 => Self::LocalizedText,
            22 => Self::ExtensionObject,
            r => {
                return Err(Error::decoding(format!(
                    "Variant type id {r} is invalid or unsupported"
                )))
            }
        })
    }
}

/// A single dimensional array of variants of a uniform scalar type.
#[derive(PartialEq, Debug, Clone)]
pub struct VariantArray {
    /// The scalar type of every element.
    pub type_id: VariantScalarTypeId,
    /// The element values.
    pub values: Vec<Variant>,
}

/// A `Variant` holds built-in OPC UA data types, including single dimensional
/// arrays of them. Multi-dimensional arrays are not supported by this stack.
#[derive(PartialEq, Debug, Clone, Default)]
pub enum Variant {
    /// An empty variant, carrying no value.
    #[default]
    Empty,
    /// A boolean.
    Boolean(bool),
    /// A signed byte.
    SByte(i8),
    /// An unsigned byte.
    Byte(u8),
    /// A signed 16-bit integer.
    Int16(i16),
    /// An unsigned 16-bit integer.
    UInt16(u16),
    /// A signed 32-bit integer.
    Int32(i32),
    /// An unsigned 32-bit integer.
    UInt32(u32),
    /// A signed 64-bit integer.
    Int64(i64),
    /// An unsigned 64-bit integer.
    UInt64(u64),
    /// A 32-bit float.
    Float(f32),
    /// A 64-bit float.
    Double(f64),
    /// A string.
    String(UAString),
    /// A date time.
    DateTime(DateTime),
    /// A GUID.
    Guid(Box<Guid>),
    /// A byte string.
    ByteString(ByteString),
    /// A node id.
    NodeId(Box<NodeId>),
    /// A status code.
    StatusCode(StatusCode),
    /// A qualified name.
    QualifiedName(Box<QualifiedName>),
    /// A localized text.
    LocalizedText(Box<LocalizedText>),
    /// An extension object.
    ExtensionObject(Box<ExtensionObject>),
    /// A single dimensional array of a uniform scalar type.
    Array(Box<VariantArray>),
}

const ARRAY_VALUES_BIT: u8 = 1 << 7;
const ARRAY_DIMENSIONS_BIT: u8 = 1 << 6;

impl Variant {
    /// The scalar type id of the value, `None` for `Empty` and arrays.
    pub fn scalar_type_id(&self) -> Option<VariantScalarTypeId> {
        Some(match self {
            Variant::Empty | Variant::Array(_) => return None,
            Variant::Boolean(_) => VariantScalarTypeId::Boolean,
            Variant::SByte(_) => VariantScalarTypeId::SByte,
            Variant::Byte(_) => VariantScalarTypeId::Byte,
            Variant::Int16(_) => VariantScalarTypeId::Int16,
            Variant::UInt16(_) => VariantScalarTypeId::UInt16,
            Variant::Int32(_) => VariantScalarTypeId::Int32,
            Variant::UInt32(_) => VariantScalarTypeId::UInt32,
            Variant::Int64(_) => VariantScalarTypeId::Int64,
            Variant::UInt64(_) => VariantScalarTypeId::UInt64,
            Variant::Float(_) => VariantScalarTypeId::Float,
            Variant::Double(_) => VariantScalarTypeId::Double,
            Variant::String(_) => VariantScalarTypeId::String,
            Variant::DateTime(_) => VariantScalarTypeId::DateTime,
            Variant::Guid(_) => VariantScalarTypeId::Guid,
            Variant::ByteString(_) => VariantScalarTypeId::ByteString,
            Variant::NodeId(_) => VariantScalarTypeId::NodeId,
            Variant::StatusCode(_) => VariantScalarTypeId::StatusCode,
            Variant::QualifiedName(_) => VariantScalarTypeId::QualifiedName,
            Variant::LocalizedText(_) => VariantScalarTypeId::LocalizedText,
            Variant::ExtensionObject(_) => VariantScalarTypeId::ExtensionObject,
        })
    }

    /// Returns `true` for `Empty`.
    pub fn is_empty(&self) -> bool {
        matches!(self, Variant::Empty)
    }

    fn scalar_byte_len(&self) -> usize {
        match self {
            Variant::Empty => 0,
            Variant::Boolean(v) => v.byte_len(),
            Variant::SByte(v) => v.byte_len(),
            Variant::Byte(v) => v.byte_len(),
            Variant::Int16(v) => v.byte_len(),
            Variant::UInt16(v) => v.byte_len(),
            Variant::Int32(v) => v.byte_len(),
            Variant::UInt32(v) => v.byte_len(),
            Variant::Int64(v) => v.byte_len(),
            Variant::UInt64(v) => v.byte_len(),
            Variant::Float(v) => v.byte_len(),
            Variant::Double(v) => v.byte_len(),
            Variant::String(v) => v.byte_len(),
            Variant::DateTime(v) => v.byte_len(),
            Variant::Guid(v) => v.byte_len(),
            Variant::ByteString(v) => v.byte_len(),
            Variant::NodeId(v) => v.byte_len(),
            Variant::StatusCode(v) => v.byte_len(),
            Variant::QualifiedName(v) => v.byte_len(),
            Variant::LocalizedText(v) => v.byte_len(),
            Variant::ExtensionObject(v) => v.byte_len(),
            Variant::Array(_) => 0,
        }
    }

    fn encode_scalar<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        match self {
            Variant::Empty => Ok(()),
            Variant::Boolean(v) => v.encode(stream),
            Variant::SByte(v) => v.encode(stream),
            Variant::Byte(v) => v.encode(stream),
            Variant::Int16(v) => v.encode(stream),
            Variant::UInt16(v) => v.encode(stream),
            Variant::Int32(v) => v.encode(stream),
            Variant::UInt32(v) => v.encode(stream),
            Variant::Int64(v) => v.encode(stream),
            Variant::UInt64(v) => v.encode(stream),
            Variant::Float(v) => v.encode(stream),
            Variant::Double(v) => v.encode(stream),
            Variant::String(v) => v.encode(stream),
            Variant::DateTime(v) => v.encode(stream),
            Variant::Guid(v) => v.encode(stream),
            Variant::ByteString(v) => v.encode(stream),
            Variant::NodeId(v) => v.encode(stream),
            Variant::StatusCode(v) => v.encode(stream),
            Variant::QualifiedName(v) => v.encode(stream),
            Variant::LocalizedText(v) => v.encode(stream),
            Variant::ExtensionObject(v) => v.encode(stream),
            Variant::Array(_) => Err(Error::encoding("Nested arrays are not supported")),
        }
    }

    fn decode_scalar<S: Read + ?Sized>(
        type_id: VariantScalarTypeId,
        stream: &mut S,
        options: &DecodingOptions,
    ) -> EncodingResult<Variant> {
        Ok(match type_id {
            VariantScalarTypeId::Boolean => Variant::Boolean(bool::decode(stream, options)?),
            VariantScalarTypeId::SByte => Variant::SByte(i8::decode(stream, options)?),
            VariantScalarTypeId::Byte => Variant::Byte(u8::decode(stream, options)?),
            VariantScalarTypeId::Int16 => Variant::Int16(i16::decode(stream, options)?),
            VariantScalarTypeId::UInt16 => Variant::UInt16(u16::decode(stream, options)?),
            VariantScalarTypeId::Int32 => Variant::Int32(i32::decode(stream, options)?),
            VariantScalarTypeId::UInt32 => Variant::UInt32(u32::decode(stream, options)?),
            VariantScalarTypeId::Int64 => Variant::Int64(i64::decode(stream, options)?),
            VariantScalarTypeId::UInt64 => Variant::UInt64(u64::decode(stream, options)?),
            VariantScalarTypeId::Float => Variant::Float(f32::decode(stream, options)?),
            VariantScalarTypeId::Double => Variant::Double(f64::decode(stream, options)?),
            VariantScalarTypeId::String => Variant::String(UAString::decode(stream, options)?),
            VariantScalarTypeId::DateTime => Variant::DateTime(DateTime::decode(stream, options)?),
            VariantScalarTypeId::Guid => Variant::Guid(Box::new(Guid::decode(stream, options)?)),
            VariantScalarTypeId::ByteString => {
                Variant::ByteString(ByteString::decode(stream, options)?)
            }
            VariantScalarTypeId::NodeId => {
                Variant::NodeId(Box::new(NodeId::decode(stream, options)?))
            }
            VariantScalarTypeId::StatusCode => {
                Variant::StatusCode(StatusCode::decode(stream, options)?)
            }
            VariantScalarTypeId::QualifiedName => {
                Variant::QualifiedName(Box::new(QualifiedName::decode(stream, options)?))
            }
            VariantScalarTypeId::LocalizedText => {
                Variant::LocalizedText(Box::new(LocalizedText::decode(stream, options)?))
            }
            VariantScalarTypeId::ExtensionObject => {
                Variant::ExtensionObject(Box::new(ExtensionObject::decode(stream, options)?))
            }
        })
    }
}

impl BinaryEncodable for Variant {
    fn byte_len(&self) -> usize {
        match self {
            Variant::Empty => 1,
            Variant::Array(array) => {
                1 + 4 + array.values.iter().map(|v| v.scalar_byte_len()).sum::<usize>()
            }
            _ => 1 + self.scalar_byte_len(),
        }
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        match self {
            Variant::Empty => write_u8(stream, 0),
            Variant::Array(array) => {
                write_u8(stream, array.type_id as u8 | ARRAY_VALUES_BIT)?;
                write_i32(stream, array.values.len() as i32)?;
                for value in &array.values {
                    if value.scalar_type_id() != Some(array.type_id) {
                        return Err(Error::encoding("Array element type mismatch"));
                    }
                    value.encode_scalar(stream)?;
                }
                Ok(())
            }
            _ => {
                // scalar_type_id is always set for non-empty scalars
                write_u8(stream, self.scalar_type_id().unwrap() as u8)?;
                self.encode_scalar(stream)
            }
        }
    }
}

impl BinaryDecodable for Variant {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let encoding = read_u8(stream)?;
        if encoding == 0 {
            return Ok(Variant::Empty);
        }
        if encoding & ARRAY_DIMENSIONS_BIT != 0 {
            return Err(Error::decoding(
                "Multi dimensional arrays are not supported",
            ));
        }
        let type_id = VariantScalarTypeId::try_from(encoding & 0x3f)?;
        if encoding & ARRAY_VALUES_BIT != 0 {
            let len = read_i32(stream)?;
            if len < -1 {
                return Err(Error::decoding("Array length is negative"));
            }
            if options.max_array_length > 0 && len > 0 && len as usize > options.max_array_length {
                return Err(Error::decoding(format!(
                    "Array length {} exceeds decoding limit {}",
                    len, options.max_array_length
                )));
            }
            let len = len.max(0) as usize;
            let mut values = Vec::with_capacity(len);
            for _ in 0..len {
                values.push(Variant::decode_scalar(type_id, stream, options)?);
            }
            Ok(Variant::Array(Box::new(VariantArray { type_id, values })))
        } else {
            Variant::decode_scalar(type_id, stream, options)
        }
    }
}

macro_rules! variant_from {
    ($t:ty, $variant:ident) => {
        impl From<$t> for Variant {
            fn from(value: $t) -> Self {
                Variant::$variant(value)
            }
        }
    };
}

variant_from!(bool, Boolean);
variant_from!(i8, SByte);
variant_from!(u8, Byte);
variant_from!(i16, Int16);
variant_from!(u16, UInt16);
variant_from!(i32, Int32);
variant_from!(u32, UInt32);
variant_from!(i64, Int64);
variant_from!(u64, UInt64);
variant_from!(f32, Float);
variant_from!(f64, Double);
variant_from!(UAString, String);
variant_from!(DateTime, DateTime);
variant_from!(StatusCode, StatusCode);
variant_from!(ByteString, ByteString);

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(UAString::from(value))
    }
}

impl From<NodeId> for Variant {
    fn from(value: NodeId) -> Self {
        Variant::NodeId(Box::new(value))
    }
}

impl From<LocalizedText> for Variant {
    fn from(value: LocalizedText) -> Self {
        Variant::LocalizedText(Box::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_round_trip() {
        for value in [
            Variant::Empty,
            Variant::Boolean(true),
            Variant::Int32(-12345),
            Variant::Double(3.5),
            Variant::from("hello"),
            Variant::from(NodeId::new(2, 2258u32)),
            Variant::StatusCode(StatusCode::BadNodeIdUnknown),
            Variant::Array(Box::new(VariantArray {
                type_id: VariantScalarTypeId::UInt32,
                values: vec![Variant::UInt32(1), Variant::UInt32(2), Variant::UInt32(3)],
            })),
        ] {
            let buf = value.encode_to_vec();
            assert_eq!(buf.len(), value.byte_len(), "byte len for {value:?}");
            let mut stream = std::io::Cursor::new(buf);
            let decoded = Variant::decode(&mut stream, &DecodingOptions::default()).unwrap();
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn mixed_array_rejected() {
        let value = Variant::Array(Box::new(VariantArray {
            type_id: VariantScalarTypeId::UInt32,
            values: vec![Variant::UInt32(1), Variant::Boolean(false)],
        }));
        let mut buf = Vec::new();
        assert!(value.encode(&mut buf).is_err());
    }
}
