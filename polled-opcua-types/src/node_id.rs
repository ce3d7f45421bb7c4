// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the implementation of `NodeId`.

use std::{
    fmt,
    io::{Read, Write},
    str::FromStr,
};

use crate::{
    byte_string::ByteString,
    encoding::{
        read_u16, read_u32, read_u8, write_u16, write_u32, write_u8, BinaryDecodable,
        BinaryEncodable, DecodingOptions, EncodingResult, Error,
    },
    guid::Guid,
    object_ids::ObjectId,
    status_code::StatusCode,
    string::UAString,
};

/// The kind of identifier held by a `NodeId`.
#[derive(Eq, PartialEq, Clone, Debug, Hash)]
pub enum Identifier {
    /// An unsigned integer identifier.
    Numeric(u32),
    /// A string identifier.
    String(UAString),
    /// A GUID identifier.
    Guid(Guid),
    /// An opaque byte string identifier.
    ByteString(ByteString),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(v) => write!(f, "i={}", v),
            Identifier::String(v) => write!(f, "s={}", v),
            Identifier::Guid(v) => write!(f, "g={}", v),
            Identifier::ByteString(v) => write!(f, "b={:?}", v.as_ref()),
        }
    }
}

impl From<u32> for Identifier {
    fn from(value: u32) -> Self {
        Identifier::Numeric(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::String(UAString::from(value))
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::String(UAString::from(value))
    }
}

impl From<UAString> for Identifier {
    fn from(value: UAString) -> Self {
        Identifier::String(value)
    }
}

impl From<Guid> for Identifier {
    fn from(value: Guid) -> Self {
        Identifier::Guid(value)
    }
}

impl From<ByteString> for Identifier {
    fn from(value: ByteString) -> Self {
        Identifier::ByteString(value)
    }
}

/// An identifier for a node in the address space of an OPC UA server.
#[derive(Eq, PartialEq, Clone, Debug, Hash)]
pub struct NodeId {
    /// The index for a namespace.
    pub namespace: u16,
    /// The identifier for the node in the address space.
    pub identifier: Identifier,
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::null()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace != 0 {
            write!(f, "ns={};{}", self.namespace, self.identifier)
        } else {
            write!(f, "{}", self.identifier)
        }
    }
}

impl BinaryEncodable for NodeId {
    fn byte_len(&self) -> usize {
        // The type determines the byte code.
        match &self.identifier {
            Identifier::Numeric(value) => {
                if self.namespace == 0 && *value <= 255 {
                    2
                } else if self.namespace <= 255 && *value <= 65535 {
                    4
                } else {
                    7
                }
            }
            Identifier::String(value) => 3 + value.byte_len(),
            Identifier::Guid(value) => 3 + value.byte_len(),
            Identifier::ByteString(value) => 3 + value.byte_len(),
        }
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        match &self.identifier {
            Identifier::Numeric(value) => {
                if self.namespace == 0 && *value <= 255 {
                    // node id fits into 2 bytes when the namespace is 0 and the value <= 255
                    write_u8(stream, 0x0)?;
                    write_u8(stream, *value as u8)
                } else if self.namespace <= 255 && *value <= 65535 {
                    // node id fits into 4 bytes when namespace <= 255 and value <= 65535
                    write_u8(stream, 0x1)?;
                    write_u8(stream, self.namespace as u8)?;
                    write_u16(stream, *value as u16)
                } else {
                    // full node id
                    write_u8(stream, 0x2)?;
                    write_u16(stream, self.namespace)?;
                    write_u32(stream, *value)
                }
            }
            Identifier::String(value) => {
                write_u8(stream, 0x3)?;
                write_u16(stream, self.namespace)?;
                value.encode(stream)
            }
            Identifier::Guid(value) => {
                write_u8(stream, 0x4)?;
                write_u16(stream, self.namespace)?;
                value.encode(stream)
            }
            Identifier::ByteString(value) => {
                write_u8(stream, 0x5)?;
                write_u16(stream, self.namespace)?;
                value.encode(stream)
            }
        }
    }
}

impl BinaryDecodable for NodeId {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let identifier = read_u8(stream)?;
        let node_id = match identifier {
            0x0 => {
                let value = read_u8(stream)?;
                NodeId::new(0, u32::from(value))
            }
            0x1 => {
                let namespace = read_u8(stream)?;
                let value = read_u16(stream)?;
                NodeId::new(u16::from(namespace), u32::from(value))
            }
            0x2 => {
                let namespace = read_u16(stream)?;
                let value = read_u32(stream)?;
                NodeId::new(namespace, value)
            }
            0x3 => {
                let namespace = read_u16(stream)?;
                let value = UAString::decode(stream, options)?;
                NodeId::new(namespace, value)
            }
            0x4 => {
                let namespace = read_u16(stream)?;
                let value = Guid::decode(stream, options)?;
                NodeId::new(namespace, value)
            }
            0x5 => {
                let namespace = read_u16(stream)?;
                let value = ByteString::decode(stream, options)?;
                NodeId::new(namespace, value)
            }
            _ => {
                return Err(Error::decoding(format!(
                    "Unrecognized node id type {}",
                    identifier
                )));
            }
        };
        Ok(node_id)
    }
}

impl FromStr for NodeId {
    type Err = StatusCode;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        use regex::Regex;

        // Parses a node from a string using the format specified in 5.3.1.10 part 6.
        //
        // ns=<namespaceindex>;<type>=<value>
        let re = Regex::new(r"^(ns=(?P<ns>[0-9]+);)?(?P<t>[isgb])=(?P<v>.+)$").unwrap();
        let captures = re.captures(s).ok_or(StatusCode::BadNodeIdInvalid)?;

        let namespace = captures
            .name("ns")
            .map(|ns| ns.as_str().parse::<u16>())
            .transpose()
            .map_err(|_| StatusCode::BadNodeIdInvalid)?
            .unwrap_or(0);

        let t = captures.name("t").unwrap();
        let v = captures.name("v").unwrap();
        let identifier = match t.as_str() {
            "i" => v
                .as_str()
                .parse::<u32>()
                .map(Identifier::Numeric)
                .map_err(|_| StatusCode::BadNodeIdInvalid)?,
            "s" => Identifier::String(UAString::from(v.as_str())),
            "g" => Guid::from_str(v.as_str())
                .map(Identifier::Guid)
                .map_err(|_| StatusCode::BadNodeIdInvalid)?,
            _ => return Err(StatusCode::BadNodeIdInvalid),
        };
        Ok(NodeId {
            namespace,
            identifier,
        })
    }
}

impl From<ObjectId> for NodeId {
    fn from(value: ObjectId) -> Self {
        NodeId::new(0, value as u32)
    }
}

impl From<(u16, u32)> for NodeId {
    fn from(value: (u16, u32)) -> Self {
        NodeId::new(value.0, value.1)
    }
}

impl From<(u16, &str)> for NodeId {
    fn from(value: (u16, &str)) -> Self {
        NodeId::new(value.0, value.1)
    }
}

impl NodeId {
    /// Constructs a new NodeId from anything that can be turned into an `Identifier`.
    pub fn new<T: Into<Identifier>>(namespace: u16, value: T) -> NodeId {
        NodeId {
            namespace,
            identifier: value.into(),
        }
    }

    /// Returns the null node id.
    pub fn null() -> NodeId {
        NodeId::new(0, 0u32)
    }

    /// Test if the node id is null, i.e. 0 namespace and 0 numeric identifier.
    pub fn is_null(&self) -> bool {
        self.namespace == 0 && self.identifier == Identifier::Numeric(0)
    }

    /// The numeric identifier, if this node id holds one.
    pub fn as_u32(&self) -> Option<u32> {
        match self.identifier {
            Identifier::Numeric(value) => Some(value),
            _ => None,
        }
    }

    /// Try to convert this node id to a standard object id. Fails if the node id is not in
    /// namespace 0 or is not numeric.
    pub fn as_object_id(&self) -> std::result::Result<ObjectId, ()> {
        match self.identifier {
            Identifier::Numeric(value) if self.namespace == 0 => ObjectId::try_from(value),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_binary_forms() {
        // Two byte form
        assert_eq!(NodeId::new(0, 255u32).byte_len(), 2);
        // Four byte form
        assert_eq!(NodeId::new(2, 1025u32).byte_len(), 4);
        // Full form
        assert_eq!(NodeId::new(300, 1025u32).byte_len(), 7);

        for node_id in [
            NodeId::new(0, 72u32),
            NodeId::new(2, 1025u32),
            NodeId::new(300, 0x8000_0000u32),
            NodeId::new(1, "hello"),
            NodeId::new(1, Guid::new()),
            NodeId::new(1, ByteString::from(vec![1u8, 2, 3])),
        ] {
            let buf = node_id.encode_to_vec();
            assert_eq!(buf.len(), node_id.byte_len());
            let mut stream = std::io::Cursor::new(buf);
            let decoded = NodeId::decode(&mut stream, &DecodingOptions::default()).unwrap();
            assert_eq!(decoded, node_id);
        }
    }

    #[test]
    fn node_id_from_str() {
        assert_eq!(NodeId::from_str("i=2258").unwrap(), NodeId::new(0, 2258u32));
        assert_eq!(
            NodeId::from_str("ns=2;s=Demo.Static").unwrap(),
            NodeId::new(2, "Demo.Static")
        );
        assert_eq!(NodeId::from_str("nonsense"), Err(StatusCode::BadNodeIdInvalid));
    }
}
