// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the implementation of `ExpandedNodeId`.

use std::{
    fmt,
    io::{Read, Write},
};

use crate::{
    encoding::{
        read_u32, read_u8, write_u32, BinaryDecodable, BinaryEncodable, DecodingOptions,
        EncodingResult,
    },
    node_id::NodeId,
    string::UAString,
};

/// A NodeId that allows the namespace URI to be specified instead of an index, as well as
/// a server index.
#[derive(Eq, PartialEq, Clone, Debug, Hash, Default)]
pub struct ExpandedNodeId {
    /// The inner node id.
    pub node_id: NodeId,
    /// Namespace URI. If set, overrides the namespace index of the inner node id.
    pub namespace_uri: UAString,
    /// Index of the server holding the node, 0 for the local server.
    pub server_index: u32,
}

impl fmt::Display for ExpandedNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_uri.is_null() {
            write!(f, "{}", self.node_id)
        } else {
            write!(f, "nsu={};{}", self.namespace_uri, self.node_id.identifier)
        }
    }
}

impl BinaryEncodable for ExpandedNodeId {
    fn byte_len(&self) -> usize {
        let mut size = self.node_id.byte_len();
        if !self.namespace_uri.is_null() {
            size += self.namespace_uri.byte_len();
        }
        if self.server_index != 0 {
            size += 4;
        }
        size
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        // The expanded node id is the node id with flag bits in the discriminator byte
        // indicating the presence of the namespace uri and server index.
        let mut data = self.node_id.encode_to_vec();
        if !self.namespace_uri.is_null() {
            data[0] |= 0x80;
        }
        if self.server_index != 0 {
            data[0] |= 0x40;
        }
        crate::encoding::process_encode_io_result(stream.write_all(&data))?;
        if !self.namespace_uri.is_null() {
            self.namespace_uri.encode(stream)?;
        }
        if self.server_index != 0 {
            write_u32(stream, self.server_index)?;
        }
        Ok(())
    }
}

impl BinaryDecodable for ExpandedNodeId {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let discriminator = read_u8(stream)?;
        let has_namespace_uri = discriminator & 0x80 != 0;
        let has_server_index = discriminator & 0x40 != 0;

        // Reconstruct the plain node id stream without the flag bits.
        struct Prepend<'a, S: ?Sized> {
            first: Option<u8>,
            inner: &'a mut S,
        }
        impl<S: Read + ?Sized> Read for Prepend<'_, S> {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if let Some(b) = self.first.take() {
                    if !buf.is_empty() {
                        buf[0] = b;
                        return Ok(1);
                    }
                    self.first = Some(b);
                }
                self.inner.read(buf)
            }
        }

        let mut prefixed = Prepend {
            first: Some(discriminator & 0x3f),
            inner: stream,
        };
        let node_id = NodeId::decode(&mut prefixed, options)?;
        let namespace_uri = if has_namespace_uri {
            UAString::decode(stream, options)?
        } else {
            UAString::null()
        };
        let server_index = if has_server_index {
            read_u32(stream)?
        } else {
            0
        };
        Ok(ExpandedNodeId {
            node_id,
            namespace_uri,
            server_index,
        })
    }
}

impl From<NodeId> for ExpandedNodeId {
    fn from(node_id: NodeId) -> Self {
        ExpandedNodeId {
            node_id,
            namespace_uri: UAString::null(),
            server_index: 0,
        }
    }
}

impl ExpandedNodeId {
    /// Creates an expanded node id referring to the local server.
    pub fn new(node_id: impl Into<NodeId>) -> ExpandedNodeId {
        ExpandedNodeId {
            node_id: node_id.into(),
            namespace_uri: UAString::null(),
            server_index: 0,
        }
    }

    /// The null expanded node id.
    pub fn null() -> ExpandedNodeId {
        Self::new(NodeId::null())
    }

    /// Test if the inner node id is null and no uri or server index is set.
    pub fn is_null(&self) -> bool {
        self.node_id.is_null() && self.namespace_uri.is_null() && self.server_index == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expanded_node_id_round_trip() {
        for id in [
            ExpandedNodeId::new(NodeId::new(1, 1234u32)),
            ExpandedNodeId {
                node_id: NodeId::new(0, "abc"),
                namespace_uri: UAString::from("urn:here"),
                server_index: 3,
            },
        ] {
            let buf = id.encode_to_vec();
            assert_eq!(buf.len(), id.byte_len());
            let mut stream = std::io::Cursor::new(buf);
            let decoded = ExpandedNodeId::decode(&mut stream, &DecodingOptions::default()).unwrap();
            assert_eq!(decoded, id);
        }
    }
}
