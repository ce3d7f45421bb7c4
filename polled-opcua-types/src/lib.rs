// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

#![warn(missing_docs)]

//! The types module holds the binary encoding traits, the primitive OPC UA data
//! types and the hand-written service message types used by the rest of the stack.

/// Contains constants used when encoding and decoding.
pub mod constants {
    /// Default limit on the byte length of a decoded message. 0 means no limit.
    pub const MAX_MESSAGE_SIZE: usize = 2 * 1024 * 1024;
    /// Default limit on the number of chunks in a message. 0 means no limit.
    pub const MAX_CHUNK_COUNT: usize = 64;
    /// Default limit on the byte length of a string. 0 means no limit.
    pub const MAX_STRING_LENGTH: usize = 65535;
    /// Default limit on the byte length of a byte string. 0 means no limit.
    pub const MAX_BYTE_STRING_LENGTH: usize = 65535;
    /// Default limit on the number of array elements. 0 means no limit.
    pub const MAX_ARRAY_LENGTH: usize = 65535;
}

pub mod byte_string;
pub mod data_types;
pub mod data_value;
pub mod date_time;
pub mod diagnostics;
pub mod encoding;
pub mod errors;
pub mod expanded_node_id;
pub mod extension_object;
pub mod guid;
pub mod localized_text;
pub mod message_info;
pub mod node_id;
pub mod object_ids;
pub mod qualified_name;
pub mod request_header;
pub mod response_header;
pub mod service_types;
pub mod status_code;
pub mod string;
pub mod type_loader;
pub mod variant;

pub use byte_string::ByteString;
pub use data_types::*;
pub use data_value::DataValue;
pub use date_time::DateTime;
pub use diagnostics::{DiagnosticBits, DiagnosticInfo};
pub use encoding::{
    process_decode_io_result, process_encode_io_result, read_f32, read_f64, read_i16, read_i32,
    read_i64, read_i8, read_u16, read_u32, read_u64, read_u8, write_f32, write_f64, write_i16,
    write_i32, write_i64, write_i8, write_u16, write_u32, write_u64, write_u8, BinaryDecodable,
    BinaryEncodable, DecodingOptions, EncodingResult, Error,
};
pub use errors::OpcUaError;
pub use expanded_node_id::ExpandedNodeId;
pub use extension_object::{DynEncodable, ExtensionObject};
pub use guid::Guid;
pub use localized_text::LocalizedText;
pub use message_info::{MessageInfo, UaRequest, UaResponse};
pub use node_id::{Identifier, NodeId};
pub use object_ids::ObjectId;
pub use qualified_name::QualifiedName;
pub use request_header::RequestHeader;
pub use response_header::ResponseHeader;
pub use service_types::*;
pub use status_code::StatusCode;
pub use string::UAString;
pub use type_loader::{TypeLoader, TypeLoaderCollection, TypeLoaderInstance};
pub use variant::{Variant, VariantArray, VariantScalarTypeId};
