// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Attribute service set: Read and Write.

use opcua_macros::{BinaryDecodable, BinaryEncodable};

use crate::{
    data_value::DataValue, diagnostics::DiagnosticInfo, message_info, node_id::NodeId,
    qualified_name::QualifiedName, request_header::RequestHeader,
    response_header::ResponseHeader, service_pair, status_code::StatusCode, string::UAString,
    ua_enum,
};

#[allow(unused)]
mod opcua {
    pub use crate as types;
}

ua_enum! {
    /// The timestamps the server should return with values.
    pub enum TimestampsToReturn: u32 {
        /// Return the source timestamp only.
        Source = 0,
        /// Return the server timestamp only.
        Server = 1,
        /// Return both timestamps.
        Both = 2,
        /// Return neither timestamp.
        Neither = 3,
    }
}

ua_enum! {
    /// The ids of the attributes a node can carry.
    pub enum AttributeId: u32 {
        /// The node id.
        NodeId = 1,
        /// The node class.
        NodeClass = 2,
        /// The browse name.
        BrowseName = 3,
        /// The display name.
        DisplayName = 4,
        /// The description.
        Description = 5,
        /// The write mask.
        WriteMask = 6,
        /// The user write mask.
        UserWriteMask = 7,
        /// Whether a type is abstract.
        IsAbstract = 8,
        /// Whether a reference type is symmetric.
        Symmetric = 9,
        /// The inverse name of a reference type.
        InverseName = 10,
        /// Whether a view contains loops.
        ContainsNoLoops = 11,
        /// The event notifier byte.
        EventNotifier = 12,
        /// The value of a variable.
        Value = 13,
        /// The data type of a variable.
        DataType = 14,
        /// The value rank of a variable.
        ValueRank = 15,
        /// The array dimensions of a variable.
        ArrayDimensions = 16,
        /// The access level byte.
        AccessLevel = 17,
        /// The user access level byte.
        UserAccessLevel = 18,
        /// The minimum sampling interval.
        MinimumSamplingInterval = 19,
        /// Whether history is collected for a variable.
        Historizing = 20,
    }
}

/// Identifies an attribute of a node to read or monitor.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct ReadValueId {
    /// The node holding the attribute.
    pub node_id: NodeId,
    /// The id of the attribute, see [`AttributeId`].
    pub attribute_id: u32,
    /// For array values, the range of the array to return.
    pub index_range: UAString,
    /// The data encoding to return the value in, null for the default.
    pub data_encoding: QualifiedName,
}

impl From<NodeId> for ReadValueId {
    fn from(node_id: NodeId) -> Self {
        ReadValueId {
            node_id,
            attribute_id: AttributeId::Value as u32,
            index_range: UAString::null(),
            data_encoding: QualifiedName::null(),
        }
    }
}

/// Reads one or more attributes of one or more nodes.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct ReadRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// Maximum acceptable age of the values in milliseconds, 0 to force a device read.
    pub max_age: f64,
    /// The timestamps to return with the values.
    pub timestamps_to_return: TimestampsToReturn,
    /// The attributes to read.
    pub nodes_to_read: Option<Vec<ReadValueId>>,
}

/// Response to a [`ReadRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct ReadResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The read values, in the order they were requested.
    pub results: Option<Vec<DataValue>>,
    /// Diagnostics per operation, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// A value to write to an attribute of a node.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct WriteValue {
    /// The node holding the attribute.
    pub node_id: NodeId,
    /// The id of the attribute, see [`AttributeId`].
    pub attribute_id: u32,
    /// For array values, the range of the array to write.
    pub index_range: UAString,
    /// The value to write.
    pub value: DataValue,
}

/// Writes one or more attributes of one or more nodes.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct WriteRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The values to write.
    pub nodes_to_write: Option<Vec<WriteValue>>,
}

/// Response to a [`WriteRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct WriteResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The per-operation results, in the order they were requested.
    pub results: Option<Vec<StatusCode>>,
    /// Diagnostics per operation, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

message_info!(ReadRequest, ReadRequest_Encoding_DefaultBinary);
message_info!(ReadResponse, ReadResponse_Encoding_DefaultBinary);
message_info!(WriteRequest, WriteRequest_Encoding_DefaultBinary);
message_info!(WriteResponse, WriteResponse_Encoding_DefaultBinary);

service_pair!(ReadRequest, ReadResponse);
service_pair!(WriteRequest, WriteResponse);
