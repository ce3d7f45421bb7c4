// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Query service set: QueryFirst and QueryNext.

use opcua_macros::{BinaryDecodable, BinaryEncodable};

use crate::{
    byte_string::ByteString, diagnostics::DiagnosticInfo, expanded_node_id::ExpandedNodeId,
    extension_object::ExtensionObject, message_info, request_header::RequestHeader,
    response_header::ResponseHeader, service_pair,
    service_types::view::{RelativePath, ViewDescription},
    status_code::StatusCode, string::UAString, ua_enum, variant::Variant,
};

#[allow(unused)]
mod opcua {
    pub use crate as types;
}

ua_enum! {
    /// The operators a content filter element can apply.
    pub enum FilterOperator: u32 {
        /// The two operands are equal.
        Equals = 0,
        /// The operand is null.
        IsNull = 1,
        /// The first operand is greater than the second.
        GreaterThan = 2,
        /// The first operand is less than the second.
        LessThan = 3,
        /// The first operand is greater than or equal to the second.
        GreaterThanOrEqual = 4,
        /// The first operand is less than or equal to the second.
        LessThanOrEqual = 5,
        /// The first operand matches the pattern in the second.
        Like = 6,
        /// Logical negation of the operand.
        Not = 7,
        /// The first operand lies between the second and the third.
        Between = 8,
        /// The first operand is equal to one of the remaining operands.
        InList = 9,
        /// Logical conjunction of the operands.
        And = 10,
        /// Logical disjunction of the operands.
        Or = 11,
        /// Casts the first operand to the type in the second.
        Cast = 12,
        /// The operand is a node in the view.
        InView = 13,
        /// The operand is a node of the given type or a subtype.
        OfType = 14,
        /// The two operand nodes are related as described by the remaining operands.
        RelatedTo = 15,
        /// Bitwise conjunction of the operands.
        BitwiseAnd = 16,
        /// Bitwise disjunction of the operands.
        BitwiseOr = 17,
    }
}

/// An attribute to return for nodes matched by a query.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct QueryDataDescription {
    /// Path from the matched instance to the node holding the attribute.
    pub relative_path: RelativePath,
    /// The id of the attribute.
    pub attribute_id: u32,
    /// For array values, the range of the array to return.
    pub index_range: UAString,
}

/// A type of node to match in a query, and the data to return for matches.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct NodeTypeDescription {
    /// The type definition node instances must conform to.
    pub type_definition_node: ExpandedNodeId,
    /// Whether instances of subtypes match too.
    pub include_sub_types: bool,
    /// The attributes to return for matches.
    pub data_to_return: Option<Vec<QueryDataDescription>>,
}

/// One element of a content filter.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct ContentFilterElement {
    /// The operator to apply.
    pub filter_operator: FilterOperator,
    /// The operands, each one of the filter operand structures.
    pub filter_operands: Option<Vec<ExtensionObject>>,
}

/// A filter over the nodes matched by a query or event subscription.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct ContentFilter {
    /// The filter elements. The first element is the root of the filter tree.
    pub elements: Option<Vec<ContentFilterElement>>,
}

/// The data returned for a single node matched by a query.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct QueryDataSet {
    /// The matched node.
    pub node_id: ExpandedNodeId,
    /// The type definition of the matched node.
    pub type_definition_node: ExpandedNodeId,
    /// The requested attribute values.
    pub values: Option<Vec<Variant>>,
}

/// The result of validating a single content filter element.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct ContentFilterElementResult {
    /// The status of the element.
    pub status_code: StatusCode,
    /// The status of each operand.
    pub operand_status_codes: Option<Vec<StatusCode>>,
    /// Diagnostics for each operand, when requested.
    pub operand_diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// The result of validating a content filter.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct ContentFilterResult {
    /// Results for each filter element.
    pub element_results: Option<Vec<ContentFilterElementResult>>,
    /// Diagnostics for each filter element, when requested.
    pub element_diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// The result of parsing a single node type description.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct ParsingResult {
    /// The status of the description as a whole.
    pub status_code: StatusCode,
    /// The status of each data description.
    pub data_status_codes: Option<Vec<StatusCode>>,
    /// Diagnostics for each data description, when requested.
    pub data_diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// Issues a query against the address space.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct QueryFirstRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The view to query, null for the whole address space.
    pub view: ViewDescription,
    /// The node types to match and the data to return.
    pub node_types: Option<Vec<NodeTypeDescription>>,
    /// The filter applied to matched instances.
    pub filter: ContentFilter,
    /// Maximum data sets to return, 0 for no limit.
    pub max_data_sets_to_return: u32,
    /// Maximum references to return, 0 for no limit.
    pub max_references_to_return: u32,
}

/// Response to a [`QueryFirstRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct QueryFirstResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The matched data.
    pub query_data_sets: Option<Vec<QueryDataSet>>,
    /// Non-null when the server has more results. Pass to QueryNext to continue.
    pub continuation_point: ByteString,
    /// Results of parsing the node type descriptions.
    pub parsing_results: Option<Vec<ParsingResult>>,
    /// Diagnostics per node type description, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
    /// The result of validating the filter.
    pub filter_result: ContentFilterResult,
}

/// Continues a query using a continuation point.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct QueryNextRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// When `true` the continuation point is released without returning results.
    pub release_continuation_point: bool,
    /// The continuation point from the prior QueryFirst or QueryNext response.
    pub continuation_point: ByteString,
}

/// Response to a [`QueryNextRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct QueryNextResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The matched data.
    pub query_data_sets: Option<Vec<QueryDataSet>>,
    /// The continuation point to pass to the next QueryNext call.
    pub revised_continuation_point: ByteString,
}

message_info!(QueryFirstRequest, QueryFirstRequest_Encoding_DefaultBinary);
message_info!(QueryFirstResponse, QueryFirstResponse_Encoding_DefaultBinary);
message_info!(QueryNextRequest, QueryNextRequest_Encoding_DefaultBinary);
message_info!(QueryNextResponse, QueryNextResponse_Encoding_DefaultBinary);

service_pair!(QueryFirstRequest, QueryFirstResponse);
service_pair!(QueryNextRequest, QueryNextResponse);
