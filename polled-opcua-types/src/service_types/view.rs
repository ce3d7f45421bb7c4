// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! View service set: Browse, BrowseNext, TranslateBrowsePathsToNodeIds,
//! RegisterNodes and UnregisterNodes.

use opcua_macros::{BinaryDecodable, BinaryEncodable};

use crate::{
    byte_string::ByteString, data_types::UtcTime, diagnostics::DiagnosticInfo,
    expanded_node_id::ExpandedNodeId, localized_text::LocalizedText, message_info,
    node_id::NodeId, qualified_name::QualifiedName, request_header::RequestHeader,
    response_header::ResponseHeader, service_pair, status_code::StatusCode, ua_enum,
};

#[allow(unused)]
mod opcua {
    pub use crate as types;
}

ua_enum! {
    /// The direction of references to follow in a browse.
    pub enum BrowseDirection: u32 {
        /// Follow references in the forward direction.
        Forward = 0,
        /// Follow references in the inverse direction.
        Inverse = 1,
        /// Follow references in both directions.
        Both = 2,
    }
}

ua_enum! {
    /// The class of a node in the address space.
    pub enum NodeClass: u32 {
        /// No class is specified.
        Unspecified = 0,
        /// An object node.
        Object = 1,
        /// A variable node.
        Variable = 2,
        /// A method node.
        Method = 4,
        /// An object type node.
        ObjectType = 8,
        /// A variable type node.
        VariableType = 16,
        /// A reference type node.
        ReferenceType = 32,
        /// A data type node.
        DataType = 64,
        /// A view node.
        View = 128,
    }
}

/// The view to browse, a null view id means the entire address space.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct ViewDescription {
    /// The node id of the view node.
    pub view_id: NodeId,
    /// Browses the address space as it was at this time, null for now.
    pub timestamp: UtcTime,
    /// Browses a specific version of the view, 0 for the current one.
    pub view_version: u32,
}

/// A node to browse and how to browse it.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct BrowseDescription {
    /// The node to browse.
    pub node_id: NodeId,
    /// The direction of references to follow.
    pub browse_direction: BrowseDirection,
    /// The type of references to follow, null for all.
    pub reference_type_id: NodeId,
    /// Whether subtypes of the reference type are followed too.
    pub include_subtypes: bool,
    /// Mask of node classes to return, 0 for all.
    pub node_class_mask: u32,
    /// Mask of result fields to fill in, see Part 4 5.8.2.
    pub result_mask: u32,
}

/// A reference returned by a browse.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct ReferenceDescription {
    /// The type of the reference.
    pub reference_type_id: NodeId,
    /// Whether the reference is a forward reference.
    pub is_forward: bool,
    /// The node the reference points at.
    pub node_id: ExpandedNodeId,
    /// The browse name of the target node.
    pub browse_name: QualifiedName,
    /// The display name of the target node.
    pub display_name: LocalizedText,
    /// The class of the target node.
    pub node_class: NodeClass,
    /// The type definition of the target node, for objects and variables.
    pub type_definition: ExpandedNodeId,
}

/// The result of browsing a single node.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct BrowseResult {
    /// The status of the operation.
    pub status_code: StatusCode,
    /// Non-null when the server had more references than it was willing to
    /// return in one response. Pass to BrowseNext to continue.
    pub continuation_point: ByteString,
    /// The references found.
    pub references: Option<Vec<ReferenceDescription>>,
}

/// Discovers the references of one or more nodes.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct BrowseRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The view to browse, null for the whole address space.
    pub view: ViewDescription,
    /// Maximum references to return per node, 0 for no limit.
    pub requested_max_references_per_node: u32,
    /// The nodes to browse.
    pub nodes_to_browse: Option<Vec<BrowseDescription>>,
}

/// Response to a [`BrowseRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct BrowseResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The per-node results, in the order they were requested.
    pub results: Option<Vec<BrowseResult>>,
    /// Diagnostics per operation, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// Continues one or more browses using continuation points.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct BrowseNextRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// When `true` the continuation points are released without returning results.
    pub release_continuation_points: bool,
    /// The continuation points from prior Browse or BrowseNext responses.
    pub continuation_points: Option<Vec<ByteString>>,
}

/// Response to a [`BrowseNextRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct BrowseNextResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The per-continuation-point results.
    pub results: Option<Vec<BrowseResult>>,
    /// Diagnostics per operation, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// One element of a relative path.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct RelativePathElement {
    /// The type of reference to follow.
    pub reference_type_id: NodeId,
    /// Whether the reference is followed in the inverse direction.
    pub is_inverse: bool,
    /// Whether subtypes of the reference type are followed too.
    pub include_subtypes: bool,
    /// The browse name of the target node.
    pub target_name: QualifiedName,
}

/// A path through the address space following browse names.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct RelativePath {
    /// The elements of the path.
    pub elements: Option<Vec<RelativePathElement>>,
}

/// A starting node and relative path to resolve to a node id.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct BrowsePath {
    /// The node the path starts at.
    pub starting_node: NodeId,
    /// The path to follow.
    pub relative_path: RelativePath,
}

/// A node a browse path resolved to.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct BrowsePathTarget {
    /// The resolved node.
    pub target_id: ExpandedNodeId,
    /// The index of the first unprocessed path element, `u32::MAX` when the
    /// whole path was processed.
    pub remaining_path_index: u32,
}

/// The result of resolving a single browse path.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct BrowsePathResult {
    /// The status of the operation.
    pub status_code: StatusCode,
    /// The nodes the path resolved to.
    pub targets: Option<Vec<BrowsePathTarget>>,
}

/// Resolves browse paths to node ids.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct TranslateBrowsePathsToNodeIdsRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The paths to resolve.
    pub browse_paths: Option<Vec<BrowsePath>>,
}

/// Response to a [`TranslateBrowsePathsToNodeIdsRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct TranslateBrowsePathsToNodeIdsResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The per-path results, in the order they were requested.
    pub results: Option<Vec<BrowsePathResult>>,
    /// Diagnostics per operation, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// Registers node ids for optimized repeated access.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct RegisterNodesRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The nodes to register.
    pub nodes_to_register: Option<Vec<NodeId>>,
}

/// Response to a [`RegisterNodesRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct RegisterNodesResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// Aliases to use in place of the registered node ids.
    pub registered_node_ids: Option<Vec<NodeId>>,
}

/// Releases node ids registered with RegisterNodes.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct UnregisterNodesRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The registered node ids to release.
    pub nodes_to_unregister: Option<Vec<NodeId>>,
}

/// Response to an [`UnregisterNodesRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct UnregisterNodesResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
}

message_info!(BrowseRequest, BrowseRequest_Encoding_DefaultBinary);
message_info!(BrowseResponse, BrowseResponse_Encoding_DefaultBinary);
message_info!(BrowseNextRequest, BrowseNextRequest_Encoding_DefaultBinary);
message_info!(BrowseNextResponse, BrowseNextResponse_Encoding_DefaultBinary);
message_info!(
    TranslateBrowsePathsToNodeIdsRequest,
    TranslateBrowsePathsToNodeIdsRequest_Encoding_DefaultBinary
);
message_info!(
    TranslateBrowsePathsToNodeIdsResponse,
    TranslateBrowsePathsToNodeIdsResponse_Encoding_DefaultBinary
);
message_info!(RegisterNodesRequest, RegisterNodesRequest_Encoding_DefaultBinary);
message_info!(RegisterNodesResponse, RegisterNodesResponse_Encoding_DefaultBinary);
message_info!(
    UnregisterNodesRequest,
    UnregisterNodesRequest_Encoding_DefaultBinary
);
message_info!(
    UnregisterNodesResponse,
    UnregisterNodesResponse_Encoding_DefaultBinary
);

service_pair!(BrowseRequest, BrowseResponse);
service_pair!(BrowseNextRequest, BrowseNextResponse);
service_pair!(
    TranslateBrowsePathsToNodeIdsRequest,
    TranslateBrowsePathsToNodeIdsResponse
);
service_pair!(RegisterNodesRequest, RegisterNodesResponse);
service_pair!(UnregisterNodesRequest, UnregisterNodesResponse);
