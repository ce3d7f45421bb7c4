// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! NodeManagement service set: AddNodes, AddReferences, DeleteNodes and DeleteReferences.

use opcua_macros::{BinaryDecodable, BinaryEncodable};

use crate::{
    diagnostics::DiagnosticInfo, expanded_node_id::ExpandedNodeId,
    extension_object::ExtensionObject, message_info, node_id::NodeId,
    qualified_name::QualifiedName, request_header::RequestHeader,
    response_header::ResponseHeader, service_pair, service_types::view::NodeClass,
    status_code::StatusCode, string::UAString,
};

#[allow(unused)]
mod opcua {
    pub use crate as types;
}

/// A node to add to the address space.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct AddNodesItem {
    /// The parent of the new node.
    pub parent_node_id: ExpandedNodeId,
    /// The type of reference from the parent to the new node.
    pub reference_type_id: NodeId,
    /// The requested id for the new node, null to let the server assign one.
    pub requested_new_node_id: ExpandedNodeId,
    /// The browse name of the new node.
    pub browse_name: QualifiedName,
    /// The class of the new node.
    pub node_class: NodeClass,
    /// The attributes of the new node, one of the node attribute structures.
    pub node_attributes: ExtensionObject,
    /// The type definition of the new node, for objects and variables.
    pub type_definition: ExpandedNodeId,
}

/// The result of adding a single node.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct AddNodesResult {
    /// The status of the operation.
    pub status_code: StatusCode,
    /// The id assigned to the new node.
    pub added_node_id: NodeId,
}

/// Adds one or more nodes to the address space.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct AddNodesRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The nodes to add.
    pub nodes_to_add: Option<Vec<AddNodesItem>>,
}

/// Response to an [`AddNodesRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct AddNodesResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The per-node results, in the order they were requested.
    pub results: Option<Vec<AddNodesResult>>,
    /// Diagnostics per operation, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// A reference to add between two nodes.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct AddReferencesItem {
    /// The source of the reference.
    pub source_node_id: NodeId,
    /// The type of the reference.
    pub reference_type_id: NodeId,
    /// Whether the reference is added in the forward direction.
    pub is_forward: bool,
    /// The URI of the server holding the target node, null for the local server.
    pub target_server_uri: UAString,
    /// The target of the reference.
    pub target_node_id: ExpandedNodeId,
    /// The class of the target node.
    pub target_node_class: NodeClass,
}

/// Adds one or more references between nodes.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct AddReferencesRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The references to add.
    pub references_to_add: Option<Vec<AddReferencesItem>>,
}

/// Response to an [`AddReferencesRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct AddReferencesResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The per-reference results, in the order they were requested.
    pub results: Option<Vec<StatusCode>>,
    /// Diagnostics per operation, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// A node to delete from the address space.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct DeleteNodesItem {
    /// The node to delete.
    pub node_id: NodeId,
    /// Whether references pointing at the node are deleted too.
    pub delete_target_references: bool,
}

/// Deletes one or more nodes from the address space.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct DeleteNodesRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The nodes to delete.
    pub nodes_to_delete: Option<Vec<DeleteNodesItem>>,
}

/// Response to a [`DeleteNodesRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct DeleteNodesResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The per-node results, in the order they were requested.
    pub results: Option<Vec<StatusCode>>,
    /// Diagnostics per operation, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// A reference to delete.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct DeleteReferencesItem {
    /// The source of the reference.
    pub source_node_id: NodeId,
    /// The type of the reference.
    pub reference_type_id: NodeId,
    /// Whether the forward direction of the reference is deleted.
    pub is_forward: bool,
    /// The target of the reference.
    pub target_node_id: ExpandedNodeId,
    /// Whether the opposite direction is deleted too.
    pub delete_bidirectional: bool,
}

/// Deletes one or more references between nodes.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct DeleteReferencesRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The references to delete.
    pub references_to_delete: Option<Vec<DeleteReferencesItem>>,
}

/// Response to a [`DeleteReferencesRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct DeleteReferencesResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The per-reference results, in the order they were requested.
    pub results: Option<Vec<StatusCode>>,
    /// Diagnostics per operation, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

message_info!(AddNodesRequest, AddNodesRequest_Encoding_DefaultBinary);
message_info!(AddNodesResponse, AddNodesResponse_Encoding_DefaultBinary);
message_info!(AddReferencesRequest, AddReferencesRequest_Encoding_DefaultBinary);
message_info!(AddReferencesResponse, AddReferencesResponse_Encoding_DefaultBinary);
message_info!(DeleteNodesRequest, DeleteNodesRequest_Encoding_DefaultBinary);
message_info!(DeleteNodesResponse, DeleteNodesResponse_Encoding_DefaultBinary);
message_info!(
    DeleteReferencesRequest,
    DeleteReferencesRequest_Encoding_DefaultBinary
);
message_info!(
    DeleteReferencesResponse,
    DeleteReferencesResponse_Encoding_DefaultBinary
);

service_pair!(AddNodesRequest, AddNodesResponse);
service_pair!(AddReferencesRequest, AddReferencesResponse);
service_pair!(DeleteNodesRequest, DeleteNodesResponse);
service_pair!(DeleteReferencesRequest, DeleteReferencesResponse);
