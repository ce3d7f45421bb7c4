// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Method service set: Call.

use opcua_macros::{BinaryDecodable, BinaryEncodable};

use crate::{
    diagnostics::DiagnosticInfo, message_info, node_id::NodeId, request_header::RequestHeader,
    response_header::ResponseHeader, service_pair, status_code::StatusCode, variant::Variant,
};

#[allow(unused)]
mod opcua {
    pub use crate as types;
}

/// A single method invocation.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct CallMethodRequest {
    /// The object the method is invoked on.
    pub object_id: NodeId,
    /// The method to invoke.
    pub method_id: NodeId,
    /// The input arguments to pass.
    pub input_arguments: Option<Vec<Variant>>,
}

/// The result of a single method invocation.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct CallMethodResult {
    /// The status of the invocation as a whole.
    pub status_code: StatusCode,
    /// The status of each input argument.
    pub input_argument_results: Option<Vec<StatusCode>>,
    /// Diagnostics for each input argument, when requested.
    pub input_argument_diagnostic_infos: Option<Vec<DiagnosticInfo>>,
    /// The output arguments produced by the method.
    pub output_arguments: Option<Vec<Variant>>,
}

/// Invokes one or more methods.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct CallRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The methods to invoke.
    pub methods_to_call: Option<Vec<CallMethodRequest>>,
}

/// Response to a [`CallRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct CallResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The per-method results, in the order they were requested.
    pub results: Option<Vec<CallMethodResult>>,
    /// Diagnostics per operation, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

message_info!(CallRequest, CallRequest_Encoding_DefaultBinary);
message_info!(CallResponse, CallResponse_Encoding_DefaultBinary);

service_pair!(CallRequest, CallResponse);
