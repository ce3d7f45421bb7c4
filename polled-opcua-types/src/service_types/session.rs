// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Session service set, plus the user identity tokens carried by ActivateSession.

use opcua_macros::{BinaryDecodable, BinaryEncodable};

use crate::{
    byte_string::ByteString,
    diagnostics::DiagnosticInfo,
    extension_object::ExtensionObject,
    message_info,
    node_id::NodeId,
    request_header::RequestHeader,
    response_header::ResponseHeader,
    service_pair,
    service_types::discovery::{ApplicationDescription, EndpointDescription},
    status_code::StatusCode,
    string::UAString,
};

#[allow(unused)]
mod opcua {
    pub use crate as types;
}

/// A digital signature.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct SignatureData {
    /// The URI of the algorithm used to create the signature.
    pub algorithm: UAString,
    /// The signature itself.
    pub signature: ByteString,
}

/// A software certificate with a digital signature.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct SignedSoftwareCertificate {
    /// The certificate data serialized as a byte string.
    pub certificate_data: ByteString,
    /// The signature over the certificate data.
    pub signature: ByteString,
}

/// Identity token for anonymous access.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct AnonymousIdentityToken {
    /// The policy id of the token policy this token conforms to.
    pub policy_id: UAString,
}

/// Identity token carrying a user name and password.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct UserNameIdentityToken {
    /// The policy id of the token policy this token conforms to.
    pub policy_id: UAString,
    /// The name of the user.
    pub user_name: UAString,
    /// The password, possibly encrypted depending on the token policy.
    pub password: ByteString,
    /// The URI of the algorithm the password is encrypted with, null for none.
    pub encryption_algorithm: UAString,
}

/// Creates a session on the server.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct CreateSessionRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// A description of the client application.
    pub client_description: ApplicationDescription,
    /// The URI of the server the client expects to talk to.
    pub server_uri: UAString,
    /// The network address the client used to connect.
    pub endpoint_url: UAString,
    /// A human readable name for the session.
    pub session_name: UAString,
    /// Client nonce, echoed back in the server signature.
    pub client_nonce: ByteString,
    /// The client application instance certificate, null when unsecured.
    pub client_certificate: ByteString,
    /// Requested session timeout in milliseconds.
    pub requested_session_timeout: f64,
    /// Largest response message the client will accept, 0 for no limit.
    pub max_response_message_size: u32,
}

/// Response to a [`CreateSessionRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct CreateSessionResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The id the server assigned to the session.
    pub session_id: NodeId,
    /// The secret token the client attaches to every request on this session.
    pub authentication_token: NodeId,
    /// The session timeout granted by the server, in milliseconds.
    pub revised_session_timeout: f64,
    /// Server nonce used for signatures and password encryption.
    pub server_nonce: ByteString,
    /// The server application instance certificate.
    pub server_certificate: ByteString,
    /// The endpoints available on the server, echoed so the client can verify them.
    pub server_endpoints: Option<Vec<EndpointDescription>>,
    /// Obsolete field, always empty.
    pub server_software_certificates: Option<Vec<SignedSoftwareCertificate>>,
    /// Signature over the client nonce and certificate.
    pub server_signature: SignatureData,
    /// Largest request message the server will accept, 0 for no limit.
    pub max_request_message_size: u32,
}

/// Activates a created session by proving the client identity.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct ActivateSessionRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// Signature over the server nonce and certificate, null when unsecured.
    pub client_signature: SignatureData,
    /// Obsolete field, always empty.
    pub client_software_certificates: Option<Vec<SignedSoftwareCertificate>>,
    /// The locales the client prefers, in priority order.
    pub locale_ids: Option<Vec<UAString>>,
    /// The identity of the user, an extension object holding one of the identity token types.
    pub user_identity_token: ExtensionObject,
    /// Signature created with the user identity token, null for tokens that carry no secret.
    pub user_token_signature: SignatureData,
}

/// Response to an [`ActivateSessionRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct ActivateSessionResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// A fresh server nonce for use in the next activation.
    pub server_nonce: ByteString,
    /// Results for the supplied software certificates.
    pub results: Option<Vec<StatusCode>>,
    /// Diagnostics for the supplied software certificates.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// Closes a session.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct CloseSessionRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// Whether subscriptions owned by the session are deleted with it.
    pub delete_subscriptions: bool,
}

/// Response to a [`CloseSessionRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct CloseSessionResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
}

message_info!(
    AnonymousIdentityToken,
    AnonymousIdentityToken_Encoding_DefaultBinary
);
message_info!(
    UserNameIdentityToken,
    UserNameIdentityToken_Encoding_DefaultBinary
);
message_info!(CreateSessionRequest, CreateSessionRequest_Encoding_DefaultBinary);
message_info!(CreateSessionResponse, CreateSessionResponse_Encoding_DefaultBinary);
message_info!(
    ActivateSessionRequest,
    ActivateSessionRequest_Encoding_DefaultBinary
);
message_info!(
    ActivateSessionResponse,
    ActivateSessionResponse_Encoding_DefaultBinary
);
message_info!(CloseSessionRequest, CloseSessionRequest_Encoding_DefaultBinary);
message_info!(CloseSessionResponse, CloseSessionResponse_Encoding_DefaultBinary);

service_pair!(CreateSessionRequest, CreateSessionResponse);
service_pair!(ActivateSessionRequest, ActivateSessionResponse);
service_pair!(CloseSessionRequest, CloseSessionResponse);
