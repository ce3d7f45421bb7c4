// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! SecureChannel service set.

use opcua_macros::{BinaryDecodable, BinaryEncodable};

use crate::{
    byte_string::ByteString, data_types::UtcTime, message_info, request_header::RequestHeader,
    response_header::ResponseHeader, service_pair, ua_enum,
};

#[allow(unused)]
mod opcua {
    pub use crate as types;
}

ua_enum! {
    /// The type of security token request, used when opening a secure channel.
    pub enum SecurityTokenRequestType: u32 {
        /// Create a new security token for a new secure channel.
        Issue = 0,
        /// Create a new security token for an existing secure channel.
        Renew = 1,
    }
}

ua_enum! {
    /// The security applied to messages on a secure channel.
    pub enum MessageSecurityMode: u32 {
        /// Invalid security mode.
        Invalid = 0,
        /// Messages are neither signed nor encrypted.
        None = 1,
        /// Messages are signed but not encrypted.
        Sign = 2,
        /// Messages are signed and encrypted.
        SignAndEncrypt = 3,
    }
}

impl Default for MessageSecurityMode {
    fn default() -> Self {
        MessageSecurityMode::None
    }
}

/// The token that identifies a set of keys for an active secure channel.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct ChannelSecurityToken {
    /// The id of the secure channel the token belongs to.
    pub channel_id: u32,
    /// The id of the token, unique within the channel.
    pub token_id: u32,
    /// The time the token was created by the server.
    pub created_at: UtcTime,
    /// The lifetime of the token in milliseconds.
    pub revised_lifetime: u32,
}

/// Opens or renews a secure channel.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct OpenSecureChannelRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The protocol version spoken by the client, 0 for this version of the protocol.
    pub client_protocol_version: u32,
    /// Whether the channel is issued or renewed.
    pub request_type: SecurityTokenRequestType,
    /// The security to apply to messages on the channel.
    pub security_mode: MessageSecurityMode,
    /// Client nonce used in key derivation, empty under `SecurityPolicy#None`.
    pub client_nonce: ByteString,
    /// The requested lifetime of the security token in milliseconds.
    pub requested_lifetime: u32,
}

/// Response to an [`OpenSecureChannelRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct OpenSecureChannelResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The protocol version spoken by the server.
    pub server_protocol_version: u32,
    /// The security token installed for the channel.
    pub security_token: ChannelSecurityToken,
    /// Server nonce used in key derivation, empty under `SecurityPolicy#None`.
    pub server_nonce: ByteString,
}

/// Closes a secure channel. The server does not respond to this message.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct CloseSecureChannelRequest {
    /// Common request header.
    pub request_header: RequestHeader,
}

/// Response to a [`CloseSecureChannelRequest`], never actually sent.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct CloseSecureChannelResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
}

message_info!(
    OpenSecureChannelRequest,
    OpenSecureChannelRequest_Encoding_DefaultBinary
);
message_info!(
    OpenSecureChannelResponse,
    OpenSecureChannelResponse_Encoding_DefaultBinary
);
message_info!(
    CloseSecureChannelRequest,
    CloseSecureChannelRequest_Encoding_DefaultBinary
);
message_info!(
    CloseSecureChannelResponse,
    CloseSecureChannelResponse_Encoding_DefaultBinary
);

service_pair!(OpenSecureChannelRequest, OpenSecureChannelResponse);
service_pair!(CloseSecureChannelRequest, CloseSecureChannelResponse);
