// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Discovery service set: GetEndpoints, FindServers and FindServersOnNetwork.
//! These services are issued over a secure channel without a session.

use opcua_macros::{BinaryDecodable, BinaryEncodable};

use crate::{
    byte_string::ByteString, data_types::UtcTime, localized_text::LocalizedText, message_info,
    request_header::RequestHeader, response_header::ResponseHeader, service_pair,
    service_types::channel::MessageSecurityMode, string::UAString, ua_enum,
};

#[allow(unused)]
mod opcua {
    pub use crate as types;
}

ua_enum! {
    /// The kind of OPC UA application.
    pub enum ApplicationType: u32 {
        /// The application is a server.
        Server = 0,
        /// The application is a client.
        Client = 1,
        /// The application is both a client and a server.
        ClientAndServer = 2,
        /// The application is a discovery server.
        DiscoveryServer = 3,
    }
}

ua_enum! {
    /// The kind of user identity token.
    pub enum UserTokenType: u32 {
        /// No user information is available.
        Anonymous = 0,
        /// A user name and password.
        UserName = 1,
        /// An X509v3 certificate.
        Certificate = 2,
        /// Any token issued by an authorization service.
        IssuedToken = 3,
    }
}

/// Describes an OPC UA application and how to discover it.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct ApplicationDescription {
    /// The globally unique identifier for the application instance.
    pub application_uri: UAString,
    /// The globally unique identifier for the product.
    pub product_uri: UAString,
    /// A localized descriptive name for the application.
    pub application_name: LocalizedText,
    /// The type of application.
    pub application_type: ApplicationType,
    /// URI of a gateway server the application is reachable through.
    pub gateway_server_uri: UAString,
    /// URI of the discovery profile supported by the application.
    pub discovery_profile_uri: UAString,
    /// URLs the application can be reached on for discovery.
    pub discovery_urls: Option<Vec<UAString>>,
}

impl Default for ApplicationDescription {
    fn default() -> Self {
        ApplicationDescription {
            application_uri: UAString::null(),
            product_uri: UAString::null(),
            application_name: LocalizedText::null(),
            application_type: ApplicationType::Client,
            gateway_server_uri: UAString::null(),
            discovery_profile_uri: UAString::null(),
            discovery_urls: None,
        }
    }
}

/// A user token policy supported by an endpoint.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct UserTokenPolicy {
    /// Server-assigned identifier for the policy, echoed back in identity tokens.
    pub policy_id: UAString,
    /// The kind of token the policy describes.
    pub token_type: UserTokenType,
    /// The type of issued token, for `IssuedToken` policies.
    pub issued_token_type: UAString,
    /// The endpoint of the authorization service, for `IssuedToken` policies.
    pub issuer_endpoint_url: UAString,
    /// The security policy applied to the token when it is passed over the wire.
    pub security_policy_uri: UAString,
}

/// Describes an endpoint a server offers connections on.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct EndpointDescription {
    /// The network address of the endpoint.
    pub endpoint_url: UAString,
    /// A description of the server offering the endpoint.
    pub server: ApplicationDescription,
    /// The server application instance certificate.
    pub server_certificate: ByteString,
    /// The security mode messages on the endpoint must use.
    pub security_mode: MessageSecurityMode,
    /// The URI of the security policy messages on the endpoint must use.
    pub security_policy_uri: UAString,
    /// The user token policies accepted on the endpoint.
    pub user_identity_tokens: Option<Vec<UserTokenPolicy>>,
    /// The URI of the transport profile of the endpoint.
    pub transport_profile_uri: UAString,
    /// Relative security level of the endpoint, higher is more secure.
    pub security_level: u8,
}

impl Default for EndpointDescription {
    fn default() -> Self {
        EndpointDescription {
            endpoint_url: UAString::null(),
            server: ApplicationDescription::default(),
            server_certificate: ByteString::null(),
            security_mode: MessageSecurityMode::None,
            security_policy_uri: UAString::null(),
            user_identity_tokens: None,
            transport_profile_uri: UAString::null(),
            security_level: 0,
        }
    }
}

impl From<&str> for EndpointDescription {
    fn from(endpoint_url: &str) -> Self {
        EndpointDescription {
            endpoint_url: UAString::from(endpoint_url),
            ..Default::default()
        }
    }
}

/// Asks a server for the endpoints it offers.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct GetEndpointsRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The address the client used to reach the server.
    pub endpoint_url: UAString,
    /// Locales to use for localized strings in the response.
    pub locale_ids: Option<Vec<UAString>>,
    /// Transport profiles the returned endpoints must match, empty for all.
    pub profile_uris: Option<Vec<UAString>>,
}

/// Response to a [`GetEndpointsRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct GetEndpointsResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The endpoints offered by the server.
    pub endpoints: Option<Vec<EndpointDescription>>,
}

/// Asks a discovery server for the servers it knows about.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct FindServersRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The address the client used to reach the discovery server.
    pub endpoint_url: UAString,
    /// Locales to use for localized strings in the response.
    pub locale_ids: Option<Vec<UAString>>,
    /// Server URIs the response is restricted to, empty for all.
    pub server_uris: Option<Vec<UAString>>,
}

/// Response to a [`FindServersRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct FindServersResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// Descriptions of the known servers.
    pub servers: Option<Vec<ApplicationDescription>>,
}

/// A server known to the local discovery server, as returned by FindServersOnNetwork.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct ServerOnNetwork {
    /// A monotonic record id assigned by the discovery server.
    pub record_id: u32,
    /// The mDNS name of the server.
    pub server_name: UAString,
    /// The URL of the server's discovery endpoint.
    pub discovery_url: UAString,
    /// The set of capability identifiers advertised by the server.
    pub server_capabilities: Option<Vec<UAString>>,
}

/// Asks a local discovery server for servers found on the network via mDNS.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct FindServersOnNetworkRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// Only records with an id greater than or equal to this are returned.
    pub starting_record_id: u32,
    /// Maximum number of records to return, 0 for no limit.
    pub max_records_to_return: u32,
    /// Capability identifiers the returned servers must all carry.
    pub server_capability_filter: Option<Vec<UAString>>,
}

/// Response to a [`FindServersOnNetworkRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct FindServersOnNetworkResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The time the discovery server last reset its record ids.
    pub last_counter_reset_time: UtcTime,
    /// The matching records.
    pub servers: Option<Vec<ServerOnNetwork>>,
}

message_info!(GetEndpointsRequest, GetEndpointsRequest_Encoding_DefaultBinary);
message_info!(GetEndpointsResponse, GetEndpointsResponse_Encoding_DefaultBinary);
message_info!(FindServersRequest, FindServersRequest_Encoding_DefaultBinary);
message_info!(FindServersResponse, FindServersResponse_Encoding_DefaultBinary);
message_info!(
    FindServersOnNetworkRequest,
    FindServersOnNetworkRequest_Encoding_DefaultBinary
);
message_info!(
    FindServersOnNetworkResponse,
    FindServersOnNetworkResponse_Encoding_DefaultBinary
);

service_pair!(GetEndpointsRequest, GetEndpointsResponse);
service_pair!(FindServersRequest, FindServersResponse);
service_pair!(FindServersOnNetworkRequest, FindServersOnNetworkResponse);
