//! Discovery services. Each of these opens a transient secure channel without
//! creating a session, issues a single request and closes the channel again,
//! leaving the client's own connection untouched.

use std::time::{Duration, Instant};

use log::{debug, error, warn};

use opcua_core::{
    comms::{
        chunker::Chunker,
        message_chunk::MessageIsFinalType,
        secure_channel::{Role, SecureChannel},
        tcp_types::{encode_framed, HelloMessage, HELLO_MESSAGE},
        url::is_opc_ua_binary_url,
    },
    RequestMessage, ResponseMessage,
};
use opcua_types::{
    ApplicationDescription, ByteString, CloseSecureChannelRequest, DateTime, EndpointDescription,
    FindServersOnNetworkRequest, FindServersOnNetworkResponse, FindServersRequest,
    GetEndpointsRequest, MessageSecurityMode, NodeId, OpenSecureChannelRequest, RequestHeader,
    SecurityTokenRequestType, StatusCode, UAString,
};

use crate::{
    session::{process_service_result, process_unexpected_response},
    transport::{
        Connection, MessageReader, NegotiatedLimits, ReceiveResult, TransportFrame,
        TransportLimits,
    },
    Client,
};

impl Client {
    /// Get the list of endpoints the server at `server_url` offers.
    pub fn get_endpoints(
        &mut self,
        server_url: &str,
    ) -> Result<Vec<EndpointDescription>, StatusCode> {
        debug!("get_endpoints, {}", server_url);
        let mut channel = self.transient_channel(server_url)?;
        let request = GetEndpointsRequest {
            request_header: channel.make_request_header(),
            endpoint_url: UAString::from(server_url),
            locale_ids: None,
            profile_uris: None,
        };
        let response = channel.request(request.into());
        channel.finish();
        match response? {
            ResponseMessage::GetEndpoints(response) => {
                process_service_result(&response.response_header)?;
                Ok(response.endpoints.unwrap_or_default())
            }
            other => Err(process_unexpected_response(other)),
        }
    }

    /// Ask the discovery server at `discovery_url` for the servers it knows.
    pub fn find_servers(
        &mut self,
        discovery_url: &str,
    ) -> Result<Vec<ApplicationDescription>, StatusCode> {
        debug!("find_servers, {}", discovery_url);
        let mut channel = self.transient_channel(discovery_url)?;
        let request = FindServersRequest {
            request_header: channel.make_request_header(),
            endpoint_url: UAString::from(discovery_url),
            locale_ids: None,
            server_uris: None,
        };
        let response = channel.request(request.into());
        channel.finish();
        match response? {
            ResponseMessage::FindServers(response) => {
                process_service_result(&response.response_header)?;
                Ok(response.servers.unwrap_or_default())
            }
            other => Err(process_unexpected_response(other)),
        }
    }

    /// Ask the local discovery server at `discovery_url` for servers found on
    /// the network.
    pub fn find_servers_on_network(
        &mut self,
        discovery_url: &str,
        starting_record_id: u32,
        max_records_to_return: u32,
        server_capability_filter: Option<Vec<UAString>>,
    ) -> Result<FindServersOnNetworkResponse, StatusCode> {
        debug!("find_servers_on_network, {}", discovery_url);
        let mut channel = self.transient_channel(discovery_url)?;
        let request = FindServersOnNetworkRequest {
            request_header: channel.make_request_header(),
            starting_record_id,
            max_records_to_return,
            server_capability_filter,
        };
        let response = channel.request(request.into());
        channel.finish();
        match response? {
            ResponseMessage::FindServersOnNetwork(response) => {
                process_service_result(&response.response_header)?;
                Ok(*response)
            }
            other => Err(process_unexpected_response(other)),
        }
    }

    /// Open a transient channel to the given server: connect, handshake, issue
    /// a security token.
    fn transient_channel(&mut self, server_url: &str) -> Result<TransientChannel, StatusCode> {
        if !is_opc_ua_binary_url(server_url) {
            return Err(StatusCode::BadTcpEndpointUrlInvalid);
        }
        let connection = self.connector.connect(
            server_url,
            &self.config.transport_limits,
            self.config.sync_timeout,
        )?;
        let mut channel = TransientChannel {
            connection,
            reader: MessageReader::new(),
            secure_channel: SecureChannel::new(Role::Client, self.config.decoding_options()),
            negotiated: None,
            timeout: self.config.sync_timeout,
            limits: self.config.transport_limits.clone(),
            endpoint_url: server_url.to_string(),
            channel_lifetime: self.config.channel_lifetime,
        };
        if let Err(status) = channel.open() {
            channel.connection.close();
            return Err(status);
        }
        Ok(channel)
    }
}

/// A one-shot secure channel carrying a single discovery request. There is no
/// session above it and no multiplexing on it; requests complete in order.
struct TransientChannel {
    connection: Box<dyn Connection>,
    reader: MessageReader,
    secure_channel: SecureChannel,
    negotiated: Option<NegotiatedLimits>,
    timeout: Duration,
    limits: TransportLimits,
    endpoint_url: String,
    channel_lifetime: u32,
}

impl TransientChannel {
    fn make_request_header(&self) -> RequestHeader {
        RequestHeader {
            authentication_token: NodeId::null(),
            timestamp: DateTime::now(),
            request_handle: 1,
            timeout_hint: self.timeout.as_millis().min(u32::MAX as u128) as u32,
            ..Default::default()
        }
    }

    fn open(&mut self) -> Result<(), StatusCode> {
        self.hello_handshake()?;
        let request = OpenSecureChannelRequest {
            request_header: self.make_request_header(),
            client_protocol_version: 0,
            request_type: SecurityTokenRequestType::Issue,
            security_mode: MessageSecurityMode::None,
            client_nonce: ByteString::null(),
            requested_lifetime: self.channel_lifetime,
        };
        match self.request(request.into())? {
            ResponseMessage::OpenSecureChannel(response) => {
                process_service_result(&response.response_header)?;
                self.secure_channel.set_security_token(response.security_token);
                Ok(())
            }
            other => Err(process_unexpected_response(other)),
        }
    }

    fn hello_handshake(&mut self) -> Result<(), StatusCode> {
        let hello = HelloMessage::new(
            &self.endpoint_url,
            self.limits.send_buffer_size,
            self.limits.recv_buffer_size,
            self.limits.max_message_size,
            self.limits.max_chunk_count,
        );
        let data = encode_framed(HELLO_MESSAGE, &hello)?;
        self.connection.send(&data)?;

        let deadline = Instant::now() + self.timeout;
        loop {
            match self.next_frame(deadline)? {
                TransportFrame::Acknowledge(ack) => {
                    self.negotiated = Some(NegotiatedLimits::from_acknowledge(&self.limits, &ack));
                    return Ok(());
                }
                TransportFrame::Error(err) => {
                    error!(
                        "Server rejected the connection: {} ({})",
                        err.status_code(),
                        err.reason
                    );
                    return Err(err.status_code());
                }
                TransportFrame::Chunk(_) => return Err(StatusCode::BadCommunicationError),
            }
        }
    }

    /// Send one request and wait for its response.
    fn request(&mut self, mut message: RequestMessage) -> Result<ResponseMessage, StatusCode> {
        if message.request_header().request_handle == 0 {
            *message.request_header_mut() = self.make_request_header();
        }
        let request_id = self.secure_channel.next_request_id();
        self.send_message(request_id, &message)?;

        let deadline = Instant::now() + self.timeout;
        let mut chunks = Vec::new();
        loop {
            let chunk = match self.next_frame(deadline)? {
                TransportFrame::Chunk(chunk) => chunk,
                TransportFrame::Error(err) => return Err(err.status_code()),
                TransportFrame::Acknowledge(_) => return Err(StatusCode::BadCommunicationError),
            };
            let info = self
                .secure_channel
                .verify_chunk(&chunk)
                .map_err(StatusCode::from)?;
            if info.sequence_header.request_id != request_id {
                warn!(
                    "Discarding chunk for unexpected request id {}",
                    info.sequence_header.request_id
                );
                continue;
            }
            let is_final = info.message_header.is_final;
            chunks.push(chunk);
            match is_final {
                MessageIsFinalType::Intermediate => continue,
                MessageIsFinalType::FinalError => return Err(StatusCode::BadCommunicationError),
                MessageIsFinalType::Final => {
                    return Chunker::decode::<ResponseMessage>(
                        &chunks,
                        &self.secure_channel,
                        None,
                    )
                    .map_err(StatusCode::from);
                }
            }
        }
    }

    fn send_message(&mut self, request_id: u32, message: &RequestMessage) -> Result<(), StatusCode> {
        let limits = self.negotiated.unwrap_or(NegotiatedLimits {
            send_chunk_size: self.limits.send_buffer_size,
            send_max_message_size: 0,
            send_max_chunk_count: 0,
        });
        let first_sequence_number = self.secure_channel.sequence_number() + 1;
        let chunks = Chunker::encode(
            first_sequence_number,
            request_id,
            limits.send_max_message_size,
            limits.send_chunk_size,
            &self.secure_channel,
            message,
        )?;
        self.secure_channel
            .set_sequence_number(first_sequence_number + chunks.len() as u32 - 1);
        for chunk in &chunks {
            self.connection.send(&chunk.data)?;
        }
        Ok(())
    }

    fn next_frame(&mut self, deadline: Instant) -> Result<TransportFrame, StatusCode> {
        let options = self.secure_channel.decoding_options();
        loop {
            if let Some(frame) = self.reader.next_frame(&options)? {
                return Ok(frame);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(StatusCode::BadTimeout);
            }
            match self
                .connection
                .receive((deadline - now).min(Duration::from_millis(50)))
            {
                ReceiveResult::Bytes(data) => self.reader.push(&data),
                ReceiveResult::Timeout => {}
                ReceiveResult::Closed => return Err(StatusCode::BadConnectionClosed),
            }
        }
    }

    /// Close the channel and the connection underneath it, best-effort.
    fn finish(mut self) {
        let request = CloseSecureChannelRequest {
            request_header: self.make_request_header(),
        };
        let request_id = self.secure_channel.next_request_id();
        if let Err(status) = self.send_message(request_id, &request.into()) {
            debug!("Failed to send the close channel message: {status}");
        }
        self.connection.close();
    }
}
