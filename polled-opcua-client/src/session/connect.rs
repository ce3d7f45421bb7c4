//! Establishing the layered connection: TCP, the hello handshake, the secure
//! channel and finally the session, advancing the state machine one layer at
//! a time.

use std::time::{Duration, Instant};

use log::{debug, error, warn};

use opcua_core::comms::{
    tcp_types::{encode_framed, HelloMessage, HELLO_MESSAGE},
    url::{is_opc_ua_binary_url, url_matches_except_host},
};
use opcua_types::{
    ActivateSessionRequest, AnonymousIdentityToken, ByteString, CreateSessionRequest, DateTime,
    ExtensionObject, GetEndpointsRequest, NodeId, OpenSecureChannelRequest,
    OpenSecureChannelResponse, RequestHeader, SecurityTokenRequestType, SignatureData, StatusCode,
    UAString, UserNameIdentityToken, UserTokenType,
};

use opcua_core::ResponseMessage;

use crate::transport::{NegotiatedLimits, ReceiveResult, TransportFrame};
use crate::IdentityToken;

use super::{process_service_result, process_unexpected_response, Client, ClientState};

/// The conventional policy id used when a server does not advertise one for a
/// token type.
const FALLBACK_USERNAME_POLICY_ID: &str = "username";
const FALLBACK_ANONYMOUS_POLICY_ID: &str = "anonymous";

impl Client {
    /// Connect to the server at `endpoint_url` with an anonymous identity,
    /// advancing Disconnected → Connected → SecureChannel → Session.
    ///
    /// On failure before the secure channel is established the client rolls
    /// back to `Disconnected` before returning. Failures after that leave the
    /// client in the last state it reached.
    pub fn connect(&mut self, endpoint_url: &str) -> Result<(), StatusCode> {
        self.connect_inner(endpoint_url, IdentityToken::Anonymous)
    }

    /// As [`Client::connect`], activating the session with a user name and
    /// password using the token policy advertised by the server.
    pub fn connect_username(
        &mut self,
        endpoint_url: &str,
        user: &str,
        pass: &str,
    ) -> Result<(), StatusCode> {
        self.connect_inner(
            endpoint_url,
            IdentityToken::UserName(user.to_string(), pass.to_string()),
        )
    }

    fn connect_inner(
        &mut self,
        endpoint_url: &str,
        identity_token: IdentityToken,
    ) -> Result<(), StatusCode> {
        if self.state != ClientState::Disconnected {
            error!("Cannot connect, the client is not disconnected");
            return Err(StatusCode::BadInvalidState);
        }
        if !is_opc_ua_binary_url(endpoint_url) {
            return Err(StatusCode::BadTcpEndpointUrlInvalid);
        }
        self.endpoint_url = endpoint_url.to_string();
        self.identity_token = identity_token;

        // Layer 1: the TCP connection.
        let connection = self.connector.connect(
            endpoint_url,
            &self.config.transport_limits,
            self.config.sync_timeout,
        )?;
        self.connection = Some(connection);
        self.set_state(ClientState::Connected);

        // Layer 2: the hello handshake followed by an issued secure channel.
        // Failing either rolls back to Disconnected.
        if let Err(status) = self.establish_secure_channel() {
            self.transport_failure(StatusCode::BadSecureChannelClosed);
            return Err(status);
        }
        self.set_state(ClientState::SecureChannel);
        self.start_renewal_timer()?;

        // Layer 3: the session. Failures leave the client on the open channel.
        self.create_session()?;
        self.activate_session()?;
        self.set_state(ClientState::Session);

        self.pump_enable();
        Ok(())
    }

    fn establish_secure_channel(&mut self) -> Result<(), StatusCode> {
        self.hello_handshake()?;
        self.open_secure_channel(SecurityTokenRequestType::Issue)
    }

    /// Renew the secure channel token before its lifetime expires. On success
    /// a fresh token id and lifetime window are installed and the state moves
    /// to `SessionRenewed` when a session is present. A failed renewal closes
    /// the channel: every pending request is failed with
    /// `BadSecureChannelClosed` and the client falls back to `Disconnected`.
    pub fn renew_secure_channel(&mut self) -> Result<(), StatusCode> {
        if self.state < ClientState::SecureChannel {
            return Err(StatusCode::BadInvalidState);
        }
        match self.open_secure_channel(SecurityTokenRequestType::Renew) {
            Ok(()) => {
                // The server may have revised the lifetime; follow it with the
                // check interval.
                if let Some(id) = self.renewal_timer {
                    let interval = self
                        .secure_channel
                        .token_renewal_check_interval()
                        .max(super::MIN_TIMER_INTERVAL);
                    let _ = self.change_repeated_callback_interval(id, interval);
                }
                if !self.session_id.is_null() {
                    self.set_state(ClientState::SessionRenewed);
                } else {
                    self.set_state(ClientState::SecureChannel);
                }
                Ok(())
            }
            Err(status) => {
                error!("Failed to renew the secure channel: {status}");
                self.transport_failure(StatusCode::BadSecureChannelClosed);
                Err(status)
            }
        }
    }

    /// Register the repeated callback that checks whether the channel token is
    /// due for renewal, firing every `min(lifetime / 4, 60s)`.
    fn start_renewal_timer(&mut self) -> Result<(), StatusCode> {
        let interval = self
            .secure_channel
            .token_renewal_check_interval()
            .max(super::MIN_TIMER_INTERVAL);
        let id = self.add_repeated_callback(interval, |client: &mut Client| {
            if client.state >= ClientState::SecureChannel
                && client.secure_channel.should_renew_security_token()
            {
                debug!("The secure channel token is due for renewal");
                let _ = client.renew_secure_channel();
            }
        })?;
        self.renewal_timer = Some(id);
        Ok(())
    }

    /// Send HEL and wait for the server's ACK, installing the revised
    /// transport limits.
    fn hello_handshake(&mut self) -> Result<(), StatusCode> {
        let limits = self.config.transport_limits.clone();
        let hello = HelloMessage::new(
            &self.endpoint_url,
            limits.send_buffer_size,
            limits.recv_buffer_size,
            limits.max_message_size,
            limits.max_chunk_count,
        );
        log::trace!("Send hello message: {hello:?}");
        let data = encode_framed(HELLO_MESSAGE, &hello)?;
        self.connection
            .as_mut()
            .ok_or(StatusCode::BadNotConnected)?
            .send(&data)?;

        let options = self.secure_channel.decoding_options();
        let deadline = Instant::now() + self.config.sync_timeout;
        loop {
            if let Some(frame) = self.reader.next_frame(&options)? {
                match frame {
                    TransportFrame::Acknowledge(ack) => {
                        if ack.send_buffer_size > hello.receive_buffer_size {
                            warn!("Acknowledged send buffer size is greater than receive buffer size in hello message");
                        }
                        if ack.receive_buffer_size > hello.send_buffer_size {
                            warn!("Acknowledged receive buffer size is greater than send buffer size in hello message");
                        }
                        log::trace!("Received acknowledgement: {:?}", ack);
                        self.negotiated = Some(NegotiatedLimits::from_acknowledge(&limits, &ack));
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
                    TransportFrame::Chunk(_) => {
                        error!("Expected ACK, received a message chunk");
                        return Err(StatusCode::BadCommunicationError);
                    }
                }
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(StatusCode::BadTimeout);
            }
            let connection = self.connection.as_mut().ok_or(StatusCode::BadNotConnected)?;
            match connection.receive((deadline - now).min(Duration::from_millis(50))) {
                ReceiveResult::Bytes(data) => self.reader.push(&data),
                ReceiveResult::Timeout => {}
                ReceiveResult::Closed => return Err(StatusCode::BadConnectionClosed),
            }
        }
    }

    /// Issue or renew the channel security token. The request header of an
    /// OpenSecureChannel request never carries an authentication token.
    fn open_secure_channel(
        &mut self,
        request_type: SecurityTokenRequestType,
    ) -> Result<(), StatusCode> {
        debug!("open_secure_channel({:?})", request_type);
        let request = OpenSecureChannelRequest {
            request_header: RequestHeader {
                authentication_token: NodeId::null(),
                timestamp: DateTime::now(),
                request_handle: self.request_handle.next(),
                timeout_hint: self.config.sync_timeout.as_millis().min(u32::MAX as u128) as u32,
                ..Default::default()
            },
            client_protocol_version: 0,
            request_type,
            security_mode: opcua_types::MessageSecurityMode::None,
            client_nonce: ByteString::null(),
            requested_lifetime: self.config.channel_lifetime,
        };
        let response = self.send_request(request.into(), self.config.sync_timeout)?;
        match OpenSecureChannelResponse::try_from(response) {
            Ok(response) => {
                process_service_result(&response.response_header)?;
                self.secure_channel.set_security_token(response.security_token);
                Ok(())
            }
            Err(other) => Err(process_unexpected_response(other)),
        }
    }

    fn create_session(&mut self) -> Result<(), StatusCode> {
        use opcua_core::config::Config;

        let request = CreateSessionRequest {
            request_header: self.make_request_header(self.config.sync_timeout),
            client_description: self.config.application_description(),
            server_uri: UAString::null(),
            endpoint_url: UAString::from(self.endpoint_url.as_str()),
            session_name: UAString::from(&self.config.session_name),
            client_nonce: ByteString::null(),
            client_certificate: ByteString::null(),
            requested_session_timeout: self.config.session_timeout_ms,
            max_response_message_size: 0,
        };
        let response = self.send_request(request.into(), self.config.sync_timeout)?;
        match response {
            ResponseMessage::CreateSession(response) => {
                process_service_result(&response.response_header)?;
                debug!("create_session, success, session id {}", response.session_id);
                self.session_id = response.session_id;
                self.authentication_token = response.authentication_token;
                self.session_timeout = response.revised_session_timeout;
                Ok(())
            }
            other => {
                error!("create_session failed");
                Err(process_unexpected_response(other))
            }
        }
    }

    fn activate_session(&mut self) -> Result<(), StatusCode> {
        let user_identity_token = self.build_identity_token()?;
        let request = ActivateSessionRequest {
            request_header: self.make_request_header(self.config.sync_timeout),
            client_signature: SignatureData::default(),
            client_software_certificates: None,
            locale_ids: if self.config.preferred_locales.is_empty() {
                None
            } else {
                Some(
                    self.config
                        .preferred_locales
                        .iter()
                        .map(UAString::from)
                        .collect(),
                )
            },
            user_identity_token,
            user_token_signature: SignatureData::default(),
        };
        let response = self.send_request(request.into(), self.config.sync_timeout)?;
        match response {
            ResponseMessage::ActivateSession(response) => {
                process_service_result(&response.response_header)?;
                debug!("activate_session, success");
                Ok(())
            }
            other => {
                error!("activate_session failed");
                Err(process_unexpected_response(other))
            }
        }
    }

    fn build_identity_token(&mut self) -> Result<ExtensionObject, StatusCode> {
        match self.identity_token.clone() {
            IdentityToken::Anonymous => Ok(ExtensionObject::from_message(&AnonymousIdentityToken {
                policy_id: UAString::from(FALLBACK_ANONYMOUS_POLICY_ID),
            })),
            IdentityToken::UserName(user, pass) => {
                let policy_id = self
                    .username_policy_id()
                    .unwrap_or_else(|| FALLBACK_USERNAME_POLICY_ID.to_string());
                Ok(ExtensionObject::from_message(&UserNameIdentityToken {
                    policy_id: UAString::from(policy_id),
                    user_name: UAString::from(user),
                    password: ByteString::from(pass.as_bytes()),
                    encryption_algorithm: UAString::null(),
                }))
            }
        }
    }

    /// Ask the server for its endpoints over the open channel and pick the
    /// user name token policy of the endpoint matching ours.
    fn username_policy_id(&mut self) -> Option<String> {
        let request = GetEndpointsRequest {
            request_header: self.make_request_header(self.config.sync_timeout),
            endpoint_url: UAString::from(self.endpoint_url.as_str()),
            locale_ids: None,
            profile_uris: None,
        };
        let response = match self.send_request(request.into(), self.config.sync_timeout) {
            Ok(ResponseMessage::GetEndpoints(response)) => response,
            Ok(_) | Err(_) => {
                warn!("GetEndpoints failed while selecting a user token policy");
                return None;
            }
        };
        let endpoints = response.endpoints?;
        let endpoint_url = self.endpoint_url.clone();
        endpoints
            .iter()
            .filter(|e| url_matches_except_host(endpoint_url.as_str(), e.endpoint_url.as_ref()))
            .chain(endpoints.iter())
            .find_map(|e| {
                e.user_identity_tokens.as_ref().and_then(|tokens| {
                    tokens
                        .iter()
                        .find(|t| t.token_type == UserTokenType::UserName)
                        .map(|t| t.policy_id.as_ref().to_string())
                })
            })
    }
}
