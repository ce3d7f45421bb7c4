//! A scripted server for driving the client in-process. It implements the
//! transport seam and runs a server-side secure channel and chunker so tests
//! can decode the client's requests and answer them however they like,
//! including out of order, late, or not at all.

use std::{
    cell::RefCell,
    collections::VecDeque,
    rc::Rc,
    time::{Duration, Instant},
};

use opcua_client::{
    transport::{Connection, Connector, ReceiveResult, TransportLimits},
    Client, ClientBuilder, ClientState,
};
use opcua_core::{
    comms::{
        chunker::Chunker,
        message_chunk::{MessageChunk, MessageIsFinalType},
        secure_channel::{Role, SecureChannel},
        tcp_types::{encode_framed, AcknowledgeMessage, ACKNOWLEDGE_MESSAGE, HELLO_MESSAGE},
    },
    RequestMessage, ResponseMessage,
};
use opcua_types::{
    ActivateSessionResponse, ByteString, ChannelSecurityToken, CloseSessionResponse,
    CreateSessionResponse, DateTime, DecodingOptions, NodeId, OpenSecureChannelResponse,
    ResponseHeader, ServiceFault, SignatureData, StatusCode,
};

pub type Handler = Box<dyn FnMut(&mut ServerState, u32, RequestMessage)>;

/// The state of the scripted server, shared between the connector, the live
/// connection and the test body.
pub struct ServerState {
    channel: SecureChannel,
    next_token_id: u32,
    to_client: VecDeque<Vec<u8>>,
    closed: bool,
    refuse_connections: bool,
    /// Every decoded request in arrival order, for assertions.
    pub requests: Vec<(u32, RequestMessage)>,
}

impl ServerState {
    fn new() -> ServerState {
        ServerState {
            channel: SecureChannel::new(Role::Server, DecodingOptions::default()),
            next_token_id: 0,
            to_client: VecDeque::new(),
            closed: false,
            refuse_connections: false,
            requests: Vec::new(),
        }
    }

    fn reset(&mut self) {
        self.channel = SecureChannel::new(Role::Server, DecodingOptions::default());
        self.to_client.clear();
        self.closed = false;
    }

    /// Encode a response into chunks and queue it for the client.
    pub fn respond(&mut self, request_id: u32, response: impl Into<ResponseMessage>) {
        let response = response.into();
        let first_sequence_number = self.channel.sequence_number() + 1;
        let chunks = Chunker::encode(first_sequence_number, request_id, 0, 0, &self.channel, &response)
            .expect("encode response");
        self.channel
            .set_sequence_number(first_sequence_number + chunks.len() as u32 - 1);
        for chunk in chunks {
            self.to_client.push_back(chunk.data);
        }
    }

    /// Queue a service fault carrying `status` for the given request.
    pub fn fault(&mut self, request_id: u32, request_handle: u32, status: StatusCode) {
        self.respond(request_id, ServiceFault::new(request_handle, status));
    }

    /// Install and return a fresh security token, as a server would when
    /// issuing or renewing a channel.
    pub fn install_token(&mut self, requested_lifetime: u32) -> ChannelSecurityToken {
        self.next_token_id += 1;
        self.channel.set_secure_channel_id(1);
        self.channel.set_token_id(self.next_token_id);
        ChannelSecurityToken {
            channel_id: 1,
            token_id: self.next_token_id,
            created_at: DateTime::now(),
            revised_lifetime: requested_lifetime,
        }
    }

    /// The token id last issued, for asserting renewals happened.
    pub fn token_id(&self) -> u32 {
        self.next_token_id
    }

    /// Drop the connection under the client.
    pub fn kill_connection(&mut self) {
        self.closed = true;
    }

    /// Drain the frames queued for the client, e.g. to deliver them through
    /// `process_binary_message` instead of the connection.
    pub fn take_queued(&mut self) -> Vec<Vec<u8>> {
        self.to_client.drain(..).collect()
    }

    fn good_header(request: &RequestMessage) -> ResponseHeader {
        ResponseHeader::new_good(request.request_header().request_handle)
    }
}

/// Respond the way a plain server would: issue tokens, create and activate
/// sessions, close sessions. Anything else gets a `BadServiceUnsupported`
/// fault, so tests override exactly the services they exercise.
pub fn default_handler(state: &mut ServerState, request_id: u32, request: RequestMessage) {
    match &request {
        RequestMessage::OpenSecureChannel(r) => {
            let security_token = state.install_token(r.requested_lifetime);
            state.respond(
                request_id,
                OpenSecureChannelResponse {
                    response_header: ServerState::good_header(&request),
                    server_protocol_version: 0,
                    security_token,
                    server_nonce: ByteString::null(),
                },
            );
        }
        RequestMessage::CreateSession(r) => {
            state.respond(
                request_id,
                CreateSessionResponse {
                    response_header: ServerState::good_header(&request),
                    session_id: NodeId::new(1, 1234u32),
                    authentication_token: NodeId::new(1, "auth-token"),
                    revised_session_timeout: r.requested_session_timeout,
                    server_nonce: ByteString::null(),
                    server_certificate: ByteString::null(),
                    server_endpoints: None,
                    server_software_certificates: None,
                    server_signature: SignatureData::default(),
                    max_request_message_size: 0,
                },
            );
        }
        RequestMessage::ActivateSession(_) => {
            state.respond(
                request_id,
                ActivateSessionResponse {
                    response_header: ServerState::good_header(&request),
                    server_nonce: ByteString::null(),
                    results: None,
                    diagnostic_infos: None,
                },
            );
        }
        RequestMessage::CloseSession(_) => {
            state.respond(
                request_id,
                CloseSessionResponse {
                    response_header: ServerState::good_header(&request),
                },
            );
        }
        RequestMessage::CloseSecureChannel(_) => {
            state.closed = true;
        }
        other => {
            state.fault(
                request_id,
                other.request_header().request_handle,
                StatusCode::BadServiceUnsupported,
            );
        }
    }
}

/// A good response header for the given request handle.
pub fn good_header(request_handle: u32) -> ResponseHeader {
    ResponseHeader::new_good(request_handle)
}

/// Test-side handle to the scripted server.
pub struct MockServer {
    pub state: Rc<RefCell<ServerState>>,
    handler: Rc<RefCell<Handler>>,
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            state: Rc::new(RefCell::new(ServerState::new())),
            handler: Rc::new(RefCell::new(Box::new(default_handler))),
        }
    }

    /// Replace the request handler.
    pub fn set_handler(&self, handler: impl FnMut(&mut ServerState, u32, RequestMessage) + 'static) {
        *self.handler.borrow_mut() = Box::new(handler);
    }

    /// Refuse connection attempts, for unreachable-server tests.
    pub fn refuse_connections(&self) {
        self.state.borrow_mut().refuse_connections = true;
    }

    /// A connector producing connections to this server.
    pub fn connector(&self) -> Box<dyn Connector> {
        Box::new(MockConnector {
            state: self.state.clone(),
            handler: self.handler.clone(),
        })
    }

    /// A client wired to this server with the given builder.
    pub fn client(&self, builder: ClientBuilder) -> Client {
        builder.connector(self.connector()).client()
    }
}

struct MockConnector {
    state: Rc<RefCell<ServerState>>,
    handler: Rc<RefCell<Handler>>,
}

impl Connector for MockConnector {
    fn connect(
        &self,
        _endpoint_url: &str,
        _limits: &TransportLimits,
        _timeout: Duration,
    ) -> Result<Box<dyn Connection>, StatusCode> {
        {
            let mut state = self.state.borrow_mut();
            if state.refuse_connections {
                return Err(StatusCode::BadConnectionRejected);
            }
            state.reset();
        }
        Ok(Box::new(MockConnection {
            state: self.state.clone(),
            handler: self.handler.clone(),
            partial: Vec::new(),
        }))
    }
}

struct MockConnection {
    state: Rc<RefCell<ServerState>>,
    handler: Rc<RefCell<Handler>>,
    partial: Vec<MessageChunk>,
}

impl Connection for MockConnection {
    fn send(&mut self, data: &[u8]) -> Result<(), StatusCode> {
        if self.state.borrow().closed {
            return Err(StatusCode::BadConnectionClosed);
        }
        // The client writes whole frames: the framed hello, then one chunk per
        // send.
        if &data[0..3] == HELLO_MESSAGE {
            let ack = AcknowledgeMessage {
                protocol_version: 0,
                receive_buffer_size: 65535,
                send_buffer_size: 65535,
                max_message_size: 0,
                max_chunk_count: 0,
            };
            let framed = encode_framed(ACKNOWLEDGE_MESSAGE, &ack).expect("encode ack");
            self.state.borrow_mut().to_client.push_back(framed);
            return Ok(());
        }

        let chunk = MessageChunk {
            data: data.to_vec(),
        };
        let is_final = {
            let state = self.state.borrow();
            chunk
                .chunk_info(&state.channel)
                .expect("chunk headers")
                .message_header
                .is_final
        };
        self.partial.push(chunk);
        match is_final {
            MessageIsFinalType::Intermediate => return Ok(()),
            MessageIsFinalType::FinalError => {
                self.partial.clear();
                return Ok(());
            }
            MessageIsFinalType::Final => {}
        }

        let chunks = std::mem::take(&mut self.partial);
        let (request_id, request) = {
            let state = self.state.borrow();
            let request_id = chunks[0]
                .chunk_info(&state.channel)
                .expect("chunk headers")
                .sequence_header
                .request_id;
            let request: RequestMessage =
                Chunker::decode(&chunks, &state.channel, None).expect("decode request");
            (request_id, request)
        };
        self.state
            .borrow_mut()
            .requests
            .push((request_id, request.clone()));
        let mut handler = self.handler.borrow_mut();
        let mut state = self.state.borrow_mut();
        (handler)(&mut state, request_id, request);
        Ok(())
    }

    fn receive(&mut self, timeout: Duration) -> ReceiveResult {
        let deadline = Instant::now() + timeout;
        loop {
            {
                let mut state = self.state.borrow_mut();
                if let Some(data) = state.to_client.pop_front() {
                    return ReceiveResult::Bytes(data);
                }
                if state.closed {
                    return ReceiveResult::Closed;
                }
            }
            if Instant::now() >= deadline {
                return ReceiveResult::Timeout;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn close(&mut self) {
        self.state.borrow_mut().closed = true;
    }
}

/// Record state transitions into a shared vector.
pub fn record_states(client: &mut Client) -> Rc<RefCell<Vec<ClientState>>> {
    let states = Rc::new(RefCell::new(Vec::new()));
    let recorder = states.clone();
    client.set_state_callback(Some(Box::new(move |state| {
        recorder.borrow_mut().push(state);
    })));
    states
}
