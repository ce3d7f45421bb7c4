//! The client itself: the four-layer connection state machine, the request
//! multiplexer and the generic service dispatcher the typed service surface is
//! built on.

mod connect;
mod event_loop;
mod multiplexer;
mod publish;
mod services;
mod timers;

pub use timers::MIN_TIMER_INTERVAL;

use std::{
    cell::RefCell,
    rc::Rc,
    time::{Duration, Instant},
};

use hashbrown::HashMap;
use log::{error, info, warn};

use opcua_core::{
    comms::{
        chunker::Chunker,
        message_chunk::MessageChunk,
        secure_channel::{Role, SecureChannel},
    },
    handle::AtomicHandle,
    RequestMessage, ResponseMessage,
};
use opcua_types::{
    CloseSessionRequest, DateTime, DiagnosticBits, NodeId, NotificationMessage, RequestHeader,
    ResponseHeader, StatusCode, TypeLoader, TypeLoaderCollection, UaRequest, UaResponse,
};

use crate::{
    config::ClientConfig,
    transport::{Connection, Connector, MessageReader, NegotiatedLimits},
    IdentityToken,
};

use multiplexer::{AsyncCallback, Multiplexer, PendingRequest, RequestKind, SyncWaiter};
use publish::PublishPump;
use timers::TimerHeap;

/// The connection state of a client. The layers stack strictly: a session
/// exists only above a secure channel, which exists only above a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClientState {
    /// No connection is established.
    Disconnected,
    /// A TCP connection is established but no secure channel yet.
    Connected,
    /// A secure channel is open but no session has been created.
    SecureChannel,
    /// A session is created and activated.
    Session,
    /// The secure channel was renewed underneath the active session. Moves
    /// back to `Session` with the next successful service response.
    SessionRenewed,
}

/// Observer invoked synchronously on every state transition, in transition order.
pub type StateCallback = Box<dyn FnMut(ClientState)>;

/// Hook invoked for every notification message delivered by a publish response.
pub type NotificationCallback = Box<dyn FnMut(u32, &NotificationMessage)>;

/// Process the service result, i.e. where the request "succeeded" but the response
/// contains a failure status code.
pub(crate) fn process_service_result(response_header: &ResponseHeader) -> Result<(), StatusCode> {
    if response_header.service_result.is_bad() {
        info!(
            "Received a bad service result {} from the request",
            response_header.service_result
        );
        Err(response_header.service_result)
    } else {
        Ok(())
    }
}

pub(crate) fn process_unexpected_response(response: ResponseMessage) -> StatusCode {
    match response {
        ResponseMessage::ServiceFault(service_fault) => {
            error!(
                "Received a service fault of {} for the request",
                service_fault.response_header.service_result
            );
            service_fault.response_header.service_result
        }
        _ => {
            error!("Received an unexpected response to the request");
            StatusCode::BadUnknownResponse
        }
    }
}

/// Build a zero-initialized response of the expected type whose header carries
/// the failure status, for delivery to a callback that will never see a real
/// response.
pub(crate) fn synthesize_failure<T: UaResponse>(request_handle: u32, status: StatusCode) -> T {
    let mut response = T::default();
    let header = response.response_header_mut();
    header.timestamp = DateTime::now();
    header.request_handle = request_handle;
    header.service_result = status;
    response
}

enum SendFailure {
    /// The message could not be produced; the connection is unaffected.
    Message(StatusCode),
    /// The connection failed while sending; the channel is lost.
    Transport(StatusCode),
}

/// An OPC UA client.
///
/// The client is strictly single threaded and cooperatively scheduled: every
/// public operation and every callback runs on the thread that drives
/// [`Client::run`] or [`Client::run_iterate`], and the only blocking point is
/// the receive call on the connection. Synchronous service calls suspend by
/// pumping that same loop until their response arrives.
pub struct Client {
    pub(crate) config: ClientConfig,
    pub(crate) connector: Box<dyn Connector>,
    pub(crate) state: ClientState,
    pub(crate) state_callback: Option<StateCallback>,
    pub(crate) notification_callback: Option<NotificationCallback>,

    pub(crate) connection: Option<Box<dyn Connection>>,
    pub(crate) reader: MessageReader,
    pub(crate) secure_channel: SecureChannel,
    pub(crate) negotiated: Option<NegotiatedLimits>,
    pub(crate) endpoint_url: String,
    pub(crate) identity_token: IdentityToken,

    pub(crate) authentication_token: NodeId,
    pub(crate) session_id: NodeId,
    pub(crate) session_timeout: f64,
    pub(crate) request_handle: AtomicHandle,

    pub(crate) mux: Multiplexer,
    pub(crate) timers: TimerHeap,
    pub(crate) pump: PublishPump,
    pub(crate) pump_depth: u32,
    pub(crate) renewal_timer: Option<u64>,
    pub(crate) partial_chunks: HashMap<u32, Vec<MessageChunk>>,
    pub(crate) type_loaders: TypeLoaderCollection,
}

impl Client {
    /// Create a new client from config with the default TCP connector.
    ///
    /// Note that this does not make any connection to the server.
    pub fn new(config: ClientConfig) -> Client {
        Self::new_with_connector(config, Box::new(crate::transport::tcp::TcpConnector))
    }

    /// Create a new client from config with a custom connection factory.
    pub fn new_with_connector(config: ClientConfig, connector: Box<dyn Connector>) -> Client {
        let decoding_options = config.decoding_options();
        Client {
            config,
            connector,
            state: ClientState::Disconnected,
            state_callback: None,
            notification_callback: None,
            connection: None,
            reader: MessageReader::new(),
            secure_channel: SecureChannel::new(Role::Client, decoding_options),
            negotiated: None,
            endpoint_url: String::new(),
            identity_token: IdentityToken::Anonymous,
            authentication_token: NodeId::null(),
            session_id: NodeId::null(),
            session_timeout: 0.0,
            request_handle: AtomicHandle::new(1),
            mux: Multiplexer::new(),
            timers: TimerHeap::new(),
            pump: PublishPump::new(),
            pump_depth: 0,
            renewal_timer: None,
            partial_chunks: HashMap::new(),
            type_loaders: TypeLoaderCollection::new(),
        }
    }

    /// The configuration the client was created with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The current connection state.
    pub fn state(&self) -> ClientState {
        self.state
    }

    /// The id the server assigned to the session, null when no session exists.
    pub fn session_id(&self) -> &NodeId {
        &self.session_id
    }

    /// The session timeout granted by the server in milliseconds.
    pub fn session_timeout(&self) -> f64 {
        self.session_timeout
    }

    /// Set the observer for state transitions. Pass `None` to remove it.
    pub fn set_state_callback(&mut self, callback: Option<StateCallback>) {
        self.state_callback = callback;
    }

    /// Set the hook receiving subscription notification messages. Pass `None`
    /// to remove it.
    pub fn set_notification_callback(&mut self, callback: Option<NotificationCallback>) {
        self.notification_callback = callback;
    }

    /// Add a type loader used to decode custom structures in extension objects.
    pub fn add_type_loader(&mut self, type_loader: std::sync::Arc<dyn TypeLoader>) {
        self.type_loaders.add(type_loader);
    }

    /// The type loaders registered on this client, the built-in table included.
    pub fn type_loaders(&self) -> &TypeLoaderCollection {
        &self.type_loaders
    }

    /// The raw connection, for applications that drive the transport manually.
    /// `None` while disconnected.
    pub fn connection(&mut self) -> Option<&mut (dyn Connection + '_)> {
        self.connection
            .as_mut()
            .map(|c| &mut **c as &mut (dyn Connection + '_))
    }

    /// The next request handle.
    pub fn next_request_handle(&self) -> u32 {
        self.request_handle.next()
    }

    pub(crate) fn set_state(&mut self, state: ClientState) {
        if self.state != state {
            log::debug!("Client state transition {:?} -> {:?}", self.state, state);
            self.state = state;
            if let Some(callback) = self.state_callback.as_mut() {
                callback(state);
            }
        }
    }

    pub(crate) fn make_request_header(&self, timeout: Duration) -> RequestHeader {
        RequestHeader {
            authentication_token: self.authentication_token.clone(),
            timestamp: DateTime::now(),
            request_handle: self.request_handle.next(),
            return_diagnostics: DiagnosticBits::empty(),
            timeout_hint: timeout.as_millis().min(u32::MAX as u128) as u32,
            ..Default::default()
        }
    }

    /// Issue a service call and wait for its response, pumping the event loop
    /// while waiting. This is the generic dispatcher the typed service surface
    /// wraps; the default deadline is the configured synchronous timeout.
    pub fn send<R>(&mut self, request: R) -> Result<R::Response, StatusCode>
    where
        R: UaRequest + Into<RequestMessage>,
        R::Response: TryFrom<ResponseMessage, Error = ResponseMessage>,
    {
        self.send_with_timeout(request, self.config.sync_timeout)
    }

    /// As [`Client::send`] with an explicit deadline.
    pub fn send_with_timeout<R>(
        &mut self,
        request: R,
        timeout: Duration,
    ) -> Result<R::Response, StatusCode>
    where
        R: UaRequest + Into<RequestMessage>,
        R::Response: TryFrom<ResponseMessage, Error = ResponseMessage>,
    {
        let response = self.send_request(request.into(), timeout)?;
        match R::Response::try_from(response) {
            Ok(response) => Ok(response),
            Err(other) => Err(process_unexpected_response(other)),
        }
    }

    /// Issue a service call and return its request id immediately. The callback
    /// fires exactly once: with the decoded response when it arrives, or with a
    /// zero-initialized response whose header carries `BadTimeout`,
    /// `BadSecureChannelClosed` or `BadShutdown` when the request fails.
    pub fn send_async<R, F>(&mut self, request: R, callback: F) -> Result<u32, StatusCode>
    where
        R: UaRequest + Into<RequestMessage> + 'static,
        R::Response: TryFrom<ResponseMessage, Error = ResponseMessage>,
        F: FnOnce(&mut Client, u32, R::Response) + 'static,
    {
        let erased: AsyncCallback = Box::new(move |client, request_id, request_handle, result| {
            let response = match result {
                Ok(message) => match R::Response::try_from(message) {
                    Ok(response) => response,
                    Err(other) => {
                        synthesize_failure(request_handle, process_unexpected_response(other))
                    }
                },
                Err(status) => synthesize_failure(request_handle, status),
            };
            callback(client, request_id, response);
        });
        self.dispatch(
            request.into(),
            self.config.sync_timeout,
            RequestKind::Async(erased),
        )
    }

    /// Send a request message and pump the event loop until the response
    /// arrives, the deadline expires, or the channel is lost.
    pub(crate) fn send_request(
        &mut self,
        message: RequestMessage,
        timeout: Duration,
    ) -> Result<ResponseMessage, StatusCode> {
        if self.pump_depth >= self.config.max_pump_depth {
            error!(
                "Nested synchronous calls exceed the pump depth limit of {}",
                self.config.max_pump_depth
            );
            return Err(StatusCode::BadInternalError);
        }
        let deadline = Instant::now() + timeout;
        let waiter: SyncWaiter = Rc::new(RefCell::new(None));
        let request_id = self.dispatch(message, timeout, RequestKind::Sync(waiter.clone()))?;
        loop {
            if let Some(result) = waiter.borrow_mut().take() {
                return result;
            }
            if Instant::now() >= deadline {
                // The entry must be gone before the call returns.
                self.mux.take(request_id);
                return Err(StatusCode::BadTimeout);
            }
            self.pump(deadline);
        }
    }

    /// Register a pending request and send it. Returns the request id.
    pub(crate) fn dispatch(
        &mut self,
        mut message: RequestMessage,
        timeout: Duration,
        kind: RequestKind,
    ) -> Result<u32, StatusCode> {
        if self.connection.is_none() {
            return Err(StatusCode::BadNotConnected);
        }
        if self.config.max_inflight_messages > 0
            && self.mux.len() >= self.config.max_inflight_messages
        {
            warn!(
                "Rejecting dispatch, {} requests are already outstanding",
                self.mux.len()
            );
            return Err(StatusCode::BadTooManyOperations);
        }

        // A zero handle means the caller left the header to the dispatcher.
        if message.request_header().request_handle == 0 {
            *message.request_header_mut() = self.make_request_header(timeout);
        }
        let request_handle = message.request_header().request_handle;
        let request_id = self.secure_channel.next_request_id();
        let now = Instant::now();
        self.mux.insert(
            request_id,
            PendingRequest {
                request_handle,
                deadline: now + timeout,
                dispatched_at: now,
                kind,
            },
        );
        match self.send_message(request_id, &message) {
            Ok(()) => Ok(request_id),
            Err(SendFailure::Message(status)) => {
                self.mux.take(request_id);
                Err(status)
            }
            Err(SendFailure::Transport(status)) => {
                self.mux.take(request_id);
                self.transport_failure(StatusCode::BadSecureChannelClosed);
                Err(status)
            }
        }
    }

    /// Chunk a message and write every chunk to the connection. A request is
    /// chunked in full before the next may begin.
    fn send_message(
        &mut self,
        request_id: u32,
        message: &RequestMessage,
    ) -> Result<(), SendFailure> {
        let limits = self.negotiated.unwrap_or(NegotiatedLimits {
            send_chunk_size: self.config.transport_limits.send_buffer_size,
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
        )
        .map_err(|e| SendFailure::Message(e.into()))?;
        if limits.send_max_chunk_count > 0 && chunks.len() > limits.send_max_chunk_count {
            error!(
                "Message of {} chunks exceeds the chunk count limit {}",
                chunks.len(),
                limits.send_max_chunk_count
            );
            return Err(SendFailure::Message(StatusCode::BadCommunicationError));
        }
        self.secure_channel
            .set_sequence_number(first_sequence_number + chunks.len() as u32 - 1);

        let connection = self
            .connection
            .as_mut()
            .ok_or(SendFailure::Message(StatusCode::BadNotConnected))?;
        for chunk in &chunks {
            connection
                .send(&chunk.data)
                .map_err(SendFailure::Transport)?;
        }
        Ok(())
    }

    /// Send a message that expects no response, e.g. CloseSecureChannel.
    pub(crate) fn send_no_response(&mut self, message: RequestMessage) -> Result<(), StatusCode> {
        let request_id = self.secure_channel.next_request_id();
        self.send_message(request_id, &message).map_err(|e| match e {
            SendFailure::Message(s) | SendFailure::Transport(s) => s,
        })
    }

    /// Deliver the outcome of a pending request, exactly once.
    pub(crate) fn complete_entry(
        &mut self,
        request_id: u32,
        entry: PendingRequest,
        result: Result<ResponseMessage, StatusCode>,
    ) {
        match entry.kind {
            RequestKind::Sync(waiter) => {
                *waiter.borrow_mut() = Some(result);
            }
            RequestKind::Async(callback) => {
                callback(self, request_id, entry.request_handle, result);
            }
        }
    }

    /// Fail every pending request with the given status. Used on shutdown
    /// (`BadShutdown`) and channel loss (`BadSecureChannelClosed`).
    pub(crate) fn fail_all(&mut self, status: StatusCode) {
        let pending = self.mux.drain_all();
        if !pending.is_empty() {
            warn!("Failing {} outstanding requests with {}", pending.len(), status);
        }
        for (request_id, entry) in pending {
            self.complete_entry(request_id, entry, Err(status));
        }
    }

    /// Graceful teardown: close the session, close the secure channel, close
    /// the connection. Every pending request is failed with `BadShutdown`
    /// before the call returns; the terminal state is `Disconnected`.
    pub fn disconnect(&mut self) -> Result<(), StatusCode> {
        if self.state == ClientState::Disconnected {
            return Ok(());
        }
        let mut result = Ok(());
        if self.state >= ClientState::Session {
            if let Err(status) = self.close_session() {
                warn!("Failed to close session, channel will be closed anyway: {status}");
                result = Err(status);
            }
        }
        if result.is_ok() && self.state >= ClientState::SecureChannel {
            self.close_secure_channel();
        }
        self.finish_disconnect();
        result
    }

    /// Best-effort teardown: every step of [`Client::disconnect`] is attempted
    /// even if an earlier one fails.
    pub fn close(&mut self) {
        if self.state == ClientState::Disconnected {
            return;
        }
        if self.state >= ClientState::Session {
            if let Err(status) = self.close_session() {
                warn!("Failed to close session: {status}");
            }
        }
        if self.state >= ClientState::SecureChannel {
            self.close_secure_channel();
        }
        self.finish_disconnect();
    }

    /// Tear the connection down best-effort and return the client to its
    /// post-construction state. Handle and timer id counters are not rewound,
    /// ids are never reused within the life of the client.
    pub fn reset(&mut self) {
        self.close();
        self.timers.clear();
        self.endpoint_url.clear();
        self.identity_token = IdentityToken::Anonymous;
    }

    fn close_session(&mut self) -> Result<(), StatusCode> {
        let request = CloseSessionRequest {
            request_header: self.make_request_header(self.config.sync_timeout),
            delete_subscriptions: true,
        };
        let response = self.send_request(request.into(), self.config.sync_timeout)?;
        match response {
            ResponseMessage::CloseSession(response) => {
                process_service_result(&response.response_header)
            }
            other => Err(process_unexpected_response(other)),
        }
    }

    fn close_secure_channel(&mut self) {
        let request = opcua_types::CloseSecureChannelRequest {
            request_header: self.make_request_header(self.config.sync_timeout),
        };
        if let Err(status) = self.send_no_response(request.into()) {
            warn!("Failed to send the close channel message: {status}");
        }
    }

    fn finish_disconnect(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
        self.teardown_channel();
        self.set_state(ClientState::Disconnected);
        self.fail_all(StatusCode::BadShutdown);
    }

    /// Forget all per-connection state.
    pub(crate) fn teardown_channel(&mut self) {
        self.secure_channel.clear_security_token();
        self.reader.clear();
        self.partial_chunks.clear();
        self.negotiated = None;
        self.authentication_token = NodeId::null();
        self.session_id = NodeId::null();
        self.session_timeout = 0.0;
        if let Some(id) = self.renewal_timer.take() {
            let _ = self.timers.remove(id);
        }
        self.pump_disable();
    }

    /// The connection failed underneath the client: invalidate it, fail every
    /// pending request and fall back to `Disconnected`.
    pub(crate) fn transport_failure(&mut self, status: StatusCode) {
        if self.connection.is_none() && self.state == ClientState::Disconnected {
            return;
        }
        warn!("Transport failure, disconnecting: {status}");
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
        self.teardown_channel();
        self.set_state(ClientState::Disconnected);
        self.fail_all(status);
    }

    /// Add a repeated callback fired every `interval`, which must be at least
    /// 5 ms. The first fire is scheduled at now + interval; subsequent fires
    /// keep the original schedule regardless of execution delays. Returns the
    /// id of the callback, ids are never reused.
    pub fn add_repeated_callback(
        &mut self,
        interval: Duration,
        callback: impl FnMut(&mut Client) + 'static,
    ) -> Result<u64, StatusCode> {
        self.timers.add(interval, Box::new(callback))
    }

    /// Change the interval of a repeated callback. Takes effect at the next
    /// scheduled fire.
    pub fn change_repeated_callback_interval(
        &mut self,
        callback_id: u64,
        interval: Duration,
    ) -> Result<(), StatusCode> {
        self.timers.change_interval(callback_id, interval)
    }

    /// Remove a repeated callback. Removing a callback from within its own
    /// invocation suppresses all future fires.
    pub fn remove_repeated_callback(&mut self, callback_id: u64) -> Result<(), StatusCode> {
        self.timers.remove(callback_id)
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if self.state != ClientState::Disconnected {
            self.close();
        }
    }
}
