//! The cooperative event loop: drains the socket, runs expired timers and
//! expires overdue requests. Synchronous service calls re-enter the same loop
//! while they wait, so the client stays responsive during a blocking call.

use std::time::{Duration, Instant};

use log::{error, warn};

use opcua_core::{
    comms::{chunker::Chunker, message_chunk::{MessageChunk, MessageIsFinalType}},
    ResponseMessage,
};
use opcua_types::StatusCode;

use crate::transport::{ReceiveResult, TransportFrame};

use super::{Client, ClientState};

/// Upper bound on a single blocking wait inside a pump iteration, so a
/// synchronous caller rechecks its own deadline at a reasonable rate even
/// when the socket is silent.
const MAX_PUMP_WAIT: Duration = Duration::from_millis(50);

impl Client {
    /// Drive the client: process messages ready on the socket for up to
    /// `timeout`, fire expired timers and expire overdue requests. Returns the
    /// time until the next scheduled deadline, zero when work is known
    /// pending.
    pub fn run(&mut self, timeout: Duration) -> Duration {
        let deadline = Instant::now() + timeout;
        loop {
            self.dispatch_timers();
            self.expire_requests();
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            self.poll_socket(deadline - now);
        }
        self.next_due()
    }

    /// As [`Client::run`] without touching the socket. Inbound bytes are
    /// supplied with [`Client::process_binary_message`] instead, for
    /// applications embedding the client behind their own transport.
    pub fn run_iterate(&mut self) -> Duration {
        self.drain_frames();
        self.dispatch_timers();
        self.expire_requests();
        self.next_due()
    }

    /// Inject raw bytes received out of band into the client, as if they had
    /// been read from the connection, and process any complete messages.
    pub fn process_binary_message(&mut self, data: &[u8]) {
        self.reader.push(data);
        self.drain_frames();
    }

    /// One quantum of cooperative work while a synchronous call waits for its
    /// response.
    pub(crate) fn pump(&mut self, deadline: Instant) {
        self.pump_depth += 1;
        let now = Instant::now();
        if now < deadline {
            self.poll_socket((deadline - now).min(MAX_PUMP_WAIT));
        }
        self.dispatch_timers();
        self.expire_requests();
        self.pump_depth -= 1;
    }

    /// Wait up to `max_wait` for inbound bytes, bounded further by the next
    /// timer or request deadline so neither starves while we sit in a read.
    fn poll_socket(&mut self, max_wait: Duration) {
        let now = Instant::now();
        let mut wait = max_wait;
        if let Some(t) = self.timers.next_deadline() {
            wait = wait.min(t.saturating_duration_since(now));
        }
        if let Some(t) = self.mux.next_deadline() {
            wait = wait.min(t.saturating_duration_since(now));
        }
        match self.connection.as_mut() {
            None => {
                // Nothing to read from; idle until the next deadline.
                std::thread::sleep(wait.min(MAX_PUMP_WAIT));
            }
            Some(connection) => match connection.receive(wait) {
                ReceiveResult::Bytes(data) => {
                    self.reader.push(&data);
                    self.drain_frames();
                }
                ReceiveResult::Timeout => {}
                ReceiveResult::Closed => {
                    self.transport_failure(StatusCode::BadSecureChannelClosed);
                }
            },
        }
    }

    /// Split every complete frame off the inbound accumulator and handle it.
    pub(crate) fn drain_frames(&mut self) {
        let options = self.secure_channel.decoding_options();
        loop {
            match self.reader.next_frame(&options) {
                Ok(Some(TransportFrame::Chunk(chunk))) => self.handle_chunk(chunk),
                Ok(Some(TransportFrame::Error(err))) => {
                    error!(
                        "Server sent an error message: {} ({})",
                        err.status_code(),
                        err.reason
                    );
                    self.transport_failure(StatusCode::BadSecureChannelClosed);
                    break;
                }
                Ok(Some(TransportFrame::Acknowledge(_))) => {
                    warn!("Unexpected acknowledge outside of the hello handshake");
                }
                Ok(None) => break,
                Err(e) => {
                    error!("The inbound stream is corrupt: {e}");
                    self.transport_failure(StatusCode::BadSecureChannelClosed);
                    break;
                }
            }
        }
    }

    /// Handle one inbound chunk: verify it against the channel, accumulate it
    /// with the other chunks of its request id and decode + route the message
    /// once the final chunk arrives. An abort chunk discards the set and fails
    /// the request it belonged to.
    fn handle_chunk(&mut self, chunk: MessageChunk) {
        let info = match self.secure_channel.verify_chunk(&chunk) {
            Ok(info) => info,
            Err(e) => {
                error!("Chunk failed verification, the channel is compromised: {e}");
                self.transport_failure(StatusCode::BadSecureChannelClosed);
                return;
            }
        };

        // Chunks of different messages are never interleaved, so sequence
        // numbers must run without gaps across everything received.
        let sequence_number = info.sequence_header.sequence_number;
        let last = self.secure_channel.remote_sequence_number();
        if last != 0 && sequence_number != last + 1 {
            error!(
                "Chunk sequence number {} does not follow {}",
                sequence_number, last
            );
            self.transport_failure(StatusCode::BadSecureChannelClosed);
            return;
        }
        self.secure_channel.set_remote_sequence_number(sequence_number);

        let request_id = info.sequence_header.request_id;
        match info.message_header.is_final {
            MessageIsFinalType::Intermediate => {
                let set = self.partial_chunks.entry(request_id).or_default();
                set.push(chunk);
                let max_chunk_count = self.config.transport_limits.max_chunk_count;
                if max_chunk_count > 0 && set.len() >= max_chunk_count {
                    error!(
                        "Message exceeds the chunk count limit {}, aborting request {}",
                        max_chunk_count, request_id
                    );
                    self.partial_chunks.remove(&request_id);
                    self.abort_request(request_id, StatusCode::BadCommunicationError);
                }
            }
            MessageIsFinalType::FinalError => {
                warn!("Server aborted the message for request {}", request_id);
                self.partial_chunks.remove(&request_id);
                self.abort_request(request_id, StatusCode::BadCommunicationError);
            }
            MessageIsFinalType::Final => {
                let mut chunks = self.partial_chunks.remove(&request_id).unwrap_or_default();
                chunks.push(chunk);
                match Chunker::decode::<ResponseMessage>(&chunks, &self.secure_channel, None) {
                    Ok(response) => self.process_response(request_id, response),
                    Err(e) => {
                        error!("Failed to decode response for request {}: {e}", request_id);
                        self.abort_request(request_id, StatusCode::BadCommunicationError);
                    }
                }
            }
        }
    }

    /// Fail a single request without touching the channel.
    fn abort_request(&mut self, request_id: u32, status: StatusCode) {
        if let Some(entry) = self.mux.take(request_id) {
            self.complete_entry(request_id, entry, Err(status));
        }
    }

    /// Route a decoded response to its pending entry.
    fn process_response(&mut self, request_id: u32, response: ResponseMessage) {
        let service_result = response.response_header().service_result;

        // A successful service call on a renewed channel confirms the session
        // is still live above it.
        if self.state == ClientState::SessionRenewed && !service_result.is_bad() {
            self.set_state(ClientState::Session);
        }

        // A fresh subscription revives a publish pump the server had parked
        // with BadNoSubscription.
        if matches!(&response, ResponseMessage::CreateSubscription(r)
            if !r.response_header.service_result.is_bad())
        {
            self.pump_unpark();
        }

        match self.mux.take(request_id) {
            Some(entry) => {
                if entry.request_handle != response.response_header().request_handle {
                    warn!(
                        "Response for request {} carries handle {} but {} was sent",
                        request_id,
                        response.response_header().request_handle,
                        entry.request_handle
                    );
                }
                self.complete_entry(request_id, entry, Ok(response));
            }
            None => {
                warn!(
                    "Discarding response for unknown request id {}, the request may have timed out",
                    request_id
                );
            }
        }
    }

    /// Fire every timer due now. The batch is collected before any callback
    /// runs, so callbacks added during the tick wait for the next one.
    pub(crate) fn dispatch_timers(&mut self) {
        let now = Instant::now();
        let due = self.timers.pop_due(now);
        for id in due {
            let Some(mut callback) = self.timers.take_callback(id) else {
                continue;
            };
            callback(self);
            // A callback that removed itself stays removed.
            self.timers.restore_callback(id, callback);
        }
    }

    /// Fail requests whose deadline has passed with `BadTimeout`.
    pub(crate) fn expire_requests(&mut self) {
        let now = Instant::now();
        for (request_id, entry) in self.mux.drain_expired(now) {
            warn!("Request {} timed out", request_id);
            self.complete_entry(request_id, entry, Err(StatusCode::BadTimeout));
        }
    }

    /// Time until the next timer or request deadline, zero when input is
    /// known to be waiting.
    fn next_due(&self) -> Duration {
        if self.reader.buffered() > 0 {
            return Duration::ZERO;
        }
        let mut next = self.timers.next_deadline();
        if let Some(deadline) = self.mux.next_deadline() {
            next = Some(next.map_or(deadline, |n| n.min(deadline)));
        }
        match next {
            Some(t) => t.saturating_duration_since(Instant::now()),
            // Nothing is scheduled; the caller may idle for a full sync timeout.
            None => self.config.sync_timeout,
        }
    }
}
