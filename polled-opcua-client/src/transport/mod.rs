//! The transport seam of the client. The client core drives an abstract
//! [`Connection`] produced by a [`Connector`]; the default implementation is a
//! blocking TCP socket, but anything that can move bytes works, which is also
//! how the tests script a server without one.

mod reader;
pub mod tcp;

pub use reader::{MessageReader, TransportFrame};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use opcua_types::StatusCode;

/// The outcome of waiting for inbound bytes on a connection.
#[derive(Debug)]
pub enum ReceiveResult {
    /// One or more bytes arrived.
    Bytes(Vec<u8>),
    /// The timeout elapsed without data.
    Timeout,
    /// The peer closed the connection or it failed.
    Closed,
}

/// An established bidirectional byte stream to a server. Valid from the moment
/// the connector returns it until [`Connection::close`] or a `Closed` receive
/// result.
pub trait Connection {
    /// Send the buffer in its entirety.
    fn send(&mut self, data: &[u8]) -> Result<(), StatusCode>;

    /// Wait up to `timeout` for inbound bytes. This is the only blocking point
    /// in the client.
    fn receive(&mut self, timeout: Duration) -> ReceiveResult;

    /// Close the connection. Further calls to send or receive fail.
    fn close(&mut self);
}

/// Factory producing connections from endpoint urls. Swap this to run the
/// client over something other than a plain TCP socket.
pub trait Connector {
    /// Establish a connection to the host and port in `endpoint_url`.
    fn connect(
        &self,
        endpoint_url: &str,
        limits: &TransportLimits,
        timeout: Duration,
    ) -> Result<Box<dyn Connection>, StatusCode>;
}

/// Local transport parameters proposed in the hello handshake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportLimits {
    /// Largest chunk this client will send.
    pub send_buffer_size: usize,
    /// Largest chunk this client can receive.
    pub recv_buffer_size: usize,
    /// Largest message this client can receive, 0 for no limit.
    pub max_message_size: usize,
    /// Largest number of chunks in a message this client can receive, 0 for no limit.
    pub max_chunk_count: usize,
}

impl Default for TransportLimits {
    fn default() -> Self {
        TransportLimits {
            send_buffer_size: 65535,
            recv_buffer_size: 65535,
            max_message_size: opcua_types::constants::MAX_MESSAGE_SIZE,
            max_chunk_count: opcua_types::constants::MAX_CHUNK_COUNT,
        }
    }
}

/// The chunking limits in effect after the acknowledge message revised the
/// proposed ones.
#[derive(Debug, Clone, Copy)]
pub struct NegotiatedLimits {
    /// Largest chunk the server accepts, applied to outbound chunking.
    pub send_chunk_size: usize,
    /// Largest message the server accepts, applied to outbound messages.
    pub send_max_message_size: usize,
    /// Largest number of chunks the server accepts per message.
    pub send_max_chunk_count: usize,
}

impl NegotiatedLimits {
    /// Combine the local proposal with the server's acknowledgement.
    pub fn from_acknowledge(
        limits: &TransportLimits,
        ack: &opcua_core::comms::tcp_types::AcknowledgeMessage,
    ) -> NegotiatedLimits {
        NegotiatedLimits {
            send_chunk_size: if ack.receive_buffer_size == 0 {
                limits.send_buffer_size
            } else {
                (ack.receive_buffer_size as usize).min(limits.send_buffer_size)
            },
            send_max_message_size: ack.max_message_size as usize,
            send_max_chunk_count: ack.max_chunk_count as usize,
        }
    }
}
