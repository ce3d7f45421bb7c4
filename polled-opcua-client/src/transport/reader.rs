//! Splits the inbound byte stream into connection protocol frames. Bytes
//! arrive either from the connection or by direct injection via
//! `process_binary_message`.

use std::io::Cursor;

use bytes::{Buf, BytesMut};
use log::error;

use opcua_core::comms::{
    message_chunk::MessageChunk,
    tcp_types::{
        validate_message_header, AcknowledgeMessage, ErrorMessage, MessageHeader,
        ACKNOWLEDGE_MESSAGE, CHUNK_MESSAGE, CLOSE_SECURE_CHANNEL_MESSAGE, ERROR_MESSAGE,
        MESSAGE_HEADER_SIZE, OPEN_SECURE_CHANNEL_MESSAGE,
    },
};
use opcua_types::{BinaryDecodable, DecodingOptions, EncodingResult, Error};

/// A complete frame parsed off the wire.
#[derive(Debug)]
pub enum TransportFrame {
    /// The server acknowledged the hello handshake.
    Acknowledge(AcknowledgeMessage),
    /// The server reported a protocol error and will drop the connection.
    Error(ErrorMessage),
    /// A chunk of a service message.
    Chunk(MessageChunk),
}

/// Accumulates inbound bytes and splits complete frames off the front.
#[derive(Default)]
pub struct MessageReader {
    buffer: BytesMut,
}

impl MessageReader {
    /// Create an empty reader.
    pub fn new() -> MessageReader {
        MessageReader {
            buffer: BytesMut::with_capacity(8192),
        }
    }

    /// Append raw bytes to the accumulator.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Discard any partially accumulated data, e.g. after a reconnect.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Number of bytes accumulated but not yet consumed by a frame.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Try to split the next complete frame off the accumulator. Returns
    /// `Ok(None)` when more bytes are needed.
    pub fn next_frame(
        &mut self,
        options: &DecodingOptions,
    ) -> EncodingResult<Option<TransportFrame>> {
        if self.buffer.len() < MESSAGE_HEADER_SIZE {
            return Ok(None);
        }
        let header = {
            let mut stream = Cursor::new(&self.buffer[..MESSAGE_HEADER_SIZE]);
            MessageHeader::decode(&mut stream, options)?
        };
        validate_message_header(&header, options)?;
        let message_size = header.message_size as usize;
        if self.buffer.len() < message_size {
            return Ok(None);
        }

        let frame = self.buffer.split_to(message_size);
        match &header.message_type as &[u8] {
            ACKNOWLEDGE_MESSAGE => {
                let mut stream = Cursor::new(&frame[MESSAGE_HEADER_SIZE..]);
                let ack = AcknowledgeMessage::decode(&mut stream, options)?;
                Ok(Some(TransportFrame::Acknowledge(ack)))
            }
            ERROR_MESSAGE => {
                let mut stream = Cursor::new(&frame[MESSAGE_HEADER_SIZE..]);
                let err = ErrorMessage::decode(&mut stream, options)?;
                Ok(Some(TransportFrame::Error(err)))
            }
            CHUNK_MESSAGE | OPEN_SECURE_CHANNEL_MESSAGE | CLOSE_SECURE_CHANNEL_MESSAGE => {
                Ok(Some(TransportFrame::Chunk(MessageChunk {
                    data: frame.chunk().to_vec(),
                })))
            }
            other => {
                error!("Received unexpected message type {:?}", other);
                Err(Error::decoding(format!(
                    "Unexpected message type {other:?}"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opcua_core::comms::tcp_types::{encode_framed, HELLO_MESSAGE};

    #[test]
    fn partial_then_complete() {
        let ack = AcknowledgeMessage {
            protocol_version: 0,
            receive_buffer_size: 65535,
            send_buffer_size: 65535,
            max_message_size: 0,
            max_chunk_count: 0,
        };
        let framed = encode_framed(ACKNOWLEDGE_MESSAGE, &ack).unwrap();

        let options = DecodingOptions::default();
        let mut reader = MessageReader::new();
        // Feed all but the last byte, no frame should be produced.
        reader.push(&framed[..framed.len() - 1]);
        assert!(reader.next_frame(&options).unwrap().is_none());
        // The final byte completes the frame.
        reader.push(&framed[framed.len() - 1..]);
        match reader.next_frame(&options).unwrap() {
            Some(TransportFrame::Acknowledge(decoded)) => assert_eq!(decoded, ack),
            other => panic!("expected acknowledge, got {other:?}"),
        }
        assert!(reader.next_frame(&options).unwrap().is_none());
    }

    #[test]
    fn unexpected_message_type() {
        let hello =
            opcua_core::comms::tcp_types::HelloMessage::new("opc.tcp://localhost", 0, 0, 0, 0);
        let framed = encode_framed(HELLO_MESSAGE, &hello).unwrap();
        let mut reader = MessageReader::new();
        reader.push(&framed);
        assert!(reader.next_frame(&DecodingOptions::default()).is_err());
    }
}
