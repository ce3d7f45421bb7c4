// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Types for the OPC UA connection protocol - the HEL / ACK / ERR handshake
//! messages and the constants framing every message on the wire.

use std::io::{Cursor, Read, Write};

use opcua_types::{
    process_decode_io_result, process_encode_io_result, read_u32, write_u32, BinaryDecodable,
    BinaryEncodable, DecodingOptions, EncodingResult, Error, StatusCode, UAString,
};

/// Message type header for a HELLO message.
pub const HELLO_MESSAGE: &[u8] = b"HEL";
/// Message type header for an ACKNOWLEDGE message.
pub const ACKNOWLEDGE_MESSAGE: &[u8] = b"ACK";
/// Message type header for an ERROR message.
pub const ERROR_MESSAGE: &[u8] = b"ERR";
/// Message type header for a regular message chunk.
pub const CHUNK_MESSAGE: &[u8] = b"MSG";
/// Message type header for an OpenSecureChannel chunk.
pub const OPEN_SECURE_CHANNEL_MESSAGE: &[u8] = b"OPN";
/// Message type header for a CloseSecureChannel chunk.
pub const CLOSE_SECURE_CHANNEL_MESSAGE: &[u8] = b"CLO";

/// Chunk marker for an intermediate chunk.
pub const CHUNK_INTERMEDIATE: u8 = b'C';
/// Chunk marker for the final chunk of a message.
pub const CHUNK_FINAL: u8 = b'F';
/// Chunk marker for the final chunk of an aborted message.
pub const CHUNK_FINAL_ERROR: u8 = b'A';

/// Every message on the wire starts with an eight byte header.
pub const MESSAGE_HEADER_SIZE: usize = 3 + 1 + 4;

/// Smallest negotiable chunk size allowed by the protocol.
pub const MIN_CHUNK_SIZE: usize = 8196;

/// The eight byte header framing every connection protocol message and chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageHeader {
    /// The three character message type.
    pub message_type: [u8; 3],
    /// The chunk marker, `F` for connection protocol messages.
    pub is_final: u8,
    /// The size of the message including this header.
    pub message_size: u32,
}

impl BinaryEncodable for MessageHeader {
    fn byte_len(&self) -> usize {
        MESSAGE_HEADER_SIZE
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        process_encode_io_result(stream.write_all(&self.message_type))?;
        process_encode_io_result(stream.write_all(&[self.is_final]))?;
        write_u32(stream, self.message_size)
    }
}

impl BinaryDecodable for MessageHeader {
    fn decode<S: Read + ?Sized>(stream: &mut S, _: &DecodingOptions) -> EncodingResult<Self> {
        let mut message_type = [0u8; 3];
        process_decode_io_result(stream.read_exact(&mut message_type))?;
        let mut is_final = [0u8; 1];
        process_decode_io_result(stream.read_exact(&mut is_final))?;
        let message_size = read_u32(stream)?;
        Ok(MessageHeader {
            message_type,
            is_final: is_final[0],
            message_size,
        })
    }
}

impl MessageHeader {
    /// Create a header for a connection protocol message of the given body size.
    pub fn new(message_type: &[u8], body_size: usize) -> MessageHeader {
        let mut mt = [0u8; 3];
        mt.copy_from_slice(message_type);
        MessageHeader {
            message_type: mt,
            is_final: CHUNK_FINAL,
            message_size: (MESSAGE_HEADER_SIZE + body_size) as u32,
        }
    }
}

/// Encode a connection protocol message with its framing header into a buffer.
pub fn encode_framed(
    message_type: &[u8],
    body: &impl BinaryEncodable,
) -> EncodingResult<Vec<u8>> {
    let header = MessageHeader::new(message_type, body.byte_len());
    let mut stream = Cursor::new(Vec::with_capacity(header.message_size as usize));
    header.encode(&mut stream)?;
    body.encode(&mut stream)?;
    Ok(stream.into_inner())
}

/// The `HEL` message a client sends immediately after establishing a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct HelloMessage {
    /// Version of the connection protocol, 0 for this version.
    pub protocol_version: u32,
    /// Largest chunk the sender can receive.
    pub receive_buffer_size: u32,
    /// Largest chunk the sender will send.
    pub send_buffer_size: u32,
    /// Largest message the sender can receive, 0 for no limit.
    pub max_message_size: u32,
    /// Largest number of chunks in a message the sender can receive, 0 for no limit.
    pub max_chunk_count: u32,
    /// The url of the endpoint the client wants to talk to.
    pub endpoint_url: UAString,
}

impl BinaryEncodable for HelloMessage {
    fn byte_len(&self) -> usize {
        20 + self.endpoint_url.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        write_u32(stream, self.protocol_version)?;
        write_u32(stream, self.receive_buffer_size)?;
        write_u32(stream, self.send_buffer_size)?;
        write_u32(stream, self.max_message_size)?;
        write_u32(stream, self.max_chunk_count)?;
        self.endpoint_url.encode(stream)
    }
}

impl BinaryDecodable for HelloMessage {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(HelloMessage {
            protocol_version: read_u32(stream)?,
            receive_buffer_size: read_u32(stream)?,
            send_buffer_size: read_u32(stream)?,
            max_message_size: read_u32(stream)?,
            max_chunk_count: read_u32(stream)?,
            endpoint_url: UAString::decode(stream, options)?,
        })
    }
}

impl HelloMessage {
    /// Create a hello message for the given endpoint and local limits.
    pub fn new(
        endpoint_url: &str,
        send_buffer_size: usize,
        receive_buffer_size: usize,
        max_message_size: usize,
        max_chunk_count: usize,
    ) -> HelloMessage {
        HelloMessage {
            protocol_version: 0,
            receive_buffer_size: receive_buffer_size as u32,
            send_buffer_size: send_buffer_size as u32,
            max_message_size: max_message_size as u32,
            max_chunk_count: max_chunk_count as u32,
            endpoint_url: UAString::from(endpoint_url),
        }
    }
}

/// The `ACK` message a server sends in response to a `HEL`, revising the
/// client's proposed limits.
#[derive(Debug, Clone, PartialEq)]
pub struct AcknowledgeMessage {
    /// Version of the connection protocol spoken by the server.
    pub protocol_version: u32,
    /// Largest chunk the server can receive.
    pub receive_buffer_size: u32,
    /// Largest chunk the server will send.
    pub send_buffer_size: u32,
    /// Largest message the server can receive, 0 for no limit.
    pub max_message_size: u32,
    /// Largest number of chunks in a message the server can receive, 0 for no limit.
    pub max_chunk_count: u32,
}

impl BinaryEncodable for AcknowledgeMessage {
    fn byte_len(&self) -> usize {
        20
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        write_u32(stream, self.protocol_version)?;
        write_u32(stream, self.receive_buffer_size)?;
        write_u32(stream, self.send_buffer_size)?;
        write_u32(stream, self.max_message_size)?;
        write_u32(stream, self.max_chunk_count)?;
        Ok(())
    }
}

impl BinaryDecodable for AcknowledgeMessage {
    fn decode<S: Read + ?Sized>(stream: &mut S, _: &DecodingOptions) -> EncodingResult<Self> {
        Ok(AcknowledgeMessage {
            protocol_version: read_u32(stream)?,
            receive_buffer_size: read_u32(stream)?,
            send_buffer_size: read_u32(stream)?,
            max_message_size: read_u32(stream)?,
            max_chunk_count: read_u32(stream)?,
        })
    }
}

/// The `ERR` message either side sends before dropping a connection that
/// violated the protocol.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorMessage {
    /// The numeric value of the status code describing the error.
    pub error: u32,
    /// A human readable description of the error.
    pub reason: UAString,
}

impl BinaryEncodable for ErrorMessage {
    fn byte_len(&self) -> usize {
        4 + self.reason.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        write_u32(stream, self.error)?;
        self.reason.encode(stream)
    }
}

impl BinaryDecodable for ErrorMessage {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(ErrorMessage {
            error: read_u32(stream)?,
            reason: UAString::decode(stream, options)?,
        })
    }
}

impl ErrorMessage {
    /// Create an error message from a status code.
    pub fn from_status_code(status_code: StatusCode) -> ErrorMessage {
        ErrorMessage {
            error: status_code.bits(),
            reason: UAString::from(status_code.name()),
        }
    }

    /// The status code carried by the message.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_bits(self.error)
    }
}

/// Sanity check an incoming message header against the decoding limits.
pub fn validate_message_header(
    header: &MessageHeader,
    options: &DecodingOptions,
) -> EncodingResult<()> {
    if (header.message_size as usize) < MESSAGE_HEADER_SIZE {
        return Err(Error::new(
            StatusCode::BadTcpInternalError,
            format!("Message size {} is impossibly small", header.message_size),
        ));
    }
    if options.max_message_size > 0 && header.message_size as usize > options.max_message_size {
        return Err(Error::new(
            StatusCode::BadTcpMessageTooLarge,
            format!(
                "Message size {} exceeds maximum message size {}",
                header.message_size, options.max_message_size
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_round_trip() {
        let hello = HelloMessage::new("opc.tcp://localhost:4840", 65535, 65535, 0, 0);
        let framed = encode_framed(HELLO_MESSAGE, &hello).unwrap();
        assert_eq!(framed.len(), MESSAGE_HEADER_SIZE + hello.byte_len());

        let options = DecodingOptions::default();
        let mut stream = Cursor::new(framed);
        let header = MessageHeader::decode(&mut stream, &options).unwrap();
        assert_eq!(&header.message_type, HELLO_MESSAGE);
        assert_eq!(header.is_final, CHUNK_FINAL);
        let decoded = HelloMessage::decode(&mut stream, &options).unwrap();
        assert_eq!(decoded, hello);
    }

    #[test]
    fn oversize_header_rejected() {
        let header = MessageHeader::new(CHUNK_MESSAGE, 100_000);
        let options = DecodingOptions {
            max_message_size: 1024,
            ..Default::default()
        };
        assert!(validate_message_header(&header, &options).is_err());
    }
}
