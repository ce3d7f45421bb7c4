// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Decoded header information about a single chunk.

use std::io::Cursor;

use opcua_types::{BinaryDecodable, EncodingResult, Error};

use super::{
    message_chunk::{MessageChunk, MessageChunkHeader},
    secure_channel::SecureChannel,
    security_header::{SecurityHeader, SequenceHeader},
};

/// Chunk info provides helpers for decoding the headers of a chunk and locating its body.
#[derive(Debug, Clone)]
pub struct ChunkInfo {
    /// The chunk header.
    pub message_header: MessageChunkHeader,
    /// The security header.
    pub security_header: SecurityHeader,
    /// The sequence header.
    pub sequence_header: SequenceHeader,
    /// The offset of the body within the chunk data.
    pub body_offset: usize,
    /// The length of the body in bytes.
    pub body_length: usize,
}

impl ChunkInfo {
    /// Decode the headers of the chunk and compute where its body lies.
    pub fn new(chunk: &MessageChunk, secure_channel: &SecureChannel) -> EncodingResult<ChunkInfo> {
        let options = secure_channel.decoding_options();
        let mut stream = Cursor::new(&chunk.data);

        let message_header = MessageChunkHeader::decode(&mut stream, &options)?;
        let security_header = SecurityHeader::decode_from_stream(
            &mut stream,
            message_header.message_type.is_open_secure_channel(),
            &options,
        )?;
        let sequence_header = SequenceHeader::decode(&mut stream, &options)?;

        let body_offset = stream.position() as usize;
        let message_size = message_header.message_size as usize;
        if message_size != chunk.data.len() || message_size < body_offset {
            return Err(Error::decoding(format!(
                "Chunk payload size {} disagrees with the size in its header {}",
                chunk.data.len(),
                message_size
            )));
        }
        let body_length = message_size - body_offset;

        Ok(ChunkInfo {
            message_header,
            security_header,
            sequence_header,
            body_offset,
            body_length,
        })
    }
}
