// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the `BinaryEncodable` and `BinaryDecodable` traits and helpers for reading and
//! writing of scalar values and other primitives.

use std::{
    error::Error as StdError,
    fmt::Display,
    io::{Read, Result, Write},
};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::error;

use crate::{constants, status_code::StatusCode};

/// Result of an encoding or decoding operation.
pub type EncodingResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
/// General OPC-UA error.
///
/// Contains context about the request this error occured as part of, if that is possible to
/// retrieve, as well as details about the error that caused this, and a status code.
pub struct Error {
    status: StatusCode,
    request_id: Option<u32>,
    request_handle: Option<u32>,
    context: Box<dyn StdError + Send + Sync>,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status(), self.context)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.context)
    }
}

impl Error {
    /// Create a new error with the specified `status` code and
    /// `context` as a dynamic error source.
    pub fn new(status: StatusCode, context: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            status,
            request_handle: None,
            request_id: None,
            context: context.into(),
        }
    }

    /// Create a new error with status code `BadDecodingError` and
    /// `context` as a dynamic error source.
    pub fn decoding(context: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            status: StatusCode::BadDecodingError,
            request_handle: None,
            request_id: None,
            context: context.into(),
        }
    }

    /// Create a new error with status code `BadEncodingError` and
    /// `context` as a dynamic error source.
    pub fn encoding(context: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            status: StatusCode::BadEncodingError,
            request_handle: None,
            request_id: None,
            context: context.into(),
        }
    }

    /// Add request ID and request handle to this error.
    pub fn with_context(mut self, request_id: Option<u32>, request_handle: Option<u32>) -> Self {
        self.request_id = request_id;
        self.request_handle = request_handle;
        self
    }

    /// Add request ID to this error.
    pub fn with_request_id(mut self, id: u32) -> Self {
        self.request_id = Some(id);
        self
    }

    /// Add request handle to this error.
    pub fn with_request_handle(mut self, handle: u32) -> Self {
        self.request_handle = Some(handle);
        self
    }

    /// Get the inner status code of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the full context of this error, if both fields are present.
    pub fn full_context(&self) -> Option<(u32, u32)> {
        if let (Some(id), Some(handle)) = (self.request_id, self.request_handle) {
            Some((id, handle))
        } else {
            None
        }
    }
}

impl From<Error> for StatusCode {
    fn from(value: Error) -> Self {
        error!("{}", value);
        value.status()
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::decoding(value)
    }
}

#[derive(Clone, Debug)]
/// Limits and options applied when decoding messages off the wire.
pub struct DecodingOptions {
    /// Maximum size of a message in bytes. 0 means no limit.
    pub max_message_size: usize,
    /// Maximum number of chunks in a message. 0 means no limit.
    pub max_chunk_count: usize,
    /// Maximum length in bytes of a string. 0 means no limit.
    pub max_string_length: usize,
    /// Maximum length in bytes of a byte string. 0 means no limit.
    pub max_byte_string_length: usize,
    /// Maximum number of array elements. 0 means no limit.
    pub max_array_length: usize,
    /// Clock offset applied to timestamps produced locally, to compensate for
    /// skew between the client and server clocks.
    pub client_offset: chrono::Duration,
}

impl Default for DecodingOptions {
    fn default() -> Self {
        DecodingOptions {
            max_message_size: constants::MAX_MESSAGE_SIZE,
            max_chunk_count: constants::MAX_CHUNK_COUNT,
            max_string_length: constants::MAX_STRING_LENGTH,
            max_byte_string_length: constants::MAX_BYTE_STRING_LENGTH,
            max_array_length: constants::MAX_ARRAY_LENGTH,
            client_offset: chrono::Duration::zero(),
        }
    }
}

impl DecodingOptions {
    /// For testing, a set of options that uses no limits.
    pub fn minimal() -> Self {
        DecodingOptions::default()
    }
}

/// OPC UA binary encodable trait. Anything that can be written to an OPC UA
/// binary stream implements this.
pub trait BinaryEncodable {
    /// Returns the exact byte length of the structure as it would be if `encode` were called.
    fn byte_len(&self) -> usize;

    /// Encodes the instance to the write stream.
    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()>;

    /// Convenience method for encoding a message straight into an array of bytes. It is preferable
    /// to reuse buffers than to call this so it is mainly for tests and debugging.
    fn encode_to_vec(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.byte_len());
        let _ = self.encode(&mut buffer);
        buffer
    }
}

/// OPC UA binary decodable trait. Anything that can be read from an OPC UA
/// binary stream implements this.
pub trait BinaryDecodable: Sized {
    /// Decodes an instance from the read stream. The decoding options contain restrictions set by
    /// the server / client on the length of strings, arrays etc.
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self>;
}

/// Converts an IO encoding error (and logs when in error) into an `EncodingResult`.
pub fn process_encode_io_result(result: Result<()>) -> EncodingResult<()> {
    result.map_err(|err| Error::encoding(format!("Encoding error - {err}")))
}

/// Converts an IO decoding error (and logs when in error) into an `EncodingResult`.
pub fn process_decode_io_result(result: Result<()>) -> EncodingResult<()> {
    result.map_err(|err| Error::decoding(format!("Decoding error - {err}")))
}

impl<T: BinaryEncodable> BinaryEncodable for Option<Vec<T>> {
    fn byte_len(&self) -> usize {
        let mut size = 4;
        if let Some(ref values) = self {
            size += values.iter().map(|v| v.byte_len()).sum::<usize>();
        }
        size
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        if let Some(ref values) = self {
            write_i32(stream, values.len() as i32)?;
            for value in values.iter() {
                value.encode(stream)?;
            }
        } else {
            write_i32(stream, -1)?;
        }
        Ok(())
    }
}

impl<T: BinaryDecodable> BinaryDecodable for Option<Vec<T>> {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let len = read_i32(stream)?;
        if len == -1 {
            Ok(None)
        } else if len < -1 {
            Err(Error::decoding(format!(
                "Array length is negative value and invalid, len = {len}"
            )))
        } else if options.max_array_length > 0 && len as usize > options.max_array_length {
            Err(Error::decoding(format!(
                "Array length {} exceeds decoding limit {}",
                len, options.max_array_length
            )))
        } else {
            let mut values: Vec<T> = Vec::with_capacity(len as usize);
            for _ in 0..len {
                values.push(T::decode(stream, options)?);
            }
            Ok(Some(values))
        }
    }
}

macro_rules! binary_scalar {
    ($t:ty, $len:literal, $rfn:ident, $wfn:ident) => {
        impl BinaryEncodable for $t {
            fn byte_len(&self) -> usize {
                $len
            }

            fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
                $wfn(stream, *self)
            }
        }

        impl BinaryDecodable for $t {
            fn decode<S: Read + ?Sized>(
                stream: &mut S,
                _: &DecodingOptions,
            ) -> EncodingResult<Self> {
                $rfn(stream)
            }
        }
    };
}

binary_scalar!(u8, 1, read_u8, write_u8);
binary_scalar!(i8, 1, read_i8, write_i8);
binary_scalar!(u16, 2, read_u16, write_u16);
binary_scalar!(i16, 2, read_i16, write_i16);
binary_scalar!(u32, 4, read_u32, write_u32);
binary_scalar!(i32, 4, read_i32, write_i32);
binary_scalar!(u64, 8, read_u64, write_u64);
binary_scalar!(i64, 8, read_i64, write_i64);
binary_scalar!(f32, 4, read_f32, write_f32);
binary_scalar!(f64, 8, read_f64, write_f64);

impl BinaryEncodable for bool {
    fn byte_len(&self) -> usize {
        1
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        write_u8(stream, if *self { 1 } else { 0 })
    }
}

impl BinaryDecodable for bool {
    fn decode<S: Read + ?Sized>(stream: &mut S, _: &DecodingOptions) -> EncodingResult<Self> {
        Ok(read_u8(stream)? == 1)
    }
}

/// Writes an unsigned byte to the stream.
pub fn write_u8<S: Write + ?Sized>(stream: &mut S, value: u8) -> EncodingResult<()> {
    process_encode_io_result(stream.write_u8(value))
}

/// Writes a signed byte to the stream.
pub fn write_i8<S: Write + ?Sized>(stream: &mut S, value: i8) -> EncodingResult<()> {
    process_encode_io_result(stream.write_i8(value))
}

/// Writes an unsigned 16-bit value to the stream.
pub fn write_u16<S: Write + ?Sized>(stream: &mut S, value: u16) -> EncodingResult<()> {
    process_encode_io_result(stream.write_u16::<LittleEndian>(value))
}

/// Writes a signed 16-bit value to the stream.
pub fn write_i16<S: Write + ?Sized>(stream: &mut S, value: i16) -> EncodingResult<()> {
    process_encode_io_result(stream.write_i16::<LittleEndian>(value))
}

/// Writes an unsigned 32-bit value to the stream.
pub fn write_u32<S: Write + ?Sized>(stream: &mut S, value: u32) -> EncodingResult<()> {
    process_encode_io_result(stream.write_u32::<LittleEndian>(value))
}

/// Writes a signed 32-bit value to the stream.
pub fn write_i32<S: Write + ?Sized>(stream: &mut S, value: i32) -> EncodingResult<()> {
    process_encode_io_result(stream.write_i32::<LittleEndian>(value))
}

/// Writes an unsigned 64-bit value to the stream.
pub fn write_u64<S: Write + ?Sized>(stream: &mut S, value: u64) -> EncodingResult<()> {
    process_encode_io_result(stream.write_u64::<LittleEndian>(value))
}

/// Writes a signed 64-bit value to the stream.
pub fn write_i64<S: Write + ?Sized>(stream: &mut S, value: i64) -> EncodingResult<()> {
    process_encode_io_result(stream.write_i64::<LittleEndian>(value))
}

/// Writes a 32-bit float to the stream.
pub fn write_f32<S: Write + ?Sized>(stream: &mut S, value: f32) -> EncodingResult<()> {
    process_encode_io_result(stream.write_f32::<LittleEndian>(value))
}

/// Writes a 64-bit float to the stream.
pub fn write_f64<S: Write + ?Sized>(stream: &mut S, value: f64) -> EncodingResult<()> {
    process_encode_io_result(stream.write_f64::<LittleEndian>(value))
}

macro_rules! read_scalar {
    ($n:ident, $t:ty, $read:ident) => {
        /// Reads a scalar value from the stream.
        pub fn $n<S: Read + ?Sized>(stream: &mut S) -> EncodingResult<$t> {
            stream
                .$read::<LittleEndian>()
                .map_err(|err| Error::decoding(format!("Decoding error - {err}")))
        }
    };
}

/// Reads an unsigned byte from the stream.
pub fn read_u8<S: Read + ?Sized>(stream: &mut S) -> EncodingResult<u8> {
    stream
        .read_u8()
        .map_err(|err| Error::decoding(format!("Decoding error - {err}")))
}

/// Reads a signed byte from the stream.
pub fn read_i8<S: Read + ?Sized>(stream: &mut S) -> EncodingResult<i8> {
    stream
        .read_i8()
        .map_err(|err| Error::decoding(format!("Decoding error - {err}")))
}

read_scalar!(read_u16, u16, read_u16);
read_scalar!(read_i16, i16, read_i16);
read_scalar!(read_u32, u32, read_u32);
read_scalar!(read_i32, i32, read_i32);
read_scalar!(read_u64, u64, read_u64);
read_scalar!(read_i64, i64, read_i64);
read_scalar!(read_f32, f32, read_f32);
read_scalar!(read_f64, f64, read_f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_round_trip() {
        let mut buf = Vec::new();
        0xdeadbeefu32.encode(&mut buf).unwrap();
        (-5i16).encode(&mut buf).unwrap();
        true.encode(&mut buf).unwrap();
        1.25f64.encode(&mut buf).unwrap();

        let options = DecodingOptions::default();
        let mut stream = std::io::Cursor::new(buf);
        assert_eq!(u32::decode(&mut stream, &options).unwrap(), 0xdeadbeef);
        assert_eq!(i16::decode(&mut stream, &options).unwrap(), -5);
        assert!(bool::decode(&mut stream, &options).unwrap());
        assert_eq!(f64::decode(&mut stream, &options).unwrap(), 1.25);
    }

    #[test]
    fn array_null_and_limits() {
        let empty: Option<Vec<u32>> = None;
        let buf = empty.encode_to_vec();
        assert_eq!(buf, vec![0xff, 0xff, 0xff, 0xff]);

        let values = Some(vec![1u32, 2, 3]);
        let buf = values.encode_to_vec();
        let options = DecodingOptions {
            max_array_length: 2,
            ..Default::default()
        };
        let mut stream = std::io::Cursor::new(buf);
        assert!(Option::<Vec<u32>>::decode(&mut stream, &options).is_err());
    }
}
