// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the implementation of `ByteString`.

use std::io::{Read, Write};

use crate::encoding::{
    process_decode_io_result, process_encode_io_result, read_i32, write_i32, BinaryDecodable,
    BinaryEncodable, DecodingOptions, EncodingResult, Error,
};

/// A sequence of octets or a null value.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Default)]
pub struct ByteString {
    /// The value of the byte string, `None` for null.
    pub value: Option<Vec<u8>>,
}

impl BinaryEncodable for ByteString {
    fn byte_len(&self) -> usize {
        4 + match &self.value {
            Some(v) => v.len(),
            None => 0,
        }
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        match &self.value {
            Some(v) => {
                write_i32(stream, v.len() as i32)?;
                process_encode_io_result(stream.write_all(v))
            }
            None => write_i32(stream, -1),
        }
    }
}

impl BinaryDecodable for ByteString {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let len = read_i32(stream)?;
        if len == -1 {
            Ok(ByteString::null())
        } else if len < -1 {
            Err(Error::decoding(format!(
                "ByteString length is a negative number {}",
                len
            )))
        } else if options.max_byte_string_length > 0
            && len as usize > options.max_byte_string_length
        {
            Err(Error::decoding(format!(
                "ByteString length {} exceeds decoding limit {}",
                len, options.max_byte_string_length
            )))
        } else {
            let mut value = vec![0u8; len as usize];
            process_decode_io_result(stream.read_exact(&mut value))?;
            Ok(ByteString { value: Some(value) })
        }
    }
}

impl<'a> From<&'a [u8]> for ByteString {
    fn from(value: &'a [u8]) -> Self {
        ByteString {
            value: Some(value.to_vec()),
        }
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(value: Vec<u8>) -> Self {
        ByteString { value: Some(value) }
    }
}

impl ByteString {
    /// Creates a null byte string.
    pub fn null() -> ByteString {
        ByteString { value: None }
    }

    /// Returns `true` if the byte string is null.
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Returns `true` if the byte string is null or empty.
    pub fn is_empty(&self) -> bool {
        self.value.as_ref().map(|v| v.is_empty()).unwrap_or(true)
    }

    /// The value as a slice, empty when null.
    pub fn as_ref(&self) -> &[u8] {
        self.value.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_string_round_trip() {
        let value = ByteString::from(vec![1u8, 2, 3, 4]);
        let buf = value.encode_to_vec();
        assert_eq!(buf.len(), value.byte_len());
        let mut stream = std::io::Cursor::new(buf);
        let decoded = ByteString::decode(&mut stream, &DecodingOptions::default()).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn null_byte_string() {
        let buf = ByteString::null().encode_to_vec();
        assert_eq!(buf, vec![0xff, 0xff, 0xff, 0xff]);
    }
}
