// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the implementation of `UAString`.

use std::{
    fmt,
    io::{Read, Write},
};

use crate::encoding::{
    process_decode_io_result, process_encode_io_result, read_i32, write_i32, BinaryDecodable,
    BinaryEncodable, DecodingOptions, EncodingResult, Error,
};

/// To avoid naming conflict hell, the OPC UA String type is typed `UAString` so it does not
/// collide with the Rust `String`.
///
/// A string contains UTF-8 encoded characters or a null value. A null value is distinct from
/// being an empty string so internally, the code maintains that distinction by holding the value
/// as an `Option<String>`.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Default)]
pub struct UAString {
    value: Option<String>,
}

impl fmt::Display for UAString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref value) = self.value {
            write!(f, "{}", value)
        } else {
            write!(f, "[null]")
        }
    }
}

impl BinaryEncodable for UAString {
    fn byte_len(&self) -> usize {
        // Length plus the actual string length in bytes for a non-null string.
        4 + match &self.value {
            Some(s) => s.len(),
            None => 0,
        }
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        // Strings are encoded as UTF8 chars preceded by an Int32 length. A -1 indicates a null string.
        match &self.value {
            Some(s) => {
                write_i32(stream, s.len() as i32)?;
                process_encode_io_result(stream.write_all(s.as_bytes()))
            }
            None => write_i32(stream, -1),
        }
    }
}

impl BinaryDecodable for UAString {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let len = read_i32(stream)?;
        // Null string?
        if len == -1 {
            Ok(UAString::null())
        } else if len < -1 {
            Err(Error::decoding(format!(
                "String buf length is a negative number {}",
                len
            )))
        } else if options.max_string_length > 0 && len as usize > options.max_string_length {
            Err(Error::decoding(format!(
                "String buf length {} exceeds decoding limit {}",
                len, options.max_string_length
            )))
        } else {
            // Create a buffer filled with zeroes and read the string over the top
            let mut buf = vec![0u8; len as usize];
            process_decode_io_result(stream.read_exact(&mut buf))?;
            let value = String::from_utf8(buf).map_err(|err| {
                Error::decoding(format!("Decoded string was not valid UTF-8 - {}", err))
            })?;
            Ok(UAString::from(value))
        }
    }
}

impl From<UAString> for String {
    fn from(value: UAString) -> Self {
        value.as_ref().to_string()
    }
}

impl AsRef<str> for UAString {
    fn as_ref(&self) -> &str {
        if self.is_null() {
            ""
        } else {
            self.value.as_ref().unwrap()
        }
    }
}

impl<'a> From<&'a str> for UAString {
    fn from(value: &'a str) -> Self {
        Self {
            value: Some(value.to_string()),
        }
    }
}

impl From<&String> for UAString {
    fn from(value: &String) -> Self {
        Self {
            value: Some(value.clone()),
        }
    }
}

impl From<String> for UAString {
    fn from(value: String) -> Self {
        Self { value: Some(value) }
    }
}

impl From<Option<String>> for UAString {
    fn from(value: Option<String>) -> Self {
        Self { value }
    }
}

impl UAString {
    /// The value of the string, or `None` for the null string.
    pub fn value(&self) -> &Option<String> {
        &self.value
    }

    /// Set the value of the string.
    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value;
    }

    /// Returns `true` if the string is null. A null string is distinct from an empty string.
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Returns the length of the string in bytes or -1 for null.
    pub fn len(&self) -> isize {
        if self.is_null() {
            -1
        } else {
            self.value.as_ref().unwrap().len() as isize
        }
    }

    /// Returns `true` if the string is null or empty.
    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }

    /// Creates a null string.
    pub fn null() -> UAString {
        UAString { value: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_string_is_distinct_from_empty() {
        let null = UAString::null();
        let empty = UAString::from("");
        assert!(null.is_null());
        assert!(!empty.is_null());
        assert!(null.is_empty() && empty.is_empty());
        assert_ne!(null, empty);
    }

    #[test]
    fn string_round_trip() {
        let value = UAString::from("hello world");
        let buf = value.encode_to_vec();
        assert_eq!(buf.len(), value.byte_len());
        let mut stream = std::io::Cursor::new(buf);
        let decoded = UAString::decode(&mut stream, &DecodingOptions::default()).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn string_limit() {
        let value = UAString::from("too long for the limit");
        let buf = value.encode_to_vec();
        let options = DecodingOptions {
            max_string_length: 4,
            ..Default::default()
        };
        let mut stream = std::io::Cursor::new(buf);
        assert!(UAString::decode(&mut stream, &options).is_err());
    }
}
