// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the implementation of `DataValue`.

use std::io::{Read, Write};

use crate::{
    date_time::DateTime,
    encoding::{
        read_u16, read_u8, write_u16, write_u8, BinaryDecodable, BinaryEncodable, DecodingOptions,
        EncodingResult,
    },
    status_code::StatusCode,
    variant::Variant,
};

mod mask {
    pub const HAS_VALUE: u8 = 0x1;
    pub const HAS_STATUS: u8 = 0x2;
    pub const HAS_SOURCE_TIMESTAMP: u8 = 0x4;
    pub const HAS_SERVER_TIMESTAMP: u8 = 0x8;
    pub const HAS_SOURCE_PICOSECONDS: u8 = 0x10;
    pub const HAS_SERVER_PICOSECONDS: u8 = 0x20;
}

/// A value with associated quality and timestamps. Every field is optional and
/// the encoding carries a mask byte indicating which are present. An absent
/// status means the value is good.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct DataValue {
    /// The value. An absent value means the attribute holds no data.
    pub value: Option<Variant>,
    /// The quality of the value. Absent means `Good`.
    pub status: Option<StatusCode>,
    /// The time the value was sampled at the source.
    pub source_timestamp: Option<DateTime>,
    /// Picoseconds interval added to the source timestamp.
    pub source_picoseconds: Option<u16>,
    /// The time the server obtained the value.
    pub server_timestamp: Option<DateTime>,
    /// Picoseconds interval added to the server timestamp.
    pub server_picoseconds: Option<u16>,
}

impl BinaryEncodable for DataValue {
    fn byte_len(&self) -> usize {
        let mut size = 1;
        if let Some(ref value) = self.value {
            size += value.byte_len();
        }
        if let Some(ref status) = self.status {
            size += status.byte_len();
        }
        if let Some(ref source_timestamp) = self.source_timestamp {
            size += source_timestamp.byte_len();
            if self.source_picoseconds.is_some() {
                size += 2;
            }
        }
        if let Some(ref server_timestamp) = self.server_timestamp {
            size += server_timestamp.byte_len();
            if self.server_picoseconds.is_some() {
                size += 2;
            }
        }
        size
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        write_u8(stream, self.encoding_mask())?;
        if let Some(ref value) = self.value {
            value.encode(stream)?;
        }
        if let Some(ref status) = self.status {
            status.encode(stream)?;
        }
        // Picoseconds are only encoded when their timestamp is present.
        if let Some(ref source_timestamp) = self.source_timestamp {
            source_timestamp.encode(stream)?;
            if let Some(source_picoseconds) = self.source_picoseconds {
                write_u16(stream, source_picoseconds)?;
            }
        }
        if let Some(ref server_timestamp) = self.server_timestamp {
            server_timestamp.encode(stream)?;
            if let Some(server_picoseconds) = self.server_picoseconds {
                write_u16(stream, server_picoseconds)?;
            }
        }
        Ok(())
    }
}

impl BinaryDecodable for DataValue {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let encoding_mask = read_u8(stream)?;
        let mut data_value = DataValue::default();
        if encoding_mask & mask::HAS_VALUE != 0 {
            data_value.value = Some(Variant::decode(stream, options)?);
        }
        if encoding_mask & mask::HAS_STATUS != 0 {
            data_value.status = Some(StatusCode::decode(stream, options)?);
        }
        if encoding_mask & mask::HAS_SOURCE_TIMESTAMP != 0 {
            data_value.source_timestamp = Some(DateTime::decode(stream, options)?);
            if encoding_mask & mask::HAS_SOURCE_PICOSECONDS != 0 {
                data_value.source_picoseconds = Some(read_u16(stream)?);
            }
        }
        if encoding_mask & mask::HAS_SERVER_TIMESTAMP != 0 {
            data_value.server_timestamp = Some(DateTime::decode(stream, options)?);
            if encoding_mask & mask::HAS_SERVER_PICOSECONDS != 0 {
                data_value.server_picoseconds = Some(read_u16(stream)?);
            }
        }
        Ok(data_value)
    }
}

impl From<Variant> for DataValue {
    fn from(value: Variant) -> Self {
        DataValue {
            value: Some(value),
            ..Default::default()
        }
    }
}

impl DataValue {
    /// Creates a data value holding the supplied value stamped with the current time.
    pub fn new_now(value: impl Into<Variant>) -> DataValue {
        let now = DateTime::now();
        DataValue {
            value: Some(value.into()),
            status: Some(StatusCode::Good),
            source_timestamp: Some(now),
            server_timestamp: Some(now),
            ..Default::default()
        }
    }

    /// The status of the value, `Good` when absent.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::Good)
    }

    fn encoding_mask(&self) -> u8 {
        let mut encoding_mask = 0;
        if self.value.is_some() {
            encoding_mask |= mask::HAS_VALUE;
        }
        if self.status.is_some() {
            encoding_mask |= mask::HAS_STATUS;
        }
        if self.source_timestamp.is_some() {
            encoding_mask |= mask::HAS_SOURCE_TIMESTAMP;
            if self.source_picoseconds.is_some() {
                encoding_mask |= mask::HAS_SOURCE_PICOSECONDS;
            }
        }
        if self.server_timestamp.is_some() {
            encoding_mask |= mask::HAS_SERVER_TIMESTAMP;
            if self.server_picoseconds.is_some() {
                encoding_mask |= mask::HAS_SERVER_PICOSECONDS;
            }
        }
        encoding_mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_value_round_trip() {
        for value in [
            DataValue::default(),
            DataValue::new_now(42i32),
            DataValue {
                status: Some(StatusCode::BadNodeIdUnknown),
                server_timestamp: Some(DateTime::now()),
                server_picoseconds: Some(100),
                ..Default::default()
            },
        ] {
            let buf = value.encode_to_vec();
            assert_eq!(buf.len(), value.byte_len());
            let mut stream = std::io::Cursor::new(buf);
            let decoded = DataValue::decode(&mut stream, &DecodingOptions::default()).unwrap();
            assert_eq!(decoded, value);
        }
    }
}
