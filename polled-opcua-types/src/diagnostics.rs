// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the implementations of `DiagnosticBits` and `DiagnosticInfo`.

use std::io::{Read, Write};

use bitflags::bitflags;

use crate::{
    encoding::{
        read_i32, read_u8, write_i32, write_u8, BinaryDecodable, BinaryEncodable, DecodingOptions,
        EncodingResult,
    },
    status_code::StatusCode,
    string::UAString,
};

bitflags! {
    /// Diagnostic bits set in a request header to ask the server for vendor-specific diagnostics.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub struct DiagnosticBits: u32 {
        /// ServiceLevel / SymbolicId
        const SERVICE_LEVEL_SYMBOLIC_ID = 0x0000_0001;
        /// ServiceLevel / LocalizedText
        const SERVICE_LEVEL_LOCALIZED_TEXT = 0x0000_0002;
        /// ServiceLevel / AdditionalInfo
        const SERVICE_LEVEL_ADDITIONAL_INFO = 0x0000_0004;
        /// ServiceLevel / Inner StatusCode
        const SERVICE_LEVEL_LOCALIZED_INNER_STATUS_CODE = 0x0000_0008;
        /// ServiceLevel / Inner Diagnostics
        const SERVICE_LEVEL_LOCALIZED_INNER_DIAGNOSTICS = 0x0000_0010;
        /// OperationLevel / SymbolicId
        const OPERATIONAL_LEVEL_SYMBOLIC_ID = 0x0000_0020;
        /// OperationLevel / LocalizedText
        const OPERATIONAL_LEVEL_LOCALIZED_TEXT = 0x0000_0040;
        /// OperationLevel / AdditionalInfo
        const OPERATIONAL_LEVEL_ADDITIONAL_INFO = 0x0000_0080;
        /// OperationLevel / Inner StatusCode
        const OPERATIONAL_LEVEL_INNER_STATUS_CODE = 0x0000_0100;
        /// OperationLevel / Inner Diagnostics
        const OPERATIONAL_LEVEL_INNER_DIAGNOSTICS = 0x0000_0200;
    }
}

mod mask {
    pub const HAS_SYMBOLIC_ID: u8 = 0x01;
    pub const HAS_NAMESPACE: u8 = 0x02;
    pub const HAS_LOCALIZED_TEXT: u8 = 0x04;
    pub const HAS_LOCALE: u8 = 0x08;
    pub const HAS_ADDITIONAL_INFO: u8 = 0x10;
    pub const HAS_INNER_STATUS_CODE: u8 = 0x20;
    pub const HAS_INNER_DIAGNOSTIC_INFO: u8 = 0x40;
}

/// Vendor-specific diagnostic information attached to a response. All fields are
/// optional, the encoding carries a mask byte indicating which are present.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct DiagnosticInfo {
    /// Index into the string table of the symbolic id of the error or condition.
    pub symbolic_id: Option<i32>,
    /// Index into the string table of the namespace the symbolic id belongs to.
    pub namespace_uri: Option<i32>,
    /// Index into the string table of the locale of the localized text.
    pub locale: Option<i32>,
    /// Index into the string table of the localized error description.
    pub localized_text: Option<i32>,
    /// Vendor-specific diagnostic payload.
    pub additional_info: Option<UAString>,
    /// Status code of an inner operation.
    pub inner_status_code: Option<StatusCode>,
    /// Diagnostic info of an inner operation.
    pub inner_diagnostic_info: Option<Box<DiagnosticInfo>>,
}

impl BinaryEncodable for DiagnosticInfo {
    fn byte_len(&self) -> usize {
        let mut size = 1;
        size += self.symbolic_id.map_or(0, |_| 4);
        size += self.namespace_uri.map_or(0, |_| 4);
        size += self.locale.map_or(0, |_| 4);
        size += self.localized_text.map_or(0, |_| 4);
        if let Some(ref info) = self.additional_info {
            size += info.byte_len();
        }
        size += self.inner_status_code.map_or(0, |_| 4);
        if let Some(ref inner) = self.inner_diagnostic_info {
            size += inner.byte_len();
        }
        size
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        write_u8(stream, self.encoding_mask())?;
        if let Some(symbolic_id) = self.symbolic_id {
            write_i32(stream, symbolic_id)?;
        }
        if let Some(namespace_uri) = self.namespace_uri {
            write_i32(stream, namespace_uri)?;
        }
        if let Some(locale) = self.locale {
            write_i32(stream, locale)?;
        }
        if let Some(localized_text) = self.localized_text {
            write_i32(stream, localized_text)?;
        }
        if let Some(ref additional_info) = self.additional_info {
            additional_info.encode(stream)?;
        }
        if let Some(inner_status_code) = self.inner_status_code {
            inner_status_code.encode(stream)?;
        }
        if let Some(ref inner_diagnostic_info) = self.inner_diagnostic_info {
            inner_diagnostic_info.encode(stream)?;
        }
        Ok(())
    }
}

impl BinaryDecodable for DiagnosticInfo {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        let encoding_mask = read_u8(stream)?;
        let mut diagnostic_info = DiagnosticInfo::default();
        if encoding_mask & mask::HAS_SYMBOLIC_ID != 0 {
            diagnostic_info.symbolic_id = Some(read_i32(stream)?);
        }
        if encoding_mask & mask::HAS_NAMESPACE != 0 {
            diagnostic_info.namespace_uri = Some(read_i32(stream)?);
        }
        if encoding_mask & mask::HAS_LOCALE != 0 {
            diagnostic_info.locale = Some(read_i32(stream)?);
        }
        if encoding_mask & mask::HAS_LOCALIZED_TEXT != 0 {
            diagnostic_info.localized_text = Some(read_i32(stream)?);
        }
        if encoding_mask & mask::HAS_ADDITIONAL_INFO != 0 {
            diagnostic_info.additional_info = Some(UAString::decode(stream, options)?);
        }
        if encoding_mask & mask::HAS_INNER_STATUS_CODE != 0 {
            diagnostic_info.inner_status_code = Some(StatusCode::decode(stream, options)?);
        }
        if encoding_mask & mask::HAS_INNER_DIAGNOSTIC_INFO != 0 {
            diagnostic_info.inner_diagnostic_info =
                Some(Box::new(DiagnosticInfo::decode(stream, options)?));
        }
        Ok(diagnostic_info)
    }
}

impl DiagnosticInfo {
    /// The encoding mask for the optional fields held by this value.
    pub fn encoding_mask(&self) -> u8 {
        let mut encoding_mask = 0;
        if self.symbolic_id.is_some() {
            encoding_mask |= mask::HAS_SYMBOLIC_ID;
        }
        if self.namespace_uri.is_some() {
            encoding_mask |= mask::HAS_NAMESPACE;
        }
        if self.locale.is_some() {
            encoding_mask |= mask::HAS_LOCALE;
        }
        if self.localized_text.is_some() {
            encoding_mask |= mask::HAS_LOCALIZED_TEXT;
        }
        if self.additional_info.is_some() {
            encoding_mask |= mask::HAS_ADDITIONAL_INFO;
        }
        if self.inner_status_code.is_some() {
            encoding_mask |= mask::HAS_INNER_STATUS_CODE;
        }
        if self.inner_diagnostic_info.is_some() {
            encoding_mask |= mask::HAS_INNER_DIAGNOSTIC_INFO;
        }
        encoding_mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_info_round_trip() {
        let value = DiagnosticInfo {
            symbolic_id: Some(10),
            localized_text: Some(4),
            inner_status_code: Some(StatusCode::BadNodeIdUnknown),
            inner_diagnostic_info: Some(Box::new(DiagnosticInfo {
                additional_info: Some(UAString::from("inner")),
                ..Default::default()
            })),
            ..Default::default()
        };
        let buf = value.encode_to_vec();
        assert_eq!(buf.len(), value.byte_len());
        let mut stream = std::io::Cursor::new(buf);
        let decoded = DiagnosticInfo::decode(&mut stream, &DecodingOptions::default()).unwrap();
        assert_eq!(decoded, value);
    }
}
