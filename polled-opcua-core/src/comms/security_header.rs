// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Security header and sequence header types found at the start of every chunk body.

use std::io::{Read, Write};

use opcua_types::{
    read_u32, write_u32, BinaryDecodable, BinaryEncodable, ByteString, DecodingOptions,
    EncodingResult, UAString,
};

/// The URI of the security policy this stack supports. Messages are neither
/// signed nor encrypted under it, so symmetric keys are the identity.
pub const SECURITY_POLICY_NONE_URI: &str = "http://opcfoundation.org/UA/SecurityPolicy#None";

/// Holds the security header associated with the chunk. Secure channel
/// management chunks use an asymmetric header, service chunks a symmetric one.
#[derive(Debug, Clone, PartialEq)]
pub enum SecurityHeader {
    /// An asymmetric security header, used by OpenSecureChannel chunks.
    Asymmetric(AsymmetricSecurityHeader),
    /// A symmetric security header, used by every other chunk.
    Symmetric(SymmetricSecurityHeader),
}

impl BinaryEncodable for SecurityHeader {
    fn byte_len(&self) -> usize {
        match self {
            SecurityHeader::Asymmetric(value) => value.byte_len(),
            SecurityHeader::Symmetric(value) => value.byte_len(),
        }
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        match self {
            SecurityHeader::Asymmetric(value) => value.encode(stream),
            SecurityHeader::Symmetric(value) => value.encode(stream),
        }
    }
}

impl SecurityHeader {
    /// Decode a security header of the kind implied by the chunk message type.
    pub fn decode_from_stream<S: Read + ?Sized>(
        stream: &mut S,
        is_open_secure_channel: bool,
        options: &DecodingOptions,
    ) -> EncodingResult<SecurityHeader> {
        if is_open_secure_channel {
            Ok(SecurityHeader::Asymmetric(
                AsymmetricSecurityHeader::decode(stream, options)?,
            ))
        } else {
            Ok(SecurityHeader::Symmetric(SymmetricSecurityHeader::decode(
                stream, options,
            )?))
        }
    }
}

/// Token id identifying the security keys applied to a service chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricSecurityHeader {
    /// The id of the active security token on the channel.
    pub token_id: u32,
}

impl BinaryEncodable for SymmetricSecurityHeader {
    fn byte_len(&self) -> usize {
        4
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        write_u32(stream, self.token_id)
    }
}

impl BinaryDecodable for SymmetricSecurityHeader {
    fn decode<S: Read + ?Sized>(stream: &mut S, _: &DecodingOptions) -> EncodingResult<Self> {
        Ok(SymmetricSecurityHeader {
            token_id: read_u32(stream)?,
        })
    }
}

/// Policy and certificate information applied to an OpenSecureChannel chunk.
/// Under `SecurityPolicy#None` the certificate fields are null.
#[derive(Debug, Clone, PartialEq)]
pub struct AsymmetricSecurityHeader {
    /// The URI of the security policy applied to the channel.
    pub security_policy_uri: UAString,
    /// The DER form of the sender certificate, null when unsecured.
    pub sender_certificate: ByteString,
    /// The SHA1 thumbprint of the receiver certificate, null when unsecured.
    pub receiver_certificate_thumbprint: ByteString,
}

impl BinaryEncodable for AsymmetricSecurityHeader {
    fn byte_len(&self) -> usize {
        self.security_policy_uri.byte_len()
            + self.sender_certificate.byte_len()
            + self.receiver_certificate_thumbprint.byte_len()
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        self.security_policy_uri.encode(stream)?;
        self.sender_certificate.encode(stream)?;
        self.receiver_certificate_thumbprint.encode(stream)
    }
}

impl BinaryDecodable for AsymmetricSecurityHeader {
    fn decode<S: Read + ?Sized>(stream: &mut S, options: &DecodingOptions) -> EncodingResult<Self> {
        Ok(AsymmetricSecurityHeader {
            security_policy_uri: UAString::decode(stream, options)?,
            sender_certificate: ByteString::decode(stream, options)?,
            receiver_certificate_thumbprint: ByteString::decode(stream, options)?,
        })
    }
}

impl AsymmetricSecurityHeader {
    /// The asymmetric header for `SecurityPolicy#None`.
    pub fn none() -> AsymmetricSecurityHeader {
        AsymmetricSecurityHeader {
            security_policy_uri: UAString::from(SECURITY_POLICY_NONE_URI),
            sender_certificate: ByteString::null(),
            receiver_certificate_thumbprint: ByteString::null(),
        }
    }
}

/// The sequence header tying a chunk to a request and ordering it within the channel.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceHeader {
    /// Monotonic per-channel chunk sequence number.
    pub sequence_number: u32,
    /// The request the chunk belongs to.
    pub request_id: u32,
}

impl BinaryEncodable for SequenceHeader {
    fn byte_len(&self) -> usize {
        8
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        write_u32(stream, self.sequence_number)?;
        write_u32(stream, self.request_id)
    }
}

impl BinaryDecodable for SequenceHeader {
    fn decode<S: Read + ?Sized>(stream: &mut S, _: &DecodingOptions) -> EncodingResult<Self> {
        Ok(SequenceHeader {
            sequence_number: read_u32(stream)?,
            request_id: read_u32(stream)?,
        })
    }
}
