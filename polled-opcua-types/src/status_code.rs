// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! The `StatusCode` type and the status code constants used by the stack.

use std::{
    fmt,
    io::{Read, Write},
};

use crate::encoding::{
    read_u32, write_u32, BinaryDecodable, BinaryEncodable, DecodingOptions, EncodingResult,
};

/// An OPC UA status code. The two most significant bits hold the severity:
/// `00` is good, `01` is uncertain and `10` is bad. The rest of the upper
/// sixteen bits identify the condition, the lower sixteen bits carry flags.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct StatusCode(u32);

macro_rules! status_codes {
    ($($name:ident = $value:literal, $doc:literal;)*) => {
        impl StatusCode {
            $(
                #[doc = $doc]
                pub const $name: StatusCode = StatusCode($value);
            )*

            /// The symbolic name of the status code, ignoring any flag bits.
            /// Unknown codes yield `"Unknown"`.
            pub fn name(&self) -> &'static str {
                match self.0 & 0xffff_0000 {
                    $( $value => stringify!($name), )*
                    _ => "Unknown",
                }
            }
        }
    };
}

status_codes! {
    Good = 0x0000_0000, "The operation succeeded.";
    BadUnexpectedError = 0x8001_0000, "An unexpected error occurred.";
    BadInternalError = 0x8002_0000, "An internal error occurred as a result of a programming or configuration error.";
    BadOutOfMemory = 0x8003_0000, "Not enough memory to complete the operation.";
    BadResourceUnavailable = 0x8004_0000, "An operating system resource is not available.";
    BadCommunicationError = 0x8005_0000, "A low level communication error occurred.";
    BadEncodingError = 0x8006_0000, "Encoding halted because of invalid data in the objects being serialized.";
    BadDecodingError = 0x8007_0000, "Decoding halted because of invalid data in the stream.";
    BadEncodingLimitsExceeded = 0x8008_0000, "The message encoding/decoding limits imposed by the stack have been exceeded.";
    BadUnknownResponse = 0x8009_0000, "An unrecognized response was received from the server.";
    BadTimeout = 0x800a_0000, "The operation timed out.";
    BadServiceUnsupported = 0x800b_0000, "The server does not support the requested service.";
    BadShutdown = 0x800c_0000, "The operation was cancelled because the application is shutting down.";
    BadServerNotConnected = 0x800d_0000, "The operation could not complete because the client is not connected to the server.";
    BadNothingToDo = 0x800f_0000, "There was nothing to do because the client passed a list of operations with no elements.";
    BadTooManyOperations = 0x8010_0000, "The request could not be processed because it specified too many operations.";
    BadIdentityTokenInvalid = 0x8020_0000, "The user identity token is not valid.";
    BadIdentityTokenRejected = 0x8021_0000, "The user identity token is valid but the server has rejected it.";
    BadSecureChannelIdInvalid = 0x8022_0000, "The specified secure channel is no longer valid.";
    BadSessionIdInvalid = 0x8025_0000, "The session id is not valid.";
    BadSessionClosed = 0x8026_0000, "The session was closed by the client.";
    BadSessionNotActivated = 0x8027_0000, "The session cannot be used because ActivateSession has not been called.";
    BadInvalidTimestampArgument = 0x80bd_0000, "The defined timestamp to return was invalid.";
    BadNodeIdInvalid = 0x8033_0000, "The syntax the node id is not valid.";
    BadNodeIdUnknown = 0x8034_0000, "The node id refers to a node that does not exist in the server address space.";
    BadTooManySubscriptions = 0x8077_0000, "The server has reached its maximum number of subscriptions.";
    BadTooManyPublishRequests = 0x8078_0000, "The server has reached the maximum number of queued publish requests.";
    BadNoSubscription = 0x8079_0000, "There is no subscription available for this session.";
    BadSequenceNumberUnknown = 0x807a_0000, "The sequence number is unknown to the server.";
    BadTcpMessageTypeInvalid = 0x807e_0000, "The type of the message specified in the header invalid.";
    BadTcpSecureChannelUnknown = 0x807f_0000, "The SecureChannelId and/or TokenId are not currently in use.";
    BadTcpMessageTooLarge = 0x8080_0000, "The size of the message chunk specified in the header is too large.";
    BadTcpInternalError = 0x8082_0000, "An internal error occurred.";
    BadTcpEndpointUrlInvalid = 0x8083_0000, "The server does not recognize the QueryString specified.";
    BadSecureChannelClosed = 0x8086_0000, "The secure channel has been closed.";
    BadSecureChannelTokenUnknown = 0x8087_0000, "The token has expired or is not recognized.";
    BadSequenceNumberInvalid = 0x8088_0000, "The sequence number is not valid.";
    BadConfigurationError = 0x8089_0000, "There is a problem with the configuration that affects the usefulness of the value.";
    BadNotConnected = 0x808a_0000, "The variable should receive its value from another variable, but has never been configured to do so.";
    BadRequestTooLarge = 0x80b8_0000, "The request message size exceeds limits set by the server.";
    BadResponseTooLarge = 0x80b9_0000, "The response message size exceeds limits set by the client.";
    BadInvalidArgument = 0x80ab_0000, "One or more arguments are invalid.";
    BadConnectionRejected = 0x80ac_0000, "Could not establish a network connection to remote server.";
    BadDisconnect = 0x80ad_0000, "The server has disconnected from the client.";
    BadConnectionClosed = 0x80ae_0000, "The network connection has been closed.";
    BadInvalidState = 0x80af_0000, "The operation cannot be completed because the object is closed, uninitialized or in some other invalid state.";
    BadEndOfStream = 0x80b0_0000, "Cannot move beyond end of the stream.";
}

impl StatusCode {
    /// Returns `true` if the severity of the code is good.
    pub fn is_good(&self) -> bool {
        self.0 & 0xc000_0000 == 0
    }

    /// Returns `true` if the severity of the code is bad.
    pub fn is_bad(&self) -> bool {
        self.0 & 0x8000_0000 != 0
    }

    /// Returns `true` if the severity of the code is uncertain.
    pub fn is_uncertain(&self) -> bool {
        self.0 & 0xc000_0000 == 0x4000_0000
    }

    /// Create a status code from the raw numeric value.
    pub fn from_bits(bits: u32) -> Self {
        StatusCode(bits)
    }

    /// The raw numeric value of the status code.
    pub fn bits(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        if name != "Unknown" {
            write!(f, "{}", name)
        } else {
            write!(f, "StatusCode({:#010x})", self.0)
        }
    }
}

impl std::error::Error for StatusCode {}

impl BinaryEncodable for StatusCode {
    fn byte_len(&self) -> usize {
        4
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        write_u32(stream, self.0)
    }
}

impl BinaryDecodable for StatusCode {
    fn decode<S: Read + ?Sized>(stream: &mut S, _: &DecodingOptions) -> EncodingResult<Self> {
        Ok(StatusCode(read_u32(stream)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity() {
        assert!(StatusCode::Good.is_good());
        assert!(!StatusCode::Good.is_bad());
        assert!(StatusCode::BadTimeout.is_bad());
        assert!(!StatusCode::BadTimeout.is_good());
    }

    #[test]
    fn names() {
        assert_eq!(StatusCode::BadSecureChannelClosed.name(), "BadSecureChannelClosed");
        assert_eq!(StatusCode::from_bits(0x8086_0001).name(), "BadSecureChannelClosed");
        assert_eq!(StatusCode::from_bits(0x8fff_0000).name(), "Unknown");
    }
}
