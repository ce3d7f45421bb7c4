// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

#![warn(missing_docs)]

//! The OPC UA Core module holds functionality that is common to chunked message
//! transport regardless of which side of the connection it is used on. It contains
//! message chunking, secure channel state, handshake messages and the request /
//! response message enumerations.

/// Contains common OPC-UA constants.
pub mod constants {
    /// Default OPC UA port number. Used by a discovery server. Other servers would normally run
    /// on a different port. It is implied by opc.tcp:// urls that carry no explicit port.
    pub const DEFAULT_OPC_UA_SERVER_PORT: u16 = 4840;
}

pub mod comms;
pub mod config;
pub mod handle;

pub mod messages;
pub use messages::{Message, MessageType, RequestMessage, ResponseMessage};
