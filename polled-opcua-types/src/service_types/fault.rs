// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! The generic service fault response.

use opcua_macros::{BinaryDecodable, BinaryEncodable};

use crate::{message_info, response_header::ResponseHeader, status_code::StatusCode};

#[allow(unused)]
mod opcua {
    pub use crate as types;
}

/// The response a server sends when it cannot process a request at all. The reason is
/// carried in the response header's service result.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct ServiceFault {
    /// Common response header.
    pub response_header: ResponseHeader,
}

message_info!(ServiceFault, ServiceFault_Encoding_DefaultBinary);

impl ServiceFault {
    /// Create a service fault for the given request handle and status.
    pub fn new(request_handle: u32, service_result: StatusCode) -> ServiceFault {
        ServiceFault {
            response_header: ResponseHeader::new_service_result(request_handle, service_result),
        }
    }
}
