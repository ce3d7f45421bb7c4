//! Attribute service set shims.

use opcua_types::{ReadRequest, WriteRequest};

use super::service_shim;

service_shim!(
    /// Read attributes of nodes by sending a [`ReadRequest`] to the server.
    ///
    /// See OPC UA Part 4 - Services 5.10.2 for a complete description of the service.
    read, read_async, ReadRequest
);

service_shim!(
    /// Write attributes of nodes by sending a [`WriteRequest`] to the server.
    ///
    /// See OPC UA Part 4 - Services 5.10.4 for a complete description of the service.
    write, write_async, WriteRequest
);
