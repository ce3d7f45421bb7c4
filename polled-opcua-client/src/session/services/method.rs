//! Method service set shims.

use opcua_types::CallRequest;

use super::service_shim;

service_shim!(
    /// Invoke methods by sending a [`CallRequest`] to the server.
    ///
    /// See OPC UA Part 4 - Services 5.11.2 for a complete description of the service.
    call, call_async, CallRequest
);
