//! Query service set shims.

use opcua_types::{QueryFirstRequest, QueryNextRequest};

use super::service_shim;

service_shim!(
    /// Issue a query against the address space by sending a [`QueryFirstRequest`].
    ///
    /// See OPC UA Part 4 - Services 5.9.3 for a complete description of the service.
    query_first, query_first_async, QueryFirstRequest
);

service_shim!(
    /// Continue a query from its continuation point by sending a [`QueryNextRequest`].
    ///
    /// See OPC UA Part 4 - Services 5.9.4 for a complete description of the service.
    query_next, query_next_async, QueryNextRequest
);
