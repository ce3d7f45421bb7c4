//! NodeManagement service set shims.

use opcua_types::{
    AddNodesRequest, AddReferencesRequest, DeleteNodesRequest, DeleteReferencesRequest,
};

use super::service_shim;

service_shim!(
    /// Add nodes to the address space by sending an [`AddNodesRequest`] to the server.
    ///
    /// See OPC UA Part 4 - Services 5.7.2 for a complete description of the service.
    add_nodes, add_nodes_async, AddNodesRequest
);

service_shim!(
    /// Add references between nodes by sending an [`AddReferencesRequest`] to the server.
    ///
    /// See OPC UA Part 4 - Services 5.7.3 for a complete description of the service.
    add_references, add_references_async, AddReferencesRequest
);

service_shim!(
    /// Delete nodes from the address space by sending a [`DeleteNodesRequest`] to the server.
    ///
    /// See OPC UA Part 4 - Services 5.7.4 for a complete description of the service.
    delete_nodes, delete_nodes_async, DeleteNodesRequest
);

service_shim!(
    /// Delete references between nodes by sending a [`DeleteReferencesRequest`] to the server.
    ///
    /// See OPC UA Part 4 - Services 5.7.5 for a complete description of the service.
    delete_references, delete_references_async, DeleteReferencesRequest
);
