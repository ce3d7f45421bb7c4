//! View service set shims.

use opcua_types::{
    BrowseNextRequest, BrowseRequest, RegisterNodesRequest,
    TranslateBrowsePathsToNodeIdsRequest, UnregisterNodesRequest,
};

use super::service_shim;

service_shim!(
    /// Discover the references of nodes by sending a [`BrowseRequest`] to the server.
    ///
    /// See OPC UA Part 4 - Services 5.8.2 for a complete description of the service.
    browse, browse_async, BrowseRequest
);

service_shim!(
    /// Continue a browse from its continuation points by sending a [`BrowseNextRequest`].
    ///
    /// See OPC UA Part 4 - Services 5.8.3 for a complete description of the service.
    browse_next, browse_next_async, BrowseNextRequest
);

service_shim!(
    /// Resolve browse paths to node ids by sending a
    /// [`TranslateBrowsePathsToNodeIdsRequest`] to the server.
    ///
    /// See OPC UA Part 4 - Services 5.8.4 for a complete description of the service.
    translate_browse_paths_to_node_ids,
    translate_browse_paths_to_node_ids_async,
    TranslateBrowsePathsToNodeIdsRequest
);

service_shim!(
    /// Register node ids for optimized access by sending a [`RegisterNodesRequest`].
    ///
    /// See OPC UA Part 4 - Services 5.8.5 for a complete description of the service.
    register_nodes, register_nodes_async, RegisterNodesRequest
);

service_shim!(
    /// Release registered node ids by sending an [`UnregisterNodesRequest`].
    ///
    /// See OPC UA Part 4 - Services 5.8.6 for a complete description of the service.
    unregister_nodes, unregister_nodes_async, UnregisterNodesRequest
);
