//! MonitoredItem service set shims.

use opcua_types::{
    CreateMonitoredItemsRequest, DeleteMonitoredItemsRequest, ModifyMonitoredItemsRequest,
    SetMonitoringModeRequest, SetTriggeringRequest,
};

use super::service_shim;

service_shim!(
    /// Create monitored items on a subscription by sending a
    /// [`CreateMonitoredItemsRequest`] to the server.
    ///
    /// See OPC UA Part 4 - Services 5.12.2 for a complete description of the service.
    create_monitored_items, create_monitored_items_async, CreateMonitoredItemsRequest
);

service_shim!(
    /// Modify monitored items by sending a [`ModifyMonitoredItemsRequest`] to the server.
    ///
    /// See OPC UA Part 4 - Services 5.12.3 for a complete description of the service.
    modify_monitored_items, modify_monitored_items_async, ModifyMonitoredItemsRequest
);

service_shim!(
    /// Change the monitoring mode of items by sending a [`SetMonitoringModeRequest`].
    ///
    /// See OPC UA Part 4 - Services 5.12.4 for a complete description of the service.
    set_monitoring_mode, set_monitoring_mode_async, SetMonitoringModeRequest
);

service_shim!(
    /// Create or delete triggering links by sending a [`SetTriggeringRequest`].
    ///
    /// See OPC UA Part 4 - Services 5.12.5 for a complete description of the service.
    set_triggering, set_triggering_async, SetTriggeringRequest
);

service_shim!(
    /// Delete monitored items by sending a [`DeleteMonitoredItemsRequest`] to the server.
    ///
    /// See OPC UA Part 4 - Services 5.12.6 for a complete description of the service.
    delete_monitored_items, delete_monitored_items_async, DeleteMonitoredItemsRequest
);
