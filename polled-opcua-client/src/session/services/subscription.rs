//! Subscription service set shims. Publish is not exposed here, the client
//! keeps publish requests outstanding itself; see the subscription pump.

use opcua_types::{
    CreateSubscriptionRequest, DeleteSubscriptionsRequest, ModifySubscriptionRequest,
    RepublishRequest, SetPublishingModeRequest, TransferSubscriptionsRequest,
};

use super::service_shim;

service_shim!(
    /// Create a subscription by sending a [`CreateSubscriptionRequest`] to the server.
    ///
    /// See OPC UA Part 4 - Services 5.13.2 for a complete description of the service.
    create_subscription, create_subscription_async, CreateSubscriptionRequest
);

service_shim!(
    /// Modify a subscription by sending a [`ModifySubscriptionRequest`] to the server.
    ///
    /// See OPC UA Part 4 - Services 5.13.3 for a complete description of the service.
    modify_subscription, modify_subscription_async, ModifySubscriptionRequest
);

service_shim!(
    /// Enable or disable publishing by sending a [`SetPublishingModeRequest`] to the server.
    ///
    /// See OPC UA Part 4 - Services 5.13.4 for a complete description of the service.
    set_publishing_mode, set_publishing_mode_async, SetPublishingModeRequest
);

service_shim!(
    /// Ask the server to resend a notification message by sending a [`RepublishRequest`].
    ///
    /// See OPC UA Part 4 - Services 5.13.6 for a complete description of the service.
    republish, republish_async, RepublishRequest
);

service_shim!(
    /// Transfer subscriptions from another session by sending a
    /// [`TransferSubscriptionsRequest`] to the server.
    ///
    /// See OPC UA Part 4 - Services 5.13.7 for a complete description of the service.
    transfer_subscriptions, transfer_subscriptions_async, TransferSubscriptionsRequest
);

service_shim!(
    /// Delete subscriptions by sending a [`DeleteSubscriptionsRequest`] to the server.
    ///
    /// See OPC UA Part 4 - Services 5.13.8 for a complete description of the service.
    delete_subscriptions, delete_subscriptions_async, DeleteSubscriptionsRequest
);
