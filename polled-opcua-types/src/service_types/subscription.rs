// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Subscription service set, including the Publish service and the
//! notification structures carried by publish responses.

use opcua_macros::{BinaryDecodable, BinaryEncodable};

use crate::{
    data_types::UtcTime, data_value::DataValue, diagnostics::DiagnosticInfo,
    extension_object::ExtensionObject, message_info, request_header::RequestHeader,
    response_header::ResponseHeader, service_pair, status_code::StatusCode,
};

#[allow(unused)]
mod opcua {
    pub use crate as types;
}

/// Creates a subscription on the server.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct CreateSubscriptionRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The cyclic rate notifications are returned at, in milliseconds.
    pub requested_publishing_interval: f64,
    /// Number of publishing intervals without a publish request before the
    /// server deletes the subscription. At least three times the keep alive count.
    pub requested_lifetime_count: u32,
    /// Number of publishing intervals without notifications before the server
    /// sends an empty keep-alive message.
    pub requested_max_keep_alive_count: u32,
    /// Maximum notifications per publish response, 0 for no limit.
    pub max_notifications_per_publish: u32,
    /// Whether publishing is enabled for the subscription.
    pub publishing_enabled: bool,
    /// Relative priority of the subscription on the server.
    pub priority: u8,
}

/// Response to a [`CreateSubscriptionRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct CreateSubscriptionResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The server assigned id of the subscription.
    pub subscription_id: u32,
    /// The publishing interval granted by the server.
    pub revised_publishing_interval: f64,
    /// The lifetime count granted by the server.
    pub revised_lifetime_count: u32,
    /// The keep alive count granted by the server.
    pub revised_max_keep_alive_count: u32,
}

/// Modifies an existing subscription.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct ModifySubscriptionRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The subscription to modify.
    pub subscription_id: u32,
    /// The requested publishing interval in milliseconds.
    pub requested_publishing_interval: f64,
    /// The requested lifetime count.
    pub requested_lifetime_count: u32,
    /// The requested keep alive count.
    pub requested_max_keep_alive_count: u32,
    /// Maximum notifications per publish response, 0 for no limit.
    pub max_notifications_per_publish: u32,
    /// Relative priority of the subscription on the server.
    pub priority: u8,
}

/// Response to a [`ModifySubscriptionRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct ModifySubscriptionResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The publishing interval granted by the server.
    pub revised_publishing_interval: f64,
    /// The lifetime count granted by the server.
    pub revised_lifetime_count: u32,
    /// The keep alive count granted by the server.
    pub revised_max_keep_alive_count: u32,
}

/// Enables or disables publishing for one or more subscriptions.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct SetPublishingModeRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The publishing mode to apply.
    pub publishing_enabled: bool,
    /// The subscriptions to apply it to.
    pub subscription_ids: Option<Vec<u32>>,
}

/// Response to a [`SetPublishingModeRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct SetPublishingModeResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The per-subscription results.
    pub results: Option<Vec<StatusCode>>,
    /// Diagnostics per operation, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// Deletes one or more subscriptions.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct DeleteSubscriptionsRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The subscriptions to delete.
    pub subscription_ids: Option<Vec<u32>>,
}

/// Response to a [`DeleteSubscriptionsRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct DeleteSubscriptionsResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The per-subscription results.
    pub results: Option<Vec<StatusCode>>,
    /// Diagnostics per operation, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// The result of transferring a single subscription.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct TransferResult {
    /// The status of the transfer.
    pub status_code: StatusCode,
    /// The sequence numbers available for republishing on the subscription.
    pub available_sequence_numbers: Option<Vec<u32>>,
}

/// Transfers subscriptions from another session to this one.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct TransferSubscriptionsRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The subscriptions to transfer.
    pub subscription_ids: Option<Vec<u32>>,
    /// Whether the first publish response resends the latest values.
    pub send_initial_values: bool,
}

/// Response to a [`TransferSubscriptionsRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct TransferSubscriptionsResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The per-subscription results.
    pub results: Option<Vec<TransferResult>>,
    /// Diagnostics per operation, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// Acknowledges receipt of a notification message on a subscription.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct SubscriptionAcknowledgement {
    /// The subscription the notification was received on.
    pub subscription_id: u32,
    /// The sequence number of the received notification message.
    pub sequence_number: u32,
}

/// A notification message delivered in a publish response.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct NotificationMessage {
    /// The sequence number of the message within the subscription.
    pub sequence_number: u32,
    /// The time the message was sent.
    pub publish_time: UtcTime,
    /// The notifications, each one of the notification structures. Empty for a
    /// keep-alive message.
    pub notification_data: Option<Vec<ExtensionObject>>,
}

impl NotificationMessage {
    /// A publish response with no notification data is a keep-alive.
    pub fn is_keep_alive(&self) -> bool {
        self.notification_data
            .as_ref()
            .map(|d| d.is_empty())
            .unwrap_or(true)
    }
}

/// Asks the server to return a notification message on any of the session's
/// subscriptions, acknowledging previously received messages.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct PublishRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// Acknowledgements for previously received notification messages.
    pub subscription_acknowledgements: Option<Vec<SubscriptionAcknowledgement>>,
}

/// Response to a [`PublishRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct PublishResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The subscription the notification message belongs to.
    pub subscription_id: u32,
    /// The sequence numbers available for republishing on the subscription.
    pub available_sequence_numbers: Option<Vec<u32>>,
    /// Whether more notifications are queued on the subscription.
    pub more_notifications: bool,
    /// The notification message itself.
    pub notification_message: NotificationMessage,
    /// Results for the acknowledgements in the request.
    pub results: Option<Vec<StatusCode>>,
    /// Diagnostics per acknowledgement, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// Asks the server to resend a notification message.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct RepublishRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The subscription to republish from.
    pub subscription_id: u32,
    /// The sequence number of the message to resend.
    pub retransmit_sequence_number: u32,
}

/// Response to a [`RepublishRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct RepublishResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The requested notification message.
    pub notification_message: NotificationMessage,
}

/// A monitored item value carried in a data change notification.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct MonitoredItemNotification {
    /// The client handle of the monitored item.
    pub client_handle: u32,
    /// The changed value.
    pub value: DataValue,
}

/// Notification carrying changed values of monitored items.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct DataChangeNotification {
    /// The changed values.
    pub monitored_items: Option<Vec<MonitoredItemNotification>>,
    /// Diagnostics per monitored item, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// Notification that the status of the subscription changed.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct StatusChangeNotification {
    /// The new status of the subscription.
    pub status: StatusCode,
    /// Diagnostics for the status, when requested.
    pub diagnostic_info: DiagnosticInfo,
}

message_info!(
    CreateSubscriptionRequest,
    CreateSubscriptionRequest_Encoding_DefaultBinary
);
message_info!(
    CreateSubscriptionResponse,
    CreateSubscriptionResponse_Encoding_DefaultBinary
);
message_info!(
    ModifySubscriptionRequest,
    ModifySubscriptionRequest_Encoding_DefaultBinary
);
message_info!(
    ModifySubscriptionResponse,
    ModifySubscriptionResponse_Encoding_DefaultBinary
);
message_info!(
    SetPublishingModeRequest,
    SetPublishingModeRequest_Encoding_DefaultBinary
);
message_info!(
    SetPublishingModeResponse,
    SetPublishingModeResponse_Encoding_DefaultBinary
);
message_info!(
    DeleteSubscriptionsRequest,
    DeleteSubscriptionsRequest_Encoding_DefaultBinary
);
message_info!(
    DeleteSubscriptionsResponse,
    DeleteSubscriptionsResponse_Encoding_DefaultBinary
);
message_info!(
    TransferSubscriptionsRequest,
    TransferSubscriptionsRequest_Encoding_DefaultBinary
);
message_info!(
    TransferSubscriptionsResponse,
    TransferSubscriptionsResponse_Encoding_DefaultBinary
);
message_info!(PublishRequest, PublishRequest_Encoding_DefaultBinary);
message_info!(PublishResponse, PublishResponse_Encoding_DefaultBinary);
message_info!(RepublishRequest, RepublishRequest_Encoding_DefaultBinary);
message_info!(RepublishResponse, RepublishResponse_Encoding_DefaultBinary);
message_info!(
    DataChangeNotification,
    DataChangeNotification_Encoding_DefaultBinary
);
message_info!(
    StatusChangeNotification,
    StatusChangeNotification_Encoding_DefaultBinary
);

service_pair!(CreateSubscriptionRequest, CreateSubscriptionResponse);
service_pair!(ModifySubscriptionRequest, ModifySubscriptionResponse);
service_pair!(SetPublishingModeRequest, SetPublishingModeResponse);
service_pair!(DeleteSubscriptionsRequest, DeleteSubscriptionsResponse);
service_pair!(TransferSubscriptionsRequest, TransferSubscriptionsResponse);
service_pair!(PublishRequest, PublishResponse);
service_pair!(RepublishRequest, RepublishResponse);
