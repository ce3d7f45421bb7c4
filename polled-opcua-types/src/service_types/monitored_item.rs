// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! MonitoredItem service set.

use opcua_macros::{BinaryDecodable, BinaryEncodable};

use crate::{
    diagnostics::DiagnosticInfo, extension_object::ExtensionObject, message_info,
    request_header::RequestHeader, response_header::ResponseHeader, service_pair,
    service_types::attribute::{ReadValueId, TimestampsToReturn},
    status_code::StatusCode, ua_enum,
};

#[allow(unused)]
mod opcua {
    pub use crate as types;
}

ua_enum! {
    /// The monitoring mode of a monitored item.
    pub enum MonitoringMode: u32 {
        /// Sampling is disabled.
        Disabled = 0,
        /// The item is sampled but notifications are not reported.
        Sampling = 1,
        /// The item is sampled and notifications are reported.
        Reporting = 2,
    }
}

/// Parameters controlling how a monitored item is sampled and queued.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct MonitoringParameters {
    /// Client supplied handle echoed in notifications for the item.
    pub client_handle: u32,
    /// The sampling interval in milliseconds, -1 for the publishing interval.
    pub sampling_interval: f64,
    /// The filter applied to sampled values, one of the monitoring filter structures.
    pub filter: ExtensionObject,
    /// The number of values queued on the server for the item.
    pub queue_size: u32,
    /// Whether the oldest value is discarded when the queue overflows.
    pub discard_oldest: bool,
}

impl Default for MonitoringParameters {
    fn default() -> Self {
        MonitoringParameters {
            client_handle: 0,
            sampling_interval: -1.0,
            filter: ExtensionObject::null(),
            queue_size: 1,
            discard_oldest: true,
        }
    }
}

/// A monitored item to create.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct MonitoredItemCreateRequest {
    /// The attribute to monitor.
    pub item_to_monitor: ReadValueId,
    /// The initial monitoring mode.
    pub monitoring_mode: MonitoringMode,
    /// The requested monitoring parameters.
    pub requested_parameters: MonitoringParameters,
}

/// The result of creating a single monitored item.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct MonitoredItemCreateResult {
    /// The status of the operation.
    pub status_code: StatusCode,
    /// The server assigned id of the monitored item.
    pub monitored_item_id: u32,
    /// The sampling interval granted by the server.
    pub revised_sampling_interval: f64,
    /// The queue size granted by the server.
    pub revised_queue_size: u32,
    /// The result of applying the requested filter.
    pub filter_result: ExtensionObject,
}

/// Creates monitored items on a subscription.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct CreateMonitoredItemsRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The subscription to create the items on.
    pub subscription_id: u32,
    /// The timestamps to return in notifications.
    pub timestamps_to_return: TimestampsToReturn,
    /// The items to create.
    pub items_to_create: Option<Vec<MonitoredItemCreateRequest>>,
}

/// Response to a [`CreateMonitoredItemsRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct CreateMonitoredItemsResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The per-item results, in the order they were requested.
    pub results: Option<Vec<MonitoredItemCreateResult>>,
    /// Diagnostics per operation, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// A monitored item to modify.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct MonitoredItemModifyRequest {
    /// The item to modify.
    pub monitored_item_id: u32,
    /// The requested monitoring parameters.
    pub requested_parameters: MonitoringParameters,
}

/// The result of modifying a single monitored item.
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct MonitoredItemModifyResult {
    /// The status of the operation.
    pub status_code: StatusCode,
    /// The sampling interval granted by the server.
    pub revised_sampling_interval: f64,
    /// The queue size granted by the server.
    pub revised_queue_size: u32,
    /// The result of applying the requested filter.
    pub filter_result: ExtensionObject,
}

/// Modifies monitored items on a subscription.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct ModifyMonitoredItemsRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The subscription holding the items.
    pub subscription_id: u32,
    /// The timestamps to return in notifications.
    pub timestamps_to_return: TimestampsToReturn,
    /// The items to modify.
    pub items_to_modify: Option<Vec<MonitoredItemModifyRequest>>,
}

/// Response to a [`ModifyMonitoredItemsRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct ModifyMonitoredItemsResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The per-item results, in the order they were requested.
    pub results: Option<Vec<MonitoredItemModifyResult>>,
    /// Diagnostics per operation, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// Deletes monitored items from a subscription.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct DeleteMonitoredItemsRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The subscription holding the items.
    pub subscription_id: u32,
    /// The ids of the items to delete.
    pub monitored_item_ids: Option<Vec<u32>>,
}

/// Response to a [`DeleteMonitoredItemsRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct DeleteMonitoredItemsResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The per-item results, in the order they were requested.
    pub results: Option<Vec<StatusCode>>,
    /// Diagnostics per operation, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// Changes the monitoring mode of monitored items.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct SetMonitoringModeRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The subscription holding the items.
    pub subscription_id: u32,
    /// The monitoring mode to apply.
    pub monitoring_mode: MonitoringMode,
    /// The ids of the items to change.
    pub monitored_item_ids: Option<Vec<u32>>,
}

/// Response to a [`SetMonitoringModeRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct SetMonitoringModeResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// The per-item results, in the order they were requested.
    pub results: Option<Vec<StatusCode>>,
    /// Diagnostics per operation, when requested.
    pub diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

/// Creates and deletes triggering links between monitored items.
#[derive(Debug, Clone, PartialEq, BinaryEncodable, BinaryDecodable)]
pub struct SetTriggeringRequest {
    /// Common request header.
    pub request_header: RequestHeader,
    /// The subscription holding the items.
    pub subscription_id: u32,
    /// The item whose value changes trigger reports of the linked items.
    pub triggering_item_id: u32,
    /// Items to link to the triggering item.
    pub links_to_add: Option<Vec<u32>>,
    /// Items to unlink from the triggering item.
    pub links_to_remove: Option<Vec<u32>>,
}

/// Response to a [`SetTriggeringRequest`].
#[derive(Debug, Clone, PartialEq, Default, BinaryEncodable, BinaryDecodable)]
pub struct SetTriggeringResponse {
    /// Common response header.
    pub response_header: ResponseHeader,
    /// Results for the added links.
    pub add_results: Option<Vec<StatusCode>>,
    /// Diagnostics for the added links, when requested.
    pub add_diagnostic_infos: Option<Vec<DiagnosticInfo>>,
    /// Results for the removed links.
    pub remove_results: Option<Vec<StatusCode>>,
    /// Diagnostics for the removed links, when requested.
    pub remove_diagnostic_infos: Option<Vec<DiagnosticInfo>>,
}

message_info!(
    CreateMonitoredItemsRequest,
    CreateMonitoredItemsRequest_Encoding_DefaultBinary
);
message_info!(
    CreateMonitoredItemsResponse,
    CreateMonitoredItemsResponse_Encoding_DefaultBinary
);
message_info!(
    ModifyMonitoredItemsRequest,
    ModifyMonitoredItemsRequest_Encoding_DefaultBinary
);
message_info!(
    ModifyMonitoredItemsResponse,
    ModifyMonitoredItemsResponse_Encoding_DefaultBinary
);
message_info!(
    DeleteMonitoredItemsRequest,
    DeleteMonitoredItemsRequest_Encoding_DefaultBinary
);
message_info!(
    DeleteMonitoredItemsResponse,
    DeleteMonitoredItemsResponse_Encoding_DefaultBinary
);
message_info!(
    SetMonitoringModeRequest,
    SetMonitoringModeRequest_Encoding_DefaultBinary
);
message_info!(
    SetMonitoringModeResponse,
    SetMonitoringModeResponse_Encoding_DefaultBinary
);
message_info!(SetTriggeringRequest, SetTriggeringRequest_Encoding_DefaultBinary);
message_info!(SetTriggeringResponse, SetTriggeringResponse_Encoding_DefaultBinary);

service_pair!(CreateMonitoredItemsRequest, CreateMonitoredItemsResponse);
service_pair!(ModifyMonitoredItemsRequest, ModifyMonitoredItemsResponse);
service_pair!(DeleteMonitoredItemsRequest, DeleteMonitoredItemsResponse);
service_pair!(SetMonitoringModeRequest, SetMonitoringModeResponse);
service_pair!(SetTriggeringRequest, SetTriggeringResponse);
