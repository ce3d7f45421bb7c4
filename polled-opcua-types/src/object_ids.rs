// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Numeric identifiers for the default binary encodings of the service types
//! supported by this stack, from the standard OPC UA namespace.

macro_rules! object_ids {
    ($($name:ident = $value:literal),* $(,)?) => {
        /// Standard object ids for the default binary encodings of supported types.
        #[allow(non_camel_case_types)]
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        #[repr(u32)]
        pub enum ObjectId {
            $(
                #[allow(missing_docs)]
                $name = $value,
            )*
        }

        impl TryFrom<u32> for ObjectId {
            type Error = ();

            fn try_from(value: u32) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(ObjectId::$name), )*
                    _ => Err(()),
                }
            }
        }
    };
}

object_ids! {
    AnonymousIdentityToken_Encoding_DefaultBinary = 321,
    UserNameIdentityToken_Encoding_DefaultBinary = 324,
    ServiceFault_Encoding_DefaultBinary = 397,
    FindServersRequest_Encoding_DefaultBinary = 422,
    FindServersResponse_Encoding_DefaultBinary = 425,
    GetEndpointsRequest_Encoding_DefaultBinary = 428,
    GetEndpointsResponse_Encoding_DefaultBinary = 431,
    OpenSecureChannelRequest_Encoding_DefaultBinary = 446,
    OpenSecureChannelResponse_Encoding_DefaultBinary = 449,
    CloseSecureChannelRequest_Encoding_DefaultBinary = 452,
    CloseSecureChannelResponse_Encoding_DefaultBinary = 455,
    CreateSessionRequest_Encoding_DefaultBinary = 461,
    CreateSessionResponse_Encoding_DefaultBinary = 464,
    ActivateSessionRequest_Encoding_DefaultBinary = 467,
    ActivateSessionResponse_Encoding_DefaultBinary = 470,
    CloseSessionRequest_Encoding_DefaultBinary = 473,
    CloseSessionResponse_Encoding_DefaultBinary = 476,
    AddNodesRequest_Encoding_DefaultBinary = 488,
    AddNodesResponse_Encoding_DefaultBinary = 491,
    AddReferencesRequest_Encoding_DefaultBinary = 494,
    AddReferencesResponse_Encoding_DefaultBinary = 497,
    DeleteNodesRequest_Encoding_DefaultBinary = 500,
    DeleteNodesResponse_Encoding_DefaultBinary = 503,
    DeleteReferencesRequest_Encoding_DefaultBinary = 506,
    DeleteReferencesResponse_Encoding_DefaultBinary = 509,
    BrowseRequest_Encoding_DefaultBinary = 527,
    BrowseResponse_Encoding_DefaultBinary = 530,
    BrowseNextRequest_Encoding_DefaultBinary = 533,
    BrowseNextResponse_Encoding_DefaultBinary = 536,
    TranslateBrowsePathsToNodeIdsRequest_Encoding_DefaultBinary = 554,
    TranslateBrowsePathsToNodeIdsResponse_Encoding_DefaultBinary = 557,
    RegisterNodesRequest_Encoding_DefaultBinary = 560,
    RegisterNodesResponse_Encoding_DefaultBinary = 563,
    UnregisterNodesRequest_Encoding_DefaultBinary = 566,
    UnregisterNodesResponse_Encoding_DefaultBinary = 569,
    QueryFirstRequest_Encoding_DefaultBinary = 615,
    QueryFirstResponse_Encoding_DefaultBinary = 618,
    QueryNextRequest_Encoding_DefaultBinary = 621,
    QueryNextResponse_Encoding_DefaultBinary = 624,
    ReadRequest_Encoding_DefaultBinary = 631,
    ReadResponse_Encoding_DefaultBinary = 634,
    WriteRequest_Encoding_DefaultBinary = 673,
    WriteResponse_Encoding_DefaultBinary = 676,
    CallRequest_Encoding_DefaultBinary = 712,
    CallResponse_Encoding_DefaultBinary = 715,
    CreateMonitoredItemsRequest_Encoding_DefaultBinary = 751,
    CreateMonitoredItemsResponse_Encoding_DefaultBinary = 754,
    ModifyMonitoredItemsRequest_Encoding_DefaultBinary = 763,
    ModifyMonitoredItemsResponse_Encoding_DefaultBinary = 766,
    SetMonitoringModeRequest_Encoding_DefaultBinary = 769,
    SetMonitoringModeResponse_Encoding_DefaultBinary = 772,
    SetTriggeringRequest_Encoding_DefaultBinary = 775,
    SetTriggeringResponse_Encoding_DefaultBinary = 778,
    DeleteMonitoredItemsRequest_Encoding_DefaultBinary = 781,
    DeleteMonitoredItemsResponse_Encoding_DefaultBinary = 784,
    CreateSubscriptionRequest_Encoding_DefaultBinary = 787,
    CreateSubscriptionResponse_Encoding_DefaultBinary = 790,
    ModifySubscriptionRequest_Encoding_DefaultBinary = 793,
    ModifySubscriptionResponse_Encoding_DefaultBinary = 796,
    SetPublishingModeRequest_Encoding_DefaultBinary = 799,
    SetPublishingModeResponse_Encoding_DefaultBinary = 802,
    DataChangeNotification_Encoding_DefaultBinary = 811,
    StatusChangeNotification_Encoding_DefaultBinary = 820,
    PublishRequest_Encoding_DefaultBinary = 826,
    PublishResponse_Encoding_DefaultBinary = 829,
    RepublishRequest_Encoding_DefaultBinary = 832,
    RepublishResponse_Encoding_DefaultBinary = 835,
    TransferSubscriptionsRequest_Encoding_DefaultBinary = 841,
    TransferSubscriptionsResponse_Encoding_DefaultBinary = 844,
    DeleteSubscriptionsRequest_Encoding_DefaultBinary = 847,
    DeleteSubscriptionsResponse_Encoding_DefaultBinary = 850,
    EventNotificationList_Encoding_DefaultBinary = 916,
    FindServersOnNetworkRequest_Encoding_DefaultBinary = 12208,
    FindServersOnNetworkResponse_Encoding_DefaultBinary = 12209,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_id_conversion() {
        assert_eq!(
            ObjectId::try_from(631),
            Ok(ObjectId::ReadRequest_Encoding_DefaultBinary)
        );
        assert!(ObjectId::try_from(1).is_err());
    }
}
