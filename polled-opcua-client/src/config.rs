//! Client configuration data.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use opcua_core::config::Config;
use opcua_types::{ApplicationType, UAString};

use crate::transport::TransportLimits;

/// Default deadline for a synchronous service call.
pub const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(5);
/// Default requested secure channel token lifetime in milliseconds.
pub const DEFAULT_CHANNEL_LIFETIME: u32 = 600_000;
/// Deepest permitted nesting of synchronous calls issued from callbacks.
pub const DEFAULT_MAX_PUMP_DEPTH: u32 = 4;

/// Decoding limits applied to inbound messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodingLimits {
    /// Maximum byte length of a string. 0 means no limit.
    pub max_string_length: usize,
    /// Maximum byte length of a byte string. 0 means no limit.
    pub max_byte_string_length: usize,
    /// Maximum number of array elements. 0 means no limit.
    pub max_array_length: usize,
}

impl Default for DecodingLimits {
    fn default() -> Self {
        DecodingLimits {
            max_string_length: opcua_types::constants::MAX_STRING_LENGTH,
            max_byte_string_length: opcua_types::constants::MAX_BYTE_STRING_LENGTH,
            max_array_length: opcua_types::constants::MAX_ARRAY_LENGTH,
        }
    }
}

/// Client configuration. Immutable once the client is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Name of the client application.
    pub application_name: String,
    /// URI of the client application.
    pub application_uri: String,
    /// Product URI of the client application.
    pub product_uri: String,
    /// Name assigned to sessions created by this client.
    pub session_name: String,
    /// Requested session timeout in milliseconds.
    pub session_timeout_ms: f64,
    /// Deadline for a synchronous service call, and the default deadline for
    /// asynchronous calls.
    pub sync_timeout: Duration,
    /// Requested secure channel token lifetime in milliseconds. The channel is
    /// renewed once three quarters of it have elapsed.
    pub channel_lifetime: u32,
    /// Transport parameters proposed in the hello handshake.
    pub transport_limits: TransportLimits,
    /// Decoding limits applied to inbound messages.
    pub decoding_limits: DecodingLimits,
    /// Number of publish requests kept outstanding while a session is active.
    /// 0 disables the publish pump, valid values are 1..=255.
    pub outstanding_publish_requests: u16,
    /// Upper bound on requests awaiting a response at once. Dispatch beyond it
    /// fails with `BadTooManyOperations`. 0 means no limit.
    pub max_inflight_messages: usize,
    /// Deepest permitted nesting of synchronous calls issued from callbacks.
    pub max_pump_depth: u32,
    /// Locales the client prefers, in priority order.
    pub preferred_locales: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            application_name: "OPC UA client".to_string(),
            application_uri: "urn:OpcUaClient".to_string(),
            product_uri: "urn:OpcUaClient".to_string(),
            session_name: "Polled client session".to_string(),
            session_timeout_ms: 60_000.0,
            sync_timeout: DEFAULT_SYNC_TIMEOUT,
            channel_lifetime: DEFAULT_CHANNEL_LIFETIME,
            transport_limits: TransportLimits::default(),
            decoding_limits: DecodingLimits::default(),
            outstanding_publish_requests: 0,
            max_inflight_messages: 0,
            max_pump_depth: DEFAULT_MAX_PUMP_DEPTH,
            preferred_locales: Vec::new(),
        }
    }
}

impl Config for ClientConfig {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.application_name.is_empty() {
            errors.push("Application name is empty".to_string());
        }
        if self.application_uri.is_empty() {
            errors.push("Application uri is empty".to_string());
        }
        if self.outstanding_publish_requests > 255 {
            errors.push(format!(
                "Outstanding publish requests is {}, the valid range is 0..=255",
                self.outstanding_publish_requests
            ));
        }
        if self.sync_timeout.is_zero() {
            errors.push("Synchronous call timeout is zero".to_string());
        }
        if self.max_pump_depth == 0 {
            errors.push("Maximum pump depth must be at least 1".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn application_name(&self) -> UAString {
        UAString::from(&self.application_name)
    }

    fn application_uri(&self) -> UAString {
        UAString::from(&self.application_uri)
    }

    fn product_uri(&self) -> UAString {
        UAString::from(&self.product_uri)
    }

    fn application_type(&self) -> ApplicationType {
        ApplicationType::Client
    }
}

impl ClientConfig {
    /// The decoding options passed down to the channel.
    pub fn decoding_options(&self) -> opcua_types::DecodingOptions {
        opcua_types::DecodingOptions {
            max_message_size: self.transport_limits.max_message_size,
            max_chunk_count: self.transport_limits.max_chunk_count,
            max_string_length: self.decoding_limits.max_string_length,
            max_byte_string_length: self.decoding_limits.max_byte_string_length,
            max_array_length: self.decoding_limits.max_array_length,
            client_offset: chrono::Duration::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn publish_request_bound() {
        let config = ClientConfig {
            outstanding_publish_requests: 256,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn yaml_round_trip() {
        let config = ClientConfig {
            outstanding_publish_requests: 3,
            ..Default::default()
        };
        let path = std::env::temp_dir().join("polled-opcua-client-config-test.yaml");
        config.save(&path).unwrap();
        let loaded: ClientConfig = <ClientConfig as Config>::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
