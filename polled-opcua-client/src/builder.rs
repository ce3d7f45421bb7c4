//! Client builder.

use std::time::Duration;

use crate::{
    config::ClientConfig,
    transport::{Connector, TransportLimits},
    Client,
};

/// Builder for [`Client`]. All values have reasonable defaults, the shortest
/// meaningful use is `ClientBuilder::new().client()`.
pub struct ClientBuilder {
    config: ClientConfig,
    connector: Option<Box<dyn Connector>>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> ClientBuilder {
        ClientBuilder {
            config: ClientConfig::default(),
            connector: None,
        }
    }

    /// Creates a builder from a supplied configuration, e.g. one loaded from a
    /// config file.
    pub fn from_config(config: ClientConfig) -> ClientBuilder {
        ClientBuilder {
            config,
            connector: None,
        }
    }

    /// Yields a client from the values set by the builder.
    pub fn client(self) -> Client {
        match self.connector {
            Some(connector) => Client::new_with_connector(self.config, connector),
            None => Client::new(self.config),
        }
    }

    /// Yields the configuration built so far.
    pub fn config(self) -> ClientConfig {
        self.config
    }

    /// Sets the application name.
    pub fn application_name(mut self, application_name: impl Into<String>) -> Self {
        self.config.application_name = application_name.into();
        self
    }

    /// Sets the application uri.
    pub fn application_uri(mut self, application_uri: impl Into<String>) -> Self {
        self.config.application_uri = application_uri.into();
        self
    }

    /// Sets the product uri.
    pub fn product_uri(mut self, product_uri: impl Into<String>) -> Self {
        self.config.product_uri = product_uri.into();
        self
    }

    /// Sets the name assigned to sessions created by the client.
    pub fn session_name(mut self, session_name: impl Into<String>) -> Self {
        self.config.session_name = session_name.into();
        self
    }

    /// Sets the requested session timeout in milliseconds.
    pub fn session_timeout(mut self, session_timeout_ms: f64) -> Self {
        self.config.session_timeout_ms = session_timeout_ms;
        self
    }

    /// Sets the deadline for synchronous service calls, which is also the
    /// default deadline for asynchronous ones.
    pub fn sync_timeout(mut self, sync_timeout: Duration) -> Self {
        self.config.sync_timeout = sync_timeout;
        self
    }

    /// Sets the requested secure channel token lifetime in milliseconds.
    pub fn channel_lifetime(mut self, channel_lifetime: u32) -> Self {
        self.config.channel_lifetime = channel_lifetime;
        self
    }

    /// Sets the transport limits proposed in the hello handshake.
    pub fn transport_limits(mut self, transport_limits: TransportLimits) -> Self {
        self.config.transport_limits = transport_limits;
        self
    }

    /// Sets the number of publish requests kept outstanding while a session is
    /// active. 0 disables the publish pump, valid values are 1..=255.
    pub fn outstanding_publish_requests(mut self, count: u16) -> Self {
        self.config.outstanding_publish_requests = count;
        self
    }

    /// Sets the bound on requests awaiting a response at once. 0 means no limit.
    pub fn max_inflight_messages(mut self, max_inflight_messages: usize) -> Self {
        self.config.max_inflight_messages = max_inflight_messages;
        self
    }

    /// Sets the locales the client prefers, in priority order.
    pub fn preferred_locales(mut self, preferred_locales: Vec<String>) -> Self {
        self.config.preferred_locales = preferred_locales;
        self
    }

    /// Replaces the default TCP connection factory.
    pub fn connector(mut self, connector: Box<dyn Connector>) -> Self {
        self.connector = Some(connector);
        self
    }
}
