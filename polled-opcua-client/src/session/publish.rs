//! The subscription pump. While a session is active it keeps a configured
//! number of publish requests outstanding so the server always has capacity to
//! deliver notifications promptly, echoing acknowledgements and adapting when
//! the server pushes back.

use std::time::Duration;

use log::{debug, warn};

use opcua_types::{
    PublishRequest, PublishResponse, StatusCode, SubscriptionAcknowledgement,
};

use super::{Client, ClientState};

/// How often the pump checks that the outstanding count is on target. Lost
/// requests are re-issued from here; the usual top-up happens directly from
/// publish responses.
const PUMP_INTERVAL: Duration = Duration::from_millis(500);

/// Book-keeping for the publish pump.
pub(crate) struct PublishPump {
    enabled: bool,
    /// How many publish requests to keep outstanding. Starts at the configured
    /// count and decays when the server returns `BadTooManyPublishRequests`,
    /// with a floor of one, for the rest of the session.
    target: u16,
    outstanding: u16,
    /// Set when the server returned `BadNoSubscription`; cleared when a
    /// subscription is created.
    parked: bool,
    /// Sequence numbers to acknowledge in the next publish request.
    acks: Vec<SubscriptionAcknowledgement>,
    timer: Option<u64>,
}

impl PublishPump {
    pub fn new() -> PublishPump {
        PublishPump {
            enabled: false,
            target: 0,
            outstanding: 0,
            parked: false,
            acks: Vec::new(),
            timer: None,
        }
    }

    /// The number of publish requests currently awaiting a response.
    pub fn outstanding(&self) -> u16 {
        self.outstanding
    }

    /// The current outstanding target.
    pub fn target(&self) -> u16 {
        self.target
    }
}

impl Client {
    /// The number of publish requests currently awaiting a response.
    pub fn outstanding_publish_requests(&self) -> u16 {
        self.pump.outstanding()
    }

    /// Start the pump after session activation, when configured.
    pub(crate) fn pump_enable(&mut self) {
        if self.config.outstanding_publish_requests == 0 {
            return;
        }
        self.pump.enabled = true;
        self.pump.target = self.config.outstanding_publish_requests.min(255);
        self.pump.outstanding = 0;
        self.pump.parked = false;
        self.pump.acks.clear();
        if self.pump.timer.is_none() {
            match self.add_repeated_callback(PUMP_INTERVAL, |client: &mut Client| {
                client.pump_tick()
            }) {
                Ok(id) => self.pump.timer = Some(id),
                Err(status) => warn!("Failed to register the publish pump timer: {status}"),
            }
        }
        self.pump_top_up();
    }

    /// Stop the pump, part of every channel teardown.
    pub(crate) fn pump_disable(&mut self) {
        self.pump.enabled = false;
        self.pump.outstanding = 0;
        self.pump.parked = false;
        self.pump.acks.clear();
        if let Some(id) = self.pump.timer.take() {
            let _ = self.timers.remove(id);
        }
    }

    /// Clear the `BadNoSubscription` parking after a subscription was created.
    pub(crate) fn pump_unpark(&mut self) {
        if self.pump.parked {
            debug!("A subscription exists again, resuming the publish pump");
            self.pump.parked = false;
            self.pump_top_up();
        }
    }

    fn pump_tick(&mut self) {
        if !self.pump.enabled || self.state < ClientState::Session {
            return;
        }
        self.pump_top_up();
    }

    /// Issue publish requests until the outstanding count reaches the target.
    fn pump_top_up(&mut self) {
        while self.pump.enabled
            && !self.pump.parked
            && self.state >= ClientState::Session
            && self.pump.outstanding < self.pump.target
        {
            if let Err(status) = self.issue_publish() {
                warn!("Failed to issue a publish request: {status}");
                break;
            }
        }
    }

    fn issue_publish(&mut self) -> Result<(), StatusCode> {
        let acks = std::mem::take(&mut self.pump.acks);
        let request = PublishRequest {
            request_header: self.make_request_header(self.config.sync_timeout),
            subscription_acknowledgements: if acks.is_empty() { None } else { Some(acks) },
        };
        self.send_async(request, |client: &mut Client, _, response: PublishResponse| {
            client.on_publish_response(response);
        })?;
        self.pump.outstanding += 1;
        Ok(())
    }

    fn on_publish_response(&mut self, response: PublishResponse) {
        self.pump.outstanding = self.pump.outstanding.saturating_sub(1);
        if !self.pump.enabled {
            return;
        }

        let status = response.response_header.service_result;
        if status.is_bad() {
            match status {
                StatusCode::BadNoSubscription => {
                    debug!("Server has no subscription, parking the publish pump");
                    self.pump.parked = true;
                }
                StatusCode::BadTooManyPublishRequests => {
                    // The server will not queue this many requests; lower the
                    // target for the rest of the session.
                    self.pump.target = self.pump.target.saturating_sub(1).max(1);
                    debug!(
                        "Server queue is full, publish target lowered to {}",
                        self.pump.target
                    );
                }
                StatusCode::BadShutdown
                | StatusCode::BadSecureChannelClosed
                | StatusCode::BadSessionClosed
                | StatusCode::BadSessionIdInvalid
                | StatusCode::BadNotConnected
                | StatusCode::BadConnectionClosed => {
                    // The session or channel is gone, teardown handles the rest.
                    return;
                }
                _ => {
                    warn!("Publish request failed: {status}");
                }
            }
            self.pump_top_up();
            return;
        }

        let message = &response.notification_message;
        if !message.is_keep_alive() {
            self.pump.acks.push(SubscriptionAcknowledgement {
                subscription_id: response.subscription_id,
                sequence_number: message.sequence_number,
            });
        }
        if let Some(callback) = self.notification_callback.as_mut() {
            callback(response.subscription_id, message);
        }
        self.pump_top_up();
    }
}
