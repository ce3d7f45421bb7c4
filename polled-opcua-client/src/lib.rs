#![warn(missing_docs)]

//! A strictly single threaded, cooperatively scheduled OPC UA client.
//!
//! The client stacks four lifecycles on top of each other: a TCP connection, a
//! secure channel (`SecurityPolicy#None`), a session, and the channel renewal
//! that happens underneath the session. Requests are multiplexed over the
//! channel by request id, with synchronous calls pumping the same event loop
//! that delivers their responses, and a background publish pump keeping
//! server-side subscriptions serviced.
//!
//! Everything runs on the thread that drives [`Client::run`] or
//! [`Client::run_iterate`]; the client spawns no threads and the only blocking
//! point is the receive call on the connection.

mod builder;
mod config;
mod discovery;
mod session;
pub mod transport;

pub use builder::ClientBuilder;
pub use config::{ClientConfig, DecodingLimits, DEFAULT_CHANNEL_LIFETIME, DEFAULT_SYNC_TIMEOUT};
pub use session::{Client, ClientState, NotificationCallback, StateCallback, MIN_TIMER_INTERVAL};
pub use transport::{
    Connection, Connector, MessageReader, ReceiveResult, TransportFrame, TransportLimits,
};

/// The user identity a session is activated with.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentityToken {
    /// An anonymous identity token.
    Anonymous,
    /// A user name identity token with a password.
    UserName(String, String),
}
