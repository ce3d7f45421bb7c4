// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! The state held for an open secure channel - ids, token lifetime window,
//! sequence numbers and request id allocation.

use std::time::{Duration, Instant};

use log::{debug, error};

use opcua_types::{
    ChannelSecurityToken, DateTime, DecodingOptions, EncodingResult, Error, StatusCode,
};

use crate::handle::AtomicHandle;

use super::{
    message_chunk::{MessageChunk, MessageChunkType},
    message_chunk_info::ChunkInfo,
    security_header::{AsymmetricSecurityHeader, SecurityHeader, SymmetricSecurityHeader},
};

/// The fraction of the token lifetime after which the token should be renewed.
const TOKEN_RENEWAL_THRESHOLD: f64 = 0.75;

/// Both sides of a connection carry a secure channel, the roles differ in who
/// allocates ids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Role {
    /// The channel state is held by a client.
    Client,
    /// The channel state is held by a server.
    Server,
}

/// Holds the security state of an open secure channel. Under
/// `SecurityPolicy#None` there are no keys to derive; the channel still owns
/// the token lifetime window, the chunk sequence numbers and the request id
/// counter.
pub struct SecureChannel {
    role: Role,
    secure_channel_id: u32,
    token_id: u32,
    token_created_at: DateTime,
    token_issued_at: Option<Instant>,
    token_lifetime: u32,
    local_sequence_number: u32,
    remote_sequence_number: u32,
    request_id: AtomicHandle,
    decoding_options: DecodingOptions,
}

impl SecureChannel {
    /// Create channel state for the given role.
    pub fn new(role: Role, decoding_options: DecodingOptions) -> SecureChannel {
        SecureChannel {
            role,
            secure_channel_id: 0,
            token_id: 0,
            token_created_at: DateTime::null(),
            token_issued_at: None,
            token_lifetime: 0,
            local_sequence_number: 0,
            remote_sequence_number: 0,
            request_id: AtomicHandle::new(1),
            decoding_options,
        }
    }

    /// `true` if this channel state belongs to a client.
    pub fn is_client_role(&self) -> bool {
        self.role == Role::Client
    }

    /// Forget the active security token, e.g. before a reconnect.
    pub fn clear_security_token(&mut self) {
        self.secure_channel_id = 0;
        self.token_id = 0;
        self.token_created_at = DateTime::null();
        self.token_issued_at = None;
        self.token_lifetime = 0;
        self.local_sequence_number = 0;
        self.remote_sequence_number = 0;
    }

    /// Install the token negotiated by an OpenSecureChannel exchange. The
    /// renewal window is measured locally from the moment the token arrives,
    /// which sidesteps clock skew against the server's `created_at`.
    pub fn set_security_token(&mut self, token: ChannelSecurityToken) {
        debug!(
            "Installing security token channel={} token={} lifetime={}ms",
            token.channel_id, token.token_id, token.revised_lifetime
        );
        self.secure_channel_id = token.channel_id;
        self.token_id = token.token_id;
        self.token_created_at = token.created_at;
        self.token_issued_at = Some(Instant::now());
        self.token_lifetime = token.revised_lifetime;
    }

    /// The id of the secure channel, 0 when no channel is open.
    pub fn secure_channel_id(&self) -> u32 {
        self.secure_channel_id
    }

    /// The id of the active security token.
    pub fn token_id(&self) -> u32 {
        self.token_id
    }

    /// The server timestamp of token creation.
    pub fn token_created_at(&self) -> DateTime {
        self.token_created_at
    }

    /// The negotiated token lifetime in milliseconds.
    pub fn token_lifetime(&self) -> u32 {
        self.token_lifetime
    }

    /// Set the token id directly, used by servers issuing tokens.
    pub fn set_token_id(&mut self, token_id: u32) {
        self.token_id = token_id;
    }

    /// Set the channel id directly, used by servers issuing channels.
    pub fn set_secure_channel_id(&mut self, secure_channel_id: u32) {
        self.secure_channel_id = secure_channel_id;
    }

    /// `true` once three quarters of the token lifetime has elapsed and the
    /// token should be renewed.
    pub fn should_renew_security_token(&self) -> bool {
        let Some(issued_at) = self.token_issued_at else {
            return false;
        };
        if self.token_lifetime == 0 {
            return false;
        }
        let renew_after = Duration::from_millis(
            (self.token_lifetime as f64 * TOKEN_RENEWAL_THRESHOLD) as u64,
        );
        issued_at.elapsed() >= renew_after
    }

    /// The interval at which a renewal check should run, a quarter of the
    /// lifetime capped at one minute.
    pub fn token_renewal_check_interval(&self) -> Duration {
        let quarter = Duration::from_millis((self.token_lifetime / 4).max(1) as u64);
        quarter.min(Duration::from_secs(60))
    }

    /// Make a security header of the kind the given message type requires.
    pub fn make_security_header(&self, message_type: MessageChunkType) -> SecurityHeader {
        match message_type {
            MessageChunkType::OpenSecureChannel => {
                SecurityHeader::Asymmetric(AsymmetricSecurityHeader::none())
            }
            _ => SecurityHeader::Symmetric(SymmetricSecurityHeader {
                token_id: self.token_id,
            }),
        }
    }

    /// Issue the next chunk sequence number on the channel.
    pub fn next_sequence_number(&mut self) -> u32 {
        self.local_sequence_number = self.local_sequence_number.wrapping_add(1);
        self.local_sequence_number
    }

    /// The last sequence number issued.
    pub fn sequence_number(&self) -> u32 {
        self.local_sequence_number
    }

    /// Record the last sequence number issued, after a batch of chunks was
    /// encoded for the channel.
    pub fn set_sequence_number(&mut self, sequence_number: u32) {
        self.local_sequence_number = sequence_number;
    }

    /// Issue the next request id on the channel. Wraps to 1 on overflow and
    /// never issues 0.
    pub fn next_request_id(&self) -> u32 {
        self.request_id.next()
    }

    /// The expected sequence number of the next inbound chunk.
    pub fn remote_sequence_number(&self) -> u32 {
        self.remote_sequence_number
    }

    /// Record the last verified inbound sequence number.
    pub fn set_remote_sequence_number(&mut self, sequence_number: u32) {
        self.remote_sequence_number = sequence_number;
    }

    /// The decoding options applied to inbound messages on this channel.
    pub fn decoding_options(&self) -> DecodingOptions {
        self.decoding_options.clone()
    }

    /// Verify an inbound chunk: its channel id must match the open channel and
    /// its headers must decode. Returns the chunk info on success.
    pub fn verify_chunk(&self, chunk: &MessageChunk) -> EncodingResult<ChunkInfo> {
        let chunk_info = chunk.chunk_info(self)?;
        // Open secure channel chunks arrive before the channel id is known.
        if !chunk_info.message_header.message_type.is_open_secure_channel()
            && self.secure_channel_id != 0
            && chunk_info.message_header.secure_channel_id != self.secure_channel_id
        {
            error!(
                "Secure channel id {} does not match expected id {}",
                chunk_info.message_header.secure_channel_id, self.secure_channel_id
            );
            return Err(Error::new(
                StatusCode::BadSecureChannelIdInvalid,
                "Chunk secure channel id mismatch",
            ));
        }
        Ok(chunk_info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(lifetime: u32) -> ChannelSecurityToken {
        ChannelSecurityToken {
            channel_id: 5,
            token_id: 1,
            created_at: DateTime::now(),
            revised_lifetime: lifetime,
        }
    }

    #[test]
    fn no_renewal_without_token() {
        let channel = SecureChannel::new(Role::Client, DecodingOptions::default());
        assert!(!channel.should_renew_security_token());
    }

    #[test]
    fn renewal_after_threshold() {
        let mut channel = SecureChannel::new(Role::Client, DecodingOptions::default());
        // A token with a tiny lifetime is due for renewal almost immediately.
        channel.set_security_token(token(1));
        std::thread::sleep(Duration::from_millis(5));
        assert!(channel.should_renew_security_token());
    }

    #[test]
    fn renewal_check_interval_capped() {
        let mut channel = SecureChannel::new(Role::Client, DecodingOptions::default());
        channel.set_security_token(token(600_000));
        assert_eq!(
            channel.token_renewal_check_interval(),
            Duration::from_secs(60)
        );
        channel.set_security_token(token(20_000));
        assert_eq!(
            channel.token_renewal_check_interval(),
            Duration::from_millis(5_000)
        );
    }

    #[test]
    fn request_ids_start_at_one() {
        let channel = SecureChannel::new(Role::Client, DecodingOptions::default());
        assert_eq!(channel.next_request_id(), 1);
        assert_eq!(channel.next_request_id(), 2);
    }
}
