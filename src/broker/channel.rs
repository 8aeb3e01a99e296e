//! Channel naming for message delivery.

use crate::protocol::message::BROADCAST_RECIPIENT;

/// Prefix for per-agent inbound channels.
pub const DIRECT_CHANNEL_PREFIX: &str = "agent:message:";

/// The single shared broadcast channel.
pub const BROADCAST_CHANNEL: &str = "agent:broadcast";

/// Map a recipient to its transport channel. Pure and infallible: the
/// broadcast sentinel maps to the shared channel, every other recipient to
/// its own prefixed channel (distinct recipients never collide).
pub fn resolve(recipient: &str) -> String {
    if recipient == BROADCAST_RECIPIENT {
        BROADCAST_CHANNEL.to_string()
    } else {
        format!("{}{}", DIRECT_CHANNEL_PREFIX, recipient)
    }
}
