//! Notification delivery with severity-based routing.
//!
//! Alert events are routed by [`routing::channels_for`] to a fixed set of
//! [`ChannelSender`]s (chat, email, SMS). Senders are injected, so any
//! transport, or a test double, can stand behind each channel.
//! Built-in senders are local only: a `tracing` logger and a file appender.

pub mod channels;
pub mod dispatcher;
pub mod error;
pub mod plugin;
pub mod routing;


pub use dispatcher::{DispatchRecord, NotificationDispatcher};
pub use error::NotifyError;
pub use routing::ChannelKind;

use anyhow::Result;

/// A notification transport that accepts a rendered message.
///
/// Implementations are created directly or through a
/// [`plugin::ChannelPlugin`] and handed to the
/// [`NotificationDispatcher`].
pub trait ChannelSender: Send + Sync {
    /// Delivers `message` through this channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport rejects or fails to deliver it.
    fn send(&self, message: &str) -> Result<()>;

    /// Returns the channel instance name (e.g., `"chat"`, `"email"`).
    fn channel_name(&self) -> &str;
}
