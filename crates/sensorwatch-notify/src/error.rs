use crate::routing::ChannelKind;

/// Errors that can occur within the notification subsystem.
///
/// # Examples
///
/// ```rust
/// use sensorwatch_notify::error::NotifyError;
///
/// let err = NotifyError::InvalidConfig("missing path".to_string());
/// assert!(err.to_string().contains("path"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// A channel's `send` failed. Channels earlier in the route have already
    /// been invoked; no dispatch record was written.
    #[error("Notify: {channel} channel failed to send: {source}")]
    ChannelSend {
        channel: ChannelKind,
        #[source]
        source: anyhow::Error,
    },

    /// Channel configuration is missing a required field or contains an invalid value.
    #[error("Notify: invalid channel configuration: {0}")]
    InvalidConfig(String),

    /// The channel type is not registered in the plugin registry.
    #[error("Notify: unknown channel type '{0}'")]
    UnknownChannelType(String),
}

/// Convenience `Result` alias for notification operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
