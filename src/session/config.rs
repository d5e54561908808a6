//! Session configuration.

use std::time::Duration;

use crate::core::{HANDSHAKE_TIMEOUT, POLL_INTERVAL};
use crate::handshake::{HandshakeOptions, Role};

/// Per-peer session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Role in the handshake.
    pub role: Role,

    /// Quiet-period timeout for each handshake wait. Must match the partner.
    pub handshake_timeout: Duration,

    /// Give up the handshake after this many restarts (`None` = never).
    pub max_restarts: Option<u32>,

    /// Idle sleep of the exchange loop when neither direction has data.
    pub poll_interval: Duration,

    /// Discard bytes left on the link by the handshake before chatting.
    ///
    /// Only the initiator can hold such bytes (duplicate ACKs). The responder
    /// finishes on the initiator's last handshake byte and never drains.
    pub drain_on_establish: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            role: Role::Responder,
            handshake_timeout: HANDSHAKE_TIMEOUT,
            max_restarts: None,
            poll_interval: POLL_INTERVAL,
            drain_on_establish: true,
        }
    }
}

impl SessionConfig {
    /// Handshake options derived from this configuration.
    pub fn handshake_options(&self) -> HandshakeOptions {
        HandshakeOptions {
            timeout: Some(self.handshake_timeout),
            max_restarts: self.max_restarts,
        }
    }
}

/// Builder for a [`SessionConfig`].
#[derive(Debug)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
        }
    }

    /// Set the handshake role.
    pub fn role(mut self, role: Role) -> Self {
        self.config.role = role;
        self
    }

    /// Set the handshake timeout.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.config.handshake_timeout = timeout;
        self
    }

    /// Bound the number of handshake restarts.
    pub fn max_restarts(mut self, max: u32) -> Self {
        self.config.max_restarts = Some(max);
        self
    }

    /// Set the exchange-loop idle interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Enable or disable draining the link after the handshake.
    pub fn drain_on_establish(mut self, enabled: bool) -> Self {
        self.config.drain_on_establish = enabled;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> SessionConfig {
        self.config
    }
}

impl Default for SessionConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.handshake_timeout, Duration::from_millis(1000));
        assert_eq!(config.max_restarts, None);
        assert!(config.drain_on_establish);
        assert_eq!(config.handshake_options(), HandshakeOptions::default());
    }

    #[test]
    fn test_builder() {
        let config = SessionConfigBuilder::new()
            .role(Role::Initiator)
            .handshake_timeout(Duration::from_millis(250))
            .max_restarts(8)
            .poll_interval(Duration::from_millis(5))
            .drain_on_establish(false)
            .build();

        assert_eq!(config.role, Role::Initiator);
        assert_eq!(config.poll_interval, Duration::from_millis(5));
        assert!(!config.drain_on_establish);

        let options = config.handshake_options();
        assert_eq!(options.timeout, Some(Duration::from_millis(250)));
        assert_eq!(options.max_restarts, Some(8));
    }
}
