//! Demo configuration from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use serial_dh_chat::{ChatError, Role, SessionConfig, SessionConfigBuilder};
use thiserror::Error;

/// Problems reading the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but does not parse.
    #[error("{var}={value:?}: {reason}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
        /// Parser message.
        reason: String,
    },
}

impl From<ConfigError> for ChatError {
    fn from(err: ConfigError) -> Self {
        ChatError::Config(err.to_string())
    }
}

/// Everything the demo needs to start.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Local UDP address.
    pub bind_addr: SocketAddr,
    /// Partner UDP address.
    pub peer_addr: SocketAddr,
    /// Session settings.
    pub session: SessionConfig,
    /// tracing filter directive.
    pub log_level: String,
}

impl DemoConfig {
    /// Read `CHAT_*` variables, falling back to defaults that let two local
    /// processes talk to each other.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let role: Role = parse(&lookup, "CHAT_ROLE")?.unwrap_or(Role::Responder);

        // The two roles default to mirrored ports.
        let (default_bind, default_peer) = match role {
            Role::Initiator => ("127.0.0.1:19998", "127.0.0.1:19999"),
            Role::Responder => ("127.0.0.1:19999", "127.0.0.1:19998"),
        };
        let bind_addr = match parse(&lookup, "CHAT_BIND_ADDR")? {
            Some(addr) => addr,
            None => literal(default_bind)?,
        };
        let peer_addr = match parse(&lookup, "CHAT_PEER_ADDR")? {
            Some(addr) => addr,
            None => literal(default_peer)?,
        };

        let mut session = SessionConfigBuilder::new().role(role);
        if let Some(ms) = parse::<u64>(&lookup, "CHAT_TIMEOUT_MS")? {
            session = session.handshake_timeout(Duration::from_millis(ms));
        }
        if let Some(max) = parse::<u32>(&lookup, "CHAT_MAX_RESTARTS")? {
            session = session.max_restarts(max);
        }

        Ok(Self {
            bind_addr,
            peer_addr,
            session: session.build(),
            log_level: lookup("CHAT_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(var)
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                var,
                reason: e.to_string(),
                value,
            })
        })
        .transpose()
}

fn literal(addr: &'static str) -> Result<SocketAddr, ConfigError> {
    addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
        var: "default address",
        value: addr.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<DemoConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DemoConfig::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn test_defaults_mirror_ports() {
        let server = config(&[]).unwrap();
        let client = config(&[("CHAT_ROLE", "client")]).unwrap();
        assert_eq!(server.session.role, Role::Responder);
        assert_eq!(client.session.role, Role::Initiator);
        assert_eq!(server.bind_addr, client.peer_addr);
        assert_eq!(server.peer_addr, client.bind_addr);
        assert_eq!(server.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("CHAT_ROLE", "initiator"),
            ("CHAT_BIND_ADDR", "0.0.0.0:4000"),
            ("CHAT_PEER_ADDR", "10.0.0.2:4000"),
            ("CHAT_TIMEOUT_MS", "250"),
            ("CHAT_MAX_RESTARTS", "5"),
            ("CHAT_LOG_LEVEL", "debug"),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 4000);
        assert_eq!(cfg.session.handshake_timeout, Duration::from_millis(250));
        assert_eq!(cfg.session.max_restarts, Some(5));
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn test_invalid_value() {
        let err = config(&[("CHAT_TIMEOUT_MS", "soon")]).unwrap_err();
        assert!(err.to_string().starts_with("CHAT_TIMEOUT_MS="));
        let err = config(&[("CHAT_ROLE", "observer")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "CHAT_ROLE", .. }));
    }
}
