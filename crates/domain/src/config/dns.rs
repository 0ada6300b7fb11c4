use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use super::errors::ConfigError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Upstream recursive resolver, `IP:PORT` or `udp://IP:PORT`.
    #[serde(default = "default_upstream")]
    pub upstream: String,

    /// Seconds to wait for the upstream before dropping the query.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,

    /// TTL written into synthesized answers.
    #[serde(default = "default_answer_ttl")]
    pub answer_ttl: u32,
}

impl DnsConfig {
    pub fn upstream_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = self
            .upstream
            .strip_prefix("udp://")
            .unwrap_or(&self.upstream);

        raw.parse::<SocketAddr>().map_err(|e| {
            ConfigError::Validation(format!("Invalid upstream '{}': {}", self.upstream, e))
        })
    }

    pub fn forwarder_settings(&self) -> Result<ForwarderSettings, ConfigError> {
        Ok(ForwarderSettings {
            upstream: self.upstream_addr()?,
            timeout: Duration::from_secs(self.query_timeout),
            answer_ttl: self.answer_ttl,
        })
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            upstream: default_upstream(),
            query_timeout: default_query_timeout(),
            answer_ttl: default_answer_ttl(),
        }
    }
}

/// Resolved options handed to the forwarder and the upstream adapter at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwarderSettings {
    pub upstream: SocketAddr,
    pub timeout: Duration,
    pub answer_ttl: u32,
}

impl Default for ForwarderSettings {
    fn default() -> Self {
        Self {
            upstream: SocketAddr::from(([8, 8, 8, 8], 53)),
            timeout: Duration::from_secs(default_query_timeout()),
            answer_ttl: default_answer_ttl(),
        }
    }
}

fn default_upstream() -> String {
    "8.8.8.8:53".to_string()
}

fn default_query_timeout() -> u64 {
    5
}

fn default_answer_ttl() -> u32 {
    30
}
