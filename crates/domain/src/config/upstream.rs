use crate::dns_protocol::DnsProtocol;
use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Tried in order; see [`DnsProtocol`] for the accepted forms.
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl UpstreamConfig {
    pub fn protocols(&self) -> Result<Vec<DnsProtocol>, ConfigError> {
        self.servers
            .iter()
            .map(|server| {
                server
                    .parse::<DnsProtocol>()
                    .map_err(ConfigError::Validation)
            })
            .collect()
    }
}

fn default_servers() -> Vec<String> {
    vec!["8.8.8.8:53".to_string(), "1.1.1.1:53".to_string()]
}

fn default_timeout_ms() -> u64 {
    2000
}
