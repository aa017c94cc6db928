use super::forwarding::ForwardHandler;
use shard_dns_application::ports::DnsHandler;
use shard_dns_application::use_cases::ShardFilter;
use shard_dns_domain::config::plugins::SHARD_PLUGIN;
use shard_dns_domain::config::{Config, ConfigError, PluginDirective};
use std::sync::Arc;
use tracing::info;

/// Assembles the configured plugins into a single handler, outermost first,
/// with `terminal` at the end of the chain.
pub struct HandlerChain;

impl HandlerChain {
    pub fn from_config(config: &Config) -> Result<Arc<dyn DnsHandler>, ConfigError> {
        let forwarder: Arc<dyn DnsHandler> = Arc::new(ForwardHandler::from_config(&config.upstream)?);
        Self::build(&config.plugins, forwarder)
    }

    pub fn build(
        plugins: &[PluginDirective],
        terminal: Arc<dyn DnsHandler>,
    ) -> Result<Arc<dyn DnsHandler>, ConfigError> {
        let mut next = terminal;

        for directive in plugins.iter().rev() {
            directive.validate()?;
            next = match directive.name.as_str() {
                SHARD_PLUGIN => {
                    let filter = ShardFilter::new(Some(next))
                        .map_err(|e| ConfigError::Validation(e.to_string()))?;
                    Arc::new(filter)
                }
                other => {
                    return Err(ConfigError::Validation(format!(
                        "Unknown plugin directive '{}'",
                        other
                    )))
                }
            };
        }

        info!(
            plugins = plugins.len(),
            entry = next.name(),
            "Handler chain assembled"
        );
        Ok(next)
    }
}
