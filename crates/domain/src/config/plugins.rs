use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

pub const SHARD_PLUGIN: &str = "shard";

/// One entry of the handler chain, e.g.
///
/// ```toml
/// [[plugins]]
/// name = "shard"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PluginDirective {
    pub name: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl PluginDirective {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.name.as_str() {
            SHARD_PLUGIN => match self.args.first() {
                None => Ok(()),
                Some(arg) => Err(ConfigError::Validation(format!(
                    "plugin/{}: wrong argument count or unexpected line ending after '{}'",
                    SHARD_PLUGIN, arg
                ))),
            },
            other => Err(ConfigError::Validation(format!(
                "Unknown plugin directive '{}'",
                other
            ))),
        }
    }
}

pub(crate) fn default_plugins() -> Vec<PluginDirective> {
    vec![PluginDirective::new(SHARD_PLUGIN)]
}
