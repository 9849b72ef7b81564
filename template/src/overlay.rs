use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Additions applied to one pool of the template
///
/// Deserialized straight from the config file, so the field names follow
/// the template's PascalCase convention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Overlay {
    /// Base name of a new worker pool, absent for the manager overlay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Tags for the autoscaling group, propagated to instances
    pub custom_tags: BTreeMap<String, String>,

    /// Docker daemon labels in `key=value` form
    pub labels: Vec<String>,

    /// Shell commands run right after the Docker daemon started
    ///
    /// Each command carries its own line terminator.
    pub after_daemon_started: Vec<String>,
}

impl Overlay {
    /// Overlay for a new worker pool
    pub fn pool(name: &str) -> Self {
        Overlay {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.custom_tags.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_labels(mut self, labels: &[&str]) -> Self {
        self.labels.extend(labels.iter().map(|l| l.to_string()));
        self
    }

    pub fn with_commands(mut self, commands: &[&str]) -> Self {
        self.after_daemon_started
            .extend(commands.iter().map(|c| c.to_string()));
        self
    }

    /// True if the overlay adds nothing to the resources it targets
    pub fn is_noop(&self) -> bool {
        self.custom_tags.is_empty() && self.labels.is_empty() && self.after_daemon_started.is_empty()
    }
}
