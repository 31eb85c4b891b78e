//! Configuration file support for ovs-vlanmond
//!
//! Loads the plugin configuration from a TOML file.
//! Default location: /etc/netdata/ovs_vlan.conf
//!
//! ```toml
//! [collector]
//! update_every = 1
//! priority = 90000
//!
//! [ovs]
//! vsctl_path = "/usr/bin/ovs-vsctl"
//! use_sudo = true
//! sudo_path = "/usr/bin/sudo"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use ovs_monitor_common::{shell, MonResult, MonitorError};

use crate::chart::{vlan_port_charts, ChartSet, DEFAULT_PRIORITY, DEFAULT_UPDATE_EVERY};

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "/etc/netdata/ovs_vlan.conf";

/// Collection scheduling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Seconds between collection cycles
    #[serde(default = "default_update_every")]
    pub update_every: u64,

    /// Dashboard priority of the chart
    #[serde(default = "default_priority")]
    pub priority: u32,
}

/// Location of the OVS tooling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OvsConfig {
    /// `ovs-vsctl` executable
    #[serde(default = "default_vsctl_path")]
    pub vsctl_path: String,

    /// Run `ovs-vsctl` through `sudo -n`
    #[serde(default = "default_use_sudo")]
    pub use_sudo: bool,

    /// `sudo` executable
    #[serde(default = "default_sudo_path")]
    pub sudo_path: String,
}

/// Complete plugin configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default)]
    pub collector: CollectorConfig,

    #[serde(default)]
    pub ovs: OvsConfig,
}

fn default_update_every() -> u64 {
    DEFAULT_UPDATE_EVERY
}

fn default_priority() -> u32 {
    DEFAULT_PRIORITY
}

fn default_vsctl_path() -> String {
    shell::OVS_VSCTL_CMD.to_string()
}

fn default_use_sudo() -> bool {
    true
}

fn default_sudo_path() -> String {
    shell::SUDO_CMD.to_string()
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            update_every: default_update_every(),
            priority: default_priority(),
        }
    }
}

impl Default for OvsConfig {
    fn default() -> Self {
        Self {
            vsctl_path: default_vsctl_path(),
            use_sudo: default_use_sudo(),
            sudo_path: default_sudo_path(),
        }
    }
}

impl PluginConfig {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> MonResult<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content).map_err(|e| match e {
                MonitorError::InvalidConfig { message, .. } => {
                    MonitorError::invalid_config(path.display().to_string(), message)
                }
                other => other,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(MonitorError::Io(e)),
        }
    }

    /// Parse configuration text
    pub fn from_toml_str(content: &str) -> MonResult<Self> {
        toml::from_str(content)
            .map_err(|e| MonitorError::invalid_config("toml", e.to_string()))
    }

    /// Collection interval as Duration
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.collector.update_every)
    }

    /// Chart declarations for this configuration
    pub fn charts(&self) -> ChartSet {
        vlan_port_charts(self.collector.priority, self.collector.update_every)
    }

    /// Validate configuration
    pub fn validate(&self) -> MonResult<()> {
        if self.collector.update_every == 0 {
            return Err(MonitorError::invalid_config(
                "collector.update_every",
                "must be > 0",
            ));
        }

        if self.ovs.vsctl_path.trim().is_empty() {
            return Err(MonitorError::invalid_config(
                "ovs.vsctl_path",
                "must not be empty",
            ));
        }

        if self.ovs.use_sudo && self.ovs.sudo_path.trim().is_empty() {
            return Err(MonitorError::invalid_config(
                "ovs.sudo_path",
                "must not be empty when use_sudo is set",
            ));
        }

        Ok(())
    }
}
