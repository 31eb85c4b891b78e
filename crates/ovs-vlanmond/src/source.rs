//! Port table sources
//!
//! [`PortSource`] is the only seam between the collector and the switch.
//! [`OvsVsctlSource`] runs `ovs-vsctl` (through `sudo -n` by default);
//! [`StaticPortSource`] serves canned text so collection can be exercised
//! without OVS or privileges.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use ovs_monitor_common::{shell, MonResult, MonitorError};

use crate::commands::{build_list_ports_cmd, build_probe_cmd};
use crate::config::OvsConfig;

/// Something that can produce an `ovs-vsctl list Port` listing
#[async_trait]
pub trait PortSource: Send + Sync {
    /// Cheap reachability check; output is discarded
    async fn probe(&self) -> MonResult<()>;

    /// Raw listing text, unmodified
    async fn list_ports(&self) -> MonResult<String>;
}

/// Queries the local switch through `ovs-vsctl`
#[derive(Debug, Clone)]
pub struct OvsVsctlSource {
    vsctl: String,
    sudo: Option<String>,
    timeout: Duration,
}

impl OvsVsctlSource {
    /// Use the default paths: `sudo -n /usr/bin/ovs-vsctl`
    pub fn new() -> Self {
        Self {
            vsctl: shell::OVS_VSCTL_CMD.to_string(),
            sudo: Some(shell::SUDO_CMD.to_string()),
            timeout: shell::DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Build from the `[ovs]` config section
    pub fn from_config(config: &OvsConfig) -> Self {
        Self {
            vsctl: config.vsctl_path.clone(),
            sudo: config.use_sudo.then(|| config.sudo_path.clone()),
            timeout: shell::DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Override the `ovs-vsctl` executable
    pub fn with_vsctl(mut self, vsctl: impl Into<String>) -> Self {
        self.vsctl = vsctl.into();
        self
    }

    /// Run without `sudo`
    pub fn without_sudo(mut self) -> Self {
        self.sudo = None;
        self
    }

    /// Override the per-command time bound
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The per-command time bound
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for OvsVsctlSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PortSource for OvsVsctlSource {
    async fn probe(&self) -> MonResult<()> {
        let cmd = build_probe_cmd(&self.vsctl, self.sudo.as_deref());
        shell::exec_or_fail(&cmd, self.timeout).await?;
        debug!(command = %cmd, "OVS probe succeeded");
        Ok(())
    }

    async fn list_ports(&self) -> MonResult<String> {
        let cmd = build_list_ports_cmd(&self.vsctl, self.sudo.as_deref());
        shell::exec_or_fail(&cmd, self.timeout).await
    }
}

/// Serves a fixed listing, or fails every call
#[derive(Debug, Clone)]
pub struct StaticPortSource {
    listing: Option<String>,
    reachable: bool,
}

impl StaticPortSource {
    /// A reachable switch that always prints `listing`
    pub fn new(listing: impl Into<String>) -> Self {
        Self {
            listing: Some(listing.into()),
            reachable: true,
        }
    }

    /// A switch that cannot be queried at all
    pub fn unreachable() -> Self {
        Self {
            listing: None,
            reachable: false,
        }
    }

    /// Probe succeeds but listing fails
    pub fn listing_fails() -> Self {
        Self {
            listing: None,
            reachable: true,
        }
    }

    fn failure(what: &str) -> MonitorError {
        MonitorError::command_failed(format!("static {}", what), 1, "switch unreachable")
    }
}

#[async_trait]
impl PortSource for StaticPortSource {
    async fn probe(&self) -> MonResult<()> {
        if self.reachable {
            Ok(())
        } else {
            Err(Self::failure("show"))
        }
    }

    async fn list_ports(&self) -> MonResult<String> {
        self.listing
            .clone()
            .ok_or_else(|| Self::failure("list Port"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_source() {
        let source = OvsVsctlSource::default();
        assert_eq!(source.vsctl, "/usr/bin/ovs-vsctl");
        assert_eq!(source.sudo.as_deref(), Some("/usr/bin/sudo"));
        assert_eq!(source.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_from_config_without_sudo() {
        let config = OvsConfig {
            vsctl_path: "/opt/ovs/bin/ovs-vsctl".to_string(),
            use_sudo: false,
            sudo_path: "/usr/bin/sudo".to_string(),
        };
        let source = OvsVsctlSource::from_config(&config);
        assert_eq!(source.vsctl, "/opt/ovs/bin/ovs-vsctl");
        assert!(source.sudo.is_none());
    }

    #[tokio::test]
    async fn test_static_source_serves_listing() {
        let source = StaticPortSource::new("tag : 1\n");
        assert!(source.probe().await.is_ok());
        assert_eq!(source.list_ports().await.unwrap(), "tag : 1\n");
    }

    #[tokio::test]
    async fn test_static_source_unreachable() {
        let source = StaticPortSource::unreachable();
        assert!(source.probe().await.is_err());
        assert!(source.list_ports().await.unwrap_err().is_unreachable());
    }

    #[tokio::test]
    async fn test_static_source_listing_fails() {
        let source = StaticPortSource::listing_fails();
        assert!(source.probe().await.is_ok());
        assert!(source.list_ports().await.is_err());
    }

    #[tokio::test]
    async fn test_vsctl_source_returns_raw_stdout() {
        // `echo list Port` stands in for ovs-vsctl.
        let source = OvsVsctlSource::new().with_vsctl("echo").without_sudo();
        assert_eq!(source.list_ports().await.unwrap(), "list Port\n");
        assert!(source.probe().await.is_ok());
    }

    #[tokio::test]
    async fn test_vsctl_source_non_zero_exit() {
        let source = OvsVsctlSource::new().with_vsctl("false").without_sudo();
        assert!(matches!(
            source.list_ports().await,
            Err(MonitorError::ShellCommandFailed { .. })
        ));
        assert!(source.probe().await.is_err());
    }

    #[tokio::test]
    async fn test_vsctl_source_missing_binary() {
        let source = OvsVsctlSource::new()
            .with_vsctl("/nonexistent/ovs-vsctl")
            .without_sudo();
        assert!(matches!(
            source.probe().await,
            Err(MonitorError::ShellExec { .. })
        ));
    }
}
