//! Common infrastructure for Open vSwitch monitoring plugins.
//!
//! - [`shell`]: Bounded command execution with optional `sudo -n` wrapping
//! - [`error`]: Error types shared by the plugins
//!
//! # Example
//!
//! ```ignore
//! use ovs_monitor_common::{
//!     shell::{self, CommandLine, DEFAULT_COMMAND_TIMEOUT, OVS_VSCTL_CMD, SUDO_CMD},
//!     MonResult,
//! };
//!
//! async fn list_ports() -> MonResult<String> {
//!     let cmd = CommandLine::new(OVS_VSCTL_CMD)
//!         .args(["list", "Port"])
//!         .with_sudo(SUDO_CMD);
//!     shell::exec_or_fail(&cmd, DEFAULT_COMMAND_TIMEOUT).await
//! }
//! ```

pub mod error;
pub mod shell;

pub use error::{MonResult, MonitorError};
pub use shell::{CommandLine, ExecResult};
