//! Error types for OVS monitoring operations.
//!
//! This module defines the error types shared by the monitoring plugins.
//! All errors implement `std::error::Error` via `thiserror`.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for monitoring operations.
pub type MonResult<T> = Result<T, MonitorError>;

/// Errors that can occur while querying Open vSwitch.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Failed to spawn or wait on a command.
    #[error("Failed to execute command '{command}': {source}")]
    ShellExec {
        /// The command that failed to execute.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The command could not run with the required privileges.
    #[error("Permission denied running '{command}': {message}")]
    PermissionDenied {
        /// The command that was denied.
        command: String,
        /// What the OS or sudo reported.
        message: String,
    },

    /// The command did not finish within its time bound.
    #[error("Command '{command}' timed out after {timeout:?}")]
    Timeout {
        /// The command that timed out.
        command: String,
        /// The bound that elapsed.
        timeout: Duration,
    },

    /// Command returned non-zero exit code.
    #[error("Command failed: '{command}' (exit code {exit_code}): {output}")]
    ShellCommandFailed {
        /// The command that failed.
        command: String,
        /// The exit code, or -1 when killed by a signal.
        exit_code: i32,
        /// Captured stderr, falling back to stdout.
        output: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// IO error outside of command execution.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl MonitorError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a permission denied error.
    pub fn permission_denied(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Creates a non-zero exit error.
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: i32,
        output: impl Into<String>,
    ) -> Self {
        Self::ShellCommandFailed {
            command: command.into(),
            exit_code,
            output: output.into(),
        }
    }

    /// Returns true if this error means the switch could not be queried
    /// this time (as opposed to a local misconfiguration).
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            MonitorError::ShellExec { .. }
                | MonitorError::PermissionDenied { .. }
                | MonitorError::Timeout { .. }
                | MonitorError::ShellCommandFailed { .. }
        )
    }

    /// Short machine-friendly label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            MonitorError::ShellExec { .. } => "exec",
            MonitorError::PermissionDenied { .. } => "permission",
            MonitorError::Timeout { .. } => "timeout",
            MonitorError::ShellCommandFailed { .. } => "exit_status",
            MonitorError::InvalidConfig { .. } => "config",
            MonitorError::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MonitorError::invalid_config("collector.update_every", "must be > 0");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for collector.update_every: must be > 0"
        );
    }

    #[test]
    fn test_timeout_display() {
        let err = MonitorError::Timeout {
            command: "ovs-vsctl list Port".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert_eq!(
            err.to_string(),
            "Command 'ovs-vsctl list Port' timed out after 5s"
        );
    }

    #[test]
    fn test_shell_command_failed() {
        let err = MonitorError::command_failed(
            "sudo -n ovs-vsctl show",
            1,
            "sudo: a password is required",
        );
        assert!(err.to_string().contains("ovs-vsctl show"));
        assert!(err.to_string().contains("exit code 1"));
    }

    #[test]
    fn test_is_unreachable() {
        assert!(MonitorError::permission_denied("ovs-vsctl", "denied").is_unreachable());
        assert!(MonitorError::command_failed("ovs-vsctl", 1, "").is_unreachable());
        assert!(!MonitorError::invalid_config("ovs.vsctl_path", "empty").is_unreachable());
    }

    #[test]
    fn test_kind_labels() {
        let err = MonitorError::Timeout {
            command: "x".to_string(),
            timeout: Duration::from_secs(1),
        };
        assert_eq!(err.kind(), "timeout");
        assert_eq!(
            MonitorError::permission_denied("x", "y").kind(),
            "permission"
        );
    }
}
