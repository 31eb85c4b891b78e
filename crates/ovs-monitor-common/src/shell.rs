//! Command execution utilities for monitoring plugins.
//!
//! Commands are spawned directly (no intermediate `/bin/sh`), with stdin
//! closed and a hard upper bound on run time. When the bound elapses the
//! spawned process is killed; processes it started itself (the command
//! under `sudo`, for instance) are not signalled.
//!
//! # Example
//!
//! ```ignore
//! use ovs_monitor_common::shell::{self, CommandLine, DEFAULT_COMMAND_TIMEOUT, OVS_VSCTL_CMD};
//!
//! let cmd = CommandLine::new(OVS_VSCTL_CMD).arg("show").with_sudo(shell::SUDO_CMD);
//! let stdout = shell::exec_or_fail(&cmd, DEFAULT_COMMAND_TIMEOUT).await?;
//! ```

use std::fmt;
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::error::{MonResult, MonitorError};

/// Path to `sudo`.
pub const SUDO_CMD: &str = "/usr/bin/sudo";

/// Path to the Open vSwitch configuration utility.
pub const OVS_VSCTL_CMD: &str = "/usr/bin/ovs-vsctl";

/// Upper bound on any single command run by a plugin.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// Messages sudo prints when it refuses to run a command without a prompt.
const SUDO_DENIAL_MARKERS: &[&str] = &[
    "a password is required",
    "is not allowed to execute",
    "is not in the sudoers file",
    "a terminal is required",
];

/// A program plus its argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Starts a command line for `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Wraps the command in `sudo -n` so it never waits on a password prompt.
    pub fn with_sudo(self, sudo: impl Into<String>) -> Self {
        let mut args = Vec::with_capacity(self.args.len() + 2);
        args.push("-n".to_string());
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: sudo.into(),
            args,
        }
    }

    /// The executable that will be spawned.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments passed to the executable.
    pub fn arguments(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// The exit code of the command (0 = success, -1 = killed by signal).
    pub exit_code: i32,
    /// Raw stdout, lossily decoded.
    pub stdout: String,
    /// Raw stderr, lossily decoded.
    pub stderr: String,
}

impl ExecResult {
    /// Returns true if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns the most useful output for an error message.
    pub fn combined_output(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            stdout.to_string()
        } else if stdout.is_empty() {
            stderr.to_string()
        } else {
            format!("{}\n{}", stdout, stderr)
        }
    }

    fn sudo_denied(&self) -> bool {
        SUDO_DENIAL_MARKERS
            .iter()
            .any(|marker| self.stderr.contains(marker))
    }
}

/// Executes a command, waiting at most `timeout` for it to finish.
///
/// A non-zero exit is not an error here; check [`ExecResult::success`].
///
/// # Returns
///
/// * `Ok(ExecResult)` - The command ran to completion
/// * `Err(MonitorError::Timeout)` - The bound elapsed; the child was killed
/// * `Err(MonitorError::PermissionDenied)` - The OS refused to spawn it
/// * `Err(MonitorError::ShellExec)` - Any other spawn or wait failure
pub async fn exec(cmd: &CommandLine, timeout: Duration) -> MonResult<ExecResult> {
    tracing::debug!(command = %cmd, timeout_ms = timeout.as_millis() as u64, "Executing command");

    let child = Command::new(&cmd.program)
        .args(&cmd.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        // Only the direct child is killed on timeout.
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(timeout, child).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) if e.kind() == io::ErrorKind::PermissionDenied => {
            return Err(MonitorError::permission_denied(cmd.to_string(), e.to_string()));
        }
        Ok(Err(e)) => {
            return Err(MonitorError::ShellExec {
                command: cmd.to_string(),
                source: e,
            });
        }
        Err(_) => {
            tracing::warn!(command = %cmd, timeout_ms = timeout.as_millis() as u64, "Command timed out");
            return Err(MonitorError::Timeout {
                command: cmd.to_string(),
                timeout,
            });
        }
    };

    let result = ExecResult {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if result.success() {
        tracing::trace!(command = %cmd, bytes = result.stdout.len(), "Command succeeded");
    } else {
        tracing::warn!(
            command = %cmd,
            exit_code = result.exit_code,
            stderr = %result.stderr.trim(),
            "Command failed"
        );
    }

    Ok(result)
}

/// Executes a command and turns a non-zero exit into an error.
///
/// # Returns
///
/// * `Ok(String)` - The raw stdout on success
/// * `Err(MonitorError)` - Spawn failure, timeout, sudo refusal, or non-zero exit
pub async fn exec_or_fail(cmd: &CommandLine, timeout: Duration) -> MonResult<String> {
    let result = exec(cmd, timeout).await?;
    if result.success() {
        Ok(result.stdout)
    } else if result.sudo_denied() {
        Err(MonitorError::permission_denied(
            cmd.to_string(),
            result.stderr.trim(),
        ))
    } else {
        Err(MonitorError::command_failed(
            cmd.to_string(),
            result.exit_code,
            result.combined_output(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandLine {
        CommandLine::new("/bin/sh").args(["-c", script])
    }

    #[test]
    fn test_command_line_display() {
        let cmd = CommandLine::new("ovs-vsctl").args(["list", "Port"]);
        assert_eq!(cmd.to_string(), "ovs-vsctl list Port");
    }

    #[test]
    fn test_with_sudo_prepends_non_interactive() {
        let cmd = CommandLine::new(OVS_VSCTL_CMD).arg("show").with_sudo(SUDO_CMD);
        assert_eq!(cmd.program(), SUDO_CMD);
        assert_eq!(cmd.arguments(), &["-n", OVS_VSCTL_CMD, "show"]);
        assert_eq!(cmd.to_string(), "/usr/bin/sudo -n /usr/bin/ovs-vsctl show");
    }

    #[test]
    fn test_exec_result_combined() {
        let result = ExecResult {
            exit_code: 1,
            stdout: "stdout\n".to_string(),
            stderr: "stderr\n".to_string(),
        };
        assert!(!result.success());
        assert_eq!(result.combined_output(), "stdout\nstderr");
    }

    #[test]
    fn test_exec_result_sudo_denied() {
        let result = ExecResult {
            exit_code: 1,
            stdout: String::new(),
            stderr: "sudo: a password is required\n".to_string(),
        };
        assert!(result.sudo_denied());
    }

    #[tokio::test]
    async fn test_exec_keeps_stdout_untrimmed() {
        let result = exec(&CommandLine::new("echo").arg("hello"), DEFAULT_COMMAND_TIMEOUT)
            .await
            .unwrap();
        assert!(result.success());
        assert_eq!(result.stdout, "hello\n");
    }

    #[tokio::test]
    async fn test_exec_failure_exit_code() {
        let result = exec(&sh("exit 42"), DEFAULT_COMMAND_TIMEOUT).await.unwrap();
        assert!(!result.success());
        assert_eq!(result.exit_code, 42);
    }

    #[tokio::test]
    async fn test_exec_timeout() {
        let result = exec(&sh("sleep 5"), Duration::from_millis(100)).await;
        match result {
            Err(MonitorError::Timeout { timeout, .. }) => {
                assert_eq!(timeout, Duration::from_millis(100));
            }
            other => panic!("Expected Timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_exec_missing_program() {
        let result = exec(
            &CommandLine::new("/nonexistent/ovs-vsctl").arg("show"),
            DEFAULT_COMMAND_TIMEOUT,
        )
        .await;
        assert!(matches!(result, Err(MonitorError::ShellExec { .. })));
    }

    #[tokio::test]
    async fn test_exec_or_fail_success() {
        let output = exec_or_fail(&sh("printf 'a\\n\\nb\\n'"), DEFAULT_COMMAND_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(output, "a\n\nb\n");
    }

    #[tokio::test]
    async fn test_exec_or_fail_failure() {
        let result = exec_or_fail(&sh("echo boom >&2; exit 1"), DEFAULT_COMMAND_TIMEOUT).await;
        match result {
            Err(MonitorError::ShellCommandFailed {
                exit_code, output, ..
            }) => {
                assert_eq!(exit_code, 1);
                assert_eq!(output, "boom");
            }
            other => panic!("Expected ShellCommandFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_exec_or_fail_sudo_denial() {
        let result = exec_or_fail(
            &sh("echo 'sudo: a password is required' >&2; exit 1"),
            DEFAULT_COMMAND_TIMEOUT,
        )
        .await;
        assert!(matches!(result, Err(MonitorError::PermissionDenied { .. })));
    }
}
