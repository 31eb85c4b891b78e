//! Command builders for OVS queries

use ovs_monitor_common::CommandLine;

use crate::tables::OVS_PORT_TABLE_NAME;

/// Build the port listing command (`ovs-vsctl list Port`)
pub fn build_list_ports_cmd(vsctl: &str, sudo: Option<&str>) -> CommandLine {
    wrap(CommandLine::new(vsctl).args(["list", OVS_PORT_TABLE_NAME]), sudo)
}

/// Build the reachability probe (`ovs-vsctl show`)
pub fn build_probe_cmd(vsctl: &str, sudo: Option<&str>) -> CommandLine {
    wrap(CommandLine::new(vsctl).arg("show"), sudo)
}

fn wrap(cmd: CommandLine, sudo: Option<&str>) -> CommandLine {
    match sudo {
        Some(sudo) => cmd.with_sudo(sudo),
        None => cmd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovs_monitor_common::shell;

    #[test]
    fn test_build_list_ports_cmd_with_sudo() {
        let cmd = build_list_ports_cmd(shell::OVS_VSCTL_CMD, Some(shell::SUDO_CMD));
        assert_eq!(
            cmd.to_string(),
            "/usr/bin/sudo -n /usr/bin/ovs-vsctl list Port"
        );
    }

    #[test]
    fn test_build_list_ports_cmd_without_sudo() {
        let cmd = build_list_ports_cmd("ovs-vsctl", None);
        assert_eq!(cmd.to_string(), "ovs-vsctl list Port");
    }

    #[test]
    fn test_build_probe_cmd() {
        let cmd = build_probe_cmd(shell::OVS_VSCTL_CMD, Some(shell::SUDO_CMD));
        assert_eq!(cmd.to_string(), "/usr/bin/sudo -n /usr/bin/ovs-vsctl show");
        assert_eq!(build_probe_cmd("ovs-vsctl", None).to_string(), "ovs-vsctl show");
    }
}
