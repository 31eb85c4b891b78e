//! Test fixtures for `ovs-vsctl list Port` output
//!
//! Renders records the way `ovs-vsctl` prints them: column names padded to
//! twenty characters, one blank line between records.

/// Width `ovs-vsctl` pads column names to
const COLUMN_WIDTH: usize = 20;

/// One OVS port, rendered as a `list Port` record
#[derive(Debug, Clone)]
pub struct PortFixture {
    name: String,
    tag: Option<u16>,
    trunks: Vec<u16>,
    vlan_mode: Option<String>,
    extra: Vec<(String, String)>,
}

impl PortFixture {
    /// Port with no VLAN configuration
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: None,
            trunks: Vec::new(),
            vlan_mode: None,
            extra: Vec::new(),
        }
    }

    /// Access port on `tag`
    pub fn access(name: impl Into<String>, tag: u16) -> Self {
        Self::plain(name).with_tag(tag).with_vlan_mode("access")
    }

    /// Trunk port carrying `vlans`
    pub fn trunk(name: impl Into<String>, vlans: &[u16]) -> Self {
        Self::plain(name).with_trunks(vlans).with_vlan_mode("trunk")
    }

    /// Set the access VLAN
    pub fn with_tag(mut self, tag: u16) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Set the trunk VLAN list
    pub fn with_trunks(mut self, vlans: &[u16]) -> Self {
        self.trunks = vlans.to_vec();
        self
    }

    /// Set the `vlan_mode` column
    pub fn with_vlan_mode(mut self, mode: impl Into<String>) -> Self {
        self.vlan_mode = Some(mode.into());
        self
    }

    /// Append an arbitrary column after the standard ones
    pub fn with_field(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((column.into(), value.into()));
        self
    }

    /// True when the port carries a tag or trunk list
    pub fn has_vlan(&self) -> bool {
        self.tag.is_some() || !self.trunks.is_empty()
    }

    /// Render as `ovs-vsctl list Port` prints one record (no trailing newline)
    pub fn render(&self) -> String {
        let uuid = fake_uuid(&self.name);
        let tag = self
            .tag
            .map(|t| t.to_string())
            .unwrap_or_else(|| "[]".to_string());
        let trunks = format!(
            "[{}]",
            self.trunks
                .iter()
                .map(u16::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        let vlan_mode = self.vlan_mode.clone().unwrap_or_else(|| "[]".to_string());

        let mut columns: Vec<(String, String)> = vec![
            ("_uuid".into(), uuid.clone()),
            ("bond_active_slave".into(), "[]".into()),
            ("bond_mode".into(), "[]".into()),
            ("cvlans".into(), "[]".into()),
            ("external_ids".into(), "{}".into()),
            ("fake_bridge".into(), "false".into()),
            ("interfaces".into(), format!("[{}]", uuid)),
            ("lacp".into(), "[]".into()),
            ("mac".into(), "[]".into()),
            ("name".into(), format!("\"{}\"", self.name)),
            ("other_config".into(), "{}".into()),
            ("protected".into(), "false".into()),
            ("qos".into(), "[]".into()),
            ("statistics".into(), "{}".into()),
            ("status".into(), "{}".into()),
            ("tag".into(), tag),
            ("trunks".into(), trunks),
            ("vlan_mode".into(), vlan_mode),
        ];
        columns.extend(self.extra.iter().cloned());

        columns
            .iter()
            .map(|(column, value)| format!("{:<width$}: {}", column, value, width = COLUMN_WIDTH))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render a full listing; records separated by one blank line, trailing newline
pub fn port_listing(ports: &[PortFixture]) -> String {
    if ports.is_empty() {
        return String::new();
    }
    let mut out = ports
        .iter()
        .map(PortFixture::render)
        .collect::<Vec<_>>()
        .join("\n\n");
    out.push('\n');
    out
}

/// Number of ports with and without VLAN configuration
pub fn expected_counts(ports: &[PortFixture]) -> (u64, u64) {
    let assigned = ports.iter().filter(|p| p.has_vlan()).count() as u64;
    (assigned, ports.len() as u64 - assigned)
}

/// Deterministic uuid-shaped string derived from the port name (FNV-1a)
fn fake_uuid(name: &str) -> String {
    let hash = name
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
            (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
        });
    format!(
        "{:08x}-{:04x}-4{:03x}-8{:03x}-{:012x}",
        hash >> 32,
        (hash >> 16) & 0xffff,
        (hash >> 4) & 0xfff,
        hash & 0xfff,
        hash & 0xffff_ffff_ffff
    )
}

/// Common switch layouts
pub mod switch_fixtures {
    use super::*;

    /// Integration bridge with two access VMs, one trunk uplink and two
    /// untagged ports (bridge internal port and a tunnel)
    pub fn mixed_bridge() -> Vec<PortFixture> {
        vec![
            PortFixture::plain("br-int"),
            PortFixture::access("vnet0", 100),
            PortFixture::access("vnet1", 200),
            PortFixture::trunk("bond0", &[100, 200, 300]),
            PortFixture::plain("vxlan0").with_field("bond_updelay", "0"),
        ]
    }

    /// Freshly created bridge: only its internal port
    pub fn empty_bridge() -> Vec<PortFixture> {
        vec![PortFixture::plain("br0")]
    }

    /// `count` access ports, every `every`-th one left untagged
    pub fn access_ports(count: usize, every: usize) -> Vec<PortFixture> {
        (0..count)
            .map(|i| {
                let name = format!("tap{}", i);
                if every != 0 && i % every == 0 {
                    PortFixture::plain(name)
                } else {
                    PortFixture::access(name, (i % 4094 + 1) as u16)
                }
            })
            .collect()
    }
}
