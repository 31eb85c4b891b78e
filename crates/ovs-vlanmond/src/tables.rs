//! OVSDB table and column names read by ovs-vlanmond

/// OVSDB table listing logical switch ports
pub const OVS_PORT_TABLE_NAME: &str = "Port";

/// Column names
pub mod fields {
    /// Port name column
    pub const NAME: &str = "name";

    /// Access VLAN column
    pub const TAG: &str = "tag";

    /// Trunk VLAN set column
    pub const TRUNKS: &str = "trunks";
}

/// Line suffix marking an empty `tag`/`trunks` column
pub const EMPTY_SET_SUFFIX: &str = ": []";
