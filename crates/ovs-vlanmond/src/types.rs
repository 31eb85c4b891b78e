//! Type definitions for ovs-vlanmond

use std::fmt;

use crate::parser::parse_field_line;
use crate::tables::fields;

/// One port as printed by `ovs-vsctl list Port`
///
/// Borrows its block from the listing; lives for one collection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRecord<'a> {
    block: &'a str,
}

impl<'a> PortRecord<'a> {
    /// Wrap a record block
    pub fn new(block: &'a str) -> Self {
        Self { block }
    }

    /// True when the block holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.block.trim().is_empty()
    }

    /// Lines of the block, each trimmed
    pub fn lines(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.block.lines().map(str::trim)
    }

    /// `column : value` pairs in listing order; lines without a colon are skipped
    pub fn fields(&self) -> Vec<PortField<'a>> {
        self.lines().filter_map(parse_field_line).collect()
    }

    /// First value of a column
    pub fn field(&self, name: &str) -> Option<&'a str> {
        self.lines()
            .filter_map(parse_field_line)
            .find(|f| f.name == name)
            .map(|f| f.value)
    }

    /// Port name with the surrounding quotes removed
    pub fn name(&self) -> Option<&'a str> {
        self.field(fields::NAME).map(|v| v.trim_matches('"'))
    }
}

/// One `column : value` line of a port record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortField<'a> {
    /// Column name
    pub name: &'a str,
    /// Value text, `[]` when the column is empty
    pub value: &'a str,
}

/// Whether a port carries any VLAN configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VlanAssignment {
    /// `tag` or `trunks` is set
    Assigned,
    /// Neither column is set
    Unassigned,
}

impl VlanAssignment {
    /// Dimension id used for this class
    pub fn as_str(&self) -> &'static str {
        match self {
            VlanAssignment::Assigned => "assigned",
            VlanAssignment::Unassigned => "unassigned",
        }
    }

    /// True for [`VlanAssignment::Assigned`]
    pub fn is_assigned(&self) -> bool {
        matches!(self, VlanAssignment::Assigned)
    }
}

impl From<bool> for VlanAssignment {
    fn from(assigned: bool) -> Self {
        if assigned {
            VlanAssignment::Assigned
        } else {
            VlanAssignment::Unassigned
        }
    }
}

impl fmt::Display for VlanAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-cycle port counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VlanPortCounts {
    /// Ports with a tag or trunk list
    pub assigned: u64,
    /// Ports with neither
    pub unassigned: u64,
}

impl VlanPortCounts {
    /// Create counters from explicit values
    pub fn new(assigned: u64, unassigned: u64) -> Self {
        Self {
            assigned,
            unassigned,
        }
    }

    /// Count one classified port
    pub fn record(&mut self, assignment: VlanAssignment) {
        match assignment {
            VlanAssignment::Assigned => self.assigned += 1,
            VlanAssignment::Unassigned => self.unassigned += 1,
        }
    }

    /// Number of ports counted
    pub fn total(&self) -> u64 {
        self.assigned + self.unassigned
    }

    /// Dimension id / value pairs in chart order
    pub fn values(&self) -> [(&'static str, u64); 2] {
        [
            (VlanAssignment::Assigned.as_str(), self.assigned),
            (VlanAssignment::Unassigned.as_str(), self.unassigned),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = r#"_uuid               : 0f3c5e0c-4b1d-4a7e-9d6a-1f2e3d4c5b6a
name                : "vnet0"
tag                 : 100
trunks              : []
vlan_mode           : []"#;

    #[test]
    fn test_port_record_fields_in_order() {
        let record = PortRecord::new(BLOCK);
        let names: Vec<&str> = record.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["_uuid", "name", "tag", "trunks", "vlan_mode"]);
    }

    #[test]
    fn test_port_record_name_and_field() {
        let record = PortRecord::new(BLOCK);
        assert_eq!(record.name(), Some("vnet0"));
        assert_eq!(record.field(fields::TAG), Some("100"));
        assert_eq!(record.field(fields::TRUNKS), Some("[]"));
        assert_eq!(record.field("qos"), None);
    }

    #[test]
    fn test_port_record_blank() {
        assert!(PortRecord::new("  \n\t ").is_blank());
        assert!(!PortRecord::new(BLOCK).is_blank());
    }

    #[test]
    fn test_port_field_values() {
        let record = PortRecord::new(BLOCK);
        let fields = record.fields();
        assert_eq!(fields[2].value, "100");
        assert_eq!(fields[3].value, "[]");
    }

    #[test]
    fn test_vlan_assignment_from_bool() {
        assert_eq!(VlanAssignment::from(true), VlanAssignment::Assigned);
        assert_eq!(VlanAssignment::from(false), VlanAssignment::Unassigned);
        assert_eq!(VlanAssignment::Assigned.to_string(), "assigned");
        assert!(!VlanAssignment::Unassigned.is_assigned());
    }

    #[test]
    fn test_counts_record_and_total() {
        let mut counts = VlanPortCounts::default();
        counts.record(VlanAssignment::Assigned);
        counts.record(VlanAssignment::Unassigned);
        counts.record(VlanAssignment::Unassigned);
        assert_eq!(counts, VlanPortCounts::new(1, 2));
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.values(), [("assigned", 1), ("unassigned", 2)]);
    }
}
