//! VLAN classification of port records
//!
//! A port is assigned when a `tag` or `trunks` line is present and does not
//! end with the empty-set marker `": []"`. Any one such line is enough.
//! Ports with neither line are unassigned.

use crate::parser::parse_port_table;
use crate::tables::{fields, EMPTY_SET_SUFFIX};
use crate::types::{PortRecord, VlanAssignment, VlanPortCounts};

/// Classify a whole `ovs-vsctl list Port` listing.
///
/// Always returns both counters; an empty listing gives `{0, 0}`.
pub fn classify(text: &str) -> VlanPortCounts {
    classify_records(&parse_port_table(text))
}

/// Count already-split records.
pub fn classify_records(records: &[PortRecord<'_>]) -> VlanPortCounts {
    let mut counts = VlanPortCounts::default();
    for record in records.iter().filter(|r| !r.is_blank()) {
        counts.record(classify_record(record));
    }
    counts
}

/// Classify one port.
pub fn classify_record(record: &PortRecord<'_>) -> VlanAssignment {
    record.lines().any(line_assigns_vlan).into()
}

/// Names of the ports in `records` that carry VLAN configuration.
pub fn assigned_port_names<'a>(records: &[PortRecord<'a>]) -> Vec<&'a str> {
    records
        .iter()
        .filter(|r| classify_record(r).is_assigned())
        .filter_map(|r| r.name())
        .collect()
}

fn line_assigns_vlan(line: &str) -> bool {
    (line.starts_with(fields::TAG) || line.starts_with(fields::TRUNKS))
        && !line.ends_with(EMPTY_SET_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(lines: &[&str]) -> String {
        lines.join("\n")
    }

    #[test]
    fn test_tag_only_is_assigned() {
        let text = port(&["name                : \"p1\"", "tag                 : 100"]);
        assert_eq!(classify(&text), VlanPortCounts::new(1, 0));
    }

    #[test]
    fn test_empty_tag_and_trunks_is_unassigned() {
        let text = port(&["tag                 : []", "trunks              : []"]);
        assert_eq!(classify(&text), VlanPortCounts::new(0, 1));
    }

    #[test]
    fn test_no_vlan_lines_is_unassigned() {
        let text = port(&["name                : \"br-int\"", "qos                 : []"]);
        assert_eq!(classify(&text), VlanPortCounts::new(0, 1));
    }

    #[test]
    fn test_trunks_alone_assigns() {
        let text = port(&["tag                 : []", "trunks              : [100, 200]"]);
        assert_eq!(classify(&text), VlanPortCounts::new(1, 0));
    }

    #[test]
    fn test_repeated_lines_are_or_not_count() {
        let text = port(&["tag : 10", "tag : 20", "trunks : [1, 2]", "trunks : []"]);
        assert_eq!(classify(&text), VlanPortCounts::new(1, 0));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(classify(""), VlanPortCounts::new(0, 0));
        assert_eq!(classify(" \n\n\t\n"), VlanPortCounts::new(0, 0));
    }

    #[test]
    fn test_indented_lines_are_trimmed() {
        let text = "    tag                 : 5   \n";
        assert_eq!(classify(text), VlanPortCounts::new(1, 0));
    }

    #[test]
    fn test_counts_sum_to_block_count() {
        let blocks = [
            "tag : 1",
            "tag : []",
            "trunks : [3]",
            "name : \"x\"",
            "tag : []\ntrunks : []",
        ];
        let counts = classify(&blocks.join("\n\n"));
        assert_eq!(counts.total(), blocks.len() as u64);
        assert_eq!(counts, VlanPortCounts::new(2, 3));
    }

    #[test]
    fn test_missing_separator_degrades_to_one_block() {
        let text = "name : \"a\"\ntag : 1\nname : \"b\"\ntag : []";
        assert_eq!(classify(text), VlanPortCounts::new(1, 0));
    }

    #[test]
    fn test_assigned_port_names() {
        let text = "name : \"a\"\ntag : 1\n\nname : \"b\"\ntag : []\n\nname : \"c\"\ntrunks : [7]";
        let records = parse_port_table(text);
        assert_eq!(assigned_port_names(&records), vec!["a", "c"]);
    }
}
