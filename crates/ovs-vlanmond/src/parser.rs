//! Parser for `ovs-vsctl list` output
//!
//! The listing is a sequence of records separated by one blank line. Each
//! record is a run of `column : value` lines, with the column name padded to
//! a fixed width:
//!
//! ```text
//! name                : "vnet0"
//! tag                 : 100
//! trunks              : []
//!
//! name                : "vnet1"
//! tag                 : []
//! trunks              : [100, 200]
//! ```
//!
//! Nothing here fails. Text that does not follow the layout still yields
//! records (a listing with no blank line is one record) and lines without a
//! colon simply produce no field.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{PortField, PortRecord};

/// Delimiter between two records
pub const RECORD_SEPARATOR: &str = "\n\n";

/// `column : value`; the value may itself contain colons (MACs, external_ids).
static FIELD_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^\s:]+)\s*:\s?(.*)$").expect("Invalid regex pattern"));

/// Split a listing into port records, dropping blank blocks.
pub fn parse_port_table(text: &str) -> Vec<PortRecord<'_>> {
    text.trim()
        .split(RECORD_SEPARATOR)
        .map(PortRecord::new)
        .filter(|record| !record.is_blank())
        .collect()
}

/// Parse a single trimmed attribute line.
pub fn parse_field_line(line: &str) -> Option<PortField<'_>> {
    let caps = FIELD_LINE_RE.captures(line)?;
    let name = caps.get(1)?.as_str();
    let value = caps.get(2)?.as_str().trim_end();
    Some(PortField { name, value })
}
