//! ovs-vlanmond - Open vSwitch VLAN port monitor for Netdata
//!
//! Periodically lists the OVS `Port` table with `ovs-vsctl`, classifies each
//! port as VLAN-assigned (a `tag` or `trunks` value is set) or unassigned,
//! and reports both counts as one stacked chart over the Netdata external
//! plugin protocol.

mod chart;
mod classifier;
mod collector;
mod commands;
mod config;
mod daemon;
mod parser;
mod sink;
mod source;
mod tables;
mod types;

pub use chart::*;
pub use classifier::*;
pub use collector::OvsVlanCollector;
pub use commands::*;
pub use config::*;
pub use daemon::{run, RunOptions, RunOutcome};
pub use parser::*;
pub use sink::*;
pub use source::*;
pub use tables::*;
pub use types::*;
