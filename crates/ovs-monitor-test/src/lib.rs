//! Test infrastructure for OVS monitoring plugins
//!
//! Provides:
//! - Fixtures rendering `ovs-vsctl list Port` output
//! - Parsing and assertions for plugin protocol output

pub mod fixtures;
mod verification;

pub use fixtures::*;
pub use verification::*;
