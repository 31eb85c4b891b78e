//! Chart declarations handed to the metrics host
//!
//! A [`ChartSet`] is built once at startup and passed by value to both the
//! collector and the sink; nothing here is global.

use ovs_monitor_common::{MonResult, MonitorError};

use crate::types::VlanAssignment;

/// Chart type prefix (`<type>.<id>`)
pub const CHART_TYPE_ID: &str = "ovs_vlan";

/// VLAN port assignment chart id
pub const VLAN_PORTS_CHART: &str = "vlan_ports";

/// Default dashboard priority
pub const DEFAULT_PRIORITY: u32 = 90000;

/// Default collection interval in seconds
pub const DEFAULT_UPDATE_EVERY: u64 = 1;

/// How the host renders a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartType {
    /// Stacked areas
    Stacked,
}

impl ChartType {
    /// Protocol keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Stacked => "stacked",
        }
    }
}

/// How the host turns collected values into points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Value as collected
    Absolute,
}

impl Algorithm {
    /// Protocol keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Absolute => "absolute",
        }
    }
}

/// One series of a chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    /// Key used in `SET` lines
    pub id: String,
    /// Legend label
    pub name: String,
    /// Value interpretation
    pub algorithm: Algorithm,
    /// Applied before display
    pub multiplier: i64,
    /// Applied before display
    pub divisor: i64,
}

impl Dimension {
    /// An absolute dimension with multiplier and divisor of 1
    pub fn absolute(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            algorithm: Algorithm::Absolute,
            multiplier: 1,
            divisor: 1,
        }
    }
}

/// A chart and its dimensions, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartDefinition {
    /// Chart id within the plugin's type
    pub id: String,
    /// Dashboard title
    pub title: String,
    /// Unit label for the value axis
    pub units: String,
    /// Dashboard menu group
    pub family: String,
    /// Context shared by charts of the same kind across hosts
    pub context: String,
    /// Rendering style
    pub chart_type: ChartType,
    /// Series in declaration order
    pub dimensions: Vec<Dimension>,
}

/// Everything the host needs to lay out the plugin's charts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSet {
    /// Chart type prefix shared by all charts
    pub type_id: String,
    /// Priority of the first chart; later charts follow it
    pub priority: u32,
    /// Collection interval in seconds
    pub update_every: u64,
    /// Charts in display order
    pub charts: Vec<ChartDefinition>,
}

impl ChartSet {
    /// Chart ids in display order
    pub fn order(&self) -> Vec<&str> {
        self.charts.iter().map(|c| c.id.as_str()).collect()
    }

    /// Look up a chart by id
    pub fn get(&self, id: &str) -> Option<&ChartDefinition> {
        self.charts.iter().find(|c| c.id == id)
    }

    /// `<type>.<id>` as the host names the chart
    pub fn full_id(&self, chart: &ChartDefinition) -> String {
        format!("{}.{}", self.type_id, chart.id)
    }

    /// Priority for the chart at `index` in display order
    pub fn chart_priority(&self, index: usize) -> u32 {
        self.priority.saturating_add(index as u32)
    }

    /// Reject sets the host would misrender
    pub fn validate(&self) -> MonResult<()> {
        if self.update_every == 0 {
            return Err(MonitorError::invalid_config(
                "update_every",
                "must be at least 1 second",
            ));
        }
        for (i, chart) in self.charts.iter().enumerate() {
            if self.charts[..i].iter().any(|c| c.id == chart.id) {
                return Err(MonitorError::invalid_config(
                    "charts",
                    format!("duplicate chart id '{}'", chart.id),
                ));
            }
            if chart.dimensions.is_empty() {
                return Err(MonitorError::invalid_config(
                    "charts",
                    format!("chart '{}' has no dimensions", chart.id),
                ));
            }
        }
        Ok(())
    }
}

/// The single VLAN port chart: assigned and unassigned ports, stacked
pub fn vlan_port_charts(priority: u32, update_every: u64) -> ChartSet {
    ChartSet {
        type_id: CHART_TYPE_ID.to_string(),
        priority,
        update_every,
        charts: vec![ChartDefinition {
            id: VLAN_PORTS_CHART.to_string(),
            title: "OVS VLAN Port Assignments".to_string(),
            units: "ports".to_string(),
            family: "OVS".to_string(),
            context: "ovs.vlan_ports".to_string(),
            chart_type: ChartType::Stacked,
            dimensions: vec![
                Dimension::absolute(VlanAssignment::Assigned.as_str(), "Assigned"),
                Dimension::absolute(VlanAssignment::Unassigned.as_str(), "Unassigned"),
            ],
        }],
    }
}

impl Default for ChartSet {
    fn default() -> Self {
        vlan_port_charts(DEFAULT_PRIORITY, DEFAULT_UPDATE_EVERY)
    }
}
