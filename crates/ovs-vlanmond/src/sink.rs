//! Metrics sinks
//!
//! [`NetdataSink`] speaks the Netdata external plugin protocol:
//!
//! ```text
//! CHART ovs_vlan.vlan_ports '' 'OVS VLAN Port Assignments' 'ports' 'OVS' 'ovs.vlan_ports' stacked 90000 1 '' 'ovs-vlanmond' 'vlan_ports'
//! DIMENSION 'assigned' 'Assigned' absolute 1 1 ''
//! DIMENSION 'unassigned' 'Unassigned' absolute 1 1 ''
//! BEGIN ovs_vlan.vlan_ports
//! SET assigned = 3
//! SET unassigned = 1
//! END
//! ```
//!
//! Charts are declared once; each successful cycle adds one
//! `BEGIN`/`SET`/`END` block. A cycle without data writes nothing, which the
//! host shows as a gap.

use std::io::Write;

use ovs_monitor_common::{MonResult, MonitorError};

use crate::chart::ChartSet;

/// Plugin name reported in `CHART` lines
pub const PLUGIN_NAME: &str = "ovs-vlanmond";

/// Destination for chart declarations and collected values
pub trait MetricsSink {
    /// Declare every chart and dimension of `charts`
    fn declare(&mut self, charts: &ChartSet) -> MonResult<()>;

    /// Publish one cycle of values for `chart_id`
    fn update(&mut self, charts: &ChartSet, chart_id: &str, values: &[(&str, u64)])
        -> MonResult<()>;

    /// Ask the host to stop running the plugin
    fn disable(&mut self) -> MonResult<()>;
}

/// Writes the Netdata plugin protocol to any writer (stdout in production)
pub struct NetdataSink<W: Write> {
    out: W,
}

impl<W: Write> NetdataSink<W> {
    /// Wrap a writer
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Quote a protocol parameter; single quotes inside are dropped.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', ""))
}

fn unknown_chart(chart_id: &str) -> MonitorError {
    MonitorError::invalid_config("chart", format!("unknown chart '{}'", chart_id))
}

impl<W: Write> MetricsSink for NetdataSink<W> {
    fn declare(&mut self, charts: &ChartSet) -> MonResult<()> {
        for (index, chart) in charts.charts.iter().enumerate() {
            writeln!(
                self.out,
                "CHART {} '' {} {} {} {} {} {} {} '' {} {}",
                charts.full_id(chart),
                quote(&chart.title),
                quote(&chart.units),
                quote(&chart.family),
                quote(&chart.context),
                chart.chart_type.as_str(),
                charts.chart_priority(index),
                charts.update_every,
                quote(PLUGIN_NAME),
                quote(&chart.id),
            )?;
            for dim in &chart.dimensions {
                writeln!(
                    self.out,
                    "DIMENSION {} {} {} {} {} ''",
                    quote(&dim.id),
                    quote(&dim.name),
                    dim.algorithm.as_str(),
                    dim.multiplier,
                    dim.divisor,
                )?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn update(
        &mut self,
        charts: &ChartSet,
        chart_id: &str,
        values: &[(&str, u64)],
    ) -> MonResult<()> {
        let chart = charts.get(chart_id).ok_or_else(|| unknown_chart(chart_id))?;
        writeln!(self.out, "BEGIN {}", charts.full_id(chart))?;
        for (id, value) in values {
            writeln!(self.out, "SET {} = {}", id, value)?;
        }
        writeln!(self.out, "END")?;
        self.out.flush()?;
        Ok(())
    }

    fn disable(&mut self) -> MonResult<()> {
        writeln!(self.out, "DISABLE")?;
        self.out.flush()?;
        Ok(())
    }
}

/// What a [`MemorySink`] was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    /// Charts declared, by id
    Declared(Vec<String>),
    /// Values published for a chart
    Updated {
        chart: String,
        values: Vec<(String, u64)>,
    },
    /// Plugin disabled
    Disabled,
}

/// Records sink calls in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Vec<SinkEvent>,
}

impl MemorySink {
    /// An empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Only the value updates
    pub fn updates(&self) -> Vec<&SinkEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Updated { .. }))
            .collect()
    }
}

impl MetricsSink for MemorySink {
    fn declare(&mut self, charts: &ChartSet) -> MonResult<()> {
        let ids = charts.order().into_iter().map(str::to_string).collect();
        self.events.push(SinkEvent::Declared(ids));
        Ok(())
    }

    fn update(
        &mut self,
        charts: &ChartSet,
        chart_id: &str,
        values: &[(&str, u64)],
    ) -> MonResult<()> {
        if charts.get(chart_id).is_none() {
            return Err(unknown_chart(chart_id));
        }
        self.events.push(SinkEvent::Updated {
            chart: chart_id.to_string(),
            values: values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        });
        Ok(())
    }

    fn disable(&mut self) -> MonResult<()> {
        self.events.push(SinkEvent::Disabled);
        Ok(())
    }
}
