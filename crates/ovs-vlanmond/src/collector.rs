//! OvsVlanCollector - health check and per-cycle VLAN port collection

use tracing::{debug, error, info, instrument};

use ovs_monitor_common::MonResult;

use crate::chart::{ChartSet, VLAN_PORTS_CHART};
use crate::classifier::{assigned_port_names, classify_records};
use crate::parser::parse_port_table;
use crate::sink::MetricsSink;
use crate::source::PortSource;
use crate::types::VlanPortCounts;

/// Collects VLAN port counters from a [`PortSource`]
///
/// Collection flow:
/// 1. `check()` once at startup; `false` means the host should disable us
/// 2. `get_data()` every interval; `None` means no data this cycle
///
/// Every failure is logged and turned into `false`/`None` here.
pub struct OvsVlanCollector<S: PortSource> {
    source: S,
    charts: ChartSet,
}

impl<S: PortSource> OvsVlanCollector<S> {
    /// Creates a collector over `source` publishing to `charts`
    pub fn new(source: S, charts: ChartSet) -> Self {
        Self { source, charts }
    }

    /// Chart declarations for the host
    pub fn charts(&self) -> &ChartSet {
        &self.charts
    }

    /// Check that OVS answers through the configured privilege path
    #[instrument(skip(self))]
    pub async fn check(&self) -> bool {
        match self.source.probe().await {
            Ok(()) => {
                info!("OVS VLAN plugin check passed");
                true
            }
            Err(e) => {
                error!(error = %e, kind = e.kind(), "OVS VLAN plugin check failed");
                false
            }
        }
    }

    /// Fetch the raw port listing, logging the cause on failure
    pub async fn fetch(&self) -> Option<String> {
        match self.source.list_ports().await {
            Ok(text) => Some(text),
            Err(e) => {
                error!(error = %e, kind = e.kind(), "Failed to list OVS ports");
                None
            }
        }
    }

    /// Collect one cycle of counters
    ///
    /// Returns `None` when the listing could not be fetched; never zero
    /// counters in place of a failure.
    #[instrument(skip(self))]
    pub async fn get_data(&self) -> Option<VlanPortCounts> {
        let text = self.fetch().await?;
        let records = parse_port_table(&text);
        let counts = classify_records(&records);

        debug!(
            assigned = counts.assigned,
            unassigned = counts.unassigned,
            assigned_ports = ?assigned_port_names(&records),
            "Updating OVS VLAN ports chart"
        );

        Some(counts)
    }

    /// Collect one cycle and publish it to `sink`
    ///
    /// A cycle without data publishes nothing. Only sink errors are returned.
    pub async fn run_cycle<M: MetricsSink>(&self, sink: &mut M) -> MonResult<Option<VlanPortCounts>> {
        let Some(counts) = self.get_data().await else {
            return Ok(None);
        };
        sink.update(&self.charts, VLAN_PORTS_CHART, &counts.values())?;
        Ok(Some(counts))
    }
}
