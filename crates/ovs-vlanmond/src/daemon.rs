//! Collection loop
//!
//! Startup: health check, then chart declaration. Steady state: one cycle
//! per interval, each awaited to completion before the next tick. Missed
//! ticks are skipped rather than replayed.

use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use ovs_monitor_common::MonResult;

use crate::collector::OvsVlanCollector;
use crate::sink::MetricsSink;
use crate::source::PortSource;

/// How the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Health check failed; the host was told to disable the plugin
    Disabled,
    /// Loop stopped by shutdown or cycle limit
    Stopped {
        /// Cycles run
        cycles: u64,
        /// Cycles that produced no data
        gaps: u64,
    },
}

/// Loop parameters
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Time between cycle starts
    pub interval: Duration,
    /// Stop after this many cycles (`None` runs until shutdown)
    pub max_cycles: Option<u64>,
}

/// Run the plugin until `shutdown` resolves or `max_cycles` is reached
pub async fn run<S, M, F>(
    collector: &OvsVlanCollector<S>,
    sink: &mut M,
    options: RunOptions,
    shutdown: F,
) -> MonResult<RunOutcome>
where
    S: PortSource,
    M: MetricsSink,
    F: Future<Output = ()>,
{
    if !collector.check().await {
        warn!("OVS is not reachable, disabling plugin");
        sink.disable()?;
        return Ok(RunOutcome::Disabled);
    }

    sink.declare(collector.charts())?;
    info!(
        charts = ?collector.charts().order(),
        interval_secs = options.interval.as_secs_f64(),
        "Charts declared, starting collection"
    );

    let mut ticker = interval(options.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut cycles = 0u64;
    let mut gaps = 0u64;

    loop {
        if options.max_cycles.is_some_and(|max| cycles >= max) {
            break;
        }

        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
            _ = ticker.tick() => {
                cycles += 1;
                if collector.run_cycle(sink).await?.is_none() {
                    gaps += 1;
                }
            }
        }
    }

    info!(cycles, gaps, "Collection stopped");
    Ok(RunOutcome::Stopped { cycles, gaps })
}
