//! ovs-vlanmond - OVS VLAN port monitor
//!
//! Entry point for the plugin. Netdata starts it with the update interval as
//! the first argument and reads the chart protocol from stdout; logs go to
//! stderr.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use ovs_vlanmond::{
    run, NetdataSink, OvsVlanCollector, OvsVsctlSource, PluginConfig, RunOptions, RunOutcome,
    DEFAULT_CONFIG_PATH,
};

/// Reports VLAN-assigned and unassigned Open vSwitch ports to Netdata
#[derive(Debug, Parser)]
#[command(name = "ovs-vlanmond", version)]
struct Cli {
    /// Seconds between collections; overrides the config file
    update_every: Option<u64>,

    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Collect a single cycle and exit
    #[arg(long)]
    once: bool,
}

/// Builds the log filter from `RUST_LOG` (default `info`); `--debug` raises
/// the global level to `debug` on top of whatever `RUST_LOG` selects.
fn log_filter(debug: bool, env: Option<&str>) -> EnvFilter {
    let filter = env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    if debug {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    }
}

/// Initializes tracing/logging subsystem on stderr
fn init_logging(debug: bool) -> anyhow::Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(debug, env.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set tracing subscriber: {}", e))
}

fn load_config(cli: &Cli) -> anyhow::Result<PluginConfig> {
    let mut config = PluginConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(update_every) = cli.update_every {
        config.collector.update_every = update_every;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn run_plugin(cli: Cli) -> anyhow::Result<RunOutcome> {
    let config = load_config(&cli)?;
    let charts = config.charts();
    charts.validate().context("invalid chart declarations")?;
    let collector = OvsVlanCollector::new(OvsVsctlSource::from_config(&config.ovs), charts);
    let mut sink = NetdataSink::new(std::io::stdout());

    let options = RunOptions {
        interval: config.update_interval(),
        max_cycles: cli.once.then_some(1),
    };

    info!(
        update_every = config.collector.update_every,
        vsctl = %config.ovs.vsctl_path,
        sudo = config.ovs.use_sudo,
        "--- Starting ovs-vlanmond ---"
    );

    run(&collector, &mut sink, options, shutdown_signal())
        .await
        .context("writing to metrics host")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.debug) {
        eprintln!("ovs-vlanmond: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run_plugin(cli).await {
        Ok(RunOutcome::Disabled) => {
            info!("ovs-vlanmond disabled by failed health check");
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Stopped { cycles, gaps }) => {
            info!(cycles, gaps, "ovs-vlanmond exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %format!("{:#}", e), "ovs-vlanmond exiting with error");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_positional_interval() {
        let cli = Cli::parse_from(["ovs-vlanmond", "5"]);
        assert_eq!(cli.update_every, Some(5));
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(!cli.once);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["ovs-vlanmond", "--config", "/tmp/x.conf", "--debug", "--once"]);
        assert_eq!(cli.update_every, None);
        assert_eq!(cli.config, PathBuf::from("/tmp/x.conf"));
        assert!(cli.debug);
        assert!(cli.once);
    }

    #[test]
    fn test_load_config_cli_overrides_interval() {
        let cli = Cli::parse_from(["ovs-vlanmond", "7", "--config", "/nonexistent/ovs_vlan.conf"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.collector.update_every, 7);
    }

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter(false, None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(true, None).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_log_filter_debug_overrides_rust_log() {
        assert_eq!(log_filter(false, Some("warn")).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(true, Some("warn")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            log_filter(true, Some("ovs_vlanmond=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn test_load_config_charts_validate() {
        let cli = Cli::parse_from(["ovs-vlanmond", "--config", "/nonexistent/ovs_vlan.conf"]);
        let config = load_config(&cli).unwrap();
        assert!(config.charts().validate().is_ok());
    }

    #[test]
    fn test_load_config_rejects_zero_interval() {
        let cli = Cli::parse_from(["ovs-vlanmond", "0", "--config", "/nonexistent/ovs_vlan.conf"]);
        assert!(load_config(&cli).is_err());
    }
}
