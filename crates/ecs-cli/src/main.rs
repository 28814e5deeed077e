//! ecs-status CLI
//!
//! Prints one colored line per ECS service describing its deployment state:
//! lifecycle status, desired and running task counts, and whether the latest
//! deployment is on the desired task-definition revision.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ecs_client::EcsClient;
use ecs_core::config::{self, ReporterConfig};
use ecs_core::types::service_names;
use ecs_core::{ConfigError, StatusError};
use ecs_status::commands::{self, ReportOptions};
use ecs_status::output::{format_incomplete, print_error, print_warning, ColorMode};

#[derive(Parser)]
#[command(name = "ecs-status")]
#[command(author, version, about = "Colorized deployment status for ECS services")]
struct Cli {
    /// Cluster the services run in
    #[arg(short, long, env = "ECS_STATUS_CLUSTER")]
    cluster: Option<String>,

    /// Suffix appended to every service name (e.g. "-qa")
    #[arg(short, long, allow_hyphen_values = true)]
    suffix: Option<String>,

    /// Comma-separated list of service names
    #[arg(short = 'S', long, required = true)]
    services: String,

    /// AWS region (defaults to the AWS_REGION / profile chain, then us-east-1)
    #[arg(long)]
    region: Option<String>,

    /// Deadline for each describe request, in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = run(cli).await {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Run the report. Fails if any service was not reported.
async fn run(cli: Cli) -> Result<()> {
    let config = config::load_reporter_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let options = report_options(&cli, &config)?;

    let client = EcsClient::load(
        cli.region.as_deref().or(config.region.as_deref()),
        config.endpoint.as_deref(),
    )
    .await?;
    tracing::debug!(
        region = client.region().unwrap_or_default(),
        endpoint = config.endpoint.as_deref().unwrap_or("default"),
        "Client ready"
    );

    let cancel = CancellationToken::new();
    spawn_signal_handler(cancel.clone());

    let mut stdout = std::io::stdout();
    let summary =
        commands::report_command(Arc::new(client), &options, cancel, &mut stdout).await?;

    match format_incomplete(&summary) {
        Some(message) => Err(StatusError::Incomplete(message).into()),
        None => Ok(()),
    }
}

/// Merge flags and configuration into the options for one run
fn report_options(cli: &Cli, config: &ReporterConfig) -> Result<ReportOptions, StatusError> {
    let cluster = cli
        .cluster
        .clone()
        .or_else(|| config.cluster.clone())
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingField("cluster (use --cluster)".to_string()))?;

    let suffix = cli
        .suffix
        .as_deref()
        .or(config.suffix.as_deref())
        .unwrap_or_default();
    let services = service_names(&cli.services, suffix)?;

    let call_timeout = match cli.timeout {
        Some(0) => {
            return Err(ConfigError::Invalid("--timeout must be at least 1 second".to_string()).into())
        }
        Some(secs) => Duration::from_secs(secs),
        None => config.request_timeout,
    };

    Ok(ReportOptions {
        cluster,
        services,
        call_timeout,
        color: ColorMode::detect(cli.no_color),
    })
}

/// Cancel the run on Ctrl+C or SIGTERM
fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, cancelling outstanding requests...");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, cancelling outstanding requests...");
            }
        }

        print_warning("Interrupted, not waiting for outstanding requests");
        cancel.cancel();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecs_core::ServiceName;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["ecs-status"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_override_config() {
        let config = ReporterConfig {
            cluster: Some("from-config".to_string()),
            suffix: Some("-cfg".to_string()),
            ..Default::default()
        };
        let options = report_options(
            &cli(&[
                "--cluster", "qa", "--suffix", "-qa", "--services", "api,web", "--timeout",
                "3", "--no-color",
            ]),
            &config,
        )
        .unwrap();

        assert_eq!(options.cluster, "qa");
        assert_eq!(
            options.services,
            vec![ServiceName::from("api-qa"), ServiceName::from("web-qa")]
        );
        assert_eq!(options.call_timeout, Duration::from_secs(3));
        assert_eq!(options.color, ColorMode::Never);
    }

    #[test]
    fn test_config_fills_missing_flags() {
        let config = ReporterConfig {
            cluster: Some("staging".to_string()),
            suffix: Some("-stg".to_string()),
            request_timeout: Duration::from_secs(9),
            ..Default::default()
        };
        let mut parsed = cli(&["-S", "api", "--no-color"]);
        parsed.cluster = None;
        let options = report_options(&parsed, &config).unwrap();

        assert_eq!(options.cluster, "staging");
        assert_eq!(options.services, vec![ServiceName::from("api-stg")]);
        assert_eq!(options.call_timeout, Duration::from_secs(9));
    }

    #[test]
    fn test_missing_cluster_is_config_error() {
        let mut parsed = cli(&["-S", "api"]);
        // The environment may provide a cluster; this test is about its absence
        parsed.cluster = None;

        let err = report_options(&parsed, &ReporterConfig::default()).unwrap_err();
        assert!(matches!(err, StatusError::Config(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = report_options(
            &cli(&["-c", "qa", "-S", "api", "--timeout", "0"]),
            &ReporterConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, StatusError::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_services_flag_is_required() {
        assert!(Cli::try_parse_from(["ecs-status", "--cluster", "qa"]).is_err());
    }
}
