//! Report command implementation

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use ecs_core::{
    partition, FanOut, Progress, RunSummary, ServiceDescriber, ServiceName, StatusError,
    MAX_SERVICES_PER_REQUEST,
};

use crate::output::{present, print_error, ColorMode};

/// Inputs for one report run
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub cluster: String,
    pub services: Vec<ServiceName>,
    pub call_timeout: Duration,
    pub color: ColorMode,
}

/// Query every service and write one status line per service to `out`.
///
/// Batches that fail with a recoverable error are reported on stderr and
/// skipped. A fatal error (missing cluster, rejected credentials) stops the
/// run and is returned.
pub async fn report_command<D, W>(
    describer: Arc<D>,
    options: &ReportOptions,
    cancel: CancellationToken,
    out: &mut W,
) -> Result<RunSummary, StatusError>
where
    D: ServiceDescriber + 'static,
    W: Write,
{
    let batches = partition(options.services.clone(), MAX_SERVICES_PER_REQUEST);
    tracing::info!(
        cluster = %options.cluster,
        services = options.services.len(),
        batches = batches.len(),
        "Querying services"
    );

    let fan_out = FanOut::new(describer)
        .with_call_timeout(options.call_timeout)
        .with_cancel_token(cancel);
    let mut stream = fan_out.run(&options.cluster, batches);

    while let Some(progress) = stream.next().await? {
        match progress {
            Progress::Line(line) => present(out, &line, options.color),
            Progress::BatchError {
                batch,
                services,
                error,
            } => {
                print_error(&format!(
                    "Request {} ({} services) failed: {}",
                    batch + 1,
                    services,
                    error
                ));
            }
        }
    }

    Ok(stream.summary())
}
