//! Turning raw service records into presentable status lines

use crate::types::{Category, LifecycleStatus, ServiceFailure, ServiceStatus, StatusLine};

/// Rendered in place of a revision when a service has no deployment
const NO_REVISION: &str = "none";

/// Revision part of a task definition reference.
///
/// Everything after the last `:`, so full ARNs such as
/// `arn:aws:ecs:us-east-1:123:task-definition/api:12` work as well as the
/// short `api:12` form. A reference without any `:` is returned whole.
pub fn revision(task_definition: &str) -> &str {
    match task_definition.rfind(':') {
        Some(idx) => &task_definition[idx + 1..],
        None => task_definition,
    }
}

/// Classify a service and format its status line.
///
/// Rules are checked in order and the first match wins:
/// 1. one deployment on the desired revision with every task running
/// 2. `DEACTIVATING`
/// 3. `INACTIVE` or `STOPPED`
/// 4. everything else, including `ACTIVE` with a count mismatch and `DRAINING`
pub fn classify(service: &ServiceStatus) -> StatusLine {
    let category = if is_converged(service) {
        Category::Healthy
    } else {
        match service.status {
            LifecycleStatus::Deactivating => Category::Transitioning,
            LifecycleStatus::Inactive | LifecycleStatus::Stopped => Category::Stopped,
            LifecycleStatus::Active | LifecycleStatus::Draining | LifecycleStatus::Other(_) => {
                Category::ActiveNotRunning
            }
        }
    };

    StatusLine::new(category, format_service(service))
}

/// Format the line for a service the control plane could not resolve
pub fn classify_failure(failure: &ServiceFailure) -> StatusLine {
    StatusLine::new(
        Category::Unreachable,
        format!(
            "Failure on fetch service info. Arn: {}. Reason: {}",
            failure.arn, failure.reason
        ),
    )
}

fn is_converged(service: &ServiceStatus) -> bool {
    match service.deployments.as_slice() {
        [only] => {
            only.revision() == service.primary_revision()
                && service.desired_count == service.running_count
        }
        _ => false,
    }
}

fn format_service(service: &ServiceStatus) -> String {
    format!(
        "{}: status {}, desired: {}, running: {}, desired revision: {}, latest running revision: {}",
        service.name,
        service.status,
        service.desired_count,
        service.running_count,
        service.primary_revision(),
        service.latest_revision().unwrap_or(NO_REVISION),
    )
}
