//! Mapping between SDK shapes and ecs-core types

use aws_sdk_ecs::operation::describe_services::DescribeServicesOutput;
use aws_sdk_ecs::types::{Failure, Service};

use ecs_core::types::{
    BatchResult, Deployment, LifecycleStatus, ServiceFailure, ServiceName, ServiceStatus,
};
use ecs_core::DescribeError;

/// Error codes the control plane uses when it rejects the caller's identity
const ACCESS_DENIED_CODES: &[&str] = &[
    "AccessDeniedException",
    "UnrecognizedClientException",
    "InvalidSignatureException",
    "ExpiredTokenException",
    "MissingAuthenticationTokenException",
];

pub(crate) fn batch_result(output: &DescribeServicesOutput) -> BatchResult {
    BatchResult {
        services: output.services().iter().map(service_status).collect(),
        failures: output.failures().iter().map(service_failure).collect(),
    }
}

fn service_status(service: &Service) -> ServiceStatus {
    ServiceStatus {
        name: ServiceName::from(service.service_name().unwrap_or_default()),
        status: LifecycleStatus::from(service.status().unwrap_or_default()),
        desired_count: count(service.desired_count()),
        running_count: count(service.running_count()),
        deployments: service
            .deployments()
            .iter()
            .map(|d| Deployment::new(d.task_definition().unwrap_or_default()))
            .collect(),
        task_definition: service.task_definition().unwrap_or_default().to_string(),
    }
}

fn service_failure(failure: &Failure) -> ServiceFailure {
    ServiceFailure {
        arn: failure.arn().unwrap_or_default().to_string(),
        reason: failure.reason().unwrap_or_default().to_string(),
    }
}

fn count(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Map a service error response to a [`DescribeError`].
///
/// `code` is the error type reported by the control plane, already stripped
/// of any namespace.
pub(crate) fn error_from_code(
    status: u16,
    code: Option<&str>,
    message: Option<&str>,
) -> DescribeError {
    let message = match message.filter(|m| !m.is_empty()) {
        Some(message) => message.to_string(),
        None => format!("HTTP {}", status),
    };

    match code.filter(|c| !c.is_empty()) {
        Some("ServerException") => DescribeError::Server(message),
        Some("ClientException") => DescribeError::Client(message),
        Some("InvalidParameterException") => DescribeError::InvalidParameter(message),
        Some("ClusterNotFoundException") => DescribeError::ClusterNotFound(message),
        Some(code) if ACCESS_DENIED_CODES.contains(&code) => DescribeError::AccessDenied(message),
        Some(code) => DescribeError::Other(format!("{}: {}", code, message)),
        None if status >= 500 => DescribeError::Server(message),
        None => DescribeError::Other(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ecs::types::Deployment as SdkDeployment;
    use ecs_core::types::Category;

    #[test]
    fn test_batch_result_from_output() {
        let output = DescribeServicesOutput::builder()
            .services(
                Service::builder()
                    .service_name("api-qa")
                    .status("ACTIVE")
                    .desired_count(2)
                    .running_count(1)
                    .task_definition("arn:aws:ecs:us-east-1:123456789012:task-definition/api:14")
                    .deployments(
                        SdkDeployment::builder()
                            .status("PRIMARY")
                            .task_definition(
                                "arn:aws:ecs:us-east-1:123456789012:task-definition/api:14",
                            )
                            .build(),
                    )
                    .deployments(
                        SdkDeployment::builder()
                            .status("ACTIVE")
                            .task_definition(
                                "arn:aws:ecs:us-east-1:123456789012:task-definition/api:13",
                            )
                            .build(),
                    )
                    .build(),
            )
            .failures(
                Failure::builder()
                    .arn("arn:aws:ecs:us-east-1:123456789012:service/qa/gone")
                    .reason("MISSING")
                    .build(),
            )
            .build();

        let result = batch_result(&output);

        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].reason, "MISSING");

        let service = &result.services[0];
        assert_eq!(service.name.as_str(), "api-qa");
        assert_eq!(service.status, LifecycleStatus::Active);
        assert_eq!(service.desired_count, 2);
        assert_eq!(service.running_count, 1);
        assert_eq!(service.primary_revision(), "14");
        assert_eq!(service.latest_revision(), Some("14"));
        assert_eq!(
            ecs_core::classify::classify(service).category,
            Category::ActiveNotRunning
        );
    }

    #[test]
    fn test_empty_output() {
        let output = DescribeServicesOutput::builder().build();
        assert!(batch_result(&output).is_empty());
    }

    #[test]
    fn test_negative_counts_clamp_to_zero() {
        assert_eq!(count(-1), 0);
        assert_eq!(count(3), 3);
    }

    #[test]
    fn test_error_codes() {
        let cases = [
            ("ServerException", DescribeError::Server("m".into())),
            ("ClientException", DescribeError::Client("m".into())),
            (
                "InvalidParameterException",
                DescribeError::InvalidParameter("m".into()),
            ),
            (
                "ClusterNotFoundException",
                DescribeError::ClusterNotFound("m".into()),
            ),
            ("AccessDeniedException", DescribeError::AccessDenied("m".into())),
            (
                "UnrecognizedClientException",
                DescribeError::AccessDenied("m".into()),
            ),
            (
                "ExpiredTokenException",
                DescribeError::AccessDenied("m".into()),
            ),
        ];

        for (code, expected) in cases {
            assert_eq!(error_from_code(400, Some(code), Some("m")), expected, "for {}", code);
        }
    }

    #[test]
    fn test_error_without_code() {
        assert_eq!(
            error_from_code(503, None, None),
            DescribeError::Server("HTTP 503".into())
        );
        assert_eq!(
            error_from_code(404, Some(""), Some("")),
            DescribeError::Other("HTTP 404".into())
        );
        assert_eq!(
            error_from_code(400, Some("ThrottlingException"), Some("slow down")),
            DescribeError::Other("ThrottlingException: slow down".into())
        );
    }
}
