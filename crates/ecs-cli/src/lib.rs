//! ecs-status CLI
//!
//! Provides the `ecs-status` command, which reports the deployment state of
//! a list of ECS services as one colored line per service.

pub mod commands;
pub mod output;
