//! Core trait definitions

mod describer;

pub use describer::ServiceDescriber;
