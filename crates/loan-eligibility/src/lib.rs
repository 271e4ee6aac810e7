//! Deterministic loan eligibility scoring with an auditable application history.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
