pub mod engine;
pub mod provisioner;
pub mod readiness;

pub use crate::domain::model::{ModelSpec, Outcome, OutcomeRecord, ProvisionReport, SkipReason};
pub use crate::domain::ports::ModelService;
pub use crate::utils::error::Result;
