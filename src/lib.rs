pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::OllamaClient;
pub use config::{Manifest, ProvisionConfig, ServiceEndpoint};
pub use core::{engine::ProvisionEngine, provisioner::Provisioner, readiness::ReadinessGate};
pub use domain::model::{Existence, ModelSpec, Outcome, OutcomeRecord, ProvisionReport, SkipReason};
pub use domain::ports::ModelService;
pub use utils::error::{ProvisionError, Result};
