use crate::config::Manifest;
use crate::core::provisioner::Provisioner;
use crate::core::readiness::ReadinessGate;
use crate::domain::model::ProvisionReport;
use crate::domain::ports::ModelService;
use crate::utils::error::{ProvisionError, Result};
use std::future::Future;

/// Waits for the model service, then applies the manifest once.
pub struct ProvisionEngine<M: ModelService> {
    service: M,
    gate: ReadinessGate,
    manifest: Manifest,
}

impl<M: ModelService> ProvisionEngine<M> {
    pub fn new(service: M, gate: ReadinessGate, manifest: Manifest) -> Self {
        Self {
            service,
            gate,
            manifest,
        }
    }

    pub fn service(&self) -> &M {
        &self.service
    }

    pub async fn run(&self) -> Result<ProvisionReport> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Races the whole run (gate and pass) against `shutdown`. A gate failure
    /// short-circuits and the manifest is never touched.
    pub async fn run_until<F: Future>(&self, shutdown: F) -> Result<ProvisionReport> {
        tokio::select! {
            result = self.provision() => result,
            _ = shutdown => {
                tracing::warn!("⚠️ Shutdown requested, abandoning provisioning");
                Err(ProvisionError::Cancelled)
            }
        }
    }

    async fn provision(&self) -> Result<ProvisionReport> {
        self.gate.wait_until_ready(&self.service).await?;

        Ok(Provisioner::new(&self.service, &self.manifest).run().await)
    }
}
