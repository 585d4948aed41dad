use crate::config::Manifest;
use crate::domain::model::{
    Existence, ModelSpec, Outcome, OutcomeRecord, ProvisionReport, SkipReason,
};
use crate::domain::ports::ModelService;
use chrono::Utc;
use std::path::Path;

/// Applies a manifest to the model service, one entry at a time.
///
/// A pass never fails as a whole: every entry ends in exactly one
/// [`Outcome`], and a failed create only affects its own entry.
pub struct Provisioner<'a, M: ModelService + ?Sized> {
    service: &'a M,
    manifest: &'a Manifest,
}

impl<'a, M: ModelService + ?Sized> Provisioner<'a, M> {
    pub fn new(service: &'a M, manifest: &'a Manifest) -> Self {
        Self { service, manifest }
    }

    #[tracing::instrument(name = "provisioner", skip_all)]
    pub async fn run(&self) -> ProvisionReport {
        let started_at = Utc::now();
        tracing::info!("🚀 Provisioning {} model(s)", self.manifest.models().len());

        let mut records = Vec::with_capacity(self.manifest.models().len());
        for spec in self.manifest.models() {
            let outcome = self.provision_one(spec).await;
            records.push(OutcomeRecord {
                spec: spec.clone(),
                outcome,
            });
        }

        let report = ProvisionReport {
            records,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "🏁 Provisioning complete: {} created, {} skipped, {} failed ({} ms)",
            report.created(),
            report.skipped(),
            report.failed(),
            (report.finished_at - report.started_at).num_milliseconds()
        );

        report
    }

    async fn provision_one(&self, spec: &ModelSpec) -> Outcome {
        let name = spec.name.as_str();

        if !definition_exists(&spec.definition_path).await {
            tracing::warn!(
                "⚠️ Skipping {}: definition file {} not found",
                name,
                spec.definition_path
            );
            return Outcome::Skipped(SkipReason::MissingDefinition);
        }

        match self.service.lookup(name).await {
            Existence::Present => {
                tracing::info!("⏭️ Skipping {}: already exists", name);
                return Outcome::Skipped(SkipReason::AlreadyExists);
            }
            Existence::Absent => {}
            // 無法判斷時視為不存在，交給 create 決定
            Existence::Unknown(detail) => {
                tracing::warn!(
                    "⚠️ Could not check whether {} exists ({}), attempting create",
                    name,
                    detail
                );
            }
        }

        tracing::info!("📦 Creating {} from {}", name, spec.definition_path);
        match self.service.create(name, &spec.definition_path).await {
            Ok(()) => {
                tracing::info!("✅ Created {}", name);
                Outcome::Created
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to create {}: {}", name, e);
                Outcome::CreateFailed(e.to_string())
            }
        }
    }
}

async fn definition_exists(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }

    tokio::fs::metadata(Path::new(path))
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
