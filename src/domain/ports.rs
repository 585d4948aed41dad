use crate::domain::model::Existence;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Operations against the remote model-serving host.
#[async_trait]
pub trait ModelService: Send + Sync {
    /// True iff a lightweight listing call succeeds. Never errors.
    async fn is_ready(&self) -> bool;

    async fn lookup(&self, name: &str) -> Existence;

    /// Boolean view of [`ModelService::lookup`]: "not found" and errors are both `false`.
    async fn exists(&self, name: &str) -> bool {
        self.lookup(name).await.is_present()
    }

    async fn create(&self, name: &str, definition_path: &str) -> Result<()>;
}
