use crate::config::ProvisionConfig;
use crate::domain::model::ReadinessState;
use crate::domain::ports::ModelService;
use crate::utils::error::{ProvisionError, Result};
use std::future::Future;
use std::time::Duration;

/// Polls the model service on a fixed interval until it answers or the
/// attempt budget runs out.
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    poll_interval: Duration,
    max_attempts: u32,
}

impl ReadinessGate {
    /// `max_attempts` is clamped to at least one poll.
    pub fn new(poll_interval: Duration, max_attempts: u32) -> Self {
        Self {
            poll_interval,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_config(config: &ProvisionConfig) -> Self {
        Self::new(config.poll_interval, config.max_attempts)
    }

    /// Blocks until ready without a shutdown hook.
    pub async fn wait_until_ready<M>(&self, service: &M) -> Result<u32>
    where
        M: ModelService + ?Sized,
    {
        self.wait_until_ready_or(service, std::future::pending::<()>())
            .await
    }

    /// Returns the number of polls it took for the service to become ready.
    ///
    /// Both the poll and the sleep between polls race against `shutdown`;
    /// whichever finishes first wins, so a signal is honoured mid-wait.
    #[tracing::instrument(name = "readiness", skip_all)]
    pub async fn wait_until_ready_or<M, F>(&self, service: &M, shutdown: F) -> Result<u32>
    where
        M: ModelService + ?Sized,
        F: Future,
    {
        tokio::pin!(shutdown);

        tracing::info!(
            "⏳ Waiting for model service (every {:?}, up to {} attempts)",
            self.poll_interval,
            self.max_attempts
        );

        let mut attempts = 0u32;

        loop {
            let ready = tokio::select! {
                ready = service.is_ready() => ready,
                _ = &mut shutdown => return Err(ProvisionError::Cancelled),
            };
            attempts += 1;

            match next_state(ready, attempts, self.max_attempts) {
                ReadinessState::Ready => {
                    tracing::info!("✅ Model service ready after {} attempt(s)", attempts);
                    return Ok(attempts);
                }
                ReadinessState::TimedOut => {
                    tracing::error!("❌ Model service not ready after {} attempts", attempts);
                    return Err(ProvisionError::HostUnavailable { attempts });
                }
                ReadinessState::Waiting => {
                    tracing::debug!("Model service not ready (attempt {})", attempts);
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = &mut shutdown => return Err(ProvisionError::Cancelled),
            }
        }
    }
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::from_config(&ProvisionConfig::default())
    }
}

fn next_state(ready: bool, attempts: u32, max_attempts: u32) -> ReadinessState {
    if ready {
        ReadinessState::Ready
    } else if attempts >= max_attempts {
        ReadinessState::TimedOut
    } else {
        ReadinessState::Waiting
    }
}
