use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 一個要確保存在於模型服務上的模型變體
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    pub definition_path: String,
}

impl ModelSpec {
    pub fn new(name: impl Into<String>, definition_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition_path: definition_path.into(),
        }
    }
}

/// Result of a remote describe call.
///
/// `Unknown` covers every failure that is not a clean "not found", so callers
/// that only need the boolean view should use [`Existence::is_present`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Existence {
    Present,
    Absent,
    Unknown(String),
}

impl Existence {
    pub fn is_present(&self) -> bool {
        matches!(self, Existence::Present)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    MissingDefinition,
    AlreadyExists,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingDefinition => write!(f, "definition file missing"),
            SkipReason::AlreadyExists => write!(f, "already exists"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Skipped(SkipReason),
    Created,
    CreateFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
    pub spec: ModelSpec,
    pub outcome: Outcome,
}

/// 單次 provisioning pass 的結果，只用於日誌與測試
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub records: Vec<OutcomeRecord>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ProvisionReport {
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Created))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::CreateFailed(_)))
    }

    pub fn outcomes(&self) -> Vec<&Outcome> {
        self.records.iter().map(|r| &r.outcome).collect()
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.outcome)).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    Waiting,
    Ready,
    TimedOut,
}
