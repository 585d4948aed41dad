use crate::domain::model::ModelSpec;
use crate::utils::error::{ProvisionError, Result};
use crate::utils::validation::{validate_definition_path, validate_model_name, Validate};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Model variants the nursing assistant backend expects to find on the host.
const DEFAULT_MODELS: &[(&str, &str)] = &[
    ("privnurse-discharge", "/models/discharge.Modelfile"),
    ("privnurse-consultation", "/models/consultation.Modelfile"),
    ("privnurse-nursing-note", "/models/nursing_note.Modelfile"),
];

/// Ordered list of models to provision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    models: Vec<ModelSpec>,
}

#[derive(Debug, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    models: Vec<ModelSpec>,
}

impl Manifest {
    pub fn new(models: Vec<ModelSpec>) -> Self {
        Self { models }
    }

    /// The compiled-in manifest.
    pub fn builtin() -> Self {
        Self::new(
            DEFAULT_MODELS
                .iter()
                .map(|(name, path)| ModelSpec::new(*name, *path))
                .collect(),
        )
    }

    /// 從 TOML 檔案載入 manifest
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ProvisionError::ManifestError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content)?;

        let file: ManifestFile =
            toml::from_str(&processed).map_err(|e| ProvisionError::ManifestError {
                message: format!("TOML parsing error: {}", e),
            })?;

        Ok(Self::new(file.models))
    }

    pub fn models(&self) -> &[ModelSpec] {
        &self.models
    }
}

impl Validate for Manifest {
    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for spec in &self.models {
            validate_model_name(&spec.name)?;
            validate_definition_path(&spec.name, &spec.definition_path)?;

            if !seen.insert(spec.name.as_str()) {
                return Err(ProvisionError::ManifestError {
                    message: format!("duplicate model name '{}'", spec.name),
                });
            }
        }

        Ok(())
    }
}

/// 替換環境變數 (例如 ${MODELS_DIR})，未設定的變數保留原樣
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ProvisionError::ManifestError {
        message: format!("invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}
