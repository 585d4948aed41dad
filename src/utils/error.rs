use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Manifest error: {message}")]
    ManifestError { message: String },

    #[error("Unsupported model definition: {message}")]
    InvalidDefinition { message: String },

    #[error("Model service not ready after {attempts} attempts")]
    HostUnavailable { attempts: u32 },

    #[error("Failed to create model '{name}': {detail}")]
    CreateFailed { name: String, detail: String },

    #[error("Provisioning cancelled by shutdown signal")]
    Cancelled,
}

impl ProvisionError {
    /// 對應的程序結束碼
    pub fn exit_code(&self) -> i32 {
        match self {
            ProvisionError::Cancelled => 130,
            _ => 1,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ProvisionError::HostUnavailable { .. } => {
                "Check that the model service container is running and OLLAMA_BASE_URL points at it"
            }
            ProvisionError::ConfigError { .. } | ProvisionError::InvalidConfigValueError { .. } => {
                "Review the PROVISION_* and OLLAMA_BASE_URL environment variables"
            }
            ProvisionError::ManifestError { .. } => {
                "Make sure the manifest file exists and is valid TOML with [[models]] entries"
            }
            ProvisionError::CreateFailed { .. } => {
                "Inspect the model service logs; the definition file may reference a missing base model"
            }
            ProvisionError::HttpError(_) => "Check network connectivity to the model service",
            ProvisionError::IoError(_) => "Check file permissions for the definition files",
            ProvisionError::InvalidDefinition { .. } => {
                "Base the definition on a published model (FROM <name>) and drop ADAPTER lines"
            }
            ProvisionError::Cancelled => "Restart the container to run provisioning again",
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ProvisionError::HostUnavailable { attempts: 60 }.exit_code(), 1);
        assert_eq!(
            ProvisionError::ManifestError {
                message: "bad".to_string()
            }
            .exit_code(),
            1
        );
        assert_eq!(ProvisionError::Cancelled.exit_code(), 130);
    }

    #[test]
    fn test_create_failed_message() {
        let err = ProvisionError::CreateFailed {
            name: "gemma3n-discharge".to_string(),
            detail: "HTTP 500".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to create model 'gemma3n-discharge': HTTP 500"
        );
    }

    #[test]
    fn test_invalid_definition_message() {
        let err = ProvisionError::InvalidDefinition {
            message: "ADAPTER needs a local blob upload".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported model definition: ADAPTER needs a local blob upload"
        );
        assert_eq!(err.exit_code(), 1);
    }
}
