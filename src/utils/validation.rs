use crate::utils::error::{ProvisionError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn rejected(field: &str, value: &str, reason: impl Into<String>) -> ProvisionError {
    ProvisionError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// The model service root: plain http(s), API paths are joined onto it.
pub fn validate_base_url(field: &str, raw: &str) -> Result<()> {
    let url = Url::parse(raw).map_err(|e| rejected(field, raw, format!("not a URL: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(rejected(
            field,
            raw,
            format!("model service must be http or https, got {}", url.scheme()),
        ));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(rejected(field, raw, "base URL cannot carry a query or fragment"));
    }

    Ok(())
}

/// Names as the model service accepts them, e.g. `privnurse-discharge:latest`.
pub fn validate_model_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(rejected("models.name", name, "model name is empty"));
    }

    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '/')))
    {
        return Err(rejected(
            "models.name",
            name,
            format!("character {:?} is not allowed in a model name", bad),
        ));
    }

    Ok(())
}

pub fn validate_definition_path(model: &str, path: &str) -> Result<()> {
    let field = format!("models.{}.definition_path", model);

    if path.trim().is_empty() {
        return Err(rejected(&field, path, "no definition file given"));
    }
    if path.contains('\0') {
        return Err(rejected(&field, path, "path contains null bytes"));
    }

    Ok(())
}

pub fn validate_min(field: &str, value: u64, min: u64) -> Result<()> {
    if value < min {
        return Err(rejected(
            field,
            &value.to_string(),
            format!("must be at least {}", min),
        ));
    }
    Ok(())
}
