use crate::utils::error::{ProvisionError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::str::Lines;

/// Structured form of a Modelfile, shaped like the body of `POST /api/create`.
///
/// Only instructions that map onto request fields are supported. `ADAPTER`
/// and `FROM` pointing at local weights would need blob uploads first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelDefinition {
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub license: Vec<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct CreateRequest<'a> {
    pub model: &'a str,
    #[serde(flatten)]
    pub definition: ModelDefinition,
    pub stream: bool,
}

impl ModelDefinition {
    pub fn parse(content: &str) -> Result<Self> {
        let mut definition = ModelDefinition::default();
        let mut from = None;
        let mut lines = content.lines();

        while let Some(line) = lines.next() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (command, rest) = split_word(line);
            if rest.is_empty() {
                return Err(invalid(format!("{} has no value", command)));
            }

            match command.to_ascii_uppercase().as_str() {
                "FROM" => {
                    let base = read_value(rest, &mut lines)?;
                    if is_local_weights(&base) {
                        return Err(invalid(format!(
                            "FROM {} points at local weights, which need a blob upload",
                            base
                        )));
                    }
                    from = Some(base);
                }
                "SYSTEM" => definition.system = Some(read_value(rest, &mut lines)?),
                "TEMPLATE" => definition.template = Some(read_value(rest, &mut lines)?),
                "LICENSE" => definition.license.push(read_value(rest, &mut lines)?),
                "PARAMETER" => {
                    let (key, raw) = split_word(rest);
                    let value = read_value(raw, &mut lines)?;
                    insert_parameter(&mut definition.parameters, key, &value);
                }
                "MESSAGE" => {
                    let (role, raw) = split_word(rest);
                    definition.messages.push(Message {
                        role: role.to_ascii_lowercase(),
                        content: read_value(raw, &mut lines)?,
                    });
                }
                other => {
                    return Err(invalid(format!("unsupported instruction {}", other)));
                }
            }
        }

        definition.from = from.ok_or_else(|| invalid("missing FROM instruction".to_string()))?;
        Ok(definition)
    }
}

fn invalid(message: String) -> ProvisionError {
    ProvisionError::InvalidDefinition { message }
}

fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim_start()),
        None => (s, ""),
    }
}

/// Reads a bare, `"quoted"` or `"""multi-line"""` value.
fn read_value(rest: &str, lines: &mut Lines<'_>) -> Result<String> {
    if let Some(body) = rest.strip_prefix("\"\"\"") {
        if let Some(end) = body.find("\"\"\"") {
            return Ok(body[..end].to_string());
        }

        let mut value = format!("{}\n", body);
        for line in lines.by_ref() {
            if let Some(end) = line.find("\"\"\"") {
                value.push_str(&line[..end]);
                return Ok(value);
            }
            value.push_str(line);
            value.push('\n');
        }
        return Err(invalid("unterminated \"\"\" block".to_string()));
    }

    let rest = rest.trim_end();
    if rest.len() >= 2 && rest.starts_with('"') && rest.ends_with('"') {
        return Ok(rest[1..rest.len() - 1].to_string());
    }
    Ok(rest.to_string())
}

fn is_local_weights(base: &str) -> bool {
    base.starts_with('.')
        || base.starts_with('/')
        || base.starts_with('~')
        || base.ends_with(".gguf")
        || base.ends_with(".safetensors")
}

/// `stop` accumulates into a list; other values keep their JSON type.
fn insert_parameter(parameters: &mut Map<String, Value>, key: &str, raw: &str) {
    if key == "stop" {
        let entry = parameters
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(stops) = entry {
            stops.push(Value::String(raw.to_string()));
        }
        return;
    }

    let value = if let Ok(n) = raw.parse::<i64>() {
        Value::from(n)
    } else if let Ok(f) = raw.parse::<f64>() {
        Value::from(f)
    } else if let Ok(b) = raw.parse::<bool>() {
        Value::Bool(b)
    } else {
        Value::String(raw.to_string())
    };
    parameters.insert(key.to_string(), value);
}
