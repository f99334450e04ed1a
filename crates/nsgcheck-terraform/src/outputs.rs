use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::OutputError;
use crate::source::OutputSource;

/// Parsed `terraform output -json` envelope: `{ key: { "value": … } }`.
///
/// Map entries whose values are not plain strings (lists, nested objects)
/// are re-encoded as compact JSON, which is how composite identifiers like
/// `["rg/vnet/subnet1"]` reach the checker.
#[derive(Debug, Clone)]
pub struct ParsedOutputs {
    root: Value,
}

impl ParsedOutputs {
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn from_json_str(s: &str) -> Result<Self, OutputError> {
        let root: Value = serde_json::from_str(s.trim())?;
        Ok(Self { root })
    }

    /// Load a saved `terraform output -json > outputs.json` snapshot.
    pub fn from_file(path: &Path) -> Result<Self, OutputError> {
        let content = std::fs::read_to_string(path).map_err(|e| OutputError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }

    fn entry<'a>(&'a self, key: &str) -> Result<&'a Value, OutputError> {
        self.root
            .get(key)
            .map(|v| v.get("value").unwrap_or(v))
            .ok_or_else(|| OutputError::MissingKey { key: key.to_string() })
    }
}

impl OutputSource for ParsedOutputs {
    fn value(&self, key: &str) -> Result<String, OutputError> {
        let v = self.entry(key)?;
        v.as_str()
            .map(|s| s.to_string())
            .ok_or(OutputError::WrongShape { key: key.to_string(), expected: "string" })
    }

    fn map(&self, key: &str) -> Result<HashMap<String, String>, OutputError> {
        let v = self.entry(key)?;
        let obj = v
            .as_object()
            .ok_or(OutputError::WrongShape { key: key.to_string(), expected: "map" })?;

        let mut out = HashMap::new();
        for (k, entry) in obj {
            let rendered = match entry.as_str() {
                Some(s) => s.to_string(),
                // Composite values (lists, objects) keep their JSON form.
                None => serde_json::to_string(entry)?,
            };
            out.insert(k.clone(), rendered);
        }
        Ok(out)
    }
}
