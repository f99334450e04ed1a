use std::collections::HashMap;

use crate::error::OutputError;

/// Lookup over deployment outputs: single string values and maps of
/// string to string. Implementations hold a preloaded snapshot — lookups
/// never block on the network or a subprocess.
pub trait OutputSource: Send + Sync {
    fn value(&self, key: &str) -> Result<String, OutputError>;
    fn map(&self, key: &str) -> Result<HashMap<String, String>, OutputError>;
}

/// In-memory output source for tests and embedding.
#[derive(Debug, Default)]
pub struct StaticOutputs {
    values: HashMap<String, String>,
    maps: HashMap<String, HashMap<String, String>>,
}

impl StaticOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn with_map(
        mut self,
        key: impl Into<String>,
        entries: &[(&str, &str)],
    ) -> Self {
        let map = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.maps.insert(key.into(), map);
        self
    }
}

impl OutputSource for StaticOutputs {
    fn value(&self, key: &str) -> Result<String, OutputError> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| OutputError::MissingKey { key: key.to_string() })
    }

    fn map(&self, key: &str) -> Result<HashMap<String, String>, OutputError> {
        self.maps
            .get(key)
            .cloned()
            .ok_or_else(|| OutputError::MissingKey { key: key.to_string() })
    }
}
