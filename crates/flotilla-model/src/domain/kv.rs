use serde::{Deserialize, Serialize};

/// Key–value pair used for container environment variables.
///
/// Both fields are plain UTF-8 strings with no validation applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValue {
    /// Name of the variable.
    key: String,
    /// Value associated with the key.
    value: String,
}

impl KeyValue {
    /// Create a new key–value pair.
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parse a `KEY=VALUE` line.
    ///
    /// The value may itself contain `=`; only the first one splits.
    /// Returns `None` for lines without a `=` or with an empty key.
    pub fn parse(line: &str) -> Option<Self> {
        let (key, value) = line.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key, value))
    }

    /// Get the key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Render as the `KEY=VALUE` form expected by the container engine.
    pub fn to_engine_string(&self) -> String {
        format!("{}={}", self.key, self.value)
    }
}

impl From<(String, String)> for KeyValue {
    fn from((key, value): (String, String)) -> Self {
        Self { key, value }
    }
}

impl From<(&str, &str)> for KeyValue {
    fn from((key, value): (&str, &str)) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}
