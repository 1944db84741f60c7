use serde::{Deserialize, Serialize};

use crate::KeyValue;

/// Environment variables injected into a worker container.
///
/// Internally stored as a list of key–value pairs and serialized as a
/// transparent array wrapper. Order is preserved so that later entries
/// override earlier ones when the container engine applies them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Env(pub Vec<KeyValue>);

impl Env {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of entries, including shadowed duplicates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the environment is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all key–value pairs.
    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
        self.0.iter()
    }

    /// Get the value for a key, returning the last matching entry.
    ///
    /// This gives simple override semantics when merging environments.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|kv| kv.key() == key)
            .map(|kv| kv.value())
    }

    /// Append a key–value pair.
    ///
    /// Later entries override earlier ones when queried via [`Env::get`].
    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.push(KeyValue::new(key, value));
    }

    /// Merge two environments, where entries from `other` override earlier ones.
    ///
    /// Combined by simple concatenation; [`Env::get`] resolves overrides
    /// naturally by scanning from the end.
    pub fn merged(&self, other: &Env) -> Env {
        let mut out = self.0.clone();
        out.extend(other.0.clone());
        Env(out)
    }

    /// Parse newline-separated `KEY=VALUE` lines, as supplied in the
    /// request's `Environment` property. Blank and malformed lines are
    /// skipped.
    pub fn parse_lines(raw: &str) -> Env {
        Env(raw.lines().filter_map(KeyValue::parse).collect())
    }

    /// Render all entries as `KEY=VALUE` strings for the container engine.
    pub fn to_engine_strings(&self) -> Vec<String> {
        self.0.iter().map(KeyValue::to_engine_string).collect()
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Env;

    #[test]
    fn env_new_is_empty() {
        let env = Env::new();
        assert_eq!(env.len(), 0);
        assert!(env.get("FOO").is_none());
    }

    #[test]
    fn env_push_and_override_last_wins() {
        let mut env = Env::new();
        env.push("FOO", "one");
        env.push("BAR", "x");
        env.push("FOO", "two");

        assert_eq!(env.get("FOO"), Some("two"));
        assert_eq!(env.get("BAR"), Some("x"));
        assert!(env.get("BAZ").is_none());
    }

    #[test]
    fn env_merged_other_overrides_base() {
        let base = {
            let mut e = Env::new();
            e.push("GO_SERVER_URL", "https://ci.example.com");
            e.push("FOO", "base");
            e
        };

        let other = {
            let mut e = Env::new();
            e.push("FOO", "override");
            e
        };

        let merged = base.merged(&other);

        assert_eq!(merged.get("GO_SERVER_URL"), Some("https://ci.example.com"));
        assert_eq!(merged.get("FOO"), Some("override"));
    }

    #[test]
    fn parse_lines_skips_malformed_entries() {
        let env = Env::parse_lines("FOO=bar\n\nnot-a-pair\nBAZ=qux=1");

        assert_eq!(env.len(), 2);
        assert_eq!(env.get("FOO"), Some("bar"));
        assert_eq!(env.get("BAZ"), Some("qux=1"));
    }

    #[test]
    fn engine_strings_preserve_order() {
        let mut env = Env::new();
        env.push("A", "1");
        env.push("B", "2");

        assert_eq!(env.to_engine_strings(), vec!["A=1", "B=2"]);
    }

    #[test]
    fn serde_transparent_roundtrip_json() {
        let mut env = Env::new();
        env.push("FOO", "bar");

        let json = serde_json::to_string(&env).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"key\":\"FOO\""));

        let back: Env = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get("FOO"), Some("bar"));
    }
}
