use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Boolean flag with explicit enable/disable semantics.
///
/// Also used to parse boolean-like configuration values; unrecognized
/// input is an error rather than silently treated as `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flag(bool);

impl Flag {
    /// Create an enabled flag.
    pub const fn enabled() -> Self {
        Self(true)
    }

    /// Create a disabled flag.
    pub const fn disabled() -> Self {
        Self(false)
    }

    /// Check if the flag is enabled.
    pub const fn is_enabled(&self) -> bool {
        self.0
    }

    /// Check if the flag is disabled.
    pub const fn is_disabled(&self) -> bool {
        !self.0
    }

    /// Get the raw boolean value.
    pub const fn value(&self) -> bool {
        self.0
    }
}

impl Default for Flag {
    fn default() -> Self {
        Self::disabled()
    }
}

impl FromStr for Flag {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Flag::enabled()),
            "false" | "no" | "0" => Ok(Flag::disabled()),
            other => Err(ModelError::InvalidFlag(other.to_string())),
        }
    }
}

impl From<bool> for Flag {
    fn from(b: bool) -> Self {
        Self(b)
    }
}

impl From<Flag> for bool {
    fn from(f: Flag) -> Self {
        f.0
    }
}

#[cfg(test)]
mod tests {
    use super::Flag;

    #[test]
    fn default_is_disabled() {
        let f = Flag::default();
        assert!(f.is_disabled());
        assert!(!f.value());
    }

    #[test]
    fn parses_recognized_boolean_spellings() {
        for s in ["true", "TRUE", " yes ", "1"] {
            let f: Flag = s.parse().unwrap();
            assert!(f.is_enabled(), "expected {s:?} to be enabled");
        }
        for s in ["false", "No", "0"] {
            let f: Flag = s.parse().unwrap();
            assert!(f.is_disabled(), "expected {s:?} to be disabled");
        }
    }

    #[test]
    fn rejects_unrecognized_values() {
        for s in ["", "enabled", "2", "yep"] {
            assert!(s.parse::<Flag>().is_err(), "expected error for {s:?}");
        }
    }

    #[test]
    fn serde_transparent_roundtrip() {
        let f = Flag::disabled();
        let json = serde_json::to_string(&f).unwrap();

        assert_eq!(json, "false");
        let back: Flag = serde_json::from_str(&json).unwrap();
        assert!(back.is_disabled());
    }
}
