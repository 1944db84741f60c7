//! Container identity: derived names and ownership labels.
//!
//! Every container this service creates carries the managed label plus
//! the environment and request-key labels. Discovery never trusts local
//! state; it always re-queries the engine by label.

use uuid::Uuid;

use flotilla_model::{LABEL_ENVIRONMENT, LABEL_MANAGED, LABEL_MANAGED_VALUE, LABEL_REQUEST_KEY, Labels};

/// Environment used in names and labels when the request has none.
pub const DEFAULT_ENVIRONMENT: &str = "default";

/// Derive a unique container name for one provisioning request.
///
/// Shape is `flotilla-{environment}-{suffix}` where the environment is
/// sanitized to the engine's name charset and the suffix is a fresh
/// UUID, so collisions with prior or concurrent requests cannot occur.
pub fn derive_name(environment: &str) -> String {
    format!(
        "flotilla-{}-{}",
        sanitize_environment(environment),
        Uuid::new_v4().simple()
    )
}

/// Reduce an environment string to the `[a-zA-Z0-9_.-]` charset the
/// engine accepts in names. Anything else becomes `_`; a blank
/// environment falls back to [`DEFAULT_ENVIRONMENT`].
pub fn sanitize_environment(environment: &str) -> String {
    let trimmed = environment.trim();
    if trimmed.is_empty() {
        return DEFAULT_ENVIRONMENT.to_string();
    }
    trimmed
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Full label set stamped onto a created container.
pub fn ownership_labels(environment: &str, request_key: &str) -> Labels {
    let mut labels = managed_filter();
    labels.insert(LABEL_ENVIRONMENT, sanitize_environment(environment));
    labels.insert(LABEL_REQUEST_KEY, request_key);
    labels
}

/// Label filter matching every container this service manages,
/// and nothing else on a shared engine.
pub fn managed_filter() -> Labels {
    let mut labels = Labels::new();
    labels.insert(LABEL_MANAGED, LABEL_MANAGED_VALUE);
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_names_are_unique_per_call() {
        let a = derive_name("prod");
        let b = derive_name("prod");
        assert_ne!(a, b);
        assert!(a.starts_with("flotilla-prod-"));
    }

    #[test]
    fn derived_names_stay_in_the_engine_charset() {
        let name = derive_name("QA env/west");
        assert!(
            name.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        );
    }

    #[test]
    fn blank_environment_falls_back_to_default() {
        assert_eq!(sanitize_environment(""), "default");
        assert_eq!(sanitize_environment("   "), "default");
    }

    #[test]
    fn sanitize_replaces_out_of_charset_characters() {
        assert_eq!(sanitize_environment("QA env/west"), "QA_env_west");
        assert_eq!(sanitize_environment("prod-1.eu_x"), "prod-1.eu_x");
    }

    #[test]
    fn ownership_labels_carry_all_three_markers() {
        let labels = ownership_labels("prod", "key-42");
        assert_eq!(labels.get(LABEL_MANAGED), Some(LABEL_MANAGED_VALUE));
        assert_eq!(labels.get(LABEL_ENVIRONMENT), Some("prod"));
        assert_eq!(labels.get(LABEL_REQUEST_KEY), Some("key-42"));
    }

    #[test]
    fn managed_filter_matches_ownership_labels() {
        let owned = ownership_labels("prod", "key-42");
        assert!(owned.contains_all(&managed_filter()));
    }
}
