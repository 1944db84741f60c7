//! Admission decision for new containers.
//!
//! The count is always taken from a fresh engine query and compared to
//! the configured ceiling. The check is a soft limit: two concurrent
//! requests can both observe `current < limit` and both be admitted, so
//! the fleet may briefly exceed the ceiling by the number of in-flight
//! creations. The reaper pulls it back down.

use flotilla_model::FleetSettings;

use crate::error::{FleetError, FleetResult};

/// Admit or refuse one more container given the current fleet size.
pub fn admit(current: usize, settings: &FleetSettings) -> FleetResult<()> {
    if current >= settings.max_containers {
        return Err(FleetError::CapacityExceeded {
            current,
            limit: settings.max_containers,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(max: usize) -> FleetSettings {
        FleetSettings {
            go_server_url: "https://ci.example.com".to_string(),
            docker_uri: "unix:///var/run/docker.sock".to_string(),
            ca_cert: None,
            client_cert: None,
            client_key: None,
            max_containers: max,
            auto_register_timeout_minutes: 10,
            registry: None,
        }
    }

    #[test]
    fn admits_below_the_limit() {
        assert!(admit(0, &settings(1)).is_ok());
        assert!(admit(4, &settings(5)).is_ok());
    }

    #[test]
    fn refuses_at_the_limit() {
        let err = admit(5, &settings(5)).unwrap_err();
        assert!(matches!(
            err,
            FleetError::CapacityExceeded {
                current: 5,
                limit: 5
            }
        ));
    }

    #[test]
    fn refuses_above_the_limit() {
        // Overshoot from the soft-limit race still refuses new work.
        assert!(admit(7, &settings(5)).is_err());
    }
}
