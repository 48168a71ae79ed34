use std::time::Duration;

/// Named preset for the size and length of a run
#[derive(Debug, Clone, PartialEq)]
pub struct LoadProfile {
    pub name: &'static str,
    pub users: usize,
    pub spawn_rate: f64,
    /// `None` runs until interrupted
    pub duration: Option<Duration>,
}

/// Get load profile by name
pub fn get_load_profile(profile: &str) -> LoadProfile {
    match profile {
        "smoke" => smoke_profile(),
        "default" => default_profile(),
        "stress" => stress_profile(),
        _ => {
            tracing::warn!("Unknown profile '{}', using 'default' profile", profile);
            default_profile()
        }
    }
}

/// Smoke profile for checking a deployment responds
///
/// - 1 user
/// - spawned at 1 user/sec
/// - 30 second run
pub fn smoke_profile() -> LoadProfile {
    LoadProfile {
        name: "smoke",
        users: 1,
        spawn_rate: 1.0,
        duration: Some(Duration::from_secs(30)),
    }
}

/// Default profile
///
/// - 10 users
/// - spawned at 2 users/sec
/// - 60 second run
pub fn default_profile() -> LoadProfile {
    LoadProfile {
        name: "default",
        users: 10,
        spawn_rate: 2.0,
        duration: Some(Duration::from_secs(60)),
    }
}

/// Stress profile for finding the server's limits
///
/// - 200 users
/// - spawned at 20 users/sec
/// - 5 minute run
pub fn stress_profile() -> LoadProfile {
    LoadProfile {
        name: "stress",
        users: 200,
        spawn_rate: 20.0,
        duration: Some(Duration::from_secs(300)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_profiles() {
        assert_eq!(get_load_profile("smoke").users, 1);
        assert_eq!(get_load_profile("stress").spawn_rate, 20.0);
        assert_eq!(
            get_load_profile("default").duration,
            Some(Duration::from_secs(60))
        );
    }

    #[test]
    fn test_unknown_profile_falls_back_to_default() {
        assert_eq!(get_load_profile("turbo"), default_profile());
    }
}
