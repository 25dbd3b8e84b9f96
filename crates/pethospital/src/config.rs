use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL for cached appointment lookups in seconds (default: 30)
    pub appointment_cache_ttl_seconds: u64,
    /// TTL for cached user, pet and veterinarian lookups in seconds (default: 60)
    pub entity_cache_ttl_seconds: u64,
    /// Maximum number of cache entries before LRU eviction (default: 10,000)
    pub cache_max_entries: usize,
    /// Interval between expired-entry sweeps in seconds; 0 disables the sweeper (default: 0)
    pub cache_sweep_interval_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `APPOINTMENT_CACHE_TTL_SECONDS` - Appointment cache TTL (default: 30)
    /// - `ENTITY_CACHE_TTL_SECONDS` - User/pet/veterinarian cache TTL (default: 60)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `CACHE_SWEEP_INTERVAL_SECONDS` - Expired-entry sweep interval, 0 = lazy only (default: 0)
    pub fn from_env() -> Self {
        Self {
            appointment_cache_ttl_seconds: env_or("APPOINTMENT_CACHE_TTL_SECONDS", 30),
            entity_cache_ttl_seconds: env_or("ENTITY_CACHE_TTL_SECONDS", 60),
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", 10_000usize).max(1),
            cache_sweep_interval_seconds: env_or("CACHE_SWEEP_INTERVAL_SECONDS", 0),
        }
    }

    /// Get the appointment cache TTL as a Duration.
    pub fn appointment_ttl(&self) -> Duration {
        Duration::from_secs(self.appointment_cache_ttl_seconds)
    }

    /// Get the user/pet/veterinarian cache TTL as a Duration.
    pub fn entity_ttl(&self) -> Duration {
        Duration::from_secs(self.entity_cache_ttl_seconds)
    }

    /// Get the sweep interval, or `None` when sweeping is disabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.cache_sweep_interval_seconds > 0)
            .then(|| Duration::from_secs(self.cache_sweep_interval_seconds))
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            appointment_cache_ttl_seconds: 30,
            entity_cache_ttl_seconds: 60,
            cache_max_entries: 10_000,
            cache_sweep_interval_seconds: 0,
        }
    }

    #[test]
    fn test_ttl_conversion() {
        let config = config();

        assert_eq!(config.appointment_ttl(), Duration::from_secs(30));
        assert_eq!(config.entity_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_sweep_interval_disabled_at_zero() {
        let mut config = config();
        assert_eq!(config.sweep_interval(), None);

        config.cache_sweep_interval_seconds = 120;
        assert_eq!(config.sweep_interval(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        env::remove_var("APPOINTMENT_CACHE_TTL_SECONDS");
        env::remove_var("ENTITY_CACHE_TTL_SECONDS");
        env::remove_var("CACHE_MAX_ENTRIES");
        env::remove_var("CACHE_SWEEP_INTERVAL_SECONDS");

        let config = Config::from_env();

        assert_eq!(config.appointment_cache_ttl_seconds, 30);
        assert_eq!(config.entity_cache_ttl_seconds, 60);
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.cache_sweep_interval_seconds, 0);
    }
}
