//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `EMPLOYEE_*` environment variables and an
//! optional configuration file. Unset values fall back to the defaults
//! exposed by the accessors below.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_MIN_IDLE: u32 = 2;
const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 5;
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 120;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 20;

/// Configuration values for the HTTP server, database and logging.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EMPLOYEE")]
pub struct ServiceSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL connection string. Required.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub db_max_connections: Option<u32>,
    /// Idle connections the pool keeps open.
    pub db_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub db_connect_timeout_secs: Option<u64>,
    /// Seconds a single database round trip may take.
    pub query_timeout_secs: Option<u64>,
    /// Seconds a client has to send the request head.
    pub read_timeout_secs: Option<u64>,
    /// Keep-alive seconds for idle connections.
    pub idle_timeout_secs: Option<u64>,
    /// Grace period for in-flight requests on shutdown.
    pub shutdown_timeout_secs: Option<u64>,
    /// Allowed CORS origin; `*` allows any. CORS is off when unset.
    pub cors_origin: Option<String>,
    /// Emit JSON log lines instead of the human-readable format.
    #[ortho_config(default = true)]
    pub log_json: bool,
    /// Lower the default log level to `debug`.
    #[ortho_config(default = false)]
    pub log_debug: bool,
}

impl ServiceSettings {
    /// Interface to bind.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Port to bind.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Connection string, if configured.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    /// Upper bound on pooled connections.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Idle connections the pool keeps open, capped at the pool size.
    pub fn db_min_idle(&self) -> u32 {
        self.db_min_idle
            .unwrap_or(DEFAULT_DB_MIN_IDLE)
            .min(self.db_max_connections())
    }

    /// Pool checkout timeout.
    pub fn db_connect_timeout(&self) -> Duration {
        secs(self.db_connect_timeout_secs, DEFAULT_DB_CONNECT_TIMEOUT_SECS)
    }

    /// Per round-trip query timeout.
    pub fn query_timeout(&self) -> Duration {
        secs(self.query_timeout_secs, DEFAULT_QUERY_TIMEOUT_SECS)
    }

    /// Client request-head timeout.
    pub fn read_timeout(&self) -> Duration {
        secs(self.read_timeout_secs, DEFAULT_READ_TIMEOUT_SECS)
    }

    /// Keep-alive for idle connections.
    pub fn idle_timeout(&self) -> Duration {
        secs(self.idle_timeout_secs, DEFAULT_IDLE_TIMEOUT_SECS)
    }

    /// Shutdown grace period.
    pub fn shutdown_timeout(&self) -> Duration {
        secs(self.shutdown_timeout_secs, DEFAULT_SHUTDOWN_TIMEOUT_SECS)
    }

    /// CORS origin, if enabled.
    pub fn cors_origin(&self) -> Option<&str> {
        self.cors_origin.as_deref().filter(|origin| !origin.is_empty())
    }
}

fn secs(value: Option<u64>, default: u64) -> Duration {
    Duration::from_secs(value.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 13] = [
        "EMPLOYEE_HOST",
        "EMPLOYEE_PORT",
        "EMPLOYEE_DATABASE_URL",
        "EMPLOYEE_DB_MAX_CONNECTIONS",
        "EMPLOYEE_DB_MIN_IDLE",
        "EMPLOYEE_DB_CONNECT_TIMEOUT_SECS",
        "EMPLOYEE_QUERY_TIMEOUT_SECS",
        "EMPLOYEE_READ_TIMEOUT_SECS",
        "EMPLOYEE_IDLE_TIMEOUT_SECS",
        "EMPLOYEE_SHUTDOWN_TIMEOUT_SECS",
        "EMPLOYEE_CORS_ORIGIN",
        "EMPLOYEE_LOG_JSON",
        "EMPLOYEE_LOG_DEBUG",
    ];

    fn load_from_empty_args() -> ServiceSettings {
        ServiceSettings::load_from_iter([OsString::from("employee-service")])
            .expect("config should load")
    }

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|var| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == var)
                    .map(|(_, value)| (*value).to_owned());
                (*var, value)
            })
            .collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();

        assert_eq!(settings.host(), "0.0.0.0");
        assert_eq!(settings.port(), 3000);
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.db_max_connections(), 10);
        assert_eq!(settings.db_min_idle(), 2);
        assert_eq!(settings.db_connect_timeout(), Duration::from_secs(30));
        assert_eq!(settings.query_timeout(), Duration::from_secs(10));
        assert_eq!(settings.read_timeout(), Duration::from_secs(5));
        assert_eq!(settings.idle_timeout(), Duration::from_secs(120));
        assert_eq!(settings.shutdown_timeout(), Duration::from_secs(20));
        assert_eq!(settings.cors_origin(), None);
        assert!(settings.log_json);
        assert!(!settings.log_debug);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("EMPLOYEE_HOST", "127.0.0.1"),
            ("EMPLOYEE_PORT", "8081"),
            ("EMPLOYEE_DATABASE_URL", "postgres://app@db/employees"),
            ("EMPLOYEE_DB_MAX_CONNECTIONS", "4"),
            ("EMPLOYEE_QUERY_TIMEOUT_SECS", "3"),
            ("EMPLOYEE_CORS_ORIGIN", "https://app.example.com"),
            ("EMPLOYEE_LOG_DEBUG", "true"),
        ]));

        let settings = load_from_empty_args();

        assert_eq!(settings.host(), "127.0.0.1");
        assert_eq!(settings.port(), 8081);
        assert_eq!(settings.database_url(), Some("postgres://app@db/employees"));
        assert_eq!(settings.db_max_connections(), 4);
        assert_eq!(settings.db_min_idle(), 2);
        assert_eq!(settings.query_timeout(), Duration::from_secs(3));
        assert_eq!(settings.cors_origin(), Some("https://app.example.com"));
        assert!(settings.log_debug);
    }

    #[rstest]
    fn min_idle_never_exceeds_pool_size() {
        let _guard = lock_env(env_with(&[
            ("EMPLOYEE_DB_MAX_CONNECTIONS", "1"),
            ("EMPLOYEE_DB_MIN_IDLE", "5"),
        ]));

        assert_eq!(load_from_empty_args().db_min_idle(), 1);
    }

    #[rstest]
    fn blank_database_url_counts_as_missing() {
        let _guard = lock_env(env_with(&[("EMPLOYEE_DATABASE_URL", "  ")]));

        assert_eq!(load_from_empty_args().database_url(), None);
    }
}
