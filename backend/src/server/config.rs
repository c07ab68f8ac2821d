//! HTTP server configuration object and helpers.

use std::time::Duration;

use employee_service::settings::ServiceSettings;

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: (String, u16),
    pub(crate) read_timeout: Duration,
    pub(crate) idle_timeout: Duration,
    pub(crate) shutdown_timeout: Duration,
    pub(crate) cors_origin: Option<String>,
}

impl ServerConfig {
    /// Configuration binding `bind_addr` with the default timeouts.
    #[must_use]
    pub fn new(bind_addr: (String, u16)) -> Self {
        Self {
            bind_addr,
            read_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(120),
            shutdown_timeout: Duration::from_secs(20),
            cors_origin: None,
        }
    }

    /// Derive the server configuration from loaded settings.
    #[must_use]
    pub fn from_settings(settings: &ServiceSettings) -> Self {
        Self::new((settings.host().to_owned(), settings.port()))
            .with_timeouts(
                settings.read_timeout(),
                settings.idle_timeout(),
                settings.shutdown_timeout(),
            )
            .with_cors_origin(settings.cors_origin().map(str::to_owned))
    }

    /// Override the read, keep-alive and shutdown timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, read: Duration, idle: Duration, shutdown: Duration) -> Self {
        self.read_timeout = read;
        self.idle_timeout = idle;
        self.shutdown_timeout = shutdown;
        self
    }

    /// Enable CORS on the employee routes for `origin`.
    #[must_use]
    pub fn with_cors_origin(mut self, origin: Option<String>) -> Self {
        self.cors_origin = origin;
        self
    }

    /// CORS origin, if enabled.
    #[must_use]
    pub fn cors_origin(&self) -> Option<&str> {
        self.cors_origin.as_deref()
    }
}
