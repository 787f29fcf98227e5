use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Shared secret authorizing the `/cron/reminders` endpoint.
    pub cron_secret: String,
    /// Fallback studio timezone used when the config table has not been
    /// seeded yet (IANA name).
    pub studio_timezone: chrono_tz::Tz,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `CRON_SECRET`          | **required**            |
    /// | `STUDIO_TIMEZONE`      | `Europe/Brussels`       |
    ///
    /// # Panics
    ///
    /// Panics on missing required variables or unparseable values; we want
    /// misconfiguration to fail fast at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let cron_secret =
            std::env::var("CRON_SECRET").expect("CRON_SECRET must be set in the environment");
        assert!(!cron_secret.is_empty(), "CRON_SECRET must not be empty");

        let studio_timezone = std::env::var("STUDIO_TIMEZONE")
            .unwrap_or_else(|_| "Europe/Brussels".into())
            .parse()
            .expect("STUDIO_TIMEZONE must be a valid IANA timezone name");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            cron_secret,
            studio_timezone,
        }
    }
}
