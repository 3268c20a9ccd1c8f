use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the portal.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub media: MediaConfig,
    pub mail: MailConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let media = MediaConfig {
            root: PathBuf::from(env::var("APP_MEDIA_ROOT").unwrap_or_else(|_| "media".to_string())),
            max_upload_bytes: numeric_var("APP_MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
        };

        let mail = MailConfig {
            default_from_email: env::var("APP_DEFAULT_FROM_EMAIL")
                .unwrap_or_else(|_| "webmaster@localhost".to_string()),
            queue_capacity: numeric_var("APP_MAIL_QUEUE_CAPACITY", 256)?,
            max_attempts: numeric_var("APP_MAIL_MAX_ATTEMPTS", 3)?,
        };

        let ttl_hours = numeric_var("APP_SESSION_TTL_HOURS", 24 * 14)?;
        if !SESSION_TTL_HOURS.contains(&ttl_hours) {
            return Err(ConfigError::OutOfRange {
                key: "APP_SESSION_TTL_HOURS",
                min: *SESSION_TTL_HOURS.start(),
                max: *SESSION_TTL_HOURS.end(),
            });
        }

        // Plain-HTTP development servers would never get the cookie back.
        let secure = match env::var("APP_SESSION_COOKIE_SECURE") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                key: "APP_SESSION_COOKIE_SECURE",
            })?,
            Err(_) => environment == AppEnvironment::Production,
        };

        let session = SessionConfig {
            cookie_name: env::var("APP_SESSION_COOKIE")
                .unwrap_or_else(|_| "portal_session".to_string()),
            ttl_hours,
            secure,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            media,
            mail,
            session,
        })
    }
}

fn numeric_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where uploaded resumes live and how large they may be.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub root: PathBuf,
    pub max_upload_bytes: usize,
}

/// Welcome mail queue settings.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub default_from_email: String,
    pub queue_capacity: usize,
    pub max_attempts: u32,
}

/// Accepted session lifetimes, one hour up to a year.
pub const SESSION_TTL_HOURS: std::ops::RangeInclusive<i64> = 1..=24 * 365;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_hours: i64,
    /// Marks the session cookie `Secure`; defaults on in production.
    pub secure: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
    OutOfRange { key: &'static str, min: i64, max: i64 },
    InvalidFlag { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => write!(f, "{key} must be a valid number"),
            ConfigError::OutOfRange { key, min, max } => {
                write!(f, "{key} must be between {min} and {max}")
            }
            ConfigError::InvalidFlag { key } => write!(f, "{key} must be true or false"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::OutOfRange { .. }
            | ConfigError::InvalidFlag { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_MEDIA_ROOT",
            "APP_MAX_UPLOAD_BYTES",
            "APP_DEFAULT_FROM_EMAIL",
            "APP_MAIL_QUEUE_CAPACITY",
            "APP_MAIL_MAX_ATTEMPTS",
            "APP_SESSION_COOKIE",
            "APP_SESSION_TTL_HOURS",
            "APP_SESSION_COOKIE_SECURE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.media.root, PathBuf::from("media"));
        assert_eq!(config.mail.max_attempts, 3);
        assert_eq!(config.session.cookie_name, "portal_session");
        assert_eq!(config.session.ttl_hours, 336);
        assert!(!config.session.secure);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_upload_limit() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_MAX_UPLOAD_BYTES", "lots");
        let err = AppConfig::load().expect_err("invalid limit rejected");
        assert!(err.to_string().contains("APP_MAX_UPLOAD_BYTES"));
        reset_env();
    }

    #[test]
    fn session_ttl_must_be_positive_and_bounded() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        for raw in ["0", "-5", "9223372036854775807"] {
            reset_env();
            env::set_var("APP_SESSION_TTL_HOURS", raw);
            let err = AppConfig::load().expect_err("ttl rejected");
            assert!(matches!(
                err,
                ConfigError::OutOfRange {
                    key: "APP_SESSION_TTL_HOURS",
                    ..
                }
            ));
        }
        reset_env();
        env::set_var("APP_SESSION_TTL_HOURS", "8760");
        assert_eq!(AppConfig::load().expect("config loads").session.ttl_hours, 8760);
        reset_env();
    }

    #[test]
    fn session_cookie_is_secure_in_production() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        assert!(AppConfig::load().expect("config loads").session.secure);

        env::set_var("APP_SESSION_COOKIE_SECURE", "false");
        assert!(!AppConfig::load().expect("config loads").session.secure);

        env::set_var("APP_SESSION_COOKIE_SECURE", "maybe");
        let err = AppConfig::load().expect_err("flag rejected");
        assert!(err.to_string().contains("APP_SESSION_COOKIE_SECURE"));
        reset_env();
    }
}
