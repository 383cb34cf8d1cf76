use chrono::Duration;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use crate::services::inventory::DEFAULT_CANCELLATION_WINDOW_HOURS;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_ENVIRONMENT: &str = "development";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub rust_env: String,
    pub seed_sample_data: bool,
    pub cancellation_window_hours: i64,
    pub cors_allowed_origins: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            rust_env: DEFAULT_ENVIRONMENT.to_string(),
            seed_sample_data: true,
            cancellation_window_hours: DEFAULT_CANCELLATION_WINDOW_HOURS,
            cors_allowed_origins: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key/value source. Unparseable values fall
    /// back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let window = parse_or(
            &lookup,
            "CANCELLATION_WINDOW_HOURS",
            defaults.cancellation_window_hours,
        );

        Self {
            host: parse_or(&lookup, "HOST", defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            rust_env: lookup("RUST_ENV")
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.rust_env),
            seed_sample_data: parse_or(&lookup, "SEED_SAMPLE_DATA", defaults.seed_sample_data),
            cancellation_window_hours: if window > 0 {
                window
            } else {
                tracing::warn!(
                    window,
                    "Config: CANCELLATION_WINDOW_HOURS must be positive, using default"
                );
                defaults.cancellation_window_hours
            },
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS"),
        }
    }

    pub fn is_production(&self) -> bool {
        self.rust_env == "production"
    }

    pub fn is_development(&self) -> bool {
        self.rust_env == "development"
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn cancellation_window(&self) -> Duration {
        Duration::hours(self.cancellation_window_hours)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, ?default, "Config: invalid value, using default");
            default
        }),
    }
}
