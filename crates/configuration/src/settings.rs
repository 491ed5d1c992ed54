use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub log: LogSettings,
}

/// Where and how the HTTP service listens.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// The interface to bind (e.g., "0.0.0.0").
    pub host: IpAddr,
    pub port: u16,
    /// Upper bound on request bodies. Form posts are tiny, so this stays small.
    pub body_limit_bytes: usize,
}

/// Contains parameters for the SQLite store.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Path to the database file, or `:memory:` for a throwaway in-memory store.
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Default filter directive, used when `RUST_LOG` is not set.
    pub level: String,
    pub format: LogFormat,
}

/// Output style of the fmt subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Full,
    Compact,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Config {
    /// Checks the invariants the deserializer cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be non-zero".to_string());
        }
        if self.database.url.trim().is_empty() {
            return Err("database.url must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("database.max_connections must be at least 1".to_string());
        }
        Ok(())
    }
}
