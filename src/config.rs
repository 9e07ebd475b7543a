//! Server configuration.
//!
//! [`ServerConfig`] is constructed once before serving begins and treated as
//! immutable afterwards. It can be deserialized from any serde source
//! (YAML/JSON config files) or loaded from environment variables with
//! [`ServerConfig::from_env`].
//!
//! TLS paths, the four timeouts and the header size cap describe the
//! listener boundary; the dispatch pipeline itself only consumes `address`
//! and `static_paths`.

use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Process-wide server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address, e.g. `127.0.0.1:8080`.
    pub address: String,
    /// TLS certificate file; TLS is enabled when both `cert_file` and
    /// `key_file` are set.
    pub cert_file: Option<PathBuf>,
    /// TLS private key file.
    pub key_file: Option<PathBuf>,
    /// Read timeout in seconds (0 = transport default).
    pub read_timeout: u64,
    /// Read-header timeout in seconds.
    pub read_header_timeout: u64,
    /// Write timeout in seconds.
    pub write_timeout: u64,
    /// Idle keep-alive timeout in seconds.
    pub idle_timeout: u64,
    /// Maximum accepted header size in bytes.
    pub max_header_bytes: usize,
    /// URL prefix -> filesystem root mappings served before router lookup.
    pub static_paths: HashMap<String, PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8080".to_string(),
            cert_file: None,
            key_file: None,
            read_timeout: 0,
            read_header_timeout: 0,
            write_timeout: 0,
            idle_timeout: 0,
            max_header_bytes: 1 << 20,
            static_paths: HashMap::new(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl ServerConfig {
    /// Load configuration from `SWITCHBOARD_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            address: env::var("SWITCHBOARD_ADDR").unwrap_or(defaults.address),
            cert_file: env::var("SWITCHBOARD_CERT_FILE").ok().map(PathBuf::from),
            key_file: env::var("SWITCHBOARD_KEY_FILE").ok().map(PathBuf::from),
            read_timeout: env_parse("SWITCHBOARD_READ_TIMEOUT", defaults.read_timeout),
            read_header_timeout: env_parse(
                "SWITCHBOARD_READ_HEADER_TIMEOUT",
                defaults.read_header_timeout,
            ),
            write_timeout: env_parse("SWITCHBOARD_WRITE_TIMEOUT", defaults.write_timeout),
            idle_timeout: env_parse("SWITCHBOARD_IDLE_TIMEOUT", defaults.idle_timeout),
            max_header_bytes: env_parse("SWITCHBOARD_MAX_HEADER_BYTES", defaults.max_header_bytes),
            static_paths: defaults.static_paths,
        }
    }

    /// Register a static mapping: requests whose path starts with `prefix`
    /// are served from `root` without consulting the router.
    pub fn static_path(mut self, prefix: &str, root: impl Into<PathBuf>) -> Self {
        self.static_paths
            .insert(prefix.trim_matches(|c| c == '^' || c == '$').to_string(), root.into());
        self
    }

    /// Override the listen address.
    pub fn address(mut self, addr: &str) -> Self {
        self.address = addr.to_string();
        self
    }
}
