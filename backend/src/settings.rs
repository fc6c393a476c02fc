//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `SOCIAL_*` environment variables, and
//! configuration files, in that order of precedence. Boolean switches are
//! read from the environment and files only.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 300;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address did not parse as `host:port`.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// The sweep interval was zero.
    #[error("reconcile interval must be at least one second")]
    ZeroReconcileInterval,
}

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SOCIAL")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Allow a generated session key when the key file is unreadable.
    #[ortho_config(default = false, skip_cli)]
    pub session_allow_ephemeral: bool,
    /// Mark session cookies `Secure`.
    #[ortho_config(default = true, skip_cli)]
    pub cookie_secure: bool,
    /// Seconds between reconciliation sweeps.
    pub reconcile_interval_secs: Option<u64>,
}

impl AppSettings {
    /// Parsed bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Session key location.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Delay between reconciliation sweeps.
    pub fn reconcile_interval(&self) -> Result<Duration, SettingsError> {
        match self
            .reconcile_interval_secs
            .unwrap_or(DEFAULT_RECONCILE_INTERVAL_SECS)
        {
            0 => Err(SettingsError::ZeroReconcileInterval),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}
