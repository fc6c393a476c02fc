//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use social_backend::inbound::http::session_config::{BuildMode, SessionSettings};
use social_backend::settings::AppSettings;

/// Everything [`super::create_server`] needs, resolved from [`AppSettings`].
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) database_url: Option<String>,
    pub(crate) reconcile_interval: Duration,
}

impl ServerConfig {
    /// Resolve settings, loading the session key from disk.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] when a setting is invalid or the session
    /// key cannot be loaded.
    pub fn from_settings(settings: &AppSettings) -> std::io::Result<Self> {
        let session =
            SessionSettings::from_app_settings(settings, BuildMode::from_debug_assertions())
                .map_err(std::io::Error::other)?;
        Ok(Self {
            session,
            bind_addr: settings.bind_addr().map_err(std::io::Error::other)?,
            database_url: settings.database_url.clone(),
            reconcile_interval: settings
                .reconcile_interval()
                .map_err(std::io::Error::other)?,
        })
    }
}
