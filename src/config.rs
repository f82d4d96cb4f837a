use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::protocol::{PollSchedule, Profile};
use crate::types::PanelState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Camera host serving the control endpoints
    pub base_url: String,
    pub profile: Profile,

    /// Overrides the profile's poll interval
    pub poll_interval_ms: Option<u64>,
    /// Unset means requests may hang forever
    pub request_timeout_ms: Option<u64>,

    /// Values the controls start with
    pub defaults: PanelState,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_string(),
            profile: Profile::Timelapse,

            poll_interval_ms: None,
            request_timeout_ms: None,

            defaults: PanelState::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Ok(config_str) = fs::read_to_string(path) {
            let config: AppConfig = serde_json::from_str(&config_str)
                .with_context(|| format!("invalid config file {}", path.display()))?;
            return Ok(config);
        }

        tracing::warn!("{} not found, using default configuration", path.display());
        Ok(AppConfig::default())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let config_str = serde_json::to_string_pretty(self)?;
        fs::write(path, config_str)?;
        Ok(())
    }

    /// Parsed base URL. A missing trailing slash is added so endpoint paths
    /// resolve below it instead of replacing its last segment.
    pub fn base_url(&self) -> Result<Url> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).with_context(|| format!("invalid base_url {:?}", self.base_url))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn poll_schedule(&self) -> Option<PollSchedule> {
        let mut schedule = self.profile.poll_schedule()?;
        if let Some(ms) = self.poll_interval_ms.filter(|ms| *ms > 0) {
            schedule.interval = Duration::from_millis(ms);
        }
        Some(schedule)
    }
}
