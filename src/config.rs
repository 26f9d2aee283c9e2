use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub disk: DiskConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Mount path for the event POST endpoint, e.g. "/filestack".
    pub path: String,
}

/// Mount filters for the disk collector. An empty list means "no filtering"
/// for that dimension.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiskConfig {
    #[serde(default)]
    pub mount_points: Vec<String>,
    #[serde(default)]
    pub ignore_fs: Vec<String>,
    #[serde(default)]
    pub ignore_mount_opts: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub collect_interval_ms: u64,
    /// How often to log app stats (cycles run, records emitted) at INFO level.
    pub stats_log_interval_secs: u64,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.webhook.path.starts_with('/'),
            "webhook.path must start with '/', got {:?}",
            self.webhook.path
        );
        anyhow::ensure!(
            self.monitoring.collect_interval_ms > 0,
            "monitoring.collect_interval_ms must be > 0, got {}",
            self.monitoring.collect_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        Ok(())
    }
}
