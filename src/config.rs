use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub docker: DockerConfig,
    pub database: DatabaseConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DockerConfig {
    /// Daemon endpoint, e.g. "unix:///var/run/docker.sock" or "tcp://host:2375".
    /// Must be set; an unreachable daemon is a startup error, not a retry target.
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file holding the group display names.
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// Seconds between collection cycles.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_poll_interval_secs() -> u64 {
    15
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        let mut config: AppConfig = toml::from_str(&s)?;
        // DOCKER_HOST wins over the config file, matching docker CLI habits.
        if let Ok(host) = std::env::var("DOCKER_HOST")
            && !host.is_empty()
        {
            config.docker.host = host;
        }
        config.validate()?;
        Ok(config)
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
            !self.docker.host.is_empty(),
            "docker.host must be set (or export DOCKER_HOST)"
        );
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.monitoring.poll_interval_secs > 0,
            "monitoring.poll_interval_secs must be > 0, got {}",
            self.monitoring.poll_interval_secs
        );
        Ok(())
    }
}
