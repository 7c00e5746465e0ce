use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub refresh_secs: u64,
    pub bind_port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_secs: 30,
            bind_port: 9000,
        }
    }
}

impl DashboardConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading dashboard config {}", path_ref.display()))?;
        let config: DashboardConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing dashboard config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(refresh_secs: u64, bind_port: u16) -> Self {
        Self {
            refresh_secs,
            bind_port,
        }
    }

    pub fn refresh_period(&self) -> Duration {
        // tokio::time::interval panics on a zero period
        Duration::from_secs(self.refresh_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_sets_refresh_period() {
        let config = DashboardConfig::from_args(45, 9100);
        assert_eq!(config.refresh_period(), Duration::from_secs(45));
        assert_eq!(config.bind_port, 9100);
    }

    #[test]
    fn zero_refresh_interval_is_clamped() {
        let config = DashboardConfig::from_args(0, 9000);
        assert_eq!(config.refresh_period(), Duration::from_secs(1));
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"refresh_secs: 5\nbind_port: 9100\n").unwrap();
        let path = temp.into_temp_path();
        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.refresh_secs, 5);
        assert_eq!(config.bind_port, 9100);
    }

    #[test]
    fn missing_yaml_keys_fall_back_to_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"refresh_secs: 10\n").unwrap();
        let path = temp.into_temp_path();
        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.refresh_secs, 10);
        assert_eq!(config.bind_port, DashboardConfig::default().bind_port);
    }
}
