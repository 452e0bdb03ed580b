use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::endpoints::ApiEndpoints;

pub const DEFAULT_CONFIG_NAME: &str = "config/dashboard";
pub const ENV_PREFIX: &str = "TORQUE_DASHBOARD";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub api: ApiSettings,
    pub polling: PollingSettings,
    pub download: DownloadSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
    pub base_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingSettings {
    pub interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DownloadSettings {
    pub output_dir: PathBuf,
}

impl DashboardConfig {
    pub fn endpoints(&self) -> ApiEndpoints {
        ApiEndpoints::from_parts(&self.api.host, self.api.port, &self.api.base_path)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.polling.interval_secs)
    }
}

/// Defaults, then the config file, then `TORQUE_DASHBOARD__SECTION__KEY`
/// environment variables. An explicit `path` must exist; the default
/// `config/dashboard` file is optional.
pub fn load_dashboard_config(path: Option<&Path>) -> anyhow::Result<DashboardConfig> {
    load_with_environment(path, config::Environment::with_prefix(ENV_PREFIX))
}

fn load_with_environment(
    path: Option<&Path>,
    environment: config::Environment,
) -> anyhow::Result<DashboardConfig> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let settings = config::Config::builder()
        .set_default("api.host", "localhost")?
        .set_default("api.port", 5000)?
        .set_default("api.base_path", "api_v1")?
        .set_default("polling.interval_secs", 5)?
        .set_default("download.output_dir", ".")?
        .add_source(file)
        .add_source(environment.separator("__").try_parsing(true))
        .build()?;

    let config: DashboardConfig = settings.try_deserialize()?;
    if config.polling.interval_secs == 0 {
        anyhow::bail!("polling.interval_secs must be at least 1");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    /// Environment source fed from `vars` instead of the process environment
    fn environment(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(source))
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = load_with_environment(None, environment(&[])).unwrap();

        assert_eq!(config.endpoints().base(), "http://localhost:5000/api_v1");
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_from_file() {
        let file = toml_file(
            r#"
[api]
host = "10.0.0.2"
port = 5001

[polling]
interval_secs = 2
"#,
        );

        let config = load_with_environment(Some(file.path()), environment(&[])).unwrap();

        assert_eq!(config.endpoints().base(), "http://10.0.0.2:5001/api_v1");
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.download.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = toml_file("[api]\nport = 5001\n");

        let config = load_with_environment(
            Some(file.path()),
            environment(&[("TORQUE_DASHBOARD__API__PORT", "6000")]),
        )
        .unwrap();

        assert_eq!(config.api.port, 6000);
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("dashboard.toml");

        assert!(load_with_environment(Some(&missing), environment(&[])).is_err());
    }

    #[test]
    fn test_zero_interval_in_file_is_rejected() {
        let file = toml_file("[polling]\ninterval_secs = 0\n");

        let err = load_with_environment(Some(file.path()), environment(&[])).unwrap_err();

        assert!(err.to_string().contains("polling.interval_secs"));
    }

    #[test]
    fn test_zero_interval_from_environment_is_rejected() {
        let result = load_with_environment(
            None,
            environment(&[("TORQUE_DASHBOARD__POLLING__INTERVAL_SECS", "0")]),
        );

        assert!(result.is_err());
    }
}
