//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::{Config, LogFormat};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "GIRINO_SERIAL";

/// Config file name
const CONFIG_FILE_NAME: &str = "girino-serial.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "GIRINO_SERIAL_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `GIRINO_SERIAL_CONFIG` environment variable (explicit path)
    /// 2. `./girino-serial.toml` (current directory)
    /// 3. the platform config directory (`~/.config/girino-serial/` on Linux)
    /// 4. Built-in defaults (no file required)
    ///
    /// Environment variables override file values, and the result is
    /// validated.
    pub fn load() -> ConfigResult<Self> {
        Self::finish(resolve_config_path())
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        Self::finish(Some(path))
    }

    fn finish(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(ref path) => load_from_file(path)?,
            None => Config::default(),
        };

        apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self { config_path, config })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }
}

/// Resolve the configuration file path using standard locations.
fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    platform_config_path().filter(|path| path.exists())
}

/// `girino-serial.toml` inside the platform config directory.
fn platform_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "hihan", "girino-serial")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn env_var(section_key: &str) -> Option<(String, String)> {
    let var = format!("{}_{}", ENV_PREFIX, section_key);
    std::env::var(&var).ok().map(|val| (var, val))
}

fn parse_env<T: std::str::FromStr>(var: &str, val: &str, what: &str) -> ConfigResult<T> {
    val.parse()
        .map_err(|_| ConfigError::env(var, format!("Invalid {what}: {val}")))
}

/// Apply environment variable overrides to the configuration.
///
/// Environment variables follow the pattern: `GIRINO_SERIAL_<SECTION>_<KEY>`
/// For example:
/// - `GIRINO_SERIAL_SERIAL_BAUD_RATE=57600`
/// - `GIRINO_SERIAL_DISCOVERY_DEFAULT_PORT=/dev/ttyACM0`
/// - `GIRINO_SERIAL_LOGGING_LEVEL=debug`
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    // Serial overrides
    if let Some((var, val)) = env_var("SERIAL_BAUD_RATE") {
        config.serial.baud_rate = parse_env(&var, &val, "baud rate")?;
    }
    if let Some((var, val)) = env_var("SERIAL_OPEN_TIMEOUT_MS") {
        config.serial.open_timeout_ms = parse_env(&var, &val, "timeout")?;
    }
    if let Some((var, val)) = env_var("SERIAL_POLL_DELAY_MS") {
        config.serial.poll_delay_ms = parse_env(&var, &val, "poll delay")?;
    }

    // Discovery overrides
    if let Some((_, val)) = env_var("DISCOVERY_DEFAULT_PORT") {
        config.discovery.default_port = Some(val);
    }

    // Logging overrides
    if let Some((_, val)) = env_var("LOGGING_LEVEL") {
        config.logging.level = val;
    }
    if let Some((var, val)) = env_var("LOGGING_FORMAT") {
        config.logging.format = match val.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            "compact" => LogFormat::Compact,
            _ => return Err(ConfigError::env(var, format!("Invalid log format: {val}"))),
        };
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn write_config(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    #[serial]
    fn test_env_override() {
        env::set_var("GIRINO_SERIAL_SERIAL_BAUD_RATE", "9600");
        env::set_var("GIRINO_SERIAL_DISCOVERY_DEFAULT_PORT", "COM7");
        env::set_var("GIRINO_SERIAL_LOGGING_FORMAT", "Pretty");

        let mut config = Config::default();
        let result = apply_env_overrides(&mut config);

        env::remove_var("GIRINO_SERIAL_SERIAL_BAUD_RATE");
        env::remove_var("GIRINO_SERIAL_DISCOVERY_DEFAULT_PORT");
        env::remove_var("GIRINO_SERIAL_LOGGING_FORMAT");

        result.unwrap();
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.discovery.default_port.as_deref(), Some("COM7"));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    #[serial]
    fn test_bad_env_value_is_reported() {
        env::set_var("GIRINO_SERIAL_SERIAL_POLL_DELAY_MS", "soon");

        let mut config = Config::default();
        let result = apply_env_overrides(&mut config);

        env::remove_var("GIRINO_SERIAL_SERIAL_POLL_DELAY_MS");

        match result {
            Err(ConfigError::Env { var, message }) => {
                assert_eq!(var, "GIRINO_SERIAL_SERIAL_POLL_DELAY_MS");
                assert_eq!(message, "Invalid poll delay: soon");
            }
            other => panic!("Expected Env error, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_env_override_beats_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "girino-serial.toml", "[serial]\nbaud_rate = 57600\n");
        env::set_var("GIRINO_SERIAL_SERIAL_BAUD_RATE", "9600");

        let result = ConfigLoader::load_from(&path);

        env::remove_var("GIRINO_SERIAL_SERIAL_BAUD_RATE");
        assert_eq!(result.unwrap().config().serial.baud_rate, 9600);
    }

    #[test]
    #[serial]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "girino-serial.toml",
            "[serial]\nbaud_rate = 57600\n[discovery]\nprepared_ports = [\"/dev/ttyACM0\"]\n[logging]\nformat = \"json\"\n",
        );

        let loader = ConfigLoader::load_from(&path).unwrap();
        assert_eq!(loader.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(loader.config().serial.baud_rate, 57600);
        assert_eq!(loader.config().discovery.prepared_ports, vec!["/dev/ttyACM0".to_string()]);
        assert_eq!(loader.into_config().logging.format, LogFormat::Json);
    }

    #[test]
    #[serial]
    fn test_explicit_path_variable_is_resolved() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "custom.toml", "[serial]\npoll_delay_ms = 50\n");
        env::set_var("GIRINO_SERIAL_CONFIG", &path);

        let result = ConfigLoader::load();

        env::remove_var("GIRINO_SERIAL_CONFIG");
        let loader = result.unwrap();
        assert_eq!(loader.config_path, Some(path));
        assert_eq!(loader.config().serial.poll_delay_ms, 50);
    }

    #[test]
    #[serial]
    fn test_invalid_file_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "zero.toml", "[serial]\nopen_timeout_ms = 0\n");

        assert!(matches!(
            ConfigLoader::load_from(&path),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "broken.toml", "[serial\nbaud_rate = 1\n");

        match ConfigLoader::load_from(&path) {
            Err(ConfigError::Parse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = ConfigLoader::load_from("/nonexistent/girino-serial.toml");
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }
}
