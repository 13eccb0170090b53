//! Configuration loader with tier-based merging.

use super::merge::merge_tiers;
use super::types::Config;
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File tiers layered over the built-in defaults, lowest priority first.
/// Environment variables are applied after both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigTier {
    /// Project-level config (`./tasklift/config.yaml`)
    Project,
    /// User-level config (`~/.tasklift/config.yaml`)
    User,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::User => write!(f, "user"),
        }
    }
}

/// Directories searched for `config.yaml`.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub project_dir: Option<PathBuf>,
    pub user_dir: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigPaths {
    /// `./tasklift` and `~/.tasklift`.
    pub fn discover() -> Self {
        Self {
            project_dir: Some(PathBuf::from("tasklift")),
            user_dir: dirs::home_dir().map(|h| h.join(".tasklift")),
        }
    }

    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
        }
    }
}

/// Loads and merges configuration from every tier.
#[derive(Debug)]
pub struct ConfigLoader {
    config: Config,
    /// Highest-priority file that contributed, if any.
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Load with an explicit environment lookup.
    pub fn load_with<F>(paths: ConfigPaths, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // An explicit file replaces the project and user tiers.
        if let Some(explicit) = env("TASKLIFT_CONFIG_PATH") {
            let path = PathBuf::from(explicit);
            let mut config = Config::load(&path)?;
            apply_env_overrides(&mut config, &env)?;
            config.validate()?;
            return Ok(Self {
                config,
                config_path: Some(path),
            });
        }

        let mut tiers = vec![serde_json::to_value(Config::default())?];
        let mut config_path = None;

        for (tier, dir) in [
            (ConfigTier::Project, paths.project_dir.as_deref()),
            (ConfigTier::User, paths.user_dir.as_deref()),
        ] {
            let Some(dir) = dir else { continue };
            let file = dir.join("config.yaml");
            if let Some(value) = read_tier(&file)? {
                debug!(%tier, path = %file.display(), "Loaded config tier");
                tiers.push(value);
                config_path = Some(file);
            }
        }

        let mut config: Config =
            serde_json::from_value(merge_tiers(tiers)).context("invalid configuration")?;
        apply_env_overrides(&mut config, &env)?;
        config.validate()?;

        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

fn read_tier(file: &Path) -> Result<Option<Value>> {
    if !file.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("reading config file {}", file.display()))?;
    let value: Value = serde_yaml::from_str(&content)
        .with_context(|| format!("parsing config file {}", file.display()))?;
    Ok(Some(value))
}

fn apply_env_overrides<F>(config: &mut Config, env: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(db_path) = env("TASKLIFT_DB_PATH") {
        config.server.db_path = PathBuf::from(db_path);
    }
    if let Some(host) = env("TASKLIFT_HOST") {
        config.server.host = host;
    }
    if let Some(port) = env("PORT") {
        config.server.port = port
            .trim()
            .parse()
            .with_context(|| format!("PORT is not a valid port: {port}"))?;
    }
    if let Some(secure) = env("TASKLIFT_SECURE_COOKIES") {
        config.session.secure_cookies = match secure.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" | "" => false,
            other => bail!("TASKLIFT_SECURE_COOKIES must be a boolean, got {other}"),
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(dir: &Path, content: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join("config.yaml"), content).unwrap();
    }

    #[test]
    fn defaults_when_no_files() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dirs(
            Some(temp.path().join("project")),
            Some(temp.path().join("user")),
        );

        let loader = ConfigLoader::load_with(paths, no_env).unwrap();
        assert_eq!(loader.config().server.port, 5050);
        assert_eq!(loader.config().server.host, "127.0.0.1");
        assert!(loader.config_path().is_none());
    }

    #[test]
    fn user_tier_overrides_project_tier() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("project");
        let user = temp.path().join("user");
        write_config(&project, "server:\n  port: 7000\n  host: 0.0.0.0\n");
        write_config(&user, "server:\n  port: 8000\n");

        let paths = ConfigPaths::with_dirs(Some(project), Some(user.clone()));
        let loader = ConfigLoader::load_with(paths, no_env).unwrap();

        assert_eq!(loader.config().server.port, 8000);
        assert_eq!(loader.config().server.host, "0.0.0.0");
        assert_eq!(loader.config_path(), Some(user.join("config.yaml").as_path()));
    }

    #[test]
    fn environment_wins() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("project");
        write_config(&project, "server:\n  port: 7000\n");

        let env: HashMap<&str, &str> = HashMap::from([
            ("PORT", "9100"),
            ("TASKLIFT_DB_PATH", "/tmp/other.db"),
            ("TASKLIFT_SECURE_COOKIES", "true"),
        ]);
        let paths = ConfigPaths::with_dirs(Some(project), None);
        let loader =
            ConfigLoader::load_with(paths, |k| env.get(k).map(|v| v.to_string())).unwrap();

        let config = loader.config();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.db_path, PathBuf::from("/tmp/other.db"));
        assert!(config.session.secure_cookies);
    }

    #[test]
    fn explicit_path_skips_tiers() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("project");
        write_config(&project, "server:\n  port: 7000\n");
        let explicit = temp.path().join("explicit.yaml");
        std::fs::write(&explicit, "session:\n  ttl_hours: 2\n").unwrap();

        let explicit_str = explicit.to_string_lossy().to_string();
        let paths = ConfigPaths::with_dirs(Some(project), None);
        let loader = ConfigLoader::load_with(paths, |k| {
            (k == "TASKLIFT_CONFIG_PATH").then(|| explicit_str.clone())
        })
        .unwrap();

        assert_eq!(loader.config().server.port, 5050);
        assert_eq!(loader.config().session.ttl_hours, 2);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("project");
        write_config(&project, "server: [not, a, map\n");

        let paths = ConfigPaths::with_dirs(Some(project), None);
        assert!(ConfigLoader::load_with(paths, no_env).is_err());
    }

    #[test]
    fn bad_port_env_is_an_error() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dirs(Some(temp.path().join("p")), None);
        let result = ConfigLoader::load_with(paths, |k| (k == "PORT").then(|| "http".to_string()));
        assert!(result.is_err());
    }
}
