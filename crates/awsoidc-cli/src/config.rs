//! CLI configuration management.

use std::path::PathBuf;

/// Overrides the config root.
pub const CONFIG_DIR_ENV: &str = "AWS_CLI_OIDC_CONFIG";
/// Log filter, in `tracing_subscriber::EnvFilter` syntax.
pub const LOG_ENV: &str = "AWS_CLI_OIDC_LOG";

const DEFAULT_DIR_NAME: &str = ".aws-cli-oidc";

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding `config.yaml`.
    pub config_root: PathBuf,
}

impl CliConfig {
    /// Resolve the config root from `--config-dir` / `AWS_CLI_OIDC_CONFIG`,
    /// falling back to `~/.aws-cli-oidc`.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        let config_root = Self::config_root(explicit, home)
            .ok_or("Could not determine home directory; set AWS_CLI_OIDC_CONFIG")?;
        Ok(Self { config_root })
    }

    fn config_root(explicit: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
        explicit
            .filter(|dir| !dir.as_os_str().is_empty())
            .or_else(|| home.map(|home| home.join(DEFAULT_DIR_NAME)))
    }
}
