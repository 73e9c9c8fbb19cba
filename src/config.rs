use crate::domain::{Convention, PolicyKind};
use crate::error::{Result, TagBumpError};
use crate::git::PushCredentials;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment toggle that drops the prefix from the new tag when set to `true`
pub const WITHOUT_PREFIX_ENV: &str = "WITHOUT_V";

/// Represents the complete configuration for tag-bump.
///
/// Every section has defaults, so an empty file (or no file) is valid.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub versioning: VersioningConfig,

    #[serde(default)]
    pub tagger: TaggerConfig,

    #[serde(default)]
    pub push: PushConfig,
}

fn default_repository_path() -> String {
    ".".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Which repository to tag and where to push
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RepositoryConfig {
    #[serde(default = "default_repository_path")]
    pub path: String,

    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            path: default_repository_path(),
            remote: default_remote(),
        }
    }
}

fn default_prefix() -> String {
    "v".to_string()
}

/// How tags are read and how the next one is derived
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersioningConfig {
    #[serde(default)]
    pub policy: PolicyKind,

    #[serde(default)]
    pub convention: Convention,

    /// Prefix for the first tag; later tags inherit the previous tag's prefix
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Render the new tag without any prefix.
    ///
    /// Turning this off never adds a prefix: a history of unprefixed tags
    /// keeps producing unprefixed tags.
    #[serde(default)]
    pub without_prefix: bool,
}

impl Default for VersioningConfig {
    fn default() -> Self {
        VersioningConfig {
            policy: PolicyKind::default(),
            convention: Convention::default(),
            prefix: default_prefix(),
            without_prefix: false,
        }
    }
}

fn default_tagger_name() -> String {
    "whiteblock".to_string()
}

fn default_tagger_email() -> String {
    "developer@whiteblock.co".to_string()
}

fn default_utc_offset_hours() -> i32 {
    9
}

/// Identity and clock used for annotated tags
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TaggerConfig {
    #[serde(default = "default_tagger_name")]
    pub name: String,

    #[serde(default = "default_tagger_email")]
    pub email: String,

    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        TaggerConfig {
            name: default_tagger_name(),
            email: default_tagger_email(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_username() -> String {
    // Any non-empty user name works with token authentication
    "USER_NAME".to_string()
}

fn default_token_env() -> String {
    "REPO_TOKEN".to_string()
}

/// Push behavior and credential sources
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PushConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_username")]
    pub username: String,

    /// Environment variable holding the push token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        PushConfig {
            enabled: true,
            username: default_username(),
            token_env: default_token_env(),
        }
    }
}

impl PushConfig {
    /// Build push credentials, reading the token through `lookup`
    pub fn credentials<F>(&self, lookup: F) -> PushCredentials
    where
        F: Fn(&str) -> Option<String>,
    {
        PushCredentials {
            username: self.username.clone(),
            token: lookup(&self.token_env).filter(|token| !token.is_empty()),
        }
    }
}

impl Config {
    /// Apply environment toggles, reading variables through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(WITHOUT_PREFIX_ENV) {
            self.versioning.without_prefix = value.trim().eq_ignore_ascii_case("true");
        }
    }

    /// Check that the settings can work together
    pub fn validate(&self) -> Result<()> {
        let versioning = &self.versioning;

        if !versioning.policy.supports(versioning.convention) {
            return Err(TagBumpError::config(format!(
                "Policy '{}' cannot be used with the '{}' convention",
                versioning.policy, versioning.convention
            )));
        }

        if versioning.convention == Convention::SemVer
            && !versioning.prefix.chars().all(|c| c.is_ascii_lowercase())
        {
            return Err(TagBumpError::config(format!(
                "Prefix '{}' must be lowercase letters under the semver convention",
                versioning.prefix
            )));
        }

        if self.repository.remote.trim().is_empty() {
            return Err(TagBumpError::config("Remote name must not be empty"));
        }

        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `tagbump.toml` in current directory
/// 3. `.tagbump.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./tagbump.toml").exists() {
        fs::read_to_string("./tagbump.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".tagbump.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
