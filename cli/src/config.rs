//! Configuration file handling for the CLI.
//!
//! Defaults live in `$XDG_CONFIG_HOME/qrstamp/config.toml` following the XDG
//! Base Directory Specification. A missing file means built-in defaults.

use anyhow::{Context as _, Result, bail};
use directories::ProjectDirs;
use qrstamp_input::{EncodeOptions, MAX_IMAGE_SIDE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration stored on disk
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Size of regenerated QR codes
    #[serde(default)]
    pub encode: EncodeOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Emit JSON by default
    #[serde(default)]
    pub json: bool,
}

impl Config {
    /// Returns `$XDG_CONFIG_HOME/qrstamp/config.toml` on Linux, the
    /// platform equivalent elsewhere.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "qrstamp", "qrstamp")
            .context("Failed to determine config directory")?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = self.to_toml()?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    fn validate(&self) -> Result<()> {
        validate_encode(&self.encode)
    }

    /// Encode options with command-line overrides applied.
    pub fn encode_options(
        &self,
        width: Option<u32>,
        margin: Option<u32>,
    ) -> Result<EncodeOptions> {
        let options = EncodeOptions {
            width: width.unwrap_or(self.encode.width),
            margin: margin.unwrap_or(self.encode.margin),
        };
        validate_encode(&options)?;
        Ok(options)
    }
}

/// Widest quiet zone accepted, in modules.
const MAX_MARGIN: u32 = 64;

fn validate_encode(options: &EncodeOptions) -> Result<()> {
    if options.width == 0 {
        bail!("encode.width must be greater than zero");
    }
    if options.width > MAX_IMAGE_SIDE {
        bail!("encode.width must be at most {MAX_IMAGE_SIDE}");
    }
    if options.margin > MAX_MARGIN {
        bail!("encode.margin must be at most {MAX_MARGIN}");
    }
    Ok(())
}
