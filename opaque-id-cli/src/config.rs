//! `opaque-id.toml`: where generated files go and which sources are read.
//!
//! Every key is optional; command-line flags override the file.

use crate::error::{CliResult, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "opaque-id.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration.
    pub output: OutputConfig,

    /// Source discovery.
    pub scan: ScanConfig,
}

/// Output configuration. Paths are relative to the crate root.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for generated files.
    pub dir: PathBuf,

    /// File name of the registration artifact, inside `dir`.
    pub registration_file: String,

    /// Whether per-declaration artifacts are written too.
    pub write_declarations: bool,
}

/// Source discovery configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory holding the crate's module tree, relative to the crate root.
    pub source_dir: PathBuf,

    /// Whether to respect .gitignore files.
    pub respect_gitignore: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("src/generated"),
            registration_file: "registration.rs".to_string(),
            write_declarations: true,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("src"),
            respect_gitignore: true,
        }
    }
}

impl Config {
    /// Full path of the output directory under a crate root.
    pub fn output_dir(&self, crate_root: &Path) -> PathBuf {
        crate_root.join(&self.output.dir)
    }

    /// Full path of the registration file under a crate root.
    pub fn registration_path(&self, crate_root: &Path) -> PathBuf {
        self.output_dir(crate_root)
            .join(&self.output.registration_file)
    }

    /// Full path of the source directory under a crate root.
    pub fn source_dir(&self, crate_root: &Path) -> PathBuf {
        crate_root.join(&self.scan.source_dir)
    }
}

/// Reads `opaque-id.toml` and applies command-line overrides.
pub struct ConfigManager;

impl ConfigManager {
    /// Read a configuration file that must exist.
    pub fn load(path: &Path) -> CliResult<Config> {
        if !path.is_file() {
            return Err(ConfigError::not_found(path.to_path_buf()).into());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content, path)?)
    }

    /// The configuration of a crate: `explicit` when given, otherwise
    /// `opaque-id.toml` in the crate root, otherwise the defaults.
    pub fn load_for(crate_root: &Path, explicit: Option<&Path>) -> CliResult<Config> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let beside_manifest = crate_root.join(CONFIG_FILENAME);
        if beside_manifest.is_file() {
            Self::load(&beside_manifest)
        } else {
            Ok(Config::default())
        }
    }

    /// Parse and check configuration text.
    pub fn parse(content: &str, path: &Path) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ConfigError::invalid_toml(path.to_path_buf(), e.to_string()))?;
        Self::check(&config)?;
        Ok(config)
    }

    fn check(config: &Config) -> Result<(), ConfigError> {
        let file = Path::new(&config.output.registration_file);
        if config.output.registration_file.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "output.registration_file",
                "must not be empty",
            ));
        }
        if file.components().count() != 1 {
            return Err(ConfigError::invalid_value(
                "output.registration_file",
                "must be a plain file name",
            ));
        }
        Ok(())
    }

    /// Apply the flags that were given on top of `config`.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(ref file) = args.registration_file {
            config.output.registration_file = file.clone();
        }

        if let Some(write_declarations) = args.write_declarations {
            config.output.write_declarations = write_declarations;
        }

        if let Some(ref source_dir) = args.source_dir {
            config.scan.source_dir = source_dir.clone();
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# opaque-id configuration file

[output]
# Output directory for generated files, relative to the crate root
dir = "src/generated"

# Registration artifact file name, written inside the output directory
registration_file = "registration.rs"

# Also write the code generated for each declaration, one file per artifact
write_declarations = true

[scan]
# Directory holding the crate's module tree
source_dir = "src"

# Skip files ignored by .gitignore
respect_gitignore = true
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Registration file name override.
    pub registration_file: Option<String>,

    /// Per-declaration output override.
    pub write_declarations: Option<bool>,

    /// Source directory override.
    pub source_dir: Option<PathBuf>,
}
