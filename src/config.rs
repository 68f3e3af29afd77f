use crate::content::lexicon_store::DEFAULT_TOPIC;
use crate::error::ConfigError;
use crate::generation::assembler::AssemblySettings;
use crate::generation::pipeline::PipelineSettings;
use crate::generation::synthesizer::SynthesisSettings;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_CONFIG_FILE: &str = "vocabot.toml";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the JSON content tables. Bundled tables when unset.
    pub content_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub default_topic: String,
    pub assembly: AssemblySettings,
    pub synthesis: SynthesisSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_dir: None,
            seed: None,
            default_topic: DEFAULT_TOPIC.to_string(),
            assembly: AssemblySettings::default(),
            synthesis: SynthesisSettings::default(),
        }
    }
}

impl Config {
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            assembly: self.assembly.clone(),
            synthesis: self.synthesis.clone(),
            seed: self.seed,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.content_dir {
            if !dir.is_dir() {
                return Err(ConfigError::InvalidContentDir(dir.display().to_string()));
            }
        }
        if self.default_topic.trim().is_empty() {
            return Err(ConfigError::InvalidSetting("default_topic must not be empty".to_string()));
        }
        let ratio = self.assembly.discussion_fill_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigError::InvalidSetting(format!(
                "assembly.discussion_fill_ratio must be within 0..=1, got {}",
                ratio
            )));
        }
        let probability = self.synthesis.tone_prefix_probability;
        if !(0.0..=1.0).contains(&probability) {
            return Err(ConfigError::InvalidSetting(format!(
                "synthesis.tone_prefix_probability must be within 0..=1, got {}",
                probability
            )));
        }
        if self.synthesis.max_turns == 0 {
            return Err(ConfigError::InvalidSetting("synthesis.max_turns must be at least 1".to_string()));
        }
        Ok(())
    }
}

pub fn parse_config(contents: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Reads and validates a config file. A missing file yields the defaults.
pub fn load_config_from_file(file_path: &Path) -> Result<Config, ConfigError> {
    match fs::read_to_string(file_path) {
        Ok(contents) => {
            let config = parse_config(&contents)?;
            info!("Loaded config from {}", file_path.display());
            Ok(config)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No config at {}, using defaults", file_path.display());
            Ok(Config::default())
        }
        Err(source) => Err(ConfigError::Read {
            path: file_path.to_path_buf(),
            source,
        }),
    }
}
