use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::semantic::{DEFAULT_MODEL, DEFAULT_THRESHOLD};

/// Default model download timeout in seconds
const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 300;
/// Default timeout for outbound voice-service calls in seconds
const DEFAULT_VOICE_TIMEOUT_SECS: u64 = 15;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

/// Where the FAQ data lives, relative to the base path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CorpusConfig {
    #[serde(default = "default_json_file")]
    pub json_file: String,

    /// Fallback when the JSON file is absent.
    #[serde(default = "default_csv_file")]
    pub csv_file: String,

    /// Category names reported by /analytics.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            json_file: default_json_file(),
            csv_file: default_csv_file(),
            categories: default_categories(),
        }
    }
}

fn default_json_file() -> String {
    "faq_data.json".to_string()
}

fn default_csv_file() -> String {
    "faq_data.csv".to_string()
}

fn default_categories() -> Vec<String> {
    ["General", "Shipping", "Returns", "Support"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Embedding model and match threshold settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SemanticConfig {
    /// Model name for embeddings (e.g. "all-MiniLM-L6-v2")
    #[serde(default = "default_model")]
    pub model: String,

    /// Minimum similarity before an answer is returned, in [-1.0, 1.0]
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Timeout for model download in seconds
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            threshold: DEFAULT_THRESHOLD,
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}

fn default_download_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_TIMEOUT_SECS
}

/// External speech-to-text / text-to-speech collaborators.
/// Both are optional; unset means the voice endpoints report failure.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoiceConfig {
    #[serde(default)]
    pub stt_url: Option<String>,

    #[serde(default)]
    pub tts_url: Option<String>,

    #[serde(default = "default_voice_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            stt_url: None,
            tts_url: None,
            timeout_secs: DEFAULT_VOICE_TIMEOUT_SECS,
        }
    }
}

fn default_voice_timeout_secs() -> u64 {
    DEFAULT_VOICE_TIMEOUT_SECS
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub corpus: CorpusConfig,

    #[serde(default)]
    pub semantic: SemanticConfig,

    #[serde(default)]
    pub voice: VoiceConfig,
}

impl Config {
    fn validate(&self) -> anyhow::Result<()> {
        if !(-1.0..=1.0).contains(&self.semantic.threshold) {
            bail!(
                "semantic.threshold must be between -1.0 and 1.0, got {}",
                self.semantic.threshold
            );
        }

        if self.semantic.download_timeout_secs == 0 {
            bail!("semantic.download_timeout_secs must be greater than 0");
        }

        if self.voice.timeout_secs == 0 {
            bail!("voice.timeout_secs must be greater than 0");
        }

        if self.corpus.json_file.is_empty() && self.corpus.csv_file.is_empty() {
            bail!("corpus.json_file and corpus.csv_file cannot both be empty");
        }

        Ok(())
    }

    /// Load `config.yaml` from the base path, creating it with defaults when
    /// absent. Re-saves after load so new fields get written out.
    pub fn load_with(base_path: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(base_path)
            .with_context(|| format!("failed to create {}", base_path.display()))?;

        let config_path = base_path.join("config.yaml");

        if !config_path.exists() {
            let default = serde_yml::to_string(&Self::default())?;
            std::fs::write(&config_path, default)
                .with_context(|| format!("failed to write {}", config_path.display()))?;
        }

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: Self = serde_yml::from_str(&config_str)
            .with_context(|| format!("{} is malformed", config_path.display()))?;

        config.validate()?;

        // resave in case the config schema gained fields
        if config_str != serde_yml::to_string(&config)? {
            config.save(base_path)?;
        }

        Ok(config)
    }

    pub fn save(&self, base_path: &Path) -> anyhow::Result<()> {
        let config_path = base_path.join("config.yaml");
        std::fs::write(&config_path, serde_yml::to_string(self)?)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        Ok(())
    }
}

/// Resolve the data directory: CLI flag, then FAQBOT_BASE_PATH, then
/// ~/.config/faqbot.
pub fn resolve_base_path(cli_override: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_override {
        return path;
    }

    if let Ok(path) = std::env::var("FAQBOT_BASE_PATH") {
        return PathBuf::from(path);
    }

    homedir::my_home()
        .ok()
        .flatten()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("faqbot")
}
