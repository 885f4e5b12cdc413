use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language of the pages being read
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Language to translate into
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Persistence config
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Gemini
    #[default]
    Gemini,
    // @provider: Anthropic
    Anthropic,
    // @provider: Ollama (local, no key)
    Ollama,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::Anthropic => "Anthropic",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::Ollama => "ollama".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        Self {
            provider_type: provider_type.to_lowercase_string(),
            model: default_model(provider_type),
            endpoint: default_endpoint(provider_type),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Instruction templates sent with each request.
///
/// Placeholders: {source_language}, {target_language}
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PromptConfig {
    /// Instruction for a work title
    #[serde(default = "default_title_prompt")]
    pub title: String,

    /// Instruction for a work synopsis
    #[serde(default = "default_synopsis_prompt")]
    pub synopsis: String,

    /// Instruction for a chapter body
    #[serde(default = "default_chapter_prompt")]
    pub chapter: String,

    /// Instruction for proper-noun extraction
    #[serde(default = "default_extraction_prompt")]
    pub extraction: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            title: default_title_prompt(),
            synopsis: default_synopsis_prompt(),
            chapter: default_chapter_prompt(),
            extraction: default_extraction_prompt(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Instruction templates
    #[serde(default)]
    pub prompts: PromptConfig,
}

/// Persistence configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// SQLite database file; the user data directory is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "Chinese".to_string()
}

fn default_target_language() -> String {
    "English".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_endpoint(provider: TranslationProvider) -> String {
    match provider {
        TranslationProvider::Gemini => "https://generativelanguage.googleapis.com".to_string(),
        TranslationProvider::Anthropic => "https://api.anthropic.com".to_string(),
        TranslationProvider::Ollama => "http://localhost:11434".to_string(),
    }
}

fn default_model(provider: TranslationProvider) -> String {
    match provider {
        TranslationProvider::Gemini => "gemini-2.0-flash".to_string(),
        TranslationProvider::Anthropic => "claude-3-haiku-20240307".to_string(),
        TranslationProvider::Ollama => "qwen2.5:7b".to_string(),
    }
}

fn default_title_prompt() -> String {
    "You are a professional {source_language}-to-{target_language} translator. Translate this {source_language} novel title. Output only the translated title.".to_string()
}

fn default_synopsis_prompt() -> String {
    "You are a professional {source_language}-to-{target_language} translator. Translate this {source_language} novel synopsis. Output only the translated synopsis.".to_string()
}

fn default_chapter_prompt() -> String {
    "You are a professional {source_language}-to-{target_language} translator. Translate this {source_language} novel chapter. Output only the translated chapter.".to_string()
}

fn default_extraction_prompt() -> String {
    r#"You are professional JSON extractor. Extract all proper nouns from the original and translated chapters. Create a JSON array using this format: [{"original":"proper noun from original chapter","translated":"proper noun from translated chapter"}]"#.to_string()
}

impl Config {
    /// Load a configuration file, writing a default one when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            return serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse config file: {:?}", path));
        }

        log::warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {:?}", path))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.source_language.trim().is_empty() {
            return Err(anyhow!("Source language must not be empty"));
        }
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language must not be empty"));
        }

        if let Some(unknown) = self
            .translation
            .available_providers
            .iter()
            .find(|p| p.provider_type.parse::<TranslationProvider>().is_err())
        {
            return Err(anyhow!("Unknown provider type: {}", unknown.provider_type));
        }

        if self.translation.get_model().trim().is_empty() {
            return Err(anyhow!(
                "A model is required for the {} provider",
                self.translation.provider.display_name()
            ));
        }

        let prompts = &self.translation.prompts;
        for (name, template) in [
            ("title", &prompts.title),
            ("synopsis", &prompts.synopsis),
            ("chapter", &prompts.chapter),
            ("extraction", &prompts.extraction),
        ] {
            if template.trim().is_empty() {
                return Err(anyhow!("The {} prompt must not be empty", name));
            }
        }

        Ok(())
    }

    /// Fill the language placeholders of an instruction template
    pub fn instruction(&self, template: &str) -> String {
        template
            .replace("{source_language}", &self.source_language)
            .replace("{target_language}", &self.target_language)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            storage: StorageConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }
        default_model(self.provider)
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }
        default_endpoint(self.provider)
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or_else(default_timeout_secs)
    }

    /// Override the model of the active provider, adding its entry if missing
    pub fn set_model(&mut self, model: &str) {
        let provider_str = self.provider.to_lowercase_string();
        match self
            .available_providers
            .iter_mut()
            .find(|p| p.provider_type == provider_str)
        {
            Some(provider_config) => provider_config.model = model.to_string(),
            None => {
                let mut provider_config = ProviderConfig::new(self.provider);
                provider_config.model = model.to_string();
                self.available_providers.push(provider_config);
            }
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Gemini),
                ProviderConfig::new(TranslationProvider::Anthropic),
                ProviderConfig::new(TranslationProvider::Ollama),
            ],
            prompts: PromptConfig::default(),
        }
    }
}
