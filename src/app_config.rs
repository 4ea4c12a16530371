use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::default::Default;
use std::path::{Path, PathBuf};
use url::Url;

use crate::language_utils::language_codes_match;
use crate::segment::{Chunker, MarkerPair};
use crate::translation::prompts::PinnedTerm;
use crate::translation::reassembler::RepairOptions;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the English source documents
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Root under which per-language output directories are created
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Output directory below `output_root`; `{code}` is replaced by the language code
    #[serde(default = "default_output_layout")]
    pub output_layout: String,

    /// File extensions considered as documents
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Languages to translate into
    #[serde(default = "default_target_languages")]
    pub target_languages: Vec<TargetLanguage>,

    /// Literal boundary markers around the translatable span
    #[serde(default)]
    pub markers: MarkerConfig,

    /// Chunking settings
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Post-processing settings
    #[serde(default)]
    pub post_process: PostProcessConfig,

    /// Terms that must survive translation untouched
    #[serde(default)]
    pub glossary: GlossaryConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// One target language and the instruction used for it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TargetLanguage {
    /// Code used for the output directory (e.g. "cn", "ko")
    pub code: String,

    /// Display name; resolved from the ISO code when empty
    #[serde(default)]
    pub name: String,

    /// Explicit system instruction. When empty, one is rendered from the template
    #[serde(default)]
    pub system_prompt: String,

    /// Date format the model must produce (e.g. "YYYY 年 MM 月 DD 日")
    #[serde(default)]
    pub date_format: String,

    /// Example of a translated date heading
    #[serde(default)]
    pub date_example: String,

    /// Terms with a fixed rendering in this language
    #[serde(default)]
    pub pinned_terms: Vec<PinnedTerm>,
}

impl TargetLanguage {
    /// Create a language entry with only a code and a name
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            system_prompt: String::new(),
            date_format: String::new(),
            date_example: String::new(),
            pinned_terms: Vec::new(),
        }
    }

    /// Display name, falling back to the ISO name of the code
    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            return self.name.clone();
        }
        crate::language_utils::get_language_name(&self.code).unwrap_or_else(|_| self.code.clone())
    }
}

/// Boundary markers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MarkerConfig {
    /// Everything up to and including this marker is kept verbatim
    #[serde(default = "default_marker_before")]
    pub before: String,

    /// Everything from this marker on is kept verbatim
    #[serde(default = "default_marker_after")]
    pub after: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            before: default_marker_before(),
            after: default_marker_after(),
        }
    }
}

impl MarkerConfig {
    /// Marker pair used by the locator
    pub fn marker_pair(&self) -> MarkerPair {
        MarkerPair::new(self.before.clone(), self.after.clone())
    }
}

/// Chunking settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Literal pattern opening a structural unit; empty disables unit grouping
    #[serde(default = "default_unit_open_tag")]
    pub unit_open_pattern: String,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            unit_open_pattern: default_unit_open_tag(),
        }
    }
}

impl ChunkingConfig {
    /// Build the chunker for these settings
    pub fn chunker(&self) -> Chunker {
        Chunker::new(self.max_chars).with_unit_pattern(self.unit_open_pattern.clone())
    }
}

/// Post-processing settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PostProcessConfig {
    /// Code fence marker
    #[serde(default = "default_fence")]
    pub fence: String,

    /// Literal opening tag of a structural unit
    #[serde(default = "default_unit_open_tag")]
    pub unit_open_tag: String,

    /// Literal closing tag of a structural unit
    #[serde(default = "default_unit_close_tag")]
    pub unit_close_tag: String,

    /// Line prefix of the headings that carry version and date
    #[serde(default = "default_heading_prefix")]
    pub heading_prefix: String,

    /// How far before a duplicate heading the opening tag is searched
    #[serde(default = "default_dedup_lookbehind")]
    pub dedup_lookbehind: usize,

    /// Whether duplicate units are removed at all
    #[serde(default = "default_true")]
    pub remove_duplicate_units: bool,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            fence: default_fence(),
            unit_open_tag: default_unit_open_tag(),
            unit_close_tag: default_unit_close_tag(),
            heading_prefix: default_heading_prefix(),
            dedup_lookbehind: default_dedup_lookbehind(),
            remove_duplicate_units: true,
        }
    }
}

impl PostProcessConfig {
    /// Options for the reassembler
    pub fn repair_options(&self) -> RepairOptions {
        RepairOptions {
            fence: self.fence.clone(),
            unit_open_tag: self.unit_open_tag.clone(),
            unit_close_tag: self.unit_close_tag.clone(),
            heading_prefix: self.heading_prefix.clone(),
            dedup_lookbehind: self.dedup_lookbehind,
            remove_duplicate_units: self.remove_duplicate_units,
        }
    }
}

/// Terms shared by all languages
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GlossaryConfig {
    /// Proper nouns kept in English
    #[serde(default = "default_protected_terms")]
    pub protected_terms: Vec<String>,
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            protected_terms: default_protected_terms(),
        }
    }
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: OpenAI
    #[default]
    OpenAI,
    // @provider: Anthropic
    Anthropic,
    // @provider: LM Studio (OpenAI-compatible local server)
    LMStudio,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::LMStudio => "LM Studio",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::LMStudio => "lmstudio".to_string(),
        }
    }

    // @returns: Whether the provider needs an API key
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::LMStudio)
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
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "lmstudio" => Ok(Self::LMStudio),
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

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

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
        match provider_type {
            TranslationProvider::OpenAI => Self {
                provider_type: "openai".to_string(),
                model: default_openai_model(),
                api_key: String::new(),
                endpoint: default_openai_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::Anthropic => Self {
                provider_type: "anthropic".to_string(),
                model: default_anthropic_model(),
                api_key: String::new(),
                endpoint: default_anthropic_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::LMStudio => Self {
                provider_type: "lmstudio".to_string(),
                model: default_lmstudio_model(),
                api_key: String::new(),
                endpoint: default_lmstudio_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
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
    #[serde(default = "default_available_providers")]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Maximum number of attempts per chunk
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff in milliseconds, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation; 0.0 keeps output deterministic
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum number of tokens the model may produce per chunk
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Task framing put in front of every chunk
    #[serde(default = "default_user_prompt_prefix")]
    pub user_prompt_prefix: String,

    /// Whether to attach neighbouring entry headings as context
    #[serde(default = "default_true")]
    pub context_hints: bool,

    /// How many (document, language) pairs run at the same time
    #[serde(default = "default_concurrent_pairs")]
    pub concurrent_pairs: usize,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            user_prompt_prefix: default_user_prompt_prefix(),
            context_hints: true,
            concurrent_pairs: default_concurrent_pairs(),
        }
    }
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

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("en/changelog")
}

fn default_output_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_layout() -> String {
    "{code}/changelog".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "mdx".to_string()]
}

fn default_marker_before() -> String {
    "};\n    return <ShowResult />;\n  })()}\n</div>".to_string()
}

fn default_marker_after() -> String {
    "{/* Component definitions - moved to end of file for cleaner code organization */}".to_string()
}

fn default_max_chars() -> usize {
    8000
}

fn default_unit_open_tag() -> String {
    "<Update".to_string()
}

fn default_unit_close_tag() -> String {
    "</Update>".to_string()
}

fn default_fence() -> String {
    "```".to_string()
}

fn default_heading_prefix() -> String {
    "## ".to_string()
}

fn default_dedup_lookbehind() -> usize {
    500
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_attempts() -> u32 {
    5
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_temperature() -> f32 {
    0.0
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_concurrent_pairs() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_user_prompt_prefix() -> String {
    "Please translate the following text, strictly following the system instructions:\n".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_lmstudio_endpoint() -> String {
    // LM Studio default server (OpenAI compatible) runs on port 1234 under /v1
    "http://localhost:1234/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_lmstudio_model() -> String {
    // Placeholder; users should set to the loaded model name in LM Studio
    "local-model".to_string()
}

fn default_available_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new(TranslationProvider::OpenAI),
        ProviderConfig::new(TranslationProvider::Anthropic),
        ProviderConfig::new(TranslationProvider::LMStudio),
    ]
}

fn default_protected_terms() -> Vec<String> {
    [
        "Frontier",
        "Frontiers",
        "Crypto Frontier",
        "Crypto Frontier QUEST",
        "Robotics Frontier",
        "Model Comparison",
        "Spot LLM's Mistakes",
        "Correct LLM's Mistakes",
        "Food Science",
        "Lifelog Canvas",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect()
}

fn default_target_languages() -> Vec<TargetLanguage> {
    let mut chinese = TargetLanguage::new("cn", "Chinese");
    chinese.date_format = "YYYY 年 MM 月 DD 日".to_string();
    chinese.date_example = "## Dec 04, 2025 → ## 2025 年 12 月 04 日".to_string();
    chinese.pinned_terms = vec![
        PinnedTerm::new("Lineage", "血缘"),
        PinnedTerm::new("How", "运作方式"),
        PinnedTerm::new("Timeline", "活动时间"),
        PinnedTerm::new("Access", "参与方式"),
        PinnedTerm::new("Lock", "锁仓"),
    ];

    let mut korean = TargetLanguage::new("ko", "Korean");
    korean.date_format = "YYYY년 MM월 DD일".to_string();
    korean.date_example = "## Dec 04, 2025 → ## 2025년 12월 04일".to_string();

    vec![chinese, korean]
}

impl Config {
    /// Load a configuration file, creating it with defaults when it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
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
        if self.chunking.max_chars == 0 {
            return Err(anyhow!("chunking.max_chars must be greater than zero"));
        }

        if self.translation.common.max_attempts == 0 {
            return Err(anyhow!("translation.common.max_attempts must be at least 1"));
        }

        if self.target_languages.is_empty() {
            return Err(anyhow!("At least one target language is required"));
        }

        let mut seen = HashSet::new();
        for language in &self.target_languages {
            if language.code.trim().is_empty() {
                return Err(anyhow!("Target language code cannot be empty"));
            }
            if !seen.insert(language.code.to_lowercase()) {
                return Err(anyhow!("Duplicate target language code: {}", language.code));
            }
        }

        if !self.output_layout.contains("{code}") {
            return Err(anyhow!("output_layout must contain the {{code}} placeholder"));
        }

        let endpoint = self.translation.get_endpoint();
        Url::parse(&endpoint).with_context(|| format!("Invalid provider endpoint: {}", endpoint))?;

        if self.translation.provider.requires_api_key() && self.translation.get_api_key().is_empty() {
            return Err(anyhow!(
                "Translation API key is required for {} provider",
                self.translation.provider.display_name()
            ));
        }

        Ok(())
    }

    /// Output directory for one language
    pub fn output_dir_for(&self, language: &TargetLanguage) -> PathBuf {
        self.output_root.join(self.output_layout.replace("{code}", &language.code))
    }

    /// Keep only the languages whose codes are listed
    pub fn restrict_languages(&mut self, codes: &[String]) -> Result<()> {
        if codes.is_empty() {
            return Ok(());
        }
        for code in codes {
            if !self.target_languages.iter().any(|l| language_codes_match(&l.code, code)) {
                return Err(anyhow!("Unknown target language: {}", code));
            }
        }
        self.target_languages
            .retain(|l| codes.iter().any(|c| language_codes_match(c, &l.code)));
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_dir: default_source_dir(),
            output_root: default_output_root(),
            output_layout: default_output_layout(),
            extensions: default_extensions(),
            target_languages: default_target_languages(),
            markers: MarkerConfig::default(),
            chunking: ChunkingConfig::default(),
            post_process: PostProcessConfig::default(),
            glossary: GlossaryConfig::default(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers.iter().find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider, inserting defaults when missing
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let position = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(position) => position,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider.clone()));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[position]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.provider {
            TranslationProvider::OpenAI => default_openai_model(),
            TranslationProvider::Anthropic => default_anthropic_model(),
            TranslationProvider::LMStudio => default_lmstudio_model(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::OpenAI => default_openai_endpoint(),
            TranslationProvider::Anthropic => default_anthropic_endpoint(),
            TranslationProvider::LMStudio => default_lmstudio_endpoint(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .filter(|t| *t > 0)
            .unwrap_or_else(default_timeout_secs)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: default_available_providers(),
            common: TranslationCommonConfig::default(),
        }
    }
}
