use config::{builder::DefaultState, Config as ConfigLoader, ConfigBuilder, ConfigError, File};
use helpdesk_llm::{ProviderConfig, ProviderType};
use serde::Deserialize;
use std::path::Path;

/// Environment variables that override single config keys
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("server.host", "SERVER_HOST"),
    ("server.port", "SERVER_PORT"),
    ("llm.provider", "LLM_PROVIDER"),
    ("llm.model", "LLM_MODEL"),
    ("llm.base_url", "LLM_BASE_URL"),
    ("llm.timeout_secs", "LLM_TIMEOUT_SECS"),
    ("storage.chats_file", "STORAGE_CHATS_FILE"),
    ("storage.feedback_file", "STORAGE_FEEDBACK_FILE"),
    ("storage.database_url", "STORAGE_DATABASE_URL"),
    ("storage.blob_dir", "STORAGE_BLOB_DIR"),
    ("storage.mongodb_database", "STORAGE_MONGODB_DATABASE"),
    ("logging.level", "LOG_LEVEL"),
    ("logging.format", "LOG_FORMAT"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub llm: LlmConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub mongodb_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderType,
    pub model: String,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Deadline for each completion call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub chats_file: String,
    pub feedback_file: String,
    pub database_url: String,
    pub blob_dir: String,
    /// Database name used when MONGODB_URI is set
    #[serde(default)]
    pub mongodb_database: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (SERVER_, LLM_, STORAGE_, LOG_ prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));
        let builder = apply_env_overrides(builder)?;

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        let key_var = match cfg.llm.provider {
            ProviderType::Gemini => "GEMINI_API_KEY",
            ProviderType::OpenAI => "OPENAI_API_KEY",
        };
        cfg.api_key = std::env::var(key_var)
            .map_err(|_| ConfigError::Message(format!("{key_var} environment variable is required")))?;
        cfg.mongodb_uri = std::env::var("MONGODB_URI").ok().filter(|uri| !uri.is_empty());

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Completion provider settings for the client factory
    pub fn provider(&self) -> ProviderConfig {
        let provider = match self.llm.provider {
            ProviderType::Gemini => ProviderConfig::gemini(&self.api_key, &self.llm.model),
            ProviderType::OpenAI => ProviderConfig::openai(&self.api_key, &self.llm.model),
        };
        provider.with_base_url(self.llm.base_url.clone())
    }
}

fn apply_env_overrides(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    ENV_OVERRIDES.iter().try_fold(builder, |builder, (key, var)| {
        builder.set_override_option(*key, std::env::var(var).ok())
    })
}
