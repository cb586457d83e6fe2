use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub retrieval: RetrievalConfig,
    pub summarizer: Option<SummarizerConfig>,
    pub chat: ChatConfig,
    pub sync: SyncConfig,
    pub importer: ImporterConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_keys: Vec<String>,
    /// Public URL of this deployment. Used by the importer to reject
    /// importing a site into itself.
    pub public_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
}

/// ZeroEntropy retrieval service configuration.
///
/// `api_key` is optional: without it the retrieval tier is unavailable and
/// the answer flow degrades straight to its fallbacks.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub collection: String,
    pub top_k: u32,
    pub timeout_secs: u64,
}

/// Summarization (chat completion) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Reply returned when every answer tier has failed.
    pub default_response: String,
    /// Forward questions to an external answer engine when the retrieval
    /// tier yields nothing.
    pub use_remote: bool,
    pub remote_url: Option<String>,
    pub remote_timeout_secs: u64,
    /// Site-wide kill switch: when false, `/message` returns the default
    /// response without touching any upstream.
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Background sweep interval. 0 disables the sweep.
    pub interval_secs: u64,
    /// How many recent posts each sweep (and the default manual run) pushes.
    pub batch_limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImporterConfig {
    pub timeout_secs: u64,
    pub test_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("NEWSDESK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("NEWSDESK_PORT", 3000),
                api_keys: env::var("NEWSDESK_API_KEYS")
                    .map(|keys| keys.split(',').map(|s| s.trim().to_string()).collect())
                    .unwrap_or_default(),
                public_url: env::var("NEWSDESK_PUBLIC_URL").ok(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:newsdesk.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
            },
            retrieval: RetrievalConfig {
                api_key: env::var("ZEROENTROPY_API_KEY").ok(),
                base_url: env::var("ZEROENTROPY_BASE_URL")
                    .unwrap_or_else(|_| "https://api.zeroentropy.dev/v1".to_string()),
                collection: env::var("ZEROENTROPY_COLLECTION")
                    .unwrap_or_else(|_| "wordpress_posts".to_string()),
                top_k: parse_env_or("RETRIEVAL_TOP_K", 2),
                timeout_secs: parse_env_or("RETRIEVAL_TIMEOUT", 30),
            },
            summarizer: env::var("OPENAI_API_KEY").ok().map(|api_key| SummarizerConfig {
                model: env::var("SUMMARIZER_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
                api_key: Some(api_key),
                base_url: env::var("SUMMARIZER_BASE_URL").ok(),
                timeout_secs: parse_env_or("SUMMARIZER_TIMEOUT", 60),
                max_tokens: parse_env_or("SUMMARIZER_MAX_TOKENS", 300),
                temperature: parse_env_or("SUMMARIZER_TEMPERATURE", 0.7),
            }),
            chat: ChatConfig {
                default_response: env::var("CHAT_DEFAULT_RESPONSE").unwrap_or_else(|_| {
                    "Thanks — we received your question. We will answer shortly.".to_string()
                }),
                use_remote: parse_env_or("CHAT_USE_REMOTE", false),
                remote_url: env::var("CHAT_REMOTE_URL").ok(),
                remote_timeout_secs: parse_env_or("CHAT_REMOTE_TIMEOUT", 15),
                enabled: parse_env_or("CHAT_ENABLED", true),
            },
            sync: SyncConfig {
                interval_secs: parse_env_or("SYNC_INTERVAL_SECS", 0),
                batch_limit: parse_env_or("SYNC_BATCH_LIMIT", 10),
            },
            importer: ImporterConfig {
                timeout_secs: parse_env_or("IMPORT_TIMEOUT", 30),
                test_timeout_secs: parse_env_or("IMPORT_TEST_TIMEOUT", 10),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
