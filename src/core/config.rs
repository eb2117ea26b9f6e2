use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::AssistantError;

/// Filesystem locations used by the assistant.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub index_path: PathBuf,
    pub config_path: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let data_dir = discover_data_dir();
        Self::with_data_dir(data_dir)
    }

    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        let log_dir = data_dir.join("logs");
        let index_path = data_dir.join("index").join("vector_index.json");
        let config_path = data_dir.join("config.yml");

        for dir in [&data_dir, &log_dir] {
            let _ = fs::create_dir_all(dir);
        }

        AppPaths {
            data_dir,
            log_dir,
            index_path,
            config_path,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn discover_data_dir() -> PathBuf {
    if let Ok(dir) = env::var("DOCENT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("docent_data")
}

/// Chunking parameters for document splitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub max_size: usize,
    /// Overlap between adjacent chunks
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_size: 2000,
            overlap: 500,
        }
    }
}

/// Retrieval and index-build parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Chunks returned per similarity search
    pub top_k: usize,
    /// Chunks embedded per provider request
    pub batch_size: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            batch_size: 16,
        }
    }
}

/// Model provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub temperature: f64,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            chat_model: "gemini-2.0-flash".to_string(),
            embedding_model: "models/embedding-001".to_string(),
            temperature: 0.5,
            api_key_env: "GOOGLE_API_KEY".to_string(),
        }
    }
}

/// Answer cache bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}

/// Conversation memory settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Cap on turns replayed into prompts. Unset replays the whole log.
    pub max_history_turns: Option<usize>,
}

/// Top-level assistant configuration, loadable from a YAML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
    pub memory: MemoryConfig,
}

impl AssistantConfig {
    /// Load configuration from a YAML file. A missing file yields defaults;
    /// a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, AssistantError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(AssistantError::storage)?;
        serde_yaml::from_str(&contents).map_err(AssistantError::storage)
    }
}
