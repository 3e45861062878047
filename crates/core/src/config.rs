//! Configuration for the verdict pipeline.
//!
//! Configuration is environment-first: every knob the core consumes comes in
//! through environment variables, optionally seeded from a YAML file
//! (`VERDICT_CONFIG` or `./verdict.yaml`). Environment variables win over the
//! file; CLI flags win over both.
//!
//! Absence of generative-backend credentials selects fallback answer
//! generation, never an error. Absence of remote vector-store settings
//! selects the local in-memory backend.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default document fetch timeout in seconds.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;

/// Default number of chunks retrieved per question.
const DEFAULT_TOP_K: usize = 6;

/// Default embedding dimension for the local hashed provider.
const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generative backend settings
    pub generator: GeneratorConfig,

    /// Embedding provider settings
    pub embedding: EmbeddingConfig,

    /// Vector index backend settings
    pub index: IndexConfig,

    /// Document fetch timeout in seconds
    pub fetch_timeout_secs: u64,

    /// Chunks retrieved per question
    pub top_k: usize,

    /// Log level override
    pub log_level: Option<String>,

    /// Disable colored output
    pub no_color: bool,
}

/// Generative backend configuration.
///
/// `api_key: None` puts the answer generator into heuristic fallback mode.
/// The mode is decided here, once, at construction, never by an environment
/// read deep inside the per-question call path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// API key for the chat-completions backend
    pub api_key: Option<String>,

    /// Model identifier
    pub model: String,

    /// Custom API base URL (for proxies and compatible servers)
    pub base_url: Option<String>,
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider name ("hashed" or "ollama")
    pub provider: String,

    /// Model identifier (informational for "hashed")
    pub model: String,

    /// Embedding vector dimension
    pub dimensions: usize,

    /// Ollama endpoint, when the ollama provider is selected
    pub ollama_url: Option<String>,
}

/// Vector store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorBackend {
    /// Exact inner-product scan over normalized vectors (in-memory)
    Flat,
    /// k-NN over cosine distance, converted back to similarity (in-memory)
    Neighbor,
    /// Managed remote vector store reached over HTTP
    Remote,
}

impl VectorBackend {
    /// Parse a backend name. Unknown names are a configuration error so a
    /// typo fails at startup rather than silently selecting a default.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.to_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "neighbor" => Ok(Self::Neighbor),
            "remote" => Ok(Self::Remote),
            other => Err(AppError::Config(format!(
                "Unknown vector backend: '{}'. Supported: flat, neighbor, remote",
                other
            ))),
        }
    }

    /// Canonical backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Neighbor => "neighbor",
            Self::Remote => "remote",
        }
    }
}

/// Vector index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Selected backend
    pub backend: VectorBackend,

    /// Remote index name (required for the remote backend)
    pub remote_index: Option<String>,

    /// Remote store endpoint (required for the remote backend)
    pub remote_endpoint: Option<String>,

    /// Remote store API key (required for the remote backend)
    pub remote_api_key: Option<String>,
}

/// YAML config file structure.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    generator: Option<GeneratorFileConfig>,
    embedding: Option<EmbeddingFileConfig>,
    index: Option<IndexFileConfig>,
    fetch: Option<FetchFileConfig>,
    logging: Option<LoggingFileConfig>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeneratorFileConfig {
    model: Option<String>,
    #[serde(rename = "baseUrl")]
    base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbeddingFileConfig {
    provider: Option<String>,
    model: Option<String>,
    dimensions: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
struct IndexFileConfig {
    backend: Option<String>,
    #[serde(rename = "remoteIndex")]
    remote_index: Option<String>,
    #[serde(rename = "remoteEndpoint")]
    remote_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct FetchFileConfig {
    #[serde(rename = "timeoutSecs")]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
struct LoggingFileConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig {
                api_key: None,
                model: "gpt-4o-mini".to_string(),
                base_url: None,
            },
            embedding: EmbeddingConfig {
                provider: "hashed".to_string(),
                model: "hashed-trigram-v1".to_string(),
                dimensions: DEFAULT_EMBEDDING_DIM,
                ollama_url: None,
            },
            index: IndexConfig {
                backend: VectorBackend::Flat,
                remote_index: None,
                remote_endpoint: None,
                remote_api_key: None,
            },
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            top_k: DEFAULT_TOP_K,
            log_level: None,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the optional YAML file and the environment.
    ///
    /// Environment variables (override the file):
    /// - `OPENAI_API_KEY`, `OPENAI_MODEL`, `OPENAI_BASE_URL`
    /// - `VERDICT_VECTOR_BACKEND`, `VERDICT_REMOTE_INDEX`,
    ///   `VERDICT_REMOTE_ENDPOINT`, `VERDICT_REMOTE_API_KEY`
    /// - `VERDICT_EMBEDDING_PROVIDER`, `VERDICT_EMBEDDING_MODEL`,
    ///   `VERDICT_EMBEDDING_DIM`, `OLLAMA_URL`
    /// - `VERDICT_FETCH_TIMEOUT_SECS`, `RUST_LOG`, `NO_COLOR`
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        // YAML file first: explicit path, then ./verdict.yaml
        let config_path = std::env::var("VERDICT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("verdict.yaml"));

        if config_path.exists() {
            config.merge_yaml(&config_path)?;
        }

        // Environment variables override the file
        config.generator.api_key = std::env::var("OPENAI_API_KEY").ok();
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.generator.model = model;
        }
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            config.generator.base_url = Some(base_url);
        }

        if let Ok(backend) = std::env::var("VERDICT_VECTOR_BACKEND") {
            config.index.backend = VectorBackend::parse(&backend)?;
        }
        if let Ok(name) = std::env::var("VERDICT_REMOTE_INDEX") {
            config.index.remote_index = Some(name);
        }
        if let Ok(endpoint) = std::env::var("VERDICT_REMOTE_ENDPOINT") {
            config.index.remote_endpoint = Some(endpoint);
        }
        // Secrets come from the environment only, never the config file.
        config.index.remote_api_key = std::env::var("VERDICT_REMOTE_API_KEY").ok();

        if let Ok(provider) = std::env::var("VERDICT_EMBEDDING_PROVIDER") {
            config.embedding.provider = provider;
        }
        if let Ok(model) = std::env::var("VERDICT_EMBEDDING_MODEL") {
            config.embedding.model = model;
        }
        if let Ok(dim) = std::env::var("VERDICT_EMBEDDING_DIM") {
            config.embedding.dimensions = dim.parse().map_err(|_| {
                AppError::Config(format!("VERDICT_EMBEDDING_DIM is not a number: {}", dim))
            })?;
        }
        if let Ok(url) = std::env::var("OLLAMA_URL") {
            config.embedding.ollama_url = Some(url);
        }

        if let Ok(timeout) = std::env::var("VERDICT_FETCH_TIMEOUT_SECS") {
            config.fetch_timeout_secs = timeout.parse().map_err(|_| {
                AppError::Config(format!(
                    "VERDICT_FETCH_TIMEOUT_SECS is not a number: {}",
                    timeout
                ))
            })?;
        }

        config.log_level = std::env::var("RUST_LOG").ok();
        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config in place.
    fn merge_yaml(&mut self, path: &Path) -> AppResult<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        if let Some(generator) = file.generator {
            if let Some(model) = generator.model {
                self.generator.model = model;
            }
            if let Some(base_url) = generator.base_url {
                self.generator.base_url = Some(base_url);
            }
        }

        if let Some(embedding) = file.embedding {
            if let Some(provider) = embedding.provider {
                self.embedding.provider = provider;
            }
            if let Some(model) = embedding.model {
                self.embedding.model = model;
            }
            if let Some(dimensions) = embedding.dimensions {
                self.embedding.dimensions = dimensions;
            }
        }

        if let Some(index) = file.index {
            if let Some(backend) = index.backend {
                self.index.backend = VectorBackend::parse(&backend)?;
            }
            if let Some(name) = index.remote_index {
                self.index.remote_index = Some(name);
            }
            if let Some(endpoint) = index.remote_endpoint {
                self.index.remote_endpoint = Some(endpoint);
            }
        }

        if let Some(fetch) = file.fetch {
            if let Some(timeout) = fetch.timeout_secs {
                self.fetch_timeout_secs = timeout;
            }
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
        }

        Ok(())
    }

    /// Apply CLI overrides, which take precedence over env and file values.
    pub fn with_overrides(
        mut self,
        model: Option<String>,
        backend: Option<VectorBackend>,
        top_k: Option<usize>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(model) = model {
            self.generator.model = model;
        }

        if let Some(backend) = backend {
            self.index.backend = backend;
        }

        if let Some(top_k) = top_k {
            self.top_k = top_k;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose && self.log_level.is_none() {
            self.log_level = Some("debug".to_string());
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Whether the answer generator has a usable backend.
    pub fn generator_configured(&self) -> bool {
        self.generator
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Validate backend-specific requirements.
    ///
    /// The remote vector store needs an index name, endpoint, and key before
    /// the pipeline starts; failing here keeps the failure out of query time.
    pub fn validate(&self) -> AppResult<()> {
        if self.index.backend == VectorBackend::Remote {
            if self.index.remote_index.is_none() {
                return Err(AppError::Config(
                    "Remote vector backend requires VERDICT_REMOTE_INDEX".to_string(),
                ));
            }
            if self.index.remote_endpoint.is_none() {
                return Err(AppError::Config(
                    "Remote vector backend requires VERDICT_REMOTE_ENDPOINT".to_string(),
                ));
            }
            if self.index.remote_api_key.is_none() {
                return Err(AppError::Config(
                    "Remote vector backend requires VERDICT_REMOTE_API_KEY".to_string(),
                ));
            }
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "Embedding dimension must be greater than zero".to_string(),
            ));
        }

        if self.top_k == 0 {
            return Err(AppError::Config(
                "top_k must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.generator.model, "gpt-4o-mini");
        assert!(config.generator.api_key.is_none());
        assert_eq!(config.index.backend, VectorBackend::Flat);
        assert_eq!(config.embedding.provider, "hashed");
        assert_eq!(config.top_k, 6);
        assert!(!config.generator_configured());
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!(VectorBackend::parse("flat").unwrap(), VectorBackend::Flat);
        assert_eq!(
            VectorBackend::parse("REMOTE").unwrap(),
            VectorBackend::Remote
        );
        assert!(VectorBackend::parse("faiss").is_err());
    }

    #[test]
    fn test_validate_remote_requires_settings() {
        let mut config = AppConfig::default();
        config.index.backend = VectorBackend::Remote;
        assert!(config.validate().is_err());

        config.index.remote_index = Some("policies".to_string());
        config.index.remote_endpoint = Some("https://vectors.example.com".to_string());
        config.index.remote_api_key = Some("key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let mut config = AppConfig::default();
        config.embedding.dimensions = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(
            Some("gpt-4o".to_string()),
            Some(VectorBackend::Neighbor),
            Some(10),
            None,
            true,
            false,
        );

        assert_eq!(config.generator.model, "gpt-4o");
        assert_eq!(config.index.backend, VectorBackend::Neighbor);
        assert_eq!(config.top_k, 10);
        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_merge_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "generator:\n  model: local-model\nindex:\n  backend: neighbor\nfetch:\n  timeoutSecs: 15\n"
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.merge_yaml(file.path()).unwrap();

        assert_eq!(config.generator.model, "local-model");
        assert_eq!(config.index.backend, VectorBackend::Neighbor);
        assert_eq!(config.fetch_timeout_secs, 15);
    }

    #[test]
    fn test_merge_yaml_rejects_unknown_backend() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "index:\n  backend: chroma\n").unwrap();

        let mut config = AppConfig::default();
        assert!(config.merge_yaml(file.path()).is_err());
    }
}
