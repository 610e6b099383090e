use enrichment::EnrichmentConfig;
use semantic::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds. `None` (default) lets a batch run as long as
    /// its sequential provider calls take.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Function keys accepted on the embedding route
    #[serde(default)]
    pub function_keys: HashSet<String>,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level / `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Upstream embedding provider
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Which vectors each record receives
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: None,
            max_body_size_mb: default_max_body_size_mb(),
            function_keys: HashSet::new(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            provider: ProviderConfig::default(),
            enrichment: EnrichmentConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config files
    ///
    /// Sources, later wins: optional `server.{toml,yaml,json}` file, then
    /// `EMBED_SERVER__*` variables (`EMBED_SERVER__PROVIDER__MODEL_ID=...`).
    /// `function_keys` accepts a comma-separated list.
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("server").required(false))
            .add_source(
                config::Environment::with_prefix("EMBED_SERVER")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("function_keys"),
            );

        let config: ServerConfig = builder.build()?.try_deserialize()?;
        config.provider.validate()?;

        Ok(config)
    }

    /// Fill settings that have a conventional fallback. Call after logging is up,
    /// since the generated key is only ever shown in the log.
    ///
    /// The provider token falls back to `hf_token_env` (normally `HF_TOKEN`),
    /// and an empty key set gets one random key so the route is never open.
    pub fn with_env_fallbacks(mut self, hf_token_env: Option<String>) -> Self {
        if self.provider.hf_token.is_none() {
            self.provider.hf_token = hf_token_env.filter(|t| !t.trim().is_empty());
        }
        if self.provider.hf_token.is_none() {
            tracing::warn!("No Hugging Face token configured; upstream calls are unauthenticated");
        }

        if self.function_keys.is_empty() {
            let key = uuid::Uuid::new_v4().simple().to_string();
            tracing::warn!(
                "No function keys configured, generated ephemeral key '{}'",
                key
            );
            self.function_keys.insert(key);
        }

        self
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_size_mb() -> usize {
    10
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use enrichment::VectorFields;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.timeout_secs, None);
        assert!(cfg.timeout().is_none());
        assert_eq!(cfg.max_body_size_mb, 10);
        assert!(cfg.enable_cors);
        assert!(cfg.function_keys.is_empty());
        assert_eq!(cfg.enrichment.fields, VectorFields::QuestionAndAnswer);
        assert_eq!(cfg.provider.model_id, "sentence-transformers/all-MiniLM-L6-v2");
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_timeout_is_opt_in() {
        let cfg: ServerConfig = serde_json::from_str(r#"{"timeout_secs": 45}"#).unwrap();
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(45)));

        let cfg: ServerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.timeout(), None);
    }

    #[test]
    fn test_max_body_size_in_bytes() {
        let cfg = ServerConfig {
            max_body_size_mb: 2,
            ..Default::default()
        };
        assert_eq!(cfg.max_body_size(), 2 * 1024 * 1024);
    }

    #[test]
    fn test_fallbacks_fill_token_and_key() {
        let cfg = ServerConfig::default().with_env_fallbacks(Some("hf_env".into()));
        assert_eq!(cfg.provider.hf_token.as_deref(), Some("hf_env"));
        assert_eq!(cfg.function_keys.len(), 1);
    }

    #[test]
    fn test_fallbacks_keep_explicit_values() {
        let mut cfg = ServerConfig::default();
        cfg.provider.hf_token = Some("hf_file".into());
        cfg.function_keys.insert("k1".into());

        let cfg = cfg.with_env_fallbacks(Some("hf_env".into()));
        assert_eq!(cfg.provider.hf_token.as_deref(), Some("hf_file"));
        assert_eq!(cfg.function_keys.len(), 1);
        assert!(cfg.function_keys.contains("k1"));
    }

    #[test]
    fn test_nested_sections_deserialize() {
        let cfg: ServerConfig = serde_json::from_str(
            r#"{
                "port": 7071,
                "function_keys": ["abc"],
                "provider": {"kind": "stub", "stub_dim": 16},
                "enrichment": {"fields": "question"}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.port, 7071);
        assert!(cfg.function_keys.contains("abc"));
        assert_eq!(cfg.provider.stub_dim, 16);
        assert_eq!(cfg.enrichment.fields, VectorFields::Question);
    }
}
