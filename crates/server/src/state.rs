use crate::config::ServerConfig;
use crate::error::ServerResult;
use semantic::EmbeddingProvider;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Embedding provider (shared across requests, immutable)
    pub provider: Arc<dyn EmbeddingProvider>,

    /// Counters surfaced by `/metrics`
    pub stats: Arc<RequestStats>,
}

impl ServerState {
    /// Create new server state, building the provider from config
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let provider = semantic::build_provider(&config.provider)?;
        Ok(Self::with_provider(config, provider))
    }

    /// Create server state around an already-built provider
    pub fn with_provider(config: ServerConfig, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
            stats: Arc::new(RequestStats::default()),
        }
    }

    /// Check if a function key is valid
    pub fn is_valid_function_key(&self, key: &str) -> bool {
        self.config
            .function_keys
            .iter()
            .any(|known| bool::from(known.as_bytes().ct_eq(key.as_bytes())))
    }
}

/// Monotonic counters for the embedding route.
#[derive(Debug, Default)]
pub struct RequestStats {
    batches: AtomicU64,
    rejected_batches: AtomicU64,
    records: AtomicU64,
    record_failures: AtomicU64,
}

impl RequestStats {
    pub fn record_batch(&self, records: usize, failures: usize) {
        self.batches.fetch_add(1, Ordering::Relaxed);
        self.records.fetch_add(records as u64, Ordering::Relaxed);
        self.record_failures
            .fetch_add(failures as u64, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected_batches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            batches: self.batches.load(Ordering::Relaxed),
            rejected_batches: self.rejected_batches.load(Ordering::Relaxed),
            records: self.records.load(Ordering::Relaxed),
            record_failures: self.record_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StatsSnapshot {
    pub batches: u64,
    pub rejected_batches: u64,
    pub records: u64,
    pub record_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use semantic::StubProvider;

    fn state_with_keys(keys: &[&str]) -> ServerState {
        let mut config = ServerConfig::default();
        config
            .function_keys
            .extend(keys.iter().map(|k| k.to_string()));
        ServerState::with_provider(config, Arc::new(StubProvider::hashed(4)))
    }

    #[test]
    fn function_key_validation() {
        let state = state_with_keys(&["alpha", "beta"]);
        assert!(state.is_valid_function_key("alpha"));
        assert!(state.is_valid_function_key("beta"));
        assert!(!state.is_valid_function_key("alph"));
        assert!(!state.is_valid_function_key(""));
    }

    #[test]
    fn stats_accumulate() {
        let stats = RequestStats::default();
        stats.record_batch(3, 1);
        stats.record_batch(2, 0);
        stats.record_rejected();

        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                batches: 2,
                rejected_batches: 1,
                records: 5,
                record_failures: 1,
            }
        );
    }

    #[test]
    fn new_builds_provider_from_config() {
        let mut config = ServerConfig::default();
        config.provider.kind = semantic::ProviderKind::Stub;
        let state = ServerState::new(config).unwrap();
        assert_eq!(state.provider.name(), "stub");
    }
}
