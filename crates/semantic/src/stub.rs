use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use fxhash::hash64;

use crate::{Embedding, EmbeddingProvider, SemanticError};

#[derive(Debug, Clone)]
enum StubBehavior {
    Fixed(Embedding),
    Failing(String),
    Hashed { dim: usize },
}

/// In-process provider for tests and offline runs.
///
/// Counts every call so callers can assert how many upstream requests a batch
/// would have produced.
#[derive(Debug)]
pub struct StubProvider {
    behavior: StubBehavior,
    fail_on: HashSet<String>,
    model: String,
    calls: AtomicUsize,
}

impl StubProvider {
    /// Always answer with `embedding`.
    pub fn fixed(embedding: impl Into<Embedding>) -> Self {
        Self::with_behavior(StubBehavior::Fixed(embedding.into()))
    }

    /// Always fail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(StubBehavior::Failing(message.into()))
    }

    /// Deterministic sinusoid vector of length `dim` seeded by a hash of the text.
    pub fn hashed(dim: usize) -> Self {
        Self::with_behavior(StubBehavior::Hashed { dim })
    }

    fn with_behavior(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            fail_on: HashSet::new(),
            model: "stub".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail for this exact input text regardless of the configured behavior.
    pub fn fail_on(mut self, text: impl Into<String>) -> Self {
        self.fail_on.insert(text.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Number of `embed` calls served so far, failures included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for StubProvider {
    async fn embed(&self, text: &str) -> Result<Embedding, SemanticError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_on.contains(text) {
            return Err(SemanticError::Stub(format!("configured to fail on '{text}'")));
        }

        match &self.behavior {
            StubBehavior::Fixed(embedding) => Ok(embedding.clone()),
            StubBehavior::Failing(message) => Err(SemanticError::Stub(message.clone())),
            StubBehavior::Hashed { dim } => Ok(hashed_vector(text, *dim).into()),
        }
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn hashed_vector(text: &str, dim: usize) -> Vec<f32> {
    let h = hash64(text.as_bytes());
    (0..dim)
        .map(|idx| ((h >> (idx % 32)) as f32 * 0.0001).sin())
        .collect()
}
