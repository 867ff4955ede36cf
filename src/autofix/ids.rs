//! Injected identifier source for synthesized sections, rows and modules.

/// Produces fresh identifiers. Implementations must not rely on global state.
pub trait IdSource {
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Deterministic ids: blake3 over `(seed, counter)`, truncated to 12 hex digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededIds {
    seed: u64,
    counter: u64,
}

impl SeededIds {
    pub fn new(seed: u64) -> Self {
        Self { seed, counter: 0 }
    }
}

impl IdSource for SeededIds {
    fn next_id(&mut self, prefix: &str) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(&self.counter.to_le_bytes());
        self.counter += 1;
        let digest = hasher.finalize();
        format!("{}_{}", prefix, &hex::encode(digest.as_bytes())[..12])
    }
}
