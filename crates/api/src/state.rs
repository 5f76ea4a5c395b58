use std::sync::Arc;
use strata_engine::CacheReader;
use strata_provider::ChainQuerier;

/// Bech32 prefix of validator operator addresses on Canto.
pub const DEFAULT_VALIDATOR_PREFIX: &str = "cantovaloper";

#[derive(Clone)]
pub struct AppState {
    reader: CacheReader,
    querier: Arc<dyn ChainQuerier>,
    validator_prefix: Arc<str>,
}

impl AppState {
    pub fn new(reader: CacheReader, querier: Arc<dyn ChainQuerier>) -> Self {
        Self {
            reader,
            querier,
            validator_prefix: Arc::from(DEFAULT_VALIDATOR_PREFIX),
        }
    }

    #[must_use]
    pub fn with_validator_prefix(mut self, prefix: &str) -> Self {
        self.validator_prefix = Arc::from(prefix);
        self
    }

    pub fn reader(&self) -> &CacheReader {
        &self.reader
    }

    pub fn querier(&self) -> &dyn ChainQuerier {
        self.querier.as_ref()
    }

    pub fn validator_prefix(&self) -> &str {
        &self.validator_prefix
    }
}
