//! Poll scheduler, dataset transformers and the cache-write protocol.
//!
//! The [`Poller`] drives [`ChainQuerier`](strata_provider::ChainQuerier)
//! calls through the [`transform`] functions into a [`CacheWriter`]; the
//! read API consumes the same keys through a [`CacheReader`].

pub mod cache;
pub mod contracts;
pub mod delegations;
pub mod poller;
pub mod transform;

pub use cache::{CacheReader, CacheStore, CacheWriter, MemoryStore};
pub use contracts::{load_contracts, ContractCall};
pub use delegations::fetch_user_delegations;
pub use poller::{CacheFailurePolicy, CycleReport, Dataset, DatasetOutcome, EngineConfig, Poller};
