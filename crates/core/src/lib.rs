//! Domain models, exact decimals, and error definitions.
//!
//! Foundation crate -- no async or I/O dependencies.

pub mod chain;
pub mod decimal;
pub mod error;
pub mod types;

pub use decimal::Dec;
pub use error::{StrataError, StrataResult};
pub use types::{
    CsrRecord, DelegationInfo, DelegationSnapshot, ProposalRecord, RewardsInfo, Snapshot,
    UnbondingRecord, ValidatorRecord, ValidatorReward,
};
