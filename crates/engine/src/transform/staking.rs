//! Validator set normalization.

use super::Indexed;
use strata_core::chain::RawValidator;
use strata_core::{StrataResult, ValidatorRecord};

/// Flattens each validator to its current commission rate and indexes by
/// operator address.
pub fn transform_validators(raw: &[RawValidator]) -> StrataResult<Indexed<ValidatorRecord>> {
    let mut out = Indexed::with_capacity(raw.len());
    for v in raw {
        let record = ValidatorRecord {
            operator_address: v.operator_address.clone(),
            jailed: v.jailed,
            status: v.status,
            tokens: v.tokens.clone(),
            description: v.description.clone(),
            commission: v.commission.commission_rates.rate.clone(),
        };
        out.insert(v.operator_address.clone(), record)?;
    }
    Ok(out)
}
