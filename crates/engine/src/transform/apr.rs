//! Staking APR derived from the mint and staking modules.

use strata_core::chain::StakingPool;
use strata_core::Dec;

/// `annual_provisions / bonded_tokens` as a plain fraction (0.12 means 12%).
///
/// Zero bonded tokens yields zero rather than an error.
pub fn staking_apr(pool: &StakingPool, annual_provisions: &Dec) -> Dec {
    annual_provisions
        .checked_quo(&pool.bonded_tokens)
        .unwrap_or_else(Dec::zero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(bonded: &str) -> StakingPool {
        StakingPool {
            not_bonded_tokens: Dec::zero(),
            bonded_tokens: bonded.parse().unwrap(),
        }
    }

    fn dec(s: &str) -> Dec {
        s.parse().unwrap()
    }

    #[test]
    fn zero_bonded_is_zero() {
        assert_eq!(staking_apr(&pool("0"), &dec("100")), Dec::zero());
        assert_eq!(staking_apr(&pool("0"), &dec("0")), Dec::zero());
    }

    #[test]
    fn zero_provision_is_zero() {
        assert_eq!(staking_apr(&pool("100"), &dec("0")), Dec::zero());
    }

    #[test]
    fn provision_larger_than_bonded() {
        assert_eq!(staking_apr(&pool("100"), &dec("36500")), dec("365"));
    }

    #[test]
    fn provision_smaller_than_bonded() {
        let apr = staking_apr(&pool("100000000000"), &dec("3650000"));
        assert_eq!(apr, dec("0.0000365"));
        assert_eq!(apr.to_string(), "0.000036500000000000");
    }

    #[test]
    fn fractional_provision_is_exact() {
        let apr = staking_apr(&pool("3"), &dec("1"));
        assert_eq!(apr.to_string(), "0.333333333333333333");
    }
}
