//! Contract-secured-revenue NFTs, mapped one to one.

use super::Indexed;
use strata_core::chain::RawCsr;
use strata_core::{CsrRecord, StrataResult};

pub fn transform_csrs(raw: &[RawCsr]) -> StrataResult<Indexed<CsrRecord>> {
    let mut out = Indexed::with_capacity(raw.len());
    for csr in raw {
        let record = CsrRecord {
            id: csr.id,
            contracts: csr.contracts.clone(),
            txs: csr.txs,
            revenue: csr.revenue.clone(),
        };
        out.insert(csr.id.to_string(), record)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_fields_and_keys_by_id() {
        let raw = vec![
            RawCsr {
                id: 1,
                contracts: vec!["0xaaa".into(), "0xbbb".into()],
                txs: 12,
                revenue: "123456789012345678901234567890".parse().unwrap(),
            },
            RawCsr {
                id: 9,
                contracts: vec![],
                txs: 0,
                revenue: "0".parse().unwrap(),
            },
        ];
        let out = transform_csrs(&raw).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(
            out.index["1"],
            r#"{"id":1,"contracts":["0xaaa","0xbbb"],"txs":12,"revenue":"123456789012345678901234567890"}"#
        );
        assert_eq!(out.index["9"], r#"{"id":9,"contracts":[],"txs":0,"revenue":"0"}"#);
    }
}
