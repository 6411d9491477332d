//! Building unsigned records from loosely specified parameters.

use alloy_primitives::U256;
use tracing::debug;

use super::access_list::{sanitize_list, RawAccessListItem};
use crate::address::{self, Address};
use crate::config::TxConfig;
use crate::error::{Error, Result};
use crate::types::{AccessListTx, Address20, LegacyTx, PriorityFeeTx, TxRecord, TxType};

/// Transaction parameters; anything left `None` is filled from [`TxConfig`].
///
/// The kind is the explicit `tx_type` if given, otherwise EIP-1559 when a
/// priority or max fee is present, EIP-2930 when an access list is present,
/// and legacy otherwise.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TxParams {
    pub tx_type: Option<TxType>,
    pub chain_id: Option<U256>,
    pub nonce: u64,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<U256>,
    pub max_priority_fee_per_gas: Option<U256>,
    pub max_fee_per_gas: Option<U256>,
    /// Hex address; `None` or empty creates a contract.
    pub to: Option<String>,
    pub value: U256,
    pub data: Vec<u8>,
    pub access_list: Option<Vec<RawAccessListItem>>,
}

impl TxParams {
    pub fn inferred_type(&self) -> TxType {
        if let Some(t) = self.tx_type {
            return t;
        }
        if self.max_priority_fee_per_gas.is_some() || self.max_fee_per_gas.is_some() {
            TxType::PriorityFee
        } else if self.access_list.is_some() {
            TxType::AccessList
        } else {
            TxType::Legacy
        }
    }

    /// Validate and assemble an unsigned record.
    pub fn build(&self, cfg: &TxConfig) -> Result<TxRecord> {
        let tx_type = self.inferred_type();
        self.check_fields_for(tx_type)?;

        let destination = parse_destination(self.to.as_deref())?;
        let access_list = sanitize_list(self.access_list.as_deref().unwrap_or_default())?;
        let chain_id = self.chain_id.unwrap_or(U256::from(cfg.chain.default_chain_id));
        let gas_limit = self.gas_limit.unwrap_or(cfg.gas.default_gas_limit);

        let list_for_gas = (tx_type != TxType::Legacy).then_some(access_list.as_slice());
        let intrinsic = cfg.costs.intrinsic_gas(&self.data, list_for_gas, destination.is_none());
        if gas_limit < intrinsic {
            return Err(Error::Parameter(format!(
                "gas limit {gas_limit} is below intrinsic gas, try {intrinsic}"
            )));
        }
        if gas_limit > cfg.gas.block_gas_limit {
            return Err(Error::Parameter(format!(
                "gas limit {gas_limit} exceeds block gas limit {}",
                cfg.gas.block_gas_limit
            )));
        }

        let gas_price = self.gas_price.unwrap_or(U256::from(cfg.gas.default_gas_price));
        let record = match tx_type {
            TxType::Legacy => TxRecord::Legacy(LegacyTx {
                chain_id: Some(chain_id),
                nonce: self.nonce,
                gas_price,
                gas_limit,
                destination,
                amount: self.value,
                payload: self.data.clone(),
                signature: None,
            }),
            TxType::AccessList => TxRecord::AccessList(AccessListTx {
                chain_id,
                nonce: self.nonce,
                gas_price,
                gas_limit,
                destination,
                amount: self.value,
                payload: self.data.clone(),
                access_list,
                signature: None,
            }),
            TxType::PriorityFee => {
                let priority = self
                    .max_priority_fee_per_gas
                    .unwrap_or(U256::from(cfg.gas.default_priority_fee));
                let max_fee = self.max_fee_per_gas.unwrap_or(U256::from(cfg.gas.default_max_fee));
                if max_fee < priority {
                    return Err(Error::Parameter(format!(
                        "max fee {max_fee} is below priority fee {priority}"
                    )));
                }
                TxRecord::PriorityFee(PriorityFeeTx {
                    chain_id,
                    nonce: self.nonce,
                    max_priority_fee_per_gas: priority,
                    max_fee_per_gas: max_fee,
                    gas_limit,
                    destination,
                    amount: self.value,
                    payload: self.data.clone(),
                    access_list,
                    signature: None,
                })
            }
        };
        debug!(tx_type = %tx_type, gas_limit, intrinsic, "built unsigned transaction");
        Ok(record)
    }

    fn check_fields_for(&self, tx_type: TxType) -> Result<()> {
        let has_1559_fees = self.max_priority_fee_per_gas.is_some() || self.max_fee_per_gas.is_some();
        match tx_type {
            TxType::Legacy if self.access_list.is_some() => {
                Err(Error::Parameter("legacy transactions carry no access list".into()))
            }
            TxType::Legacy | TxType::AccessList if has_1559_fees => Err(Error::Parameter(format!(
                "{tx_type} transactions take a gas price, not priority/max fees"
            ))),
            TxType::PriorityFee if self.gas_price.is_some() => Err(Error::Parameter(
                "EIP-1559 transactions take priority/max fees, not a gas price".into(),
            )),
            _ => Ok(()),
        }
    }
}

fn parse_destination(to: Option<&str>) -> Result<Option<Address20>> {
    match to.map(str::trim) {
        None | Some("") | Some("0x") => Ok(None),
        Some(s) => {
            if !address::validate(s) {
                return Err(Error::InvalidAddress(s.to_string()));
            }
            Ok(Some(*Address::parse(s)?.bytes()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TO: &str = "0xCAEdBD63fB25c3126Bfe96c1AF208e4688E9817e";

    fn base() -> TxParams {
        TxParams { to: Some(TO.to_lowercase()), ..Default::default() }
    }

    #[test]
    fn type_inference() {
        assert_eq!(base().inferred_type(), TxType::Legacy);
        let p = TxParams { access_list: Some(vec![]), ..base() };
        assert_eq!(p.inferred_type(), TxType::AccessList);
        let p = TxParams { max_fee_per_gas: Some(U256::from(1u64)), access_list: Some(vec![]), ..base() };
        assert_eq!(p.inferred_type(), TxType::PriorityFee);
        let p = TxParams { tx_type: Some(TxType::PriorityFee), ..base() };
        assert_eq!(p.inferred_type(), TxType::PriorityFee);
    }

    #[test]
    fn defaults_come_from_config() {
        let mut cfg = TxConfig::default();
        cfg.chain.default_chain_id = 5;
        let rec = TxParams { tx_type: Some(TxType::PriorityFee), ..base() }.build(&cfg).unwrap();
        let TxRecord::PriorityFee(tx) = rec else { panic!("expected EIP-1559") };
        assert_eq!(tx.chain_id, U256::from(5u64));
        assert_eq!(tx.gas_limit, 21_000);
        assert_eq!(tx.max_priority_fee_per_gas, U256::from(1_010_000_000u64));
        assert_eq!(tx.max_fee_per_gas, U256::from(42_690_000_000u64));
        assert!(tx.signature.is_none());
    }

    #[test]
    fn legacy_is_replay_protected() {
        let rec = base().build(&TxConfig::default()).unwrap();
        assert_eq!(rec.tx_type(), TxType::Legacy);
        assert_eq!(rec.chain_id(), Some(U256::from(1u64)));
        assert_eq!(rec.gas_price(), Some(U256::from(42_690_000_000u64)));
    }

    #[test]
    fn gas_limit_bounds() {
        let cfg = TxConfig::default();
        let p = TxParams { data: vec![1; 10], ..base() };
        assert_eq!(
            p.build(&cfg),
            Err(Error::Parameter("gas limit 21000 is below intrinsic gas, try 21160".into()))
        );
        let p = TxParams { gas_limit: Some(30_000_001), ..base() };
        assert!(matches!(p.build(&cfg), Err(Error::Parameter(_))));
        let p = TxParams { gas_limit: Some(30_000_000), ..base() };
        assert!(p.build(&cfg).is_ok());
    }

    #[test]
    fn creation_pays_for_init_code() {
        let cfg = TxConfig::default();
        let p = TxParams { to: None, data: vec![0x5f], gas_limit: Some(21_016), ..Default::default() };
        assert!(matches!(p.build(&cfg), Err(Error::Parameter(_))));
        let p = TxParams { gas_limit: Some(21_018), ..p };
        assert!(p.build(&cfg).unwrap().is_contract_creation());
    }

    #[test]
    fn destination_must_be_valid() {
        let cfg = TxConfig::default();
        assert!(TxParams { to: Some(TO.into()), ..base() }.build(&cfg).is_ok());
        let bad_case = TO.replace('C', "c");
        assert_eq!(
            TxParams { to: Some(bad_case.clone()), ..base() }.build(&cfg),
            Err(Error::InvalidAddress(bad_case))
        );
        let p = TxParams { to: Some("0x1234".into()), ..base() };
        assert!(matches!(p.build(&cfg), Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn mismatched_fields_are_rejected() {
        let cfg = TxConfig::default();
        let p = TxParams { tx_type: Some(TxType::Legacy), access_list: Some(vec![]), ..base() };
        assert!(matches!(p.build(&cfg), Err(Error::Parameter(_))));
        let p = TxParams { gas_price: Some(U256::from(1u64)), max_fee_per_gas: Some(U256::from(1u64)), ..base() };
        assert!(matches!(p.build(&cfg), Err(Error::Parameter(_))));
        let p = TxParams {
            max_priority_fee_per_gas: Some(U256::from(2u64)),
            max_fee_per_gas: Some(U256::from(1u64)),
            ..base()
        };
        assert!(matches!(p.build(&cfg), Err(Error::Parameter(_))));
    }

    #[test]
    fn access_list_is_sanitized_and_priced() {
        let cfg = TxConfig::default();
        let item = RawAccessListItem::Pair("0xde0b295669a9fd93d5f28d9ec85e40f4cb697bae".into(), vec![]);
        let p = TxParams { access_list: Some(vec![item]), ..base() };
        assert!(matches!(p.build(&cfg), Err(Error::Parameter(_))));
        let p = TxParams { gas_limit: Some(23_400), ..p };
        let rec = p.build(&cfg).unwrap();
        assert_eq!(rec.tx_type(), TxType::AccessList);
        assert_eq!(rec.access_list().map(|l| l.len()), Some(1));
    }
}
