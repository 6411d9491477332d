//! Intrinsic gas: the cost charged for a transaction before any execution.

use serde::{Deserialize, Serialize};

use crate::types::AccessListItem;

/// Flat cost of every transaction; also the default gas limit for plain transfers.
pub const DEFAULT_GAS_LIMIT: u64 = 21_000;
/// 1.01 gwei.
pub const DEFAULT_PRIORITY_FEE: u64 = 1_010_000_000;
/// 42.69 gwei.
pub const DEFAULT_GAS_PRICE: u64 = 42_690_000_000;
pub const BLOCK_GAS_LIMIT: u64 = 30_000_000;

/// EIP-2028 call data pricing.
pub const COST_ZERO_BYTE: u64 = 4;
pub const COST_NON_ZERO_BYTE: u64 = 16;
/// EIP-3860, per 32-byte word of init code.
pub const COST_INITCODE_WORD: u64 = 2;
/// EIP-2930 access list pricing.
pub const COST_ADDRESS: u64 = 2_400;
pub const COST_STORAGE_KEY: u64 = 1_900;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasSchedule {
    pub tx_base: u64,
    pub zero_byte: u64,
    pub non_zero_byte: u64,
    pub initcode_word: u64,
    pub access_list_address: u64,
    pub access_list_storage_key: u64,
}

impl Default for GasSchedule {
    fn default() -> Self {
        Self {
            tx_base: DEFAULT_GAS_LIMIT,
            zero_byte: COST_ZERO_BYTE,
            non_zero_byte: COST_NON_ZERO_BYTE,
            initcode_word: COST_INITCODE_WORD,
            access_list_address: COST_ADDRESS,
            access_list_storage_key: COST_STORAGE_KEY,
        }
    }
}

impl GasSchedule {
    /// Sum of the base cost, call data, access list (when supplied, even if
    /// empty) and, for contract creation, the init code word surcharge.
    pub fn intrinsic_gas(
        &self,
        payload: &[u8],
        access_list: Option<&[AccessListItem]>,
        is_contract_creation: bool,
    ) -> u64 {
        let mut gas = self.tx_base.saturating_add(self.calldata_gas(payload));
        if let Some(list) = access_list {
            gas = gas.saturating_add(self.access_list_gas(list));
        }
        if is_contract_creation {
            gas = gas.saturating_add(self.initcode_gas(payload));
        }
        gas
    }

    pub fn calldata_gas(&self, payload: &[u8]) -> u64 {
        let zero = payload.iter().filter(|b| **b == 0).count() as u64;
        let non_zero = payload.len() as u64 - zero;
        zero.saturating_mul(self.zero_byte)
            .saturating_add(non_zero.saturating_mul(self.non_zero_byte))
    }

    pub fn access_list_gas(&self, list: &[AccessListItem]) -> u64 {
        let keys: u64 = list.iter().map(|item| item.storage_keys.len() as u64).sum();
        (list.len() as u64)
            .saturating_mul(self.access_list_address)
            .saturating_add(keys.saturating_mul(self.access_list_storage_key))
    }

    /// Words are rounded up, so one byte of init code costs a full word.
    pub fn initcode_gas(&self, payload: &[u8]) -> u64 {
        let words = (payload.len() as u64).div_ceil(32);
        words.saturating_mul(self.initcode_word)
    }
}

/// Intrinsic gas under the protocol schedule.
pub fn estimate_intrinsic_gas(
    payload: &[u8],
    access_list: Option<&[AccessListItem]>,
    is_contract_creation: bool,
) -> u64 {
    GasSchedule::default().intrinsic_gas(payload, access_list, is_contract_creation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_list() -> Vec<AccessListItem> {
        let mut k3 = [0u8; 32];
        k3[31] = 3;
        let mut k7 = [0u8; 32];
        k7[31] = 7;
        vec![
            AccessListItem { address: [0xde; 20], storage_keys: vec![k3, k7] },
            AccessListItem { address: [0xbb; 20], storage_keys: vec![] },
        ]
    }

    #[test]
    fn empty_transaction_costs_base() {
        assert_eq!(estimate_intrinsic_gas(b"", None, false), 21_000);
        assert_eq!(estimate_intrinsic_gas(b"", Some(&[]), false), 21_000);
        assert_eq!(estimate_intrinsic_gas(b"", Some(&[]), true), 21_000);
    }

    #[test]
    fn call_data_bytes() {
        assert_eq!(estimate_intrinsic_gas(b"Lorem, Ipsum!", None, false), 21_208);
        assert_eq!(estimate_intrinsic_gas(&[0, 0, 1], None, false), 21_000 + 4 + 4 + 16);
    }

    #[test]
    fn init_code_words_round_up() {
        assert_eq!(estimate_intrinsic_gas(b"Lorem, Ipsum!", None, true), 21_210);
        assert_eq!(estimate_intrinsic_gas(&[0x5f], None, true), 21_018);
        assert_eq!(estimate_intrinsic_gas(&[0x01; 32], None, true), 21_000 + 32 * 16 + 2);
        assert_eq!(estimate_intrinsic_gas(&[0x01; 33], None, true), 21_000 + 33 * 16 + 4);
    }

    #[test]
    fn access_list_entries() {
        let list = sample_list();
        assert_eq!(estimate_intrinsic_gas(b"", Some(&list), false), 29_600);
        assert_eq!(GasSchedule::default().access_list_gas(&list), 8_600);
    }

    #[test]
    fn custom_schedule() {
        let schedule = GasSchedule { tx_base: 0, non_zero_byte: 68, ..GasSchedule::default() };
        assert_eq!(schedule.intrinsic_gas(&[1, 2], None, false), 136);
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        let schedule = GasSchedule { tx_base: u64::MAX, ..GasSchedule::default() };
        assert_eq!(schedule.intrinsic_gas(&[1], None, true), u64::MAX);
    }
}
