use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use super::{AccessList, AccessListItem, Address20, Signature, TxType};

/// Pre-EIP-2718 transaction. The chain id is explicit until signed and
/// afterwards follows from `v` (absent for 27/28 signatures).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyTx {
    pub chain_id: Option<U256>,
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: u64,
    pub destination: Option<Address20>, // None = contract creation
    pub amount: U256,
    pub payload: Vec<u8>,
    pub signature: Option<Signature>,
}

/// EIP-2930 transaction (type 0x01).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessListTx {
    pub chain_id: U256,
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: u64,
    pub destination: Option<Address20>,
    pub amount: U256,
    pub payload: Vec<u8>,
    pub access_list: AccessList,
    pub signature: Option<Signature>,
}

/// EIP-1559 transaction (type 0x02).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityFeeTx {
    pub chain_id: U256,
    pub nonce: u64,
    pub max_priority_fee_per_gas: U256,
    pub max_fee_per_gas: U256,
    pub gas_limit: u64,
    pub destination: Option<Address20>,
    pub amount: U256,
    pub payload: Vec<u8>,
    pub access_list: AccessList,
    pub signature: Option<Signature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxRecord {
    Legacy(LegacyTx),
    AccessList(AccessListTx),
    PriorityFee(PriorityFeeTx),
}

macro_rules! common_field {
    ($self:ident, $field:ident) => {
        match $self {
            TxRecord::Legacy(tx) => &tx.$field,
            TxRecord::AccessList(tx) => &tx.$field,
            TxRecord::PriorityFee(tx) => &tx.$field,
        }
    };
}

impl TxRecord {
    pub fn tx_type(&self) -> TxType {
        match self {
            TxRecord::Legacy(_) => TxType::Legacy,
            TxRecord::AccessList(_) => TxType::AccessList,
            TxRecord::PriorityFee(_) => TxType::PriorityFee,
        }
    }

    pub fn nonce(&self) -> u64 {
        *common_field!(self, nonce)
    }

    pub fn gas_limit(&self) -> u64 {
        *common_field!(self, gas_limit)
    }

    pub fn destination(&self) -> Option<&Address20> {
        common_field!(self, destination).as_ref()
    }

    pub fn amount(&self) -> U256 {
        *common_field!(self, amount)
    }

    pub fn payload(&self) -> &[u8] {
        common_field!(self, payload)
    }

    pub fn signature(&self) -> Option<&Signature> {
        common_field!(self, signature).as_ref()
    }

    pub fn is_contract_creation(&self) -> bool {
        self.destination().is_none()
    }

    pub fn is_signed(&self) -> bool {
        self.signature().is_some_and(|sig| !sig.is_empty())
    }

    /// `v` for legacy records, y-parity for typed ones; `None` when unsigned.
    pub fn signature_v(&self) -> Option<U256> {
        self.signature().map(|sig| sig.v)
    }

    pub fn signature_r(&self) -> U256 {
        self.signature().map(|sig| sig.r).unwrap_or(U256::ZERO)
    }

    pub fn signature_s(&self) -> U256 {
        self.signature().map(|sig| sig.s).unwrap_or(U256::ZERO)
    }

    pub fn chain_id(&self) -> Option<U256> {
        match self {
            TxRecord::Legacy(tx) => tx.chain_id,
            TxRecord::AccessList(tx) => Some(tx.chain_id),
            TxRecord::PriorityFee(tx) => Some(tx.chain_id),
        }
    }

    /// Legacy records have no access list.
    pub fn access_list(&self) -> Option<&[AccessListItem]> {
        match self {
            TxRecord::Legacy(_) => None,
            TxRecord::AccessList(tx) => Some(&tx.access_list),
            TxRecord::PriorityFee(tx) => Some(&tx.access_list),
        }
    }

    pub fn gas_price(&self) -> Option<U256> {
        match self {
            TxRecord::Legacy(tx) => Some(tx.gas_price),
            TxRecord::AccessList(tx) => Some(tx.gas_price),
            TxRecord::PriorityFee(_) => None,
        }
    }

    pub fn max_priority_fee_per_gas(&self) -> Option<U256> {
        match self {
            TxRecord::PriorityFee(tx) => Some(tx.max_priority_fee_per_gas),
            _ => None,
        }
    }

    pub fn max_fee_per_gas(&self) -> Option<U256> {
        match self {
            TxRecord::PriorityFee(tx) => Some(tx.max_fee_per_gas),
            _ => None,
        }
    }

    pub(crate) fn signature_slot(&mut self) -> &mut Option<Signature> {
        match self {
            TxRecord::Legacy(tx) => &mut tx.signature,
            TxRecord::AccessList(tx) => &mut tx.signature,
            TxRecord::PriorityFee(tx) => &mut tx.signature,
        }
    }
}

impl From<LegacyTx> for TxRecord {
    fn from(tx: LegacyTx) -> Self {
        TxRecord::Legacy(tx)
    }
}

impl From<AccessListTx> for TxRecord {
    fn from(tx: AccessListTx) -> Self {
        TxRecord::AccessList(tx)
    }
}

impl From<PriorityFeeTx> for TxRecord {
    fn from(tx: PriorityFeeTx) -> Self {
        TxRecord::PriorityFee(tx)
    }
}
