use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::rlp::{decode_list_of, list_of, Decodable, Encodable, RlpError, RlpItem};

/// 20-byte Ethereum address.
pub type Address20 = [u8; 20];

/// 32-byte hash.
pub type H256 = [u8; 32];

pub mod transaction;

pub use transaction::{AccessListTx, LegacyTx, PriorityFeeTx, TxRecord};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessListItem {
    pub address: Address20,
    pub storage_keys: Vec<H256>,
}

pub type AccessList = Vec<AccessListItem>;

impl Encodable for AccessListItem {
    fn to_rlp(&self) -> RlpItem {
        RlpItem::List(vec![self.address.to_rlp(), list_of(&self.storage_keys)])
    }
}

impl Decodable for AccessListItem {
    fn from_rlp(item: &RlpItem) -> Result<Self, RlpError> {
        let fields = item.as_list()?;
        if fields.len() != 2 {
            return Err(RlpError::ItemCount { got: fields.len() });
        }
        Ok(Self {
            address: Address20::from_rlp(&fields[0])?,
            storage_keys: decode_list_of(&fields[1])?,
        })
    }
}

/// Signature fields as they appear on the wire.
///
/// For legacy transactions `v` is 27/28 or `chain_id * 2 + 35 + parity`;
/// for typed transactions it is the y-parity bit itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub v: U256,
    pub r: U256,
    pub s: U256,
}

impl Signature {
    /// r = s = 0 marks a template that was never signed.
    pub fn is_empty(&self) -> bool {
        self.r.is_zero() && self.s.is_zero()
    }
}

/// EIP-2718 transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TxType {
    Legacy = 0x00,
    AccessList = 0x01,
    PriorityFee = 0x02,
}

impl TxType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::Legacy),
            0x01 => Some(Self::AccessList),
            0x02 => Some(Self::PriorityFee),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxType::Legacy => write!(f, "Legacy"),
            TxType::AccessList => write!(f, "EIP-2930"),
            TxType::PriorityFee => write!(f, "EIP-1559"),
        }
    }
}
