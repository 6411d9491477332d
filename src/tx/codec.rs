//! Wire layouts of the three transaction kinds.
//!
//! Legacy:   rlp([nonce, gas_price, gas_limit, to, value, data, v, r, s])
//! 0x01:     0x01 || rlp([chain_id, nonce, gas_price, gas_limit, to, value, data, access_list, y, r, s])
//! 0x02:     0x02 || rlp([chain_id, nonce, max_priority_fee, max_fee, gas_limit, to, value, data, access_list, y, r, s])
//!
//! Unsigned records drop the trailing signature triple, except legacy
//! records with a chain id, which carry `[chain_id, 0, 0]` (EIP-155).

use alloy_primitives::U256;
use tracing::debug;

use super::signature::chain_id_from_v;
use crate::crypto::keccak256;
use crate::error::{Error, Result};
use crate::rlp::{self, decode_list_of, list_of, Decodable, Encodable, RlpError, RlpItem};
use crate::types::{AccessListTx, Address20, LegacyTx, PriorityFeeTx, Signature, TxRecord, TxType, H256};

/// Field layout shared by every transaction kind.
pub trait TypedTransaction: Sized {
    const TX_TYPE: TxType;

    /// Fields preceding the signature, in wire order.
    fn payload_fields(&self) -> Vec<RlpItem>;

    fn signature(&self) -> Option<&Signature>;

    /// Rebuild from the items of the (type-stripped) RLP list.
    fn from_fields(fields: &[RlpItem]) -> std::result::Result<Self, RlpError>;

    /// Items hashed for signing.
    fn signing_fields(&self) -> Vec<RlpItem> {
        self.payload_fields()
    }

    /// Items of the wire form; an unsigned record is its signing payload.
    fn wire_fields(&self) -> Vec<RlpItem> {
        match self.signature() {
            Some(sig) => {
                let mut fields = self.payload_fields();
                fields.extend([sig.v.to_rlp(), sig.r.to_rlp(), sig.s.to_rlp()]);
                fields
            }
            None => self.signing_fields(),
        }
    }

    fn encode_signing_payload(&self) -> Vec<u8> {
        envelope(Self::TX_TYPE, self.signing_fields())
    }

    fn encode_wire(&self) -> Vec<u8> {
        envelope(Self::TX_TYPE, self.wire_fields())
    }
}

/// Legacy bodies are bare lists; typed bodies are prefixed by their type byte (EIP-2718).
fn envelope(tx_type: TxType, fields: Vec<RlpItem>) -> Vec<u8> {
    let body = rlp::encode(&RlpItem::List(fields));
    match tx_type {
        TxType::Legacy => body,
        typed => {
            let mut out = Vec::with_capacity(1 + body.len());
            out.push(typed.as_u8());
            out.extend_from_slice(&body);
            out
        }
    }
}

fn destination_to_rlp(to: &Option<Address20>) -> RlpItem {
    match to {
        Some(a) => a.to_rlp(),
        None => RlpItem::empty(),
    }
}

fn destination_from_rlp(item: &RlpItem) -> std::result::Result<Option<Address20>, RlpError> {
    if item.as_bytes()?.is_empty() {
        return Ok(None);
    }
    Address20::from_rlp(item).map(Some)
}

fn typed_signature(fields: &[RlpItem]) -> std::result::Result<Signature, RlpError> {
    let v = U256::from_rlp(&fields[0])?;
    if v > U256::from(1u64) {
        return Err(RlpError::InvalidValue("y_parity"));
    }
    Ok(Signature { v, r: U256::from_rlp(&fields[1])?, s: U256::from_rlp(&fields[2])? })
}

impl TypedTransaction for LegacyTx {
    const TX_TYPE: TxType = TxType::Legacy;

    fn payload_fields(&self) -> Vec<RlpItem> {
        vec![
            self.nonce.to_rlp(),
            self.gas_price.to_rlp(),
            self.gas_limit.to_rlp(),
            destination_to_rlp(&self.destination),
            self.amount.to_rlp(),
            self.payload.to_rlp(),
        ]
    }

    fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    fn signing_fields(&self) -> Vec<RlpItem> {
        let mut fields = self.payload_fields();
        if let Some(chain_id) = self.chain_id {
            fields.extend([chain_id.to_rlp(), RlpItem::empty(), RlpItem::empty()]);
        }
        fields
    }

    /// A zeroed signature is a template: its `v` slot would decode as the chain id,
    /// so it goes out in the unsigned (EIP-155 payload) form instead.
    fn wire_fields(&self) -> Vec<RlpItem> {
        match &self.signature {
            Some(sig) if !sig.is_empty() => {
                let mut fields = self.payload_fields();
                fields.extend([sig.v.to_rlp(), sig.r.to_rlp(), sig.s.to_rlp()]);
                fields
            }
            _ => self.signing_fields(),
        }
    }

    fn from_fields(fields: &[RlpItem]) -> std::result::Result<Self, RlpError> {
        if fields.len() != 6 && fields.len() != 9 {
            return Err(RlpError::ItemCount { got: fields.len() });
        }
        let mut tx = LegacyTx {
            chain_id: None,
            nonce: u64::from_rlp(&fields[0])?,
            gas_price: U256::from_rlp(&fields[1])?,
            gas_limit: u64::from_rlp(&fields[2])?,
            destination: destination_from_rlp(&fields[3])?,
            amount: U256::from_rlp(&fields[4])?,
            payload: Vec::<u8>::from_rlp(&fields[5])?,
            signature: None,
        };
        if fields.len() == 9 {
            let sig = Signature {
                v: U256::from_rlp(&fields[6])?,
                r: U256::from_rlp(&fields[7])?,
                s: U256::from_rlp(&fields[8])?,
            };
            if sig.is_empty() {
                // EIP-155 signing payload: v slot holds the chain id
                tx.chain_id = Some(sig.v);
            } else {
                tx.chain_id = chain_id_from_v(sig.v);
                tx.signature = Some(sig);
            }
        }
        Ok(tx)
    }
}

impl TypedTransaction for AccessListTx {
    const TX_TYPE: TxType = TxType::AccessList;

    fn payload_fields(&self) -> Vec<RlpItem> {
        vec![
            self.chain_id.to_rlp(),
            self.nonce.to_rlp(),
            self.gas_price.to_rlp(),
            self.gas_limit.to_rlp(),
            destination_to_rlp(&self.destination),
            self.amount.to_rlp(),
            self.payload.to_rlp(),
            list_of(&self.access_list),
        ]
    }

    fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    fn from_fields(fields: &[RlpItem]) -> std::result::Result<Self, RlpError> {
        if fields.len() != 8 && fields.len() != 11 {
            return Err(RlpError::ItemCount { got: fields.len() });
        }
        Ok(AccessListTx {
            chain_id: U256::from_rlp(&fields[0])?,
            nonce: u64::from_rlp(&fields[1])?,
            gas_price: U256::from_rlp(&fields[2])?,
            gas_limit: u64::from_rlp(&fields[3])?,
            destination: destination_from_rlp(&fields[4])?,
            amount: U256::from_rlp(&fields[5])?,
            payload: Vec::<u8>::from_rlp(&fields[6])?,
            access_list: decode_list_of(&fields[7])?,
            signature: match fields.len() {
                11 => Some(typed_signature(&fields[8..])?),
                _ => None,
            },
        })
    }
}

impl TypedTransaction for PriorityFeeTx {
    const TX_TYPE: TxType = TxType::PriorityFee;

    fn payload_fields(&self) -> Vec<RlpItem> {
        vec![
            self.chain_id.to_rlp(),
            self.nonce.to_rlp(),
            self.max_priority_fee_per_gas.to_rlp(),
            self.max_fee_per_gas.to_rlp(),
            self.gas_limit.to_rlp(),
            destination_to_rlp(&self.destination),
            self.amount.to_rlp(),
            self.payload.to_rlp(),
            list_of(&self.access_list),
        ]
    }

    fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    fn from_fields(fields: &[RlpItem]) -> std::result::Result<Self, RlpError> {
        if fields.len() != 9 && fields.len() != 12 {
            return Err(RlpError::ItemCount { got: fields.len() });
        }
        Ok(PriorityFeeTx {
            chain_id: U256::from_rlp(&fields[0])?,
            nonce: u64::from_rlp(&fields[1])?,
            max_priority_fee_per_gas: U256::from_rlp(&fields[2])?,
            max_fee_per_gas: U256::from_rlp(&fields[3])?,
            gas_limit: u64::from_rlp(&fields[4])?,
            destination: destination_from_rlp(&fields[5])?,
            amount: U256::from_rlp(&fields[6])?,
            payload: Vec::<u8>::from_rlp(&fields[7])?,
            access_list: decode_list_of(&fields[8])?,
            signature: match fields.len() {
                12 => Some(typed_signature(&fields[9..])?),
                _ => None,
            },
        })
    }
}

fn decode_body<T: TypedTransaction>(body: &[u8]) -> Result<T> {
    let item = rlp::decode(body)?;
    Ok(T::from_fields(item.as_list()?)?)
}

impl TxRecord {
    /// Parse wire bytes. A leading byte >= 0xc0 starts a legacy list; 0x01 and
    /// 0x02 select the typed layouts; anything else is an unknown type.
    pub fn decode(raw: &[u8]) -> Result<TxRecord> {
        let first = *raw.first().ok_or(RlpError::UnexpectedEnd)?;
        if first >= 0xc0 {
            debug!(len = raw.len(), "decoding legacy transaction");
            return Ok(TxRecord::Legacy(decode_body(raw)?));
        }
        match TxType::from_u8(first) {
            Some(TxType::AccessList) => {
                debug!(len = raw.len(), "decoding EIP-2930 transaction");
                Ok(TxRecord::AccessList(decode_body(&raw[1..])?))
            }
            Some(TxType::PriorityFee) => {
                debug!(len = raw.len(), "decoding EIP-1559 transaction");
                Ok(TxRecord::PriorityFee(decode_body(&raw[1..])?))
            }
            _ => {
                debug!(type_byte = first, "unknown transaction type");
                Err(Error::TransactionType(first))
            }
        }
    }

    /// Signing payload when `include_signature` is false, wire form otherwise.
    pub fn encode(&self, include_signature: bool) -> Vec<u8> {
        match (self, include_signature) {
            (TxRecord::Legacy(tx), true) => tx.encode_wire(),
            (TxRecord::Legacy(tx), false) => tx.encode_signing_payload(),
            (TxRecord::AccessList(tx), true) => tx.encode_wire(),
            (TxRecord::AccessList(tx), false) => tx.encode_signing_payload(),
            (TxRecord::PriorityFee(tx), true) => tx.encode_wire(),
            (TxRecord::PriorityFee(tx), false) => tx.encode_signing_payload(),
        }
    }

    /// Same record without its signature; legacy records keep their chain id.
    pub fn unsigned_copy(&self) -> TxRecord {
        let mut copy = self.clone();
        *copy.signature_slot() = None;
        copy
    }

    /// Digest the signer signs and the recoverer checks against.
    pub fn signing_hash(&self) -> H256 {
        keccak256(&self.encode(false))
    }

    /// Keccak-256 of the wire form.
    pub fn hash(&self) -> H256 {
        keccak256(&self.encode(true))
    }
}
