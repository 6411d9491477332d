//! Transaction codec: type dispatch, signing payloads, signatures and hashing.

pub mod access_list;
pub mod codec;
pub mod params;
pub mod signature;

use std::ops::Deref;
use std::sync::OnceLock;

pub use access_list::{sanitize_list, ListValue, RawAccessListItem};
pub use codec::TypedTransaction;
pub use params::TxParams;
pub use signature::{chain_id_from_v, legacy_v, recovery_id_from_v};

use crate::crypto::secp256k1::Secp256k1Recoverer;
use crate::crypto::{DigestSigner, SignatureRecoverer};
use crate::error::Result;
use crate::gas::GasSchedule;
use crate::types::{Address20, TxRecord, TxType, H256};
use crate::util::{add_0x_prefix, bytes_to_hex, hex_to_bytes};

impl TxRecord {
    /// Intrinsic gas of this record under `schedule`. Typed records always
    /// price their (possibly empty) access list.
    pub fn intrinsic_gas(&self, schedule: &GasSchedule) -> u64 {
        schedule.intrinsic_gas(self.payload(), self.access_list(), self.is_contract_creation())
    }

    /// True once the attached gas limit covers the intrinsic cost.
    pub fn covers_intrinsic_gas(&self, schedule: &GasSchedule) -> bool {
        self.gas_limit() >= self.intrinsic_gas(schedule)
    }
}

/// A record plus lazily computed hash and sender.
pub struct Transaction {
    record: TxRecord,
    hash: OnceLock<H256>,
    sender: OnceLock<Option<Address20>>,
}

impl Transaction {
    pub fn new(record: TxRecord) -> Self {
        Self { record, hash: OnceLock::new(), sender: OnceLock::new() }
    }

    pub fn decode(raw: &[u8]) -> Result<Self> {
        TxRecord::decode(raw).map(Self::new)
    }

    /// Decode from hex, `0x` prefix optional.
    pub fn decode_hex(raw: &str) -> Result<Self> {
        Self::decode(&hex_to_bytes(raw)?)
    }

    pub fn record(&self) -> &TxRecord {
        &self.record
    }

    pub fn encoded(&self) -> Vec<u8> {
        self.record.encode(true)
    }

    /// `0x`-prefixed wire form.
    pub fn to_hex(&self) -> String {
        add_0x_prefix(&bytes_to_hex(&self.encoded()))
    }

    pub fn hash(&self) -> H256 {
        *self.hash.get_or_init(|| self.record.hash())
    }

    /// Lowercase unprefixed hex of [`Transaction::hash`].
    pub fn hash_hex(&self) -> String {
        bytes_to_hex(&self.hash())
    }

    /// Signer address via secp256k1 recovery; cached after the first success.
    pub fn sender_address(&self) -> Result<Option<Address20>> {
        if let Some(cached) = self.sender.get() {
            return Ok(*cached);
        }
        let addr = self.record.sender_with(&Secp256k1Recoverer)?;
        Ok(*self.sender.get_or_init(|| addr))
    }

    /// Lowercase unprefixed sender hex, empty for unsigned transactions.
    pub fn sender(&self) -> Result<String> {
        Ok(self.sender_address()?.map(hex::encode).unwrap_or_default())
    }

    /// Recover with a caller-supplied recoverer; bypasses the cache.
    pub fn sender_with(&self, recoverer: &dyn SignatureRecoverer) -> Result<Option<Address20>> {
        self.record.sender_with(recoverer)
    }

    pub fn sign(&self, signer: &dyn DigestSigner) -> Result<Transaction> {
        self.record.sign(signer).map(Self::new)
    }

    pub fn unsigned_copy(&self) -> Transaction {
        Self::new(self.record.unsigned_copy())
    }

    pub fn transaction_type(&self) -> TxType {
        self.record.tx_type()
    }
}

impl Deref for Transaction {
    type Target = TxRecord;

    fn deref(&self) -> &TxRecord {
        &self.record
    }
}

impl From<TxRecord> for Transaction {
    fn from(record: TxRecord) -> Self {
        Self::new(record)
    }
}

impl Clone for Transaction {
    fn clone(&self) -> Self {
        Self { record: self.record.clone(), hash: self.hash.clone(), sender: self.sender.clone() }
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
    }
}

impl Eq for Transaction {}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("record", &self.record)
            .field("hash", &self.hash.get().map(hex::encode))
            .finish()
    }
}
