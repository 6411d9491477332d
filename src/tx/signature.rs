//! Signature attachment and sender recovery.
//!
//! Legacy `v` is `27 + parity` before EIP-155 and `chain_id * 2 + 35 + parity`
//! after it; typed transactions store the bare parity bit.

use alloy_primitives::U256;
use tracing::debug;

use crate::crypto::secp256k1::Secp256k1Recoverer;
use crate::crypto::{DigestSigner, RecoverableSignature, SignatureRecoverer};
use crate::error::{Error, Result};
use crate::types::{Address20, Signature, TxRecord};

pub const LEGACY_V_BASE: u64 = 27;
pub const EIP155_V_OFFSET: u64 = 35;

/// Legacy `v` for a recovery id, replay-protected when a chain id is known.
pub fn legacy_v(chain_id: Option<U256>, recovery_id: u8) -> U256 {
    let parity = U256::from(recovery_id);
    match chain_id {
        Some(c) => c
            .saturating_mul(U256::from(2u64))
            .saturating_add(U256::from(EIP155_V_OFFSET))
            .saturating_add(parity),
        None => U256::from(LEGACY_V_BASE) + parity,
    }
}

/// Chain id encoded in a legacy `v`; `None` for pre-EIP-155 values.
pub fn chain_id_from_v(v: U256) -> Option<U256> {
    if v < U256::from(EIP155_V_OFFSET) {
        return None;
    }
    Some((v - U256::from(EIP155_V_OFFSET)) / U256::from(2u64))
}

/// Parity bit of a legacy `v`.
pub fn recovery_id_from_v(v: U256) -> Option<u8> {
    let base = U256::from(LEGACY_V_BASE);
    if v == base || v == base + U256::from(1u64) {
        return Some((v - base).bit(0) as u8);
    }
    if v >= U256::from(EIP155_V_OFFSET) {
        return Some((v - U256::from(EIP155_V_OFFSET)).bit(0) as u8);
    }
    None
}

impl TxRecord {
    /// Attach a signature produced over [`TxRecord::signing_hash`].
    pub fn with_signature(&self, sig: RecoverableSignature) -> Result<TxRecord> {
        if sig.recovery_id > 1 {
            return Err(Error::Signing(format!("recovery id {} out of range", sig.recovery_id)));
        }
        let v = match self {
            TxRecord::Legacy(tx) => legacy_v(tx.chain_id, sig.recovery_id),
            _ => U256::from(sig.recovery_id),
        };
        let mut signed = self.clone();
        *signed.signature_slot() = Some(Signature { v, r: sig.r, s: sig.s });
        Ok(signed)
    }

    pub fn sign(&self, signer: &dyn DigestSigner) -> Result<TxRecord> {
        let digest = self.signing_hash();
        let sig = signer
            .sign_digest(&digest)
            .map_err(|e| Error::Signing(e.to_string()))?;
        debug!(tx_type = %self.tx_type(), recovery_id = sig.recovery_id, "signed transaction");
        self.with_signature(sig)
    }

    /// Parity bit of the attached signature, `None` when unsigned.
    pub fn recovery_id(&self) -> Result<Option<u8>> {
        let Some(sig) = self.signature().filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let id = match self {
            TxRecord::Legacy(_) => recovery_id_from_v(sig.v),
            _ if sig.v <= U256::from(1u64) => Some(sig.v.bit(0) as u8),
            _ => None,
        };
        id.map(Some)
            .ok_or_else(|| Error::Recovery(format!("invalid signature v {}", sig.v)))
    }

    /// Signer address, or `None` for an unsigned record.
    pub fn sender_with(&self, recoverer: &dyn SignatureRecoverer) -> Result<Option<Address20>> {
        let Some(recovery_id) = self.recovery_id()? else {
            debug!("unsigned transaction, no sender");
            return Ok(None);
        };
        let digest = self.signing_hash();
        let addr = recoverer.recover(&digest, recovery_id, self.signature_r(), self.signature_s())?;
        Ok(Some(addr))
    }

    /// Lowercase unprefixed hex of the signer address; empty when unsigned.
    pub fn sender(&self) -> Result<String> {
        Ok(self
            .sender_with(&Secp256k1Recoverer)?
            .map(hex::encode)
            .unwrap_or_default())
    }
}
