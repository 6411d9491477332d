use alloy_primitives::U256;
use sha3::{Digest, Keccak256};
use thiserror::Error;

use crate::types::{Address20, H256};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("key error: {0}")]
    Key(String),
}

/// Keccak-256 digest of `data`.
pub fn keccak256(data: &[u8]) -> H256 {
    let mut h = Keccak256::new();
    h.update(data);
    let r = h.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&r);
    out
}

/// Address of an uncompressed SEC1 public key (`0x04 || X || Y`).
pub fn public_key_to_address(uncompressed: &[u8]) -> Address20 {
    let body = uncompressed.strip_prefix(&[0x04]).unwrap_or(uncompressed);
    let hash = keccak256(body);
    let mut out = [0u8; 20];
    out.copy_from_slice(&hash[12..]);
    out
}

/// An ECDSA signature plus the bit that selects which key it recovers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    pub recovery_id: u8,
    pub r: U256,
    pub s: U256,
}

/// Signs a 32-byte digest. Implemented outside the codec (local keys, HSMs, remote signers).
pub trait DigestSigner: Send + Sync {
    fn sign_digest(&self, digest: &H256) -> Result<RecoverableSignature, CryptoError>;
}

/// Recovers the signing address from a digest and signature.
pub trait SignatureRecoverer: Send + Sync {
    fn recover(&self, digest: &H256, recovery_id: u8, r: U256, s: U256) -> Result<Address20, CryptoError>;
}

pub mod secp256k1;
