//! secp256k1 signer and recoverer backed by `k256`.

use alloy_primitives::U256;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;

use super::{public_key_to_address, CryptoError, DigestSigner, RecoverableSignature, SignatureRecoverer};
use crate::types::{Address20, H256};

/// In-memory signing key. Deterministic (RFC 6979) signatures.
#[derive(Clone)]
pub struct LocalSigner {
    sk: SigningKey,
}

impl LocalSigner {
    pub fn from_bytes(secret: &[u8]) -> Result<Self, CryptoError> {
        let sk = SigningKey::from_slice(secret).map_err(|e| CryptoError::Key(format!("{e}")))?;
        Ok(Self { sk })
    }

    pub fn from_hex(secret: &str) -> Result<Self, CryptoError> {
        let bytes = crate::util::hex_to_bytes(secret).map_err(|e| CryptoError::Key(format!("{e}")))?;
        Self::from_bytes(&bytes)
    }

    pub fn address(&self) -> Address20 {
        verifying_key_address(self.sk.verifying_key())
    }
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &hex::encode(self.address()))
            .finish()
    }
}

impl DigestSigner for LocalSigner {
    fn sign_digest(&self, digest: &H256) -> Result<RecoverableSignature, CryptoError> {
        let (sig, recid) = self
            .sk
            .sign_prehash_recoverable(digest)
            .map_err(|e| CryptoError::Key(format!("{e}")))?;
        let (r, s) = sig.split_bytes();
        Ok(RecoverableSignature {
            recovery_id: recid.is_y_odd() as u8,
            r: U256::from_be_slice(&r),
            s: U256::from_be_slice(&s),
        })
    }
}

/// Stateless ECDSA public-key recovery.
#[derive(Clone, Copy, Debug, Default)]
pub struct Secp256k1Recoverer;

impl SignatureRecoverer for Secp256k1Recoverer {
    fn recover(&self, digest: &H256, recovery_id: u8, r: U256, s: U256) -> Result<Address20, CryptoError> {
        if recovery_id > 1 {
            return Err(CryptoError::InvalidSignature);
        }
        let sig = Signature::from_scalars(r.to_be_bytes::<32>(), s.to_be_bytes::<32>())
            .map_err(|_| CryptoError::InvalidSignature)?;

        // (r, n - s) with the opposite parity recovers the same key; k256 only verifies low-s.
        let mut y_odd = recovery_id == 1;
        let sig = match sig.normalize_s() {
            Some(low) => {
                y_odd = !y_odd;
                low
            }
            None => sig,
        };

        let vk = VerifyingKey::recover_from_prehash(digest, &sig, RecoveryId::new(y_odd, false))
            .map_err(|_| CryptoError::InvalidSignature)?;
        Ok(verifying_key_address(&vk))
    }
}

fn verifying_key_address(vk: &VerifyingKey) -> Address20 {
    let point = PublicKey::from(vk).to_encoded_point(false);
    public_key_to_address(point.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keccak256;

    // well-known development key; its address is 0xf39f...2266
    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn derives_known_address() {
        let signer = LocalSigner::from_hex(DEV_KEY).unwrap();
        assert_eq!(hex::encode(signer.address()), "f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
    }

    #[test]
    fn sign_then_recover() {
        let signer = LocalSigner::from_hex(DEV_KEY).unwrap();
        let digest = keccak256(b"ethtx");
        let sig = signer.sign_digest(&digest).unwrap();
        let addr = Secp256k1Recoverer.recover(&digest, sig.recovery_id, sig.r, sig.s).unwrap();
        assert_eq!(addr, signer.address());
    }

    #[test]
    fn high_s_recovers_same_key() {
        let signer = LocalSigner::from_hex(DEV_KEY).unwrap();
        let digest = keccak256(b"malleable");
        let sig = signer.sign_digest(&digest).unwrap();
        let n = U256::from_str_radix(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
            16,
        )
        .unwrap();
        let flipped = Secp256k1Recoverer
            .recover(&digest, 1 - sig.recovery_id, sig.r, n - sig.s)
            .unwrap();
        assert_eq!(flipped, signer.address());
    }

    #[test]
    fn rejects_zero_scalars_and_bad_parity() {
        let digest = keccak256(b"x");
        assert_eq!(
            Secp256k1Recoverer.recover(&digest, 0, U256::ZERO, U256::ZERO),
            Err(CryptoError::InvalidSignature)
        );
        assert_eq!(
            Secp256k1Recoverer.recover(&digest, 2, U256::from(1u64), U256::from(1u64)),
            Err(CryptoError::InvalidSignature)
        );
    }

    #[test]
    fn rejects_malformed_key() {
        assert!(LocalSigner::from_bytes(&[0u8; 32]).is_err());
        assert!(LocalSigner::from_bytes(&[1u8; 7]).is_err());
    }
}
