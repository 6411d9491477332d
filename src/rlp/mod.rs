//! Recursive length-prefix (RLP) encoding.
//!
//! Values are either byte strings or lists of values. [`decode`] accepts
//! only the canonical encoding of exactly one value, so
//! `encode(&decode(buf)?) == buf` for every buffer it accepts.

use alloy_primitives::U256;

pub mod decode;
pub mod encode;
pub mod errors;

pub use decode::{decode, MAX_DEPTH};
pub use encode::{encode, encode_into, encoded_len};
pub use errors::RlpError;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RlpItem {
    Bytes(Vec<u8>),
    List(Vec<RlpItem>),
}

impl RlpItem {
    pub fn empty() -> Self {
        RlpItem::Bytes(Vec::new())
    }

    pub fn as_bytes(&self) -> Result<&[u8], RlpError> {
        match self {
            RlpItem::Bytes(b) => Ok(b),
            RlpItem::List(_) => Err(RlpError::ExpectedBytes),
        }
    }

    pub fn as_list(&self) -> Result<&[RlpItem], RlpError> {
        match self {
            RlpItem::List(items) => Ok(items),
            RlpItem::Bytes(_) => Err(RlpError::ExpectedList),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        encode(self)
    }
}

impl From<Vec<u8>> for RlpItem {
    fn from(b: Vec<u8>) -> Self {
        RlpItem::Bytes(b)
    }
}

impl From<Vec<RlpItem>> for RlpItem {
    fn from(items: Vec<RlpItem>) -> Self {
        RlpItem::List(items)
    }
}

/// Types with a fixed mapping onto an [`RlpItem`].
pub trait Encodable {
    fn to_rlp(&self) -> RlpItem;
}

/// Inverse of [`Encodable`]; rejects every non-canonical representation.
pub trait Decodable: Sized {
    fn from_rlp(item: &RlpItem) -> Result<Self, RlpError>;
}

/// Encode a slice as an RLP list.
pub fn list_of<T: Encodable>(items: &[T]) -> RlpItem {
    RlpItem::List(items.iter().map(Encodable::to_rlp).collect())
}

/// Decode every element of a list item.
pub fn decode_list_of<T: Decodable>(item: &RlpItem) -> Result<Vec<T>, RlpError> {
    item.as_list()?.iter().map(T::from_rlp).collect()
}

/// Big-endian bytes without leading zeros; zero becomes the empty string.
pub fn trim_be(bytes: &[u8]) -> Vec<u8> {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    bytes[first..].to_vec()
}

fn scalar_bytes(item: &RlpItem, width: usize) -> Result<&[u8], RlpError> {
    let b = item.as_bytes()?;
    if b.first() == Some(&0) {
        return Err(RlpError::LeadingZero);
    }
    if b.len() > width {
        return Err(RlpError::IntegerOverflow(width));
    }
    Ok(b)
}

impl Encodable for u64 {
    fn to_rlp(&self) -> RlpItem {
        RlpItem::Bytes(trim_be(&self.to_be_bytes()))
    }
}

impl Decodable for u64 {
    fn from_rlp(item: &RlpItem) -> Result<Self, RlpError> {
        let b = scalar_bytes(item, 8)?;
        Ok(b.iter().fold(0u64, |acc, x| (acc << 8) | *x as u64))
    }
}

impl Encodable for U256 {
    fn to_rlp(&self) -> RlpItem {
        RlpItem::Bytes(trim_be(&self.to_be_bytes::<32>()))
    }
}

impl Decodable for U256 {
    fn from_rlp(item: &RlpItem) -> Result<Self, RlpError> {
        let b = scalar_bytes(item, 32)?;
        Ok(U256::from_be_slice(b))
    }
}

impl Encodable for Vec<u8> {
    fn to_rlp(&self) -> RlpItem {
        RlpItem::Bytes(self.clone())
    }
}

impl Decodable for Vec<u8> {
    fn from_rlp(item: &RlpItem) -> Result<Self, RlpError> {
        Ok(item.as_bytes()?.to_vec())
    }
}

impl<const N: usize> Encodable for [u8; N] {
    fn to_rlp(&self) -> RlpItem {
        RlpItem::Bytes(self.to_vec())
    }
}

impl<const N: usize> Decodable for [u8; N] {
    fn from_rlp(item: &RlpItem) -> Result<Self, RlpError> {
        let b = item.as_bytes()?;
        b.try_into()
            .map_err(|_| RlpError::InvalidLength { expected: N, got: b.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_minimal() {
        assert_eq!(0u64.to_rlp(), RlpItem::empty());
        assert_eq!(1024u64.to_rlp(), RlpItem::Bytes(vec![0x04, 0x00]));
        assert_eq!(U256::from(0x0fu64).to_rlp(), RlpItem::Bytes(vec![0x0f]));
        assert_eq!(encode(&1024u64.to_rlp()), vec![0x82, 0x04, 0x00]);
    }

    #[test]
    fn integer_decoding_is_strict() {
        assert_eq!(u64::from_rlp(&RlpItem::empty()), Ok(0));
        assert_eq!(u64::from_rlp(&RlpItem::Bytes(vec![0x01, 0x00])), Ok(256));
        assert_eq!(
            u64::from_rlp(&RlpItem::Bytes(vec![0x00, 0x01])),
            Err(RlpError::LeadingZero)
        );
        assert_eq!(
            u64::from_rlp(&RlpItem::Bytes(vec![0x01; 9])),
            Err(RlpError::IntegerOverflow(8))
        );
        assert_eq!(
            U256::from_rlp(&RlpItem::Bytes(vec![0x01; 33])),
            Err(RlpError::IntegerOverflow(32))
        );
        assert_eq!(u64::from_rlp(&RlpItem::List(vec![])), Err(RlpError::ExpectedBytes));
    }

    #[test]
    fn u256_beyond_u64() {
        let v = U256::from(u64::MAX) + U256::from(1u64);
        let item = v.to_rlp();
        assert_eq!(item, RlpItem::Bytes(vec![0x01, 0, 0, 0, 0, 0, 0, 0, 0]));
        assert_eq!(U256::from_rlp(&item), Ok(v));
    }

    #[test]
    fn fixed_width_arrays() {
        let addr = [0x11u8; 20];
        assert_eq!(<[u8; 20]>::from_rlp(&addr.to_rlp()), Ok(addr));
        assert_eq!(
            <[u8; 32]>::from_rlp(&RlpItem::Bytes(vec![1; 31])),
            Err(RlpError::InvalidLength { expected: 32, got: 31 })
        );
    }

    #[test]
    fn lists_of_values() {
        let keys = vec![[0u8; 32], [7u8; 32]];
        let item = list_of(&keys);
        assert_eq!(decode_list_of::<[u8; 32]>(&item).unwrap(), keys);
        assert_eq!(
            decode_list_of::<u64>(&RlpItem::empty()),
            Err(RlpError::ExpectedList)
        );
    }
}
