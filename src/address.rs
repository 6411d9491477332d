//! EIP-55 mixed-case checksum addresses.

use std::fmt;
use std::str::FromStr;

use crate::crypto::keccak256;
use crate::error::{Error, Result};
use crate::types::Address20;
use crate::util::strip_0x_prefix;

/// A 20-byte account address together with the text it was parsed from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    bytes: Address20,
    text: String,
}

impl Address {
    /// Accepts `0x` + 40 hex digits (prefix optional). Casing is not checked here; see [`Address::is_valid`].
    pub fn parse(s: &str) -> Result<Self> {
        let body = hex_body(s).ok_or_else(|| Error::InvalidAddress(s.to_string()))?;
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(body, &mut bytes).map_err(|_| Error::InvalidAddress(s.to_string()))?;
        Ok(Self { bytes, text: format!("0x{body}") })
    }

    pub fn from_bytes(bytes: Address20) -> Self {
        let text = checksum_body(&hex::encode(bytes));
        Self { bytes, text: format!("0x{text}") }
    }

    pub fn bytes(&self) -> &Address20 {
        &self.bytes
    }

    /// The text as supplied, normalised to a `0x` prefix.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_valid(&self) -> bool {
        validate(&self.text)
    }

    pub fn checksummed(&self) -> String {
        format!("0x{}", checksum_body(&hex::encode(self.bytes)))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.checksummed())
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Address::parse(s)
    }
}

/// True if `s` is a well-formed address whose casing is either uniform or a correct checksum.
pub fn validate(s: &str) -> bool {
    let Some(body) = hex_body(s) else {
        return false;
    };
    let has_lower = body.bytes().any(|c| c.is_ascii_lowercase());
    let has_upper = body.bytes().any(|c| c.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }
    checksum_body(body) == body
}

/// Checksummed, `0x`-prefixed form of `s`.
pub fn checksum(s: &str) -> Result<String> {
    let body = hex_body(s).ok_or_else(|| Error::InvalidAddress(s.to_string()))?;
    Ok(format!("0x{}", checksum_body(body)))
}

/// The 40 hex digits after an optional prefix, or `None` if `s` has any other shape.
fn hex_body(s: &str) -> Option<&str> {
    let body = strip_0x_prefix(s);
    (body.len() == 40 && body.bytes().all(|c| c.is_ascii_hexdigit())).then_some(body)
}

fn checksum_body(body: &str) -> String {
    let lower = body.to_ascii_lowercase();
    let digest = keccak256(lower.as_bytes());
    lower
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let byte = digest[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn computes_checksums() {
        for addr in CHECKSUMMED {
            assert_eq!(checksum(&addr.to_lowercase()).unwrap(), addr);
            assert_eq!(checksum(&addr.to_uppercase().replace("0X", "0x")).unwrap(), addr);
        }
        assert_eq!(
            checksum("90f8bf6a479f320ead074411a4b0e7944ea8c9c1").unwrap(),
            "0x90F8bf6A479f320ead074411a4B0e7944Ea8c9C1"
        );
    }

    #[test]
    fn validates_checksums() {
        for addr in CHECKSUMMED {
            assert!(validate(addr));
        }
        // uniform case is accepted unchecked
        assert!(validate("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(validate("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED"));
        assert!(validate("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        // one flipped letter breaks the checksum
        assert!(!validate("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"));
        assert!(!validate("0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(!validate("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAe"));
        assert!(!validate("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAedd"));
        assert!(!validate("0xgaAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert!(!validate(""));
        assert!(matches!(checksum("0x1234"), Err(Error::InvalidAddress(_))));
        assert!(Address::parse("not an address").is_err());
    }

    #[test]
    fn address_value() {
        let a = Address::parse("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(a.bytes()[0], 0x5a);
        assert_eq!(a.as_str(), "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
        assert_eq!(a.to_string(), CHECKSUMMED[0]);
        assert_eq!(Address::from_bytes(*a.bytes()).as_str(), CHECKSUMMED[0]);
        let parsed: Address = CHECKSUMMED[1].parse().unwrap();
        assert!(parsed.is_valid());
    }
}
