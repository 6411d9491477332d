//! Access lists as supplied by callers: hex strings or raw bytes, in
//! JSON-RPC object form or as `[address, [keys...]]` pairs.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{AccessList, AccessListItem};
use crate::util::hex_to_bytes;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListValue {
    Hex(String),
    Bytes(Vec<u8>),
}

impl ListValue {
    fn to_fixed<const N: usize>(&self, what: &str) -> Result<[u8; N]> {
        let bytes = match self {
            ListValue::Hex(s) => hex_to_bytes(s)
                .map_err(|e| Error::InvalidAccessList(format!("{what} {s:?}: {e}")))?,
            ListValue::Bytes(b) => b.clone(),
        };
        <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
            Error::InvalidAccessList(format!("{what} must be {N} bytes, got {}", bytes.len()))
        })
    }
}

impl From<&str> for ListValue {
    fn from(s: &str) -> Self {
        ListValue::Hex(s.to_string())
    }
}

impl From<Vec<u8>> for ListValue {
    fn from(b: Vec<u8>) -> Self {
        ListValue::Bytes(b)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAccessListItem {
    Object {
        address: ListValue,
        #[serde(rename = "storageKeys", default)]
        storage_keys: Vec<ListValue>,
    },
    Pair(ListValue, Vec<ListValue>),
}

impl RawAccessListItem {
    fn parts(&self) -> (&ListValue, &[ListValue]) {
        match self {
            RawAccessListItem::Object { address, storage_keys } => (address, storage_keys),
            RawAccessListItem::Pair(address, keys) => (address, keys),
        }
    }
}

/// Normalize a caller-supplied access list into binary entries.
pub fn sanitize_list(list: &[RawAccessListItem]) -> Result<AccessList> {
    list.iter()
        .map(|entry| {
            let (address, keys) = entry.parts();
            Ok(AccessListItem {
                address: address.to_fixed::<20>("address")?,
                storage_keys: keys
                    .iter()
                    .map(|k| k.to_fixed::<32>("storage key"))
                    .collect::<Result<_>>()?,
            })
        })
        .collect()
}

/// Parse a JSON access list, e.g. `[{"address":"0x..","storageKeys":["0x.."]}]`.
pub fn parse_json(json: &str) -> Result<AccessList> {
    let raw: Vec<RawAccessListItem> =
        serde_json::from_str(json).map_err(|e| Error::InvalidAccessList(e.to_string()))?;
    sanitize_list(&raw)
}
