//! Hex text <-> bytes at the library boundary.

/// Remove a leading `0x`/`0X` if present.
pub fn strip_0x_prefix(s: &str) -> &str {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

/// Prefix with `0x` unless already prefixed.
pub fn add_0x_prefix(s: &str) -> String {
    if s.starts_with("0x") || s.starts_with("0X") {
        s.to_string()
    } else {
        format!("0x{s}")
    }
}

/// Decode hex text, with or without a `0x` prefix.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(strip_0x_prefix(s.trim()))
}

/// Lower-case hex without a prefix.
pub fn bytes_to_hex(b: &[u8]) -> String {
    hex::encode(b)
}

/// True for non-empty text made only of hex digits after an optional prefix.
pub fn is_hex(s: &str) -> bool {
    let body = strip_0x_prefix(s);
    !body.is_empty() && body.bytes().all(|c| c.is_ascii_hexdigit())
}
