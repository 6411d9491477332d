use super::{RlpError, RlpItem};

/// Lists nested deeper than this are rejected instead of recursing further.
/// Transactions nest three deep; the cap keeps recursion well inside a 2 MiB thread stack.
pub const MAX_DEPTH: usize = 128;

/// Decode exactly one value from `buf`; any bytes left over are an error.
pub fn decode(buf: &[u8]) -> Result<RlpItem, RlpError> {
    let (item, rest) = decode_item(buf, 0)?;
    if !rest.is_empty() {
        return Err(RlpError::TrailingBytes(rest.len()));
    }
    Ok(item)
}

fn decode_item(buf: &[u8], depth: usize) -> Result<(RlpItem, &[u8]), RlpError> {
    let prefix = *buf.first().ok_or(RlpError::UnexpectedEnd)?;
    let rest = &buf[1..];
    match prefix {
        0x00..=0x7f => Ok((RlpItem::Bytes(vec![prefix]), rest)),
        0x80..=0xb7 => {
            let len = (prefix - 0x80) as usize;
            let (payload, tail) = split(rest, len)?;
            if len == 1 && payload[0] < 0x80 {
                return Err(RlpError::NonCanonicalSingleByte(payload[0]));
            }
            Ok((RlpItem::Bytes(payload.to_vec()), tail))
        }
        0xb8..=0xbf => {
            let (len, rest) = read_long_length(rest, (prefix - 0xb7) as usize)?;
            let (payload, tail) = split(rest, len)?;
            Ok((RlpItem::Bytes(payload.to_vec()), tail))
        }
        0xc0..=0xf7 => {
            let len = (prefix - 0xc0) as usize;
            let (payload, tail) = split(rest, len)?;
            Ok((RlpItem::List(decode_list_payload(payload, depth)?), tail))
        }
        0xf8..=0xff => {
            let (len, rest) = read_long_length(rest, (prefix - 0xf7) as usize)?;
            let (payload, tail) = split(rest, len)?;
            Ok((RlpItem::List(decode_list_payload(payload, depth)?), tail))
        }
    }
}

fn decode_list_payload(mut payload: &[u8], depth: usize) -> Result<Vec<RlpItem>, RlpError> {
    if depth >= MAX_DEPTH {
        return Err(RlpError::TooDeep(MAX_DEPTH));
    }
    let mut items = Vec::new();
    while !payload.is_empty() {
        let (item, rest) = decode_item(payload, depth + 1)?;
        items.push(item);
        payload = rest;
    }
    Ok(items)
}

/// Read a `len_of_len`-byte big-endian length and enforce its canonical form.
fn read_long_length(buf: &[u8], len_of_len: usize) -> Result<(usize, &[u8]), RlpError> {
    let (len_bytes, rest) = split(buf, len_of_len)?;
    if len_bytes[0] == 0 {
        return Err(RlpError::LeadingZeroLength);
    }
    if len_of_len > std::mem::size_of::<usize>() {
        return Err(RlpError::LengthOverflow);
    }
    let len = len_bytes.iter().fold(0usize, |acc, b| (acc << 8) | *b as usize);
    if len <= 55 {
        return Err(RlpError::NonCanonicalSize(len));
    }
    Ok((len, rest))
}

fn split(buf: &[u8], len: usize) -> Result<(&[u8], &[u8]), RlpError> {
    if buf.len() < len {
        return Err(RlpError::UnexpectedEnd);
    }
    Ok(buf.split_at(len))
}
