use super::RlpItem;

const OFFSET_SHORT_STRING: u8 = 0x80;
const OFFSET_SHORT_LIST: u8 = 0xc0;
const MAX_SHORT_LEN: usize = 55;

/// Encode an item into a fresh buffer.
pub fn encode(item: &RlpItem) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(item, &mut out);
    out
}

/// Append the encoding of `item` to `out`.
///
/// List payload lengths are measured in one pre-order pass, then consumed
/// in the same order while writing.
pub fn encode_into(item: &RlpItem, out: &mut Vec<u8>) {
    let mut list_lens = Vec::new();
    let total = measure(item, &mut list_lens);
    out.reserve(total);
    let mut next = 0;
    write_item(item, &list_lens, &mut next, out);
}

/// Encoded size of `item`; payload length of every list is pushed in pre-order.
fn measure(item: &RlpItem, list_lens: &mut Vec<usize>) -> usize {
    match item {
        RlpItem::Bytes(b) => bytes_len(b),
        RlpItem::List(items) => {
            let slot = list_lens.len();
            list_lens.push(0);
            let payload: usize = items.iter().map(|it| measure(it, list_lens)).sum();
            list_lens[slot] = payload;
            header_len(payload) + payload
        }
    }
}

fn write_item(item: &RlpItem, list_lens: &[usize], next: &mut usize, out: &mut Vec<u8>) {
    match item {
        RlpItem::Bytes(b) => encode_bytes(b, out),
        RlpItem::List(items) => {
            let payload_len = list_lens[*next];
            *next += 1;
            encode_header(OFFSET_SHORT_LIST, payload_len, out);
            for it in items {
                write_item(it, list_lens, next, out);
            }
        }
    }
}

/// Append a byte string.
pub fn encode_bytes(b: &[u8], out: &mut Vec<u8>) {
    if b.len() == 1 && b[0] < OFFSET_SHORT_STRING {
        out.push(b[0]);
        return;
    }
    encode_header(OFFSET_SHORT_STRING, b.len(), out);
    out.extend_from_slice(b);
}

/// Total encoded size of `item`, header included.
pub fn encoded_len(item: &RlpItem) -> usize {
    match item {
        RlpItem::Bytes(b) => bytes_len(b),
        RlpItem::List(items) => {
            let payload: usize = items.iter().map(encoded_len).sum();
            header_len(payload) + payload
        }
    }
}

fn bytes_len(b: &[u8]) -> usize {
    if b.len() == 1 && b[0] < OFFSET_SHORT_STRING {
        1
    } else {
        header_len(b.len()) + b.len()
    }
}

fn header_len(payload_len: usize) -> usize {
    if payload_len <= MAX_SHORT_LEN {
        1
    } else {
        1 + be_len_bytes(payload_len).len()
    }
}

/// Append a string (`0x80`) or list (`0xc0`) header for a payload of `payload_len` bytes.
pub fn encode_header(offset: u8, payload_len: usize, out: &mut Vec<u8>) {
    if payload_len <= MAX_SHORT_LEN {
        out.push(offset + payload_len as u8);
    } else {
        let len_bytes = be_len_bytes(payload_len);
        // 0xb7 / 0xf7 plus the width of the length field
        out.push(offset + MAX_SHORT_LEN as u8 + len_bytes.len() as u8);
        out.extend_from_slice(&len_bytes);
    }
}

/// Big-endian bytes of `len` without leading zeros.
fn be_len_bytes(len: usize) -> Vec<u8> {
    let raw = len.to_be_bytes();
    let first = raw.iter().position(|b| *b != 0).unwrap_or(raw.len());
    raw[first..].to_vec()
}
