#![no_main]
use libfuzzer_sys::fuzz_target;

// Any panic here = crash on a malicious payload.
fuzz_target!(|data: &[u8]| {
    if let Ok(item) = ethtx::rlp::decode(data) {
        // only canonical encodings decode, so re-encoding is exact
        assert_eq!(ethtx::rlp::encode(&item), data);
    }
});
