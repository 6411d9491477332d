#![no_main]
use libfuzzer_sys::fuzz_target;

// Decode as a raw transaction, then exercise hashing and sender recovery.
fuzz_target!(|data: &[u8]| {
    if let Ok(tx) = ethtx::Transaction::decode(data) {
        assert_eq!(tx.encoded(), data);
        let _ = tx.hash();
        let _ = tx.sender();
        let _ = tx.unsigned_copy().encoded();
    }
});
