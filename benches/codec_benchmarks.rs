//! Criterion benchmarks for the codec, checksum and signing paths.
//!
//! Run: cargo bench --locked
//! Results written to target/criterion/

use alloy_primitives::U256;
use ethtx::address;
use ethtx::crypto::secp256k1::LocalSigner;
use ethtx::gas::estimate_intrinsic_gas;
use ethtx::rlp::{self, RlpItem};
use ethtx::types::{AccessListItem, PriorityFeeTx};
use ethtx::{Transaction, TxRecord};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// ── Helpers ──────────────────────────────────────────────────────────────

const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn make_tx(payload_len: usize, list_len: usize) -> TxRecord {
    TxRecord::PriorityFee(PriorityFeeTx {
        chain_id: U256::from(1u64),
        nonce: 42,
        max_priority_fee_per_gas: U256::from(1_000_000_000u64),
        max_fee_per_gas: U256::from(30_000_000_000u64),
        gas_limit: 1_000_000,
        destination: Some([0x11; 20]),
        amount: U256::from(10u64).pow(U256::from(18u64)),
        payload: (0..payload_len).map(|i| i as u8).collect(),
        access_list: (0..list_len)
            .map(|i| AccessListItem { address: [i as u8; 20], storage_keys: vec![[i as u8; 32]; 2] })
            .collect(),
        signature: None,
    })
}

fn nested(depth: usize) -> RlpItem {
    (0..depth).fold(RlpItem::Bytes(b"leaf".to_vec()), |inner, _| {
        RlpItem::List(vec![inner, RlpItem::Bytes(vec![0xab; 40])])
    })
}

// ── RLP ──────────────────────────────────────────────────────────────────

fn bench_rlp(c: &mut Criterion) {
    let mut group = c.benchmark_group("rlp");
    for depth in [1, 8, 64] {
        let item = nested(depth);
        let enc = rlp::encode(&item);
        group.bench_with_input(BenchmarkId::new("encode", depth), &item, |b, item| {
            b.iter(|| rlp::encode(black_box(item)))
        });
        group.bench_with_input(BenchmarkId::new("decode", depth), &enc, |b, enc| {
            b.iter(|| rlp::decode(black_box(enc)))
        });
    }
    group.finish();
}

// ── Transactions ─────────────────────────────────────────────────────────

fn bench_tx_codec(c: &mut Criterion) {
    let signer = LocalSigner::from_hex(DEV_KEY).expect("dev key");
    let mut group = c.benchmark_group("tx");
    for payload_len in [0, 256, 4096] {
        let signed = make_tx(payload_len, 4).sign(&signer).expect("sign");
        let wire = signed.encode(true);
        group.bench_with_input(BenchmarkId::new("encode", payload_len), &signed, |b, tx| {
            b.iter(|| black_box(tx).encode(true))
        });
        group.bench_with_input(BenchmarkId::new("decode", payload_len), &wire, |b, wire| {
            b.iter(|| TxRecord::decode(black_box(wire)))
        });
    }
    group.finish();
}

fn bench_sign_recover(c: &mut Criterion) {
    let signer = LocalSigner::from_hex(DEV_KEY).expect("dev key");
    let unsigned = make_tx(128, 2);
    let wire = unsigned.sign(&signer).expect("sign").encode(true);

    c.bench_function("tx/sign", |b| b.iter(|| black_box(&unsigned).sign(&signer)));
    c.bench_function("tx/decode_and_recover", |b| {
        b.iter(|| Transaction::decode(black_box(&wire)).and_then(|tx| tx.sender()))
    });
}

// ── Checksums and gas ────────────────────────────────────────────────────

fn bench_checksum(c: &mut Criterion) {
    let addr = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
    c.bench_function("address/checksum", |b| b.iter(|| address::checksum(black_box(addr))));
    c.bench_function("address/validate", |b| {
        b.iter(|| address::validate(black_box("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed")))
    });
}

fn bench_intrinsic_gas(c: &mut Criterion) {
    let code: Vec<u8> = (0..24_576).map(|i| (i % 7) as u8).collect();
    c.bench_function("gas/initcode_24k", |b| {
        b.iter(|| estimate_intrinsic_gas(black_box(&code), None, true))
    });
}

criterion_group!(
    benches,
    bench_rlp,
    bench_tx_codec,
    bench_sign_recover,
    bench_checksum,
    bench_intrinsic_gas,
);
criterion_main!(benches);
