//! Criterion benchmarks for the settings blob codec.
//!
//! Run: cargo bench -p persist --bench settings_blob
//!
//! Results show:
//!   encode/<n>        — blob encode with n memory slots in use
//!   decode/<n>        — blob decode of the same images
//!   save_mock_eeprom  — full save through the embedded-storage driver

#![allow(
    clippy::unwrap_used, // benchmark helpers use unwrap for brevity
    clippy::expect_used,
    clippy::panic,
    missing_docs, // criterion_group! macro generates undocumented items
)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use persist::{decode, encode, save, MAX_BLOB_LEN};
use platform::config::EEPROM_CAPACITY;
use platform::eeprom::MockEeprom;
use platform::MemorySlot;
use rpn::{CalculatorState, NamedMemory, RegisterBank};

fn state_with(slots: u8) -> CalculatorState {
    let mut memory = NamedMemory::new();
    for s in 0..slots {
        memory.store(MemorySlot::new(s).unwrap(), f64::from(s) / 3.0);
    }
    let mut state = CalculatorState::default();
    state.bank = RegisterBank::restore([1.0, 2.0, 3.0, 4.0], memory);
    state
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for slots in [0u8, 10, 100] {
        let state = state_with(slots);
        group.bench_with_input(BenchmarkId::from_parameter(slots), &state, |b, state| {
            let mut buf = vec![0u8; MAX_BLOB_LEN];
            b.iter(|| encode(black_box(state), &mut buf).unwrap());
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for slots in [0u8, 10, 100] {
        let mut buf = vec![0u8; MAX_BLOB_LEN];
        encode(&state_with(slots), &mut buf).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(slots), &buf, |b, buf| {
            b.iter(|| decode(black_box(buf)));
        });
    }
    group.finish();
}

fn bench_save(c: &mut Criterion) {
    let state = state_with(100);
    c.bench_function("save_mock_eeprom", |b| {
        let mut eeprom = MockEeprom::<EEPROM_CAPACITY>::new();
        b.iter(|| save(black_box(&state), &mut eeprom).unwrap());
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_save);
criterion_main!(benches);
