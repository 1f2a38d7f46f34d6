//! Criterion benchmarks for the per-batch hot path.
//!
//! Every read from the MIDI port runs the transport filter, the lookahead
//! matcher and, for each match, the chord parser.  These benchmarks cover
//! each step plus a full 256-byte batch (the largest single read).
//!
//! Run with:
//! ```bash
//! cargo bench --package miditokb-core --bench dispatch_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use miditokb_core::{
    keymap::resolve_key_name, match_triggers, parse_action, MappingTable, TransportFilter,
};

/// A keymap covering one octave of pads.
fn bench_table() -> MappingTable {
    let mut table = MappingTable::new();
    for (i, action) in [
        "CTRL+C", "CTRL+V", "CTRL+X", "CTRL+Z", "CTRL+SHIFT+Z", "ALT+TAB", "ESC", "RETURN",
        "PG_UP", "PG_DOWN", "HOME", "F5",
    ]
    .iter()
    .enumerate()
    {
        table.insert(0x3C + i as u8, *action);
    }
    table
}

/// A full-size batch: running-status note pairs interleaved with clock ticks.
fn bench_batch() -> Vec<u8> {
    let mut batch = vec![0x90];
    while batch.len() < 256 {
        let note = 0x3C + (batch.len() % 24) as u8;
        batch.extend_from_slice(&[note, 0x40, 0xF8]);
    }
    batch.truncate(256);
    batch
}

// ── Benchmarks: key name resolution ───────────────────────────────────────────

fn bench_resolve_key_name(c: &mut Criterion) {
    let mut group = c.benchmark_group("keymap_resolve");

    // Linear scan: early entry vs. the last entry in the table
    for name in ["ESC", "F12", "NOPE"] {
        group.bench_with_input(BenchmarkId::new("resolve_key_name", name), &name, |b, &n| {
            b.iter(|| resolve_key_name(black_box(n)))
        });
    }

    group.bench_function("parse_action_ctrl_alt_del", |b| {
        b.iter(|| parse_action(black_box("CTRL+ALT+DEL")))
    });

    group.finish();
}

// ── Benchmarks: filter and matcher ────────────────────────────────────────────

fn bench_batch_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let table = bench_table();
    let raw = bench_batch();
    let filter = TransportFilter::default();

    group.bench_function("filter_256", |b| {
        b.iter(|| {
            let mut batch = raw.clone();
            filter.apply(black_box(&mut batch));
            batch
        })
    });

    group.bench_function("filter_match_parse_256", |b| {
        b.iter(|| {
            let mut batch = raw.clone();
            filter.apply(&mut batch);
            match_triggers(black_box(&table), &batch)
                .into_iter()
                .map(|m| parse_action(m.action))
                .count()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_resolve_key_name, bench_batch_processing);
criterion_main!(benches);
