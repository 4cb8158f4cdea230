//! Benchmarks for lazy-aho stream matching
//!
//! Compares a cold lazy automaton (links resolved while streaming), a warm
//! one (everything memoized) and a frozen snapshot.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use lazy_aho::{Alphabet, Automaton, CommandSet, Config};

const COMMANDS: &[&str] = &["godmode", "area", "autowin", "shortcut", "hint"];

/// Deterministic pseudo-random lowercase text with the commands sprinkled in.
fn keystrokes(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut seed: u32 = 0x9e37_79b9;
    while out.len() < len {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        if seed % 97 == 0 {
            out.extend_from_slice(COMMANDS[(seed as usize >> 8) % COMMANDS.len()].as_bytes());
        } else {
            out.push(b'a' + (seed % 26) as u8);
        }
    }
    out.truncate(len);
    out
}

fn many_patterns(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let mut s = String::new();
            let mut x = i + 1;
            while x > 0 {
                s.push((b'a' + (x % 26) as u8) as char);
                x /= 26;
            }
            s.push_str("xq");
            s
        })
        .collect()
}

fn bench_cold_lazy(c: &mut Criterion) {
    let text = keystrokes(16 * 1024);
    c.bench_function("lazy_cold_16k", |b| {
        b.iter_batched(
            || Automaton::from_patterns(COMMANDS),
            |mut ac| ac.find_all(black_box(&text)).len(),
            BatchSize::SmallInput,
        )
    });
}

fn bench_warm_lazy(c: &mut Criterion) {
    let text = keystrokes(16 * 1024);
    let mut ac = Automaton::from_patterns(COMMANDS);
    ac.prewarm(Alphabet::LowercaseAscii);
    c.bench_function("lazy_warm_16k", |b| {
        b.iter(|| ac.find_all(black_box(&text)).len())
    });
}

fn bench_frozen(c: &mut Criterion) {
    let text = keystrokes(16 * 1024);
    let frozen = Automaton::from_patterns(COMMANDS).freeze();
    c.bench_function("frozen_16k", |b| {
        b.iter(|| frozen.find_all(black_box(&text)).len())
    });
}

fn bench_many_patterns(c: &mut Criterion) {
    let text = keystrokes(16 * 1024);
    let patterns = many_patterns(1000);
    let mut ac = Automaton::from_patterns(&patterns);
    ac.prewarm(Alphabet::LowercaseAscii);
    c.bench_function("lazy_warm_1000_patterns", |b| {
        b.iter(|| ac.find_all(black_box(&text)).len())
    });

    let frozen = ac.freeze();
    c.bench_function("frozen_1000_patterns", |b| {
        b.iter(|| frozen.find_all(black_box(&text)).len())
    });
}

fn bench_command_set(c: &mut Criterion) {
    let text = keystrokes(16 * 1024);
    let mut set = CommandSet::with_config(Config::new().with_reserved(b"fq").with_prewarm(true));
    for (i, name) in COMMANDS.iter().enumerate() {
        set.register(*name, i).unwrap();
    }
    c.bench_function("command_set_feed_16k", |b| {
        b.iter(|| {
            let mut fired = 0;
            for &symbol in black_box(&text) {
                fired += set.feed(symbol).len();
            }
            fired
        })
    });
}

fn bench_build(c: &mut Criterion) {
    let patterns = many_patterns(1000);
    c.bench_function("build_1000_patterns", |b| {
        b.iter(|| Automaton::from_patterns(black_box(&patterns)).node_count())
    });
    c.bench_function("build_and_freeze_1000_patterns", |b| {
        b.iter(|| Automaton::from_patterns(black_box(&patterns)).freeze().state_count())
    });
}

criterion_group!(
    benches,
    bench_cold_lazy,
    bench_warm_lazy,
    bench_frozen,
    bench_many_patterns,
    bench_command_set,
    bench_build
);
criterion_main!(benches);
