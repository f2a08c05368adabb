use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use probe_table::postal::{PostalRecord, RecordStore};
use probe_table::{ProbeTable, Strategy, TableConfig};
use std::time::Duration;

const SLOTS: usize = 6100;
const OCCUPANCY: [f64; 10] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 0.99];
const STRATEGIES: [Strategy; 2] = [Strategy::LinearProbe, Strategy::DoubleHash];

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn code(n: u64) -> String {
    format!("{:08}", n % 100_000_000)
}

/// Synthetic store of `n` records with distinct eight-digit codes.
fn store(seed: u64, n: usize) -> RecordStore {
    let mut s = RecordStore::with_capacity(n);
    for x in lcg(seed) {
        if s.len() == n {
            break;
        }
        // Repeated codes are simply skipped.
        let _ = s.push(PostalRecord::new(code(x), "Bench City", "BC"));
    }
    s
}

/// Fills `table` with as many of `records` as it accepts.
fn fill<'r>(table: &mut ProbeTable<'r, PostalRecord>, records: &'r [PostalRecord]) -> usize {
    records.iter().filter(|&r| table.insert(r).is_ok()).count()
}

fn bench_search_by_occupancy(c: &mut Criterion) {
    let records = store(1, SLOTS);
    let mut group = c.benchmark_group("search_by_occupancy");
    for strategy in STRATEGIES {
        for ratio in OCCUPANCY {
            let n = (SLOTS as f64 * ratio) as usize;
            let slice = &records.as_slice()[..n];
            let mut t = ProbeTable::new(TableConfig::new(SLOTS, strategy, 0.99)).unwrap();
            fill(&mut t, slice);
            let id = BenchmarkId::new(strategy.to_string(), format!("{ratio:.2}"));
            group.bench_with_input(id, &slice, |b, slice| {
                let mut it = slice.iter().cycle();
                b.iter(|| {
                    let r = it.next().unwrap();
                    black_box(t.search(r.code()));
                })
            });
        }
    }
    group.finish();
}

fn bench_search_miss(c: &mut Criterion) {
    let records = store(7, SLOTS);
    let mut group = c.benchmark_group("search_miss");
    for strategy in STRATEGIES {
        let n = (SLOTS as f64 * 0.9) as usize;
        let mut t = ProbeTable::new(TableConfig::new(SLOTS, strategy, 0.99)).unwrap();
        fill(&mut t, &records.as_slice()[..n]);
        let mut miss = lcg(0xdead_beef);
        group.bench_function(strategy.to_string(), |b| {
            b.iter(|| {
                // Codes past eight digits are never stored.
                let k = format!("x{}", miss.next().unwrap());
                black_box(t.search(&k));
            })
        });
    }
    group.finish();
}

fn bench_insert_all(c: &mut Criterion) {
    let records = store(3, 2 * SLOTS);
    let mut group = c.benchmark_group("insert_all");
    for strategy in STRATEGIES {
        for initial in [SLOTS, 1000] {
            let id = BenchmarkId::new(strategy.to_string(), initial);
            group.bench_function(id, |b| {
                b.iter_batched(
                    || ProbeTable::new(TableConfig::new(initial, strategy, 0.7)).unwrap(),
                    |mut t| {
                        black_box(fill(&mut t, records.as_slice()));
                        black_box(t)
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_search_by_occupancy, bench_search_miss, bench_insert_all
}
criterion_main!(benches);
