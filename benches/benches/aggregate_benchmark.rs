//! Aggregation throughput benchmarks.
//!
//! Run with: `cargo bench --package tickbar-bench`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tempfile::TempDir;
use tickbar_bench::{SessionConfig, TRADING_DAY, synthetic_ticks};
use tickbar_lib::prelude::*;
use tickbar_lib::bucket_start;

/// Timeframe sets of increasing fan-out.
fn timeframe_sets() -> Vec<(&'static str, Vec<Timeframe>)> {
    vec![
        ("m1", vec![Timeframe::Minute1]),
        (
            "intraday",
            vec![
                Timeframe::Minute1,
                Timeframe::Minute5,
                Timeframe::Minute15,
                Timeframe::Hour1,
                Timeframe::Day1,
            ],
        ),
        ("catalog", Timeframe::all().to_vec()),
    ]
}

fn aggregator(timeframes: &[Timeframe], session: SessionMode) -> BarAggregator {
    let mut aggregator = BarAggregator::new("rb2405", timeframes, session);
    aggregator.set_trading_day(TRADING_DAY).unwrap();
    aggregator
}

fn on_tick_benchmark(c: &mut Criterion) {
    let ticks = synthetic_ticks(SessionConfig::default());

    let mut group = c.benchmark_group("on_tick");
    group.throughput(Throughput::Elements(ticks.len() as u64));

    for (name, timeframes) in timeframe_sets() {
        for session in [SessionMode::Continuous, SessionMode::Segmented] {
            group.bench_with_input(
                BenchmarkId::new(name, session),
                &timeframes,
                |b, timeframes| {
                    b.iter(|| {
                        let mut aggregator = aggregator(timeframes, session);
                        for tick in &ticks {
                            black_box(aggregator.on_tick(*tick));
                        }
                        aggregator.flush(true);
                    });
                },
            );
        }
    }

    group.finish();
}

fn persistence_benchmark(c: &mut Criterion) {
    let ticks = synthetic_ticks(SessionConfig {
        ticks: 20_000,
        ..SessionConfig::default()
    });
    let timeframes = [Timeframe::Second5, Timeframe::Minute1, Timeframe::Hour1];

    let mut group = c.benchmark_group("persist");
    group.sample_size(10);
    group.throughput(Throughput::Elements(ticks.len() as u64));

    group.bench_function("memory", |b| {
        b.iter(|| {
            let mut aggregator =
                aggregator(&timeframes, SessionMode::Continuous).with_store(MemoryStore::new());
            for tick in &ticks {
                aggregator.on_tick(*tick);
            }
            aggregator.flush(true);
        });
    });

    group.bench_function("csv", |b| {
        b.iter(|| {
            let temp_dir = TempDir::new().unwrap();
            let mut aggregator = aggregator(&timeframes, SessionMode::Continuous)
                .with_store(CsvStore::new(temp_dir.path()));
            for tick in &ticks {
                aggregator.on_tick(*tick);
            }
            aggregator.flush(true);
        });
    });

    group.finish();
}

fn bucket_benchmark(c: &mut Criterion) {
    let ticks = synthetic_ticks(SessionConfig::default());
    let base = ticks[0].timestamp - ticks[0].timestamp.rem_euclid(86_400);

    let mut group = c.benchmark_group("bucket_start");
    group.throughput(Throughput::Elements(ticks.len() as u64));

    for timeframe in [Timeframe::Minute1, Timeframe::Hour1, Timeframe::Hour2] {
        group.bench_with_input(
            BenchmarkId::new("segmented", timeframe),
            &timeframe,
            |b, &timeframe| {
                b.iter(|| {
                    for tick in &ticks {
                        black_box(bucket_start(
                            tick.timestamp,
                            timeframe,
                            base,
                            SessionMode::Segmented,
                        ));
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, on_tick_benchmark, persistence_benchmark, bucket_benchmark);
criterion_main!(benches);
