use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use snowmint::{
    AtomicSnowflakeGenerator, IdGenStatus, LockSnowflakeGenerator, MonotonicClock, Snowflake,
    SnowflakeGenerator, SnowflakeId, TimeSource, WallClock,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// One full millisecond worth of sequence numbers for the default layout, so a
// fixed clock never reports `Pending` on a fresh generator.
const TOTAL_IDS: usize = 4096;

fn thread_counts() -> Vec<usize> {
    let max = num_cpus::get().max(1);
    [1, 2, 4, 8, 16]
        .into_iter()
        .filter(|&n| n <= max)
        .collect()
}

/// Hot path: every poll is `Ready`.
fn bench_generator<ID, G>(c: &mut Criterion, group_name: &str, generator_fn: impl Fn() -> G)
where
    ID: Snowflake,
    G: SnowflakeGenerator<ID>,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_fn();
                for _ in 0..TOTAL_IDS {
                    match generator.try_poll_id() {
                        Ok(IdGenStatus::Ready { id }) => {
                            black_box(id);
                        }
                        other => unreachable!("{other:?}"),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Blocking `generate` against a real clock, so sequence exhaustion waits.
fn bench_generate<ID, G>(c: &mut Criterion, group_name: &str, generator_fn: impl Fn() -> G)
where
    ID: Snowflake,
    G: SnowflakeGenerator<ID>,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_fn();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.generate().unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// One generator shared across threads.
fn bench_generate_contended<ID, G>(
    c: &mut Criterion,
    group_name: &str,
    generator_fn: impl Fn() -> G,
) where
    ID: Snowflake,
    G: SnowflakeGenerator<ID> + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);

    for thread_count in thread_counts() {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(
            format!("elems/{TOTAL_IDS}/threads/{thread_count}"),
            |b| {
                b.iter_custom(|iters| {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let generator = Arc::new(generator_fn());
                        let barrier = Arc::new(Barrier::new(thread_count + 1));
                        scope(|s| {
                            for _ in 0..thread_count {
                                let generator = Arc::clone(&generator);
                                let barrier = Arc::clone(&barrier);
                                s.spawn(move || {
                                    barrier.wait();
                                    for _ in 0..ids_per_thread {
                                        black_box(generator.generate().unwrap());
                                    }
                                });
                            }
                            barrier.wait();
                        });
                    }

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

#[cfg(feature = "async-tokio")]
fn bench_generate_async_tokio<ID, G>(
    c: &mut Criterion,
    group_name: &str,
    generator_fn: impl Fn(u64) -> G,
) where
    ID: Snowflake,
    G: SnowflakeGenerator<ID> + Send + Sync + 'static,
{
    use futures::future::try_join_all;
    use snowmint::SnowflakeGeneratorAsyncExt;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();
    let mut group = c.benchmark_group(group_name);

    for task_count in thread_counts() {
        let ids_per_task = TOTAL_IDS / task_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/tasks/{task_count}"), |b| {
            b.iter_custom(|iters| {
                runtime.block_on(async {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let tasks = (0..task_count as u64).map(|identity| {
                            let generator = generator_fn(identity);
                            tokio::spawn(async move {
                                for _ in 0..ids_per_task {
                                    black_box(generator.generate_async().await.unwrap());
                                }
                            })
                        });
                        try_join_all(tasks).await.unwrap();
                    }

                    start.elapsed()
                })
            });
        });
    }

    group.finish();
}

fn benchmark_mock_sequential_lock(c: &mut Criterion) {
    bench_generator::<SnowflakeId, _>(c, "mock/sequential/lock", || {
        LockSnowflakeGenerator::new(0, FixedMockTime { millis: 1 }).unwrap()
    });
}

fn benchmark_mock_sequential_atomic(c: &mut Criterion) {
    bench_generator::<SnowflakeId, _>(c, "mock/sequential/atomic", || {
        AtomicSnowflakeGenerator::new(0, FixedMockTime { millis: 1 }).unwrap()
    });
}

fn benchmark_wall_sequential_lock(c: &mut Criterion) {
    bench_generate::<SnowflakeId, _>(c, "wall/sequential/lock", || {
        LockSnowflakeGenerator::new(0, WallClock::default()).unwrap()
    });
}

fn benchmark_wall_sequential_atomic(c: &mut Criterion) {
    bench_generate::<SnowflakeId, _>(c, "wall/sequential/atomic", || {
        AtomicSnowflakeGenerator::new(0, WallClock::default()).unwrap()
    });
}

fn benchmark_mono_contended_lock(c: &mut Criterion) {
    let clock = MonotonicClock::new().unwrap();
    bench_generate_contended::<SnowflakeId, _>(c, "mono/contended/lock", || {
        LockSnowflakeGenerator::new(0, clock.clone()).unwrap()
    });
}

fn benchmark_mono_contended_atomic(c: &mut Criterion) {
    let clock = MonotonicClock::new().unwrap();
    bench_generate_contended::<SnowflakeId, _>(c, "mono/contended/atomic", || {
        AtomicSnowflakeGenerator::new(0, clock.clone()).unwrap()
    });
}

#[cfg(feature = "async-tokio")]
fn benchmark_mono_tokio_lock(c: &mut Criterion) {
    let clock = MonotonicClock::new().unwrap();
    bench_generate_async_tokio::<SnowflakeId, _>(c, "mono/async/tokio/lock", |identity| {
        LockSnowflakeGenerator::new(identity, clock.clone()).unwrap()
    });
}

#[cfg(feature = "async-tokio")]
fn benchmark_mono_tokio_atomic(c: &mut Criterion) {
    let clock = MonotonicClock::new().unwrap();
    bench_generate_async_tokio::<SnowflakeId, _>(c, "mono/async/tokio/atomic", |identity| {
        AtomicSnowflakeGenerator::new(identity, clock.clone()).unwrap()
    });
}

criterion_group!(
    benches,
    benchmark_mock_sequential_lock,
    benchmark_mock_sequential_atomic,
    benchmark_wall_sequential_lock,
    benchmark_wall_sequential_atomic,
    benchmark_mono_contended_lock,
    benchmark_mono_contended_atomic,
);

#[cfg(feature = "async-tokio")]
criterion_group!(
    async_benches,
    benchmark_mono_tokio_lock,
    benchmark_mono_tokio_atomic,
);

#[cfg(feature = "async-tokio")]
criterion_main!(benches, async_benches);
#[cfg(not(feature = "async-tokio"))]
criterion_main!(benches);
