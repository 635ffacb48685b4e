use std::{collections::hash_map::DefaultHasher, hash::BuildHasherDefault, hint::black_box};

use ahash::RandomState as AHashState;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rehashmap::{DefaultPolicy, Dict};
use rustc_hash::FxBuildHasher;

type DictAHash = Dict<u64, u64, DefaultPolicy<u64, u64, AHashState>>;
type DictFx = Dict<u64, u64, DefaultPolicy<u64, u64, FxBuildHasher>>;
type DictDefault = Dict<u64, u64, DefaultPolicy<u64, u64, BuildHasherDefault<DefaultHasher>>>;

fn ahash_dict() -> DictAHash {
    Dict::new(DefaultPolicy::with_hasher(AHashState::new()))
}

fn fx_dict() -> DictFx {
    Dict::new(DefaultPolicy::with_hasher(FxBuildHasher))
}

fn default_dict() -> DictDefault {
    Dict::new(DefaultPolicy::with_hasher(BuildHasherDefault::default()))
}

const SIZES: &[usize] = &[100, 1_000, 10_000];

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("dict_insert");

    for &n in SIZES {
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("ahash", n), &n, |b, &n| {
            b.iter(|| {
                let mut d = ahash_dict();
                for i in 0..n as u64 {
                    d.add(black_box(i), black_box(i)).unwrap();
                }
                d
            });
        });

        group.bench_with_input(BenchmarkId::new("fxhash", n), &n, |b, &n| {
            b.iter(|| {
                let mut d = fx_dict();
                for i in 0..n as u64 {
                    d.add(black_box(i), black_box(i)).unwrap();
                }
                d
            });
        });

        group.bench_with_input(BenchmarkId::new("default_hasher", n), &n, |b, &n| {
            b.iter(|| {
                let mut d = default_dict();
                for i in 0..n as u64 {
                    d.add(black_box(i), black_box(i)).unwrap();
                }
                d
            });
        });
    }

    group.finish();
}

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("dict_get_hit");

    for &n in SIZES {
        group.throughput(Throughput::Elements(n as u64));

        let mut ahash_d = ahash_dict();
        let mut fx_d = fx_dict();
        let mut def_d = default_dict();
        for i in 0..n as u64 {
            ahash_d.add(i, i).unwrap();
            fx_d.add(i, i).unwrap();
            def_d.add(i, i).unwrap();
        }

        group.bench_with_input(BenchmarkId::new("ahash", n), &n, |b, &n| {
            b.iter(|| {
                for i in 0..n as u64 {
                    black_box(ahash_d.find(black_box(&i)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("fxhash", n), &n, |b, &n| {
            b.iter(|| {
                for i in 0..n as u64 {
                    black_box(fx_d.find(black_box(&i)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("default_hasher", n), &n, |b, &n| {
            b.iter(|| {
                for i in 0..n as u64 {
                    black_box(def_d.find(black_box(&i)));
                }
            });
        });
    }

    group.finish();
}

fn bench_get_hit_random(c: &mut Criterion) {
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    let mut group = c.benchmark_group("dict_get_hit_random");

    for &n in SIZES {
        group.throughput(Throughput::Elements(n as u64));

        let mut keys: Vec<u64> = (0..n as u64).collect();
        let mut rng = StdRng::seed_from_u64(42);
        keys.shuffle(&mut rng);

        let mut ahash_d = ahash_dict();
        let mut fx_d = fx_dict();

        for &k in &keys {
            ahash_d.add(k, k).unwrap();
            fx_d.add(k, k).unwrap();
        }

        group.bench_function(format!("ahash/{n}"), |b| {
            b.iter(|| {
                for k in &keys {
                    black_box(ahash_d.find(black_box(k)));
                }
            });
        });

        group.bench_function(format!("fxhash/{n}"), |b| {
            b.iter(|| {
                for k in &keys {
                    black_box(fx_d.find(black_box(k)));
                }
            });
        });
    }

    group.finish();
}

fn bench_get_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("dict_get_miss");
    const N: usize = 1_000;
    group.throughput(Throughput::Elements(N as u64));

    let mut ahash_d = ahash_dict();
    let mut fx_d = fx_dict();
    let mut def_d = default_dict();
    for i in 0..N as u64 {
        ahash_d.add(i, i).unwrap();
        fx_d.add(i, i).unwrap();
        def_d.add(i, i).unwrap();
    }

    group.bench_function("ahash", |b| {
        b.iter(|| {
            for i in N as u64..2 * N as u64 {
                black_box(ahash_d.find(black_box(&i)));
            }
        });
    });

    group.bench_function("fxhash", |b| {
        b.iter(|| {
            for i in N as u64..2 * N as u64 {
                black_box(fx_d.find(black_box(&i)));
            }
        });
    });

    group.bench_function("default_hasher", |b| {
        b.iter(|| {
            for i in N as u64..2 * N as u64 {
                black_box(def_d.find(black_box(&i)));
            }
        });
    });

    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("dict_remove");
    const N: usize = 1_000;
    group.throughput(Throughput::Elements(N as u64));

    group.bench_function("ahash", |b| {
        b.iter_batched(
            || {
                let mut d = ahash_dict();
                for i in 0..N as u64 {
                    d.add(i, i).unwrap();
                }
                d
            },
            |mut d| {
                for i in 0..N as u64 {
                    black_box(d.remove(black_box(&i)));
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("fxhash", |b| {
        b.iter_batched(
            || {
                let mut d = fx_dict();
                for i in 0..N as u64 {
                    d.add(i, i).unwrap();
                }
                d
            },
            |mut d| {
                for i in 0..N as u64 {
                    black_box(d.remove(black_box(&i)));
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("default_hasher", |b| {
        b.iter_batched(
            || {
                let mut d = default_dict();
                for i in 0..N as u64 {
                    d.add(i, i).unwrap();
                }
                d
            },
            |mut d| {
                for i in 0..N as u64 {
                    black_box(d.remove(black_box(&i)));
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_iter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dict_iter");

    for &n in SIZES {
        group.throughput(Throughput::Elements(n as u64));

        let mut d = ahash_dict();
        for i in 0..n as u64 {
            d.add(i, i).unwrap();
        }

        group.bench_function(format!("ahash/{n}"), |b| {
            b.iter(|| {
                let mut cur = d.iter();
                while let Some(e) = cur.next() {
                    black_box((e.key(), e.value()));
                }
            });
        });
    }

    group.finish();
}

fn bench_mixed_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("dict_mixed_80r_20w");
    const N: usize = 1_000;
    group.throughput(Throughput::Elements(N as u64));

    let base: Vec<u64> = (0..N as u64 / 2).collect();

    group.bench_function("ahash", |b| {
        b.iter_batched(
            || {
                let mut d = ahash_dict();
                for &k in &base {
                    d.add(k, k).unwrap();
                }
                d
            },
            |mut d| {
                for i in 0..N as u64 {
                    if i % 5 == 0 {
                        d.add(black_box(i + N as u64), black_box(i)).unwrap();
                    } else {
                        black_box(d.find(black_box(&(i % (N as u64 / 2)))));
                    }
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("fxhash", |b| {
        b.iter_batched(
            || {
                let mut d = fx_dict();
                for &k in &base {
                    d.add(k, k).unwrap();
                }
                d
            },
            |mut d| {
                for i in 0..N as u64 {
                    if i % 5 == 0 {
                        d.add(black_box(i + N as u64), black_box(i)).unwrap();
                    } else {
                        black_box(d.find(black_box(&(i % (N as u64 / 2)))));
                    }
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("default_hasher", |b| {
        b.iter_batched(
            || {
                let mut d = default_dict();
                for &k in &base {
                    d.add(k, k).unwrap();
                }
                d
            },
            |mut d| {
                for i in 0..N as u64 {
                    if i % 5 == 0 {
                        d.add(black_box(i + N as u64), black_box(i)).unwrap();
                    } else {
                        black_box(d.find(black_box(&(i % (N as u64 / 2)))));
                    }
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_vs_std_hashmap(c: &mut Criterion) {
    use std::collections::HashMap;

    let mut group = c.benchmark_group("dict_vs_hashmap_insert_1000");
    const N: usize = 1_000;
    group.throughput(Throughput::Elements(N as u64));

    group.bench_function("Dict<ahash>", |b| {
        b.iter(|| {
            let mut d = ahash_dict();
            for i in 0..N as u64 {
                d.add(black_box(i), black_box(i)).unwrap();
            }
            d
        });
    });

    group.bench_function("HashMap<ahash>", |b| {
        b.iter(|| {
            let mut m: HashMap<u64, u64, AHashState> = HashMap::with_hasher(AHashState::new());
            for i in 0..N as u64 {
                m.insert(black_box(i), black_box(i));
            }
            m
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_get_hit,
    bench_get_hit_random,
    bench_get_miss,
    bench_remove,
    bench_iter,
    bench_mixed_workload,
    bench_vs_std_hashmap,
);
criterion_main!(benches);
