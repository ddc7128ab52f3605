use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use deposit_core::contact::build_index;
use deposit_core::loss::account;
use deposit_core::resolver::resolve;
use deposit_core::rng::trial_rng;
use deposit_core::{Cloud, IndexKind, LossCfg, ResolverCfg, SamplerCfg};

fn cloud(coverage: f64) -> Cloud {
    let cfg = SamplerCfg::default();
    Cloud::sample(&mut trial_rng(42), &cfg, coverage).unwrap_or_else(|e| panic!("{e}"))
}

pub fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_2000");
    for (name, kind) in [("rtree", IndexKind::Rtree), ("brute", IndexKind::Brute)] {
        for coverage in [10.0, 60.0] {
            let base = cloud(coverage);
            let cfg = ResolverCfg {
                index: kind,
                ..ResolverCfg::default()
            };
            group.bench_function(format!("{name}_{coverage}pct"), |b| {
                b.iter_batched(
                    || base.clone(),
                    |mut cl| {
                        let index = build_index(kind, &cl);
                        black_box(resolve(&mut cl, index.as_ref(), &cfg))
                    },
                    BatchSize::LargeInput,
                )
            });
        }
    }
    group.finish();
}

pub fn bench_account(c: &mut Criterion) {
    let base = cloud(60.0);
    let index = build_index(IndexKind::Rtree, &base);
    let cfg = LossCfg::default();
    c.bench_function("account_2000_60pct", |b| {
        b.iter(|| black_box(account(&base, index.as_ref(), &cfg)))
    });
}

criterion_group!(benches, bench_resolve, bench_account);
criterion_main!(benches);
