//! Criterion benchmarks for rfpmml-forest: end-to-end forest conversion.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rfpmml_forest::{CacheMode, ConverterConfig, convert};
use rfpmml_io::Rexp;

const N_CONTINUOUS: usize = 8;
const N_CATEGORICAL: usize = 4;
const N_LEVELS: usize = 6;

/// Build a regression forest of full binary trees of the given depth.
///
/// Slot `i` of each tree splits into slots `2i + 1` and `2i + 2`, so every
/// tree fills `2^(depth + 1) - 1` rows.
fn make_forest(n_trees: usize, depth: u32, seed: u64) -> Rexp {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let rows = (1usize << (depth + 1)) - 1;
    let n_internal = (1usize << depth) - 1;
    let n_predictors = N_CONTINUOUS + N_CATEGORICAL;

    let mut left = Vec::with_capacity(rows * n_trees);
    let mut right = Vec::with_capacity(rows * n_trees);
    let mut bestvar = Vec::with_capacity(rows * n_trees);
    let mut xbestsplit = Vec::with_capacity(rows * n_trees);
    let mut nodepred = Vec::with_capacity(rows * n_trees);

    for _ in 0..n_trees {
        for i in 0..rows {
            if i < n_internal {
                let var = rng.gen_range(1..=n_predictors);
                let split = if var > N_CONTINUOUS {
                    f64::from(rng.gen_range(1..(1u32 << N_LEVELS) - 1))
                } else {
                    (rng.r#gen::<f64>() * 100.0).round() / 10.0
                };
                left.push((2 * i + 2) as i32);
                right.push((2 * i + 3) as i32);
                bestvar.push(var as i32);
                xbestsplit.push(split);
                nodepred.push(0.0);
            } else {
                left.push(0);
                right.push(0);
                bestvar.push(0);
                xbestsplit.push(0.0);
                nodepred.push(rng.r#gen::<f64>() * 50.0);
            }
        }
    }

    let levels: Vec<String> = (0..N_LEVELS).map(|l| format!("level {l}")).collect();
    let xlevels = Rexp::named_list((0..n_predictors).map(|p| {
        let values = if p < N_CONTINUOUS {
            Rexp::reals(vec![0.0])
        } else {
            Rexp::strings(levels.clone())
        };
        (format!("x{p}"), values)
    }));
    let ncat: Vec<i32> = (0..n_predictors)
        .map(|p| if p < N_CONTINUOUS { 1 } else { N_LEVELS as i32 })
        .collect();

    let forest = Rexp::named_list([
        ("nrnodes", Rexp::integers(vec![rows as i32])),
        ("ntree", Rexp::integers(vec![n_trees as i32])),
        ("leftDaughter", Rexp::integers(left)),
        ("rightDaughter", Rexp::integers(right)),
        ("nodepred", Rexp::reals(nodepred)),
        ("bestvar", Rexp::integers(bestvar)),
        ("xbestsplit", Rexp::reals(xbestsplit)),
        ("ncat", Rexp::integers(ncat)),
        ("xlevels", xlevels),
    ]);
    Rexp::named_list([("type", Rexp::strings(["regression"])), ("forest", forest)])
        .with_attribute("class", Rexp::strings(["randomForest"]))
}

fn bench_convert_cached(c: &mut Criterion) {
    let model = make_forest(100, 8, 42);
    let config = ConverterConfig::new();

    c.bench_function("convert_100trees_depth8_cached", |b| {
        b.iter(|| convert(&model, &config).unwrap());
    });
}

fn bench_convert_uncached(c: &mut Criterion) {
    let model = make_forest(100, 8, 42);
    let config = ConverterConfig::new().with_predicate_cache(CacheMode::Disabled);

    c.bench_function("convert_100trees_depth8_uncached", |b| {
        b.iter(|| convert(&model, &config).unwrap());
    });
}

fn bench_convert_deep(c: &mut Criterion) {
    let model = make_forest(10, 14, 7);
    let config = ConverterConfig::new();

    c.bench_function("convert_10trees_depth14", |b| {
        b.iter(|| convert(&model, &config).unwrap());
    });
}

criterion_group!(
    benches,
    bench_convert_cached,
    bench_convert_uncached,
    bench_convert_deep
);
criterion_main!(benches);
