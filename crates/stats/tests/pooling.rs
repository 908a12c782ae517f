//! Pooling across independently built accumulators.

use approx::assert_relative_eq;
use fmprep_array::LabeledArray;
use fmprep_stats::{StatName, StatsAccumulator, nan_mean, nan_std};

fn unit(seed: usize, nt: usize) -> LabeledArray {
    // two levels, 2x2 grid, deterministic but uneven values
    let values: Vec<f64> = (0..nt * 2 * 4)
        .map(|i| ((i * 7 + seed * 13) % 11) as f64 + 0.25 * seed as f64)
        .collect();
    LabeledArray::from_vec("T", &["t", "z", "y", "x"], &[nt, 2, 2, 2], values).unwrap()
}

fn worker(seed: usize, nt: usize) -> StatsAccumulator {
    let mut acc = StatsAccumulator::new();
    acc.add_entry("T", &unit(seed, nt)).unwrap();
    acc
}

#[test]
fn pooled_std_is_order_independent() {
    let parts = [(1, 4), (2, 8), (3, 6)];
    let orders: [[usize; 3]; 3] = [[0, 1, 2], [2, 0, 1], [1, 2, 0]];

    let results: Vec<Vec<f64>> = orders
        .iter()
        .map(|order| {
            let mut acc = StatsAccumulator::new();
            for &i in order {
                let (seed, nt) = parts[i];
                acc.merge(worker(seed, nt));
            }
            let std = acc.accumulate(StatName::Std).unwrap();
            std.get("T").unwrap().data().iter().copied().collect()
        })
        .collect();

    for r in &results[1..] {
        for (a, b) in r.iter().zip(&results[0]) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }
}

#[test]
fn merge_is_associative() {
    let a = worker(1, 4);
    let b = worker(2, 8);
    let c = worker(3, 6);
    let left = a.clone().merged(b.clone()).merged(c.clone());
    let right = a.merged(b.merged(c));
    let l = left.accumulate(StatName::Mean).unwrap();
    let r = right.accumulate(StatName::Mean).unwrap();
    let lv: Vec<f64> = l.get("T").unwrap().data().iter().copied().collect();
    let rv: Vec<f64> = r.get("T").unwrap().data().iter().copied().collect();
    for (x, y) in lv.iter().zip(&rv) {
        assert_relative_eq!(*x, *y, epsilon = 1e-12);
    }
}

#[test]
fn pooled_mean_equals_mean_of_concatenation() {
    // equal-size spatial slabs: weighted pooling of means is exact
    let a = unit(1, 4);
    let b = unit(2, 8);
    let mut acc = StatsAccumulator::new();
    acc.add_entry("T", &a).unwrap();
    acc.add_entry("T", &b).unwrap();
    let pooled = acc.accumulate(StatName::Mean).unwrap();
    let pooled = pooled.get("T").unwrap();

    let joined = fmprep_array::concat(&[a, b], "t").unwrap();
    let direct = joined.reduce(&["t", "y", "x"], nan_mean).unwrap();
    for (p, d) in pooled.data().iter().zip(direct.data()) {
        assert_relative_eq!(*p, *d, epsilon = 1e-12);
    }
    // std pooling is the quadratic mean of partial stds, not the std of the
    // concatenation; it is bounded above by the direct value
    let direct_std = joined.reduce(&["t", "y", "x"], nan_std).unwrap();
    let pooled_std = acc.accumulate(StatName::Std).unwrap();
    for (p, d) in pooled_std.get("T").unwrap().data().iter().zip(direct_std.data()) {
        assert!(*p <= *d + 1e-12);
    }
}

#[test]
fn accumulator_serializes_between_workers() {
    let acc = worker(5, 3);
    let json = serde_json::to_string(&acc).unwrap();
    let back: StatsAccumulator = serde_json::from_str(&json).unwrap();
    assert_eq!(
        back.entry("T").unwrap().observations(StatName::StdDiff).len(),
        1
    );
}
