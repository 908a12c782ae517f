//! Integration tests for the cache store.

use std::cell::Cell;
use std::fs;

use approx::assert_relative_eq;
use fmprep_array::{ArrayCollection, LabeledArray};
use fmprep_cache::{CacheError, CacheStore, UnitKey, UnitOutcome};
use fmprep_calendar::TimePeriod;
use fmprep_stats::{StatName, StatsAccumulator};
use tempfile::tempdir;

fn unit(offset: f64) -> ArrayCollection {
    let values: Vec<f64> = (0..8).map(|v| v as f64 + offset).collect();
    let t2m = LabeledArray::from_vec("T2M", &["t", "y", "x"], &[2, 2, 2], values)
        .unwrap()
        .with_coord("t", vec![946_684_800.0, 946_706_400.0])
        .unwrap()
        .with_coord("y", vec![0.0, 1.0])
        .unwrap()
        .with_coord("x", vec![0.0, 1.0])
        .unwrap();
    let mut c = ArrayCollection::new().with(t2m);
    c.set_attr("collection", "slv");
    c
}

fn key() -> UnitKey {
    UnitKey::new(TimePeriod::month(2000, 1).unwrap()).with_collection("slv")
}

#[test]
fn second_run_skips_without_computing() {
    let dir = tempdir().unwrap();
    let store = CacheStore::new(dir.path());
    let calls = Cell::new(0);
    let compute = || {
        calls.set(calls.get() + 1);
        Ok::<_, CacheError>(unit(0.0))
    };

    let first = store.process_unit("v1", &key(), false, compute).unwrap();
    let UnitOutcome::Written(path) = first else {
        panic!("expected a write, got {first:?}");
    };
    let bytes = fs::read(&path).unwrap();

    let second = store.process_unit("v1", &key(), false, compute).unwrap();
    assert_eq!(second, UnitOutcome::Skipped(path.clone()));
    assert_eq!(calls.get(), 1);
    assert_eq!(fs::read(&path).unwrap(), bytes);
}

#[test]
fn reprocess_rewrites() {
    let dir = tempdir().unwrap();
    let store = CacheStore::new(dir.path());
    store
        .process_unit::<_, CacheError>("v1", &key(), false, || Ok(unit(0.0)))
        .unwrap();
    let out = store
        .process_unit::<_, CacheError>("v1", &key(), true, || Ok(unit(100.0)))
        .unwrap();
    assert!(matches!(out, UnitOutcome::Written(_)));

    let back = store.read_unit("v1", &key()).unwrap();
    assert_relative_eq!(back.get("T2M").unwrap().data()[[0, 0, 0]], 100.0);
}

#[test]
fn empty_compute_writes_nothing() {
    let dir = tempdir().unwrap();
    let store = CacheStore::new(dir.path());
    let out = store
        .process_unit::<_, CacheError>("v1", &key(), false, || Ok(ArrayCollection::new()))
        .unwrap();
    assert_eq!(out, UnitOutcome::Empty);
    assert!(!store.contains("v1", &key()).unwrap());
}

#[test]
fn compute_error_leaves_no_file() {
    let dir = tempdir().unwrap();
    let store = CacheStore::new(dir.path());
    let err = store
        .process_unit("v1", &key(), false, || {
            Err(CacheError::Missing {
                path: "upstream".into(),
            })
        })
        .unwrap_err();
    assert!(matches!(err, CacheError::Missing { .. }));
    assert!(!store.contains("v1", &key()).unwrap());
}

#[test]
fn no_temporary_files_remain() {
    let dir = tempdir().unwrap();
    let store = CacheStore::new(dir.path());
    store
        .process_unit::<_, CacheError>("v1", &key(), false, || Ok(unit(0.0)))
        .unwrap();
    let names: Vec<String> = fs::read_dir(dir.path().join("v1").join("slv"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["2000-01.nc".to_string()]);
}

#[test]
fn list_units_is_chronological() {
    let dir = tempdir().unwrap();
    let store = CacheStore::new(dir.path());
    for m in [3, 1, 2] {
        let k = UnitKey::new(TimePeriod::month(2000, m).unwrap()).with_collection("slv");
        store
            .process_unit::<_, CacheError>("v1", &k, false, || Ok(unit(0.0)))
            .unwrap();
    }
    let keys = store.list_units("v1", Some("slv")).unwrap();
    let periods: Vec<String> = keys.iter().map(|k| k.period().key()).collect();
    assert_eq!(periods, ["2000-01", "2000-02", "2000-03"]);
    assert!(store.list_units("v2", Some("slv")).unwrap().is_empty());
}

#[test]
fn statistics_persist_and_reload() {
    let dir = tempdir().unwrap();
    let store = CacheStore::new(dir.path());
    let mut acc = StatsAccumulator::new();
    acc.add_entry("T2M", unit(0.0).get("T2M").unwrap()).unwrap();

    let paths = store.write_stats("v1", &acc).unwrap();
    assert_eq!(paths.len(), StatName::PERSISTED.len());
    assert!(paths.iter().all(|p| p.is_file()));

    let mean = store.read_stats("v1", StatName::Mean).unwrap();
    assert_relative_eq!(mean.get("T2M").unwrap().data().iter().next().copied().unwrap(), 3.5);
    assert!(matches!(
        store.read_stats("v1", StatName::MeanDiff),
        Err(CacheError::Missing { .. })
    ));
}
