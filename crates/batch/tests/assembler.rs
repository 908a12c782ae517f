//! Integration tests: cache write, batch read, feature stacking.

use approx::assert_relative_eq;
use fmprep_array::{ArrayCollection, CoordinateMapper, LabeledArray, T, X, Y, Z};
use fmprep_batch::{BatchAssembler, BatchError, TaskConfig};
use fmprep_cache::{CacheError, CacheStore, UnitKey};
use fmprep_calendar::{Date, TimePeriod};
use fmprep_stats::StatsAccumulator;
use tempfile::{TempDir, tempdir};

const DAY0: f64 = 946_684_800.0; // 2000-01-01T00:00:00Z
const NT: usize = 8; // two days, 6-hourly
const LEVELS: [f64; 3] = [1000.0, 850.0, 500.0];
const LONS: [f64; 3] = [0.0, 90.0, 180.0];

fn times() -> Vec<f64> {
    (0..NT).map(|k| DAY0 + 21_600.0 * k as f64).collect()
}

fn canonical_unit() -> ArrayCollection {
    let t2m: Vec<f64> = (0..NT * 2 * 3).map(|v| 250.0 + v as f64).collect();
    let t2m = LabeledArray::from_vec("T2M", &[T, Y, X], &[NT, 2, 3], t2m)
        .unwrap()
        .with_coord(T, times())
        .unwrap()
        .with_coord(Y, vec![0.0, 1.0])
        .unwrap()
        .with_coord(X, LONS.to_vec())
        .unwrap();

    let mut temp = Vec::new();
    for _ in 0..NT {
        for &lev in &LEVELS {
            for _ in 0..6 {
                temp.push(lev / 4.0);
            }
        }
    }
    let temp = LabeledArray::from_vec("T", &[T, Z, Y, X], &[NT, 3, 2, 3], temp)
        .unwrap()
        .with_coord(T, times())
        .unwrap()
        .with_coord(Z, LEVELS.to_vec())
        .unwrap()
        .with_coord(Y, vec![0.0, 1.0])
        .unwrap()
        .with_coord(X, LONS.to_vec())
        .unwrap();

    let phis = LabeledArray::from_vec("PHIS", &[Y, X], &[2, 3], vec![9.81; 6])
        .unwrap()
        .with_coord(Y, vec![0.0, 1.0])
        .unwrap()
        .with_coord(X, LONS.to_vec())
        .unwrap();

    let mut unit = ArrayCollection::new().with(t2m).with(temp).with(phis);
    unit.set_attr("collection", "slv");
    unit
}

fn model_coords() -> CoordinateMapper {
    CoordinateMapper::from_pairs([(T, "time"), (Z, "level"), (Y, "lat"), (X, "lon")])
}

fn task() -> TaskConfig {
    TaskConfig::new()
        .with_collections(["slv"])
        .with_input_variables([
            ("2m_temperature", "T2M"),
            ("temperature", "T"),
            ("geopotential_at_surface", "PHIS"),
        ])
        .with_coords(model_coords())
        .with_levels(vec![850.0, 700.0])
}

fn cached() -> (TempDir, CacheStore) {
    let dir = tempdir().unwrap();
    let store = CacheStore::new(dir.path());
    let key = UnitKey::new(TimePeriod::month(2000, 1).unwrap()).with_collection("slv");
    store
        .process_unit::<_, CacheError>("v1", &key, false, || Ok(canonical_unit()))
        .unwrap();
    (dir, store)
}

fn day(d: u8) -> Date {
    Date::new(2000, 1, d).unwrap()
}

#[test]
fn timestep_restricted_to_day_and_renamed() {
    let (_dir, store) = cached();
    let assembler = BatchAssembler::new(store, "v1", task()).unwrap();
    let slice = assembler.load_timestep(day(2)).unwrap();

    let t2m = slice.get("2m_temperature").unwrap();
    assert_eq!(t2m.dims(), &["time", "lat", "lon"]);
    assert_eq!(t2m.len_of("time"), Some(4));
    assert_relative_eq!(t2m.coord_values("time").unwrap()[0], DAY0 + 86_400.0);

    let temp = slice.get("temperature").unwrap();
    assert_eq!(temp.coord_values("level").unwrap(), &[850.0, 700.0]);
    // 700 hPa resolves to the nearest cached level, 850 hPa
    assert_relative_eq!(temp.data()[[0, 1, 0, 0]], 850.0 / 4.0);
}

#[test]
fn batch_concatenates_time_and_keeps_constants_once() {
    let (_dir, store) = cached();
    let assembler = BatchAssembler::new(store, "v1", task()).unwrap();
    let batch = assembler.load_batch(day(1), day(2)).unwrap();

    assert_eq!(batch.get("2m_temperature").unwrap().len_of("time"), Some(NT));
    assert_eq!(batch.get("temperature").unwrap().shape(), &[NT, 2, 2, 3]);
    assert_eq!(batch.get("geopotential_at_surface").unwrap().dims(), &["lat", "lon"]);
}

#[test]
fn time_constants_are_averaged() {
    let (_dir, store) = cached();
    let task = task().with_constants(["2m_temperature"]);
    let assembler = BatchAssembler::new(store, "v1", task).unwrap();
    let slice = assembler.load_timestep(day(1)).unwrap();
    let t2m = slice.get("2m_temperature").unwrap();
    assert_eq!(t2m.dims(), &["lat", "lon"]);
    // steps 0..4 at cell (0, 0): 250 + 6k
    assert_relative_eq!(t2m.data()[[0, 0]], 250.0 + 9.0);
}

#[test]
fn feature_length_counts_levels() {
    let (_dir, store) = cached();
    let assembler = BatchAssembler::new(store, "v1", task()).unwrap();
    let batch = assembler.load_batch(day(1), day(2)).unwrap();
    let tensor = assembler.to_feature_array(&batch).unwrap();

    // T2M + PHIS + 2 levels of T
    assert_eq!(tensor.dims(), &["time", "lat", "lon", "feature"]);
    assert_eq!(tensor.shape(), &[NT, 2, 3, 4]);
    let labels = tensor.coord("feature").unwrap().labels().unwrap();
    assert_eq!(
        labels,
        ["2m_temperature", "geopotential_at_surface", "temperature.850", "temperature.700"]
    );
    // the constant is broadcast across time
    assert_relative_eq!(tensor.data()[[5, 1, 2, 1]], 9.81);
}

#[test]
fn derived_features_join_the_tensor() {
    let (_dir, store) = cached();
    let assembler = BatchAssembler::new(store, "v1", task()).unwrap();
    let batch = assembler.load_batch(day(1), day(1)).unwrap();
    let batch = assembler.add_derived_vars(batch).unwrap();

    let day_progress = batch.get("day_progress").unwrap();
    assert_eq!(day_progress.dims(), &["time", "lon"]);
    // 06:00 UTC at 90°E is local noon
    assert_relative_eq!(day_progress.data()[[1, 1]], 0.5, epsilon = 1e-12);
    assert_relative_eq!(batch.get("day_progress_cos").unwrap().data()[[0, 0]], 1.0);

    let tensor = assembler.to_feature_array(&batch).unwrap();
    assert_eq!(tensor.len_of("feature"), Some(4 + 6));
}

#[test]
fn derived_features_need_time_and_longitude() {
    let (_dir, store) = cached();
    let assembler = BatchAssembler::new(store, "v1", task()).unwrap();
    let batch = assembler.load_batch(day(1), day(1)).unwrap();

    let mut constants_only = ArrayCollection::new();
    constants_only.insert(batch.get("geopotential_at_surface").unwrap().clone());
    let err = assembler.add_derived_vars(constants_only).unwrap_err();
    assert!(matches!(err, BatchError::MissingCoordinate { ref name, .. } if name == "time"));
}

#[test]
fn inverse_rename_restores_canonical_names() {
    let (_dir, store) = cached();
    let task = task();
    let assembler = BatchAssembler::new(store, "v1", task.clone()).unwrap();
    let batch = assembler.load_batch(day(1), day(2)).unwrap();

    let back = task.variable_mapper().inverse().rename_variables(batch);
    let back = task.coords().inverse().apply_collection(back).unwrap();

    let original = canonical_unit();
    assert_eq!(back.names(), original.names());
    for array in back.iter() {
        assert_eq!(array.dims(), original.get(array.name()).unwrap().dims());
    }
}

#[test]
fn missing_unit_is_an_error() {
    let (_dir, store) = cached();
    let assembler = BatchAssembler::new(store, "v1", task()).unwrap();
    let err = assembler.load_timestep(Date::new(2000, 2, 1).unwrap()).unwrap_err();
    assert!(matches!(err, BatchError::Cache(CacheError::Missing { .. })));
}

#[test]
fn day_without_cached_steps_is_an_error() {
    let (_dir, store) = cached();
    let assembler = BatchAssembler::new(store, "v1", task()).unwrap();
    let err = assembler.load_timestep(day(5)).unwrap_err();
    match err {
        BatchError::NoTimesteps { collection, date, .. } => {
            assert_eq!(collection, "slv");
            assert_eq!(date, day(5).to_string());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn norm_data_uses_model_names() {
    let (_dir, store) = cached();
    let mut acc = StatsAccumulator::new();
    for array in canonical_unit().iter() {
        acc.add_entry(array.name(), array).unwrap();
    }
    store.write_stats("v1", &acc).unwrap();

    let assembler = BatchAssembler::new(store, "v1", task()).unwrap();
    let norm = assembler.load_norm_data().unwrap();
    assert!(norm.mean.contains("2m_temperature"));
    let std = norm.std.get("temperature").unwrap();
    assert_eq!(std.dims(), &["level"]);
    assert_eq!(std.coord_values("level").unwrap(), &[850.0, 700.0]);
    // constants have no time differences
    assert!(!norm.std_diff.contains("geopotential_at_surface"));
    assert!(norm.std_diff.contains("2m_temperature"));
}
