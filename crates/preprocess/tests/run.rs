//! End-to-end tests: raw NetCDF files through the parallel runner into the
//! cache.

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use fmprep_array::{AttrValue, CoordinateMapper};
use fmprep_cache::{CacheStore, UnitKey};
use fmprep_calendar::TimePeriod;
use fmprep_preprocess::{UnitProcessor, UnitTask, run_units};
use fmprep_regrid::GridConfig;
use fmprep_stats::StatName;
use tempfile::tempdir;

const SENTINEL: f64 = -9999.0;

/// One day of hourly `T2M = 280 + hour` and `PRECTOT = 1` on a 2x2 grid.
/// Hour 3 of cell (lat 0, lon 1) holds the sentinel.
fn write_day(dir: &Path, day: usize) -> PathBuf {
    let path = dir.join(format!("MERRA2_400.tavg1_2d_slv_Nx.200001{:02}.nc4", day + 1));
    let mut file = netcdf::create(&path).expect("create");
    file.add_attribute("Title", "MERRA-2 tavg1_2d_slv_Nx").expect("title");
    file.add_dimension("time", 24).expect("dim time");
    file.add_dimension("lat", 2).expect("dim lat");
    file.add_dimension("lon", 2).expect("dim lon");
    {
        let mut var = file.add_variable::<f64>("time", &["time"]).expect("time");
        var.put_attribute("units", "minutes since 2000-01-01 00:00:00").expect("units");
        let minutes: Vec<f64> = (0..24).map(|h| (day * 1440 + h * 60) as f64).collect();
        var.put_values(&minutes, ..).expect("put time");
    }
    {
        let mut var = file.add_variable::<f64>("lat", &["lat"]).expect("lat");
        var.put_values(&[10.0, 10.5], ..).expect("put lat");
    }
    {
        let mut var = file.add_variable::<f64>("lon", &["lon"]).expect("lon");
        var.put_values(&[20.0, 20.625], ..).expect("put lon");
    }
    {
        let mut var = file.add_variable::<f64>("T2M", &["time", "lat", "lon"]).expect("T2M");
        var.put_attribute("units", "K").expect("units");
        var.put_attribute("missing_value", SENTINEL).expect("missing");
        let mut values = Vec::with_capacity(96);
        for h in 0..24 {
            for _ in 0..4 {
                values.push(280.0 + h as f64);
            }
        }
        values[3 * 4 + 1] = SENTINEL;
        var.put_values(&values, ..).expect("put T2M");
    }
    {
        let mut var = file.add_variable::<f64>("PRECTOT", &["time", "lat", "lon"]).expect("PRECTOT");
        var.put_values(&[1.0; 96], ..).expect("put PRECTOT");
    }
    path
}

fn write_constants(dir: &Path) -> PathBuf {
    let path = dir.join("MERRA2_101.const_2d_asm_Nx.00000000.nc4");
    let mut file = netcdf::create(&path).expect("create");
    file.add_dimension("time", 1).expect("dim time");
    file.add_dimension("lat", 2).expect("dim lat");
    file.add_dimension("lon", 2).expect("dim lon");
    {
        let mut var = file.add_variable::<f64>("time", &["time"]).expect("time");
        var.put_attribute("units", "minutes since 2000-01-01 00:00:00").expect("units");
        var.put_values(&[0.0], ..).expect("put time");
    }
    {
        let mut var = file.add_variable::<f64>("lat", &["lat"]).expect("lat");
        var.put_values(&[10.0, 10.5], ..).expect("put lat");
    }
    {
        let mut var = file.add_variable::<f64>("lon", &["lon"]).expect("lon");
        var.put_values(&[20.0, 20.625], ..).expect("put lon");
    }
    {
        let mut var = file.add_variable::<f64>("PHIS", &["time", "lat", "lon"]).expect("PHIS");
        var.put_values(&[100.0, 200.0, 300.0, 400.0], ..).expect("put PHIS");
    }
    path
}

fn grid() -> GridConfig {
    GridConfig::new()
        .with_tstep_seconds(6 * 3600)
        .with_extensive(["PRECTOT"])
        .with_dims(CoordinateMapper::from_pairs([("time", "t"), ("lat", "y"), ("lon", "x")]))
}

fn january() -> TimePeriod {
    TimePeriod::month(2000, 1).unwrap()
}

fn tasks(raw: &Path) -> Vec<UnitTask> {
    vec![
        UnitTask::new(
            UnitKey::new(january()).with_collection("slv"),
            vec![write_day(raw, 1), write_day(raw, 0)],
            ["T2M", "PRECTOT", "U10M"],
        ),
        UnitTask::new(
            UnitKey::new(january()).with_collection("const"),
            vec![write_constants(raw)],
            ["PHIS"],
        )
        .with_constant(true),
        UnitTask::new(
            UnitKey::new(january()).with_collection("broken"),
            vec![raw.join("does_not_exist.nc4")],
            ["T2M"],
        ),
    ]
}

#[test]
fn units_are_cached_and_failures_isolated() {
    let raw = tempdir().unwrap();
    let cache = tempdir().unwrap();
    let store = CacheStore::new(cache.path());
    let processor = UnitProcessor::new(store.clone(), "v1", grid()).unwrap();

    let output = run_units(&processor, &tasks(raw.path()), 2).unwrap();
    assert_eq!(output.summary.processed, 2);
    assert_eq!(output.summary.failed.len(), 1);
    assert_eq!(
        output.summary.failed[0].key,
        UnitKey::new(january()).with_collection("broken")
    );

    let slv = store
        .read_unit("v1", &UnitKey::new(january()).with_collection("slv"))
        .unwrap();
    assert!(!slv.contains("U10M"));
    assert_eq!(slv.attrs().get("collection"), Some(&AttrValue::from("slv")));
    assert_eq!(slv.attrs().get("month"), Some(&AttrValue::Num(1.0)));

    let t2m = slv.get("T2M").unwrap();
    assert_eq!(t2m.dims(), &["t", "y", "x"]);
    // two days of 6-hourly buckets, files merged in date order
    assert_eq!(t2m.len_of("t"), Some(8));
    assert_relative_eq!(t2m.coord_values("t").unwrap()[4], 946_684_800.0 + 86_400.0);
    assert_relative_eq!(t2m.data()[[1, 0, 0]], 280.0 + 8.5);
    // the sentinel is masked before averaging: hours 0, 1, 2, 4, 5
    assert_relative_eq!(t2m.data()[[0, 0, 1]], 280.0 + 2.4, epsilon = 1e-9);
    assert!(t2m.attr("missing_value").is_none());
    assert_eq!(t2m.attr("qtype"), Some(&AttrValue::from("intensive")));

    let prectot = slv.get("PRECTOT").unwrap();
    assert_relative_eq!(prectot.data()[[2, 1, 1]], 6.0);
    assert_eq!(prectot.attr("qtype"), Some(&AttrValue::from("extensive")));

    let constants = store
        .read_unit("v1", &UnitKey::new(january()).with_collection("const"))
        .unwrap();
    assert_eq!(constants.get("PHIS").unwrap().dims(), &["y", "x"]);
}

#[test]
fn resumed_run_skips_and_reproduces_statistics() {
    let raw = tempdir().unwrap();
    let cache = tempdir().unwrap();
    let store = CacheStore::new(cache.path());
    let processor = UnitProcessor::new(store.clone(), "v1", grid()).unwrap();
    let tasks = tasks(raw.path());

    let first = run_units(&processor, &tasks, 2).unwrap();
    let second = run_units(&processor, &tasks, 2).unwrap();
    assert_eq!(second.summary.processed, 0);
    assert_eq!(second.summary.skipped, 2);

    for stat in StatName::ALL {
        let a = first.stats.accumulate(stat).unwrap();
        let b = second.stats.accumulate(stat).unwrap();
        assert_eq!(a.names(), b.names());
        for array in a.iter() {
            let other = b.get(array.name()).unwrap();
            for (x, y) in array.data().iter().zip(other.data().iter()) {
                assert_relative_eq!(*x, *y, epsilon = 1e-9);
            }
        }
    }

    store.write_stats("v1", &second.stats).unwrap();
    let mean = store.read_stats("v1", StatName::Mean).unwrap();
    assert_relative_eq!(
        mean.get("PHIS").unwrap().data().iter().next().copied().unwrap(),
        250.0
    );
}
