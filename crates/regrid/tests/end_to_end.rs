use approx::assert_relative_eq;
use fmprep_array::{AttrValue, Attrs, CoordinateMapper, LabeledArray, T, X, Y, Z};
use fmprep_regrid::{GridConfig, QuantityType, RegridError, Resampler, SENTINEL_KEYS};

const DAY0: f64 = 946_684_800.0; // 2000-01-01T00:00:00Z

fn mapper() -> CoordinateMapper {
    CoordinateMapper::from_pairs([("time", T), ("lev", Z), ("lat", Y), ("lon", X)])
}

/// Hourly field over one day laid out (lon, lat, time): value = hour + lon.
fn hourly_day(nx: usize, ny: usize) -> LabeledArray {
    let mut values = Vec::with_capacity(nx * ny * 24);
    for i in 0..nx {
        for _ in 0..ny {
            for h in 0..24 {
                values.push(h as f64 + i as f64);
            }
        }
    }
    LabeledArray::from_vec("V", &["lon", "lat", "time"], &[nx, ny, 24], values)
        .unwrap()
        .with_coord("lon", (0..nx).map(|i| i as f64).collect::<Vec<_>>())
        .unwrap()
        .with_coord("lat", (0..ny).map(|j| j as f64).collect::<Vec<_>>())
        .unwrap()
        .with_coord("time", (0..24).map(|h| DAY0 + 3600.0 * h as f64).collect::<Vec<_>>())
        .unwrap()
}

fn run(config: GridConfig, raw: LabeledArray, q: QuantityType) -> Result<LabeledArray, RegridError> {
    let r = Resampler::new(config.with_dims(mapper()))?;
    let targets = r.resolve_targets(&raw)?;
    r.subsample(raw, &Attrs::new(), q, false, &targets)
}

#[test]
fn six_hourly_intensive_and_extensive() {
    let config = GridConfig::new().with_tstep_seconds(6 * 3600);
    let mean = run(config.clone(), hourly_day(2, 2), QuantityType::Intensive).unwrap();
    let sum = run(config, hourly_day(2, 2), QuantityType::Extensive).unwrap();

    assert_eq!(mean.dims(), &[T, Y, X]);
    assert_eq!(mean.shape(), &[4, 2, 2]);
    assert_eq!(sum.shape(), &[4, 2, 2]);
    // bucket 1 holds hours 6..12 at lon index 1
    assert_relative_eq!(mean.data()[[1, 0, 1]], 8.5 + 1.0);
    assert_relative_eq!(sum.data()[[1, 0, 1]], 6.0 * (8.5 + 1.0));
    assert_eq!(sum.attr("qtype"), Some(&AttrValue::from("extensive")));
}

#[test]
fn sentinels_never_survive() {
    for key in SENTINEL_KEYS {
        let mut raw = hourly_day(3, 3);
        raw.data_mut()[[1, 1, 5]] = -9999.0;
        raw.data_mut()[[2, 0, 7]] = -9999.0;
        raw.set_attr(key, -9999.0);

        let out = run(GridConfig::new(), raw, QuantityType::Intensive).unwrap();
        assert!(out.data().iter().all(|&v| v != -9999.0), "{key} survived");
        assert_eq!(out.count_nan(), 0, "{key} left gaps");
        assert!(out.attr(key).is_none());
        // gap filled from neighbours along y
        assert_relative_eq!(out.data()[[5, 1, 1]], 5.0 + 1.0);
    }
}

#[test]
fn sentinel_masked_before_interpolation() {
    let mut raw = hourly_day(3, 2);
    raw.data_mut()[[1, 0, 0]] = 1.0e15;
    raw.set_attr("missing_value", 1.0e15);
    let config = GridConfig::new().with_xres(0.5).with_xext(0.0, 2.0);
    let out = run(config, raw, QuantityType::Intensive).unwrap();
    assert!(out.data().iter().all(|&v| v.abs() < 1.0e3));
}

#[test]
fn bilinear_on_target_grid() {
    let config = GridConfig::new().with_xres(0.5).with_yres(0.5);
    let out = run(config, hourly_day(3, 3), QuantityType::Intensive).unwrap();
    // auto extent [0, 2.25) on both axes
    assert_eq!(out.shape(), &[24, 5, 5]);
    assert_relative_eq!(out.data()[[3, 2, 3]], 3.0 + 1.5);
}

#[test]
fn extent_only_slices() {
    let config = GridConfig::new().with_xext(1.0, 3.0);
    let out = run(config, hourly_day(4, 2), QuantityType::Intensive).unwrap();
    assert_eq!(out.coord_values(X).unwrap(), &[1.0, 2.0]);
}

#[test]
fn levels_interpolated_from_descending_source() {
    let levs = [1000.0, 850.0, 500.0];
    let mut values = Vec::new();
    for k in 0..3 {
        for _ in 0..2 {
            values.push(levs[k] / 10.0);
        }
    }
    let raw = LabeledArray::from_vec("T", &["lev", "lat", "lon"], &[3, 2, 1], values)
        .unwrap()
        .with_coord("lev", levs.to_vec())
        .unwrap()
        .with_coord("lat", vec![0.0, 1.0])
        .unwrap()
        .with_coord("lon", vec![0.0])
        .unwrap();
    let config = GridConfig::new().with_levels(vec![925.0, 700.0]);
    let out = run(config, raw, QuantityType::Intensive).unwrap();
    assert_eq!(out.dims(), &[Z, Y, X]);
    assert_eq!(out.coord_values(Z).unwrap(), &[925.0, 700.0]);
    assert_relative_eq!(out.data()[[0, 0, 0]], 92.5);
    assert_relative_eq!(out.data()[[1, 1, 0]], 70.0);
}

#[test]
fn all_missing_column_is_fatal() {
    let mut raw = hourly_day(2, 2);
    for j in 0..2 {
        raw.data_mut()[[0, j, 0]] = -1.0;
    }
    raw.set_attr("fill_value", -1.0);
    let err = run(GridConfig::new(), raw, QuantityType::Intensive).unwrap_err();
    assert!(matches!(err, RegridError::Gap(_)));
}

#[test]
fn fully_masked_extensive_bucket_is_gap_filled() {
    let mut raw = hourly_day(2, 3);
    for h in 0..6 {
        raw.data_mut()[[0, 1, h]] = -9999.0;
    }
    raw.set_attr("missing_value", -9999.0);

    let config = GridConfig::new().with_tstep_seconds(6 * 3600);
    let out = run(config, raw, QuantityType::Extensive).unwrap();
    assert_eq!(out.count_nan(), 0);
    // filled from lat 0 and lat 2, each 0+1+..+5 at lon 0
    assert_relative_eq!(out.data()[[0, 1, 0]], 15.0);
    assert_relative_eq!(out.data()[[0, 1, 1]], 21.0);
}

/// A year of monthly means laid out (time, lat, lon): value = month index.
fn monthly_year() -> LabeledArray {
    let values: Vec<f64> = (0..12).flat_map(|m| [m as f64; 4]).collect();
    let starts: Vec<f64> = (1..=12)
        .map(|m| {
            let first = fmprep_calendar::Date::new(2000, m, 1).unwrap();
            first.epoch_seconds() as f64
        })
        .collect();
    LabeledArray::from_vec("V", &["time", "lat", "lon"], &[12, 2, 2], values)
        .unwrap()
        .with_coord("time", starts)
        .unwrap()
        .with_coord("lat", vec![0.0, 1.0])
        .unwrap()
        .with_coord("lon", vec![0.0, 1.0])
        .unwrap()
}

#[test]
fn monthly_means_select_the_unit_month() {
    let r = Resampler::new(GridConfig::new().with_tstep_seconds(6 * 3600).with_dims(mapper())).unwrap();
    let raw = monthly_year();
    let targets = r.resolve_targets(&raw).unwrap();
    let mut attrs = Attrs::new();
    attrs.insert("month".to_string(), AttrValue::Num(3.0));

    for q in [QuantityType::Intensive, QuantityType::Extensive] {
        let out = r.subsample(raw.clone(), &attrs, q, false, &targets).unwrap();
        assert_eq!(out.dims(), &[Y, X]);
        assert!(out.data().iter().all(|&v| v == 2.0));
    }

    // a yearly unit keeps all twelve means unaggregated
    let out = r
        .subsample(raw, &Attrs::new(), QuantityType::Extensive, false, &targets)
        .unwrap();
    assert_eq!(out.shape(), &[12, 2, 2]);
    assert_relative_eq!(out.data()[[11, 0, 0]], 11.0);
}
