//! Low-level NetCDF extraction helpers.

use std::path::Path;

use chrono::NaiveDate;
use fmprep_array::{AttrValue, Attrs};
use netcdf::AttributeValue;
use tracing::debug;

use crate::error::IoError;

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Convert a NetCDF attribute value. Character and integer types are widened
/// to `f64`; unsupported kinds yield `None`.
pub(crate) fn convert_attribute(value: AttributeValue) -> Option<AttrValue> {
    let v = match value {
        AttributeValue::Str(s) => AttrValue::Str(s),
        AttributeValue::Strs(s) => AttrValue::Str(s.join(",")),
        AttributeValue::Double(x) => AttrValue::Num(x),
        AttributeValue::Float(x) => AttrValue::Num(f64::from(x)),
        AttributeValue::Int(x) => AttrValue::Num(f64::from(x)),
        AttributeValue::Uint(x) => AttrValue::Num(f64::from(x)),
        AttributeValue::Short(x) => AttrValue::Num(f64::from(x)),
        AttributeValue::Ushort(x) => AttrValue::Num(f64::from(x)),
        AttributeValue::Schar(x) => AttrValue::Num(f64::from(x)),
        AttributeValue::Uchar(x) => AttrValue::Num(f64::from(x)),
        AttributeValue::Longlong(x) => AttrValue::Num(x as f64),
        AttributeValue::Ulonglong(x) => AttrValue::Num(x as f64),
        AttributeValue::Doubles(x) => AttrValue::Nums(x),
        AttributeValue::Floats(x) => AttrValue::Nums(x.into_iter().map(f64::from).collect()),
        AttributeValue::Ints(x) => AttrValue::Nums(x.into_iter().map(f64::from).collect()),
        AttributeValue::Shorts(x) => AttrValue::Nums(x.into_iter().map(f64::from).collect()),
        _ => return None,
    };
    Some(v)
}

/// Collect attributes from a NetCDF attribute iterator, skipping those whose
/// type has no [`AttrValue`] counterpart.
pub(crate) fn collect_attrs<'a>(attrs: impl Iterator<Item = netcdf::Attribute<'a>>) -> Attrs {
    let mut out = Attrs::new();
    for attr in attrs {
        let name = attr.name().to_string();
        match attr.value().ok().and_then(convert_attribute) {
            Some(v) => {
                out.insert(name, v);
            }
            None => debug!(attribute = %name, "skipping attribute of unsupported type"),
        }
    }
    out
}

/// Parse CF time units of the form `"<unit> since <reference>"`.
///
/// Returns the number of seconds per unit and the reference instant as
/// seconds since the Unix epoch. Accepted units are seconds, minutes, hours
/// and days (singular or plural); the reference may be a date, or a date and
/// time separated by a space or `T`, with optional fractional seconds.
pub(crate) fn parse_time_units(units: &str) -> Result<(f64, f64), IoError> {
    let invalid = |reason: String| IoError::InvalidTime { reason };
    let (unit, reference) = units
        .split_once(" since ")
        .ok_or_else(|| invalid(format!("unexpected time units format: '{units}'")))?;

    let scale = match unit.trim().to_ascii_lowercase().as_str() {
        "second" | "seconds" | "sec" | "secs" | "s" => 1.0,
        "minute" | "minutes" | "min" | "mins" => 60.0,
        "hour" | "hours" | "hr" | "hrs" | "h" => 3600.0,
        "day" | "days" | "d" => 86_400.0,
        other => return Err(invalid(format!("unsupported time unit '{other}'"))),
    };

    let reference = reference
        .trim()
        .trim_end_matches('Z')
        .trim_end_matches(" UTC")
        .trim();
    let (date_str, time_str) = match reference.split_once([' ', 'T']) {
        Some((d, t)) => (d, t.trim()),
        None => (reference, ""),
    };

    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| invalid(format!("failed to parse reference date '{date_str}': {e}")))?;
    let mut seconds = date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp() as f64)
        .ok_or_else(|| invalid(format!("reference date '{date_str}' out of range")))?;

    if !time_str.is_empty() {
        for (part, factor) in time_str.split(':').zip([3600.0, 60.0, 1.0]) {
            let value: f64 = part
                .trim()
                .parse()
                .map_err(|_| invalid(format!("failed to parse reference time '{time_str}'")))?;
            seconds += value * factor;
        }
    }
    Ok((scale, seconds))
}

/// Convert raw offsets in `units` to seconds since the Unix epoch.
pub(crate) fn decode_time(offsets: &[f64], units: &str) -> Result<Vec<f64>, IoError> {
    let (scale, origin) = parse_time_units(units)?;
    Ok(offsets.iter().map(|&v| origin + v * scale).collect())
}

/// Mask `_FillValue` cells and apply `scale_factor` / `add_offset`,
/// removing those attributes from `attrs`.
pub(crate) fn decode_values(values: &mut [f64], attrs: &mut Attrs) {
    let fill = attrs.remove("_FillValue").and_then(|v| v.as_f64());
    let scale = attrs.remove("scale_factor").and_then(|v| v.as_f64());
    let offset = attrs.remove("add_offset").and_then(|v| v.as_f64());

    for v in values.iter_mut() {
        if let Some(fv) = fill
            && *v == fv
        {
            *v = f64::NAN;
            continue;
        }
        if let Some(s) = scale {
            *v *= s;
        }
        if let Some(o) = offset {
            *v += o;
        }
    }
}

/// CF time units carried by `attrs`, if any.
pub(crate) fn time_units(attrs: &Attrs) -> Option<&str> {
    attrs
        .get("units")
        .and_then(AttrValue::as_str)
        .filter(|u| u.contains(" since "))
}
