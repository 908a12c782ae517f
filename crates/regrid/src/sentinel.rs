//! Missing-value sentinel masking.

use fmprep_array::LabeledArray;
use tracing::debug;

/// Attribute names that may carry a sentinel, in lookup priority order.
pub const SENTINEL_KEYS: [&str; 3] = ["fmissing_value", "missing_value", "fill_value"];

/// Replaces cells equal to the array's sentinel with NaN.
///
/// The first attribute of [`SENTINEL_KEYS`] present is removed and its value
/// masked. Without any of them the array is returned unchanged.
pub fn mask_sentinel(mut array: LabeledArray) -> LabeledArray {
    let Some((key, sentinel)) = SENTINEL_KEYS
        .iter()
        .find_map(|&k| array.attr(k).map(|v| (k, v.as_f64())))
    else {
        return array;
    };
    array.remove_attr(key);
    let Some(sentinel) = sentinel else {
        return array;
    };
    let mut masked = 0usize;
    array.data_mut().mapv_inplace(|v| {
        if v == sentinel {
            masked += 1;
            f64::NAN
        } else {
            v
        }
    });
    debug!(variable = array.name(), key, sentinel, masked, "masked sentinel values");
    array
}
