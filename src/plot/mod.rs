//! Chart rendering.
//!
//! One rendering backend per chart: the backend is scoped to the render
//! call and released on every exit path, whether the chart was written or
//! not.

use crate::common::*;
use crate::table::LabeledTable;

mod bar;
mod line;

/// Renders one chart from a slice.
///
/// Applies the spec's sort policy, then dispatches on the chart kind. Fails
/// with [`ErrorKind::EmptySlice`] when the slice has no rows, and with the
/// backend's error when the output file cannot be written.
pub fn work(conf: &Conf, slice: &LabeledTable, spec: &ChartSpec) -> Res<()> {
    if slice.is_empty() {
        bail!(ErrorKind::EmptySlice(spec.file.clone()))
    }

    let sorted;
    let slice = match spec.sort {
        SortPolicy::Descending => {
            // Overrides whatever order an upstream list selector fixed.
            sorted = slice.sort_desc()?;
            &sorted
        }
        SortPolicy::None => slice,
    };

    match spec.kind {
        ChartKind::HorizontalBar => bar::horizontal(slice, spec),
        ChartKind::VerticalBar => bar::vertical(slice, spec),
        ChartKind::Line => line::work(slice, spec),
    }
    .chain_err(|| format!("while rendering chart `{}`", conf.emph(&spec.file)))
}

/// Wraps a rendering backend error.
fn backend_err<E: ::std::fmt::Display>(e: E) -> Error {
    format!("rendering backend error: {}", e).into()
}

/// One display label per row: the key components joined with ` / `.
fn row_labels(slice: &LabeledTable) -> Vec<String> {
    slice
        .rows()
        .iter()
        .map(|row| {
            let mut label = String::new();
            for key in &row.key {
                if !label.is_empty() {
                    label += " / "
                }
                label += &format!("{}", key)
            }
            label
        })
        .collect()
}

/// Value axis bounds `(lo, hi)` over some values, with headroom.
///
/// `lo` is zero unless some value is negative, `hi` is always positive so
/// that an all-zero slice still has a drawable range.
fn value_bounds<'a, I: Iterator<Item = &'a f64>>(values: I) -> (f64, f64) {
    let (mut min, mut max) = (0f64, 0f64);
    for value in values {
        min = min.min(*value);
        max = max.max(*value)
    }
    let hi = if max > 0. {
        max * crate::consts::chart::headroom
    } else {
        1.
    };
    let lo = if min < 0. {
        min * crate::consts::chart::headroom
    } else {
        0.
    };
    (lo, hi)
}

/// Formatter for a category axis: integer positions map to row labels,
/// anything else to nothing.
fn category_label(labels: &[String], position: &f64) -> String {
    let idx = position.round();
    if (position - idx).abs() > 1e-6 || idx < 0. {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}
