//! Line chart rendering.

use plotters::prelude::*;

use crate::common::*;
use crate::consts::chart as cst;
use crate::table::LabeledTable;

use super::{backend_err, value_bounds};

/// Renders a line chart.
///
/// With two key levels there is one series per value of the outermost level
/// (single value column only), in first-occurrence order. With one key level
/// there is one series per value column. Either way the innermost level is
/// the x axis and must be numeric.
pub fn work(slice: &LabeledTable, spec: &ChartSpec) -> Res<()> {
    let series = extract_series(slice)?;

    let (mut x_min, mut x_max) = (::std::f64::INFINITY, ::std::f64::NEG_INFINITY);
    for (_, points) in &series {
        for (x, _) in points {
            x_min = x_min.min(*x);
            x_max = x_max.max(*x)
        }
    }
    if x_min >= x_max {
        // Single x value, widen so the axis is drawable.
        x_max = x_min + 1.
    }
    let (lo, hi) = value_bounds(
        series
            .iter()
            .flat_map(|(_, points)| points.iter().map(|(_, y)| y)),
    );

    let legend = spec.legend.is_some() || series.len() > 1;
    let series_name = |sdx: usize| -> String {
        spec.legend
            .as_ref()
            .and_then(|names| names.get(sdx).cloned())
            .unwrap_or_else(|| series[sdx].0.clone())
    };

    let x_desc = slice.levels().last().cloned().unwrap_or_default();

    let root = BitMapBackend::new(&spec.file, cst::dims).into_drawing_area();
    root.fill(&WHITE).map_err(backend_err)?;

    match spec.scale {
        Scale::Linear => {
            let mut chart = ChartBuilder::on(&root)
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(80)
                .build_cartesian_2d(x_min..x_max, lo..hi)
                .map_err(backend_err)?;
            chart
                .configure_mesh()
                .x_desc(x_desc.as_str())
                .draw()
                .map_err(backend_err)?;
            for (sdx, (_, points)) in series.iter().enumerate() {
                let color = cst::color(sdx);
                let anno = chart
                    .draw_series(LineSeries::new(points.clone(), &color))
                    .map_err(backend_err)?;
                if legend {
                    anno.label(series_name(sdx)).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color)
                    });
                }
            }
            if legend {
                chart
                    .configure_series_labels()
                    .background_style(&WHITE.mix(0.8))
                    .border_style(&BLACK)
                    .position(SeriesLabelPosition::UpperRight)
                    .draw()
                    .map_err(backend_err)?;
            }
        }
        Scale::Log => {
            let mut chart = ChartBuilder::on(&root)
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(80)
                .build_cartesian_2d(
                    x_min..x_max,
                    (cst::log_floor..hi.max(cst::log_floor * 10.)).log_scale(),
                )
                .map_err(backend_err)?;
            chart
                .configure_mesh()
                .x_desc(x_desc.as_str())
                .draw()
                .map_err(backend_err)?;
            for (sdx, (_, points)) in series.iter().enumerate() {
                let color = cst::color(sdx);
                let points: Vec<(f64, f64)> = points
                    .iter()
                    .map(|(x, y)| (*x, y.max(cst::log_floor)))
                    .collect();
                let anno = chart
                    .draw_series(LineSeries::new(points, &color))
                    .map_err(backend_err)?;
                if legend {
                    anno.label(series_name(sdx)).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color)
                    });
                }
            }
            if legend {
                chart
                    .configure_series_labels()
                    .background_style(&WHITE.mix(0.8))
                    .border_style(&BLACK)
                    .position(SeriesLabelPosition::UpperRight)
                    .draw()
                    .map_err(backend_err)?;
            }
        }
    }

    root.present().map_err(backend_err)?;
    Ok(())
}

/// Named series of a slice, see [`work`] for the two legal shapes.
fn extract_series(slice: &LabeledTable) -> Res<Vec<(String, Vec<(f64, f64)>)>> {
    match slice.levels().len() {
        1 => {
            let mut series = Vec::with_capacity(slice.columns().len());
            for (cdx, column) in slice.columns().iter().enumerate() {
                let mut points = Vec::with_capacity(slice.len());
                for row in slice.rows() {
                    let x = row.key[0]
                        .to_int()
                        .chain_err(|| "line charts need a numeric innermost key level")?;
                    points.push((x as f64, row.values[cdx]))
                }
                series.push((column.clone(), points))
            }
            Ok(series)
        }

        2 => {
            if slice.columns().len() != 1 {
                bail!(
                    "line charts over two key levels take a single value \
                     column, got {}",
                    slice.columns().len()
                )
            }
            let mut series: Vec<(String, Vec<(f64, f64)>)> = Vec::with_capacity(7);
            for row in slice.rows() {
                let name = format!("{}", row.key[0]);
                let x = row.key[1]
                    .to_int()
                    .chain_err(|| "line charts need a numeric innermost key level")?;
                let point = (x as f64, row.values[0]);
                match series.iter_mut().find(|(n, _)| n == &name) {
                    Some((_, points)) => points.push(point),
                    None => series.push((name, vec![point])),
                }
            }
            Ok(series)
        }

        n => bail!("line charts take one or two key levels, got {}", n),
    }
}
