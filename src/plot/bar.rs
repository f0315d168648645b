//! Bar chart rendering.

use plotters::prelude::*;

use crate::common::*;
use crate::consts::chart as cst;
use crate::table::LabeledTable;

use super::{backend_err, category_label, row_labels, value_bounds};

/// Renders a horizontal bar chart, one bar per row.
///
/// Single value column only: the caller sorts by that column, so several
/// columns would have no meaningful bar order.
pub fn horizontal(slice: &LabeledTable, spec: &ChartSpec) -> Res<()> {
    if slice.columns().len() != 1 {
        bail!(
            "horizontal bar charts take a single value column, got {}",
            slice.columns().len()
        )
    }

    let count = slice.len() as f64;
    // Row 0 goes to the top of the chart.
    let mut labels = row_labels(slice);
    labels.reverse();
    let (lo, hi) = value_bounds(slice.rows().iter().map(|row| &row.values[0]));

    let bars = |baseline: f64, clamp: bool| {
        slice.rows().iter().enumerate().map(move |(idx, row)| {
            let value = if clamp {
                row.values[0].max(baseline)
            } else {
                row.values[0]
            };
            let pos = count - 1. - idx as f64;
            Rectangle::new(
                [
                    (baseline, pos - cst::bar_width / 2.),
                    (value, pos + cst::bar_width / 2.),
                ],
                cst::color(0).filled(),
            )
        })
    };

    let root = BitMapBackend::new(&spec.file, cst::dims).into_drawing_area();
    root.fill(&WHITE).map_err(backend_err)?;

    match spec.scale {
        Scale::Linear => {
            let mut chart = ChartBuilder::on(&root)
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(180)
                .build_cartesian_2d(lo..hi, -0.5..(count - 0.5))
                .map_err(backend_err)?;
            chart
                .configure_mesh()
                .disable_y_mesh()
                .y_labels(slice.len())
                .y_label_formatter(&|pos| category_label(&labels, pos))
                .x_desc(slice.columns()[0].as_str())
                .draw()
                .map_err(backend_err)?;
            chart.draw_series(bars(0., false)).map_err(backend_err)?;
        }
        Scale::Log => {
            let mut chart = ChartBuilder::on(&root)
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(180)
                .build_cartesian_2d(
                    (cst::log_floor..hi.max(cst::log_floor * 10.)).log_scale(),
                    -0.5..(count - 0.5),
                )
                .map_err(backend_err)?;
            chart
                .configure_mesh()
                .disable_y_mesh()
                .y_labels(slice.len())
                .y_label_formatter(&|pos| category_label(&labels, pos))
                .x_desc(slice.columns()[0].as_str())
                .draw()
                .map_err(backend_err)?;
            chart
                .draw_series(bars(cst::log_floor, true))
                .map_err(backend_err)?;
        }
    }

    root.present().map_err(backend_err)?;
    Ok(())
}

/// Renders a vertical bar chart, one bar group per row.
///
/// With several value columns the bars of a row are grouped side by side
/// within the row's band, one color per column, with a legend.
pub fn vertical(slice: &LabeledTable, spec: &ChartSpec) -> Res<()> {
    let col_count = slice.columns().len();
    if col_count == 0 {
        bail!("vertical bar charts need at least one value column")
    }

    let count = slice.len() as f64;
    let labels = row_labels(slice);
    let (lo, hi) = value_bounds(slice.rows().iter().flat_map(|row| row.values.iter()));

    // Rectangles per column, bars of a row side by side within its band.
    let sub_width = cst::bar_width / col_count as f64;
    let col_bars = |cdx: usize, baseline: f64, clamp: bool| -> Vec<Rectangle<(f64, f64)>> {
        slice
            .rows()
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let value = if clamp {
                    row.values[cdx].max(baseline)
                } else {
                    row.values[cdx]
                };
                let x_0 = idx as f64 - cst::bar_width / 2. + cdx as f64 * sub_width;
                Rectangle::new(
                    [(x_0, baseline), (x_0 + sub_width, value)],
                    cst::color(cdx).filled(),
                )
            })
            .collect()
    };

    let legend = spec.legend.is_some() || col_count > 1;
    let series_name = |cdx: usize| -> String {
        spec.legend
            .as_ref()
            .and_then(|names| names.get(cdx).cloned())
            .unwrap_or_else(|| slice.columns()[cdx].clone())
    };

    let root = BitMapBackend::new(&spec.file, cst::dims).into_drawing_area();
    root.fill(&WHITE).map_err(backend_err)?;

    match spec.scale {
        Scale::Linear => {
            let mut chart = ChartBuilder::on(&root)
                .margin(10)
                .x_label_area_size(60)
                .y_label_area_size(80)
                .build_cartesian_2d(-0.5..(count - 0.5), lo..hi)
                .map_err(backend_err)?;
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(slice.len())
                .x_label_formatter(&|pos| category_label(&labels, pos))
                .draw()
                .map_err(backend_err)?;
            for cdx in 0..col_count {
                let color = cst::color(cdx);
                let anno = chart
                    .draw_series(col_bars(cdx, 0., false))
                    .map_err(backend_err)?;
                if legend {
                    anno.label(series_name(cdx)).legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
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
                .x_label_area_size(60)
                .y_label_area_size(80)
                .build_cartesian_2d(
                    -0.5..(count - 0.5),
                    (cst::log_floor..hi.max(cst::log_floor * 10.)).log_scale(),
                )
                .map_err(backend_err)?;
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(slice.len())
                .x_label_formatter(&|pos| category_label(&labels, pos))
                .draw()
                .map_err(backend_err)?;
            for cdx in 0..col_count {
                let color = cst::color(cdx);
                let anno = chart
                    .draw_series(col_bars(cdx, cst::log_floor, true))
                    .map_err(backend_err)?;
                if legend {
                    anno.label(series_name(cdx)).legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
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
