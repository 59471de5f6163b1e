//! SVG charts drawn with [`plotters`].

use crate::domain::model::{GeoPoint, VANCOUVER};
use crate::utils::error::{InsightError, Result};
use plotters::prelude::*;
use std::ops::Range;

const HISTOGRAM_BINS: usize = 30;

fn render_err<E: std::fmt::Display>(e: E) -> InsightError {
    InsightError::render(e.to_string())
}

/// Vertical bar chart of labelled counts, bars in input order. Returns the SVG document.
pub fn bar_chart(counts: &[(String, usize)], title: &str, x_label: &str, y_label: &str) -> Result<String> {
    if counts.is_empty() {
        return Err(InsightError::render(format!("No data for bar chart '{}'", title)));
    }

    let mut svg = String::new();
    draw_bar_chart(&mut svg, counts, title, x_label, y_label)?;
    tracing::debug!("Rendered bar chart '{}' with {} bars", title, counts.len());
    Ok(svg)
}

fn draw_bar_chart(svg: &mut String, counts: &[(String, usize)], title: &str, x_label: &str, y_label: &str) -> Result<()> {
    let root = SVGBackend::with_string(svg, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((0..counts.len()).into_segmented(), 0..max + max / 10 + 1)
        .map_err(render_err)?;

    let label_for = |value: &SegmentValue<usize>| match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            counts.get(*i).map(|(label, _)| label.clone()).unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(counts.len())
        .x_label_formatter(&label_for)
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, (_, count))| {
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), *count)],
                BLUE.filled(),
            );
            bar.set_margin(0, 0, 8, 8);
            bar
        }))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

fn padded_range(values: impl Iterator<Item = f64>, fallback: f64) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !min.is_finite() || !max.is_finite() {
        return (fallback - 0.1)..(fallback + 0.1);
    }
    let pad = ((max - min) * 0.05).max(0.001);
    (min - pad)..(max + pad)
}

/// Counts per equal-width bin over `range`.
pub fn histogram(values: impl Iterator<Item = f64>, range: &Range<f64>, bins: usize) -> Vec<usize> {
    let mut counts = vec![0; bins];
    let width = (range.end - range.start) / bins as f64;
    if bins == 0 || width <= 0.0 {
        return counts;
    }
    for value in values {
        if value < range.start || value > range.end {
            continue;
        }
        let bin = (((value - range.start) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    counts
}

/// Longitude/latitude scatter plot with marginal histograms on the top and right.
/// Returns the SVG document.
pub fn density_chart(points: &[GeoPoint], color: RGBColor, title: &str) -> Result<String> {
    let mut svg = String::new();
    draw_density_chart(&mut svg, points, color, title)?;
    tracing::debug!("Rendered density chart '{}' ({} points)", title, points.len());
    Ok(svg)
}

fn draw_density_chart(svg: &mut String, points: &[GeoPoint], color: RGBColor, title: &str) -> Result<()> {
    let lon_range = padded_range(points.iter().map(|p| p.lon), VANCOUVER.lon);
    let lat_range = padded_range(points.iter().map(|p| p.lat), VANCOUVER.lat);
    let lon_bins = histogram(points.iter().map(|p| p.lon), &lon_range, HISTOGRAM_BINS);
    let lat_bins = histogram(points.iter().map(|p| p.lat), &lat_range, HISTOGRAM_BINS);
    let lon_width = (lon_range.end - lon_range.start) / HISTOGRAM_BINS as f64;
    let lat_width = (lat_range.end - lat_range.start) / HISTOGRAM_BINS as f64;

    let root = SVGBackend::with_string(svg, (900, 900)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let body = root.titled(title, ("sans-serif", 24)).map_err(render_err)?;
    let areas = body.split_by_breakpoints([720], [160]);

    // Top: longitude histogram.
    let lon_max = lon_bins.iter().copied().max().unwrap_or(0).max(1) as f64;
    let mut top = ChartBuilder::on(&areas[0])
        .margin(10)
        .y_label_area_size(60)
        .build_cartesian_2d(lon_range.clone(), 0.0..lon_max)
        .map_err(render_err)?;
    top.draw_series(lon_bins.iter().enumerate().map(|(i, &count)| {
        let x0 = lon_range.start + i as f64 * lon_width;
        Rectangle::new([(x0, 0.0), (x0 + lon_width, count as f64)], color.mix(0.6).filled())
    }))
    .map_err(render_err)?;

    // Bottom left: the scatter itself.
    let mut scatter = ChartBuilder::on(&areas[2])
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(lon_range.clone(), lat_range.clone())
        .map_err(render_err)?;
    scatter
        .configure_mesh()
        .x_desc("longitude")
        .y_desc("latitude")
        .draw()
        .map_err(render_err)?;
    scatter
        .draw_series(points.iter().map(|p| Circle::new((p.lon, p.lat), 2, color.mix(0.4).filled())))
        .map_err(render_err)?;

    // Bottom right: latitude histogram, bars growing to the right.
    let lat_max = lat_bins.iter().copied().max().unwrap_or(0).max(1) as f64;
    let mut right = ChartBuilder::on(&areas[3])
        .margin(10)
        .x_label_area_size(40)
        .build_cartesian_2d(0.0..lat_max, lat_range.clone())
        .map_err(render_err)?;
    right
        .draw_series(lat_bins.iter().enumerate().map(|(i, &count)| {
            let y0 = lat_range.start + i as f64 * lat_width;
            Rectangle::new([(0.0, y0), (count as f64, y0 + lat_width)], color.mix(0.6).filled())
        }))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}
