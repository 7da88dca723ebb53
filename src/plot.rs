//! Two-panel SVG report: outcome histogram and sample trajectories.
//!
//! The figure is assembled as plain SVG markup and written to disk.
//! Left panel: frequency histogram of the final multipliers with
//! reference lines at the benchmark final and the mean. Right panel:
//! the first `TRAJECTORY_SAMPLE` equity curves overlaid on the
//! benchmark curve.

use std::path::Path;

use ndarray::{Array1, Array2};

use crate::analysis::Summary;
use crate::error::Result;

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 600.0;
const MARGIN: f64 = 60.0;
const PANEL_WIDTH: f64 = 500.0;
const HIST_BINS: usize = 100;
/// Paths drawn in the trajectory panel; drawing all N would be unreadable.
const TRAJECTORY_SAMPLE: usize = 100;

/// Render the figure and persist it. Statistics are computed and printed
/// before this runs, so a failure here loses only the image.
pub fn render_report(
    path: &Path,
    final_values: &Array1<f64>,
    equity_curves: &Array2<f64>,
    benchmark_curve: &Array1<f64>,
    summary: &Summary,
) -> Result<()> {
    let svg = build_svg(final_values, equity_curves, benchmark_curve, summary);
    std::fs::write(path, svg)?;
    Ok(())
}

fn build_svg(
    final_values: &Array1<f64>,
    equity_curves: &Array2<f64>,
    benchmark_curve: &Array1<f64>,
    summary: &Summary,
) -> String {
    let mut svg = String::with_capacity(64 * 1024);
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
         viewBox=\"0 0 {w} {h}\">\n<rect width=\"{w}\" height=\"{h}\" fill=\"white\"/>\n",
        w = WIDTH,
        h = HEIGHT
    ));

    svg.push_str(&histogram_panel(final_values, summary, MARGIN));
    svg.push_str(&trajectory_panel(
        equity_curves,
        benchmark_curve,
        MARGIN + PANEL_WIDTH + 2.0 * MARGIN,
    ));

    svg.push_str("</svg>\n");
    svg
}

/// Map `value` in [lo, hi] onto pixel span [px_lo, px_hi].
fn scale(value: f64, lo: f64, hi: f64, px_lo: f64, px_hi: f64) -> f64 {
    px_lo + (value - lo) / (hi - lo) * (px_hi - px_lo)
}

/// Widen a degenerate range so scaling stays finite.
fn padded_range(lo: f64, hi: f64) -> (f64, f64) {
    if (hi - lo).abs() < f64::EPSILON {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

fn histogram_panel(final_values: &Array1<f64>, summary: &Summary, x0: f64) -> String {
    let top = MARGIN;
    let bottom = HEIGHT - MARGIN;
    let x1 = x0 + PANEL_WIDTH;
    let n = final_values.len();

    let (lo, hi) = padded_range(summary.worst, summary.best);

    let mut counts = vec![0usize; HIST_BINS];
    for &v in final_values.iter() {
        let bin = (((v - lo) / (hi - lo)) * HIST_BINS as f64) as usize;
        counts[bin.min(HIST_BINS - 1)] += 1;
    }
    let max_count = counts.iter().copied().max().unwrap_or(1).max(1);

    let mut p = String::new();
    p.push_str(&format!(
        "<g id=\"histogram\">\n<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" \
         font-family=\"sans-serif\" font-size=\"16\">Distribution of {} Random Outcomes</text>\n",
        (x0 + x1) / 2.0,
        top - 20.0,
        n
    ));

    // Bars
    let bar_w = (x1 - x0) / HIST_BINS as f64;
    for (i, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let bar_h = count as f64 / max_count as f64 * (bottom - top);
        p.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" \
             fill=\"teal\" fill-opacity=\"0.7\"/>\n",
            x0 + i as f64 * bar_w,
            bottom - bar_h,
            bar_w,
            bar_h
        ));
    }

    // Reference lines: benchmark (dashed red), mean (solid yellow)
    let bx = scale(summary.benchmark_final.clamp(lo, hi), lo, hi, x0, x1);
    p.push_str(&format!(
        "<line x1=\"{x:.2}\" y1=\"{top}\" x2=\"{x:.2}\" y2=\"{bottom}\" \
         stroke=\"red\" stroke-width=\"2\" stroke-dasharray=\"6,4\"/>\n",
        x = bx,
        top = top,
        bottom = bottom
    ));
    let mx = scale(summary.mean.clamp(lo, hi), lo, hi, x0, x1);
    p.push_str(&format!(
        "<line x1=\"{x:.2}\" y1=\"{top}\" x2=\"{x:.2}\" y2=\"{bottom}\" \
         stroke=\"yellow\" stroke-width=\"2\"/>\n",
        x = mx,
        top = top,
        bottom = bottom
    ));

    // Axes + labels
    p.push_str(&format!(
        "<line x1=\"{x0}\" y1=\"{bottom}\" x2=\"{x1}\" y2=\"{bottom}\" stroke=\"black\"/>\n\
         <text x=\"{x0}\" y=\"{ly}\" font-family=\"sans-serif\" font-size=\"11\">{lo:.2}</text>\n\
         <text x=\"{x1}\" y=\"{ly}\" text-anchor=\"end\" font-family=\"sans-serif\" \
         font-size=\"11\">{hi:.2}</text>\n\
         <text x=\"{cx}\" y=\"{xy}\" text-anchor=\"middle\" font-family=\"sans-serif\" \
         font-size=\"12\">Final Multiplier (1.0 = Break Even)</text>\n",
        x0 = x0,
        x1 = x1,
        bottom = bottom,
        ly = bottom + 16.0,
        lo = lo,
        hi = hi,
        cx = (x0 + x1) / 2.0,
        xy = bottom + 34.0
    ));

    // Legend
    p.push_str(&format!(
        "<text x=\"{x}\" y=\"{y}\" font-family=\"sans-serif\" font-size=\"11\" \
         fill=\"red\">--- Buy &amp; Hold</text>\n\
         <text x=\"{x}\" y=\"{y2}\" font-family=\"sans-serif\" font-size=\"11\" \
         fill=\"yellow\">&#8212; Mean Random</text>\n",
        x = x1 - 110.0,
        y = top + 16.0,
        y2 = top + 32.0
    ));

    p.push_str("</g>\n");
    p
}

fn trajectory_panel(
    equity_curves: &Array2<f64>,
    benchmark_curve: &Array1<f64>,
    x0: f64,
) -> String {
    let top = MARGIN;
    let bottom = HEIGHT - MARGIN;
    let x1 = x0 + PANEL_WIDTH;

    let (days, total) = equity_curves.dim();
    let sample = total.min(TRAJECTORY_SAMPLE);

    // Y range over the sampled curves plus the benchmark
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for n in 0..sample {
        for &v in equity_curves.column(n).iter() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    for &v in benchmark_curve.iter() {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    let (lo, hi) = padded_range(lo, hi);
    let x_denom = (days.max(2) - 1) as f64;

    let mut p = String::new();
    p.push_str(&format!(
        "<g id=\"trajectories\">\n<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" \
         font-family=\"sans-serif\" font-size=\"16\">Trajectories (Showing {} of {})</text>\n",
        (x0 + x1) / 2.0,
        top - 20.0,
        sample,
        total
    ));

    for n in 0..sample {
        p.push_str(&polyline(
            equity_curves.column(n).iter().copied(),
            x0,
            x1,
            top,
            bottom,
            lo,
            hi,
            x_denom,
            "gray",
            1.0,
            0.1,
        ));
    }
    p.push_str(&polyline(
        benchmark_curve.iter().copied(),
        x0,
        x1,
        top,
        bottom,
        lo,
        hi,
        x_denom,
        "red",
        2.0,
        1.0,
    ));

    p.push_str(&format!(
        "<line x1=\"{x0}\" y1=\"{bottom}\" x2=\"{x1}\" y2=\"{bottom}\" stroke=\"black\"/>\n\
         <text x=\"{cx}\" y=\"{xy}\" text-anchor=\"middle\" font-family=\"sans-serif\" \
         font-size=\"12\">Days</text>\n\
         <text x=\"{lx}\" y=\"{ty}\" font-family=\"sans-serif\" font-size=\"11\">{hi:.2}</text>\n\
         <text x=\"{lx}\" y=\"{by}\" font-family=\"sans-serif\" font-size=\"11\">{lo:.2}</text>\n\
         <text x=\"{legx}\" y=\"{legy}\" font-family=\"sans-serif\" font-size=\"11\" \
         fill=\"red\">&#8212; Buy &amp; Hold</text>\n",
        x0 = x0,
        x1 = x1,
        bottom = bottom,
        cx = (x0 + x1) / 2.0,
        xy = bottom + 34.0,
        lx = x0 - 42.0,
        ty = top + 4.0,
        by = bottom,
        hi = hi,
        lo = lo,
        legx = x0 + 10.0,
        legy = top + 16.0
    ));

    p.push_str("</g>\n");
    p
}

#[allow(clippy::too_many_arguments)]
fn polyline(
    values: impl Iterator<Item = f64>,
    x0: f64,
    x1: f64,
    top: f64,
    bottom: f64,
    lo: f64,
    hi: f64,
    x_denom: f64,
    color: &str,
    width: f64,
    opacity: f64,
) -> String {
    let points: Vec<String> = values
        .enumerate()
        .map(|(t, v)| {
            let x = scale(t as f64, 0.0, x_denom, x0, x1);
            // SVG y grows downward
            let y = scale(v, lo, hi, bottom, top);
            format!("{:.2},{:.2}", x, y)
        })
        .collect();

    format!(
        "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" \
         stroke-opacity=\"{}\"/>\n",
        points.join(" "),
        color,
        width,
        opacity
    )
}
