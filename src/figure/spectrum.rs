use std::fmt::Write;

use crate::color::generate_palette;
use crate::spectra::OverlayCurve;

use super::{decade_ticks, xml_escape, Frame};

// ---------------------------------------------------------------------------
// Per-source spectral overlay
// ---------------------------------------------------------------------------

const WIDTH: f64 = 500.0;
const HEIGHT: f64 = 400.0;
const MARGIN: f64 = 56.0;

/// Axis window when every sample was masked out: the relevant energy
/// decades with an arbitrary flux window, so the empty figure still frames
/// the regime the overlays would occupy.
const EMPTY_X_EXP: (f64, f64) = (5.0, 8.0);
const EMPTY_Y_EXP: (f64, f64) = (-3.0, 3.0);

/// Render one source's overlay figure: every parameter variant as a
/// log-log (E, E³·flux) curve, legended by parameter value.
///
/// A source with no surviving samples still gets a figure so the table's
/// name → figure correspondence holds.
pub fn spectrum_overlay(name: &str, curves: &[OverlayCurve]) -> String {
    let frame = data_frame(curves);
    let colors = generate_palette(curves.len());

    let mut svg = String::new();
    let _ = write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" style="background:white">
<text x="{tx}" y="24" text-anchor="middle" font-size="14" fill="#374151">Source: {name}</text>
<text x="{tx}" y="{lx}" text-anchor="middle" font-size="12" fill="#6b7280">E (mₑc²)</text>
<text x="16" y="{ly}" text-anchor="middle" font-size="12" fill="#6b7280" transform="rotate(-90, 16, {ly})">E³N (mₑ²c⁴ cm⁻³)</text>
"##,
        tx = WIDTH / 2.0,
        name = xml_escape(name),
        lx = HEIGHT - 12.0,
        ly = HEIGHT / 2.0,
    );

    axes(&mut svg, &frame);

    for (curve, color) in curves.iter().zip(&colors) {
        if curve.points.is_empty() {
            continue;
        }
        let mut path = String::new();
        for &(e, e3f) in &curve.points {
            let _ = write!(path, "{:.1},{:.1} ", frame.x(e), frame.y(e3f));
        }
        let _ = write!(
            svg,
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"1.5\"/>\n",
            path.trim_end()
        );
    }

    legend(&mut svg, &frame, curves, &colors);
    svg.push_str("</svg>\n");
    svg
}

/// Whole-decade axis window covering every surviving sample.
fn data_frame(curves: &[OverlayCurve]) -> Frame {
    let samples = curves.iter().flat_map(|c| c.points.iter());
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &(e, e3f) in samples {
        x_min = x_min.min(e);
        x_max = x_max.max(e);
        y_min = y_min.min(e3f);
        y_max = y_max.max(e3f);
    }

    let (mut x_exp, mut y_exp) = if x_min.is_finite() && y_min > 0.0 {
        (
            (x_min.log10().floor(), x_max.log10().ceil()),
            (y_min.log10().floor(), y_max.log10().ceil()),
        )
    } else {
        (EMPTY_X_EXP, EMPTY_Y_EXP)
    };
    // A window collapsing onto one decade boundary still spans a full decade.
    if x_exp.1 <= x_exp.0 {
        x_exp.1 = x_exp.0 + 1.0;
    }
    if y_exp.1 <= y_exp.0 {
        y_exp.1 = y_exp.0 + 1.0;
    }

    Frame::log_log(
        MARGIN,
        40.0,
        WIDTH - 2.0 * MARGIN,
        HEIGHT - 40.0 - MARGIN,
        x_exp,
        y_exp,
    )
}

/// Frame border plus decade ticks on both axes.
fn axes(svg: &mut String, frame: &Frame) {
    let _ = write!(
        svg,
        "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\" stroke=\"#374151\"/>\n",
        frame.left, frame.top, frame.width, frame.height
    );

    for exp in decade_ticks(frame.x_exp_range().0, frame.x_exp_range().1) {
        let x = frame.x(10f64.powi(exp));
        let _ = write!(
            svg,
            "<line x1=\"{x:.1}\" y1=\"{:.1}\" x2=\"{x:.1}\" y2=\"{:.1}\" stroke=\"#d1d5db\" stroke-width=\"0.5\" stroke-dasharray=\"4,3\"/>\n",
            frame.top,
            frame.bottom()
        );
        let _ = write!(
            svg,
            "<text x=\"{x:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"11\" fill=\"#6b7280\">1e{exp}</text>\n",
            frame.bottom() + 16.0
        );
    }
    for exp in decade_ticks(frame.y_exp_range().0, frame.y_exp_range().1) {
        let y = frame.y(10f64.powi(exp));
        let _ = write!(
            svg,
            "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#d1d5db\" stroke-width=\"0.5\" stroke-dasharray=\"4,3\"/>\n",
            frame.left,
            frame.right()
        );
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"11\" fill=\"#6b7280\">1e{exp}</text>\n",
            frame.left - 6.0,
            y + 4.0
        );
    }
}

/// Opaque legend box, one row per variant in series order.
fn legend(svg: &mut String, frame: &Frame, curves: &[OverlayCurve], colors: &[String]) {
    if curves.is_empty() {
        return;
    }
    let x = frame.right() - 96.0;
    let y = frame.top + 10.0;
    let height = 10.0 + curves.len() as f64 * 18.0;
    let _ = write!(
        svg,
        "<rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"86\" height=\"{height:.1}\" fill=\"white\" stroke=\"#9ca3af\"/>\n"
    );
    for (i, (curve, color)) in curves.iter().zip(colors).enumerate() {
        let row = y + 16.0 + i as f64 * 18.0;
        let _ = write!(
            svg,
            "<line x1=\"{:.1}\" y1=\"{row:.1}\" x2=\"{:.1}\" y2=\"{row:.1}\" stroke=\"{color}\" stroke-width=\"2\"/>\n",
            x + 8.0,
            x + 26.0
        );
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" fill=\"#374151\">{}</text>\n",
            x + 32.0,
            row + 4.0,
            xml_escape(&curve.label)
        );
    }
}
