/// Figure rendering: self-contained SVG artifacts for the sky map and the
/// per-source spectral overlays. The typesetter includes the files as-is,
/// so everything (axes, grid, legend, labels) is drawn here.

pub mod sky;
pub mod spectrum;

// ---------------------------------------------------------------------------
// Shared plot geometry
// ---------------------------------------------------------------------------

/// Maps data coordinates onto the pixel rectangle of a plot frame.
///
/// Log axes transform through log10 before the linear mapping; the y axis
/// is inverted because SVG y grows downward.
pub(crate) struct Frame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    x_log: bool,
    y_log: bool,
}

impl Frame {
    pub fn linear(
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        x_range: (f64, f64),
        y_range: (f64, f64),
    ) -> Frame {
        let (x0, x1) = widen_if_flat(x_range);
        let (y0, y1) = widen_if_flat(y_range);
        Frame {
            left,
            top,
            width,
            height,
            x0,
            x1,
            y0,
            y1,
            x_log: false,
            y_log: false,
        }
    }

    /// Ranges are given as log10 exponents.
    pub fn log_log(
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        x_exp: (f64, f64),
        y_exp: (f64, f64),
    ) -> Frame {
        let (x0, x1) = widen_if_flat(x_exp);
        let (y0, y1) = widen_if_flat(y_exp);
        Frame {
            left,
            top,
            width,
            height,
            x0,
            x1,
            y0,
            y1,
            x_log: true,
            y_log: true,
        }
    }

    pub fn x(&self, v: f64) -> f64 {
        let t = if self.x_log { v.log10() } else { v };
        self.left + (t - self.x0) / (self.x1 - self.x0) * self.width
    }

    pub fn y(&self, v: f64) -> f64 {
        let t = if self.y_log { v.log10() } else { v };
        self.top + self.height - (t - self.y0) / (self.y1 - self.y0) * self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whole-decade exponent bounds of a log axis (for tick placement).
    pub fn x_exp_range(&self) -> (i32, i32) {
        (self.x0.round() as i32, self.x1.round() as i32)
    }

    pub fn y_exp_range(&self) -> (i32, i32) {
        (self.y0.round() as i32, self.y1.round() as i32)
    }
}

fn widen_if_flat((lo, hi): (f64, f64)) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 0.5, lo + 0.5)
    }
}

/// Decade exponents to label between `lo` and `hi`, thinned so at most
/// nine ticks carry labels.
pub(crate) fn decade_ticks(lo: i32, hi: i32) -> Vec<i32> {
    let span = (hi - lo).max(1) as usize;
    let step = span / 9 + 1;
    (lo..=hi).step_by(step).collect()
}

pub(crate) fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
