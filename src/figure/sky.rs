use std::fmt::Write;

use crate::catalog::model::Classification;
use crate::config::SearchConfig;

use super::{xml_escape, Frame};

// ---------------------------------------------------------------------------
// Sky-position map
// ---------------------------------------------------------------------------

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const MARGIN: f64 = 60.0;
const GRID_STEPS: usize = 4;

const ACCEPTED_COLOR: &str = "#2ca02c";
const FILTERED_COLOR: &str = "#d62728";

/// One record's mark on the sky map.
#[derive(Debug, Clone)]
pub struct MapPoint {
    pub name: String,
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub class: Classification,
}

/// Render the sky map: every record as a point styled by classification,
/// framed on the search cone and annotated with the source names.
pub fn sky_map(cfg: &SearchConfig, points: &[MapPoint]) -> String {
    let frame = Frame::linear(
        MARGIN,
        MARGIN,
        WIDTH - 2.0 * MARGIN,
        HEIGHT - 2.0 * MARGIN,
        (cfg.ra_deg - cfg.radius_deg, cfg.ra_deg + cfg.radius_deg),
        (cfg.dec_deg - cfg.radius_deg, cfg.dec_deg + cfg.radius_deg),
    );

    let mut svg = String::new();
    let _ = write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" style="background:white">
<text x="{tx}" y="24" text-anchor="middle" font-size="14" fill="#374151">Ra: {ra}°, Dec: {dec}°, radius: {radius}°</text>
<text x="{tx}" y="{lx}" text-anchor="middle" font-size="12" fill="#6b7280">Ra (°)</text>
<text x="16" y="{ly}" text-anchor="middle" font-size="12" fill="#6b7280" transform="rotate(-90, 16, {ly})">Dec (°)</text>
"##,
        tx = WIDTH / 2.0,
        ra = cfg.ra_deg,
        dec = cfg.dec_deg,
        radius = cfg.radius_deg,
        lx = HEIGHT - 14.0,
        ly = HEIGHT / 2.0,
    );

    grid(&mut svg, &frame, cfg);

    // Name annotations sit radius/50 above-right of their point.
    let offset = cfg.radius_deg / 50.0;
    for point in points {
        let color = match point.class {
            Classification::Accepted => ACCEPTED_COLOR,
            Classification::Filtered => FILTERED_COLOR,
        };
        let _ = write!(
            svg,
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"4\" fill=\"{}\"/>\n",
            frame.x(point.ra_deg),
            frame.y(point.dec_deg),
            color
        );
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" fill=\"#374151\">{}</text>\n",
            frame.x(point.ra_deg + offset),
            frame.y(point.dec_deg + offset),
            xml_escape(&point.name)
        );
    }

    legend(&mut svg, &frame);
    svg.push_str("</svg>\n");
    svg
}

/// Frame border, dashed grid lines and tick labels.
fn grid(svg: &mut String, frame: &Frame, cfg: &SearchConfig) {
    let _ = write!(
        svg,
        "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\" stroke=\"#374151\"/>\n",
        frame.left, frame.top, frame.width, frame.height
    );

    for i in 0..=GRID_STEPS {
        let t = i as f64 / GRID_STEPS as f64;
        let ra = cfg.ra_deg - cfg.radius_deg + t * 2.0 * cfg.radius_deg;
        let dec = cfg.dec_deg - cfg.radius_deg + t * 2.0 * cfg.radius_deg;
        let x = frame.x(ra);
        let y = frame.y(dec);
        let _ = write!(
            svg,
            "<line x1=\"{x:.1}\" y1=\"{:.1}\" x2=\"{x:.1}\" y2=\"{:.1}\" stroke=\"#d1d5db\" stroke-width=\"0.5\" stroke-dasharray=\"4,3\"/>\n",
            frame.top,
            frame.bottom()
        );
        let _ = write!(
            svg,
            "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#d1d5db\" stroke-width=\"0.5\" stroke-dasharray=\"4,3\"/>\n",
            frame.left,
            frame.right()
        );
        let _ = write!(
            svg,
            "<text x=\"{x:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"11\" fill=\"#6b7280\">{ra:.1}</text>\n",
            frame.bottom() + 16.0
        );
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"11\" fill=\"#6b7280\">{dec:.1}</text>\n",
            frame.left - 6.0,
            y + 4.0
        );
    }
}

/// Opaque legend box mapping the two point styles to used / not used.
fn legend(svg: &mut String, frame: &Frame) {
    let x = frame.right() - 110.0;
    let y = frame.top + 10.0;
    let _ = write!(
        svg,
        "<rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"100\" height=\"44\" fill=\"white\" stroke=\"#9ca3af\"/>\n"
    );
    for (i, (color, label)) in [(ACCEPTED_COLOR, "used"), (FILTERED_COLOR, "not used")]
        .iter()
        .enumerate()
    {
        let row = y + 14.0 + i as f64 * 18.0;
        let _ = write!(
            svg,
            "<circle cx=\"{:.1}\" cy=\"{row:.1}\" r=\"4\" fill=\"{color}\"/>\n",
            x + 14.0
        );
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" fill=\"#374151\">{label}</text>\n",
            x + 26.0,
            row + 4.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SearchConfig {
        SearchConfig {
            ra_deg: 100.0,
            dec_deg: 15.0,
            radius_deg: 5.0,
        }
    }

    fn point(name: &str, class: Classification) -> MapPoint {
        MapPoint {
            name: name.into(),
            ra_deg: 100.0,
            dec_deg: 15.0,
            class,
        }
    }

    #[test]
    fn styles_points_by_classification() {
        let svg = sky_map(
            &cfg(),
            &[
                point("J0633+1746", Classification::Accepted),
                point("J0659+1414", Classification::Filtered),
                point("J0702+1211", Classification::Filtered),
            ],
        );
        assert_eq!(svg.matches(ACCEPTED_COLOR).count(), 2); // point + legend
        assert_eq!(svg.matches(FILTERED_COLOR).count(), 3); // 2 points + legend
        assert!(svg.contains("J0633+1746"));
        assert!(svg.contains("J0702+1211"));
    }

    #[test]
    fn caption_carries_the_run_configuration() {
        let svg = sky_map(&cfg(), &[]);
        assert!(svg.contains("Ra: 100°, Dec: 15°, radius: 5°"));
        assert!(svg.contains("used"));
        assert!(svg.contains("not used"));
    }

    #[test]
    fn centered_point_lands_mid_frame() {
        let svg = sky_map(&cfg(), &[point("J0633+1746", Classification::Accepted)]);
        assert!(svg.contains("cx=\"320.0\" cy=\"240.0\""));
    }
}
