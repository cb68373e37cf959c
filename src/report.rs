use std::fs::{self, File};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::catalog::model::{NormalizedRecord, Quantity, MISSING};
use crate::catalog::normalize::{KPC_TO_PC, YR_TO_S};
use crate::catalog::select::classify;
use crate::config::{ResultLayout, SearchConfig};
use crate::error::AtlasError;
use crate::figure::sky::{sky_map, MapPoint};
use crate::figure::spectrum::spectrum_overlay;
use crate::spectra::{overlay_curves, SeriesIndex};

// ---------------------------------------------------------------------------
// Report context
// ---------------------------------------------------------------------------

pub const DEFAULT_COMPILER: &str = "pdflatex";
const COMPILE_TIMEOUT: Duration = Duration::from_secs(120);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Accumulates the table rows and figure references of one run, in
/// insertion order, then drives the external typesetter. All composition
/// state lives here rather than in any global canvas.
pub struct Report {
    layout: ResultLayout,
    compiler: String,
    table_rows: Vec<String>,
    figures: Vec<String>,
}

impl Report {
    pub fn new(layout: ResultLayout) -> Report {
        Report {
            layout,
            compiler: DEFAULT_COMPILER.into(),
            table_rows: Vec::new(),
            figures: Vec::new(),
        }
    }

    /// Substitute the typesetter binary (tests use a stub).
    pub fn with_compiler(mut self, program: impl Into<String>) -> Report {
        self.compiler = program.into();
        self
    }

    /// Number of accepted sources ingested so far.
    pub fn accepted(&self) -> usize {
        self.figures.len()
    }

    /// Single pass over the records: classify each one, accumulate its
    /// table row, and render a spectrum figure for every accepted source.
    /// Returns the styled sky-map points for the map renderer.
    pub fn ingest(
        &mut self,
        records: &[NormalizedRecord],
        index: &SeriesIndex,
    ) -> Result<Vec<MapPoint>, AtlasError> {
        let mut points = Vec::with_capacity(records.len());
        for rec in records {
            let class = classify(rec);
            points.push(MapPoint {
                name: rec.name.clone(),
                ra_deg: rec.ra_deg,
                dec_deg: rec.dec_deg,
                class,
            });
            self.table_rows.push(format_row(rec));

            if class.is_accepted() {
                let curves = overlay_curves(index, &rec.name)?;
                let svg = spectrum_overlay(&rec.name, &curves);
                let path = self.layout.plots_dir().join(format!("{}.svg", rec.name));
                fs::write(path, svg)?;
                self.figures.push(rec.name.clone());
            }
        }
        Ok(points)
    }

    /// The typeset source: map figure first, then the table, then the
    /// per-source figures in acceptance order.
    fn render_tex(&self, cfg: &SearchConfig) -> String {
        let plots = self.layout.plots_dir();
        let mut tex = String::from(
            "\\documentclass{article}\n\
             \\nonstopmode\n\
             \\usepackage[inkscapelatex=false]{svg}\n\
             \\begin{document}\n",
        );

        tex.push_str("\\begin{figure}\n");
        tex.push_str(&format!(
            "\\includesvg[width=\\textwidth]{{{}}}\n",
            plots.join("position").display()
        ));
        tex.push_str("\\end{figure}\n");

        tex.push_str("\\begin{center}\n");
        tex.push_str(&format!(
            "Sources within ${}^\\circ$ of Ra ${}^\\circ$, Dec ${}^\\circ$\\\\[6pt]\n",
            cfg.radius_deg, cfg.ra_deg, cfg.dec_deg
        ));
        tex.push_str("\\begin{tabular}{*{6}{c}}\n");
        tex.push_str("Source Name & Ra & Dec & Age & Distance & $\\dot{E}$\\\\\n");
        tex.push_str(" & (degree) & (degree) & (yr) & (kpc) & $(m_ec^2/s)$\\\\\n");
        tex.push_str("\\hline\n");
        tex.push_str(&self.table_rows.join("\\\\\n"));
        tex.push_str("\\\\\n\\end{tabular}\n\\end{center}\n");

        for name in &self.figures {
            tex.push_str("\\begin{figure}\n");
            tex.push_str(&format!(
                "\\includesvg[width=0.8\\textwidth]{{{}}}\n",
                plots.join(name).display()
            ));
            tex.push_str("\\end{figure}\n");
        }

        tex.push_str("\\end{document}\n");
        tex
    }

    /// Write the typeset source and run the external typesetter. On success
    /// the compiled report moves to the result root; on failure the source
    /// document and the compile log stay behind for inspection.
    pub fn compile(&self, cfg: &SearchConfig) -> Result<(), AtlasError> {
        let tex_dir = self.layout.tex_dir();
        let tex_file = tex_dir.join("report.tex");
        fs::write(&tex_file, self.render_tex(cfg))?;

        let _workspace = TexWorkspace { dir: tex_dir.clone() };

        let log_path = tex_dir.join("compile.log");
        let stdout = File::create(&log_path)?;
        let stderr = stdout.try_clone()?;
        let mut child = Command::new(&self.compiler)
            .arg("-output-directory")
            .arg(&tex_dir)
            .arg(&tex_file)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn()?;

        match wait_with_deadline(&mut child, COMPILE_TIMEOUT)? {
            Some(status) if status.success() => {
                fs::rename(tex_dir.join("report.pdf"), self.layout.report_pdf())?;
                Ok(())
            }
            Some(status) => {
                let log = fs::read_to_string(&log_path).unwrap_or_default();
                Err(AtlasError::ReportCompilation {
                    log: format!("typesetter exited with {status}\n{log}"),
                })
            }
            None => Err(AtlasError::ReportTimeout(COMPILE_TIMEOUT)),
        }
    }
}

/// One table line. Position to two decimals; age back in years, distance
/// back in kiloparsecs, spin-down power in mc²/s; unreported quantities
/// stay the literal `*`.
fn format_row(rec: &NormalizedRecord) -> String {
    [
        rec.name.clone(),
        format!("{:.2}", rec.ra_deg),
        format!("{:.2}", rec.dec_deg),
        sci(rec.age_s.scale(1.0 / YR_TO_S), 1),
        fixed(rec.dist_pc.scale(1.0 / KPC_TO_PC), 2),
        sci(rec.edot_mc2_s, 2),
    ]
    .join(" & ")
}

fn sci(q: Quantity, digits: usize) -> String {
    match q.value() {
        Some(v) => format!("{v:.digits$e}"),
        None => MISSING.into(),
    }
}

fn fixed(q: Quantity, digits: usize) -> String {
    match q.value() {
        Some(v) => format!("{v:.digits$}"),
        None => MISSING.into(),
    }
}

// ---------------------------------------------------------------------------
// Typesetter plumbing
// ---------------------------------------------------------------------------

/// Removes the typesetter's auxiliary clutter when dropped, on every exit
/// path; the source document and compile log stay for postmortem.
struct TexWorkspace {
    dir: PathBuf,
}

impl Drop for TexWorkspace {
    fn drop(&mut self) {
        for name in ["report.aux", "report.log", "report.out"] {
            let _ = fs::remove_file(self.dir.join(name));
        }
    }
}

/// Poll the typesetter until it exits or the deadline passes. On timeout
/// the process is killed and `None` is returned.
fn wait_with_deadline(child: &mut Child, limit: Duration) -> std::io::Result<Option<ExitStatus>> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if started.elapsed() >= limit {
            child.kill()?;
            child.wait()?;
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

// ---------------------------------------------------------------------------
// Report stage driver
// ---------------------------------------------------------------------------

/// Drive the full report stage: one sequential pass over the records, the
/// sky map, then the typesetter. Fails before any typesetting when no
/// source was accepted.
pub fn assemble(
    layout: &ResultLayout,
    cfg: &SearchConfig,
    records: &[NormalizedRecord],
    compiler: &str,
) -> Result<(), AtlasError> {
    fs::create_dir_all(layout.plots_dir())?;
    fs::create_dir_all(layout.tex_dir())?;

    let index = SeriesIndex::build(&layout.series_dir())?;
    if index.is_empty() {
        warn!("no spectral series under {}", layout.series_dir().display());
    } else {
        info!("indexed spectral series for {} sources", index.len());
    }

    let mut report = Report::new(layout.clone()).with_compiler(compiler);
    let points = report.ingest(records, &index)?;

    if report.accepted() == 0 {
        return Err(AtlasError::EmptyReport);
    }
    info!("{} of {} sources selected", report.accepted(), records.len());

    fs::write(layout.plots_dir().join("position.svg"), sky_map(cfg, &points))?;
    report.compile(cfg)
}
