use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AtlasError;

// ---------------------------------------------------------------------------
// Series discovery
// ---------------------------------------------------------------------------

/// One spectral series variant: the labeling parameter extracted from the
/// file name and where its samples live.
#[derive(Debug, Clone)]
pub struct SeriesEntry {
    pub param: f64,
    pub path: PathBuf,
}

/// Index of spectral series files, keyed by source name.
///
/// The upstream computation names its files `<source-name>_<parameter>.<ext>`.
/// The index is built from a single directory scan per run; entries are
/// sorted by parameter so legends come out in a stable order.
#[derive(Debug, Default)]
pub struct SeriesIndex {
    by_source: BTreeMap<String, Vec<SeriesEntry>>,
}

impl SeriesIndex {
    /// Scan the series directory once. A non-existent directory yields an
    /// empty index; files that do not follow the naming convention are not
    /// series files and are ignored.
    pub fn build(dir: &Path) -> Result<SeriesIndex, AtlasError> {
        let mut by_source: BTreeMap<String, Vec<SeriesEntry>> = BTreeMap::new();
        if !dir.is_dir() {
            return Ok(SeriesIndex::default());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some((name, param)) = stem.rsplit_once('_') else {
                continue;
            };
            let Ok(param) = param.parse::<f64>() else {
                continue;
            };
            by_source
                .entry(name.to_string())
                .or_default()
                .push(SeriesEntry { param, path });
        }

        for entries in by_source.values_mut() {
            entries.sort_by(|a, b| a.param.total_cmp(&b.param));
        }
        Ok(SeriesIndex { by_source })
    }

    /// Series registered for one source, in parameter order.
    pub fn series_for(&self, name: &str) -> &[SeriesEntry] {
        self.by_source
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Series loading + overlay derivation
// ---------------------------------------------------------------------------

/// Flux at or below this is numerically meaningless (sub-normal or zero).
const MIN_FLUX: f64 = 1e-308;
/// Energies at or below this are outside the relevant regime.
const MIN_ENERGY: f64 = 1e5;

/// A masked overlay curve: (E, E³·flux) samples plus the legend label.
#[derive(Debug, Clone)]
pub struct OverlayCurve {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// Load one series file: whitespace-separated (energy, flux) sample pairs,
/// one per line.
fn load_series(path: &Path) -> Result<Vec<(f64, f64)>, AtlasError> {
    let text = fs::read_to_string(path)?;
    let mut samples = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut cols = line.split_whitespace();
        let pair = match (cols.next(), cols.next()) {
            (Some(e), Some(f)) => e.parse::<f64>().ok().zip(f.parse::<f64>().ok()),
            _ => None,
        };
        match pair {
            Some(sample) => samples.push(sample),
            None => {
                return Err(AtlasError::MalformedSeries {
                    path: path.to_path_buf(),
                    line: i + 1,
                })
            }
        }
    }
    Ok(samples)
}

/// Build the overlay curves for one accepted source from its indexed series.
///
/// Each variant becomes one curve of (E, E³·flux) with samples masked to
/// `flux > 1e-308` and `E > 1e5`. A variant whose samples are all masked
/// still contributes an (empty) curve so the legend lists every parameter.
pub fn overlay_curves(index: &SeriesIndex, name: &str) -> Result<Vec<OverlayCurve>, AtlasError> {
    let mut curves = Vec::new();
    for entry in index.series_for(name) {
        let samples = load_series(&entry.path)?;
        let points: Vec<(f64, f64)> = samples
            .iter()
            .filter(|&&(e, flux)| flux > MIN_FLUX && e > MIN_ENERGY)
            .map(|&(e, flux)| (e, flux * e.powi(3)))
            .collect();
        curves.push(OverlayCurve {
            label: format!("α={}", entry.param),
            points,
        });
    }
    Ok(curves)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn index_groups_by_source_and_sorts_by_param() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "J0633+1746_2.0.txt", "2e5 1e-3\n");
        write(dir.path(), "J0633+1746_1.5.txt", "2e5 1e-3\n");
        write(dir.path(), "J0659+1414_1.5.txt", "2e5 1e-3\n");
        write(dir.path(), "notes.md", "scratch\n");

        let index = SeriesIndex::build(dir.path()).unwrap();
        assert_eq!(index.len(), 2);
        let params: Vec<f64> = index
            .series_for("J0633+1746")
            .iter()
            .map(|e| e.param)
            .collect();
        assert_eq!(params, vec![1.5, 2.0]);
        assert!(index.series_for("J9999+9999").is_empty());
    }

    #[test]
    fn missing_directory_yields_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let index = SeriesIndex::build(&dir.path().join("nowhere")).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn masking_and_cubing() {
        let dir = tempfile::tempdir().unwrap();
        // Below the energy floor, below the flux floor, and two keepers.
        write(
            dir.path(),
            "J0633+1746_1.5.txt",
            "1e4 1.0\n2e5 0.0\n2e5 2.0\n1e6 1e-3\n",
        );
        let index = SeriesIndex::build(dir.path()).unwrap();
        let curves = overlay_curves(&index, "J0633+1746").unwrap();
        assert_eq!(curves.len(), 1);
        assert_eq!(curves[0].label, "α=1.5");
        let expected = vec![(2e5, 2.0 * 2e5_f64.powi(3)), (1e6, 1e-3 * 1e6_f64.powi(3))];
        assert_eq!(curves[0].points, expected);
    }

    #[test]
    fn fully_masked_series_still_contributes_a_curve() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "J0633+1746_1.5.txt", "1e4 1.0\n2e4 1.0\n");
        let index = SeriesIndex::build(dir.path()).unwrap();
        let curves = overlay_curves(&index, "J0633+1746").unwrap();
        assert_eq!(curves.len(), 1);
        assert!(curves[0].points.is_empty());
    }

    #[test]
    fn malformed_sample_line_aborts() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "J0633+1746_1.5.txt", "2e5 1e-3\n2e5\n");
        let index = SeriesIndex::build(dir.path()).unwrap();
        let err = overlay_curves(&index, "J0633+1746").unwrap_err();
        assert!(matches!(err, AtlasError::MalformedSeries { line: 2, .. }));
    }
}
