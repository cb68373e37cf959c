use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AtlasError;

// ---------------------------------------------------------------------------
// Search configuration
// ---------------------------------------------------------------------------

/// Cone-search parameters: sky position of the search center and radius.
///
/// Persisted as `job.json` by the fetch stage so the report stage frames
/// its sky map and captions its table from the same run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub radius_deg: f64,
}

impl SearchConfig {
    pub fn save(&self, path: &Path) -> Result<(), AtlasError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<SearchConfig, AtlasError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

// ---------------------------------------------------------------------------
// Result directory layout
// ---------------------------------------------------------------------------

/// On-disk layout of one run's inputs and artifacts.
///
/// ```text
/// result/
/// ├── rawdata.csv   verbatim catalog blob
/// ├── data.csv      normalized records
/// ├── job.json      persisted SearchConfig
/// ├── output/       spectral series files (external upstream computation)
/// ├── plots/        rendered figures
/// ├── tex/          report source + compile log
/// └── report.pdf    compiled report
/// ```
#[derive(Debug, Clone)]
pub struct ResultLayout {
    root: PathBuf,
}

impl ResultLayout {
    pub fn new(root: impl Into<PathBuf>) -> ResultLayout {
        ResultLayout { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_csv(&self) -> PathBuf {
        self.root.join("rawdata.csv")
    }

    pub fn data_csv(&self) -> PathBuf {
        self.root.join("data.csv")
    }

    pub fn job_file(&self) -> PathBuf {
        self.root.join("job.json")
    }

    /// Where the upstream spectral computation drops its series files.
    pub fn series_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    pub fn plots_dir(&self) -> PathBuf {
        self.root.join("plots")
    }

    pub fn tex_dir(&self) -> PathBuf {
        self.root.join("tex")
    }

    pub fn report_pdf(&self) -> PathBuf {
        self.root.join("report.pdf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        let cfg = SearchConfig {
            ra_deg: 98.5,
            dec_deg: 17.8,
            radius_deg: 5.0,
        };
        cfg.save(&path).unwrap();
        assert_eq!(SearchConfig::load(&path).unwrap(), cfg);
    }

    #[test]
    fn layout_paths_hang_off_root() {
        let layout = ResultLayout::new("result");
        assert_eq!(layout.data_csv(), PathBuf::from("result/data.csv"));
        assert_eq!(layout.series_dir(), PathBuf::from("result/output"));
        assert_eq!(layout.report_pdf(), PathBuf::from("result/report.pdf"));
    }
}
