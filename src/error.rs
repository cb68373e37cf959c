use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Pipeline error taxonomy
// ---------------------------------------------------------------------------

/// Fatal pipeline failures. Every variant aborts the run; there is no
/// partial-success mode.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// Transport-level failure talking to the catalog query service.
    #[error("catalog download failed ({source}), please re-run")]
    Fetch {
        #[from]
        source: reqwest::Error,
    },

    /// The service answered, but not with a usable catalog page.
    #[error("catalog response unusable ({reason}), please re-run")]
    BadCatalogResponse { reason: String },

    /// A catalog field that should be numeric failed to parse.
    #[error("malformed catalog record at line {line}: {field} = {value:?} is not a number")]
    MalformedRecord {
        line: u64,
        field: &'static str,
        value: String,
    },

    /// The catalog blob lacks one of the expected header columns.
    #[error("catalog data is missing the {0:?} column")]
    MissingColumn(&'static str),

    /// A spectral series file contained something other than an
    /// (energy, flux) sample pair.
    #[error("malformed spectral series {}: line {line}", .path.display())]
    MalformedSeries { path: PathBuf, line: usize },

    /// No source passed selection, so no report can be assembled.
    #[error("no available sources, nothing to report")]
    EmptyReport,

    /// The external typesetter exited non-zero; its diagnostics follow.
    #[error("report compilation failed\n{log}")]
    ReportCompilation { log: String },

    /// The external typesetter exceeded its deadline and was killed.
    #[error("report compilation did not finish within {0:?}")]
    ReportTimeout(Duration),

    #[error("unreadable catalog data: {0}")]
    Csv(#[from] csv::Error),

    #[error("unreadable run configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
