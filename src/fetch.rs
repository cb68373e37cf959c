use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::AtlasError;

// ---------------------------------------------------------------------------
// Catalog query service client
// ---------------------------------------------------------------------------

// The whole database could also be downloaded from
// https://www.atnf.csiro.au/research/pulsar/psrcat/download.html
const CATALOG_URL: &str = "https://www.atnf.csiro.au/research/pulsar/psrcat/proc_form.php";
const CATALOG_VERSION: &str = "1.62";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Query the catalog service for all sources within the configured cone
/// and return the raw semicolon-delimited blob embedded in the reply.
pub fn fetch_catalog(cfg: &SearchConfig) -> Result<String, AtlasError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()?;

    let response = client
        .get(CATALOG_URL)
        .query(&query_params(cfg))
        .send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(AtlasError::BadCatalogResponse {
            reason: format!("HTTP {status}"),
        });
    }

    let body = response.text()?;
    extract_pre_block(&body).ok_or_else(|| AtlasError::BadCatalogResponse {
        reason: "no embedded data block".into(),
    })
}

/// The full form parameter set the query page expects; `no_value=*` selects
/// the missing marker the rest of the pipeline relies on.
fn query_params(cfg: &SearchConfig) -> Vec<(&'static str, String)> {
    let fixed: &[(&str, &str)] = &[
        ("version", CATALOG_VERSION),
        ("JName", "JName"),
        ("Dist", "Dist"),
        ("Age", "Age"),
        ("Edot", "Edot"),
        ("RaJD", "RaJD"),
        ("DecJD", "DecJD"),
        ("startUserDefined", "true"),
        ("sort_attr", "jname"),
        ("sort_order", "asc"),
        ("condition", ""),
        ("ephemeris", "short"),
        ("coords_unit", "rajd/decjd"),
        ("style", "Short csv without errors"),
        ("no_value", "*"),
        ("fsize", "3"),
        ("x_axis", ""),
        ("x_scale", "linear"),
        ("y_axis", ""),
        ("y_scale", "linear"),
        ("state", "query"),
        ("table_bottom.x", "29"),
        ("table_bottom.y", "21"),
    ];

    let mut params: Vec<(&'static str, String)> = fixed
        .iter()
        .map(|&(k, v)| (k, v.to_string()))
        .collect();
    params.push(("radius", cfg.radius_deg.to_string()));
    params.push(("coords_1", cfg.ra_deg.to_string()));
    params.push(("coords_2", cfg.dec_deg.to_string()));
    params
}

/// Pull the text of the first `<pre>` element out of the query form page.
/// The blob is trimmed and newline-terminated for the parser.
fn extract_pre_block(html: &str) -> Option<String> {
    let start = html.find("<pre>")? + "<pre>".len();
    let end = start + html[start..].find("</pre>")?;
    Some(format!("{}\n", html[start..end].trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_trimmed_pre_block() {
        let html = "<html><body><pre>\n#;PSRJ\n1;J0633+1746\n</pre></body></html>";
        assert_eq!(
            extract_pre_block(html).as_deref(),
            Some("#;PSRJ\n1;J0633+1746\n")
        );
    }

    #[test]
    fn missing_pre_block_is_none() {
        assert_eq!(extract_pre_block("<html><body>busy</body></html>"), None);
    }

    #[test]
    fn query_carries_the_cone_parameters() {
        let cfg = SearchConfig {
            ra_deg: 98.5,
            dec_deg: 17.8,
            radius_deg: 5.0,
        };
        let params = query_params(&cfg);
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("coords_1"), Some("98.5"));
        assert_eq!(get("coords_2"), Some("17.8"));
        assert_eq!(get("radius"), Some("5"));
        assert_eq!(get("no_value"), Some("*"));
    }
}
