use csv::StringRecord;

use crate::error::AtlasError;

use super::model::{CatalogRecord, Quantity};

// ---------------------------------------------------------------------------
// Raw catalog blob parser
// ---------------------------------------------------------------------------

/// Header names as the query service emits them.
const COL_INDEX: &str = "#";
const COL_NAME: &str = "PSRJ";
const COL_RAJD: &str = "RAJD";
const COL_DECJD: &str = "DECJD";
const COL_AGE: &str = "AGE";
const COL_DIST: &str = "DIST";
const COL_EDOT: &str = "EDOT";

/// Positions of the columns we consume, resolved from the header row.
struct Columns {
    index: usize,
    name: usize,
    rajd: usize,
    decjd: usize,
    age: usize,
    dist: usize,
    edot: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Columns, AtlasError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(AtlasError::MissingColumn(name))
        };
        Ok(Columns {
            index: find(COL_INDEX)?,
            name: find(COL_NAME)?,
            rajd: find(COL_RAJD)?,
            decjd: find(COL_DECJD)?,
            age: find(COL_AGE)?,
            dist: find(COL_DIST)?,
            edot: find(COL_EDOT)?,
        })
    }
}

/// Parse the semicolon-delimited catalog blob into raw records.
///
/// The first non-empty row is the header; rows whose index column is empty
/// are separator rows and are skipped. Any other unparsable field aborts
/// the run rather than silently dropping the row.
pub fn parse_catalog(raw: &str) -> Result<Vec<CatalogRecord>, AtlasError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let cols = Columns::resolve(&reader.headers()?.clone())?;
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        // Blank index column marks a separator row.
        if record.get(cols.index).unwrap_or("").is_empty() {
            continue;
        }

        records.push(CatalogRecord {
            name: record.get(cols.name).unwrap_or("").to_string(),
            ra_deg: required_float(&record, cols.rajd, COL_RAJD, line)?,
            dec_deg: required_float(&record, cols.decjd, COL_DECJD, line)?,
            age_yr: quantity(&record, cols.age, COL_AGE, line)?,
            dist_kpc: quantity(&record, cols.dist, COL_DIST, line)?,
            edot_erg_s: quantity(&record, cols.edot, COL_EDOT, line)?,
        });
    }

    Ok(records)
}

/// A field that must be numeric (no missing marker allowed).
fn required_float(
    record: &StringRecord,
    idx: usize,
    field: &'static str,
    line: u64,
) -> Result<f64, AtlasError> {
    let value = record.get(idx).unwrap_or("").trim();
    value
        .parse::<f64>()
        .map_err(|_| AtlasError::MalformedRecord {
            line,
            field,
            value: value.to_string(),
        })
}

/// A field that is either the missing marker or numeric.
fn quantity(
    record: &StringRecord,
    idx: usize,
    field: &'static str,
    line: u64,
) -> Result<Quantity, AtlasError> {
    let value = record.get(idx).unwrap_or("");
    Quantity::parse(value).ok_or_else(|| AtlasError::MalformedRecord {
        line,
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOB: &str = "\
#;PSRJ;RAJD;DECJD;AGE;DIST;EDOT
1;J0633+1746;98.476;17.770;3.42e+05;0.19;3.2e+34
;;;;;;
2;J0659+1414;104.950;14.239;1.11e+05;0.29;3.8e+34
3;J0702+1211;105.000;12.100;*;0.50;*
";

    #[test]
    fn parses_records_and_skips_separator_rows() {
        let records = parse_catalog(BLOB).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "J0633+1746");
        assert_eq!(records[0].ra_deg, 98.476);
        assert_eq!(records[0].age_yr, Quantity::Value(3.42e5));
        assert_eq!(records[2].age_yr, Quantity::Missing);
        assert_eq!(records[2].edot_erg_s, Quantity::Missing);
        assert_eq!(records[2].dist_kpc, Quantity::Value(0.5));
    }

    #[test]
    fn unparsable_float_aborts() {
        let blob = "#;PSRJ;RAJD;DECJD;AGE;DIST;EDOT\n1;J0000+0000;bogus;1.0;*;*;*\n";
        let err = parse_catalog(blob).unwrap_err();
        match err {
            AtlasError::MalformedRecord { field, value, .. } => {
                assert_eq!(field, "RAJD");
                assert_eq!(value, "bogus");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unparsable_quantity_aborts() {
        let blob = "#;PSRJ;RAJD;DECJD;AGE;DIST;EDOT\n1;J0000+0000;1.0;1.0;old;*;*\n";
        let err = parse_catalog(blob).unwrap_err();
        match err {
            AtlasError::MalformedRecord { field, value, .. } => {
                assert_eq!(field, "AGE");
                assert_eq!(value, "old");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_header_column_is_reported() {
        let blob = "#;PSRJ;RAJD;DECJD;AGE;DIST\n";
        let err = parse_catalog(blob).unwrap_err();
        assert!(matches!(err, AtlasError::MissingColumn("EDOT")));
    }
}
