use std::path::Path;

use csv::StringRecord;

use crate::error::AtlasError;

use super::model::{NormalizedRecord, Quantity};

// ---------------------------------------------------------------------------
// Normalized CSV store
// ---------------------------------------------------------------------------

const HEADER: [&str; 6] = ["JName", "Age", "Dist", "Edot", "RaJD", "DecJD"];

/// Write the normalized records as `data.csv`.
///
/// Values are written with Rust's shortest round-trip float formatting, so
/// reading the file back reproduces every record bit-for-bit; unreported
/// quantities are written as the literal `*` marker.
pub fn write_normalized(path: &Path, records: &[NormalizedRecord]) -> Result<(), AtlasError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;
    for rec in records {
        writer.write_record([
            rec.name.as_str(),
            &rec.age_s.to_string(),
            &rec.dist_pc.to_string(),
            &rec.edot_mc2_s.to_string(),
            &rec.ra_deg.to_string(),
            &rec.dec_deg.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Read `data.csv` back into normalized records.
pub fn read_normalized(path: &Path) -> Result<Vec<NormalizedRecord>, AtlasError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let find = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(AtlasError::MissingColumn(name))
    };
    let (name, age, dist, edot, rajd, decjd) = (
        find("JName")?,
        find("Age")?,
        find("Dist")?,
        find("Edot")?,
        find("RaJD")?,
        find("DecJD")?,
    );

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        records.push(NormalizedRecord {
            name: record.get(name).unwrap_or("").to_string(),
            ra_deg: float_field(&record, rajd, "RaJD", line)?,
            dec_deg: float_field(&record, decjd, "DecJD", line)?,
            age_s: quantity_field(&record, age, "Age", line)?,
            dist_pc: quantity_field(&record, dist, "Dist", line)?,
            edot_mc2_s: quantity_field(&record, edot, "Edot", line)?,
        });
    }
    Ok(records)
}

fn float_field(
    record: &StringRecord,
    idx: usize,
    field: &'static str,
    line: u64,
) -> Result<f64, AtlasError> {
    let value = record.get(idx).unwrap_or("");
    value
        .parse::<f64>()
        .map_err(|_| AtlasError::MalformedRecord {
            line,
            field,
            value: value.to_string(),
        })
}

fn quantity_field(
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
