use std::fmt;

// ---------------------------------------------------------------------------
// Quantity – a physical value the catalog may leave unreported
// ---------------------------------------------------------------------------

/// Marker the catalog service emits for an unreported value.
pub const MISSING: &str = "*";

/// A physical quantity that may be unreported.
///
/// The missing marker is distinct from any float: it is never coerced to
/// zero or NaN, and it survives normalization and CSV round-trips verbatim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantity {
    Value(f64),
    Missing,
}

impl Quantity {
    /// Parse a catalog cell: the `*` marker or a float literal.
    /// `None` means the cell is neither, i.e. the record is malformed.
    pub fn parse(raw: &str) -> Option<Quantity> {
        let raw = raw.trim();
        if raw == MISSING {
            return Some(Quantity::Missing);
        }
        raw.parse::<f64>().ok().map(Quantity::Value)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Quantity::Missing)
    }

    /// Numeric view; `None` when missing.
    pub fn value(&self) -> Option<f64> {
        match self {
            Quantity::Value(v) => Some(*v),
            Quantity::Missing => None,
        }
    }

    /// Apply a linear unit conversion, leaving the missing marker untouched.
    pub fn scale(&self, factor: f64) -> Quantity {
        match self {
            Quantity::Value(v) => Quantity::Value(v * factor),
            Quantity::Missing => Quantity::Missing,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Value(v) => write!(f, "{v}"),
            Quantity::Missing => write!(f, "{MISSING}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog records
// ---------------------------------------------------------------------------

/// One catalog entry as queried, in the service's units.
#[derive(Debug, Clone)]
pub struct CatalogRecord {
    /// J2000 name, unique within the catalog.
    pub name: String,
    pub ra_deg: f64,
    pub dec_deg: f64,
    /// Characteristic age in years.
    pub age_yr: Quantity,
    /// Distance in kiloparsecs.
    pub dist_kpc: Quantity,
    /// Spin-down power in erg/s.
    pub edot_erg_s: Quantity,
}

/// One catalog entry in normalized units. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub name: String,
    pub ra_deg: f64,
    pub dec_deg: f64,
    /// Characteristic age in seconds.
    pub age_s: Quantity,
    /// Distance in parsecs.
    pub dist_pc: Quantity,
    /// Spin-down power in electron rest-mass energies per second.
    pub edot_mc2_s: Quantity,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Outcome of the selection rule, computed once per record and consumed by
/// the map point, the table row, and (if accepted) the spectrum figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Accepted,
    Filtered,
}

impl Classification {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Classification::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_marker_and_floats() {
        assert_eq!(Quantity::parse("*"), Some(Quantity::Missing));
        assert_eq!(Quantity::parse("1.5"), Some(Quantity::Value(1.5)));
        assert_eq!(Quantity::parse(" 3.2e12 "), Some(Quantity::Value(3.2e12)));
        assert_eq!(Quantity::parse("n/a"), None);
        assert_eq!(Quantity::parse(""), None);
    }

    #[test]
    fn display_round_trips_full_precision() {
        let q = Quantity::Value(1221432.8760283517);
        let back = Quantity::parse(&q.to_string()).unwrap();
        assert_eq!(back, q);
        assert_eq!(Quantity::Missing.to_string(), "*");
    }

    #[test]
    fn scale_leaves_missing_untouched() {
        assert_eq!(Quantity::Missing.scale(1e3), Quantity::Missing);
        assert_eq!(Quantity::Value(1.5).scale(1e3), Quantity::Value(1500.0));
    }
}
