use super::model::{CatalogRecord, NormalizedRecord, Quantity};

// ---------------------------------------------------------------------------
// Unit conversion factors
// ---------------------------------------------------------------------------

/// erg/s → electron rest-mass energies per second.
pub const ERG_S_TO_MC2_S: f64 = 1221432.8760283517;
/// kpc → pc.
pub const KPC_TO_PC: f64 = 1e3;
/// Julian years (365.25 d) → seconds.
pub const YR_TO_S: f64 = 365.25 * 24.0 * 60.0 * 60.0;

/// Convert one raw record into normalized units.
///
/// The derived triple converts all-or-nothing: if any of age, distance or
/// spin-down power is unreported, all three stay missing so the selection
/// rule always sees either a complete or a completely incomplete record.
pub fn normalize(raw: &CatalogRecord) -> NormalizedRecord {
    let complete = !raw.age_yr.is_missing()
        && !raw.dist_kpc.is_missing()
        && !raw.edot_erg_s.is_missing();

    let (age_s, dist_pc, edot_mc2_s) = if complete {
        (
            raw.age_yr.scale(YR_TO_S),
            raw.dist_kpc.scale(KPC_TO_PC),
            raw.edot_erg_s.scale(ERG_S_TO_MC2_S),
        )
    } else {
        (Quantity::Missing, Quantity::Missing, Quantity::Missing)
    };

    NormalizedRecord {
        name: raw.name.clone(),
        ra_deg: raw.ra_deg,
        dec_deg: raw.dec_deg,
        age_s,
        dist_pc,
        edot_mc2_s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(age: Quantity, dist: Quantity, edot: Quantity) -> CatalogRecord {
        CatalogRecord {
            name: "J0000+0000".into(),
            ra_deg: 12.5,
            dec_deg: -3.25,
            age_yr: age,
            dist_kpc: dist,
            edot_erg_s: edot,
        }
    }

    #[test]
    fn conversions_are_exact() {
        let rec = raw(
            Quantity::Value(1e5),
            Quantity::Value(1.5),
            Quantity::Value(1e30),
        );
        let norm = normalize(&rec);
        assert_eq!(norm.age_s, Quantity::Value(1e5 * 31_557_600.0));
        assert_eq!(norm.dist_pc, Quantity::Value(1500.0));
        assert_eq!(norm.edot_mc2_s, Quantity::Value(1e30 * 1221432.8760283517));
        assert_eq!(norm.ra_deg, 12.5);
        assert_eq!(norm.dec_deg, -3.25);
    }

    #[test]
    fn one_missing_field_blanks_the_whole_triple() {
        let rec = raw(
            Quantity::Missing,
            Quantity::Value(1.5),
            Quantity::Value(1e30),
        );
        let norm = normalize(&rec);
        assert!(norm.age_s.is_missing());
        assert!(norm.dist_pc.is_missing());
        assert!(norm.edot_mc2_s.is_missing());
    }

    #[test]
    fn all_missing_stays_missing() {
        let rec = raw(Quantity::Missing, Quantity::Missing, Quantity::Missing);
        let norm = normalize(&rec);
        assert!(norm.age_s.is_missing());
        assert!(norm.dist_pc.is_missing());
        assert!(norm.edot_mc2_s.is_missing());
    }

    #[test]
    fn year_factor_matches_julian_year() {
        assert_eq!(YR_TO_S, 31_557_600.0);
    }
}
