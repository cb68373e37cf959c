use super::model::{Classification, NormalizedRecord};
use super::normalize::YR_TO_S;

// ---------------------------------------------------------------------------
// Selection rule
// ---------------------------------------------------------------------------

/// Sources farther than this are excluded from spectral analysis.
pub const MAX_DIST_PC: f64 = 2000.0;
/// Sources younger than 10⁴ yr are excluded.
pub const MIN_AGE_S: f64 = 1e4 * YR_TO_S;

/// Classify one normalized record.
///
/// Pure function of the record's fields: a record with any unreported
/// quantity is filtered, as is anything beyond [`MAX_DIST_PC`] (strictly;
/// exactly 2000 pc passes) or younger than [`MIN_AGE_S`].
pub fn classify(rec: &NormalizedRecord) -> Classification {
    let (age_s, dist_pc) = match (
        rec.age_s.value(),
        rec.dist_pc.value(),
        rec.edot_mc2_s.value(),
    ) {
        (Some(age), Some(dist), Some(_)) => (age, dist),
        _ => return Classification::Filtered,
    };

    if dist_pc > MAX_DIST_PC || age_s < MIN_AGE_S {
        Classification::Filtered
    } else {
        Classification::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::Quantity;

    fn rec(age_s: Quantity, dist_pc: Quantity, edot: Quantity) -> NormalizedRecord {
        NormalizedRecord {
            name: "J0000+0000".into(),
            ra_deg: 0.5,
            dec_deg: 0.5,
            age_s,
            dist_pc,
            edot_mc2_s: edot,
        }
    }

    fn qualifying() -> NormalizedRecord {
        rec(
            Quantity::Value(1e5 * YR_TO_S),
            Quantity::Value(1500.0),
            Quantity::Value(1e36),
        )
    }

    #[test]
    fn qualifying_record_is_accepted() {
        assert_eq!(classify(&qualifying()), Classification::Accepted);
    }

    #[test]
    fn missing_quantity_filters() {
        let mut r = qualifying();
        r.edot_mc2_s = Quantity::Missing;
        assert_eq!(classify(&r), Classification::Filtered);
    }

    #[test]
    fn distance_threshold_is_strict() {
        let mut r = qualifying();
        r.dist_pc = Quantity::Value(2000.0);
        assert_eq!(classify(&r), Classification::Accepted);
        r.dist_pc = Quantity::Value(2000.0000001);
        assert_eq!(classify(&r), Classification::Filtered);
        r.dist_pc = Quantity::Value(3000.0);
        assert_eq!(classify(&r), Classification::Filtered);
    }

    #[test]
    fn young_sources_are_filtered() {
        let mut r = qualifying();
        r.age_s = Quantity::Value(MIN_AGE_S);
        assert_eq!(classify(&r), Classification::Accepted);
        r.age_s = Quantity::Value(MIN_AGE_S - 1.0);
        assert_eq!(classify(&r), Classification::Filtered);
    }

    #[test]
    fn classify_is_deterministic() {
        let r = qualifying();
        let first = classify(&r);
        for _ in 0..10 {
            assert_eq!(classify(&r), first);
        }
    }
}
