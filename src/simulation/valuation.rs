//! CTLA trunk-formula appraisal.
//!
//! A class is valued at the inflated replacement cost per unit of basal area,
//! scaled by its depreciation factor and its aggregate basal area.

use crate::models::{basal_area, ClassSnapshot, Depreciation, SiteConfig};

/// Appraised value of `area` cm² of basal area in a class with `depreciation`.
pub fn appraised_value(
    site: &SiteConfig,
    depreciation: &Depreciation,
    area: f64,
    inflation: f64,
) -> f64 {
    site.unit_value_per_area() * inflation * depreciation.factor() * area
}

/// Year-end state of one species class.
pub fn snapshot(
    site: &SiteConfig,
    depreciation: &Depreciation,
    count: u64,
    mean_dbh: f64,
    inflation: f64,
) -> ClassSnapshot {
    let area = basal_area(mean_dbh, count);
    ClassSnapshot {
        count,
        mean_dbh,
        basal_area: area,
        value: appraised_value(site, depreciation, area, inflation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Locale;
    use std::f64::consts::PI;

    #[test]
    fn test_new_tree_worth_planting_cost() {
        let site = Locale::Generic.config();
        let area = basal_area(site.planting_dbh, 1);
        let value = appraised_value(&site, &Depreciation::none(), area, 1.0);
        assert!((value - PI * site.planting_cost).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_applies_depreciation_and_inflation() {
        let site = Locale::Generic.config();
        let snap = snapshot(&site, &site.legacy_depreciation, 10, 30.0, 1.5);
        let expected_area = PI * 225.0 * 10.0;
        assert!((snap.basal_area - expected_area).abs() < 1e-9);
        let expected = 849.91 / 9.0 * 1.5 * 0.04 * expected_area;
        assert!((snap.value - expected).abs() < 1e-6);
    }

    #[test]
    fn test_empty_class_has_no_value() {
        let site = Locale::Park.config();
        let snap = snapshot(&site, &site.replacement_depreciation, 0, 6.0, 1.0);
        assert_eq!(snap.basal_area, 0.0);
        assert_eq!(snap.value, 0.0);
    }
}
