//! Data-quality checks over aggregated categories.

use collision_map_analytics_models::CategoryCount;

/// Pairs of category labels that differ only by ASCII letter case, in the
/// order they appear.
#[must_use]
pub fn case_variants(categories: &[CategoryCount]) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();
    for (i, a) in categories.iter().enumerate() {
        for b in &categories[i + 1..] {
            if a.category.eq_ignore_ascii_case(&b.category) {
                pairs.push((a.category.as_str(), b.category.as_str()));
            }
        }
    }
    pairs
}

/// Logs a warning for every case-only variant in `categories`. The variants
/// remain separate categories.
pub fn warn_on_case_variants(field: &str, categories: &[CategoryCount]) {
    for (a, b) in case_variants(categories) {
        log::warn!(
            "Data quality: {field} values '{a}' and '{b}' differ only by case and are counted separately"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str) -> CategoryCount {
        CategoryCount {
            category: name.to_string(),
            count: 1,
        }
    }

    #[test]
    fn finds_case_only_variants() {
        let categories = [category("QUEENS"), category("BRONX"), category("Queens")];
        assert_eq!(case_variants(&categories), [("QUEENS", "Queens")]);
    }

    #[test]
    fn distinct_names_are_not_variants() {
        let categories = [category("QUEENS"), category("STATEN ISLAND")];
        assert!(case_variants(&categories).is_empty());
    }
}
