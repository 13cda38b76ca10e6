//! Display-time serving-size scaling. Never mutates the stored recipe.

use once_cell::sync::Lazy;
use regex::Regex;

static QUANTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+\.?\d*)\s*([a-zA-Z]*)\s*(.*)$").unwrap());

/// Scales the leading quantity of `"<quantity><unit><name>"` by
/// `current / original`, keeping unit and name verbatim. Whole results are
/// rendered without decimals, everything else with two. Descriptions with no
/// parseable leading quantity come back unchanged.
pub fn adjust(ingredient: &str, original: u32, current: u32) -> String {
    let Some(captures) = QUANTITY.captures(ingredient) else {
        return ingredient.to_owned();
    };
    let Ok(quantity) = captures[1].parse::<f64>() else {
        return ingredient.to_owned();
    };
    if original == 0 {
        return ingredient.to_owned();
    }

    let scaled = quantity / f64::from(original) * f64::from(current);
    let formatted = if scaled.fract() == 0.0 {
        format!("{scaled}")
    } else {
        format!("{scaled:.2}")
    };

    [formatted.as_str(), &captures[2], &captures[3]]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First numeric token of the free-text serving count ("4 people" -> 4),
/// defaulting to 1. Lower bound of the adjustable counter.
pub fn declared_servings(servings: &str) -> u32 {
    servings
        .split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .filter(|count| *count > 0)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_whole_quantities() {
        assert_eq!(adjust("2 cups flour", 4, 8), "4 cups flour");
    }

    #[test]
    fn halves_fractional_quantities() {
        assert_eq!(adjust("1.5 tsp salt", 2, 1), "0.75 tsp salt");
    }

    #[test]
    fn leaves_unparseable_descriptions_alone() {
        assert_eq!(adjust("a pinch of salt", 4, 8), "a pinch of salt");
    }

    #[test]
    fn whole_results_render_without_decimals() {
        assert_eq!(adjust("3 eggs", 2, 4), "6 eggs");
        assert_eq!(adjust("0.5 cup milk", 2, 4), "1 cup milk");
    }

    #[test]
    fn quantity_without_unit() {
        // "500" then "g" is the unit; "2 large onions" has unit "large".
        assert_eq!(adjust("500 g butter", 4, 2), "250 g butter");
        assert_eq!(adjust("2 large onions", 2, 3), "3 large onions");
    }

    #[test]
    fn identity_scaling_still_reformats_fractions() {
        // 1.5 scaled by 1 stays fractional and renders with two decimals.
        assert_eq!(adjust("1.5 tsp salt", 2, 2), "1.50 tsp salt");
    }

    #[test]
    fn zero_original_is_a_no_op() {
        assert_eq!(adjust("2 cups flour", 0, 8), "2 cups flour");
    }

    #[test]
    fn declared_servings_parses_leading_count() {
        assert_eq!(declared_servings("4 people"), 4);
        assert_eq!(declared_servings("1 person"), 1);
        assert_eq!(declared_servings("serves four"), 1);
        assert_eq!(declared_servings(""), 1);
        assert_eq!(declared_servings("0 people"), 1);
    }
}
