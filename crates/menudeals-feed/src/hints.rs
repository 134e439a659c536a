//! Menu-item hint extraction from coupon free text.
//!
//! Four independent scans run over the name + description text and their
//! results are concatenated in scan order, keeping only the first copy of
//! each hint:
//!
//! 1. menu keywords, in [`MENU_KEYWORDS`] order (`"large pizza"` and
//!    `"pizza"` can both match the same text)
//! 2. price tokens such as `$9.99`, as `"Price: $9.99"`
//! 3. quantity tokens such as `8 pc` or `2 orders`, as `"Quantity: 8 pc"`
//! 4. urgency phrases, prefixed with [`URGENCY_MARKER`]

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Keyword phrases, most specific first.
pub const MENU_KEYWORDS: &[&str] = &[
    "large pizza",
    "medium pizza",
    "small pizza",
    "specialty pizza",
    "pan pizza",
    "thin crust",
    "hand tossed",
    "pizza",
    "stuffed cheesy bread",
    "cheesy bread",
    "bread twists",
    "breadsticks",
    "boneless chicken",
    "chicken wings",
    "wings",
    "chicken",
    "pasta",
    "sandwich",
    "salad",
    "lava cake",
    "brownie",
    "cookie",
    "dessert",
    "2-liter",
    "soda",
    "drink",
    "dipping sauce",
];

pub const URGENCY_PHRASES: &[&str] = &[
    "today only",
    "limited time",
    "flash sale",
    "happy hour",
    "this week only",
    "weekend only",
    "while supplies last",
    "ends soon",
    "last chance",
];

pub const URGENCY_MARKER: &str = "\u{23f0}";

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\d+(?:\.\d+)?").expect("valid price regex"));

static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*(piece|pc|order|item)(s?)\b").expect("valid quantity regex")
});

/// Extracts menu-item hints from `text`.
///
/// Deterministic and allocation-local; safe to call from any thread.
#[must_use]
pub fn extract_menu_hints(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();

    let keywords = MENU_KEYWORDS
        .iter()
        .filter(|k| lower.contains(*k))
        .map(|k| (*k).to_owned());

    let prices = PRICE_RE
        .find_iter(text)
        .map(|m| format!("Price: {}", m.as_str()));

    let quantities = QUANTITY_RE.captures_iter(text).map(|caps| {
        format!(
            "Quantity: {} {}{}",
            &caps[1],
            caps[2].to_lowercase(),
            caps[3].to_lowercase()
        )
    });

    let urgency = URGENCY_PHRASES
        .iter()
        .filter(|p| lower.contains(*p))
        .map(|p| format!("{URGENCY_MARKER} {p}"));

    dedup_first_seen(keywords.chain(prices).chain(quantities).chain(urgency))
}

fn dedup_first_seen<I: Iterator<Item = String>>(hints: I) -> Vec<String> {
    let mut seen = HashSet::new();
    hints.filter(|h| seen.insert(h.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specific_and_generic_keywords_both_match() {
        let hints = extract_menu_hints("Large Pizza Deal Large pizza $9.99");
        assert_eq!(hints, vec!["large pizza", "pizza", "Price: $9.99"]);
    }

    #[test]
    fn late_night_description_hints() {
        let hints = extract_menu_hints("After 10pm - Medium pizza $7.99");
        assert_eq!(hints, vec!["medium pizza", "pizza", "Price: $7.99"]);
    }

    #[test]
    fn price_tokens_with_and_without_cents() {
        let hints = extract_menu_hints("Two for $20 or one for $12.50");
        assert_eq!(hints, vec!["Price: $20", "Price: $12.50"]);
    }

    #[test]
    fn repeated_price_is_kept_once() {
        let hints = extract_menu_hints("$5 pasta, $5 salad");
        assert_eq!(hints, vec!["pasta", "salad", "Price: $5"]);
    }

    #[test]
    fn quantity_units_and_plurals() {
        let hints = extract_menu_hints("8 pc wings, 16PCS boneless, 2 Orders of bread twists, 3 items");
        assert!(hints.contains(&"Quantity: 8 pc".to_owned()));
        assert!(hints.contains(&"Quantity: 16 pcs".to_owned()));
        assert!(hints.contains(&"Quantity: 2 orders".to_owned()));
        assert!(hints.contains(&"Quantity: 3 items".to_owned()));
    }

    #[test]
    fn quantity_requires_unit_word_boundary() {
        let hints = extract_menu_hints("2 ordering options");
        assert!(hints.iter().all(|h| !h.starts_with("Quantity")));
    }

    #[test]
    fn urgency_phrases_carry_marker() {
        let hints = extract_menu_hints("Flash Sale: TODAY ONLY");
        assert_eq!(
            hints,
            vec![
                format!("{URGENCY_MARKER} today only"),
                format!("{URGENCY_MARKER} flash sale"),
            ]
        );
    }

    #[test]
    fn steps_are_unioned_in_order() {
        let hints = extract_menu_hints("Happy hour: 10 piece wings $8.99");
        assert_eq!(
            hints,
            vec![
                "wings".to_owned(),
                "Price: $8.99".to_owned(),
                "Quantity: 10 piece".to_owned(),
                format!("{URGENCY_MARKER} happy hour"),
            ]
        );
    }

    #[test]
    fn extraction_is_deterministic_and_duplicate_free() {
        let text = "Large pizza $9.99 large pizza $9.99 today only today only";
        let first = extract_menu_hints(text);
        let second = extract_menu_hints(text);
        assert_eq!(first, second);
        let unique: HashSet<_> = first.iter().collect();
        assert_eq!(unique.len(), first.len());
    }

    #[test]
    fn empty_text_yields_no_hints() {
        assert!(extract_menu_hints("").is_empty());
    }
}
