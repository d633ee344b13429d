//! Human-readable labels for stored keys.
//!
//! ```rust
//! use tally_core::labels::derive_label;
//!
//! assert_eq!(derive_label("cement_bags_nos"), "Cement Bags");
//! assert_eq!(derive_label("brick_cost_inr"), "Brick Cost");
//! assert_eq!(derive_label("wall_volume"), "Wall Volume");
//! ```

/// Unit tokens stripped from the end of a stored key
pub const UNIT_SUFFIXES: [&str; 7] = ["inr", "nos", "ton", "bags", "liter", "kg", "sqft"];

/// Turn a snake-case storage key into a title-case label.
///
/// One trailing unit token is dropped, unless it is the whole key.
pub fn derive_label(key: &str) -> String {
    let mut words: Vec<&str> = key.split('_').filter(|w| !w.is_empty()).collect();
    if words.len() > 1 {
        if let Some(last) = words.last() {
            if UNIT_SUFFIXES.contains(&last.to_ascii_lowercase().as_str()) {
                words.pop();
            }
        }
    }
    words.iter().map(|w| title_case(w)).collect::<Vec<_>>().join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_only_one_suffix() {
        assert_eq!(derive_label("steel_weight_kg"), "Steel Weight");
        assert_eq!(derive_label("cement_bags"), "Cement");
        assert_eq!(derive_label("cement_bags_nos"), "Cement Bags");
    }

    #[test]
    fn test_bare_token_is_kept() {
        assert_eq!(derive_label("kg"), "Kg");
    }

    #[test]
    fn test_title_case_and_separators() {
        assert_eq!(derive_label("no_of_bricks_nos"), "No Of Bricks");
        assert_eq!(derive_label("total_cost_INR"), "Total Cost");
        assert_eq!(derive_label("mortar__dry_volume"), "Mortar Dry Volume");
    }
}
