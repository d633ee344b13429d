//! # Input Normalization
//!
//! Turns the raw text a user typed into canonical numbers.
//!
//! Parsing never fails: blank fields, junk text and non-finite values
//! (`"inf"`, `"NaN"`) all become `0`. Unit conversion runs after parsing,
//! so formulas only ever see canonical units (see [`crate::units`]).
//!
//! ## Example
//!
//! ```rust
//! use tally_core::input::{normalize, CalculationInput, FieldSchema};
//!
//! let schema = [
//!     FieldSchema::meters("wall_length", "wall_length", "l"),
//!     FieldSchema::millimeters("thickness", "plaster_thickness", "t"),
//! ];
//! let raw = CalculationInput::new()
//!     .with("wall_length", "4")
//!     .with("thickness", "12");
//!
//! let input = normalize(&raw, &schema);
//! assert_eq!(input.get("wall_length"), 4.0);
//! assert!((input.get("thickness") - 0.012).abs() < 1e-12);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::units::{Unit, UnitConversion};

/// Declaration of one input field of a calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSchema {
    /// Field name used in raw and normalized maps
    pub name: &'static str,
    /// Translation key for the field label
    pub label_key: &'static str,
    /// Short symbol shown next to the value and used in formulas (`L`, `c`)
    pub symbol: &'static str,
    /// Unit the user enters the value in
    pub unit: Unit,
    /// Conversion to the canonical unit
    pub conversion: UnitConversion,
}

impl FieldSchema {
    /// Length entered in meters.
    pub const fn meters(name: &'static str, label_key: &'static str, symbol: &'static str) -> Self {
        Self { name, label_key, symbol, unit: Unit::Meter, conversion: UnitConversion::None }
    }

    /// Length entered in millimeters, exposed to formulas in meters.
    pub const fn millimeters(name: &'static str, label_key: &'static str, symbol: &'static str) -> Self {
        Self {
            name,
            label_key,
            symbol,
            unit: Unit::Millimeter,
            conversion: UnitConversion::MillimetersToMeters,
        }
    }

    /// Bar diameter: entered and used in millimeters.
    pub const fn diameter(name: &'static str, label_key: &'static str, symbol: &'static str) -> Self {
        Self { name, label_key, symbol, unit: Unit::Millimeter, conversion: UnitConversion::None }
    }

    /// Plain count (bars, columns, steps).
    pub const fn count(name: &'static str, label_key: &'static str, symbol: &'static str) -> Self {
        Self { name, label_key, symbol, unit: Unit::Count, conversion: UnitConversion::None }
    }

    /// One part of a mix ratio.
    pub const fn ratio(name: &'static str, label_key: &'static str, symbol: &'static str) -> Self {
        Self { name, label_key, symbol, unit: Unit::RatioPart, conversion: UnitConversion::None }
    }
}

// ============================================================================
// Raw Input
// ============================================================================

/// Raw user entry for one calculator instance: field name -> text.
///
/// Fields may be absent or empty. The snapshot is taken when the user hits
/// "Calculate"; the engine never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalculationInput(BTreeMap<String, String>);

impl CalculationInput {
    /// Create an empty input
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Set (or replace) a field's raw text
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Raw text of a field, if the user touched it
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Iterate over `(field, raw text)` pairs in field-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CalculationInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ============================================================================
// Normalized Input
// ============================================================================

/// Parsed and unit-converted input. Never contains NaN or infinities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedInput(BTreeMap<String, f64>);

impl NormalizedInput {
    /// Value of a field in canonical units; unknown fields read as 0.
    pub fn get(&self, field: &str) -> f64 {
        self.0.get(field).copied().unwrap_or(0.0)
    }

    /// Iterate over `(field, value)` pairs in field-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, field: &str, value: f64) {
        let value = if value.is_finite() { value } else { 0.0 };
        self.0.insert(field.to_string(), value);
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for NormalizedInput {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut input = NormalizedInput::default();
        for (k, v) in iter {
            let key: String = k.into();
            input.insert(&key, v);
        }
        input
    }
}

/// Parse a decimal number typed by a user.
///
/// Surrounding whitespace is ignored. Anything that is not a finite decimal
/// number yields `0`.
///
/// ```rust
/// use tally_core::input::parse_decimal;
///
/// assert_eq!(parse_decimal(" 2.5 "), 2.5);
/// assert_eq!(parse_decimal(""), 0.0);
/// assert_eq!(parse_decimal("12mm"), 0.0);
/// assert_eq!(parse_decimal("NaN"), 0.0);
/// ```
pub fn parse_decimal(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Normalize raw input against a calculator's field schema.
///
/// Every schema field appears in the result; fields not in the schema are
/// dropped.
pub fn normalize(raw: &CalculationInput, schema: &[FieldSchema]) -> NormalizedInput {
    let mut input = NormalizedInput::default();
    for field in schema {
        let parsed = raw.get(field.name).map(parse_decimal).unwrap_or(0.0);
        input.insert(field.name, field.conversion.apply(parsed));
    }
    input
}
