//! # Unit Types
//!
//! Display units, input conversion rules, and a handful of type-safe
//! wrappers for the quantities the engine converts between.
//!
//! ## Canonical Units
//!
//! Every formula operates on canonical units once input normalization is done:
//! - Length: meters (m); bar diameters stay in millimeters because the
//!   steel unit-weight rule `D²/162` is stated in mm
//! - Area / volume: m², m³
//! - Mass: kilograms (kg), tonnes for summaries
//! - Counts: whole or fractional numbers (nos, bags)
//!
//! ## Example
//!
//! ```rust
//! use tally_core::units::{Meters, Millimeters, UnitConversion};
//!
//! let thickness: Meters = Millimeters(12.0).into();
//! assert!((thickness.0 - 0.012).abs() < 1e-12);
//!
//! assert!((UnitConversion::MillimetersToMeters.apply(600.0) - 0.6).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Display Units
// ============================================================================

/// Unit attached to an input field, a price, or a computed quantity.
///
/// Serializes as its display symbol so stored sessions read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "mm")]
    Millimeter,
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "m²")]
    SquareMeter,
    #[serde(rename = "m³")]
    CubicMeter,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "kg/m")]
    KilogramPerMeter,
    #[serde(rename = "ton")]
    Tonne,
    #[serde(rename = "bags")]
    Bags,
    #[serde(rename = "nos")]
    Count,
    /// One part of a mix ratio (c:s or c:s:a)
    #[serde(rename = "part")]
    RatioPart,
}

impl Unit {
    /// Symbol used in value text ("1.300 m³")
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Millimeter => "mm",
            Unit::Meter => "m",
            Unit::SquareMeter => "m²",
            Unit::CubicMeter => "m³",
            Unit::Kilogram => "kg",
            Unit::KilogramPerMeter => "kg/m",
            Unit::Tonne => "ton",
            Unit::Bags => "bags",
            Unit::Count => "nos",
            Unit::RatioPart => "part",
        }
    }

    /// Token appended to a quantity key in the persisted `material_quantity`
    /// map (`cement_bags` -> `cement_bags_nos`).
    ///
    /// Units without a token are stored under the bare key. Every token
    /// returned here is one that label derivation strips again.
    pub fn storage_token(&self) -> Option<&'static str> {
        match self {
            Unit::Count | Unit::Bags => Some("nos"),
            Unit::Kilogram => Some("kg"),
            Unit::Tonne => Some("ton"),
            _ => None,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Input Conversion Rules
// ============================================================================

/// Conversion applied to a parsed field value before formulas see it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UnitConversion {
    /// Value is already canonical
    None,
    /// Millimeter entry, meters downstream
    MillimetersToMeters,
    /// Generic divisor; a divisor `<= 0` yields 0
    DivideBy(f64),
}

impl UnitConversion {
    /// Apply the rule to an already-parsed value.
    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            UnitConversion::None => value,
            UnitConversion::MillimetersToMeters => Meters::from(Millimeters(value)).value(),
            UnitConversion::DivideBy(divisor) => {
                if divisor > 0.0 {
                    value / divisor
                } else {
                    0.0
                }
            }
        }
    }
}

impl Default for UnitConversion {
    fn default() -> Self {
        UnitConversion::None
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl Meters {
    pub fn value(self) -> f64 {
        self.0
    }
}

// ============================================================================
// Mass Units
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Mass in metric tonnes (1 t = 1000 kg)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tonnes(pub f64);

impl From<Kilograms> for Tonnes {
    fn from(kg: Kilograms) -> Self {
        Tonnes(kg.0 / 1000.0)
    }
}

impl Tonnes {
    pub fn value(self) -> f64 {
        self.0
    }
}
