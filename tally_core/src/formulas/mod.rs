//! # Construction Quantity Formulas
//!
//! Every calculator the engine knows about lives here, as data: a
//! [`CalculatorDefinition`] names its input fields, price fields, domain
//! constants and a pure compute function. Adding a calculator means adding
//! an entry, never copying a page of code.
//!
//! ## Modules
//!
//! - [`masonry`] - AAC block and clay brick walls, closers, circular walls
//! - [`plaster`] - gypsum, premix and sand/cement plaster
//! - [`concrete`] - nominal-mix concrete for columns, footings, walls, tubes,
//!   staircases and gutters
//! - [`steel`] - reinforcement weight for bars, columns, beams, footings, slabs
//! - [`registry`] - the immutable calculator table and lookups
//!
//! ## Guards
//!
//! Formulas never produce NaN or infinities. Every division goes through
//! [`safe_div`], which returns `0` when the denominator is `<= 0`, and every
//! [`FormulaResult`] zeroes a non-finite value on construction.

pub mod concrete;
pub mod masonry;
pub mod plaster;
pub mod registry;
pub mod steel;

use serde::{Deserialize, Serialize};

use crate::cost::PriceField;
use crate::input::{FieldSchema, NormalizedInput};
use crate::units::Unit;

pub use registry::{all, compute, generate_reference_markdown, ids, lookup};

// ============================================================================
// Shared Domain Constants
// ============================================================================

/// Volume of one 50 kg cement bag (m³), at 1440 kg/m³ bulk density
pub const CEMENT_BAG_VOLUME_M3: f64 = 0.035;

/// Steel unit weight divisor: a bar of diameter D mm weighs D²/162 kg per meter
pub const STEEL_WEIGHT_DIVISOR: f64 = 162.0;

/// Slack added to `span / spacing` before flooring.
const SPACING_TOLERANCE: f64 = 1e-9;

// ============================================================================
// Formula Result
// ============================================================================

/// Link from a computed quantity to the price input that costs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBinding {
    /// Key of the unit price in the price map (`brick_price`)
    pub price_key: String,
    /// Label of the resulting cost line (`brick_cost`)
    pub cost_label: String,
}

/// One computed quantity together with the formula that produced it.
///
/// `formula` is the literal expression shown in the detail view; it is
/// written next to the arithmetic it describes and must stay in step with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaResult {
    /// Snake-case key (`no_of_bricks`)
    pub key: String,
    /// Value in `unit`; always finite
    pub value: f64,
    pub unit: Unit,
    /// Formula text, using the input symbols of the calculator
    pub formula: String,
    /// Display precision override; `None` uses the engine setting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u8>,
    /// Present when the quantity is costed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceBinding>,
}

impl FormulaResult {
    pub fn new(key: impl Into<String>, value: f64, unit: Unit, formula: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: finite_or_zero(value),
            unit,
            formula: formula.into(),
            precision: None,
            price: None,
        }
    }

    /// Cost this quantity with the price stored under `price_key`.
    pub fn priced(mut self, price_key: impl Into<String>, cost_label: impl Into<String>) -> Self {
        self.price = Some(PriceBinding {
            price_key: price_key.into(),
            cost_label: cost_label.into(),
        });
        self
    }

    /// Declare a display precision other than the engine default.
    pub fn with_precision(mut self, decimals: u8) -> Self {
        self.precision = Some(decimals);
        self
    }

    /// Precision to display with, given the engine default
    pub fn display_precision(&self, default: u8) -> u8 {
        self.precision.unwrap_or(default)
    }
}

// ============================================================================
// Calculator Definition
// ============================================================================

/// Grouping used for listings and the reference document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculatorFamily {
    Masonry,
    Plaster,
    Concrete,
    Steel,
}

impl CalculatorFamily {
    pub fn display_name(&self) -> &'static str {
        match self {
            CalculatorFamily::Masonry => "Masonry",
            CalculatorFamily::Plaster => "Plaster",
            CalculatorFamily::Concrete => "Concrete",
            CalculatorFamily::Steel => "Steel Reinforcement",
        }
    }

    /// All families in listing order
    pub fn all() -> [CalculatorFamily; 4] {
        [
            CalculatorFamily::Masonry,
            CalculatorFamily::Plaster,
            CalculatorFamily::Concrete,
            CalculatorFamily::Steel,
        ]
    }
}

/// A fixed domain constant a calculator relies on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Constant {
    pub name: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

impl Constant {
    pub const fn new(name: &'static str, value: f64, unit: &'static str) -> Self {
        Self { name, value, unit }
    }
}

/// Pure compute function of a calculator
pub type ComputeFn = fn(&NormalizedInput) -> Vec<FormulaResult>;

/// One registered calculator type.
#[derive(Clone, Serialize)]
pub struct CalculatorDefinition {
    /// Stable id used by callers and in stored history (`aac-block`)
    pub id: &'static str,
    pub name: &'static str,
    pub family: CalculatorFamily,
    pub description: &'static str,
    /// Input fields in display order
    pub inputs: Vec<FieldSchema>,
    /// Unit prices the calculator can cost with
    pub prices: Vec<PriceField>,
    pub constants: Vec<Constant>,
    #[serde(skip)]
    pub compute: ComputeFn,
}

impl std::fmt::Debug for CalculatorDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculatorDefinition")
            .field("id", &self.id)
            .field("family", &self.family)
            .field("inputs", &self.inputs.len())
            .field("prices", &self.prices.len())
            .finish_non_exhaustive()
    }
}

impl CalculatorDefinition {
    /// Run the compute function on already-normalized input.
    pub fn run(&self, input: &NormalizedInput) -> Vec<FormulaResult> {
        (self.compute)(input)
    }
}

// ============================================================================
// Guards
// ============================================================================

/// Division that yields `0` when the denominator is `<= 0` or not finite.
///
/// ```rust
/// use tally_core::formulas::safe_div;
///
/// assert_eq!(safe_div(1.3, 0.0), 0.0);
/// assert_eq!(safe_div(1.3, -2.0), 0.0);
/// assert_eq!(safe_div(3.0, 2.0), 1.5);
/// ```
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && denominator.is_finite() {
        finite_or_zero(numerator / denominator)
    } else {
        0.0
    }
}

/// Clamp a net quantity (wall minus openings, outer minus inner) at zero.
pub fn non_negative(value: f64) -> f64 {
    if value > 0.0 {
        finite_or_zero(value)
    } else {
        0.0
    }
}

/// Bars laid at `spacing` across `clear_span`: `⌊span / spacing⌋ + 1`.
///
/// A non-positive span or spacing means no bars. Spans that the spacing
/// divides exactly keep their end bar even when the quotient lands just
/// under a whole number (`1.9 / 0.1 = 18.999…`).
pub fn bar_count(clear_span: f64, spacing: f64) -> f64 {
    if clear_span <= 0.0 || spacing <= 0.0 {
        return 0.0;
    }
    finite_or_zero((clear_span / spacing + SPACING_TOLERANCE).floor() + 1.0)
}

/// Weight per meter of a bar of diameter `diameter_mm`: `D² / 162` kg/m.
pub fn steel_unit_weight(diameter_mm: f64) -> f64 {
    finite_or_zero(diameter_mm * diameter_mm / STEEL_WEIGHT_DIVISOR)
}

// ============================================================================
// Shared Mix Step
// ============================================================================

/// Apportion a dry mortar volume `Vd` between cement and sand for a `c:s` ratio.
///
/// Used by brick masonry and sand/cement plaster alike.
pub(crate) fn cement_sand_mortar(cement_part: f64, sand_part: f64, dry_volume: f64) -> [FormulaResult; 2] {
    let parts = cement_part + sand_part;
    let cement_bags = safe_div(cement_part * dry_volume, parts * CEMENT_BAG_VOLUME_M3);
    let sand_volume = safe_div(sand_part * dry_volume, parts);
    [
        FormulaResult::new("cement_bags", cement_bags, Unit::Bags, "c × Vd / ((c + s) × 0.035)")
            .priced("cement_price", "cement_cost"),
        FormulaResult::new("sand_volume", sand_volume, Unit::CubicMeter, "s × Vd / (c + s)")
            .priced("sand_price", "sand_cost"),
    ]
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_div_guards() {
        assert_eq!(safe_div(5.0, 0.0), 0.0);
        assert_eq!(safe_div(5.0, -0.0), 0.0);
        assert_eq!(safe_div(5.0, f64::INFINITY), 0.0);
        assert_eq!(safe_div(5.0, 1e-320), 0.0);
        assert_eq!(safe_div(-6.0, 3.0), -2.0);
    }

    #[test]
    fn test_formula_result_zeroes_non_finite() {
        let r = FormulaResult::new("x", f64::NAN, Unit::Count, "x");
        assert_eq!(r.value, 0.0);
        let r = FormulaResult::new("x", f64::NEG_INFINITY, Unit::Count, "x");
        assert_eq!(r.value, 0.0);
    }

    #[test]
    fn test_bar_count() {
        assert_eq!(bar_count(1.0, 0.15), 7.0);
        assert_eq!(bar_count(0.9, 0.15), 7.0);
        assert_eq!(bar_count(1.0, 0.0), 0.0);
        assert_eq!(bar_count(-0.1, 0.15), 0.0);
    }

    #[test]
    fn test_bar_count_exact_division() {
        assert_eq!(bar_count(1.9, 0.1), 20.0);
        assert_eq!(bar_count(0.2, 0.1), 3.0);
        assert_eq!(bar_count(0.3, 0.1), 4.0);
        assert_eq!(bar_count(2.9, 0.1), 30.0);
        assert_eq!(bar_count(0.7, 0.1), 8.0);
        // Just short of another spacing stays short
        assert_eq!(bar_count(0.299, 0.1), 3.0);
    }

    #[test]
    fn test_steel_unit_weight() {
        // 12 mm bar: 144 / 162 = 0.888... kg/m
        assert!((steel_unit_weight(12.0) - 0.888_888_9).abs() < 1e-6);
        assert!((steel_unit_weight(18.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_result_builders() {
        let r = FormulaResult::new("no_of_bricks", 99.8, Unit::Count, "V / Vb")
            .priced("brick_price", "brick_cost")
            .with_precision(0);
        assert_eq!(r.display_precision(3), 0);
        assert_eq!(r.price.as_ref().unwrap().price_key, "brick_price");
    }
}
