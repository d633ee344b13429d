//! # Calculator Registry
//!
//! The immutable table of every calculator type, built once on first use.
//!
//! ## Example
//!
//! ```rust
//! use tally_core::formulas::registry;
//!
//! let def = registry::lookup("brick-wall").unwrap();
//! assert_eq!(def.name, "Brick Wall");
//! assert!(registry::lookup("timber-roof").is_err());
//! ```

use once_cell::sync::Lazy;

use crate::errors::{CalcError, CalcResult};
use crate::input::{CalculationInput, NormalizedInput};

use super::{concrete, masonry, plaster, steel, CalculatorDefinition, CalculatorFamily, FormulaResult};

static REGISTRY: Lazy<Vec<CalculatorDefinition>> = Lazy::new(|| {
    let mut defs = masonry::definitions();
    defs.extend(plaster::definitions());
    defs.extend(concrete::definitions());
    defs.extend(steel::definitions());
    defs
});

/// Every registered calculator, grouped by family.
pub fn all() -> &'static [CalculatorDefinition] {
    &REGISTRY
}

/// Ids of every registered calculator, in listing order.
pub fn ids() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|def| def.id)
}

/// Calculators of one family, in listing order.
pub fn in_family(family: CalculatorFamily) -> impl Iterator<Item = &'static CalculatorDefinition> {
    REGISTRY.iter().filter(move |def| def.family == family)
}

/// Find a calculator by id.
pub fn lookup(id: &str) -> CalcResult<&'static CalculatorDefinition> {
    REGISTRY
        .iter()
        .find(|def| def.id == id)
        .ok_or_else(|| CalcError::unknown_calculator(id))
}

/// Run a calculator on normalized input.
pub fn compute(id: &str, input: &NormalizedInput) -> CalcResult<Vec<FormulaResult>> {
    Ok(lookup(id)?.run(input))
}

// ============================================================================
// Reference Document
// ============================================================================

/// Generate the calculator reference as markdown.
///
/// Formula lines are taken from running each calculator on empty input, so
/// the document always shows the text the detail view shows.
pub fn generate_reference_markdown() -> String {
    let mut output = String::with_capacity(24_000);

    output.push_str(
        r#"# Tally Calculator Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-calculators`

Every calculator the engine ships, with its inputs, unit prices, constants
and the formulas behind each output line.

## Conventions

| Rule | Behavior |
|------|----------|
| Blank or non-numeric input | Read as 0 |
| Division by zero or a negative denominator | Quantity is 0 |
| Net geometry below zero | Clamped to 0 |
| Missing unit price | Cost line of 0, quantity still reported |
| Display precision | 3 decimals unless noted |

---

"#,
    );

    for family in CalculatorFamily::all() {
        let defs: Vec<_> = in_family(family).collect();
        if defs.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", family.display_name()));

        for def in defs {
            output.push_str(&format!("### {} (`{}`)\n\n", def.name, def.id));
            output.push_str(&format!("{}\n\n", def.description));

            output.push_str("**Inputs:**\n\n");
            output.push_str("| Symbol | Field | Entered in |\n");
            output.push_str("|--------|-------|------------|\n");
            for field in &def.inputs {
                output.push_str(&format!("| {} | `{}` | {} |\n", field.symbol, field.name, field.unit));
            }
            output.push('\n');

            if !def.prices.is_empty() {
                output.push_str("**Prices:**\n\n");
                for price in &def.prices {
                    output.push_str(&format!("- `{}` per {}\n", price.key, price.per));
                }
                output.push('\n');
            }

            if !def.constants.is_empty() {
                output.push_str("**Constants:**\n\n");
                for constant in &def.constants {
                    let unit = if constant.unit.is_empty() {
                        String::new()
                    } else {
                        format!(" {}", constant.unit)
                    };
                    output.push_str(&format!("- {}: {}{}\n", constant.name, constant.value, unit));
                }
                output.push('\n');
            }

            output.push_str("**Outputs:**\n\n");
            output.push_str("| Quantity | Formula | Unit |\n");
            output.push_str("|----------|---------|------|\n");
            let empty = crate::input::normalize(&CalculationInput::new(), &def.inputs);
            for result in def.run(&empty) {
                output.push_str(&format!("| `{}` | `{}` | {} |\n", result.key, result.formula, result.unit));
            }
            output.push_str("\n---\n\n");
        }
    }

    output
}
