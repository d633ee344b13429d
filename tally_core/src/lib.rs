//! # tally_core - Construction Material & Cost Engine
//!
//! `tally_core` turns site geometry, mix ratios and unit prices into
//! material quantities, itemized costs, and an auditable breakdown where
//! every number carries the formula that produced it.
//!
//! ## Design Philosophy
//!
//! - **Data-driven**: every calculator is one registry entry (fields,
//!   prices, constants, a pure compute function)
//! - **Never NaN**: blank or junk input reads as 0, divisions are guarded
//! - **Deterministic**: same input and prices, same output, every time
//! - **JSON-first**: every result type implements Serialize/Deserialize
//!
//! ## Quick Start
//!
//! ```rust
//! use tally_core::{compute, CalculationInput, PriceList};
//!
//! let raw = CalculationInput::new()
//!     .with("brick_length", "600")
//!     .with("brick_width", "200")
//!     .with("brick_height", "100")
//!     .with("mortar_thickness", "5")
//!     .with("wall_length", "10")
//!     .with("wall_height", "1")
//!     .with("wall_thickness", "0.13");
//! let prices: PriceList = [("brick_price".to_string(), 50.0)].into_iter().collect();
//!
//! let output = compute("aac-block", &raw, &prices)?;
//! let bricks = output.quantity("no_of_bricks").unwrap_or_default();
//! assert!((bricks - 99.826).abs() < 1e-3);
//!
//! let payload = output.aggregate();
//! assert_eq!(payload.material_quantity["no_of_bricks_nos"], 100.0);
//! # Ok::<(), tally_core::CalcError>(())
//! ```
//!
//! ## Modules
//!
//! - [`input`] - Raw entry, field schemas, normalization
//! - [`formulas`] - Calculator definitions and the registry
//! - [`cost`] - Unit prices and cost lines
//! - [`detail`] - Input/output rows for the audit view
//! - [`aggregate`] - `material_quantity` / `work_cost_breakdown` maps
//! - [`engine`] - The end-to-end compute call
//! - [`session`] - Frozen sessions and per-calculator state
//! - [`history`] - Session persistence (memory, JSON file)
//! - [`config`] - Precision and currency settings
//! - [`labels`] - Storage key to display label
//! - [`units`] - Display units and type-safe wrappers
//! - [`errors`] - Structured error types

pub mod aggregate;
pub mod config;
pub mod cost;
pub mod detail;
pub mod engine;
pub mod errors;
pub mod formulas;
pub mod history;
pub mod input;
pub mod labels;
pub mod session;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use aggregate::{AggregatedResult, CalculationPayload};
pub use config::EngineSettings;
pub use cost::{CostKind, CostLineItem, PriceList};
pub use detail::DetailRecord;
pub use engine::{compute, CalculationOutput, Engine};
pub use errors::{CalcError, CalcResult};
pub use formulas::{CalculatorDefinition, FormulaResult};
pub use history::{HistoryStore, MemoryHistory};
pub use input::{CalculationInput, NormalizedInput};
pub use labels::derive_label;
pub use session::{CalculationSession, CalculatorState};
