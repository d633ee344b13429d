//! # Sessions
//!
//! A [`CalculationSession`] is the frozen result of one "Calculate" press:
//! the raw entry, the prices, every quantity and cost, the detail record and
//! the aggregated payload, stamped with a v4 id and a UTC timestamp.
//!
//! [`CalculatorState`] is the per-calculator state a front end holds.
//! There is no ambient state: the caller owns it and passes it in.
//!
//! ```rust
//! use chrono::Utc;
//! use tally_core::{CalculationInput, CalculatorState, Engine, PriceList};
//!
//! let engine = Engine::default();
//! let raw = CalculationInput::new().with("bar_diameter", "12").with("bar_length", "6").with("bar_count", "4");
//!
//! let mut state = CalculatorState::default();
//! state.calculate(&engine, "steel-weight", &raw, &PriceList::new(), Utc::now())?;
//! assert!(state.is_calculated());
//!
//! state.reset();
//! assert!(state.session().is_none());
//! # Ok::<(), tally_core::CalcError>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::CalculationPayload;
use crate::cost::{CostLineItem, PriceList};
use crate::detail::DetailRecord;
use crate::engine::{CalculationOutput, Engine};
use crate::errors::{CalcError, CalcResult};
use crate::formulas::FormulaResult;
use crate::input::{CalculationInput, NormalizedInput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationSession {
    pub id: Uuid,
    pub calculator_id: String,
    pub created: DateTime<Utc>,
    pub raw_input: CalculationInput,
    pub prices: PriceList,
    pub normalized_input: NormalizedInput,
    pub quantities: Vec<FormulaResult>,
    pub costs: Vec<CostLineItem>,
    pub detail: DetailRecord,
    pub payload: CalculationPayload,
}

impl CalculationSession {
    /// Snapshot a calculation under a new id.
    pub fn freeze(output: CalculationOutput, created: DateTime<Utc>) -> Self {
        let payload = CalculationPayload::new(output.aggregate());
        CalculationSession {
            id: Uuid::new_v4(),
            calculator_id: output.calculator_id,
            created,
            raw_input: output.raw,
            prices: output.prices,
            normalized_input: output.input,
            quantities: output.quantities,
            costs: output.costs,
            detail: output.detail,
            payload,
        }
    }

    /// Attach the externally produced insights to the payload.
    pub fn attach_insights(&mut self, insights: serde_json::Value) {
        self.payload.ai_insights = Some(insights);
    }

    pub fn total_cost(&self) -> f64 {
        self.costs.iter().find(|c| c.is_total()).map(|c| c.total_cost).unwrap_or(0.0)
    }
}

/// State of one calculator instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CalculatorState {
    /// Entry in progress, nothing computed
    #[default]
    Idle,
    /// Last "Calculate" press, frozen
    Calculated(Box<CalculationSession>),
}

impl CalculatorState {
    /// Compute and move to `Calculated`, replacing any previous session.
    ///
    /// On error the state is left as it was.
    pub fn calculate(
        &mut self,
        engine: &Engine,
        calculator_id: &str,
        raw: &CalculationInput,
        prices: &PriceList,
        now: DateTime<Utc>,
    ) -> CalcResult<&CalculationSession> {
        let output = engine.compute(calculator_id, raw, prices)?;
        *self = CalculatorState::Calculated(Box::new(output.into_session(now)));
        self.session().ok_or_else(|| CalcError::Internal {
            message: "calculator state not updated".to_string(),
        })
    }

    /// Back to `Idle`, dropping the last session.
    pub fn reset(&mut self) {
        *self = CalculatorState::Idle;
    }

    pub fn session(&self) -> Option<&CalculationSession> {
        match self {
            CalculatorState::Calculated(session) => Some(session),
            CalculatorState::Idle => None,
        }
    }

    pub fn is_calculated(&self) -> bool {
        matches!(self, CalculatorState::Calculated(_))
    }
}
