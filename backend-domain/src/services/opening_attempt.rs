// Per-opening state machine: Idle -> Drawing -> Resolved.
// The resulting item then moves Kept -> (Sold | Upgraded) on `InventoryItem`.

use crate::errors::DomainError;
use crate::services::draw_engine::DrawOutcome;
use crate::value_objects::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpeningPhase {
    Idle,
    Drawing,
    Resolved,
}

impl OpeningPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpeningPhase::Idle => "idle",
            OpeningPhase::Drawing => "drawing",
            OpeningPhase::Resolved => "resolved",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpeningAttempt {
    case_id: String,
    price: Money,
    phase: OpeningPhase,
    outcome: Option<DrawOutcome>,
}

impl OpeningAttempt {
    pub fn new(case_id: impl Into<String>, price: Money) -> Self {
        Self {
            case_id: case_id.into(),
            price,
            phase: OpeningPhase::Idle,
            outcome: None,
        }
    }

    pub fn case_id(&self) -> &str {
        &self.case_id
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn phase(&self) -> OpeningPhase {
        self.phase
    }

    /// Enters `Drawing` only when `balance` covers the case price.
    pub fn begin_drawing(&mut self, balance: Money) -> Result<(), DomainError> {
        self.expect_phase(OpeningPhase::Idle, OpeningPhase::Drawing)?;
        if balance < self.price {
            return Err(DomainError::InsufficientBalance {
                required: self.price,
                available: balance,
            });
        }
        self.phase = OpeningPhase::Drawing;
        Ok(())
    }

    pub fn resolve(&mut self, outcome: DrawOutcome) -> Result<&DrawOutcome, DomainError> {
        self.expect_phase(OpeningPhase::Drawing, OpeningPhase::Resolved)?;
        self.phase = OpeningPhase::Resolved;
        Ok(self.outcome.insert(outcome))
    }

    fn expect_phase(&self, expected: OpeningPhase, next: OpeningPhase) -> Result<(), DomainError> {
        if self.phase != expected {
            return Err(DomainError::InvalidTransition {
                from: self.phase.as_str(),
                to: next.as_str(),
            });
        }
        Ok(())
    }
}
