//! Cost accounting: the persisted ledger and its report.

pub mod ledger;
pub mod report;

use tracing::warn;

pub use ledger::{CostLedger, Costs};
pub use report::{render_cost_table, total};

use crate::llm::Cost;

/// Sink for the cost of each generation call.
///
/// Recording is best effort: a failure is logged and never interrupts the
/// commit that incurred the cost.
pub trait CostRecorder {
    fn record(&self, cost: Cost);
}

/// Records into the ledger under one repository identity.
pub struct RepositoryCosts {
    ledger: CostLedger,
    identity: String,
}

impl RepositoryCosts {
    pub fn new(ledger: CostLedger, identity: impl Into<String>) -> Self {
        Self {
            ledger,
            identity: identity.into(),
        }
    }
}

impl CostRecorder for RepositoryCosts {
    fn record(&self, cost: Cost) {
        if let Err(e) = self.ledger.record(&self.identity, cost) {
            warn!("Failed to record cost: {e}");
        }
    }
}
