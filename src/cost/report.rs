//! Tabular rendering of the cost ledger.

use std::fmt::Write;

use super::ledger::Costs;
use crate::llm::Cost;

const REPO_HEADER: &str = "Repository";
const COST_HEADER: &str = "Cost ($)";
const TOTAL_LABEL: &str = "TOTAL";
const MIN_REPO_WIDTH: usize = 45;
const COST_WIDTH: usize = 15;
const CURRENT_MARKER: &str = "▸ ";
const NO_MARKER: &str = "  ";

/// Sum of every repository's total.
pub fn total(costs: &Costs) -> Cost {
    costs.values().sum()
}

/// Render one row per repository, sorted by identity, followed by a TOTAL
/// row. `current` marks the repository the command runs in.
pub fn render_cost_table(costs: &Costs, current: Option<&str>) -> String {
    let width = costs
        .keys()
        .map(|k| k.chars().count())
        .chain([MIN_REPO_WIDTH])
        .max()
        .unwrap_or(MIN_REPO_WIDTH);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{NO_MARKER}{REPO_HEADER:<width$}  {COST_HEADER:>COST_WIDTH$}"
    );
    let _ = writeln!(out, "{NO_MARKER}{}", "─".repeat(width + 2 + COST_WIDTH));

    for (identity, cost) in costs {
        let marker = if Some(identity.as_str()) == current {
            CURRENT_MARKER
        } else {
            NO_MARKER
        };
        let _ = writeln!(out, "{marker}{identity:<width$}  {cost:>COST_WIDTH$.5}");
    }

    let _ = writeln!(out, "{NO_MARKER}{}", "─".repeat(width + 2 + COST_WIDTH));
    let _ = writeln!(
        out,
        "{NO_MARKER}{TOTAL_LABEL:<width$}  {:>COST_WIDTH$.5}",
        total(costs)
    );
    out
}
