//! Marks page state with per-unit aggregation.

#[cfg(test)]
#[path = "marks_test.rs"]
mod marks_test;

use crate::net::types::MarkRow;

#[derive(Clone, Debug, Default)]
pub struct MarksState {
    pub rows: Vec<MarkRow>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Aggregate of one unit's components.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitTotal {
    pub unit_code: String,
    pub score: f64,
    pub max_score: f64,
}

impl MarksState {
    pub fn set_loaded(&mut self, rows: Vec<MarkRow>) {
        self.rows = rows;
        self.loading = false;
        self.error = None;
    }

    pub fn set_failed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Sum components per unit, preserving first-seen unit order.
    #[must_use]
    pub fn unit_totals(&self) -> Vec<UnitTotal> {
        let mut totals: Vec<UnitTotal> = Vec::new();
        for row in &self.rows {
            if let Some(total) = totals.iter_mut().find(|t| t.unit_code == row.unit_code) {
                total.score += row.score;
                total.max_score += row.max_score;
            } else {
                totals.push(UnitTotal {
                    unit_code: row.unit_code.clone(),
                    score: row.score,
                    max_score: row.max_score,
                });
            }
        }
        totals
    }
}
