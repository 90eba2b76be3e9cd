//! Unit list and unit-detail state.

#[cfg(test)]
#[path = "units_test.rs"]
mod units_test;

use crate::net::types::{Unit, UnitDetail};

/// State for the units listing page.
#[derive(Clone, Debug, Default)]
pub struct UnitsState {
    pub items: Vec<Unit>,
    pub loading: bool,
    pub error: Option<String>,
}

impl UnitsState {
    pub fn set_loaded(&mut self, items: Vec<Unit>) {
        self.items = items;
        self.loading = false;
        self.error = None;
    }

    pub fn set_failed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Insert or replace a unit after a create/update round trip.
    pub fn upsert(&mut self, unit: Unit) {
        if let Some(existing) = self.items.iter_mut().find(|u| u.id == unit.id) {
            *existing = unit;
        } else {
            self.items.insert(0, unit);
        }
    }
}

/// State for a single unit's detail page.
#[derive(Clone, Debug, Default)]
pub struct UnitDetailState {
    pub detail: Option<UnitDetail>,
    pub loading: bool,
    pub error: Option<String>,
}

impl UnitDetailState {
    pub fn set_loaded(&mut self, detail: UnitDetail) {
        self.detail = Some(detail);
        self.loading = false;
        self.error = None;
    }

    pub fn set_failed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }
}
