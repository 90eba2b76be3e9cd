//! Assignment list state, including the caller's submission status.

#[cfg(test)]
#[path = "assignments_test.rs"]
mod assignments_test;

use std::collections::HashMap;

use crate::net::types::{Assignment, AssignmentSubmission};

#[derive(Clone, Debug, Default)]
pub struct AssignmentsState {
    pub items: Vec<Assignment>,
    /// Caller's submissions keyed by assignment id, filled lazily as the
    /// submit dialog opens.
    pub submissions: HashMap<String, AssignmentSubmission>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AssignmentsState {
    pub fn set_loaded(&mut self, items: Vec<Assignment>) {
        self.items = items;
        self.loading = false;
        self.error = None;
    }

    pub fn set_failed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn record_submission(&mut self, submission: AssignmentSubmission) {
        self.submissions
            .insert(submission.assignment_id.clone(), submission);
    }

    #[must_use]
    pub fn has_submitted(&self, assignment_id: &str) -> bool {
        self.submissions.contains_key(assignment_id)
    }
}
