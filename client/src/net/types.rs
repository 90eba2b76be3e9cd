//! Shared wire DTOs for the client/server boundary.
//!
//! DESIGN
//! ======
//! These types mirror the server's JSON responses field-for-field so the
//! REST helpers in `api` can deserialize straight into page state.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Account role, as granted at login.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }

    /// Whether this role may manage unit content (lessons, quizzes, marking).
    #[must_use]
    pub fn is_staff(self) -> bool {
        matches!(self, Self::Teacher | Self::Admin)
    }
}

/// An authenticated user as returned by `/api/auth/me`, login, and refresh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier (UUID string).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Account role.
    pub role: Role,
}

/// `POST /api/auth/login` response body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    /// Access token echo. The authoritative copy travels as an HttpOnly
    /// cookie; the body copy exists for display/debug only.
    pub token: String,
}

/// `POST /api/auth/refresh-token` response body.
///
/// `user` is optional on the wire: a refresh that cannot cheaply join the
/// user row may omit it, in which case the client keeps its previous user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub user: Option<User>,
    pub token: String,
}

/// A unit (course) the user can see.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique unit identifier (UUID string).
    pub id: String,
    /// Short handbook code, e.g. `"COMP1010"`.
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Display name of the unit's teacher, when known.
    #[serde(default)]
    pub teacher_name: Option<String>,
}

/// A lesson within a unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub unit_id: String,
    pub title: String,
    /// Markdown-ish body text.
    #[serde(default)]
    pub content: Option<String>,
    /// Sort order within the unit, ascending.
    pub position: i32,
}

/// A quiz listed on a unit page. Question bodies stay server-side until the
/// student opens the quiz.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: String,
    pub unit_id: String,
    pub title: String,
    pub question_count: i64,
    /// Time limit in minutes, if the quiz is timed.
    #[serde(default)]
    pub duration_mins: Option<i32>,
}

/// An assignment listed on a unit page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub unit_id: String,
    /// Unit handbook code, populated by cross-unit listings.
    #[serde(default)]
    pub unit_code: Option<String>,
    pub title: String,
    #[serde(default)]
    pub instructions: Option<String>,
    /// ISO 8601 due timestamp, if set.
    #[serde(default)]
    pub due_at: Option<String>,
}

/// Everything the unit page needs in one response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitDetail {
    pub unit: Unit,
    pub lessons: Vec<Lesson>,
    pub quizzes: Vec<QuizSummary>,
    pub assignments: Vec<Assignment>,
}

/// The caller's own submission for an assignment, if any.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssignmentSubmission {
    pub id: String,
    pub assignment_id: String,
    #[serde(default)]
    pub body: Option<String>,
    /// Upload referenced by this submission, if a file was attached.
    #[serde(default)]
    pub upload_id: Option<String>,
    pub submitted_at: String,
    #[serde(default)]
    pub mark: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// A direct message between two users.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub recipient_id: String,
    pub body: String,
    pub sent_at: String,
    #[serde(default)]
    pub read_at: Option<String>,
}

/// One marked component for one unit (quiz result, assignment mark, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkRow {
    pub unit_code: String,
    /// Component label, e.g. `"Quiz 1"` or `"Assignment 2"`.
    pub component: String,
    pub score: f64,
    pub max_score: f64,
}

impl MarkRow {
    /// Percentage score, `None` when the component is out of zero.
    #[must_use]
    pub fn percent(&self) -> Option<f64> {
        if self.max_score > 0.0 {
            Some(self.score / self.max_score * 100.0)
        } else {
            None
        }
    }
}
