//! Core data model types for classtest.
//!
//! Test variants come from the read-only catalog; submissions are the only
//! records the store mutates.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scores strictly below this value fail and unlock a retake automatically.
pub const PASS_THRESHOLD: i32 = 45;

/// A single free-text question with its expected answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within its variant.
    pub id: u32,
    /// The question shown to the student.
    pub text: String,
    /// Reference answer shown to the teacher during review.
    pub answer: String,
}

/// A named, graded, subject-tagged set of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestVariant {
    /// Unique identifier for this variant.
    pub id: String,
    /// Human-readable name (e.g. "Variant 1").
    pub name: String,
    /// School grade the variant targets.
    pub grade: u32,
    /// Subject (e.g. "Mathematics").
    pub subject: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: String,
    /// Questions in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl TestVariant {
    /// Look up a question by id.
    pub fn question(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// A student's answers to one test variant plus grading metadata.
///
/// Serialized with camelCase keys; `score` and `checkedBy` are omitted when
/// absent so that "ungraded" survives a save/load cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Trimmed name the student logged in with.
    pub student_name: String,
    /// Id of the answered test variant.
    pub variant_id: String,
    /// Answers keyed by question id.
    #[serde(default)]
    pub answers: BTreeMap<u32, String>,
    /// When the student submitted, in UTC.
    pub submitted_at: DateTime<Utc>,
    /// Teacher-assigned score; `None` while pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    /// Name of the teacher who graded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_by: Option<String>,
    /// Set on submit; blocks re-entry until a retake is granted.
    pub is_locked: bool,
    /// Set by a teacher, or automatically when the score fails.
    pub can_retake: bool,
}

impl Submission {
    /// A freshly submitted, locked, ungraded record.
    pub fn new(
        student_name: impl Into<String>,
        variant_id: impl Into<String>,
        answers: BTreeMap<u32, String>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            student_name: student_name.into(),
            variant_id: variant_id.into(),
            answers,
            submitted_at,
            score: None,
            checked_by: None,
            is_locked: true,
            can_retake: false,
        }
    }

    /// Whether this record belongs to the given (student, variant) pair.
    pub fn matches(&self, student_name: &str, variant_id: &str) -> bool {
        self.student_name == student_name && self.variant_id == variant_id
    }

    /// No score assigned yet.
    pub fn is_pending(&self) -> bool {
        self.score.is_none()
    }

    pub fn status(&self) -> SubmissionStatus {
        match self.score {
            None => SubmissionStatus::Pending,
            Some(score) if score < PASS_THRESHOLD => SubmissionStatus::Failed,
            Some(_) => SubmissionStatus::Passed,
        }
    }

    /// Whether the student may enter the test flow for this variant again.
    pub fn may_start(&self) -> bool {
        !(self.is_locked && !self.can_retake)
    }
}

/// Grading state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// Waiting for a teacher.
    Pending,
    /// Scored at or above [`PASS_THRESHOLD`].
    Passed,
    /// Scored below [`PASS_THRESHOLD`].
    Failed,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionStatus::Pending => write!(f, "pending"),
            SubmissionStatus::Passed => write!(f, "passed"),
            SubmissionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Who is using the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Teacher => write!(f, "teacher"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// The logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Trimmed login name.
    pub name: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Submission {
        Submission::new(
            "Anna",
            "v1",
            BTreeMap::from([(1, "4".to_string())]),
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap(),
        )
    }

    #[test]
    fn new_submission_is_locked_and_pending() {
        let sub = sample();
        assert!(sub.is_locked);
        assert!(!sub.can_retake);
        assert!(sub.is_pending());
        assert_eq!(sub.status(), SubmissionStatus::Pending);
        assert!(!sub.may_start());
    }

    #[test]
    fn status_uses_pass_threshold() {
        let mut sub = sample();
        sub.score = Some(44);
        assert_eq!(sub.status(), SubmissionStatus::Failed);
        sub.score = Some(PASS_THRESHOLD);
        assert_eq!(sub.status(), SubmissionStatus::Passed);
    }

    #[test]
    fn may_start_when_retake_granted_or_unlocked() {
        let mut sub = sample();
        sub.can_retake = true;
        assert!(sub.may_start());
        sub.can_retake = false;
        sub.is_locked = false;
        assert!(sub.may_start());
    }

    #[test]
    fn serde_camel_case_keys_and_omitted_grade() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("studentName").is_some());
        assert!(json.get("variantId").is_some());
        assert!(json.get("submittedAt").is_some());
        assert!(json.get("isLocked").is_some());
        assert!(json.get("canRetake").is_some());
        assert!(json.get("score").is_none());
        assert!(json.get("checkedBy").is_none());
        assert_eq!(json["answers"]["1"], "4");
    }

    #[test]
    fn parses_browser_style_record() {
        let raw = r#"{
            "studentName": "Anna",
            "variantId": "v1",
            "answers": {"1": "4", "2": "56"},
            "submittedAt": "2026-03-02T09:30:00.000Z",
            "score": 80,
            "checkedBy": "никитовский",
            "isLocked": true,
            "canRetake": false
        }"#;
        let sub: Submission = serde_json::from_str(raw).unwrap();
        assert_eq!(sub.answers.get(&2).map(String::as_str), Some("56"));
        assert_eq!(sub.score, Some(80));
        assert_eq!(sub.checked_by.as_deref(), Some("никитовский"));
        assert_eq!(sub.submitted_at, sample().submitted_at);
    }

    #[test]
    fn role_display_and_parse() {
        assert_eq!(Role::Teacher.to_string(), "teacher");
        assert_eq!("Student".parse::<Role>().unwrap(), Role::Student);
        assert!("admin".parse::<Role>().is_err());
    }
}
