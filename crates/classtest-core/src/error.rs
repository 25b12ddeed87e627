//! Error types for the submission store and the session layer.
//!
//! Catalog and configuration loading report through `anyhow` with file
//! context; these enums cover the operations callers match on.

use thiserror::Error;

use crate::model::Role;

/// Errors raised while reading or writing persisted submissions.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage entry exists but could not be read.
    #[error("failed to read submissions from {location}: {source}")]
    Read {
        /// Where the entry lives (a file path for file storage).
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// The storage entry could not be written.
    #[error("failed to write submissions to {location}: {source}")]
    Write {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// The storage entry holds something other than a submission list.
    #[error("stored submissions at {location} are malformed: {source}")]
    Malformed {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory list could not be encoded.
    #[error("failed to serialize submissions: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised by session actions (login, test selection, submit, grading).
#[derive(Debug, Error)]
pub enum SessionError {
    /// The login name was empty after trimming.
    #[error("name must not be empty")]
    EmptyName,

    /// Teacher login with a name other than the configured credential.
    #[error("invalid teacher name: {0}")]
    InvalidTeacherName(String),

    /// The action needs a logged-in user.
    #[error("no user is logged in")]
    NotLoggedIn,

    /// The logged-in user lacks the role this action needs.
    #[error("this action requires the {required} role")]
    Forbidden { required: Role },

    /// The variant id is not in the catalog.
    #[error("unknown test variant: {0}")]
    UnknownVariant(String),

    /// The student already submitted this variant and has no retake.
    #[error("test '{variant_id}' was already submitted; wait for the teacher to review it")]
    AlreadySubmitted { variant_id: String },

    /// Answering or submitting without a selected test.
    #[error("no test is selected")]
    NoTestSelected,

    /// The question id is not part of the selected variant.
    #[error("question {question_id} does not exist in test '{variant_id}'")]
    UnknownQuestion { variant_id: String, question_id: u32 },

    /// Some questions have no (or only blank) answers.
    #[error("answer all questions before submitting (missing: {})", format_ids(.missing))]
    IncompleteAnswers { missing: Vec<u32> },

    /// Outside school hours while they are enforced.
    #[error("school is closed for students right now")]
    Closed,

    /// Persisting the change failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn format_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
