//! The submission store.
//!
//! Holds every submission in memory and mirrors the full list to its
//! [`Storage`] after each mutation. All writes go through [`record`],
//! [`grade`] and [`allow_retake`].
//!
//! [`record`]: SubmissionStore::record
//! [`grade`]: SubmissionStore::grade
//! [`allow_retake`]: SubmissionStore::allow_retake

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{Submission, PASS_THRESHOLD};
use crate::storage::Storage;

/// What to do when the persisted entry cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptStorePolicy {
    /// Log a warning and start from an empty list.
    #[default]
    Reset,
    /// Refuse to load.
    Fail,
}

/// In-memory submission list backed by a durable entry.
#[derive(Debug)]
pub struct SubmissionStore<S: Storage> {
    storage: S,
    submissions: Vec<Submission>,
}

impl<S: Storage> SubmissionStore<S> {
    /// Load with the default [`CorruptStorePolicy::Reset`] policy.
    pub fn load(storage: S) -> Result<Self, StoreError> {
        Self::load_with_policy(storage, CorruptStorePolicy::default())
    }

    /// Load the persisted list. A missing entry yields an empty store.
    pub fn load_with_policy(storage: S, policy: CorruptStorePolicy) -> Result<Self, StoreError> {
        let raw = storage.read().map_err(|source| StoreError::Read {
            location: storage.location(),
            source,
        })?;

        let submissions = match raw {
            None => Vec::new(),
            Some(content) if content.trim().is_empty() => Vec::new(),
            Some(content) => match serde_json::from_str::<Vec<Submission>>(&content) {
                Ok(list) => list,
                Err(source) => match policy {
                    CorruptStorePolicy::Reset => {
                        tracing::warn!(
                            "discarding malformed submissions at {}: {}",
                            storage.location(),
                            source
                        );
                        Vec::new()
                    }
                    CorruptStorePolicy::Fail => {
                        return Err(StoreError::Malformed {
                            location: storage.location(),
                            source,
                        })
                    }
                },
            },
        };

        tracing::debug!(
            "loaded {} submission(s) from {}",
            submissions.len(),
            storage.location()
        );

        Ok(Self {
            storage,
            submissions,
        })
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    /// The record for a (student, variant) pair, if any.
    pub fn find(&self, student_name: &str, variant_id: &str) -> Option<&Submission> {
        self.submissions
            .iter()
            .find(|s| s.matches(student_name, variant_id))
    }

    /// Submissions without a score.
    pub fn pending(&self) -> impl Iterator<Item = &Submission> {
        self.submissions.iter().filter(|s| s.is_pending())
    }

    /// Submissions with a score.
    pub fn graded(&self) -> impl Iterator<Item = &Submission> {
        self.submissions.iter().filter(|s| !s.is_pending())
    }

    pub fn for_student<'a>(&'a self, student_name: &'a str) -> impl Iterator<Item = &'a Submission> {
        self.submissions
            .iter()
            .filter(move |s| s.student_name == student_name)
    }

    /// Insert a submission, replacing any record for the same pair in place.
    pub fn record(&mut self, submission: Submission) -> Result<(), StoreError> {
        match self.position(&submission.student_name, &submission.variant_id) {
            Some(idx) => {
                tracing::info!(
                    student = %submission.student_name,
                    variant = %submission.variant_id,
                    "replacing submission"
                );
                self.submissions[idx] = submission;
            }
            None => {
                tracing::info!(
                    student = %submission.student_name,
                    variant = %submission.variant_id,
                    "recording submission"
                );
                self.submissions.push(submission);
            }
        }
        self.persist()
    }

    /// Score a submission and recompute its retake flag.
    ///
    /// Returns `Ok(false)` without touching anything when no record matches.
    pub fn grade(
        &mut self,
        student_name: &str,
        variant_id: &str,
        score: i32,
        checked_by: &str,
    ) -> Result<bool, StoreError> {
        let Some(idx) = self.position(student_name, variant_id) else {
            tracing::warn!(
                student = %student_name,
                variant = %variant_id,
                "grade ignored: no such submission"
            );
            return Ok(false);
        };

        let submission = &mut self.submissions[idx];
        submission.score = Some(score);
        submission.checked_by = Some(checked_by.to_string());
        submission.can_retake = score < PASS_THRESHOLD;
        tracing::info!(
            student = %student_name,
            variant = %variant_id,
            score,
            checked_by,
            "graded submission"
        );

        self.persist()?;
        Ok(true)
    }

    /// Unlock a submission for another attempt.
    ///
    /// Returns `Ok(false)` without touching anything when no record matches.
    pub fn allow_retake(&mut self, student_name: &str, variant_id: &str) -> Result<bool, StoreError> {
        let Some(idx) = self.position(student_name, variant_id) else {
            tracing::warn!(
                student = %student_name,
                variant = %variant_id,
                "retake ignored: no such submission"
            );
            return Ok(false);
        };

        let submission = &mut self.submissions[idx];
        submission.can_retake = true;
        submission.is_locked = false;
        tracing::info!(student = %student_name, variant = %variant_id, "retake granted");

        self.persist()?;
        Ok(true)
    }

    /// Give back the underlying storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn position(&self, student_name: &str, variant_id: &str) -> Option<usize> {
        self.submissions
            .iter()
            .position(|s| s.matches(student_name, variant_id))
    }

    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.submissions)?;
        self.storage
            .write(&json)
            .map_err(|source| StoreError::Write {
                location: self.storage.location(),
                source,
            })?;
        tracing::debug!(
            "persisted {} submission(s) to {}",
            self.submissions.len(),
            self.storage.location()
        );
        Ok(())
    }
}
