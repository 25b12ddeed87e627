//! Side-by-side view of a submission against the expected answers.
//!
//! The comparison is advisory: teachers still type the score themselves.

use serde::Serialize;

use crate::model::{Submission, TestVariant};

/// One question as the teacher sees it during review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerReview {
    pub question_id: u32,
    pub question: String,
    pub given: Option<String>,
    pub expected: String,
    pub correct: bool,
}

/// Review of a whole submission, in catalog question order.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReview {
    pub student_name: String,
    pub variant_id: String,
    pub answers: Vec<AnswerReview>,
}

impl SubmissionReview {
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.correct).count()
    }

    pub fn total(&self) -> usize {
        self.answers.len()
    }
}

/// Trimmed, case-insensitive match against the expected answer.
pub fn is_correct(given: &str, expected: &str) -> bool {
    given.trim().to_lowercase() == expected.to_lowercase()
}

pub fn review_submission(variant: &TestVariant, submission: &Submission) -> SubmissionReview {
    let answers = variant
        .questions
        .iter()
        .map(|q| {
            let given = submission.answers.get(&q.id).cloned();
            let correct = given
                .as_deref()
                .is_some_and(|g| is_correct(g, &q.answer));
            AnswerReview {
                question_id: q.id,
                question: q.text.clone(),
                given,
                expected: q.answer.clone(),
                correct,
            }
        })
        .collect();

    SubmissionReview {
        student_name: submission.student_name.clone(),
        variant_id: submission.variant_id.clone(),
        answers,
    }
}
