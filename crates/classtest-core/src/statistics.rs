//! Per-student aggregates for the teacher dashboard.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::Submission;

/// Statistics for a single student across all submissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentStats {
    /// Number of submissions.
    pub total: usize,
    /// Number of graded submissions.
    pub graded: usize,
    /// Mean score over graded submissions, rounded half up; 0 if none graded.
    pub avg_score: i64,
}

/// Headline counts for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub pending: usize,
    pub graded: usize,
    pub students: usize,
}

/// Compute per-student statistics, keyed and ordered by student name.
pub fn student_stats(submissions: &[Submission]) -> BTreeMap<String, StudentStats> {
    let mut sums: BTreeMap<String, (StudentStats, i64)> = BTreeMap::new();
    for sub in submissions {
        let (stats, sum) = sums.entry(sub.student_name.clone()).or_default();
        stats.total += 1;
        if let Some(score) = sub.score {
            stats.graded += 1;
            *sum += i64::from(score);
        }
    }

    sums.into_iter()
        .map(|(name, (mut stats, sum))| {
            if stats.graded > 0 {
                stats.avg_score = round_half_up(sum as f64 / stats.graded as f64);
            }
            (name, stats)
        })
        .collect()
}

pub fn summarize(submissions: &[Submission]) -> DashboardSummary {
    let pending = submissions.iter().filter(|s| s.is_pending()).count();
    let students = submissions
        .iter()
        .map(|s| s.student_name.as_str())
        .collect::<std::collections::HashSet<_>>()
        .len();
    DashboardSummary {
        pending,
        graded: submissions.len() - pending,
        students,
    }
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
