//! Teacher commands: `pending`, `graded`, `review`, `grade`, `retake`, `stats`.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};

use classtest_core::model::{Role, Submission, SubmissionStatus};
use classtest_core::review::review_submission;
use classtest_core::session::Session;
use classtest_core::statistics::{student_stats, summarize};

use super::{local_time, Workspace};

fn open_as_teacher(config_path: Option<&Path>, teacher: &str) -> Result<(Workspace, Session)> {
    let ws = Workspace::open(config_path)?;
    let session = ws.login(teacher, Role::Teacher)?;
    Ok((ws, session))
}

pub fn pending(config_path: Option<&Path>, teacher: &str, format: &str) -> Result<()> {
    let (ws, _session) = open_as_teacher(config_path, teacher)?;
    let pending: Vec<&Submission> = ws.store.pending().collect();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&pending)?);
        return Ok(());
    }

    if pending.is_empty() {
        println!("No submissions waiting for review.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Student", "Variant", "Test", "Submitted"]);
    for s in &pending {
        table.add_row(vec![
            Cell::new(&s.student_name),
            Cell::new(&s.variant_id),
            Cell::new(ws.describe_variant(&s.variant_id)),
            Cell::new(local_time(&s.submitted_at)),
        ]);
    }
    println!("{table}");
    println!("{} pending submission(s)", pending.len());

    Ok(())
}

pub fn graded(config_path: Option<&Path>, teacher: &str, format: &str) -> Result<()> {
    let (ws, _session) = open_as_teacher(config_path, teacher)?;
    let graded: Vec<&Submission> = ws.store.graded().collect();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&graded)?);
        return Ok(());
    }

    if graded.is_empty() {
        println!("No graded submissions yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Student",
        "Test",
        "Submitted",
        "Score",
        "Checked by",
        "Retake",
    ]);
    for s in &graded {
        table.add_row(vec![
            Cell::new(&s.student_name),
            Cell::new(ws.describe_variant(&s.variant_id)),
            Cell::new(local_time(&s.submitted_at)),
            Cell::new(s.score.map(|v| v.to_string()).unwrap_or_default()),
            Cell::new(s.checked_by.as_deref().unwrap_or("-")),
            Cell::new(if s.can_retake { "allowed" } else { "-" }),
        ]);
    }
    println!("{table}");

    Ok(())
}

pub fn review(
    config_path: Option<&Path>,
    teacher: &str,
    student: &str,
    variant_id: &str,
    format: &str,
) -> Result<()> {
    let (ws, _session) = open_as_teacher(config_path, teacher)?;
    let student = student.trim();

    let submission = ws
        .store
        .find(student, variant_id)
        .ok_or_else(|| anyhow::anyhow!("no submission from '{student}' for '{variant_id}'"))?;
    let variant = ws.catalog.get(variant_id).ok_or_else(|| {
        anyhow::anyhow!("test variant '{variant_id}' is not in the catalog")
    })?;
    let review = review_submission(variant, submission);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&review)?);
        return Ok(());
    }

    println!(
        "{} - {} (submitted {})",
        submission.student_name,
        super::describe(variant),
        local_time(&submission.submitted_at)
    );
    for (index, answer) in review.answers.iter().enumerate() {
        let mark = if answer.correct { "correct" } else { "check" };
        println!("\n{}. {}", index + 1, answer.question);
        println!(
            "   answer:   {}",
            answer.given.as_deref().unwrap_or("(none)")
        );
        println!("   expected: {}  [{mark}]", answer.expected);
    }
    println!(
        "\n{}/{} answers match the key.",
        review.correct_count(),
        review.total()
    );
    if let Some(score) = submission.score {
        println!("Current score: {score}");
    }

    Ok(())
}

pub fn grade(
    config_path: Option<&Path>,
    teacher: &str,
    student: &str,
    variant_id: &str,
    score: i32,
) -> Result<()> {
    let (mut ws, session) = open_as_teacher(config_path, teacher)?;
    let student = student.trim();

    if !session.grade(&mut ws.store, student, variant_id, score)? {
        println!("No submission from '{student}' for '{variant_id}'; nothing graded.");
        return Ok(());
    }

    if let Some(s) = ws.store.find(student, variant_id) {
        let outcome = match s.status() {
            SubmissionStatus::Failed => "failed, retake allowed",
            _ => "passed",
        };
        println!("Graded {student} / {variant_id}: {score} ({outcome})");
    }

    Ok(())
}

pub fn retake(
    config_path: Option<&Path>,
    teacher: &str,
    student: &str,
    variant_id: &str,
) -> Result<()> {
    let (mut ws, session) = open_as_teacher(config_path, teacher)?;
    let student = student.trim();

    if session.allow_retake(&mut ws.store, student, variant_id)? {
        println!("Retake allowed for {student} / {variant_id}.");
    } else {
        println!("No submission from '{student}' for '{variant_id}'; nothing changed.");
    }

    Ok(())
}

pub fn stats(config_path: Option<&Path>, teacher: &str, format: &str) -> Result<()> {
    let (ws, _session) = open_as_teacher(config_path, teacher)?;
    let summary = summarize(ws.store.submissions());
    let per_student = student_stats(ws.store.submissions());

    if format == "json" {
        let out = serde_json::json!({
            "summary": summary,
            "students": per_student,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "Pending: {}  Graded: {}  Students: {}",
        summary.pending, summary.graded, summary.students
    );
    if per_student.is_empty() {
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Student", "Submissions", "Graded", "Average"]);
    for (name, s) in &per_student {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(s.total),
            Cell::new(s.graded),
            Cell::new(if s.graded > 0 {
                s.avg_score.to_string()
            } else {
                "-".to_string()
            }),
        ]);
    }
    println!("{table}");

    Ok(())
}
