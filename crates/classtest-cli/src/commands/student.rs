//! Student commands: `start`, `submit`, `status`.

use std::path::Path;

use anyhow::Result;
use chrono::{Local, Utc};
use comfy_table::{Cell, Table};
use serde_json::json;

use classtest_core::model::Role;
use classtest_core::schedule::{format_remaining, Availability};
use classtest_core::session::Session;

use super::{local_time, Workspace};

/// Parse `QUESTION_ID=TEXT`.
pub fn parse_answer(s: &str) -> Result<(u32, String), String> {
    let (id, text) = s
        .split_once('=')
        .ok_or_else(|| format!("expected QUESTION_ID=TEXT, got '{s}'"))?;
    let id = id
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid question id: '{}'", id.trim()))?;
    Ok((id, text.to_string()))
}

/// Print the school-hours notice and refuse when enforcement is on.
fn check_hours(ws: &Workspace, session: &Session) -> Result<()> {
    let hours = ws.config.school_hours.hours()?;
    let now = Local::now().time();

    if ws.config.school_hours.enforce {
        session.ensure_open(&hours, now)?;
    }
    match hours.availability(Role::Student, now) {
        Availability::Open {
            until_close: Some(left),
        } => eprintln!("School closes in {}.", format_remaining(left)),
        Availability::Open { until_close: None } => {}
        Availability::Closed => eprintln!("Note: school is open from {hours}."),
    }
    Ok(())
}

pub fn start(config_path: Option<&Path>, student: &str, variant_id: &str) -> Result<()> {
    let ws = Workspace::open(config_path)?;
    let mut session = ws.login(student, Role::Student)?;
    check_hours(&ws, &session)?;

    let variant = session.select_test(&ws.store, &ws.catalog, variant_id)?;
    println!(
        "{} - {} (grade {}), {} questions",
        variant.subject,
        variant.name,
        variant.grade,
        variant.questions.len()
    );
    if !variant.description.is_empty() {
        println!("{}", variant.description);
    }
    if let Some(previous) = ws.store.find(student.trim(), variant_id) {
        println!("Retake: your previous attempt was {}.", previous.status());
    }
    println!();
    for q in &variant.questions {
        println!("  {}. {}", q.id, q.text);
    }

    let answers = variant
        .questions
        .iter()
        .map(|q| format!("--answer {}=...", q.id))
        .collect::<Vec<_>>()
        .join(" ");
    println!(
        "\nSubmit with: classtest submit --student \"{}\" --variant {} {}",
        student.trim(),
        variant.id,
        answers
    );

    Ok(())
}

pub fn submit(
    config_path: Option<&Path>,
    student: &str,
    variant_id: &str,
    answers: Vec<(u32, String)>,
) -> Result<()> {
    let mut ws = Workspace::open(config_path)?;
    let mut session = ws.login(student, Role::Student)?;
    check_hours(&ws, &session)?;

    session.select_test(&ws.store, &ws.catalog, variant_id)?;
    for (question_id, text) in answers {
        session.answer(&ws.catalog, question_id, text)?;
    }
    let submission = session.submit(&mut ws.store, &ws.catalog, Utc::now())?;

    println!(
        "Submitted {} for {}. Wait for the teacher to review it.",
        ws.describe_variant(&submission.variant_id),
        submission.student_name
    );

    Ok(())
}

pub fn status(config_path: Option<&Path>, student: &str, format: &str) -> Result<()> {
    let ws = Workspace::open(config_path)?;
    let session = ws.login(student, Role::Student)?;
    let name = session.user().map(|u| u.name.as_str()).unwrap_or(student);

    let submissions: Vec<_> = ws.store.for_student(name).collect();

    if format == "json" {
        let rows: Vec<_> = submissions
            .iter()
            .map(|s| {
                json!({
                    "variantId": s.variant_id,
                    "submittedAt": s.submitted_at,
                    "status": s.status(),
                    "score": s.score,
                    "canStart": s.may_start(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if submissions.is_empty() {
        println!("{name} has no submissions yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Test", "Submitted", "Status", "Score", "Can start"]);
    for s in &submissions {
        table.add_row(vec![
            Cell::new(ws.describe_variant(&s.variant_id)),
            Cell::new(local_time(&s.submitted_at)),
            Cell::new(s.status()),
            Cell::new(s.score.map(|v| v.to_string()).unwrap_or_else(|| "-".into())),
            Cell::new(if s.may_start() { "yes" } else { "no" }),
        ]);
    }
    println!("{table}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_answer_splits_on_first_equals() {
        assert_eq!(parse_answer("1=4").unwrap(), (1, "4".to_string()));
        assert_eq!(parse_answer(" 2 =a=b").unwrap(), (2, "a=b".to_string()));
        assert_eq!(parse_answer("3=").unwrap(), (3, String::new()));
    }

    #[test]
    fn parse_answer_rejects_bad_input() {
        assert!(parse_answer("no-equals").is_err());
        assert!(parse_answer("x=4").is_err());
        assert!(parse_answer("-1=4").is_err());
    }
}
