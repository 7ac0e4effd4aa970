//! Plain-text rendering for terminal output.

use cr_04_verification::{display_date, display_month_year, VerificationOutcome};
use shared_types::{AggregateStatistics, StudentRecord, UserProfile};
use std::fmt::Write;

pub fn records(records: &[StudentRecord]) -> String {
    if records.is_empty() {
        return "No records.\n".to_string();
    }
    let mut out = format!(
        "{:>6}  {:<12} {:<24} {:<28} {:<8} {:<10} {}\n",
        "ID", "STUDENT", "NAME", "DEGREE", "STATUS", "GRADUATED", "CERTIFICATE"
    );
    for r in records {
        let _ = writeln!(
            out,
            "{:>6}  {:<12} {:<24} {:<28} {:<8} {:<10} {}",
            r.id.to_string(),
            clip(&r.student_id, 12),
            clip(&r.student_name, 24),
            clip(&r.degree_name, 28),
            r.status.as_str(),
            display_date(r.graduation_date.as_deref()),
            r.certificate_id().unwrap_or("-"),
        );
    }
    out
}

pub fn statistics(stats: &AggregateStatistics) -> String {
    let counts = &stats.status_counts;
    let mut out = format!(
        "Pending: {}  Queued: {}  Issued: {}  Total: {}\n",
        counts.pending,
        counts.queued,
        counts.issued,
        counts.total()
    );
    for dept in &stats.department_stats {
        let _ = writeln!(
            out,
            "  {:<32} pending {:>4}  queued {:>4}  issued {:>4}",
            clip(&dept.department, 32),
            dept.pending,
            dept.queued,
            dept.issued
        );
    }
    out
}

pub fn verification(outcome: &VerificationOutcome) -> String {
    let Some(details) = outcome.details() else {
        return format!("NOT VERIFIED ({}): {}\n", outcome.cause, outcome.message);
    };
    let mut out = String::from("AUTHENTIC\n");
    let _ = writeln!(out, "  Student:    {}", details.student_name);
    let _ = writeln!(out, "  Degree:     {}", details.degree_name);
    let _ = writeln!(out, "  University: {}", details.university_name);
    let _ = writeln!(
        out,
        "  Graduated:  {}",
        display_month_year(details.graduation_date.as_deref())
    );
    if let Some(id) = &details.certificate_id {
        let _ = writeln!(out, "  Certificate: {id}");
    }
    out
}

pub fn user(profile: &UserProfile) -> String {
    match &profile.email {
        Some(email) => format!("{} <{}> ({})\n", profile.display_name(), email, profile.username),
        None => format!("{} ({})\n", profile.display_name(), profile.username),
    }
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut clipped: String = value.chars().take(width.saturating_sub(1)).collect();
    clipped.push('~');
    clipped
}
