//! Interpretation of backend import failures.
//!
//! The backend reports duplicate student ids as one message, either a bare
//! `"Student ID already exists: S-1"` or a batch summary such as
//! `"Errors found in Excel import: Row 2: Student ID already exists: S-1; Row 5: ..."`.

const BATCH_PREFIX: &str = "Errors found in Excel import";

/// Whether a backend message describes rows conflicting with existing data.
pub fn is_conflict_report(message: &str) -> bool {
    message.trim_start().starts_with(BATCH_PREFIX)
        || message.to_ascii_lowercase().contains("already exists")
}

/// Split a conflict report into one line per offending row.
pub fn parse_import_conflicts(message: &str) -> Vec<String> {
    let body = message.trim();
    let body = match body.strip_prefix(BATCH_PREFIX) {
        Some(rest) => rest.trim_start_matches(|c: char| c == ':' || c.is_whitespace()),
        None => body,
    };

    body.split(';')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
