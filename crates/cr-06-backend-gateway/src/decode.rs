//! Response body decoding.
//!
//! The backend is not consistent about envelopes: some deployments wrap
//! payloads in `{"data": ...}`, login and setup wrap the user in
//! `{"user": ...}`. Everything here accepts both shapes.

use cr_03_lifecycle::ImportReceipt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use shared_types::{AggregateStatistics, GatewayError, StudentRecord, UserProfile};

/// Decode any JSON body into `T`.
pub fn json<T: DeserializeOwned>(body: &[u8]) -> Result<T, GatewayError> {
    serde_json::from_slice(body).map_err(|e| GatewayError::Decode(e.to_string()))
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, GatewayError> {
    serde_json::from_value(value).map_err(|e| GatewayError::Decode(e.to_string()))
}

/// Bare array or `{"data": [...]}`.
pub fn records(body: &[u8]) -> Result<Vec<StudentRecord>, GatewayError> {
    match json::<Value>(body)? {
        list @ Value::Array(_) => from_value(list),
        Value::Object(mut map) => match map.remove("data") {
            Some(list @ Value::Array(_)) => from_value(list),
            _ => Err(GatewayError::Decode(
                "expected a list of student records".to_string(),
            )),
        },
        _ => Err(GatewayError::Decode(
            "expected a list of student records".to_string(),
        )),
    }
}

/// Bare object or `{"data": {...}}`. Missing counts are zero.
pub fn statistics(body: &[u8]) -> Result<AggregateStatistics, GatewayError> {
    match json::<Value>(body)? {
        Value::Object(mut map) => match map.remove("data") {
            Some(inner @ Value::Object(_)) => from_value(inner),
            Some(_) | None => from_value(Value::Object(map)),
        },
        _ => Err(GatewayError::Decode(
            "expected a statistics object".to_string(),
        )),
    }
}

/// Bare profile or `{"user": {...}}`.
pub fn user(body: &[u8]) -> Result<UserProfile, GatewayError> {
    match json::<Value>(body)? {
        Value::Object(mut map) => match map.remove("user") {
            Some(inner @ Value::Object(_)) => from_value(inner),
            _ => from_value(Value::Object(map)),
        },
        _ => Err(GatewayError::Decode("expected a user profile".to_string())),
    }
}

#[derive(Deserialize)]
struct ImportBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    students: Option<Vec<Value>>,
}

/// `{"message": "...", "students": [...]}`.
pub fn import_receipt(body: &[u8]) -> Result<ImportReceipt, GatewayError> {
    let parsed: ImportBody = json(body)?;
    let imported = parsed.students.map(|s| s.len()).unwrap_or_default();
    Ok(ImportReceipt {
        message: parsed
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Imported {imported} students")),
        imported,
    })
}

/// File name from a `Content-Disposition` header value.
///
/// Handles `attachment; filename="x.pdf"`, the `form-data; name="filename";
/// filename="x.pdf"` variant, and RFC 5987 `filename*=UTF-8''x.pdf`.
pub fn disposition_filename(header: &str) -> Option<String> {
    let mut plain = None;
    for param in header.split(';').map(str::trim) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let encoded = value.trim();
                let name = encoded
                    .split_once("''")
                    .map(|(_, name)| name)
                    .unwrap_or(encoded);
                let name = name.trim_matches('"');
                if !name.is_empty() {
                    return Some(name.to_string());
                }
            }
            "filename" => {
                let name = value.trim().trim_matches('"');
                if !name.is_empty() {
                    plain = Some(name.to_string());
                }
            }
            _ => {}
        }
    }
    plain
}
