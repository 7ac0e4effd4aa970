//! Mock backend fixtures shared by the integration flows.

#![allow(clippy::expect_used)]

use desk_runtime::{Desk, DeskConfig};
use serde_json::{json, Value};
use shared_types::{LoginCredentials, Upload};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USERNAME: &str = "registrar";
pub const PASSWORD: &str = "s3cret";

/// A mock backend plus a scratch directory for the identity cache.
pub struct Backend {
    pub server: MockServer,
    pub scratch: TempDir,
}

impl Backend {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            scratch: tempfile::tempdir().expect("scratch dir"),
        }
    }

    /// Desk config pointing at this backend with a short delivery grace.
    pub fn config(&self) -> DeskConfig {
        let mut config = DeskConfig::default();
        config.backend.base_url = format!("{}/api", self.server.uri());
        config.lifecycle.delivery_grace_ms = 50;
        config.session.identity_cache_path = self.scratch.path().join("identity.json");
        config
    }

    pub fn desk(&self) -> Desk {
        self.desk_with(self.config())
    }

    pub fn desk_with(&self, config: DeskConfig) -> Desk {
        Desk::new(config).expect("desk config is valid")
    }

    /// A desk already signed in as [`USERNAME`].
    pub async fn signed_in_desk(&self) -> Desk {
        self.mount_login().await;
        let desk = self.desk();
        desk.session()
            .login(&LoginCredentials::new(USERNAME, PASSWORD))
            .await
            .expect("login against mock backend");
        desk
    }

    pub async fn mount_login(&self) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Login successful",
                "user": user_json()
            })))
            .mount(&self.server)
            .await;
    }

    /// Serve `GET /api/students`. `times` limits how often this body is used.
    pub async fn serve_records(&self, records: Value, times: Option<u64>) {
        let mock = Mock::given(method("GET"))
            .and(path("/api/students"))
            .respond_with(ResponseTemplate::new(200).set_body_json(records));
        let mock = match times {
            Some(n) => mock.up_to_n_times(n),
            None => mock,
        };
        mock.mount(&self.server).await;
    }

    /// Requests received for `path` so far.
    pub async fn hits(&self, method_name: &str, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == method_name && r.url.path() == request_path)
            .count()
    }
}

pub fn user_json() -> Value {
    json!({
        "id": 1,
        "username": USERNAME,
        "fullName": "Office Registrar",
        "email": "registrar@example.edu",
        "active": true
    })
}

pub fn record_json(id: u64, status: &str) -> Value {
    let mut record = json!({
        "id": id,
        "studentId": format!("S-{id:03}"),
        "studentName": format!("Student {id}"),
        "degreeName": "BSc Mathematics",
        "universityName": "Analytical University",
        "email": format!("student{id}@example.edu"),
        "graduationDate": "2025-06-15",
        "status": status
    });
    if status == "ISSUED" {
        record["certificateId"] = json!(format!("CERT-{id}"));
        record["transactionId"] = json!(format!("0x{id:04x}"));
    }
    record
}

pub fn spreadsheet(name: &str) -> Upload {
    Upload::new(
        name,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        vec![0x50, 0x4b, 0x03, 0x04, 0x14, 0x00],
    )
}
