//! `VerificationGateway` over `/certificates/verify`.

use crate::client::{file_part, BackendClient};
use crate::decode;
use async_trait::async_trait;
use cr_04_verification::VerificationGateway;
use reqwest::multipart::Form;
use serde_json::json;
use shared_types::{GatewayError, Upload, VerificationResult};

#[async_trait]
impl VerificationGateway for BackendClient {
    async fn verify_qr(&self, payload: &str) -> Result<VerificationResult, GatewayError> {
        let body = self
            .send(
                self.http
                    .post(self.url("/certificates/verify/qr"))
                    .json(&json!({ "qrData": payload })),
            )
            .await?;
        decode::json::<VerificationResult>(&body).map(VerificationResult::normalized)
    }

    async fn verify_document(&self, file: Upload) -> Result<VerificationResult, GatewayError> {
        let form = Form::new().part("pdf", file_part(file)?);
        let body = self
            .send(self.http.post(self.url("/certificates/verify")).multipart(form))
            .await?;
        decode::json::<VerificationResult>(&body).map(VerificationResult::normalized)
    }
}
