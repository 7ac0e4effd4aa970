//! `RegistryGateway` over `/students` and `/certificates`.

use crate::client::{file_part, BackendClient};
use crate::decode;
use async_trait::async_trait;
use cr_03_lifecycle::{EmailRequest, GenerationReceipt, ImportReceipt, RegistryGateway};
use reqwest::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::Form;
use serde_json::json;
use shared_types::{
    AggregateStatistics, CertificateDocument, CertificateStatus, GatewayError, RecordId,
    StudentRecord, Upload,
};
use tracing::{debug, info};

const PDF: &str = "application/pdf";

#[async_trait]
impl RegistryGateway for BackendClient {
    async fn list_records(&self) -> Result<Vec<StudentRecord>, GatewayError> {
        let body = self.send(self.http.get(self.url("/students"))).await?;
        decode::records(&body)
    }

    async fn list_by_status(
        &self,
        status: CertificateStatus,
    ) -> Result<Vec<StudentRecord>, GatewayError> {
        let path = format!("/students/status/{}", status.as_str());
        let body = self.send(self.http.get(self.url(&path))).await?;
        decode::records(&body)
    }

    async fn statistics(&self) -> Result<AggregateStatistics, GatewayError> {
        let body = self
            .send(self.http.get(self.url("/students/statistics")))
            .await?;
        decode::statistics(&body)
    }

    async fn import_batch(&self, file: Upload) -> Result<ImportReceipt, GatewayError> {
        debug!(file = %file.file_name, bytes = file.len(), "Uploading import batch");
        let form = Form::new().part("file", file_part(file)?);
        let body = self
            .send(self.http.post(self.url("/students/import")).multipart(form))
            .await?;
        let receipt = decode::import_receipt(&body)?;
        info!(imported = receipt.imported, "Import accepted");
        Ok(receipt)
    }

    async fn set_status(
        &self,
        id: RecordId,
        status: CertificateStatus,
    ) -> Result<(), GatewayError> {
        let path = format!("/students/{id}/status");
        self.send(
            self.http
                .patch(self.url(&path))
                .json(&json!({ "status": status.as_str() })),
        )
        .await?;
        Ok(())
    }

    async fn generate(&self, id: RecordId) -> Result<GenerationReceipt, GatewayError> {
        let path = format!("/certificates/generateForStudent/{id}");
        let body = self.send(self.http.post(self.url(&path))).await?;
        decode::json(&body)
    }

    async fn download(&self, certificate_id: &str) -> Result<CertificateDocument, GatewayError> {
        let url = self.url_with_segment("/certificates/download", certificate_id)?;
        let response = self.dispatch(self.http.get(url)).await?;

        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let file_name = header(CONTENT_DISPOSITION)
            .and_then(|h| decode::disposition_filename(&h))
            .unwrap_or_else(|| format!("{certificate_id}.pdf"));
        let content_type = header(CONTENT_TYPE).unwrap_or_else(|| PDF.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        if bytes.is_empty() {
            return Err(GatewayError::Decode(format!(
                "Certificate {certificate_id} downloaded as an empty document"
            )));
        }

        Ok(CertificateDocument {
            certificate_id: certificate_id.to_string(),
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    async fn email(
        &self,
        certificate_id: &str,
        request: &EmailRequest,
    ) -> Result<(), GatewayError> {
        let url = self.url_with_segment("/certificates/email", certificate_id)?;
        self.send(self.http.post(url).json(request)).await?;
        Ok(())
    }
}
