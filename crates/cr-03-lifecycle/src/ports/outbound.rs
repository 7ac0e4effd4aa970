//! Outbound Ports (Driven Ports)
//!
//! What the lifecycle controller needs from the registrar backend. The HTTP
//! adapter lives in `cr-06-backend-gateway`.

use crate::domain::{EmailRequest, GenerationReceipt, ImportReceipt};
use async_trait::async_trait;
use shared_types::{
    AggregateStatistics, CertificateDocument, CertificateStatus, GatewayError, RecordId,
    StudentRecord, Upload,
};

/// Registrar backend (Driven Port).
///
/// Every call is a suspension point; nothing here is retried by the port.
#[async_trait]
pub trait RegistryGateway: Send + Sync {
    /// `GET /students`
    async fn list_records(&self) -> Result<Vec<StudentRecord>, GatewayError>;

    /// `GET /students/status/{STATUS}`
    async fn list_by_status(
        &self,
        status: CertificateStatus,
    ) -> Result<Vec<StudentRecord>, GatewayError>;

    /// `GET /students/statistics`
    async fn statistics(&self) -> Result<AggregateStatistics, GatewayError>;

    /// `POST /students/import` (multipart)
    async fn import_batch(&self, file: Upload) -> Result<ImportReceipt, GatewayError>;

    /// `PATCH /students/{id}/status`
    async fn set_status(&self, id: RecordId, status: CertificateStatus)
        -> Result<(), GatewayError>;

    /// `POST /certificates/generateForStudent/{id}`
    async fn generate(&self, id: RecordId) -> Result<GenerationReceipt, GatewayError>;

    /// `GET /certificates/download/{certificateId}`
    async fn download(&self, certificate_id: &str) -> Result<CertificateDocument, GatewayError>;

    /// `POST /certificates/email/{certificateId}`
    async fn email(&self, certificate_id: &str, request: &EmailRequest)
        -> Result<(), GatewayError>;
}

/// In-memory backend for testing.
///
/// Keeps server-side records, enforces forward-only transitions like a
/// backend guarding against concurrent operators, and can be told to fail
/// the next call of a given operation.
#[cfg(test)]
pub struct MockRegistryGateway {
    records: parking_lot::Mutex<Vec<StudentRecord>>,
    statistics: parking_lot::Mutex<AggregateStatistics>,
    failures: parking_lot::Mutex<std::collections::HashMap<&'static str, GatewayError>>,
    calls: parking_lot::Mutex<std::collections::HashMap<&'static str, usize>>,
    emails: parking_lot::Mutex<Vec<(String, EmailRequest)>>,
    latency: std::time::Duration,
}

#[cfg(test)]
impl MockRegistryGateway {
    pub fn new(records: Vec<StudentRecord>) -> Self {
        Self {
            records: parking_lot::Mutex::new(records),
            statistics: parking_lot::Mutex::new(AggregateStatistics::default()),
            failures: parking_lot::Mutex::new(std::collections::HashMap::new()),
            calls: parking_lot::Mutex::new(std::collections::HashMap::new()),
            emails: parking_lot::Mutex::new(Vec::new()),
            latency: std::time::Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: std::time::Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_statistics(self, statistics: AggregateStatistics) -> Self {
        *self.statistics.lock() = statistics;
        self
    }

    /// Fail the next call to `op` with `err`.
    pub fn fail_next(&self, op: &'static str, err: GatewayError) {
        self.failures.lock().insert(op, err);
    }

    pub fn calls(&self, op: &str) -> usize {
        self.calls.lock().get(op).copied().unwrap_or(0)
    }

    /// Change a record server-side, as another operator would.
    pub fn set_server_status(&self, id: RecordId, status: CertificateStatus) {
        if let Some(r) = self.records.lock().iter_mut().find(|r| r.id == id) {
            r.status = status;
        }
    }

    pub fn server_record(&self, id: RecordId) -> Option<StudentRecord> {
        self.records.lock().iter().find(|r| r.id == id).cloned()
    }

    pub fn push_server_record(&self, record: StudentRecord) {
        self.records.lock().push(record);
    }

    pub fn emails(&self) -> Vec<(String, EmailRequest)> {
        self.emails.lock().clone()
    }

    async fn enter(&self, op: &'static str) -> Result<(), GatewayError> {
        *self.calls.lock().entry(op).or_insert(0) += 1;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match self.failures.lock().remove(op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl RegistryGateway for MockRegistryGateway {
    async fn list_records(&self) -> Result<Vec<StudentRecord>, GatewayError> {
        self.enter("list_records").await?;
        Ok(self.records.lock().clone())
    }

    async fn list_by_status(
        &self,
        status: CertificateStatus,
    ) -> Result<Vec<StudentRecord>, GatewayError> {
        self.enter("list_by_status").await?;
        Ok(self
            .records
            .lock()
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect())
    }

    async fn statistics(&self) -> Result<AggregateStatistics, GatewayError> {
        self.enter("statistics").await?;
        Ok(self.statistics.lock().clone())
    }

    async fn import_batch(&self, file: Upload) -> Result<ImportReceipt, GatewayError> {
        self.enter("import_batch").await?;
        Ok(ImportReceipt {
            message: format!("Imported {}", file.file_name),
            imported: 0,
        })
    }

    async fn set_status(
        &self,
        id: RecordId,
        status: CertificateStatus,
    ) -> Result<(), GatewayError> {
        self.enter("set_status").await?;
        let mut records = self.records.lock();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| GatewayError::NotFound(format!("Student not found: {id}")))?;
        if !record.status.can_advance_to(status) {
            return Err(GatewayError::Conflict(format!(
                "Student {} is {}, cannot move to {}",
                id, record.status, status
            )));
        }
        record.status = status;
        Ok(())
    }

    async fn generate(&self, id: RecordId) -> Result<GenerationReceipt, GatewayError> {
        self.enter("generate").await?;
        let mut records = self.records.lock();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| GatewayError::NotFound(format!("Student not found: {id}")))?;
        if record.status != CertificateStatus::Queued {
            return Err(GatewayError::Rejected {
                status: 400,
                message: "Student is not queued".into(),
            });
        }
        record.status = CertificateStatus::Issued;
        record.certificate_id = Some(format!("CERT-{id}"));
        record.transaction_id = Some(format!("0x{:04x}", id.0));
        Ok(GenerationReceipt {
            success: true,
            certificate_id: record.certificate_id.clone(),
            transaction_id: record.transaction_id.clone(),
            message: Some("Certificate generated successfully".into()),
        })
    }

    async fn download(&self, certificate_id: &str) -> Result<CertificateDocument, GatewayError> {
        self.enter("download").await?;
        Ok(CertificateDocument {
            certificate_id: certificate_id.to_string(),
            file_name: format!("{certificate_id}.pdf"),
            content_type: "application/pdf".into(),
            bytes: b"%PDF-1.4".to_vec(),
        })
    }

    async fn email(
        &self,
        certificate_id: &str,
        request: &EmailRequest,
    ) -> Result<(), GatewayError> {
        self.enter("email").await?;
        self.emails
            .lock()
            .push((certificate_id.to_string(), request.clone()));
        Ok(())
    }
}
