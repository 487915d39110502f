//! The API gateway seam.
//!
//! One method per REST endpoint. Implementations translate transport and
//! decoding problems into [`ApiError`] and never mutate client state; what to
//! do with a result is the caller's business.

use receitas_core::{
    CsvExport, EntityKind, ImportSummary, Medication, MedicationId, NewMedication, NewPatient,
    Patient, PatientId, PdfDocument, PrescriptionRequest,
};

use crate::ApiResult;

#[allow(async_fn_in_trait)]
pub trait Gateway {
    /// `GET /pacientes`
    async fn list_patients(&self) -> ApiResult<Vec<Patient>>;

    /// `POST /pacientes`
    async fn create_patient(&self, patient: &NewPatient) -> ApiResult<()>;

    /// `DELETE /pacientes/{id}`
    async fn delete_patient(&self, id: PatientId) -> ApiResult<()>;

    /// `GET /medicamentos`
    async fn list_medications(&self) -> ApiResult<Vec<Medication>>;

    /// `POST /medicamentos`
    async fn create_medication(&self, medication: &NewMedication) -> ApiResult<()>;

    /// `DELETE /medicamentos/{id}`
    async fn delete_medication(&self, id: MedicationId) -> ApiResult<()>;

    /// Total reported by the list endpoint of `kind`.
    async fn count(&self, kind: EntityKind) -> ApiResult<usize>;

    /// `GET /{kind}/export`
    async fn export_csv(&self, kind: EntityKind) -> ApiResult<CsvExport>;

    /// `POST /{kind}/import`
    async fn import_csv(&self, kind: EntityKind, csv_content: &str) -> ApiResult<ImportSummary>;

    /// `POST /medicamentos/seed`; returns the server's message.
    async fn seed_medications(&self) -> ApiResult<String>;

    /// `POST /receitas/generate`
    async fn generate_prescription(&self, request: &PrescriptionRequest) -> ApiResult<PdfDocument>;
}
