//! `reqwest` implementation of the [`Gateway`].

use chrono::Utc;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use receitas_core::constants::{
    GENERATE_PRESCRIPTION_PATH, MEDICATIONS_SEGMENT, PATIENTS_SEGMENT, PRESCRIPTION_FILE_PREFIX,
};
use receitas_core::{
    ClientConfig, CsvExport, EntityKind, ImportSummary, Medication, MedicationId, NewMedication,
    NewPatient, Patient, PatientId, PdfDocument, PrescriptionRequest,
};

use crate::wire::{
    decode, filename_from_disposition, status_failure, CountBody, ExportBody, ImportRequest,
    ListBody, MessageBody,
};
use crate::{ApiError, ApiResult, Gateway};

/// Gateway that talks JSON over HTTP to the prescriptions API.
///
/// No timeout is configured: a slow request resolves whenever the server
/// answers.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    base: String,
    client: Client,
}

impl HttpGateway {
    /// Builds a gateway for the API base in `cfg`.
    pub fn new(cfg: &ClientConfig) -> ApiResult<Self> {
        Self::from_base(cfg.api_base())
    }

    /// Builds a gateway for an explicit API base such as `http://localhost:5001/api`.
    pub fn from_base(api_base: &str) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("receitas/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::NetworkFailure(format!("could not build HTTP client: {e}")))?;

        Ok(Self {
            base: api_base.trim_end_matches('/').to_owned(),
            client,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await.map_err(ApiError::network)?;
        let status = response.status();
        let body = response.bytes().await.map_err(ApiError::network)?;
        tracing::debug!(%status, bytes = body.len(), "api response");
        decode(status, &body)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        self.call(self.client.get(url)).await
    }

    async fn post_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        self.call(self.client.post(url).json(body)).await
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        let url = self.url(path);
        tracing::debug!(%url, "DELETE");
        self.call::<MessageBody>(self.client.delete(url)).await?;
        Ok(())
    }
}

impl Gateway for HttpGateway {
    async fn list_patients(&self) -> ApiResult<Vec<Patient>> {
        let body: ListBody<Patient> = self.get(PATIENTS_SEGMENT).await?;
        Ok(body.data)
    }

    async fn create_patient(&self, patient: &NewPatient) -> ApiResult<()> {
        self.post_json::<_, MessageBody>(PATIENTS_SEGMENT, patient)
            .await?;
        Ok(())
    }

    async fn delete_patient(&self, id: PatientId) -> ApiResult<()> {
        self.delete(&format!("{PATIENTS_SEGMENT}/{id}")).await
    }

    async fn list_medications(&self) -> ApiResult<Vec<Medication>> {
        let body: ListBody<Medication> = self.get(MEDICATIONS_SEGMENT).await?;
        Ok(body.data)
    }

    async fn create_medication(&self, medication: &NewMedication) -> ApiResult<()> {
        self.post_json::<_, MessageBody>(MEDICATIONS_SEGMENT, medication)
            .await?;
        Ok(())
    }

    async fn delete_medication(&self, id: MedicationId) -> ApiResult<()> {
        self.delete(&format!("{MEDICATIONS_SEGMENT}/{id}")).await
    }

    async fn count(&self, kind: EntityKind) -> ApiResult<usize> {
        let body: CountBody = self.get(kind.segment()).await?;
        Ok(body.total())
    }

    async fn export_csv(&self, kind: EntityKind) -> ApiResult<CsvExport> {
        let body: ExportBody = self.get(&format!("{}/export", kind.segment())).await?;
        let filename = receitas_core::format::safe_file_name(&body.filename)
            .unwrap_or_else(|| format!("{}.csv", kind.segment()));
        Ok(CsvExport {
            filename,
            content: body.data,
        })
    }

    async fn import_csv(&self, kind: EntityKind, csv_content: &str) -> ApiResult<ImportSummary> {
        self.post_json(
            &format!("{}/import", kind.segment()),
            &ImportRequest { csv_content },
        )
        .await
    }

    async fn seed_medications(&self) -> ApiResult<String> {
        let url = self.url(&format!("{MEDICATIONS_SEGMENT}/seed"));
        tracing::debug!(%url, "POST");
        let body: MessageBody = self.call(self.client.post(url)).await?;
        Ok(body.message)
    }

    async fn generate_prescription(&self, request: &PrescriptionRequest) -> ApiResult<PdfDocument> {
        let url = self.url(GENERATE_PRESCRIPTION_PATH);
        tracing::debug!(%url, lines = request.lines().len(), "POST");

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(ApiError::network)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await.map_err(ApiError::network)?;
            return Err(match decode::<MessageBody>(status, &body) {
                Err(err) => err,
                // A 4xx/5xx that claims success is still a failure.
                Ok(_) => status_failure(status),
            });
        }

        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(fallback_pdf_name);
        let bytes = response.bytes().await.map_err(ApiError::network)?;

        Ok(PdfDocument {
            filename,
            bytes: bytes.to_vec(),
        })
    }
}

fn fallback_pdf_name() -> String {
    format!(
        "{PRESCRIPTION_FILE_PREFIX}_{}.pdf",
        Utc::now().timestamp_millis()
    )
}
