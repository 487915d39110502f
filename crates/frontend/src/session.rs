//! The session controller.
//!
//! A [`Session`] owns all client state: the reference cache, the prescription
//! draft, the notices, the active tab, the selected patient and the last
//! statistics. Each public handler is one user action. Handlers never return
//! errors: a failure becomes a danger notice and the handler reports `false`
//! or `None`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{Local, NaiveDate};
use receitas_api_client::Gateway;
use receitas_core::render::{render_list_refs, render_notices};
use receitas_core::{
    ClientConfig, DraftBuilder, EntityKind, ImportSummary, MedicationForm, MedicationId, Notice,
    Notifier, Patient, PatientForm, PatientId, PrescriptionForm, ReferenceCache, Statistics, Tab,
    TabRefresh, ValidationError,
};

use crate::downloads::{open_with_system, DownloadDir};
use crate::error::{ActionError, ActionResult};
use crate::view::{render_tab, View};

pub struct Session<G: Gateway> {
    gateway: G,
    cache: ReferenceCache,
    draft: DraftBuilder,
    notifier: Notifier,
    downloads: DownloadDir,
    tab: Tab,
    selected_patient: Option<PatientId>,
    statistics: Option<Statistics>,
}

impl<G: Gateway> Session<G> {
    pub fn new(gateway: G, config: &ClientConfig) -> Self {
        Self {
            gateway,
            cache: ReferenceCache::new(),
            draft: DraftBuilder::new(),
            notifier: Notifier::new(config.notice_ttl()),
            downloads: DownloadDir::new(config.download_dir()),
            tab: Tab::default(),
            selected_patient: None,
            statistics: None,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn cache(&self) -> &ReferenceCache {
        &self.cache
    }

    pub fn draft(&self) -> &DraftBuilder {
        &self.draft
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn statistics(&self) -> Option<&Statistics> {
        self.statistics.as_ref()
    }

    pub fn downloads(&self) -> &DownloadDir {
        &self.downloads
    }

    pub fn selected_patient(&self) -> Option<&Patient> {
        self.selected_patient.and_then(|id| self.cache.patient(id))
    }

    /// Removes and returns every pending notice, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notifier.drain()
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notifier.last()
    }

    /// Loads both reference lists and the statistics.
    ///
    /// Returns `true` when both lists loaded.
    pub async fn start(&mut self) -> bool {
        let patients = self.reload(EntityKind::Patient).await;
        let medications = self.reload(EntityKind::Medication).await;
        self.refresh_statistics().await;
        patients && medications
    }

    /// Makes `tab` active and runs its refresh action.
    pub async fn activate_tab(&mut self, tab: Tab) -> bool {
        tracing::debug!(%tab, "tab activated");
        self.tab = tab;
        match tab.refresh() {
            TabRefresh::Reload(kind) => self.reload(kind).await,
            // selectors are rebuilt from the cache on the next render
            TabRefresh::Selectors => true,
            TabRefresh::Statistics => {
                self.refresh_statistics().await;
                true
            }
        }
    }

    /// Fetches one reference list and replaces the cached copy.
    ///
    /// On failure the cached list is left as it was.
    pub async fn reload(&mut self, kind: EntityKind) -> bool {
        let loaded = match kind {
            EntityKind::Patient => self.gateway.list_patients().await.map(|list| {
                let count = list.len();
                self.cache.replace_patients(list);
                count
            }),
            EntityKind::Medication => self.gateway.list_medications().await.map(|list| {
                let count = list.len();
                self.cache.replace_medications(list);
                count
            }),
        };

        match loaded {
            Ok(count) => {
                tracing::info!(%kind, count, "reference list reloaded");
                true
            }
            Err(err) => {
                self.notifier.danger(format!("Error loading {kind}: {err}"));
                false
            }
        }
    }

    pub async fn register_patient(&mut self, form: PatientForm) -> bool {
        let result = self.try_register_patient(form).await;
        if self.settle("Error registering patient", result).is_none() {
            return false;
        }
        self.notifier.success("Patient registered");
        self.reload(EntityKind::Patient).await;
        true
    }

    async fn try_register_patient(&self, form: PatientForm) -> ActionResult<()> {
        let patient = form.into_new_patient()?;
        self.gateway.create_patient(&patient).await?;
        tracing::info!(name = %patient.full_name, "patient registered");
        Ok(())
    }

    pub async fn delete_patient(&mut self, id: PatientId) -> bool {
        let result = self.gateway.delete_patient(id).await.map_err(ActionError::from);
        if self.settle("Error deleting patient", result).is_none() {
            return false;
        }
        if self.selected_patient == Some(id) {
            self.selected_patient = None;
        }
        tracing::info!(%id, "patient deleted");
        self.notifier.success("Patient deleted");
        self.reload(EntityKind::Patient).await;
        true
    }

    pub async fn register_medication(&mut self, form: MedicationForm) -> bool {
        let result = self.try_register_medication(form).await;
        if self.settle("Error registering medication", result).is_none() {
            return false;
        }
        self.notifier.success("Medication registered");
        self.reload(EntityKind::Medication).await;
        true
    }

    async fn try_register_medication(&self, form: MedicationForm) -> ActionResult<()> {
        let medication = form.into_new_medication()?;
        self.gateway.create_medication(&medication).await?;
        tracing::info!(name = %medication.generic_name, "medication registered");
        Ok(())
    }

    /// Deletes a medication on the server. Draft lines that reference it are kept.
    pub async fn delete_medication(&mut self, id: MedicationId) -> bool {
        let result = self
            .gateway
            .delete_medication(id)
            .await
            .map_err(ActionError::from);
        if self.settle("Error deleting medication", result).is_none() {
            return false;
        }
        tracing::info!(%id, "medication deleted");
        self.notifier.success("Medication deleted");
        self.reload(EntityKind::Medication).await;
        true
    }

    /// Marks a cached patient as the one the next prescription is for.
    pub fn select_patient(&mut self, id: PatientId) -> bool {
        let result = match self.cache.patient(id) {
            Some(_) => Ok(()),
            None => Err(ActionError::NotLoaded {
                kind: EntityKind::Patient,
                id: id.0,
            }),
        };
        if self.settle("Error selecting patient", result).is_none() {
            return false;
        }
        self.selected_patient = Some(id);
        tracing::debug!(%id, "patient selected");
        true
    }

    /// Filters the cached list of `kind` by name and renders the matches.
    pub fn search(&self, kind: EntityKind, term: &str) -> String {
        match kind {
            EntityKind::Patient => render_list_refs(&self.cache.search_patients(term)),
            EntityKind::Medication => render_list_refs(&self.cache.search_medications(term)),
        }
    }

    /// Downloads the server's CSV export of `kind` into the download directory.
    pub async fn export_csv(&mut self, kind: EntityKind) -> Option<PathBuf> {
        let result = self.try_export_csv(kind).await;
        let path = self.settle("Error exporting CSV", result)?;
        self.notifier
            .success(format!("CSV file exported to {}", path.display()));
        Some(path)
    }

    async fn try_export_csv(&self, kind: EntityKind) -> ActionResult<PathBuf> {
        let export = self.gateway.export_csv(kind).await?;
        self.downloads.save(&export.filename, export.content.as_bytes())
    }

    /// Sends a local CSV file to the import endpoint of `kind`.
    pub async fn import_csv(&mut self, kind: EntityKind, path: &Path) -> Option<ImportSummary> {
        let result = self.try_import_csv(kind, path).await;
        let summary = self.settle("Error importing CSV", result)?;

        if summary.message.trim().is_empty() {
            self.notifier.success("Import finished");
        } else {
            self.notifier.success(summary.message.clone());
        }
        if let Some(duplicated) = summary.duplicated.filter(|n| *n > 0) {
            self.notifier
                .info(format!("{duplicated} duplicated rows were skipped"));
        }
        for row_error in &summary.errors {
            self.notifier.danger(row_error.clone());
        }

        self.reload(kind).await;
        Some(summary)
    }

    async fn try_import_csv(&self, kind: EntityKind, path: &Path) -> ActionResult<ImportSummary> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ActionError::io(format!("cannot read {}", path.display()), e))?;
        if content.trim().is_empty() {
            return Err(ValidationError::MissingField("CSV content").into());
        }
        let summary = self.gateway.import_csv(kind, &content).await?;
        tracing::info!(%kind, imported = ?summary.imported, "csv imported");
        Ok(summary)
    }

    /// Asks the server to add its sample medications.
    pub async fn seed_medications(&mut self) -> bool {
        let result = self
            .gateway
            .seed_medications()
            .await
            .map_err(ActionError::from);
        let Some(message) = self.settle("Error seeding medications", result) else {
            return false;
        };
        if message.trim().is_empty() {
            self.notifier.success("Sample medications added");
        } else {
            self.notifier.success(message);
        }
        self.reload(EntityKind::Medication).await;
        true
    }

    /// Adds a line item from the raw values of the medication, dosage and
    /// instructions fields.
    pub fn add_line_item(&mut self, medication_id: &str, dosage: &str, instructions: &str) -> bool {
        let result = parse_medication_id(medication_id).and_then(|id| {
            self.draft
                .add(&self.cache, id, dosage, instructions)
                .map(|item| tracing::debug!(id = %item.medication_id(), "line item added"))
                .map_err(ActionError::from)
        });
        self.settle("Error adding medication", result).is_some()
    }

    pub fn remove_line_item(&mut self, index: usize) -> bool {
        let result = self.draft.remove(index).map_err(ActionError::from);
        self.settle("Error removing medication", result).is_some()
    }

    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    /// Prescription form pre-filled with the selected patient and `today`.
    pub fn prescription_form(&self, today: NaiveDate) -> PrescriptionForm {
        PrescriptionForm {
            patient_id: self
                .selected_patient
                .map(|id| id.to_string())
                .unwrap_or_default(),
            start_date: today.format("%Y-%m-%d").to_string(),
            ..PrescriptionForm::default()
        }
    }

    /// Submits the draft and saves the returned PDF.
    ///
    /// The draft is cleared only once the PDF has been saved.
    pub async fn generate_prescription(&mut self, form: &PrescriptionForm) -> Option<PathBuf> {
        let result = self.try_generate_prescription(form).await;
        let path = self.settle("Error generating prescription", result)?;
        self.draft.clear();
        self.notifier
            .success(format!("Prescription generated: {}", path.display()));
        Some(path)
    }

    /// Hands a saved file to the system viewer so it can be printed.
    pub fn open_download(&mut self, path: &Path) -> bool {
        let result = open_with_system(path);
        self.settle("Error opening file", result).is_some()
    }

    async fn try_generate_prescription(&self, form: &PrescriptionForm) -> ActionResult<PathBuf> {
        let request = self.draft.to_request(
            &form.patient_id,
            &form.start_date,
            form.repeat_count,
            &form.notes,
        )?;
        let pdf = self.gateway.generate_prescription(&request).await?;
        tracing::info!(
            patient = %request.patient_id(),
            lines = request.lines().len(),
            "prescription generated"
        );
        self.downloads.save(&pdf.filename, &pdf.bytes)
    }

    /// Fetches both totals concurrently. A failed total is recorded as `None`.
    pub async fn refresh_statistics(&mut self) -> Statistics {
        let (patients, medications) = tokio::join!(
            self.gateway.count(EntityKind::Patient),
            self.gateway.count(EntityKind::Medication)
        );

        let stats = Statistics {
            patients: patients
                .map_err(|err| tracing::warn!(%err, "patient count failed"))
                .ok(),
            medications: medications
                .map_err(|err| tracing::warn!(%err, "medication count failed"))
                .ok(),
            refreshed_at: Local::now(),
        };
        self.statistics = Some(stats.clone());
        stats
    }

    /// Exports both kinds. Returns the saved paths when both succeeded.
    pub async fn export_all(&mut self) -> Option<Vec<PathBuf>> {
        self.notifier.info("Exporting data...");
        let mut saved = Vec::new();
        for kind in EntityKind::ALL {
            if let Some(path) = self.export_csv(kind).await {
                saved.push(path);
            }
        }
        if saved.len() == EntityKind::ALL.len() {
            self.notifier.success("All data exported");
            Some(saved)
        } else {
            self.notifier.danger("Error exporting data");
            None
        }
    }

    /// Renders the active tab with the notices that are still alive.
    pub fn view(&mut self) -> View {
        let notices = render_notices(self.notifier.active(Instant::now()));
        View {
            tab: self.tab,
            notices,
            body: render_tab(
                self.tab,
                &self.cache,
                &self.draft,
                self.statistics.as_ref(),
            ),
        }
    }

    fn settle<T>(&mut self, context: &str, result: ActionResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) if err.is_input() => {
                self.notifier.danger(capitalise(&err.to_string()));
                None
            }
            Err(err) => {
                self.notifier.danger(format!("{context}: {err}"));
                None
            }
        }
    }
}

fn parse_medication_id(raw: &str) -> ActionResult<MedicationId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingMedication.into());
    }
    raw.parse()
        .map_err(|_| ValidationError::InvalidMedication(raw.to_owned()).into())
}

fn capitalise(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use receitas_api_client::{ApiError, ApiResult};
    use receitas_core::{
        CsvExport, Medication, NewMedication, NewPatient, NoticeLevel, PdfDocument,
        PrescriptionRequest,
    };
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeGateway {
        patients: Mutex<Vec<Patient>>,
        medications: Mutex<Vec<Medication>>,
        offline: AtomicBool,
        medication_count_fails: AtomicBool,
        created_patients: Mutex<Vec<NewPatient>>,
        generated: Mutex<Vec<PrescriptionRequest>>,
        generate_error: Mutex<Option<ApiError>>,
        imported: Mutex<Vec<String>>,
    }

    impl FakeGateway {
        fn check(&self) -> ApiResult<()> {
            if self.offline.load(Ordering::SeqCst) {
                Err(ApiError::NetworkFailure("could not connect".into()))
            } else {
                Ok(())
            }
        }
    }

    impl Gateway for FakeGateway {
        async fn list_patients(&self) -> ApiResult<Vec<Patient>> {
            self.check()?;
            Ok(self.patients.lock().unwrap().clone())
        }

        async fn create_patient(&self, patient: &NewPatient) -> ApiResult<()> {
            self.check()?;
            let mut patients = self.patients.lock().unwrap();
            let id = patients.len() as i64 + 1;
            patients.push(patient_named(id, patient.full_name.as_str()));
            self.created_patients.lock().unwrap().push(patient.clone());
            Ok(())
        }

        async fn delete_patient(&self, id: PatientId) -> ApiResult<()> {
            self.check()?;
            let mut patients = self.patients.lock().unwrap();
            let before = patients.len();
            patients.retain(|p| p.id != id);
            if patients.len() == before {
                return Err(ApiError::ApiFailure("Patient not found".into()));
            }
            Ok(())
        }

        async fn list_medications(&self) -> ApiResult<Vec<Medication>> {
            self.check()?;
            Ok(self.medications.lock().unwrap().clone())
        }

        async fn create_medication(&self, medication: &NewMedication) -> ApiResult<()> {
            self.check()?;
            let mut medications = self.medications.lock().unwrap();
            let id = medications.len() as i64 + 1;
            medications.push(medication_named(id, medication.generic_name.as_str()));
            Ok(())
        }

        async fn delete_medication(&self, id: MedicationId) -> ApiResult<()> {
            self.check()?;
            self.medications.lock().unwrap().retain(|m| m.id != id);
            Ok(())
        }

        async fn count(&self, kind: EntityKind) -> ApiResult<usize> {
            self.check()?;
            match kind {
                EntityKind::Patient => Ok(self.patients.lock().unwrap().len()),
                EntityKind::Medication if self.medication_count_fails.load(Ordering::SeqCst) => {
                    Err(ApiError::ApiFailure("boom".into()))
                }
                EntityKind::Medication => Ok(self.medications.lock().unwrap().len()),
            }
        }

        async fn export_csv(&self, kind: EntityKind) -> ApiResult<CsvExport> {
            self.check()?;
            Ok(CsvExport {
                filename: format!("{}_20240101.csv", kind.segment()),
                content: "id,name\n1,x\n".into(),
            })
        }

        async fn import_csv(&self, _kind: EntityKind, csv_content: &str) -> ApiResult<ImportSummary> {
            self.check()?;
            self.imported.lock().unwrap().push(csv_content.to_owned());
            Ok(ImportSummary {
                message: "Import finished: 1 imported".into(),
                imported: Some(1),
                duplicated: Some(2),
                errors: vec!["Row 4: name is required".into()],
            })
        }

        async fn seed_medications(&self) -> ApiResult<String> {
            self.check()?;
            let mut medications = self.medications.lock().unwrap();
            medications.push(medication_named(90, "Dipirona"));
            medications.push(medication_named(91, "Paracetamol"));
            Ok("2 medications added".into())
        }

        async fn generate_prescription(&self, request: &PrescriptionRequest) -> ApiResult<PdfDocument> {
            self.check()?;
            if let Some(err) = self.generate_error.lock().unwrap().clone() {
                return Err(err);
            }
            self.generated.lock().unwrap().push(request.clone());
            Ok(PdfDocument {
                filename: "receita_test.pdf".into(),
                bytes: b"%PDF-1.4".to_vec(),
            })
        }
    }

    fn patient_named(id: i64, name: &str) -> Patient {
        Patient {
            id: PatientId(id),
            full_name: name.into(),
            national_id: None,
            birth_date: None,
            created_at: None,
        }
    }

    fn medication_named(id: i64, name: &str) -> Medication {
        Medication {
            id: MedicationId(id),
            generic_name: name.into(),
            concentration: None,
            presentation: None,
            created_at: None,
        }
    }

    fn session_with(gateway: FakeGateway) -> (Session<FakeGateway>, TempDir) {
        let dir = TempDir::new().expect("create temp dir");
        let config = ClientConfig::new(
            "http://localhost:5001/api",
            dir.path().to_path_buf(),
            Duration::from_secs(5),
        )
        .expect("valid config");
        (Session::new(gateway, &config), dir)
    }

    fn seeded_gateway() -> FakeGateway {
        let gateway = FakeGateway::default();
        *gateway.patients.lock().unwrap() = vec![
            patient_named(1, "Ana"),
            patient_named(2, "Bruno"),
            patient_named(3, "Carla"),
        ];
        *gateway.medications.lock().unwrap() =
            vec![medication_named(10, "Amoxicilina"), medication_named(11, "Losartana")];
        gateway
    }

    fn form(patient_id: &str) -> PrescriptionForm {
        PrescriptionForm {
            patient_id: patient_id.into(),
            start_date: "2024-05-01".into(),
            repeat_count: 2,
            notes: "take with water".into(),
        }
    }

    #[tokio::test]
    async fn start_loads_lists_and_statistics() {
        let (mut session, _dir) = session_with(seeded_gateway());

        assert!(session.start().await);

        assert_eq!(session.cache().patients().len(), 3);
        assert_eq!(session.cache().medications().len(), 2);
        let stats = session.statistics().expect("statistics loaded");
        assert_eq!((stats.patients, stats.medications), (Some(3), Some(2)));
    }

    #[tokio::test]
    async fn downloads_go_to_the_configured_directory() {
        let (session, dir) = session_with(FakeGateway::default());
        assert_eq!(session.downloads().path(), dir.path());
    }

    #[tokio::test]
    async fn opening_a_missing_download_becomes_a_notice() {
        let (mut session, dir) = session_with(FakeGateway::default());

        assert!(!session.open_download(&dir.path().join("missing.pdf")));

        let notice = session.last_notice().expect("failure reported");
        assert_eq!(notice.level, NoticeLevel::Danger);
        assert!(notice.message.starts_with("Error opening file: cannot open"));
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_list() {
        let (mut session, _dir) = session_with(seeded_gateway());
        assert!(session.reload(EntityKind::Patient).await);

        session.gateway().offline.store(true, Ordering::SeqCst);
        assert!(!session.activate_tab(Tab::Patients).await);

        assert_eq!(session.cache().patients().len(), 3);
        let notice = session.last_notice().expect("failure reported");
        assert_eq!(notice.level, NoticeLevel::Danger);
        assert!(notice.message.contains("connection error"));
    }

    #[tokio::test]
    async fn register_patient_requires_a_name() {
        let (mut session, _dir) = session_with(FakeGateway::default());

        let ok = session.register_patient(PatientForm::default()).await;

        assert!(!ok);
        assert!(session.gateway().created_patients.lock().unwrap().is_empty());
        assert_eq!(session.last_notice().unwrap().message, "Name is required");
    }

    #[tokio::test]
    async fn register_patient_reloads_the_list() {
        let (mut session, _dir) = session_with(FakeGateway::default());

        let ok = session
            .register_patient(PatientForm {
                full_name: "Ana Souza".into(),
                national_id: "123.456.789-09".into(),
                birth_date: String::new(),
            })
            .await;

        assert!(ok);
        assert_eq!(session.cache().patients()[0].full_name, "Ana Souza");
        let created = session.gateway().created_patients.lock().unwrap();
        assert_eq!(created[0].national_id.as_ref().unwrap().as_str(), "12345678909");
    }

    #[tokio::test]
    async fn deleting_the_selected_patient_clears_selection() {
        let (mut session, _dir) = session_with(seeded_gateway());
        session.start().await;
        assert!(session.select_patient(PatientId(2)));
        assert_eq!(session.selected_patient().unwrap().full_name, "Bruno");

        assert!(session.delete_patient(PatientId(2)).await);

        assert!(session.selected_patient().is_none());
        assert_eq!(session.cache().patients().len(), 2);
    }

    #[tokio::test]
    async fn delete_failure_is_reported_with_server_message() {
        let (mut session, _dir) = session_with(seeded_gateway());

        assert!(!session.delete_patient(PatientId(42)).await);
        assert_eq!(
            session.last_notice().unwrap().message,
            "Error deleting patient: Patient not found"
        );
    }

    #[tokio::test]
    async fn selecting_an_unknown_patient_fails() {
        let (mut session, _dir) = session_with(seeded_gateway());
        session.start().await;

        assert!(!session.select_patient(PatientId(99)));
        assert_eq!(session.last_notice().unwrap().message, "Patient 99 is not loaded");
    }

    #[tokio::test]
    async fn search_filters_cached_patients() {
        let (mut session, _dir) = session_with(seeded_gateway());
        session.start().await;

        let html = session.search(EntityKind::Patient, "br");

        assert!(html.contains("Bruno"));
        assert!(!html.contains("Carla"));
        assert!(session.search(EntityKind::Patient, "zzz").contains("No patients found"));
    }

    #[tokio::test]
    async fn line_item_errors_become_notices() {
        let (mut session, _dir) = session_with(seeded_gateway());
        session.start().await;

        assert!(!session.add_line_item("", "1x/day", ""));
        assert_eq!(session.last_notice().unwrap().message, "Select a medication");

        assert!(!session.add_line_item("77", "", ""));
        assert_eq!(session.last_notice().unwrap().message, "Medication 77 not found");

        assert!(session.add_line_item("10", "1x/day", ""));
        assert!(!session.add_line_item("10", "2x/day", ""));
        assert_eq!(
            session.last_notice().unwrap().message,
            "Medication 10 has already been added"
        );
        assert_eq!(session.draft().len(), 1);

        assert!(!session.remove_line_item(3));
        assert!(session.remove_line_item(0));
        assert!(session.draft().is_empty());
    }

    #[tokio::test]
    async fn generate_sends_ordered_lines_saves_pdf_and_clears_draft() {
        let (mut session, dir) = session_with(seeded_gateway());
        session.start().await;
        assert!(session.add_line_item("11", "1x/day", "morning"));
        assert!(session.add_line_item("10", "every 8 hours", ""));

        let path = session
            .generate_prescription(&form("1"))
            .await
            .expect("prescription generated");

        assert_eq!(path, dir.path().join("receita_test.pdf"));
        assert!(path.exists());
        assert!(session.draft().is_empty());

        let generated = session.gateway().generated.lock().unwrap();
        let ids: Vec<_> = generated[0].lines().iter().map(|l| l.medication_id()).collect();
        assert_eq!(ids, vec![MedicationId(11), MedicationId(10)]);
        assert_eq!(generated[0].repeat_count(), 2);
    }

    #[tokio::test]
    async fn generate_failure_keeps_the_draft() {
        let gateway = seeded_gateway();
        *gateway.generate_error.lock().unwrap() =
            Some(ApiError::ApiFailure("Patient not found".into()));
        let (mut session, _dir) = session_with(gateway);
        session.start().await;
        session.add_line_item("10", "1x/day", "");

        assert!(session.generate_prescription(&form("1")).await.is_none());

        assert_eq!(session.draft().len(), 1);
        assert_eq!(
            session.last_notice().unwrap().message,
            "Error generating prescription: Patient not found"
        );
    }

    #[tokio::test]
    async fn generate_validates_before_calling_the_server() {
        let (mut session, _dir) = session_with(seeded_gateway());
        session.start().await;

        assert!(session.generate_prescription(&form("")).await.is_none());
        assert_eq!(session.last_notice().unwrap().message, "Select a patient");

        assert!(session.generate_prescription(&form("1")).await.is_none());
        assert_eq!(
            session.last_notice().unwrap().message,
            "Add at least one medication"
        );
        assert!(session.gateway().generated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn prescription_form_uses_selection_and_today() {
        let (mut session, _dir) = session_with(seeded_gateway());
        session.start().await;
        session.select_patient(PatientId(3));

        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let form = session.prescription_form(today);

        assert_eq!(form.patient_id, "3");
        assert_eq!(form.start_date, "2024-06-30");
        assert_eq!(form.repeat_count, 1);
    }

    #[tokio::test]
    async fn statistics_record_a_failed_total_as_missing() {
        let gateway = seeded_gateway();
        gateway.medication_count_fails.store(true, Ordering::SeqCst);
        let (mut session, _dir) = session_with(gateway);

        let stats = session.refresh_statistics().await;

        assert_eq!(stats.patients, Some(3));
        assert_eq!(stats.medications, None);
        session.activate_tab(Tab::Backup).await;
        assert!(session.view().body.contains("Registered medications:</strong> 0"));
    }

    #[tokio::test]
    async fn import_reports_summary_and_reloads() {
        let (mut session, dir) = session_with(seeded_gateway());
        let csv = dir.path().join("in.csv");
        std::fs::write(&csv, "nome_completo\nDaniel\n").expect("write csv");

        let summary = session
            .import_csv(EntityKind::Patient, &csv)
            .await
            .expect("import succeeded");

        assert_eq!(summary.imported, Some(1));
        assert_eq!(
            session.gateway().imported.lock().unwrap()[0],
            "nome_completo\nDaniel\n"
        );
        let notices = session.take_notices();
        let messages: Vec<_> = notices.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Import finished: 1 imported",
                "2 duplicated rows were skipped",
                "Row 4: name is required"
            ]
        );
        assert_eq!(session.cache().patients().len(), 3);
    }

    #[tokio::test]
    async fn import_rejects_missing_and_empty_files() {
        let (mut session, dir) = session_with(seeded_gateway());
        let empty = dir.path().join("empty.csv");
        std::fs::write(&empty, "  \n").expect("write csv");

        assert!(session.import_csv(EntityKind::Patient, &empty).await.is_none());
        assert_eq!(session.last_notice().unwrap().message, "CSV content is required");

        let missing = dir.path().join("missing.csv");
        assert!(session.import_csv(EntityKind::Patient, &missing).await.is_none());
        assert!(session
            .last_notice()
            .unwrap()
            .message
            .starts_with("Error importing CSV: cannot read"));
        assert!(session.gateway().imported.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn seed_reloads_medications() {
        let (mut session, _dir) = session_with(FakeGateway::default());

        assert!(session.seed_medications().await);

        assert_eq!(session.cache().medications().len(), 2);
        assert_eq!(session.last_notice().unwrap().message, "2 medications added");
    }

    #[tokio::test]
    async fn export_all_saves_both_files() {
        let (mut session, dir) = session_with(seeded_gateway());

        let saved = session.export_all().await.expect("both exported");

        assert_eq!(
            saved,
            vec![
                dir.path().join("pacientes_20240101.csv"),
                dir.path().join("medicamentos_20240101.csv"),
            ]
        );
        assert_eq!(session.last_notice().unwrap().message, "All data exported");
    }

    #[tokio::test]
    async fn export_all_reports_failure_when_offline() {
        let gateway = FakeGateway::default();
        gateway.offline.store(true, Ordering::SeqCst);
        let (mut session, _dir) = session_with(gateway);

        assert!(session.export_all().await.is_none());
        assert_eq!(session.last_notice().unwrap().message, "Error exporting data");
    }

    #[tokio::test]
    async fn view_shows_live_notices_for_the_active_tab() {
        let (mut session, _dir) = session_with(seeded_gateway());
        session.activate_tab(Tab::Medications).await;
        session.add_line_item("", "", "");

        let view = session.view();

        assert_eq!(view.tab, Tab::Medications);
        assert!(view.body.contains("Amoxicilina"));
        assert!(view.notices.contains("alert-danger"));
    }
}
