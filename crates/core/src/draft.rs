//! Prescription draft builder.
//!
//! The draft is the in-progress list of medication line items for one
//! prescription. It is the only client-owned state with invariants:
//! - a medication appears at most once;
//! - items keep insertion order and positions have no gaps;
//! - a request can only be produced from a non-empty draft.

use chrono::NaiveDate;
use serde::Serialize;

use crate::cache::ReferenceCache;
use crate::error::{DraftError, DraftResult, ValidationError};
use crate::models::{Medication, MedicationId, PatientId};

/// One medication entry of the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    medication: Medication,
    dosage: String,
    instructions: String,
}

impl LineItem {
    pub fn medication_id(&self) -> MedicationId {
        self.medication.id
    }

    /// Snapshot of the medication taken when the item was added.
    pub fn medication(&self) -> &Medication {
        &self.medication
    }

    pub fn dosage(&self) -> &str {
        &self.dosage
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }
}

/// Ordered, duplicate-free list of line items.
#[derive(Debug, Default, Clone)]
pub struct DraftBuilder {
    items: Vec<LineItem>,
}

impl DraftBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, medication_id: MedicationId) -> bool {
        self.items.iter().any(|i| i.medication_id() == medication_id)
    }

    /// Appends a line item for `medication_id`.
    ///
    /// # Errors
    ///
    /// - `DuplicateEntry` if the medication is already in the draft;
    /// - `NotFound` if the medication is not in the cached reference list.
    ///
    /// The draft is unchanged on error.
    pub fn add(
        &mut self,
        cache: &ReferenceCache,
        medication_id: MedicationId,
        dosage: &str,
        instructions: &str,
    ) -> DraftResult<&LineItem> {
        if self.contains(medication_id) {
            return Err(DraftError::DuplicateEntry(medication_id));
        }

        let medication = cache
            .medication(medication_id)
            .ok_or(DraftError::NotFound(medication_id))?;

        self.items.push(LineItem {
            medication: medication.clone(),
            dosage: dosage.trim().to_owned(),
            instructions: instructions.trim().to_owned(),
        });

        let index = self.items.len() - 1;
        Ok(&self.items[index])
    }

    /// Removes and returns the item at `index`; later items shift down by one.
    pub fn remove(&mut self, index: usize) -> DraftResult<LineItem> {
        if index >= self.items.len() {
            return Err(DraftError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Builds the submission snapshot from the prescription form fields.
    ///
    /// `patient_id` and `start_date` are the raw form values. The draft itself
    /// is left untouched; clearing it after a successful submission is up to
    /// the caller.
    pub fn to_request(
        &self,
        patient_id: &str,
        start_date: &str,
        repeat_count: u32,
        notes: &str,
    ) -> Result<PrescriptionRequest, ValidationError> {
        let patient_id = patient_id.trim();
        if patient_id.is_empty() {
            return Err(ValidationError::MissingPatient);
        }
        let patient_id: PatientId = patient_id
            .parse()
            .map_err(|_| ValidationError::InvalidPatient(patient_id.to_owned()))?;

        let start_date = start_date.trim();
        if start_date.is_empty() {
            return Err(ValidationError::MissingStartDate);
        }
        let start_date = crate::forms::parse_date(start_date)?;

        if self.items.is_empty() {
            return Err(ValidationError::EmptyDraft);
        }

        if repeat_count == 0 {
            return Err(ValidationError::InvalidRepeatCount);
        }

        Ok(PrescriptionRequest {
            patient_id,
            start_date,
            repeat_count,
            notes: notes.trim().to_owned(),
            lines: self
                .items
                .iter()
                .map(|item| RequestLine {
                    medication_id: item.medication_id(),
                    dosage: item.dosage.clone(),
                    instructions: item.instructions.clone(),
                })
                .collect(),
        })
    }
}

/// One medication line of a submitted prescription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestLine {
    #[serde(rename = "medicamento_id")]
    medication_id: MedicationId,
    #[serde(rename = "posologia")]
    dosage: String,
    #[serde(rename = "instrucoes")]
    instructions: String,
}

impl RequestLine {
    pub fn medication_id(&self) -> MedicationId {
        self.medication_id
    }

    pub fn dosage(&self) -> &str {
        &self.dosage
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }
}

/// Immutable snapshot handed to the gateway; body of `POST /receitas/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrescriptionRequest {
    #[serde(rename = "paciente_id")]
    patient_id: PatientId,
    #[serde(rename = "data_inicial")]
    start_date: NaiveDate,
    #[serde(rename = "num_receitas")]
    repeat_count: u32,
    #[serde(rename = "observacoes")]
    notes: String,
    #[serde(rename = "medicamentos")]
    lines: Vec<RequestLine>,
}

impl PrescriptionRequest {
    pub fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn lines(&self) -> &[RequestLine] {
        &self.lines
    }
}
