//! Raw form input and its conversion into creation payloads.
//!
//! Forms hold exactly what the user typed. Conversion applies the presence
//! checks and nothing more.

use chrono::NaiveDate;
use receitas_types::{NationalId, NonEmptyText};

use crate::error::ValidationError;
use crate::models::{NewMedication, NewPatient};

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(input.to_owned()))
}

fn optional_date(input: &str) -> Result<Option<NaiveDate>, ValidationError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_date(input).map(Some)
}

/// Patient registration form.
#[derive(Debug, Clone, Default)]
pub struct PatientForm {
    pub full_name: String,
    pub national_id: String,
    pub birth_date: String,
}

impl PatientForm {
    pub fn into_new_patient(self) -> Result<NewPatient, ValidationError> {
        let full_name =
            NonEmptyText::new(&self.full_name).map_err(|_| ValidationError::MissingField("name"))?;

        let national_id = if self.national_id.trim().is_empty() {
            None
        } else {
            Some(NationalId::parse(&self.national_id)?)
        };

        Ok(NewPatient {
            full_name,
            national_id,
            birth_date: optional_date(&self.birth_date)?,
        })
    }
}

/// Medication registration form.
#[derive(Debug, Clone, Default)]
pub struct MedicationForm {
    pub generic_name: String,
    pub concentration: String,
    pub presentation: String,
}

impl MedicationForm {
    pub fn into_new_medication(self) -> Result<NewMedication, ValidationError> {
        let generic_name = NonEmptyText::new(&self.generic_name)
            .map_err(|_| ValidationError::MissingField("generic name"))?;

        Ok(NewMedication {
            generic_name,
            concentration: NonEmptyText::optional(&self.concentration),
            presentation: NonEmptyText::optional(&self.presentation),
        })
    }
}

/// Prescription submission form.
///
/// The line items come from the draft, not from this form.
#[derive(Debug, Clone)]
pub struct PrescriptionForm {
    pub patient_id: String,
    pub start_date: String,
    pub repeat_count: u32,
    pub notes: String,
}

impl Default for PrescriptionForm {
    fn default() -> Self {
        Self {
            patient_id: String::new(),
            start_date: String::new(),
            repeat_count: 1,
            notes: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_form_requires_name() {
        let err = PatientForm {
            full_name: "   ".into(),
            ..Default::default()
        }
        .into_new_patient()
        .unwrap_err();

        assert_eq!(err, ValidationError::MissingField("name"));
    }

    #[test]
    fn patient_form_blank_optionals_become_none() {
        let patient = PatientForm {
            full_name: " Ana Souza ".into(),
            national_id: " ".into(),
            birth_date: "".into(),
        }
        .into_new_patient()
        .unwrap();

        assert_eq!(patient.full_name.as_str(), "Ana Souza");
        assert!(patient.national_id.is_none());
        assert!(patient.birth_date.is_none());
    }

    #[test]
    fn patient_form_normalises_national_id() {
        let patient = PatientForm {
            full_name: "Ana".into(),
            national_id: "123.456.789-09".into(),
            birth_date: "1980-05-17".into(),
        }
        .into_new_patient()
        .unwrap();

        assert_eq!(patient.national_id.unwrap().as_str(), "12345678909");
        assert_eq!(patient.birth_date, NaiveDate::from_ymd_opt(1980, 5, 17));
    }

    #[test]
    fn patient_form_rejects_bad_date() {
        let err = PatientForm {
            full_name: "Ana".into(),
            birth_date: "17/05/1980".into(),
            ..Default::default()
        }
        .into_new_patient()
        .unwrap_err();

        assert_eq!(err, ValidationError::InvalidDate("17/05/1980".into()));
    }

    #[test]
    fn medication_form_requires_generic_name() {
        assert_eq!(
            MedicationForm::default().into_new_medication().unwrap_err(),
            ValidationError::MissingField("generic name")
        );

        let medication = MedicationForm {
            generic_name: "Dipirona".into(),
            concentration: "500mg".into(),
            presentation: "".into(),
        }
        .into_new_medication()
        .unwrap();
        assert_eq!(medication.concentration.unwrap().as_str(), "500mg");
        assert!(medication.presentation.is_none());
    }
}
