//! Reference data and payload types exchanged with the prescriptions API.
//!
//! Field names on the wire are the server's (Portuguese) names; the Rust side
//! uses descriptive English names and maps them with `serde(rename)`.

use chrono::{DateTime, Local, NaiveDate};
use receitas_types::{NationalId, NonEmptyText};
use serde::{Deserialize, Serialize};

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

integer_id!(
    /// Server-assigned patient identifier.
    PatientId
);

integer_id!(
    /// Server-assigned medication identifier.
    MedicationId
);

/// The two kinds of reference data the client caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Patient,
    Medication,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [EntityKind::Patient, EntityKind::Medication];

    /// Collection path segment under the API base.
    pub fn segment(self) -> &'static str {
        match self {
            EntityKind::Patient => crate::constants::PATIENTS_SEGMENT,
            EntityKind::Medication => crate::constants::MEDICATIONS_SEGMENT,
        }
    }

    /// Plural noun used in notices.
    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::Patient => "patients",
            EntityKind::Medication => "medications",
        }
    }

    /// Capitalised singular noun used in notices.
    pub fn singular(self) -> &'static str {
        match self {
            EntityKind::Patient => "Patient",
            EntityKind::Medication => "Medication",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.plural())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" | "patients" | "pacientes" => Ok(EntityKind::Patient),
            "medication" | "medications" | "medicamentos" => Ok(EntityKind::Medication),
            other => Err(format!("unknown entity kind: {other}")),
        }
    }
}

/// A patient as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    #[serde(rename = "nome_completo")]
    pub full_name: String,
    /// Kept as the server sent it; older records may not be normalised.
    #[serde(rename = "cpf", default)]
    pub national_id: Option<String>,
    #[serde(rename = "data_nascimento", default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A medication as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub id: MedicationId,
    #[serde(rename = "denominacao_generica")]
    pub generic_name: String,
    #[serde(rename = "concentracao", default)]
    pub concentration: Option<String>,
    #[serde(rename = "apresentacao", default)]
    pub presentation: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Medication {
    /// Display label: generic name, then concentration, then ` - presentation`.
    pub fn label(&self) -> String {
        let mut label = self.generic_name.clone();
        if let Some(concentration) = non_blank(&self.concentration) {
            label.push(' ');
            label.push_str(concentration);
        }
        if let Some(presentation) = non_blank(&self.presentation) {
            label.push_str(" - ");
            label.push_str(presentation);
        }
        label
    }
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Body of `POST /pacientes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPatient {
    #[serde(rename = "nome_completo")]
    pub full_name: NonEmptyText,
    #[serde(rename = "cpf")]
    pub national_id: Option<NationalId>,
    #[serde(rename = "data_nascimento")]
    pub birth_date: Option<NaiveDate>,
}

/// Body of `POST /medicamentos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMedication {
    #[serde(rename = "denominacao_generica")]
    pub generic_name: NonEmptyText,
    #[serde(rename = "concentracao")]
    pub concentration: Option<NonEmptyText>,
    #[serde(rename = "apresentacao")]
    pub presentation: Option<NonEmptyText>,
}

/// CSV export handed back by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

/// Outcome of a CSV import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImportSummary {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub imported: Option<u64>,
    #[serde(default)]
    pub duplicated: Option<u64>,
    /// Per-row problems reported by the server.
    #[serde(default)]
    pub errors: Vec<String>,
}

/// A generated prescription PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Totals shown by the statistics view.
///
/// A total is `None` when its request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub patients: Option<usize>,
    pub medications: Option<usize>,
    pub refreshed_at: DateTime<Local>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medication(concentration: Option<&str>, presentation: Option<&str>) -> Medication {
        Medication {
            id: MedicationId(1),
            generic_name: "Dipirona".into(),
            concentration: concentration.map(Into::into),
            presentation: presentation.map(Into::into),
            created_at: None,
        }
    }

    #[test]
    fn medication_label_includes_optional_parts() {
        assert_eq!(
            medication(Some("500mg"), Some("comprimido")).label(),
            "Dipirona 500mg - comprimido"
        );
        assert_eq!(medication(None, Some("gotas")).label(), "Dipirona - gotas");
        assert_eq!(medication(Some("  "), None).label(), "Dipirona");
    }

    #[test]
    fn patient_deserialises_from_wire_names() {
        let json = r#"{
            "id": 7,
            "nome_completo": "Ana Souza",
            "cpf": "12345678909",
            "data_nascimento": "1980-05-17",
            "created_at": "2024-01-01T10:00:00"
        }"#;

        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.id, PatientId(7));
        assert_eq!(patient.full_name, "Ana Souza");
        assert_eq!(
            patient.birth_date,
            Some(NaiveDate::from_ymd_opt(1980, 5, 17).unwrap())
        );
    }

    #[test]
    fn patient_tolerates_null_optionals() {
        let json = r#"{"id": 1, "nome_completo": "Sem Dados", "cpf": null, "data_nascimento": null}"#;
        let patient: Patient = serde_json::from_str(json).unwrap();
        assert!(patient.national_id.is_none());
        assert!(patient.birth_date.is_none());
    }

    #[test]
    fn new_patient_serialises_to_wire_names() {
        let payload = NewPatient {
            full_name: NonEmptyText::new("Ana Souza").unwrap(),
            national_id: None,
            birth_date: NaiveDate::from_ymd_opt(1980, 5, 17),
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["nome_completo"], "Ana Souza");
        assert!(value["cpf"].is_null());
        assert_eq!(value["data_nascimento"], "1980-05-17");
    }

    #[test]
    fn entity_kind_parses_both_languages() {
        assert_eq!("pacientes".parse::<EntityKind>().unwrap(), EntityKind::Patient);
        assert_eq!("Medications".parse::<EntityKind>().unwrap(), EntityKind::Medication);
        assert!("prescriptions".parse::<EntityKind>().is_err());
    }
}
