//! In-memory projection of the server's reference data.
//!
//! The cache is never the source of truth. Each list is replaced wholesale when
//! a reload succeeds and left alone when it fails, so the renderer never sees a
//! half-updated list.

use chrono::{DateTime, Utc};

use crate::models::{EntityKind, Medication, MedicationId, Patient, PatientId};

/// Last-fetched patients and medications.
#[derive(Debug, Default, Clone)]
pub struct ReferenceCache {
    patients: Vec<Patient>,
    medications: Vec<Medication>,
    patients_loaded_at: Option<DateTime<Utc>>,
    medications_loaded_at: Option<DateTime<Utc>>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached patient list.
    pub fn replace_patients(&mut self, patients: Vec<Patient>) {
        tracing::debug!(count = patients.len(), "patient cache replaced");
        self.patients = patients;
        self.patients_loaded_at = Some(Utc::now());
    }

    /// Replaces the cached medication list.
    pub fn replace_medications(&mut self, medications: Vec<Medication>) {
        tracing::debug!(count = medications.len(), "medication cache replaced");
        self.medications = medications;
        self.medications_loaded_at = Some(Utc::now());
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn patient(&self, id: PatientId) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn medication(&self, id: MedicationId) -> Option<&Medication> {
        self.medications.iter().find(|m| m.id == id)
    }

    /// Number of cached entries of the given kind.
    pub fn total(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Patient => self.patients.len(),
            EntityKind::Medication => self.medications.len(),
        }
    }

    /// When the given list was last replaced, if ever.
    pub fn loaded_at(&self, kind: EntityKind) -> Option<DateTime<Utc>> {
        match kind {
            EntityKind::Patient => self.patients_loaded_at,
            EntityKind::Medication => self.medications_loaded_at,
        }
    }

    /// Patients whose name contains `term`, ignoring case. A blank term matches all.
    pub fn search_patients(&self, term: &str) -> Vec<&Patient> {
        let needle = term.trim().to_lowercase();
        self.patients
            .iter()
            .filter(|p| p.full_name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Medications whose generic name contains `term`, ignoring case.
    pub fn search_medications(&self, term: &str) -> Vec<&Medication> {
        let needle = term.trim().to_lowercase();
        self.medications
            .iter()
            .filter(|m| m.generic_name.to_lowercase().contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(id: i64, name: &str) -> Patient {
        Patient {
            id: PatientId(id),
            full_name: name.into(),
            national_id: None,
            birth_date: None,
            created_at: None,
        }
    }

    fn medication(id: i64, name: &str) -> Medication {
        Medication {
            id: MedicationId(id),
            generic_name: name.into(),
            concentration: None,
            presentation: None,
            created_at: None,
        }
    }

    #[test]
    fn replace_swaps_whole_list() {
        let mut cache = ReferenceCache::new();
        assert!(cache.loaded_at(EntityKind::Patient).is_none());

        cache.replace_patients(vec![patient(1, "Ana"), patient(2, "Bruno")]);
        cache.replace_patients(vec![patient(3, "Carla")]);

        assert_eq!(cache.total(EntityKind::Patient), 1);
        assert_eq!(cache.patients()[0].full_name, "Carla");
        assert!(cache.loaded_at(EntityKind::Patient).is_some());
        assert!(cache.loaded_at(EntityKind::Medication).is_none());
    }

    #[test]
    fn lookup_by_id() {
        let mut cache = ReferenceCache::new();
        cache.replace_medications(vec![medication(10, "Amoxicilina"), medication(11, "Dipirona")]);

        assert_eq!(
            cache.medication(MedicationId(11)).map(|m| m.generic_name.as_str()),
            Some("Dipirona")
        );
        assert!(cache.medication(MedicationId(12)).is_none());
        assert!(cache.patient(PatientId(10)).is_none());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let mut cache = ReferenceCache::new();
        cache.replace_patients(vec![
            patient(1, "Ana Souza"),
            patient(2, "Bruno Lima"),
            patient(3, "Mariana Alves"),
        ]);

        let hits: Vec<_> = cache.search_patients("ANA").iter().map(|p| p.id).collect();
        assert_eq!(hits, vec![PatientId(1), PatientId(3)]);
        assert_eq!(cache.search_patients("  ").len(), 3);
    }

    #[test]
    fn medication_search_matches_generic_name() {
        let mut cache = ReferenceCache::new();
        cache.replace_medications(vec![medication(1, "Losartana"), medication(2, "Metformina")]);

        assert_eq!(cache.search_medications("form").len(), 1);
        assert!(cache.search_medications("xyz").is_empty());
    }
}
