//! Plain-text lines for terminal front-ends.

use receitas_core::constants::SYSTEM_NAME;
use receitas_core::format::{format_date, format_national_id, format_timestamp};
use receitas_core::{LineItem, Medication, Notice, NoticeLevel, Patient, Statistics};

pub fn patient_line(patient: &Patient) -> String {
    let mut line = format!("ID: {}, Name: {}", patient.id, patient.full_name);
    if let Some(cpf) = patient.national_id.as_deref().filter(|c| !c.trim().is_empty()) {
        line.push_str(&format!(", CPF: {}", format_national_id(cpf)));
    }
    if let Some(birth_date) = patient.birth_date {
        line.push_str(&format!(", Born: {}", format_date(birth_date)));
    }
    line
}

pub fn medication_line(medication: &Medication) -> String {
    format!("ID: {}, {}", medication.id, medication.label())
}

pub fn draft_line(index: usize, item: &LineItem) -> String {
    let mut line = format!("[{index}] {}", item.medication().label());
    if !item.dosage().is_empty() {
        line.push_str(&format!(", Dosage: {}", item.dosage()));
    }
    if !item.instructions().is_empty() {
        line.push_str(&format!(", Instructions: {}", item.instructions()));
    }
    line
}

pub fn notice_line(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Success => "ok",
        NoticeLevel::Danger => "error",
    };
    format!("[{tag}] {}", notice.message)
}

pub fn statistics_lines(stats: &Statistics) -> Vec<String> {
    vec![
        format!("Registered patients: {}", stats.patients.unwrap_or(0)),
        format!("Registered medications: {}", stats.medications.unwrap_or(0)),
        format!("System: {SYSTEM_NAME}"),
        format!("Last updated: {}", format_timestamp(stats.refreshed_at)),
    ]
}

/// Statistics lines, or the placeholder when neither count loaded.
pub fn statistics_report(stats: Option<&Statistics>) -> Vec<String> {
    match stats {
        Some(stats) if stats.patients.is_some() || stats.medications.is_some() => {
            statistics_lines(stats)
        }
        _ => vec![STATISTICS_UNAVAILABLE.to_owned()],
    }
}

pub const STATISTICS_UNAVAILABLE: &str = "Could not load statistics";
