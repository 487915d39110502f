//! View renderer: pure projections of cache, draft and statistics into HTML
//! fragments.
//!
//! Nothing here touches the network or mutates state. Every piece of entity
//! text goes through [`escape_html`] before it lands in markup.
//!
//! Buttons carry the entity identifier in a `data-id` attribute; the host wires
//! them to the matching session action.

use std::fmt::Write as _;

use crate::draft::LineItem;
use crate::format::{format_date, format_national_id, format_timestamp};
use crate::models::{non_blank, Medication, Patient, Statistics};
use crate::notify::Notice;

/// Escapes text for use inside element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// An entity that can be shown in a list view.
pub trait ListEntry {
    /// Title of the empty state shown when the list has no entries.
    const EMPTY_TITLE: &'static str;
    /// Hint shown under the empty-state title.
    const EMPTY_HINT: &'static str;

    fn entry_id(&self) -> i64;
    fn heading(&self) -> &str;
    /// Secondary facts, already formatted, not yet escaped.
    fn details(&self) -> Vec<String>;
}

impl ListEntry for Patient {
    const EMPTY_TITLE: &'static str = "No patients found";
    const EMPTY_HINT: &'static str = "Register the first patient to get started";

    fn entry_id(&self) -> i64 {
        self.id.0
    }

    fn heading(&self) -> &str {
        &self.full_name
    }

    fn details(&self) -> Vec<String> {
        let mut details = Vec::new();
        if let Some(national_id) = non_blank(&self.national_id) {
            details.push(format!("CPF: {}", format_national_id(national_id)));
        }
        if let Some(birth_date) = self.birth_date {
            details.push(format!("Born: {}", format_date(birth_date)));
        }
        details
    }
}

impl ListEntry for Medication {
    const EMPTY_TITLE: &'static str = "No medications found";
    const EMPTY_HINT: &'static str = "Register medications to speed up writing prescriptions";

    fn entry_id(&self) -> i64 {
        self.id.0
    }

    fn heading(&self) -> &str {
        &self.generic_name
    }

    fn details(&self) -> Vec<String> {
        let mut details = Vec::new();
        if let Some(concentration) = non_blank(&self.concentration) {
            details.push(format!("Concentration: {concentration}"));
        }
        if let Some(presentation) = non_blank(&self.presentation) {
            details.push(format!("Presentation: {presentation}"));
        }
        details
    }
}

fn joined_details(details: &[String]) -> String {
    details
        .iter()
        .map(|d| escape_html(d))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Renders an empty-state block.
pub fn render_empty_state(title: &str, hint: Option<&str>) -> String {
    let mut out = String::from("<div class=\"empty-state\">");
    let _ = write!(out, "<h3>{}</h3>", escape_html(title));
    if let Some(hint) = hint {
        let _ = write!(out, "<p>{}</p>", escape_html(hint));
    }
    out.push_str("</div>");
    out
}

/// Renders a list of patients or medications, or its empty state.
pub fn render_list<T: ListEntry>(entries: &[T]) -> String {
    if entries.is_empty() {
        return render_empty_state(T::EMPTY_TITLE, Some(T::EMPTY_HINT));
    }

    let mut out = String::new();
    for entry in entries {
        let id = entry.entry_id();
        let _ = write!(
            out,
            "<div class=\"list-item\" data-id=\"{id}\">\
             <div class=\"item-name\">{}</div>\
             <div class=\"item-info\">{}</div>\
             <button class=\"btn btn-danger\" data-action=\"delete\" data-id=\"{id}\">Delete</button>\
             </div>",
            escape_html(entry.heading()),
            joined_details(&entry.details()),
        );
    }
    out
}

/// Same as [`render_list`] for a filtered view holding references.
pub fn render_list_refs<T: ListEntry>(entries: &[&T]) -> String {
    if entries.is_empty() {
        return render_empty_state(T::EMPTY_TITLE, Some(T::EMPTY_HINT));
    }
    let owned: Vec<String> = entries
        .iter()
        .map(|e| render_list(std::slice::from_ref(*e)))
        .collect();
    owned.concat()
}

/// Renders the draft line items, or the draft's empty state.
pub fn render_draft(items: &[LineItem]) -> String {
    if items.is_empty() {
        return render_empty_state("No medication added", None);
    }

    let mut out = String::new();
    for (index, item) in items.iter().enumerate() {
        let mut details = Vec::new();
        if !item.dosage().is_empty() {
            details.push(format!("Dosage: {}", item.dosage()));
        }
        if !item.instructions().is_empty() {
            details.push(format!("Instructions: {}", item.instructions()));
        }

        let _ = write!(
            out,
            "<div class=\"medication-selected\" data-index=\"{index}\">\
             <div class=\"medication-name\">{}</div>\
             <div class=\"medication-details\">{}</div>\
             <button class=\"btn btn-danger\" data-action=\"remove\" data-index=\"{index}\">Remove</button>\
             </div>",
            escape_html(&item.medication().label()),
            joined_details(&details),
        );
    }
    out
}

fn render_select(placeholder: &str, options: impl Iterator<Item = (String, String)>) -> String {
    let mut out = format!("<option value=\"\">{}</option>", escape_html(placeholder));
    for (value, label) in options {
        let _ = write!(
            out,
            "<option value=\"{}\">{}</option>",
            escape_html(&value),
            escape_html(&label)
        );
    }
    out
}

/// Options of the patient selector on the prescription view.
pub fn render_patient_options(patients: &[Patient]) -> String {
    render_select(
        "Select a patient",
        patients.iter().map(|p| (p.id.to_string(), p.full_name.clone())),
    )
}

/// Options of the medication selector on the prescription view.
pub fn render_medication_options(medications: &[Medication]) -> String {
    render_select(
        "Select a medication",
        medications.iter().map(|m| (m.id.to_string(), m.label())),
    )
}

/// Options of the dosage selector.
pub fn render_dosage_options(options: &[&str]) -> String {
    render_select(
        "Select the dosage",
        options.iter().map(|o| (o.to_string(), o.to_string())),
    )
}

/// Renders the statistics block. A failed total is shown as 0.
pub fn render_statistics(stats: &Statistics) -> String {
    format!(
        "<p><strong>Registered patients:</strong> {}</p>\
         <p><strong>Registered medications:</strong> {}</p>\
         <p><strong>System:</strong> {}</p>\
         <p><strong>Last updated:</strong> {}</p>",
        stats.patients.unwrap_or(0),
        stats.medications.unwrap_or(0),
        escape_html(crate::constants::SYSTEM_NAME),
        format_timestamp(stats.refreshed_at),
    )
}

/// Renders the statistics placeholder shown when nothing could be loaded.
pub fn render_statistics_unavailable() -> String {
    "<p>Could not load statistics</p>".to_owned()
}

/// Renders the active notices as alert blocks.
pub fn render_notices<'a>(notices: impl IntoIterator<Item = &'a Notice>) -> String {
    notices
        .into_iter()
        .map(|n| {
            format!(
                "<div class=\"alert alert-{}\">{}</div>",
                n.level.css_class(),
                escape_html(&n.message)
            )
        })
        .collect()
}
