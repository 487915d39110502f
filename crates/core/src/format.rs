//! Display formatting for identifiers and dates.

use chrono::{DateTime, Local, NaiveDate};

/// Formats an eleven-digit CPF as `000.000.000-00`; anything else is returned as is.
pub fn format_national_id(raw: &str) -> String {
    let raw = raw.trim();
    if raw.len() != 11 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.to_owned();
    }
    format!("{}.{}.{}-{}", &raw[0..3], &raw[3..6], &raw[6..9], &raw[9..11])
}

/// Formats a date the way Brazilian users read it: `dd/mm/yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Formats a local timestamp as `dd/mm/yyyy HH:MM:SS`.
pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format("%d/%m/%Y %H:%M:%S").to_string()
}

/// Reduces a server-supplied file name to its final component.
///
/// Returns `None` when nothing usable is left.
pub fn safe_file_name(name: &str) -> Option<String> {
    let last = name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches('"');
    if last.is_empty() || last == "." || last == ".." || last.contains('\0') {
        return None;
    }
    Some(last.to_owned())
}
