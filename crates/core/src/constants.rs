//! Constants used throughout the receitas core crate.
//!
//! Endpoint segments, defaults and the fixed option lists offered by the forms
//! live here so the gateway, the renderer and the CLIs agree on them.

/// Default base URL of the prescriptions REST API.
pub const DEFAULT_API_BASE: &str = "http://localhost:5001/api";

/// Default directory that receives CSV and PDF downloads.
pub const DEFAULT_DOWNLOAD_DIR: &str = ".";

/// Default lifetime of a notice before it is dismissed, in seconds.
pub const DEFAULT_NOTICE_TTL_SECS: u64 = 5;

/// Path segment of the patients collection.
pub const PATIENTS_SEGMENT: &str = "pacientes";

/// Path segment of the medications collection.
pub const MEDICATIONS_SEGMENT: &str = "medicamentos";

/// Path of the prescription PDF endpoint, relative to the API base.
pub const GENERATE_PRESCRIPTION_PATH: &str = "receitas/generate";

/// Prefix of the fallback PDF file name when the server does not name the file.
pub const PRESCRIPTION_FILE_PREFIX: &str = "receita";

/// Dosage schedules offered when adding a line item.
///
/// The dosage field stays free text; this list only feeds the selector.
pub const DOSAGE_OPTIONS: &[&str] = &[
    "1x/day",
    "2x/day",
    "3x/day",
    "4x/day",
    "every 4 hours",
    "every 6 hours",
    "every 8 hours",
    "every 12 hours",
    "at bedtime",
    "as needed",
    "continuous use",
];

/// Product line shown in the statistics view.
pub const SYSTEM_NAME: &str = "ReceitasPerobal v3.0";
