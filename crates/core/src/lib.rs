//! # Receitas Core
//!
//! Client-side state and presentation for the prescriptions front-end.
//!
//! This crate contains pure, synchronous logic:
//! - the reference data cache (patients and medications last fetched from the server)
//! - the prescription draft builder and the request snapshot it produces
//! - the view renderer, notices, navigation targets and form conversion
//!
//! **No network concerns**: HTTP calls live in `receitas-api-client`; wiring user actions to
//! calls and state lives in `receitas-frontend`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod draft;
pub mod error;
pub mod format;
pub mod forms;
pub mod models;
pub mod nav;
pub mod notify;
pub mod render;

pub use cache::ReferenceCache;
pub use config::ClientConfig;
pub use draft::{DraftBuilder, LineItem, PrescriptionRequest, RequestLine};
pub use error::{ConfigError, ConfigResult, DraftError, DraftResult, ValidationError};
pub use forms::{MedicationForm, PatientForm, PrescriptionForm};
pub use models::{
    CsvExport, EntityKind, ImportSummary, Medication, MedicationId, NewMedication, NewPatient,
    Patient, PatientId, PdfDocument, Statistics,
};
pub use nav::{Tab, TabRefresh};
pub use notify::{Notice, NoticeLevel, Notifier};
pub use receitas_types::{NationalId, NonEmptyText, TextError};
