use crate::models::MedicationId;

/// A required form field was missing or could not be read.
///
/// These are presence checks only; anything deeper is left to the server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("select a patient")]
    MissingPatient,
    #[error("invalid patient identifier: {0}")]
    InvalidPatient(String),
    #[error("enter the start date")]
    MissingStartDate,
    #[error("invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),
    #[error("the number of prescriptions must be at least 1")]
    InvalidRepeatCount,
    #[error("add at least one medication")]
    EmptyDraft,
    #[error("select a medication")]
    MissingMedication,
    #[error("invalid medication identifier: {0}")]
    InvalidMedication(String),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid national ID: {0}")]
    InvalidNationalId(#[from] receitas_types::NationalIdError),
}

/// Failures of the prescription draft operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("medication {0} has already been added")]
    DuplicateEntry(MedicationId),
    #[error("medication {0} not found")]
    NotFound(MedicationId),
    #[error("no line item at position {index} (draft has {len})")]
    OutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type DraftResult<T> = std::result::Result<T, DraftError>;

/// Startup configuration could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("download directory does not exist or is not a directory: {}", path.display())]
    DownloadDirMissing { path: std::path::PathBuf },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
