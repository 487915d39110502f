use receitas_api_client::ApiError;
use receitas_core::{DraftError, EntityKind, ValidationError};

/// Anything that can stop a user action.
///
/// Handlers on [`crate::Session`] never return this; they turn it into a
/// danger notice.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{} {id} is not loaded", kind.singular())]
    NotLoaded { kind: EntityKind, id: i64 },
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ActionError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ActionError::Io {
            context: context.into(),
            source,
        }
    }

    /// True when the user can fix the problem by changing what they entered.
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            ActionError::Draft(_) | ActionError::Validation(_) | ActionError::NotLoaded { .. }
        )
    }
}

pub type ActionResult<T> = std::result::Result<T, ActionError>;
