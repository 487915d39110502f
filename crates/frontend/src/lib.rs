//! # Receitas Frontend
//!
//! The controller both binaries drive. A user action goes through
//! [`Session`]: read the form values, mutate client state, call the
//! [`receitas_api_client::Gateway`], then report the outcome as a notice.

pub mod downloads;
pub mod error;
pub mod session;
pub mod text;
pub mod view;

pub use downloads::DownloadDir;
pub use error::{ActionError, ActionResult};
pub use session::Session;
pub use view::View;
