//! Saving server-provided files into the download directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use receitas_core::format::safe_file_name;

use crate::error::{ActionError, ActionResult};

/// Directory that receives exported CSV files and generated PDFs.
#[derive(Debug, Clone)]
pub struct DownloadDir {
    path: PathBuf,
}

impl DownloadDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `bytes` under `file_name` and returns the final path.
    ///
    /// The content goes to a temporary file in the same directory first and is
    /// renamed into place once complete. An existing file of that name is
    /// replaced.
    pub fn save(&self, file_name: &str, bytes: &[u8]) -> ActionResult<PathBuf> {
        let name = safe_file_name(file_name).ok_or_else(|| {
            ActionError::io(
                format!("refusing to save {file_name:?}"),
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file name"),
            )
        })?;
        let target = self.path.join(name);

        let mut tmp = tempfile::NamedTempFile::new_in(&self.path)
            .map_err(|e| ActionError::io(format!("cannot write to {}", self.path.display()), e))?;
        tmp.write_all(bytes)
            .map_err(|e| ActionError::io(format!("cannot write {}", target.display()), e))?;
        tmp.persist(&target)
            .map_err(|e| ActionError::io(format!("cannot save {}", target.display()), e.error))?;

        tracing::info!(path = %target.display(), bytes = bytes.len(), "file saved");
        Ok(target)
    }
}

/// Program that hands a file to the desktop's default application.
pub fn opener_program() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Opens a saved file with the system's default application, e.g. a PDF viewer
/// to print from. Does not wait for the viewer to exit.
pub fn open_with_system(path: &Path) -> ActionResult<()> {
    if !path.is_file() {
        return Err(ActionError::io(
            format!("cannot open {}", path.display()),
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        ));
    }
    std::process::Command::new(opener_program())
        .arg(path)
        .spawn()
        .map_err(|e| ActionError::io(format!("cannot open {}", path.display()), e))?;
    tracing::debug!(path = %path.display(), "handed to system opener");
    Ok(())
}
