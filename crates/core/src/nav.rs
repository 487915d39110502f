//! Navigation targets and what each one refreshes when it becomes active.

use crate::models::EntityKind;

/// The views of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Patients,
    Medications,
    Prescriptions,
    Backup,
}

/// Work to do when a tab becomes active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabRefresh {
    /// Re-fetch one reference list from the server.
    Reload(EntityKind),
    /// Rebuild the prescription selectors from the cache, without fetching.
    Selectors,
    /// Re-fetch the totals for the statistics view.
    Statistics,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Patients, Tab::Medications, Tab::Prescriptions, Tab::Backup];

    pub fn refresh(self) -> TabRefresh {
        match self {
            Tab::Patients => TabRefresh::Reload(EntityKind::Patient),
            Tab::Medications => TabRefresh::Reload(EntityKind::Medication),
            Tab::Prescriptions => TabRefresh::Selectors,
            Tab::Backup => TabRefresh::Statistics,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Patients => "Patients",
            Tab::Medications => "Medications",
            Tab::Prescriptions => "Prescriptions",
            Tab::Backup => "Backup",
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

impl std::str::FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patients" | "pacientes" => Ok(Tab::Patients),
            "medications" | "medicamentos" => Ok(Tab::Medications),
            "prescriptions" | "receitas" => Ok(Tab::Prescriptions),
            "backup" | "stats" => Ok(Tab::Backup),
            other => Err(format!("unknown tab: {other}")),
        }
    }
}
