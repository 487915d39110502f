//! Markup for the active tab.

use receitas_core::constants::DOSAGE_OPTIONS;
use receitas_core::render::{
    render_draft, render_dosage_options, render_list, render_medication_options,
    render_patient_options, render_statistics, render_statistics_unavailable,
};
use receitas_core::{DraftBuilder, ReferenceCache, Statistics, Tab};

/// What the user currently sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub tab: Tab,
    /// Alerts still alive, newest last.
    pub notices: String,
    pub body: String,
}

/// Renders the body of `tab` from client state.
pub fn render_tab(
    tab: Tab,
    cache: &ReferenceCache,
    draft: &DraftBuilder,
    statistics: Option<&Statistics>,
) -> String {
    match tab {
        Tab::Patients => render_list(cache.patients()),
        Tab::Medications => render_list(cache.medications()),
        Tab::Prescriptions => [
            render_patient_options(cache.patients()),
            render_medication_options(cache.medications()),
            render_dosage_options(DOSAGE_OPTIONS),
            render_draft(draft.items()),
        ]
        .concat(),
        Tab::Backup => match statistics {
            Some(stats) if stats.patients.is_some() || stats.medications.is_some() => {
                render_statistics(stats)
            }
            _ => render_statistics_unavailable(),
        },
    }
}
