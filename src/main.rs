use std::path::PathBuf;

use clap::{Parser, Subcommand};
use receitas_api_client::HttpGateway;
use receitas_core::{
    ClientConfig, EntityKind, MedicationForm, MedicationId, PatientForm, PatientId,
    PrescriptionForm, Tab,
};
use receitas_frontend::text::{
    draft_line, medication_line, notice_line, patient_line, statistics_report,
};
use receitas_frontend::Session;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Startup options for the interactive session.
#[derive(Parser)]
#[command(name = "receitas-run")]
#[command(about = "Interactive prescription session")]
struct Options {
    /// API base URL (overrides RECEITAS_API_BASE)
    #[arg(long)]
    api_base: Option<String>,
    /// Where exports and PDFs are saved (overrides RECEITAS_DOWNLOAD_DIR)
    #[arg(long)]
    download_dir: Option<PathBuf>,
}

/// One line typed at the prompt.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Switch tab: patients, medications, prescriptions, backup
    Tab { tab: Tab },
    /// Print the active tab
    Show {
        /// Print the HTML view instead of text
        #[arg(long)]
        html: bool,
    },
    /// Filter cached patients or medications by name
    Search {
        kind: EntityKind,
        #[arg(default_value = "")]
        term: String,
    },
    /// Register a patient
    AddPatient {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        cpf: String,
        #[arg(long, default_value = "")]
        birth_date: String,
    },
    /// Register a medication
    AddMedication {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        concentration: String,
        #[arg(long, default_value = "")]
        presentation: String,
    },
    /// Delete a patient or medication
    Delete { kind: EntityKind, id: i64 },
    /// Choose the patient for the next prescription
    Select { id: PatientId },
    /// Download the CSV export of a kind
    Export { kind: EntityKind },
    /// Upload a CSV file
    Import { kind: EntityKind, file: PathBuf },
    /// Add the server's sample medications
    Seed,
    /// Add a medication to the prescription draft
    Item {
        medication: String,
        #[arg(long, default_value = "")]
        dosage: String,
        #[arg(long, default_value = "")]
        instructions: String,
    },
    /// Remove a draft line by position
    Remove { index: usize },
    /// Empty the prescription draft
    Clear,
    /// Change prescription fields
    Set {
        #[arg(long)]
        patient: Option<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        count: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Generate the prescription PDF from the draft
    Generate {
        /// Open the saved PDF with the system viewer
        #[arg(long)]
        open: bool,
    },
    /// Refresh registered totals
    Stats,
    /// Export patients and medications
    ExportAll,
    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("receitas=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let options = Options::parse();
    let cfg = ClientConfig::from_env_values(
        std::env::var("RECEITAS_API_BASE").ok(),
        std::env::var("RECEITAS_DOWNLOAD_DIR").ok(),
        std::env::var("RECEITAS_NOTICE_TTL_SECS").ok(),
    )?
    .with_overrides(options.api_base.as_deref(), options.download_dir)?;

    let mut session = Session::new(HttpGateway::new(&cfg)?, &cfg);
    tracing::info!("++ Connecting to {}", session.gateway().base());
    tracing::info!("++ Saving downloads to {}", session.downloads().path().display());

    session.start().await;
    let mut form = session.prescription_form(chrono::Local::now().date_naive());

    let mut out = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_notices(&mut session);
    print_tab(&session, &form);

    loop {
        out.write_all(format!("{}> ", session.tab()).as_bytes()).await?;
        out.flush().await?;

        let Some(input) = lines.next_line().await? else {
            break;
        };
        let words = split_words(&input);
        if words.is_empty() {
            continue;
        }

        let command = match Line::try_parse_from(words) {
            Ok(line) => line.command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        if matches!(command, Command::Quit) {
            break;
        }

        execute(&mut session, &mut form, command).await;
        print_notices(&mut session);
    }

    Ok(())
}

async fn execute(session: &mut Session<HttpGateway>, form: &mut PrescriptionForm, command: Command) {
    match command {
        Command::Tab { tab } => {
            session.activate_tab(tab).await;
            print_tab(session, form);
        }
        Command::Show { html } => {
            if html {
                let view = session.view();
                println!("{}{}", view.notices, view.body);
            } else {
                print_tab(session, form);
            }
        }
        Command::Search { kind, term } => match kind {
            EntityKind::Patient => session
                .cache()
                .search_patients(&term)
                .into_iter()
                .for_each(|p| println!("{}", patient_line(p))),
            EntityKind::Medication => session
                .cache()
                .search_medications(&term)
                .into_iter()
                .for_each(|m| println!("{}", medication_line(m))),
        },
        Command::AddPatient {
            name,
            cpf,
            birth_date,
        } => {
            session
                .register_patient(PatientForm {
                    full_name: name,
                    national_id: cpf,
                    birth_date,
                })
                .await;
        }
        Command::AddMedication {
            name,
            concentration,
            presentation,
        } => {
            session
                .register_medication(MedicationForm {
                    generic_name: name,
                    concentration,
                    presentation,
                })
                .await;
        }
        Command::Delete { kind, id } => {
            match kind {
                EntityKind::Patient => session.delete_patient(PatientId(id)).await,
                EntityKind::Medication => session.delete_medication(MedicationId(id)).await,
            };
        }
        Command::Select { id } => {
            if session.select_patient(id) {
                form.patient_id = id.to_string();
                if let Some(patient) = session.selected_patient() {
                    println!("Selected {}", patient_line(patient));
                }
            }
        }
        Command::Export { kind } => {
            session.export_csv(kind).await;
        }
        Command::Import { kind, file } => {
            session.import_csv(kind, &file).await;
        }
        Command::Seed => {
            session.seed_medications().await;
        }
        Command::Item {
            medication,
            dosage,
            instructions,
        } => {
            if session.add_line_item(&medication, &dosage, &instructions) {
                print_draft(session);
            }
        }
        Command::Remove { index } => {
            if session.remove_line_item(index) {
                print_draft(session);
            }
        }
        Command::Clear => {
            session.clear_draft();
            print_draft(session);
        }
        Command::Set {
            patient,
            start_date,
            count,
            notes,
        } => {
            if let Some(patient) = patient {
                form.patient_id = patient;
            }
            if let Some(start_date) = start_date {
                form.start_date = start_date;
            }
            if let Some(count) = count {
                form.repeat_count = count;
            }
            if let Some(notes) = notes {
                form.notes = notes;
            }
            print_form(form);
        }
        Command::Generate { open } => {
            if let Some(path) = session.generate_prescription(form).await {
                if open {
                    session.open_download(&path);
                }
            }
        }
        Command::Stats => {
            let stats = session.refresh_statistics().await;
            for line in statistics_report(Some(&stats)) {
                println!("{line}");
            }
        }
        Command::ExportAll => {
            session.export_all().await;
        }
        Command::Quit => {}
    }
}

fn print_tab(session: &Session<HttpGateway>, form: &PrescriptionForm) {
    println!("== {} ==", session.tab());
    match session.tab() {
        Tab::Patients => {
            if session.cache().patients().is_empty() {
                println!("No patients found.");
            }
            for patient in session.cache().patients() {
                println!("{}", patient_line(patient));
            }
        }
        Tab::Medications => {
            if session.cache().medications().is_empty() {
                println!("No medications found.");
            }
            for medication in session.cache().medications() {
                println!("{}", medication_line(medication));
            }
        }
        Tab::Prescriptions => {
            print_form(form);
            print_draft(session);
        }
        Tab::Backup => {
            for line in statistics_report(session.statistics()) {
                println!("{line}");
            }
        }
    }
}

fn print_form(form: &PrescriptionForm) {
    println!(
        "Patient: {}, Start: {}, Prescriptions: {}, Notes: {}",
        if form.patient_id.is_empty() { "-" } else { form.patient_id.as_str() },
        form.start_date,
        form.repeat_count,
        form.notes
    );
}

fn print_draft(session: &Session<HttpGateway>) {
    if session.draft().is_empty() {
        println!("No medication added");
    }
    for (index, item) in session.draft().items().iter().enumerate() {
        println!("{}", draft_line(index, item));
    }
}

fn print_notices(session: &mut Session<HttpGateway>) {
    for notice in session.take_notices() {
        println!("{}", notice_line(&notice));
    }
}

/// Splits a prompt line on whitespace, keeping quoted text together.
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_word = false;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}
