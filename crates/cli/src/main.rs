use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use receitas_api_client::HttpGateway;
use receitas_core::{
    ClientConfig, EntityKind, MedicationForm, MedicationId, PatientForm, PatientId,
    PrescriptionForm,
};
use receitas_frontend::text::{
    medication_line, notice_line, patient_line, statistics_report, STATISTICS_UNAVAILABLE,
};
use receitas_frontend::Session;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "receitas")]
#[command(about = "Prescription management client")]
struct Cli {
    /// API base URL (overrides RECEITAS_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,
    /// Where exports and PDFs are saved (overrides RECEITAS_DOWNLOAD_DIR)
    #[arg(long, global = true)]
    download_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage patients
    Patients {
        #[command(subcommand)]
        action: PatientAction,
    },
    /// Manage medications
    Medications {
        #[command(subcommand)]
        action: MedicationAction,
    },
    /// Generate a prescription PDF
    Prescribe(PrescribeArgs),
    /// Show registered totals
    Stats,
    /// Export patients and medications as CSV
    ExportAll,
}

#[derive(Subcommand)]
enum PatientAction {
    /// List patients
    List {
        /// Only names containing this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Register a patient
    Add {
        /// Full name
        #[arg(long)]
        name: String,
        /// CPF, with or without punctuation
        #[arg(long)]
        cpf: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        birth_date: Option<String>,
    },
    /// Delete a patient
    Delete {
        id: PatientId,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Download the CSV export
    Export,
    /// Upload a CSV file
    Import { file: PathBuf },
}

#[derive(Subcommand)]
enum MedicationAction {
    /// List medications
    List {
        /// Only names containing this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Register a medication
    Add {
        /// Generic name
        #[arg(long)]
        name: String,
        #[arg(long)]
        concentration: Option<String>,
        #[arg(long)]
        presentation: Option<String>,
    },
    /// Delete a medication
    Delete {
        id: MedicationId,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Download the CSV export
    Export,
    /// Upload a CSV file
    Import { file: PathBuf },
    /// Add the server's sample medications
    Seed {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct PrescribeArgs {
    /// Patient ID
    #[arg(long)]
    patient: String,
    /// First date (YYYY-MM-DD), today when omitted
    #[arg(long)]
    start_date: Option<String>,
    /// Number of prescriptions
    #[arg(long, default_value_t = 1)]
    count: u32,
    #[arg(long, default_value = "")]
    notes: String,
    /// Line item as ID[:DOSAGE[:INSTRUCTIONS]], repeatable
    #[arg(long = "item", required = true)]
    items: Vec<String>,
    /// Open the saved PDF with the system viewer
    #[arg(long)]
    open: bool,
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

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'receitas --help' for commands");
        return Ok(());
    };

    let cfg = ClientConfig::from_env_values(
        std::env::var("RECEITAS_API_BASE").ok(),
        std::env::var("RECEITAS_DOWNLOAD_DIR").ok(),
        std::env::var("RECEITAS_NOTICE_TTL_SECS").ok(),
    )?
    .with_overrides(cli.api_base.as_deref(), cli.download_dir)?;
    tracing::debug!(api_base = cfg.api_base(), "configuration resolved");
    let gateway = HttpGateway::new(&cfg)?;
    let mut session = Session::new(gateway, &cfg);

    let ok = run(&mut session, command).await?;

    for notice in session.take_notices() {
        println!("{}", notice_line(&notice));
    }
    if !ok {
        anyhow::bail!("command failed");
    }
    Ok(())
}

async fn run(session: &mut Session<HttpGateway>, command: Commands) -> anyhow::Result<bool> {
    let ok = match command {
        Commands::Patients { action } => match action {
            PatientAction::List { search } => {
                let ok = session.reload(EntityKind::Patient).await;
                let term = search.unwrap_or_default();
                let patients = session.cache().search_patients(&term);
                if ok && patients.is_empty() {
                    println!("No patients found.");
                }
                for patient in patients {
                    println!("{}", patient_line(patient));
                }
                ok
            }
            PatientAction::Add {
                name,
                cpf,
                birth_date,
            } => {
                session
                    .register_patient(PatientForm {
                        full_name: name,
                        national_id: cpf.unwrap_or_default(),
                        birth_date: birth_date.unwrap_or_default(),
                    })
                    .await
            }
            PatientAction::Delete { id, yes } => {
                if !yes && !confirm(&format!("Delete patient {id}?"))? {
                    return Ok(true);
                }
                session.delete_patient(id).await
            }
            PatientAction::Export => session.export_csv(EntityKind::Patient).await.is_some(),
            PatientAction::Import { file } => session
                .import_csv(EntityKind::Patient, &file)
                .await
                .is_some(),
        },
        Commands::Medications { action } => match action {
            MedicationAction::List { search } => {
                let ok = session.reload(EntityKind::Medication).await;
                let term = search.unwrap_or_default();
                let medications = session.cache().search_medications(&term);
                if ok && medications.is_empty() {
                    println!("No medications found.");
                }
                for medication in medications {
                    println!("{}", medication_line(medication));
                }
                ok
            }
            MedicationAction::Add {
                name,
                concentration,
                presentation,
            } => {
                session
                    .register_medication(MedicationForm {
                        generic_name: name,
                        concentration: concentration.unwrap_or_default(),
                        presentation: presentation.unwrap_or_default(),
                    })
                    .await
            }
            MedicationAction::Delete { id, yes } => {
                if !yes && !confirm(&format!("Delete medication {id}?"))? {
                    return Ok(true);
                }
                session.delete_medication(id).await
            }
            MedicationAction::Export => session.export_csv(EntityKind::Medication).await.is_some(),
            MedicationAction::Import { file } => session
                .import_csv(EntityKind::Medication, &file)
                .await
                .is_some(),
            MedicationAction::Seed { yes } => {
                if !yes && !confirm("Add the sample medications?")? {
                    return Ok(true);
                }
                session.seed_medications().await
            }
        },
        Commands::Prescribe(args) => prescribe(session, args).await,
        Commands::Stats => {
            let stats = session.refresh_statistics().await;
            let lines = statistics_report(Some(&stats));
            for line in &lines {
                println!("{line}");
            }
            lines != [STATISTICS_UNAVAILABLE]
        }
        Commands::ExportAll => session.export_all().await.is_some(),
    };
    Ok(ok)
}

async fn prescribe(session: &mut Session<HttpGateway>, args: PrescribeArgs) -> bool {
    if !session.reload(EntityKind::Medication).await {
        return false;
    }
    for item in &args.items {
        let mut parts = item.splitn(3, ':');
        let id = parts.next().unwrap_or_default();
        let dosage = parts.next().unwrap_or_default();
        let instructions = parts.next().unwrap_or_default();
        if !session.add_line_item(id, dosage, instructions) {
            return false;
        }
    }

    let today = chrono::Local::now().date_naive();
    let form = PrescriptionForm {
        patient_id: args.patient,
        start_date: args
            .start_date
            .unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
        repeat_count: args.count,
        notes: args.notes,
    };
    match session.generate_prescription(&form).await {
        Some(path) if args.open => session.open_download(&path),
        Some(_) => true,
        None => false,
    }
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
