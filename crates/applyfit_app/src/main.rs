mod console;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use applyfit_core::Operation;
use clap::{Parser, Subcommand, ValueEnum};
use engine_logging::{engine_info, engine_warn, LogDestination};

use settings::{LevelSetting, Settings, SETTINGS_FILENAME};

#[derive(Parser)]
#[command(author, version, about = "Job application optimizer client", long_about = None)]
struct Cli {
    /// Settings file (RON)
    #[arg(long, default_value = SETTINGS_FILENAME)]
    config: PathBuf,

    /// Base URL of the analysis service, overrides the settings file
    #[arg(long)]
    base_url: Option<String>,

    /// Log level, overrides the settings file
    #[arg(long, value_enum)]
    log_level: Option<LevelSetting>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive session (default)
    Interactive,
    /// Submit once and print the result
    Run {
        #[arg(value_enum)]
        operation: OperationArg,
        /// Text file holding the job description
        #[arg(long)]
        job_file: PathBuf,
        /// Resume file (.txt, .doc, .docx or .pdf, max 5MB)
        #[arg(long)]
        resume_file: Option<PathBuf>,
    },
    /// Write the effective settings to the settings file
    InitConfig,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OperationArg {
    Analyze,
    Match,
    Optimize,
    CoverLetter,
}

impl From<OperationArg> for Operation {
    fn from(value: OperationArg) -> Self {
        match value {
            OperationArg::Analyze => Operation::AnalyzeJob,
            OperationArg::Match => Operation::MatchResume,
            OperationArg::Optimize => Operation::Optimize,
            OperationArg::CoverLetter => Operation::CoverLetter,
        }
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let (mut settings, load_error) = match settings::load(&cli.config) {
        Ok(settings) => (settings, None),
        Err(err) => (Settings::default(), Some(err)),
    };
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    if let Some(level) = cli.log_level {
        settings.log_level = level;
    }

    let destination = match &settings.log_file {
        Some(path) => LogDestination::File(path.clone()),
        None => LogDestination::Terminal,
    };
    engine_logging::initialize(destination, settings.log_level.into());
    if let Some(err) = load_error {
        engine_warn!("{:#}; using defaults", err);
        eprintln!("Warning: {err:#}; using defaults");
    }
    engine_info!("Starting with base_url={}", settings.base_url);

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            console::run_interactive(&settings)?;
            Ok(true)
        }
        Commands::Run {
            operation,
            job_file,
            resume_file,
        } => console::run_once(
            &settings,
            operation.into(),
            &job_file,
            resume_file.as_deref(),
        ),
        Commands::InitConfig => {
            let path = settings::save(&cli.config, &settings)?;
            println!("Wrote {}", path.display());
            Ok(true)
        }
    }
}
