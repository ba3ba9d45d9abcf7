//! well-worksteps - batch well worksteps from the command line
//!
//! Runs one workstep against a JSON project file and writes the project
//! back unless `--dry-run` is given.
//!
//! # Usage
//!
//! ```bash
//! # Tie the shallowest "Top Brent" pick of every well to a flat plane
//! well-worksteps shift-kb --project field.json --horizon "Top Brent" --zflat -1450
//!
//! # Pairs of wells whose bottom holes are closer than 25 m
//! well-worksteps find-close-wells --project field.json --threshold 25
//!
//! # Copy the "Zone" well attribute onto "Top Brent" picks of tagged wells
//! well-worksteps copy-attributes --project field.json --attribute Zone --horizon "Top Brent" --filter Use
//! ```
//!
//! # Environment Variables
//!
//! - `WORKSTEPS_CONFIG`: Path to the TOML config (default: ./worksteps.toml)
//! - `RUST_LOG`: Logging filter (default: `log.level` from the config, else info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use well_worksteps::config::{self, LogFormat, WorkstepConfig};
use well_worksteps::host::{ConsolePrompt, Project};
use well_worksteps::workflow::{self, Workstep, WorkstepContext, WorkstepError, WorkstepReport};
use well_worksteps::worksteps::{
    self, CopyAttributes, CopyAttributesArgs, FindUserHistory, FindUserHistoryArgs,
    InterwellDistance, InterwellDistanceArgs, KbShift, KbShiftArgs, SetPresentation,
    SetPresentationArgs,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "well-worksteps")]
#[command(about = "Batch worksteps for well projects")]
#[command(version)]
struct CliArgs {
    /// Path to the worksteps TOML config
    #[arg(long, global = true, env = "WORKSTEPS_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log output format (overrides `log.format`)
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(clap::Args, Debug)]
struct ProjectArgs {
    /// JSON project file
    #[arg(long, value_name = "FILE")]
    project: PathBuf,

    /// `/`-separated well collection path below the root (root when omitted)
    #[arg(long)]
    collection: Option<String>,
}

impl ProjectArgs {
    fn collection(&self) -> Option<String> {
        Some(self.collection.clone().unwrap_or_default())
    }
}

#[derive(clap::Args, Debug)]
struct SaveArgs {
    /// Run without writing the project back
    #[arg(long)]
    dry_run: bool,

    /// Write the modified project here instead of over the input
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// List the available worksteps
    List,

    /// Shift well KB so the shallowest horizon top lands on a surface or plane
    ShiftKb {
        #[command(flatten)]
        project: ProjectArgs,
        /// Horizon holding the well tops
        #[arg(long)]
        horizon: String,
        /// Reference surface (flat plane when omitted)
        #[arg(long)]
        surface: Option<String>,
        /// Flat plane elevation used without a surface
        #[arg(long, allow_negative_numbers = true)]
        zflat: Option<f64>,
        /// Integer discrete well attribute; wells with 0 or no value are skipped
        #[arg(long)]
        filter: Option<String>,
        /// Answer yes to confirmation questions
        #[arg(long, short)]
        yes: bool,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Report pairs of wells whose bottom holes are closer than a threshold
    FindCloseWells {
        #[command(flatten)]
        project: ProjectArgs,
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long)]
        filter: Option<String>,
    },

    /// Copy a well attribute onto the well tops of a horizon
    CopyAttributes {
        #[command(flatten)]
        project: ProjectArgs,
        /// Well attribute to copy
        #[arg(long)]
        attribute: String,
        #[arg(long)]
        horizon: String,
        #[arg(long)]
        filter: Option<String>,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Show the latest history entry of a user and operation on each well
    FindUserHistory {
        #[command(flatten)]
        project: ProjectArgs,
        #[arg(long)]
        user: String,
        /// Operation name as recorded in the history
        #[arg(long)]
        action: String,
    },

    /// Copy color and symbol of a reference well onto other wells
    SetColor {
        #[command(flatten)]
        project: ProjectArgs,
        /// Well to copy from
        #[arg(long)]
        reference: String,
        /// Leave colors alone
        #[arg(long)]
        no_color: bool,
        /// Leave symbols alone
        #[arg(long)]
        no_symbol: bool,
        #[arg(long)]
        filter: Option<String>,
        #[command(flatten)]
        save: SaveArgs,
    },
}

// ============================================================================
// Setup
// ============================================================================

fn load_config(path: Option<&Path>) -> Result<WorkstepConfig> {
    match path {
        Some(path) => WorkstepConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(WorkstepConfig::load()),
    }
}

fn init_logging(config: &WorkstepConfig, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

// ============================================================================
// Running
// ============================================================================

/// Run a workstep. `None` when the user cancelled it.
fn run<W: Workstep>(
    step: &W,
    project: &mut Project,
    assume_yes: bool,
) -> Result<Option<WorkstepReport<W::Output>>> {
    let mut prompt = ConsolePrompt::new(assume_yes);
    let mut ctx = WorkstepContext::new(project, &mut prompt);
    match workflow::execute(step, &mut ctx) {
        Ok(report) => {
            if report.failure_count() > 0 {
                warn!(
                    workstep = report.workstep,
                    failed = report.failure_count(),
                    "Some wells were not processed"
                );
            }
            Ok(Some(report))
        }
        Err(WorkstepError::Cancelled) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("{} failed", step.description().name)),
    }
}

fn open(args: &ProjectArgs) -> Result<Project> {
    Project::load_from_file(&args.project)
        .with_context(|| format!("Failed to open project {}", args.project.display()))
}

/// Write the project back when the workstep changed it.
fn save<T>(
    project: &Project,
    args: &ProjectArgs,
    save: &SaveArgs,
    report: Option<&WorkstepReport<T>>,
) -> Result<()> {
    let changed = report.is_some_and(|r| r.changed);
    if save.dry_run {
        info!(changed, "Dry run, project not written");
        return Ok(());
    }
    if !changed {
        info!("Nothing changed, project not written");
        return Ok(());
    }
    let path = save.output.as_deref().unwrap_or(&args.project);
    project
        .save_to_file(path)
        .with_context(|| format!("Failed to write project {}", path.display()))
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let workstep_config = load_config(args.config.as_deref())?;
    let format = args.log_format.map_or(workstep_config.log.format, LogFormat::from);
    init_logging(&workstep_config, format);
    info!(
        threshold = workstep_config.distance.default_threshold,
        zflat = workstep_config.kb_shift.default_zflat,
        "Configuration ready"
    );
    config::init(workstep_config);

    match args.command {
        SubCommand::List => {
            for d in worksteps::all_descriptions() {
                println!("{:<20} {}", d.name, d.short_description);
            }
        }

        SubCommand::ShiftKb {
            project,
            horizon,
            surface,
            zflat,
            filter,
            yes,
            save: save_args,
        } => {
            let mut p = open(&project)?;
            let step = KbShift::new(KbShiftArgs {
                collection: project.collection(),
                horizon: Some(horizon),
                surface,
                zflat,
                filter,
            });
            let report = run(&step, &mut p, yes)?;
            save(&p, &project, &save_args, report.as_ref())?;
        }

        SubCommand::FindCloseWells {
            project,
            threshold,
            filter,
        } => {
            let mut p = open(&project)?;
            let step = InterwellDistance::new(InterwellDistanceArgs {
                collection: project.collection(),
                threshold,
                filter,
            });
            run(&step, &mut p, false)?;
        }

        SubCommand::CopyAttributes {
            project,
            attribute,
            horizon,
            filter,
            save: save_args,
        } => {
            let mut p = open(&project)?;
            let step = CopyAttributes::new(CopyAttributesArgs {
                collection: project.collection(),
                attribute: Some(attribute),
                horizon: Some(horizon),
                filter,
            });
            let report = run(&step, &mut p, false)?;
            save(&p, &project, &save_args, report.as_ref())?;
        }

        SubCommand::FindUserHistory {
            project,
            user,
            action,
        } => {
            let mut p = open(&project)?;
            let step = FindUserHistory::new(FindUserHistoryArgs {
                collection: project.collection(),
                user,
                action,
            });
            run(&step, &mut p, false)?;
        }

        SubCommand::SetColor {
            project,
            reference,
            no_color,
            no_symbol,
            filter,
            save: save_args,
        } => {
            let mut p = open(&project)?;
            let step = SetPresentation::new(SetPresentationArgs {
                collection: project.collection(),
                reference: Some(reference),
                set_color: no_color.then_some(false),
                set_symbol: no_symbol.then_some(false),
                filter,
            });
            let report = run(&step, &mut p, false)?;
            save(&p, &project, &save_args, report.as_ref())?;
        }
    }

    Ok(())
}
