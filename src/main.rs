use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use vessel_export::batch;
use vessel_export::config::{self, AppConfig};
use vessel_export::engine::{NativeEngine, ProcessSupervisor};
use vessel_export::export::{ExportContext, ExportOptions, VesselExporter};
use vessel_export::logging;
use vessel_export::model::{BatchSummary, VesselName};
use vessel_export::owners::OwnerDirectory;
use vessel_export::paths::{SystemCalendar, sanitize_owner_folder};
use vessel_export::request::{self, ExportCategory};
use vessel_export::{Result, ToolError};

/// Exit status of a strict run in which at least one vessel failed.
const EXIT_STRICT_FAILURE: i32 = 2;

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::default_config()?,
    };
    logging::init_logging(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Run(args) => execute_run(&config, args),
        Command::Prompt => execute_prompt(&config),
        Command::Owner(args) => execute_owner(&config, args),
    }
}

fn execute_run(config: &AppConfig, args: RunArgs) -> Result<i32> {
    let vessels: Vec<VesselName> = args
        .vessels
        .iter()
        .flat_map(|input| request::parse_vessel_list(input))
        .collect();
    let categories: Vec<ExportCategory> = args
        .categories
        .into_iter()
        .map(ExportCategory::from)
        .collect();
    let sheets = request::sheets_for(&categories);
    let strict = args.strict || config.export.strict;

    match export_batch(config, &vessels, &sheets, strict) {
        Ok(summary) => {
            print_summary(&summary, args.json)?;
            if strict && summary.failed > 0 {
                Ok(EXIT_STRICT_FAILURE)
            } else {
                Ok(0)
            }
        }
        Err(ToolError::NoValidInput(reason)) if args.json => {
            let response = serde_json::json!({ "status": "error", "message": reason });
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(1)
        }
        Err(error) => Err(error),
    }
}

fn execute_prompt(config: &AppConfig) -> Result<i32> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let vessel_input = ask(
        &mut lines,
        "Enter vessel name(s), comma-separated (e.g. FRONT CHEETAH, AAL BRISBANE): ",
    )?;
    let vessels = request::parse_vessel_list(&vessel_input);

    println!("\nSelect the sheets to export:\n{}", request::MENU);
    let choice = ask(&mut lines, "Enter choice numbers (comma separated, e.g. 1,2): ")?;
    let sheets = request::sheets_for(&request::parse_menu_selection(&choice));

    let summary = export_batch(config, &vessels, &sheets, config.export.strict)?;
    print_summary(&summary, false)?;
    Ok(0)
}

fn execute_owner(config: &AppConfig, args: OwnerArgs) -> Result<i32> {
    let vessel = VesselName::new(&args.vessel)
        .ok_or_else(|| ToolError::NoValidInput("empty vessel name".into()))?;
    let owners = OwnerDirectory::load(&config.owner_map.path, &config.owner_map.columns())?;
    let owner = owners.lookup(vessel.as_str());
    let note = if owners.contains(vessel.as_str()) {
        ""
    } else {
        " (not in owner map)"
    };
    println!(
        "{vessel}: owner '{owner}', folder '{}'{note}",
        sanitize_owner_folder(owner)
    );
    Ok(0)
}

fn export_batch(
    config: &AppConfig,
    vessels: &[VesselName],
    sheets: &[String],
    strict: bool,
) -> Result<BatchSummary> {
    batch::ensure_valid_input(vessels, sheets)?;

    let owners = OwnerDirectory::load(&config.owner_map.path, &config.owner_map.columns())?;
    let layout = config.output_layout();
    let calendar = SystemCalendar;
    let context = ExportContext {
        owners: &owners,
        layout: &layout,
        calendar: &calendar,
        input_dir: &config.paths.input_dir,
        options: ExportOptions { strict },
    };
    let supervisor = ProcessSupervisor::new(config.engine.stray_processes.clone());
    let mut exporter = VesselExporter::new(context, NativeEngine::new(), supervisor);

    batch::run_batch(&mut exporter, vessels, sheets)
}

fn print_summary(summary: &BatchSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    for result in &summary.results {
        println!("\n--- {} (owner: {}) ---", result.vessel, result.owner);
        println!("status: {}", result.status);
        for report in &result.sheets {
            println!("  {}: {}", report.sheet, report.outcome);
        }
        if let Some(pdf) = &result.merged_pdf {
            println!("  merged PDF: {}", pdf.display());
        }
        for write in result.backups.iter().filter(|write| write.outcome.is_produced()) {
            println!("  backup: {}", write.destination.display());
        }
    }
    println!("\n{}", summary.message());
    Ok(())
}

fn ask<I>(lines: &mut I, prompt: &str) -> Result<String>
where
    I: Iterator<Item = io::Result<String>>,
{
    print!("{prompt}");
    io::stdout().flush()?;
    Ok(lines.next().transpose()?.unwrap_or_default())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Export vessel report sheets into owner folders as merged PDFs and backup workbooks."
)]
struct Cli {
    /// Configuration file (TOML). Built-in defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit debug logs for the exporter.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export the selected categories for one or more vessels.
    Run(RunArgs),
    /// Ask for vessels and categories on the terminal, then export.
    Prompt,
    /// Show the owner and owner folder resolved for a vessel.
    Owner(OwnerArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Vessel name. Repeat the flag or separate names with commas.
    #[arg(long = "vessel", required = true)]
    vessels: Vec<String>,

    /// Output category to export. Repeat for several.
    #[arg(long = "category", value_enum, required = true)]
    categories: Vec<CategoryArg>,

    /// Treat a missing source workbook or sheet as a failure.
    #[arg(long)]
    strict: bool,

    /// Print the batch summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct OwnerArgs {
    /// Vessel name to resolve.
    vessel: String,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum CategoryArg {
    Reporting,
    Eua,
    FuelEu,
    Backup,
    All,
}

impl From<CategoryArg> for ExportCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Reporting => ExportCategory::Reporting,
            CategoryArg::Eua => ExportCategory::Eua,
            CategoryArg::FuelEu => ExportCategory::FuelEu,
            CategoryArg::Backup => ExportCategory::Backup,
            CategoryArg::All => ExportCategory::All,
        }
    }
}
