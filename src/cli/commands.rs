use crate::domain::models::{DumpSettings, DumpSummary, RunDefinition};
use crate::domain::presets::{default_runs, default_settings, select_runs};
use crate::infra::logger::{print_banner, setup_logger};
use crate::infra::output::{create_writer, print_done, print_run_started, print_summary};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tree-dump", version)]
#[command(about = "Concatenate filtered project files into flat text dumps", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write every dump (the default when no command is given)
    Collect(CollectArgs),
    /// Show the built-in run definitions
    List,
}

#[derive(Args, Debug, Default)]
pub struct CollectArgs {
    /// Project directory to scan [default: ..]
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Directory receiving the dump files [default: Output]
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Comma-separated run names to execute, e.g. code,docs
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Print dumps to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logger(cli.verbose)?;

    match cli.command.unwrap_or(Commands::Collect(CollectArgs::default())) {
        Commands::Collect(args) => {
            info!("Starting collect command");
            debug!("Command parameters: {:?}", args);

            let settings = settings_from_args(&args);
            let runs = select_runs(default_runs(), &args.only)?;

            if !args.stdout {
                print_banner()?;
            }
            collect(&settings, &runs, args.stdout)?;
        }
        Commands::List => list_runs(&default_runs(), &mut io::stdout())?,
    }
    Ok(())
}

fn settings_from_args(args: &CollectArgs) -> DumpSettings {
    let mut settings = default_settings();
    if let Some(root) = &args.root {
        settings.root = root.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        settings.output_dir = output_dir.clone();
    }
    settings
}

/// Runs each definition in turn. Unreadable files never stop a run; only a
/// failure to produce the output itself is returned as an error.
pub fn collect(
    settings: &DumpSettings,
    runs: &[RunDefinition],
    to_stdout: bool,
) -> anyhow::Result<Vec<DumpSummary>> {
    info!(
        "Collecting {} dumps from {}",
        runs.len(),
        settings.root.display()
    );
    let writer = create_writer(to_stdout);
    let mut summaries = Vec::with_capacity(runs.len());

    for run in runs {
        if !to_stdout {
            print_run_started(run)?;
        }
        let summary = writer.write_run(settings, run)?;
        if !to_stdout {
            print_summary(&summary)?;
        }
        summaries.push(summary);
    }

    if !to_stdout {
        print_done(&settings.output_dir, summaries.len())?;
    }
    Ok(summaries)
}

fn list_runs<W: Write>(runs: &[RunDefinition], out: &mut W) -> io::Result<()> {
    for run in runs {
        writeln!(out, "{} -> {}", run.name, run.output_file)?;
        writeln!(out, "    extensions: {}", run.extensions.join(", "))?;
        if !run.include_paths.is_empty() {
            writeln!(out, "    include:    {}", run.include_paths.join(", "))?;
        }
        if !run.exclude_paths.is_empty() {
            writeln!(out, "    exclude:    {}", run.exclude_paths.join(", "))?;
        }
    }
    Ok(())
}
