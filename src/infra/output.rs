use crate::core::aggregator::aggregate;
use crate::domain::models::{DumpSettings, DumpSummary, RunDefinition};
use crate::infra::file_system::read_file_contents;
use anyhow::Context;
use crossterm::{
    ExecutableCommand,
    style::{Color, ResetColor, SetForegroundColor},
};
use log::{debug, info};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub trait DumpWriter {
    fn write_run(&self, settings: &DumpSettings, run: &RunDefinition)
    -> anyhow::Result<DumpSummary>;
}

/// Writes each run to its own file under the output directory, truncating
/// whatever was there before.
pub struct FileDumpWriter;

impl DumpWriter for FileDumpWriter {
    fn write_run(
        &self,
        settings: &DumpSettings,
        run: &RunDefinition,
    ) -> anyhow::Result<DumpSummary> {
        ensure_output_dir(&settings.output_dir)?;

        let path = settings.output_path(run);
        debug!("Writing dump to file: {}", path.display());
        let file = File::create(&path)
            .with_context(|| format!("Failed to create dump file {}", path.display()))?;
        let mut out = BufWriter::new(file);

        let summary = aggregate(settings, run, &mut out, read_file_contents)
            .with_context(|| format!("Failed to write dump file {}", path.display()))?;
        out.flush()
            .with_context(|| format!("Failed to flush dump file {}", path.display()))?;

        info!("Dump written to file: {}", path.display());
        Ok(summary)
    }
}

pub struct ConsoleDumpWriter;

impl DumpWriter for ConsoleDumpWriter {
    fn write_run(
        &self,
        settings: &DumpSettings,
        run: &RunDefinition,
    ) -> anyhow::Result<DumpSummary> {
        debug!("Writing dump '{}' to console", run.name);
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let summary = aggregate(settings, run, &mut out, read_file_contents)?;
        out.flush()?;
        Ok(summary)
    }
}

pub fn create_writer(to_stdout: bool) -> Box<dyn DumpWriter> {
    if to_stdout {
        Box::new(ConsoleDumpWriter) as Box<dyn DumpWriter>
    } else {
        Box::new(FileDumpWriter) as Box<dyn DumpWriter>
    }
}

pub fn ensure_output_dir(dir: &Path) -> anyhow::Result<()> {
    if !dir.is_dir() {
        debug!("Creating output directory: {}", dir.display());
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }
    Ok(())
}

pub fn print_run_started(run: &RunDefinition) -> io::Result<()> {
    let mut stdout = io::stdout();
    writeln!(
        stdout,
        "📦 Collecting {} (extensions: {})...",
        run.output_file,
        run.extensions.join(", ")
    )
}

pub fn print_summary(summary: &DumpSummary) -> io::Result<()> {
    let mut stdout = io::stdout();

    let color = if summary.read_errors > 0 || summary.missing_paths > 0 {
        Color::Yellow
    } else {
        Color::Green
    };
    stdout.execute(SetForegroundColor(color))?;
    write!(
        stdout,
        "   {}: {} files written",
        summary.run_name, summary.files_written
    )?;
    if summary.read_errors > 0 {
        write!(stdout, ", {} unreadable", summary.read_errors)?;
    }
    if summary.missing_paths > 0 {
        write!(stdout, ", {} paths not found", summary.missing_paths)?;
    }
    stdout.execute(ResetColor)?;
    writeln!(stdout, " -> {}", summary.output_path.display())
}

pub fn print_done(output_dir: &Path, dump_count: usize) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(SetForegroundColor(Color::Green))?;
    writeln!(
        stdout,
        "\n✅ Done! {} dump files written to {}",
        dump_count,
        output_dir.display()
    )?;
    stdout.execute(ResetColor)?;
    Ok(())
}
