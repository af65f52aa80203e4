use crate::core::filters::{PathFilter, is_ignored_dir, matches_extension};
use crate::domain::models::{DumpEntry, DumpPlan, DumpSettings, DumpSummary, RunDefinition};
use crate::infra::file_system::{DirWalk, relative_path};
use log::{debug, info, warn};
use std::fs;
use std::io::Write;
use std::path::Path;

const INDENT: &str = "    ";
const RULE: &str = "// ==========================================";

fn describe_source(root: &Path, include_paths: &[String]) -> String {
    let root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    if include_paths.is_empty() {
        root.display().to_string()
    } else {
        format!("{} (paths: {})", root.display(), include_paths.join(", "))
    }
}

/// Root-relative path of the output directory when it sits inside the
/// scanned tree. The walk prunes it so dumps never pick up earlier dumps.
fn output_dir_within_root(root: &Path, output_dir: &Path) -> Option<String> {
    let root = fs::canonicalize(root).ok()?;
    let output_dir = fs::canonicalize(output_dir).ok()?;
    if !output_dir.starts_with(&root) {
        return None;
    }
    let rel = relative_path(&root, &output_dir);
    (!rel.is_empty()).then_some(rel)
}

/// Walks the tree once and records every directory and matching file in
/// emission order.
pub fn build_plan(settings: &DumpSettings, run: &RunDefinition) -> DumpPlan {
    let root = settings.root.as_path();
    let filter = PathFilter::new(&run.include_paths, &run.exclude_paths);
    let ignored = settings.effective_ignore_dirs(run);

    let mut plan = DumpPlan {
        source: describe_source(root, filter.include_paths()),
        ..DumpPlan::default()
    };

    if !root.is_dir() {
        warn!("Scan root not found: {}", root.display());
        plan.missing.push(root.display().to_string());
        return plan;
    }

    for include in filter.include_paths() {
        if !root.join(include).is_dir() {
            warn!("Include path not found under root: {}", include);
            plan.missing.push(include.clone());
        }
    }

    let output_rel = output_dir_within_root(root, &settings.output_dir);
    if let Some(rel) = &output_rel {
        debug!("Output directory lies inside the root, skipping: {}", rel);
    }

    let walk = DirWalk::new(root, |rel, name| {
        !is_ignored_dir(name, &ignored)
            && output_rel.as_deref() != Some(rel)
            && filter.should_descend(rel)
    });

    for visit in walk {
        // Top-level directories sit at level 0, as do files in the root.
        let level = visit.depth.saturating_sub(1);
        if !visit.rel_path.is_empty() {
            let name = visit
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| visit.rel_path.clone());
            plan.entries.push(DumpEntry::Directory { name, level });
        }

        if !filter.collects_files(&visit.rel_path) {
            continue;
        }

        for file_path in visit.files {
            // Lossy names are for display and matching only; reads go through `file_path`.
            let file_name = match file_path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };
            if !matches_extension(&file_name, &run.extensions) {
                continue;
            }
            let rel_path = if visit.rel_path.is_empty() {
                file_name.clone()
            } else {
                format!("{}/{}", visit.rel_path, file_name)
            };
            debug!("Found matching file: {}", rel_path);
            plan.entries.push(DumpEntry::File {
                path: file_path,
                name: file_name,
                level: level + 1,
                rel_path,
            });
        }
    }

    info!(
        "Planned {} files for run '{}'",
        plan.files().count(),
        run.name
    );
    plan
}

pub fn write_header<W: Write>(out: &mut W, source: &str) -> std::io::Result<()> {
    writeln!(out, "=== DUMP GENERATED ===")?;
    writeln!(out, "Source: {}", source)?;
    writeln!(out)
}

pub fn write_structure<W: Write>(out: &mut W, plan: &DumpPlan) -> std::io::Result<()> {
    writeln!(out, "=== FILE STRUCTURE ===")?;
    for entry in &plan.entries {
        match entry {
            DumpEntry::Directory { name, level } => {
                writeln!(out, "{}{}/", INDENT.repeat(*level), name)?
            }
            DumpEntry::File { name, level, .. } => {
                writeln!(out, "{}{}", INDENT.repeat(*level), name)?
            }
        }
    }
    for missing in &plan.missing {
        writeln!(out, "[directory not found: {}]", missing)?;
    }
    Ok(())
}

/// Writes every planned file in order. A file that cannot be read gets an
/// inline error marker instead of its content; returns (written, failed).
pub fn write_contents<W, R>(
    out: &mut W,
    plan: &DumpPlan,
    file_reader: R,
) -> std::io::Result<(usize, usize)>
where
    W: Write,
    R: Fn(&Path) -> anyhow::Result<String>,
{
    writeln!(out, "\n=== FILE CONTENTS ===")?;

    let mut written = 0;
    let mut failed = 0;
    for (path, rel_path) in plan.files() {
        writeln!(out, "\n{}", RULE)?;
        writeln!(out, "// FILE: {}", rel_path)?;
        writeln!(out, "{}\n", RULE)?;
        match file_reader(path.as_path()) {
            Ok(content) => {
                out.write_all(content.as_bytes())?;
                written += 1;
            }
            Err(e) => {
                warn!("Error reading file {}: {}", path.display(), e);
                write!(out, "// Error reading file: {}", e)?;
                failed += 1;
            }
        }
        writeln!(out)?;
    }
    Ok((written, failed))
}

/// Runs one aggregation into `out`: header, structure, then contents.
pub fn aggregate<W, R>(
    settings: &DumpSettings,
    run: &RunDefinition,
    out: &mut W,
    file_reader: R,
) -> std::io::Result<DumpSummary>
where
    W: Write,
    R: Fn(&Path) -> anyhow::Result<String>,
{
    debug!("Aggregating run '{}' from {}", run.name, settings.root.display());
    let plan = build_plan(settings, run);

    write_header(out, &plan.source)?;
    write_structure(out, &plan)?;
    let (files_written, read_errors) = write_contents(out, &plan, file_reader)?;

    Ok(DumpSummary {
        run_name: run.name.clone(),
        output_path: settings.output_path(run),
        files_listed: plan.files().count(),
        files_written,
        read_errors,
        missing_paths: plan.missing.len(),
    })
}
