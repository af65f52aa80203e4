use crate::domain::models::{DumpSettings, RunDefinition};
use std::path::PathBuf;

pub const DEFAULT_ROOT: &str = "..";
pub const DEFAULT_OUTPUT_DIR: &str = "Output";

pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    ".git",
    ".build",
    "DerivedData",
    "Assets.xcassets",
    "CardSampleGame.xcodeproj",
    ".xcworkspace",
    ".idea",
    "__pycache__",
    "DevTools",
    "Output",
    ".swiftpm",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn default_settings() -> DumpSettings {
    DumpSettings {
        root: PathBuf::from(DEFAULT_ROOT),
        output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        ignore_dirs: DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn default_runs() -> Vec<RunDefinition> {
    vec![
        RunDefinition {
            name: "code".to_string(),
            output_file: "PROJECT_CODE_DUMP.txt".to_string(),
            extensions: strings(&[".swift"]),
            ignore_dirs: Vec::new(),
            include_paths: strings(&[
                "Packages",
                "Sources",
                "App",
                "ViewModels",
                "Views",
                "Models",
                "Utilities",
            ]),
            exclude_paths: strings(&[
                "Tests",
                "CardSampleGameTests",
                "Packages/TwilightEngine/Tests",
            ]),
        },
        RunDefinition {
            name: "data".to_string(),
            output_file: "DATA_DUMP.txt".to_string(),
            extensions: strings(&[".json"]),
            ignore_dirs: Vec::new(),
            include_paths: Vec::new(),
            exclude_paths: strings(&["DerivedData", ".swiftpm"]),
        },
        RunDefinition {
            name: "tests".to_string(),
            output_file: "TESTS_DUMP.txt".to_string(),
            extensions: strings(&[".swift"]),
            ignore_dirs: Vec::new(),
            include_paths: strings(&["CardSampleGameTests", "Packages/TwilightEngine/Tests"]),
            exclude_paths: Vec::new(),
        },
        RunDefinition {
            name: "docs".to_string(),
            output_file: "DOCS_DUMP.txt".to_string(),
            extensions: strings(&[".md", ".txt"]),
            ignore_dirs: Vec::new(),
            include_paths: Vec::new(),
            exclude_paths: strings(&["DevTools/Output"]),
        },
    ]
}

/// Picks the named runs in the order given. An empty selection means every run.
pub fn select_runs(
    runs: Vec<RunDefinition>,
    only: &[String],
) -> anyhow::Result<Vec<RunDefinition>> {
    if only.is_empty() {
        return Ok(runs);
    }

    let mut selected = Vec::with_capacity(only.len());
    for name in only {
        match runs.iter().find(|run| &run.name == name) {
            Some(run) => selected.push(run.clone()),
            None => {
                let known: Vec<&str> = runs.iter().map(|r| r.name.as_str()).collect();
                anyhow::bail!("Unknown run '{}' (known runs: {})", name, known.join(", "));
            }
        }
    }
    Ok(selected)
}
