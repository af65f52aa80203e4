use crossterm::{
    ExecutableCommand,
    style::{Color, ResetColor, SetForegroundColor, Stylize},
};
use env_logger::Builder;
use log::{Level, debug, info};
use std::io::{self, Write};

pub const LOG_LEVEL_ENV: &str = "TREE_DUMP_LOG_LEVEL";

pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    }
}

pub fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug => Color::Cyan,
        Level::Trace => Color::Magenta,
    }
}

/// Log lines go to stderr as `<timestamp> <LEVEL> tree-dump: <message>`, so
/// dumps printed with `--stdout` stay clean.
pub fn setup_logger(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let env = env_logger::Env::default().filter_or(LOG_LEVEL_ENV, level_for_verbosity(verbosity));

    Builder::from_env(env)
        .format(|buf, record| {
            let level = format!("{:<5}", record.level()).with(level_color(record.level()));
            writeln!(
                buf,
                "{} {} tree-dump: {}",
                buf.timestamp(),
                level,
                record.args()
            )
        })
        .format_timestamp_secs()
        .target(env_logger::Target::Stderr)
        .try_init()
}

pub fn print_banner() -> io::Result<()> {
    let mut stdout = io::stdout();

    stdout.execute(SetForegroundColor(Color::Cyan))?;
    writeln!(
        stdout,
        "🗂  tree-dump v{} · flat text dumps for project review",
        env!("CARGO_PKG_VERSION")
    )?;
    stdout.execute(ResetColor)?;

    debug!("Debug logging enabled");
    info!("Starting tree-dump...");
    Ok(())
}
