//! Logger setup.
//!
//! Every record is a single line, `[LEVEL] target: message`, where the target
//! names the subsystem (`lumen::window`, `lumen::gl`, `lumen::shader`,
//! `lumen::io`).  Errors go to stderr, everything else to stdout.

use log::{Level, LevelFilter, Record};

/// Render one record the way [`init`] prints it.  Multi-line messages are
/// joined with `" | "` so a record never spans more than one line.
pub fn format_record(level: Level, target: &str, message: &std::fmt::Arguments) -> String {
    let message = message.to_string();
    if message.contains('\n') {
        let joined = message
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" | ");
        format!("[{level}] {target}: {joined}")
    } else {
        format!("[{level}] {target}: {message}")
    }
}

/// Install the global logger.  Returns an error if a logger is already set.
pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record: &Record| {
            out.finish(format_args!(
                "{}",
                format_record(record.level(), record.target(), message)
            ))
        })
        .level(level)
        // winit and glutin are chatty below warn
        .level_for("winit", LevelFilter::Warn)
        .level_for("glutin", LevelFilter::Warn)
        .chain(
            fern::Dispatch::new()
                .filter(|meta| meta.level() == Level::Error)
                .chain(std::io::stderr()),
        )
        .chain(
            fern::Dispatch::new()
                .filter(|meta| meta.level() != Level::Error)
                .chain(std::io::stdout()),
        )
        .apply()
}
