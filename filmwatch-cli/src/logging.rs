//! Console logger for the CLI.
//!
//! Info and debug lines go to stdout, warnings and errors to stderr with a
//! coloured prefix. With a log file every line is also appended there with
//! ANSI codes stripped.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use owo_colors::OwoColorize;
use owo_colors::Stream::{Stderr, Stdout};

pub(crate) struct CliLogger {
    level: LevelFilter,
    timestamps: bool,
    file: Option<Mutex<File>>,
}

impl CliLogger {
    pub(crate) fn new(quiet: bool, verbose: bool, logfile: Option<&Path>) -> std::io::Result<Self> {
        let level = if quiet {
            LevelFilter::Warn
        } else if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        let file = match logfile {
            Some(path) => Some(Mutex::new(File::create(path)?)),
            None => None,
        };
        Ok(Self {
            level,
            timestamps: verbose,
            file,
        })
    }

    /// Install as the global logger.
    pub(crate) fn install(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    fn format(&self, record: &Record) -> String {
        let prefix = match record.level() {
            Level::Error => format!("{} ", "error:".if_supports_color(Stderr, |t| t.red())),
            Level::Warn => format!("{} ", "warning:".if_supports_color(Stderr, |t| t.yellow())),
            Level::Info => String::new(),
            Level::Debug | Level::Trace => {
                format!("{} ", "debug:".if_supports_color(Stdout, |t| t.dimmed()))
            }
        };
        if self.timestamps {
            let now = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
            format!(
                "{} {}{}",
                now.if_supports_color(Stdout, |t| t.dimmed()),
                prefix,
                record.args()
            )
        } else {
            format!("{}{}", prefix, record.args())
        }
    }
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format(record);

        // Write failures are ignored.
        if record.level() <= Level::Warn {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
        } else {
            let _ = writeln!(std::io::stdout().lock(), "{}", line);
        }

        if let Some(file) = &self.file
            && let Ok(mut f) = file.lock()
        {
            let plain = strip_ansi_escapes::strip(line.as_bytes());
            let _ = f.write_all(&plain);
            let _ = f.write_all(b"\n");
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        if let Some(file) = &self.file
            && let Ok(mut f) = file.lock()
        {
            let _ = f.flush();
        }
    }
}

/// Print an empty info line.
pub(crate) fn log_blank() {
    log::info!("");
}
