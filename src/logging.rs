// Copyright (C) Brian G. Milnes 2025

//! Logging infrastructure for import-rewrite
//!
//! Diagnostics always go to stderr. Progress messages go to stdout unless the
//! logger is quiet. When file logging is on, everything is mirrored to:
//! - logs/<tool-name>/<date>/run-<timestamp>.log

pub mod logging {
    use std::fs;
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use chrono::{Local, DateTime};
    use anyhow::Result;

    /// Directory, relative to the working directory, that holds tool logs
    pub const LOG_ROOT: &str = "logs";

    /// Logger for a tool run
    pub struct ToolLogger {
        log_file: Option<fs::File>,
        log_path: Option<PathBuf>,
        start_time: DateTime<Local>,
        quiet: bool,
    }

    impl ToolLogger {
        /// Create a disabled logger (no file output)
        pub fn new_disabled() -> Self {
            ToolLogger {
                log_file: None,
                log_path: None,
                start_time: Local::now(),
                quiet: false,
            }
        }

        /// Create a logger writing under `logs/<tool-name>/`
        pub fn new(tool_name: &str) -> Self {
            Self::in_dir(Path::new(LOG_ROOT), tool_name)
        }

        /// Create a logger writing under `<base>/<tool-name>/<YYYY-MM-DD>/run-<HH-MM-SS>.log`
        ///
        /// If log creation fails, continues without logging (degrades gracefully)
        pub fn in_dir(base: &Path, tool_name: &str) -> Self {
            let start_time = Local::now();

            let (log_file, log_path) = match Self::create_log_file(base, tool_name, &start_time) {
                Ok((file, path)) => (Some(file), Some(path)),
                Err(e) => {
                    eprintln!("Warning: Could not create log file: {e}");
                    eprintln!("Continuing without logging...");
                    (None, None)
                }
            };

            ToolLogger {
                log_file,
                log_path,
                start_time,
                quiet: false,
            }
        }

        /// Keep progress messages off stdout; diagnostics still reach stderr
        pub fn quiet(mut self, quiet: bool) -> Self {
            self.quiet = quiet;
            self
        }

        fn create_log_file(base: &Path, tool_name: &str, start_time: &DateTime<Local>) -> Result<(fs::File, PathBuf)> {
            let date_str = start_time.format("%Y-%m-%d").to_string();
            let time_str = start_time.format("%H-%M-%S").to_string();

            let log_dir = base.join(tool_name).join(&date_str);
            fs::create_dir_all(&log_dir)?;

            let log_path = log_dir.join(format!("run-{time_str}.log"));
            let log_file = fs::File::create(&log_path)?;

            Ok((log_file, log_path))
        }

        /// Log a progress message to stdout and the log file
        pub fn log(&mut self, message: &str) {
            if !self.quiet {
                println!("{message}");
            }
            self.log_silent(message);
        }

        /// Log without printing (log file only)
        pub fn log_silent(&mut self, message: &str) {
            if let Some(ref mut file) = self.log_file {
                let _ = writeln!(file, "{message}");
            }
        }

        /// Report a failure on stderr and in the log file, timestamped there
        pub fn error(&mut self, message: &str) {
            eprintln!("{message}");
            let stamp = Local::now().format("%Y/%m/%d %H:%M:%S");
            self.log_silent(&format!("{stamp} {message}"));
        }

        /// Get the path to the log file (if logging is enabled)
        pub fn log_path(&self) -> Option<&Path> {
            self.log_path.as_deref()
        }

        /// Finalize the log with summary information
        pub fn finalize(&mut self, summary: &str) {
            let end_time = Local::now();
            let duration = end_time.signed_duration_since(self.start_time);

            self.log_silent("");
            self.log_silent("=== Run Summary ===");
            self.log_silent(summary);
            self.log_silent(&format!("Started: {}", self.start_time.format("%Y-%m-%d %H:%M:%S")));
            self.log_silent(&format!("Ended: {}", end_time.format("%Y-%m-%d %H:%M:%S")));
            self.log_silent(&format!("Duration: {}ms", duration.num_milliseconds()));

            if let Some(path) = self.log_path.clone() {
                self.log(&format!("Log saved to: {}", path.display()));
            }
        }
    }

    impl Drop for ToolLogger {
        fn drop(&mut self) {
            if let Some(ref mut file) = self.log_file {
                let _ = file.flush();
            }
        }
    }
}
