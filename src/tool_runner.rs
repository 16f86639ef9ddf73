// Copyright (C) Brian G. Milnes 2025

//! Tool runner infrastructure for the import-rewrite binary
//!
//! Wraps a run with timing, directory context for Emacs compile-mode and
//! optional file logging. A quiet run prints nothing on stdout.

pub mod tool_runner {
    use std::fmt::Display;
    use std::time::Instant;
    use std::path::PathBuf;
    use anyhow::Result;
    use crate::logging::logging::ToolLogger;

    /// Configuration for a tool run
    pub struct ToolConfig {
        /// Name of the tool (for logging directory)
        pub tool_name: String,
        /// Base directory to display in "Entering directory"
        pub base_dir: PathBuf,
        /// Whether to enable file logging
        pub enable_logging: bool,
        /// Print context, progress and summary on stdout
        pub verbose: bool,
    }

    impl ToolConfig {
        pub fn new(tool_name: &str, base_dir: PathBuf) -> Self {
            ToolConfig {
                tool_name: tool_name.to_string(),
                base_dir,
                enable_logging: false,
                verbose: false,
            }
        }

        pub fn with_logging(mut self, enable_logging: bool) -> Self {
            self.enable_logging = enable_logging;
            self
        }

        pub fn with_verbose(mut self, verbose: bool) -> Self {
            self.verbose = verbose;
            self
        }
    }

    /// Run a tool with standard timing, context, and optional logging
    ///
    /// The closure's summary is printed at the end of a verbose run and handed back.
    pub fn run_tool<F, T>(config: ToolConfig, tool_fn: F) -> Result<T>
    where
        F: FnOnce(&mut ToolLogger) -> Result<T>,
        T: Display,
    {
        let start = Instant::now();

        let logger = if config.enable_logging {
            ToolLogger::new(&config.tool_name)
        } else {
            ToolLogger::new_disabled()
        };
        let mut logger = logger.quiet(!config.verbose);

        logger.log(&format!("Entering directory '{}'", config.base_dir.display()));
        logger.log("");

        let summary = tool_fn(&mut logger)?;
        let summary_text = summary.to_string();

        logger.log("");
        logger.log(&summary_text);
        logger.log(&format!("Completed in {}ms", start.elapsed().as_millis()));

        if config.enable_logging {
            logger.finalize(&summary_text);
        }

        Ok(summary)
    }
}
