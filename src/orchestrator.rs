// Copyright (C) Brian G. Milnes 2025

//! Orchestrator: select, parse, match, rewrite, format, write, per file
//!
//! A failure inside one file is logged and the walk moves on; only a
//! traversal error stops the run.

pub mod orchestrator {
    use crate::config::config::Config;
    use crate::formatter::formatter::format_source;
    use crate::logging::logging::ToolLogger;
    use crate::matcher::matcher::match_rules;
    use crate::parser::parser::SourceTree;
    use crate::rewriter::rewriter::rewrite;
    use crate::selector::selector::candidate_files;
    use crate::writer::writer::write_with_backup;
    use anyhow::{Context, Result};
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::fs::File;
    use std::io::Read;
    use std::path::Path;

    /// What happened to one candidate file
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FileOutcome {
        /// No import matched, or the rewrite reproduced the input
        Unchanged,
        Rewritten { substitutions: usize },
        /// Dry run: the file would have been rewritten
        WouldRewrite { substitutions: usize },
    }

    #[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RunSummary {
        pub scanned: usize,
        pub rewritten: usize,
        pub unchanged: usize,
        pub failed: usize,
        pub substitutions: usize,
        pub dry_run: bool,
    }

    impl RunSummary {
        fn record(&mut self, outcome: FileOutcome) {
            match outcome {
                FileOutcome::Unchanged => self.unchanged += 1,
                FileOutcome::Rewritten { substitutions } | FileOutcome::WouldRewrite { substitutions } => {
                    self.rewritten += 1;
                    self.substitutions += substitutions;
                }
            }
        }
    }

    impl fmt::Display for RunSummary {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let verb = if self.dry_run { "would rewrite" } else { "rewrote" };
            write!(
                f,
                "Summary: {} files scanned, {} {} file(s) ({} imports), {} unchanged, {} failed",
                self.scanned, verb, self.rewritten, self.substitutions, self.unchanged, self.failed
            )
        }
    }

    /// Rewrite every candidate file under `root`
    pub fn rewrite_tree(root: &Path, config: &Config, logger: &mut ToolLogger) -> Result<RunSummary> {
        let mut summary = RunSummary {
            dry_run: config.dry_run,
            ..RunSummary::default()
        };

        for candidate in candidate_files(root, &config.selection) {
            let path = candidate?;
            summary.scanned += 1;

            match rewrite_file(&path, config) {
                Ok(outcome) => {
                    match outcome {
                        FileOutcome::Rewritten { substitutions } => {
                            logger.log(&format!("{}: rewrote {} import(s)", path.display(), substitutions));
                        }
                        FileOutcome::WouldRewrite { substitutions } => {
                            logger.log(&format!("{}: would rewrite {} import(s)", path.display(), substitutions));
                        }
                        FileOutcome::Unchanged => {}
                    }
                    summary.record(outcome);
                }
                Err(e) => {
                    summary.failed += 1;
                    logger.error(&format!("rewrite import fails with {} due to {:#}", path.display(), e));
                }
            }
        }

        Ok(summary)
    }

    /// Run the whole pipeline on one file
    pub fn rewrite_file(path: &Path, config: &Config) -> Result<FileOutcome> {
        let mut file = File::open(path).context("open")?;
        let perm = file.metadata().context("stat")?.permissions();
        let mut original = Vec::new();
        file.read_to_end(&mut original).context("read")?;
        drop(file);

        let text = String::from_utf8(original.clone()).context("source is not UTF-8")?;
        let tree = SourceTree::parse(text)?;

        let imports = tree.imports();
        let substitutions = match_rules(imports.iter().flatten(), &config.rules);
        if substitutions.is_empty() {
            return Ok(FileOutcome::Unchanged);
        }

        let edited = rewrite(tree, &substitutions)?;
        let formatted = format_source(&edited)?;
        if formatted.as_bytes() == original.as_slice() {
            return Ok(FileOutcome::Unchanged);
        }

        if config.dry_run {
            return Ok(FileOutcome::WouldRewrite {
                substitutions: substitutions.len(),
            });
        }

        write_with_backup(path, &original, &perm, formatted.as_bytes())?;
        Ok(FileOutcome::Rewritten {
            substitutions: substitutions.len(),
        })
    }
}
