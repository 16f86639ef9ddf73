// Copyright (C) Brian G. Milnes 2025

//! Rewrite Rust `use` declarations that start with a prefix
//!
//! Usage:
//!   import-rewrite -d src -s old_crate::net -r new_crate::transport
//!   import-rewrite -s old_crate -r new_crate --dry-run -v
//!
//! Binary: import-rewrite

use anyhow::Result;
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, ValueEnum};
use import_rewrite::{rewrite_tree, run_tool, Config, RuleSet, ToolConfig};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SummaryFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "import-rewrite")]
#[command(about = "Rewrite Rust use declarations that start with a prefix", long_about = None)]
struct Args {
    /// Source code directory to handle
    #[arg(short = 'd', long = "dir", default_value = "./")]
    dir: PathBuf,

    /// Import path prefix to replace
    #[arg(short = 's', long = "source", value_parser = NonEmptyStringValueParser::new())]
    source: String,

    /// Import path prefix to put in its place
    #[arg(short = 'r', long = "replace", value_parser = NonEmptyStringValueParser::new())]
    replace: String,

    /// Dry run - show what would be changed without modifying files
    #[arg(long)]
    dry_run: bool,

    /// Print directory context, rewritten files and a summary
    #[arg(short, long)]
    verbose: bool,

    /// Summary format; json prints the summary alone on stdout
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    format: SummaryFormat,

    /// Mirror output into logs/import-rewrite/<date>/run-<time>.log
    #[arg(long)]
    log: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let rules = RuleSet::single(&args.source, &args.replace)?;
    let config = Config::new(rules).with_dry_run(args.dry_run);

    let tool_config = ToolConfig::new("import-rewrite", args.dir.clone())
        .with_logging(args.log)
        .with_verbose(args.verbose && args.format == SummaryFormat::Text);

    let summary = run_tool(tool_config, |logger| rewrite_tree(&args.dir, &config, logger))?;

    if args.format == SummaryFormat::Json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
