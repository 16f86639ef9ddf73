// Copyright (C) Brian G. Milnes 2025

//! import-rewrite - AST-based bulk rewriting of Rust `use` declarations
//!
//! Given an old path prefix and a new one, every `use` declaration under a
//! directory whose path starts with the old prefix is rewritten to the new
//! one, aliases kept. Files are parsed with ra_ap_syntax, rewritten, put in
//! canonical form and written back behind a backup that restores the
//! original if the write fails.

pub mod ast_utils;
pub mod use_tree;
pub mod parser;
pub mod config;
pub mod selector;
pub mod matcher;
pub mod rewriter;
pub mod formatter;
pub mod writer;
pub mod orchestrator;
pub mod logging;
pub mod tool_runner;

// Re-export commonly used items
pub use parser::parser::{DeclId, ImportDecl, ParseError, SourceTree, UseItem};
pub use use_tree::use_tree::{flatten, split_path, TreeLayout, UseLeaf};
pub use config::config::{Config, Rule, RuleSet, SelectionPolicy};
pub use selector::selector::candidate_files;
pub use matcher::matcher::{best_rule, match_rules, PendingSubstitution};
pub use rewriter::rewriter::{rewrite, ImportEditor, RewriteError};
pub use formatter::formatter::{format_source, FormatError};
pub use writer::writer::{write_with_backup, write_with_backup_using, WriteError};
pub use orchestrator::orchestrator::{rewrite_file, rewrite_tree, FileOutcome, RunSummary};
pub use logging::logging::ToolLogger;
pub use tool_runner::tool_runner::{run_tool, ToolConfig};
