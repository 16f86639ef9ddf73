// Copyright (C) Brian G. Milnes 2025

//! Run configuration: replacement rules and file selection policy
//!
//! Built once at startup and passed by reference to every stage.

pub mod config {
    use anyhow::{bail, Result};

    /// Directory names never descended into; `vendor` holds vendored dependencies
    pub const SKIPPED_DIRS: &[&str] = &["vendor", ".git"];

    /// Build output directory names, skipped only where they are build output
    pub const BUILD_DIRS: &[&str] = &["target"];

    /// Manifest marking a Cargo package root; its `target` is build output
    pub const CARGO_MANIFEST: &str = "Cargo.toml";

    /// Cache directory tag Cargo writes into its build directories
    pub const CACHEDIR_TAG: &str = "CACHEDIR.TAG";

    /// Suffix of Rust source files
    pub const SOURCE_SUFFIX: &str = ".rs";

    /// Generated-code file name suffixes: protobuf, flatbuffers, capnp, grpcio
    pub const GENERATED_SUFFIXES: &[&str] = &["pb.rs", "_generated.rs", "_capnp.rs", "_grpc.rs"];

    /// Replace a leading `old` in an import path with `new`
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Rule {
        pub old: String,
        pub new: String,
    }

    /// Ordered, immutable set of rules
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RuleSet {
        rules: Vec<Rule>,
    }

    impl RuleSet {
        pub fn new(rules: Vec<Rule>) -> Result<Self> {
            for rule in &rules {
                if rule.old.is_empty() || rule.new.is_empty() {
                    bail!("you must specify a source and destination import path");
                }
            }
            Ok(RuleSet { rules })
        }

        /// The single rule the command line supplies
        pub fn single(old: &str, new: &str) -> Result<Self> {
            Self::new(vec![Rule {
                old: old.to_string(),
                new: new.to_string(),
            }])
        }

        pub fn iter(&self) -> impl Iterator<Item = &Rule> {
            self.rules.iter()
        }

        pub fn len(&self) -> usize {
            self.rules.len()
        }

        pub fn is_empty(&self) -> bool {
            self.rules.is_empty()
        }
    }

    /// Which files under the root are candidates
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SelectionPolicy {
        pub skipped_dirs: Vec<String>,
        pub build_dirs: Vec<String>,
        pub source_suffix: String,
        pub denied_suffixes: Vec<String>,
    }

    impl Default for SelectionPolicy {
        fn default() -> Self {
            SelectionPolicy {
                skipped_dirs: SKIPPED_DIRS.iter().map(|s| s.to_string()).collect(),
                build_dirs: BUILD_DIRS.iter().map(|s| s.to_string()).collect(),
                source_suffix: SOURCE_SUFFIX.to_string(),
                denied_suffixes: GENERATED_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl SelectionPolicy {
        pub fn skips_dir(&self, name: &str) -> bool {
            self.skipped_dirs.iter().any(|d| d == name)
        }

        pub fn is_build_dir_name(&self, name: &str) -> bool {
            self.build_dirs.iter().any(|d| d == name)
        }

        pub fn accepts_file_name(&self, name: &str) -> bool {
            name.ends_with(&self.source_suffix)
                && !self.denied_suffixes.iter().any(|s| name.ends_with(s.as_str()))
        }
    }

    #[derive(Debug, Clone)]
    pub struct Config {
        pub rules: RuleSet,
        pub selection: SelectionPolicy,
        /// Report what would change without writing
        pub dry_run: bool,
    }

    impl Config {
        pub fn new(rules: RuleSet) -> Self {
            Config {
                rules,
                selection: SelectionPolicy::default(),
                dry_run: false,
            }
        }

        pub fn with_dry_run(mut self, dry_run: bool) -> Self {
            self.dry_run = dry_run;
            self
        }

        pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
            self.selection = selection;
            self
        }
    }
}
