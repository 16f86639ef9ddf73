// Copyright (C) Brian G. Milnes 2025

//! Rule matcher: which import declarations a rule set rewrites
//!
//! Matching is a plain, case-sensitive string prefix test on the logical
//! path; it is not segment aware, so `old` also matches `old_extra::x`.
//! When several rules match one declaration the longest prefix wins, ties go
//! to the earlier rule.

pub mod matcher {
    use crate::config::config::{Rule, RuleSet};
    use crate::parser::parser::{DeclId, ImportDecl};

    /// A declaration paired with the path it is rewritten to
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PendingSubstitution {
        pub decl: DeclId,
        pub old_path: String,
        pub new_path: String,
        pub alias: Option<String>,
    }

    /// The rule that applies to `path`, if any
    pub fn best_rule<'r>(path: &str, rules: &'r RuleSet) -> Option<&'r Rule> {
        let mut best: Option<&Rule> = None;
        for rule in rules.iter() {
            if !path.starts_with(rule.old.as_str()) {
                continue;
            }
            if best.map_or(true, |b| rule.old.len() > b.old.len()) {
                best = Some(rule);
            }
        }
        best
    }

    /// Pending substitutions for `decls`, in declaration order
    pub fn match_rules<'a, I>(decls: I, rules: &RuleSet) -> Vec<PendingSubstitution>
    where
        I: IntoIterator<Item = &'a ImportDecl>,
    {
        let mut pending = Vec::new();
        for decl in decls {
            let Some(rule) = best_rule(&decl.path, rules) else {
                continue;
            };
            let new_path = format!("{}{}", rule.new, &decl.path[rule.old.len()..]);
            // identity rewrites change nothing
            if new_path == decl.path {
                continue;
            }
            pending.push(PendingSubstitution {
                decl: decl.id,
                old_path: decl.path.clone(),
                new_path,
                alias: decl.alias.clone(),
            });
        }
        pending
    }
}
