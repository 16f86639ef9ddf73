// Copyright (C) Brian G. Milnes 2025

//! Use-tree flattening and canonical rendering
//!
//! A `use` item is flattened into leaves, one per imported name:
//!
//! ```text
//! use a::{b, c::{self, d as e}, f::*};
//!   a::b
//!   a::c::self
//!   a::c::d as e
//!   a::f::*
//! ```
//!
//! Rendering goes the other way: leaves are regrouped by their shared leading
//! segments, `self` sorts first inside braces and everything else sorts by
//! bytes. A leading `::` is kept as an empty first segment.

pub mod use_tree {
    use crate::ast_utils::ast_utils::token_text;
    use ra_ap_syntax::ast::{self, AstNode, HasName};
    use std::collections::BTreeMap;

    /// One imported name
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct UseLeaf {
        pub segments: Vec<String>,
        pub alias: Option<String>,
    }

    impl UseLeaf {
        pub fn new(path: &str, alias: Option<String>) -> Self {
            UseLeaf {
                segments: split_path(path),
                alias,
            }
        }

        /// Logical path, segments joined with `::`
        pub fn path(&self) -> String {
            self.segments.join("::")
        }
    }

    /// Split a logical path into segments
    pub fn split_path(path: &str) -> Vec<String> {
        path.split("::").map(|s| s.trim().to_string()).collect()
    }

    /// Flatten a use tree into its leaves, in source order
    pub fn flatten(tree: &ast::UseTree) -> Vec<UseLeaf> {
        let mut leaves = Vec::new();
        collect_leaves(tree, &[], &mut leaves);
        leaves
    }

    fn collect_leaves(tree: &ast::UseTree, prefix: &[String], out: &mut Vec<UseLeaf>) {
        let mut segments = prefix.to_vec();
        match tree.path() {
            Some(path) => segments.extend(split_path(&token_text(path.syntax()))),
            // `use ::{a, b}`
            None if tree.coloncolon_token().is_some() => segments.push(String::new()),
            None => {}
        }

        if let Some(list) = tree.use_tree_list() {
            for child in list.use_trees() {
                collect_leaves(&child, &segments, out);
            }
        } else if tree.star_token().is_some() {
            segments.push("*".to_string());
            out.push(UseLeaf { segments, alias: None });
        } else if !segments.is_empty() {
            let alias = tree.rename().map(|rename| alias_text(&rename));
            out.push(UseLeaf { segments, alias });
        }
    }

    fn alias_text(rename: &ast::Rename) -> String {
        rename
            .name()
            .map(|name| name.syntax().text().to_string())
            .unwrap_or_else(|| "_".to_string())
    }

    /// Canonical shape of a use tree: a shared prefix and the entries below it
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TreeLayout {
        prefix: Vec<String>,
        entries: Vec<String>,
    }

    impl TreeLayout {
        /// Build the layout for a set of leaves; `None` when there are none
        pub fn from_leaves(leaves: &[UseLeaf]) -> Option<Self> {
            let min_len = leaves.iter().map(|l| l.segments.len()).min()?;
            let first = &leaves[0].segments;

            // The prefix stops one short of the shortest leaf so every leaf keeps a name
            let mut common = 0;
            while common + 1 < min_len
                && leaves.iter().all(|l| l.segments[common] == first[common])
            {
                common += 1;
            }

            let rest: Vec<(&[String], Option<&str>)> = leaves
                .iter()
                .map(|l| (&l.segments[common..], l.alias.as_deref()))
                .collect();

            Some(TreeLayout {
                prefix: first[..common].to_vec(),
                entries: render_entries(&rest),
            })
        }

        /// True when the tree needs braces
        pub fn is_list(&self) -> bool {
            self.entries.len() > 1 || self.entries.first().is_some_and(|e| is_self_entry(e))
        }

        pub fn one_line(&self) -> String {
            if !self.is_list() {
                return self.with_prefix(&self.entries[0]);
            }
            self.with_prefix(&format!("{{{}}}", self.entries.join(", ")))
        }

        /// One entry per line, for trees too wide to fit
        pub fn vertical(&self, indent: &str, newline: &str) -> String {
            if !self.is_list() {
                return self.one_line();
            }
            let mut list = format!("{{{newline}");
            for entry in &self.entries {
                list.push_str(&format!("{indent}    {entry},{newline}"));
            }
            list.push_str(indent);
            list.push('}');
            self.with_prefix(&list)
        }

        fn with_prefix(&self, tail: &str) -> String {
            if self.prefix.is_empty() {
                tail.to_string()
            } else {
                format!("{}::{tail}", self.prefix.join("::"))
            }
        }
    }

    /// Render leaves as brace-list entries, grouping by first segment
    fn render_entries(leaves: &[(&[String], Option<&str>)]) -> Vec<String> {
        let mut entries = Vec::new();
        let mut groups: BTreeMap<&str, Vec<(&[String], Option<&str>)>> = BTreeMap::new();

        for &(segments, alias) in leaves {
            match segments.split_first() {
                Some((head, [])) => entries.push(match alias {
                    Some(alias) => format!("{head} as {alias}"),
                    None => head.clone(),
                }),
                Some((head, rest)) => groups.entry(head.as_str()).or_default().push((rest, alias)),
                None => {}
            }
        }

        for (head, members) in groups {
            let inner = render_entries(&members);
            if inner.len() == 1 && !is_self_entry(&inner[0]) {
                entries.push(format!("{head}::{}", inner[0]));
            } else {
                entries.push(format!("{head}::{{{}}}", inner.join(", ")));
            }
        }

        entries.sort_by(|a, b| entry_key(a).cmp(&entry_key(b)));
        entries
    }

    fn entry_key(entry: &str) -> (bool, &str) {
        (!is_self_entry(entry), entry)
    }

    fn is_self_entry(entry: &str) -> bool {
        entry == "self" || entry.starts_with("self as ")
    }
}
