// Copyright (C) Brian G. Milnes 2025

//! Declaration rewriter: remove each matched declaration, insert its
//! replacement with the same alias
//!
//! The editor owns the parsed items of one file. Removals and insertions are
//! recorded against the items, then rendered back into the source text in
//! one pass:
//! - an item that lost every leaf disappears, together with its line
//! - an item that kept some leaves is re-rendered from them, head verbatim
//! - inserted leaves from one item become one new item next to it, carrying
//!   its attributes and visibility
//! - an item with comments inside keeps its text; only its leading path is
//!   replaced, and when that cannot express the edit the file is rejected

pub mod rewriter {
    use crate::ast_utils::ast_utils::{apply_edits, byte_range, line_ending, line_start};
    use crate::matcher::matcher::PendingSubstitution;
    use crate::parser::parser::{DeclId, SourceTree, UseItem};
    use crate::use_tree::use_tree::{TreeLayout, UseLeaf};
    use ra_ap_syntax::TextRange;
    use thiserror::Error;

    #[derive(Debug, Error, PartialEq, Eq)]
    pub enum RewriteError {
        #[error("delete old path fails: {path} not found")]
        NotFound { path: String },
        #[error("add new path fails: {path} already imported")]
        Conflict { path: String },
        #[error("rewrite of {path} would drop comments inside its use item")]
        Comments { path: String },
    }

    struct LiveLeaf {
        leaf: UseLeaf,
        removed: bool,
    }

    struct EditItem {
        range: TextRange,
        text: String,
        inner_comments: bool,
        root_path: Option<(TextRange, String)>,
        scope: TextRange,
        indent: Option<String>,
        head: String,
        attrs: Vec<String>,
        visibility: Option<String>,
        leaves: Vec<LiveLeaf>,
        inserted: Vec<UseLeaf>,
        /// Old and new path of every substitution applied here
        renames: Vec<(String, String)>,
    }

    impl EditItem {
        fn from_item(item: UseItem) -> Self {
            EditItem {
                range: item.range,
                text: item.text(),
                inner_comments: item.inner_comments,
                root_path: item.root_path,
                scope: item.scope,
                indent: item.indent,
                head: item.head,
                attrs: item.attrs,
                visibility: item.visibility,
                leaves: item
                    .leaves
                    .into_iter()
                    .map(|leaf| LiveLeaf { leaf, removed: false })
                    .collect(),
                inserted: Vec::new(),
                renames: Vec::new(),
            }
        }

        fn is_modified(&self) -> bool {
            !self.inserted.is_empty() || self.leaves.iter().any(|l| l.removed)
        }

        fn imports(&self, path: &str, alias: Option<&str>) -> bool {
            let live = self.leaves.iter().filter(|l| !l.removed).map(|l| &l.leaf);
            live.chain(self.inserted.iter())
                .any(|leaf| leaf.path() == path && leaf.alias.as_deref() == alias)
        }

        /// Separator between stacked items: newline plus indent, or a space
        fn separator(&self, newline: &str) -> String {
            match &self.indent {
                Some(indent) => format!("{newline}{indent}"),
                None => " ".to_string(),
            }
        }

        /// Attributes and visibility for an item inserted next to this one
        fn fresh_head(&self, newline: &str) -> String {
            let mut head = String::new();
            for attr in &self.attrs {
                head.push_str(attr);
                head.push_str(&self.separator(newline));
            }
            if let Some(vis) = &self.visibility {
                head.push_str(vis);
                head.push(' ');
            }
            head
        }

        /// Replacement for this item's text, `None` when it is deleted outright
        fn render(&self, newline: &str) -> Result<Option<String>, RewriteError> {
            let remaining: Vec<UseLeaf> = self
                .leaves
                .iter()
                .filter(|l| !l.removed)
                .map(|l| l.leaf.clone())
                .collect();
            let kept = TreeLayout::from_leaves(&remaining);
            let inserted = TreeLayout::from_leaves(&self.inserted);

            match (kept, inserted) {
                (None, None) => Ok(None),
                _ if self.inner_comments => match self.splice() {
                    Some(text) => Ok(Some(text)),
                    None => Err(RewriteError::Comments { path: self.changed_path() }),
                },
                (Some(kept), Some(inserted)) => Ok(Some(format!(
                    "{}use {};{}{}use {};",
                    self.head,
                    kept.one_line(),
                    self.separator(newline),
                    self.fresh_head(newline),
                    inserted.one_line()
                ))),
                (Some(kept), None) => Ok(Some(format!("{}use {};", self.head, kept.one_line()))),
                // The replacement takes the old item's place, docs and all
                (None, Some(inserted)) => Ok(Some(format!("{}use {};", self.head, inserted.one_line()))),
            }
        }

        /// Original text with only the leading path replaced
        ///
        /// Possible when every leaf was substituted and all of them moved
        /// under the same new leading path.
        fn splice(&self) -> Option<String> {
            if self.leaves.iter().any(|l| !l.removed)
                || self.renames.len() != self.leaves.len()
                || self.inserted.len() != self.leaves.len()
            {
                return None;
            }
            let (path_range, old_root) = self.root_path.as_ref()?;

            let mut new_root: Option<&str> = None;
            for (old, new) in &self.renames {
                let rest = old.strip_prefix(old_root.as_str())?;
                let root = new.strip_suffix(rest)?;
                if new_root.is_some_and(|r| r != root) {
                    return None;
                }
                new_root = Some(root);
            }
            let new_root = new_root?;

            let (item_start, _) = byte_range(self.range);
            let (start, end) = byte_range(*path_range);
            let mut text = self.text.clone();
            text.replace_range(start - item_start..end - item_start, new_root);
            Some(text)
        }

        fn changed_path(&self) -> String {
            self.leaves
                .iter()
                .find(|l| l.removed)
                .map(|l| l.leaf.path())
                .or_else(|| self.inserted.first().map(UseLeaf::path))
                .unwrap_or_default()
        }
    }

    /// Exclusive edit model of one file's `use` items
    pub struct ImportEditor {
        source: String,
        items: Vec<EditItem>,
    }

    impl ImportEditor {
        pub fn new(tree: SourceTree) -> Self {
            let (source, items) = tree.into_parts();
            ImportEditor {
                source,
                items: items.into_iter().map(EditItem::from_item).collect(),
            }
        }

        /// Remove one declaration; its path and alias must still be live
        pub fn remove(&mut self, decl: DeclId, path: &str, alias: Option<&str>) -> Result<(), RewriteError> {
            let leaf = self
                .items
                .get_mut(decl.item)
                .and_then(|item| item.leaves.get_mut(decl.leaf))
                .filter(|l| !l.removed && l.leaf.path() == path && l.leaf.alias.as_deref() == alias)
                .ok_or_else(|| RewriteError::NotFound { path: path.to_string() })?;
            leaf.removed = true;
            Ok(())
        }

        /// Insert a declaration into the scope of the item `decl` came from
        pub fn insert(&mut self, decl: DeclId, path: &str, alias: Option<&str>) -> Result<(), RewriteError> {
            let scope = match self.items.get(decl.item) {
                Some(item) => item.scope,
                None => return Err(RewriteError::NotFound { path: path.to_string() }),
            };
            if self
                .items
                .iter()
                .filter(|item| item.scope == scope)
                .any(|item| item.imports(path, alias))
            {
                return Err(RewriteError::Conflict { path: path.to_string() });
            }
            self.items[decl.item]
                .inserted
                .push(UseLeaf::new(path, alias.map(str::to_string)));
            Ok(())
        }

        /// Apply one substitution: removal first, then insertion
        pub fn substitute(&mut self, sub: &PendingSubstitution) -> Result<(), RewriteError> {
            let alias = sub.alias.as_deref();
            self.remove(sub.decl, &sub.old_path, alias)?;
            self.insert(sub.decl, &sub.new_path, alias)?;
            self.items[sub.decl.item]
                .renames
                .push((sub.old_path.clone(), sub.new_path.clone()));
            Ok(())
        }

        /// Render every modified item back into the source text
        pub fn finish(self) -> Result<String, RewriteError> {
            let newline = line_ending(&self.source);
            let mut edits = Vec::new();
            for item in self.items.iter().filter(|item| item.is_modified()) {
                let (start, end) = byte_range(item.range);
                match item.render(newline)? {
                    Some(text) => edits.push((start, end, text)),
                    None => {
                        let (start, end) = deletion_span(&self.source, item, start, end);
                        edits.push((start, end, String::new()));
                    }
                }
            }
            Ok(apply_edits(&self.source, edits))
        }
    }

    /// Span to delete for a removed item: its whole line when it stands alone
    fn deletion_span(source: &str, item: &EditItem, start: usize, end: usize) -> (usize, usize) {
        let rest = &source[end..];
        let line_end = rest.find('\n').map(|p| end + p + 1).unwrap_or(source.len());
        if item.indent.is_some() && source[end..line_end].trim().is_empty() {
            (line_start(source, start), line_end)
        } else {
            (start, end)
        }
    }

    /// Apply all substitutions to one file; any failure aborts the whole file
    pub fn rewrite(tree: SourceTree, substitutions: &[PendingSubstitution]) -> Result<String, RewriteError> {
        let mut editor = ImportEditor::new(tree);
        for sub in substitutions {
            editor.substitute(sub)?;
        }
        editor.finish()
    }
}
