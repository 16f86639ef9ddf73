// Copyright (C) Brian G. Milnes 2025

//! Canonical formatter for `use` blocks
//!
//! Each block whose items all start their own line is rewritten: items are
//! rendered canonically, sorted by their tree text, and stacked one per line
//! at the block's indentation, with the file's own line ending. Items holding comments keep their text. All
//! other source text is left untouched, so formatting is idempotent.

pub mod formatter {
    use crate::ast_utils::ast_utils::{apply_edits, byte_range, line_ending};
    use crate::parser::parser::{ParseError, SourceTree, UseItem};
    use crate::use_tree::use_tree::TreeLayout;
    use thiserror::Error;

    /// Widest line a single-line `use` item may take
    pub const MAX_WIDTH: usize = 100;

    #[derive(Debug, Error)]
    pub enum FormatError {
        #[error("source does not parse")]
        Parse(#[source] ParseError),
        #[error("formatted output does not parse")]
        Output(#[source] ParseError),
    }

    /// Canonical form of `source`
    pub fn format_source(source: &str) -> Result<String, FormatError> {
        let tree = SourceTree::parse(source.to_string()).map_err(FormatError::Parse)?;
        let newline = line_ending(source);

        let mut edits = Vec::new();
        for block in tree.blocks() {
            let items: Vec<&UseItem> = block.iter().map(|&i| &tree.items()[i]).collect();
            let Some(indent) = block_indent(&items) else {
                continue;
            };

            let mut rendered: Vec<(&str, String)> = items
                .iter()
                .map(|item| (item.key.as_str(), render_item(item, indent, newline)))
                .collect();
            rendered.sort_by(|a, b| a.0.cmp(b.0));

            let joined = rendered
                .into_iter()
                .map(|(_, text)| text)
                .collect::<Vec<_>>()
                .join(&format!("{newline}{indent}"));

            let (start, _) = byte_range(items[0].range);
            let (_, end) = byte_range(items[items.len() - 1].range);
            edits.push((start, end, joined));
        }

        let formatted = apply_edits(source, edits);
        SourceTree::parse(formatted.clone()).map_err(FormatError::Output)?;
        Ok(formatted)
    }

    /// Indentation of a block, if every item starts its own line
    fn block_indent<'a>(items: &[&'a UseItem]) -> Option<&'a str> {
        if items.iter().any(|item| item.indent.is_none()) {
            return None;
        }
        items.first().and_then(|item| item.indent.as_deref())
    }

    /// Canonical text of one item; verbatim when it holds comments
    pub fn render_item(item: &UseItem, indent: &str, newline: &str) -> String {
        let layout = match TreeLayout::from_leaves(&item.leaves) {
            Some(layout) if !item.has_comments => layout,
            _ => return item.text(),
        };

        let mut head = String::new();
        for attr in &item.attrs {
            head.push_str(attr);
            head.push_str(newline);
            head.push_str(indent);
        }
        let vis = item
            .visibility
            .as_ref()
            .map(|v| format!("{v} "))
            .unwrap_or_default();

        let single = format!("{vis}use {};", layout.one_line());
        let width = indent.chars().count() + single.chars().count();
        if width <= MAX_WIDTH || !layout.is_list() {
            format!("{head}{single}")
        } else {
            format!("{head}{vis}use {};", layout.vertical(indent, newline))
        }
    }
}
