// Copyright (C) Brian G. Milnes 2025

//! Declaration parser: source text to `use` items and import declarations
//!
//! Import declarations are grouped into blocks. A block is a run of sibling
//! `use` items separated only by whitespace that holds no empty line.

pub mod parser {
    use crate::ast_utils::ast_utils::{
        byte_range, contains_comment, contains_comment_after, is_blank_gap, leading_indent,
        token_text,
    };
    use crate::use_tree::use_tree::{flatten, TreeLayout, UseLeaf};
    use ra_ap_syntax::ast::{self, AstNode, HasAttrs, HasVisibility};
    use ra_ap_syntax::{Edition, NodeOrToken, SourceFile, SyntaxKind, SyntaxNode, TextRange};
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("parse errors: {0}")]
    pub struct ParseError(pub String);

    /// Identity of one import declaration: `use` item index, leaf index
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DeclId {
        pub item: usize,
        pub leaf: usize,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ImportDecl {
        pub id: DeclId,
        pub path: String,
        pub alias: Option<String>,
        pub block: usize,
    }

    /// A `use` item with everything the rewriter and formatter need
    #[derive(Debug, Clone)]
    pub struct UseItem {
        pub node: ast::Use,
        pub range: TextRange,
        /// Range of the parent item list or block; inserts stay in this scope
        pub scope: TextRange,
        /// Indentation, when the item starts its own line
        pub indent: Option<String>,
        /// Verbatim text before the `use` keyword: docs, attributes, visibility
        pub head: String,
        pub attrs: Vec<String>,
        pub visibility: Option<String>,
        pub leaves: Vec<UseLeaf>,
        pub has_comments: bool,
        /// Comments from the `use` keyword on, which a re-render would drop
        pub inner_comments: bool,
        /// Range and logical text of the tree's leading path, `old` in `use old::{a, b}`
        pub root_path: Option<(TextRange, String)>,
        /// Ordering key inside a block
        pub key: String,
    }

    impl UseItem {
        fn new(node: ast::Use, source: &str) -> Result<Self, ParseError> {
            let range = node.syntax().text_range();
            let (start, _) = byte_range(range);
            let use_token = node
                .use_token()
                .ok_or_else(|| ParseError(format!("use item without `use` keyword at {start}")))?;
            let (use_start, _) = byte_range(use_token.text_range());
            let scope = node
                .syntax()
                .parent()
                .map(|parent| parent.text_range())
                .unwrap_or(range);

            let tree = node.use_tree();
            let leaves = tree.as_ref().map(flatten).unwrap_or_default();
            let has_comments = contains_comment(node.syntax());
            let inner_comments = contains_comment_after(node.syntax(), use_token.text_range().start());
            let root_path = tree
                .as_ref()
                .and_then(|t| t.path())
                .map(|p| (p.syntax().text_range(), token_text(p.syntax())));
            let key = match TreeLayout::from_leaves(&leaves) {
                Some(layout) if !has_comments => layout.one_line(),
                _ => tree.map(|t| token_text(t.syntax())).unwrap_or_default(),
            };

            Ok(UseItem {
                range,
                scope,
                indent: leading_indent(source, start),
                head: source[start..use_start].to_string(),
                attrs: node.attrs().map(|a| a.syntax().text().to_string()).collect(),
                visibility: node.visibility().map(|v| v.syntax().text().to_string()),
                leaves,
                has_comments,
                inner_comments,
                root_path,
                key,
                node,
            })
        }

        /// Original text of the whole item
        pub fn text(&self) -> String {
            self.node.syntax().text().to_string()
        }
    }

    /// A parsed file: owned text, syntax tree, `use` items grouped in blocks
    pub struct SourceTree {
        text: String,
        file: SourceFile,
        items: Vec<UseItem>,
        blocks: Vec<Vec<usize>>,
    }

    impl SourceTree {
        /// Parse Rust source; any syntax error rejects the file
        pub fn parse(text: String) -> Result<Self, ParseError> {
            let parsed = SourceFile::parse(&text, Edition::Edition2021);
            let errors = parsed.errors();
            if !errors.is_empty() {
                let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                return Err(ParseError(messages.join("; ")));
            }
            let file = parsed.tree();

            let mut items = Vec::new();
            let mut blocks = Vec::new();
            for block in use_blocks(file.syntax()) {
                let mut indexes = Vec::with_capacity(block.len());
                for node in block {
                    indexes.push(items.len());
                    items.push(UseItem::new(node, &text)?);
                }
                blocks.push(indexes);
            }

            Ok(SourceTree { text, file, items, blocks })
        }

        pub fn text(&self) -> &str {
            &self.text
        }

        pub fn syntax(&self) -> &SourceFile {
            &self.file
        }

        pub fn items(&self) -> &[UseItem] {
            &self.items
        }

        /// Item indexes per block, in block order
        pub fn blocks(&self) -> &[Vec<usize>] {
            &self.blocks
        }

        /// Import declarations grouped by block
        pub fn imports(&self) -> Vec<Vec<ImportDecl>> {
            self.blocks
                .iter()
                .enumerate()
                .map(|(block, indexes)| {
                    indexes
                        .iter()
                        .flat_map(|&item| {
                            self.items[item].leaves.iter().enumerate().map(move |(leaf, l)| {
                                ImportDecl {
                                    id: DeclId { item, leaf },
                                    path: l.path(),
                                    alias: l.alias.clone(),
                                    block,
                                }
                            })
                        })
                        .collect()
                })
                .collect()
        }

        /// Consume the tree, keeping only the text and the items
        pub fn into_parts(self) -> (String, Vec<UseItem>) {
            (self.text, self.items)
        }
    }

    /// Split every `use` item under `root` into blocks of adjacent siblings
    fn use_blocks(root: &SyntaxNode) -> Vec<Vec<ast::Use>> {
        let mut blocks = Vec::new();
        for parent in root.descendants() {
            let mut current: Vec<ast::Use> = Vec::new();
            for element in parent.children_with_tokens() {
                match element {
                    NodeOrToken::Node(child) => match ast::Use::cast(child) {
                        Some(item) => current.push(item),
                        None => flush(&mut current, &mut blocks),
                    },
                    NodeOrToken::Token(token) => {
                        if token.kind() != SyntaxKind::WHITESPACE || is_blank_gap(token.text()) {
                            flush(&mut current, &mut blocks);
                        }
                    }
                }
            }
            flush(&mut current, &mut blocks);
        }
        blocks
    }

    fn flush(current: &mut Vec<ast::Use>, blocks: &mut Vec<Vec<ast::Use>>) {
        if !current.is_empty() {
            blocks.push(std::mem::take(current));
        }
    }
}
