// Copyright (C) Brian G. Milnes 2025

//! AST and source-text utilities shared by the parser, rewriter and formatter

pub mod ast_utils {
    use ra_ap_syntax::{SyntaxKind, SyntaxNode, TextRange, TextSize};

    /// Text of a node with whitespace and comments dropped
    pub fn token_text(node: &SyntaxNode) -> String {
        node.descendants_with_tokens()
            .filter_map(|element| element.into_token())
            .filter(|token| !token.kind().is_trivia())
            .map(|token| token.text().to_string())
            .collect()
    }

    /// Check if any comment token sits inside the node
    pub fn contains_comment(node: &SyntaxNode) -> bool {
        node.descendants_with_tokens()
            .any(|element| element.kind() == SyntaxKind::COMMENT)
    }

    /// Check for a comment token inside the node starting at or after `offset`
    pub fn contains_comment_after(node: &SyntaxNode, offset: TextSize) -> bool {
        node.descendants_with_tokens()
            .any(|element| element.kind() == SyntaxKind::COMMENT && element.text_range().start() >= offset)
    }

    /// Line ending used by `source`: CRLF when it has any, LF otherwise
    pub fn line_ending(source: &str) -> &'static str {
        if source.contains("\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }

    /// Byte offset of the start of the line containing `offset`
    pub fn line_start(source: &str, offset: usize) -> usize {
        source[..offset].rfind('\n').map(|p| p + 1).unwrap_or(0)
    }

    /// Indentation before `offset`, if only spaces and tabs precede it on its line
    pub fn leading_indent(source: &str, offset: usize) -> Option<String> {
        let before = &source[line_start(source, offset)..offset];
        before
            .chars()
            .all(|c| c == ' ' || c == '\t')
            .then(|| before.to_string())
    }

    /// A whitespace run that contains an empty line
    pub fn is_blank_gap(whitespace: &str) -> bool {
        whitespace.matches('\n').count() >= 2
    }

    /// Byte range of a node as plain offsets
    pub fn byte_range(range: TextRange) -> (usize, usize) {
        (range.start().into(), range.end().into())
    }

    /// Apply non-overlapping replacements, last first so earlier offsets stay valid
    pub fn apply_edits(source: &str, mut edits: Vec<(usize, usize, String)>) -> String {
        edits.sort_by_key(|(start, _, _)| *start);
        let mut result = source.to_string();
        for (start, end, replacement) in edits.into_iter().rev() {
            result.replace_range(start..end, &replacement);
        }
        result
    }
}
