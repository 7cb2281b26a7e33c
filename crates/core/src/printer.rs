//! Output generation: pretty printing and verbatim reconstruction.

use crate::reader::TokenKind;
use crate::syntax::tree::{BlockKind, NodeId, SyntaxTree};

/// Literals that force a line break before themselves.
const BREAK_BEFORE: &[&str] = &["begin", "end", "save", "restore", "gsave", "grestore"];

/// Literals that force a line break after themselves.
const BREAK_AFTER: &[&str] = &["begin", "end", "def", "save", "restore", "gsave", "grestore"];

/// Recursive-descent printer with a per-block line buffer and 2-space
/// indent steps.
pub struct Printer {
    max_line_length: usize,
}

impl Printer {
    pub fn new(max_line_length: usize) -> Self {
        Self { max_line_length }
    }

    /// Pretty-prints the tree with deterministic line wrapping.
    pub fn print(&self, tree: &SyntaxTree) -> String {
        let mut out = String::new();
        self.print_block(tree, tree.root(), 0, &mut out);
        out
    }

    fn print_block(&self, tree: &SyntaxTree, block: NodeId, indent: usize, out: &mut String) {
        let mut line = String::new();

        for &child in tree.children(block) {
            let text = tree.text_of(child);
            let current_len = line.len();
            let would_overflow = current_len + text.len() + 1 >= self.max_line_length;

            if let Some(b) = tree.block(child) {
                let explode = match &b.kind {
                    BlockKind::Region | BlockKind::Script => true,
                    BlockKind::Procedure => {
                        b.children.len() > 2
                            || tree.contains_nested_block(child)
                            || would_overflow
                    }
                    BlockKind::Operator(_) => would_overflow,
                };
                if explode {
                    self.flush(&mut line, indent, out);
                    if let Some(start) = b.start {
                        append(&mut line, &tree.text_of(start));
                        self.flush(&mut line, indent, out);
                    }
                    self.print_block(tree, child, indent + 1, out);
                    if let Some(end) = b.end {
                        append(&mut line, &tree.text_of(end));
                        self.flush(&mut line, indent, out);
                    }
                    continue;
                }
            }

            if break_before(tree, child) || would_overflow {
                self.flush(&mut line, indent, out);
            }
            append(&mut line, &text);
            if break_after(tree, child) || current_len >= self.max_line_length {
                self.flush(&mut line, indent, out);
            }
        }

        self.flush(&mut line, indent, out);
    }

    /// Emits the buffered line, splitting embedded breaks from multi-line
    /// strings and comments into separately indented physical lines.
    fn flush(&self, line: &mut String, indent: usize, out: &mut String) {
        if line.is_empty() {
            return;
        }
        for physical in line.split('\n').filter(|l| !l.is_empty()) {
            for _ in 0..indent {
                out.push_str("  ");
            }
            out.push_str(physical);
            out.push('\n');
        }
        line.clear();
    }

    /// Re-emits the token sequence verbatim: leading whitespace plus text,
    /// with line breaks reconstructed from line-number deltas. A negative
    /// delta (spliced or synthesized nodes) yields exactly one break.
    pub fn print_verbatim(&self, tree: &SyntaxTree) -> String {
        let mut out = String::new();
        let mut previous_end_line: i64 = 1;

        for token in tree.tokens_of(tree.root()) {
            let delta = i64::from(token.line) - previous_end_line;
            if delta > 0 {
                for _ in 0..delta {
                    out.push('\n');
                }
            } else if delta < 0 {
                out.push('\n');
            }
            out.push_str(&token.whitespace_before);
            out.push_str(&token.text);
            previous_end_line = i64::from(token.end_line());
        }
        out
    }
}

fn append(line: &mut String, text: &str) {
    if !line.is_empty() {
        line.push(' ');
    }
    line.push_str(text);
}

fn break_before(tree: &SyntaxTree, id: NodeId) -> bool {
    let Some(leaf) = tree.leaf(id) else {
        return false;
    };
    match leaf.token.kind {
        TokenKind::Comment => leaf.text.starts_with("%%"),
        _ => BREAK_BEFORE.contains(&leaf.text.as_str()),
    }
}

fn break_after(tree: &SyntaxTree, id: NodeId) -> bool {
    let Some(leaf) = tree.leaf(id) else {
        return false;
    };
    leaf.token.kind == TokenKind::Comment || BREAK_AFTER.contains(&leaf.text.as_str())
}
