//! Trace instrumentation.
//!
//! Loads an external trace-prologue script, derives the set of specially
//! logged operators from its `#Log_<op>` definitions, inserts a logging
//! call pair immediately ahead of every operator invocation in the target
//! tree, and finally splices the prologue into the target.

use std::io::Read;
use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{FormatterError, Result};
use crate::reader::{PostScriptReader, Token, TokenKind};
use crate::syntax;
use crate::syntax::tree::{BlockKind, NodeId, SyntaxTree};

/// Logical name of the trace-prologue script.
pub const TRACE_PROLOGUE_RESOURCE: &str = "trace-prologue.ps";

/// Provides named auxiliary resources as readable text streams.
pub trait ResourceProvider {
    fn open(&self, name: &str) -> std::io::Result<Box<dyn Read>>;
}

/// Resolves resource names against a filesystem directory.
pub struct DirectoryResourceProvider {
    root: PathBuf,
}

impl DirectoryResourceProvider {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ResourceProvider for DirectoryResourceProvider {
    fn open(&self, name: &str) -> std::io::Result<Box<dyn Read>> {
        Ok(Box::new(std::fs::File::open(self.root.join(name))?))
    }
}

/// In-memory provider for embedders and tests.
#[derive(Debug, Default)]
pub struct MemoryResourceProvider {
    entries: FxHashMap<String, String>,
}

impl MemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<String>) {
        self.entries.insert(name.into(), contents.into());
    }
}

impl ResourceProvider for MemoryResourceProvider {
    fn open(&self, name: &str) -> std::io::Result<Box<dyn Read>> {
        match self.entries.get(name) {
            Some(text) => Ok(Box::new(std::io::Cursor::new(text.clone().into_bytes()))),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no resource named '{name}'"),
            )),
        }
    }
}

/// Inserts logging call pairs ahead of operator invocations.
pub struct Tracer<'a> {
    provider: &'a dyn ResourceProvider,
}

impl<'a> Tracer<'a> {
    pub fn new(provider: &'a dyn ResourceProvider) -> Self {
        Self { provider }
    }

    /// Instruments `tree` in place and splices the prologue in, directly
    /// after the `%%BeginProlog` marker when present, else at the start.
    pub fn instrument(&self, tree: &mut SyntaxTree) -> Result<()> {
        let prologue = self.load_prologue()?;
        let specials: FxHashSet<String> = prologue
            .definitions()
            .keys()
            .filter_map(|key| key.strip_prefix("#Log_"))
            .map(str::to_string)
            .collect();
        tracing::debug!(specials = specials.len(), "trace prologue loaded");

        let root = tree.root();
        insert_log_calls(tree, root, &specials);
        splice_prologue(tree, &prologue);
        Ok(())
    }

    /// The prologue goes through the ordinary tokenizer and builder; no
    /// grouping or inlining is applied to it.
    fn load_prologue(&self) -> Result<SyntaxTree> {
        let config_error =
            |what: &str| FormatterError::Configuration(format!("trace prologue '{TRACE_PROLOGUE_RESOURCE}' {what}"));

        let mut stream = self
            .provider
            .open(TRACE_PROLOGUE_RESOURCE)
            .map_err(|e| config_error(&format!("is unavailable: {e}")))?;
        let mut source = String::new();
        stream
            .read_to_string(&mut source)
            .map_err(|e| config_error(&format!("is unreadable: {e}")))?;

        let tokens = PostScriptReader::new(&source)
            .read_to_end()
            .map_err(|e| config_error(&format!("does not tokenize: {e}")))?;
        syntax::parse(tokens).map_err(|e| config_error(&format!("does not parse: {e}")))
    }
}

/// Walks `block` inserting the call pair ahead of every invoked executable
/// name: plain name leaves, Operator keywords and Region markers. Procedure
/// braces are deferred code, not invocations.
fn insert_log_calls(tree: &mut SyntaxTree, block: NodeId, specials: &FxHashSet<String>) {
    let children = tree.children(block).to_vec();
    // Backwards, so insertion offsets for earlier children stay valid and
    // freshly inserted leaves are never revisited.
    for (index, child) in children.into_iter().enumerate().rev() {
        if tree.is_block(child) {
            let kind = tree.block(child).map(|b| b.kind.clone());
            insert_log_calls(tree, child, specials);

            if matches!(kind, Some(BlockKind::Operator(_)) | Some(BlockKind::Region)) {
                // The end marker is invoked after the children; its pair
                // goes last inside the block.
                let end = tree.block(child).and_then(|b| b.end);
                if let Some(end) = end {
                    if tree.is_executable_name_leaf(end) {
                        let at = tree.children(child).len();
                        insert_pair(tree, child, at, end, specials);
                    }
                }
            }
            if matches!(kind, Some(BlockKind::Region)) {
                // The start marker is invoked before the block.
                let start = tree.block(child).and_then(|b| b.start);
                if let Some(start) = start {
                    if tree.is_executable_name_leaf(start) {
                        insert_pair(tree, block, index, start, specials);
                    }
                }
            }
        } else if tree.is_executable_name_leaf(child) {
            insert_pair(tree, block, index, child, specials);
        }
    }
}

/// Inserts the synthetic `(<position> <name>)` string and `#Log` call at
/// `index` in `parent`, both positioned on the traced token's location.
fn insert_pair(
    tree: &mut SyntaxTree,
    parent: NodeId,
    index: usize,
    traced: NodeId,
    specials: &FxHashSet<String>,
) {
    let Some(leaf) = tree.leaf(traced) else {
        return;
    };
    let (line, column) = (leaf.token.line, leaf.token.column);
    let name = leaf.text.clone();

    let log_name = if specials.contains(&name) {
        format!("#Log_{name}")
    } else {
        "#Log".to_string()
    };

    let mut string_token = Token::new(
        TokenKind::String,
        format!("([{line},{column}] {name})"),
        line,
        column,
    );
    string_token.whitespace_before = " ".to_string();
    let mut call_token = Token::new(TokenKind::ExecutableName, log_name, line, column);
    call_token.whitespace_before = " ".to_string();

    let string_leaf = tree.alloc_leaf(string_token);
    let call_leaf = tree.alloc_leaf(call_token);
    tree.insert_child(parent, index, call_leaf);
    tree.insert_child(parent, index, string_leaf);
}

fn splice_prologue(tree: &mut SyntaxTree, prologue: &SyntaxTree) {
    let root = tree.root();
    let (parent, index) = find_splice_point(tree, root).unwrap_or((root, 0));
    let children = prologue.children(prologue.root()).to_vec();
    for (offset, child) in children.into_iter().enumerate() {
        let copied = tree.adopt(prologue, child);
        tree.insert_child(parent, index + offset, copied);
    }
}

/// Position directly after the `%%BeginProlog` marker: the head of a Region
/// opened by it, or the slot after the bare comment leaf.
fn find_splice_point(tree: &SyntaxTree, block: NodeId) -> Option<(NodeId, usize)> {
    if let Some(b) = tree.block(block) {
        if let Some(start) = b.start {
            if tree.is_leaf_with_text(start, "%%BeginProlog") {
                return Some((block, 0));
            }
        }
    }
    for (index, &child) in tree.children(block).iter().enumerate() {
        if tree.is_leaf_with_text(child, "%%BeginProlog") {
            return Some((block, index + 1));
        }
        if tree.is_block(child) {
            if let Some(found) = find_splice_point(tree, child) {
                return Some(found);
            }
        }
    }
    None
}
