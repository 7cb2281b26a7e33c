//! Tree building and the definition-idiom analysis pass.
//!
//! Building nests `{ ... }` procedures and turns every other token into a
//! leaf. Analysis then folds the `load`, `bind` and `def` idioms into
//! synthetic Operator nodes and records the Script's definition and alias
//! tables, so later passes can resolve user names to the builtin operators
//! they stand for.

use crate::error::Result;
use crate::reader::{Token, TokenKind};
use crate::syntax::operators::is_builtin_operator;
use crate::syntax::tree::{BlockKind, NodeId, SyntaxTree};

/// Parses a token sequence into an analyzed syntax tree.
pub fn parse(tokens: Vec<Token>) -> Result<SyntaxTree> {
    let mut tree = SyntaxTree::new();
    let root = tree.root();
    let mut iter = tokens.into_iter();
    while let Some(token) = iter.next() {
        add_node(&mut tree, root, token, &mut iter);
    }

    analyze(&mut tree, root)?;
    tree.prune_aliases();
    tracing::debug!(
        definitions = tree.definitions().len(),
        aliases = tree.aliases().len(),
        "analysis complete"
    );
    Ok(tree)
}

fn add_node(
    tree: &mut SyntaxTree,
    parent: NodeId,
    token: Token,
    iter: &mut std::vec::IntoIter<Token>,
) {
    if token.kind == TokenKind::ProcedureStart {
        let block = tree.alloc_block(BlockKind::Procedure);
        let marker = tree.alloc_leaf(token);
        tree.set_start_marker(block, marker);
        tree.push_child(parent, block);
        build_procedure(tree, block, iter);
    } else {
        // A stray ProcedureEnd outside any open procedure stays behind as
        // an ordinary name leaf.
        let leaf = tree.alloc_leaf(token);
        tree.push_child(parent, leaf);
    }
}

fn build_procedure(tree: &mut SyntaxTree, block: NodeId, iter: &mut std::vec::IntoIter<Token>) {
    while let Some(token) = iter.next() {
        if token.kind == TokenKind::ProcedureEnd {
            let marker = tree.alloc_leaf(token);
            tree.set_end_marker(block, marker);
            return;
        }
        add_node(tree, block, token, iter);
    }
    // input truncated; the procedure keeps no end marker
}

/// Resolved operator identity of a bare name: the name itself when it is a
/// builtin, otherwise its unique alias target, otherwise unrecognized.
pub(crate) fn resolve_operator(tree: &SyntaxTree, name: &str) -> Option<String> {
    if is_builtin_operator(name) {
        Some(name.to_string())
    } else {
        tree.resolve_alias(name).map(str::to_string)
    }
}

fn analyze(tree: &mut SyntaxTree, block: NodeId) -> Result<()> {
    // Nested procedures fold their own idioms first.
    let nested: Vec<NodeId> = tree
        .children(block)
        .iter()
        .copied()
        .filter(|&child| tree.is_block(child))
        .collect();
    for child in nested {
        analyze(tree, child)?;
    }

    let mut i = 0;
    while i < tree.children(block).len() {
        let id = tree.children(block)[i];
        if tree.is_executable_name_leaf(id) {
            let name = tree.leaf_text(id).unwrap_or_default().to_string();
            if let Some(resolved) = resolve_operator(tree, &name) {
                let folded = match resolved.as_str() {
                    "load" => try_fold_load(tree, block, i),
                    "bind" => try_fold_bind(tree, block, i),
                    "def" => try_fold_def(tree, block, i)?,
                    _ => None,
                };
                // Rescan from the fold position: the new node may complete
                // a later idiom (`/a /b load def` folds the load first).
                if let Some(index) = folded {
                    i = index;
                    continue;
                }
            }
        }
        i += 1;
    }
    Ok(())
}

fn is_literal_name(tree: &SyntaxTree, id: NodeId) -> bool {
    tree.leaf(id)
        .is_some_and(|leaf| leaf.token.kind == TokenKind::LiteralName)
}

fn operator_name(tree: &SyntaxTree, id: NodeId) -> Option<&str> {
    match &tree.block(id)?.kind {
        BlockKind::Operator(name) => Some(name),
        _ => None,
    }
}

/// `/name load` → Operator(load).
fn try_fold_load(tree: &mut SyntaxTree, block: NodeId, keyword: usize) -> Option<usize> {
    if keyword < 1 {
        return None;
    }
    let operand = tree.children(block)[keyword - 1];
    if !is_literal_name(tree, operand) {
        return None;
    }
    tree.fold_operator(block, keyword - 1, 2, "load");
    Some(keyword - 1)
}

/// `{ ... } bind` or `/name load bind` → Operator(bind).
fn try_fold_bind(tree: &mut SyntaxTree, block: NodeId, keyword: usize) -> Option<usize> {
    if keyword < 1 {
        return None;
    }
    let operand = tree.children(block)[keyword - 1];
    let qualifies = tree
        .block(operand)
        .is_some_and(|b| b.kind == BlockKind::Procedure)
        || operator_name(tree, operand) == Some("load");
    if !qualifies {
        return None;
    }
    tree.fold_operator(block, keyword - 1, 2, "bind");
    Some(keyword - 1)
}

/// `/key value def` → Operator(def), registered in the definition table and,
/// when the value unwraps to a recognized `load`, in the alias table.
fn try_fold_def(tree: &mut SyntaxTree, block: NodeId, keyword: usize) -> Result<Option<usize>> {
    if keyword < 2 {
        return Ok(None);
    }
    let key = tree.children(block)[keyword - 2];
    let value = tree.children(block)[keyword - 1];
    if !is_literal_name(tree, key) || !qualifies_as_def_value(tree, value) {
        return Ok(None);
    }

    let op = tree.fold_operator(block, keyword - 2, 3, "def");
    tree.register_definition(op)?;

    if let Some(loaded) = unwrap_loaded_name(tree, value) {
        if let Some(canonical) = resolve_operator(tree, &loaded) {
            tree.register_alias(op, &canonical)?;
        }
    }
    Ok(Some(keyword - 2))
}

fn qualifies_as_def_value(tree: &SyntaxTree, id: NodeId) -> bool {
    if let Some(leaf) = tree.leaf(id) {
        matches!(
            leaf.token.kind,
            TokenKind::LiteralName
                | TokenKind::Integer
                | TokenKind::Real
                | TokenKind::String
                | TokenKind::HexString
                | TokenKind::Ascii85String
        )
    } else {
        matches!(operator_name(tree, id), Some("load") | Some("bind"))
    }
}

/// Follows a def value through an optional Operator(bind) to an
/// Operator(load) and returns the loaded name, stripped of its slash.
fn unwrap_loaded_name(tree: &SyntaxTree, value: NodeId) -> Option<String> {
    let mut node = value;
    if operator_name(tree, node) == Some("bind") {
        node = *tree.block(node)?.children.first()?;
    }
    if operator_name(tree, node) != Some("load") {
        return None;
    }
    let operand = *tree.block(node)?.children.first()?;
    let text = tree.leaf_text(operand)?;
    Some(text.strip_prefix('/').unwrap_or(text).to_string())
}
