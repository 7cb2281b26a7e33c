//! Alias inlining: rewrites aliased names to their canonical operator
//! names, then removes the definitions that no call site uses anymore.

use crate::syntax::operators::is_builtin_operator;
use crate::syntax::tree::{BlockKind, NodeId, SyntaxTree};

/// Rewrites every name that resolves through the alias table to its
/// canonical operator name and deletes the now-dead alias definitions.
pub fn inline_aliases(tree: &mut SyntaxTree) {
    let root = tree.root();
    rewrite_block(tree, root);

    for dead in tree.take_single_candidate_aliases() {
        if let Some(parent) = tree.parent(dead) {
            tree.remove_child(parent, dead);
        }
    }
}

fn rewrite_block(tree: &mut SyntaxTree, block: NodeId) {
    // An Operator whose keyword was an alias gets the canonical spelling.
    if let Some(BlockKind::Operator(canonical)) = tree.block(block).map(|b| b.kind.clone()) {
        let keyword = tree.block(block).and_then(|b| b.end);
        if let Some(keyword) = keyword {
            if tree.leaf_text(keyword).is_some_and(|text| text != canonical) {
                tree.set_leaf_text(keyword, canonical);
            }
        }
    }

    for child in tree.children(block).to_vec() {
        if tree.is_block(child) {
            rewrite_block(tree, child);
        } else if tree.is_executable_name_leaf(child) {
            rewrite_name(tree, child);
        }
    }
}

fn rewrite_name(tree: &mut SyntaxTree, leaf: NodeId) {
    let Some(text) = tree.leaf_text(leaf).map(str::to_string) else {
        return;
    };
    // Builtins resolve to themselves; aliases cannot shadow them.
    if is_builtin_operator(&text) {
        return;
    }
    if let Some(canonical) = tree.resolve_alias(&text).map(str::to_string) {
        if canonical != text {
            tree.set_leaf_text(leaf, canonical);
        }
    }
}
