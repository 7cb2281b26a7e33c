//! Region grouping: folds matched literal-marker pairs into Region nodes.

use crate::syntax::tree::{NodeId, SyntaxTree};

/// Marker pairs folded by [`group_regions`], applied in this order; each
/// pair is run to exhaustion across the whole tree before the next starts.
pub const GROUPING_PAIRS: &[(&str, &str)] = &[
    ("%%BeginProlog", "%%EndProlog"),
    ("%%BeginSetup", "%%EndSetup"),
    ("%%BeginPageSetup", "%%EndPageSetup"),
    ("%%BeginDefaults", "%%EndDefaults"),
    ("begin", "end"),
    ("save", "restore"),
    ("gsave", "grestore"),
];

pub fn group_regions(tree: &mut SyntaxTree) {
    let root = tree.root();
    for (start, end) in GROUPING_PAIRS {
        group(tree, root, start, end);
    }
}

/// Exhaustively folds `start`/`end` marker spans among the direct children
/// of `block`, then recurses into nested blocks.
///
/// Pairing takes the first start marker together with the next end-marker
/// occurrence. This is not a nested bracket match: repeated same-name
/// markers at depth can mis-pair, folding the inner start into the region
/// and leaving the trailing end behind (see the grouping tests).
pub fn group(tree: &mut SyntaxTree, block: NodeId, start: &str, end: &str) {
    while let Some((start_index, end_index)) = find_pair(tree, block, start, end) {
        tree.fold_region(block, start_index, end_index);
    }

    let nested: Vec<NodeId> = tree
        .children(block)
        .iter()
        .copied()
        .filter(|&child| tree.is_block(child))
        .collect();
    for child in nested {
        group(tree, child, start, end);
    }
}

fn find_pair(tree: &SyntaxTree, block: NodeId, start: &str, end: &str) -> Option<(usize, usize)> {
    let markers: Vec<(usize, bool)> = tree
        .children(block)
        .iter()
        .enumerate()
        .filter_map(|(index, &id)| {
            let text = tree.leaf_text(id)?;
            if text == start {
                Some((index, true))
            } else if text == end {
                Some((index, false))
            } else {
                None
            }
        })
        .collect();

    if markers.is_empty() || markers.len() % 2 != 0 {
        return None;
    }

    let first_start = markers.iter().position(|&(_, is_start)| is_start)?;
    let next_end = markers[first_start + 1..]
        .iter()
        .find(|&&(_, is_start)| !is_start)?;
    Some((markers[first_start].0, next_end.0))
}
