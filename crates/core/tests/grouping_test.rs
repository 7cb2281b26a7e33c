//! Tests for region grouping, including the documented pairing policy for
//! repeated same-name markers.

use prettyps_core::reader::PostScriptReader;
use prettyps_core::syntax;
use prettyps_core::syntax::grouping;
use prettyps_core::syntax::tree::{BlockKind, NodeId, SyntaxTree};

fn grouped(source: &str) -> SyntaxTree {
    let tokens = PostScriptReader::new(source)
        .read_to_end()
        .expect("fixture tokenizes");
    let mut tree = syntax::parse(tokens).expect("fixture parses");
    grouping::group_regions(&mut tree);
    tree
}

fn root_children(tree: &SyntaxTree) -> Vec<NodeId> {
    tree.children(tree.root()).to_vec()
}

fn is_region(tree: &SyntaxTree, id: NodeId) -> bool {
    tree.block(id).is_some_and(|b| b.kind == BlockKind::Region)
}

fn marker_texts(tree: &SyntaxTree, id: NodeId) -> (String, String) {
    let block = tree.block(id).expect("region block");
    let start = block
        .start
        .and_then(|m| tree.leaf_text(m))
        .unwrap_or_default();
    let end = block
        .end
        .and_then(|m| tree.leaf_text(m))
        .unwrap_or_default();
    (start.to_string(), end.to_string())
}

#[test]
fn balanced_pair_folds_into_one_region() {
    let tree = grouped("save 1 2 add restore");
    let children = root_children(&tree);
    assert_eq!(children.len(), 1);
    assert!(is_region(&tree, children[0]));
    assert_eq!(
        marker_texts(&tree, children[0]),
        ("save".to_string(), "restore".to_string())
    );

    let inner: Vec<String> = tree
        .children(children[0])
        .iter()
        .map(|&id| tree.text_of(id))
        .collect();
    assert_eq!(inner, vec!["1", "2", "add"]);
}

#[test]
fn odd_marker_count_groups_nothing() {
    let tree = grouped("begin 1 2");
    let children = root_children(&tree);
    assert_eq!(children.len(), 3);
    assert!(children.iter().all(|&id| !tree.is_block(id)));
}

#[test]
fn nested_same_marker_pairs_use_first_start_next_end() {
    // The pairing policy takes the first `begin` together with the first
    // `end` encountered, so the inner `begin` lands inside the region one
    // level deeper than a bracket-matched reading would put it, and the
    // trailing `end` stays behind as a plain leaf.
    let tree = grouped("begin begin end end");
    let children = root_children(&tree);
    assert_eq!(children.len(), 2);

    assert!(is_region(&tree, children[0]));
    assert_eq!(
        marker_texts(&tree, children[0]),
        ("begin".to_string(), "end".to_string())
    );
    let inner: Vec<String> = tree
        .children(children[0])
        .iter()
        .map(|&id| tree.text_of(id))
        .collect();
    assert_eq!(inner, vec!["begin"]);

    assert!(!tree.is_block(children[1]));
    assert_eq!(tree.leaf_text(children[1]), Some("end"));
}

#[test]
fn dsc_comment_markers_group_like_literals() {
    let tree = grouped("%%BeginProlog\n/x 42 def\n%%EndProlog");
    let children = root_children(&tree);
    assert_eq!(children.len(), 1);
    assert!(is_region(&tree, children[0]));
    assert_eq!(
        marker_texts(&tree, children[0]),
        ("%%BeginProlog".to_string(), "%%EndProlog".to_string())
    );

    let inner = tree.children(children[0]);
    assert_eq!(inner.len(), 1);
    assert!(matches!(
        tree.block(inner[0]).map(|b| &b.kind),
        Some(BlockKind::Operator(name)) if name == "def"
    ));
}

#[test]
fn partial_dsc_comments_do_not_match() {
    // Marker comparison is whole-text equality; a trailing comment body
    // keeps the line from matching.
    let tree = grouped("%%BeginProlog: setup\n1\n%%EndProlog");
    let children = root_children(&tree);
    assert_eq!(children.len(), 3);
}

#[test]
fn grouping_recurses_into_procedures() {
    let tree = grouped("{ save 1 restore }");
    let children = root_children(&tree);
    let procedure = tree.block(children[0]).expect("procedure");
    assert_eq!(procedure.children.len(), 1);
    assert!(is_region(&tree, procedure.children[0]));
}

#[test]
fn earlier_pairs_nest_inside_later_ones() {
    // begin/end groups before save/restore, so the save region wraps the
    // begin region.
    let tree = grouped("save begin 1 end restore");
    let children = root_children(&tree);
    assert_eq!(children.len(), 1);
    assert_eq!(
        marker_texts(&tree, children[0]),
        ("save".to_string(), "restore".to_string())
    );

    let inner = tree.children(children[0]);
    assert_eq!(inner.len(), 1);
    assert_eq!(
        marker_texts(&tree, inner[0]),
        ("begin".to_string(), "end".to_string())
    );
}

#[test]
fn repeated_pairs_at_one_level_all_fold() {
    let tree = grouped("save 1 restore save 2 restore");
    let children = root_children(&tree);
    assert_eq!(children.len(), 2);
    assert!(children.iter().all(|&id| is_region(&tree, id)));
}
