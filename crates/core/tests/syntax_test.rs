//! Tests for tree building and the definition-idiom analysis pass.

use prettyps_core::error::FormatterError;
use prettyps_core::reader::PostScriptReader;
use prettyps_core::syntax;
use prettyps_core::syntax::tree::{BlockKind, NodeId, SyntaxTree};

fn parse(source: &str) -> SyntaxTree {
    let tokens = PostScriptReader::new(source)
        .read_to_end()
        .expect("fixture tokenizes");
    syntax::parse(tokens).expect("fixture parses")
}

fn root_children(tree: &SyntaxTree) -> Vec<NodeId> {
    tree.children(tree.root()).to_vec()
}

fn operator_name(tree: &SyntaxTree, id: NodeId) -> Option<String> {
    match &tree.block(id)?.kind {
        BlockKind::Operator(name) => Some(name.clone()),
        _ => None,
    }
}

#[test]
fn procedures_nest() {
    let tree = parse("{ 1 { 2 } }");
    let children = root_children(&tree);
    assert_eq!(children.len(), 1);

    let outer = tree.block(children[0]).expect("outer procedure");
    assert_eq!(outer.kind, BlockKind::Procedure);
    assert!(outer.start.is_some() && outer.end.is_some());
    assert_eq!(outer.children.len(), 2);

    let inner = tree.block(outer.children[1]).expect("inner procedure");
    assert_eq!(inner.kind, BlockKind::Procedure);
    assert_eq!(tree.text_of(children[0]), "{ 1 { 2 } }");
}

#[test]
fn truncated_procedure_keeps_no_end_marker() {
    let tree = parse("{ 1 2");
    let children = root_children(&tree);
    let block = tree.block(children[0]).expect("procedure");
    assert!(block.start.is_some());
    assert!(block.end.is_none());
    assert_eq!(tree.text_of(children[0]), "{ 1 2");
}

#[test]
fn stray_procedure_end_stays_a_leaf() {
    let tree = parse("1 }");
    let children = root_children(&tree);
    assert_eq!(children.len(), 2);
    assert!(!tree.is_block(children[1]));
    assert_eq!(tree.leaf_text(children[1]), Some("}"));
}

#[test]
fn load_folds_with_a_literal_name() {
    let tree = parse("/x load");
    let children = root_children(&tree);
    assert_eq!(children.len(), 1);
    assert_eq!(operator_name(&tree, children[0]).as_deref(), Some("load"));
    assert_eq!(tree.text_of(children[0]), "/x load");
}

#[test]
fn load_needs_a_literal_name_operand() {
    let tree = parse("x load");
    let children = root_children(&tree);
    assert_eq!(children.len(), 2);
    assert!(!tree.is_block(children[0]));
    assert!(!tree.is_block(children[1]));
}

#[test]
fn bind_folds_a_procedure() {
    let tree = parse("{ 1 add } bind");
    let children = root_children(&tree);
    assert_eq!(children.len(), 1);
    assert_eq!(operator_name(&tree, children[0]).as_deref(), Some("bind"));
    assert_eq!(tree.text_of(children[0]), "{ 1 add } bind");
}

#[test]
fn def_folds_and_registers_the_definition() {
    let tree = parse("/x 42 def");
    let children = root_children(&tree);
    assert_eq!(children.len(), 1);
    assert_eq!(operator_name(&tree, children[0]).as_deref(), Some("def"));
    assert_eq!(tree.definitions().get("x").map(Vec::len), Some(1));
    assert!(tree.aliases().is_empty());
}

#[test]
fn procedure_values_do_not_fold_without_bind() {
    let tree = parse("/p { 1 } def");
    let children = root_children(&tree);
    assert_eq!(children.len(), 3);
    assert!(tree.definitions().is_empty());
}

#[test]
fn cascading_folds_build_the_alias_table() {
    let tree = parse("/myop /lineto load def");
    let children = root_children(&tree);
    assert_eq!(children.len(), 1, "everything folds into one def");
    assert_eq!(tree.text_of(children[0]), "/myop /lineto load def");
    assert_eq!(tree.resolve_alias("myop"), Some("lineto"));
}

#[test]
fn bind_wrapped_load_still_registers_an_alias() {
    let tree = parse("/q /moveto load bind def");
    assert_eq!(tree.resolve_alias("q"), Some("moveto"));
}

#[test]
fn aliases_chain_through_earlier_definitions() {
    let tree = parse("/a /lineto load def /b /a load def");
    assert_eq!(tree.resolve_alias("a"), Some("lineto"));
    assert_eq!(tree.resolve_alias("b"), Some("lineto"));
}

#[test]
fn unrecognized_loaded_names_register_no_alias() {
    let tree = parse("/a /zzz load def");
    assert_eq!(tree.definitions().get("a").map(Vec::len), Some(1));
    assert!(tree.aliases().is_empty());
}

#[test]
fn redefined_keys_are_pruned_from_the_alias_table() {
    let tree = parse("/m /moveto load def /m 42 def");
    assert_eq!(tree.definitions().get("m").map(Vec::len), Some(2));
    assert_eq!(tree.resolve_alias("m"), None);
    assert!(!tree.aliases().contains_key("m"));
}

#[test]
fn conflicting_aliases_do_not_resolve() {
    let tree = parse("/m /moveto load def /m /lineto load def");
    assert!(tree.aliases().contains_key("m"), "both candidates recorded");
    assert_eq!(tree.resolve_alias("m"), None);
}

#[test]
fn aliased_def_keyword_folds_too() {
    let tree = parse("/d /def load def /x 1 d");
    let children = root_children(&tree);
    assert_eq!(children.len(), 2);
    assert_eq!(operator_name(&tree, children[1]).as_deref(), Some("def"));
    assert_eq!(tree.definitions().get("x").map(Vec::len), Some(1));
}

#[test]
fn folds_happen_inside_procedures() {
    let tree = parse("{ /x /lineto load def }");
    let children = root_children(&tree);
    let procedure = tree.block(children[0]).expect("procedure");
    assert_eq!(procedure.children.len(), 1);
    assert_eq!(
        operator_name(&tree, procedure.children[0]).as_deref(),
        Some("def")
    );
    assert_eq!(tree.resolve_alias("x"), Some("lineto"));
}

#[test]
fn definition_key_rejects_non_def_nodes() {
    let tree = parse("/x 42 def");
    let err = tree.definition_key(tree.root()).unwrap_err();
    assert!(
        matches!(err, FormatterError::AnalysisInconsistency(_)),
        "got {err:?}"
    );
}

#[test]
fn definition_key_strips_the_slash() {
    let tree = parse("/x 42 def");
    let op = tree.definitions()["x"][0];
    assert_eq!(tree.definition_key(op).unwrap(), "x");
}
