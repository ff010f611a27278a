//! Loads the bundled zvelte grammar the way a downstream binding would.

use zvelte_grammar::{verify_grammar_loads, GrammarSource, Zvelte};

#[test]
fn can_load_grammar() {
    if let Err(err) = verify_grammar_loads(&Zvelte) {
        panic!("{err}");
    }
}

#[test]
fn bundled_language_matches_the_grammar_source() {
    let language = zvelte_grammar::language().expect("bundled grammar loads");
    assert_eq!(language.name(), "zvelte");
    assert_eq!(language.start_rule(), "document");
    assert_eq!(language.conflicts(), [vec!["elseif_block"], vec!["else_block"]]);

    for kind in [
        "comment",
        "regular_element",
        "component",
        "if_tag",
        "for_tag",
        "snippet_tag",
        "expression_tag",
        "binary_expression",
        "filter_expression",
    ] {
        assert!(language.has_rule(kind), "missing rule {kind}");
    }
    assert!(language.node_kinds().iter().all(|kind| !kind.starts_with('_')));
}

#[test]
fn bundled_source_provider_verifies() {
    let provider = GrammarSource::Bundled.provider();
    assert!(verify_grammar_loads(provider.as_ref()).is_ok());
}

#[test]
fn grammar_written_to_disk_verifies() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grammar.json");
    std::fs::write(&path, zvelte_grammar::GRAMMAR_JSON).unwrap();

    let provider = GrammarSource::File(path).provider();
    assert!(verify_grammar_loads(provider.as_ref()).is_ok());
}
