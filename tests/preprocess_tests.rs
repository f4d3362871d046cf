// tests/preprocess_tests.rs

use jmap_lang::error::CompileError;
use jmap_lang::lexer::tokenize;
use jmap_lang::mapping::Mapping;
use jmap_lang::preprocess::{expand_partials, split_statements};
use serde_json::json;

fn expand(script: &str) -> Result<Vec<String>, CompileError> {
    let statements = expand_partials(split_statements(tokenize(script)))?;
    Ok(statements
        .iter()
        .map(|s| s.iter().map(|t| t.text.as_str()).collect::<String>())
        .collect())
}

fn error_texts(error: &CompileError) -> Vec<String> {
    error.tokens().iter().map(|t| t.text.clone()).collect()
}

// ============================================================================
// Substitution
// ============================================================================

#[test]
fn test_definitions_are_removed() {
    let statements = expand("<<p>> :: people[$(id)]\n<<p>>.name = src[$(id)].n").unwrap();
    assert_eq!(statements, vec!["people[$(id)].name=src[$(id)].n"]);
}

#[test]
fn test_partial_used_on_both_sides() {
    let statements = expand("<<x>> :: a.b\n<<x>> = <<x>>").unwrap();
    assert_eq!(statements, vec!["a.b=a.b"]);
}

#[test]
fn test_substituted_tokens_keep_their_offsets() {
    let statements = expand_partials(split_statements(tokenize("<<p>> :: zz\n<<p>> = y"))).unwrap();
    let first = &statements[0][0];
    assert_eq!(first.text, "zz");
    assert_eq!(first.offset, 9);
}

#[test]
fn test_partial_variable_counts_as_first_declaration() {
    // the statement's own $(k) comes first in the text but the partial's
    // body was written earlier in the script
    let error = Mapping::compile("<<p>> :: a[$(k)]\nx = b[$(k)].<<p>>").unwrap_err();
    let CompileError::DuplicateSourceVariables(tokens) = &error else {
        panic!("unexpected error: {:?}", error);
    };
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].offset, 23);
    assert_eq!(tokens[0].location.map(|l| (l.line, l.column)), Some((2, 7)));
}

#[test]
fn test_nested_partials_in_any_order() {
    let script = "\
<<c>> :: <<b>>.c
<<a>> :: root
<<b>> :: <<a>>.b
<<c>> = x";
    assert_eq!(expand(script).unwrap(), vec!["root.b.c=x"]);
}

#[test]
fn test_long_partial_chain() {
    let mut script = String::from("<<p0>> :: base\n");
    for i in 1..50 {
        script.push_str(&format!("<<p{}>> :: <<p{}>>.s{}\n", i, i - 1, i));
    }
    script.push_str("<<p49>> = v");

    let statements = expand(&script).unwrap();
    assert_eq!(statements.len(), 1);
    assert!(statements[0].starts_with("base.s1.s2."));
    assert!(statements[0].ends_with(".s48.s49=v"));
}

#[test]
fn test_definitions_only() {
    assert!(expand("<<a>> :: x\n<<b>> :: <<a>>").unwrap().is_empty());
}

#[test]
fn test_unused_partial_is_fine() {
    assert_eq!(expand("<<a>> :: x\ny = z").unwrap(), vec!["y=z"]);
}

#[test]
fn test_partial_with_continuation() {
    let script = "<<p>> :: people\n    [$(id)]\n<<p>> = src[$(id)]";
    assert_eq!(expand(script).unwrap(), vec!["people[$(id)]=src[$(id)]"]);
}

#[test]
fn test_partials_compile_and_apply() {
    let script = "\
// where every person lives
<<person>> :: people[$(id)]
<<person>>.name = applicants[$(id)].fullName
<<person>>.age = applicants[$(id)].age";
    let mapping = Mapping::compile(script).unwrap();
    assert_eq!(mapping.len(), 2);

    let source = json!({"applicants": {"a1": {"fullName": "Ada", "age": 36}}});
    let mut target = json!({});
    mapping.apply(&source, &mut target).unwrap();
    assert_eq!(target, json!({"people": {"a1": {"name": "Ada", "age": 36}}}));
}

// ============================================================================
// Definition Errors
// ============================================================================

#[test]
fn test_duplicate_definition() {
    let error = expand("<<a>> :: x\n<<a>> :: y").unwrap_err();
    assert!(matches!(error, CompileError::PartialDefinedMultipleTimes(_)));
    assert_eq!(error.tokens()[0].offset, 11);
}

#[test]
fn test_self_reference() {
    let error = expand("<<a>> :: x.<<a>>").unwrap_err();
    assert!(matches!(error, CompileError::PartialDependsOnSelf(_)));
    assert_eq!(error.tokens()[0].offset, 11);
}

#[test]
fn test_circular_definitions() {
    let error = expand("<<a>> :: <<b>>\n<<b>> :: <<a>>\nx = y").unwrap_err();
    assert!(matches!(error, CompileError::CircularPartials(_)));
    assert_eq!(error_texts(&error), vec!["<<a>>", "<<b>>"]);
}

#[test]
fn test_cycle_reports_only_stuck_definitions() {
    let script = "<<ok>> :: z\n<<a>> :: <<ok>>.<<b>>\n<<b>> :: <<c>>\n<<c>> :: <<a>>";
    let error = expand(script).unwrap_err();
    assert_eq!(error_texts(&error), vec!["<<a>>", "<<b>>", "<<c>>"]);
}

#[test]
fn test_missing_partial_in_statement() {
    let error = expand("<<nope>>.x = y").unwrap_err();
    assert!(matches!(error, CompileError::PartialMissing(_)));
    assert_eq!(error_texts(&error), vec!["<<nope>>"]);
}

#[test]
fn test_missing_partial_in_definition() {
    let error = expand("<<a>> :: <<nope>>\n<<a>> = x").unwrap_err();
    assert!(matches!(error, CompileError::PartialMissing(_)));
    assert_eq!(error.tokens()[0].offset, 9);
}

#[test]
fn test_errors_carry_positions() {
    let error = Mapping::compile("x = y\n<<a>> :: <<b>>\n<<b>> :: <<a>>").unwrap_err();
    let lines: Vec<_> = error
        .tokens()
        .iter()
        .map(|t| t.location.map(|l| l.line))
        .collect();
    assert_eq!(lines, vec![Some(2), Some(3)]);
    assert_eq!(
        error.to_string(),
        "circular dependencies found in partial definitions: \
         '<<a>>' [Partial] at line 2, column 1, '<<b>>' [Partial] at line 3, column 1"
    );
}
