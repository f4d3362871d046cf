// tests/lexer_tests.rs

use jmap_lang::ast::{MappingToken, TokenType};
use jmap_lang::lexer::tokenize;

fn kinds(input: &str) -> Vec<TokenType> {
    tokenize(input).iter().map(|t| t.kind).collect()
}

fn pairs(input: &str) -> Vec<(TokenType, String)> {
    tokenize(input)
        .into_iter()
        .map(|t| (t.kind, t.text))
        .collect()
}

fn single(input: &str) -> MappingToken {
    let mut tokens = tokenize(input);
    assert_eq!(tokens.len(), 1, "expected one token for {:?}, got {:?}", input, tokens);
    tokens.remove(0)
}

// ============================================================================
// Punctuation
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("=", TokenType::Equals),
        (".", TokenType::Dot),
        ("[", TokenType::OpenSquareBracket),
        ("]", TokenType::CloseSquareBracket),
        ("{", TokenType::OpenCurlyBracket),
        ("}", TokenType::CloseCurlyBracket),
        ("(", TokenType::OpenRoundBracket),
        (")", TokenType::CloseRoundBracket),
        (",", TokenType::Comma),
        ("?", TokenType::QuestionMark),
        ("!", TokenType::ExclamationMark),
        (":", TokenType::Colon),
        ("*", TokenType::WildCard),
    ];

    for (input, expected) in test_cases {
        assert_eq!(single(input).kind, expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_two_char_tokens() {
    let test_cases = vec![
        ("::", TokenType::PartialAssignment),
        ("&&", TokenType::And),
        ("||", TokenType::Or),
        ("[]", TokenType::ArrayMarker),
    ];

    for (input, expected) in test_cases {
        assert_eq!(single(input).kind, expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_halves_of_operators_are_text() {
    assert_eq!(single("&").kind, TokenType::Text);
    assert_eq!(single("|").kind, TokenType::Text);
    assert_eq!(
        kinds(":::"),
        vec![TokenType::PartialAssignment, TokenType::Colon]
    );
}

#[test]
fn test_spaced_brackets_are_not_array_marker() {
    assert_eq!(
        kinds("[ ]"),
        vec![
            TokenType::OpenSquareBracket,
            TokenType::Whitespace,
            TokenType::CloseSquareBracket
        ]
    );
}

// ============================================================================
// Names, Variables and Partials
// ============================================================================

#[test]
fn test_item() {
    let token = single("first_name-2");
    assert_eq!(token.kind, TokenType::Item);
    assert_eq!(token.value(), "first_name-2");
}

#[test]
fn test_path() {
    assert_eq!(
        pairs("a.b"),
        vec![
            (TokenType::Item, "a".to_string()),
            (TokenType::Dot, ".".to_string()),
            (TokenType::Item, "b".to_string()),
        ]
    );
}

#[test]
fn test_variable() {
    let token = single("$(applicantId)");
    assert_eq!(token.kind, TokenType::Variable);
    assert_eq!(token.text, "$(applicantId)");
    assert_eq!(token.value(), "applicantId");
}

#[test]
fn test_partial() {
    let token = single("<<address-block>>");
    assert_eq!(token.kind, TokenType::Partial);
    assert_eq!(token.value(), "address-block");
}

#[test]
fn test_incomplete_variable_and_partial_fall_back() {
    assert_eq!(
        kinds("$(x"),
        vec![TokenType::Text, TokenType::OpenRoundBracket, TokenType::Item]
    );
    assert_eq!(kinds("<<>>"), vec![TokenType::Text]);
    assert_eq!(kinds("$()"), vec![TokenType::Text, TokenType::OpenRoundBracket, TokenType::CloseRoundBracket]);
}

#[test]
fn test_quoted_item() {
    let token = single(r#""first name""#);
    assert_eq!(token.kind, TokenType::QuotedItem);
    assert_eq!(token.value(), "first name");

    let token = single(r#""say ""hi""""#);
    assert_eq!(token.value(), r#"say "hi""#);
}

#[test]
fn test_empty_quotes_are_not_an_item() {
    assert_eq!(kinds(r#""""#), vec![TokenType::Text]);
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_newlines_group() {
    assert_eq!(
        pairs("a\n\r\nb"),
        vec![
            (TokenType::Item, "a".to_string()),
            (TokenType::NewLine, "\n\r\n".to_string()),
            (TokenType::Item, "b".to_string()),
        ]
    );
}

#[test]
fn test_line_continuation() {
    assert_eq!(
        pairs("a\n  b"),
        vec![
            (TokenType::Item, "a".to_string()),
            (TokenType::LineContinuation, "\n  ".to_string()),
            (TokenType::Item, "b".to_string()),
        ]
    );
    assert_eq!(kinds("a\n\tb")[1], TokenType::LineContinuation);
}

#[test]
fn test_line_continuation_over_blank_lines() {
    let tokens = pairs("a\n\n  \n  b");
    assert_eq!(tokens[1], (TokenType::LineContinuation, "\n\n  \n  ".to_string()));
    assert_eq!(tokens.len(), 3);
}

#[test]
fn test_trailing_blank_line_stays_a_newline() {
    let tokens = pairs("a\n  \nb");
    assert_eq!(
        tokens,
        vec![
            (TokenType::Item, "a".to_string()),
            (TokenType::LineContinuation, "\n  ".to_string()),
            (TokenType::NewLine, "\n".to_string()),
            (TokenType::Item, "b".to_string()),
        ]
    );
}

#[test]
fn test_whitespace() {
    assert_eq!(single(" \t ").kind, TokenType::Whitespace);
}

// ============================================================================
// Comments
// ============================================================================

#[test]
fn test_line_comment_stops_at_newline() {
    assert_eq!(
        pairs("a // note\nb"),
        vec![
            (TokenType::Item, "a".to_string()),
            (TokenType::Whitespace, " ".to_string()),
            (TokenType::Comment, "// note".to_string()),
            (TokenType::NewLine, "\n".to_string()),
            (TokenType::Item, "b".to_string()),
        ]
    );
}

#[test]
fn test_block_comment_spans_lines() {
    let tokens = pairs("a/* one\n two */b");
    assert_eq!(tokens[1], (TokenType::Comment, "/* one\n two */".to_string()));
    assert_eq!(tokens[2], (TokenType::Item, "b".to_string()));
}

#[test]
fn test_block_comment_with_stars() {
    assert_eq!(single("/***/").kind, TokenType::Comment);
    assert_eq!(single("/* ** / * */").kind, TokenType::Comment);
    assert_eq!(single("/*/ x */").kind, TokenType::Comment);
}

#[test]
fn test_lone_slash_is_text() {
    assert_eq!(kinds("a/b"), vec![TokenType::Item, TokenType::Text, TokenType::Item]);
}

// ============================================================================
// Fallback and Offsets
// ============================================================================

#[test]
fn test_unknown_characters_group_into_one_token() {
    let tokens = tokenize("a#%^b");
    assert_eq!(tokens[1].kind, TokenType::Text);
    assert_eq!(tokens[1].text, "#%^");
    assert_eq!(tokens[1].offset, 1);
    assert_eq!(tokens[2].offset, 4);
}

#[test]
fn test_offsets_count_characters() {
    let tokens = tokenize("é = x");
    assert_eq!(tokens[0].kind, TokenType::Text);
    let offsets: Vec<_> = tokens.iter().map(|t| t.offset).collect();
    assert_eq!(offsets, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_tokens_reassemble_input() {
    let scripts = [
        "",
        "a.b = c.d",
        "<<p>> :: people[$(id)]\n<<p>>.name = src[$(id)](:x)",
        "x[$(k){a* && !*b || (c)}] = \"q \"\"\"\n  .y?",
        "/* unterminated\n// line\r\n\t$( <<x >> ~~~",
    ];

    for script in scripts {
        let tokens = tokenize(script);
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, script);

        let mut expected = 0;
        for token in &tokens {
            assert_eq!(token.offset, expected, "offset of {:?} in {:?}", token, script);
            expected = token.end();
        }
    }
}
