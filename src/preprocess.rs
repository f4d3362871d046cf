//! Turns a token stream into parser-ready statements.
//!
//! Layout tokens are dropped, newlines split statements, and partial
//! definitions (`<<name>> :: tokens...`) are pulled out and substituted
//! wherever `<<name>>` is referenced.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::{
    ast::{MappingToken, TokenType},
    error::{BadToken, CompileError},
};

/// Tokens of one logical statement.
pub type StatementTokens = Vec<MappingToken>;

fn is_layout(kind: TokenType) -> bool {
    matches!(
        kind,
        TokenType::Whitespace | TokenType::Comment | TokenType::LineContinuation
    )
}

/// Splits tokens into statements at newlines.
///
/// Whitespace, comments and line continuations never reach a statement.
/// Lines holding nothing else produce no statement at all.
pub fn split_statements(tokens: impl IntoIterator<Item = MappingToken>) -> Vec<StatementTokens> {
    let mut statements = Vec::new();
    let mut current = Vec::new();

    for token in tokens {
        match token.kind {
            kind if is_layout(kind) => {}
            TokenType::NewLine => {
                if !current.is_empty() {
                    statements.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(token),
        }
    }

    if !current.is_empty() {
        statements.push(current);
    }

    statements
}

struct Definition {
    name: MappingToken,
    body: Vec<MappingToken>,
    /// Partials referenced by the body that are not substituted yet
    pending: HashSet<String>,
}

fn is_definition(statement: &[MappingToken]) -> bool {
    matches!(
        statement,
        [first, second, ..]
            if first.kind == TokenType::Partial && second.kind == TokenType::PartialAssignment
    )
}

/// Removes partial definitions from `statements` and substitutes every
/// reference to them.
///
/// Partials may use other partials. They are resolved in passes, each pass
/// expanding every partial whose own references are already expanded, until
/// a pass makes no progress.
pub fn expand_partials(statements: Vec<StatementTokens>) -> Result<Vec<StatementTokens>, CompileError> {
    let mut definitions: Vec<Definition> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut output = Vec::new();

    for mut statement in statements {
        if !is_definition(&statement) {
            output.push(statement);
            continue;
        }

        let body = statement.split_off(2);
        let name = statement.swap_remove(0);
        let key = name.value().into_owned();
        if by_name.contains_key(&key) {
            return Err(CompileError::PartialDefinedMultipleTimes((&name).into()));
        }

        let mut pending = HashSet::new();
        for token in body.iter().filter(|t| t.kind == TokenType::Partial) {
            if token.value() == key {
                return Err(CompileError::PartialDependsOnSelf(token.into()));
            }
            pending.insert(token.value().into_owned());
        }

        by_name.insert(key, definitions.len());
        definitions.push(Definition { name, body, pending });
    }

    debug!(partials = definitions.len(), "collected partial definitions");
    resolve(&mut definitions, &by_name)?;

    let mut expanded = Vec::with_capacity(output.len());
    for statement in output {
        if statement.iter().any(|t| t.kind == TokenType::Partial) {
            expanded.push(substitute(&statement, &definitions, &by_name)?);
        } else {
            expanded.push(statement);
        }
    }
    Ok(expanded)
}

fn resolve(
    definitions: &mut [Definition],
    by_name: &HashMap<String, usize>,
) -> Result<(), CompileError> {
    let mut unresolved: HashSet<String> = definitions
        .iter()
        .filter(|d| !d.pending.is_empty())
        .map(|d| d.name.value().into_owned())
        .collect();
    let mut pass = 0;

    while !unresolved.is_empty() {
        pass += 1;
        let ready: Vec<usize> = definitions
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.pending.is_empty())
            .filter(|(_, d)| d.pending.iter().all(|p| !unresolved.contains(p)))
            .map(|(i, _)| i)
            .collect();

        if ready.is_empty() {
            let cycle = definitions
                .iter()
                .filter(|d| !d.pending.is_empty())
                .map(|d| BadToken::from(&d.name))
                .collect();
            return Err(CompileError::CircularPartials(cycle));
        }

        for i in ready {
            let body = substitute(&definitions[i].body, definitions, by_name)?;
            let definition = &mut definitions[i];
            trace!(partial = %definition.name.value(), pass, "expanded partial");
            definition.body = body;
            definition.pending.clear();
            unresolved.remove(&*definition.name.value());
        }
    }

    Ok(())
}

fn substitute(
    tokens: &[MappingToken],
    definitions: &[Definition],
    by_name: &HashMap<String, usize>,
) -> Result<Vec<MappingToken>, CompileError> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.kind != TokenType::Partial {
            out.push(token.clone());
            continue;
        }
        let definition = by_name
            .get(&*token.value())
            .map(|&i| &definitions[i])
            .ok_or_else(|| CompileError::PartialMissing(token.into()))?;
        out.extend(definition.body.iter().cloned());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn texts(statements: &[StatementTokens]) -> Vec<String> {
        statements
            .iter()
            .map(|s| s.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(" "))
            .collect()
    }

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        let statements = split_statements(tokenize("a=b\n\n// note\n\nc=d\n"));
        assert_eq!(texts(&statements), vec!["a = b", "c = d"]);
    }

    #[test]
    fn test_line_continuation_joins_lines() {
        let statements = split_statements(tokenize("a.b\n  = c\nd = e"));
        assert_eq!(texts(&statements), vec!["a . b = c", "d = e"]);
    }

    #[test]
    fn test_definition_needs_assignment_in_second_place() {
        let statements = split_statements(tokenize("<<p>> = x"));
        assert!(!is_definition(&statements[0]));
        let statements = split_statements(tokenize("<<p>> :: x"));
        assert!(is_definition(&statements[0]));
    }
}
