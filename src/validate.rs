//! Variable binding checks run on every parsed statement.

use std::collections::HashSet;

use crate::{
    ast::{MappingToken, MappingTree, RuleType, TokenType},
    error::{BadToken, CompileError},
};

fn variables(tree: &MappingTree, side: RuleType) -> Vec<&MappingToken> {
    tree.child(side)
        .map(|node| node.tokens())
        .unwrap_or_default()
        .into_iter()
        .filter(|t| t.kind == TokenType::Variable)
        .collect()
}

/// Checks that source variables are each declared once and that the target
/// only uses variables the source declares.
pub fn validate(tree: &MappingTree) -> Result<(), CompileError> {
    let mut source = variables(tree, RuleType::Source);
    // Partial bodies keep the offsets of their definition, so a variable
    // brought in by a partial counts as earlier than the statement's own.
    source.sort_by_key(|t| t.offset);

    let mut declared = HashSet::new();
    let duplicates: Vec<BadToken> = source
        .iter()
        .filter(|t| !declared.insert(t.value()))
        .map(|t| BadToken::from(*t))
        .collect();
    if !duplicates.is_empty() {
        return Err(CompileError::DuplicateSourceVariables(duplicates));
    }

    let undefined: Vec<BadToken> = variables(tree, RuleType::Target)
        .into_iter()
        .filter(|t| !declared.contains(&t.value()))
        .map(BadToken::from)
        .collect();
    if !undefined.is_empty() {
        return Err(CompileError::UndefinedTargetVariables(undefined));
    }

    Ok(())
}
