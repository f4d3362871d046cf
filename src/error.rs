use std::fmt;

use thiserror::Error;

use crate::{
    ast::{MappingToken, TokenType},
    grammar::SyntaxError,
    position::{LineColumn, LineIndex},
};

/// A token an error points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadToken {
    pub kind: TokenType,
    /// Literal text as written in the script
    pub text: String,
    /// Character offset into the script
    pub offset: usize,
    /// Resolved position; `None` when it could not be worked out
    pub location: Option<LineColumn>,
}

impl BadToken {
    fn locate(&mut self, index: &LineIndex) {
        if self.location.is_none() {
            self.location = index.locate(self.offset);
        }
    }
}

impl From<&MappingToken> for BadToken {
    fn from(token: &MappingToken) -> Self {
        BadToken {
            kind: token.kind,
            text: token.text.clone(),
            offset: token.offset,
            location: None,
        }
    }
}

impl fmt::Display for BadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' [{}] ", self.text, self.kind)?;
        match self.location {
            Some(location) => write!(f, "at {location}"),
            None => write!(f, "at index {}", self.offset),
        }
    }
}

fn after(token: &Option<BadToken>) -> String {
    token
        .as_ref()
        .map(|t| format!(" after {t}"))
        .unwrap_or_default()
}

fn list(tokens: &[BadToken]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a script failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The statement stopped short; points at its last token.
    #[error("unexpected end of tokens{}", after(.0))]
    UnexpectedEnd(Option<BadToken>),

    #[error("unexpected token {0}")]
    UnexpectedToken(BadToken),

    #[error("variables defined more than once in source: {}", list(.0))]
    DuplicateSourceVariables(Vec<BadToken>),

    #[error("variables used in target but not defined in source: {}", list(.0))]
    UndefinedTargetVariables(Vec<BadToken>),

    #[error("partial defined multiple times: {0}")]
    PartialDefinedMultipleTimes(BadToken),

    #[error("partial depends on itself: {0}")]
    PartialDependsOnSelf(BadToken),

    #[error("no definition found for partial {0}")]
    PartialMissing(BadToken),

    #[error("circular dependencies found in partial definitions: {}", list(.0))]
    CircularPartials(Vec<BadToken>),
}

impl CompileError {
    /// Tokens the error points at, in script order.
    pub fn tokens(&self) -> &[BadToken] {
        match self {
            CompileError::UnexpectedEnd(token) => token.as_slice(),
            CompileError::UnexpectedToken(token)
            | CompileError::PartialDefinedMultipleTimes(token)
            | CompileError::PartialDependsOnSelf(token)
            | CompileError::PartialMissing(token) => std::slice::from_ref(token),
            CompileError::DuplicateSourceVariables(tokens)
            | CompileError::UndefinedTargetVariables(tokens)
            | CompileError::CircularPartials(tokens) => tokens,
        }
    }

    /// Fills in line and column for every token against the script text.
    pub(crate) fn locate(mut self, index: &LineIndex) -> Self {
        let tokens: &mut [BadToken] = match &mut self {
            CompileError::UnexpectedEnd(token) => token.as_mut_slice(),
            CompileError::UnexpectedToken(token)
            | CompileError::PartialDefinedMultipleTimes(token)
            | CompileError::PartialDependsOnSelf(token)
            | CompileError::PartialMissing(token) => std::slice::from_mut(token),
            CompileError::DuplicateSourceVariables(tokens)
            | CompileError::UndefinedTargetVariables(tokens)
            | CompileError::CircularPartials(tokens) => tokens,
        };
        for token in tokens {
            token.locate(index);
        }
        self
    }
}

impl From<SyntaxError<TokenType>> for CompileError {
    fn from(error: SyntaxError<TokenType>) -> Self {
        match error {
            SyntaxError::UnexpectedEnd(last) => {
                CompileError::UnexpectedEnd(last.as_ref().map(BadToken::from))
            }
            SyntaxError::UnexpectedToken(token) => CompileError::UnexpectedToken((&token).into()),
        }
    }
}

/// Failures while applying a compiled mapping. A mapping that compiled only
/// hits these when handed documents of the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    #[error("a statement without a target needs an object to merge into the root, found {found}")]
    RootMergeRequiresObject { found: &'static str },

    #[error("the target document must be an object, found {found}")]
    TargetNotObject { found: &'static str },

    #[error("variable '{0}' is not bound")]
    UnboundVariable(String),
}
