use std::{borrow::Cow, fmt};

/// A lexeme cut from the script text.
///
/// `offset` is the character index of the first character of `text` in the
/// original script. Tokens are never rewritten after tokenizing, so joining
/// every token's `text` in order reproduces the script exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token<T> {
    pub kind: T,
    pub text: String,
    pub offset: usize,
}

impl<T> Token<T> {
    pub fn new(kind: T, text: impl Into<String>, offset: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            offset,
        }
    }

    /// Character index one past the end of this token.
    pub fn end(&self) -> usize {
        self.offset + self.text.chars().count()
    }
}

/// Token types of the mapping language.
///
/// The declaration order here has no meaning; the tie-breaking order used by
/// the tokenizer is the registration order in [`crate::lexer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenType {
    /// Characters no matcher accepted
    ///
    /// Never valid in a statement except inside an indexed target name.
    Text,

    /// Line or block comment
    ///
    /// # Examples
    /// ```text
    /// // trailing note
    /// /* spans
    ///    lines */
    /// ```
    Comment,

    /// Double-quoted name, quotes escaped by doubling
    ///
    /// # Examples
    /// ```text
    /// "first name"
    /// "say ""hi"""
    /// ```
    QuotedItem,

    /// Reference to a partial
    ///
    /// # Examples
    /// ```text
    /// <<address>>
    /// ```
    Partial,

    /// Variable reference
    ///
    /// # Examples
    /// ```text
    /// $(key)
    /// $(applicant-id)
    /// ```
    Variable,

    /// Line break followed by indentation, continues the current statement
    LineContinuation,

    /// One or more line breaks, ends the current statement
    NewLine,

    /// Spaces and tabs
    Whitespace,

    /// `::` between a partial name and its body
    PartialAssignment,

    /// `&&` in filters
    And,

    /// `||` in filters
    Or,

    /// `=` between target and source
    Equals,

    Dot,

    /// `[]` after a target segment, appends into an array
    ArrayMarker,

    OpenSquareBracket,
    CloseSquareBracket,
    OpenCurlyBracket,
    CloseCurlyBracket,
    Comma,

    /// `?` after a target segment: only map when the property exists
    QuestionMark,

    /// `!` after a target segment: only map when the property is absent.
    /// Negates a glob inside a filter.
    ExclamationMark,

    OpenRoundBracket,
    CloseRoundBracket,
    Colon,

    /// Bare name
    ///
    /// # Examples
    /// ```text
    /// person
    /// line_1
    /// x-ref
    /// ```
    Item,

    /// `*` inside a filter glob
    WildCard,
}

impl TokenType {
    pub const ALL: [TokenType; 26] = [
        TokenType::Text,
        TokenType::Comment,
        TokenType::QuotedItem,
        TokenType::Partial,
        TokenType::Variable,
        TokenType::LineContinuation,
        TokenType::NewLine,
        TokenType::Whitespace,
        TokenType::PartialAssignment,
        TokenType::And,
        TokenType::Or,
        TokenType::Equals,
        TokenType::Dot,
        TokenType::ArrayMarker,
        TokenType::OpenSquareBracket,
        TokenType::CloseSquareBracket,
        TokenType::OpenCurlyBracket,
        TokenType::CloseCurlyBracket,
        TokenType::Comma,
        TokenType::QuestionMark,
        TokenType::ExclamationMark,
        TokenType::OpenRoundBracket,
        TokenType::CloseRoundBracket,
        TokenType::Colon,
        TokenType::Item,
        TokenType::WildCard,
    ];
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Token<TokenType> {
    /// The meaning of the token, as opposed to its spelling.
    ///
    /// - `"a ""b"""` → `a "b"`
    /// - `$(key)` → `key`
    /// - `<<name>>` → `name`
    /// - anything else → its literal text
    pub fn value(&self) -> Cow<'_, str> {
        match self.kind {
            TokenType::QuotedItem => match strip(&self.text, "\"", "\"") {
                Some(inner) => Cow::Owned(inner.replace("\"\"", "\"")),
                None => Cow::Borrowed(&self.text),
            },
            TokenType::Variable => {
                Cow::Borrowed(strip(&self.text, "$(", ")").unwrap_or(&self.text))
            }
            TokenType::Partial => {
                Cow::Borrowed(strip(&self.text, "<<", ">>").unwrap_or(&self.text))
            }
            _ => Cow::Borrowed(&self.text),
        }
    }
}

fn strip<'a>(text: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    text.strip_prefix(prefix)?.strip_suffix(suffix)
}
