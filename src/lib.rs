pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod error;
pub mod extract;
pub mod grammar;
pub mod lexer;
pub mod mapping;
pub mod parser;
pub mod position;
pub mod preprocess;
pub mod transform;
pub mod validate;
pub mod value;

pub use ast::{MappingToken, MappingTree, ParseTree, RuleType, Token, TokenType};
pub use error::{BadToken, CompileError, ExecError};
pub use extract::{Binding, SourcePath};
pub use grammar::{Grammar, GrammarBuilder, GrammarError, SyntaxError};
pub use lexer::{Tokenizer, tokenize};
pub use mapping::{Mapping, Statement};
pub use position::{LineColumn, LineIndex};
pub use transform::TargetPath;
