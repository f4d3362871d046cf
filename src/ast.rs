//! # Mapping Language - Syntax Types
//!
//! Types shared by every stage of the compiler:
//!
//! - **[tokens]** - [`Token`] and the mapping language's [`TokenType`]s
//! - **[rules]** - [`RuleType`], the rules of the mapping grammar
//! - **[tree]** - [`ParseTree`], the output of the grammar engine
//!
//! ## Statements
//!
//! A script is a list of statements, one per line, each copying values from
//! the source document into the target document:
//!
//! ```text
//! target.path = source.path
//! ```
//!
//! ### Fixed paths
//!
//! ```text
//! person.name = applicant."full name"
//! ```
//!
//! ### Indexed paths and variables
//!
//! `[$(k)]` on the source side iterates every property (or element) and binds
//! its key (or index) to `k`; on the target side it rebuilds the property name.
//!
//! ```text
//! people[$(id)] = applicants[$(id)]
//! byName[$(n)] = applicants[$(id), $(n)(:name)]
//! ```
//!
//! ### Filters
//!
//! ```text
//! ids[$(k)] = items[$(k){x* && !*-old}]
//! ```
//!
//! ### Target modifiers
//!
//! ```text
//! a.b? = c        // only when b already exists
//! a.b! = c        // only when b is absent
//! list[] = c      // append to an array
//! a[$(k)]{meta.key: $(k)} = c[$(k)]
//! ```
//!
//! ### Partials
//!
//! ```text
//! <<person>> :: people[$(id)]
//! <<person>>.name = applicants[$(id)].name
//! ```
pub mod rules;
pub mod tokens;
pub mod tree;

pub use rules::RuleType;
pub use tokens::{Token, TokenType};
pub use tree::ParseTree;

/// A token of a mapping script.
pub type MappingToken = Token<TokenType>;

/// A parse tree of one mapping statement.
pub type MappingTree = ParseTree<TokenType, RuleType>;
