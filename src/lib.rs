//! # Semantic functions
//!
//! A descriptor is a short program stored as text, such as
//! `person.age greater than 20 or toBool 0`. [`SemanticFn::build`] compiles it
//! once into a function of named arguments, calling it evaluates the
//! descriptor against those arguments and a readonly global scope.
//!
//! ``` rust
//! use semfn::{Options, SemanticFn, Value};
//!
//! let is_adult = SemanticFn::build("age greater than or equal to 18", Options::new().with_args(["age"]));
//! assert_eq!(is_adult.call([Value::from(21)]), Value::Bool(true));
//! ```

//! ## Normalizing
//!
//! English operator phrases are rewritten into symbols first:
//! `age greater than or equal to 18` becomes `age >= 18`. Quoted strings are
//! left alone.

//! ## Scanning
//!
//! Also known as `lexing` or `lexical analysis`, takes in the characters and
//! converts them into tokens. Single characters `(`, `,`, `.`, numbers `123`,
//! string literals `"hi!"`, identifiers `age` are all tokens. Newlines and `;`
//! become separator tokens, they end statements.
//!
//! Whitespaces are ignored. So the tokens of `age >= 18` are
//! `["age", ">=", "18", EOT]`.

//! ## Parsing
//!
//! A recursive descent `parser` builds an `abstract syntax tree` or `AST` out
//! of the tokens, and reports `syntax errors`.
//!
//! ``` markdown
//! >= (Expression::Binary)
//! ├── age (Expression::Variable)
//! └── 18 (Expression::Literal)
//! ```
//!
//! A malformed statement is reported and skipped, parsing carries on with the
//! next one so a single pass finds as many errors as it can. A descriptor with
//! any error does not compile, its function returns the configured default.

//! ## Tree-walk interpreter
//!
//! The statements are executed right after parsing, walking the AST. Names are
//! resolved through a chain of environments: the program's own scope, then the
//! readonly arguments, then the readonly globals. Blocks open a scope that is
//! dropped when the block ends.
//!
//! Runtime errors, an undefined variable or a write to a readonly one, don't
//! stop evaluation either. They are collected next to the value, see
//! [`SemanticFn::call_with_report`].

pub mod cli;
mod environment;
mod error;
mod interpreter;
mod normalizer;
mod parser;
mod runner;
mod scanner;
mod semantic_fn;
mod statement;
mod utils;

pub use environment::{Binding, Environment};
pub use error::{CompileError, CompileErrorType, ErrorTracker, RuntimeError, SemanticError, interpreter::RuntimeErrorType, parser::{ParseError, ParseErrorType}, scanner::ScanErrorType};
pub use interpreter::{Interpreter, evaluate, value::{ObjectMap, Value}};
pub use normalizer::normalize;
pub use parser::{Parser, expression::{Accessor, BinaryOperator, Expression, LiteralValue, UnaryOperator}, parse};
pub use runner::Semfn;
pub use scanner::{Conversion, Scanner, Token, TokenType, scan};
pub use semantic_fn::{Evaluation, Options, SemanticFn, build_semantic_fn};
pub use statement::Statement;
pub use utils::RcCell;
