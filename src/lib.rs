//! Declarative command-line grammar.
//!
//! A [`Program`] is a list of commands written as patterns (`"pizza <size>"`,
//! `"chinese <dishes...>"`), each with flag options (`"-d, --delivery <address>"`)
//! and an action. Parsing tries every command in declaration order and returns
//! the first match; when nothing matches, every command's failure is reported.
//!
//! ```
//! use clispec::{Command, Outcome, Parsed, Program, Value};
//!
//! let program = Program::builder("order")
//!     .version("0.0.1")
//!     .command(
//!         Command::new("pizza <size>", "order a pizza")
//!             .option("-p, --peperoni", "add peperoni")
//!             .action(|params| {
//!                 let size = params["size"].as_str().unwrap_or_default().to_owned();
//!                 let peperoni = params.get("peperoni").is_some_and(|v| v == &Value::Flag(true));
//!                 Outcome::Value((size, peperoni))
//!             }),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let parsed = program.run("pizza large -p").unwrap();
//! assert_eq!(parsed, Parsed::Value(("large".to_string(), true)));
//! ```

pub mod ast;
mod error;
mod help;
pub mod matcher;
pub mod parser;
pub mod program;
pub mod validation;

pub use ast::{Matched, OptionSpec, Params, Token, Value};
pub use error::{CliError, SpecError};
pub use program::{Command, CommandSpec, IntoArgs, Outcome, Parsed, Program, args_from_env};
pub use validation::{ErrorNode, Issue, Validation, render, sequence};
