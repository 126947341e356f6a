use thiserror::Error;

use crate::parser::Rule;

/// Malformed specification, reported once when a [`Program`](crate::Program) is built
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("invalid pattern \"{pattern}\": {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: Box<pest::error::Error<Rule>>,
    },

    #[error("variadic token \"{name}\" must be the last token in \"{pattern}\"")]
    VariadicNotLast { pattern: String, name: String },

    #[error("token \"{name}\" appears more than once in \"{pattern}\"")]
    DuplicateToken { pattern: String, name: String },

    #[error("flag \"{flag}\" of \"{pattern}\" is already used by another option")]
    DuplicateFlag { pattern: String, flag: String },

    #[error("option \"{pattern}\" cannot contain the keyword \"{name}\"")]
    LiteralInOption { pattern: String, name: String },

    #[error("command \"{pattern}\" has no action")]
    MissingAction { pattern: String },

    #[error("program \"{program}\" has no commands")]
    NoCommands { program: String },
}

impl SpecError {
    pub(crate) fn pattern(pattern: &str, source: pest::error::Error<Rule>) -> Self {
        SpecError::Pattern {
            pattern: pattern.to_owned(),
            source: Box::new(source),
        }
    }
}

/// Process-facing error: no command accepted the arguments
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    #[error("{program}: no command matched the arguments\n{report}")]
    NoMatchingCommand { program: String, report: String },
}
