//! Error-accumulating result type.
//!
//! [`Validation`] has two ways of composing steps:
//!
//! - [`Validation::chain`] is fail-fast. The second step depends on the first
//!   and never runs after a failure.
//! - [`Validation::ap`], [`Validation::zip`] and [`sequence`] are accumulating.
//!   Both sides were attempted independently, so when both fail their error
//!   lists are concatenated, left then right.
//!
//! Failures form a tree of [`ErrorNode`]s: leaves are [`Issue`]s and
//! [`Validation::context`] nests a failure under a label.

use thiserror::Error;

/// Why a single match attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Issue {
    #[error("Expected more arguments; missing: {}", .0.join(" "))]
    MissingArguments(Vec<String>),

    #[error("Expected command keyword \"{expected}\"; received \"{received}\"")]
    UnknownCommandKeyword { expected: String, received: String },

    #[error("Expected token \"{token}\"; received an option \"{received}\"")]
    UnexpectedOption { token: String, received: String },

    #[error("Unknown option \"{0}\"")]
    UnknownOption(String),

    #[error("Unknown boolean option \"{0}\"")]
    UnknownBooleanOption(String),

    #[error("Only boolean options can be bundled; \"{pattern}\" has positional arguments (\"{tag}\")")]
    NonBooleanInBundle { tag: String, pattern: String },

    #[error("Could not parse option \"{0}\"")]
    UnparsableOption(String),

    #[error("Leftover arguments: {}", .0.join(" "))]
    LeftoverArguments(Vec<String>),

    /// Raised by an action's own validation
    #[error("{0}")]
    Custom(String),
}

/// One node of a failure tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorNode {
    Issue(Issue),
    Context { label: String, errors: Vec<ErrorNode> },
}

impl From<Issue> for ErrorNode {
    fn from(issue: Issue) -> Self {
        ErrorNode::Issue(issue)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation<T> {
    Success(T),
    Failure(Vec<ErrorNode>),
}

impl<T> Validation<T> {
    pub fn success(value: T) -> Self {
        Validation::Success(value)
    }

    pub fn failure(errors: Vec<ErrorNode>) -> Self {
        Validation::Failure(errors)
    }

    /// Failure with a single issue
    pub fn fail(issue: Issue) -> Self {
        Validation::Failure(vec![issue.into()])
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Validation::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Error list of a failure; empty on success
    pub fn errors(&self) -> &[ErrorNode] {
        match self {
            Validation::Success(_) => &[],
            Validation::Failure(errors) => errors,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Validation::Success(value) => Some(value),
            Validation::Failure(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validation<U> {
        match self {
            Validation::Success(value) => Validation::Success(f(value)),
            Validation::Failure(errors) => Validation::Failure(errors),
        }
    }

    /// Fail-fast bind for dependent steps
    pub fn chain<U>(self, f: impl FnOnce(T) -> Validation<U>) -> Validation<U> {
        match self {
            Validation::Success(value) => f(value),
            Validation::Failure(errors) => Validation::Failure(errors),
        }
    }

    /// Accumulating pairing of two independent attempts
    pub fn zip<U>(self, other: Validation<U>) -> Validation<(T, U)> {
        match (self, other) {
            (Validation::Success(a), Validation::Success(b)) => Validation::Success((a, b)),
            (Validation::Failure(errors), Validation::Success(_))
            | (Validation::Success(_), Validation::Failure(errors)) => Validation::Failure(errors),
            (Validation::Failure(mut left), Validation::Failure(right)) => {
                left.extend(right);
                Validation::Failure(left)
            }
        }
    }

    /// Nests a failure under `label`; successes pass through untouched
    pub fn context(self, label: impl Into<String>) -> Self {
        match self {
            Validation::Success(value) => Validation::Success(value),
            Validation::Failure(errors) => Validation::Failure(vec![ErrorNode::Context {
                label: label.into(),
                errors,
            }]),
        }
    }

    pub fn into_result(self) -> Result<T, Vec<ErrorNode>> {
        match self {
            Validation::Success(value) => Ok(value),
            Validation::Failure(errors) => Err(errors),
        }
    }
}

impl<F> Validation<F> {
    /// Applicative apply: runs the wrapped function on the wrapped value,
    /// concatenating errors when both sides failed
    pub fn ap<A, B>(self, arg: Validation<A>) -> Validation<B>
    where
        F: FnOnce(A) -> B,
    {
        self.zip(arg).map(|(f, a)| f(a))
    }
}

/// Turns a list of validations into a validation of a list, keeping every
/// failure in order
pub fn sequence<T>(items: impl IntoIterator<Item = Validation<T>>) -> Validation<Vec<T>> {
    items
        .into_iter()
        .fold(Validation::success(Vec::new()), |acc, item| {
            acc.map(|mut values: Vec<T>| {
                move |value: T| {
                    values.push(value);
                    values
                }
            })
            .ap(item)
        })
}

impl<T> FromIterator<Validation<T>> for Validation<Vec<T>> {
    fn from_iter<I: IntoIterator<Item = Validation<T>>>(iter: I) -> Self {
        sequence(iter)
    }
}

const INDENT: &str = "  ";

/// Renders a failure tree, each context level indented by two more spaces
pub fn render(errors: &[ErrorNode]) -> String {
    let mut lines = Vec::new();
    for node in errors {
        render_node(node, 1, &mut lines);
    }
    lines.join("\n")
}

fn render_node(node: &ErrorNode, depth: usize, lines: &mut Vec<String>) {
    match node {
        ErrorNode::Issue(issue) => lines.push(format!("{}{issue}", INDENT.repeat(depth))),
        ErrorNode::Context { label, errors } => {
            lines.push(format!("{}{label}", INDENT.repeat(depth)));
            for child in errors {
                render_node(child, depth + 1, lines);
            }
        }
    }
}
