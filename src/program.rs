//! Program specification and the command dispatcher.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, instrument};

use crate::ast::{Matched, OptionSpec, Params, Token};
use crate::error::{CliError, SpecError};
use crate::help;
use crate::matcher::{is_help, match_options, match_positional};
use crate::parser::PatternParser;
use crate::validation::{ErrorNode, Issue, Validation, render, sequence};

/// Callback run with the parameters of a matched command
pub type Action<T> = Box<dyn Fn(Params) -> Outcome<T>>;

/// Continuation that parses the arguments a command left over.
///
/// It receives the program that dispatched the command, so an action can
/// re-enter its own program or hand off to a different one.
pub type Delegate<T> = Box<dyn FnOnce(&Program<T>, Vec<String>) -> Validation<Parsed<T>>>;

/// What an action decided
pub enum Outcome<T> {
    /// Terminal value; leftover arguments are an error
    Value(T),
    /// The action's own validation rejected the parameters
    Failure(Vec<ErrorNode>),
    /// Keep parsing the leftover arguments
    Delegate(Delegate<T>),
}

impl<T> Outcome<T> {
    pub fn fail(message: impl Into<String>) -> Self {
        Outcome::Failure(vec![Issue::Custom(message.into()).into()])
    }

    pub fn delegate(
        f: impl FnOnce(&Program<T>, Vec<String>) -> Validation<Parsed<T>> + 'static,
    ) -> Self {
        Outcome::Delegate(Box::new(f))
    }
}

impl<T: 'static> Outcome<T> {
    /// Parse the leftover arguments with another program
    pub fn hand_off(program: &Rc<Program<T>>) -> Self {
        let program = Rc::clone(program);
        Outcome::delegate(move |_, rest| program.parse(rest))
    }
}

impl Outcome<Params> {
    /// Re-enter the dispatching program with the leftover arguments and merge
    /// its result into `params`. Keys already in `params` win.
    pub fn reenter(params: Params) -> Self {
        Outcome::delegate(move |program, rest| {
            program.parse(rest).map(|parsed| {
                parsed.map(|inner| {
                    let mut merged = params;
                    for (key, value) in inner {
                        merged.entry(key).or_insert(value);
                    }
                    merged
                })
            })
        })
    }
}

impl<T> From<T> for Outcome<T> {
    fn from(value: T) -> Self {
        Outcome::Value(value)
    }
}

impl<T> fmt::Debug for Outcome<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Outcome::Failure(errors) => f.debug_tuple("Failure").field(errors).finish(),
            Outcome::Delegate(_) => f.write_str("Delegate(..)"),
        }
    }
}

/// Successful result of a parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed<T> {
    /// A help trigger was given; rendered help text
    Help(String),
    Value(T),
}

impl<T> Parsed<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        match self {
            Parsed::Help(text) => Parsed::Help(text),
            Parsed::Value(value) => Parsed::Value(f(value)),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Parsed::Value(value) => Some(value),
            Parsed::Help(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Parsed::Value(value) => Some(value),
            Parsed::Help(_) => None,
        }
    }

    pub fn help(&self) -> Option<&str> {
        match self {
            Parsed::Help(text) => Some(text),
            Parsed::Value(_) => None,
        }
    }
}

/// Uncompiled command: a pattern, its options and an action
pub struct Command<T> {
    pattern: String,
    description: String,
    options: Vec<(String, String)>,
    action: Option<Action<T>>,
}

impl<T> Command<T> {
    pub fn new(pattern: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            description: description.into(),
            options: Vec::new(),
            action: None,
        }
    }

    pub fn option(mut self, pattern: impl Into<String>, description: impl Into<String>) -> Self {
        self.options.push((pattern.into(), description.into()));
        self
    }

    /// Add a shared table of `(pattern, description)` options
    pub fn options<P, D>(mut self, options: impl IntoIterator<Item = (P, D)>) -> Self
    where
        P: Into<String>,
        D: Into<String>,
    {
        self.options
            .extend(options.into_iter().map(|(p, d)| (p.into(), d.into())));
        self
    }

    pub fn action(mut self, action: impl Fn(Params) -> Outcome<T> + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    fn compile(self) -> Result<CommandSpec<T>, SpecError> {
        let tokens = PatternParser::parse_command(&self.pattern)?;
        let options = self
            .options
            .iter()
            .map(|(pattern, description)| PatternParser::parse_option(pattern, description))
            .collect::<Result<Vec<_>, _>>()?;
        check_flags(&options)?;

        let action = self.action.ok_or_else(|| SpecError::MissingAction {
            pattern: self.pattern.clone(),
        })?;

        Ok(CommandSpec {
            pattern: self.pattern,
            description: self.description,
            tokens,
            options,
            action,
        })
    }
}

fn check_flags(options: &[OptionSpec]) -> Result<(), SpecError> {
    let mut seen: Vec<&str> = Vec::new();
    for option in options {
        for flag in option.short.iter().chain(std::iter::once(&option.long)) {
            if seen.contains(&flag.as_str()) {
                return Err(SpecError::DuplicateFlag {
                    pattern: option.pattern.clone(),
                    flag: flag.clone(),
                });
            }
            seen.push(flag);
        }
    }
    Ok(())
}

/// A compiled command
pub struct CommandSpec<T> {
    pattern: String,
    description: String,
    tokens: Vec<Token>,
    options: Vec<OptionSpec>,
    action: Action<T>,
}

impl<T> CommandSpec<T> {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }
}

impl<T> fmt::Debug for CommandSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("pattern", &self.pattern)
            .field("tokens", &self.tokens)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

pub struct ProgramBuilder<T> {
    name: String,
    version: Option<String>,
    description: Option<String>,
    commands: Vec<Command<T>>,
}

impl<T> ProgramBuilder<T> {
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Commands are tried in the order they are added
    pub fn command(mut self, command: Command<T>) -> Self {
        self.commands.push(command);
        self
    }

    /// Compile every pattern once
    pub fn build(self) -> Result<Program<T>, SpecError> {
        if self.commands.is_empty() {
            return Err(SpecError::NoCommands { program: self.name });
        }
        let commands = self
            .commands
            .into_iter()
            .map(Command::compile)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(program = %self.name, commands = commands.len(), "compiled program");
        Ok(Program {
            name: self.name,
            version: self.version,
            description: self.description,
            commands,
        })
    }
}

/// Compiled, immutable program specification
#[derive(Debug)]
pub struct Program<T> {
    name: String,
    version: Option<String>,
    description: Option<String>,
    commands: Vec<CommandSpec<T>>,
}

impl<T> Program<T> {
    pub fn builder(name: impl Into<String>) -> ProgramBuilder<T> {
        ProgramBuilder {
            name: name.into(),
            version: None,
            description: None,
            commands: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn commands(&self) -> &[CommandSpec<T>] {
        &self.commands
    }

    pub fn help(&self) -> String {
        help::render(self)
    }

    /// Parse `input` against every command and return the first match, or
    /// every command's failure when none match
    pub fn parse(&self, input: impl IntoArgs) -> Validation<Parsed<T>> {
        self.dispatch(input.into_args())
    }

    /// Like [`Program::parse`], but turns a failure into a rendered [`CliError`]
    pub fn run(&self, input: impl IntoArgs) -> Result<Parsed<T>, CliError> {
        self.parse(input)
            .into_result()
            .map_err(|errors| CliError::NoMatchingCommand {
                program: self.name.clone(),
                report: render(&errors),
            })
    }

    #[instrument(level = "debug", skip(self), fields(program = %self.name))]
    fn dispatch(&self, args: Vec<String>) -> Validation<Parsed<T>> {
        if args.first().is_none_or(|arg| is_help(arg)) {
            debug!("help requested");
            return Validation::success(Parsed::Help(self.help()));
        }

        let mut failures = Vec::with_capacity(self.commands.len());
        for command in &self.commands {
            match self.attempt(command, &args) {
                Validation::Success(parsed) => {
                    debug!(command = %command.pattern, "command matched");
                    return Validation::success(parsed);
                }
                failure => {
                    debug!(command = %command.pattern, "command did not match");
                    failures.push(failure);
                }
            }
        }

        // build() guarantees at least one command, so this is always a failure
        sequence(failures).chain(|_| Validation::failure(Vec::new()))
    }

    fn attempt(&self, command: &CommandSpec<T>, args: &[String]) -> Validation<Parsed<T>> {
        let pattern = &command.pattern;
        match_positional(&command.tokens, args)
            .context(format!("While parsing positional arguments for \"{pattern}\""))
            .chain(|positional| {
                match_options(&command.options, &positional.remaining)
                    .context(format!("While parsing options for \"{pattern}\""))
                    .map(|options| positional.merge(options))
            })
            .chain(|Matched { params, remaining }| {
                self.resolve(command, (command.action)(params), remaining)
            })
    }

    fn resolve(
        &self,
        command: &CommandSpec<T>,
        outcome: Outcome<T>,
        remaining: Vec<String>,
    ) -> Validation<Parsed<T>> {
        let label = format!("While parsing with \"{}\"", command.pattern);
        match outcome {
            Outcome::Delegate(next) => next(self, remaining).context(label),
            Outcome::Failure(errors) => Validation::failure(errors).context(label),
            Outcome::Value(_) if !remaining.is_empty() => {
                Validation::fail(Issue::LeftoverArguments(remaining)).context(label)
            }
            Outcome::Value(value) => Validation::success(Parsed::Value(value)),
        }
    }
}

/// Anything that can be turned into an argument list.
///
/// Strings are split on whitespace; lists are taken as-is.
pub trait IntoArgs {
    fn into_args(self) -> Vec<String>;
}

impl IntoArgs for &str {
    fn into_args(self) -> Vec<String> {
        self.split_whitespace().map(str::to_owned).collect()
    }
}

impl IntoArgs for String {
    fn into_args(self) -> Vec<String> {
        self.as_str().into_args()
    }
}

impl IntoArgs for Vec<String> {
    fn into_args(self) -> Vec<String> {
        self
    }
}

impl IntoArgs for &[String] {
    fn into_args(self) -> Vec<String> {
        self.to_vec()
    }
}

impl IntoArgs for Vec<&str> {
    fn into_args(self) -> Vec<String> {
        self.into_iter().map(str::to_owned).collect()
    }
}

impl IntoArgs for &[&str] {
    fn into_args(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoArgs for [&str; N] {
    fn into_args(self) -> Vec<String> {
        self.into_iter().map(str::to_owned).collect()
    }
}

/// Arguments of the running process without the executable path
pub fn args_from_env() -> Vec<String> {
    std::env::args().skip(1).collect()
}
