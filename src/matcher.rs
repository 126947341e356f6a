//! Recursive matching of compiled tokens and options against an argument list.
//!
//! Positional tokens are matched first; [`match_options`] only ever sees the
//! arguments left after the owning command's last positional token.

use tracing::trace;

use crate::ast::{Matched, OptionSpec, Params, Token, Value};
use crate::validation::{ErrorNode, Issue, Validation};

/// Anything with a leading `-` looks like an option
pub fn is_option(arg: &str) -> bool {
    arg.starts_with('-')
}

/// `""`, `-h` and `--help` ask for help instead of being parsed
pub fn is_help(arg: &str) -> bool {
    matches!(arg, "" | "-h" | "--help")
}

/// `-btf`: a single dash followed by two or more flag characters
pub fn is_bundle(arg: &str) -> bool {
    let mut chars = arg.chars();
    chars.next() == Some('-') && chars.next().is_some_and(|c| c != '-') && chars.next().is_some()
}

fn merge_with(first: Matched) -> impl FnOnce(Matched) -> Matched {
    move |later| first.merge(later)
}

/// Match `tokens` against the front of `args`.
///
/// Leftover arguments are not an error here; the caller decides what to do
/// with [`Matched::remaining`].
pub fn match_positional(tokens: &[Token], args: &[String]) -> Validation<Matched> {
    let Some((token, rest_tokens)) = tokens.split_first() else {
        return Validation::success(Matched::untouched(args));
    };
    let Some((arg, rest_args)) = args.split_first() else {
        return Validation::fail(Issue::MissingArguments(
            tokens.iter().map(Token::to_string).collect(),
        ));
    };

    if is_option(arg) {
        return Validation::fail(Issue::UnexpectedOption {
            token: token.to_string(),
            received: arg.clone(),
        });
    }

    trace!(%token, %arg, "matching positional token");
    match token {
        Token::Literal(name) if name == arg => {
            let here = Matched::untouched(rest_args);
            Validation::success(here)
                .map(merge_with)
                .ap(match_positional(rest_tokens, rest_args))
        }
        Token::Literal(name) => Validation::fail(Issue::UnknownCommandKeyword {
            expected: name.clone(),
            received: arg.clone(),
        }),
        Token::Param(name) => {
            let here = Matched::new(
                Params::from([(name.clone(), Value::Str(arg.clone()))]),
                rest_args.to_vec(),
            );
            Validation::success(here)
                .map(merge_with)
                .ap(match_positional(rest_tokens, rest_args))
        }
        Token::Variadic(name) => {
            let split = args.iter().position(|a| is_option(a)).unwrap_or(args.len());
            let (taken, remaining) = args.split_at(split);
            Validation::success(Matched::new(
                Params::from([(name.clone(), Value::List(taken.to_vec()))]),
                remaining.to_vec(),
            ))
        }
    }
}

/// Match trailing flag arguments against a command's `options`.
///
/// Stops at the first argument that is not an option (or is a help trigger)
/// and hands the rest back as remaining. Bundle failures accumulate with
/// whatever follows them; a failing single option ends the walk.
pub fn match_options(options: &[OptionSpec], args: &[String]) -> Validation<Matched> {
    let mut found = Validation::success(Params::new());
    let mut rest = args;

    let tail = loop {
        let Some((next, after)) = rest.split_first() else {
            break Validation::success(Vec::new());
        };
        if !is_option(next) || is_help(next) {
            break Validation::success(rest.to_vec());
        }
        if options.is_empty() {
            break Validation::fail(Issue::UnknownOption(next.clone()));
        }

        if is_bundle(next) {
            trace!(bundle = %next, "expanding bundled flags");
            found = found.zip(match_bundle(options, next)).map(merge_params);
            rest = after;
            continue;
        }

        let Some(option) = options.iter().find(|option| option.matches(next)) else {
            break Validation::fail(Issue::UnknownOption(next.clone()));
        };

        trace!(option = %option.pattern, "matched option");
        match match_single(option, next, after) {
            Validation::Success((params, remaining)) => {
                found = found.map(|earlier| merge_params((earlier, params)));
                rest = remaining;
            }
            Validation::Failure(errors) => break Validation::failure(errors),
        }
    };

    found.zip(tail).map(|(params, remaining)| Matched::new(params, remaining))
}

/// Later keys win
fn merge_params((mut earlier, later): (Params, Params)) -> Params {
    earlier.extend(later);
    earlier
}

/// One `-t` / `--tag` occurrence whose flag is already known to match.
///
/// On success, returns the option's parameters and the unconsumed suffix of `rest`.
fn match_single<'a>(
    option: &OptionSpec,
    tag: &str,
    rest: &'a [String],
) -> Validation<(Params, &'a [String])> {
    if option.is_boolean() {
        return Validation::success((
            Params::from([(option.name.clone(), Value::Flag(true))]),
            rest,
        ));
    }

    let nested = match_positional(&option.tokens, rest)
        .map(move |Matched { params, remaining }| {
            let consumed = rest.len() - remaining.len();
            (
                Params::from([(option.name.clone(), Value::Map(params))]),
                &rest[consumed..],
            )
        })
        .context(format!("While parsing arguments for \"{}\"", option.pattern));

    match nested {
        Validation::Failure(mut errors) => {
            errors.push(ErrorNode::from(Issue::UnparsableOption(tag.to_owned())));
            Validation::failure(errors)
        }
        matched => matched,
    }
}

/// Expand `-btf` into `-b -t -f` and set every flag, reporting each bad tag
fn match_bundle(options: &[OptionSpec], bundle: &str) -> Validation<Params> {
    bundle
        .chars()
        .skip(1)
        .map(|c| {
            let tag = format!("-{c}");
            match options.iter().find(|o| o.short.as_deref() == Some(tag.as_str())) {
                None => Validation::fail(Issue::UnknownBooleanOption(tag)),
                Some(option) if !option.is_boolean() => {
                    Validation::fail(Issue::NonBooleanInBundle {
                        tag,
                        pattern: option.pattern.clone(),
                    })
                }
                Some(option) => Validation::success((option.name.clone(), Value::Flag(true))),
            }
        })
        .collect::<Validation<Vec<_>>>()
        .map(|flags| flags.into_iter().collect())
}
