use std::collections::HashSet;

use pest::{Parser, iterators::Pair};
use pest_derive::Parser;

use crate::ast::{OptionSpec, Token};
use crate::error::SpecError;

#[derive(Parser)]
#[grammar = "src/pattern.pest"]
pub struct PatternParser;

impl PatternParser {
    /// Compile a command pattern such as `"chinese <dishes...>"`
    pub fn parse_command(pattern: &str) -> Result<Vec<Token>, SpecError> {
        let mut pairs = PatternParser::parse(Rule::command, pattern)
            .map_err(|e| SpecError::pattern(pattern, e))?;

        let tokens: Vec<Token> = pairs
            .next()
            .map(|command| command.into_inner().filter_map(Self::parse_token).collect())
            .unwrap_or_default();

        Self::check_tokens(pattern, &tokens)?;
        Ok(tokens)
    }

    /// Compile an option pattern such as `"-s, --args <foo> <bar>"`
    pub fn parse_option(pattern: &str, description: &str) -> Result<OptionSpec, SpecError> {
        let mut pairs = PatternParser::parse(Rule::option, pattern)
            .map_err(|e| SpecError::pattern(pattern, e))?;

        let mut short = None;
        let mut long = String::new();
        let mut tokens = Vec::new();

        for pair in pairs.next().into_iter().flat_map(Pair::into_inner) {
            match pair.as_rule() {
                Rule::short_flag => short = Some(pair.as_str().to_owned()),
                Rule::long_flag => long = pair.as_str().to_owned(),
                _ => tokens.extend(Self::parse_token(pair)),
            }
        }

        if let Some(Token::Literal(name)) = tokens.iter().find(|t| matches!(t, Token::Literal(_))) {
            return Err(SpecError::LiteralInOption {
                pattern: pattern.to_owned(),
                name: name.clone(),
            });
        }
        Self::check_tokens(pattern, &tokens)?;

        Ok(OptionSpec {
            pattern: pattern.to_owned(),
            description: description.to_owned(),
            name: long.trim_start_matches("--").to_owned(),
            short,
            long,
            tokens,
        })
    }

    fn parse_token(pair: Pair<Rule>) -> Option<Token> {
        match pair.as_rule() {
            Rule::variadic => Self::ident(pair).map(Token::Variadic),
            Rule::param => Self::ident(pair).map(Token::Param),
            Rule::literal => Some(Token::Literal(pair.as_str().to_owned())),
            _ => None,
        }
    }

    fn ident(pair: Pair<Rule>) -> Option<String> {
        pair.into_inner()
            .find(|p| p.as_rule() == Rule::ident)
            .map(|p| p.as_str().to_owned())
    }

    /// Variadic only in last position, names unique within the pattern
    fn check_tokens(pattern: &str, tokens: &[Token]) -> Result<(), SpecError> {
        if let Some((_, init)) = tokens.split_last() {
            if let Some(token) = init.iter().find(|t| t.is_variadic()) {
                return Err(SpecError::VariadicNotLast {
                    pattern: pattern.to_owned(),
                    name: token.name().to_owned(),
                });
            }
        }

        // only names that land in `Params` must be unique
        let mut seen = HashSet::new();
        for token in tokens.iter().filter(|t| !matches!(t, Token::Literal(_))) {
            if !seen.insert(token.name()) {
                return Err(SpecError::DuplicateToken {
                    pattern: pattern.to_owned(),
                    name: token.name().to_owned(),
                });
            }
        }
        Ok(())
    }
}
