use std::collections::BTreeMap;
use std::fmt;

/// One grammar unit of a command or option pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Bare word that must appear verbatim: `pizza`
    Literal(String),
    /// Single parameter: `<size>`
    Param(String),
    /// Greedy run of arguments up to the next option: `<dishes...>`
    /// Only valid as the last token of a pattern
    Variadic(String),
}

impl Token {
    pub fn name(&self) -> &str {
        match self {
            Token::Literal(name) | Token::Param(name) | Token::Variadic(name) => name,
        }
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self, Token::Variadic(_))
    }
}

/// Renders the token back in pattern syntax
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(name) => f.write_str(name),
            Token::Param(name) => write!(f, "<{name}>"),
            Token::Variadic(name) => write!(f, "<{name}...>"),
        }
    }
}

/// A compiled `-s, --long <tokens...>` option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub pattern: String,
    pub description: String,
    pub short: Option<String>,
    pub long: String,
    /// Key under which the option's value lands, derived from the long flag
    pub name: String,
    pub tokens: Vec<Token>,
}

impl OptionSpec {
    /// Options without tokens are boolean flags
    pub fn is_boolean(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn matches(&self, arg: &str) -> bool {
        self.long == arg || self.short.as_deref() == Some(arg)
    }
}

/// Parsed parameter map, keyed by token or option name
pub type Params = BTreeMap<String, Value>;

/// A single parsed parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// `<param>` token
    Str(String),
    /// `<variadic...>` token
    List(Vec<String>),
    /// Boolean option
    Flag(bool),
    /// Option that owns its own tokens
    Map(Params),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Params> {
        match self {
            Value::Map(params) => Some(params),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Flag(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl<const N: usize> From<[&str; N]> for Value {
    fn from(items: [&str; N]) -> Self {
        Value::List(items.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Params> for Value {
    fn from(params: Params) -> Self {
        Value::Map(params)
    }
}

/// Intermediate parse state: what was matched so far and what is left
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matched {
    pub params: Params,
    pub remaining: Vec<String>,
}

impl Matched {
    pub fn new(params: Params, remaining: Vec<String>) -> Self {
        Self { params, remaining }
    }

    /// Nothing consumed; `args` are handed back untouched
    pub fn untouched(args: &[String]) -> Self {
        Self::new(Params::new(), args.to_vec())
    }

    /// Union of both param maps (`later` wins on collision), keeping only the
    /// later remaining arguments
    pub fn merge(mut self, later: Matched) -> Matched {
        self.params.extend(later.params);
        Matched::new(self.params, later.remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_display_round_trips_pattern_syntax() {
        assert_eq!(Token::Literal("pizza".into()).to_string(), "pizza");
        assert_eq!(Token::Param("size".into()).to_string(), "<size>");
        assert_eq!(Token::Variadic("dishes".into()).to_string(), "<dishes...>");
    }

    #[test]
    fn test_merge_keeps_later_remaining() {
        let first = Matched::new(
            Params::from([("a".to_string(), Value::from("1"))]),
            vec!["x".into(), "y".into()],
        );
        let later = Matched::new(
            Params::from([("b".to_string(), Value::from(true))]),
            vec!["y".into()],
        );

        let merged = first.merge(later);
        assert_eq!(merged.params.len(), 2);
        assert_eq!(merged.params["a"].as_str(), Some("1"));
        assert_eq!(merged.params["b"].as_flag(), Some(true));
        assert_eq!(merged.remaining, vec!["y".to_string()]);
    }

    #[test]
    fn test_option_matches_short_and_long() {
        let option = OptionSpec {
            pattern: "-b, --boolean".into(),
            description: String::new(),
            short: Some("-b".into()),
            long: "--boolean".into(),
            name: "boolean".into(),
            tokens: vec![],
        };
        assert!(option.matches("-b"));
        assert!(option.matches("--boolean"));
        assert!(!option.matches("-t"));
        assert!(option.is_boolean());
    }
}
