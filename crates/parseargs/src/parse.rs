//! The `parse` entry point and its configuration.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::schema::{OptionConfig, OptionSchema};
use crate::strict::{self, StrictRules};
use crate::token::{Lookahead, Token, tokenize};
use crate::value::Value;
use crate::values::accumulate;

/// Input to [`parse`].
///
/// The argument list is always supplied by the caller; the parser never reads
/// process state.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    args: Vec<String>,
    strict: bool,
    allow_positionals: Option<bool>,
    allow_negative: bool,
    options: IndexMap<String, OptionConfig>,
    tokens: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            strict: true,
            allow_positionals: None,
            allow_negative: false,
            options: IndexMap::new(),
            tokens: false,
        }
    }
}

impl ParseConfig {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Validate options against the schema (default `true`).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Accept positional arguments in strict mode (default `!strict`).
    pub fn allow_positionals(mut self, allow: bool) -> Self {
        self.allow_positionals = Some(allow);
        self
    }

    /// Treat `--no-foo` as `foo = false` for boolean options.
    pub fn allow_negative(mut self, allow: bool) -> Self {
        self.allow_negative = allow;
        self
    }

    pub fn options(mut self, options: IndexMap<String, OptionConfig>) -> Self {
        self.options = options;
        self
    }

    pub fn option(mut self, name: impl Into<String>, config: OptionConfig) -> Self {
        self.options.insert(name.into(), config);
        self
    }

    /// Include the token trace in the result.
    pub fn tokens(mut self, tokens: bool) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn allows_positionals(&self) -> bool {
        self.allow_positionals.unwrap_or(!self.strict)
    }

    fn lookahead(&self) -> Lookahead {
        if self.strict {
            Lookahead::Greedy
        } else {
            Lookahead::Cautious
        }
    }
}

/// Outcome of a successful [`parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedArgs {
    pub values: IndexMap<String, Value>,
    pub positionals: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<Token>>,
}

impl ParsedArgs {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }
}

/// Parse `config.args` against `config.options`.
///
/// Either returns the complete result or the first violation encountered:
/// schema errors before any argument is looked at, then usage errors in
/// token order.
pub fn parse(config: &ParseConfig) -> Result<ParsedArgs> {
    let schema = OptionSchema::from_configs(&config.options)?;
    tracing::debug!(
        args = config.args.len(),
        options = schema.len(),
        strict = config.is_strict(),
        "parsing arguments"
    );

    let tokens = tokenize(&config.args, &schema, config.lookahead());

    if config.is_strict() {
        let rules = StrictRules {
            allow_positionals: config.allows_positionals(),
            allow_negative: config.allow_negative,
        };
        strict::validate(&tokens, &schema, rules)?;
    }

    let values = accumulate(&tokens, &schema, config.allow_negative);
    let positionals = tokens
        .iter()
        .filter_map(|token| match token {
            Token::Positional { value, .. } => Some(value.clone()),
            _ => None,
        })
        .collect();

    Ok(ParsedArgs {
        values,
        positionals,
        tokens: config.tokens.then_some(tokens),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn empty_input() {
        let parsed = parse(&ParseConfig::default()).unwrap();
        assert_eq!(parsed, ParsedArgs::default());
    }

    #[test]
    fn allow_positionals_defaults_to_not_strict() {
        assert!(ParseConfig::default().is_strict());
        assert!(!ParseConfig::default().strict(false).is_strict());
        assert!(!ParseConfig::default().allows_positionals());
        assert!(ParseConfig::default().strict(false).allows_positionals());
        assert!(ParseConfig::default().allow_positionals(true).allows_positionals());
    }

    #[test]
    fn schema_errors_come_before_usage_errors() {
        let config = ParseConfig::new(["--unknown", "pos"]).option("bad", OptionConfig::with_type("int"));
        let err = parse(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSchema);
    }

    #[test]
    fn token_trace_is_opt_in() {
        let config = ParseConfig::new(["--z", "zero", "positional-item"])
            .option("z", OptionConfig::string())
            .option("a", OptionConfig::string().default_value("HELLO"))
            .allow_positionals(true);
        assert_eq!(parse(&config).unwrap().tokens, None);

        let parsed = parse(&config.tokens(true)).unwrap();
        assert_eq!(
            parsed.tokens,
            Some(vec![
                Token::Option {
                    name: "z".to_string(),
                    raw_name: "--z".to_string(),
                    index: 0,
                    value: Some("zero".to_string()),
                    inline_value: Some(false),
                },
                Token::Positional {
                    index: 2,
                    value: "positional-item".to_string(),
                },
            ])
        );
        assert_eq!(parsed.string("a"), Some("HELLO"));
    }

    #[test]
    fn lenient_mode_keeps_positionals_even_when_disallowed() {
        let config = ParseConfig::new(["a", "--x"]).strict(false).allow_positionals(false);
        let parsed = parse(&config).unwrap();
        assert_eq!(parsed.positionals, vec!["a".to_string()]);
        assert!(parsed.flag("x"));
    }

    #[test]
    fn serializes_without_absent_tokens() {
        let parsed = parse(&ParseConfig::new(["--foo=bar"]).option("foo", OptionConfig::string())).unwrap();
        assert_eq!(
            serde_json::to_value(&parsed).unwrap(),
            serde_json::json!({ "values": { "foo": "bar" }, "positionals": [] })
        );
    }
}
