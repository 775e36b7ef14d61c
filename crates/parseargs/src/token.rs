//! Single left-to-right scan of the argument list into typed tokens.
//!
//! Tokenizing well-formed input never fails: unknown options, missing values
//! and stray positionals are all represented faithfully and left for the
//! strict validator to judge.

use serde::Serialize;

use crate::schema::{OptionSchema, OptionType};

/// One parsed unit of the argument list.
///
/// `index` is the position of the originating argument in the input. All
/// tokens expanded from one short-option group share that argument's index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Token {
    /// The bare `--`.
    OptionTerminator { index: usize },
    Positional { index: usize, value: String },
    Option {
        /// Resolved long name (a short alias is replaced by its long name).
        name: String,
        /// The form actually typed, e.g. `-f` or `--foo`.
        raw_name: String,
        index: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        /// `Some(true)` for `--foo=bar` / `-fbar`, `Some(false)` for a value
        /// taken from the following argument, `None` when there is no value.
        #[serde(skip_serializing_if = "Option::is_none")]
        inline_value: Option<bool>,
    },
}

impl Token {
    pub fn index(&self) -> usize {
        match self {
            Self::OptionTerminator { index }
            | Self::Positional { index, .. }
            | Self::Option { index, .. } => *index,
        }
    }

    fn option(name: String, raw_name: String, index: usize) -> Self {
        Self::Option {
            name,
            raw_name,
            index,
            value: None,
            inline_value: None,
        }
    }

    fn option_with_value(
        name: String,
        raw_name: String,
        index: usize,
        value: String,
        inline: bool,
    ) -> Self {
        Self::Option {
            name,
            raw_name,
            index,
            value: Some(value),
            inline_value: Some(inline),
        }
    }
}

/// How a string-typed option treats the argument that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lookahead {
    /// Only take the next argument when it does not look like an option.
    #[default]
    Cautious,
    /// Always take the next argument when there is one.
    Greedy,
}

impl Lookahead {
    fn accepts(self, candidate: Option<&String>) -> bool {
        match (self, candidate) {
            (_, None) => false,
            (Self::Greedy, Some(_)) => true,
            (Self::Cautious, Some(arg)) => is_option_value(arg),
        }
    }
}

/// Whether an argument may be taken as an out-of-line option value.
///
/// A lone `-` (stdin/stdout placeholder) always qualifies.
pub fn is_option_value(arg: &str) -> bool {
    arg == "-" || !arg.starts_with('-')
}

/// Returns the option character of `-x`, rejecting `-`, `--` and longer forms.
fn lone_short_option(arg: &str) -> Option<char> {
    let mut chars = arg.strip_prefix('-')?.chars();
    let c = chars.next().filter(|&c| c != '-')?;
    chars.next().is_none().then_some(c)
}

/// Returns the text after the dash of `-xyz...` (at least two characters).
fn short_option_cluster(arg: &str) -> Option<&str> {
    let rest = arg.strip_prefix('-')?;
    if rest.starts_with('-') || rest.chars().nth(1).is_none() {
        return None;
    }
    Some(rest)
}

/// Returns the name of `--name` or the `(name, value)` pair of `--name=value`.
fn long_option(arg: &str) -> Option<(&str, Option<&str>)> {
    let rest = arg.strip_prefix("--").filter(|r| !r.is_empty())?;
    Some(match rest.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (rest, None),
    })
}

/// Scan `args` into tokens.
pub fn tokenize(args: &[String], schema: &OptionSchema, lookahead: Lookahead) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(args.len());
    let mut i = 0usize;

    while i < args.len() {
        let arg = args[i].as_str();
        let index = i;

        if arg == "--" {
            tokens.push(Token::OptionTerminator { index });
            tokens.extend(
                args.iter()
                    .enumerate()
                    .skip(i + 1)
                    .map(|(index, value)| Token::Positional {
                        index,
                        value: value.clone(),
                    }),
            );
            break;
        }

        if let Some(short) = lone_short_option(arg) {
            let name = schema.resolve_short(short);
            let next = args.get(i + 1);
            if schema.kind_of(&name) == OptionType::String && lookahead.accepts(next) {
                let value = next.cloned().unwrap_or_default();
                tokens.push(Token::option_with_value(name, arg.to_string(), index, value, false));
                i += 2;
            } else {
                tokens.push(Token::option(name, arg.to_string(), index));
                i += 1;
            }
            continue;
        }

        if let Some(cluster) = short_option_cluster(arg) {
            let first = cluster.chars().next().unwrap_or_default();
            let first_name = schema.resolve_short(first);
            if schema.kind_of(&first_name) == OptionType::String {
                // -fVALUE
                let value = cluster[first.len_utf8()..].to_string();
                tokens.push(Token::option_with_value(
                    first_name,
                    format!("-{first}"),
                    index,
                    value,
                    true,
                ));
                i += 1;
                continue;
            }

            // -abc, possibly ending in a string option that takes the rest.
            let mut consumed_next = false;
            for (offset, short) in cluster.char_indices() {
                let name = schema.resolve_short(short);
                let raw_name = format!("-{short}");
                if schema.kind_of(&name) != OptionType::String {
                    tokens.push(Token::option(name, raw_name, index));
                    continue;
                }
                let rest = &cluster[offset + short.len_utf8()..];
                if !rest.is_empty() {
                    let value = rest.to_string();
                    tokens.push(Token::option_with_value(name, raw_name, index, value, true));
                    break;
                }
                let next = args.get(i + 1);
                if lookahead.accepts(next) {
                    let value = next.cloned().unwrap_or_default();
                    tokens.push(Token::option_with_value(name, raw_name, index, value, false));
                    consumed_next = true;
                } else {
                    tokens.push(Token::option(name, raw_name, index));
                }
            }
            i += if consumed_next { 2 } else { 1 };
            continue;
        }

        if let Some((name, inline)) = long_option(arg) {
            let raw_name = format!("--{name}");
            match inline {
                Some(value) => {
                    tokens.push(Token::option_with_value(
                        name.to_string(),
                        raw_name,
                        index,
                        value.to_string(),
                        true,
                    ));
                    i += 1;
                }
                None => {
                    let next = args.get(i + 1);
                    if schema.kind_of(name) == OptionType::String && lookahead.accepts(next) {
                        let value = next.cloned().unwrap_or_default();
                        tokens.push(Token::option_with_value(
                            name.to_string(),
                            raw_name,
                            index,
                            value,
                            false,
                        ));
                        i += 2;
                    } else {
                        tokens.push(Token::option(name.to_string(), raw_name, index));
                        i += 1;
                    }
                }
            }
            continue;
        }

        tokens.push(Token::Positional {
            index,
            value: arg.to_string(),
        });
        i += 1;
    }

    for token in &tokens {
        tracing::trace!(?token, "token");
    }
    tokens
}
