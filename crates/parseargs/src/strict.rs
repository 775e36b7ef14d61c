//! Strict-mode checks over the token stream.

use crate::error::{Error, Result};
use crate::schema::{OptionSchema, OptionType};
use crate::token::{Token, is_option_value};

/// What the strict validator lets through besides declared options.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictRules {
    pub allow_positionals: bool,
    pub allow_negative: bool,
}

/// For `--no-foo`, the option it negates, if negation applies to `name`.
///
/// A name declared in its own right is never treated as a negation.
pub(crate) fn negated_option<'n>(
    name: &'n str,
    schema: &OptionSchema,
    allow_negative: bool,
) -> Option<&'n str> {
    if !allow_negative || schema.contains(name) {
        return None;
    }
    let base = name.strip_prefix("no-").filter(|b| !b.is_empty())?;
    (schema.kind_of(base) == OptionType::Boolean).then_some(base)
}

/// Check every token in order, failing on the first violation.
pub fn validate(tokens: &[Token], schema: &OptionSchema, rules: StrictRules) -> Result<()> {
    for token in tokens {
        match token {
            Token::OptionTerminator { .. } => {}
            Token::Positional { index, value } => {
                if !rules.allow_positionals {
                    return Err(Error::UnexpectedPositional {
                        value: value.clone(),
                        index: *index,
                    });
                }
            }
            Token::Option {
                name,
                raw_name,
                index,
                value,
                inline_value,
            } => check_option(
                schema,
                rules,
                OptionUse {
                    name,
                    raw_name,
                    index: *index,
                    value: value.as_deref(),
                    inline: inline_value.unwrap_or(false),
                },
            )?,
        }
    }
    Ok(())
}

struct OptionUse<'t> {
    name: &'t str,
    raw_name: &'t str,
    index: usize,
    value: Option<&'t str>,
    inline: bool,
}

fn check_option(schema: &OptionSchema, rules: StrictRules, used: OptionUse<'_>) -> Result<()> {
    let Some(spec) = schema.get(used.name) else {
        return match negated_option(used.name, schema, rules.allow_negative) {
            Some(base) if schema.contains(base) => match used.value {
                None => Ok(()),
                Some(_) => Err(Error::UnexpectedValue {
                    usage: format!("--{}", used.name),
                    index: used.index,
                }),
            },
            _ => Err(unknown_option(used.raw_name, used.index, rules)),
        };
    };

    match (spec.kind(), used.value) {
        (OptionType::String, None) => Err(Error::MissingValue {
            usage: schema.usage(used.name),
            index: used.index,
        }),
        (OptionType::String, Some(value)) if !used.inline && !is_option_value(value) => {
            let mut example = format!("'--{}=-XYZ'", used.name);
            if let Some(short) = spec.short().filter(|_| !used.raw_name.starts_with("--")) {
                example.push_str(&format!(" or '-{short}-XYZ'"));
            }
            Err(Error::AmbiguousValue {
                raw_name: used.raw_name.to_string(),
                example,
                index: used.index,
            })
        }
        (OptionType::Boolean, Some(_)) => Err(Error::UnexpectedValue {
            usage: schema.usage(used.name),
            index: used.index,
        }),
        _ => Ok(()),
    }
}

fn unknown_option(raw_name: &str, index: usize, rules: StrictRules) -> Error {
    let hint = if rules.allow_positionals {
        format!(
            ". To specify a positional argument starting with a '-', place it at the end of the command after '--', as in '-- \"{raw_name}\"'"
        )
    } else {
        String::new()
    };
    Error::UnknownOption {
        raw_name: raw_name.to_string(),
        index,
        hint,
    }
}
