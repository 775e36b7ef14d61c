//! Folding option tokens into the result mapping.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::schema::{OptionSchema, OptionSpec, is_reserved};
use crate::strict::negated_option;
use crate::token::Token;
use crate::value::Value;

/// Option values keyed by long name, in first-seen order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Accumulator {
    values: IndexMap<String, Value>,
}

impl Accumulator {
    /// Store one occurrence of `name`.
    ///
    /// `multiple` options collect every occurrence; others keep the last one.
    pub(crate) fn push_value(&mut self, name: &str, value: Value, multiple: bool) {
        if is_reserved(name) {
            tracing::debug!(option = %name, "dropping reserved option name");
            return;
        }
        if !multiple {
            self.values.insert(name.to_string(), value);
            return;
        }
        match self.values.entry(name.to_string()) {
            Entry::Occupied(mut e) => match e.get_mut() {
                Value::List(items) => items.push(value),
                other => *other = Value::List(vec![value]),
            },
            Entry::Vacant(e) => {
                e.insert(Value::List(vec![value]));
            }
        }
    }

    /// Fill in declared defaults for options that were never supplied.
    pub(crate) fn apply_defaults(&mut self, schema: &OptionSchema) {
        for (name, spec) in schema.iter() {
            let Some(default) = spec.default_value() else {
                continue;
            };
            if self.values.contains_key(name) {
                continue;
            }
            tracing::debug!(option = %name, ?default, "applying default");
            self.values.insert(name.to_string(), default.clone());
        }
    }

    pub(crate) fn into_values(self) -> IndexMap<String, Value> {
        self.values
    }
}

/// Accumulate every option token, then inject defaults.
pub fn accumulate(
    tokens: &[Token],
    schema: &OptionSchema,
    allow_negative: bool,
) -> IndexMap<String, Value> {
    let mut acc = Accumulator::default();
    for token in tokens {
        let Token::Option { name, value, .. } = token else {
            continue;
        };
        // `--no-foo=x` is a plain option named `no-foo`.
        let negated = match value {
            None => negated_option(name, schema, allow_negative),
            Some(_) => None,
        };
        if let Some(base) = negated {
            acc.push_value(base, Value::Bool(false), is_multiple(schema, base));
            continue;
        }
        if !schema.contains(name) {
            tracing::debug!(option = %name, "accepting undeclared option");
        }
        acc.push_value(
            name,
            Value::from_token_value(value.as_deref()),
            is_multiple(schema, name),
        );
    }
    acc.apply_defaults(schema);
    acc.into_values()
}

fn is_multiple(schema: &OptionSchema, name: &str) -> bool {
    schema.get(name).is_some_and(OptionSpec::multiple)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::OptionConfig;
    use crate::token::{Lookahead, tokenize};

    fn run(list: &[&str], entries: &[(&str, OptionConfig)], allow_negative: bool) -> IndexMap<String, Value> {
        let configs: IndexMap<String, OptionConfig> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let schema = OptionSchema::from_configs(&configs).unwrap();
        let args: Vec<String> = list.iter().map(|s| s.to_string()).collect();
        accumulate(&tokenize(&args, &schema, Lookahead::Cautious), &schema, allow_negative)
    }

    #[test]
    fn last_occurrence_wins() {
        let values = run(&["--out", "a", "--out=b"], &[("out", OptionConfig::string())], false);
        assert_eq!(values.get("out"), Some(&Value::from("b")));
    }

    #[test]
    fn multiple_collects_in_order() {
        let values = run(
            &["-i", "a", "--inc=b", "-ic"],
            &[("inc", OptionConfig::string().short("i").multiple())],
            false,
        );
        assert_eq!(values.get("inc"), Some(&Value::from(vec!["a", "b", "c"])));
    }

    #[test]
    fn bare_string_option_stores_true_leniently() {
        let values = run(&["--file"], &[("file", OptionConfig::string())], false);
        assert_eq!(values.get("file"), Some(&Value::Bool(true)));
    }

    #[test]
    fn defaults_fill_only_missing_options() {
        let values = run(
            &["--a", "WORLD", "--b", "-c"],
            &[
                ("a", OptionConfig::string().default_value("HELLO")),
                ("b", OptionConfig::boolean().default_value(false)),
                ("c", OptionConfig::boolean().default_value(true)),
                ("d", OptionConfig::string().default_value("D")),
                ("e", OptionConfig::boolean().multiple().default_value(vec![false, true])),
            ],
            false,
        );
        assert_eq!(values.get("a"), Some(&Value::from("WORLD")));
        assert_eq!(values.get("b"), Some(&Value::Bool(true)));
        assert_eq!(values.get("c"), Some(&Value::Bool(true)));
        assert_eq!(values.get("d"), Some(&Value::from("D")));
        assert_eq!(values.get("e"), Some(&Value::from(vec![false, true])));
    }

    #[test]
    fn supplied_multiple_replaces_default_list() {
        let values = run(
            &["--tag", "c"],
            &[("tag", OptionConfig::string().multiple().default_value(vec!["a", "b"]))],
            false,
        );
        assert_eq!(values.get("tag"), Some(&Value::from(vec!["c"])));
    }

    #[test]
    fn reserved_names_are_dropped() {
        let values = run(&["--__proto__=hello", "--ok"], &[], false);
        assert!(!values.contains_key("__proto__"));
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn negation_stores_false() {
        let schema = [("alpha", OptionConfig::boolean().multiple())];
        let values = run(&["--no-alpha", "--alpha", "--no-alpha"], &schema, true);
        assert_eq!(values.get("alpha"), Some(&Value::from(vec![false, true, false])));

        let values = run(&["--no-foo"], &[], true);
        assert_eq!(values.get("foo"), Some(&Value::Bool(false)));

        let values = run(&["--no-foo"], &[], false);
        assert_eq!(values.get("no-foo"), Some(&Value::Bool(true)));

        let values = run(
            &["--no-alpha"],
            &[("alpha", OptionConfig::boolean().default_value(true))],
            true,
        );
        assert_eq!(values.get("alpha"), Some(&Value::Bool(false)));
    }

    #[test]
    fn negation_with_value_is_kept_as_given() {
        let values = run(&["--no-foo=keep"], &[], true);
        assert_eq!(values.get("no-foo"), Some(&Value::from("keep")));
        assert!(!values.contains_key("foo"));

        let values = run(
            &["--no-alpha=keep"],
            &[("alpha", OptionConfig::boolean())],
            true,
        );
        assert_eq!(values.get("no-alpha"), Some(&Value::from("keep")));
        assert_eq!(values.get("alpha"), None);
    }
}
