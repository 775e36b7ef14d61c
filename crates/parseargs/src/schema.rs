//! Option declarations and their validation.
//!
//! Callers describe options with [`OptionConfig`], a loosely typed record that
//! mirrors the JSON shape `{ "type", "short", "multiple", "default" }`. Before
//! any argument is scanned the declarations are checked and frozen into an
//! [`OptionSchema`], which the tokenizer, the strict validator and the
//! accumulator only ever read.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::error::{Error, Result};
use crate::value::Value;

/// Option names that never become schema entries or result keys.
pub const RESERVED_KEYS: &[&str] = &["__proto__"];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_KEYS.contains(&name)
}

/// Declared type of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    String,
    Boolean,
}

impl OptionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
        }
    }

    fn scalar_name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Boolean => "Boolean",
        }
    }
}

/// Caller-supplied declaration of one option, prior to validation.
///
/// Fields hold raw JSON so that a malformed declaration is reported as a
/// schema error by [`OptionSchema::from_configs`] instead of failing to decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple: Option<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Json>,
}

impl OptionConfig {
    /// A `type: "string"` declaration.
    pub fn string() -> Self {
        Self::with_type(OptionType::String.as_str())
    }

    /// A `type: "boolean"` declaration.
    pub fn boolean() -> Self {
        Self::with_type(OptionType::Boolean.as_str())
    }

    /// A declaration with an arbitrary, not yet validated, `type`.
    pub fn with_type(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(Json::String(kind.into())),
            ..Default::default()
        }
    }

    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(Json::String(short.into()));
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = Some(Json::Bool(true));
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value_to_json(&value.into()));
        self
    }
}

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Bool(b) => Json::Bool(*b),
        Value::String(s) => Json::String(s.clone()),
        Value::List(items) => Json::Array(items.iter().map(value_to_json).collect()),
    }
}

/// A validated option declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    kind: OptionType,
    short: Option<char>,
    multiple: bool,
    default: Option<Value>,
}

impl OptionSpec {
    pub fn kind(&self) -> OptionType {
        self.kind
    }

    pub fn short(&self) -> Option<char> {
        self.short
    }

    pub fn multiple(&self) -> bool {
        self.multiple
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    fn from_config(name: &str, config: &OptionConfig) -> Result<Self> {
        let kind = match config.kind.as_ref().and_then(Json::as_str) {
            Some("string") => OptionType::String,
            Some("boolean") => OptionType::Boolean,
            _ => {
                return Err(Error::InvalidType {
                    option: name.to_string(),
                });
            }
        };

        let short = match &config.short {
            None => None,
            Some(Json::String(s)) => Some(single_char(s).ok_or_else(|| Error::InvalidShort {
                option: name.to_string(),
            })?),
            Some(_) => {
                return Err(Error::InvalidShortType {
                    option: name.to_string(),
                });
            }
        };

        let multiple = match &config.multiple {
            None => false,
            Some(Json::Bool(b)) => *b,
            Some(_) => {
                return Err(Error::InvalidMultiple {
                    option: name.to_string(),
                });
            }
        };

        let default = match &config.default {
            None => None,
            Some(json) => Some(check_default(name, kind, multiple, json)?),
        };

        Ok(Self {
            kind,
            short,
            multiple,
            default,
        })
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

fn check_default(name: &str, kind: OptionType, multiple: bool, json: &Json) -> Result<Value> {
    let path = format!("options.{name}.default");
    if !multiple {
        return scalar_default(name, kind, json, path);
    }
    let Json::Array(items) = json else {
        return Err(Error::InvalidDefault {
            option: name.to_string(),
            path,
            expected: "Array",
        });
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| scalar_default(name, kind, item, format!("{path}[{i}]")))
        .collect::<Result<Vec<_>>>()
        .map(Value::List)
}

fn scalar_default(name: &str, kind: OptionType, json: &Json, path: String) -> Result<Value> {
    match (kind, json) {
        (OptionType::Boolean, Json::Bool(b)) => Ok(Value::Bool(*b)),
        (OptionType::String, Json::String(s)) => Ok(Value::String(s.clone())),
        _ => Err(Error::InvalidDefault {
            option: name.to_string(),
            path,
            expected: kind.scalar_name(),
        }),
    }
}

/// Validated, read-only option schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSchema {
    options: IndexMap<String, OptionSpec>,
    shorts: HashMap<char, String>,
}

impl OptionSchema {
    /// Validate every declaration, in declaration order.
    ///
    /// The first malformed declaration fails the whole schema. Reserved names
    /// are skipped.
    pub fn from_configs(configs: &IndexMap<String, OptionConfig>) -> Result<Self> {
        let mut schema = Self::default();
        for (name, config) in configs {
            if is_reserved(name) {
                tracing::debug!(option = %name, "ignoring reserved option name");
                continue;
            }
            let spec = OptionSpec::from_config(name, config)?;
            if let Some(short) = spec.short {
                schema.shorts.entry(short).or_insert_with(|| name.clone());
            }
            schema.options.insert(name.clone(), spec);
        }
        Ok(schema)
    }

    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.options.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionSpec)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Long name declared for a short alias, if any.
    pub fn long_for_short(&self, short: char) -> Option<&str> {
        self.shorts.get(&short).map(String::as_str)
    }

    /// Long name for a short alias, falling back to the character itself.
    pub fn resolve_short(&self, short: char) -> String {
        self.long_for_short(short)
            .map(str::to_string)
            .unwrap_or_else(|| short.to_string())
    }

    /// Declared type of `name`. Undeclared options behave as booleans.
    pub fn kind_of(&self, name: &str) -> OptionType {
        self.get(name).map_or(OptionType::Boolean, OptionSpec::kind)
    }

    /// `-s, --name` when a short alias exists, `--name` otherwise.
    pub(crate) fn usage(&self, name: &str) -> String {
        match self.get(name).and_then(OptionSpec::short) {
            Some(short) => format!("-{short}, --{name}"),
            None => format!("--{name}"),
        }
    }
}
