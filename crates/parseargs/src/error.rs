//! Error types raised by schema validation and strict parsing.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Stable, machine-readable classification of an [`Error`].
///
/// Callers should branch on the kind, never on the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An option declaration has a mistyped field or a bad `type` name.
    InvalidSchema,
    /// An option declaration has a `short` that is not exactly one character.
    InvalidShortOption,
    /// An option not declared in the schema was used in strict mode.
    UnknownOption,
    /// An option was given a value it cannot take, or lacks one it needs.
    InvalidOptionValue,
    /// A positional argument was found while positionals are disallowed.
    UnexpectedPositional,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidSchema => "ERR_INVALID_ARG_TYPE",
            Self::InvalidShortOption => "ERR_INVALID_ARG_VALUE",
            Self::UnknownOption => "ERR_PARSE_ARGS_UNKNOWN_OPTION",
            Self::InvalidOptionValue => "ERR_PARSE_ARGS_INVALID_OPTION_VALUE",
            Self::UnexpectedPositional => "ERR_PARSE_ARGS_UNEXPECTED_POSITIONAL",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// The single root cause of a failed parse.
///
/// Configuration variants are raised before any argument is scanned. Usage
/// variants carry the source index of the offending argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("options.{option}.type must be one of 'string' or 'boolean'")]
    InvalidType { option: String },

    #[error("options.{option}.short must be String")]
    InvalidShortType { option: String },

    #[error("options.{option}.short must be a single character")]
    InvalidShort { option: String },

    #[error("options.{option}.multiple must be Boolean")]
    InvalidMultiple { option: String },

    /// `path` is `options.<name>.default` or `options.<name>.default[<i>]`.
    #[error("{path} must be {expected}")]
    InvalidDefault {
        option: String,
        path: String,
        expected: &'static str,
    },

    #[error("Unknown option '{raw_name}'{hint}")]
    UnknownOption {
        raw_name: String,
        index: usize,
        hint: String,
    },

    #[error("Option '{usage} <value>' argument missing")]
    MissingValue { usage: String, index: usize },

    #[error("Option '{usage}' does not take an argument")]
    UnexpectedValue { usage: String, index: usize },

    #[error(
        "Option '{raw_name}' argument is ambiguous.\n\
         Did you forget to specify the option argument for '{raw_name}'?\n\
         To specify an option argument starting with a dash use {example}."
    )]
    AmbiguousValue {
        raw_name: String,
        example: String,
        index: usize,
    },

    #[error("Unexpected argument '{value}'. This command does not take positional arguments")]
    UnexpectedPositional { value: String, index: usize },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidType { .. }
            | Self::InvalidShortType { .. }
            | Self::InvalidMultiple { .. }
            | Self::InvalidDefault { .. } => ErrorKind::InvalidSchema,
            Self::InvalidShort { .. } => ErrorKind::InvalidShortOption,
            Self::UnknownOption { .. } => ErrorKind::UnknownOption,
            Self::MissingValue { .. }
            | Self::UnexpectedValue { .. }
            | Self::AmbiguousValue { .. } => ErrorKind::InvalidOptionValue,
            Self::UnexpectedPositional { .. } => ErrorKind::UnexpectedPositional,
        }
    }

    /// Source index of the argument that caused a usage error.
    ///
    /// `None` for configuration errors, which are raised before scanning.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::UnknownOption { index, .. }
            | Self::MissingValue { index, .. }
            | Self::UnexpectedValue { index, .. }
            | Self::AmbiguousValue { index, .. }
            | Self::UnexpectedPositional { index, .. } => Some(*index),
            Self::InvalidType { .. }
            | Self::InvalidShortType { .. }
            | Self::InvalidShort { .. }
            | Self::InvalidMultiple { .. }
            | Self::InvalidDefault { .. } => None,
        }
    }

    /// Whether this error comes from a malformed option schema.
    pub fn is_configuration(&self) -> bool {
        self.index().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_message_spans_lines() {
        let err = Error::AmbiguousValue {
            raw_name: "-w".to_string(),
            example: "'--with=-XYZ' or '-w-XYZ'".to_string(),
            index: 0,
        };
        assert_eq!(
            err.to_string(),
            "Option '-w' argument is ambiguous.\n\
             Did you forget to specify the option argument for '-w'?\n\
             To specify an option argument starting with a dash use '--with=-XYZ' or '-w-XYZ'."
        );
        assert_eq!(err.kind(), ErrorKind::InvalidOptionValue);
        assert_eq!(err.index(), Some(0));
    }

    #[test]
    fn configuration_errors_have_no_index() {
        let err = Error::InvalidDefault {
            option: "alpha".to_string(),
            path: "options.alpha.default[2]".to_string(),
            expected: "Boolean",
        };
        assert_eq!(err.to_string(), "options.alpha.default[2] must be Boolean");
        assert!(err.is_configuration());
        assert_eq!(err.kind().code(), "ERR_INVALID_ARG_TYPE");
    }
}
