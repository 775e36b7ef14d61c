//! POSIX/GNU-style argument parsing driven by a declarative option schema.
//!
//! A parse runs as a fixed pipeline:
//! - [`OptionSchema::from_configs`] validates the caller's declarations
//! - [`tokenize`] scans the arguments once into [`Token`]s
//! - [`strict::validate`] rejects unknown or misused options (strict mode only)
//! - the tokens are folded into [`Value`]s, then defaults are injected
//!
//! ```
//! use parseargs::{OptionConfig, ParseConfig, Value, parse};
//!
//! let config = ParseConfig::new(["-vf", "out.txt", "--", "-x"])
//!     .option("verbose", OptionConfig::boolean().short("v"))
//!     .option("file", OptionConfig::string().short("f"))
//!     .allow_positionals(true);
//! let parsed = parse(&config)?;
//! assert_eq!(parsed.get("verbose"), Some(&Value::Bool(true)));
//! assert_eq!(parsed.string("file"), Some("out.txt"));
//! assert_eq!(parsed.positionals, ["-x"]);
//! # Ok::<(), parseargs::Error>(())
//! ```

pub mod error;
pub mod parse;
pub mod schema;
pub mod strict;
pub mod token;
pub mod value;
pub mod values;

pub use error::{Error, ErrorKind, Result};
pub use parse::{ParseConfig, ParsedArgs, parse};
pub use schema::{OptionConfig, OptionSchema, OptionSpec, OptionType};
pub use token::{Lookahead, Token, tokenize};
pub use value::Value;
