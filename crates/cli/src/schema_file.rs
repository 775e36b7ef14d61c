use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use parseargs::OptionConfig;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SCHEMA_NAME: &str = "parseargs.json";

/// Load option declarations from a JSON object file.
///
/// Without an explicit path, `parseargs.json` in the current directory is used
/// if present; otherwise the schema is empty.
pub fn load_schema(schema_path: Option<&Path>) -> Result<IndexMap<String, OptionConfig>> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let (path, explicit) = match schema_path {
        Some(p) => (resolve_against(&cwd, p), true),
        None => (cwd.join(DEFAULT_SCHEMA_NAME), false),
    };

    if !path.exists() {
        if explicit {
            bail!("schema not found: {}", path.display());
        }
        return Ok(IndexMap::new());
    }

    tracing::debug!(path = %path.display(), "loading schema");
    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read schema: {}", path.display()))?;
    parse_schema(&contents).with_context(|| format!("failed to parse schema JSON: {}", path.display()))
}

pub fn parse_schema(contents: &str) -> Result<IndexMap<String, OptionConfig>> {
    Ok(serde_json::from_str(contents)?)
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
