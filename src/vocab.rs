//! Vocabulary tables mapping prose type names to canonical annotation syntax.
//!
//! Three tables, loaded once and never mutated afterwards:
//!
//! - **synonyms** — whole-type rewrites (`Tensor` → `paddle.Tensor`)
//! - **param_overrides** — forced types for specific parameter names,
//!   winning over both inline annotations and docstring types
//! - **return_sentinels** — words that force a fixed return type (`self`,
//!   `None`, `out`)
//!
//! Tables are ordered pair lists, not hash maps: sentinel scanning of return
//! descriptions honors entry order, earlier entries winning.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct TypeTables {
    pub synonyms: Vec<(String, String)>,
    pub param_overrides: Vec<(String, String)>,
    pub return_sentinels: Vec<(String, String)>,
}

impl Default for TypeTables {
    fn default() -> Self {
        Self {
            synonyms: pairs(&[
                ("Tensor", "paddle.Tensor"),
                ("string", "str"),
                ("function", "Callable[Any, Any]"),
                ("list", "list[Any]"),
                ("tuple", "tuple[Any, ...]"),
                ("dict", "dict[str, Any]"),
            ]),
            param_overrides: pairs(&[("axis", "int | list[int] | tuple[int, ...]")]),
            return_sentinels: pairs(&[
                ("self", "Self"),
                ("Self", "Self"),
                ("None", "None"),
                ("none", "None"),
                ("out", "paddle.Tensor"),
            ]),
        }
    }
}

fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn lookup<'a>(table: &'a [(String, String)], key: &str) -> Option<&'a str> {
    table
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

impl TypeTables {
    /// Load tables from a JSON file. All three tables must be present, each
    /// an array of `[written, canonical]` pairs.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read tables file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid tables file {}", path.display()))
    }

    /// Canonical form of a written type name, if the synonym table knows it.
    pub fn synonym(&self, written: &str) -> Option<&str> {
        lookup(&self.synonyms, written)
    }

    /// Forced type for a parameter name, if any.
    pub fn param_override(&self, name: &str) -> Option<&str> {
        lookup(&self.param_overrides, name)
    }

    /// Forced return type for an exact sentinel word.
    pub fn return_sentinel(&self, word: &str) -> Option<&str> {
        lookup(&self.return_sentinels, word)
    }

    /// Sentinels in priority order, for description-text scanning.
    pub fn return_sentinels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.return_sentinels
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Map one type token: synonym-table hit, or pass-through stripped of
    /// surrounding parentheses.
    pub fn map_token(&self, token: &str) -> String {
        match self.synonym(token.trim()) {
            Some(canonical) => canonical.to_string(),
            None => strip_type(token).to_string(),
        }
    }

    /// Normalize a type expression that may union alternatives with `|`.
    /// Each alternative is mapped independently; the delimiter is kept.
    /// Applied to docstring-derived types and to annotations already present
    /// inline in the signature, so both converge to the same vocabulary.
    pub fn map_expr(&self, expr: &str) -> String {
        expr.split('|')
            .map(|alt| self.map_token(alt))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Trim whitespace, then any surrounding parenthesis characters.
pub fn strip_type(token: &str) -> &str {
    token.trim().trim_matches(|c| c == '(' || c == ')')
}
