//! Docstring section parsing — argument lines and the return line.

use crate::vocab::{strip_type, TypeTables};
use regex::Regex;
use std::sync::LazyLock;

/// Argument line: `name(type1, type2, optional): description`.
static RE_ARG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ ]*(?P<name>.*?)\((?P<types>.*?)\)[ ]?:").unwrap());

/// Return line: `[list of ]<word>[s]<, : . or (><description>`.
static RE_RETURN_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<multi>list of )?(?P<word>.*?)(?P<plural>s)?[,:.(](?P<desc>.*)$").unwrap()
});

/// Return line with no punctuation at all: a lone type word, optionally
/// pluralized or prefixed with `list of `. Prose lines do not qualify.
static RE_RETURN_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<multi>list of )?(?P<word>\S+?)(?P<plural>s)?$").unwrap());

/// Parse an argument section into ordered `(name, raw type)` pairs.
///
/// `optional` tokens are discarded (case-insensitively), the remaining type
/// tokens are mapped through the synonym table and joined with ` | `. A name
/// declared twice keeps its position but takes the later value. Lines not
/// matching the shape are ignored.
pub fn parse_args(section: &str, tables: &TypeTables) -> Vec<(String, String)> {
    let mut args: Vec<(String, String)> = Vec::new();
    for line in section.lines() {
        let Some(caps) = RE_ARG_LINE.captures(line) else {
            continue;
        };
        let name = caps["name"].trim().to_string();
        let joined = caps["types"]
            .split(',')
            .filter(|t| !t.trim().eq_ignore_ascii_case("optional"))
            .map(|t| tables.map_token(t))
            .collect::<Vec<_>>()
            .join(" | ");
        match args.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = joined,
            None => args.push((name, joined)),
        }
    }
    args
}

/// Infer the raw return type from a return section. Only the first line
/// counts.
///
/// Precedence: an exact (trimmed) sentinel wins outright; then a sentinel
/// word occurring anywhere in the description text; then the parsed type
/// word through the synonym table, the sentinel table, and finally itself
/// stripped of backticks and parens. A `list of ` prefix or a trailing
/// plural `s` wraps the result as `list[T]`. Empty when nothing parses.
pub fn parse_return(section: &str, tables: &TypeTables) -> String {
    let Some(first) = section.lines().next() else {
        return String::new();
    };
    let first = first.trim();
    if let Some(forced) = tables.return_sentinel(first) {
        return forced.to_string();
    }
    let Some(caps) = RE_RETURN_LINE
        .captures(first)
        .or_else(|| RE_RETURN_BARE.captures(first))
    else {
        return String::new();
    };
    let desc = caps.name("desc").map(|m| m.as_str()).unwrap_or("");
    if !desc.is_empty() {
        for (word, forced) in tables.return_sentinels() {
            if desc.contains(word) {
                return forced.to_string();
            }
        }
    }
    let word = caps["word"].trim().trim_matches('`');
    let mapped = tables
        .synonym(word)
        .or_else(|| tables.return_sentinel(word))
        .map(str::to_string)
        .unwrap_or_else(|| strip_type(word).to_string());
    if caps.name("multi").is_some() || caps.name("plural").is_some() {
        format!("list[{mapped}]")
    } else {
        mapped
    }
}
