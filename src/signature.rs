//! Signature rewriting — merge docstring types, inline annotations, and
//! per-name overrides into new parameter-list text and a return annotation.

use crate::vocab::TypeTables;
use anyhow::{bail, Result};

/// Split parameter-list text on top-level commas. Commas nested inside
/// brackets or quoted default values do not split.
fn split_params(sig: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_single = false;
    let mut in_double = false;
    let mut start = 0;
    for (i, ch) in sig.char_indices() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            _ if in_single || in_double => {}
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&sig[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&sig[start..]);
    parts
}

/// Rewrite parameter-list text, one parameter at a time, joined with `, `.
///
/// Per entry: an inline annotation is the candidate type, else the
/// docstring-derived one; a parameter-name override beats both. The result
/// is normalized through the vocabulary, widened with ` | None` for a
/// textual `None` default, and emitted as `name`, `name: T`, `name: T = v`
/// or `name=v`. More than one `=` or `:` inside an entry is a fatal
/// input-shape violation — guessing would corrupt the signature.
pub fn rewrite_params(sig: &str, args: &[(String, String)], tables: &TypeTables) -> Result<String> {
    let mut rendered: Vec<String> = Vec::new();
    for entry in split_params(sig) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        // default value, `x=None`
        let (head, default) = match entry.split_once('=') {
            None => (entry, None),
            Some((head, value)) => {
                if value.contains('=') {
                    bail!("ambiguous parameter `{entry}`: more than one `=`");
                }
                (head, Some(value.trim()))
            }
        };

        // inline annotation, `x: str`
        let (name, inline) = match head.split_once(':') {
            None => (head.trim(), None),
            Some((name, anno)) => {
                if anno.contains(':') {
                    bail!("ambiguous parameter `{entry}`: more than one `:`");
                }
                (name.trim(), Some(anno.trim()))
            }
        };

        let doc_type = args
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t.as_str());
        let anno = tables
            .param_override(name)
            .or(inline)
            .or(doc_type)
            .filter(|a| !a.is_empty());

        let mut piece = String::from(name);
        match anno {
            Some(anno) => {
                let mut anno = tables.map_expr(anno);
                if default == Some("None") && !anno.contains("None") {
                    anno.push_str(" | None");
                }
                piece.push_str(": ");
                piece.push_str(&anno);
                if let Some(value) = default {
                    piece.push_str(" = ");
                    piece.push_str(value);
                }
            }
            None => {
                if let Some(value) = default {
                    piece.push('=');
                    piece.push_str(value);
                }
            }
        }
        rendered.push(piece);
    }
    Ok(rendered.join(", "))
}

/// Build the return-annotation text.
///
/// An existing inline annotation is normalized to the canonical vocabulary
/// and kept — it wins over the docstring-derived type. Otherwise a non-empty
/// inferred type is emitted as ` -> T`; otherwise nothing.
pub fn return_annotation(existing: Option<&str>, inferred: &str, tables: &TypeTables) -> String {
    if let Some(existing) = existing {
        if let Some(expr) = existing.trim().strip_prefix("->") {
            return format!(" -> {}", tables.map_expr(expr));
        }
    }
    if inferred.is_empty() {
        String::new()
    } else {
        format!(" -> {inferred}")
    }
}
