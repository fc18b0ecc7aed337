//! Whole-file assembly — copy untouched byte spans, substitute rewritten
//! signature and return-annotation spans.

use crate::docstring::{parse_args, parse_return};
use crate::matcher::Matcher;
use crate::signature::{return_annotation, rewrite_params};
use crate::vocab::TypeTables;
use anyhow::{Context, Result};

/// Annotate every matched function block in `src`.
///
/// Every byte outside a matched signature/return span is reproduced
/// identically. Ambiguous parameter syntax inside any matched block fails
/// the whole file — the caller gets an error and no output.
pub fn annotate_source(src: &str, tables: &TypeTables) -> Result<String> {
    let mut out = String::with_capacity(src.len() + src.len() / 8);
    let mut last = 0;
    for m in Matcher::new(src) {
        let args = match &m.args_section {
            Some(r) => parse_args(&src[r.clone()], tables),
            None => Vec::new(),
        };
        let inferred = match &m.returns_section {
            Some(r) => parse_return(&src[r.clone()], tables),
            None => String::new(),
        };

        let params = rewrite_params(&src[m.params.clone()], &args, tables)
            .with_context(|| format!("in function `{}`", src[m.name.clone()].trim()))?;

        out.push_str(&src[last..m.params.start]);
        out.push_str(&params);
        match &m.return_anno {
            Some(r) => {
                out.push_str(&src[m.params.end..r.start]);
                out.push_str(&return_annotation(Some(&src[r.clone()]), &inferred, tables));
                out.push_str(&src[r.end..m.span.end]);
            }
            None => {
                out.push_str(&src[m.params.end..m.colon.start]);
                out.push_str(&return_annotation(None, &inferred, tables));
                out.push(':');
                out.push_str(&src[m.colon.end..m.span.end]);
            }
        }
        last = m.span.end;
    }
    out.push_str(&src[last..]);
    Ok(out)
}
