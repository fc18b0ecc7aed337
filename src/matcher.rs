//! Function/docstring block matcher — explicit linear scanner.
//!
//! Recognizes one structural template: a `def` line with a balanced-paren
//! parameter list, an optional `-> T` clause, a trailing colon, and an
//! immediately following triple-quoted docstring. Inside the docstring,
//! `Args:`/`Parameters:` and `Returns:`/`Yields:` headings delimit the
//! argument and return sections.
//!
//! This is not a Python parser. Anything deviating from the template —
//! unterminated docstring, missing colon, comment after the signature —
//! simply does not match and passes through unmodified. Matches never
//! overlap; scanning resumes after each match's end.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Section heading: spaces, the literal heading word (case-sensitive,
/// singular or plural), a colon, nothing else on the line.
static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ ]*(?P<kind>Arg|Parameter|Return|Yield)s?:$").unwrap());

/// One recognized function-definition-plus-docstring unit.
///
/// All fields are byte ranges into the scanned source. Sub-spans are nested
/// within `span` and appear in source order.
#[derive(Debug)]
pub struct FunctionMatch {
    /// The whole unit, from the start of the `def` line through the newline
    /// after the docstring's closing delimiter.
    pub span: Range<usize>,
    /// Function name.
    pub name: Range<usize>,
    /// Interior of the parameter-list parentheses.
    pub params: Range<usize>,
    /// Existing ` -> T` clause, from the byte after `)` to the colon.
    pub return_anno: Option<Range<usize>>,
    /// The colon terminating the `def` line.
    pub colon: Range<usize>,
    /// Body of the argument section, heading line excluded.
    pub args_section: Option<Range<usize>>,
    /// Body of the return section, heading line excluded.
    pub returns_section: Option<Range<usize>>,
}

/// Lazy, restartable iterator over all matches in source order.
pub struct Matcher<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Matcher<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }
}

impl Iterator for Matcher<'_> {
    type Item = FunctionMatch;

    fn next(&mut self) -> Option<FunctionMatch> {
        while self.pos < self.src.len() {
            let line_end = match self.src[self.pos..].find('\n') {
                Some(i) => self.pos + i + 1,
                None => self.src.len(),
            };
            if let Some(m) = try_match(self.src, self.pos) {
                self.pos = m.span.end;
                return Some(m);
            }
            self.pos = line_end;
        }
        None
    }
}

/// Attempt a match at one line start. Any structural deviation returns None.
fn try_match(src: &str, start: usize) -> Option<FunctionMatch> {
    let bytes = src.as_bytes();
    let mut i = start;
    while bytes.get(i) == Some(&b' ') {
        i += 1;
    }
    if !src[i..].starts_with("def ") {
        return None;
    }
    i += 4;

    // name runs to the opening paren, on the same line
    let name_start = i;
    let open = loop {
        match bytes.get(i).copied()? {
            b'(' => break i,
            b'\n' => return None,
            _ => i += 1,
        }
    };
    let name = name_start..open;

    // balanced parameter list; nested parens in defaults are fine
    let mut depth = 1usize;
    let mut j = open + 1;
    let close = loop {
        match bytes.get(j).copied()? {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    break j;
                }
            }
            _ => {}
        }
        j += 1;
    };
    let params = open + 1..close;

    // optional ` -> T` clause, then the colon ending the def line
    let after = close + 1;
    let mut k = after;
    if bytes.get(k) == Some(&b' ') {
        k += 1;
    }
    let (return_anno, colon_pos) = if src.get(k..k + 2) == Some("->") {
        let mut c = k + 2;
        let colon = loop {
            match bytes.get(c).copied()? {
                b':' => break c,
                b'\n' => return None,
                _ => c += 1,
            }
        };
        (Some(after..colon), colon)
    } else if bytes.get(after) == Some(&b':') {
        (None, after)
    } else {
        return None;
    };
    if bytes.get(colon_pos + 1) != Some(&b'\n') {
        return None;
    }
    let colon = colon_pos..colon_pos + 1;

    // docstring opens on the very next line: spaces, optional `r`, triple quote
    let mut d = colon_pos + 2;
    while bytes.get(d) == Some(&b' ') {
        d += 1;
    }
    if bytes.get(d) == Some(&b'r') {
        d += 1;
    }
    let quote = match src.get(d..d + 3) {
        Some(q @ ("\"\"\"" | "'''")) => q,
        _ => return None,
    };
    let body_start = d + 3;

    // minimal close: first matching delimiter followed by a newline
    let mut c = body_start;
    let body_end = loop {
        let off = src.get(c..)?.find(quote)?;
        let p = c + off;
        if bytes.get(p + 3) == Some(&b'\n') {
            break p;
        }
        c = p + 1;
    };
    let span = start..body_end + 4;

    let (args_section, returns_section) = find_sections(src, body_start..body_end);

    Some(FunctionMatch {
        span,
        name,
        params,
        return_anno,
        colon,
        args_section,
        returns_section,
    })
}

#[derive(Clone, Copy, PartialEq)]
enum SectionKind {
    Args,
    Returns,
}

/// Locate the argument/return section bodies within the docstring body.
///
/// Each section starts after its heading line and runs until the next
/// recognized heading or the end of the body. First heading of each kind
/// wins; headings are recognized in either order.
fn find_sections(src: &str, body: Range<usize>) -> (Option<Range<usize>>, Option<Range<usize>>) {
    let mut headings: Vec<(SectionKind, usize, usize)> = Vec::new();
    let mut offset = body.start;
    for line in src[body.clone()].split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        // a heading must be followed by a newline inside the body
        let Some(stripped) = line.strip_suffix('\n') else {
            continue;
        };
        if let Some(caps) = RE_HEADING.captures(stripped) {
            let kind = match &caps["kind"] {
                "Arg" | "Parameter" => SectionKind::Args,
                _ => SectionKind::Returns,
            };
            headings.push((kind, line_start, offset));
        }
    }
    let section = |kind: SectionKind| -> Option<Range<usize>> {
        let idx = headings.iter().position(|(k, _, _)| *k == kind)?;
        let content_start = headings[idx].2;
        let content_end = headings
            .get(idx + 1)
            .map(|(_, line_start, _)| *line_start)
            .unwrap_or(body.end);
        Some(content_start..content_end)
    };
    (section(SectionKind::Args), section(SectionKind::Returns))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(src: &str) -> FunctionMatch {
        Matcher::new(src).next().expect("expected a match")
    }

    const BASIC: &str = "def add(x, y=1):\n    \"\"\"\n    Add.\n\n    Args:\n        x (int): left\n        y (int, optional): right\n\n    Returns:\n        out (Tensor): sum\n    \"\"\"\n    return x + y\n";

    #[test]
    fn matches_basic_block() {
        let m = first(BASIC);
        assert_eq!(&BASIC[m.name.clone()], "add");
        assert_eq!(&BASIC[m.params.clone()], "x, y=1");
        assert!(m.return_anno.is_none());
        assert_eq!(&BASIC[m.colon.clone()], ":");
    }

    #[test]
    fn sections_hold_expected_text() {
        let m = first(BASIC);
        let args = &BASIC[m.args_section.clone().unwrap()];
        assert!(args.contains("x (int): left"));
        assert!(args.contains("y (int, optional): right"));
        assert!(!args.contains("Returns:"));
        let rtns = &BASIC[m.returns_section.clone().unwrap()];
        assert!(rtns.contains("out (Tensor): sum"));
    }

    #[test]
    fn no_docstring_no_match() {
        let src = "def f(x):\n    return x\n";
        assert!(Matcher::new(src).next().is_none());
    }

    #[test]
    fn unterminated_docstring_skipped() {
        let src = "def f(x):\n    \"\"\"doc without a close\n    return x\n";
        assert!(Matcher::new(src).next().is_none());
    }

    #[test]
    fn existing_return_annotation_span() {
        let src = "def f(x) -> int:\n    \"\"\"doc\n    \"\"\"\n";
        let m = first(src);
        assert_eq!(&src[m.return_anno.clone().unwrap()], " -> int");
    }

    #[test]
    fn arrow_without_space() {
        let src = "def f(x)->int:\n    \"\"\"doc\n    \"\"\"\n";
        let m = first(src);
        assert_eq!(&src[m.return_anno.clone().unwrap()], "->int");
    }

    #[test]
    fn space_before_colon_without_arrow_rejected() {
        let src = "def f(x) :\n    \"\"\"doc\n    \"\"\"\n";
        assert!(Matcher::new(src).next().is_none());
    }

    #[test]
    fn nested_parens_in_defaults() {
        let src = "def f(x=(1, 2), y=[3, 4]):\n    \"\"\"doc\n    \"\"\"\n";
        let m = first(src);
        assert_eq!(&src[m.params.clone()], "x=(1, 2), y=[3, 4]");
    }

    #[test]
    fn raw_and_single_quoted_docstrings() {
        let src = "def f(x):\n    r'''doc\n    '''\n";
        let m = first(src);
        assert!(m.args_section.is_none());
        assert!(m.returns_section.is_none());
    }

    #[test]
    fn headings_in_either_order() {
        let src = "def f(x):\n    \"\"\"\n    Returns:\n        int, result\n    Args:\n        x (int): x\n    \"\"\"\n";
        let m = first(src);
        let rtns = &src[m.returns_section.clone().unwrap()];
        assert!(rtns.contains("int, result"));
        assert!(!rtns.contains("x (int)"));
        let args = &src[m.args_section.clone().unwrap()];
        assert!(args.contains("x (int): x"));
    }

    #[test]
    fn unrecognized_heading_does_not_terminate() {
        let src = "def f(x):\n    \"\"\"\n    Args:\n        x (int): x\n    Examples:\n        f(1)\n    \"\"\"\n";
        let m = first(src);
        let args = &src[m.args_section.clone().unwrap()];
        assert!(args.contains("Examples:"));
    }

    #[test]
    fn matches_are_ordered_and_disjoint() {
        let src = "def a(x):\n    \"\"\"one\n    \"\"\"\ncode()\ndef b(y):\n    '''two\n    '''\n";
        let matches: Vec<_> = Matcher::new(src).collect();
        assert_eq!(matches.len(), 2);
        assert_eq!(&src[matches[0].name.clone()], "a");
        assert_eq!(&src[matches[1].name.clone()], "b");
        assert!(matches[0].span.end <= matches[1].span.start);
    }

    #[test]
    fn indented_method_matches() {
        let src = "    def method(self):\n        \"\"\"doc\n        \"\"\"\n";
        let m = first(src);
        assert_eq!(&src[m.name.clone()], "method");
        assert_eq!(m.span.start, 0);
    }

    #[test]
    fn heading_must_end_its_line() {
        // trailing text after the colon means the line is not a heading
        let src = "def f(x):\n    \"\"\"\n    Args: inline text\n        x (int): x\n    \"\"\"\n";
        let m = first(src);
        assert!(m.args_section.is_none());
    }
}
