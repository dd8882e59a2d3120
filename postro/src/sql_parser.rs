//! Split a SQL source string into statements and parameter fragments.
//!
//! Honours single quotes, standard-conforming-strings, double-quoted
//! identifiers, dollar quoting, line/block comments, parenthesis depth,
//! and semicolons as statement separators.
use std::str::CharIndices;

/// A single SQL statement split around `?` placeholders (when requested).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleQuery {
    /// Fragments of the statement; adjacent fragments are joined by a
    /// parameter placeholder (`$1`, `$2`, ...).
    pub fragments: Vec<String>,
}

impl SimpleQuery {
    /// Number of parameter placeholders found (`fragments.len() - 1`, or 0
    /// for a single fragment).
    pub fn param_count(&self) -> usize {
        self.fragments.len().saturating_sub(1)
    }
}

/// The result of splitting a SQL source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedQuery {
    /// Source was empty, or contained only whitespace/semicolons.
    Empty,
    /// A single statement.
    Simple(SimpleQuery),
    /// Multiple `;`-separated statements, in source order.
    Composite(Vec<SimpleQuery>),
}

struct Scanner<'a> {
    src: &'a str,
    chars: CharIndices<'a>,
    with_params: bool,
    standard_conforming_strings: bool,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str, with_params: bool, standard_conforming_strings: bool) -> Self {
        Self { src, chars: src.char_indices(), with_params, standard_conforming_strings }
    }

    fn peek(&self) -> Option<(usize, char)> {
        self.chars.clone().next()
    }

    fn rest_from(&self, start: usize) -> &'a str {
        &self.src[start..]
    }
}

/// Split `sql` into statements. `with_params` enables `?` as a parameter
/// placeholder boundary; when `false`, `?` has no special meaning.
/// `standard_conforming_strings` mirrors the connection's reported setting
/// (learned from `ParameterStatus`, see SPEC_FULL.md §4.5): when `false`,
/// backslash escapes inside single-quoted literals are honoured.
pub fn parse(sql: &str, with_params: bool, standard_conforming_strings: bool) -> ParsedQuery {
    let mut scanner = Scanner::new(sql, with_params, standard_conforming_strings);

    let mut statements = Vec::new();
    let mut fragments = Vec::new();
    let mut frag_start = 0usize;
    let mut in_paren: i32 = 0;

    while let Some((i, c)) = scanner.chars.next() {
        match c {
            '\'' => skip_single_quoted(&mut scanner),
            '"' => skip_double_quoted(&mut scanner),
            '-' => {
                if matches!(scanner.peek(), Some((_, '-'))) {
                    scanner.chars.next();
                    skip_line_comment(&mut scanner);
                }
            }
            '/' => {
                if matches!(scanner.peek(), Some((_, '*'))) {
                    scanner.chars.next();
                    skip_block_comment(&mut scanner);
                }
            }
            '$' => {
                skip_dollar_quote_if_tagged(&mut scanner);
            }
            '(' => in_paren += 1,
            ')' => in_paren -= 1,
            '?' if scanner.with_params => {
                fragments.push(sql[frag_start..i].to_string());
                frag_start = i + c.len_utf8();
            }
            ';' if in_paren == 0 => {
                let frag = sql[frag_start..i].to_string();
                frag_start = i + c.len_utf8();
                fragments.push(frag);
                push_statement(&mut statements, std::mem::take(&mut fragments));
            }
            _ => {}
        }
    }

    fragments.push(scanner.rest_from(frag_start).to_string());
    push_statement(&mut statements, fragments);

    match statements.len() {
        0 => ParsedQuery::Empty,
        1 => ParsedQuery::Simple(statements.into_iter().next().expect("len checked")),
        _ => ParsedQuery::Composite(statements),
    }
}

fn push_statement(statements: &mut Vec<SimpleQuery>, fragments: Vec<String>) {
    let is_empty = fragments.len() == 1 && fragments[0].trim().is_empty();
    if !is_empty {
        statements.push(SimpleQuery { fragments });
    }
}

fn skip_single_quoted(scanner: &mut Scanner) {
    let honour_backslash = !scanner.standard_conforming_strings;
    loop {
        let Some((_, c)) = scanner.chars.next() else { return };
        match c {
            '\'' => {
                if matches!(scanner.peek(), Some((_, '\''))) {
                    scanner.chars.next();
                    continue;
                }
                return;
            }
            '\\' if honour_backslash => {
                scanner.chars.next();
            }
            _ => {}
        }
    }
}

fn skip_double_quoted(scanner: &mut Scanner) {
    for (_, c) in scanner.chars.by_ref() {
        if c == '"' {
            if matches!(scanner.peek(), Some((_, '"'))) {
                scanner.chars.next();
                continue;
            }
            return;
        }
    }
}

fn skip_line_comment(scanner: &mut Scanner) {
    for (_, c) in scanner.chars.by_ref() {
        if c == '\n' {
            return;
        }
    }
}

fn skip_block_comment(scanner: &mut Scanner) {
    let mut prev_star = false;
    for (_, c) in scanner.chars.by_ref() {
        if prev_star && c == '/' {
            return;
        }
        prev_star = c == '*';
    }
}

/// If positioned right after a `$`, and the upcoming characters form a
/// `$tag$`, consume through the matching closing `$tag$`. Nesting is not
/// supported, matching the source's own non-nesting dollar-quote scan.
fn skip_dollar_quote_if_tagged(scanner: &mut Scanner) {
    let tag_start = match scanner.peek() {
        Some((i, _)) => i,
        None => return,
    };

    let mut probe = scanner.chars.clone();
    let mut tag_end = tag_start;
    loop {
        match probe.next() {
            Some((i, '$')) => {
                tag_end = i;
                break;
            }
            Some((i, c)) if c == '_' || c.is_alphanumeric() => {
                tag_end = i + c.len_utf8();
            }
            _ => return, // not a valid tag, bare `$`
        }
    }

    let tag = &scanner.src[tag_start..tag_end];
    let needle = format!("${tag}$");

    // advance past the opening tag
    scanner.chars = probe;

    loop {
        match scanner.chars.next() {
            Some((i, '$')) => {
                if scanner.rest_from(i).starts_with(&needle) {
                    for _ in 0..needle.chars().count() - 1 {
                        scanner.chars.next();
                    }
                    return;
                }
            }
            Some(_) => {}
            None => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert_eq!(parse("", false, true), ParsedQuery::Empty);
        assert_eq!(parse("   ;  ", false, true), ParsedQuery::Empty);
    }

    #[test]
    fn single_statement() {
        match parse("SELECT 1", false, true) {
            ParsedQuery::Simple(q) => assert_eq!(q.fragments, vec!["SELECT 1"]),
            other => panic!("expected Simple, got {other:?}"),
        }
    }

    #[test]
    fn statement_count() {
        match parse("SELECT 1; SELECT 2; SELECT 3", false, true) {
            ParsedQuery::Composite(qs) => assert_eq!(qs.len(), 3),
            other => panic!("expected Composite, got {other:?}"),
        }
    }

    #[test]
    fn semicolon_inside_string_literal_does_not_split() {
        match parse("SELECT ';'; SELECT 2", false, true) {
            ParsedQuery::Composite(qs) => assert_eq!(qs.len(), 2),
            other => panic!("expected Composite, got {other:?}"),
        }
    }

    #[test]
    fn dollar_quote_awareness() {
        match parse("SELECT $tag$;$tag$; SELECT 2", false, true) {
            ParsedQuery::Composite(qs) => assert_eq!(qs.len(), 2),
            other => panic!("expected Composite, got {other:?}"),
        }
    }

    #[test]
    fn dollar_quote_body_may_contain_quotes() {
        match parse(r#"SELECT $tag$it's "fine"$tag$"#, false, true) {
            ParsedQuery::Simple(_) => {}
            other => panic!("expected Simple, got {other:?}"),
        }
    }

    #[test]
    fn placeholder_isolation() {
        for sql in [
            "SELECT '?'",
            "SELECT \"?\"",
            "SELECT 1 -- ?\n",
            "SELECT 1 /* ? */",
            "SELECT $tag$?$tag$",
        ] {
            match parse(sql, true, true) {
                ParsedQuery::Simple(q) => assert_eq!(q.param_count(), 0, "sql: {sql}"),
                other => panic!("expected Simple for {sql}, got {other:?}"),
            }
        }
    }

    #[test]
    fn placeholder_split() {
        match parse("SELECT ?, ?", true, true) {
            ParsedQuery::Simple(q) => assert_eq!(q.param_count(), 2),
            other => panic!("expected Simple, got {other:?}"),
        }
    }

    #[test]
    fn paren_depth_does_not_affect_semicolon_outside() {
        match parse("SELECT (1); SELECT (2)", false, true) {
            ParsedQuery::Composite(qs) => assert_eq!(qs.len(), 2),
            other => panic!("expected Composite, got {other:?}"),
        }
    }

    #[test]
    fn backslash_escape_honoured_when_not_standard_conforming() {
        // `\'` does not close the literal when standard_conforming_strings is off
        match parse(r"SELECT 'it\'s'; SELECT 2", false, false) {
            ParsedQuery::Composite(qs) => assert_eq!(qs.len(), 2),
            other => panic!("expected Composite, got {other:?}"),
        }
    }

    #[test]
    fn backslash_not_special_when_standard_conforming() {
        // `\` has no escaping power; the literal closes at the next `'`,
        // so the trailing `s'; SELECT 2` is left dangling as ordinary SQL
        // and no extra statement boundary is introduced by the backslash.
        match parse(r"SELECT 'it\'; SELECT 2", false, true) {
            ParsedQuery::Composite(qs) => assert_eq!(qs.len(), 2),
            other => panic!("expected Composite, got {other:?}"),
        }
    }
}
