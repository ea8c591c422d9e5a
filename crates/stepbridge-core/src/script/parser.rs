//! Action script parsing.
//!
//! The script language is line oriented. Each non-blank line is one
//! statement:
//!
//! ```text
//! # comment
//! url = 'http://' + host + ':' + port     assignment
//! print url                               log a value
//! del scratch                             unbind a name
//! (port|int) > 1024                       expression statement
//! ```
//!
//! Expressions are JEXL. Parsing only splits statements; expressions are
//! validated when evaluated.

use super::ScriptError;

/// One parsed statement with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub line: usize,
    pub kind: StatementKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    Assign { name: String, expr: String },
    Delete { name: String },
    Print { expr: String },
    Expr { expr: String },
}

impl StatementKind {
    /// The expression evaluated by this statement, if any.
    pub fn expression(&self) -> Option<&str> {
        match self {
            StatementKind::Assign { expr, .. }
            | StatementKind::Print { expr }
            | StatementKind::Expr { expr } => Some(expr),
            StatementKind::Delete { .. } => None,
        }
    }
}

const KEYWORDS: &[&str] = &["true", "false", "null", "in", "print", "del"];

/// Split script text into statements.
pub fn parse(text: &str) -> Result<Vec<Statement>, ScriptError> {
    let mut statements = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let source = strip_comment(raw).trim();
        if source.is_empty() {
            continue;
        }
        let kind = parse_statement(source, line)?;
        statements.push(Statement { line, kind });
    }
    Ok(statements)
}

fn parse_statement(source: &str, line: usize) -> Result<StatementKind, ScriptError> {
    if let Some(rest) = keyword_rest(source, "print") {
        if rest.is_empty() {
            return Err(ScriptError::Syntax {
                line,
                message: "print requires an expression".to_string(),
            });
        }
        return Ok(StatementKind::Print {
            expr: rest.to_string(),
        });
    }

    if let Some(rest) = keyword_rest(source, "del") {
        if !is_identifier(rest) || is_keyword(rest) {
            return Err(ScriptError::Syntax {
                line,
                message: format!("del expects a single name, got '{rest}'"),
            });
        }
        return Ok(StatementKind::Delete {
            name: rest.to_string(),
        });
    }

    if let Some((name, expr)) = split_assignment(source) {
        if is_keyword(name) {
            return Err(ScriptError::Syntax {
                line,
                message: format!("cannot assign to keyword '{name}'"),
            });
        }
        if expr.is_empty() {
            return Err(ScriptError::Syntax {
                line,
                message: format!("missing value in assignment to '{name}'"),
            });
        }
        return Ok(StatementKind::Assign {
            name: name.to_string(),
            expr: expr.to_string(),
        });
    }

    Ok(StatementKind::Expr {
        expr: source.to_string(),
    })
}

/// `print x` / `print(x)` → `x` / `(x)`.
fn keyword_rest<'s>(source: &'s str, keyword: &str) -> Option<&'s str> {
    let rest = source.strip_prefix(keyword)?;
    match rest.chars().next() {
        None => Some(""),
        Some(c) if c.is_whitespace() || c == '(' => Some(rest.trim()),
        Some(_) => None,
    }
}

/// `name = expr`, rejecting `==`.
fn split_assignment(source: &str) -> Option<(&str, &str)> {
    let end = source
        .char_indices()
        .find(|&(_, c)| !is_ident_char(c))
        .map(|(i, _)| i)
        .unwrap_or(source.len());
    let name = &source[..end];
    if !is_identifier(name) {
        return None;
    }
    let rest = source[end..].trim_start();
    let expr = rest.strip_prefix('=')?;
    if expr.starts_with('=') {
        return None;
    }
    Some((name, expr.trim()))
}

/// Drop a trailing `#` comment that is not inside a string literal.
fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => quote = Some(c),
                '#' => return &line[..i],
                _ => {}
            },
        }
    }
    line
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if is_ident_start(c)) && chars.all(is_ident_char)
}

fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

/// Top-level names an expression reads, in first-use order.
///
/// Property names (`a.b`), transform names (`x|upper`), object literal keys
/// and keywords are not references.
pub fn free_names(expr: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = expr.char_indices().collect();
    let mut names: Vec<String> = Vec::new();
    let mut brace_depth = 0usize;
    let mut prev_significant: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let (start, c) = chars[i];
        if c == '\'' || c == '"' {
            i = skip_string(&chars, i);
            prev_significant = Some(c);
            continue;
        }
        if c.is_ascii_digit() {
            while i < chars.len() && (is_ident_char(chars[i].1) || chars[i].1 == '.') {
                i += 1;
            }
            prev_significant = Some('0');
            continue;
        }
        if is_ident_start(c) {
            let mut j = i;
            while j < chars.len() && is_ident_char(chars[j].1) {
                j += 1;
            }
            let end = chars.get(j).map(|&(pos, _)| pos).unwrap_or(expr.len());
            let word = &expr[start..end];
            let next_significant = chars[j..].iter().map(|&(_, c)| c).find(|c| !c.is_whitespace());

            let is_member = matches!(prev_significant, Some('.') | Some('|'));
            let is_object_key = brace_depth > 0
                && matches!(prev_significant, Some('{') | Some(','))
                && next_significant == Some(':');

            if !is_member && !is_object_key && !is_keyword(word) && !names.iter().any(|n| n == word) {
                names.push(word.to_string());
            }
            prev_significant = Some('a');
            i = j;
            continue;
        }
        match c {
            '{' => brace_depth += 1,
            '}' => brace_depth = brace_depth.saturating_sub(1),
            _ => {}
        }
        if !c.is_whitespace() {
            prev_significant = Some(c);
        }
        i += 1;
    }
    names
}

/// Characters after which a `-` is a sign rather than subtraction.
const UNARY_CONTEXT: &[char] = &[
    '(', '[', '{', ',', '?', ':', '+', '-', '*', '/', '%', '=', '<', '>', '!', '&', '|',
];

/// Rewrite prefix negation `-operand` into `(0 - operand)`.
///
/// JEXL has no unary minus. The operand is a single primary (number, name
/// with member and index accessors, string or bracketed group), so
/// `2 * -3` becomes `2 * (0 - 3)`.
pub fn rewrite_unary_minus(expr: &str) -> String {
    let chars: Vec<(usize, char)> = expr.char_indices().collect();
    let mut out = String::with_capacity(expr.len());
    let mut prev_significant: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let (start, c) = chars[i];
        if c == '\'' || c == '"' {
            let end = skip_string(&chars, i);
            out.push_str(&expr[start..byte_offset(expr, &chars, end)]);
            prev_significant = Some(c);
            i = end;
            continue;
        }
        if c == '-' && prev_significant.is_none_or(|p| UNARY_CONTEXT.contains(&p)) {
            let operand_start = skip_whitespace(&chars, i + 1);
            if let Some(end) = operand_end(&chars, operand_start) {
                let operand = &expr[byte_offset(expr, &chars, operand_start)..byte_offset(expr, &chars, end)];
                out.push_str("(0 - ");
                out.push_str(&rewrite_unary_minus(operand));
                out.push(')');
                prev_significant = Some(')');
                i = end;
                continue;
            }
        }
        out.push(c);
        if !c.is_whitespace() {
            prev_significant = Some(c);
        }
        i += 1;
    }
    out
}

/// Right-hand operands of every `/`, `//` and `%` in `expr`.
pub fn divisor_operands(expr: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = expr.char_indices().collect();
    let mut operands = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i].1;
        if c == '\'' || c == '"' {
            i = skip_string(&chars, i);
            continue;
        }
        if c == '/' || c == '%' {
            let mut j = i + 1;
            if c == '/' && chars.get(j).is_some_and(|&(_, n)| n == '/') {
                j += 1;
            }
            let start = skip_whitespace(&chars, j);
            if let Some(end) = operand_end(&chars, start) {
                operands.push(&expr[byte_offset(expr, &chars, start)..byte_offset(expr, &chars, end)]);
            }
            i = j;
            continue;
        }
        i += 1;
    }
    operands
}

/// Index just past the primary operand starting at `start`, if one does.
fn operand_end(chars: &[(usize, char)], start: usize) -> Option<usize> {
    let &(_, c) = chars.get(start)?;
    let mut i = start;
    if c == '(' || c == '[' || c == '{' {
        i = skip_group(chars, i)?;
    } else if c == '\'' || c == '"' {
        i = skip_string(chars, i);
    } else if c.is_ascii_digit() {
        while i < chars.len() && (is_ident_char(chars[i].1) || chars[i].1 == '.') {
            i += 1;
        }
        return Some(i);
    } else if is_ident_start(c) {
        while i < chars.len() && is_ident_char(chars[i].1) {
            i += 1;
        }
    } else {
        return None;
    }

    loop {
        match chars.get(i).map(|&(_, c)| c) {
            Some('.') if chars.get(i + 1).is_some_and(|&(_, c)| is_ident_start(c)) => {
                i += 1;
                while i < chars.len() && is_ident_char(chars[i].1) {
                    i += 1;
                }
            }
            Some('[') => i = skip_group(chars, i)?,
            _ => return Some(i),
        }
    }
}

/// Index just past the bracketed group opening at `open`.
fn skip_group(chars: &[(usize, char)], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < chars.len() {
        match chars[i].1 {
            '\'' | '"' => {
                i = skip_string(chars, i);
                continue;
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn skip_whitespace(chars: &[(usize, char)], mut i: usize) -> usize {
    while i < chars.len() && chars[i].1.is_whitespace() {
        i += 1;
    }
    i
}

fn byte_offset(expr: &str, chars: &[(usize, char)], i: usize) -> usize {
    chars.get(i).map(|&(pos, _)| pos).unwrap_or(expr.len())
}

/// Index just past the string literal starting at `open`.
fn skip_string(chars: &[(usize, char)], open: usize) -> usize {
    let quote = chars[open].1;
    let mut i = open + 1;
    let mut escaped = false;
    while i < chars.len() {
        let c = chars[i].1;
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return i + 1;
        }
        i += 1;
    }
    i
}
