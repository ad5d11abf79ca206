//! Textual preprocessing of declaration input
//!
//! A pure text-to-text transform applied before lexing. It produces no
//! diagnostics; anything it cannot rewrite is left for the lexer to reject.
//!
//! Passes, in order, each over the whole remaining text:
//! 1. normalise `[ /*name*/ ]` array-length annotations to `[name]`
//! 2. strip block and line comments
//! 3. remove `typedef enum { ... } name;` blocks wholesale
//! 4. substitute simple object-like numeric macros, evaluating their values
//!    as integer expressions where possible
//! 5. strip remaining `#` directives, `extern "C"` lines, lone closing braces
//! 6. trim trailing whitespace from every line

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

static ARRAY_LEN_ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\s*(?:/\*)*\s*([A-Za-z0-9_]+)\s*(?:\*/)*\s*\]").unwrap()
});
static BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"//.*").unwrap());
static TYPEDEF_ENUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)typedef\s*enum.*?\{.*?\}.*?;").unwrap());
static DEFINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#define\s+([A-Za-z0-9_]+)\s+(\(*[0-9]+[x0-9 */+<>|&%=()-]*)\s*")
        .unwrap()
});
static DIRECTIVE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*#.*$").unwrap());
static EXTERN_C_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*extern "C".*$"#).unwrap());
static CLOSING_BRACE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\}\s*$").unwrap());
static TRAILING_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)\s+$").unwrap());

/// Characters a macro value may consist of and still be evaluated.
const EVALUABLE: &str = "0123456789 */+-<>|&%=()";

/// Apply all preprocessing passes to `content`.
pub fn preprocess(content: &str) -> String {
    let content = ARRAY_LEN_ANNOTATION.replace_all(content, "[${1}]");
    let content = BLOCK_COMMENT.replace_all(&content, "");
    let content = LINE_COMMENT.replace_all(&content, "");
    let content = TYPEDEF_ENUM.replace_all(&content, "");
    let content = substitute_macros(content.into_owned());
    let content = DIRECTIVE_LINE.replace_all(&content, "");
    let content = EXTERN_C_LINE.replace_all(&content, "");
    let content = CLOSING_BRACE_LINE.replace_all(&content, "");
    let content = TRAILING_WHITESPACE.replace_all(&content, "");
    content.into_owned()
}

/// Repeatedly resolve the first object-like numeric macro definition.
///
/// The definition is removed, its value evaluated if it consists only of
/// digits and the supported operator set, and the result substituted for
/// every whole-word occurrence of the name in the remaining text. Macros
/// whose values reference other macros resolve once those are substituted,
/// since definitions are processed in order of appearance.
fn substitute_macros(mut content: String) -> String {
    while let Some(caps) = DEFINE.captures(&content) {
        let whole = caps.get(0).expect("capture 0 is the whole match");
        let name = caps[1].to_string();
        let value = caps[2].trim().to_string();
        let (start, end) = (whole.start(), whole.end());
        content.replace_range(start..end, "");

        let substitution = if value.chars().all(|c| EVALUABLE.contains(c)) {
            match eval_int_expr(&value) {
                Some(n) => n.to_string(),
                None => value,
            }
        } else {
            value
        };

        // \b keeps a macro named N from rewriting the N inside N1.
        let name_pattern =
            Regex::new(&format!(r"\b{}\b", regex::escape(&name)))
                .expect("escaped identifier is a valid pattern");
        content = name_pattern
            .replace_all(&content, NoExpand(&substitution))
            .into_owned();
    }
    content
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ExprToken {
    Num(i64),
    LParen,
    RParen,
    BitOr,
    BitAnd,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// Evaluate a macro value as an integer expression.
///
/// Supports `| & << >> + - * / %` with standard precedence, parenthesised
/// subexpressions, and unary minus. Returns `None` on anything else (stray
/// comparison operators, overflow, division by zero), in which case the raw
/// value text is substituted verbatim.
fn eval_int_expr(expr: &str) -> Option<i64> {
    let tokens = scan_expr(expr)?;
    let mut pos = 0;
    let value = eval_binary(&tokens, &mut pos, 0)?;
    if pos == tokens.len() {
        Some(value)
    } else {
        None
    }
}

fn scan_expr(expr: &str) -> Option<Vec<ExprToken>> {
    let chars: Vec<char> = expr.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' => {}
            '(' => tokens.push(ExprToken::LParen),
            ')' => tokens.push(ExprToken::RParen),
            '|' => tokens.push(ExprToken::BitOr),
            '&' => tokens.push(ExprToken::BitAnd),
            '+' => tokens.push(ExprToken::Add),
            '-' => tokens.push(ExprToken::Sub),
            '*' => tokens.push(ExprToken::Mul),
            '/' => tokens.push(ExprToken::Div),
            '%' => tokens.push(ExprToken::Rem),
            '<' if chars.get(i + 1) == Some(&'<') => {
                tokens.push(ExprToken::Shl);
                i += 1;
            }
            '>' if chars.get(i + 1) == Some(&'>') => {
                tokens.push(ExprToken::Shr);
                i += 1;
            }
            '0'..='9' => {
                let mut n: i64 = 0;
                while let Some(d) = chars.get(i).and_then(|c| c.to_digit(10)) {
                    n = n.checked_mul(10)?.checked_add(d as i64)?;
                    i += 1;
                }
                tokens.push(ExprToken::Num(n));
                continue;
            }
            _ => return None,
        }
        i += 1;
    }

    Some(tokens)
}

fn binding_power(token: ExprToken) -> Option<u8> {
    match token {
        ExprToken::BitOr => Some(1),
        ExprToken::BitAnd => Some(2),
        ExprToken::Shl | ExprToken::Shr => Some(3),
        ExprToken::Add | ExprToken::Sub => Some(4),
        ExprToken::Mul | ExprToken::Div | ExprToken::Rem => Some(5),
        _ => None,
    }
}

fn eval_binary(tokens: &[ExprToken], pos: &mut usize, min_bp: u8) -> Option<i64> {
    let mut lhs = eval_primary(tokens, pos)?;

    while let Some(&op) = tokens.get(*pos) {
        let bp = match binding_power(op) {
            Some(bp) if bp >= min_bp => bp,
            _ => break,
        };
        *pos += 1;
        let rhs = eval_binary(tokens, pos, bp + 1)?;
        lhs = match op {
            ExprToken::BitOr => lhs | rhs,
            ExprToken::BitAnd => lhs & rhs,
            ExprToken::Shl => lhs.checked_shl(u32::try_from(rhs).ok()?)?,
            ExprToken::Shr => lhs.checked_shr(u32::try_from(rhs).ok()?)?,
            ExprToken::Add => lhs.checked_add(rhs)?,
            ExprToken::Sub => lhs.checked_sub(rhs)?,
            ExprToken::Mul => lhs.checked_mul(rhs)?,
            ExprToken::Div => lhs.checked_div(rhs)?,
            ExprToken::Rem => lhs.checked_rem(rhs)?,
            _ => return None,
        };
    }

    Some(lhs)
}

fn eval_primary(tokens: &[ExprToken], pos: &mut usize) -> Option<i64> {
    match tokens.get(*pos)? {
        ExprToken::Num(n) => {
            *pos += 1;
            Some(*n)
        }
        ExprToken::Sub => {
            *pos += 1;
            Some(eval_primary(tokens, pos)?.checked_neg()?)
        }
        ExprToken::LParen => {
            *pos += 1;
            let value = eval_binary(tokens, pos, 0)?;
            match tokens.get(*pos) {
                Some(ExprToken::RParen) => {
                    *pos += 1;
                    Some(value)
                }
                _ => None,
            }
        }
        _ => None,
    }
}
