//! Escaping and concatenation of TeX fragments.

use std::borrow::Cow;

use memchr::{memchr, memchr3};

/// Whether output is read by TeX in math mode or inside `\text{...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Math,
    Text,
}

/// State carried through a single conversion.
#[derive(Debug, Default)]
pub struct EmissionContext {
    /// Number of elements the walker is currently inside.
    pub depth: usize,
    pub mode: Mode,
    /// Set for the direct content of fences and scripts, where operators get no spacing.
    pub suppress_operator_spacing: bool,
    /// Whether the last token of the most recent [`join`] asked for a space after it.
    pub pending_space: bool,
}

/// A fragment of output together with the spacing it asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: Cow<'a, str>,
    pub space_before: bool,
    pub space_after: bool,
}

impl<'a> Token<'a> {
    pub fn plain(text: impl Into<Cow<'a, str>>) -> Self {
        Token {
            text: text.into(),
            space_before: false,
            space_after: false,
        }
    }

    pub fn spaced(text: impl Into<Cow<'a, str>>, before: bool, after: bool) -> Self {
        Token {
            text: text.into(),
            space_before: before,
            space_after: after,
        }
    }
}

#[inline]
fn has_special(bytes: &[u8]) -> bool {
    memchr3(b'\\', b'{', b'}', bytes).is_some()
        || memchr3(b'$', b'&', b'#', bytes).is_some()
        || memchr3(b'^', b'_', b'%', bytes).is_some()
        || memchr(b'~', bytes).is_some()
}

/// Characters that form a control symbol when following a backslash.
#[inline]
fn is_control_symbol(c: char) -> bool {
    matches!(
        c,
        '\\' | '{' | '}' | '$' | '&' | '#' | '^' | '_' | '%' | '~' | ',' | ';' | ':' | '!' | ' '
            | '|'
    )
}

/// Escape TeX special characters.
///
/// Existing control sequences are left alone, which makes the function idempotent:
/// `escape(escape(s)) == escape(s)`. A control word keeps a directly following `{}` terminator.
pub fn escape(text: &str, mode: Mode) -> Cow<'_, str> {
    if !has_special(text.as_bytes()) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        match c {
            '\\' => match chars.peek().copied() {
                Some((_, next)) if next.is_ascii_alphabetic() => {
                    out.push('\\');
                    let mut end = text.len();
                    while let Some(&(i, letter)) = chars.peek() {
                        if !letter.is_ascii_alphabetic() {
                            end = i;
                            break;
                        }
                        out.push(letter);
                        chars.next();
                    }
                    if text[end..].starts_with("{}") {
                        out.push_str("{}");
                        chars.next();
                        chars.next();
                    }
                }
                Some((_, next)) if is_control_symbol(next) => {
                    out.push('\\');
                    out.push(next);
                    chars.next();
                }
                _ => out.push_str(match mode {
                    Mode::Math => r"\backslash{}",
                    Mode::Text => r"\textbackslash{}",
                }),
            },
            '{' | '}' | '$' | '&' | '#' | '_' | '%' => {
                out.push('\\');
                out.push(c);
            }
            '^' => out.push_str(match mode {
                Mode::Math => r"\hat{}",
                Mode::Text => r"\textasciicircum{}",
            }),
            '~' => out.push_str(match mode {
                Mode::Math => r"\sim{}",
                Mode::Text => r"\textasciitilde{}",
            }),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Whether `tex` ends in a control word such as `\alpha`, so that a following letter would be
/// read as part of the command name.
pub fn ends_with_control_word(tex: &str) -> bool {
    let trimmed = tex.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    if trimmed.len() == tex.len() {
        return false;
    }
    let backslashes = trimmed.bytes().rev().take_while(|&b| b == b'\\').count();
    backslashes % 2 == 1
}

/// Concatenate tokens.
///
/// A single space separates two tokens if either side asks for it, or if the left one ends in a
/// control word and the right one starts with a letter. Empty tokens are dropped along with
/// their spacing.
pub fn join(tokens: &[Token<'_>], ctx: &mut EmissionContext) -> String {
    let mut out = String::with_capacity(tokens.iter().map(|t| t.text.len() + 1).sum());
    let mut wants_space = false;
    for token in tokens.iter().filter(|t| !t.text.is_empty()) {
        if !out.is_empty() {
            let glued = ends_with_control_word(&out)
                && token.text.starts_with(|c: char| c.is_ascii_alphabetic());
            if (wants_space || token.space_before || glued) && !out.ends_with(' ') {
                out.push(' ');
            }
        }
        out.push_str(&token.text);
        wants_space = token.space_after;
    }
    ctx.pending_space = wants_space;
    out
}

/// Whether `tex` is read by TeX as a single unit when followed by `_` or `^`.
///
/// That holds for a single character, a braced group, and a control sequence with any number of
/// braced arguments (`\alpha`, `\frac{a}{b}`).
pub fn is_atom(tex: &str) -> bool {
    let mut chars = tex.chars();
    let rest = match chars.next() {
        None => return false,
        Some('\\') => {
            let after = chars.as_str();
            match after.chars().next() {
                Some(c) if c.is_ascii_alphabetic() => {
                    after.trim_start_matches(|c: char| c.is_ascii_alphabetic())
                }
                Some(c) => &after[c.len_utf8()..],
                None => return false,
            }
        }
        Some('{') => tex,
        Some(_) => return chars.as_str().is_empty(),
    };
    let mut rest = rest;
    while !rest.is_empty() {
        match skip_group(rest) {
            Some(after) => rest = after,
            None => return false,
        }
    }
    true
}

/// Skip one balanced `{...}` group at the start of `tex`, honoring escaped braces.
fn skip_group(tex: &str) -> Option<&str> {
    if !tex.starts_with('{') {
        return None;
    }
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, c) in tex.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&tex[i + 1..]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_specials() {
        assert_eq!(escape("a_b", Mode::Math), r"a\_b");
        assert_eq!(escape("50%", Mode::Text), r"50\%");
        assert_eq!(escape("{x}", Mode::Math), r"\{x\}");
        assert_eq!(escape("\\", Mode::Math), r"\backslash{}");
        assert_eq!(escape("\\", Mode::Text), r"\textbackslash{}");
        assert_eq!(escape("^~", Mode::Math), r"\hat{}\sim{}");
        assert_eq!(
            escape("^~", Mode::Text),
            r"\textasciicircum{}\textasciitilde{}"
        );
        assert!(matches!(escape("plain text", Mode::Text), Cow::Borrowed(_)));
    }

    #[test]
    fn escape_keeps_control_sequences() {
        assert_eq!(escape(r"\alpha+\beta", Mode::Math), r"\alpha+\beta");
        assert_eq!(escape(r"\ldots{}x", Mode::Text), r"\ldots{}x");
        assert_eq!(escape(r"a\,b\{", Mode::Math), r"a\,b\{");
        assert_eq!(escape(r"\é", Mode::Math), r"\backslash{}é");
    }

    #[test]
    fn escape_is_idempotent() {
        let inputs = [
            "a_b^c",
            "\\",
            "\\\\",
            r"\alpha{}{",
            "#$%&~",
            "x\\{}",
            r"\a{}}",
            "50% of {all}",
            r"back\slash\",
            "ünïcode_ß",
        ];
        for mode in [Mode::Math, Mode::Text] {
            for input in inputs {
                let once = escape(input, mode).into_owned();
                let twice = escape(&once, mode).into_owned();
                assert_eq!(once, twice, "input {input:?} in {mode:?}");
            }
        }
    }

    #[test]
    fn control_word_detection() {
        assert!(ends_with_control_word(r"\alpha"));
        assert!(ends_with_control_word(r"x\sin"));
        assert!(!ends_with_control_word(r"\\abc"));
        assert!(!ends_with_control_word(r"\alpha{}"));
        assert!(!ends_with_control_word("abc"));
        assert!(!ends_with_control_word(r"\,"));
    }

    #[test]
    fn join_spacing() {
        let mut ctx = EmissionContext::default();
        let tokens = [
            Token::plain("a"),
            Token::spaced("+", true, true),
            Token::plain("b"),
        ];
        assert_eq!(join(&tokens, &mut ctx), "a + b");
        assert!(!ctx.pending_space);

        let tokens = [Token::plain(r"\alpha"), Token::plain("x"), Token::plain("2")];
        assert_eq!(join(&tokens, &mut ctx), r"\alpha x2");

        let tokens = [
            Token::spaced("-", false, false),
            Token::spaced("", true, true),
            Token::plain("x"),
            Token::spaced("=", true, true),
        ];
        assert_eq!(join(&tokens, &mut ctx), "-x =");
        assert!(ctx.pending_space);
    }

    #[test]
    fn atoms() {
        assert!(is_atom("x"));
        assert!(is_atom("α"));
        assert!(is_atom(r"\alpha"));
        assert!(is_atom(r"\frac{a}{b}"));
        assert!(is_atom(r"\mathrm{abc}"));
        assert!(is_atom(r"\{"));
        assert!(is_atom("{x_{1}}"));
        assert!(!is_atom("12"));
        assert!(!is_atom(r"x_{1}"));
        assert!(!is_atom(r"\alpha\beta"));
        assert!(!is_atom(r"\sqrt[3]{x}"));
        assert!(!is_atom(r"{a}{b"));
        assert!(!is_atom(""));
    }
}
