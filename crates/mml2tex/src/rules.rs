//! Rendering of layout elements: fractions, radicals, scripts, fences and the like.

use log::warn;
use mml2tex_tree::{ElementKind, MathNode};

use crate::emitter::{Mode, Token, escape, is_atom, join};
use crate::error::Arity;
use crate::symbol_table::{Namespace, RenderRule, Resolved, SpaceKind, fill};
use crate::walker::{RenderResult, Walker, arity_error, expect_children, slot_error};

const FRAC: &str = r"\frac{#1}{#2}";
const FRAC_NO_RULE: &str = r"\genfrac{}{}{0pt}{}{#1}{#2}";
const FRAC_BEVELLED: &str = r"{#1}/{#2}";
const SQRT: &str = r"\sqrt{#1}";
const ROOT: &str = r"\sqrt[#1]{#2}";
const OVERSET: &str = r"\overset{#1}{#2}";
const UNDERSET: &str = r"\underset{#1}{#2}";
const PHANTOM: &str = r"\phantom{#1}";
const GROUP: &str = r"{#1}";

/// MIME types and names under which a TeX annotation may be given.
const TEX_ENCODINGS: [&str; 5] = [
    "tex",
    "latex",
    "application/x-tex",
    "application/x-latex",
    "text/x-latex",
];

impl<'conv> Walker<'conv> {
    pub(crate) fn fraction(&mut self, node: &MathNode) -> RenderResult<String> {
        let [num, den] = expect_children::<2>(node)?;
        let num = self.nested(false, |w| w.render(num))?;
        let den = self.nested(false, |w| w.render(den))?;
        let template = if node
            .attr("linethickness")
            .and_then(parse_length)
            .is_some_and(|(value, _)| value == 0.0)
        {
            FRAC_NO_RULE
        } else if node.flag("bevelled") {
            FRAC_BEVELLED
        } else {
            FRAC
        };
        Ok(fill(template, &[&num, &den]))
    }

    pub(crate) fn square_root(&mut self, node: &MathNode) -> RenderResult<String> {
        let radicand = self.nested(false, |w| w.row(&node.children))?;
        Ok(fill(SQRT, &[&radicand]))
    }

    pub(crate) fn root(&mut self, node: &MathNode) -> RenderResult<String> {
        let [radicand, index] = expect_children::<2>(node)?;
        let radicand = self.nested(false, |w| w.render(radicand))?;
        let index = self.nested(false, |w| w.render(index))?;
        Ok(fill(ROOT, &[&index, &radicand]))
    }

    pub(crate) fn scripts(&mut self, node: &MathNode) -> RenderResult<String> {
        let (base, sub, sup) = match node.kind {
            ElementKind::Msub => {
                let [base, sub] = expect_children::<2>(node)?;
                (base, Some(sub), None)
            }
            ElementKind::Msup => {
                let [base, sup] = expect_children::<2>(node)?;
                (base, None, Some(sup))
            }
            _ => {
                let [base, sub, sup] = expect_children::<3>(node)?;
                (base, Some(sub), Some(sup))
            }
        };
        let mut out = self.script_base(base)?;
        self.attach_scripts(&mut out, sub, sup)?;
        Ok(out)
    }

    /// Append `_{sub}^{sup}`. Scripts are always braced; `<none/>` is left out.
    fn attach_scripts(
        &mut self,
        out: &mut String,
        sub: Option<&MathNode>,
        sup: Option<&MathNode>,
    ) -> RenderResult<()> {
        for (marker, script) in [('_', sub), ('^', sup)] {
            let Some(script) = script.filter(|s| s.kind != ElementKind::NoneScript) else {
                continue;
            };
            let tex = self.nested(true, |w| w.render(script))?;
            out.push(marker);
            out.push('{');
            out.push_str(&tex);
            out.push('}');
        }
        Ok(())
    }

    /// Render a script base, adding braces if TeX would not read it as one unit.
    fn script_base(&mut self, base: &MathNode) -> RenderResult<String> {
        let tex = self.nested(false, |w| w.render(base))?;
        if base.kind == ElementKind::Mfenced || is_atom(&tex) {
            Ok(tex)
        } else {
            Ok(fill(GROUP, &[&tex]))
        }
    }

    pub(crate) fn under_over(&mut self, node: &MathNode) -> RenderResult<String> {
        let (base, under, over) = match node.kind {
            ElementKind::Munder => {
                let [base, under] = expect_children::<2>(node)?;
                (base, Some(under), None)
            }
            ElementKind::Mover => {
                let [base, over] = expect_children::<2>(node)?;
                (base, None, Some(over))
            }
            _ => {
                let [base, under, over] = expect_children::<3>(node)?;
                (base, Some(under), Some(over))
            }
        };

        if let Some(mut out) = self.limits_operator(base, node)? {
            if single_token(base).is_some_and(|op| op.attr("movablelimits") == Some("false")) {
                out.push_str(r"\limits");
            }
            self.attach_scripts(&mut out, under, over)?;
            return Ok(out);
        }

        let mut out = self.nested(false, |w| w.render(base))?;
        if let Some(under) = under {
            out = match self.accent(Namespace::UnderAccent, under, node.attr("accentunder")) {
                Some(rule) => rule.apply(&[&out]).map_err(|e| slot_error(node, e))?.into_owned(),
                None => {
                    let script = self.nested(true, |w| w.render(under))?;
                    fill(UNDERSET, &[&script, &out])
                }
            };
        }
        if let Some(over) = over {
            out = match self.accent(Namespace::Accent, over, node.attr("accent")) {
                Some(rule) => rule.apply(&[&out]).map_err(|e| slot_error(node, e))?.into_owned(),
                None => {
                    let script = self.nested(true, |w| w.render(over))?;
                    fill(OVERSET, &[&script, &out])
                }
            };
        }
        Ok(out)
    }

    /// The TeX operator for a base that takes limits, such as `∑` or `lim`.
    fn limits_operator(&self, base: &MathNode, node: &MathNode) -> RenderResult<Option<String>> {
        let Some(token) = single_token(base) else {
            return Ok(None);
        };
        let text = self.token_text(token)?;
        match self.table.lookup(Namespace::Limits, text) {
            Resolved::Rule(rule) => Ok(Some(
                rule.apply(&[]).map_err(|e| slot_error(node, e))?.into_owned(),
            )),
            Resolved::PassThrough => Ok(None),
        }
    }

    /// The accent rule for a script, unless the element explicitly says it is not an accent.
    fn accent(
        &self,
        namespace: Namespace,
        script: &MathNode,
        attr: Option<&str>,
    ) -> Option<&'conv RenderRule> {
        if attr.is_some_and(|a| a.trim() == "false") {
            return None;
        }
        let text = single_token(script)?.text()?;
        self.table.get(namespace, text.trim())
    }

    pub(crate) fn multiscripts(&mut self, node: &MathNode) -> RenderResult<String> {
        let Some((base, scripts)) = node.children.split_first() else {
            return Err(arity_error(node, Arity::Paired));
        };
        let (post, pre) = match scripts
            .iter()
            .position(|s| s.kind == ElementKind::Mprescripts)
        {
            Some(split) => (&scripts[..split], &scripts[split + 1..]),
            None => (scripts, &[][..]),
        };
        if post.len() % 2 != 0 || pre.len() % 2 != 0 {
            return Err(arity_error(node, Arity::Paired));
        }

        let mut out = String::new();
        if !pre.is_empty() {
            out.push_str("{}");
            self.script_pairs(&mut out, pre)?;
        }
        out.push_str(&self.script_base(base)?);
        self.script_pairs(&mut out, post)?;
        Ok(out)
    }

    fn script_pairs(&mut self, out: &mut String, scripts: &[MathNode]) -> RenderResult<()> {
        for (i, pair) in scripts.chunks_exact(2).enumerate() {
            if i > 0 {
                out.push_str("{}");
            }
            self.attach_scripts(out, Some(&pair[0]), Some(&pair[1]))?;
        }
        Ok(())
    }

    pub(crate) fn fenced(&mut self, node: &MathNode) -> RenderResult<String> {
        let open = self.delimiter(node.attr("open").unwrap_or("("));
        let close = self.delimiter(node.attr("close").unwrap_or(")"));
        let separators: Vec<char> = node
            .attr("separators")
            .unwrap_or(",")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let mut tokens = vec![Token::plain(r"\left"), Token::plain(open)];
        self.nested(true, |w| {
            for (i, child) in node.children.iter().enumerate() {
                if i > 0 && !separators.is_empty() {
                    let separator = separators[(i - 1).min(separators.len() - 1)];
                    let mut buf = [0u8; 4];
                    let separator = separator.encode_utf8(&mut buf);
                    let tex = w
                        .resolve(Namespace::Operator, separator)
                        .render(separator, Mode::Math)
                        .map_err(|e| slot_error(node, e))?;
                    tokens.push(Token::plain(tex.into_owned()));
                }
                tokens.push(Token::plain(w.render(child)?));
            }
            Ok(())
        })?;
        tokens.push(Token::plain(r"\right"));
        tokens.push(Token::plain(close));
        Ok(join(&tokens, &mut self.ctx))
    }

    /// A delimiter for `\left` or `\right`; an empty one becomes the null delimiter `.`.
    fn delimiter(&self, text: &str) -> String {
        let text = text.trim();
        if text.is_empty() {
            return ".".to_string();
        }
        match self.resolve(Namespace::Delimiter, text).rule() {
            Some(RenderRule::Literal(tex)) => tex.to_string(),
            _ => escape(text, Mode::Math).into_owned(),
        }
    }

    pub(crate) fn phantom(&mut self, node: &MathNode) -> RenderResult<String> {
        let content = self.nested(false, |w| w.row(&node.children))?;
        Ok(fill(PHANTOM, &[&content]))
    }

    pub(crate) fn enclose(&mut self, node: &MathNode) -> RenderResult<String> {
        let mut out = self.nested(false, |w| w.row(&node.children))?;
        for notation in node.attr("notation").unwrap_or("longdiv").split_whitespace() {
            match self.table.lookup(Namespace::Enclose, notation) {
                Resolved::Rule(rule) => {
                    out = rule.apply(&[&out]).map_err(|e| slot_error(node, e))?.into_owned();
                }
                Resolved::PassThrough => warn!("ignoring unknown menclose notation \"{notation}\""),
            }
        }
        Ok(out)
    }

    /// `<maction>` shows the child picked by `selection` (1-based, default 1).
    pub(crate) fn action(&mut self, node: &MathNode) -> RenderResult<String> {
        let selection = node
            .attr("selection")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);
        match node.children.get(selection - 1) {
            Some(child) => self.render(child),
            None => Err(arity_error(node, Arity::AtLeast(selection))),
        }
    }

    pub(crate) fn semantics(&mut self, node: &MathNode) -> RenderResult<String> {
        if self.flags.prefer_tex_annotation {
            let annotation = node.children.iter().find(|child| {
                child.kind == ElementKind::Annotation
                    && child.attr("encoding").is_some_and(|encoding| {
                        TEX_ENCODINGS
                            .iter()
                            .any(|known| encoding.trim().eq_ignore_ascii_case(known))
                    })
            });
            if let Some(annotation) = annotation {
                return Ok(self.token_text(annotation)?.to_string());
            }
        }
        match node.children.first() {
            Some(child) => self.render(child),
            None => Ok(String::new()),
        }
    }

    pub(crate) fn space(&mut self, node: &MathNode) -> RenderResult<String> {
        if node.attr("linebreak").is_some_and(|l| l.trim() == "newline") {
            return Ok(r"\\".to_string());
        }
        let Some(width) = node.attr("width").map(str::trim) else {
            return Ok(String::new());
        };
        if let Resolved::Rule(rule) = self.table.lookup(Namespace::Space, width) {
            return Ok(rule.apply(&[]).map_err(|e| slot_error(node, e))?.into_owned());
        }
        let Some((value, unit)) = parse_length(width) else {
            warn!("ignoring malformed mspace width \"{width}\"");
            return Ok(String::new());
        };
        Ok(match unit {
            "em" | "" => match SpaceKind::from_em(value) {
                Some(kind) => kind.tex().to_string(),
                None => format!(r"\hspace{{{value}em}}"),
            },
            "mu" => format!(r"\mspace{{{value}mu}}"),
            "ex" | "pt" | "mm" | "cm" | "in" | "pc" | "bp" => format!(r"\hspace{{{value}{unit}}}"),
            "px" => format!(r"\hspace{{{}pt}}", value * 0.75),
            _ => {
                warn!("ignoring mspace width with unknown unit \"{width}\"");
                String::new()
            }
        })
    }
}

/// The token element a node consists of, looking through single-child rows.
fn single_token(node: &MathNode) -> Option<&MathNode> {
    match node.kind {
        ElementKind::Mo | ElementKind::Mi => Some(node),
        ElementKind::Mrow | ElementKind::Mstyle => match node.children.as_slice() {
            [only] => single_token(only),
            _ => None,
        },
        _ => None,
    }
}

/// Split a length such as `0.5em` or `-2pt` into number and unit.
fn parse_length(length: &str) -> Option<(f64, &str)> {
    let length = length.trim();
    let split = length
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+')))
        .unwrap_or(length.len());
    let value = length[..split].parse::<f64>().ok()?;
    Some((value, length[split..].trim()))
}
