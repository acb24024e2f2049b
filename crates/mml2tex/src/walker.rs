use log::{trace, warn};
use mml2tex_tree::{ElementKind, MathNode, OperatorForm};

use crate::emitter::{EmissionContext, Mode, Token, escape, join};
use crate::error::{Arity, ConversionError, ErrorKind};
use crate::symbol_table::{Namespace, RenderRule, Resolved, SlotMismatch, SymbolTable, fill};
use crate::{Flags, LookupOrder};

pub(crate) type RenderResult<T> = Result<T, ConversionError>;

/// Maximum element nesting the walker descends into before giving up.
const MAX_DEPTH: usize = 128;

/// Rendered character data of a token element.
pub(crate) enum Glyphs {
    /// The whole text had a table entry.
    Mapped(String),
    /// Built character by character.
    Composed(String),
}

impl Glyphs {
    pub(crate) fn into_inner(self) -> String {
        match self {
            Glyphs::Mapped(tex) | Glyphs::Composed(tex) => tex,
        }
    }
}

/// Recursive descent over a tree, one instance per conversion.
pub(crate) struct Walker<'conv> {
    pub(crate) table: &'conv SymbolTable,
    pub(crate) flags: &'conv Flags,
    pub(crate) ctx: EmissionContext,
}

impl<'conv> Walker<'conv> {
    pub(crate) fn new(table: &'conv SymbolTable, flags: &'conv Flags) -> Self {
        Walker {
            table,
            flags,
            ctx: EmissionContext::default(),
        }
    }

    pub(crate) fn render(&mut self, node: &MathNode) -> RenderResult<String> {
        self.descend(node, |w| w.dispatch(node))
    }

    /// Enter `node`, failing instead of recursing past [`MAX_DEPTH`].
    fn descend<T>(
        &mut self,
        node: &MathNode,
        f: impl FnOnce(&mut Self) -> RenderResult<T>,
    ) -> RenderResult<T> {
        if self.ctx.depth >= MAX_DEPTH {
            return Err(ConversionError(
                node.span.clone(),
                ErrorKind::DepthLimitExceeded { limit: MAX_DEPTH },
            ));
        }
        trace!("render <{}> at depth {}", node.name, self.ctx.depth);
        self.ctx.depth += 1;
        let result = f(self);
        self.ctx.depth -= 1;
        result
    }

    fn dispatch(&mut self, node: &MathNode) -> RenderResult<String> {
        match node.kind {
            ElementKind::Math
            | ElementKind::Mrow
            | ElementKind::Mstyle
            | ElementKind::Mpadded
            | ElementKind::Merror => self.row(&node.children),
            ElementKind::Mi => self.identifier(node),
            ElementKind::Mn => self.number(node),
            ElementKind::Mo => Ok(self.operator(node, OperatorForm::Infix)?.text.into_owned()),
            ElementKind::Mtext => self.text(node),
            ElementKind::Ms => self.string_literal(node),
            ElementKind::Mspace => self.space(node),
            ElementKind::Mfrac => self.fraction(node),
            ElementKind::Msqrt => self.square_root(node),
            ElementKind::Mroot => self.root(node),
            ElementKind::Msub | ElementKind::Msup | ElementKind::Msubsup => self.scripts(node),
            ElementKind::Munder | ElementKind::Mover | ElementKind::Munderover => {
                self.under_over(node)
            }
            ElementKind::Mmultiscripts => self.multiscripts(node),
            ElementKind::Mfenced => self.fenced(node),
            ElementKind::Mtable => self.table(node),
            ElementKind::Mphantom => self.phantom(node),
            ElementKind::Menclose => self.enclose(node),
            ElementKind::Maction => self.action(node),
            ElementKind::Semantics => self.semantics(node),
            ElementKind::Annotation | ElementKind::AnnotationXml => Ok(String::new()),
            ElementKind::Mtr
            | ElementKind::Mlabeledtr
            | ElementKind::Mtd
            | ElementKind::Mprescripts
            | ElementKind::NoneScript
            | ElementKind::Mstack
            | ElementKind::Mlongdiv
            | ElementKind::Msgroup
            | ElementKind::Msrow
            | ElementKind::Mscarries
            | ElementKind::Mscarry
            | ElementKind::Msline
            | ElementKind::Mglyph
            | ElementKind::Unknown => Err(unsupported(node)),
        }
    }

    /// Render children in a new group. `suppress` controls operator spacing inside it.
    pub(crate) fn nested<T>(
        &mut self,
        suppress: bool,
        f: impl FnOnce(&mut Self) -> RenderResult<T>,
    ) -> RenderResult<T> {
        let saved = self.ctx.suppress_operator_spacing;
        self.ctx.suppress_operator_spacing = suppress;
        let result = f(self);
        self.ctx.suppress_operator_spacing = saved;
        result
    }

    /// Render a horizontal sequence. Operators get spacing according to their form.
    pub(crate) fn row(&mut self, children: &[MathNode]) -> RenderResult<String> {
        Ok(self.row_token(children)?.text.into_owned())
    }

    /// A row as a single token that keeps the spacing wanted at its two ends, so that an
    /// operator at the edge of an inner `<mrow>` is still spaced in the enclosing row.
    fn row_token(&mut self, children: &[MathNode]) -> RenderResult<Token<'static>> {
        let len = children.len();
        let mut tokens = Vec::with_capacity(len);
        for (index, child) in children.iter().enumerate() {
            let token = match child.kind {
                ElementKind::Mo => {
                    let form = self.operator_form(child, index, len);
                    self.operator(child, form)?
                }
                ElementKind::Mrow | ElementKind::Mstyle | ElementKind::Mpadded => {
                    self.descend(child, |w| w.row_token(&child.children))?
                }
                _ => Token::plain(self.render(child)?),
            };
            tokens.push(token);
        }
        let leading = tokens
            .iter()
            .find(|t| !t.text.is_empty())
            .is_some_and(|t| t.space_before);
        let text = join(&tokens, &mut self.ctx);
        Ok(Token::spaced(text, leading, self.ctx.pending_space))
    }

    fn operator_form(&self, node: &MathNode, index: usize, len: usize) -> OperatorForm {
        if let Some(form) = node.form() {
            return form;
        }
        if self.flags.infer_operator_form && len > 1 {
            if index == 0 {
                return OperatorForm::Prefix;
            }
            if index == len - 1 {
                return OperatorForm::Postfix;
            }
        }
        OperatorForm::Infix
    }

    /// Look up `identifier` in `namespace`, falling back to the character namespace in the
    /// configured order.
    pub(crate) fn resolve(&self, namespace: Namespace, identifier: &str) -> Resolved<'conv> {
        let (first, second) = match self.flags.lookup_order {
            LookupOrder::ElementFirst => (namespace, Namespace::Char),
            LookupOrder::CodepointFirst => (Namespace::Char, namespace),
        };
        match self.table.lookup(first, identifier) {
            Resolved::PassThrough if first != second => self.table.lookup(second, identifier),
            found => found,
        }
    }

    /// Character data of a token element, rejecting references the reader could not resolve.
    pub(crate) fn token_text<'n>(&self, node: &'n MathNode) -> RenderResult<&'n str> {
        match node.unresolved.first() {
            Some(reference) => Err(ConversionError(
                node.span.clone(),
                ErrorKind::UnresolvedEntity {
                    reference: reference.clone(),
                },
            )),
            None => Ok(node.text().unwrap_or("")),
        }
    }

    pub(crate) fn glyphs(&self, namespace: Namespace, node: &MathNode) -> RenderResult<Glyphs> {
        let text = self.token_text(node)?;
        if let Resolved::Rule(rule) = self.resolve(namespace, text) {
            let tex = rule.apply(&[]).map_err(|e| slot_error(node, e))?;
            return Ok(Glyphs::Mapped(tex.into_owned()));
        }
        Ok(Glyphs::Composed(self.compose(namespace, text, node)?))
    }

    /// Render text one code point at a time.
    fn compose(&self, namespace: Namespace, text: &str, node: &MathNode) -> RenderResult<String> {
        let mut buf = [0u8; 4];
        let mut tokens = Vec::with_capacity(text.len());
        for c in text.chars() {
            let c = c.encode_utf8(&mut buf);
            let tex = self
                .resolve(namespace, c)
                .render(c, Mode::Math)
                .map_err(|e| slot_error(node, e))?;
            tokens.push(Token::plain(tex.into_owned()));
        }
        Ok(join(&tokens, &mut EmissionContext::default()))
    }

    fn identifier(&mut self, node: &MathNode) -> RenderResult<String> {
        let glyphs = self.glyphs(Namespace::Identifier, node)?;
        let multi_letter = node.text().is_some_and(|t| t.chars().count() > 1);
        match node.attr("mathvariant").map(str::trim) {
            None => Ok(match glyphs {
                Glyphs::Composed(tex) if multi_letter => fill(r"\mathrm{#1}", &[&tex]),
                glyphs => glyphs.into_inner(),
            }),
            Some("italic") if !multi_letter => Ok(glyphs.into_inner()),
            Some("normal") if matches!(glyphs, Glyphs::Mapped(_)) => Ok(glyphs.into_inner()),
            Some(variant) => self.variant(variant, &glyphs.into_inner(), node),
        }
    }

    fn number(&mut self, node: &MathNode) -> RenderResult<String> {
        let tex = self.glyphs(Namespace::Number, node)?.into_inner();
        match node.attr("mathvariant").map(str::trim) {
            None | Some("normal") => Ok(tex),
            Some(variant) => self.variant(variant, &tex, node),
        }
    }

    fn variant(&self, variant: &str, tex: &str, node: &MathNode) -> RenderResult<String> {
        match self.table.lookup(Namespace::Variant, variant) {
            Resolved::Rule(rule) => {
                let tex = rule.apply(&[tex]).map_err(|e| slot_error(node, e))?;
                Ok(tex.into_owned())
            }
            Resolved::PassThrough => {
                warn!("ignoring unknown mathvariant \"{variant}\" on <{}>", node.name);
                Ok(tex.to_string())
            }
        }
    }

    /// An operator as a row token. Inside fences and scripts it gets no spacing.
    pub(crate) fn operator(
        &mut self,
        node: &MathNode,
        form: OperatorForm,
    ) -> RenderResult<Token<'static>> {
        let multi_letter = node
            .text()
            .is_some_and(|t| t.chars().count() > 1 && t.chars().all(char::is_alphabetic));
        let tex = match self.glyphs(Namespace::Operator, node)? {
            Glyphs::Composed(tex) if multi_letter => fill(r"\operatorname{#1}", &[&tex]),
            glyphs => glyphs.into_inner(),
        };
        let (before, after) = if self.ctx.suppress_operator_spacing || node.flag("fence") {
            (false, false)
        } else if node.flag("separator") {
            (false, true)
        } else {
            match form {
                OperatorForm::Infix => (true, true),
                OperatorForm::Prefix | OperatorForm::Postfix => (false, false),
            }
        };
        Ok(Token::spaced(tex, before, after))
    }

    /// `<mtext>` as `\text{...}`.
    fn text(&mut self, node: &MathNode) -> RenderResult<String> {
        let text = self.token_text(node)?;
        if text.is_empty() {
            return Ok(String::new());
        }
        let inner = match self.table.lookup(Namespace::Text, text) {
            Resolved::Rule(rule) => {
                let tex = rule.apply(&[]).map_err(|e| slot_error(node, e))?;
                tex.into_owned()
            }
            Resolved::PassThrough => self.text_content(text, node)?,
        };
        Ok(fill(r"\text{#1}", &[&inner]))
    }

    /// `<ms>` as a quoted string in `\text{...}`.
    fn string_literal(&mut self, node: &MathNode) -> RenderResult<String> {
        let text = self.token_text(node)?;
        let quoted = format!(
            "{}{}{}",
            node.attr("lquote").unwrap_or("\""),
            text,
            node.attr("rquote").unwrap_or("\"")
        );
        let inner = self.text_content(&quoted, node)?;
        Ok(fill(r"\text{#1}", &[&inner]))
    }

    /// Text-mode rendering. Characters only known as math symbols are switched into math mode.
    fn text_content(&mut self, text: &str, node: &MathNode) -> RenderResult<String> {
        let saved = std::mem::replace(&mut self.ctx.mode, Mode::Text);
        let result = self.text_tokens(text, node);
        self.ctx.mode = saved;
        result
    }

    fn text_tokens(&self, text: &str, node: &MathNode) -> RenderResult<String> {
        let mut buf = [0u8; 4];
        let mut tokens = Vec::with_capacity(text.len());
        for c in text.chars() {
            let c = c.encode_utf8(&mut buf);
            let tex = match self.table.get(Namespace::Text, c) {
                Some(rule) => rule.apply(&[]).map_err(|e| slot_error(node, e))?.into_owned(),
                None if !c.is_ascii() => match self.table.get(Namespace::Char, c) {
                    Some(RenderRule::Literal(tex)) if !tex.is_empty() => format!("${tex}$"),
                    _ => c.to_string(),
                },
                None => escape(c, self.ctx.mode).into_owned(),
            };
            tokens.push(Token::plain(tex));
        }
        Ok(join(&tokens, &mut EmissionContext::default()))
    }
}

pub(crate) fn expect_children<const N: usize>(node: &MathNode) -> RenderResult<&[MathNode; N]> {
    <&[MathNode; N]>::try_from(node.children.as_slice())
        .map_err(|_| arity_error(node, Arity::Exactly(N)))
}

pub(crate) fn unsupported(node: &MathNode) -> ConversionError {
    ConversionError(
        node.span.clone(),
        ErrorKind::UnsupportedConstruct {
            element: node.name.clone(),
        },
    )
}

pub(crate) fn arity_error(node: &MathNode, expected: Arity) -> ConversionError {
    ConversionError(
        node.span.clone(),
        ErrorKind::ArityMismatch {
            element: node.name.clone(),
            expected,
            got: node.children.len(),
        },
    )
}

pub(crate) fn slot_error(node: &MathNode, err: SlotMismatch) -> ConversionError {
    ConversionError(
        node.span.clone(),
        ErrorKind::ArityMismatch {
            element: node.name.clone(),
            expected: Arity::Exactly(err.expected),
            got: err.got,
        },
    )
}
