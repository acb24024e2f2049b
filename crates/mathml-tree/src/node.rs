use std::ops::Range;

#[cfg(feature = "serde")]
use serde::Serialize;
use strum_macros::{EnumString, IntoStaticStr};

/// The MathML element a [`MathNode`] was built from.
///
/// The set is closed: anything the reader does not recognize becomes [`ElementKind::Unknown`]
/// and the node keeps its tag name in [`MathNode::name`] for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[strum(serialize_all = "lowercase")]
pub enum ElementKind {
    Math,
    /// Identifier, e.g. `<mi>x</mi>`.
    Mi,
    /// Number, e.g. `<mn>3.14</mn>`.
    Mn,
    /// Operator, fence or separator, e.g. `<mo>+</mo>`.
    Mo,
    Mtext,
    /// String literal, rendered with quotes.
    Ms,
    Mspace,
    Mrow,
    Mfrac,
    Msqrt,
    Mroot,
    Msub,
    Msup,
    Msubsup,
    Munder,
    Mover,
    Munderover,
    Mmultiscripts,
    Mprescripts,
    /// `<none/>`, an empty script position inside `mmultiscripts`.
    #[strum(serialize = "none")]
    NoneScript,
    Mfenced,
    Mtable,
    Mtr,
    Mlabeledtr,
    Mtd,
    Mstyle,
    Mpadded,
    Mphantom,
    Menclose,
    Merror,
    Maction,
    Semantics,
    Annotation,
    #[strum(serialize = "annotation-xml")]
    AnnotationXml,
    // Elementary math and glyphs. They are recognized so that they can be reported by name,
    // but the engine has no rendering for them.
    Mstack,
    Mlongdiv,
    Msgroup,
    Msrow,
    Mscarries,
    Mscarry,
    Msline,
    Mglyph,
    Unknown,
}

impl ElementKind {
    /// Look up an element by its local name. Never fails; unrecognized names map to `Unknown`.
    #[inline]
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or(ElementKind::Unknown)
    }

    #[inline]
    pub fn tag(self) -> &'static str {
        self.into()
    }

    /// Token elements carry character data rather than child elements.
    pub const fn is_token(self) -> bool {
        matches!(
            self,
            ElementKind::Mi
                | ElementKind::Mn
                | ElementKind::Mo
                | ElementKind::Mtext
                | ElementKind::Ms
                | ElementKind::Annotation
        )
    }
}

/// The `form` attribute of an `<mo>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[strum(serialize_all = "lowercase")]
pub enum OperatorForm {
    Prefix,
    Infix,
    Postfix,
}

/// A node of the input tree.
///
/// Children are owned by their parent, so the tree is acyclic by construction. Token elements
/// (see [`ElementKind::is_token`]) keep their character data in `text`, with all entity
/// references already resolved.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MathNode {
    pub kind: ElementKind,
    /// Local name of the element as written in the source.
    pub name: Box<str>,
    pub children: Vec<MathNode>,
    pub text: Option<Box<str>>,
    pub attrs: Vec<(Box<str>, Box<str>)>,
    /// Entity references in the character data that the catalog could not resolve, as written
    /// (e.g. `&foo;`). They are kept verbatim in `text` as well.
    pub unresolved: Vec<Box<str>>,
    /// Byte range of the element in the source document; `0..0` for constructed nodes.
    pub span: Range<usize>,
}

impl MathNode {
    pub fn new(kind: ElementKind, children: Vec<MathNode>) -> Self {
        MathNode {
            kind,
            name: kind.tag().into(),
            children,
            text: None,
            attrs: Vec::new(),
            unresolved: Vec::new(),
            span: 0..0,
        }
    }

    pub fn leaf(kind: ElementKind, text: &str) -> Self {
        MathNode {
            text: Some(text.into()),
            ..MathNode::new(kind, Vec::new())
        }
    }

    /// A node for an element outside the known vocabulary.
    pub fn unknown(name: &str, children: Vec<MathNode>) -> Self {
        MathNode {
            name: name.into(),
            ..MathNode::new(ElementKind::Unknown, children)
        }
    }

    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = span;
        self
    }

    /// Set an attribute, replacing an earlier value with the same name.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k.as_ref() == name) {
            Some((_, v)) => *v = value.into(),
            None => self.attrs.push((name.into(), value.into())),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_ref())
    }

    /// Whether a boolean attribute is set to `true`.
    pub fn flag(&self, name: &str) -> bool {
        self.attr(name).is_some_and(|v| v.trim() == "true")
    }

    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The explicit `form` of an operator, if present and well-formed.
    pub fn form(&self) -> Option<OperatorForm> {
        self.attr("form").and_then(|f| f.trim().parse().ok())
    }
}
