use std::borrow::Cow;

use rustc_hash::FxHashMap;
#[cfg(feature = "serde")]
use serde::Deserialize;
use strum::EnumCount;
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumString, IntoStaticStr};

use crate::emitter::{Mode, escape};
use crate::error::TableError;

/// The category a symbol entry belongs to.
///
/// The same identifier may map to different output depending on where it occurs: `¯` over a
/// base is `\bar`, under a base it is `\underline`, and as plain character data it is a macron.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumCountMacro,
)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[strum(serialize_all = "kebab-case")]
pub enum Namespace {
    /// Whole text of an `<mi>`, e.g. `sin`.
    Identifier,
    /// Whole text of an `<mn>`.
    Number,
    /// Whole text of an `<mo>`.
    Operator,
    /// Characters inside `<mtext>` and `<ms>`.
    Text,
    /// Single code points in math mode. Used as fallback for the element namespaces.
    Char,
    /// Fence characters following `\left` and `\right`.
    Delimiter,
    /// Operators that turn `<mover>` into an accent command, e.g. `^` → `\hat{#1}`.
    Accent,
    /// Operators that turn `<munder>` into an accent command, e.g. `_` → `\underline{#1}`.
    UnderAccent,
    /// Bases whose under/over scripts become limits, e.g. `∑` → `\sum`.
    Limits,
    /// Values of the `mathvariant` attribute.
    Variant,
    /// Values of the `notation` attribute of `<menclose>`.
    Enclose,
    /// Values of the `width` attribute of `<mspace>`.
    Space,
}

impl Namespace {
    /// The number of child renderings a rule in this namespace is applied to.
    pub const fn arity(self) -> usize {
        match self {
            Namespace::Accent | Namespace::UnderAccent | Namespace::Variant | Namespace::Enclose => 1,
            _ => 0,
        }
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// Horizontal spacing with a fixed TeX command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SpaceKind {
    Zero,
    /// 3/18 em.
    Thin,
    /// 4/18 em.
    Medium,
    /// 5/18 em.
    Thick,
    /// -3/18 em.
    NegativeThin,
    NonBreaking,
    /// 1 em.
    Quad,
    /// 2 em.
    Qquad,
}

impl SpaceKind {
    pub const fn tex(self) -> &'static str {
        match self {
            SpaceKind::Zero => "",
            SpaceKind::Thin => r"\,",
            SpaceKind::Medium => r"\:",
            SpaceKind::Thick => r"\;",
            SpaceKind::NegativeThin => r"\!",
            SpaceKind::NonBreaking => "~",
            SpaceKind::Quad => r"\quad",
            SpaceKind::Qquad => r"\qquad",
        }
    }

    /// The command for a width in em, if one is within rounding distance.
    pub fn from_em(width: f64) -> Option<SpaceKind> {
        const TOLERANCE: f64 = 0.02;
        [
            (0.0, SpaceKind::Zero),
            (3.0 / 18.0, SpaceKind::Thin),
            (4.0 / 18.0, SpaceKind::Medium),
            (5.0 / 18.0, SpaceKind::Thick),
            (-3.0 / 18.0, SpaceKind::NegativeThin),
            (1.0, SpaceKind::Quad),
            (2.0, SpaceKind::Qquad),
        ]
        .into_iter()
        .find(|(em, _)| (width - em).abs() < TOLERANCE)
        .map(|(_, kind)| kind)
    }
}

/// TeX source with numbered slots `#1` to `#9` for child renderings. `##` stands for a literal `#`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String"))]
pub struct Template {
    source: Box<str>,
    arity: usize,
}

impl Template {
    pub fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut arity = 0;
        let mut i = 0;
        while i + 1 < bytes.len() {
            if bytes[i] == b'#' {
                match bytes[i + 1] {
                    b'#' => {}
                    digit @ b'1'..=b'9' => arity = arity.max(usize::from(digit - b'0')),
                    _ => {}
                }
                i += 2;
            } else {
                i += 1;
            }
        }
        Template {
            source: source.into(),
            arity,
        }
    }

    /// The highest slot number used.
    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn apply(&self, args: &[&str]) -> Result<String, SlotMismatch> {
        if args.len() != self.arity {
            return Err(SlotMismatch {
                expected: self.arity,
                got: args.len(),
            });
        }
        Ok(fill(&self.source, args))
    }
}

impl From<String> for Template {
    fn from(source: String) -> Self {
        Template::new(&source)
    }
}

/// Substitute `#n` with `args[n - 1]`. Slots without a corresponding argument expand to nothing.
pub(crate) fn fill(template: &str, args: &[&str]) -> String {
    let extra: usize = args.iter().map(|a| a.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;
    while let Some(pos) = memchr::memchr(b'#', rest.as_bytes()) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        match after.as_bytes().first() {
            Some(b'#') => {
                out.push('#');
                rest = &after[1..];
            }
            Some(digit @ b'1'..=b'9') => {
                if let Some(arg) = args.get(usize::from(digit - b'1')) {
                    out.push_str(arg);
                }
                rest = &after[1..];
            }
            _ => {
                out.push('#');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// A rule was applied to the wrong number of child renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotMismatch {
    pub expected: usize,
    pub got: usize,
}

/// How a symbol is written in TeX.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RenderRule {
    /// Emitted as is.
    Literal(Box<str>),
    /// Filled with the renderings of the node's children.
    Template(Template),
    Spacing(SpaceKind),
}

impl RenderRule {
    pub fn arity(&self) -> usize {
        match self {
            RenderRule::Template(template) => template.arity(),
            RenderRule::Literal(_) | RenderRule::Spacing(_) => 0,
        }
    }

    pub fn apply<'rule>(&'rule self, args: &[&str]) -> Result<Cow<'rule, str>, SlotMismatch> {
        match self {
            RenderRule::Template(template) => template.apply(args).map(Cow::Owned),
            RenderRule::Literal(_) | RenderRule::Spacing(_) if !args.is_empty() => {
                Err(SlotMismatch {
                    expected: 0,
                    got: args.len(),
                })
            }
            RenderRule::Literal(text) => Ok(Cow::Borrowed(text)),
            RenderRule::Spacing(kind) => Ok(Cow::Borrowed(kind.tex())),
        }
    }
}

/// One entry of a symbol table, as given in configuration.
///
/// In a TOML config file an entry looks like
///
/// ```toml
/// [[symbols]]
/// namespace = "identifier"
/// identifier = "erf"
/// rule = { literal = '\operatorname{erf}' }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct SymbolSpec {
    pub namespace: Namespace,
    pub identifier: String,
    pub rule: RenderRule,
}

impl SymbolSpec {
    pub fn new(namespace: Namespace, identifier: &str, rule: RenderRule) -> Self {
        SymbolSpec {
            namespace,
            identifier: identifier.to_string(),
            rule,
        }
    }

    pub fn literal(namespace: Namespace, identifier: &str, tex: &str) -> Self {
        SymbolSpec::new(namespace, identifier, RenderRule::Literal(tex.into()))
    }

    pub fn template(namespace: Namespace, identifier: &str, tex: &str) -> Self {
        SymbolSpec::new(namespace, identifier, RenderRule::Template(Template::new(tex)))
    }
}

/// The result of a lookup that never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'table> {
    Rule(&'table RenderRule),
    /// No entry; the identifier is emitted escaped.
    PassThrough,
}

impl<'table> Resolved<'table> {
    #[inline]
    pub fn rule(self) -> Option<&'table RenderRule> {
        match self {
            Resolved::Rule(rule) => Some(rule),
            Resolved::PassThrough => None,
        }
    }

    /// Render the identifier without children.
    pub fn render<'a>(
        self,
        identifier: &'a str,
        mode: Mode,
    ) -> Result<Cow<'a, str>, SlotMismatch>
    where
        'table: 'a,
    {
        match self {
            Resolved::Rule(rule) => rule.apply(&[]),
            Resolved::PassThrough => Ok(escape(identifier, mode)),
        }
    }
}

/// Mapping from `(namespace, identifier)` to a [`RenderRule`].
///
/// Built once and never modified afterwards, so it can be shared freely between threads.
#[derive(Debug)]
pub struct SymbolTable {
    maps: [FxHashMap<Box<str>, RenderRule>; Namespace::COUNT],
}

impl SymbolTable {
    /// Build a table, rejecting duplicates and rules whose arity does not fit their namespace.
    pub fn build(entries: impl IntoIterator<Item = SymbolSpec>) -> Result<SymbolTable, TableError> {
        let mut maps: [FxHashMap<Box<str>, RenderRule>; Namespace::COUNT] =
            std::array::from_fn(|_| FxHashMap::default());
        for SymbolSpec {
            namespace,
            identifier,
            rule,
        } in entries
        {
            let expected = namespace.arity();
            let got = rule.arity();
            let shape_fits = match rule {
                RenderRule::Template(_) => got == expected,
                RenderRule::Literal(_) | RenderRule::Spacing(_) => expected == 0,
            };
            if !shape_fits {
                return Err(TableError::TemplateArity {
                    namespace,
                    identifier: identifier.into(),
                    expected,
                    got,
                });
            }
            let map = &mut maps[namespace.index()];
            if map.contains_key(identifier.as_str()) {
                return Err(TableError::DuplicateEntry {
                    namespace,
                    identifier: identifier.into(),
                });
            }
            map.insert(identifier.into(), rule);
        }
        Ok(SymbolTable { maps })
    }

    #[inline]
    pub fn get(&self, namespace: Namespace, identifier: &str) -> Option<&RenderRule> {
        self.maps[namespace.index()].get(identifier)
    }

    #[inline]
    pub fn lookup(&self, namespace: Namespace, identifier: &str) -> Resolved<'_> {
        match self.get(namespace, identifier) {
            Some(rule) => Resolved::Rule(rule),
            None => Resolved::PassThrough,
        }
    }

    pub fn len(&self) -> usize {
        self.maps.iter().map(FxHashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.iter().all(FxHashMap::is_empty)
    }
}
