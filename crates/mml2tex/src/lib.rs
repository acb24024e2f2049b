//! Convert MathML to TeX.
//!
//! # Usage
//!
//! The main struct of this library is [`Converter`]. Create one from a [`ConverterConfig`] and
//! call [`Converter::render`] with a tree obtained from [`mml2tex_tree::read_mathml`]. The
//! converter holds an immutable [`SymbolTable`], so a single instance can serve any number of
//! threads.
//!
//! ```rust
//! use mml2tex::{Converter, ConverterConfig};
//! use mml2tex_tree::read_mathml;
//!
//! let mathml = r#"<math><mfenced><mfrac><mi>a</mi><mi>b</mi></mfrac></mfenced></math>"#;
//! let converter = Converter::new(ConverterConfig::default()).unwrap();
//! let tree = read_mathml(mathml).unwrap();
//! assert_eq!(converter.render(&tree).unwrap(), r"\left(\frac{a}{b}\right)");
//! ```
//!
//! # Features
//!
//! - `serde`: With this feature, `ConverterConfig` implements serde's `Deserialize`.
//! - `ariadne`: Adds [`ConversionError::to_report`] for pretty error output.
//!
mod emitter;
mod error;
mod rules;
mod symbol_table;
mod symbols;
mod table;
mod walker;

use log::debug;
#[cfg(feature = "serde")]
use serde::Deserialize;

use mml2tex_tree::MathNode;

pub use self::emitter::{EmissionContext, Mode, Token, escape, join};
pub use self::error::{Arity, ConversionError, ErrorKind, TableError};
pub use self::symbol_table::{
    Namespace, RenderRule, Resolved, SlotMismatch, SpaceKind, SymbolSpec, SymbolTable, Template,
};
pub use self::symbols::default_entries;
use self::walker::Walker;

/// Which table is consulted first when a token element's text is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum LookupOrder {
    /// The element's own namespace wins over the character namespace.
    #[default]
    ElementFirst,
    /// The character namespace wins over the element's own namespace.
    CodepointFirst,
}

/// Configuration object for the conversion.
///
/// # Example usage
///
/// ```rust
/// use mml2tex::{ConverterConfig, Namespace, SymbolSpec};
///
/// // Default values
/// let config = ConverterConfig::default();
///
/// // With an additional identifier
/// let config = ConverterConfig {
///     symbols: vec![SymbolSpec::literal(Namespace::Identifier, "erf", r"\operatorname{erf}")],
///     ..Default::default()
/// };
/// ```
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct ConverterConfig {
    pub lookup_order: LookupOrder,
    /// If `false`, the built-in symbol data is not loaded and only `symbols` is used.
    pub default_symbols: bool,
    /// Entries added to the table. An entry that repeats a built-in one is an error.
    pub symbols: Vec<SymbolSpec>,
    /// If `true`, a `<semantics>` element with a TeX annotation is rendered as that annotation.
    pub prefer_tex_annotation: bool,
    /// If `true`, an `<mo>` without a `form` attribute is treated as prefix when it comes first
    /// in its row and as postfix when it comes last.
    pub infer_operator_form: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig {
            lookup_order: LookupOrder::default(),
            default_symbols: true,
            symbols: Vec::new(),
            prefer_tex_annotation: false,
            infer_operator_form: false,
        }
    }
}

/// This struct contains those fields from `ConverterConfig` that are simple flags.
#[derive(Debug, Default)]
pub(crate) struct Flags {
    pub(crate) lookup_order: LookupOrder,
    pub(crate) prefer_tex_annotation: bool,
    pub(crate) infer_operator_form: bool,
}

impl From<&ConverterConfig> for Flags {
    fn from(config: &ConverterConfig) -> Self {
        Self {
            lookup_order: config.lookup_order,
            prefer_tex_annotation: config.prefer_tex_annotation,
            infer_operator_form: config.infer_operator_form,
        }
    }
}

/// A converter that transforms MathML trees into TeX math-mode source.
#[derive(Debug)]
pub struct Converter {
    table: SymbolTable,
    flags: Flags,
}

impl Converter {
    /// Create a new converter with the given configuration.
    ///
    /// This function returns an error if the configured symbols clash with each other or with
    /// the built-in data, or if a rule does not fit its namespace.
    pub fn new(config: ConverterConfig) -> Result<Self, TableError> {
        let flags = Flags::from(&config);
        let table = if config.default_symbols {
            SymbolTable::build(default_entries().chain(config.symbols))?
        } else {
            SymbolTable::build(config.symbols)?
        };
        debug!("symbol table built with {} entries", table.len());
        Ok(Self { table, flags })
    }

    /// Render a tree as TeX.
    ///
    /// The output is math-mode source without surrounding delimiters. Rendering is a pure
    /// function of the tree and the configuration.
    pub fn render(&self, root: &MathNode) -> Result<String, ConversionError> {
        Walker::new(&self.table, &self.flags).render(root)
    }

    #[inline]
    pub fn symbols(&self) -> &SymbolTable {
        &self.table
    }
}

static_assertions::assert_impl_all!(Converter: Send, Sync);

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use mml2tex_tree::{ElementKind, MathNode, read_mathml};

    use super::*;

    fn convert(mathml: &str) -> String {
        let converter = Converter::new(ConverterConfig::default()).unwrap();
        converter.render(&read_mathml(mathml).unwrap()).unwrap()
    }

    fn convert_err(mathml: &str) -> ErrorKind {
        let converter = Converter::new(ConverterConfig::default()).unwrap();
        converter
            .render(&read_mathml(mathml).unwrap())
            .unwrap_err()
            .1
    }

    #[test]
    fn leaves() {
        assert_eq!(convert("<mi>x</mi>"), "x");
        assert_eq!(convert("<mi>α</mi>"), r"\alpha");
        assert_eq!(convert("<mi>sin</mi>"), r"\sin");
        assert_eq!(convert("<mi>abc</mi>"), r"\mathrm{abc}");
        assert_eq!(convert("<mn>3.14</mn>"), "3.14");
        assert_eq!(convert("<mo>±</mo>"), r"\pm");
        assert_eq!(convert("<mo>%</mo>"), r"\%");
        assert_eq!(convert("<mo>arcfoo</mo>"), r"\operatorname{arcfoo}");
    }

    #[test]
    fn identifier_variants() {
        assert_eq!(convert(r#"<mi mathvariant="normal">x</mi>"#), r"\mathrm{x}");
        assert_eq!(convert(r#"<mi mathvariant="bold">AB</mi>"#), r"\mathbf{AB}");
        assert_eq!(
            convert(r#"<mi mathvariant="double-struck">R</mi>"#),
            r"\mathbb{R}"
        );
        assert_eq!(convert(r#"<mi mathvariant="italic">x</mi>"#), "x");
        assert_eq!(convert(r#"<mi mathvariant="normal">sin</mi>"#), r"\sin");
        assert_eq!(convert(r#"<mi mathvariant="wobbly">x</mi>"#), "x");
        assert_eq!(convert(r#"<mn mathvariant="bold">2</mn>"#), r"\mathbf{2}");
    }

    #[test]
    fn operator_spacing() {
        assert_eq!(
            convert("<mrow><mi>a</mi><mo>+</mo><mi>b</mi><mo>=</mo><mi>c</mi></mrow>"),
            "a + b = c"
        );
        assert_eq!(
            convert(r#"<mrow><mo form="prefix">−</mo><mi>x</mi></mrow>"#),
            "-x"
        );
        assert_eq!(
            convert(r#"<mrow><mi>n</mi><mo form="postfix">!</mo><mo>+</mo><mn>1</mn></mrow>"#),
            "n! + 1"
        );
        assert_eq!(
            convert(r#"<mrow><mi>a</mi><mo separator="true">,</mo><mi>b</mi></mrow>"#),
            "a, b"
        );
        assert_eq!(
            convert("<mrow><mi>f</mi><mo>&#x2061;</mo><mi>x</mi></mrow>"),
            "fx"
        );
    }

    #[test]
    fn spacing_across_nested_rows() {
        assert_eq!(
            convert("<mrow><mrow><mi>a</mi><mo>+</mo></mrow><mi>b</mi></mrow>"),
            "a + b"
        );
        assert_eq!(
            convert("<mrow><mi>a</mi><mrow><mo>+</mo><mi>b</mi></mrow></mrow>"),
            "a + b"
        );
        assert_eq!(
            convert("<mrow><mi>a</mi><mstyle><mo>=</mo><mi>b</mi></mstyle></mrow>"),
            "a = b"
        );
        assert_eq!(
            convert(
                "<mrow><mrow><mi>a</mi><mo>+</mo></mrow><mrow><mo>−</mo><mi>b</mi></mrow></mrow>"
            ),
            "a + - b"
        );
        assert_eq!(
            convert("<mfrac><mrow><mi>a</mi><mo>+</mo></mrow><mi>b</mi></mfrac>"),
            r"\frac{a +}{b}"
        );
    }

    #[test]
    fn inferred_operator_form() {
        let config = ConverterConfig {
            infer_operator_form: true,
            ..Default::default()
        };
        let converter = Converter::new(config).unwrap();
        let tree = read_mathml("<mrow><mo>−</mo><mi>x</mi><mo>+</mo><mi>y</mi></mrow>").unwrap();
        assert_eq!(converter.render(&tree).unwrap(), "-x + y");
    }

    #[test]
    fn control_words_are_separated_from_letters() {
        assert_eq!(convert("<mrow><mi>α</mi><mi>x</mi></mrow>"), r"\alpha x");
        assert_eq!(convert("<mi>αβ</mi>"), r"\mathrm{\alpha\beta}");
        assert_eq!(convert("<mrow><mo>∀</mo><mi>x</mi></mrow>"), r"\forall x");
    }

    #[test]
    fn fractions() {
        assert_eq!(
            convert("<mfrac><mi>a</mi><mi>b</mi></mfrac>"),
            r"\frac{a}{b}"
        );
        assert_eq!(
            convert(r#"<mfrac linethickness="0"><mi>n</mi><mi>k</mi></mfrac>"#),
            r"\genfrac{}{}{0pt}{}{n}{k}"
        );
        assert_eq!(
            convert(r#"<mfrac bevelled="true"><mn>1</mn><mn>2</mn></mfrac>"#),
            "{1}/{2}"
        );
        assert!(matches!(
            convert_err("<mfrac><mi>a</mi><mi>b</mi><mi>c</mi></mfrac>"),
            ErrorKind::ArityMismatch {
                expected: Arity::Exactly(2),
                got: 3,
                ..
            }
        ));
    }

    #[test]
    fn radicals() {
        assert_eq!(
            convert("<msqrt><mi>x</mi><mo>+</mo><mn>1</mn></msqrt>"),
            r"\sqrt{x + 1}"
        );
        assert_eq!(
            convert("<mroot><mi>x</mi><mn>3</mn></mroot>"),
            r"\sqrt[3]{x}"
        );
        assert!(matches!(
            convert_err("<mroot><mi>x</mi></mroot>"),
            ErrorKind::ArityMismatch { got: 1, .. }
        ));
    }

    #[test]
    fn scripts() {
        assert_eq!(convert("<msub><mi>x</mi><mn>1</mn></msub>"), "x_{1}");
        assert_eq!(
            convert("<msubsup><mi>x</mi><mi>i</mi><mn>2</mn></msubsup>"),
            "x_{i}^{2}"
        );
        assert_eq!(convert("<msup><mn>12</mn><mn>2</mn></msup>"), "{12}^{2}");
        assert_eq!(
            convert("<msup><msub><mi>x</mi><mn>1</mn></msub><mn>2</mn></msup>"),
            "{x_{1}}^{2}"
        );
        assert_eq!(
            convert("<msup><mrow><mi>a</mi><mo>+</mo><mi>b</mi></mrow><mn>2</mn></msup>"),
            "{a + b}^{2}"
        );
        assert_eq!(
            convert("<msup><mi>e</mi><mrow><mo>−</mo><mi>x</mi></mrow></msup>"),
            "e^{-x}"
        );
        assert_eq!(
            convert("<msub><mi>a</mi><mrow><mi>i</mi><mo>,</mo><mi>j</mi></mrow></msub>"),
            "a_{i,j}"
        );
    }

    #[test]
    fn under_over() {
        assert_eq!(convert("<mover><mi>x</mi><mo>^</mo></mover>"), r"\hat{x}");
        assert_eq!(convert("<mover><mi>v</mi><mo>→</mo></mover>"), r"\vec{v}");
        assert_eq!(
            convert("<munder><mi>x</mi><mo>_</mo></munder>"),
            r"\underline{x}"
        );
        assert_eq!(
            convert(
                "<munderover><mo>∑</mo><mrow><mi>i</mi><mo>=</mo><mn>1</mn></mrow><mi>n</mi></munderover>"
            ),
            r"\sum_{i=1}^{n}"
        );
        assert_eq!(
            convert("<munder><mi>lim</mi><mrow><mi>x</mi><mo>→</mo><mn>0</mn></mrow></munder>"),
            r"\lim_{x\rightarrow0}"
        );
        assert_eq!(
            convert("<mover><mi>x</mi><mi>y</mi></mover>"),
            r"\overset{y}{x}"
        );
        assert_eq!(
            convert(r#"<mover accent="false"><mi>x</mi><mo>^</mo></mover>"#),
            r"\overset{\hat{}}{x}"
        );
        assert_eq!(
            convert("<munderover><mi>x</mi><mi>a</mi><mi>b</mi></munderover>"),
            r"\overset{b}{\underset{a}{x}}"
        );
    }

    #[test]
    fn multiscripts() {
        assert_eq!(
            convert(
                "<mmultiscripts><mi>X</mi><mi>a</mi><mi>b</mi><mprescripts/><mi>c</mi><mi>d</mi></mmultiscripts>"
            ),
            "{}_{c}^{d}X_{a}^{b}"
        );
        assert_eq!(
            convert("<mmultiscripts><mi>R</mi><mi>i</mi><none/><none/><mi>j</mi></mmultiscripts>"),
            "R_{i}{}^{j}"
        );
        assert!(matches!(
            convert_err("<mmultiscripts><mi>X</mi><mi>a</mi></mmultiscripts>"),
            ErrorKind::ArityMismatch {
                expected: Arity::Paired,
                ..
            }
        ));
    }

    #[test]
    fn fences() {
        assert_eq!(
            convert("<mfenced><mfrac><mi>a</mi><mi>b</mi></mfrac></mfenced>"),
            r"\left(\frac{a}{b}\right)"
        );
        assert_eq!(
            convert(r#"<mfenced open="{" close=""><mi>x</mi><mi>y</mi></mfenced>"#),
            r"\left\{x,y\right."
        );
        assert_eq!(
            convert(r#"<mfenced open="⟨" close="⟩" separators=";,"><mi>a</mi><mi>b</mi><mi>c</mi></mfenced>"#),
            r"\left\langle a;b,c\right\rangle"
        );
        assert_eq!(
            convert(r#"<mfenced open="[" close="]"><mrow><mi>a</mi><mo>+</mo><mi>b</mi></mrow></mfenced>"#),
            r"\left[a+b\right]"
        );
        assert_eq!(
            convert(r#"<msup><mfenced><mi>x</mi></mfenced><mn>2</mn></msup>"#),
            r"\left(x\right)^{2}"
        );
    }

    #[test]
    fn tables() {
        assert_snapshot!(
            convert("<mtable><mtr><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd></mtr><mtr><mtd><mi>c</mi></mtd></mtr></mtable>"),
            @r"\begin{matrix}a & b \\ c & \end{matrix}"
        );
        assert_snapshot!(
            convert(r#"<mtable columnalign="left right"><mtr><mtd><mn>1</mn></mtd><mtd><mn>2</mn></mtd></mtr></mtable>"#),
            @r"\begin{array}{lr}1 & 2\end{array}"
        );
        assert_snapshot!(
            convert("<mtable><mlabeledtr><mtd><mtext>(1)</mtext></mtd><mtd><mi>x</mi></mtd></mlabeledtr></mtable>"),
            @r"\begin{matrix}x\end{matrix}"
        );
    }

    #[test]
    fn text() {
        assert_eq!(convert("<mtext>if  x</mtext>"), r"\text{if x}");
        assert_eq!(
            convert("<mtext>50% &amp; more</mtext>"),
            r"\text{50\% \& more}"
        );
        assert_eq!(convert("<mtext>a ≤ b</mtext>"), r"\text{a $\leq$ b}");
        assert_eq!(convert("<mtext>x—y</mtext>"), r"\text{x---y}");
        assert_eq!(convert("<mtext>—</mtext>"), r"\text{---}");
        assert_eq!(convert("<mtext>&lt;</mtext>"), r"\text{\textless{}}");
        assert_eq!(convert("<mtext>AT&amp;T;</mtext>"), r"\text{AT\&T;}");
        assert_eq!(convert("<mtext>&amp;alpha;</mtext>"), r"\text{\&alpha;}");
        assert_eq!(convert("<ms>abc</ms>"), r#"\text{"abc"}"#);
        assert_eq!(convert("<mtext></mtext>"), "");
    }

    #[test]
    fn spaces() {
        assert_eq!(convert(r#"<mspace width="thinmathspace"/>"#), r"\,");
        assert_eq!(convert(r#"<mspace width="0.167em"/>"#), r"\,");
        assert_eq!(convert(r#"<mspace width="1em"/>"#), r"\quad");
        assert_eq!(convert(r#"<mspace width="0.5em"/>"#), r"\hspace{0.5em}");
        assert_eq!(convert(r#"<mspace width="3pt"/>"#), r"\hspace{3pt}");
        assert_eq!(convert(r#"<mspace linebreak="newline"/>"#), r"\\");
        assert_eq!(convert("<mspace/>"), "");
    }

    #[test]
    fn wrappers() {
        assert_eq!(convert("<mphantom><mi>x</mi></mphantom>"), r"\phantom{x}");
        assert_eq!(
            convert(r#"<menclose notation="box"><mi>x</mi></menclose>"#),
            r"\boxed{x}"
        );
        assert_eq!(
            convert(r#"<menclose notation="updiagonalstrike box"><mi>x</mi></menclose>"#),
            r"\boxed{\cancel{x}}"
        );
        assert_eq!(
            convert(r#"<maction actiontype="toggle" selection="2"><mi>a</mi><mi>b</mi></maction>"#),
            "b"
        );
        assert_eq!(
            convert(r#"<mstyle displaystyle="true"><mi>x</mi></mstyle>"#),
            "x"
        );
        assert!(matches!(
            convert_err(r#"<maction selection="3"><mi>a</mi></maction>"#),
            ErrorKind::ArityMismatch {
                expected: Arity::AtLeast(3),
                ..
            }
        ));
    }

    #[test]
    fn semantics() {
        let mathml = r#"<semantics><mi>x</mi><annotation encoding="application/x-tex">\chi</annotation></semantics>"#;
        assert_eq!(convert(mathml), "x");
        let config = ConverterConfig {
            prefer_tex_annotation: true,
            ..Default::default()
        };
        let converter = Converter::new(config).unwrap();
        assert_eq!(
            converter.render(&read_mathml(mathml).unwrap()).unwrap(),
            r"\chi"
        );
    }

    #[test]
    fn unsupported_elements() {
        assert_eq!(
            convert_err("<math><mstack><mn>1</mn></mstack></math>"),
            ErrorKind::UnsupportedConstruct {
                element: "mstack".into()
            }
        );
        assert_eq!(
            convert_err("<math><mfoo/></math>"),
            ErrorKind::UnsupportedConstruct {
                element: "mfoo".into()
            }
        );
    }

    #[test]
    fn unresolved_entity() {
        let converter = Converter::new(ConverterConfig::default()).unwrap();
        let source = "<math><mi>x</mi><mi>&nosuch;</mi></math>";
        let err = converter.render(&read_mathml(source).unwrap()).unwrap_err();
        assert_eq!(
            err.1,
            ErrorKind::UnresolvedEntity {
                reference: "&nosuch;".into()
            }
        );
        assert_eq!(&source[err.span()], "<mi>&nosuch;</mi>");
    }

    fn nested_roots(depth: usize) -> String {
        let open = "<msqrt>".repeat(depth);
        let close = "</msqrt>".repeat(depth);
        format!("{open}<mi>x</mi>{close}")
    }

    #[test]
    fn depth_limit() {
        let mut tree = MathNode::leaf(ElementKind::Mi, "x");
        for _ in 0..1_000 {
            tree = MathNode::new(ElementKind::Mrow, vec![tree]);
        }
        let converter = Converter::new(ConverterConfig::default()).unwrap();
        let err = converter.render(&tree).unwrap_err();
        assert_eq!(err.1, ErrorKind::DepthLimitExceeded { limit: 128 });

        assert!(matches!(
            converter.render(&read_mathml(&nested_roots(999)).unwrap()),
            Err(ConversionError(_, ErrorKind::DepthLimitExceeded { .. }))
        ));

        assert_eq!(
            converter.render(&read_mathml(&nested_roots(100)).unwrap()).unwrap(),
            format!("{}x{}", r"\sqrt{".repeat(100), "}".repeat(100))
        );
    }

    #[test]
    fn lookup_order() {
        let symbols = || vec![SymbolSpec::literal(Namespace::Identifier, "α", r"\upalpha")];
        let element_first = Converter::new(ConverterConfig {
            symbols: symbols(),
            ..Default::default()
        })
        .unwrap();
        let codepoint_first = Converter::new(ConverterConfig {
            symbols: symbols(),
            lookup_order: LookupOrder::CodepointFirst,
            ..Default::default()
        })
        .unwrap();
        let tree = MathNode::leaf(ElementKind::Mi, "α");
        assert_eq!(element_first.render(&tree).unwrap(), r"\upalpha");
        assert_eq!(codepoint_first.render(&tree).unwrap(), r"\alpha");
    }

    #[test]
    fn custom_symbols() {
        let config = ConverterConfig {
            symbols: vec![
                SymbolSpec::literal(Namespace::Identifier, "erf", r"\operatorname{erf}"),
                SymbolSpec::template(Namespace::Accent, "⌢", r"\overparen{#1}"),
            ],
            ..Default::default()
        };
        let converter = Converter::new(config).unwrap();
        let tree = read_mathml("<mrow><mi>erf</mi><mover><mi>AB</mi><mo>⌢</mo></mover></mrow>")
            .unwrap();
        assert_eq!(
            converter.render(&tree).unwrap(),
            r"\operatorname{erf}\overparen{\mathrm{AB}}"
        );
    }

    #[test]
    fn custom_symbol_clash() {
        let config = ConverterConfig {
            symbols: vec![SymbolSpec::literal(Namespace::Char, "α", r"\upalpha")],
            ..Default::default()
        };
        assert!(matches!(
            Converter::new(config),
            Err(TableError::DuplicateEntry { .. })
        ));
    }

    #[test]
    fn without_default_symbols() {
        let config = ConverterConfig {
            default_symbols: false,
            ..Default::default()
        };
        let converter = Converter::new(config).unwrap();
        assert!(converter.symbols().is_empty());
        let tree = read_mathml("<mrow><mi>α</mi><mo>+</mo><mi>x_1</mi></mrow>").unwrap();
        assert_eq!(converter.render(&tree).unwrap(), r"α + \mathrm{x\_1}");
    }

    #[test]
    fn constructed_tree() {
        let tree = MathNode::new(
            ElementKind::Mfrac,
            vec![
                MathNode::leaf(ElementKind::Mi, "a"),
                MathNode::leaf(ElementKind::Mn, "2"),
            ],
        );
        let converter = Converter::new(ConverterConfig::default()).unwrap();
        assert_eq!(converter.render(&tree).unwrap(), r"\frac{a}{2}");
    }
}
