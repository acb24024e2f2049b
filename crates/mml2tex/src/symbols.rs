//! The built-in symbol data.

use phf::phf_map;

use crate::symbol_table::{Namespace, RenderRule, SpaceKind, SymbolSpec};

/// Single code points in math mode.
static CHARS: phf::Map<&'static str, &'static str> = phf_map! {
    // Greek
    "α" => r"\alpha",
    "β" => r"\beta",
    "γ" => r"\gamma",
    "δ" => r"\delta",
    "ε" => r"\varepsilon",
    "ϵ" => r"\epsilon",
    "ζ" => r"\zeta",
    "η" => r"\eta",
    "θ" => r"\theta",
    "ϑ" => r"\vartheta",
    "ι" => r"\iota",
    "κ" => r"\kappa",
    "ϰ" => r"\varkappa",
    "λ" => r"\lambda",
    "μ" => r"\mu",
    "ν" => r"\nu",
    "ξ" => r"\xi",
    "ο" => "o",
    "π" => r"\pi",
    "ϖ" => r"\varpi",
    "ρ" => r"\rho",
    "ϱ" => r"\varrho",
    "σ" => r"\sigma",
    "ς" => r"\varsigma",
    "τ" => r"\tau",
    "υ" => r"\upsilon",
    "φ" => r"\varphi",
    "ϕ" => r"\phi",
    "χ" => r"\chi",
    "ψ" => r"\psi",
    "ω" => r"\omega",
    "ϝ" => r"\digamma",
    "Α" => "A",
    "Β" => "B",
    "Γ" => r"\Gamma",
    "Δ" => r"\Delta",
    "Ε" => "E",
    "Ζ" => "Z",
    "Η" => "H",
    "Θ" => r"\Theta",
    "Ι" => "I",
    "Κ" => "K",
    "Λ" => r"\Lambda",
    "Μ" => "M",
    "Ν" => "N",
    "Ξ" => r"\Xi",
    "Ο" => "O",
    "Π" => r"\Pi",
    "Ρ" => "P",
    "Σ" => r"\Sigma",
    "Τ" => "T",
    "Υ" => r"\Upsilon",
    "ϒ" => r"\Upsilon",
    "Φ" => r"\Phi",
    "Χ" => "X",
    "Ψ" => r"\Psi",
    "Ω" => r"\Omega",
    // Letter-like
    "ℏ" => r"\hbar",
    "ℓ" => r"\ell",
    "℘" => r"\wp",
    "ℑ" => r"\Im",
    "ℜ" => r"\Re",
    "ℵ" => r"\aleph",
    "ℶ" => r"\beth",
    "ℷ" => r"\gimel",
    "ℸ" => r"\daleth",
    "ı" => r"\imath",
    "ȷ" => r"\jmath",
    "ð" => r"\eth",
    "℧" => r"\mho",
    "ℕ" => r"\mathbb{N}",
    "ℤ" => r"\mathbb{Z}",
    "ℚ" => r"\mathbb{Q}",
    "ℝ" => r"\mathbb{R}",
    "ℂ" => r"\mathbb{C}",
    "ℙ" => r"\mathbb{P}",
    "ⅆ" => r"\mathrm{d}",
    "ⅇ" => r"\mathrm{e}",
    "ⅈ" => r"\mathrm{i}",
    "ⅉ" => r"\mathrm{j}",
    // Binary operators
    "−" => "-",
    "±" => r"\pm",
    "∓" => r"\mp",
    "×" => r"\times",
    "÷" => r"\div",
    "·" => r"\cdot",
    "⋅" => r"\cdot",
    "∗" => r"\ast",
    "⋆" => r"\star",
    "∘" => r"\circ",
    "∙" => r"\bullet",
    "•" => r"\bullet",
    "⊕" => r"\oplus",
    "⊖" => r"\ominus",
    "⊗" => r"\otimes",
    "⊘" => r"\oslash",
    "⊙" => r"\odot",
    "∩" => r"\cap",
    "∪" => r"\cup",
    "⊎" => r"\uplus",
    "⊓" => r"\sqcap",
    "⊔" => r"\sqcup",
    "∖" => r"\setminus",
    "∧" => r"\wedge",
    "∨" => r"\vee",
    "†" => r"\dagger",
    "‡" => r"\ddagger",
    "≀" => r"\wr",
    "⨿" => r"\amalg",
    "⋄" => r"\diamond",
    "△" => r"\bigtriangleup",
    "▽" => r"\bigtriangledown",
    "◁" => r"\triangleleft",
    "▷" => r"\triangleright",
    // Relations
    "≠" => r"\neq",
    "≤" => r"\leq",
    "≥" => r"\geq",
    "⩽" => r"\leqslant",
    "⩾" => r"\geqslant",
    "≦" => r"\leqq",
    "≧" => r"\geqq",
    "≪" => r"\ll",
    "≫" => r"\gg",
    "≡" => r"\equiv",
    "≢" => r"\not\equiv",
    "≅" => r"\cong",
    "≈" => r"\approx",
    "∼" => r"\sim",
    "≃" => r"\simeq",
    "≍" => r"\asymp",
    "≐" => r"\doteq",
    "∝" => r"\propto",
    "∈" => r"\in",
    "∉" => r"\notin",
    "∋" => r"\ni",
    "⊂" => r"\subset",
    "⊃" => r"\supset",
    "⊆" => r"\subseteq",
    "⊇" => r"\supseteq",
    "⊄" => r"\not\subset",
    "⊊" => r"\subsetneq",
    "⊋" => r"\supsetneq",
    "⊏" => r"\sqsubset",
    "⊐" => r"\sqsupset",
    "⊑" => r"\sqsubseteq",
    "⊒" => r"\sqsupseteq",
    "⊥" => r"\perp",
    "∥" => r"\parallel",
    "∦" => r"\nparallel",
    "∣" => r"\mid",
    "∤" => r"\nmid",
    "⊢" => r"\vdash",
    "⊣" => r"\dashv",
    "⊨" => r"\models",
    "≺" => r"\prec",
    "≻" => r"\succ",
    "⪯" => r"\preceq",
    "⪰" => r"\succeq",
    "⋈" => r"\bowtie",
    "≮" => r"\nless",
    "≯" => r"\ngtr",
    "≰" => r"\nleq",
    "≱" => r"\ngeq",
    // Arrows
    "←" => r"\leftarrow",
    "→" => r"\rightarrow",
    "↑" => r"\uparrow",
    "↓" => r"\downarrow",
    "↔" => r"\leftrightarrow",
    "↕" => r"\updownarrow",
    "⇐" => r"\Leftarrow",
    "⇒" => r"\Rightarrow",
    "⇑" => r"\Uparrow",
    "⇓" => r"\Downarrow",
    "⇔" => r"\Leftrightarrow",
    "⇕" => r"\Updownarrow",
    "↦" => r"\mapsto",
    "⟼" => r"\longmapsto",
    "⟵" => r"\longleftarrow",
    "⟶" => r"\longrightarrow",
    "⟷" => r"\longleftrightarrow",
    "⟸" => r"\Longleftarrow",
    "⟹" => r"\Longrightarrow",
    "⟺" => r"\Longleftrightarrow",
    "↗" => r"\nearrow",
    "↘" => r"\searrow",
    "↙" => r"\swarrow",
    "↖" => r"\nwarrow",
    "↪" => r"\hookrightarrow",
    "↩" => r"\hookleftarrow",
    "⇌" => r"\rightleftharpoons",
    "⇋" => r"\leftrightharpoons",
    "↼" => r"\leftharpoonup",
    "⇀" => r"\rightharpoonup",
    "↽" => r"\leftharpoondown",
    "⇁" => r"\rightharpoondown",
    // Large operators
    "∑" => r"\sum",
    "∏" => r"\prod",
    "∐" => r"\coprod",
    "∫" => r"\int",
    "∬" => r"\iint",
    "∭" => r"\iiint",
    "∮" => r"\oint",
    "⋃" => r"\bigcup",
    "⋂" => r"\bigcap",
    "⋁" => r"\bigvee",
    "⋀" => r"\bigwedge",
    "⨁" => r"\bigoplus",
    "⨂" => r"\bigotimes",
    "⨀" => r"\bigodot",
    "⨄" => r"\biguplus",
    // Delimiters
    "⟨" => r"\langle",
    "⟩" => r"\rangle",
    "〈" => r"\langle",
    "〉" => r"\rangle",
    "⌈" => r"\lceil",
    "⌉" => r"\rceil",
    "⌊" => r"\lfloor",
    "⌋" => r"\rfloor",
    "‖" => r"\|",
    // Miscellaneous
    "∞" => r"\infty",
    "∂" => r"\partial",
    "∇" => r"\nabla",
    "∀" => r"\forall",
    "∃" => r"\exists",
    "∄" => r"\nexists",
    "∅" => r"\emptyset",
    "∠" => r"\angle",
    "∡" => r"\measuredangle",
    "∴" => r"\therefore",
    "∵" => r"\because",
    "¬" => r"\neg",
    "√" => r"\surd",
    "…" => r"\ldots",
    "⋯" => r"\cdots",
    "⋮" => r"\vdots",
    "⋱" => r"\ddots",
    "′" => "'",
    "″" => "''",
    "‴" => "'''",
    "°" => r"^{\circ}",
    "□" => r"\square",
    "◇" => r"\Diamond",
    "♠" => r"\spadesuit",
    "♡" => r"\heartsuit",
    "♢" => r"\diamondsuit",
    "♣" => r"\clubsuit",
    "♯" => r"\sharp",
    "♭" => r"\flat",
    "♮" => r"\natural",
    "⊤" => r"\top",
    "★" => r"\bigstar",
    "✓" => r"\checkmark",
    "∎" => r"\blacksquare",
    // Invisible operators: function application, times, separator, plus.
    "\u{2061}" => "",
    "\u{2062}" => "",
    "\u{2063}" => "",
    "\u{2064}" => "",
};

/// Code points that stand for horizontal space.
static CHAR_SPACES: phf::Map<&'static str, SpaceKind> = phf_map! {
    "\u{00A0}" => SpaceKind::NonBreaking,
    "\u{2009}" => SpaceKind::Thin,
    "\u{205F}" => SpaceKind::Medium,
    "\u{2003}" => SpaceKind::Quad,
    "\u{200A}" => SpaceKind::Thin,
    "\u{200B}" => SpaceKind::Zero,
};

/// Names typeset upright with operator spacing, shared by `<mi>` and `<mo>`.
static FUNCTIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "sin" => r"\sin",
    "cos" => r"\cos",
    "tan" => r"\tan",
    "cot" => r"\cot",
    "sec" => r"\sec",
    "csc" => r"\csc",
    "arcsin" => r"\arcsin",
    "arccos" => r"\arccos",
    "arctan" => r"\arctan",
    "sinh" => r"\sinh",
    "cosh" => r"\cosh",
    "tanh" => r"\tanh",
    "coth" => r"\coth",
    "exp" => r"\exp",
    "log" => r"\log",
    "ln" => r"\ln",
    "lg" => r"\lg",
    "lim" => r"\lim",
    "liminf" => r"\liminf",
    "limsup" => r"\limsup",
    "max" => r"\max",
    "min" => r"\min",
    "sup" => r"\sup",
    "inf" => r"\inf",
    "det" => r"\det",
    "dim" => r"\dim",
    "ker" => r"\ker",
    "arg" => r"\arg",
    "deg" => r"\deg",
    "gcd" => r"\gcd",
    "hom" => r"\hom",
    "Pr" => r"\Pr",
};

/// Whole `<mo>` text with a rendering different from its characters.
static OPERATORS: phf::Map<&'static str, &'static str> = phf_map! {
    "mod" => r"\bmod",
    "-" => "-",
    "''" => "''",
    ":=" => ":=",
    "&&" => r"\&\&",
    "||" => r"\|",
    "..." => r"\ldots",
};

/// Characters in text mode.
static TEXT: phf::Map<&'static str, &'static str> = phf_map! {
    "\u{00A0}" => "~",
    "–" => "--",
    "—" => "---",
    "‘" => "`",
    "’" => "'",
    "“" => "``",
    "”" => "''",
    "…" => r"\ldots{}",
    "\u{2009}" => r"\,",
    "§" => r"\S{}",
    "¶" => r"\P{}",
    "©" => r"\copyright{}",
    "°" => r"\textdegree{}",
    "€" => r"\texteuro{}",
    "£" => r"\pounds{}",
    "<" => r"\textless{}",
    ">" => r"\textgreater{}",
    "|" => r"\textbar{}",
};

static DELIMITERS: phf::Map<&'static str, &'static str> = phf_map! {
    "(" => "(",
    ")" => ")",
    "[" => "[",
    "]" => "]",
    "{" => r"\{",
    "}" => r"\}",
    "|" => "|",
    "/" => "/",
    "\\" => r"\backslash",
    "∣" => "|",
    "‖" => r"\|",
    "∥" => r"\|",
    "⟨" => r"\langle",
    "⟩" => r"\rangle",
    "〈" => r"\langle",
    "〉" => r"\rangle",
    "<" => r"\langle",
    ">" => r"\rangle",
    "⌈" => r"\lceil",
    "⌉" => r"\rceil",
    "⌊" => r"\lfloor",
    "⌋" => r"\rfloor",
    "↑" => r"\uparrow",
    "↓" => r"\downarrow",
    "↕" => r"\updownarrow",
    "⇑" => r"\Uparrow",
    "⇓" => r"\Downarrow",
};

static ACCENTS: phf::Map<&'static str, &'static str> = phf_map! {
    "^" => r"\hat{#1}",
    "ˆ" => r"\hat{#1}",
    "\u{0302}" => r"\hat{#1}",
    "~" => r"\tilde{#1}",
    "˜" => r"\tilde{#1}",
    "\u{0303}" => r"\tilde{#1}",
    "¯" => r"\bar{#1}",
    "\u{0304}" => r"\bar{#1}",
    "‾" => r"\overline{#1}",
    "\u{0305}" => r"\overline{#1}",
    "→" => r"\vec{#1}",
    "\u{20D7}" => r"\vec{#1}",
    "←" => r"\overleftarrow{#1}",
    "↔" => r"\overleftrightarrow{#1}",
    "˙" => r"\dot{#1}",
    "\u{0307}" => r"\dot{#1}",
    "¨" => r"\ddot{#1}",
    "\u{0308}" => r"\ddot{#1}",
    "\u{20DB}" => r"\dddot{#1}",
    "ˇ" => r"\check{#1}",
    "\u{030C}" => r"\check{#1}",
    "˘" => r"\breve{#1}",
    "\u{0306}" => r"\breve{#1}",
    "´" => r"\acute{#1}",
    "\u{0301}" => r"\acute{#1}",
    "`" => r"\grave{#1}",
    "\u{0300}" => r"\grave{#1}",
    "˚" => r"\mathring{#1}",
    "\u{030A}" => r"\mathring{#1}",
    "⏞" => r"\overbrace{#1}",
    "︷" => r"\overbrace{#1}",
};

static UNDER_ACCENTS: phf::Map<&'static str, &'static str> = phf_map! {
    "_" => r"\underline{#1}",
    "¯" => r"\underline{#1}",
    "‾" => r"\underline{#1}",
    "\u{0332}" => r"\underline{#1}",
    "⏟" => r"\underbrace{#1}",
    "︸" => r"\underbrace{#1}",
    "→" => r"\underrightarrow{#1}",
    "←" => r"\underleftarrow{#1}",
    "↔" => r"\underleftrightarrow{#1}",
};

static LIMITS: phf::Map<&'static str, &'static str> = phf_map! {
    "∑" => r"\sum",
    "∏" => r"\prod",
    "∐" => r"\coprod",
    "⋃" => r"\bigcup",
    "⋂" => r"\bigcap",
    "⋁" => r"\bigvee",
    "⋀" => r"\bigwedge",
    "⨁" => r"\bigoplus",
    "⨂" => r"\bigotimes",
    "⨀" => r"\bigodot",
    "⨄" => r"\biguplus",
    "∫" => r"\int",
    "∬" => r"\iint",
    "∭" => r"\iiint",
    "∮" => r"\oint",
    "lim" => r"\lim",
    "liminf" => r"\liminf",
    "limsup" => r"\limsup",
    "max" => r"\max",
    "min" => r"\min",
    "sup" => r"\sup",
    "inf" => r"\inf",
    "det" => r"\det",
    "gcd" => r"\gcd",
    "Pr" => r"\Pr",
    "argmax" => r"\operatorname*{argmax}",
    "argmin" => r"\operatorname*{argmin}",
};

static VARIANTS: phf::Map<&'static str, &'static str> = phf_map! {
    "normal" => r"\mathrm{#1}",
    "bold" => r"\mathbf{#1}",
    "italic" => r"\mathit{#1}",
    "bold-italic" => r"\boldsymbol{#1}",
    "double-struck" => r"\mathbb{#1}",
    "script" => r"\mathcal{#1}",
    "bold-script" => r"\boldsymbol{\mathcal{#1}}",
    "fraktur" => r"\mathfrak{#1}",
    "bold-fraktur" => r"\boldsymbol{\mathfrak{#1}}",
    "sans-serif" => r"\mathsf{#1}",
    "bold-sans-serif" => r"\boldsymbol{\mathsf{#1}}",
    "sans-serif-italic" => r"\mathsf{#1}",
    "sans-serif-bold-italic" => r"\boldsymbol{\mathsf{#1}}",
    "monospace" => r"\mathtt{#1}",
};

static ENCLOSURES: phf::Map<&'static str, &'static str> = phf_map! {
    "box" => r"\boxed{#1}",
    "roundedbox" => r"\boxed{#1}",
    "updiagonalstrike" => r"\cancel{#1}",
    "downdiagonalstrike" => r"\bcancel{#1}",
    "updiagonalarrow" => r"\cancelto{}{#1}",
    "top" => r"\overline{#1}",
    "bottom" => r"\underline{#1}",
    "radical" => r"\sqrt{#1}",
    "longdiv" => r"\overline{)#1}",
    "left" => r"\left|#1\right.",
    "right" => r"\left.#1\right|",
    "actuarial" => r"\left.\overline{#1}\right|",
};

/// Named and common `<mspace>` widths.
static SPACE_WIDTHS: phf::Map<&'static str, SpaceKind> = phf_map! {
    "veryverythinmathspace" => SpaceKind::Thin,
    "verythinmathspace" => SpaceKind::Thin,
    "thinmathspace" => SpaceKind::Thin,
    "mediummathspace" => SpaceKind::Medium,
    "thickmathspace" => SpaceKind::Thick,
    "verythickmathspace" => SpaceKind::Thick,
    "negativethinmathspace" => SpaceKind::NegativeThin,
    "negativeveryverythinmathspace" => SpaceKind::NegativeThin,
    "negativeverythinmathspace" => SpaceKind::NegativeThin,
    "0.1667em" => SpaceKind::Thin,
    "0.2222em" => SpaceKind::Medium,
    "0.2778em" => SpaceKind::Thick,
    "1em" => SpaceKind::Quad,
    "2em" => SpaceKind::Qquad,
};

fn literals(
    namespace: Namespace,
    map: &'static phf::Map<&'static str, &'static str>,
) -> impl Iterator<Item = SymbolSpec> {
    map.entries()
        .map(move |(identifier, tex)| SymbolSpec::literal(namespace, identifier, tex))
}

fn templates(
    namespace: Namespace,
    map: &'static phf::Map<&'static str, &'static str>,
) -> impl Iterator<Item = SymbolSpec> {
    map.entries()
        .map(move |(identifier, tex)| SymbolSpec::template(namespace, identifier, tex))
}

fn spaces(
    namespace: Namespace,
    map: &'static phf::Map<&'static str, SpaceKind>,
) -> impl Iterator<Item = SymbolSpec> {
    map.entries().map(move |(identifier, kind)| {
        SymbolSpec::new(namespace, identifier, RenderRule::Spacing(*kind))
    })
}

/// All built-in entries, ready for [`SymbolTable::build`](crate::SymbolTable::build).
pub fn default_entries() -> impl Iterator<Item = SymbolSpec> {
    literals(Namespace::Char, &CHARS)
        .chain(spaces(Namespace::Char, &CHAR_SPACES))
        .chain(literals(Namespace::Identifier, &FUNCTIONS))
        .chain(literals(Namespace::Operator, &FUNCTIONS))
        .chain(literals(Namespace::Operator, &OPERATORS))
        .chain(literals(Namespace::Text, &TEXT))
        .chain(literals(Namespace::Delimiter, &DELIMITERS))
        .chain(templates(Namespace::Accent, &ACCENTS))
        .chain(templates(Namespace::UnderAccent, &UNDER_ACCENTS))
        .chain(literals(Namespace::Limits, &LIMITS))
        .chain(templates(Namespace::Variant, &VARIANTS))
        .chain(templates(Namespace::Enclose, &ENCLOSURES))
        .chain(spaces(Namespace::Space, &SPACE_WIDTHS))
}
