//! Catalog of named character entities.
//!
//! MathML documents commonly reference characters by name (`&alpha;`, `&InvisibleTimes;`)
//! through the MathML DTD. The reader resolves those names here so the engine only ever sees
//! literal characters.
use std::borrow::Cow;

use memchr::memchr;
use phf::phf_map;

/// Resolve the name of an entity reference (the part between `&` and `;`).
///
/// Handles decimal and hexadecimal character references, the five predefined XML entities and
/// the named entities of the catalog. Returns `None` if the name cannot be resolved.
pub fn resolve(name: &str) -> Option<Cow<'static, str>> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(|c| Cow::Owned(c.to_string()));
    }
    let value = match name {
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "apos" => "'",
        "quot" => "\"",
        _ => ENTITIES.get(name)?,
    };
    Some(Cow::Borrowed(value))
}

/// Replace every resolvable entity reference in `raw`.
///
/// References that cannot be resolved are left in place, including their `&` and `;`.
pub fn unescape(raw: &str) -> Cow<'_, str> {
    let Some(first) = memchr(b'&', raw.as_bytes()) else {
        return Cow::Borrowed(raw);
    };
    let mut out = String::with_capacity(raw.len());
    out.push_str(&raw[..first]);
    let mut rest = &raw[first..];
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match after.find(';').map(|semi| (&after[..semi], semi)) {
            Some((name, semi)) if is_reference_name(name) => {
                match resolve(name) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&rest[amp..amp + semi + 2]),
                }
                rest = &after[semi + 1..];
            }
            _ => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn is_reference_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some('#') => {
            let digits = chars.as_str();
            let digits = digits.strip_prefix(['x', 'X']).unwrap_or(digits);
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        Some(c) if c.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

static ENTITIES: phf::Map<&'static str, &'static str> = phf_map! {
    // Greek
    "alpha" => "α",
    "beta" => "β",
    "gamma" => "γ",
    "delta" => "δ",
    "epsi" => "ε",
    "epsiv" => "ϵ",
    "straightepsilon" => "ϵ",
    "varepsilon" => "ε",
    "zeta" => "ζ",
    "eta" => "η",
    "theta" => "θ",
    "thetav" => "ϑ",
    "vartheta" => "ϑ",
    "iota" => "ι",
    "kappa" => "κ",
    "kappav" => "ϰ",
    "lambda" => "λ",
    "mu" => "μ",
    "nu" => "ν",
    "xi" => "ξ",
    "omicron" => "ο",
    "pi" => "π",
    "piv" => "ϖ",
    "rho" => "ρ",
    "rhov" => "ϱ",
    "sigma" => "σ",
    "sigmav" => "ς",
    "tau" => "τ",
    "upsi" => "υ",
    "upsilon" => "υ",
    "phi" => "φ",
    "phiv" => "ϕ",
    "straightphi" => "ϕ",
    "varphi" => "φ",
    "chi" => "χ",
    "psi" => "ψ",
    "omega" => "ω",
    "Gamma" => "Γ",
    "Delta" => "Δ",
    "Theta" => "Θ",
    "Lambda" => "Λ",
    "Xi" => "Ξ",
    "Pi" => "Π",
    "Sigma" => "Σ",
    "Upsi" => "ϒ",
    "Upsilon" => "Υ",
    "Phi" => "Φ",
    "Psi" => "Ψ",
    "Omega" => "Ω",
    "ohm" => "Ω",
    // Invisible operators
    "ApplyFunction" => "\u{2061}",
    "af" => "\u{2061}",
    "InvisibleTimes" => "\u{2062}",
    "it" => "\u{2062}",
    "InvisibleComma" => "\u{2063}",
    "ic" => "\u{2063}",
    "InvisiblePlus" => "\u{2064}",
    // Spaces
    "nbsp" => "\u{A0}",
    "NonBreakingSpace" => "\u{A0}",
    "ensp" => "\u{2002}",
    "emsp" => "\u{2003}",
    "thinsp" => "\u{2009}",
    "ThinSpace" => "\u{2009}",
    "hairsp" => "\u{200A}",
    "VeryThinSpace" => "\u{200A}",
    "MediumSpace" => "\u{205F}",
    "ThickSpace" => "\u{205F}\u{200A}",
    "NegativeThinSpace" => "\u{200B}",
    "ZeroWidthSpace" => "\u{200B}",
    "NewLine" => "\n",
    // Binary operators
    "plus" => "+",
    "minus" => "−",
    "times" => "×",
    "divide" => "÷",
    "div" => "÷",
    "pm" => "±",
    "plusmn" => "±",
    "PlusMinus" => "±",
    "mp" => "∓",
    "mnplus" => "∓",
    "MinusPlus" => "∓",
    "sdot" => "⋅",
    "middot" => "·",
    "centerdot" => "·",
    "CenterDot" => "·",
    "ast" => "*",
    "lowast" => "∗",
    "star" => "☆",
    "sstarf" => "⋆",
    "compfn" => "∘",
    "SmallCircle" => "∘",
    "cir" => "○",
    "bull" => "•",
    "bullet" => "•",
    "oplus" => "⊕",
    "CirclePlus" => "⊕",
    "ominus" => "⊖",
    "CircleMinus" => "⊖",
    "otimes" => "⊗",
    "CircleTimes" => "⊗",
    "osol" => "⊘",
    "odot" => "⊙",
    "CircleDot" => "⊙",
    "cap" => "∩",
    "cup" => "∪",
    "setminus" => "∖",
    "Backslash" => "∖",
    "and" => "∧",
    "wedge" => "∧",
    "or" => "∨",
    "vee" => "∨",
    "dagger" => "†",
    "Dagger" => "‡",
    "wreath" => "≀",
    "amalg" => "⨿",
    // Relations
    "equals" => "=",
    "ne" => "≠",
    "NotEqual" => "≠",
    "le" => "≤",
    "leq" => "≤",
    "LessEqual" => "≤",
    "ge" => "≥",
    "geq" => "≥",
    "GreaterEqual" => "≥",
    "les" => "⩽",
    "leqslant" => "⩽",
    "ges" => "⩾",
    "geqslant" => "⩾",
    "Lt" => "≪",
    "ll" => "≪",
    "Gt" => "≫",
    "gg" => "≫",
    "equiv" => "≡",
    "Congruent" => "≡",
    "cong" => "≅",
    "TildeFullEqual" => "≅",
    "asymp" => "≈",
    "approx" => "≈",
    "TildeTilde" => "≈",
    "ap" => "≈",
    "sim" => "∼",
    "Tilde" => "∼",
    "sime" => "≃",
    "simeq" => "≃",
    "TildeEqual" => "≃",
    "prop" => "∝",
    "propto" => "∝",
    "Proportional" => "∝",
    "isin" => "∈",
    "in" => "∈",
    "isinv" => "∈",
    "Element" => "∈",
    "notin" => "∉",
    "NotElement" => "∉",
    "ni" => "∋",
    "niv" => "∋",
    "ReverseElement" => "∋",
    "sub" => "⊂",
    "subset" => "⊂",
    "sup" => "⊃",
    "supset" => "⊃",
    "Superset" => "⊃",
    "sube" => "⊆",
    "subseteq" => "⊆",
    "SubsetEqual" => "⊆",
    "supe" => "⊇",
    "supseteq" => "⊇",
    "SupersetEqual" => "⊇",
    "nsub" => "⊄",
    "perp" => "⊥",
    "bottom" => "⊥",
    "UpTee" => "⊥",
    "par" => "∥",
    "parallel" => "∥",
    "DoubleVerticalBar" => "∥",
    "mid" => "∣",
    "VerticalBar" => "∣",
    "vdash" => "⊢",
    "RightTee" => "⊢",
    "models" => "⊧",
    "prec" => "≺",
    "succ" => "≻",
    "def" => "≝",
    "wedgeq" => "≙",
    "doteq" => "≐",
    // Arrows
    "larr" => "←",
    "leftarrow" => "←",
    "LeftArrow" => "←",
    "rarr" => "→",
    "rightarrow" => "→",
    "RightArrow" => "→",
    "to" => "→",
    "uarr" => "↑",
    "UpArrow" => "↑",
    "darr" => "↓",
    "DownArrow" => "↓",
    "harr" => "↔",
    "LeftRightArrow" => "↔",
    "varr" => "↕",
    "lArr" => "⇐",
    "Leftarrow" => "⇐",
    "DoubleLeftArrow" => "⇐",
    "rArr" => "⇒",
    "Rightarrow" => "⇒",
    "DoubleRightArrow" => "⇒",
    "Implies" => "⇒",
    "hArr" => "⇔",
    "iff" => "⇔",
    "Leftrightarrow" => "⇔",
    "DoubleLeftRightArrow" => "⇔",
    "uArr" => "⇑",
    "dArr" => "⇓",
    "map" => "↦",
    "mapsto" => "↦",
    "RightTeeArrow" => "↦",
    "xrarr" => "⟶",
    "longrightarrow" => "⟶",
    "xlarr" => "⟵",
    "longleftarrow" => "⟵",
    "xrArr" => "⟹",
    "Longrightarrow" => "⟹",
    "xhArr" => "⟺",
    "nearr" => "↗",
    "searr" => "↘",
    "hookrightarrow" => "↪",
    "rightleftharpoons" => "⇌",
    // Delimiters
    "lpar" => "(",
    "rpar" => ")",
    "lsqb" => "[",
    "lbrack" => "[",
    "rsqb" => "]",
    "rbrack" => "]",
    "lcub" => "{",
    "lbrace" => "{",
    "rcub" => "}",
    "rbrace" => "}",
    "verbar" => "|",
    "vert" => "|",
    "Verbar" => "‖",
    "Vert" => "‖",
    "lang" => "⟨",
    "langle" => "⟨",
    "LeftAngleBracket" => "⟨",
    "rang" => "⟩",
    "rangle" => "⟩",
    "RightAngleBracket" => "⟩",
    "lceil" => "⌈",
    "LeftCeiling" => "⌈",
    "rceil" => "⌉",
    "RightCeiling" => "⌉",
    "lfloor" => "⌊",
    "LeftFloor" => "⌊",
    "rfloor" => "⌋",
    "RightFloor" => "⌋",
    "lobrk" => "⟦",
    "robrk" => "⟧",
    // Large operators
    "sum" => "∑",
    "Sum" => "∑",
    "prod" => "∏",
    "Product" => "∏",
    "coprod" => "∐",
    "Coproduct" => "∐",
    "int" => "∫",
    "Integral" => "∫",
    "Int" => "∬",
    "tint" => "∭",
    "iiint" => "∭",
    "conint" => "∮",
    "oint" => "∮",
    "ContourIntegral" => "∮",
    "xcap" => "⋂",
    "bigcap" => "⋂",
    "Intersection" => "⋂",
    "xcup" => "⋃",
    "bigcup" => "⋃",
    "Union" => "⋃",
    "xvee" => "⋁",
    "bigvee" => "⋁",
    "xwedge" => "⋀",
    "bigwedge" => "⋀",
    "xoplus" => "⨁",
    "bigoplus" => "⨁",
    "xotime" => "⨂",
    "bigotimes" => "⨂",
    // Miscellaneous symbols
    "infin" => "∞",
    "part" => "∂",
    "PartialD" => "∂",
    "nabla" => "∇",
    "Del" => "∇",
    "forall" => "∀",
    "ForAll" => "∀",
    "exist" => "∃",
    "Exists" => "∃",
    "nexist" => "∄",
    "empty" => "∅",
    "emptyset" => "∅",
    "emptyv" => "∅",
    "varnothing" => "∅",
    "not" => "¬",
    "neg" => "¬",
    "radic" => "√",
    "Sqrt" => "√",
    "angle" => "∠",
    "ang" => "∠",
    "there4" => "∴",
    "therefore" => "∴",
    "Therefore" => "∴",
    "becaus" => "∵",
    "because" => "∵",
    "Because" => "∵",
    "hellip" => "…",
    "mldr" => "…",
    "ctdot" => "⋯",
    "cdots" => "⋯",
    "vellip" => "⋮",
    "utdot" => "⋰",
    "dtdot" => "⋱",
    "deg" => "°",
    "prime" => "′",
    "Prime" => "″",
    "tprime" => "‴",
    "hbar" => "ℏ",
    "planck" => "ℏ",
    "ell" => "ℓ",
    "weierp" => "℘",
    "wp" => "℘",
    "image" => "ℑ",
    "Im" => "ℑ",
    "real" => "ℜ",
    "Re" => "ℜ",
    "aleph" => "ℵ",
    "beth" => "ℶ",
    "complexes" => "ℂ",
    "Copf" => "ℂ",
    "naturals" => "ℕ",
    "Nopf" => "ℕ",
    "primes" => "ℙ",
    "Popf" => "ℙ",
    "rationals" => "ℚ",
    "Qopf" => "ℚ",
    "reals" => "ℝ",
    "Ropf" => "ℝ",
    "integers" => "ℤ",
    "Zopf" => "ℤ",
    "DifferentialD" => "ⅆ",
    "dd" => "ⅆ",
    "ExponentialE" => "ⅇ",
    "ee" => "ⅇ",
    "ImaginaryI" => "ⅈ",
    "ii" => "ⅈ",
    "square" => "□",
    "squ" => "□",
    "Square" => "□",
    "diamond" => "⋄",
    "triangle" => "▵",
    "sharp" => "♯",
    "flat" => "♭",
    "natural" => "♮",
    "top" => "⊤",
    "DownTee" => "⊤",
    "copy" => "©",
    "reg" => "®",
    "sect" => "§",
    "para" => "¶",
    "micro" => "µ",
    "half" => "½",
    "frac12" => "½",
    // Accents
    "Hat" => "^",
    "circ" => "ˆ",
    "caron" => "ˇ",
    "Hacek" => "ˇ",
    "breve" => "˘",
    "Breve" => "˘",
    "dot" => "˙",
    "DiacriticalDot" => "˙",
    "die" => "¨",
    "Dot" => "¨",
    "uml" => "¨",
    "DoubleDot" => "¨",
    "tilde" => "˜",
    "DiacriticalTilde" => "˜",
    "acute" => "´",
    "DiacriticalAcute" => "´",
    "grave" => "`",
    "DiacriticalGrave" => "`",
    "macr" => "¯",
    "strns" => "¯",
    "OverBar" => "‾",
    "oline" => "‾",
    "UnderBar" => "_",
    "lowbar" => "_",
    "OverBrace" => "⏞",
    "UnderBrace" => "⏟",
    "OverBracket" => "⎴",
    "UnderBracket" => "⎵",
    "OverParenthesis" => "⏜",
    "UnderParenthesis" => "⏝",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_references() {
        assert_eq!(resolve("alpha").as_deref(), Some("α"));
        assert_eq!(resolve("#x3B1").as_deref(), Some("α"));
        assert_eq!(resolve("#945").as_deref(), Some("α"));
        assert_eq!(resolve("amp").as_deref(), Some("&"));
        assert_eq!(resolve("#xD800"), None);
        assert_eq!(resolve("nosuchthing"), None);
    }

    #[test]
    fn unescape_keeps_unknown_references() {
        assert_eq!(unescape("no references"), "no references");
        assert_eq!(unescape("&lang;x&rang;"), "⟨x⟩");
        assert_eq!(unescape("a &bogus; b"), "a &bogus; b");
        assert_eq!(unescape("R & D"), "R & D");
        assert_eq!(unescape("&#x28;&amp"), "(&amp");
    }
}
