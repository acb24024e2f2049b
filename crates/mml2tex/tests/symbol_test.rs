use mml2tex::{Converter, ConverterConfig, Namespace, RenderRule, SymbolSpec, default_entries};
use mml2tex_tree::{ElementKind, MathNode, read_mathml};

#[test]
fn every_literal_renders_as_itself() {
    let converter = Converter::new(ConverterConfig::default()).unwrap();
    for SymbolSpec {
        namespace,
        identifier,
        rule,
    } in default_entries()
    {
        let kind = match namespace {
            Namespace::Identifier | Namespace::Char => ElementKind::Mi,
            Namespace::Operator => ElementKind::Mo,
            _ => continue,
        };
        let RenderRule::Literal(tex) = rule else {
            continue;
        };
        let node = MathNode::leaf(kind, &identifier);
        assert_eq!(
            converter.render(&node).unwrap(),
            &*tex,
            "{namespace} entry {identifier:?}"
        );
    }
}

#[test]
fn symbols_from_toml() {
    let config: ConverterConfig = toml::from_str(
        r#"
        lookup-order = "codepoint-first"
        infer-operator-form = true

        [[symbols]]
        namespace = "identifier"
        identifier = "erf"
        rule = { literal = '\operatorname{erf}' }

        [[symbols]]
        namespace = "accent"
        identifier = "⌢"
        rule = { template = '\overparen{#1}' }

        [[symbols]]
        namespace = "space"
        identifier = "hairspace"
        rule = { spacing = "thin" }
        "#,
    )
    .unwrap();
    assert_eq!(config.symbols.len(), 3);
    assert!(config.default_symbols);

    let converter = Converter::new(config).unwrap();
    let tree = read_mathml(
        r#"<mrow>
             <mo>−</mo>
             <mi>erf</mi>
             <mspace width="hairspace"/>
             <mover><mi>x</mi><mo>⌢</mo></mover>
           </mrow>"#,
    )
    .unwrap();
    assert_eq!(
        converter.render(&tree).unwrap(),
        r"-\operatorname{erf}\,\overparen{x}"
    );
}

#[test]
fn template_with_wrong_arity_is_rejected() {
    let result: Result<ConverterConfig, _> = toml::from_str(
        r#"
        [[symbols]]
        namespace = "enclose"
        identifier = "double"
        rule = { template = '\fbox{\fbox{#1}{#2}}' }
        "#,
    );
    let config = result.unwrap();
    let err = Converter::new(config).unwrap_err();
    assert_eq!(
        err.to_string(),
        "rule for \"double\" in namespace enclose takes 2 argument(s), but the namespace supplies 1"
    );
}
