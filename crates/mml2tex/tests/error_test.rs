use mml2tex::{Converter, ConverterConfig, ErrorKind};
use mml2tex_tree::read_mathml;

#[test]
fn main() {
    let problems = [
        ("elementary_math", "<math><mstack><mn>1</mn></mstack></math>", "unsupported element <mstack>"),
        ("unknown_element", "<math><mi>x</mi><mblah/></math>", "unsupported element <mblah>"),
        ("glyph", r#"<math><mglyph src="a.png"/></math>"#, "unsupported element <mglyph>"),
        (
            "frac_with_one_child",
            "<math><mfrac><mi>a</mi></mfrac></math>",
            "<mfrac> expects exactly 2 children, got 1",
        ),
        (
            "sub_with_three_children",
            "<math><msub><mi>a</mi><mi>b</mi><mi>c</mi></msub></math>",
            "<msub> expects exactly 2 children, got 3",
        ),
        (
            "subsup_with_two_children",
            "<math><msubsup><mi>a</mi><mi>b</mi></msubsup></math>",
            "<msubsup> expects exactly 3 children, got 2",
        ),
        (
            "multiscripts_odd",
            "<math><mmultiscripts><mi>a</mi><mi>b</mi></mmultiscripts></math>",
            "<mmultiscripts> expects a base followed by subscript/superscript pairs, got 2",
        ),
        (
            "empty_multiscripts",
            "<math><mmultiscripts></mmultiscripts></math>",
            "<mmultiscripts> expects a base followed by subscript/superscript pairs, got 0",
        ),
        (
            "stray_prescripts",
            "<math><mprescripts/></math>",
            "unsupported element <mprescripts>",
        ),
        (
            "unknown_entity",
            "<math><mo>&frobnicate;</mo></math>",
            "unresolved entity reference &frobnicate;",
        ),
        (
            "nested_error",
            "<math><mfrac><msqrt><mroot><mi>x</mi></mroot></msqrt><mn>2</mn></mfrac></math>",
            "<mroot> expects exactly 2 children, got 1",
        ),
    ];

    let converter = Converter::new(ConverterConfig::default()).unwrap();
    for (name, problem, message) in problems {
        let tree = read_mathml(problem).unwrap();
        let Err(error) = converter.render(&tree) else {
            panic!("problem `{name}` did not return an error");
        };
        assert_eq!(error.kind().to_string(), message, "problem `{name}`");

        let report = error.to_report("<input>", false);
        let mut buf = Vec::new();
        report
            .write(("<input>", ariadne::Source::from(problem)), &mut buf)
            .expect("failed to write report");
        let output = String::from_utf8(buf).expect("report should be valid UTF-8");
        assert!(output.contains(message), "problem `{name}`: {output}");
    }
}

#[test]
fn span_points_at_element() {
    let converter = Converter::new(ConverterConfig::default()).unwrap();
    let source = "<math><mi>x</mi><mo>=</mo><mfrac><mn>1</mn></mfrac></math>";
    let error = converter.render(&read_mathml(source).unwrap()).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::ArityMismatch { .. }));
    assert_eq!(&source[error.span()], "<mfrac><mn>1</mn></mfrac>");
    assert!(error.to_string().starts_with("26: "));
}
