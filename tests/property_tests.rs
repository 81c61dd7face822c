//! 性质测试：距离的度量性质、归一化的不变性、解析器对任意输入的健壮性。

use codesim::{edit_distance, fingerprint, parse_source, similarity, tokenize, LexOptions};
use proptest::prelude::*;

// 小字母表，保证序列之间有足够多的重合
fn element() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("<IF>".to_string()),
        Just("</IF>".to_string()),
        Just("var_0".to_string()),
        Just("NUM".to_string()),
        Just(";".to_string()),
    ]
}

fn sequence() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(element(), 0..24)
}

fn identifier() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,8}".prop_filter("not a keyword", |s| {
        codesim::Keyword::from_ident(s).is_none()
    })
}

// 由固定模板拼出的小程序，标识符可替换
fn program_with(names: &[String]) -> String {
    format!(
        "int {f}(int {a}) {{ int {b} = 0; for ({b} = 0; {b} < {a}; {b}++) {{ if ({b} % 2) continue; {a} -= {b}; }} return {a}; }}",
        f = names[0],
        a = names[1],
        b = names[2],
    )
}

proptest! {
    #[test]
    fn distance_is_symmetric(a in sequence(), b in sequence()) {
        prop_assert_eq!(edit_distance(&a, &b), edit_distance(&b, &a));
    }

    #[test]
    fn distance_to_self_is_zero(a in sequence()) {
        prop_assert_eq!(edit_distance(&a, &a), 0);
        prop_assert_eq!(similarity(&a, &a), 1.0);
    }

    #[test]
    fn triangle_inequality(a in sequence(), b in sequence(), c in sequence()) {
        prop_assert!(edit_distance(&a, &c) <= edit_distance(&a, &b) + edit_distance(&b, &c));
    }

    #[test]
    fn distance_bounds(a in sequence(), b in sequence()) {
        let d = edit_distance(&a, &b);
        prop_assert!(d >= a.len().abs_diff(b.len()));
        prop_assert!(d <= a.len().max(b.len()));
    }

    #[test]
    fn empty_sequence_law(b in sequence()) {
        let empty: Vec<String> = Vec::new();
        prop_assert_eq!(edit_distance(&empty, &b), b.len());
    }

    #[test]
    fn similarity_in_unit_interval(a in sequence(), b in sequence()) {
        let s = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn renaming_is_invisible(
        x in prop::collection::vec(identifier(), 3),
        y in prop::collection::vec(identifier(), 3),
    ) {
        // 模板中三个名字必须互不相同才能保证是“一致改名”
        prop_assume!(x[0] != x[1] && x[1] != x[2] && x[0] != x[2]);
        prop_assume!(y[0] != y[1] && y[1] != y[2] && y[0] != y[2]);
        let a = fingerprint(&program_with(&x), LexOptions::default()).unwrap();
        let b = fingerprint(&program_with(&y), LexOptions::default()).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn extra_whitespace_is_invisible(pad in "[ \t\n]{1,4}") {
        let names = vec!["f".to_string(), "a".to_string(), "b".to_string()];
        let src = program_with(&names);
        let padded: String = src
            .split(' ')
            .collect::<Vec<_>>()
            .join(&format!(" {pad}"));
        prop_assert_eq!(
            fingerprint(&src, LexOptions::default()).unwrap(),
            fingerprint(&padded, LexOptions::default()).unwrap()
        );
    }

    #[test]
    fn tokenizer_never_panics(src in "\\PC{0,200}") {
        let _ = tokenize(&src).unwrap();
    }

    #[test]
    fn parser_terminates_on_token_soup(
        src in prop::collection::vec(
            prop_oneof![
                Just("("), Just(")"), Just("{"), Just("}"), Just("["), Just("]"), Just(";"),
                Just("if"), Just("else"), Just("for"), Just("while"), Just("do"),
                Just("switch"), Just("case"), Just("default"), Just("return"),
                Just("break"), Just("continue"), Just("int"), Just("x"), Just("1"), Just("+"),
            ],
            0..60,
        )
    ) {
        let src = src.join(" ");
        let root = parse_source(&src).unwrap();
        prop_assert_eq!(root.kind, codesim::NodeKind::Program);
        let seq = fingerprint(&src, LexOptions::default()).unwrap();
        prop_assert_eq!(seq.first().map(String::as_str), Some("<PROGRAM>"));
        prop_assert_eq!(seq.last().map(String::as_str), Some("</PROGRAM>"));
    }
}
