use codesim::{fingerprint, linearize, parse_source, LexOptions, Node, NodeKind};
use pretty_assertions::assert_eq;

fn seq(src: &str) -> Vec<String> {
    fingerprint(src, LexOptions::default()).unwrap()
}

fn golden(src: &str, expected: &str) {
    assert_eq!(seq(src).join(" "), expected);
}

#[test]
fn empty_source_is_bare_program() {
    assert_eq!(seq(""), vec!["<PROGRAM>", "</PROGRAM>"]);
}

#[test]
fn golden_declaration() {
    golden(
        "int a = 1;",
        "<PROGRAM> <STMT> <TOKEN> KW </TOKEN> <TOKEN> var_0 </TOKEN> <TOKEN> = </TOKEN> <TOKEN> NUM </TOKEN> </STMT> </PROGRAM>",
    );
}

#[test]
fn golden_function_with_return() {
    golden(
        "int f(int x) { return x; }",
        "<PROGRAM> <FUNCTION> <STMT> <TOKEN> KW </TOKEN> <TOKEN> var_0 </TOKEN> <TOKEN> ( </TOKEN> <TOKEN> KW </TOKEN> <TOKEN> var_1 </TOKEN> <TOKEN> ) </TOKEN> </STMT> <BLOCK> <RETURN> <EXPR> <TOKEN> var_2 </TOKEN> </EXPR> </RETURN> </BLOCK> </FUNCTION> </PROGRAM>",
    );
}

#[test]
fn golden_if_else_in_function() {
    golden(
        "void f() { if (a) return; else break; }",
        "<PROGRAM> <FUNCTION> <STMT> <TOKEN> KW </TOKEN> <TOKEN> var_0 </TOKEN> <TOKEN> ( </TOKEN> <TOKEN> ) </TOKEN> </STMT> <BLOCK> <IF> <EXPR> <TOKEN> var_1 </TOKEN> </EXPR> <RETURN> <EXPR> </EXPR> </RETURN> <BLOCK> <BREAK> </BREAK> </BLOCK> </IF> </BLOCK> </FUNCTION> </PROGRAM>",
    );
}

#[test]
fn synthetic_labels_are_not_emitted() {
    let s = seq("void f() { if (a) x; else y; }");
    assert!(!s.iter().any(|e| e == "ELSE" || e == "FUNC_HEADER"));
}

#[test]
fn constants_and_strings_normalize() {
    golden(
        "p(\"hi\", 'c', 0x10);",
        "<PROGRAM> <STMT> <TOKEN> var_0 </TOKEN> <TOKEN> ( </TOKEN> <TOKEN> STR </TOKEN> <TOKEN> , </TOKEN> <TOKEN> CHR </TOKEN> <TOKEN> , </TOKEN> <TOKEN> NUM </TOKEN> <TOKEN> ) </TOKEN> </STMT> </PROGRAM>",
    );
}

#[test]
fn markers_are_balanced() {
    let src = "int main() { for (i = 0; i < 3; i++) { if (i) continue; else { do x; while (y); } } return 0; }";
    let mut stack: Vec<String> = Vec::new();
    for e in seq(src) {
        if let Some(name) = e.strip_prefix("</") {
            let open = stack.pop().expect("close without open");
            assert_eq!(format!("<{name}"), open);
        } else if e.starts_with('<') && e.ends_with('>') && e.len() > 2 {
            stack.push(e);
        }
    }
    assert!(stack.is_empty());
}

#[test]
fn hand_built_tree() {
    let mut expr = Node::new(NodeKind::Expr);
    expr.push(Node::leaf("var_0")).unwrap();
    let mut ret = Node::new(NodeKind::Return);
    ret.push(expr).unwrap();
    assert_eq!(
        linearize(&ret).unwrap(),
        vec!["<RETURN>", "<EXPR>", "<TOKEN>", "var_0", "</TOKEN>", "</EXPR>", "</RETURN>"]
    );
}

#[test]
fn sequence_length_tracks_node_count() {
    let tree = parse_source("int main() { int x = 1; return x; }").unwrap();
    let s = linearize(&tree).unwrap();
    let leaves = tree.leaf_labels().len();
    assert_eq!(s.len(), 2 * tree.node_count() + leaves);
}
