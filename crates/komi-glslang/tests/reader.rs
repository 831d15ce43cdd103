//! Integration tests for the glslang tree-dump reader.

use komi_glslang::read_tree;
use komi_glslang::tree::{BasicType, Node, NodeKind, NodeType, Op};

fn children(node: &Node) -> &[Node] {
    match &node.kind {
        NodeKind::Aggregate { children, .. } => children,
        other => panic!("expected an aggregate, got {other:?}"),
    }
}

#[test]
fn read_fragment_shader() {
    let text = include_str!("../../../demos/loop_select.frag.txt");
    let root = read_tree(text).expect("dump should read");

    let NodeKind::Aggregate { op, .. } = &root.kind else {
        panic!("root is not an aggregate");
    };
    assert_eq!(*op, Op::Sequence);
    let top = children(&root);
    assert_eq!(top.len(), 3, "two functions and the linker objects");

    // scale(f1;
    let NodeKind::Aggregate { op, name, ty, .. } = &top[0].kind else {
        panic!("expected a function definition");
    };
    assert_eq!(*op, Op::Function);
    assert_eq!(name, "scale(f1;");
    assert_eq!(ty.basic, BasicType::Float);
    assert_eq!(top[0].loc.line, 6);
    let parts = children(&top[0]);
    assert_eq!(parts.len(), 2);
    assert_eq!(children(&parts[0]).len(), 1, "one parameter");

    let body = children(&parts[1]);
    let NodeKind::Branch {
        op: Op::Return,
        expression: Some(expression),
    } = &body[0].kind
    else {
        panic!("expected return with expression, got {:?}", body[0].kind);
    };
    let NodeKind::Binary {
        op: Op::Mul, right, ..
    } = &expression.kind
    else {
        panic!("expected a multiply");
    };
    assert!(matches!(
        &right.kind,
        NodeKind::Binary {
            op: Op::IndexDirectStruct,
            ..
        }
    ));

    // Linker objects
    let NodeKind::Aggregate { op, children, .. } = &top[2].kind else {
        panic!("expected linker objects");
    };
    assert_eq!(*op, Op::LinkerObjects);
    assert_eq!(children.len(), 2);
    assert_eq!(top[2].loc.line, 0);
}

#[test]
fn read_loop_parts() {
    let text = include_str!("../../../demos/loop_select.frag.txt");
    let root = read_tree(text).expect("dump should read");
    let main = &children(&root)[1];
    let body = children(&children(main)[1]);
    assert_eq!(body.len(), 3);

    let for_loop = &children(&body[1])[1];
    let NodeKind::Loop {
        test_first,
        test,
        terminal,
        body: loop_body,
    } = &for_loop.kind
    else {
        panic!("expected a loop, got {:?}", for_loop.kind);
    };
    assert!(*test_first);
    assert!(matches!(
        test.as_deref().map(|n| &n.kind),
        Some(NodeKind::Binary {
            op: Op::LessThan,
            ..
        })
    ));
    assert!(matches!(
        terminal.as_deref().map(|n| &n.kind),
        Some(NodeKind::Unary {
            op: Op::PostIncrement,
            ..
        })
    ));
    assert!(loop_body.is_some());
}

#[test]
fn read_selection() {
    let text = include_str!("../../../demos/loop_select.frag.txt");
    let root = read_tree(text).expect("dump should read");
    let main = &children(&root)[1];
    let selection = &children(&children(main)[1])[2];
    let NodeKind::Selection {
        condition,
        accept,
        reject,
        ..
    } = &selection.kind
    else {
        panic!("expected a selection");
    };
    assert!(condition.is_typed());
    let accept = accept.as_deref().expect("true case");
    assert_eq!(
        accept.ty(),
        Some(&NodeType::vector(BasicType::Float, 4))
    );
    assert!(matches!(
        reject.as_deref().map(|n| &n.kind),
        Some(NodeKind::Branch { op: Op::Kill, .. })
    ));
}

#[test]
fn read_do_while_without_condition() {
    let text = "\
0:? Sequence
0:2  Function Definition: main( ( global void)
0:2    Function Parameters:
0:3    Sequence
0:3      Loop with condition not tested first
0:3        No loop condition
0:3        No loop body
";
    let root = read_tree(text).expect("dump should read");
    let main = &children(&root)[0];
    let body = children(&children(main)[1]);
    assert_eq!(
        body[0].kind,
        NodeKind::Loop {
            test_first: false,
            test: None,
            terminal: None,
            body: None,
        }
    );
}

#[test]
fn read_only_first_tree() {
    let text = "\
0:? Sequence
0:1  Function Definition: a( ( global void)
0:1    Function Parameters:

Linked fragment stage:

0:? Sequence
0:1  Function Definition: b( ( global void)
0:1    Function Parameters:
";
    let root = read_tree(text).expect("dump should read");
    let top = children(&root);
    assert_eq!(top.len(), 1);
    assert!(matches!(&top[0].kind, NodeKind::Aggregate { name, .. } if name == "a("));
}

#[test]
fn read_ternary() {
    let text = "\
0:? Sequence
0:1  Test condition and select ( temp float)
0:1    Condition
0:1    'c' ( temp bool)
0:1    true case
0:1    'a' ( temp float)
0:1    false case
0:1    'b' ( temp float)
";
    let root = read_tree(text).expect("dump should read");
    let NodeKind::Selection { ty, .. } = &children(&root)[0].kind else {
        panic!("expected a selection");
    };
    assert_eq!(ty.basic, BasicType::Float);
}

#[test]
fn unexpected_indentation_is_an_error() {
    let text = "\
0:? Sequence
0:1  Test condition and select ( temp void)
0:1    Condition
";
    assert!(read_tree(text).is_err());
}
