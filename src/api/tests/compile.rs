use crate::ast::{Alternative, BinOp, Node};
use crate::*;

/// Instructions between the segment setup and the jump to program exit.
fn body_lines(listing: &str) -> Vec<&str> {
    let lines: Vec<&str> = listing.lines().collect();
    let start = lines.iter().position(|l| *l == "MOV DS, AX").unwrap() + 1;
    let end = lines.iter().position(|l| *l == "JMP ProgramEnd").unwrap();
    lines[start..end].to_vec()
}

fn position(lines: &[&str], needle: &str) -> usize {
    lines
        .iter()
        .position(|l| *l == needle)
        .unwrap_or_else(|| panic!("missing line {:?}", needle))
}

#[test]
fn test_compile_single_assignment() {
    let compiled = compile(&Node::assign("x", Node::number("5"))).unwrap();
    assert!(compiled.warnings.is_empty());
    assert_eq!(
        body_lines(&compiled.listing),
        vec![
            "MOV AX, 5",
            "MOV [x], AX",
            "LEA DX, msg_x",
            "CALL print_string",
            "MOV AX, [x]",
            "CALL PrintNumber",
        ]
    );
    assert_eq!(compiled.symbols.get("x").unwrap().int_value, 5);
}

#[test]
fn test_listing_layout() {
    let compiled = compile(&Node::assign("x", Node::number("5"))).unwrap();
    let lines: Vec<&str> = compiled.listing.lines().collect();

    assert_eq!(lines[0], "DATA SEGMENT");
    let data_end = position(&lines, "DATA ENDS");
    assert_eq!(lines[data_end + 1], "");
    assert_eq!(
        &lines[data_end + 2..data_end + 7],
        &[
            "CODE SEGMENT",
            "ASSUME CS:CODE, DS:DATA",
            "START:",
            "MOV AX, DATA",
            "MOV DS, AX",
        ]
    );

    let jump = position(&lines, "JMP ProgramEnd");
    let print_string = position(&lines, "print_string PROC");
    let print_string_end = position(&lines, "print_string ENDP");
    let print_number = position(&lines, "PrintNumber PROC");
    let print_number_end = position(&lines, "PrintNumber ENDP");
    let exit = position(&lines, "ProgramEnd:");
    assert_eq!(print_string, jump + 1);
    assert!(print_string_end < print_number);
    assert_eq!(exit, print_number_end + 1);
    assert_eq!(
        &lines[exit..],
        &["ProgramEnd:", "MOV AH, 4CH", "INT 21H", "CODE ENDS", "END START"]
    );
    assert!(compiled.listing.ends_with("END START\n"));
}

#[test]
fn test_compile_string_program() {
    let root = Node::block(vec![Node::string("hello"), Node::string("hello")]).unwrap();
    let compiled = compile(&root).unwrap();
    // One declaration, two uses.
    assert_eq!(compiled.listing.matches("str_hello DB").count(), 1);
    assert_eq!(compiled.listing.matches("LEA DX, str_hello").count(), 2);
    assert_eq!(compiled.data.strings.len(), 1);
}

#[test]
fn test_compile_if_else() {
    let root = Node::if_(
        Node::binary(BinOp::Lt, Node::ident("x"), Node::number("10")),
        Node::block(vec![Node::string("small")]).unwrap(),
        Some(Alternative::else_(Node::string("big"))),
    );
    let compiled = compile(&root).unwrap();
    let body = body_lines(&compiled.listing);
    let cmp = position(&body, "CMP AX, BX");
    assert_eq!(body[cmp + 1], "JGE else_0");
    let else_label = position(&body, "else_0:");
    assert_eq!(body[else_label - 1], "JMP endif_0");
    assert_eq!(body.last().copied(), Some("endif_0:"));
    assert_eq!(body.iter().filter(|l| **l == "LEA DX, str_big").count(), 1);
    assert!(compiled.listing.contains("str_small DB 'small $' , 0"));
    // x is read but never assigned.
    assert_eq!(compiled.warnings.len(), 1);
    assert!(compiled.listing.contains("x DW ?"));
}

#[test]
fn test_compile_while_countdown() {
    let root = Node::block(vec![
        Node::assign("i", Node::number("3")),
        Node::while_(
            Node::binary(BinOp::Ne, Node::ident("i"), Node::number("0")),
            Node::assign("i", Node::binary(BinOp::Sub, Node::ident("i"), Node::number("1"))),
        ),
    ])
    .unwrap();
    let options = CompileOptions {
        redeclaration: RedeclarationPolicy::Allow,
        ..CompileOptions::default()
    };
    let compiled = compile_with_options(&root, &options).unwrap();
    assert!(compiled.warnings.is_empty());
    let body = body_lines(&compiled.listing);
    let start = position(&body, "while_start_0:");
    assert!(start > position(&body, "MOV [i], AX"));
    assert!(body.contains(&"JE while_end_0"));
    assert!(body.contains(&"SUB AX, BX"));
    let n = body.len();
    assert_eq!(&body[n - 2..], &["JMP while_start_0", "while_end_0:"]);
}

#[test]
fn test_compilations_are_independent() {
    let root = Node::block(vec![
        Node::while_(Node::ident("a"), Node::number("1")),
        Node::while_(Node::ident("a"), Node::number("1")),
    ])
    .unwrap();
    let first = compile(&root).unwrap();
    let second = compile(&root).unwrap();
    assert_eq!(first.listing, second.listing);
    assert!(second.listing.contains("while_start_0:"));
    assert!(second.listing.contains("while_start_1:"));
    assert!(!second.listing.contains("while_start_2:"));
}

#[test]
fn test_warnings_do_not_fail() {
    let root = Node::block(vec![
        Node::assign("x", Node::number("1")),
        Node::assign("x", Node::number("2")),
        Node::Unknown,
    ])
    .unwrap();
    let compiled = compile(&root).unwrap();
    assert_eq!(compiled.warnings.len(), 2);
    assert!(compiled.warnings[0].message.contains("already declared"));
    assert!(compiled.warnings[1].message.contains("unexpected node kind"));
    assert!(compiled.listing.ends_with("END START\n"));
}

#[test]
fn test_failure_keeps_partial_listing() {
    let root = Node::block(vec![
        Node::assign("x", Node::number("5")),
        Node::ident("y"),
        Node::assign("z", Node::number("1.2.3")),
        Node::assign("w", Node::number("9")),
    ])
    .unwrap();
    let failure = compile(&root).unwrap_err();
    assert_eq!(failure.diagnostics.len(), 2);
    assert!(!failure.diagnostics[0].is_error());
    let fatal = failure.diagnostics.last().unwrap();
    assert!(fatal.is_error());
    assert!(fatal.message.contains("1.2.3"));

    let partial = &failure.partial_listing;
    assert!(partial.contains("MOV [x], AX"));
    assert!(partial.contains("MOV AX, [y]"));
    assert!(!partial.contains("MOV [w], AX"));
    assert!(!partial.contains("JMP ProgramEnd"));
}

#[test]
fn test_depth_option_enforced() {
    let mut root = Node::number("0");
    for _ in 0..20 {
        root = Node::if_(Node::boolean(true), root, None);
    }
    assert!(compile(&root).is_ok());

    let shallow = CompileOptions {
        max_depth: 10,
        ..CompileOptions::default()
    };
    let failure = compile_with_options(&root, &shallow).unwrap_err();
    assert!(failure.diagnostics[0].message.contains("nesting"));
}

#[test]
fn test_compile_json() {
    let source = r#"{
        "kind": "Sequence",
        "first": {
            "kind": "Assignment",
            "target": "x",
            "value": { "kind": "Number", "value": "5" }
        },
        "next": {
            "kind": "If",
            "cond": {
                "kind": "Operator",
                "op": ">",
                "lhs": { "kind": "Identifier", "name": "x" },
                "rhs": { "kind": "Number", "value": "1" }
            },
            "body": { "kind": "String", "value": "big" },
            "alternative": {
                "kind": "Else",
                "body": { "kind": "String", "value": "small" }
            }
        }
    }"#;
    let compiled = compile_json(source, &CompileOptions::default()).unwrap();
    assert!(compiled.warnings.is_empty());
    assert!(compiled.listing.contains("JLE else_0"));
    assert!(compiled.listing.contains("str_small DB 'small $' , 0"));
}

#[test]
fn test_compile_json_unknown_kind() {
    let source = r#"{ "kind": "Sequence", "first": { "kind": "Lambda" } }"#;
    let compiled = compile_json(source, &CompileOptions::default()).unwrap();
    assert_eq!(compiled.warnings.len(), 1);
}

#[test]
fn test_compile_json_rejects_bad_input() {
    let failure = compile_json("{ \"kind\": ", &CompileOptions::default()).unwrap_err();
    assert_eq!(failure.diagnostics.len(), 1);
    assert!(failure.diagnostics[0].is_error());
    assert!(failure.partial_listing.is_empty());
}
