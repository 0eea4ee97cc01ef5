// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Sample-program tests.
//!
//! Every file in `cases/` is checked against its own `expect:` directives;
//! the named tests below look more closely at the behaviour each case was
//! written for.

use fujin_syntax::ast::{
    Declaration, Expression, FjxChild, Pattern, Statement, TemplatePart, Type,
};
use fujin_syntax::ast_walker::{Node, contains_error, walk_program};
use fujin_syntax::source_analysis::{DiagnosticKind, SourceBuffer};
use test_package_syntax::{Case, load, load_all, outline};

fn case(name: &str) -> Case {
    load(name).unwrap_or_else(|e| panic!("failed to load case '{name}': {e}"))
}

#[test]
fn every_case_meets_its_expectations() {
    let cases = load_all().expect("cases directory should be readable");
    assert!(cases.len() >= 10, "found only {} cases", cases.len());
    let failures: Vec<String> = cases.iter().flat_map(Case::failures).collect();
    assert!(failures.is_empty(), "{}", failures.join("\n\n"));
}

#[test]
fn clean_cases_have_no_error_nodes() {
    for case in load_all().expect("cases directory should be readable") {
        let output = case.parse();
        if output.diagnostics.is_empty() {
            assert!(
                !contains_error(&output.program),
                "{} has error nodes without diagnostics",
                case.name
            );
        }
    }
}

#[test]
fn asi_splits_declarations_on_newlines() {
    insta::assert_snapshot!(outline(&case("asi_two_declarations").parse()), @r"
    lexical
    lexical
    ");
}

#[test]
fn asi_continues_after_trailing_operator() {
    let output = case("asi_continuation").parse();
    let Statement::Declaration(Declaration::Lexical(decl)) = &output.program.statements[0] else {
        panic!("expected declaration");
    };
    assert!(matches!(
        decl.declarators[0].init,
        Some(Expression::Binary { .. })
    ));
}

#[test]
fn slash_is_division_after_operand_and_regex_after_return() {
    let output = case("regex_vs_division").parse();
    let mut divisions = 0;
    let mut regexes = Vec::new();
    walk_program(&output.program, &mut |node| {
        if let Node::Expression(expression) = node {
            match expression {
                Expression::Binary { operator, .. } if operator.as_str() == "/" => divisions += 1,
                Expression::Regex { pattern, flags, .. } => {
                    regexes.push((pattern.to_string(), flags.to_string()));
                }
                _ => {}
            }
        }
    });
    assert_eq!(divisions, 2);
    assert_eq!(regexes, [("ab+c".to_string(), "gi".to_string())]);
}

#[test]
fn markup_elements_nest() {
    let output = case("fjx_tags").parse();
    let Statement::Emit {
        message: Expression::Fjx(list),
        ..
    } = &output.program.statements[1]
    else {
        panic!("expected emitted markup");
    };
    assert_eq!(list.attributes.len(), 1);
    let elements = list
        .children
        .iter()
        .filter(|child| matches!(child, FjxChild::Element(_)))
        .count();
    assert_eq!(elements, 3);
    assert!(list.closing_name.is_some());
}

#[test]
fn mismatched_tag_is_reported_at_closing_name() {
    let output = case("fjx_mismatched_tag").parse();
    let diagnostic = &output.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::Syntax);
    assert_eq!(diagnostic.start.line, 3);
    let source = SourceBuffer::new(case("fjx_mismatched_tag").source);
    assert_eq!(source.slice(diagnostic.span), "span");
}

#[test]
fn object_pattern_takes_type_annotation() {
    let output = case("pattern_type_reuse").parse();
    let Statement::Declaration(Declaration::Lexical(decl)) = &output.program.statements[0] else {
        panic!("expected declaration");
    };
    let declarator = &decl.declarators[0];
    assert!(matches!(declarator.target, Pattern::Object { .. }));
    assert!(matches!(
        declarator.type_annotation,
        Some(Type::Reference { ref name, .. }) if name.name == "T"
    ));
    assert!(matches!(
        output.program.statements[2],
        Statement::Expression {
            expression: Expression::Assignment { .. },
            ..
        }
    ));
}

#[test]
fn arrow_needs_arrow_token() {
    let output = case("arrow_backtrack").parse();
    let inits: Vec<&Expression> = output
        .program
        .statements
        .iter()
        .filter_map(|statement| match statement {
            Statement::Declaration(Declaration::Lexical(decl)) => decl.declarators[0].init.as_ref(),
            _ => None,
        })
        .collect();
    assert!(matches!(inits[0], Expression::Arrow(_)));
    assert!(matches!(
        inits[1].unparenthesized(),
        Expression::Sequence { expressions, .. } if expressions.len() == 2
    ));
    let Expression::Arrow(typed) = inits[2] else {
        panic!("expected arrow");
    };
    assert_eq!(typed.parameters.len(), 2);
    assert!(typed.return_type.is_some());
}

#[test]
fn unterminated_string_leaves_error_marked_declarator() {
    let output = case("unterminated_string").parse();
    assert_eq!(output.diagnostics[0].kind, DiagnosticKind::Lexical);
    let Statement::Declaration(Declaration::Lexical(decl)) = &output.program.statements[0] else {
        panic!("expected declaration");
    };
    assert!(decl.declarators[0].init.as_ref().is_some_and(Expression::is_error));
}

#[test]
fn missing_handler_is_structural() {
    let output = case("try_without_handler").parse();
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::Structural)
    );
}

#[test]
fn hashbang_is_kept_out_of_statements() {
    let output = case("hashbang").parse();
    let hashbang = output.program.hashbang.expect("hashbang");
    assert_eq!(hashbang.text, "#!/usr/bin/env fujin");
    assert_eq!(output.program.statements.len(), 1);
}

#[test]
fn actor_program_outline() {
    insta::assert_snapshot!(outline(&case("counter_actor").parse()), @r"
    import
    type
    type
    actor
    export declaration
    ");
}

#[test]
fn full_program_outline() {
    insta::assert_snapshot!(outline(&case("full_module").parse()), @r"
    import
    import
    export declaration
    type
    type
    export declaration
    lexical
    lexical
    lexical
    lexical
    lexical
    for
    export
    export
    ");
}

#[test]
fn template_parts_alternate() {
    let output = case("full_module").parse();
    let mut templates = Vec::new();
    walk_program(&output.program, &mut |node| {
        if let Node::Expression(Expression::Template(template)) = node {
            templates.push(template.parts.clone());
        }
    });
    let parts = &templates[0];
    // `item ${n + 1} of ${total}`: no empty text after the last substitution.
    assert_eq!(parts.len(), 4);
    assert!(matches!(parts[1], TemplatePart::Substitution { .. }));
    assert!(matches!(parts[2], TemplatePart::Text { ref raw, .. } if raw == " of "));
    assert!(matches!(parts[3], TemplatePart::Substitution { .. }));
}

#[test]
fn diagnostics_render_with_source() {
    let case = case("reserved_word");
    let output = case.parse();
    let source = SourceBuffer::named(case.path.as_str(), case.source.as_str());
    let report = format!("{:?}", output.diagnostics[0].to_report(&source));
    assert!(report.contains("reserved word"), "{report}");
}
