// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Generic pre-order traversal over the AST.
//!
//! The tree has several node enums ([`Statement`], [`Declaration`],
//! [`Expression`], [`Pattern`], [`Type`] and [`FjxElement`]). [`Node`]
//! borrows any one of them so a single visitor closure can see the whole
//! tree:
//!
//! ```
//! use fujin_syntax::ast_walker::{Node, walk_program};
//! use fujin_syntax::source_analysis::Dialect;
//!
//! let output = fujin_syntax::parse_str("emit a + b;", Dialect::Actor);
//! let mut expressions = 0;
//! walk_program(&output.program, &mut |node| {
//!     if matches!(node, Node::Expression(_)) {
//!         expressions += 1;
//!     }
//! });
//! assert_eq!(expressions, 3);
//! ```
//!
//! Helper structs that are not node enums (declarators, parameters, switch
//! cases, type members, attributes) are flattened: their contents become
//! children of the enclosing node, in source order.

use crate::ast::{
    ArrowBody, Block, Declaration, Element, ExportDeclaration, Expression, FjxAttributeValue,
    FjxChild, FjxElement, ForInit, Function, ObjectMember, ObjectPatternProperty, Parameter,
    Pattern, PatternElement, Program, Statement, TemplateLiteral, TemplatePart, TupleElement, Type,
    TypeMember, TypeParameter, VariableDeclarator,
};
use crate::source_analysis::Span;

/// A borrowed reference to any AST node.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Statement(&'a Statement),
    Declaration(&'a Declaration),
    Expression(&'a Expression),
    Pattern(&'a Pattern),
    Type(&'a Type),
    Fjx(&'a FjxElement),
}

impl<'a> Node<'a> {
    /// Returns the span of the borrowed node.
    #[must_use]
    pub fn span(self) -> Span {
        match self {
            Self::Statement(statement) => statement.span(),
            Self::Declaration(declaration) => declaration.span(),
            Self::Expression(expression) => expression.span(),
            Self::Pattern(pattern) => pattern.span(),
            Self::Type(ty) => ty.span(),
            Self::Fjx(element) => element.span,
        }
    }

    /// Returns true for the error node of any kind.
    #[must_use]
    pub const fn is_error(self) -> bool {
        match self {
            Self::Statement(statement) => statement.is_error(),
            Self::Expression(expression) => expression.is_error(),
            Self::Pattern(pattern) => pattern.is_error(),
            Self::Type(ty) => ty.is_error(),
            Self::Declaration(_) | Self::Fjx(_) => false,
        }
    }

    /// Returns the direct children of this node in source order.
    #[must_use]
    pub fn children(self) -> Vec<Self> {
        let mut out = Vec::new();
        match self {
            Self::Statement(statement) => statement_children(statement, &mut out),
            Self::Declaration(declaration) => declaration_children(declaration, &mut out),
            Self::Expression(expression) => expression_children(expression, &mut out),
            Self::Pattern(pattern) => pattern_children(pattern, &mut out),
            Self::Type(ty) => type_children(ty, &mut out),
            Self::Fjx(element) => fjx_children(element, &mut out),
        }
        out
    }
}

/// Walks `node` and all of its descendants in pre-order.
pub fn walk<'a>(node: Node<'a>, f: &mut impl FnMut(Node<'a>)) {
    f(node);
    for child in node.children() {
        walk(child, f);
    }
}

/// Walks every top-level statement of `program` in pre-order.
pub fn walk_program<'a>(program: &'a Program, f: &mut impl FnMut(Node<'a>)) {
    for statement in &program.statements {
        walk(Node::Statement(statement), f);
    }
}

/// Returns true if the tree contains an error node anywhere.
#[must_use]
pub fn contains_error(program: &Program) -> bool {
    let mut found = false;
    walk_program(program, &mut |node| found |= node.is_error());
    found
}

// ============================================================================
// Children
// ============================================================================

fn block<'a>(block: &'a Block, out: &mut Vec<Node<'a>>) {
    out.extend(block.statements.iter().map(Node::Statement));
}

fn statement_children<'a>(statement: &'a Statement, out: &mut Vec<Node<'a>>) {
    match statement {
        Statement::Declaration(declaration) => out.push(Node::Declaration(declaration)),
        Statement::Expression { expression, .. } => out.push(Node::Expression(expression)),
        Statement::Block(b) => block(b, out),
        Statement::If {
            condition,
            consequent,
            alternate,
            ..
        } => {
            out.push(Node::Expression(condition));
            out.push(Node::Statement(consequent));
            if let Some(alternate) = alternate {
                out.push(Node::Statement(alternate));
            }
        }
        Statement::For {
            init,
            condition,
            update,
            body,
            ..
        } => {
            match init {
                Some(ForInit::Declaration(declaration)) => {
                    for declarator in &declaration.declarators {
                        declarator_children(declarator, out);
                    }
                }
                Some(ForInit::Expression(expression)) => out.push(Node::Expression(expression)),
                None => {}
            }
            out.extend(condition.iter().map(Node::Expression));
            out.extend(update.iter().map(Node::Expression));
            out.push(Node::Statement(body));
        }
        Statement::Switch {
            discriminant,
            cases,
            ..
        } => {
            out.push(Node::Expression(discriminant));
            for case in cases {
                out.extend(case.test.iter().map(Node::Expression));
                out.extend(case.body.iter().map(Node::Statement));
            }
        }
        Statement::Try {
            block: protected,
            handler,
            finalizer,
            ..
        } => {
            block(protected, out);
            if let Some(handler) = handler {
                out.extend(handler.parameter.iter().map(Node::Pattern));
                block(&handler.body, out);
            }
            if let Some(finalizer) = finalizer {
                block(finalizer, out);
            }
        }
        Statement::Return { argument, .. } => out.extend(argument.iter().map(Node::Expression)),
        Statement::Throw { argument, .. } => out.push(Node::Expression(argument)),
        Statement::Emit { message, .. } => out.push(Node::Expression(message)),
        Statement::Assert {
            condition, message, ..
        } => {
            out.push(Node::Expression(condition));
            out.extend(message.iter().map(Node::Expression));
        }
        Statement::Export(export) => match export {
            ExportDeclaration::Declaration { declaration, .. } => {
                out.push(Node::Declaration(declaration));
            }
            ExportDeclaration::DefaultExpression { expression, .. } => {
                out.push(Node::Expression(expression));
            }
            ExportDeclaration::All { .. } | ExportDeclaration::Named { .. } => {}
        },
        Statement::Empty { .. }
        | Statement::Break { .. }
        | Statement::Continue { .. }
        | Statement::Import(_)
        | Statement::Error { .. } => {}
    }
}

fn declaration_children<'a>(declaration: &'a Declaration, out: &mut Vec<Node<'a>>) {
    match declaration {
        Declaration::Lexical(lexical) => {
            for declarator in &lexical.declarators {
                declarator_children(declarator, out);
            }
        }
        Declaration::Actor(actor) => {
            type_parameters(&actor.type_parameters, out);
            if let Some(parameters) = &actor.parameters {
                parameter_list(parameters, out);
            }
            block(&actor.body, out);
        }
        Declaration::TypeAlias(alias) => {
            type_parameters(&alias.type_parameters, out);
            out.push(Node::Type(&alias.value));
        }
        Declaration::Function(function) => function_children(function, out),
        Declaration::Interface(interface) => {
            type_parameters(&interface.type_parameters, out);
            out.extend(interface.extends.iter().map(Node::Type));
            for member in &interface.members {
                type_member(member, out);
            }
        }
    }
}

fn declarator_children<'a>(declarator: &'a VariableDeclarator, out: &mut Vec<Node<'a>>) {
    out.push(Node::Pattern(&declarator.target));
    out.extend(declarator.type_annotation.iter().map(Node::Type));
    out.extend(declarator.init.iter().map(Node::Expression));
}

fn function_children<'a>(function: &'a Function, out: &mut Vec<Node<'a>>) {
    type_parameters(&function.type_parameters, out);
    parameter_list(&function.parameters, out);
    out.extend(function.return_type.iter().map(Node::Type));
    block(&function.body, out);
}

fn type_parameters<'a>(parameters: &'a [TypeParameter], out: &mut Vec<Node<'a>>) {
    for parameter in parameters {
        out.extend(parameter.constraint.iter().map(Node::Type));
    }
}

fn parameter_list<'a>(parameters: &'a [Parameter], out: &mut Vec<Node<'a>>) {
    for parameter in parameters {
        out.push(Node::Pattern(&parameter.pattern));
        out.extend(parameter.type_annotation.iter().map(Node::Type));
        out.extend(parameter.default.iter().map(Node::Expression));
    }
}

fn template<'a>(template: &'a TemplateLiteral, out: &mut Vec<Node<'a>>) {
    for part in &template.parts {
        if let TemplatePart::Substitution { expression, .. } = part {
            out.push(Node::Expression(expression));
        }
    }
}

fn elements<'a>(elements: &'a [Element], out: &mut Vec<Node<'a>>) {
    for element in elements {
        match element {
            Element::Item(expression) | Element::Spread { argument: expression, .. } => {
                out.push(Node::Expression(expression));
            }
            Element::Hole(_) => {}
        }
    }
}

fn expression_children<'a>(expression: &'a Expression, out: &mut Vec<Node<'a>>) {
    match expression {
        Expression::Template(t) => template(t, out),
        Expression::Array { elements: items, .. } => elements(items, out),
        Expression::Object { members, .. } => {
            for member in members {
                match member {
                    ObjectMember::Property { value, .. } => out.push(Node::Expression(value)),
                    ObjectMember::Spread { argument, .. } => out.push(Node::Expression(argument)),
                    ObjectMember::Shorthand(_) => {}
                }
            }
        }
        Expression::Function(function) => function_children(function, out),
        Expression::Arrow(arrow) => {
            type_parameters(&arrow.type_parameters, out);
            parameter_list(&arrow.parameters, out);
            out.extend(arrow.return_type.iter().map(Node::Type));
            match &arrow.body {
                ArrowBody::Expression(body) => out.push(Node::Expression(body)),
                ArrowBody::Block(body) => block(body, out),
            }
        }
        Expression::Parenthesized { expression, .. } => out.push(Node::Expression(expression)),
        Expression::Sequence { expressions, .. } => {
            out.extend(expressions.iter().map(Node::Expression));
        }
        Expression::Unary { operand, .. } | Expression::Update { operand, .. } => {
            out.push(Node::Expression(operand));
        }
        Expression::Await { argument, .. } => out.push(Node::Expression(argument)),
        Expression::Binary { left, right, .. } => {
            out.push(Node::Expression(left));
            out.push(Node::Expression(right));
        }
        Expression::Assignment { target, value, .. } => {
            out.push(Node::Pattern(target));
            out.push(Node::Expression(value));
        }
        Expression::Conditional {
            test,
            consequent,
            alternate,
            ..
        } => {
            out.push(Node::Expression(test));
            out.push(Node::Expression(consequent));
            out.push(Node::Expression(alternate));
        }
        Expression::Member { object, .. } => out.push(Node::Expression(object)),
        Expression::Subscript { object, index, .. } => {
            out.push(Node::Expression(object));
            out.push(Node::Expression(index));
        }
        Expression::Call {
            callee, arguments, ..
        } => {
            out.push(Node::Expression(callee));
            elements(arguments, out);
        }
        Expression::TaggedTemplate {
            tag, template: t, ..
        } => {
            out.push(Node::Expression(tag));
            template(t, out);
        }
        Expression::Fjx(element) => out.push(Node::Fjx(element)),
        Expression::Identifier(_)
        | Expression::ActionIdentifier(_)
        | Expression::Meta { .. }
        | Expression::Number { .. }
        | Expression::String(_)
        | Expression::Boolean { .. }
        | Expression::Null { .. }
        | Expression::Regex { .. }
        | Expression::Error { .. } => {}
    }
}

fn pattern_children<'a>(pattern: &'a Pattern, out: &mut Vec<Node<'a>>) {
    match pattern {
        Pattern::Object { properties, .. } => {
            for property in properties {
                match property {
                    ObjectPatternProperty::Pair { value, .. } => out.push(Node::Pattern(value)),
                    ObjectPatternProperty::Shorthand { default, .. } => {
                        out.extend(default.iter().map(Node::Expression));
                    }
                }
            }
        }
        Pattern::Array { elements, .. } => {
            for element in elements {
                match element {
                    PatternElement::Item(pattern) | PatternElement::Rest { pattern, .. } => {
                        out.push(Node::Pattern(pattern));
                    }
                    PatternElement::Hole(_) => {}
                }
            }
        }
        Pattern::Assignment {
            target, default, ..
        } => {
            out.push(Node::Pattern(target));
            out.push(Node::Expression(default));
        }
        Pattern::Expression(expression) => out.push(Node::Expression(expression)),
        Pattern::Identifier(_) | Pattern::Error { .. } => {}
    }
}

fn type_member<'a>(member: &'a TypeMember, out: &mut Vec<Node<'a>>) {
    match member {
        TypeMember::Property {
            type_annotation, ..
        } => out.extend(type_annotation.iter().map(Node::Type)),
        TypeMember::Method {
            type_parameters: generics,
            parameters,
            return_type,
            ..
        }
        | TypeMember::Call {
            type_parameters: generics,
            parameters,
            return_type,
            ..
        } => {
            type_parameters(generics, out);
            parameter_list(parameters, out);
            out.extend(return_type.iter().map(Node::Type));
        }
    }
}

fn type_children<'a>(ty: &'a Type, out: &mut Vec<Node<'a>>) {
    match ty {
        Type::Reference { arguments, .. } => out.extend(arguments.iter().map(Node::Type)),
        Type::Object { members, .. } => {
            for member in members {
                type_member(member, out);
            }
        }
        Type::Array { element, .. } => out.push(Node::Type(element)),
        Type::Tuple { elements, .. } => {
            for element in elements {
                match element {
                    TupleElement::Type(ty) | TupleElement::Rest { element: ty, .. } => {
                        out.push(Node::Type(ty));
                    }
                }
            }
        }
        Type::Union { left, right, .. } | Type::Intersection { left, right, .. } => {
            out.push(Node::Type(left));
            out.push(Node::Type(right));
        }
        Type::Function {
            type_parameters: generics,
            parameters,
            return_type,
            ..
        } => {
            type_parameters(generics, out);
            parameter_list(parameters, out);
            out.push(Node::Type(return_type));
        }
        Type::Parenthesized { inner, .. } => out.push(Node::Type(inner)),
        Type::Predefined { .. } | Type::Literal { .. } | Type::Error { .. } => {}
    }
}

fn fjx_children<'a>(element: &'a FjxElement, out: &mut Vec<Node<'a>>) {
    for attribute in &element.attributes {
        if let FjxAttributeValue::Expression { expression, .. } = &attribute.value {
            out.push(Node::Expression(expression));
        }
    }
    for child in &element.children {
        match child {
            FjxChild::Element(nested) => out.push(Node::Fjx(nested)),
            FjxChild::Expression { expression, .. } => out.push(Node::Expression(expression)),
            FjxChild::Text { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_str;
    use crate::source_analysis::Dialect;

    fn kinds(source: &str, dialect: Dialect) -> Vec<&'static str> {
        let output = parse_str(source, dialect);
        let mut kinds = Vec::new();
        walk_program(&output.program, &mut |node| {
            kinds.push(match node {
                Node::Statement(_) => "statement",
                Node::Declaration(_) => "declaration",
                Node::Expression(_) => "expression",
                Node::Pattern(_) => "pattern",
                Node::Type(_) => "type",
                Node::Fjx(_) => "fjx",
            });
        });
        kinds
    }

    #[test]
    fn visits_in_pre_order() {
        assert_eq!(
            kinds("let x: u8 = 1;", Dialect::Actor),
            ["statement", "declaration", "pattern", "type", "expression"]
        );
    }

    #[test]
    fn visits_markup_children() {
        assert_eq!(
            kinds("emit <a>{b}</a>;", Dialect::Actor),
            ["statement", "expression", "fjx", "expression"]
        );
    }

    #[test]
    fn visits_function_parts() {
        assert_eq!(
            kinds("function f(a: T) { return a; }", Dialect::Full),
            ["statement", "declaration", "pattern", "type", "statement", "expression"]
        );
    }

    #[test]
    fn finds_error_nodes() {
        let output = parse_str("let x = ;", Dialect::Actor);
        assert!(contains_error(&output.program));
        let output = parse_str("let x = 1;", Dialect::Actor);
        assert!(!contains_error(&output.program));
    }

    fn assert_nested(source: &str, dialect: Dialect) {
        let output = parse_str(source, dialect);
        walk_program(&output.program, &mut |node| {
            let span = node.span();
            for child in node.children() {
                let inner = child.span();
                assert!(
                    span.contains(inner),
                    "{inner:?} escapes {span:?} in {source:?}"
                );
            }
        });
    }

    #[test]
    fn children_lie_within_parent() {
        let source = "actor @main(n: u8) { for (let i = 0; i < n; i = i + 1) { emit <p>{i}</p>; } }";
        let output = parse_str(source, Dialect::Actor);
        assert!(output.diagnostics.is_empty(), "{:#?}", output.diagnostics);
        assert_nested(source, Dialect::Actor);
    }

    #[test]
    fn recovered_nodes_lie_within_parent() {
        for source in [
            "let x = \"abc",
            "let x = ",
            "if (a) ",
            "emit (1 + ",
            "let x = 1 + /* open",
            "let = 5;",
            "let x: = 1;",
            "actor @a(: u8) { }",
            "type T = ",
            "emit <p>{",
        ] {
            assert_nested(source, Dialect::Actor);
        }
        for source in ["function f(: number) { return", "let g = (a, b) =>"] {
            assert_nested(source, Dialect::Full);
        }
    }
}
