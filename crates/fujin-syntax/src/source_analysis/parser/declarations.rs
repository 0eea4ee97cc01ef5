// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Declarations and module items.

use ecow::EcoString;

use crate::ast::{
    ActorDeclaration, Declaration, DeclarationKind, ExportDeclaration, ExportSpecifier, Function,
    Identifier, ImportClause, ImportDeclaration, ImportSpecifier, Interface, LexicalDeclaration,
    ModuleExportName, StringLiteral, TypeAlias, TypeAliasName, VariableDeclarator,
};
use crate::source_analysis::{Keyword, Span, TokenKind};

use super::{Parser, action_name};

impl Parser<'_> {
    // ========================================================================
    // Variables
    // ========================================================================

    /// `let a = 1, {b}: T = c` with an optional terminator, which a `for`
    /// initializer does not have.
    pub(super) fn parse_lexical_declaration(&mut self, terminated: bool) -> LexicalDeclaration {
        let token = self.advance();
        let kind = if token.is_keyword(Keyword::Const) {
            DeclarationKind::Const
        } else {
            DeclarationKind::Let
        };
        let mut declarators = vec![self.parse_variable_declarator()];
        while self.match_token(TokenKind::Comma) {
            declarators.push(self.parse_variable_declarator());
        }
        if terminated {
            self.end_statement();
        }
        LexicalDeclaration {
            kind,
            declarators,
            span: self.span_from(token.span()),
        }
    }

    fn parse_variable_declarator(&mut self) -> VariableDeclarator {
        let start = self.current_span();
        let target = self.parse_binding_pattern();
        let type_annotation = self
            .match_token(TokenKind::Colon)
            .then(|| self.parse_type());
        let init = self
            .match_token(TokenKind::Equal)
            .then(|| self.parse_assignment());
        // A missing target sits before `start`.
        let span = self.span_from(start).merge(target.span());
        VariableDeclarator {
            target,
            type_annotation,
            init,
            span,
        }
    }

    // ========================================================================
    // Actors
    // ========================================================================

    /// `actor @name | @alias <T> (params) { body }`
    pub(super) fn parse_actor_declaration(&mut self) -> ActorDeclaration {
        let start = self.advance().span();
        let mut names = Vec::new();
        loop {
            names.extend(self.parse_action_identifier("actor name"));
            if !self.match_token(TokenKind::Pipe) {
                break;
            }
        }
        let type_parameters = if self.check(TokenKind::Less) {
            self.parse_type_parameters()
        } else {
            Vec::new()
        };
        let parameters = self
            .check(TokenKind::LeftParen)
            .then(|| self.parse_formal_parameters());
        let body = self.parse_block();
        ActorDeclaration {
            names,
            type_parameters,
            parameters,
            body,
            span: self.span_from(start),
        }
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// `type Name<T> = Type;` or `type @annotation(Name) = Type;`
    pub(super) fn parse_type_alias(&mut self) -> TypeAlias {
        let start = self.advance().span();
        let name = self.parse_type_alias_name();
        let type_parameters = if self.check(TokenKind::Less) {
            self.parse_type_parameters()
        } else {
            Vec::new()
        };
        self.expect(TokenKind::Equal, "`=`");
        let value = self.parse_type();
        self.end_statement();
        TypeAlias {
            name,
            type_parameters,
            value,
            span: self.span_from(start),
        }
    }

    fn parse_type_alias_name(&mut self) -> TypeAliasName {
        let start = self.current_span();
        let annotation = match self.current_kind() {
            TokenKind::ActionIdentifier => Some(action_name(&self.advance())),
            TokenKind::At => {
                self.advance();
                self.parse_identifier("annotation name")
            }
            _ => None,
        };
        let Some(annotation) = annotation else {
            let name = self
                .parse_identifier("type name")
                .unwrap_or_else(|| Identifier::new("", self.missing_span()));
            return TypeAliasName::Plain(name);
        };
        self.expect(TokenKind::LeftParen, "`(`");
        let target = self
            .parse_identifier("annotated type name")
            .unwrap_or_else(|| Identifier::new("", self.missing_span()));
        self.expect(TokenKind::RightParen, "`)`");
        TypeAliasName::Annotated {
            annotation,
            target,
            span: self.span_from(start),
        }
    }

    /// `interface Name<T> extends A, B { members }`
    pub(super) fn parse_interface_declaration(&mut self) -> Interface {
        let start = self.advance().span();
        let name = self
            .parse_identifier("interface name")
            .unwrap_or_else(|| Identifier::new("", self.missing_span()));
        let type_parameters = if self.check(TokenKind::Less) {
            self.parse_type_parameters()
        } else {
            Vec::new()
        };
        let mut extends = Vec::new();
        if self.match_keyword(Keyword::Extends) {
            extends.push(self.parse_type());
            while self.match_token(TokenKind::Comma) {
                extends.push(self.parse_type());
            }
        }
        let members = self.parse_type_members();
        Interface {
            name,
            type_parameters,
            extends,
            members,
            span: self.span_from(start),
        }
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// Parses a function after `function` (and `async`), which start at
    /// `start`. Declarations require a name.
    pub(super) fn parse_function_rest(
        &mut self,
        start: Span,
        is_async: bool,
        require_name: bool,
    ) -> Function {
        let name = if self.check(TokenKind::Identifier) || require_name {
            self.parse_identifier("function name")
        } else {
            None
        };
        let type_parameters = if self.check(TokenKind::Less) {
            self.parse_type_parameters()
        } else {
            Vec::new()
        };
        let parameters = self.parse_formal_parameters();
        let return_type = self
            .match_token(TokenKind::Colon)
            .then(|| self.parse_type());
        let body = self.parse_block();
        Function {
            is_async,
            name,
            type_parameters,
            parameters,
            return_type,
            body,
            span: self.span_from(start),
        }
    }

    // ========================================================================
    // Imports
    // ========================================================================

    /// `import "src";`, `import a, {b as c} from "src";`, `import * as ns from "src";`
    pub(super) fn parse_import_declaration(&mut self) -> ImportDeclaration {
        let start = self.advance().span();
        let clause = if self.check(TokenKind::StringStart) {
            None
        } else {
            Some(self.parse_import_clause())
        };
        if clause.is_some() {
            self.expect_keyword(Keyword::From);
        }
        let source = self.parse_module_source();
        self.end_statement();
        ImportDeclaration {
            clause,
            source,
            span: self.span_from(start),
        }
    }

    fn parse_import_clause(&mut self) -> ImportClause {
        let start = self.current_span();
        let mut clause = ImportClause {
            default: None,
            namespace: None,
            named: None,
            span: start,
        };
        if self.check(TokenKind::Identifier) {
            clause.default = self.parse_identifier("default import name");
            if !self.match_token(TokenKind::Comma) {
                clause.span = self.span_from(start);
                return clause;
            }
        }
        match self.current_kind() {
            TokenKind::Star => {
                self.advance();
                self.expect_keyword(Keyword::As);
                clause.namespace = self.parse_identifier("namespace name");
            }
            TokenKind::LeftBrace => {
                self.advance();
                clause.named = Some(self.parse_delimited(TokenKind::RightBrace, |parser| {
                    parser.parse_import_specifier()
                }));
            }
            _ => self.error_expected("import clause"),
        }
        clause.span = self.span_from(start);
        clause
    }

    fn parse_import_specifier(&mut self) -> Option<ImportSpecifier> {
        let start = self.current_span();
        let name = self.parse_module_export_name()?;
        let alias = if self.match_keyword(Keyword::As) {
            self.parse_identifier("import alias")
        } else {
            if !matches!(name, ModuleExportName::Identifier(_)) {
                self.error_expected("`as`");
            }
            None
        };
        Some(ImportSpecifier {
            name,
            alias,
            span: self.span_from(start),
        })
    }

    fn parse_module_source(&mut self) -> StringLiteral {
        self.parse_string_literal().unwrap_or_else(|| StringLiteral {
            value: EcoString::new(),
            raw: EcoString::new(),
            span: self.missing_span(),
        })
    }

    /// An identifier, string or `default`.
    fn parse_module_export_name(&mut self) -> Option<ModuleExportName> {
        match self.current_kind() {
            TokenKind::StringStart => self.parse_string_literal().map(ModuleExportName::String),
            TokenKind::Keyword(Keyword::Default) => {
                Some(ModuleExportName::Default(self.advance().span()))
            }
            _ => self
                .parse_identifier("name")
                .map(ModuleExportName::Identifier),
        }
    }

    // ========================================================================
    // Exports
    // ========================================================================

    pub(super) fn parse_export_declaration(&mut self) -> ExportDeclaration {
        let start = self.advance().span();
        match self.current_kind() {
            TokenKind::Star => {
                self.advance();
                let alias = if self.match_keyword(Keyword::As) {
                    self.parse_module_export_name()
                } else {
                    None
                };
                self.expect_keyword(Keyword::From);
                let source = self.parse_module_source();
                self.end_statement();
                ExportDeclaration::All {
                    alias,
                    source,
                    span: self.span_from(start),
                }
            }
            TokenKind::LeftBrace => {
                self.advance();
                let specifiers = self.parse_delimited(TokenKind::RightBrace, |parser| {
                    parser.parse_export_specifier()
                });
                let source = self
                    .match_keyword(Keyword::From)
                    .then(|| self.parse_module_source());
                self.end_statement();
                ExportDeclaration::Named {
                    specifiers,
                    source,
                    span: self.span_from(start),
                }
            }
            TokenKind::Keyword(Keyword::Default) => {
                self.advance();
                if self.at_declaration_start() {
                    return self.finish_export_declaration(start, true);
                }
                let expression = self.parse_assignment();
                self.end_statement();
                ExportDeclaration::DefaultExpression {
                    expression,
                    span: self.span_from(start),
                }
            }
            _ => self.finish_export_declaration(start, false),
        }
    }

    fn finish_export_declaration(&mut self, start: Span, default: bool) -> ExportDeclaration {
        let declaration = self.parse_declaration().unwrap_or_else(|| {
            self.synchronize();
            Declaration::Lexical(LexicalDeclaration {
                kind: DeclarationKind::Const,
                declarators: Vec::new(),
                span: Span::empty_at(start.end()),
            })
        });
        ExportDeclaration::Declaration {
            declaration,
            default,
            span: self.span_from(start),
        }
    }

    fn parse_export_specifier(&mut self) -> Option<ExportSpecifier> {
        let start = self.current_span();
        let name = self.parse_module_export_name()?;
        let alias = if self.match_keyword(Keyword::As) {
            self.parse_module_export_name()
        } else {
            None
        };
        Some(ExportSpecifier {
            name,
            alias,
            span: self.span_from(start),
        })
    }

    fn at_declaration_start(&mut self) -> bool {
        match self.current_kind() {
            TokenKind::Keyword(
                Keyword::Let
                | Keyword::Const
                | Keyword::Actor
                | Keyword::Type
                | Keyword::Function
                | Keyword::Interface,
            ) => true,
            TokenKind::Keyword(Keyword::Async) => {
                self.peek_kind(1) == TokenKind::Keyword(Keyword::Function)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{parse_err, parse_full_err, parse_full_ok, parse_ok};
    use crate::ast::{Pattern, Program, Statement, Type};

    use super::*;

    fn declaration(program: &Program) -> &Declaration {
        match &program.statements[0] {
            Statement::Declaration(declaration) => declaration,
            other => panic!("expected declaration, got {other:?}"),
        }
    }

    #[test]
    fn lexical_declarations() {
        let program = parse_ok("const a = 1, b: u8, [c] = d;");
        let Declaration::Lexical(decl) = declaration(&program) else {
            panic!("expected lexical declaration");
        };
        assert_eq!(decl.kind, DeclarationKind::Const);
        assert_eq!(decl.declarators.len(), 3);
        assert!(decl.declarators[1].init.is_none());
        assert!(matches!(decl.declarators[2].target, Pattern::Array { .. }));
    }

    #[test]
    fn actor_declarations() {
        let program =
            parse_ok("actor @main | @start <T> (count: u8, label = \"x\") { emit count; }");
        let Declaration::Actor(actor) = declaration(&program) else {
            panic!("expected actor");
        };
        let names: Vec<_> = actor.names.iter().map(|name| name.name.as_str()).collect();
        assert_eq!(names, ["main", "start"]);
        assert_eq!(actor.type_parameters.len(), 1);
        assert_eq!(actor.parameters.as_ref().map(Vec::len), Some(2));
        assert_eq!(actor.body.statements.len(), 1);

        let program = parse_ok("actor @idle {}");
        let Declaration::Actor(actor) = declaration(&program) else {
            panic!("expected actor");
        };
        assert!(actor.parameters.is_none());
    }

    #[test]
    fn actor_requires_action_name() {
        let diagnostics = parse_err("actor main {}");
        assert!(diagnostics[0].message.contains("expected actor name"));
    }

    #[test]
    fn annotated_type_alias() {
        let program = parse_ok("type @doc(Point) = { x: f64, y: f64 };");
        let Declaration::TypeAlias(alias) = declaration(&program) else {
            panic!("expected type alias");
        };
        assert!(matches!(
            &alias.name,
            TypeAliasName::Annotated { annotation, target, .. }
                if annotation.name == "doc" && target.name == "Point"
        ));
        assert!(matches!(alias.value, Type::Object { .. }));
    }

    #[test]
    fn function_declarations() {
        let program =
            parse_full_ok("async function load<T>(url: string): Promise<T> { return fetch(url); }");
        let Declaration::Function(function) = declaration(&program) else {
            panic!("expected function");
        };
        assert!(function.is_async);
        assert_eq!(function.name.as_ref().map(|n| n.name.as_str()), Some("load"));
        assert_eq!(function.type_parameters.len(), 1);
        assert!(function.return_type.is_some());

        let diagnostics = parse_full_err("function () {}");
        assert!(diagnostics[0].message.contains("expected function name"));
    }

    #[test]
    fn interface_declarations() {
        let program = parse_full_ok(
            "interface Shape<T> extends Base, Named {\n  area(): number\n  name?: string\n}",
        );
        let Declaration::Interface(interface) = declaration(&program) else {
            panic!("expected interface");
        };
        assert_eq!(interface.extends.len(), 2);
        assert_eq!(interface.members.len(), 2);
    }

    #[test]
    fn import_forms() {
        let sources = [
            "import \"side-effect\";",
            "import a from \"m\";",
            "import * as ns from \"m\";",
            "import {a, b as c, \"d e\" as f, default as g,} from \"m\";",
            "import a, {b} from \"m\";",
            "import a, * as ns from \"m\";",
        ];
        for source in sources {
            let program = parse_ok(source);
            assert!(matches!(program.statements[0], Statement::Import(_)), "{source}");
        }
        let program = parse_ok("import a, {b as c} from \"m\";");
        let Statement::Import(import) = &program.statements[0] else {
            panic!("expected import");
        };
        let clause = import.clause.as_ref().expect("clause");
        assert!(clause.default.is_some());
        assert_eq!(clause.named.as_ref().map(Vec::len), Some(1));
        assert_eq!(import.source.value, "m");
    }

    #[test]
    fn import_string_name_needs_alias() {
        let diagnostics = parse_err("import {\"a b\"} from \"m\";");
        assert!(diagnostics[0].message.contains("expected `as`"));
    }

    #[test]
    fn export_forms() {
        let program = parse_ok(
            "export * from \"m\";\n\
             export * as ns from \"m\";\n\
             export {a as b, c as default} from \"m\";\n\
             export {d};\n\
             export let e = 1;\n\
             export default actor @main {}\n\
             export default 42;",
        );
        let kinds: Vec<_> = program
            .statements
            .iter()
            .map(|statement| match statement {
                Statement::Export(ExportDeclaration::All { .. }) => "all",
                Statement::Export(ExportDeclaration::Named { .. }) => "named",
                Statement::Export(ExportDeclaration::Declaration { default: false, .. }) => "decl",
                Statement::Export(ExportDeclaration::Declaration { default: true, .. }) => {
                    "default decl"
                }
                Statement::Export(ExportDeclaration::DefaultExpression { .. }) => "default expr",
                _ => "other",
            })
            .collect();
        assert_eq!(
            kinds,
            ["all", "all", "named", "named", "decl", "default decl", "default expr"]
        );
    }

    #[test]
    fn export_requires_declaration() {
        let diagnostics = parse_err("export 42;");
        assert!(diagnostics[0].message.contains("expected declaration"));
    }
}
