// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the parser.
//!
//! Properties checked, for both dialects:
//! 1. The parser never panics on arbitrary or near-valid input.
//! 2. Diagnostic spans and positions lie within the input.
//! 3. Error nodes in the tree always come with diagnostics.
//! 4. Parsing is deterministic.
//! 5. The returned token stream reproduces the input.
//! 6. Child spans nest inside their parents and siblings do not overlap.
//! 7. Diagnostic messages are user-facing.
//! 8. Valid fragments parse without diagnostics.

use proptest::prelude::*;

use crate::ast_walker::{Node, contains_error, walk_program};
use crate::source_analysis::{Dialect, ParseOptions, ParseOutput, SourceBuffer, TokenKind, parse};

fn parse_in(input: &str, dialect: Dialect) -> ParseOutput {
    parse(&SourceBuffer::new(input), &ParseOptions::new(dialect))
}

// ============================================================================
// Generators
// ============================================================================

fn dialect() -> impl Strategy<Value = Dialect> {
    prop_oneof![Just(Dialect::Actor), Just(Dialect::Full)]
}

/// Programs that parse cleanly in either dialect.
const SHARED_FRAGMENTS: &[&str] = &[
    "let x = 1;",
    "const { a, b: [c, ...d] } = value;",
    "let {a, b}: T = x;",
    "let x = 1\nlet y = 2",
    "let x = 1 +\n1",
    "if (a < b) { c = 1; } else if (d) { e(); } else { f = [1, 2]; }",
    "for (let i = 0; i < 10; i++) { total = total + i; }",
    "switch (v) { case 1: x = 1; break; default: x = 2; }",
    "try { risky(); } catch (e) { log(e); } finally { done(); }",
    "throw error;",
    "import x, { a as b, \"c\" as d } from \"mod\";",
    "import * as ns from \"mod\";",
    "export { a, b as c };",
    "export let answer = 42;",
    "type Point = { x: u8; y: u8 };",
    "type Maybe<T> = T | null;",
    "x = { a: 1, b, ...rest, \"k\": [1, 2] };",
    "a.b[c](d, ...e);",
];

/// Programs that parse cleanly in the actor dialect.
const ACTOR_FRAGMENTS: &[&str] = &[
    "actor @main(n: u8) { emit n; }",
    "actor @a | @b <T> { assert ok, \"message\"; }",
    "emit <div class=\"x\">hi {name}</div>;",
    "emit <@panel open=true />;",
    "emit @click;",
    "let handler: action = @go;",
];

/// Programs that parse cleanly in the full dialect.
const FULL_FRAGMENTS: &[&str] = &[
    "let f = (a, b) => a + b;",
    "let g = async x => await x;",
    "function f<T>(x: T): T { return x; }",
    "async function main() { return await fetch(url); }",
    "let s = `t${x}u${`inner${y}`}v`;",
    "let r = /ab+c/gi.test(s);",
    "let t: [number, ...string[]] = [1];",
    "interface Shape extends Base { area(): number; name?: string }",
    "let v = a?.b ?? c ? d : e;",
    "let n = a ** 2 | b & c ^ ~d << 1 >>> 2;",
    "for (i = 0, j = 1; i < j; i++, j--) {}",
    "let fn: (x: number) => string & Tagged = tag`hello ${name}`;",
];

fn valid_fragment() -> impl Strategy<Value = (String, Dialect)> {
    prop_oneof![
        (
            prop::sample::select(SHARED_FRAGMENTS).prop_map(ToString::to_string),
            dialect()
        ),
        prop::sample::select(ACTOR_FRAGMENTS).prop_map(|s| (s.to_string(), Dialect::Actor)),
        prop::sample::select(FULL_FRAGMENTS).prop_map(|s| (s.to_string(), Dialect::Full)),
    ]
}

fn any_fragment() -> impl Strategy<Value = String> {
    valid_fragment().prop_map(|(source, _)| source)
}

/// A valid fragment cut short at an arbitrary character boundary.
fn truncated_fragment() -> impl Strategy<Value = String> {
    (any_fragment(), any::<prop::sample::Index>()).prop_map(|(source, index)| {
        let cut = index.index(source.len() + 1);
        source[..source.floor_char_boundary(cut)].to_string()
    })
}

/// A valid fragment with one bracket swapped for another.
fn mismatched_brackets() -> impl Strategy<Value = String> {
    (any_fragment(), any::<prop::sample::Index>()).prop_map(|(source, index)| {
        let positions: Vec<usize> = source
            .char_indices()
            .filter(|(_, c)| "(){}[]<>".contains(*c))
            .map(|(i, _)| i)
            .collect();
        if positions.is_empty() {
            return source;
        }
        let at = positions[index.index(positions.len())];
        let replacement = match source.as_bytes()[at] {
            b'(' => "[",
            b')' => "}",
            b'{' => "(",
            b'}' => "]",
            b'[' => "{",
            b']' => ")",
            b'<' => "{",
            _ => "(",
        };
        let mut result = source.clone();
        result.replace_range(at..=at, replacement);
        result
    })
}

/// Two valid fragments spliced together mid-token.
fn spliced_fragments() -> impl Strategy<Value = String> {
    (truncated_fragment(), any_fragment()).prop_map(|(head, tail)| head + &tail)
}

/// A valid fragment with a keyword dropped in somewhere.
fn stray_keyword() -> impl Strategy<Value = String> {
    (
        any_fragment(),
        prop::sample::select(&["else", "case", "=>", "return", "emit", "async", "}", ")"][..]),
        any::<prop::sample::Index>(),
    )
        .prop_map(|(source, word, index)| {
            let at = source.floor_char_boundary(index.index(source.len() + 1));
            format!("{} {word} {}", &source[..at], &source[at..])
        })
}

fn near_valid_fujin() -> impl Strategy<Value = String> {
    prop_oneof![
        any_fragment(),
        truncated_fragment(),
        mismatched_brackets(),
        spliced_fragments(),
        stray_keyword(),
    ]
}

fn arbitrary_input() -> impl Strategy<Value = String> {
    prop_oneof!["\\PC{0,500}", near_valid_fujin()]
}

/// Rust-internal text that should never leak into a message.
const INTERNAL_NAMES: &[&str] = &[
    "TokenKind",
    "Keyword(",
    "unwrap()",
    "panic!",
    "unreachable!",
    "Expression::",
    "Statement::",
    "internal error",
];

/// Default is 512 cases for standard CI; override via `PROPTEST_CASES` env var
/// for longer runs.
fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: the parser never panics on arbitrary text.
    #[test]
    fn parser_never_panics(input in "\\PC{0,500}", dialect in dialect()) {
        let _output = parse_in(&input, dialect);
    }

    /// Property 1b: nor on near-valid input that drives recovery harder.
    #[test]
    fn parser_never_panics_near_valid(input in near_valid_fujin(), dialect in dialect()) {
        let _output = parse_in(&input, dialect);
    }

    /// Property 2: every diagnostic points inside the input.
    #[test]
    fn diagnostic_spans_within_input(input in arbitrary_input(), dialect in dialect()) {
        let output = parse_in(&input, dialect);
        let input_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        for diag in &output.diagnostics {
            prop_assert!(
                diag.span.start() <= diag.span.end() && diag.span.end() <= input_len,
                "Diagnostic span {:?} outside input of length {} for {:?}: {}",
                diag.span,
                input_len,
                input,
                diag.message,
            );
            prop_assert_eq!(diag.start.offset, diag.span.start());
            prop_assert_eq!(diag.end.offset, diag.span.end());
            prop_assert!(diag.start.line >= 1 && diag.start.column >= 1);
        }
    }

    /// Property 3: error nodes never appear silently.
    #[test]
    fn error_nodes_produce_diagnostics(input in near_valid_fujin(), dialect in dialect()) {
        let output = parse_in(&input, dialect);
        if contains_error(&output.program) {
            prop_assert!(
                output.has_errors(),
                "AST contains error node(s) but no error diagnostics for {:?}",
                input,
            );
        }
    }

    /// Property 4: same input, same output.
    #[test]
    fn parser_deterministic(input in arbitrary_input(), dialect in dialect()) {
        let first = parse_in(&input, dialect);
        let second = parse_in(&input, dialect);
        prop_assert_eq!(first.program, second.program);
        prop_assert_eq!(first.tokens, second.tokens);
        prop_assert_eq!(first.diagnostics.len(), second.diagnostics.len());
    }

    /// Property 5: the parser's tokens, re-scans and inserted semicolons
    /// included, still reproduce the source.
    #[test]
    fn parsed_tokens_round_trip(input in arbitrary_input(), dialect in dialect()) {
        let output = parse_in(&input, dialect);
        let mut rebuilt = String::with_capacity(input.len());
        for token in &output.tokens {
            for trivia in token.leading_trivia() {
                rebuilt.push_str(trivia.as_str());
            }
            rebuilt.push_str(token.lexeme());
        }
        prop_assert_eq!(&rebuilt, &input);
        let inserted = output
            .tokens
            .windows(2)
            .filter(|pair| {
                pair[0].kind() == TokenKind::AutomaticSemicolon
                    && pair[1].kind() == TokenKind::AutomaticSemicolon
            })
            .count();
        prop_assert_eq!(inserted, 0, "Consecutive automatic semicolons for {:?}", input);
    }

    /// Property 6: siblings are ordered and do not overlap.
    #[test]
    fn sibling_spans_ordered((input, dialect) in valid_fragment()) {
        let output = parse_in(&input, dialect);
        let mut violation = None;
        walk_program(&output.program, &mut |node: Node<'_>| {
            let mut previous_end = node.span().start();
            for child in node.children() {
                let span = child.span();
                if span.start() < previous_end {
                    violation.get_or_insert((node.span(), span));
                }
                previous_end = span.end();
            }
        });
        prop_assert!(
            violation.is_none(),
            "Sibling spans overlap in {:?}: {:?}",
            input,
            violation,
        );
    }

    /// Property 6: children nest inside parents, including error nodes
    /// left behind by recovery.
    #[test]
    fn spans_nest(input in near_valid_fujin(), dialect in dialect()) {
        let output = parse_in(&input, dialect);
        let mut violation = None;
        walk_program(&output.program, &mut |node: Node<'_>| {
            let parent = node.span();
            for child in node.children() {
                if !parent.contains(child.span()) {
                    violation.get_or_insert((parent, child.span()));
                }
            }
        });
        prop_assert!(
            violation.is_none(),
            "Child span escapes its parent in {:?}: {:?}",
            input,
            violation,
        );
    }

    /// Property 7: diagnostics read like compiler output, not Rust internals.
    #[test]
    fn error_messages_are_user_facing(input in near_valid_fujin(), dialect in dialect()) {
        let output = parse_in(&input, dialect);
        for diag in &output.diagnostics {
            for internal in INTERNAL_NAMES {
                prop_assert!(
                    !diag.message.contains(internal),
                    "Diagnostic message contains internal name {:?}: {:?} (input: {:?})",
                    internal,
                    diag.message,
                    input,
                );
            }
        }
    }

    /// Property 8: the fragment corpus itself is valid.
    #[test]
    fn valid_fragments_parse_cleanly((input, dialect) in valid_fragment()) {
        let output = parse_in(&input, dialect);
        prop_assert!(
            output.diagnostics.is_empty(),
            "Valid {} program {:?} produced {:#?}",
            dialect,
            input,
            output.diagnostics,
        );
        prop_assert!(!contains_error(&output.program));
    }
}
