// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for parser crash safety testing.
//!
//! Feeds arbitrary bytes to the parser in both dialects. The first byte
//! picks the dialect; the rest is the program.
//!
//! # Success Criteria
//!
//! - No panic on any input, however deeply nested
//! - Every diagnostic span lies within the input
//! - The returned tokens reproduce the input
//!
//! # Corpus Seeding
//!
//! Seed `fuzz/corpus/parse_arbitrary/` with the `.fj` files from
//! `test-package-syntax/cases/`, each prefixed with a dialect byte.

#![no_main]

use fujin_syntax::source_analysis::{Dialect, ParseOptions, SourceBuffer, parse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    // Invalid UTF-8 never reaches the parser; callers decode first.
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };
    let dialect = if selector & 1 == 0 {
        Dialect::Actor
    } else {
        Dialect::Full
    };

    let output = parse(&SourceBuffer::new(text), &ParseOptions::new(dialect));

    let len = u32::try_from(text.len()).unwrap_or(u32::MAX);
    for diagnostic in &output.diagnostics {
        assert!(diagnostic.span.end() <= len, "{diagnostic:?}");
    }
    let rebuilt: String = output.tokens.iter().map(ToString::to_string).collect();
    assert_eq!(rebuilt, text);
});
