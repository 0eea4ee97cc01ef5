// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parses a Fujin file and prints its diagnostics.
//!
//! ```text
//! cargo run -p fujin-syntax --example parse_file -- app.fj --dialect full --ast -v
//! ```

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, ValueEnum};
use fujin_syntax::source_analysis::{Dialect, ParseOptions, SourceBuffer, parse};
use miette::{IntoDiagnostic, WrapErr, miette};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DialectArg {
    Actor,
    Full,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Actor => Self::Actor,
            DialectArg::Full => Self::Full,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "parse_file", about = "Parse a Fujin source file")]
struct Cli {
    /// The file to parse
    path: Utf8PathBuf,

    /// Which dialect to parse
    #[arg(long, value_enum, default_value = "actor")]
    dialect: DialectArg,

    /// Print the token stream
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree
    #[arg(long)]
    ast: bool,

    /// Stop after this many diagnostics
    #[arg(long)]
    max_diagnostics: Option<usize>,

    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "fujin_syntax=warn",
        1 => "fujin_syntax=debug",
        _ => "fujin_syntax=trace",
    }
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    let text = std::fs::read_to_string(&cli.path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", cli.path))?;
    let source = SourceBuffer::named(cli.path.as_str(), text);

    let mut options = ParseOptions::new(cli.dialect.into());
    if let Some(limit) = cli.max_diagnostics {
        options = options.with_max_diagnostics(limit);
    }
    let output = parse(&source, &options);

    if cli.tokens {
        for token in &output.tokens {
            println!("{:?} {:?} {:?}", token.kind(), token.span(), token.lexeme());
        }
    }
    if cli.ast {
        println!("{:#?}", output.program);
    }

    for diagnostic in &output.diagnostics {
        eprintln!("{:?}", diagnostic.to_report(&source));
    }

    let errors = output.diagnostics.iter().filter(|d| d.is_error()).count();
    if errors > 0 {
        return Err(miette!("{} had {errors} error(s)", cli.path));
    }
    println!(
        "{}: {} statement(s), no errors",
        cli.path,
        output.program.statements.len()
    );
    Ok(())
}
