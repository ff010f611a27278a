//! `zvelte-grammar`: exits non-zero unless the zvelte grammar loads.
//!
//! Prints nothing on success. The grammar comes from `--grammar`, then
//! `ZVELTE_GRAMMAR_PATH`, then the copy bundled into the binary.

use facet::Facet;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use zvelte_grammar::{verify_grammar_loads, GrammarSource};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "ZVELTE_LOG";

/// Verify that the zvelte grammar loads.
#[derive(Facet, Debug)]
struct Args {
    /// Path to a grammar.json to verify instead of the bundled grammar.
    #[facet(named, short = 'g')]
    #[facet(default)]
    grammar: Option<String>,

    /// Log each loading step to stderr.
    #[facet(named, short = 'v')]
    #[facet(default)]
    verbose: bool,
}

fn setup_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("zvelte_grammar=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args: Args = match facet_args::from_std_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };
    setup_tracing(args.verbose);

    let source = match args.grammar {
        Some(path) => GrammarSource::from_override(Some(PathBuf::from(path))),
        None => GrammarSource::from_env(),
    };
    tracing::debug!(?source, "verifying grammar");

    match verify_grammar_loads(source.provider().as_ref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
