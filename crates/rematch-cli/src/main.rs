//! Command-line front end: compile a pattern, then test stdin lines
//! against it.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;

/// Test lines of standard input against a regular expression.
///
/// Supported syntax: literal characters, concatenation, alternation with
/// '|', grouping with parentheses, and zero-or-more repetition with '*'.
/// A line matches only if the pattern describes it entirely. Prints `true`
/// or `false` per line.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The pattern to compile.
    pattern: String,

    /// Print the automaton structure before matching.
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let nfa = rematch::compile(&cli.pattern)
        .with_context(|| format!("cannot compile pattern {:?}", cli.pattern))?;
    if cli.dump {
        print!("{nfa}");
    }

    let stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    for line in stdin.lines() {
        let line = line.context("cannot read input line")?;
        writeln!(stdout, "{}", nfa.matches(&line))?;
    }
    Ok(())
}
