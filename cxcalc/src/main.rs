//! Command-line interface (CLI) for cxcalc
//!
//! Evaluates lines of complex arithmetic in a single session and prints
//! each result, or `[<kind>] <message>` for a line that fails. Lines come
//! from `-e` arguments, from a file given with `-i`, or from stdin.

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use cxcalc::{CalcGrammar, Session};
use cxcalc_rt::ParseTable;
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::PathBuf;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Line to evaluate (repeatable, evaluated in order)
    #[arg(short, long = "expr", value_name = "LINE")]
    expr: Vec<String>,

    /// Input file with one line per evaluation
    #[arg(short, long, value_name = "PATH", conflicts_with = "expr")]
    input: Option<PathBuf>,

    /// Print productions, item sets and FIRST/FOLLOW sets, then exit
    #[arg(long)]
    grammar: bool,
}

fn run_line<W: Write>(session: &mut Session, line: &str, out: &mut W) -> io::Result<()> {
    let line = line.trim_end();
    if line.is_empty() {
        return Ok(());
    }
    match session.evaluate(line) {
        Ok(value) => writeln!(out, "{}", value),
        Err(e) => writeln!(out, "[{}] {}", e.kind(), e),
    }
}

fn run_lines<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
    prompt: bool,
) -> io::Result<()> {
    let mut lines = input.lines();
    loop {
        if prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        run_line(session, &line?, out)?;
    }
    if prompt {
        writeln!(out)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.grammar {
        ParseTable::<CalcGrammar>::dump(&mut out)?;
        return Ok(());
    }

    let mut session = Session::new();
    if !args.expr.is_empty() {
        for line in &args.expr {
            run_line(&mut session, line, &mut out)?;
        }
    } else if let Some(path) = &args.input {
        let file = File::open(path).with_context(|| format!("can't open {:?}", path))?;
        run_lines(&mut session, BufReader::new(file), &mut out, false)?;
    } else {
        let stdin = io::stdin();
        let prompt = stdin.is_terminal();
        run_lines(&mut session, stdin.lock(), &mut out, prompt)?;
    }
    Ok(())
}
