use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use fortran_unparse::ir::SymbolTable;
use fortran_unparse::opts::Opts;
use fortran_unparse::parser::{FortranParser, Statement};
use fortran_unparse::rename::Rename;
use fortran_unparse::unparse::{AsFortran, Unparser};
use fortran_unparse::utils::{Diagnostic, Reporter};

fn read_input(file: &Option<PathBuf>) -> io::Result<(Cow<'_, str>, String)> {
    if let Some(file) = file {
        let filename = file.to_string_lossy();
        let src = fs::read_to_string(file)?;

        Ok((filename, src))
    } else {
        let filename = Cow::from("<stdin>");
        let src = io::read_to_string(io::stdin())?;

        Ok((filename, src))
    }
}

fn write_output(lines: &[String], file: &Option<PathBuf>) -> io::Result<()> {
    let mut out: Box<dyn io::Write> = if let Some(path) = file {
        Box::new(File::create(path)?)
    } else {
        Box::new(io::stdout())
    };

    for line in lines {
        writeln!(out, "{line}")?;
    }

    out.flush()
}

/// Parses every non-blank line of `src`, declaring names into `symbols` as
/// they are first seen.
fn parse_lines(
    src: &str,
    symbols: &mut SymbolTable,
    reporter: &mut Reporter,
) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut offset = 0;

    for line in src.split_inclusive('\n') {
        let text = line.trim_end_matches(['\n', '\r']);

        if !text.trim().is_empty() {
            match FortranParser::parse_statement(text, symbols) {
                Ok(statement) => statements.push(statement),
                Err(err) => reporter.emit(&Diagnostic::syntax(&err, offset)),
            }
        }

        offset += line.len();
    }

    statements
}

fn apply_renames(
    renames: &[Rename],
    symbols: &mut SymbolTable,
    reporter: &mut Reporter,
) {
    for rename in renames {
        let Some(symbol) = symbols.lookup(&rename.from) else {
            log::warn!("no symbol named `{}` to rename", rename.from);

            reporter.emit(
                &Diagnostic::warning()
                    .with_message(format!("unknown name `{}`", rename.from))
                    .with_note("the renaming was ignored"),
            );

            continue;
        };

        symbols.rename(symbol, rename.to.as_str());
    }
}

fn main() -> ExitCode {
    let opts = Opts::parse();

    env_logger::Builder::new()
        .filter_level(opts.log_level)
        .init();

    let (filename, src) = match read_input(&opts.file) {
        Ok(result) => result,
        Err(err) => {
            Reporter::new("", "").emit(&Diagnostic::from(err));

            return ExitCode::FAILURE;
        }
    };

    let mut reporter = Reporter::new(&filename, &src);
    let mut symbols = SymbolTable::new();

    let statements = parse_lines(&src, &mut symbols, &mut reporter);

    if reporter.errors() > 0 {
        return ExitCode::FAILURE;
    }

    log::info!(
        "parsed {} statements, {} symbols",
        statements.len(),
        symbols.len()
    );

    apply_renames(&opts.rename, &mut symbols, &mut reporter);

    let cx = Unparser::new(&symbols).with_options(opts.unparse_options());
    let lines: Vec<_> = statements
        .iter()
        .map(|statement| statement.to_fortran(&cx))
        .collect();

    if let Err(err) = write_output(&lines, &opts.output) {
        reporter.emit(&Diagnostic::from(err));

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
