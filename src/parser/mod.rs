//! Parser for the Fortran expressions and statements written by the
//! unparser.
//!
//! Names are resolved against a [`SymbolTable`]. A name that is not yet
//! declared is declared implicitly: as a procedure when it is referenced
//! with an argument list that contains no section triplets, and as an
//! object otherwise. Intrinsic procedures that are not shadowed by a
//! declaration are recognized by name, and references that correspond to
//! operations (`min`, `max`, `aimag`, kind conversions) are parsed as those
//! operations.

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::ops::Range;

use pest::error::{Error, InputLocation};
use pest_consume::Parser;

use crate::ir::{Assignment, Expr, SymbolDetails, SymbolIdx, SymbolTable};
use crate::unparse::{AsFortran, Unparser};

mod grammar;
mod resolve;
#[cfg(test)]
mod roundtrip;

pub use grammar::{FortranParser, Rule};

pub type ParseError = Box<Error<Rule>>;

/// A line of input: an assignment statement or a bare expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Expr(Expr),
    Assignment(Assignment),
}

impl AsFortran for Statement {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match self {
            Statement::Expr(expr) => expr.as_fortran(cx, w),
            Statement::Assignment(assignment) => assignment.as_fortran(cx, w),
        }
    }
}

impl FortranParser {
    pub fn parse_expr(
        src: &str,
        symbols: &mut SymbolTable,
    ) -> Result<Expr, ParseError> {
        Context::run(symbols, |cx| {
            let nodes = FortranParser::parse_with_userdata(
                Rule::expression_line,
                src,
                cx,
            )?;

            FortranParser::expression_line(nodes.single()?)
        })
    }

    pub fn parse_statement(
        src: &str,
        symbols: &mut SymbolTable,
    ) -> Result<Statement, ParseError> {
        Context::run(symbols, |cx| {
            let nodes = FortranParser::parse_with_userdata(
                Rule::statement_line,
                src,
                cx,
            )?;

            FortranParser::statement_line(nodes.single()?)
        })
    }
}

/// Byte range of the input that a parse error points at.
pub fn error_span(err: &Error<Rule>) -> Range<usize> {
    match err.location {
        InputLocation::Pos(pos) => pos..pos,
        InputLocation::Span((start, end)) => start..end,
    }
}

/// Symbol table shared by the rules of a single parse.
pub struct Context {
    symbols: RefCell<SymbolTable>,
}

impl Context {
    fn run<T, F>(symbols: &mut SymbolTable, f: F) -> Result<T, ParseError>
    where
        F: FnOnce(&Context) -> Result<T, Error<Rule>>,
    {
        let cx = Context {
            symbols: RefCell::new(mem::take(symbols)),
        };

        let result = f(&cx);
        *symbols = cx.symbols.into_inner();

        result.map_err(Box::new)
    }

    fn lookup(&self, name: &str) -> Option<SymbolIdx> {
        self.symbols.borrow().lookup(name)
    }

    fn declare(&self, name: &str, details: SymbolDetails) -> SymbolIdx {
        log::debug!("implicitly declaring `{name}` as {details:?}");

        self.symbols.borrow_mut().declare(name, details)
    }

    fn lookup_or_declare(&self, name: &str, details: SymbolDetails) -> SymbolIdx {
        self.lookup(name)
            .unwrap_or_else(|| self.declare(name, details))
    }

    fn is_procedure(&self, symbol: SymbolIdx) -> bool {
        let symbols = self.symbols.borrow();
        let ultimate = symbols.ultimate(symbol);

        symbols[ultimate].details == SymbolDetails::Procedure
    }
}
