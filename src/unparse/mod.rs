//! Conversion of expressions back into Fortran source.
//!
//! Every node implements [`AsFortran`], which writes the node to any
//! [`fmt::Write`] sink. Formatting is driven by an [`Unparser`] holding the
//! symbol table, which supplies names and module-file renamings, together
//! with the output [`Options`].

use std::fmt;

use crate::ir::{Constant, Scalar, SymbolIdx, SymbolTable};

mod call;
mod expr;
pub mod literals;
pub mod precedence;
mod types;
mod variable;

pub use precedence::{Precedence, Spelling};

/// Output options.
#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    /// Emit non-default lower bounds of array constants through the
    /// non-standard `%lbound=` argument of `reshape`. Module files must not
    /// use this.
    pub print_lbounds: bool,
}

/// Constant queries used to decide parenthesization.
pub trait Evaluator {
    fn is_known_negative_scalar(&self, constant: &Constant) -> bool;
}

/// Answers queries by inspecting scalar integer and real constants.
pub struct ScalarEvaluator;

impl Evaluator for ScalarEvaluator {
    fn is_known_negative_scalar(&self, constant: &Constant) -> bool {
        match constant.as_scalar() {
            Some(Scalar::Integer(value)) => *value < 0,
            Some(Scalar::Real(value)) => {
                !value.is_nan() && value.is_sign_negative()
            }
            _ => false,
        }
    }
}

pub struct Unparser<'a> {
    symbols: &'a SymbolTable,
    options: Options,
    evaluator: &'a dyn Evaluator,
}

impl<'a> Unparser<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Unparser<'a> {
        Unparser {
            symbols,
            options: Options::default(),
            evaluator: &ScalarEvaluator,
        }
    }

    pub fn with_options(mut self, options: Options) -> Unparser<'a> {
        self.options = options;
        self
    }

    pub fn with_evaluator(mut self, evaluator: &'a dyn Evaluator) -> Unparser<'a> {
        self.evaluator = evaluator;
        self
    }

    pub fn symbols(&self) -> &'a SymbolTable {
        self.symbols
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn is_known_negative_scalar(&self, constant: &Constant) -> bool {
        self.evaluator.is_known_negative_scalar(constant)
    }

    /// Writes the name of a symbol: its module-file renaming if it has one,
    /// else `name` if given, else the declared name.
    pub fn write_symbol<W>(
        &self,
        w: &mut W,
        symbol: SymbolIdx,
        name: Option<&str>,
    ) -> fmt::Result
    where
        W: fmt::Write,
    {
        if let Some(renamed) = self.symbols.renaming(symbol) {
            log::trace!(
                "emitting `{}` as `{renamed}`",
                self.symbols[symbol].name
            );

            w.write_str(renamed)
        } else if let Some(name) = name {
            w.write_str(name)
        } else {
            w.write_str(&self.symbols[symbol].name)
        }
    }
}

/// A node that can be written as Fortran source.
pub trait AsFortran {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: fmt::Write;

    /// Returns an adapter for formatting `self` with [`fmt::Display`].
    fn fortran<'a>(&'a self, cx: &'a Unparser<'a>) -> Fortran<'a, Self>
    where
        Self: Sized,
    {
        Fortran { node: self, cx }
    }

    fn to_fortran(&self, cx: &Unparser) -> String {
        let mut buf = String::new();

        // Writing to a `String` cannot fail.
        let _ = self.as_fortran(cx, &mut buf);

        buf
    }
}

pub struct Fortran<'a, T> {
    node: &'a T,
    cx: &'a Unparser<'a>,
}

impl<T: AsFortran> fmt::Display for Fortran<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.node.as_fortran(self.cx, f)
    }
}

/// Writes `items` separated by commas.
fn write_list<W, T, I>(cx: &Unparser, w: &mut W, items: I) -> fmt::Result
where
    W: fmt::Write,
    T: AsFortran,
    I: IntoIterator<Item = T>,
{
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            w.write_char(',')?;
        }

        item.as_fortran(cx, w)?;
    }

    Ok(())
}

impl<T: AsFortran> AsFortran for &T {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        (**self).as_fortran(cx, w)
    }
}

impl<T: AsFortran> AsFortran for Box<T> {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        (**self).as_fortran(cx, w)
    }
}
