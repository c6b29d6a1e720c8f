//! Minimally parenthesized Fortran source for typed expression trees.

pub mod ir;
pub mod opts;
pub mod parser;
pub mod rename;
pub mod unparse;
pub mod utils;
