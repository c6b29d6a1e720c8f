//! Assignment statements.

use super::call::ProcedureRef;
use super::expr::Expr;

#[derive(Clone, Debug, PartialEq)]
pub enum Assignment {
    Intrinsic {
        lhs: Expr,
        rhs: Expr,
    },
    /// A defined assignment, resolved to a subroutine call.
    Defined(ProcedureRef),
    /// Pointer assignment, with optional new lower bounds.
    BoundsSpec {
        lhs: Expr,
        rhs: Expr,
        bounds: Vec<Expr>,
    },
    /// Pointer assignment with new lower and upper bounds.
    BoundsRemapping {
        lhs: Expr,
        rhs: Expr,
        bounds: Vec<(Expr, Expr)>,
    },
}
