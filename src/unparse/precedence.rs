//! Operator precedence and spelling.
//!
//! Parentheses are inserted around an operand only when reading the output
//! back would otherwise group it differently.

use super::Unparser;
use crate::ir::{BinaryOp, Expr, Operation, Ordering, UnaryOp};

/// Binding strength of an operator, in increasing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    DefinedBinary,
    /// `.EQV.` and `.NEQV.`
    Equivalence,
    Or,
    And,
    /// Binds less tightly than the relations.
    Not,
    Relational,
    /// `+`, `-` and `//`.
    Additive,
    /// Binds less tightly than `*`, `/` and `**`.
    Negate,
    Multiplicative,
    /// Right-associative, unlike the other binary operators.
    Power,
    DefinedUnary,
    /// Primaries, and operations that are spelled like function calls.
    Top,
}

/// Position of an operand relative to its operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Only,
    Left,
    Right,
}

impl UnaryOp {
    pub fn precedence(&self) -> Precedence {
        match self {
            UnaryOp::Negate => Precedence::Negate,
            UnaryOp::Not => Precedence::Not,
            UnaryOp::Defined(_) => Precedence::DefinedUnary,
            UnaryOp::Parentheses | UnaryOp::ComplexComponent { .. } => {
                Precedence::Top
            }
        }
    }

    pub fn spelling(&self) -> Spelling<'_> {
        match self {
            UnaryOp::Parentheses => Spelling::new("(", "", ")"),
            UnaryOp::Negate => Spelling::prefix("-"),
            UnaryOp::Not => Spelling::prefix(".NOT."),
            UnaryOp::ComplexComponent { imaginary: false } => {
                Spelling::new("real(", "", ")")
            }
            UnaryOp::ComplexComponent { imaginary: true } => {
                Spelling::new("aimag(", "", ")")
            }
            UnaryOp::Defined(op) => Spelling::prefix(op.as_str()),
        }
    }
}

impl BinaryOp {
    pub fn precedence(&self) -> Precedence {
        use crate::ir::LogicalOperator as L;

        match self {
            BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Concat => {
                Precedence::Additive
            }
            BinaryOp::Multiply | BinaryOp::Divide => Precedence::Multiplicative,
            BinaryOp::Power | BinaryOp::RealToIntPower => Precedence::Power,
            BinaryOp::Logical(L::And) => Precedence::And,
            BinaryOp::Logical(L::Or) => Precedence::Or,
            BinaryOp::Logical(L::Eqv | L::Neqv) => Precedence::Equivalence,
            BinaryOp::Relational(_) => Precedence::Relational,
            BinaryOp::Defined(_) => Precedence::DefinedBinary,
            BinaryOp::Extremum(_)
            | BinaryOp::SetLength
            | BinaryOp::ComplexConstructor => Precedence::Top,
        }
    }

    pub fn spelling(&self) -> Spelling<'_> {
        match self {
            BinaryOp::Add => Spelling::infix("+"),
            BinaryOp::Subtract => Spelling::infix("-"),
            BinaryOp::Multiply => Spelling::infix("*"),
            BinaryOp::Divide => Spelling::infix("/"),
            BinaryOp::Power | BinaryOp::RealToIntPower => Spelling::infix("**"),
            BinaryOp::Concat => Spelling::infix("//"),
            BinaryOp::Extremum(Ordering::Less) => Spelling::new("min(", ",", ")"),
            BinaryOp::Extremum(Ordering::Greater) => {
                Spelling::new("max(", ",", ")")
            }
            BinaryOp::SetLength => Spelling::new("%SET_LENGTH(", ",", ")"),
            BinaryOp::ComplexConstructor => Spelling::new("(", ",", ")"),
            BinaryOp::Logical(op) => Spelling::infix(op.into()),
            BinaryOp::Relational(op) => Spelling::infix(op.into()),
            BinaryOp::Defined(op) => Spelling::infix(op.as_str()),
        }
    }

    fn is_arithmetic(&self) -> bool {
        matches!(
            self.precedence(),
            Precedence::Additive | Precedence::Multiplicative | Precedence::Power
        )
    }
}

/// Text written before, between and after the operands of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spelling<'a> {
    pub prefix: &'a str,
    pub infix: &'a str,
    pub suffix: &'a str,
}

impl<'a> Spelling<'a> {
    const fn new(prefix: &'a str, infix: &'a str, suffix: &'a str) -> Self {
        Spelling {
            prefix,
            infix,
            suffix,
        }
    }

    const fn prefix(prefix: &'a str) -> Self {
        Spelling::new(prefix, "", "")
    }

    const fn infix(infix: &'a str) -> Self {
        Spelling::new("", infix, "")
    }
}

impl Operation {
    pub fn precedence(&self) -> Precedence {
        match self {
            Operation::Unary { op, .. } => op.precedence(),
            Operation::Binary { op, .. } => op.precedence(),
        }
    }
}

impl Unparser<'_> {
    /// Precedence of an expression when it appears as an operand. Known
    /// negative constants are written with a leading sign, so they bind like
    /// a negation.
    pub fn classify(&self, expr: &Expr) -> Precedence {
        match expr {
            Expr::Operation(operation) => operation.precedence(),
            Expr::Constant(constant)
                if self.is_known_negative_scalar(constant) =>
            {
                Precedence::Negate
            }
            _ => Precedence::Top,
        }
    }
}

/// Decides whether an operand of an operator of precedence `parent` must be
/// parenthesized.
///
/// The operand is parenthesized when it binds less tightly than its
/// operator. In addition:
///
/// - a power in the left operand of `**` is parenthesized, since `**`
///   groups to the right;
/// - an operand of the same precedence on the right of any other binary
///   operator is parenthesized, since those group to the left;
/// - an operand starting with a sign is parenthesized on the right of an
///   arithmetic operator and under a unary operator of the same class, where
///   Fortran allows no second sign.
pub fn needs_parentheses(
    op: OperatorRef,
    child: Precedence,
    operand: Operand,
) -> bool {
    let parent = op.precedence();

    if parent == Precedence::Top {
        return false;
    }

    if child < parent {
        return true;
    }

    match operand {
        Operand::Only => child == parent,
        Operand::Left => {
            parent == Precedence::Power && child == Precedence::Power
        }
        Operand::Right => {
            (child == parent && parent != Precedence::Power)
                || (child == Precedence::Negate && op.is_arithmetic())
        }
    }
}

/// The operator whose operand is being placed.
#[derive(Clone, Copy)]
pub enum OperatorRef<'a> {
    Unary(&'a UnaryOp),
    Binary(&'a BinaryOp),
}

impl OperatorRef<'_> {
    fn precedence(self) -> Precedence {
        match self {
            OperatorRef::Unary(op) => op.precedence(),
            OperatorRef::Binary(op) => op.precedence(),
        }
    }

    fn is_arithmetic(self) -> bool {
        match self {
            OperatorRef::Unary(_) => false,
            OperatorRef::Binary(op) => op.is_arithmetic(),
        }
    }
}
