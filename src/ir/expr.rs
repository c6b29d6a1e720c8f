//! Typed expressions.

use strum_macros::{IntoStaticStr, VariantArray};

use super::call::{ProcedureDesignator, ProcedureRef};
use super::constant::Constant;
use super::symbols::SymbolIdx;
use super::types::{DerivedTypeSpec, DynamicType, Kind, TypeCategory};
use super::variable::{DataRef, DescriptorInquiry, Designator, TypeParamInquiry};

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Constant(Constant),
    BozLiteral(u128),
    NullPointer,
    Designator(Designator),
    ProcedureDesignator(ProcedureDesignator),
    FunctionRef(Box<ProcedureRef>),
    Operation(Operation),
    Convert(Convert),
    ArrayConstructor(ArrayConstructor),
    StructureConstructor(StructureConstructor),
    /// Reference to the index variable of an enclosing implied DO.
    ImpliedDoIndex(String),
    TypeParamInquiry(TypeParamInquiry),
    DescriptorInquiry(DescriptorInquiry),
}

impl Expr {
    pub fn symbol(symbol: SymbolIdx) -> Expr {
        Expr::Designator(Designator::DataRef(DataRef::Symbol(symbol)))
    }

    pub fn integer(value: i128) -> Expr {
        Expr::Constant(Constant::integer(value, 4))
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
        Expr::Operation(Operation::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Operation(Operation::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Expr::Constant(constant) => Some(constant),
            _ => None,
        }
    }
}

impl From<Constant> for Expr {
    fn from(constant: Constant) -> Self {
        Expr::Constant(constant)
    }
}

impl From<Designator> for Expr {
    fn from(designator: Designator) -> Self {
        Expr::Designator(designator)
    }
}

impl From<DataRef> for Expr {
    fn from(data_ref: DataRef) -> Self {
        Expr::Designator(Designator::DataRef(data_ref))
    }
}

impl From<ProcedureRef> for Expr {
    fn from(call: ProcedureRef) -> Self {
        Expr::FunctionRef(Box::new(call))
    }
}

/// A user-defined operator, stored with its enclosing periods.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefinedOperator(String);

impl DefinedOperator {
    pub fn new(name: &str) -> DefinedOperator {
        let name = name.trim_matches('.').to_ascii_lowercase();

        DefinedOperator(format!(".{name}."))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr, VariantArray)]
pub enum LogicalOperator {
    #[strum(to_string = ".AND.")]
    And,
    #[strum(to_string = ".OR.")]
    Or,
    #[strum(to_string = ".EQV.")]
    Eqv,
    #[strum(to_string = ".NEQV.")]
    Neqv,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr, VariantArray)]
pub enum RelationalOperator {
    #[strum(to_string = "<")]
    Lt,
    #[strum(to_string = "<=")]
    Le,
    #[strum(to_string = "==")]
    Eq,
    #[strum(to_string = "/=")]
    Ne,
    #[strum(to_string = ">=")]
    Ge,
    #[strum(to_string = ">")]
    Gt,
}

/// Selects `min` (`Less`) or `max` (`Greater`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ordering {
    Less,
    Greater,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UnaryOp {
    Parentheses,
    Negate,
    Not,
    ComplexComponent { imaginary: bool },
    Defined(DefinedOperator),
}

#[derive(Clone, Debug, PartialEq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    /// Real or complex base raised to an integer power.
    RealToIntPower,
    Extremum(Ordering),
    Concat,
    SetLength,
    ComplexConstructor,
    Logical(LogicalOperator),
    Relational(RelationalOperator),
    Defined(DefinedOperator),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// Conversion to an intrinsic type of a different category or kind.
#[derive(Clone, Debug, PartialEq)]
pub struct Convert {
    category: TypeCategory,
    kind: Kind,
    operand: Box<Expr>,
}

impl Convert {
    /// # Panics
    ///
    /// Panics if `category` is not an intrinsic category.
    pub fn new(category: TypeCategory, kind: Kind, operand: Expr) -> Convert {
        assert!(
            category != TypeCategory::Derived,
            "conversion to a derived type"
        );

        Convert {
            category,
            kind,
            operand: Box::new(operand),
        }
    }

    pub fn category(&self) -> TypeCategory {
        self.category
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn operand(&self) -> &Expr {
        &self.operand
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImpliedDo {
    pub name: String,
    pub lower: Expr,
    pub upper: Expr,
    pub stride: Expr,
    pub values: Vec<ArrayConstructorValue>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ArrayConstructorValue {
    Expr(Expr),
    ImpliedDo(ImpliedDo),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayConstructor {
    pub ty: DynamicType,
    pub values: Vec<ArrayConstructorValue>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructureConstructor {
    pub spec: DerivedTypeSpec,
    pub values: Vec<(SymbolIdx, Expr)>,
}
