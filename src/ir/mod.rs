//! Typed representation of Fortran expressions and assignments.

mod assignment;
mod call;
mod constant;
mod expr;
mod symbols;
mod types;
mod variable;

pub use assignment::Assignment;
pub use call::{
    ActualArgument, ArgumentBody, PercentForm, ProcedureDesignator,
    ProcedureRef, SpecificIntrinsic,
};
pub use constant::{Constant, Logical, Scalar, Shape, StructureValues};
pub use expr::{
    ArrayConstructor, ArrayConstructorValue, BinaryOp, Convert,
    DefinedOperator, Expr, ImpliedDo, LogicalOperator, Operation, Ordering,
    RelationalOperator, StructureConstructor, UnaryOp,
};
pub use symbols::{Symbol, SymbolDetails, SymbolIdx, SymbolTable};
pub use types::{
    CharLength, DerivedTypeSpec, DynamicType, Kind, ParamValue, TypeCategory,
};
pub use variable::{
    ArrayRef, CoarrayRef, Component, ComplexPart, DataRef, DescriptorField,
    DescriptorInquiry, Designator, NamedEntity, Part, Subscript, Substring,
    SubstringParent, Team, Triplet, TypeParamInquiry,
};
