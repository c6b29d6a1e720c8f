//! Expressions and constants.

use std::fmt::{self, Write};

use super::precedence::{needs_parentheses, Operand, OperatorRef};
use super::{literals, write_list, AsFortran, Unparser};
use crate::ir::{
    ArrayConstructor, ArrayConstructorValue, Constant, Convert, DynamicType,
    Expr, ImpliedDo, Operation, Scalar, StructureConstructor, SymbolIdx,
    TypeCategory,
};

impl AsFortran for Expr {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        match self {
            Expr::Constant(constant) => constant.as_fortran(cx, w),
            Expr::BozLiteral(value) => literals::write_boz(w, *value),
            Expr::NullPointer => w.write_str("NULL()"),
            Expr::Designator(designator) => designator.as_fortran(cx, w),
            Expr::ProcedureDesignator(proc) => proc.as_fortran(cx, w),
            Expr::FunctionRef(call) => call.as_fortran(cx, w),
            Expr::Operation(operation) => operation.as_fortran(cx, w),
            Expr::Convert(convert) => convert.as_fortran(cx, w),
            Expr::ArrayConstructor(array) => array.as_fortran(cx, w),
            Expr::StructureConstructor(structure) => structure.as_fortran(cx, w),
            Expr::ImpliedDoIndex(name) => w.write_str(name),
            Expr::TypeParamInquiry(inquiry) => inquiry.as_fortran(cx, w),
            Expr::DescriptorInquiry(inquiry) => inquiry.as_fortran(cx, w),
        }
    }
}

impl Unparser<'_> {
    fn write_operand<W>(
        &self,
        w: &mut W,
        op: OperatorRef,
        expr: &Expr,
        operand: Operand,
    ) -> fmt::Result
    where
        W: Write,
    {
        if needs_parentheses(op, self.classify(expr), operand) {
            w.write_char('(')?;
            expr.as_fortran(self, w)?;
            w.write_char(')')
        } else {
            expr.as_fortran(self, w)
        }
    }

    fn write_scalar<W>(
        &self,
        w: &mut W,
        ty: &DynamicType,
        value: &Scalar,
    ) -> fmt::Result
    where
        W: Write,
    {
        let kind = ty.kind().unwrap_or_default();

        match value {
            Scalar::Integer(value) => literals::write_integer(w, *value, kind),
            Scalar::Unsigned(value) => literals::write_unsigned(w, *value, kind),
            Scalar::Real(value) => literals::write_real(w, *value, kind),
            Scalar::Complex(re, im) => literals::write_complex(w, *re, *im, kind),
            Scalar::Character(value) => {
                literals::write_character(w, value, kind)
            }
            Scalar::Logical(value) => literals::write_logical(w, *value, kind),
            Scalar::Derived(values) => {
                let Some(spec) = ty.derived_spec() else {
                    panic!("structure constant without a derived type");
                };

                spec.as_fortran(self, w)?;
                self.write_component_values(w, values)
            }
        }
    }

    /// Writes `(comp=value,...)`, always with the parentheses.
    fn write_component_values<W>(
        &self,
        w: &mut W,
        values: &[(SymbolIdx, Expr)],
    ) -> fmt::Result
    where
        W: Write,
    {
        w.write_char('(')?;

        for (i, (symbol, value)) in values.iter().enumerate() {
            if i > 0 {
                w.write_char(',')?;
            }

            symbol.as_fortran(self, w)?;
            w.write_char('=')?;
            value.as_fortran(self, w)?;
        }

        w.write_char(')')
    }
}

/// Writes a scalar as a literal, and an array as an array constructor. Arrays
/// of rank greater than one, and arrays with non-default lower bounds when
/// those are printed, become `reshape` references.
impl AsFortran for Constant {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        let ty = self.ty();
        let print_lbounds =
            cx.options().print_lbounds && self.has_non_default_lower_bound();
        let reshape = self.rank() > 1 || print_lbounds;

        if reshape {
            w.write_str("reshape(")?;
        }

        if self.rank() > 0 {
            w.write_char('[')?;

            if ty.category() == Some(TypeCategory::Character) {
                let len = self.char_length().unwrap_or_default().to_string();
                cx.write_type_spec(w, ty, Some(&len))?;
            } else {
                cx.write_type_spec(w, ty, None)?;
            }

            w.write_str("::")?;
        }

        for (i, value) in self.values().iter().enumerate() {
            if i > 0 {
                w.write_char(',')?;
            }

            cx.write_scalar(w, ty, value)?;
        }

        if self.rank() > 0 {
            w.write_char(']')?;
        }

        if reshape {
            w.write_str(",shape=[")?;
            write!(w, "{}", itertools::join(self.shape(), ","))?;
            w.write_char(']')?;

            if print_lbounds {
                w.write_str(",%lbound=[")?;
                write!(w, "{}", itertools::join(self.lbounds(), ","))?;
                w.write_char(']')?;
            }

            w.write_char(')')?;
        }

        Ok(())
    }
}

impl AsFortran for Operation {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        match self {
            Operation::Unary { op, operand } => {
                let spelling = op.spelling();

                w.write_str(spelling.prefix)?;
                cx.write_operand(
                    w,
                    OperatorRef::Unary(op),
                    operand,
                    Operand::Only,
                )?;
                w.write_str(spelling.suffix)
            }
            Operation::Binary { op, left, right } => {
                let spelling = op.spelling();
                let op_ref = OperatorRef::Binary(op);

                w.write_str(spelling.prefix)?;
                cx.write_operand(w, op_ref, left, Operand::Left)?;
                w.write_str(spelling.infix)?;
                cx.write_operand(w, op_ref, right, Operand::Right)?;
                w.write_str(spelling.suffix)
            }
        }
    }
}

/// Writes a conversion as a reference to the intrinsic function named after
/// the target category.
impl AsFortran for Convert {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        let operand = self.operand();

        match self.category() {
            TypeCategory::Character => {
                w.write_str("achar(iachar(")?;
                operand.as_fortran(cx, w)?;
                w.write_char(')')?;
            }
            TypeCategory::Integer => {
                w.write_str("int(")?;
                operand.as_fortran(cx, w)?;
            }
            TypeCategory::Real => {
                w.write_str("real(")?;
                operand.as_fortran(cx, w)?;
            }
            TypeCategory::Complex => {
                w.write_str("cmplx(")?;
                operand.as_fortran(cx, w)?;
            }
            TypeCategory::Logical => {
                w.write_str("logical(")?;
                operand.as_fortran(cx, w)?;
            }
            TypeCategory::Unsigned => {
                w.write_str("uint(")?;
                operand.as_fortran(cx, w)?;
            }
            TypeCategory::Derived => unreachable!("conversion to a derived type"),
        }

        write!(w, ",kind={})", self.kind())
    }
}

impl AsFortran for ArrayConstructorValue {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        match self {
            ArrayConstructorValue::Expr(expr) => expr.as_fortran(cx, w),
            ArrayConstructorValue::ImpliedDo(implied_do) => {
                implied_do.as_fortran(cx, w)
            }
        }
    }
}

/// Writes `(values,INTEGER(8)::i=lower,upper,stride)`.
impl AsFortran for ImpliedDo {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        w.write_char('(')?;
        write_list(cx, w, &self.values)?;
        write!(w, ",INTEGER(8)::{}=", self.name)?;
        self.lower.as_fortran(cx, w)?;
        w.write_char(',')?;
        self.upper.as_fortran(cx, w)?;
        w.write_char(',')?;
        self.stride.as_fortran(cx, w)?;
        w.write_char(')')
    }
}

impl AsFortran for ArrayConstructor {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        w.write_char('[')?;

        match &self.ty {
            // Without a length there is no type-spec to give.
            DynamicType::Character { len: None, .. } => {}
            ty => {
                cx.write_type_spec(w, ty, None)?;
                w.write_str("::")?;
            }
        }

        write_list(cx, w, &self.values)?;
        w.write_char(']')
    }
}

impl AsFortran for StructureConstructor {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        self.spec.as_fortran(cx, w)?;
        cx.write_component_values(w, &self.values)
    }
}
