//! Designators.

use std::fmt::{self, Write};

use super::{literals, write_list, AsFortran, Unparser};
use crate::ir::{
    ArrayRef, CoarrayRef, Component, ComplexPart, DataRef, DescriptorField,
    DescriptorInquiry, Designator, NamedEntity, Subscript, Substring,
    SubstringParent, SymbolIdx, Team, Triplet, TypeParamInquiry,
};

impl AsFortran for SymbolIdx {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        cx.write_symbol(w, *self, None)
    }
}

impl AsFortran for Component {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        self.base.as_fortran(cx, w)?;
        w.write_char('%')?;
        self.symbol.as_fortran(cx, w)
    }
}

impl AsFortran for NamedEntity {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        match self {
            NamedEntity::Symbol(symbol) => symbol.as_fortran(cx, w),
            NamedEntity::Component(component) => component.as_fortran(cx, w),
        }
    }
}

/// Writes `lower:upper` and `:stride` when a stride is present. Absent
/// bounds leave their side of the colon empty.
impl AsFortran for Triplet {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        if let Some(lower) = &self.lower {
            lower.as_fortran(cx, w)?;
        }

        w.write_char(':')?;

        if let Some(upper) = &self.upper {
            upper.as_fortran(cx, w)?;
        }

        if let Some(stride) = &self.stride {
            w.write_char(':')?;
            stride.as_fortran(cx, w)?;
        }

        Ok(())
    }
}

impl AsFortran for Subscript {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        match self {
            Subscript::Expr(expr) => expr.as_fortran(cx, w),
            Subscript::Triplet(triplet) => triplet.as_fortran(cx, w),
        }
    }
}

impl AsFortran for ArrayRef {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        self.base.as_fortran(cx, w)?;
        w.write_char('(')?;
        write_list(cx, w, &self.subscripts)?;
        w.write_char(')')
    }
}

impl AsFortran for CoarrayRef {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        self.base().as_fortran(cx, w)?;
        w.write_char('[')?;
        write_list(cx, w, self.cosubscripts())?;

        if let Some(stat) = self.stat() {
            w.write_str(",STAT=")?;
            stat.as_fortran(cx, w)?;
        }

        match self.team() {
            Some(Team::Number(number)) => {
                w.write_str(",TEAM_NUMBER=")?;
                number.as_fortran(cx, w)?;
            }
            Some(Team::Variable(team)) => {
                w.write_str(",TEAM=")?;
                team.as_fortran(cx, w)?;
            }
            None => {}
        }

        w.write_char(']')
    }
}

impl AsFortran for DataRef {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        match self {
            DataRef::Symbol(symbol) => symbol.as_fortran(cx, w),
            DataRef::Component(component) => component.as_fortran(cx, w),
            DataRef::ArrayRef(array) => array.as_fortran(cx, w),
            DataRef::CoarrayRef(coarray) => coarray.as_fortran(cx, w),
        }
    }
}

impl AsFortran for Substring {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        match &self.parent {
            SubstringParent::DataRef(parent) => parent.as_fortran(cx, w)?,
            SubstringParent::Literal { kind, value } => {
                literals::write_character(w, value, *kind)?
            }
        }

        w.write_char('(')?;

        if let Some(lower) = &self.lower {
            lower.as_fortran(cx, w)?;
        }

        w.write_char(':')?;

        if let Some(upper) = &self.upper {
            upper.as_fortran(cx, w)?;
        }

        w.write_char(')')
    }
}

impl AsFortran for ComplexPart {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        let part: &str = self.part.into();

        self.complex.as_fortran(cx, w)?;
        write!(w, "%{part}")
    }
}

impl AsFortran for Designator {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        match self {
            Designator::DataRef(data_ref) => data_ref.as_fortran(cx, w),
            Designator::Substring(substring) => substring.as_fortran(cx, w),
            Designator::ComplexPart(part) => part.as_fortran(cx, w),
        }
    }
}

impl AsFortran for TypeParamInquiry {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        if let Some(base) = &self.base {
            base.as_fortran(cx, w)?;
            w.write_char('%')?;
        }

        self.parameter.as_fortran(cx, w)
    }
}

impl AsFortran for DescriptorInquiry {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        w.write_str(match self.field {
            DescriptorField::LowerBound => "lbound(",
            DescriptorField::Extent => "size(",
            DescriptorField::Stride => "%STRIDE(",
            DescriptorField::Rank => "int(rank(",
            DescriptorField::Len => "int(",
        })?;

        self.base.as_fortran(cx, w)?;

        match self.field {
            DescriptorField::Len => w.write_str("%len")?,
            DescriptorField::Rank => w.write_char(')')?,
            _ => {
                if let Some(dim) = self.dimension {
                    write!(w, ",dim={}", dim + 1)?;
                }
            }
        }

        w.write_str(",kind=8)")
    }
}
