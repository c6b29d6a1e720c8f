//! Spelling of types.

use std::fmt::{self, Write};

use super::{AsFortran, Unparser};
use crate::ir::{CharLength, DerivedTypeSpec, DynamicType, ParamValue};

impl AsFortran for ParamValue {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        match self {
            ParamValue::Explicit(expr) => expr.as_fortran(cx, w),
            ParamValue::Assumed => w.write_char('*'),
            ParamValue::Deferred => w.write_char(':'),
        }
    }
}

/// Writes the derived type name followed by its parameter values, if any:
/// `t` or `t(k=4,n=:)`.
impl AsFortran for DerivedTypeSpec {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        cx.write_symbol(w, self.type_symbol, self.name.as_deref())?;

        if self.parameters.is_empty() {
            return Ok(());
        }

        for (i, (name, value)) in self.parameters.iter().enumerate() {
            w.write_char(if i == 0 { '(' } else { ',' })?;
            write!(w, "{name}=")?;
            value.as_fortran(cx, w)?;
        }

        w.write_char(')')
    }
}

impl AsFortran for CharLength {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        match self {
            CharLength::Known(len) => write!(w, "{len}_8"),
            CharLength::Param(value) => value.as_fortran(cx, w),
        }
    }
}

impl AsFortran for DynamicType {
    fn as_fortran<W>(&self, cx: &Unparser, w: &mut W) -> fmt::Result
    where
        W: Write,
    {
        match self {
            DynamicType::Intrinsic(category, kind) => {
                let category: &str = category.into();

                write!(w, "{category}({kind})")
            }
            DynamicType::Character { kind, len: None } => {
                write!(w, "CHARACTER({kind})")
            }
            DynamicType::Character {
                kind,
                len: Some(len),
            } => {
                write!(w, "CHARACTER(KIND={kind},LEN=")?;
                len.as_fortran(cx, w)?;
                w.write_char(')')
            }
            DynamicType::Derived { spec, polymorphic } => {
                w.write_str(if *polymorphic { "CLASS(" } else { "TYPE(" })?;
                spec.as_fortran(cx, w)?;
                w.write_char(')')
            }
            DynamicType::UnlimitedPolymorphic => w.write_str("CLASS(*)"),
            DynamicType::AssumedType => w.write_str("TYPE(*)"),
            DynamicType::TypelessIntrinsicArgument => {
                w.write_str("(typeless intrinsic function argument)")
            }
        }
    }
}

impl Unparser<'_> {
    /// Writes the type-spec of an array constructor. Derived types appear
    /// without the `TYPE(...)` wrapper there. A character type-spec is given
    /// `len` as its length when present.
    pub(super) fn write_type_spec<W>(
        &self,
        w: &mut W,
        ty: &DynamicType,
        len: Option<&str>,
    ) -> fmt::Result
    where
        W: Write,
    {
        match (ty, len) {
            (DynamicType::Character { kind, .. }, Some(len)) => {
                write!(w, "CHARACTER(KIND={kind},LEN={len})")
            }
            (DynamicType::Derived { spec, .. }, _) => spec.as_fortran(self, w),
            _ => ty.as_fortran(self, w),
        }
    }
}
