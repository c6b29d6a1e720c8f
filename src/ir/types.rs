//! Dynamic types of values.

use strum_macros::IntoStaticStr;

use super::expr::Expr;
use super::symbols::SymbolIdx;

/// A kind type parameter value.
pub type Kind = u8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum TypeCategory {
    Integer,
    Unsigned,
    Real,
    Complex,
    Character,
    Logical,
    Derived,
}

impl TypeCategory {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TypeCategory::Integer
                | TypeCategory::Unsigned
                | TypeCategory::Real
                | TypeCategory::Complex
        )
    }
}

/// Value of a length or derived type parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Explicit(Box<Expr>),
    Assumed,
    Deferred,
}

/// Length of a character type.
#[derive(Clone, Debug, PartialEq)]
pub enum CharLength {
    Known(i64),
    Param(ParamValue),
}

/// A derived type together with values for its type parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedTypeSpec {
    pub type_symbol: SymbolIdx,
    /// Name through which the type is referenced, when it differs from the
    /// declared name of `type_symbol` (e.g. a use-renamed type).
    pub name: Option<String>,
    pub parameters: Vec<(String, ParamValue)>,
}

impl DerivedTypeSpec {
    pub fn new(type_symbol: SymbolIdx) -> DerivedTypeSpec {
        DerivedTypeSpec {
            type_symbol,
            name: None,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter<S: Into<String>>(
        mut self,
        name: S,
        value: ParamValue,
    ) -> DerivedTypeSpec {
        self.parameters.push((name.into(), value));
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DynamicType {
    /// A numeric or logical type.
    Intrinsic(TypeCategory, Kind),
    Character {
        kind: Kind,
        len: Option<CharLength>,
    },
    Derived {
        spec: Box<DerivedTypeSpec>,
        polymorphic: bool,
    },
    UnlimitedPolymorphic,
    AssumedType,
    /// Placeholder type of BOZ and NULL() actual arguments to intrinsics.
    TypelessIntrinsicArgument,
}

impl DynamicType {
    pub fn integer(kind: Kind) -> DynamicType {
        DynamicType::Intrinsic(TypeCategory::Integer, kind)
    }

    pub fn unsigned(kind: Kind) -> DynamicType {
        DynamicType::Intrinsic(TypeCategory::Unsigned, kind)
    }

    pub fn real(kind: Kind) -> DynamicType {
        DynamicType::Intrinsic(TypeCategory::Real, kind)
    }

    pub fn complex(kind: Kind) -> DynamicType {
        DynamicType::Intrinsic(TypeCategory::Complex, kind)
    }

    pub fn logical(kind: Kind) -> DynamicType {
        DynamicType::Intrinsic(TypeCategory::Logical, kind)
    }

    pub fn character(kind: Kind, len: Option<CharLength>) -> DynamicType {
        DynamicType::Character { kind, len }
    }

    pub fn derived(spec: DerivedTypeSpec) -> DynamicType {
        DynamicType::Derived {
            spec: Box::new(spec),
            polymorphic: false,
        }
    }

    pub fn category(&self) -> Option<TypeCategory> {
        match self {
            DynamicType::Intrinsic(category, _) => Some(*category),
            DynamicType::Character { .. } => Some(TypeCategory::Character),
            DynamicType::Derived { .. }
            | DynamicType::UnlimitedPolymorphic => Some(TypeCategory::Derived),
            DynamicType::AssumedType
            | DynamicType::TypelessIntrinsicArgument => None,
        }
    }

    pub fn kind(&self) -> Option<Kind> {
        match self {
            DynamicType::Intrinsic(_, kind)
            | DynamicType::Character { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn known_length(&self) -> Option<i64> {
        match self {
            DynamicType::Character {
                len: Some(CharLength::Known(len)),
                ..
            } => Some(*len),
            _ => None,
        }
    }

    pub fn derived_spec(&self) -> Option<&DerivedTypeSpec> {
        match self {
            DynamicType::Derived { spec, .. } => Some(spec),
            _ => None,
        }
    }
}
