//! Designators: references to data objects and parts of them.

use strum_macros::IntoStaticStr;

use super::expr::Expr;
use super::symbols::SymbolIdx;
use super::types::Kind;

#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    pub base: DataRef,
    pub symbol: SymbolIdx,
}

/// A whole named object or a structure component, without subscripts.
#[derive(Clone, Debug, PartialEq)]
pub enum NamedEntity {
    Symbol(SymbolIdx),
    Component(Box<Component>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Triplet {
    pub lower: Option<Expr>,
    pub upper: Option<Expr>,
    pub stride: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Subscript {
    Expr(Expr),
    Triplet(Triplet),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayRef {
    pub base: NamedEntity,
    pub subscripts: Vec<Subscript>,
}

/// Team selector of a coindexed reference.
#[derive(Clone, Debug, PartialEq)]
pub enum Team {
    /// `TEAM_NUMBER=`
    Number(Expr),
    /// `TEAM=`
    Variable(Expr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CoarrayRef {
    base: DataRef,
    cosubscripts: Vec<Expr>,
    stat: Option<Expr>,
    team: Option<Team>,
}

impl CoarrayRef {
    /// # Panics
    ///
    /// Panics if `cosubscripts` is empty.
    pub fn new(base: DataRef, cosubscripts: Vec<Expr>) -> CoarrayRef {
        assert!(
            !cosubscripts.is_empty(),
            "coindexed reference without cosubscripts"
        );

        CoarrayRef {
            base,
            cosubscripts,
            stat: None,
            team: None,
        }
    }

    pub fn with_stat(mut self, stat: Expr) -> CoarrayRef {
        self.stat = Some(stat);
        self
    }

    pub fn with_team(mut self, team: Team) -> CoarrayRef {
        self.team = Some(team);
        self
    }

    pub fn base(&self) -> &DataRef {
        &self.base
    }

    pub fn cosubscripts(&self) -> &[Expr] {
        &self.cosubscripts
    }

    pub fn stat(&self) -> Option<&Expr> {
        self.stat.as_ref()
    }

    pub fn team(&self) -> Option<&Team> {
        self.team.as_ref()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DataRef {
    Symbol(SymbolIdx),
    Component(Box<Component>),
    ArrayRef(Box<ArrayRef>),
    CoarrayRef(Box<CoarrayRef>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubstringParent {
    DataRef(DataRef),
    /// A character literal, as in `"abcdef"(2:3)`.
    Literal { kind: Kind, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Substring {
    pub parent: SubstringParent,
    pub lower: Option<Expr>,
    pub upper: Option<Expr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr)]
pub enum Part {
    #[strum(to_string = "RE")]
    Re,
    #[strum(to_string = "IM")]
    Im,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComplexPart {
    pub complex: DataRef,
    pub part: Part,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Designator {
    DataRef(DataRef),
    Substring(Box<Substring>),
    ComplexPart(Box<ComplexPart>),
}

/// Inquiry of a type parameter of an object, or of the enclosing derived
/// type's own parameter when `base` is absent.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeParamInquiry {
    pub base: Option<NamedEntity>,
    pub parameter: SymbolIdx,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptorField {
    LowerBound,
    Extent,
    Stride,
    Rank,
    Len,
}

/// Read of a field of an object's descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct DescriptorInquiry {
    pub base: NamedEntity,
    pub field: DescriptorField,
    /// Zero-based dimension, when the field is per-dimension.
    pub dimension: Option<u32>,
}

impl From<SymbolIdx> for DataRef {
    fn from(symbol: SymbolIdx) -> Self {
        DataRef::Symbol(symbol)
    }
}

impl From<NamedEntity> for DataRef {
    fn from(entity: NamedEntity) -> Self {
        match entity {
            NamedEntity::Symbol(symbol) => DataRef::Symbol(symbol),
            NamedEntity::Component(component) => DataRef::Component(component),
        }
    }
}

impl From<DataRef> for Designator {
    fn from(data_ref: DataRef) -> Self {
        Designator::DataRef(data_ref)
    }
}
