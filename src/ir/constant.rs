//! Constant values.

use smallvec::SmallVec;

use super::expr::Expr;
use super::symbols::SymbolIdx;
use super::types::{CharLength, DynamicType, Kind};

/// Extents or lower bounds of an array, one entry per dimension.
pub type Shape = SmallVec<[i64; 4]>;

/// Component values of a derived type scalar, in component order.
pub type StructureValues = Vec<(SymbolIdx, Expr)>;

/// A logical value stored as the word it occupies in memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Logical {
    word: i64,
}

impl Logical {
    pub const FALSE: Logical = Logical { word: 0 };
    pub const TRUE: Logical = Logical { word: 1 };

    pub fn from_word(word: i64) -> Logical {
        Logical { word }
    }

    pub fn word(self) -> i64 {
        self.word
    }

    pub fn is_canonical(self) -> bool {
        self.word == 0 || self.word == 1
    }

    pub fn is_true(self) -> bool {
        self.word != 0
    }
}

impl From<bool> for Logical {
    fn from(value: bool) -> Self {
        if value {
            Logical::TRUE
        } else {
            Logical::FALSE
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Integer(i128),
    Unsigned(u128),
    Real(f64),
    Complex(f64, f64),
    Character(String),
    Logical(Logical),
    Derived(StructureValues),
}

/// A scalar or array constant. Array elements are stored in array element
/// order.
#[derive(Clone, Debug, PartialEq)]
pub struct Constant {
    ty: DynamicType,
    values: Vec<Scalar>,
    shape: Shape,
    lbounds: Option<Shape>,
}

impl Constant {
    pub fn scalar(ty: DynamicType, value: Scalar) -> Constant {
        Constant {
            ty,
            values: vec![value],
            shape: Shape::new(),
            lbounds: None,
        }
    }

    /// Creates an array constant.
    ///
    /// # Panics
    ///
    /// Panics if the number of values does not match the shape.
    pub fn array(ty: DynamicType, values: Vec<Scalar>, shape: &[i64]) -> Constant {
        let shape = Shape::from_slice(shape);
        let size: i64 = shape.iter().product();

        assert!(
            shape.iter().all(|&extent| extent >= 0),
            "negative extent in constant shape"
        );
        assert_eq!(
            usize::try_from(size).ok(),
            Some(values.len()),
            "constant shape does not match its element count"
        );

        Constant {
            ty,
            values,
            shape,
            lbounds: None,
        }
    }

    /// Sets the lower bounds of an array constant.
    ///
    /// # Panics
    ///
    /// Panics if the number of bounds differs from the rank.
    pub fn with_lbounds(mut self, lbounds: &[i64]) -> Constant {
        let lbounds = Shape::from_slice(lbounds);

        assert_eq!(lbounds.len(), self.rank(), "lower bounds do not match rank");

        self.lbounds = Some(lbounds);
        self
    }

    pub fn integer(value: i128, kind: Kind) -> Constant {
        Constant::scalar(DynamicType::integer(kind), Scalar::Integer(value))
    }

    pub fn unsigned(value: u128, kind: Kind) -> Constant {
        Constant::scalar(DynamicType::unsigned(kind), Scalar::Unsigned(value))
    }

    pub fn real(value: f64, kind: Kind) -> Constant {
        Constant::scalar(DynamicType::real(kind), Scalar::Real(value))
    }

    pub fn complex(re: f64, im: f64, kind: Kind) -> Constant {
        Constant::scalar(DynamicType::complex(kind), Scalar::Complex(re, im))
    }

    pub fn logical<L: Into<Logical>>(value: L, kind: Kind) -> Constant {
        Constant::scalar(DynamicType::logical(kind), Scalar::Logical(value.into()))
    }

    pub fn character<S: Into<String>>(value: S, kind: Kind) -> Constant {
        let value = value.into();
        let len = value.chars().count() as i64;

        Constant::scalar(
            DynamicType::character(kind, Some(CharLength::Known(len))),
            Scalar::Character(value),
        )
    }

    pub fn ty(&self) -> &DynamicType {
        &self.ty
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    pub fn shape(&self) -> &[i64] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Lower bounds, which default to 1 in every dimension.
    pub fn lbounds(&self) -> Shape {
        match &self.lbounds {
            Some(lbounds) => lbounds.clone(),
            None => self.shape.iter().map(|_| 1).collect(),
        }
    }

    pub fn has_non_default_lower_bound(&self) -> bool {
        self.lbounds
            .as_ref()
            .is_some_and(|lbounds| lbounds.iter().any(|&lb| lb != 1))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self.values.as_slice() {
            [value] if self.rank() == 0 => Some(value),
            _ => None,
        }
    }

    /// Length of each character element: the type's known length, or else
    /// the length of the first element.
    pub fn char_length(&self) -> Option<i64> {
        self.ty.known_length().or_else(|| match self.values.first() {
            Some(Scalar::Character(value)) => Some(value.chars().count() as i64),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lower_bounds() {
        let values = (1..=4).map(Scalar::Integer).collect();
        let array = Constant::array(DynamicType::integer(4), values, &[2, 2]);

        assert_eq!(array.rank(), 2);
        assert_eq!(array.lbounds().as_slice(), &[1, 1]);
        assert!(!array.has_non_default_lower_bound());

        let shifted = array.clone().with_lbounds(&[0, 1]);
        assert!(shifted.has_non_default_lower_bound());

        assert!(!array.with_lbounds(&[1, 1]).has_non_default_lower_bound());
    }

    #[test]
    #[should_panic(expected = "element count")]
    fn mismatched_shape() {
        let values = vec![Scalar::Integer(1)];
        Constant::array(DynamicType::integer(4), values, &[2]);
    }

    #[test]
    fn logical_words() {
        assert!(Logical::TRUE.is_canonical());
        assert!(Logical::from(false).is_canonical());
        assert!(!Logical::from_word(-1).is_canonical());
        assert!(Logical::from_word(-1).is_true());
    }
}
