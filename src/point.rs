use crate::common::EcError;
use crate::curve::Curve;
use crate::field::PrimeField;
use std::fmt;

/// Affine point on y^2 = x^3 + ax + b, or the point at infinity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Point {
    Finite { x: i64, y: i64 },
    Infinity,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Point::Finite { x, y }
    }

    /// Checks y^2 = x^3 + ax + b (mod p). The point at infinity is always valid.
    pub fn is_valid(&self, field: &PrimeField, curve: &Curve) -> bool {
        match *self {
            Point::Infinity => true,
            Point::Finite { x, y } => field.mul(y, y) == curve.rhs(x, field),
        }
    }

    pub fn coords(&self) -> Option<(i64, i64)> {
        match *self {
            Point::Finite { x, y } => Some((x, y)),
            Point::Infinity => None,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Point::Finite { x, y } => write!(f, "({},{})", x, y),
            Point::Infinity => write!(f, "(Inf,Inf)"),
        }
    }
}

/// A point checked against a curve, labelled with the multiplier `k`
/// of the origin that produced it.
///
/// `k` is a label for reports and plots. Two elements compare equal when
/// their points do, whatever their multipliers.
#[derive(Clone, Copy, Debug)]
pub struct GroupElement {
    point: Point,
    k: i64,
}

impl GroupElement {
    pub fn new(point: Point, field: &PrimeField, curve: &Curve, k: i64) -> Result<Self, EcError> {
        match point {
            Point::Finite { x, y } if !point.is_valid(field, curve) => {
                Err(EcError::InvalidPoint { x, y })
            }
            _ => Ok(Self { point, k }),
        }
    }

    /// Wrap a point as the generator of a subgroup (k = 1).
    pub fn origin(point: Point, field: &PrimeField, curve: &Curve) -> Result<Self, EcError> {
        Self::new(point, field, curve, 1)
    }

    pub fn identity() -> Self {
        Self {
            point: Point::Infinity,
            k: 0,
        }
    }

    /// The canonical identity check of the group law.
    ///
    /// This looks at `k` only. Multipliers are coherent inside one cyclic
    /// subgroup; subtracting elements of two different origins that carry
    /// the same `k` gives a finite point with `k == 0`, which `add` then
    /// treats as the identity.
    pub fn is_identity(&self) -> bool {
        self.k == 0
    }

    pub fn point(&self) -> Point {
        self.point
    }

    pub fn k(&self) -> i64 {
        self.k
    }
}

impl PartialEq for GroupElement {
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point
    }
}

impl Eq for GroupElement {}

impl fmt::Display for GroupElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.point, self.k)
    }
}

#[test]
fn test_point_eq() {
    assert_eq!(Point::new(4, 4), Point::new(4, 4));
    assert_ne!(Point::new(4, 4), Point::new(4, 7));
    assert_ne!(Point::new(0, 0), Point::Infinity);
    assert_eq!(Point::Infinity, Point::Infinity);
}

#[test]
fn test_point_valid() {
    let field = PrimeField::new(11).unwrap();
    let curve = Curve::new(0, 7);
    assert!(Point::new(4, 4).is_valid(&field, &curve));
    assert!(Point::new(4, 7).is_valid(&field, &curve));
    assert!(!Point::new(4, 5).is_valid(&field, &curve));
    assert!(Point::Infinity.is_valid(&field, &curve));
}

#[test]
fn test_element_new() {
    let field = PrimeField::new(11).unwrap();
    let curve = Curve::new(0, 7);
    let e = GroupElement::origin(Point::new(4, 4), &field, &curve).unwrap();
    assert_eq!(e.k(), 1);
    assert!(!e.is_identity());
    assert_eq!(
        GroupElement::new(Point::new(1, 1), &field, &curve, 1),
        Err(EcError::InvalidPoint { x: 1, y: 1 })
    );
    // Infinity is accepted with any label.
    let inf = GroupElement::origin(Point::Infinity, &field, &curve).unwrap();
    assert_eq!(inf, GroupElement::identity());
    assert!(GroupElement::identity().is_identity());
}

#[test]
fn test_display() {
    let field = PrimeField::new(11).unwrap();
    let curve = Curve::new(0, 7);
    assert_eq!(Point::new(4, 7).to_string(), "(4,7)");
    assert_eq!(Point::Infinity.to_string(), "(Inf,Inf)");
    let e = GroupElement::new(Point::new(4, 7), &field, &curve, -1).unwrap();
    assert_eq!(e.to_string(), "(4,7).-1");
    assert_eq!(GroupElement::identity().to_string(), "(Inf,Inf).0");
}
