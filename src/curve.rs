// Short Weierstrass curve y^2 = x^3 + ax + b over a prime field.
// The field is passed to every operation, the curve never owns one.
use crate::common::EcError;
use crate::field::PrimeField;
use crate::point::{GroupElement, Point};
use log::debug;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Curve {
    pub a: i64,
    pub b: i64,
}

/// The cyclic subgroup generated by one origin.
#[derive(Clone, Debug)]
pub struct Subgroup {
    pub origin: GroupElement,
    /// Starts with the identity, then origin, 2*origin, ...
    pub elements: Vec<GroupElement>,
}

impl Subgroup {
    pub fn order(&self) -> usize {
        self.elements.len()
    }
}

impl Curve {
    pub fn new(a: i64, b: i64) -> Self {
        Self { a, b }
    }

    /// x^3 + ax + b mod p.
    pub fn rhs(&self, x: i64, field: &PrimeField) -> i64 {
        let x2 = field.mul(x, x);
        field.reduce(
            field.mul(x2, x) as i128 + field.mul(self.a, x) as i128 + self.b as i128,
        )
    }

    /// Chord-and-tangent addition. The identity on either side returns
    /// the other operand unchanged.
    pub fn add(
        &self,
        p: &GroupElement,
        q: &GroupElement,
        field: &PrimeField,
    ) -> Result<GroupElement, EcError> {
        if p.is_identity() {
            return Ok(*q);
        }
        if q.is_identity() {
            return Ok(*p);
        }
        let (px, py, qx, qy) = match (p.point(), q.point()) {
            (Point::Infinity, _) => return Ok(*q),
            (_, Point::Infinity) => return Ok(*p),
            (Point::Finite { x: px, y: py }, Point::Finite { x: qx, y: qy }) => (
                field.reduce(px as i128),
                field.reduce(py as i128),
                field.reduce(qx as i128),
                field.reduce(qy as i128),
            ),
        };

        let t = if px == qx {
            if py != qy || py == 0 {
                // P + (-P), or the vertical tangent at a 2-torsion point.
                return Ok(GroupElement::identity());
            }
            // Doubling: (3x^2 + a) / 2y.
            let num = field.reduce(3 * field.mul(px, px) as i128 + self.a as i128);
            field.mul(num, field.mod_inverse(field.mul(2, py))?)
        } else {
            // Chord: (qy - py) / (qx - px).
            let num = field.reduce(qy as i128 - py as i128);
            field.mul(num, field.mod_inverse(field.reduce(qx as i128 - px as i128))?)
        };

        let x = field.reduce(t as i128 * t as i128 - px as i128 - qx as i128);
        let y = field.reduce(t as i128 * (px as i128 - x as i128) - py as i128);
        GroupElement::new(Point::new(x, y), field, self, p.k() + q.k())
    }

    /// (x, -y), with the multiplier negated.
    pub fn negate(&self, p: &GroupElement, field: &PrimeField) -> Result<GroupElement, EcError> {
        if p.is_identity() {
            return Ok(GroupElement::identity());
        }
        match p.point() {
            Point::Infinity => GroupElement::new(Point::Infinity, field, self, -p.k()),
            Point::Finite { x, y } => {
                GroupElement::new(Point::new(x, field.reduce(-(y as i128))), field, self, -p.k())
            }
        }
    }

    pub fn subtract(
        &self,
        p: &GroupElement,
        q: &GroupElement,
        field: &PrimeField,
    ) -> Result<GroupElement, EcError> {
        self.add(p, &self.negate(q, field)?, field)
    }

    /// Adds `origin` to a running point until it comes back to a point
    /// already seen or to the identity.
    ///
    /// Returns the generated points, identity first, and their count,
    /// which is the order of `origin`.
    pub fn cyclic_subgroup(
        &self,
        origin: &GroupElement,
        field: &PrimeField,
    ) -> Result<(Vec<GroupElement>, usize), EcError> {
        let mut generated = vec![GroupElement::identity()];
        let mut p = *origin;
        while !generated.contains(&p) && !p.is_identity() {
            generated.push(p);
            p = self.add(&p, origin, field)?;
        }
        let order = generated.len();
        debug!("origin {} has order {}", origin, order);
        Ok((generated, order))
    }

    pub fn order(&self, origin: &GroupElement, field: &PrimeField) -> Result<usize, EcError> {
        Ok(self.cyclic_subgroup(origin, field)?.1)
    }

    /// Every point of the curve, point at infinity first.
    ///
    /// Square roots are found by linear search, the first root y found is
    /// emitted together with p - y.
    pub fn curve_points(&self, field: &PrimeField) -> Vec<Point> {
        let p = field.modulus();
        let mut ret = vec![Point::Infinity];
        for x in 0..p {
            let ysq = self.rhs(x, field);
            if ysq == 0 {
                ret.push(Point::new(x, 0));
            } else if let Some(y) = (1..p).find(|&y| field.mul(y, y) == ysq) {
                ret.push(Point::new(x, y));
                ret.push(Point::new(x, p - y));
            }
        }
        debug!("{} points on {} over {}", ret.len(), self, p);
        ret
    }

    /// The subgroup generated by each point of the curve.
    pub fn subgroups(&self, field: &PrimeField) -> Result<Vec<Subgroup>, EcError> {
        self.curve_points(field)
            .into_iter()
            .map(|point| {
                let origin = GroupElement::origin(point, field, self)?;
                let (elements, _) = self.cyclic_subgroup(&origin, field)?;
                Ok(Subgroup { origin, elements })
            })
            .collect()
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.a, self.b) {
            (0, 0) => write!(f, "ECCurve : y^2 = x^3"),
            (0, b) => write!(f, "ECCurve : y^2 = x^3 + {}", b),
            (a, 0) => write!(f, "ECCurve : y^2 = x^3 + {}x", a),
            (a, b) => write!(f, "ECCurve : y^2 = x^3 + {}x + {}", a, b),
        }
    }
}

#[cfg(test)]
fn secp_toy() -> (PrimeField, Curve) {
    (PrimeField::new(11).unwrap(), Curve::new(0, 7))
}

#[cfg(test)]
fn all_elements(field: &PrimeField, curve: &Curve) -> Vec<GroupElement> {
    curve
        .curve_points(field)
        .into_iter()
        .map(|p| GroupElement::origin(p, field, curve).unwrap())
        .collect()
}

#[test]
fn test_double() {
    let (field, curve) = secp_toy();
    let p = GroupElement::origin(Point::new(4, 4), &field, &curve).unwrap();
    // t = 48 * 8^-1 = 6 mod 11.
    let r = curve.add(&p, &p, &field).unwrap();
    assert_eq!(r.point(), Point::new(6, 6));
    assert_eq!(r.k(), 2);
    assert!(r.point().is_valid(&field, &curve));
}

#[test]
fn test_negate() {
    let (field, curve) = secp_toy();
    let p = GroupElement::origin(Point::new(4, 4), &field, &curve).unwrap();
    let n = curve.negate(&p, &field).unwrap();
    assert_eq!(n.point(), Point::new(4, 7));
    assert_eq!(n.k(), -1);
    assert!(curve.add(&p, &n, &field).unwrap().is_identity());
    assert!(curve
        .negate(&GroupElement::identity(), &field)
        .unwrap()
        .is_identity());
}

#[test]
fn test_two_torsion() {
    let (field, curve) = secp_toy();
    let p = GroupElement::origin(Point::new(5, 0), &field, &curve).unwrap();
    assert!(curve.add(&p, &p, &field).unwrap().is_identity());
    assert_eq!(curve.negate(&p, &field).unwrap(), p);
    assert_eq!(curve.order(&p, &field).unwrap(), 2);
}

#[test]
fn test_subtract() {
    let (field, curve) = secp_toy();
    let p = GroupElement::origin(Point::new(4, 4), &field, &curve).unwrap();
    let p2 = curve.add(&p, &p, &field).unwrap();
    let r = curve.subtract(&p2, &p, &field).unwrap();
    assert_eq!(r, p);
    assert_eq!(r.k(), 1);
    assert!(curve.subtract(&p, &p, &field).unwrap().is_identity());
}

#[test]
fn test_identity_is_k_zero() {
    let (field, curve) = secp_toy();
    let p = GroupElement::origin(Point::new(4, 4), &field, &curve).unwrap();
    let q = GroupElement::origin(Point::new(5, 0), &field, &curve).unwrap();
    let d = curve.subtract(&p, &q, &field).unwrap();
    assert!(d.point().is_valid(&field, &curve));
    assert_ne!(d.point(), Point::Infinity);
    assert_eq!(d.k(), 0);
    assert!(d.is_identity());
    assert_eq!(curve.add(&d, &p, &field).unwrap(), p);
}

#[test]
fn test_unreduced_coordinates() {
    // (15, 4) is (4, 4) written outside [0, p).
    let (field, curve) = secp_toy();
    let p = GroupElement::origin(Point::new(4, 4), &field, &curve).unwrap();
    let q = GroupElement::origin(Point::new(15, 4), &field, &curve).unwrap();
    let r = curve.add(&p, &q, &field).unwrap();
    assert_eq!(r.point(), Point::new(6, 6));
}

#[test]
fn test_cyclic_subgroup() {
    let (field, curve) = secp_toy();
    let origin = GroupElement::origin(Point::new(4, 4), &field, &curve).unwrap();
    let (seq, order) = curve.cyclic_subgroup(&origin, &field).unwrap();
    let expected = [
        Point::Infinity,
        Point::new(4, 4),
        Point::new(6, 6),
        Point::new(2, 9),
        Point::new(3, 10),
        Point::new(7, 3),
        Point::new(5, 0),
        Point::new(7, 8),
        Point::new(3, 1),
        Point::new(2, 2),
        Point::new(6, 5),
        Point::new(4, 7),
    ];
    assert_eq!(order, 12);
    assert_eq!(seq.len(), order);
    for (i, (e, p)) in seq.iter().zip(expected.iter()).enumerate() {
        assert_eq!(e.point(), *p);
        assert_eq!(e.k(), i as i64);
    }
    // The last element plus the origin closes the cycle.
    let last = seq.last().unwrap();
    assert!(curve.add(last, &origin, &field).unwrap().is_identity());
}

#[test]
fn test_infinity_origin() {
    let (field, curve) = secp_toy();
    let origin = GroupElement::origin(Point::Infinity, &field, &curve).unwrap();
    let (seq, order) = curve.cyclic_subgroup(&origin, &field).unwrap();
    assert_eq!(order, 1);
    assert!(seq[0].is_identity());
}

#[test]
fn test_curve_points() {
    let (field, curve) = secp_toy();
    let points = curve.curve_points(&field);
    assert_eq!(points[0], Point::Infinity);
    assert_eq!(points.len(), 12);
    assert_eq!(points[1], Point::new(2, 2));
    assert_eq!(points[2], Point::new(2, 9));
    let finite_nonzero = points
        .iter()
        .filter(|p| matches!(p, Point::Finite { y, .. } if *y != 0))
        .count();
    assert_eq!(finite_nonzero % 2, 0);
}

#[test]
fn test_curve_points_brute_force() {
    for (p, a, b) in [(11, 0, 7), (31, 0, 7), (17, 2, 2), (23, 1, 1), (13, -3, 5)] {
        let field = PrimeField::new(p).unwrap();
        let curve = Curve::new(a, b);
        let mut found: Vec<(i64, i64)> = curve
            .curve_points(&field)
            .iter()
            .filter_map(|p| p.coords())
            .collect();
        let mut brute = vec![];
        for x in 0..p {
            for y in 0..p {
                if Point::new(x, y).is_valid(&field, &curve) {
                    brute.push((x, y));
                }
            }
        }
        found.sort();
        assert_eq!(found, brute);
    }
}

#[test]
fn test_double_root_symmetry() {
    let field = PrimeField::new(31).unwrap();
    let curve = Curve::new(0, 7);
    let points = curve.curve_points(&field);
    for x in 0..31 {
        if curve.rhs(x, &field) == 0 {
            continue;
        }
        let ys: Vec<i64> = points
            .iter()
            .filter_map(|p| p.coords())
            .filter(|&(px, _)| px == x)
            .map(|(_, y)| y)
            .collect();
        if !ys.is_empty() {
            assert_eq!(ys.len(), 2);
            assert_eq!(ys[0] + ys[1], 31);
        }
    }
}

#[test]
fn test_group_laws() {
    let (field, curve) = secp_toy();
    let elements = all_elements(&field, &curve);
    let id = GroupElement::identity();
    for p in &elements {
        assert_eq!(curve.add(p, &id, &field).unwrap(), *p);
        assert_eq!(curve.add(&id, p, &field).unwrap(), *p);
        let n = curve.negate(p, &field).unwrap();
        assert!(n.point().is_valid(&field, &curve));
        assert_eq!(curve.add(p, &n, &field).unwrap(), id);
        for q in &elements {
            let pq = curve.add(p, q, &field).unwrap();
            let qp = curve.add(q, p, &field).unwrap();
            assert_eq!(pq, qp);
            assert!(pq.point().is_valid(&field, &curve));
            let d = curve.subtract(p, q, &field).unwrap();
            assert!(d.point().is_valid(&field, &curve));
            for r in &elements {
                let left = curve.add(&pq, r, &field).unwrap();
                let qr = curve.add(q, r, &field).unwrap();
                let right = curve.add(p, &qr, &field).unwrap();
                assert_eq!(left, right);
            }
        }
    }
}

#[test]
fn test_associativity_sampled() {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    let field = PrimeField::new(97).unwrap();
    let curve = Curve::new(2, 3);
    let elements = all_elements(&field, &curve);
    let mut rng = ChaCha20Rng::seed_from_u64(0x5eed);
    for _ in 0..2000 {
        let p = &elements[rng.gen_range(0..elements.len())];
        let q = &elements[rng.gen_range(0..elements.len())];
        let r = &elements[rng.gen_range(0..elements.len())];
        let left = curve
            .add(&curve.add(p, q, &field).unwrap(), r, &field)
            .unwrap();
        let right = curve
            .add(p, &curve.add(q, r, &field).unwrap(), &field)
            .unwrap();
        assert_eq!(left, right);
    }
}

#[test]
fn test_order_divides_group_size() {
    for (p, a, b) in [(11, 0, 7), (31, 0, 7), (97, 2, 3)] {
        let field = PrimeField::new(p).unwrap();
        let curve = Curve::new(a, b);
        let n = curve.curve_points(&field).len();
        for group in curve.subgroups(&field).unwrap() {
            assert_eq!(n % group.order(), 0);
        }
    }
}

#[test]
fn test_large_prime() {
    // x^3 alone no longer fits in i128 here.
    let field = PrimeField::new(10_000_000_000_037).unwrap();
    let (x, y) = (9_999_999_999_999, 123_456_789);
    let b = field.reduce(field.mul(y, y) as i128 - field.mul(field.mul(x, x), x) as i128);
    let curve = Curve::new(0, b);
    assert!(Point::new(x, y).is_valid(&field, &curve));
    assert!(!Point::new(9_999_999_999_999, 1).is_valid(&field, &Curve::new(0, 7)));

    let p = GroupElement::origin(Point::new(x, y), &field, &curve).unwrap();
    let p2 = curve.add(&p, &p, &field).unwrap();
    let p3 = curve.add(&p2, &p, &field).unwrap();
    assert!(p2.point().is_valid(&field, &curve));
    assert!(p3.point().is_valid(&field, &curve));
    assert_eq!(p3.k(), 3);
    assert_eq!(curve.subtract(&p3, &p, &field).unwrap(), p2);
    let n = curve.negate(&p, &field).unwrap();
    assert!(curve.add(&p, &n, &field).unwrap().is_identity());
}

#[test]
fn test_curve_display() {
    assert_eq!(Curve::new(0, 7).to_string(), "ECCurve : y^2 = x^3 + 7");
    assert_eq!(Curve::new(3, 0).to_string(), "ECCurve : y^2 = x^3 + 3x");
    assert_eq!(Curve::new(0, 0).to_string(), "ECCurve : y^2 = x^3");
    assert_eq!(Curve::new(2, 3).to_string(), "ECCurve : y^2 = x^3 + 2x + 3");
}
