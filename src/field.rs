// Prime field Z_p.
// Moduli here are small demonstration primes, values fit in i64 and
// products are taken in i128.
use crate::common::EcError;
use std::fmt;

/// Trial division up to sqrt(n).
pub fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2i64;
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// The integers modulo a prime p.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrimeField {
    p: i64,
}

impl PrimeField {
    /// p must be an odd prime, the inverse below relies on it.
    pub fn new(p: i64) -> Result<Self, EcError> {
        if p <= 2 || !is_prime(p) {
            return Err(EcError::InvalidModulus(p));
        }
        Ok(Self { p })
    }

    #[inline]
    pub fn modulus(&self) -> i64 {
        self.p
    }

    /// Residue of v in [0,p), also for negative v.
    #[inline]
    pub fn reduce(&self, v: i128) -> i64 {
        v.rem_euclid(self.p as i128) as i64
    }

    #[inline]
    pub fn mul(&self, a: i64, b: i64) -> i64 {
        self.reduce(a as i128 * b as i128)
    }

    /// compute base**exp mod p.
    pub fn pow_mod(&self, base: i64, exp: u64) -> i64 {
        let mut ret = 1 % self.p;
        let mut b = self.reduce(base as i128);
        let mut e = exp;
        while e != 0 {
            if e & 1 != 0 {
                ret = self.mul(ret, b);
            }
            b = self.mul(b, b);
            e >>= 1;
        }
        ret
    }

    /// inverse: since p is a prime, a^(p-1) = 1,
    /// so a*a^(p-2) = 1 and a^(p-2) is the inverse.
    pub fn mod_inverse(&self, a: i64) -> Result<i64, EcError> {
        let a = self.reduce(a as i128);
        if a == 0 {
            return Err(EcError::DivisionByZero);
        }
        Ok(self.pow_mod(a, (self.p - 2) as u64))
    }
}

impl fmt::Display for PrimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ECGroup : prime = {}", self.p)
    }
}

#[test]
fn test_is_prime() {
    assert!(is_prime(11));
    assert!(is_prime(2));
    assert!(is_prime(31));
    assert!(!is_prime(12));
    assert!(!is_prime(4));
    assert!(!is_prime(1));
    assert!(!is_prime(0));
    assert!(!is_prime(-7));
    assert!(!is_prime(49));
    assert!(is_prime(10_000_000_000_037));
    assert!(!is_prime(i64::MAX));
}

#[test]
fn test_field_new() {
    assert_eq!(PrimeField::new(11).unwrap().modulus(), 11);
    assert_eq!(PrimeField::new(12), Err(EcError::InvalidModulus(12)));
    assert_eq!(PrimeField::new(4), Err(EcError::InvalidModulus(4)));
    assert_eq!(PrimeField::new(2), Err(EcError::InvalidModulus(2)));
    assert_eq!(PrimeField::new(-11), Err(EcError::InvalidModulus(-11)));
}

#[test]
fn test_reduce_negative() {
    let f = PrimeField::new(11).unwrap();
    assert_eq!(f.reduce(-4), 7);
    assert_eq!(f.reduce(-11), 0);
    assert_eq!(f.reduce(25), 3);
}

#[test]
fn test_mod_inverse() {
    let f = PrimeField::new(11).unwrap();
    for a in 1..11 {
        let inv = f.mod_inverse(a).unwrap();
        assert_eq!(f.mul(a, inv), 1);
    }
    assert_eq!(f.mod_inverse(8).unwrap(), 7);
    assert_eq!(f.mod_inverse(-3).unwrap(), f.mod_inverse(8).unwrap());
    assert_eq!(f.mod_inverse(0), Err(EcError::DivisionByZero));
    assert_eq!(f.mod_inverse(22), Err(EcError::DivisionByZero));
}

#[test]
fn test_pow_mod() {
    let f = PrimeField::new(17).unwrap();
    assert_eq!(f.pow_mod(5, 0), 1);
    assert_eq!(f.pow_mod(2, 4), 16);
    // Fermat.
    for a in 1..17 {
        assert_eq!(f.pow_mod(a, 16), 1);
    }
}
