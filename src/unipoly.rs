//! Univariate polynomials over Z
//!
//! Dense coefficient vectors, low degree first, with no trailing zeros. Used
//! as the coefficient ring of the Sylvester matrix (entries are polynomials
//! in y once x has been eliminated) and as the resultant output fed to the
//! integer root finder.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::ops::{Add, Mul, Neg, Sub};

/// Polynomial in one variable with BigInt coefficients.
///
/// The zero polynomial has an empty coefficient vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniPoly {
    /// Coefficients, index i holds the coefficient of y^i
    pub coeffs: Vec<BigInt>,
}

impl UniPoly {
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    pub fn one() -> Self {
        Self::constant(BigInt::one())
    }

    pub fn constant(c: BigInt) -> Self {
        Self::from_coeffs(vec![c])
    }

    /// Build from a low-to-high coefficient vector, trimming trailing zeros.
    pub fn from_coeffs(mut coeffs: Vec<BigInt>) -> Self {
        while coeffs.last().map_or(false, |c| c.is_zero()) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Degree; the zero polynomial reports 0.
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn leading_coeff(&self) -> BigInt {
        self.coeffs.last().cloned().unwrap_or_else(BigInt::zero)
    }

    /// Horner evaluation.
    pub fn eval(&self, x: &BigInt) -> BigInt {
        let mut acc = BigInt::zero();
        for c in self.coeffs.iter().rev() {
            acc = acc * x + c;
        }
        acc
    }

    pub fn derivative(&self) -> UniPoly {
        if self.coeffs.len() <= 1 {
            return UniPoly::zero();
        }
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, c)| c * BigInt::from(i))
            .collect();
        UniPoly::from_coeffs(coeffs)
    }

    /// Gcd of all coefficients, non-negative; 0 for the zero polynomial.
    pub fn content(&self) -> BigInt {
        self.coeffs
            .iter()
            .fold(BigInt::zero(), |acc, c| acc.gcd(c))
    }

    /// Divide out the content, normalizing the leading coefficient positive.
    pub fn primitive_part(&self) -> UniPoly {
        if self.is_zero() {
            return UniPoly::zero();
        }
        let mut cont = self.content();
        if self.leading_coeff().is_negative() {
            cont = -cont;
        }
        let coeffs = self.coeffs.iter().map(|c| c / &cont).collect();
        UniPoly::from_coeffs(coeffs)
    }

    pub fn mul_scalar(&self, s: &BigInt) -> UniPoly {
        if s.is_zero() {
            return UniPoly::zero();
        }
        UniPoly::from_coeffs(self.coeffs.iter().map(|c| c * s).collect())
    }

    /// Exact division: returns Some(q) iff `self = q * d` over Z.
    pub fn exact_div(&self, d: &UniPoly) -> Option<UniPoly> {
        if d.is_zero() {
            return None;
        }
        if self.is_zero() {
            return Some(UniPoly::zero());
        }
        if self.degree() < d.degree() {
            return None;
        }

        let mut rem = self.coeffs.clone();
        let dd = d.degree();
        let lc = d.leading_coeff();
        let mut quot = vec![BigInt::zero(); self.degree() - dd + 1];

        for i in (dd..rem.len()).rev() {
            if rem[i].is_zero() {
                continue;
            }
            let (q, r) = rem[i].div_rem(&lc);
            if !r.is_zero() {
                return None;
            }
            for (j, dc) in d.coeffs.iter().enumerate() {
                rem[i - dd + j] -= &q * dc;
            }
            quot[i - dd] = q;
        }

        if rem.iter().any(|c| !c.is_zero()) {
            return None;
        }
        Some(UniPoly::from_coeffs(quot))
    }

    /// Pseudo-remainder: prem(self, d) with multiplier lc(d)^(deg self - deg d + 1).
    fn pseudo_rem(&self, d: &UniPoly) -> UniPoly {
        let mut rem = self.clone();
        let dd = d.degree();
        let lc = d.leading_coeff();

        while !rem.is_zero() && rem.degree() >= dd {
            let shift = rem.degree() - dd;
            let rlc = rem.leading_coeff();
            // rem = lc*rem - rlc * y^shift * d
            let mut next = rem.mul_scalar(&lc).coeffs;
            for (j, dc) in d.coeffs.iter().enumerate() {
                next[shift + j] -= &rlc * dc;
            }
            rem = UniPoly::from_coeffs(next);
        }
        rem
    }

    /// Polynomial gcd over Z via the primitive polynomial remainder sequence.
    /// The result is primitive with positive leading coefficient.
    pub fn gcd(&self, other: &UniPoly) -> UniPoly {
        if self.is_zero() {
            return other.primitive_part();
        }
        if other.is_zero() {
            return self.primitive_part();
        }

        let (mut a, mut b) = if self.degree() >= other.degree() {
            (self.primitive_part(), other.primitive_part())
        } else {
            (other.primitive_part(), self.primitive_part())
        };

        while !b.is_zero() {
            let r = a.pseudo_rem(&b).primitive_part();
            a = b;
            b = r;
        }
        a.primitive_part()
    }

    /// Square-free part: self / gcd(self, self'), made primitive.
    pub fn square_free_part(&self) -> UniPoly {
        if self.is_zero() || self.degree() == 0 {
            return self.primitive_part();
        }
        let g = self.gcd(&self.derivative());
        if g.degree() == 0 {
            return self.primitive_part();
        }
        // Division is exact up to content since g | self over Q
        let p = self.primitive_part();
        match p.exact_div(&g) {
            Some(q) => q.primitive_part(),
            // g is primitive and divides p over Z, so this branch is
            // unreachable; fall back to the primitive part to stay total.
            None => p,
        }
    }
}

impl Add for &UniPoly {
    type Output = UniPoly;

    fn add(self, other: Self) -> UniPoly {
        let len = self.coeffs.len().max(other.coeffs.len());
        let mut coeffs = vec![BigInt::zero(); len];
        for (i, c) in self.coeffs.iter().enumerate() {
            coeffs[i] += c;
        }
        for (i, c) in other.coeffs.iter().enumerate() {
            coeffs[i] += c;
        }
        UniPoly::from_coeffs(coeffs)
    }
}

impl Sub for &UniPoly {
    type Output = UniPoly;

    fn sub(self, other: Self) -> UniPoly {
        let len = self.coeffs.len().max(other.coeffs.len());
        let mut coeffs = vec![BigInt::zero(); len];
        for (i, c) in self.coeffs.iter().enumerate() {
            coeffs[i] += c;
        }
        for (i, c) in other.coeffs.iter().enumerate() {
            coeffs[i] -= c;
        }
        UniPoly::from_coeffs(coeffs)
    }
}

impl Mul for &UniPoly {
    type Output = UniPoly;

    fn mul(self, other: Self) -> UniPoly {
        if self.is_zero() || other.is_zero() {
            return UniPoly::zero();
        }
        let mut coeffs = vec![BigInt::zero(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        UniPoly::from_coeffs(coeffs)
    }
}

impl Neg for &UniPoly {
    type Output = UniPoly;

    fn neg(self) -> UniPoly {
        UniPoly {
            coeffs: self.coeffs.iter().map(|c| -c).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(coeffs: &[i64]) -> UniPoly {
        UniPoly::from_coeffs(coeffs.iter().map(|&c| BigInt::from(c)).collect())
    }

    #[test]
    fn arithmetic_basics() {
        let a = p(&[1, 2]); // 1 + 2y
        let b = p(&[3, 0, 1]); // 3 + y^2

        assert_eq!(&a + &b, p(&[4, 2, 1]));
        assert_eq!(&b - &a, p(&[2, -2, 1]));
        assert_eq!(&a * &b, p(&[3, 6, 1, 2]));
        assert_eq!(a.eval(&BigInt::from(5)), BigInt::from(11));
    }

    #[test]
    fn trailing_zeros_trimmed() {
        let a = p(&[1, 2, 0, 0]);
        assert_eq!(a.degree(), 1);
        let diff = &p(&[1, 1, 3]) - &p(&[0, 0, 3]);
        assert_eq!(diff, p(&[1, 1]));
    }

    #[test]
    fn exact_division() {
        // (y+2)(y-3) = y^2 - y - 6
        let prod = p(&[-6, -1, 1]);
        assert_eq!(prod.exact_div(&p(&[2, 1])), Some(p(&[-3, 1])));
        // Non-exact: y^2 - y - 6 by y - 1
        assert_eq!(prod.exact_div(&p(&[-1, 1])), None);
        // 2y + 4 by y + 2 is exact; 2y + 4 by 2y + 1 is not
        assert_eq!(p(&[4, 2]).exact_div(&p(&[2, 1])), Some(p(&[2])));
        assert_eq!(p(&[4, 2]).exact_div(&p(&[1, 2])), None);
    }

    #[test]
    fn gcd_of_shared_factor() {
        // a = (y-1)(y+2), b = (y-1)(y+5)
        let a = &p(&[-1, 1]) * &p(&[2, 1]);
        let b = &p(&[-1, 1]) * &p(&[5, 1]);
        assert_eq!(a.gcd(&b), p(&[-1, 1]));

        // Coprime
        assert_eq!(p(&[1, 1]).gcd(&p(&[2, 1])), p(&[1]));
    }

    #[test]
    fn square_free_part_strips_multiplicity() {
        // (y-2)^2 (y+1) -> (y-2)(y+1)
        let sq = &(&p(&[-2, 1]) * &p(&[-2, 1])) * &p(&[1, 1]);
        let sf = sq.square_free_part();
        assert_eq!(sf, &p(&[-2, 1]) * &p(&[1, 1]));
    }

    #[test]
    fn content_and_primitive_part() {
        let a = p(&[-6, -9, -3]);
        assert_eq!(a.content(), BigInt::from(3));
        // Leading coefficient normalized positive
        assert_eq!(a.primitive_part(), p(&[2, 3, 1]));
    }
}
