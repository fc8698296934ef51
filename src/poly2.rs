//! Bivariate polynomials over Z
//!
//! Sparse representation keyed by (x-power, y-power). The lattice rows are
//! coefficient vectors of these polynomials; after reduction the short rows
//! are turned back into polynomials and pairs of them are collapsed to one
//! variable by a resultant that eliminates x.
//!
//! The resultant is the determinant of the Sylvester matrix of the two
//! polynomials viewed over Z[y], computed with the fraction-free Bareiss
//! algorithm so every intermediate division is exact.

use crate::arith::pow;
use crate::error::{AttackError, Result};
use crate::unipoly::UniPoly;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use std::collections::BTreeMap;
use std::fmt;

/// Sparse bivariate polynomial; zero coefficients are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Poly2 {
    terms: BTreeMap<(u32, u32), BigInt>,
}

impl Poly2 {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn monomial_count(&self) -> usize {
        self.terms.len()
    }

    /// Add `coeff * x^xp * y^yp` into the polynomial.
    pub fn add_term(&mut self, xp: u32, yp: u32, coeff: BigInt) {
        if coeff.is_zero() {
            return;
        }
        let entry = self.terms.entry((xp, yp)).or_insert_with(BigInt::zero);
        *entry += coeff;
        if entry.is_zero() {
            self.terms.remove(&(xp, yp));
        }
    }

    /// Sum of two polynomials; cancelling monomials disappear.
    pub fn add(&self, other: &Poly2) -> Poly2 {
        let mut out = self.clone();
        for (&(xp, yp), c) in &other.terms {
            out.add_term(xp, yp, c.clone());
        }
        out
    }

    pub fn coeff(&self, xp: u32, yp: u32) -> BigInt {
        self.terms.get(&(xp, yp)).cloned().unwrap_or_else(BigInt::zero)
    }

    /// Iterate terms as ((x-power, y-power), coefficient).
    pub fn terms(&self) -> impl Iterator<Item = (&(u32, u32), &BigInt)> {
        self.terms.iter()
    }

    /// Multiply by `scalar * x^dx * y^dy`.
    pub fn mul_monomial(&self, dx: u32, dy: u32, scalar: &BigInt) -> Poly2 {
        if scalar.is_zero() {
            return Poly2::zero();
        }
        let terms = self
            .terms
            .iter()
            .map(|(&(xp, yp), c)| ((xp + dx, yp + dy), c * scalar))
            .collect();
        Poly2 { terms }
    }

    pub fn eval(&self, x: &BigInt, y: &BigInt) -> BigInt {
        self.terms
            .iter()
            .map(|(&(xp, yp), c)| c * pow(x, xp) * pow(y, yp))
            .fold(BigInt::zero(), |acc, v| acc + v)
    }

    /// Highest power of x appearing.
    pub fn deg_x(&self) -> u32 {
        self.terms.keys().map(|&(xp, _)| xp).max().unwrap_or(0)
    }

    /// Weighted coefficient norm Σ |c_{a,b}| · X^a · Y^b.
    ///
    /// For a polynomial recovered from a reduced lattice row this equals the
    /// row's 1-norm, so it is the quantity the Howgrave-Graham bound speaks
    /// about.
    pub fn weighted_norm(&self, x_bound: &BigInt, y_bound: &BigInt) -> BigInt {
        self.terms
            .iter()
            .map(|(&(xp, yp), c)| c.abs() * pow(x_bound, xp) * pow(y_bound, yp))
            .fold(BigInt::zero(), |acc, v| acc + v)
    }

    /// Coefficient of x^i as a polynomial in y.
    pub fn coeff_of_x(&self, i: u32) -> UniPoly {
        let max_y = self
            .terms
            .keys()
            .filter(|&&(xp, _)| xp == i)
            .map(|&(_, yp)| yp)
            .max();
        let Some(max_y) = max_y else {
            return UniPoly::zero();
        };
        let mut coeffs = vec![BigInt::zero(); max_y as usize + 1];
        for (&(xp, yp), c) in &self.terms {
            if xp == i {
                coeffs[yp as usize] = c.clone();
            }
        }
        UniPoly::from_coeffs(coeffs)
    }

    /// Resultant of `f` and `g` with respect to x, as a polynomial in y.
    ///
    /// Returns the zero polynomial when f and g share a factor (singular
    /// Sylvester matrix). Errors only on degenerate input where the
    /// resultant is undefined (a polynomial that is zero).
    pub fn resultant_x(f: &Poly2, g: &Poly2) -> Result<UniPoly> {
        if f.is_zero() || g.is_zero() {
            return Err(AttackError::DegenerateResultant(
                "resultant of the zero polynomial".into(),
            ));
        }

        let df = f.deg_x() as usize;
        let dg = g.deg_x() as usize;
        let n = df + dg;
        if n == 0 {
            // Both constant in x: empty Sylvester matrix, determinant 1
            return Ok(UniPoly::one());
        }

        let f_coeffs: Vec<UniPoly> = (0..=df as u32).map(|i| f.coeff_of_x(i)).collect();
        let g_coeffs: Vec<UniPoly> = (0..=dg as u32).map(|i| g.coeff_of_x(i)).collect();

        // Sylvester matrix: dg rows of f's coefficients, df rows of g's,
        // each shifted right by the row offset, highest x-power first.
        let mut matrix = vec![vec![UniPoly::zero(); n]; n];
        for r in 0..dg {
            for (i, c) in f_coeffs.iter().rev().enumerate() {
                matrix[r][r + i] = c.clone();
            }
        }
        for r in 0..df {
            for (i, c) in g_coeffs.iter().rev().enumerate() {
                matrix[dg + r][r + i] = c.clone();
            }
        }

        bareiss_determinant(matrix)
    }
}

/// Fraction-free determinant over Z[y] with row-swap pivoting.
fn bareiss_determinant(mut m: Vec<Vec<UniPoly>>) -> Result<UniPoly> {
    let n = m.len();
    let mut sign = 1i32;
    let mut prev = UniPoly::one();

    for k in 0..n.saturating_sub(1) {
        if m[k][k].is_zero() {
            let pivot = (k + 1..n).find(|&r| !m[r][k].is_zero());
            match pivot {
                Some(r) => {
                    m.swap(k, r);
                    sign = -sign;
                }
                // Whole column zero: determinant vanishes
                None => return Ok(UniPoly::zero()),
            }
        }

        for i in k + 1..n {
            for j in k + 1..n {
                let num = &(&m[k][k] * &m[i][j]) - &(&m[i][k] * &m[k][j]);
                m[i][j] = num.exact_div(&prev).ok_or_else(|| {
                    AttackError::Inconsistency(
                        "Bareiss elimination produced a non-exact division".into(),
                    )
                })?;
            }
            m[i][k] = UniPoly::zero();
        }
        prev = m[k][k].clone();
    }

    let det = m[n - 1][n - 1].clone();
    Ok(if sign < 0 { &UniPoly::zero() - &det } else { det })
}

impl fmt::Display for Poly2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for (&(xp, yp), c) in &self.terms {
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            write!(f, "{}", c)?;
            if xp > 0 {
                write!(f, "*x^{}", xp)?;
            }
            if yp > 0 {
                write!(f, "*y^{}", yp)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(xp: u32, yp: u32, c: i64) -> Poly2 {
        let mut p = Poly2::zero();
        p.add_term(xp, yp, BigInt::from(c));
        p
    }

    #[test]
    fn term_accumulation_cancels() {
        let mut p = Poly2::zero();
        p.add_term(1, 2, BigInt::from(5));
        p.add_term(1, 2, BigInt::from(-5));
        assert!(p.is_zero());
    }

    #[test]
    fn add_merges_and_cancels() {
        // (2xy + 3) + (-2xy + y^2) = 3 + y^2
        let mut a = term(1, 1, 2);
        a.add_term(0, 0, BigInt::from(3));
        let mut b = term(1, 1, -2);
        b.add_term(0, 2, BigInt::from(1));

        let sum = a.add(&b);
        assert_eq!(sum.coeff(1, 1), BigInt::from(0));
        assert_eq!(sum.coeff(0, 0), BigInt::from(3));
        assert_eq!(sum.coeff(0, 2), BigInt::from(1));
        assert_eq!(sum.monomial_count(), 2);

        // Inputs untouched
        assert_eq!(a.coeff(1, 1), BigInt::from(2));
        assert!(a.add(&term(1, 1, -2)).add(&term(0, 0, -3)).is_zero());
    }

    #[test]
    fn eval_and_norm() {
        // 2xy - 3
        let mut p = Poly2::zero();
        p.add_term(1, 1, BigInt::from(2));
        p.add_term(0, 0, BigInt::from(-3));

        assert_eq!(
            p.eval(&BigInt::from(4), &BigInt::from(5)),
            BigInt::from(37)
        );
        // |2|·X·Y + |−3| with X=10, Y=100
        assert_eq!(
            p.weighted_norm(&BigInt::from(10), &BigInt::from(100)),
            BigInt::from(2003)
        );
        assert_eq!(p.monomial_count(), 2);
    }

    #[test]
    fn coeff_of_x_slices() {
        // x^2·(y+1) + x·7 + y^3
        let mut p = Poly2::zero();
        p.add_term(2, 1, BigInt::from(1));
        p.add_term(2, 0, BigInt::from(1));
        p.add_term(1, 0, BigInt::from(7));
        p.add_term(0, 3, BigInt::from(1));

        assert_eq!(p.deg_x(), 2);
        assert_eq!(
            p.coeff_of_x(2),
            UniPoly::from_coeffs(vec![BigInt::from(1), BigInt::from(1)])
        );
        assert_eq!(p.coeff_of_x(1), UniPoly::constant(BigInt::from(7)));
        assert_eq!(
            p.coeff_of_x(0),
            UniPoly::from_coeffs(vec![
                BigInt::from(0),
                BigInt::from(0),
                BigInt::from(0),
                BigInt::from(1)
            ])
        );
    }

    #[test]
    fn resultant_eliminates_x() {
        // f = xy - 1, g = x + y: res_x(f, g) = lc(f)^1 · g(1/y) = y^2 + 1
        let f = {
            let mut p = term(1, 1, 1);
            p.add_term(0, 0, BigInt::from(-1));
            p
        };
        let g = {
            let mut p = term(1, 0, 1);
            p.add_term(0, 1, BigInt::from(1));
            p
        };

        let res = Poly2::resultant_x(&f, &g).unwrap();
        let expect = UniPoly::from_coeffs(vec![
            BigInt::from(1),
            BigInt::from(0),
            BigInt::from(1),
        ]);
        assert_eq!(res, expect);
    }

    #[test]
    fn resultant_of_shared_factor_is_zero() {
        // f = (x + y)·x, g = (x + y)·y share the factor x + y
        let f = {
            let mut p = term(2, 0, 1);
            p.add_term(1, 1, BigInt::from(1));
            p
        };
        let g = {
            let mut p = term(1, 1, 1);
            p.add_term(0, 2, BigInt::from(1));
            p
        };

        let res = Poly2::resultant_x(&f, &g).unwrap();
        assert!(res.is_zero());
    }

    #[test]
    fn resultant_rejects_zero_input() {
        let f = term(1, 0, 1);
        assert!(Poly2::resultant_x(&f, &Poly2::zero()).is_err());
    }

    #[test]
    fn resultant_roots_match_common_solutions() {
        // f = x - y, g = x·x - 9: common solutions need y = x = ±3,
        // so res_x(f, g) as a polynomial in y vanishes at y = ±3.
        let f = {
            let mut p = term(1, 0, 1);
            p.add_term(0, 1, BigInt::from(-1));
            p
        };
        let g = {
            let mut p = term(2, 0, 1);
            p.add_term(0, 0, BigInt::from(-9));
            p
        };

        let res = Poly2::resultant_x(&f, &g).unwrap();
        assert!(!res.is_zero());
        assert_eq!(res.eval(&BigInt::from(3)), BigInt::zero());
        assert_eq!(res.eval(&BigInt::from(-3)), BigInt::zero());
        assert_ne!(res.eval(&BigInt::from(2)), BigInt::zero());
    }
}
