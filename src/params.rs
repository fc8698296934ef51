//! Attack parameters and derived bounds
//!
//! The attack is driven by five inputs: the modulus N, the public exponent e,
//! the shift-polynomial degree m, the number of extra y-shift blocks t, and
//! the exponent delta bounding the unknown d < N^delta. From these the root
//! bounds are derived once and cached:
//!
//! ```text
//! A = N + 1
//! X = ⌊e^delta⌋      bound on |x₀| = k
//! Y = 3·⌊√e⌋        bound on |y₀| = p + q
//! ```

use crate::arith::pow;
use crate::error::{AttackError, Result};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::One;

/// Validated inputs for one attack run.
#[derive(Debug, Clone)]
pub struct AttackParameters {
    /// RSA modulus
    pub n: BigInt,
    /// Public exponent
    pub e: BigInt,
    /// Maximum power of f used for shift polynomials
    pub m: usize,
    /// Number of additional y-shift blocks
    pub t: usize,
    /// Bound exponent: d < N^delta, in thousandths (417 means 0.417)
    pub delta_millis: u32,
}

impl AttackParameters {
    pub fn new(n: BigInt, e: BigInt, m: usize, t: usize, delta: f64) -> Result<Self> {
        if n <= BigInt::one() {
            return Err(AttackError::InvalidParameters(format!(
                "modulus must exceed 1, got {n}"
            )));
        }
        if e <= BigInt::one() {
            return Err(AttackError::InvalidParameters(format!(
                "public exponent must exceed 1, got {e}"
            )));
        }
        if m == 0 {
            return Err(AttackError::InvalidParameters(
                "degree m must be at least 1".into(),
            ));
        }
        if t == 0 {
            return Err(AttackError::InvalidParameters(
                "shift count t must be at least 1".into(),
            ));
        }
        if Self::checked_dimension(m, t).is_none() {
            return Err(AttackError::InvalidParameters(format!(
                "lattice dimension overflows for m={m}, t={t}"
            )));
        }
        if !(delta > 0.0 && delta < 0.5) {
            return Err(AttackError::InvalidParameters(format!(
                "delta must lie in (0, 0.5), got {delta}"
            )));
        }

        let delta_millis = (delta * 1000.0).round() as u32;
        if delta_millis == 0 || delta_millis >= 500 {
            return Err(AttackError::InvalidParameters(format!(
                "delta {delta} rounds outside the usable (0.001, 0.499) range"
            )));
        }

        Ok(Self {
            n,
            e,
            m,
            t,
            delta_millis,
        })
    }

    /// Full lattice dimension (m+1)(m+2)/2 + t(m+1).
    pub fn dimension(&self) -> usize {
        (self.m + 1) * (self.m + 2) / 2 + self.t * (self.m + 1)
    }

    fn checked_dimension(m: usize, t: usize) -> Option<usize> {
        let m1 = m.checked_add(1)?;
        let m2 = m.checked_add(2)?;
        let x_block = m1.checked_mul(m2)? / 2;
        let y_block = t.checked_mul(m1)?;
        x_block.checked_add(y_block)
    }

    /// Dimension of the sub-lattice that survives deletion: (m+1)(t+1).
    pub fn sub_dimension(&self) -> usize {
        (self.m + 1) * (self.t + 1)
    }
}

/// Root bounds cached for the whole pipeline.
#[derive(Debug, Clone)]
pub struct Bounds {
    /// A = N + 1
    pub a: BigInt,
    /// X = ⌊e^delta⌋
    pub x: BigInt,
    /// Y = 3·⌊√e⌋
    pub y: BigInt,
}

impl Bounds {
    pub fn compute(params: &AttackParameters) -> Self {
        let a = &params.n + 1;

        // e^(num/den) = (e^num)^(1/den) with num/den = delta in lowest terms
        let g = (params.delta_millis as u64).gcd(&1000);
        let num = (params.delta_millis as u64 / g) as u32;
        let den = (1000 / g) as u32;
        let x = pow(&params.e, num).nth_root(den);

        let y = params.e.sqrt() * 3;

        Self { a, x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_rejects_bad_inputs() {
        let n = BigInt::from(2173);
        let e = BigInt::from(1387);

        assert!(AttackParameters::new(BigInt::one(), e.clone(), 3, 1, 0.1).is_err());
        assert!(AttackParameters::new(n.clone(), BigInt::one(), 3, 1, 0.1).is_err());
        assert!(AttackParameters::new(n.clone(), e.clone(), 0, 1, 0.1).is_err());
        assert!(AttackParameters::new(n.clone(), e.clone(), 3, 0, 0.1).is_err());
        assert!(AttackParameters::new(n.clone(), e.clone(), 3, 1, 0.5).is_err());
        assert!(AttackParameters::new(n.clone(), e.clone(), 3, 1, -0.1).is_err());
        // More y-shift blocks than the degree is unusual but well defined
        assert!(AttackParameters::new(n.clone(), e.clone(), 3, 4, 0.1).is_ok());
        assert!(AttackParameters::new(n, e, 3, 1, 0.1).is_ok());
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let n = BigInt::from(2173);
        let e = BigInt::from(1387);
        assert!(AttackParameters::new(n.clone(), e.clone(), usize::MAX - 1, 1, 0.1).is_err());
        assert!(AttackParameters::new(n, e, 3, usize::MAX / 2, 0.1).is_err());
    }

    #[test]
    fn advisor_recommendation_is_accepted() {
        // optimal_t(1) = 2 exceeds m; the validator must still take it.
        for m in 1..=8 {
            let t = crate::advisor::optimal_t(m);
            assert!(
                AttackParameters::new(BigInt::from(2173), BigInt::from(1387), m, t, 0.1).is_ok(),
                "recommended (m={m}, t={t}) rejected"
            );
        }
    }

    #[test]
    fn dimensions() {
        let params =
            AttackParameters::new(BigInt::from(2173), BigInt::from(1387), 3, 1, 0.1).unwrap();
        // (3+1)(3+2)/2 + 1·(3+1) = 10 + 4 = 14
        assert_eq!(params.dimension(), 14);
        // (3+1)(1+1) = 8
        assert_eq!(params.sub_dimension(), 8);
    }

    #[test]
    fn bounds_for_toy_modulus() {
        let params =
            AttackParameters::new(BigInt::from(2173), BigInt::from(1387), 3, 1, 0.1).unwrap();
        let bounds = Bounds::compute(&params);

        assert_eq!(bounds.a, BigInt::from(2174));
        // 1387^(1/10) = 2.06... so X = 2
        assert_eq!(bounds.x, BigInt::from(2));
        // ⌊√1387⌋ = 37, Y = 111
        assert_eq!(bounds.y, BigInt::from(111));
    }
}
