//! Lattice construction from shift polynomials
//!
//! The lattice rows are the coefficient vectors of the shift polynomials
//!
//! ```text
//! g_{k,i}(x, y) = x^{k-i} · f(x, y)^i · e^{m-i}        (x-shifts, i ≤ k ≤ m)
//! h_{v,k}(x, y) = y^v · f(x, y)^k · e^{m-k}            (y-shifts, 1 ≤ v ≤ t)
//! ```
//!
//! evaluated at (xX, yY) so that a short row corresponds to a polynomial
//! with small weighted norm. Under the column order below the matrix is
//! lower-triangular with diagonal e^{m-i} X^k Y^i.

use crate::arith::{binomial, pow};
use crate::cancel::CancellationToken;
use crate::error::{AttackError, Result};
use crate::lattice::LatticeBasis;
use crate::params::{AttackParameters, Bounds};
use crate::poly2::Poly2;
use num_bigint::BigInt;
use std::collections::HashMap;

/// Monomial order shared by rows and columns.
///
/// Columns come in two blocks:
/// - x-block: (x^i, y^j) for 0 ≤ j ≤ i ≤ m, at index i(i+1)/2 + j
/// - y-block: (x^j, y^{j+v}) for v = 1..t, j = 0..m, appended per v
#[derive(Debug, Clone)]
pub struct LatticeLayout {
    pub m: usize,
    pub t: usize,
    /// (x-power, y-power) of each column
    pub columns: Vec<(u32, u32)>,
}

impl LatticeLayout {
    pub fn new(m: usize, t: usize) -> Self {
        let mut columns = Vec::with_capacity((m + 1) * (m + 2) / 2 + t * (m + 1));
        for i in 0..=m as u32 {
            for j in 0..=i {
                columns.push((i, j));
            }
        }
        for v in 1..=t as u32 {
            for j in 0..=m as u32 {
                columns.push((j, j + v));
            }
        }
        Self { m, t, columns }
    }

    pub fn dimension(&self) -> usize {
        self.columns.len()
    }
}

/// Expansions of f(xX, yY)^k for k = 0..m, where f(x, y) = x(A + y) - 1.
///
/// The k-th power expands by the binomial theorem to
///
/// ```text
/// Σ_{i=0..k} Σ_{j=0..i} (-1)^{i-j} C(k,i) C(i,j) A^{k-i} X^{k-i+j} Y^j · x^{k-i+j} y^j
/// ```
///
/// Returns None when the token fires mid-expansion.
pub fn polynomial_powers(
    bounds: &Bounds,
    m: usize,
    token: &CancellationToken,
) -> Option<Vec<Poly2>> {
    let mut powers = Vec::with_capacity(m + 1);
    for k in 0..=m as u32 {
        if token.is_canceled() {
            return None;
        }
        let mut poly = Poly2::zero();
        for i in 0..=k {
            for j in 0..=i {
                let mut coeff = binomial(k as u64, i as u64)
                    * binomial(i as u64, j as u64)
                    * pow(&bounds.a, k - i)
                    * pow(&bounds.x, k - i + j)
                    * pow(&bounds.y, j);
                if (i - j) % 2 == 1 {
                    coeff = -coeff;
                }
                poly.add_term(k - i + j, j, coeff);
            }
        }
        powers.push(poly);
    }
    Some(powers)
}

/// Build the full lattice basis. Returns Ok(None) when canceled.
pub fn build(
    params: &AttackParameters,
    bounds: &Bounds,
    token: &CancellationToken,
) -> Result<Option<(LatticeBasis, LatticeLayout)>> {
    let m = params.m;
    let t = params.t;
    let layout = LatticeLayout::new(m, t);
    let dim = layout.dimension();

    let Some(powers) = polynomial_powers(bounds, m, token) else {
        return Ok(None);
    };

    let column_index: HashMap<(u32, u32), usize> = layout
        .columns
        .iter()
        .enumerate()
        .map(|(idx, &c)| (c, idx))
        .collect();

    let mut row_polys = Vec::with_capacity(dim);

    // x-shift rows: x^{k-i} f^i e^{m-i}, ordered so row r pairs with column r
    for k in 0..=m {
        for i in 0..=k {
            if token.is_canceled() {
                return Ok(None);
            }
            let scalar = pow(&bounds.x, (k - i) as u32) * pow(&params.e, (m - i) as u32);
            row_polys.push(powers[i].mul_monomial((k - i) as u32, 0, &scalar));
        }
    }

    // y-shift rows: y^v f^k e^{m-k}
    for v in 1..=t {
        for k in 0..=m {
            if token.is_canceled() {
                return Ok(None);
            }
            let scalar = pow(&bounds.y, v as u32) * pow(&params.e, (m - k) as u32);
            row_polys.push(powers[k].mul_monomial(0, v as u32, &scalar));
        }
    }

    let mut vectors = vec![vec![BigInt::from(0); dim]; dim];
    for (r, poly) in row_polys.iter().enumerate() {
        for (&(xp, yp), c) in poly.terms() {
            let idx = *column_index.get(&(xp, yp)).ok_or_else(|| {
                AttackError::Inconsistency(format!(
                    "shift polynomial row {r} has monomial x^{xp} y^{yp} outside the layout"
                ))
            })?;
            vectors[r][idx] = c.clone();
        }
    }

    log::debug!("built {dim}×{dim} lattice (m={m}, t={t})");
    Ok(Some((LatticeBasis::new(vectors), layout)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    fn toy_params() -> (AttackParameters, Bounds) {
        let params =
            AttackParameters::new(BigInt::from(2173), BigInt::from(1387), 3, 1, 0.1).unwrap();
        let bounds = Bounds::compute(&params);
        (params, bounds)
    }

    #[test]
    fn layout_indexing() {
        let layout = LatticeLayout::new(3, 1);
        assert_eq!(layout.dimension(), 14);
        // x-block index i(i+1)/2 + j
        assert_eq!(layout.columns[0], (0, 0));
        assert_eq!(layout.columns[4], (2, 1));
        assert_eq!(layout.columns[9], (3, 3));
        // y-block follows
        assert_eq!(layout.columns[10], (0, 1));
        assert_eq!(layout.columns[13], (3, 4));
    }

    #[test]
    fn powers_expand_f_exactly() {
        // powers[k](u, w) must equal f(uX, wY)^k for any integers u, w
        let (params, bounds) = toy_params();
        let token = CancellationToken::new();
        let powers = polynomial_powers(&bounds, params.m, &token).unwrap();

        let u = BigInt::from(-3);
        let w = BigInt::from(2);
        let f = &u * &bounds.x * (&bounds.a + &w * &bounds.y) - 1;

        assert_eq!(powers[0].eval(&u, &w), BigInt::from(1));
        assert_eq!(powers[1].eval(&u, &w), f);
        assert_eq!(powers[2].eval(&u, &w), &f * &f);
        assert_eq!(powers[3].eval(&u, &w), &f * &f * &f);
    }

    #[test]
    fn toy_key_root_is_modular() {
        // N = 41·53, e·d = 1387·3 = 2·φ(N) + 1, so k = 2 and
        // f(-k, -(p+q)) = f(-2, -94) ≡ 0 (mod e)
        let (params, bounds) = toy_params();
        let f_val = BigInt::from(-2) * (&bounds.a - BigInt::from(94)) - BigInt::from(1);
        assert!((&f_val % &params.e).is_zero());
    }

    #[test]
    fn lattice_is_lower_triangular_with_expected_diagonal() {
        let (params, bounds) = toy_params();
        let token = CancellationToken::new();
        let (basis, layout) = build(&params, &bounds, &token).unwrap().unwrap();

        assert_eq!(basis.n, 14);
        assert_eq!(basis.m, 14);

        for r in 0..basis.n {
            for c in r + 1..basis.m {
                assert!(
                    basis.vectors[r][c].is_zero(),
                    "entry ({r},{c}) above the diagonal is nonzero"
                );
            }
            assert!(!basis.vectors[r][r].is_zero(), "zero diagonal at {r}");
        }

        // Diagonal of row (k, i) is e^{m-i} X^k Y^i
        let m = params.m;
        let mut r = 0;
        for k in 0..=m {
            for i in 0..=k {
                let expect = pow(&params.e, (m - i) as u32)
                    * pow(&bounds.x, k as u32)
                    * pow(&bounds.y, i as u32);
                assert_eq!(basis.vectors[r][r], expect, "x-shift diagonal ({k},{i})");
                r += 1;
            }
        }
        for v in 1..=params.t {
            for k in 0..=m {
                let expect = pow(&params.e, (m - k) as u32)
                    * pow(&bounds.x, k as u32)
                    * pow(&bounds.y, (k + v) as u32);
                assert_eq!(basis.vectors[r][r], expect, "y-shift diagonal ({v},{k})");
                r += 1;
            }
        }
        let _ = layout;
    }

    #[test]
    fn build_respects_cancellation() {
        let (params, bounds) = toy_params();
        let token = CancellationToken::new();
        token.cancel();
        assert!(build(&params, &bounds, &token).unwrap().is_none());
    }
}
