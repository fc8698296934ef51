//! Gram-Schmidt orthogonalization over exact rationals
//!
//! Given basis B = [b_1, ..., b_n], compute the coefficients μ_ij and the
//! squared norms of the orthogonal vectors b*_i:
//!
//! ```text
//! b*_1 = b_1
//! b*_i = b_i - Σ_{j<i} μ_ij b*_j
//! μ_ij = <b_i, b*_j> / <b*_j, b*_j>
//! ```
//!
//! Only the μ matrix and the ||b*_i||² values are stored; the orthogonal
//! vectors themselves are never materialized.

use super::basis::LatticeBasis;
use crate::rational::Rational;
use num_bigint::BigInt;
use num_traits::Signed;

/// Gram-Schmidt orthogonalization data (exact rational representation)
#[derive(Debug, Clone)]
pub struct GramSchmidt {
    /// Gram-Schmidt coefficients μ_ij, stored lower-triangular: mu[i][j] for j < i
    pub mu: Vec<Vec<Rational>>,
    /// Squared norms ||b*_i||^2 (exact rationals)
    pub b_star_norms_sq: Vec<Rational>,
    /// Dimension
    pub n: usize,
}

impl GramSchmidt {
    /// Compute Gram-Schmidt orthogonalization from a lattice basis.
    pub fn compute(basis: &LatticeBasis) -> Self {
        let n = basis.n;

        let mut mu: Vec<Vec<Rational>> = (0..n).map(|i| vec![Rational::zero(); i]).collect();
        let mut b_star_norms_sq = vec![Rational::zero(); n];

        // Inner products <b_i, b_j> (precompute for efficiency)
        let inner_products: Vec<Vec<BigInt>> = (0..n)
            .map(|i| (0..=i).map(|j| basis.inner_product(i, j)).collect())
            .collect();

        b_star_norms_sq[0] = Rational::from_bigint(inner_products[0][0].clone());

        for i in 1..n {
            // Recurrence: <b_i, b*_j> = <b_i, b_j> - Σ_{k<j} μ_jk <b_i, b*_k>
            let mut inner_with_b_star: Vec<Rational> = vec![Rational::zero(); i];

            for j in 0..i {
                let mut inner_i_bstarj = Rational::from_bigint(inner_products[i][j].clone());

                for k in 0..j {
                    let prod = &mu[j][k] * &inner_with_b_star[k];
                    inner_i_bstarj = inner_i_bstarj - prod;
                }

                inner_with_b_star[j] = inner_i_bstarj.clone();

                // μ_ij = <b_i, b*_j> / ||b*_j||^2
                mu[i][j] = inner_i_bstarj.div_exact(&b_star_norms_sq[j]);
            }

            // ||b*_i||^2 = <b_i, b_i> - Σ_{j<i} μ_ij <b_i, b*_j>
            let mut b_star_i_sq = Rational::from_bigint(inner_products[i][i].clone());
            for j in 0..i {
                let prod = &mu[i][j] * &inner_with_b_star[j];
                b_star_i_sq = b_star_i_sq - prod;
            }
            b_star_norms_sq[i] = b_star_i_sq;
        }

        Self {
            mu,
            b_star_norms_sq,
            n,
        }
    }

    /// Get μ_ij (only defined for j < i).
    pub fn get_mu(&self, i: usize, j: usize) -> &Rational {
        assert!(j < i, "μ_ij only defined for j < i");
        &self.mu[i][j]
    }

    /// Check if μ_ij needs size reduction (|μ_ij| > 1/2).
    pub fn needs_size_reduction(&self, i: usize, j: usize) -> bool {
        let mu = self.get_mu(i, j);
        // |μ| > 1/2  ⟺  |2*num| > |den|
        let two_num: BigInt = &mu.numerator * 2;
        two_num.abs() > mu.denominator.abs()
    }

    /// Check the Lovász condition at position k:
    ///
    /// δ ||b*_{k-1}||² ≤ ||b*_k||² + μ_{k,k-1}² ||b*_{k-1}||²
    ///
    /// with δ = delta_num / delta_den, decided by exact cross-multiplication.
    pub fn check_lovasz(&self, k: usize, delta_num: i64, delta_den: i64) -> bool {
        if k == 0 {
            return true;
        }

        let lhs_num = BigInt::from(delta_num) * &self.b_star_norms_sq[k - 1].numerator;
        let lhs_den = BigInt::from(delta_den) * &self.b_star_norms_sq[k - 1].denominator;

        let mu_k = &self.mu[k][k - 1];
        let b_star_k = &self.b_star_norms_sq[k];
        let b_star_km1 = &self.b_star_norms_sq[k - 1];

        let mu_sq = Rational::new(
            &mu_k.numerator * &mu_k.numerator,
            &mu_k.denominator * &mu_k.denominator,
        );

        // RHS = ||b*_k||² + μ² ||b*_{k-1}||²
        let term2 = &mu_sq * b_star_km1;
        let rhs = b_star_k + &term2;

        // lhs_num/lhs_den ≤ rhs_num/rhs_den  ⟺  lhs_num·rhs_den ≤ rhs_num·lhs_den
        lhs_num * rhs.denominator <= rhs.numerator * lhs_den
    }

    /// Update Gram-Schmidt after the size reduction b_k = b_k - q * b_j.
    pub fn update_size_reduction(&mut self, k: usize, j: usize, q: &BigInt) {
        // μ_kj -= q
        let q_rat = Rational::from_bigint(q.clone());
        self.mu[k][j] = self.mu[k][j].clone() - q_rat;

        // μ_ki -= q * μ_ji for i < j
        for i in 0..j {
            let mu_ji = self.mu[j][i].clone();
            let prod = Rational::new(q * &mu_ji.numerator, mu_ji.denominator);
            self.mu[k][i] = self.mu[k][i].clone() - prod;
        }
    }
}
