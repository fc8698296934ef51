//! Lattice basis representation

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use std::fmt;

/// A lattice basis represented as a matrix of row vectors.
///
/// Each row b_i is a basis vector in Z^m; the lattice is
/// L(B) = {Σ x_i b_i : x_i ∈ Z}.
#[derive(Debug, Clone)]
pub struct LatticeBasis {
    /// Basis vectors as rows (n vectors of dimension m)
    pub vectors: Vec<Vec<BigInt>>,
    /// Number of basis vectors (rank)
    pub n: usize,
    /// Dimension of the ambient space
    pub m: usize,
}

impl LatticeBasis {
    /// Create a new lattice basis from row vectors.
    ///
    /// # Panics
    /// Panics if the basis is empty or rows have inconsistent dimensions.
    pub fn new(vectors: Vec<Vec<BigInt>>) -> Self {
        assert!(!vectors.is_empty(), "Basis cannot be empty");
        let m = vectors[0].len();
        assert!(m > 0, "Vectors cannot be empty");
        assert!(
            vectors.iter().all(|v| v.len() == m),
            "All vectors must have the same dimension"
        );

        let n = vectors.len();
        Self { vectors, n, m }
    }

    /// Create a lattice basis from integer slices.
    pub fn from_rows<T: Into<BigInt> + Clone>(rows: &[Vec<T>]) -> Self {
        let vectors: Vec<Vec<BigInt>> = rows
            .iter()
            .map(|row| row.iter().map(|x| x.clone().into()).collect())
            .collect();
        Self::new(vectors)
    }

    /// Get vector at index i.
    pub fn get(&self, i: usize) -> &[BigInt] {
        &self.vectors[i]
    }

    /// Swap two basis vectors.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.vectors.swap(i, j);
    }

    /// Compute inner product <b_i, b_j>.
    pub fn inner_product(&self, i: usize, j: usize) -> BigInt {
        self.vectors[i]
            .iter()
            .zip(self.vectors[j].iter())
            .map(|(a, b)| a * b)
            .fold(BigInt::zero(), |acc, x| acc + x)
    }

    /// Compute squared norm ||b_i||^2.
    pub fn norm_squared(&self, i: usize) -> BigInt {
        self.inner_product(i, i)
    }

    /// Update b_i = b_i - q * b_j (size reduction step).
    pub fn reduce_vector(&mut self, i: usize, j: usize, q: &BigInt) {
        for k in 0..self.m {
            self.vectors[i][k] = &self.vectors[i][k] - q * &self.vectors[j][k];
        }
    }

    /// Get maximum absolute entry.
    pub fn max_entry(&self) -> BigInt {
        self.vectors
            .iter()
            .flat_map(|v| v.iter())
            .map(|x| x.abs())
            .max()
            .unwrap_or_else(BigInt::zero)
    }
}

impl fmt::Display for LatticeBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LatticeBasis ({}×{}):", self.n, self.m)?;
        for (i, v) in self.vectors.iter().enumerate() {
            write!(f, "  b_{}: [", i)?;
            for (j, x) in v.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", x)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_creation() {
        let basis = LatticeBasis::from_rows(&[
            vec![1i64, 0, 3],
            vec![0, 1, 5],
            vec![0, 0, 7],
        ]);

        assert_eq!(basis.n, 3);
        assert_eq!(basis.m, 3);
    }

    #[test]
    fn test_inner_product() {
        let basis = LatticeBasis::from_rows(&[
            vec![1i64, 2, 3],
            vec![4, 5, 6],
        ]);

        // <b_0, b_0> = 1 + 4 + 9 = 14
        assert_eq!(basis.norm_squared(0), BigInt::from(14));

        // <b_0, b_1> = 4 + 10 + 18 = 32
        assert_eq!(basis.inner_product(0, 1), BigInt::from(32));
    }

    #[test]
    fn test_reduce_vector() {
        let mut basis = LatticeBasis::from_rows(&[
            vec![1i64, 2],
            vec![3, 7],
        ]);

        basis.reduce_vector(1, 0, &BigInt::from(3));
        assert_eq!(basis.get(1), &[BigInt::from(0), BigInt::from(1)]);
        assert_eq!(basis.max_entry(), BigInt::from(2));
    }
}
