//! Sub-lattice deletion and exact reconstruction
//!
//! The full lattice is lower-triangular, so rows whose diagonal carries a
//! large power of e dominate the determinant without helping the reduction.
//! Deleting those rows together with their diagonal columns leaves a square
//! sub-lattice of dimension (m+1)(t+1) that LLL reduces far faster.
//!
//! Deleting columns loses coordinates, but not information: on the span of
//! the kept rows every deleted coordinate is an exact integer linear
//! combination of the coordinates to its right along the same monomial
//! diagonal. Reconstruction walks the deleted columns from the highest index
//! down and back-substitutes:
//!
//! ```text
//! value[i] = - Σ_{k > i, aligned} C(·,·) · value[k] / (XY)^Δ
//! ```
//!
//! where aligned means colY[k] - colX[k] = colY[i] - colX[i] and
//! Δ = colX[k] - colX[i] > 0; the binomial is C(colY[k], colY[i]) on the
//! x-block diagonals and C(colX[k], colX[i]) on the y-shift diagonals.
//! Every division is exact; a remainder means the basis was corrupted.

use crate::arith::{binomial, pow};
use crate::builder::LatticeLayout;
use crate::cancel::CancellationToken;
use crate::error::{AttackError, Result};
use crate::lattice::LatticeBasis;
use crate::params::Bounds;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;

/// Which row/column indices survive into the reduced sub-lattice.
#[derive(Debug, Clone)]
pub struct DeletionMask {
    /// deleted[i] is true when index i is removed
    pub deleted: Vec<bool>,
    /// Kept indices in ascending order
    pub kept: Vec<usize>,
}

impl DeletionMask {
    /// Column (a, b) is deleted iff a < m - t + max(0, b - a).
    ///
    /// On the x-block (b ≤ a) this is a < m - t; on the y-shift diagonal
    /// with offset v = b - a > 0 it is a < m - t + v. Rows are deleted at
    /// the same indices as columns, preserving squareness.
    pub fn new(layout: &LatticeLayout) -> Self {
        let m = layout.m as i64;
        let t = layout.t as i64;

        let deleted: Vec<bool> = layout
            .columns
            .iter()
            .map(|&(a, b)| {
                let offset = (b as i64 - a as i64).max(0);
                (a as i64) < m - t + offset
            })
            .collect();
        let kept = deleted
            .iter()
            .enumerate()
            .filter(|(_, &d)| !d)
            .map(|(i, _)| i)
            .collect();

        Self { deleted, kept }
    }

    pub fn kept_count(&self) -> usize {
        self.kept.len()
    }
}

/// Extract the kept rows and columns into a square sub-basis.
/// Returns None when canceled.
pub fn extract_sub(
    basis: &LatticeBasis,
    mask: &DeletionMask,
    token: &CancellationToken,
) -> Option<LatticeBasis> {
    let mut vectors = Vec::with_capacity(mask.kept.len());
    for &r in &mask.kept {
        if token.is_canceled() {
            return None;
        }
        let row = mask
            .kept
            .iter()
            .map(|&c| basis.vectors[r][c].clone())
            .collect();
        vectors.push(row);
    }
    Some(LatticeBasis::new(vectors))
}

/// Reconstruct a full-width coordinate vector from a reduced sub-lattice row.
pub fn reconstruct_row(
    sub_row: &[BigInt],
    mask: &DeletionMask,
    layout: &LatticeLayout,
    bounds: &Bounds,
) -> Result<Vec<BigInt>> {
    let dim = layout.dimension();
    let mut full = vec![BigInt::zero(); dim];
    for (slot, &col) in mask.kept.iter().enumerate() {
        full[col] = sub_row[slot].clone();
    }

    let xy = &bounds.x * &bounds.y;

    for i in (0..dim).rev() {
        if !mask.deleted[i] {
            continue;
        }
        let (ai, bi) = layout.columns[i];
        let offset = bi as i64 - ai as i64;
        let on_y_diagonal = offset > 0;

        // Common denominator (XY)^max_delta so only the total needs to
        // divide exactly, not each term.
        let mut aligned: Vec<(u32, &BigInt)> = Vec::new();
        let mut max_delta = 0u32;
        for k in i + 1..dim {
            let (ak, bk) = layout.columns[k];
            if bk as i64 - ak as i64 != offset || ak <= ai {
                continue;
            }
            if full[k].is_zero() {
                continue;
            }
            let delta = ak - ai;
            max_delta = max_delta.max(delta);
            aligned.push((delta, &full[k]));
        }
        if aligned.is_empty() {
            continue;
        }

        let mut sum = BigInt::zero();
        for (delta, value) in aligned {
            let (ak, bk) = (ai + delta, bi + delta);
            let bino = if on_y_diagonal {
                binomial(ak as u64, ai as u64)
            } else {
                binomial(bk as u64, bi as u64)
            };
            sum += bino * value * pow(&xy, max_delta - delta);
        }

        let denom = pow(&xy, max_delta);
        let (q, r) = sum.div_rem(&denom);
        if !r.is_zero() {
            return Err(AttackError::Inconsistency(format!(
                "reconstruction of column ({ai},{bi}) is not an integer"
            )));
        }
        full[i] = -q;
    }

    Ok(full)
}
