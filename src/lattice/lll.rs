//! LLL lattice reduction
//!
//! Given a basis B = [b_1, ..., b_n], LLL produces a δ-reduced basis
//! satisfying:
//! 1. **Size reduction**: |μ_ij| ≤ 1/2 for all j < i
//! 2. **Lovász condition**: δ ||b*_i||² ≤ ||b*_{i+1} + μ_{i+1,i} b*_i||²
//!
//! All arithmetic is exact: inner products and μ coefficients are BigInt /
//! rational, so the reduction terminates with a provably δ-reduced basis.
//! A per-iteration stop callback lets the caller abandon a long reduction;
//! when it fires, the partially reduced basis is returned as-is.

use super::basis::LatticeBasis;
use super::gram_schmidt::GramSchmidt;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;
use std::time::Instant;

/// LLL configuration parameters
#[derive(Debug, Clone)]
pub struct LllConfig {
    /// Lovász parameter δ as an exact fraction, must be in (1/4, 1).
    /// Higher values give better reduction but more iterations.
    pub delta_num: i64,
    pub delta_den: i64,
    /// Maximum iterations (safety limit)
    pub max_iterations: usize,
}

impl Default for LllConfig {
    fn default() -> Self {
        // δ = 0.99: short vectors matter more than iteration count here,
        // since the factor extraction only works when the first few reduced
        // rows are genuinely small.
        Self {
            delta_num: 99,
            delta_den: 100,
            max_iterations: 1_000_000,
        }
    }
}

impl LllConfig {
    /// Config with the textbook δ = 3/4.
    pub fn classic() -> Self {
        Self {
            delta_num: 3,
            delta_den: 4,
            ..Default::default()
        }
    }

    /// Config with an explicit reduction quality in (0.25, 1), given in
    /// thousandths (e.g. 990 for δ = 0.99).
    pub fn with_quality_millis(millis: i64) -> Self {
        Self {
            delta_num: millis,
            delta_den: 1000,
            ..Default::default()
        }
    }
}

/// Statistics from an LLL run
#[derive(Debug, Clone, Default)]
pub struct LllStats {
    /// Number of size reductions performed
    pub size_reductions: usize,
    /// Number of swaps performed
    pub swaps: usize,
    /// Total iterations
    pub iterations: usize,
    /// Time for Gram-Schmidt computation (seconds)
    pub gs_time: f64,
    /// Total time (seconds)
    pub total_time: f64,
}

/// LLL lattice reduction algorithm
pub struct Lll;

impl Lll {
    /// Reduce a lattice basis, returning the reduced basis and statistics.
    pub fn reduce(basis: &LatticeBasis, config: &LllConfig) -> (LatticeBasis, LllStats) {
        let (b, stats, _stopped) = Self::reduce_with_stop(basis, config, &mut || false);
        (b, stats)
    }

    /// Reduce a lattice basis with a per-iteration stop callback.
    ///
    /// `stop` is polled once at the top of every main-loop iteration; when it
    /// returns true the reduction aborts and the third return value is true.
    /// The returned basis is then only partially reduced.
    pub fn reduce_with_stop(
        basis: &LatticeBasis,
        config: &LllConfig,
        stop: &mut dyn FnMut() -> bool,
    ) -> (LatticeBasis, LllStats, bool) {
        let start = Instant::now();
        let mut stats = LllStats::default();

        let mut b = basis.clone();
        let n = b.n;

        if n <= 1 {
            stats.total_time = start.elapsed().as_secs_f64();
            return (b, stats, false);
        }

        let gs_start = Instant::now();
        let mut gs = GramSchmidt::compute(&b);
        stats.gs_time = gs_start.elapsed().as_secs_f64();

        let mut stopped = false;
        let mut k = 1usize;

        while k < n && stats.iterations < config.max_iterations {
            if stop() {
                stopped = true;
                break;
            }
            stats.iterations += 1;

            Self::size_reduce(&mut b, &mut gs, k, k - 1, &mut stats);

            if gs.check_lovasz(k, config.delta_num, config.delta_den) {
                for j in (0..k - 1).rev() {
                    Self::size_reduce(&mut b, &mut gs, k, j, &mut stats);
                }
                k += 1;
            } else {
                b.swap(k, k - 1);
                // Recompute Gram-Schmidt (simpler and more robust than
                // incremental update)
                let gs_start = Instant::now();
                gs = GramSchmidt::compute(&b);
                stats.gs_time += gs_start.elapsed().as_secs_f64();
                stats.swaps += 1;

                k = if k > 1 { k - 1 } else { 1 };
            }

            if stats.iterations % 1000 == 0 {
                log::debug!(
                    "LLL iteration {}: k={}, swaps={}, reductions={}",
                    stats.iterations,
                    k,
                    stats.swaps,
                    stats.size_reductions
                );
            }
        }

        stats.total_time = start.elapsed().as_secs_f64();

        log::debug!(
            "LLL done: {} iterations, {} swaps, {} reductions, {:.3}s{}",
            stats.iterations,
            stats.swaps,
            stats.size_reductions,
            stats.total_time,
            if stopped { " (stopped)" } else { "" }
        );

        (b, stats, stopped)
    }

    /// Perform size reduction: b_k = b_k - round(μ_kj) * b_j.
    fn size_reduce(
        basis: &mut LatticeBasis,
        gs: &mut GramSchmidt,
        k: usize,
        j: usize,
        stats: &mut LllStats,
    ) {
        if !gs.needs_size_reduction(k, j) {
            return;
        }

        let mu = gs.get_mu(k, j);

        // q = round(μ_kj) = floor((2*num + den) / (2*den)) for exact rationals
        let two_num: BigInt = &mu.numerator * 2;
        let two_den: BigInt = &mu.denominator * 2;
        let q: BigInt = (&two_num + &mu.denominator).div_floor(&two_den);

        if q.is_zero() {
            return;
        }

        basis.reduce_vector(k, j, &q);
        gs.update_size_reduction(k, j, &q);

        stats.size_reductions += 1;
    }

    /// Check if a basis is LLL-reduced under the given configuration.
    pub fn is_reduced(basis: &LatticeBasis, config: &LllConfig) -> bool {
        let gs = GramSchmidt::compute(basis);
        let n = basis.n;

        for i in 1..n {
            for j in 0..i {
                if gs.needs_size_reduction(i, j) {
                    return false;
                }
            }
        }

        for k in 1..n {
            if !gs.check_lovasz(k, config.delta_num, config.delta_den) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lll_simple() {
        let basis = LatticeBasis::from_rows(&[vec![1i64, 1], vec![0, 1]]);

        let config = LllConfig::default();
        let (reduced, stats) = Lll::reduce(&basis, &config);

        assert!(Lll::is_reduced(&reduced, &config));
        assert!(stats.iterations >= 1);
    }

    #[test]
    fn test_lll_identity_no_swaps() {
        let basis = LatticeBasis::from_rows(&[
            vec![1i64, 0, 0],
            vec![0, 1, 0],
            vec![0, 0, 1],
        ]);

        let config = LllConfig::default();
        let (reduced, stats) = Lll::reduce(&basis, &config);

        assert_eq!(stats.swaps, 0);
        assert!(Lll::is_reduced(&reduced, &config));
    }

    #[test]
    fn test_lll_quality_parameters() {
        let basis = LatticeBasis::from_rows(&[
            vec![1i64, 1, 1],
            vec![-1, 0, 2],
            vec![3, 5, 6],
        ]);

        let classic = LllConfig::classic();
        let strong = LllConfig::with_quality_millis(990);

        let (reduced_classic, _) = Lll::reduce(&basis, &classic);
        let (reduced_strong, _) = Lll::reduce(&basis, &strong);

        assert!(Lll::is_reduced(&reduced_classic, &classic));
        assert!(Lll::is_reduced(&reduced_strong, &strong));
    }

    #[test]
    fn test_lll_classic_shortens_first_vector() {
        let basis = LatticeBasis::from_rows(&[vec![201i64, 37], vec![1648, 297]]);

        let config = LllConfig::classic();
        let (reduced, _) = Lll::reduce(&basis, &config);

        assert!(reduced.norm_squared(0) <= basis.norm_squared(0));
        assert!(Lll::is_reduced(&reduced, &config));
    }

    #[test]
    fn test_lll_stop_callback_aborts_immediately() {
        let basis = LatticeBasis::from_rows(&[vec![201i64, 37], vec![1648, 297]]);

        let config = LllConfig::default();
        let (returned, stats, stopped) =
            Lll::reduce_with_stop(&basis, &config, &mut || true);

        assert!(stopped);
        assert_eq!(stats.iterations, 0);
        // Basis is handed back untouched
        assert_eq!(returned.vectors, basis.vectors);
    }

    #[test]
    fn test_lll_stop_callback_counts_steps() {
        let basis = LatticeBasis::from_rows(&[
            vec![1i64, 1, 1],
            vec![-1, 0, 2],
            vec![3, 5, 6],
        ]);

        let config = LllConfig::default();
        let mut steps = 0usize;
        let (_, stats, stopped) = Lll::reduce_with_stop(&basis, &config, &mut || {
            steps += 1;
            false
        });

        assert!(!stopped);
        // One poll per iteration, plus the final poll that exits the loop
        // never happens because the loop condition fails first.
        assert_eq!(steps, stats.iterations);
    }
}
