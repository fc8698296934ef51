//! Parameter advisor
//!
//! The attack succeeds when the sub-lattice determinant satisfies
//! det(L)^(1/n) < e^m. The determinant of the triangular sub-lattice is the
//! product of the kept diagonal entries e^{m-i} X^k Y^i, so with X = e^delta
//! and Y ≈ e^(1/2) the condition becomes linear in delta:
//!
//! ```text
//! E + delta·F + G/2 < m·n   ⟹   delta < (2mn - 2E - G) / (2F)
//! ```
//!
//! where E, F and G are the sums of the e-, X- and Y-exponents over the
//! kept diagonal and n is the sub-lattice dimension. These estimates guide
//! parameter choice; they do not guarantee success for a concrete key.

/// Largest delta for which the determinant condition can hold at (m, t),
/// clamped into (0.004, 0.499) so degenerate small m stays usable.
pub fn max_delta(m: usize, t: usize) -> f64 {
    let raw = raw_max_delta(m, t);
    raw.clamp(0.004, 0.499)
}

/// Value of t in 2..=max(2, m) that maximizes the delta bound.
pub fn optimal_t(m: usize) -> usize {
    let upper = m.max(2);
    let mut best_t = 2;
    let mut best = f64::NEG_INFINITY;
    for t in 2..=upper {
        let d = raw_max_delta(m, t);
        if d > best {
            best = d;
            best_t = t;
        }
    }
    best_t
}

fn raw_max_delta(m: usize, t: usize) -> f64 {
    let (m_i, t_i) = (m as i64, t as i64);
    let n = (m_i + 1) * (t_i + 1);

    // Exponent sums over the kept diagonal entries e^{m-i} X^k Y^i
    let mut e_sum = 0i64;
    let mut x_sum = 0i64;
    let mut y_sum = 0i64;

    // x-shift rows (k, i): kept iff k >= m - t
    for k in 0..=m_i {
        if k < m_i - t_i {
            continue;
        }
        for i in 0..=k {
            e_sum += m_i - i;
            x_sum += k;
            y_sum += i;
        }
    }
    // y-shift rows (v, j): kept iff j >= m - t + v
    for v in 1..=t_i {
        for j in 0..=m_i {
            if j < m_i - t_i + v {
                continue;
            }
            e_sum += m_i - j;
            x_sum += j;
            y_sum += j + v;
        }
    }

    (2 * m_i * n - 2 * e_sum - y_sum) as f64 / (2 * x_sum) as f64
}
