//! Factor extraction from reduced lattice rows
//!
//! Each reconstructed row encodes a bivariate polynomial that vanishes at
//! the attack's root over the integers whenever its weighted norm is small
//! enough (Howgrave-Graham). Two such polynomials pin the root down: their
//! resultant in x is a univariate polynomial whose integer roots are
//! candidates for -(p+q), and p + q together with p·q = N determines the
//! factors through a quadratic.

use crate::arith::pow;
use crate::builder::LatticeLayout;
use crate::cancel::CancellationToken;
use crate::error::{AttackError, Result};
use crate::factor::integer_roots;
use crate::params::{AttackParameters, Bounds};
use crate::poly2::Poly2;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// Undo the (X, Y) scaling of a reconstructed row: the coefficient stored at
/// column (a, b) is c·X^a·Y^b, so dividing the bounds back out recovers the
/// unscaled polynomial. Non-exact division means the row was not a lattice
/// vector.
pub fn row_to_poly(
    row: &[BigInt],
    layout: &LatticeLayout,
    bounds: &Bounds,
) -> Result<Poly2> {
    let mut poly = Poly2::zero();
    for (idx, value) in row.iter().enumerate() {
        if value.is_zero() {
            continue;
        }
        let (a, b) = layout.columns[idx];
        let scale = pow(&bounds.x, a) * pow(&bounds.y, b);
        let (c, r) = value.div_rem(&scale);
        if !r.is_zero() {
            return Err(AttackError::Inconsistency(format!(
                "row entry at column ({a},{b}) is not divisible by X^{a} Y^{b}"
            )));
        }
        poly.add_term(a, b, c);
    }
    Ok(poly)
}

struct Candidate {
    idx: usize,
    /// Rows whose weighted norm already beats e^m are the ones the
    /// Howgrave-Graham bound certifies; try those first.
    certified: bool,
    /// Exact ordering key: norm² · monomial count, which orders the same
    /// way as norm · √count without leaving the integers.
    key: BigInt,
}

fn rank_candidates(
    polys: &[Poly2],
    params: &AttackParameters,
    bounds: &Bounds,
) -> Vec<Candidate> {
    let e_m = pow(&params.e, params.m as u32);

    let mut candidates: Vec<Candidate> = polys
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.is_zero())
        .map(|(idx, p)| {
            let norm = p.weighted_norm(&bounds.x, &bounds.y);
            let certified = norm > BigInt::zero() && norm < e_m;
            let key = &norm * &norm * BigInt::from(p.monomial_count() as u64);
            Candidate {
                idx,
                certified,
                key,
            }
        })
        .collect();

    // Stable: insertion order breaks ties
    candidates.sort_by(|a, b| {
        b.certified
            .cmp(&a.certified)
            .then_with(|| a.key.cmp(&b.key))
    });
    candidates
}

/// Try one pair of candidate polynomials; Ok(None) when the pair yields no
/// valid factorization.
fn try_pair(f: &Poly2, g: &Poly2, n: &BigInt) -> Result<Option<(BigInt, BigInt)>> {
    let res = Poly2::resultant_x(f, g)?;
    if res.is_zero() {
        // Shared factor, the pair carries no independent information
        return Ok(None);
    }

    for root in integer_roots(&res)? {
        // Candidate sum of primes: s = |root|, since y₀ = -(p+q)
        let s = root.abs();
        let disc = &s * &s - n * BigInt::from(4);
        if disc <= BigInt::zero() {
            continue;
        }
        let sq = disc.sqrt();
        if &sq * &sq != disc {
            continue;
        }
        let (p, rp) = (&s + &sq).div_rem(&BigInt::from(2));
        let (q, rq) = (&s - &sq).div_rem(&BigInt::from(2));
        if !rp.is_zero() || !rq.is_zero() {
            continue;
        }
        if p > BigInt::one() && q > BigInt::one() && &p * &q == *n {
            return Ok(Some((p, q)));
        }
    }
    Ok(None)
}

/// Outcome of the extraction stage.
pub enum Extraction {
    Found(BigInt, BigInt),
    Exhausted,
    Canceled,
}

/// Walk candidate pairs in rank order until a factorization of N appears.
///
/// `attempts` is bumped once per resultant actually computed so a live
/// observer can follow progress.
pub fn extract_factors(
    polys: &[Poly2],
    params: &AttackParameters,
    bounds: &Bounds,
    token: &CancellationToken,
    mut on_attempt: impl FnMut(),
) -> Result<Extraction> {
    let ranked = rank_candidates(polys, params, bounds);
    let certified = ranked.iter().filter(|c| c.certified).count();
    log::debug!(
        "extractor: {} candidate rows ({} within the norm bound)",
        ranked.len(),
        certified
    );

    for i in 0..ranked.len() {
        for j in i + 1..ranked.len() {
            if token.is_canceled() {
                return Ok(Extraction::Canceled);
            }
            on_attempt();
            let f = &polys[ranked[i].idx];
            let g = &polys[ranked[j].idx];
            if let Some((p, q)) = try_pair(f, g, &params.n)? {
                log::info!("factorization recovered from candidate pair ({i}, {j})");
                return Ok(Extraction::Found(p, q));
            }
        }
    }
    Ok(Extraction::Exhausted)
}
