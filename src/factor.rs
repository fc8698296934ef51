//! Integer roots of univariate polynomials
//!
//! The resultant stage only ever needs the monic linear factors of a
//! polynomial in Z[y], which is exactly its set of integer roots. Roots are
//! found modulo a small prime chosen so the polynomial stays square-free,
//! lifted with quadratic Hensel steps past the Cauchy root bound, and
//! verified exactly over Z.

use crate::error::{AttackError, Result};
use crate::unipoly::UniPoly;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// All integer roots of `poly`, sorted ascending and without duplicates.
///
/// The zero polynomial and constants have no reported roots.
pub fn integer_roots(poly: &UniPoly) -> Result<Vec<BigInt>> {
    if poly.is_zero() || poly.degree() == 0 {
        return Ok(Vec::new());
    }

    // Distinct roots survive in the square-free part, and its derivative is
    // then coprime to it, which is what Hensel lifting needs.
    let w = poly.square_free_part();
    if w.degree() == 0 {
        return Ok(Vec::new());
    }

    let q = choose_prime(&w)?;
    let residues = roots_mod_prime(&w, q);
    if residues.is_empty() {
        return Ok(Vec::new());
    }

    // Any integer root r satisfies |r| <= B (Cauchy bound); lift until the
    // modulus determines the centered residue uniquely.
    let bound = cauchy_bound(&w);
    let target = &bound * 2 + 1;

    let mut roots = Vec::new();
    for r0 in residues {
        let r = hensel_lift(&w, BigInt::from(r0), BigInt::from(q), &target)?;
        if poly.eval(&r).is_zero() {
            roots.push(r);
        }
    }
    roots.sort();
    roots.dedup();
    Ok(roots)
}

/// 1 + max |a_i| / |a_d|, rounded up: every complex root has modulus below it.
fn cauchy_bound(poly: &UniPoly) -> BigInt {
    let lc = poly.leading_coeff().abs();
    let mut max_ratio = BigInt::zero();
    for c in &poly.coeffs[..poly.coeffs.len() - 1] {
        let ratio = (c.abs() + &lc - 1) / &lc;
        if ratio > max_ratio {
            max_ratio = ratio;
        }
    }
    max_ratio + 1
}

/// Smallest prime >= 10007 for which `poly` keeps full degree and stays
/// square-free in F_q[y].
fn choose_prime(poly: &UniPoly) -> Result<u64> {
    let mut q = 10007u64;
    // Bounded scan: enough primes exist below the limit that failure means
    // the polynomial itself is broken (it is square-free over Z here).
    while q < 1_000_000 {
        if is_prime(q) {
            let w = reduce_mod(poly, q);
            if w.last() != Some(&0) && is_square_free_mod(&w, q) {
                return Ok(q);
            }
        }
        q += 2;
    }
    Err(AttackError::Inconsistency(
        "no usable prime for modular root finding".into(),
    ))
}

fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3u64;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Coefficients of `poly` reduced into [0, q), low degree first, untrimmed.
fn reduce_mod(poly: &UniPoly, q: u64) -> Vec<u64> {
    let qb = BigInt::from(q);
    poly.coeffs
        .iter()
        .map(|c| {
            let r = c.mod_floor(&qb);
            // r in [0, q) fits u64
            r.to_u64_digits().1.first().copied().unwrap_or(0)
        })
        .collect()
}

fn trim(mut p: Vec<u64>) -> Vec<u64> {
    while p.last() == Some(&0) {
        p.pop();
    }
    p
}

fn pow_mod(mut b: u64, mut e: u64, q: u64) -> u64 {
    let mut acc = 1u64;
    b %= q;
    while e > 0 {
        if e & 1 == 1 {
            acc = acc * b % q;
        }
        b = b * b % q;
        e >>= 1;
    }
    acc
}

/// gcd(f, f') in F_q[y] must be constant for f to be square-free mod q.
fn is_square_free_mod(f: &[u64], q: u64) -> bool {
    let deriv: Vec<u64> = f
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, &c)| (i as u64 % q) * c % q)
        .collect();

    let mut a = trim(f.to_vec());
    let mut b = trim(deriv);
    while !b.is_empty() {
        // a mod b in F_q[y]
        let lc_inv = pow_mod(b[b.len() - 1], q - 2, q);
        while a.len() >= b.len() && !a.is_empty() {
            let shift = a.len() - b.len();
            let factor = a[a.len() - 1] * lc_inv % q;
            if factor != 0 {
                for (i, &bc) in b.iter().enumerate() {
                    let sub = factor * bc % q;
                    a[shift + i] = (a[shift + i] + q - sub) % q;
                }
            }
            a = trim(a);
            if a.len() < b.len() {
                break;
            }
        }
        std::mem::swap(&mut a, &mut b);
    }
    a.len() <= 1
}

/// Horner scan over all residues; q is small enough for this to be cheap.
fn roots_mod_prime(poly: &UniPoly, q: u64) -> Vec<u64> {
    let f = reduce_mod(poly, q);
    let mut roots = Vec::new();
    for r in 0..q {
        let mut acc = 0u64;
        for &c in f.iter().rev() {
            acc = (acc * r + c) % q;
        }
        if acc == 0 {
            roots.push(r);
        }
    }
    roots
}

fn mod_inv(a: &BigInt, m: &BigInt) -> Option<BigInt> {
    let g = a.extended_gcd(m);
    if g.gcd.is_one() {
        Some(g.x.mod_floor(m))
    } else {
        None
    }
}

/// Quadratic Hensel lifting of a simple root modulo `modulus` until the
/// modulus exceeds `target`, then return the centered representative.
fn hensel_lift(
    poly: &UniPoly,
    mut root: BigInt,
    mut modulus: BigInt,
    target: &BigInt,
) -> Result<BigInt> {
    let deriv = poly.derivative();

    while modulus <= *target {
        let next = &modulus * &modulus;
        let f_val = poly.eval(&root).mod_floor(&next);
        let d_val = deriv.eval(&root);
        let inv = mod_inv(&d_val.mod_floor(&next), &next).ok_or_else(|| {
            AttackError::Inconsistency(
                "derivative not invertible during Hensel lifting".into(),
            )
        })?;
        root = (&root - f_val * inv).mod_floor(&next);
        modulus = next;
    }

    // Center into (-modulus/2, modulus/2]
    let half = &modulus / 2;
    if root > half {
        root -= &modulus;
    }
    Ok(root)
}
