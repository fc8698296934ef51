//! Small integer helpers shared across the pipeline

use num_bigint::BigInt;
use num_traits::One;

/// BigInt power by squaring.
pub(crate) fn pow(base: &BigInt, exp: u32) -> BigInt {
    let mut result = BigInt::one();
    let mut b = base.clone();
    let mut e = exp;
    while e > 0 {
        if e & 1 == 1 {
            result *= &b;
        }
        b = &b * &b;
        e >>= 1;
    }
    result
}

/// Binomial coefficient C(n, k) as a BigInt.
///
/// Multiplicative form with exact intermediate divisions; every prefix
/// product C(n, i) is an integer.
pub(crate) fn binomial(n: u64, k: u64) -> BigInt {
    if k > n {
        return BigInt::from(0);
    }
    let k = k.min(n - k);
    let mut result = BigInt::one();
    for i in 0..k {
        result = result * BigInt::from(n - i) / BigInt::from(i + 1);
    }
    result
}
