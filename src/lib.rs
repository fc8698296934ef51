//! Lattice-based partial key exposure attack on RSA
//!
//! Implements the Blömer–May variant of Coppersmith's method for small
//! secret exponents: given a modulus N, a public exponent e and bound
//! parameters (m, t, delta), the attack builds a lattice of shifted powers
//! of the structural polynomial
//!
//! ```text
//! f(x, y) = x · (N + 1 + y) − 1   (mod e)
//! ```
//!
//! whose small modular root encodes p + q, reduces the lattice with LLL,
//! and extracts the prime factors of N from resultants of the shortest
//! basis vectors.
//!
//! # Pipeline
//!
//! 1. [`builder`] — binomial expansion of f(xX, yY)^k and lattice assembly
//! 2. [`reducer`] — removal of provably triangular rows/columns before
//!    reduction, and exact reconstruction afterwards
//! 3. [`lattice`] — exact-arithmetic LLL with a cancellation-aware
//!    per-step callback
//! 4. [`extractor`] — candidate ranking, resultants and integer root tests
//! 5. [`attack`] — the controller that sequences the stages and owns the
//!    status machine
//!
//! The [`advisor`] module estimates workable (t, delta) for a given m.

pub mod advisor;
pub mod attack;
pub mod builder;
pub mod cancel;
pub mod error;
pub mod extractor;
pub mod factor;
pub mod lattice;
pub mod params;
pub mod poly2;
pub mod rational;
pub mod reducer;
pub mod unipoly;

mod arith;

pub use attack::{AttackHandle, AttackResult, AttackStatus, PartialKeyExposureAttack, StageTimings};
pub use cancel::CancellationToken;
pub use error::AttackError;
pub use lattice::{LatticeBasis, Lll, LllConfig, LllStats};
pub use params::{AttackParameters, Bounds};
pub use poly2::Poly2;
pub use unipoly::UniPoly;
