//! Exact-arithmetic lattice reduction
//!
//! A row-major integer lattice basis, exact rational Gram–Schmidt data, and
//! the LLL algorithm with a per-iteration stop callback so a long reduction
//! can be canceled from outside.

pub mod basis;
pub mod gram_schmidt;
pub mod lll;

pub use basis::LatticeBasis;
pub use gram_schmidt::GramSchmidt;
pub use lll::{Lll, LllConfig, LllStats};
