//! Attack controller
//!
//! Sequences the pipeline stages, owns the status machine, and exposes a
//! cloneable handle so another thread can watch progress or cancel. The
//! stages are:
//!
//! 1. build the shift-polynomial lattice
//! 2. delete the dominated rows and columns
//! 3. LLL-reduce the sub-lattice
//! 4. reconstruct full coordinate vectors from the short rows
//! 5. walk candidate pairs through resultants until N factors
//!
//! Cancellation is checked inside every stage; a canceled run ends in
//! `AttackStatus::Canceled` with zero factors, never in an error.

use crate::builder;
use crate::cancel::CancellationToken;
use crate::error::Result;
use crate::extractor::{self, Extraction};
use crate::lattice::{Lll, LllConfig, LllStats};
use crate::params::{AttackParameters, Bounds};
use crate::reducer::{self, DeletionMask};
use num_bigint::BigInt;
use num_traits::Zero;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Lifecycle of one attack run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AttackStatus {
    Idle = 0,
    BuildingLattice = 1,
    Deleting = 2,
    Reducing = 3,
    Reconstructing = 4,
    ComputingResultants = 5,
    Succeeded = 6,
    Failed = 7,
    Canceled = 8,
}

impl AttackStatus {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::BuildingLattice,
            2 => Self::Deleting,
            3 => Self::Reducing,
            4 => Self::Reconstructing,
            5 => Self::ComputingResultants,
            6 => Self::Succeeded,
            7 => Self::Failed,
            8 => Self::Canceled,
            _ => Self::Idle,
        }
    }

    /// True once the run has reached a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

/// Wall-clock seconds spent in each stage.
#[derive(Debug, Clone, Default)]
pub struct StageTimings {
    pub build: f64,
    pub reduce: f64,
    pub resultant: f64,
    pub total: f64,
}

#[derive(Debug, Default)]
struct SharedState {
    status: AtomicU8,
    reduction_steps: AtomicU64,
    resultant_attempts: AtomicU64,
}

/// Cloneable observer/control handle for a running attack.
#[derive(Debug, Clone)]
pub struct AttackHandle {
    token: CancellationToken,
    shared: Arc<SharedState>,
}

impl AttackHandle {
    fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            shared: Arc::new(SharedState::default()),
        }
    }

    /// Request cancellation; the run ends at its next poll point.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn status(&self) -> AttackStatus {
        AttackStatus::from_u8(self.shared.status.load(Ordering::Acquire))
    }

    /// LLL iterations performed so far.
    pub fn reduction_steps(&self) -> u64 {
        self.shared.reduction_steps.load(Ordering::Relaxed)
    }

    /// Resultants attempted so far.
    pub fn resultant_attempts(&self) -> u64 {
        self.shared.resultant_attempts.load(Ordering::Relaxed)
    }

    fn set_status(&self, status: AttackStatus) {
        self.shared.status.store(status as u8, Ordering::Release);
    }
}

/// Outcome of a finished run. On failure or cancellation both factors are
/// zero.
#[derive(Debug, Clone)]
pub struct AttackResult {
    pub p: BigInt,
    pub q: BigInt,
    pub status: AttackStatus,
    pub timings: StageTimings,
    pub lll_stats: LllStats,
}

impl AttackResult {
    pub fn succeeded(&self) -> bool {
        self.status == AttackStatus::Succeeded
    }
}

/// One configured attack against a single key.
pub struct PartialKeyExposureAttack {
    params: AttackParameters,
    handle: AttackHandle,
}

impl PartialKeyExposureAttack {
    pub fn new(params: AttackParameters) -> Self {
        Self {
            params,
            handle: AttackHandle::new(),
        }
    }

    /// Handle for observing or canceling this attack from another thread.
    pub fn handle(&self) -> AttackHandle {
        self.handle.clone()
    }

    /// Run the attack to completion, cancellation, or exhaustion.
    pub fn run(&self) -> Result<AttackResult> {
        let total_start = Instant::now();
        let mut timings = StageTimings::default();
        let handle = &self.handle;
        let token = handle.token.clone();

        log::info!(
            "attack start: N has {} bits, e has {} bits, m={}, t={}, delta={}",
            self.params.n.bits(),
            self.params.e.bits(),
            self.params.m,
            self.params.t,
            self.params.delta_millis as f64 / 1000.0
        );

        handle.set_status(AttackStatus::BuildingLattice);
        let bounds = Bounds::compute(&self.params);

        let build_start = Instant::now();
        let Some((basis, layout)) = builder::build(&self.params, &bounds, &token)? else {
            return Ok(self.finish_canceled(timings, total_start, LllStats::default()));
        };
        timings.build = build_start.elapsed().as_secs_f64();

        handle.set_status(AttackStatus::Deleting);
        let mask = DeletionMask::new(&layout);
        let Some(sub) = reducer::extract_sub(&basis, &mask, &token) else {
            return Ok(self.finish_canceled(timings, total_start, LllStats::default()));
        };
        log::debug!(
            "deleted {} of {} rows/columns",
            layout.dimension() - mask.kept_count(),
            layout.dimension()
        );

        handle.set_status(AttackStatus::Reducing);
        let reduce_start = Instant::now();
        let config = LllConfig::default();
        let shared = Arc::clone(&handle.shared);
        let (reduced, lll_stats, stopped) =
            Lll::reduce_with_stop(&sub, &config, &mut || {
                shared.reduction_steps.fetch_add(1, Ordering::Relaxed);
                token.is_canceled()
            });
        timings.reduce = reduce_start.elapsed().as_secs_f64();
        if stopped {
            return Ok(self.finish_canceled(timings, total_start, lll_stats));
        }

        handle.set_status(AttackStatus::Reconstructing);
        let mut polys = Vec::with_capacity(reduced.n);
        for row in &reduced.vectors {
            let full = reducer::reconstruct_row(row, &mask, &layout, &bounds)?;
            polys.push(extractor::row_to_poly(&full, &layout, &bounds)?);
        }

        handle.set_status(AttackStatus::ComputingResultants);
        let resultant_start = Instant::now();
        let shared = Arc::clone(&handle.shared);
        let outcome = extractor::extract_factors(&polys, &self.params, &bounds, &token, || {
            shared.resultant_attempts.fetch_add(1, Ordering::Relaxed);
        })?;
        timings.resultant = resultant_start.elapsed().as_secs_f64();
        timings.total = total_start.elapsed().as_secs_f64();

        let result = match outcome {
            Extraction::Found(p, q) => {
                handle.set_status(AttackStatus::Succeeded);
                log::info!("attack succeeded in {:.3}s: p={p}, q={q}", timings.total);
                AttackResult {
                    p,
                    q,
                    status: AttackStatus::Succeeded,
                    timings,
                    lll_stats,
                }
            }
            Extraction::Exhausted => {
                handle.set_status(AttackStatus::Failed);
                log::info!(
                    "attack exhausted all candidate pairs in {:.3}s",
                    timings.total
                );
                AttackResult {
                    p: BigInt::zero(),
                    q: BigInt::zero(),
                    status: AttackStatus::Failed,
                    timings,
                    lll_stats,
                }
            }
            Extraction::Canceled => {
                handle.set_status(AttackStatus::Canceled);
                AttackResult {
                    p: BigInt::zero(),
                    q: BigInt::zero(),
                    status: AttackStatus::Canceled,
                    timings,
                    lll_stats,
                }
            }
        };
        Ok(result)
    }

    fn finish_canceled(
        &self,
        mut timings: StageTimings,
        total_start: Instant,
        lll_stats: LllStats,
    ) -> AttackResult {
        timings.total = total_start.elapsed().as_secs_f64();
        self.handle.set_status(AttackStatus::Canceled);
        log::info!("attack canceled after {:.3}s", timings.total);
        AttackResult {
            p: BigInt::zero(),
            q: BigInt::zero(),
            status: AttackStatus::Canceled,
            timings,
            lll_stats,
        }
    }
}
