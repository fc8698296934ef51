//! End-to-end attack scenarios
//!
//! The toy key: N = 2173 = 41·53, e = 1387, d = 3, so
//! e·d = 4161 = 2·φ(N) + 1 gives k = 2 and the modular root
//! (x₀, y₀) = (-2, -94) of f(x, y) = x(N + 1 + y) - 1 mod e.
//! With delta = 0.1 the bounds are X = 2, Y = 111 and the root is inside
//! the box, so m = 3, t = 1 must recover the factors.

use bloemer_may::{
    advisor, AttackParameters, AttackStatus, PartialKeyExposureAttack,
};
use num_bigint::BigInt;
use num_traits::Zero;

fn toy_params(m: usize, t: usize) -> AttackParameters {
    AttackParameters::new(BigInt::from(2173), BigInt::from(1387), m, t, 0.1).unwrap()
}

#[test]
fn recovers_factors_of_toy_modulus() {
    let attack = PartialKeyExposureAttack::new(toy_params(3, 1));
    let handle = attack.handle();

    let result = attack.run().unwrap();

    assert!(result.succeeded());
    assert_eq!(result.status, AttackStatus::Succeeded);
    assert_eq!(handle.status(), AttackStatus::Succeeded);

    let mut factors = [result.p.clone(), result.q.clone()];
    factors.sort();
    assert_eq!(factors, [BigInt::from(41), BigInt::from(53)]);

    // Progress counters and timings were actually recorded
    assert!(handle.reduction_steps() > 0);
    assert!(handle.resultant_attempts() > 0);
    assert!(result.timings.total > 0.0);
    assert!(result.lll_stats.iterations > 0);
}

#[test]
fn undersized_lattice_fails_cleanly() {
    // m = 1, t = 1 leaves the determinant condition unsatisfiable at
    // delta = 0.1 for this key, so every candidate pair must be exhausted.
    let attack = PartialKeyExposureAttack::new(toy_params(1, 1));
    let result = attack.run().unwrap();

    assert_eq!(result.status, AttackStatus::Failed);
    assert!(result.p.is_zero());
    assert!(result.q.is_zero());
}

#[test]
fn cancellation_before_build_yields_canceled_status() {
    let attack = PartialKeyExposureAttack::new(toy_params(3, 1));
    let handle = attack.handle();
    handle.cancel();

    let result = attack.run().unwrap();

    assert_eq!(result.status, AttackStatus::Canceled);
    assert_eq!(handle.status(), AttackStatus::Canceled);
    assert!(result.p.is_zero());
    assert!(result.q.is_zero());
}

#[test]
fn handle_clones_share_state() {
    let attack = PartialKeyExposureAttack::new(toy_params(3, 1));
    let h1 = attack.handle();
    let h2 = attack.handle();

    h1.cancel();
    let result = attack.run().unwrap();

    assert_eq!(result.status, AttackStatus::Canceled);
    assert_eq!(h2.status(), AttackStatus::Canceled);
}

#[test]
fn invalid_parameters_are_rejected_up_front() {
    assert!(AttackParameters::new(BigInt::from(2173), BigInt::from(1387), 3, 1, 0.7).is_err());
    assert!(AttackParameters::new(BigInt::from(2173), BigInt::from(1387), 0, 1, 0.1).is_err());
    assert!(AttackParameters::new(BigInt::from(1), BigInt::from(1387), 3, 1, 0.1).is_err());
}

#[test]
fn advisor_admits_the_toy_configuration() {
    // The delta the toy scenario runs at must be inside the advisor's
    // bound both for its own (m, t) and for the advisor's pick.
    assert!(advisor::max_delta(3, 1) > 0.1);
    let t = advisor::optimal_t(3);
    assert!(advisor::max_delta(3, t) > 0.1);
}
