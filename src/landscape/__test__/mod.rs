use crate::landscape::{EnergyLandscape, LandscapeKind, RandomEnergyLandscape};
use crate::state::SpinState;
use crate::utils::mean_vector;
use approx::assert_relative_eq;

fn erem(seed: u64, cache_limit: usize) -> RandomEnergyLandscape {
    RandomEnergyLandscape::new(LandscapeKind::Erem, 8, 1.0, seed, cache_limit)
}

#[test]
fn test_energies_are_referentially_transparent() {
    let mut l = erem(17, 1 << 10);
    let s = SpinState::from(0b1010u64);
    let first = l.energy(&s);
    for _ in 0..5 {
        assert_eq!(l.energy(&s).to_bits(), first.to_bits());
    }
}

#[test]
fn test_cache_eviction_cannot_change_values() {
    // A zero-capacity cache recomputes every call; values must still be
    // bit-identical to the cached variant's.
    let mut cached = erem(17, 1 << 10);
    let mut uncached = erem(17, 0);
    for v in 0u64..50 {
        let s = SpinState::from(v);
        assert_eq!(cached.energy(&s).to_bits(), uncached.energy(&s).to_bits());
    }
}

#[test]
fn test_distinct_seeds_give_distinct_disorder() {
    let mut a = erem(1, 0);
    let mut b = erem(2, 0);
    let s = SpinState::from(3u64);
    assert_ne!(a.energy(&s), b.energy(&s));
}

#[test]
fn test_erem_support_and_mean() {
    let mut l = erem(99, 0);
    let energies: Vec<f64> = (0u64..4000).map(|v| l.energy(&SpinState::from(v))).collect();
    assert!(energies.iter().all(|&e| e <= 0.0), "EREM energies live on the negative axis");
    // Mean of -Exp(beta_c = 1) is -1.
    assert_relative_eq!(mean_vector(&energies), -1.0, epsilon = 0.1);
}

#[test]
fn test_grem_scale() {
    let n = 16;
    let mut l = RandomEnergyLandscape::new(LandscapeKind::Grem, n, 1.0, 7, 0);
    let energies: Vec<f64> = (0u64..4000).map(|v| l.energy(&SpinState::from(v))).collect();
    assert_relative_eq!(mean_vector(&energies), 0.0, epsilon = 0.3);
    let var = crate::utils::variance_vector(&energies);
    assert_relative_eq!(var, n as f64, epsilon = 1.5);
}

#[test]
fn test_states_beyond_machine_word_are_hashable() {
    let n = 96;
    let mut l = RandomEnergyLandscape::new(LandscapeKind::Erem, n, 1.0, 5, 0);
    let low = SpinState::from_bits(&{
        let mut b = vec![0u8; n];
        b[n - 1] = 1;
        b
    });
    let high = SpinState::from_bits(&{
        let mut b = vec![0u8; n];
        b[0] = 1;
        b
    });
    // Different digit patterns must decorrelate, and each must be stable.
    assert_ne!(l.energy(&low), l.energy(&high));
    assert_eq!(l.energy(&low).to_bits(), l.energy(&low).to_bits());
}
