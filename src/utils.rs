//! Small numeric helpers: vector statistics backing the end-of-run
//! summary, and exact integer powers for configuration-space sized
//! quantities.

use ndarray::ArrayView1;
use num_bigint::BigUint;
use num_traits::One;

pub fn mean_vector(v: &[f64]) -> f64 {
    ArrayView1::from(v).sum() / v.len() as f64
}

/// Weighted mean of `v`. A zero total weight falls back to 1 so an
/// all-zero weight vector yields 0 instead of NaN.
pub fn weighted_mean_vector(v: &[f64], weights: &[f64]) -> f64 {
    assert_eq!(
        v.len(),
        weights.len(),
        "weighted mean requires equal-length value and weight vectors"
    );
    let sum = ArrayView1::from(v).dot(&ArrayView1::from(weights));
    let mut total_weight = ArrayView1::from(weights).sum();
    if total_weight == 0.0 {
        total_weight = 1.0;
    }
    sum / total_weight
}

pub fn variance_vector(v: &[f64]) -> f64 {
    let view = ArrayView1::from(v);
    let mean = mean_vector(v);
    view.dot(&view) / v.len() as f64 - mean * mean
}

pub fn median_vector(v: &[f64]) -> f64 {
    let mut v2 = v.to_vec();
    v2.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let size = v2.len();
    if size % 2 != 0 {
        return v2[size / 2];
    }
    (v2[size / 2] + v2[size / 2 - 1]) / 2.0
}

/// Exact integer power by squaring. Positive arguments only; anything
/// else is a programming error upstream.
pub fn ipow(mut base: i64, mut exp: i64) -> i64 {
    assert!(base > 0, "ipow requires a positive base");
    assert!(exp > 0, "ipow requires a positive exponent");
    let mut result = 1;
    loop {
        if exp & 1 == 1 {
            result *= base;
        }
        exp >>= 1;
        if exp == 0 {
            break;
        }
        base *= base;
    }
    result
}

/// `base^exponent` as an arbitrary-precision unsigned integer, for spin
/// counts whose configuration space exceeds a machine word.
pub fn big_pow(base: u32, exponent: u32) -> BigUint {
    if exponent == 0 {
        return BigUint::one();
    }
    let mut val = BigUint::from(base);
    for _ in 0..exponent - 1 {
        val *= base;
    }
    val
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_variance() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(mean_vector(&v), 2.5);
        assert_relative_eq!(variance_vector(&v), 1.25);
    }

    #[test]
    fn test_weighted_mean() {
        let v = [1.0, 3.0];
        let w = [1.0, 3.0];
        assert_relative_eq!(weighted_mean_vector(&v, &w), 2.5);
        assert_relative_eq!(weighted_mean_vector(&v, &[0.0, 0.0]), 0.0);
    }

    #[test]
    #[should_panic]
    fn test_weighted_mean_length_mismatch_panics() {
        weighted_mean_vector(&[1.0, 2.0], &[1.0]);
    }

    #[test]
    fn test_median() {
        assert_relative_eq!(median_vector(&[3.0, 1.0, 2.0]), 2.0);
        assert_relative_eq!(median_vector(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_ipow() {
        assert_eq!(ipow(2, 10), 1024);
        assert_eq!(ipow(10, 3), 1000);
        assert_eq!(ipow(7, 1), 7);
    }

    #[test]
    #[should_panic]
    fn test_ipow_rejects_nonpositive_exponent() {
        ipow(2, 0);
    }

    #[test]
    fn test_big_pow_exceeds_machine_word() {
        assert_eq!(big_pow(2, 0), BigUint::one());
        assert_eq!(big_pow(2, 10), BigUint::from(1024u32));
        // 2^100 does not fit in u64.
        let v = big_pow(2, 100);
        assert_eq!(v, BigUint::from(1u8) << 100);
    }
}
