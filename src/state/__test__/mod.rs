use crate::state::SpinState;
use crate::utils::big_pow;
use num_bigint::BigUint;
use num_traits::One;
use std::collections::HashSet;

#[test]
fn test_flip_bit_is_an_involution() {
    for n in [1usize, 5, 17, 96] {
        let s = SpinState::from(0b1011u64);
        for k in 0..n {
            let flipped = s.flip_bit(k, n);
            assert_ne!(flipped, s, "flip must change the state");
            assert_eq!(flipped.flip_bit(k, n), s, "double flip must be the identity");
        }
    }
}

#[test]
fn test_flip_bit_counts_from_the_msb() {
    // 4 spins, state 0000: flipping spin 0 sets the MSB (value 8),
    // flipping spin 3 sets the LSB (value 1).
    let s = SpinState::zero();
    assert_eq!(s.flip_bit(0, 4), SpinState::from(8u64));
    assert_eq!(s.flip_bit(3, 4), SpinState::from(1u64));
}

#[test]
fn test_neighbors_structure() {
    for n in [2usize, 8, 96] {
        let s = SpinState::from(0b110u64);
        let neighbors = s.neighbors(n);
        assert_eq!(neighbors.len(), n);

        let distinct: HashSet<_> = neighbors.iter().cloned().collect();
        assert_eq!(distinct.len(), n, "neighbors must be pairwise distinct");
        assert!(!distinct.contains(&s), "the state is not its own neighbor");

        for (k, nb) in neighbors.iter().enumerate() {
            // Hamming distance exactly 1, at the expected position.
            let diff = nb.as_biguint() ^ s.as_biguint();
            assert_eq!(diff, BigUint::one() << (n - 1 - k));
        }
    }
}

#[test]
fn test_neighbors_into_matches_neighbors() {
    let n = 12;
    let s = SpinState::from(0xABCu64);
    let mut buf = vec![SpinState::zero(); n];
    s.neighbors_into(n, &mut buf);
    assert_eq!(buf, s.neighbors(n));
}

#[test]
fn test_bit_codec_round_trip() {
    let cases: Vec<Vec<u8>> = vec![
        vec![0; 7],                         // all-zero
        vec![1; 7],                         // all-one
        vec![1, 0, 1, 1, 0, 0, 1],
        vec![0, 0, 0, 0, 0, 0, 1],
        vec![1, 0, 0, 0, 0, 0, 0],
    ];
    for bits in cases {
        let s = SpinState::from_bits(&bits);
        assert_eq!(s.to_bits(bits.len()), bits);
    }
}

#[test]
fn test_codec_beyond_machine_word() {
    let n = 96;
    let mut bits = vec![0u8; n];
    bits[0] = 1; // MSB set: value 2^95
    let s = SpinState::from_bits(&bits);
    assert_eq!(s.as_biguint(), &big_pow(2, 95));
    assert_eq!(s.to_bits(n), bits);

    // all-one state is 2^96 - 1
    let ones = SpinState::from_bits(&vec![1u8; n]);
    let expected = big_pow(2, 96) - BigUint::one();
    assert_eq!(ones.as_biguint(), &expected);
    assert_eq!(ones.to_bits(n), vec![1u8; n]);
}

#[test]
fn test_bit_string() {
    let s = SpinState::from_bits(&[1, 0, 1, 1]);
    assert_eq!(s.to_bit_string(4), "1011");
    assert_eq!(SpinState::zero().to_bit_string(5), "00000");
}
