//! Randomized property tests for the arithmetic, key agreement and cipher.

use proptest::prelude::*;
use serial_dh_chat::core::{GENERATOR, KEYSTREAM_MODULUS, PRIME};
use serial_dh_chat::crypto::{
    fast_pow_mod, mul_mod, next_key, CipherState, KeyPair, PrivateKey,
};

fn pow_mod_reference(a: u32, b: u32, m: u32) -> u32 {
    let m = u128::from(m);
    let mut base = u128::from(a) % m;
    let mut exp = b;
    let mut result = 1 % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % m;
        }
        base = base * base % m;
        exp >>= 1;
    }
    result as u32
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn prop_mul_mod_matches_wide_product(a in 0u32..(1 << 31), b: u32, m in 1u32..(1 << 31)) {
        let got = mul_mod(a, b, m);
        let expected = (u64::from(a) * u64::from(b) % u64::from(m)) as u32;
        prop_assert_eq!(got, expected);
        prop_assert!(got < m);
    }

    #[test]
    fn prop_fast_pow_mod_matches_reference(a: u32, b in 1u32.., m in 1u32..(1 << 31)) {
        prop_assert_eq!(fast_pow_mod(a, b, m), pow_mod_reference(a, b, m));
    }

    #[test]
    fn prop_public_key_in_range(x: u32) {
        let public = KeyPair::from_private(PrivateKey::from_u32(x)).public_key();
        prop_assert!(public.as_u32() < PRIME);
        prop_assert_eq!(public.as_u32(), pow_mod_reference(GENERATOR, x, PRIME));
    }

    #[test]
    fn prop_diffie_hellman_agrees(x: u32, y: u32) {
        let alice = KeyPair::from_private(PrivateKey::from_u32(x));
        let bob = KeyPair::from_private(PrivateKey::from_u32(y));
        let s1 = alice.shared_secret(bob.public_key());
        let s2 = bob.shared_secret(alice.public_key());
        prop_assert_eq!(s1.expose(), s2.expose());
    }

    #[test]
    fn prop_next_key_matches_wide_product(current in 0u32..KEYSTREAM_MODULUS) {
        let expected = (u64::from(current) * 48271 % u64::from(KEYSTREAM_MODULUS)) as u32;
        let got = next_key(current);
        prop_assert_eq!(got, expected);
        prop_assert_ne!(got, KEYSTREAM_MODULUS);
    }

    #[test]
    fn prop_cipher_roundtrip(seed: u8, message in prop::collection::vec(any::<u8>(), 0..512)) {
        let mut alice = CipherState::from_seed(seed);
        let mut bob = CipherState::from_seed(seed);
        let ciphertext: Vec<u8> = message.iter().map(|&b| alice.encrypt(b)).collect();
        let plaintext: Vec<u8> = ciphertext.iter().map(|&c| bob.decrypt(c)).collect();
        prop_assert_eq!(plaintext, message);
        prop_assert_eq!(alice.encrypt_key(), bob.decrypt_key());
    }
}
