use num_bigint::BigUint;
use crate::crypto_error::{CryptoError, DecryptionError};
use crate::paillier::ciphertext::Ciphertext;
use crate::paillier::math::l_function;
use crate::paillier::p_keygen::PrivateKey;

// ---------------------------------------------------------------------------
// Déchiffrement : m = L(c^λ mod n²) · μ mod n
//
// Aucune nouvelle tentative : une incompatibilité clé/chiffré est
// déterministe.
// ---------------------------------------------------------------------------
pub fn decrypt(sk: &PrivateKey, ct: &Ciphertext) -> Result<BigUint, CryptoError> {
    if !ct.is_under(&sk.n) {
        return Err(DecryptionError::KeyMismatch.into());
    }
    if !ct.in_range(&sk.n_squared) {
        return Err(DecryptionError::CiphertextOutOfRange.into());
    }

    let c_lambda = ct.value().modpow(&sk.lambda, &sk.n_squared);

    let l_c_lambda = l_function(&c_lambda, &sk.n)?;

    Ok((&l_c_lambda * &sk.mu) % &sk.n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paillier::p_encrypt::p_encrypt;
    use crate::paillier::p_keygen::{derive_keypair, KeyMode, KeyPair};
    use crate::paillier::p_primes::PrimePair;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn big(v: u64) -> BigUint { BigUint::from(v) }

    fn keys(p: u64, q: u64, mode: KeyMode, seed: u64) -> KeyPair {
        let pair = PrimePair::new(big(p), big(q)).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        loop {
            if let Ok(kp) = derive_keypair(&pair, mode, &mut rng) {
                break kp;
            }
        }
    }

    #[test]
    fn test_foreign_ciphertext_is_rejected() {
        let alice = keys(61, 53, KeyMode::Simplified, 0);
        let bob = keys(47, 59, KeyMode::Simplified, 0);
        let ct = p_encrypt(&big(15), &alice.public_key).unwrap();
        assert_eq!(
            decrypt(&bob.private_key, &ct),
            Err(CryptoError::Decryption(DecryptionError::KeyMismatch))
        );
    }

    #[test]
    fn test_out_of_range_ciphertext() {
        let kp = keys(61, 53, KeyMode::Simplified, 0);
        let n = big(3233);
        for raw in [big(0), big(3233 * 3233), big(3233 * 3233 + 5)] {
            let ct = Ciphertext::new(raw, n.clone());
            assert_eq!(
                decrypt(&kp.private_key, &ct),
                Err(CryptoError::Decryption(DecryptionError::CiphertextOutOfRange))
            );
        }
    }

    #[test]
    fn test_non_unit_ciphertext_fails_exact_division() {
        // 61 divise n : 61^λ ≡ 0 (mod 61), donc c^λ − 1 n'est pas multiple de n
        let kp = keys(61, 53, KeyMode::Simplified, 0);
        let ct = Ciphertext::new(big(61), big(3233));
        assert_eq!(
            decrypt(&kp.private_key, &ct),
            Err(CryptoError::Decryption(DecryptionError::InexactDivision))
        );
    }

    #[test]
    fn test_general_mode_round_trip() {
        let kp = keys(61, 53, KeyMode::General, 13);
        for m in [0u64, 1, 15, 999, 3232] {
            let ct = p_encrypt(&big(m), &kp.public_key).unwrap();
            assert_eq!(decrypt(&kp.private_key, &ct).unwrap(), big(m));
        }
    }
}
