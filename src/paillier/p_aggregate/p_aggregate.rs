use num_bigint::BigUint;
use num_traits::One;
use tracing::debug;
use crate::crypto_error::{CryptoError, ValidationError};
use crate::paillier::ciphertext::Ciphertext;
use crate::paillier::p_keygen::PublicKey;
use crate::scores::{EncryptedScores, WEIGHTS};

// ============================================================================
// Opérations homomorphes, côté agrégateur (clé publique seulement)
//
//   D(E(m)^k mod n²)          = k·m      mod n
//   D(E(m1)·E(m2) mod n²)     = m1 + m2  mod n
//
// Réduction modulo n² après chaque exponentiation et chaque produit.
// ============================================================================

fn check(pk: &PublicKey, ct: &Ciphertext) -> Result<(), ValidationError> {
    if !ct.is_under(&pk.n) {
        return Err(ValidationError::ForeignCiphertext);
    }
    if !ct.in_range(&pk.n_squared) {
        return Err(ValidationError::CiphertextOutOfRange);
    }
    Ok(())
}

/// Multiplie le message chiffré par k
pub fn scale_ciphertext(pk: &PublicKey, ct: &Ciphertext, k: &BigUint) -> Result<Ciphertext, CryptoError> {
    check(pk, ct)?;
    Ok(Ciphertext::under(ct.value().modpow(k, &pk.n_squared), pk))
}

/// Additionne les deux messages chiffrés
pub fn add_ciphertexts(pk: &PublicKey, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext, CryptoError> {
    check(pk, a)?;
    check(pk, b)?;
    Ok(Ciphertext::under((a.value() * b.value()) % &pk.n_squared, pk))
}

// ---------------------------------------------------------------------------
// c_agg = Π c_i^{w_i} mod n²  →  déchiffre en Σ w_i·m_i mod n
// ---------------------------------------------------------------------------
pub fn aggregate_weighted(
    pk:          &PublicKey,
    ciphertexts: &[Ciphertext],
    weights:     &[u32],
) -> Result<Ciphertext, CryptoError> {
    if ciphertexts.len() != weights.len() {
        return Err(ValidationError::LengthMismatch {
            ciphertexts: ciphertexts.len(),
            weights:     weights.len(),
        }
        .into());
    }
    for ct in ciphertexts {
        check(pk, ct)?;
    }

    let mut acc = BigUint::one();
    for (ct, &w) in ciphertexts.iter().zip(weights) {
        let weighted = ct.value().modpow(&BigUint::from(w), &pk.n_squared);
        acc = (acc * weighted) % &pk.n_squared;
    }

    debug!(terms = ciphertexts.len(), "agrégation homomorphe terminée");
    Ok(Ciphertext::under(acc, pk))
}

/// Agrégat examen/TP/quiz/projet avec les poids [5, 3, 1, 1]
pub fn aggregate(pk: &PublicKey, scores: &EncryptedScores) -> Result<Ciphertext, CryptoError> {
    aggregate_weighted(pk, scores.as_slice(), &WEIGHTS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paillier::p_decrypt::decrypt;
    use crate::paillier::p_encrypt::{encrypt, p_encrypt};
    use crate::paillier::p_keygen::{derive_keypair, KeyMode, KeyPair};
    use crate::paillier::p_primes::PrimePair;
    use crate::scores::Scores;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn big(v: u64) -> BigUint { BigUint::from(v) }

    fn textbook_keys() -> KeyPair {
        let pair = PrimePair::new(big(61), big(53)).unwrap();
        derive_keypair(&pair, KeyMode::Simplified, &mut StdRng::seed_from_u64(0)).unwrap()
    }

    #[test]
    fn test_weighted_scores() {
        let kp = textbook_keys();
        let scores = Scores::from([8, 6, 10, 9]);
        let encrypted = encrypt(&kp.public_key, &scores).unwrap();
        let agg = aggregate(&kp.public_key, &encrypted).unwrap();
        assert_eq!(decrypt(&kp.private_key, &agg).unwrap(), big(77));
    }

    #[test]
    fn test_sum_wraps_modulo_n() {
        let kp = textbook_keys();
        // 5·3000 + 3·100 = 15300 ≡ 15300 − 4·3233 = 2368 (mod 3233)
        let scores = Scores::from([3000, 100, 0, 0]);
        let encrypted = encrypt(&kp.public_key, &scores).unwrap();
        let agg = aggregate(&kp.public_key, &encrypted).unwrap();
        assert_eq!(decrypt(&kp.private_key, &agg).unwrap(), big(2368));
    }

    #[test]
    fn test_add_and_scale() {
        let kp = textbook_keys();
        let pk = &kp.public_key;
        let a = p_encrypt(&big(1200), pk).unwrap();
        let b = p_encrypt(&big(2500), pk).unwrap();

        let sum = add_ciphertexts(pk, &a, &b).unwrap();
        assert_eq!(decrypt(&kp.private_key, &sum).unwrap(), big((1200 + 2500) % 3233));

        let scaled = scale_ciphertext(pk, &a, &big(4)).unwrap();
        assert_eq!(decrypt(&kp.private_key, &scaled).unwrap(), big((4 * 1200) % 3233));
    }

    #[test]
    fn test_length_mismatch() {
        let kp = textbook_keys();
        let ct = p_encrypt(&big(1), &kp.public_key).unwrap();
        let res = aggregate_weighted(&kp.public_key, &[ct.clone(), ct], &WEIGHTS);
        assert_eq!(
            res,
            Err(CryptoError::Validation(ValidationError::LengthMismatch { ciphertexts: 2, weights: 4 }))
        );
    }

    #[test]
    fn test_foreign_or_malformed_inputs() {
        let kp = textbook_keys();
        let pk = &kp.public_key;
        let ours = p_encrypt(&big(1), pk).unwrap();
        let theirs = Ciphertext::new(big(12), big(2773));
        assert_eq!(
            add_ciphertexts(pk, &ours, &theirs),
            Err(CryptoError::Validation(ValidationError::ForeignCiphertext))
        );
        let zero = Ciphertext::new(big(0), big(3233));
        assert_eq!(
            scale_ciphertext(pk, &zero, &big(3)),
            Err(CryptoError::Validation(ValidationError::CiphertextOutOfRange))
        );
    }
}
