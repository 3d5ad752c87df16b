use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand_core::{OsRng, RngCore};
use tracing::debug;
use crate::crypto_error::{CryptoError, ValidationError};
use crate::paillier::ciphertext::Ciphertext;
use crate::paillier::math::gcd;
use crate::paillier::p_keygen::PublicKey;
use crate::scores::{EncryptedScores, Scores};

// ---------------------------------------------------------------------------
// Chiffrement Paillier : c = g^m * r^n  mod n²
//
// Retourne Err(PlaintextOutOfRange) si m >= n.
// ---------------------------------------------------------------------------
pub fn p_encrypt(m: &BigUint, pk: &PublicKey) -> Result<Ciphertext, CryptoError> {
    p_encrypt_with(m, pk, &mut OsRng)
}

pub fn p_encrypt_with<R: RngCore + ?Sized>(
    m:   &BigUint,
    pk:  &PublicKey,
    rng: &mut R,
) -> Result<Ciphertext, CryptoError> {
    if m >= &pk.n {
        return Err(ValidationError::PlaintextOutOfRange.into());
    }

    let r = sample_r(&pk.n, rng);

    let g_m = pk.g.modpow(m, &pk.n_squared);
    let r_n = r.modpow(&pk.n, &pk.n_squared);
    let c = (&g_m * &r_n) % &pk.n_squared;

    Ok(Ciphertext::under(c, pk))
}

// Choisit r dans [1, n-1] avec gcd(r, n) = 1 (rejet, O(1) tirages en moyenne)
fn sample_r<R: RngCore + ?Sized>(n: &BigUint, rng: &mut R) -> BigUint {
    loop {
        let candidate = rng.gen_biguint_range(&BigUint::one(), n);
        if gcd(&candidate, n).is_one() {
            break candidate;
        }
    }
}

// ---------------------------------------------------------------------------
// Chiffre les 4 notes, chacune avec son propre r.
// Toutes les entrées sont validées avant le premier chiffrement.
// ---------------------------------------------------------------------------
pub fn encrypt(pk: &PublicKey, scores: &Scores) -> Result<EncryptedScores, CryptoError> {
    encrypt_with(pk, scores, &mut OsRng)
}

pub fn encrypt_with<R: RngCore + ?Sized>(
    pk:     &PublicKey,
    scores: &Scores,
    rng:    &mut R,
) -> Result<EncryptedScores, CryptoError> {
    if scores.as_array().iter().any(|m| *m >= &pk.n) {
        return Err(ValidationError::PlaintextOutOfRange.into());
    }

    let [exam, lab, quiz, project] = scores.as_array();
    let encrypted = EncryptedScores::new([
        p_encrypt_with(exam, pk, rng)?,
        p_encrypt_with(lab, pk, rng)?,
        p_encrypt_with(quiz, pk, rng)?,
        p_encrypt_with(project, pk, rng)?,
    ]);

    debug!(n = %pk.n, "vecteur de notes chiffré");
    Ok(encrypted)
}
