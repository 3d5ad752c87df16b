use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::{OsRng, RngCore};
use tracing::debug;
use crate::paillier::math::{gcd, is_probable_prime, random_prime_up_to, wipe_biguint};
use crate::crypto_error::{CryptoError, KeyGenerationError, ValidationError};

/// Borne par défaut sur p et q
pub const DEFAULT_MAX_PRIME: u64 = 1000;

/// Plus petite borne admettant une paire valide : (3, 5).
/// Avec 2, n = 2q est pair et (p−1)(q−1) aussi, donc gcd ≥ 2.
pub const MIN_PRIME_BOUND: u64 = 5;

/// Nombre de tirages (p, q) avant d'abandonner
pub const MAX_PAIR_ATTEMPTS: u32 = 10_000;

// Tirages de candidats pour un seul premier
const MAX_PRIME_DRAWS: u32 = 10_000;

// ============================================================================
// Paire de premiers (p, q) — secrète, effacée à la destruction
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimePair {
    p: BigUint,
    q: BigUint,
}

impl PrimePair {
    /// Valide une paire fournie par l'appelant (premiers, distincts,
    /// gcd(pq, (p−1)(q−1)) = 1 et pq ≥ 10).
    pub fn new(p: BigUint, q: BigUint) -> Result<Self, CryptoError> {
        let mut rng = OsRng;
        if !is_probable_prime(&p, &mut rng) || !is_probable_prime(&q, &mut rng) {
            return Err(ValidationError::InvalidPrimePair.into());
        }
        if !is_admissible(&p, &q) {
            return Err(ValidationError::InvalidPrimePair.into());
        }
        Ok(PrimePair { p, q })
    }

    pub fn p(&self) -> &BigUint { &self.p }

    pub fn q(&self) -> &BigUint { &self.q }

    pub fn modulus(&self) -> BigUint { &self.p * &self.q }
}

impl Drop for PrimePair {
    fn drop(&mut self) {
        wipe_biguint(&mut self.p);
        wipe_biguint(&mut self.q);
    }
}

fn is_admissible(p: &BigUint, q: &BigUint) -> bool {
    if p == q {
        return false;
    }
    let n = p * q;
    if n < BigUint::from(10u32) {
        return false;
    }
    let phi = (p - BigUint::one()) * (q - BigUint::one());
    gcd(&n, &phi).is_one()
}

// ============================================================================
// Tire deux premiers indépendants <= max_prime jusqu'à obtenir une paire
// admissible. Nombre de tentatives borné : une borne trop petite échoue
// avec DegeneratePrimeRange au lieu de boucler indéfiniment.
// ============================================================================
pub fn generate_prime_pair<R: RngCore + ?Sized>(
    max_prime: &BigUint,
    rng: &mut R,
) -> Result<PrimePair, CryptoError> {
    generate_prime_pair_within(max_prime, MAX_PAIR_ATTEMPTS, rng)
}

/// Même tirage, avec un nombre de paires essayées fixé par l'appelant
pub fn generate_prime_pair_within<R: RngCore + ?Sized>(
    max_prime:    &BigUint,
    max_attempts: u32,
    rng:          &mut R,
) -> Result<PrimePair, CryptoError> {
    if max_prime.is_zero() {
        return Err(ValidationError::NonPositiveBound.into());
    }
    if max_prime < &BigUint::from(MIN_PRIME_BOUND) {
        return Err(KeyGenerationError::DegeneratePrimeRange.into());
    }

    for attempt in 1..=max_attempts {
        let p = random_prime_up_to(max_prime, MAX_PRIME_DRAWS, rng)
            .ok_or(KeyGenerationError::DegeneratePrimeRange)?;
        let q = random_prime_up_to(max_prime, MAX_PRIME_DRAWS, rng)
            .ok_or(KeyGenerationError::DegeneratePrimeRange)?;

        if is_admissible(&p, &q) {
            debug!(attempt, "paire de premiers admissible trouvée");
            return Ok(PrimePair { p, q });
        }
    }

    debug!(max_attempts, "aucune paire admissible dans la limite de tirages");
    Err(KeyGenerationError::DegeneratePrimeRange.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn big(v: u64) -> BigUint { BigUint::from(v) }

    #[test]
    fn test_pair_satisfies_constraints() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let pair = generate_prime_pair(&big(DEFAULT_MAX_PRIME), &mut rng).unwrap();
            let (p, q) = (pair.p().clone(), pair.q().clone());
            assert_ne!(p, q);
            assert!(p <= big(DEFAULT_MAX_PRIME) && q <= big(DEFAULT_MAX_PRIME));
            let phi = (&p - 1u32) * (&q - 1u32);
            assert!(gcd(&pair.modulus(), &phi).is_one());
            assert!(pair.modulus() >= big(10));
        }
    }

    #[test]
    fn test_smallest_bound_yields_three_and_five() {
        let mut rng = StdRng::seed_from_u64(1);
        let pair = generate_prime_pair(&big(MIN_PRIME_BOUND), &mut rng).unwrap();
        assert_eq!(pair.modulus(), big(15));
    }

    #[test]
    fn test_degenerate_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for bound in 1..MIN_PRIME_BOUND {
            assert_eq!(
                generate_prime_pair(&big(bound), &mut rng),
                Err(CryptoError::KeyGeneration(KeyGenerationError::DegeneratePrimeRange))
            );
        }
        assert_eq!(
            generate_prime_pair(&big(0), &mut rng),
            Err(CryptoError::Validation(ValidationError::NonPositiveBound))
        );
    }

    #[test]
    fn test_pair_attempt_cap_is_reported() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            generate_prime_pair_within(&big(DEFAULT_MAX_PRIME), 0, &mut rng),
            Err(CryptoError::KeyGeneration(KeyGenerationError::DegeneratePrimeRange))
        );

        // Borne 5 : candidats {2, 3, 5}, seules (3, 5) et (5, 3) passent.
        // Avec une seule paire tirée, la limite est atteinte la plupart du temps.
        let (mut found, mut capped) = (0, 0);
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            match generate_prime_pair_within(&big(MIN_PRIME_BOUND), 1, &mut rng) {
                Ok(pair) => {
                    assert_eq!(pair.modulus(), big(15));
                    found += 1;
                }
                Err(e) => {
                    assert_eq!(e, CryptoError::KeyGeneration(KeyGenerationError::DegeneratePrimeRange));
                    capped += 1;
                }
            }
        }
        assert!(found > 0);
        assert!(capped > 0);
    }

    #[test]
    fn test_explicit_pair_validation() {
        assert!(PrimePair::new(big(61), big(53)).is_ok());
        // Même premier deux fois
        assert!(PrimePair::new(big(61), big(61)).is_err());
        // 2 rend gcd(n, φ) pair
        assert!(PrimePair::new(big(2), big(7)).is_err());
        // 51 = 3 · 17
        assert!(PrimePair::new(big(51), big(53)).is_err());
        // 7·13 = 91, φ = 72, gcd = 1
        assert!(PrimePair::new(big(7), big(13)).is_ok());
        // 3 | (7 − 1) → gcd(21, 12) = 3
        assert!(PrimePair::new(big(3), big(7)).is_err());
    }
}
