use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use zeroize::Zeroize;

use crate::config::KeyGenConfig;
use crate::crypto_error::{CryptoError, KeyGenerationError, ValidationError};
use crate::paillier::math::{gcd, l_function, lcm, mod_inverse, wipe_biguint};
use crate::paillier::p_primes::{generate_prime_pair, PrimePair};

// ============================================================================
// Mode de dérivation des clés
//
// Simplified : λ = (p−1)(q−1), g = n+1, μ = λ⁻¹ mod n
// General    : λ = lcm(p−1, q−1), g tiré dans Z*_{n²}, μ = L(g^λ mod n²)⁻¹ mod n
// ============================================================================
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    #[default]
    Simplified,
    General,
}

impl FromStr for KeyMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simplified" | "simple" => Ok(KeyMode::Simplified),
            "general"               => Ok(KeyMode::General),
            other                   => Err(ValidationError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMode::Simplified => write!(f, "simplified"),
            KeyMode::General    => write!(f, "general"),
        }
    }
}

// ============================================================================
// Clé publique Paillier — pas de données secrètes, pas de zeroize nécessaire
//
// Champs fermés : n_squared = n·n et n >= 10 tiennent pour toute clé
// construite hors de ce crate.
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub(crate) n:         BigUint,
    pub(crate) g:         BigUint,
    pub(crate) n_squared: BigUint,
}

impl PublicKey {
    /// Reconstruit une clé publique reçue de l'extérieur.
    /// n >= 10 et g dans [1, n²) sont exigés.
    pub fn new(n: BigUint, g: BigUint) -> Result<Self, CryptoError> {
        let n_squared = &n * &n;
        if n < BigUint::from(10u32) || g.is_zero() || g >= n_squared {
            return Err(ValidationError::InvalidPublicKey.into());
        }
        Ok(PublicKey { n, g, n_squared })
    }

    pub fn n(&self) -> &BigUint { &self.n }

    pub fn g(&self) -> &BigUint { &self.g }

    pub fn n_squared(&self) -> &BigUint { &self.n_squared }
}

// ============================================================================
// Clé privée Paillier — ZEROISÉE À LA DESTRUCTION
//
// n accompagne λ et μ : le déchiffrement en a besoin et la clé privée
// se suffit ainsi à elle-même.
// ============================================================================
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    pub(crate) lambda:    BigUint,
    pub(crate) mu:        BigUint,
    pub(crate) n:         BigUint,
    pub(crate) n_squared: BigUint,
}

impl PrivateKey {
    pub fn new(n: BigUint, lambda: BigUint, mu: BigUint) -> Result<Self, CryptoError> {
        if n < BigUint::from(10u32) || lambda.is_zero() || mu.is_zero() || mu >= n {
            return Err(ValidationError::InvalidPrivateKey.into());
        }
        let n_squared = &n * &n;
        Ok(PrivateKey { lambda, mu, n, n_squared })
    }

    pub fn lambda(&self) -> &BigUint { &self.lambda }

    pub fn mu(&self) -> &BigUint { &self.mu }

    pub fn n(&self) -> &BigUint { &self.n }

    pub fn n_squared(&self) -> &BigUint { &self.n_squared }
}

// λ et μ ne doivent jamais finir dans un journal
impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("n", &self.n)
            .field("lambda", &"<secret>")
            .field("mu", &"<secret>")
            .finish()
    }
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        wipe_biguint(&mut self.lambda);
        wipe_biguint(&mut self.mu);
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// ============================================================================
// Paire de clés
// ============================================================================
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public_key:  PublicKey,
    pub private_key: PrivateKey,
}

// ============================================================================
// Drapeau d'annulation partagé entre l'appelant et la boucle de génération
// ============================================================================
#[derive(Clone, Debug, Default)]
pub struct CancelFlag {
    inner: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self { Self::default() }

    pub fn cancel(&self) {
        self.inner.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }
}

// ============================================================================
// Dérivation d'une paire de clés à partir de (p, q).
//
// En mode simplifié, g = n+1 donne l'identité (n+1)^λ ≡ 1 + λ·n (mod n²) :
// une multiplication suffit, pas de modpow.
//
// Retourne NoInvertibleGenerator si L(g^λ mod n²) n'est pas inversible
// modulo n ; l'appelant tire alors de nouveaux p, q (et g).
// ============================================================================
pub fn derive_keypair<R: RngCore + ?Sized>(
    pair: &PrimePair,
    mode: KeyMode,
    rng:  &mut R,
) -> Result<KeyPair, CryptoError> {
    let n         = pair.modulus();
    let n_squared = &n * &n;

    let p_minus_1 = pair.p() - BigUint::one();
    let q_minus_1 = pair.q() - BigUint::one();

    let (lambda, g, g_lambda) = match mode {
        KeyMode::Simplified => {
            let lambda   = &p_minus_1 * &q_minus_1;
            let g        = &n + BigUint::one();
            debug!(%n, "étape 2 : λ = (p−1)(q−1)");
            debug!(%g, "étape 3 : g = n+1");
            let g_lambda = (BigUint::one() + &lambda * &n) % &n_squared;
            (lambda, g, g_lambda)
        }
        KeyMode::General => {
            let lambda   = lcm(&p_minus_1, &q_minus_1);
            debug!(%n, "étape 2 : λ = lcm(p−1, q−1)");
            let g        = random_unit(&n, &n_squared, rng);
            debug!(%g, "étape 3 : g tiré dans Z*_{{n²}}");
            let g_lambda = g.modpow(&lambda, &n_squared);
            (lambda, g, g_lambda)
        }
    };

    finish_keypair(n, n_squared, g, lambda, &g_lambda)
}

// Tire g uniformément dans Z*_{n²} : g est inversible mod n² ssi gcd(g, n) = 1
fn random_unit<R: RngCore + ?Sized>(n: &BigUint, n_squared: &BigUint, rng: &mut R) -> BigUint {
    loop {
        let candidate = rng.gen_biguint_range(&BigUint::one(), n_squared);
        if gcd(&candidate, n).is_one() {
            break candidate;
        }
    }
}

fn finish_keypair(
    n:         BigUint,
    n_squared: BigUint,
    g:         BigUint,
    lambda:    BigUint,
    g_lambda:  &BigUint,
) -> Result<KeyPair, CryptoError> {
    let no_inverse = KeyGenerationError::NoInvertibleGenerator { attempts: 1 };

    let mu = match l_function(g_lambda, &n).ok().and_then(|l| mod_inverse(&l, &n)) {
        Some(mu) => mu,
        None => {
            debug!(%n, "étape 4 : L(g^λ mod n²) non inversible modulo n");
            return Err(no_inverse.into());
        }
    };
    debug!(%n, "étape 4 : μ calculé");

    Ok(KeyPair {
        public_key:  PublicKey { n: n.clone(), g, n_squared: n_squared.clone() },
        private_key: PrivateKey { lambda, mu, n, n_squared },
    })
}

// ============================================================================
// Génération de clés avec la configuration par défaut et OsRng
// ============================================================================
pub fn generate_keys(max_prime: &BigUint, mode: KeyMode) -> Result<KeyPair, CryptoError> {
    let config = KeyGenConfig {
        max_prime: max_prime.clone(),
        mode,
        ..KeyGenConfig::default()
    };
    generate_keys_with(&config, &mut OsRng, &CancelFlag::new())
}

// ============================================================================
// Boucle de rééchantillonnage bornée.
//
// Chaque tentative tire de nouveaux p, q (et un nouveau g en mode général).
// Le drapeau d'annulation est consulté avant chaque tentative.
// ============================================================================
pub fn generate_keys_with<R: RngCore + ?Sized>(
    config: &KeyGenConfig,
    rng:    &mut R,
    cancel: &CancelFlag,
) -> Result<KeyPair, CryptoError> {
    config.validate()?;

    debug!(mode = %config.mode, max_prime = %config.max_prime, "début de la génération de clés");

    for attempt in 1..=config.max_attempts {
        if cancel.is_cancelled() {
            return Err(KeyGenerationError::Cancelled.into());
        }

        let pair = generate_prime_pair(&config.max_prime, rng)?;
        debug!(attempt, n = %pair.modulus(), "étape 1 : p et q tirés");

        match derive_keypair(&pair, config.mode, rng) {
            Ok(kp) => {
                info!(attempt, n = %kp.public_key.n(), mode = %config.mode, "paire de clés générée");
                return Ok(kp);
            }
            Err(CryptoError::KeyGeneration(KeyGenerationError::NoInvertibleGenerator { .. })) => {
                warn!(attempt, "pas d'inverse modulaire pour μ, nouveau tirage");
            }
            Err(e) => return Err(e),
        }
    }

    Err(KeyGenerationError::NoInvertibleGenerator { attempts: config.max_attempts }.into())
}
