use std::fs;
use std::io;
use std::path::Path;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::crypto_error::{CryptoError, ValidationError};
use crate::key_management::key_codec::decimal_string;
use crate::paillier::p_keygen::KeyMode;
use crate::paillier::p_primes::DEFAULT_MAX_PRIME;

/// Nombre maximal de tentatives (p, q[, g]) avant NoInvertibleGenerator
pub const DEFAULT_MAX_ATTEMPTS: u32 = 64;

/// Taille maximale d'un fichier de configuration JSON en octets (4 Ko)
const MAX_CONFIG_FILE_BYTES: u64 = 4_096;

// ============================================================================
// Paramètres de génération de clés
//
// En JSON, max_prime est une chaîne décimale (entier de taille arbitraire) :
//   { "max_prime": "1000", "mode": "general", "max_attempts": 32 }
// Tous les champs sont optionnels.
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyGenConfig {
    #[serde(with = "decimal_string")]
    pub max_prime:    BigUint,
    pub mode:         KeyMode,
    pub max_attempts: u32,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        KeyGenConfig {
            max_prime:    BigUint::from(DEFAULT_MAX_PRIME),
            mode:         KeyMode::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl KeyGenConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Charge une configuration depuis un fichier JSON (taille vérifiée avant lecture)
    pub fn load(path: &Path) -> io::Result<Self> {
        let meta = fs::metadata(path)?;
        if meta.len() > MAX_CONFIG_FILE_BYTES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Fichier de configuration trop grand : {} octets (maximum : {} octets)",
                    meta.len(),
                    MAX_CONFIG_FILE_BYTES
                ),
            ));
        }
        let raw = fs::read_to_string(path)?;
        Ok(Self::from_json_str(&raw)?)
    }

    /// Seules les bornes nulles sont refusées ici ; une borne trop petite
    /// est un échec de génération (DegeneratePrimeRange), pas de validation.
    pub fn validate(&self) -> Result<(), CryptoError> {
        if self.max_prime == BigUint::from(0u32) || self.max_attempts == 0 {
            return Err(ValidationError::NonPositiveBound.into());
        }
        Ok(())
    }
}
