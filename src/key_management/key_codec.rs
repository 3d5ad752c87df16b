use serde::{Serialize, Deserialize};
use num_bigint::BigUint;
use num_traits::Num;
use zeroize::Zeroize;
use crate::crypto_error::{CryptoError, ValidationError};
use crate::paillier::ciphertext::Ciphertext;
use crate::paillier::p_keygen::{KeyPair, PrivateKey, PublicKey};
use crate::scores::{EncryptedScores, Scores};

// ============================================================================
// Entiers aux frontières : chaînes décimales ou hexadécimales ("0x…"),
// jamais de types numériques de largeur fixe.
//
// La longueur est vérifiée AVANT la conversion : BigUint::from_str_radix
// est quadratique en la taille de l'entrée.
// ============================================================================

/// Longueur maximale d'un champ entier en caractères.
/// Couvre n² pour des modules jusqu'à 4096 bits, avec marge.
pub const MAX_INTEGER_FIELD_LEN: usize = 3_072;

pub fn biguint_to_decimal(value: &BigUint) -> String {
    value.to_str_radix(10)
}

pub fn biguint_to_hex(value: &BigUint) -> String {
    format!("0x{}", value.to_str_radix(16))
}

/// Décimal par défaut, hexadécimal avec le préfixe 0x.
pub fn parse_biguint(raw: &str) -> Result<BigUint, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.len() > MAX_INTEGER_FIELD_LEN {
        return Err(ValidationError::FieldTooLong {
            actual:  trimmed.len(),
            maximum: MAX_INTEGER_FIELD_LEN,
        });
    }

    let (digits, radix) = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None      => (trimmed, 10),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ValidationError::MalformedInteger(truncated(trimmed)));
    }

    BigUint::from_str_radix(digits, radix)
        .map_err(|_| ValidationError::MalformedInteger(truncated(trimmed)))
}

// Les messages d'erreur ne recopient pas une entrée géante
fn truncated(raw: &str) -> String {
    raw.chars().take(32).collect()
}

/// `#[serde(with = "decimal_string")]` pour un champ BigUint
pub mod decimal_string {
    use num_bigint::BigUint;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::biguint_to_decimal(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_biguint(&raw).map_err(de::Error::custom)
    }
}

// ============================================================================
// Structures JSON
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyJson {
    pub n: String,
    pub g: String,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PrivateKeyJson {
    pub n:      String,
    pub lambda: String,
    pub mu:     String,
}

impl Drop for PrivateKeyJson {
    fn drop(&mut self) {
        self.lambda.zeroize();
        self.mu.zeroize();
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct KeyPairJson {
    pub public_key:  PublicKeyJson,
    pub private_key: PrivateKeyJson,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CiphertextJson {
    pub n:     String,
    pub value: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EncryptedScoresJson {
    pub ciphertexts: Vec<CiphertextJson>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScoresJson {
    pub scores: Vec<String>,
}

// ============================================================================
// Conversion structures Rust → JSON
// ============================================================================

pub fn public_key_to_json(pk: &PublicKey) -> PublicKeyJson {
    PublicKeyJson {
        n: biguint_to_decimal(&pk.n),
        g: biguint_to_decimal(&pk.g),
    }
}

pub fn private_key_to_json(sk: &PrivateKey) -> PrivateKeyJson {
    PrivateKeyJson {
        n:      biguint_to_decimal(sk.n()),
        lambda: biguint_to_decimal(sk.lambda()),
        mu:     biguint_to_decimal(sk.mu()),
    }
}

pub fn keypair_to_json(kp: &KeyPair) -> KeyPairJson {
    KeyPairJson {
        public_key:  public_key_to_json(&kp.public_key),
        private_key: private_key_to_json(&kp.private_key),
    }
}

pub fn ciphertext_to_json(ct: &Ciphertext) -> CiphertextJson {
    CiphertextJson {
        n:     biguint_to_decimal(ct.modulus()),
        value: biguint_to_decimal(ct.value()),
    }
}

pub fn encrypted_scores_to_json(scores: &EncryptedScores) -> EncryptedScoresJson {
    EncryptedScoresJson {
        ciphertexts: scores.iter().map(ciphertext_to_json).collect(),
    }
}

// ============================================================================
// Conversion JSON → structures Rust (validations de cohérence incluses)
// ============================================================================

pub fn json_to_public_key(json: &PublicKeyJson) -> Result<PublicKey, CryptoError> {
    PublicKey::new(parse_biguint(&json.n)?, parse_biguint(&json.g)?)
}

pub fn json_to_private_key(json: &PrivateKeyJson) -> Result<PrivateKey, CryptoError> {
    PrivateKey::new(
        parse_biguint(&json.n)?,
        parse_biguint(&json.lambda)?,
        parse_biguint(&json.mu)?,
    )
}

pub fn json_to_keypair(json: &KeyPairJson) -> Result<KeyPair, CryptoError> {
    let public_key  = json_to_public_key(&json.public_key)?;
    let private_key = json_to_private_key(&json.private_key)?;
    if public_key.n != *private_key.n() {
        return Err(ValidationError::InvalidPublicKey.into());
    }
    Ok(KeyPair { public_key, private_key })
}

pub fn json_to_ciphertext(json: &CiphertextJson) -> Result<Ciphertext, CryptoError> {
    Ok(Ciphertext::new(parse_biguint(&json.value)?, parse_biguint(&json.n)?))
}

pub fn json_to_encrypted_scores(json: &EncryptedScoresJson) -> Result<EncryptedScores, CryptoError> {
    let cts = json.ciphertexts
        .iter()
        .map(json_to_ciphertext)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(EncryptedScores::try_from(cts)?)
}

pub fn json_to_scores(json: &ScoresJson) -> Result<Scores, CryptoError> {
    let values = json.scores
        .iter()
        .map(|s| parse_biguint(s))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Scores::from_slice(&values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paillier::p_keygen::{derive_keypair, KeyMode};
    use crate::paillier::p_primes::PrimePair;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn big(v: u64) -> BigUint { BigUint::from(v) }

    #[test]
    fn test_parse_decimal_and_hex() {
        assert_eq!(parse_biguint("3233"), Ok(big(3233)));
        assert_eq!(parse_biguint(" 0xCA1 "), Ok(big(3233)));
        assert_eq!(parse_biguint(&biguint_to_hex(&big(3233))), Ok(big(3233)));
        let huge = "123456789012345678901234567890123456789";
        assert_eq!(biguint_to_decimal(&parse_biguint(huge).unwrap()), huge);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "-5", "0x", "12a", "0xZZ", "1.5", "+"] {
            assert!(
                matches!(parse_biguint(raw), Err(ValidationError::MalformedInteger(_))),
                "{raw:?} accepté"
            );
        }
    }

    #[test]
    fn test_parse_length_cap() {
        let long = "9".repeat(MAX_INTEGER_FIELD_LEN + 1);
        assert!(matches!(parse_biguint(&long), Err(ValidationError::FieldTooLong { .. })));
    }

    #[test]
    fn test_keypair_json_round_trip() {
        let pair = PrimePair::new(big(61), big(53)).unwrap();
        let kp = derive_keypair(&pair, KeyMode::Simplified, &mut StdRng::seed_from_u64(0)).unwrap();

        let raw = serde_json::to_string(&keypair_to_json(&kp)).unwrap();
        assert!(raw.contains("\"3233\""));
        let parsed: KeyPairJson = serde_json::from_str(&raw).unwrap();
        let back = json_to_keypair(&parsed).unwrap();
        assert_eq!(back.public_key, kp.public_key);
        assert_eq!(back.private_key, kp.private_key);
    }

    #[test]
    fn test_mismatched_halves_are_refused() {
        let json = KeyPairJson {
            public_key:  PublicKeyJson { n: "3233".into(), g: "3234".into() },
            private_key: PrivateKeyJson { n: "2773".into(), lambda: "2668".into(), mu: "5".into() },
        };
        assert_eq!(
            json_to_keypair(&json).err(),
            Some(CryptoError::Validation(ValidationError::InvalidPublicKey))
        );
    }

    #[test]
    fn test_scores_json_length_checked() {
        let ok = ScoresJson { scores: vec!["8".into(), "6".into(), "10".into(), "9".into()] };
        assert_eq!(json_to_scores(&ok).unwrap(), Scores::from([8, 6, 10, 9]));

        let short = ScoresJson { scores: vec!["8".into()] };
        assert_eq!(
            json_to_scores(&short),
            Err(CryptoError::Validation(ValidationError::WrongLength { expected: 4, actual: 1 }))
        );
    }

    #[test]
    fn test_encrypted_scores_json() {
        let cts: Vec<CiphertextJson> = (1..=4)
            .map(|v: u32| CiphertextJson { n: "3233".into(), value: v.to_string() })
            .collect();
        let parsed = json_to_encrypted_scores(&EncryptedScoresJson { ciphertexts: cts.clone() }).unwrap();
        assert_eq!(encrypted_scores_to_json(&parsed).ciphertexts, cts);

        let three = EncryptedScoresJson { ciphertexts: cts[..3].to_vec() };
        assert!(json_to_encrypted_scores(&three).is_err());
    }
}
