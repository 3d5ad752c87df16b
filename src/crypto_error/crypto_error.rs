// ===========================================================================
// Gestion centralisée des erreurs cryptographiques
//
// Trois familles, jamais de panic!/assert!/unwrap() dans la bibliothèque :
//   - ValidationError    : entrée refusée immédiatement, jamais réessayée
//   - KeyGenerationError : échec fatal de l'appel generate_keys
//   - DecryptionError    : clé et chiffré incompatibles (déterministe)
// CryptoError les regroupe pour que `?` propage tout jusqu'à l'appelant.
// ===========================================================================

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Le vecteur ne contient pas exactement le nombre d'entrées attendu
    WrongLength { expected: usize, actual: usize },
    /// Le message m est >= n (hors domaine plaintext Paillier)
    PlaintextOutOfRange,
    /// Vecteur de chiffrés et vecteur de poids de tailles différentes
    LengthMismatch { ciphertexts: usize, weights: usize },
    /// Chiffré produit sous un autre module que la clé publique fournie
    ForeignCiphertext,
    /// Chiffré hors de [1, n²)
    CiphertextOutOfRange,
    /// Borne max_prime nulle
    NonPositiveBound,
    /// Entier décimal ou hexadécimal invalide (négatifs inclus)
    MalformedInteger(String),
    /// Champ trop long : conversion BigUint coûteuse refusée
    FieldTooLong { actual: usize, maximum: usize },
    /// Mode de dérivation inconnu
    UnknownMode(String),
    /// Clé publique incohérente (n trop petit, g hors de Z_{n²})
    InvalidPublicKey,
    /// Clé privée incohérente (n trop petit, λ nul, μ hors de [1, n))
    InvalidPrivateKey,
    /// Paire (p, q) fournie non admissible
    InvalidPrimePair,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyGenerationError {
    /// Aucun μ inversible trouvé avant la limite de tentatives
    NoInvertibleGenerator { attempts: u32 },
    /// La borne sur les premiers n'admet aucune paire valide
    DegeneratePrimeRange,
    /// Génération interrompue par l'appelant
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecryptionError {
    /// (c^λ mod n² − 1) n'est pas divisible par n
    InexactDivision,
    /// Le chiffré porte un module différent de celui de la clé privée
    KeyMismatch,
    /// Le chiffré est hors de [1, n²)
    CiphertextOutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    Validation(ValidationError),
    KeyGeneration(KeyGenerationError),
    Decryption(DecryptionError),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::WrongLength { expected, actual } =>
                write!(f, "Vecteur de taille {actual}, {expected} entrées attendues"),
            ValidationError::PlaintextOutOfRange =>
                write!(f, "Le message doit être dans [0, n)"),
            ValidationError::LengthMismatch { ciphertexts, weights } =>
                write!(f, "{ciphertexts} chiffrés pour {weights} poids"),
            ValidationError::ForeignCiphertext =>
                write!(f, "Chiffré produit sous un autre module que la clé publique"),
            ValidationError::CiphertextOutOfRange =>
                write!(f, "Le chiffré doit être dans [1, n²)"),
            ValidationError::NonPositiveBound =>
                write!(f, "La borne max_prime doit être strictement positive"),
            ValidationError::MalformedInteger(raw) =>
                write!(f, "Entier invalide : {raw:?}"),
            ValidationError::FieldTooLong { actual, maximum } =>
                write!(f, "Champ trop long : {actual} caractères (maximum autorisé : {maximum})"),
            ValidationError::UnknownMode(raw) =>
                write!(f, "Mode inconnu : {raw:?} (attendu : simplified ou general)"),
            ValidationError::InvalidPublicKey =>
                write!(f, "Clé publique incohérente : n < 10 ou g hors de [1, n²)"),
            ValidationError::InvalidPrivateKey =>
                write!(f, "Clé privée incohérente : n < 10, λ nul ou μ hors de [1, n)"),
            ValidationError::InvalidPrimePair =>
                write!(f, "Paire (p, q) invalide : premiers distincts avec gcd(pq, (p−1)(q−1)) = 1 et pq ≥ 10 requis"),
        }
    }
}

impl fmt::Display for KeyGenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyGenerationError::NoInvertibleGenerator { attempts } =>
                write!(f, "Aucun générateur inversible après {attempts} tentatives"),
            KeyGenerationError::DegeneratePrimeRange =>
                write!(f, "La borne sur les premiers n'admet aucune paire (p, q) valide"),
            KeyGenerationError::Cancelled =>
                write!(f, "Génération de clés annulée"),
        }
    }
}

impl fmt::Display for DecryptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecryptionError::InexactDivision =>
                write!(f, "Division non exacte dans L(x) : clé ou chiffré invalide"),
            DecryptionError::KeyMismatch =>
                write!(f, "Le chiffré n'a pas été produit sous cette clé"),
            DecryptionError::CiphertextOutOfRange =>
                write!(f, "Le chiffré doit être dans [1, n²)"),
        }
    }
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::Validation(e)    => write!(f, "Entrée invalide : {e}"),
            CryptoError::KeyGeneration(e) => write!(f, "Génération de clés : {e}"),
            CryptoError::Decryption(e)    => write!(f, "Déchiffrement : {e}"),
        }
    }
}

impl std::error::Error for ValidationError {}
impl std::error::Error for KeyGenerationError {}
impl std::error::Error for DecryptionError {}

impl std::error::Error for CryptoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CryptoError::Validation(e)    => Some(e),
            CryptoError::KeyGeneration(e) => Some(e),
            CryptoError::Decryption(e)    => Some(e),
        }
    }
}

impl From<ValidationError> for CryptoError {
    fn from(e: ValidationError) -> Self { CryptoError::Validation(e) }
}

impl From<KeyGenerationError> for CryptoError {
    fn from(e: KeyGenerationError) -> Self { CryptoError::KeyGeneration(e) }
}

impl From<DecryptionError> for CryptoError {
    fn from(e: DecryptionError) -> Self { CryptoError::Decryption(e) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_mark_wraps_kind() {
        fn fails() -> Result<(), CryptoError> {
            Err::<(), _>(DecryptionError::InexactDivision)?;
            Ok(())
        }
        assert_eq!(
            fails(),
            Err(CryptoError::Decryption(DecryptionError::InexactDivision))
        );
    }

    #[test]
    fn test_display_names_the_family() {
        let e = CryptoError::from(KeyGenerationError::NoInvertibleGenerator { attempts: 3 });
        let msg = e.to_string();
        assert!(msg.starts_with("Génération de clés"));
        assert!(msg.contains('3'));
    }
}
