// ===========================================================================
// Vecteurs de notes : toujours 4 entrées, dans l'ordre
//   examen, travaux pratiques, quiz, projet
// avec les poids fixes [5, 3, 1, 1] (total 10).
// ===========================================================================

use num_bigint::BigUint;
use num_integer::Integer;
use crate::crypto_error::ValidationError;
use crate::paillier::ciphertext::Ciphertext;

pub const SCORE_COUNT: usize = 4;

/// Poids examen / TP / quiz / projet
pub const WEIGHTS: [u32; SCORE_COUNT] = [5, 3, 1, 1];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scores {
    pub exam:    BigUint,
    pub lab:     BigUint,
    pub quiz:    BigUint,
    pub project: BigUint,
}

impl Scores {
    pub fn new(exam: BigUint, lab: BigUint, quiz: BigUint, project: BigUint) -> Self {
        Scores { exam, lab, quiz, project }
    }

    /// Point d'entrée depuis un vecteur de taille variable (JSON, CLI).
    pub fn from_slice(values: &[BigUint]) -> Result<Self, ValidationError> {
        match values {
            [exam, lab, quiz, project] => Ok(Scores::new(
                exam.clone(),
                lab.clone(),
                quiz.clone(),
                project.clone(),
            )),
            _ => Err(ValidationError::WrongLength {
                expected: SCORE_COUNT,
                actual:   values.len(),
            }),
        }
    }

    pub fn as_array(&self) -> [&BigUint; SCORE_COUNT] {
        [&self.exam, &self.lab, &self.quiz, &self.project]
    }

    /// Somme pondérée en clair, Σ wᵢ·mᵢ (sans réduction modulo n)
    pub fn weighted_sum(&self) -> BigUint {
        self.as_array()
            .iter()
            .zip(WEIGHTS)
            .map(|(m, w)| *m * w)
            .sum()
    }
}

impl From<[u64; SCORE_COUNT]> for Scores {
    fn from(values: [u64; SCORE_COUNT]) -> Self {
        let [exam, lab, quiz, project] = values.map(BigUint::from);
        Scores { exam, lab, quiz, project }
    }
}

// ============================================================================
// Vecteur de chiffrés, même ordre que Scores
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedScores([Ciphertext; SCORE_COUNT]);

impl EncryptedScores {
    pub fn new(ciphertexts: [Ciphertext; SCORE_COUNT]) -> Self {
        EncryptedScores(ciphertexts)
    }

    pub fn as_slice(&self) -> &[Ciphertext] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ciphertext> {
        self.0.iter()
    }
}

impl TryFrom<Vec<Ciphertext>> for EncryptedScores {
    type Error = ValidationError;

    fn try_from(values: Vec<Ciphertext>) -> Result<Self, Self::Error> {
        let actual = values.len();
        <[Ciphertext; SCORE_COUNT]>::try_from(values)
            .map(EncryptedScores)
            .map_err(|_| ValidationError::WrongLength { expected: SCORE_COUNT, actual })
    }
}

// ============================================================================
// Note sur 10 : la somme pondérée divisée par 10, deux décimales.
// La division se fait en clair, après déchiffrement ; le schéma ne sait
// pas diviser sous chiffrement.
// ============================================================================
pub fn score_out_of_ten(weighted_sum: &BigUint) -> String {
    let (whole, tenths) = weighted_sum.div_rem(&BigUint::from(10u32));
    format!("{whole}.{tenths}0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_sum() {
        let scores = Scores::from([8, 6, 10, 9]);
        assert_eq!(scores.weighted_sum(), BigUint::from(40u32 + 18 + 10 + 9));
    }

    #[test]
    fn test_from_slice_length() {
        let four: Vec<BigUint> = (1u32..=4).map(BigUint::from).collect();
        let scores = Scores::from_slice(&four).unwrap();
        assert_eq!(scores.quiz, BigUint::from(3u32));

        assert_eq!(
            Scores::from_slice(&four[..3]),
            Err(ValidationError::WrongLength { expected: 4, actual: 3 })
        );
        let five: Vec<BigUint> = (1u32..=5).map(BigUint::from).collect();
        assert!(Scores::from_slice(&five).is_err());
    }

    #[test]
    fn test_encrypted_scores_length() {
        let n = BigUint::from(3233u32);
        let ct = |v: u32| Ciphertext::new(BigUint::from(v), n.clone());
        assert!(EncryptedScores::try_from(vec![ct(1), ct(2), ct(3), ct(4)]).is_ok());
        assert_eq!(
            EncryptedScores::try_from(vec![ct(1), ct(2)]),
            Err(ValidationError::WrongLength { expected: 4, actual: 2 })
        );
    }

    #[test]
    fn test_score_out_of_ten() {
        assert_eq!(score_out_of_ten(&BigUint::from(77u32)), "7.70");
        assert_eq!(score_out_of_ten(&BigUint::from(100u32)), "10.00");
        assert_eq!(score_out_of_ten(&BigUint::from(3u32)), "0.30");
    }
}
