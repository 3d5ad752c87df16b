use num_bigint::BigUint;
use num_traits::Zero;
use crate::paillier::p_keygen::PublicKey;

// ============================================================================
// Chiffré Paillier : élément de Z_{n²} étiqueté par le module n sous lequel
// il a été produit. L'étiquette permet de refuser un chiffré étranger au
// lieu de le déchiffrer en une valeur fausse.
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ciphertext {
    value: BigUint,
    n:     BigUint,
}

impl Ciphertext {
    pub fn new(value: BigUint, n: BigUint) -> Self {
        Ciphertext { value, n }
    }

    pub(crate) fn under(value: BigUint, pk: &PublicKey) -> Self {
        Ciphertext { value, n: pk.n.clone() }
    }

    pub fn value(&self) -> &BigUint { &self.value }

    pub fn modulus(&self) -> &BigUint { &self.n }

    pub fn into_value(self) -> BigUint { self.value }

    /// Même module que `n`
    pub fn is_under(&self, n: &BigUint) -> bool {
        &self.n == n
    }

    /// Valeur dans [1, n²)
    pub fn in_range(&self, n_squared: &BigUint) -> bool {
        !self.value.is_zero() && &self.value < n_squared
    }
}
