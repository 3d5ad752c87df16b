// ============================================================================
// KeySession — la paire de clés d'un détenteur, pour une session
//
// La paire est créée une fois puis figée derrière un Arc : aucun verrou,
// puisque rien n'est jamais modifié après la génération. La session se
// clone entre threads du détenteur ; l'agrégateur ne reçoit que
// public_key().
//
// La clé privée ne sort jamais : decrypt() la prête en interne, et
// with_private_key() la prête à une fermeture sans la cloner.
// Dernier clone détruit → Drop sur PrivateKey → zeroize.
// ============================================================================

use std::fmt;
use std::sync::Arc;
use num_bigint::BigUint;
use rand_core::OsRng;
use crate::config::KeyGenConfig;
use crate::crypto_error::CryptoError;
use crate::paillier::ciphertext::Ciphertext;
use crate::paillier::p_decrypt::decrypt;
use crate::paillier::p_keygen::{generate_keys_with, CancelFlag, KeyPair, PrivateKey, PublicKey};
use crate::scores::score_out_of_ten;

#[derive(Clone)]
pub struct KeySession {
    keys: Arc<KeyPair>,
}

impl KeySession {
    pub fn new(keys: KeyPair) -> Self {
        KeySession { keys: Arc::new(keys) }
    }

    pub fn generate(config: &KeyGenConfig) -> Result<Self, CryptoError> {
        Self::generate_cancellable(config, &CancelFlag::new())
    }

    /// Génération interruptible depuis un autre thread via `cancel`
    pub fn generate_cancellable(config: &KeyGenConfig, cancel: &CancelFlag) -> Result<Self, CryptoError> {
        let keys = generate_keys_with(config, &mut OsRng, cancel)?;
        Ok(Self::new(keys))
    }

    /// Clé publique à transmettre à l'agrégateur (aucune donnée secrète)
    pub fn public_key(&self) -> PublicKey {
        self.keys.public_key.clone()
    }

    pub fn decrypt(&self, ct: &Ciphertext) -> Result<BigUint, CryptoError> {
        decrypt(&self.keys.private_key, ct)
    }

    /// Déchiffre un agrégat et le ramène sur 10 (deux décimales)
    pub fn decrypt_score(&self, ct: &Ciphertext) -> Result<String, CryptoError> {
        Ok(score_out_of_ten(&self.decrypt(ct)?))
    }

    // Usage typique : exporter la clé privée pour un autre processus du détenteur
    //   let json = session.with_private_key(private_key_to_json);
    pub fn with_private_key<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&PrivateKey) -> T,
    {
        f(&self.keys.private_key)
    }
}

impl fmt::Debug for KeySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySession")
            .field("n", &self.keys.public_key.n)
            .finish_non_exhaustive()
    }
}
