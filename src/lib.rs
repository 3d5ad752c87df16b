// Déclaration des modules
pub mod crypto_error;
pub mod config;
pub mod paillier;
pub mod scores;
pub mod key_management;

pub use crate::paillier::math;
pub use crate::paillier::p_primes;
pub use crate::paillier::p_keygen;
pub use crate::paillier::p_encrypt;
pub use crate::paillier::p_decrypt;
pub use crate::paillier::p_aggregate;

// Les quatre opérations exposées à l'appelant (HTTP, CLI, tests)
pub use p_keygen::generate_keys;
pub use p_encrypt::encrypt;
pub use p_aggregate::aggregate;
pub use p_decrypt::decrypt;

// Types
pub use paillier::ciphertext::Ciphertext;
pub use p_keygen::{CancelFlag, KeyMode, KeyPair, PrivateKey, PublicKey};
pub use p_primes::PrimePair;
pub use scores::{EncryptedScores, Scores, WEIGHTS};
pub use config::KeyGenConfig;

// Erreurs
pub use crypto_error::{CryptoError, DecryptionError, KeyGenerationError, ValidationError};

// Session du détenteur de clés — la clé privée ne la quitte pas
pub use key_management::KeySession;
