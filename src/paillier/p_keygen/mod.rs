pub mod p_keygen;

pub use p_keygen::{
    derive_keypair, generate_keys, generate_keys_with,
    CancelFlag, KeyMode, KeyPair, PrivateKey, PublicKey,
};
