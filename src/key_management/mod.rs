pub mod key_codec;
pub mod key_session;

// Réexportations key_codec
pub use key_codec::{
    PublicKeyJson, PrivateKeyJson, KeyPairJson,
    CiphertextJson, EncryptedScoresJson, ScoresJson,
    biguint_to_decimal, biguint_to_hex, parse_biguint,
    public_key_to_json, private_key_to_json, keypair_to_json,
    ciphertext_to_json, encrypted_scores_to_json,
    json_to_public_key, json_to_private_key, json_to_keypair,
    json_to_ciphertext, json_to_encrypted_scores, json_to_scores,
};

// Réexportations key_session
pub use key_session::KeySession;
