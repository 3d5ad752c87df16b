pub mod p_aggregate;

pub use p_aggregate::{add_ciphertexts, aggregate, aggregate_weighted, scale_ciphertext};
