pub mod ciphertext;

pub use ciphertext::Ciphertext;
