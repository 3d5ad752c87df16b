pub mod p_encrypt;

pub use p_encrypt::{encrypt, encrypt_with, p_encrypt, p_encrypt_with};
