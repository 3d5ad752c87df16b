pub mod p_decrypt;

pub use p_decrypt::decrypt;
