pub mod p_primes;

pub use p_primes::{
    generate_prime_pair, generate_prime_pair_within, PrimePair,
    DEFAULT_MAX_PRIME, MAX_PAIR_ATTEMPTS, MIN_PRIME_BOUND,
};
