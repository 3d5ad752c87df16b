// Réexporte toutes les fonctions mathématiques

mod math;

pub use math::{
    l_function, gcd, lcm, mod_inverse, is_probable_prime, random_prime_up_to, wipe_biguint,
};
