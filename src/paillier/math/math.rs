use num_bigint::{BigInt, BigUint, RandBigInt};
use num_traits::{One, Zero};
use num_integer::Integer;
use rand_core::RngCore;
use crate::crypto_error::DecryptionError;

// ---------------------------------------------------------------------------
// Table de petits premiers impairs (crible préliminaire, couvre jusqu'à 2999)
// En dessous de 2999² la division d'essai seule est déjà déterministe.
// ---------------------------------------------------------------------------
const SMALL_PRIMES: &[u64] = &[
      3,   5,   7,  11,  13,  17,  19,  23,  29,  31,
     37,  41,  43,  47,  53,  59,  61,  67,  71,  73,
     79,  83,  89,  97, 101, 103, 107, 109, 113, 127,
    131, 137, 139, 149, 151, 157, 163, 167, 173, 179,
    181, 191, 193, 197, 199, 211, 223, 227, 229, 233,
    239, 241, 251, 257, 263, 269, 271, 277, 281, 283,
    293, 307, 311, 313, 317, 331, 337, 347, 349, 353,
    359, 367, 373, 379, 383, 389, 397, 401, 409, 419,
    421, 431, 433, 439, 443, 449, 457, 461, 463, 467,
    479, 487, 491, 499, 503, 509, 521, 523, 541, 547,
    557, 563, 569, 571, 577, 587, 593, 599, 601, 607,
    613, 617, 619, 631, 641, 643, 647, 653, 659, 661,
    673, 677, 683, 691, 701, 709, 719, 727, 733, 739,
    743, 751, 757, 761, 769, 773, 787, 797, 809, 811,
    821, 823, 827, 829, 839, 853, 857, 859, 863, 877,
    881, 883, 887, 907, 911, 919, 929, 937, 941, 947,
    953, 967, 971, 977, 983, 991, 997,1009,1013,1021,
   1031,1033,1039,1049,1051,1061,1063,1069,1087,1091,
   1093,1097,1103,1109,1117,1123,1129,1151,1153,1163,
   1171,1181,1187,1193,1201,1213,1217,1223,1229,1231,
   1237,1249,1259,1277,1279,1283,1289,1291,1297,1301,
   1303,1307,1319,1321,1327,1361,1367,1373,1381,1399,
   1409,1423,1427,1429,1433,1439,1447,1451,1453,1459,
   1471,1481,1483,1487,1489,1493,1499,1511,1523,1531,
   1543,1549,1553,1559,1567,1571,1579,1583,1597,1601,
   1607,1609,1613,1619,1621,1627,1637,1657,1663,1667,
   1669,1693,1697,1699,1709,1721,1723,1733,1741,1747,
   1753,1759,1777,1783,1787,1789,1801,1811,1823,1831,
   1847,1861,1867,1871,1873,1877,1879,1889,1901,1907,
   1913,1931,1933,1949,1951,1973,1979,1987,1993,1997,
   1999,2003,2011,2017,2027,2029,2039,2053,2063,2069,
   2081,2083,2087,2089,2099,2111,2113,2129,2131,2137,
   2141,2143,2153,2161,2179,2203,2207,2213,2221,2237,
   2239,2243,2251,2267,2269,2273,2281,2287,2293,2297,
   2309,2311,2333,2339,2341,2347,2351,2357,2371,2377,
   2381,2383,2389,2393,2399,2411,2417,2423,2437,2441,
   2447,2459,2467,2473,2477,2503,2521,2531,2539,2543,
   2549,2551,2557,2579,2591,2593,2609,2617,2621,2633,
   2647,2657,2659,2663,2671,2677,2683,2687,2689,2693,
   2699,2707,2711,2713,2719,2729,2731,2741,2749,2753,
   2767,2777,2789,2791,2797,2801,2803,2819,2833,2837,
   2843,2851,2857,2861,2879,2887,2897,2903,2909,2917,
   2927,2939,2953,2957,2963,2969,2971,2999,
];

const SIEVE_LIMIT: u64 = 2999 * 2999;

// Nombre de rounds Miller-Rabin au-delà de SIEVE_LIMIT
const MILLER_RABIN_ROUNDS: u32 = 20;

// ---------------------------------------------------------------------------
// Fonction L(u) = (u-1)/n, division exacte obligatoire.
//
// Un reste non nul (ou u = 0) signale un chiffré produit sous une autre clé
// ou un chiffré malformé : on le remonte au lieu de tronquer silencieusement.
// ---------------------------------------------------------------------------
pub fn l_function(u: &BigUint, n: &BigUint) -> Result<BigUint, DecryptionError> {
    if u.is_zero() {
        return Err(DecryptionError::InexactDivision);
    }
    let (quotient, remainder) = (u - BigUint::one()).div_rem(n);
    if !remainder.is_zero() {
        return Err(DecryptionError::InexactDivision);
    }
    Ok(quotient)
}

// ---------------------------------------------------------------------------
// Efface un entier secret (λ, μ, p, q).
//
// set_zero() ne fait que vider le Vec de chiffres : les octets restent sur
// le tas. On réécrit d'abord chaque chiffre à zéro dans le même tampon.
// ---------------------------------------------------------------------------
pub fn wipe_biguint(x: &mut BigUint) {
    let words = ((x.bits() + 63) / 64 * 2) as usize;
    x.assign_from_slice(&vec![0u32; words]);
    std::hint::black_box(&*x);
}

// Calcule le pgcd de deux nombres
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

pub fn lcm(a: &BigUint, b: &BigUint) -> BigUint {
    a.lcm(b)
}

// ---------------------------------------------------------------------------
// Test de primalité.
//
// Division d'essai par la table, suffisante seule pour n < 2999².
// Au-delà, Miller-Rabin avec des témoins tirés par `rng`.
// ---------------------------------------------------------------------------
pub fn is_probable_prime<R: RngCore + ?Sized>(n: &BigUint, rng: &mut R) -> bool {
    let two = BigUint::from(2u32);
    if n < &two { return false; }
    if n == &two { return true; }
    if n.is_even() { return false; }

    for &p in SMALL_PRIMES {
        let bp = BigUint::from(p);
        if n == &bp {
            return true;
        }
        if (n % &bp).is_zero() {
            return false;
        }
    }

    if n < &BigUint::from(SIEVE_LIMIT) {
        return true;
    }

    miller_rabin(n, MILLER_RABIN_ROUNDS, rng)
}

fn miller_rabin<R: RngCore + ?Sized>(n: &BigUint, rounds: u32, rng: &mut R) -> bool {
    let n_minus_1 = n - BigUint::one();
    let mut d = n_minus_1.clone();
    let mut r = 0u32;
    while d.is_even() {
        d >>= 1;
        r += 1;
    }

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(
            &BigUint::from(2u32),
            &(n - BigUint::from(2u32)),
        );
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue 'witness;
        }
        for _ in 0..r.saturating_sub(1) {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

// ---------------------------------------------------------------------------
// Tire un premier uniformément parmi les candidats de [2, bound].
//
// Échantillonnage par rejet borné à `max_draws` tirages : None si aucun
// premier n'a été trouvé (borne trop petite ou malchance extrême).
// ---------------------------------------------------------------------------
pub fn random_prime_up_to<R: RngCore + ?Sized>(
    bound: &BigUint,
    max_draws: u32,
    rng: &mut R,
) -> Option<BigUint> {
    let low = BigUint::from(2u32);
    if bound < &low {
        return None;
    }
    let high = bound + BigUint::one();

    for _ in 0..max_draws {
        let candidate = rng.gen_biguint_range(&low, &high);
        if is_probable_prime(&candidate, rng) {
            return Some(candidate);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Calcule l'inverse modulaire de a mod n.
// Retourne None si gcd(a,n) != 1.
// ---------------------------------------------------------------------------
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Option<BigUint> {
    let (g, x, _) = extended_gcd(a, n);
    if !g.is_one() {
        return None;
    }

    let n_big = BigInt::from(n.clone());
    let mut x_mod = x % &n_big;
    if x_mod < BigInt::zero() {
        x_mod += &n_big;
    }

    x_mod.to_biguint()
}

fn extended_gcd(a: &BigUint, b: &BigUint) -> (BigUint, BigInt, BigInt) {
    let (mut old_r, mut r) = (BigInt::from(a.clone()), BigInt::from(b.clone()));
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);

        let next_t = &old_t - &quotient * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    let gcd_val = old_r.to_biguint().unwrap_or_default();

    (gcd_val, old_s, old_t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn big(v: u64) -> BigUint { BigUint::from(v) }

    #[test]
    fn test_wipe_biguint() {
        // 2^200 − 1 : plusieurs chiffres, dont un partiel
        let mut x = (BigUint::one() << 200u32) - 1u32;
        wipe_biguint(&mut x);
        assert!(x.is_zero());

        let mut zero = BigUint::zero();
        wipe_biguint(&mut zero);
        assert!(zero.is_zero());

        // Le tampon reste utilisable
        x += 5u32;
        assert_eq!(x, big(5));
    }

    #[test]
    fn test_l_function_exact() {
        // 1 + 7·3233 → L = 7
        let n = big(3233);
        let u = big(1) + big(7) * &n;
        assert_eq!(l_function(&u, &n), Ok(big(7)));
    }

    #[test]
    fn test_l_function_rejects_remainder() {
        let n = big(3233);
        assert_eq!(l_function(&big(3235), &n), Err(DecryptionError::InexactDivision));
        assert_eq!(l_function(&big(0), &n), Err(DecryptionError::InexactDivision));
    }

    #[test]
    fn test_mod_inverse_textbook() {
        // 3120 · 2718 ≡ 1 (mod 3233)
        let inv = mod_inverse(&big(3120), &big(3233)).unwrap();
        assert_eq!(inv, big(2718));
        assert_eq!((big(3120) * inv) % big(3233), big(1));
    }

    #[test]
    fn test_mod_inverse_absent() {
        assert_eq!(mod_inverse(&big(6), &big(9)), None);
    }

    #[test]
    fn test_lcm_gcd() {
        assert_eq!(lcm(&big(60), &big(52)), big(780));
        assert_eq!(gcd(&big(60), &big(52)), big(4));
    }

    #[test]
    fn test_primality_small_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let primes: Vec<u64> = (0..60u64)
            .filter(|&v| is_probable_prime(&big(v), &mut rng))
            .collect();
        assert_eq!(
            primes,
            vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59]
        );
    }

    #[test]
    fn test_primality_beyond_sieve() {
        let mut rng = StdRng::seed_from_u64(11);
        // 2^61 - 1 est premier (Mersenne)
        let m61 = (big(1) << 61) - big(1);
        assert!(is_probable_prime(&m61, &mut rng));
        // 1_000_000_007 · 998_244_353 : composé sans petit facteur
        let semiprime = big(1_000_000_007) * big(998_244_353);
        assert!(!is_probable_prime(&semiprime, &mut rng));
    }

    #[test]
    fn test_random_prime_respects_bound() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let p = random_prime_up_to(&big(30), 1_000, &mut rng).unwrap();
            assert!(p <= big(30));
            assert!(is_probable_prime(&p, &mut rng));
        }
        assert_eq!(random_prime_up_to(&big(1), 1_000, &mut rng), None);
    }
}
