use log::trace;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand::{CryptoRng, Rng};

use super::bigint::random_in_range;
use super::modexp::mod_exp;
use crate::error::Result;

/// Odd primes below 256, for cheap candidate screening before Miller-Rabin.
const SMALL_PRIMES: [u32; 53] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Miller-Rabin probabilistic primality test.
///
/// Composites are reported prime with probability at most `4^-rounds`; a prime
/// is never rejected. Witnesses are drawn from `[2, n-2]`, since `1` and `n-1`
/// pass every round trivially.
///
/// # Examples
/// ```
/// use dhcert::math::is_probable_prime;
/// use num_bigint::BigUint;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(1);
/// assert!(is_probable_prime(&BigUint::from(7919u32), 10, &mut rng).unwrap());
/// assert!(!is_probable_prime(&BigUint::from(7917u32), 10, &mut rng).unwrap());
/// ```
pub fn is_probable_prime<R>(n: &BigUint, rounds: usize, rng: &mut R) -> Result<bool>
where
    R: Rng + CryptoRng + ?Sized,
{
    let two = BigUint::from(2u32);
    if n < &two {
        return Ok(false);
    }
    if n == &two || n == &BigUint::from(3u32) {
        return Ok(true);
    }
    if n.is_even() {
        return Ok(false);
    }

    // n - 1 = d * 2^s with d odd
    let n_minus_one = n - 1u32;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    let witness_high = n - 2u32;
    'witness: for round in 0..rounds {
        let a = random_in_range(rng, &two, &witness_high)?;
        let mut x = mod_exp(&a, &d, n)?;
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }
        trace!("witness found in round {} of {}", round + 1, rounds);
        return Ok(false);
    }
    Ok(true)
}

/// True when `n` has a prime factor below 256 other than itself.
///
/// Candidates failing this check are composite; passing it decides nothing.
pub fn has_small_factor(n: &BigUint) -> bool {
    if n.is_even() {
        return n != &BigUint::from(2u32);
    }
    SMALL_PRIMES.iter().any(|&p| {
        let r = (n % p).to_u32().unwrap_or(1);
        r.is_zero() && n != &BigUint::from(p)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn sieve(limit: usize) -> Vec<bool> {
        let mut is_prime = vec![true; limit];
        is_prime[0] = false;
        is_prime[1] = false;
        let mut i = 2;
        while i * i < limit {
            if is_prime[i] {
                let mut j = i * i;
                while j < limit {
                    is_prime[j] = false;
                    j += i;
                }
            }
            i += 1;
        }
        is_prime
    }

    #[test]
    fn test_matches_sieve_below_10000() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let table = sieve(10_000);
        for (n, &expected) in table.iter().enumerate() {
            let got = is_probable_prime(&BigUint::from(n), 10, &mut rng).unwrap();
            assert_eq!(got, expected, "n = {}", n);
        }
    }

    #[test]
    fn test_edge_values() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        for n in [0u32, 1, 4, 9, 15] {
            assert!(!is_probable_prime(&BigUint::from(n), 10, &mut rng).unwrap());
        }
        for n in [2u32, 3, 5, 7] {
            assert!(is_probable_prime(&BigUint::from(n), 10, &mut rng).unwrap());
        }
        // zero rounds accepts any odd n > 3
        assert!(is_probable_prime(&BigUint::from(21u32), 0, &mut rng).unwrap());
    }

    #[test]
    fn test_carmichael_numbers_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        for n in [561u32, 1105, 1729, 2465, 2821, 6601, 8911, 41041, 825_265] {
            assert!(!is_probable_prime(&BigUint::from(n), 20, &mut rng).unwrap());
        }
    }

    #[test]
    fn test_agrees_with_num_prime_on_64_bit_values() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let start = (1u64 << 61) - 1; // Mersenne prime
        for n in start..start + 400 {
            let expected = num_prime::nt_funcs::is_prime64(n);
            assert_eq!(
                is_probable_prime(&BigUint::from(n), 20, &mut rng).unwrap(),
                expected,
                "n = {}",
                n
            );
        }
    }

    #[test]
    fn test_large_known_prime() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        // 2^127 - 1
        let m127 = (BigUint::one() << 127u32) - 1u32;
        assert!(is_probable_prime(&m127, 20, &mut rng).unwrap());
        let composite = &m127 * BigUint::from(3u32);
        assert!(!is_probable_prime(&composite, 20, &mut rng).unwrap());
    }

    #[test]
    fn test_has_small_factor() {
        assert!(has_small_factor(&BigUint::from(3u32 * 1_000_003)));
        assert!(has_small_factor(&BigUint::from(1024u32)));
        assert!(!has_small_factor(&BigUint::from(2u32)));
        assert!(!has_small_factor(&BigUint::from(251u32)));
        assert!(!has_small_factor(&BigUint::from(1_000_003u32)));
    }
}
