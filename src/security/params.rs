//! Domain parameter generation: a prime `q`, a prime `p = k*q + 1`, and a
//! generator `g` of the order-`q` subgroup of `Z_p^*`.

use std::path::Path;

use log::{debug, info};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, Rng};

use crate::config::ParamsConfig;
use crate::error::{Error, Result};
use crate::math::{
    has_small_factor, is_probable_prime, mod_exp, random_exact_bits, random_in_range,
};
use crate::storage;

/// The shared `(p, q, g)` triple every key in one exchange is derived under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParameters {
    /// Field modulus.
    pub p: BigUint,
    /// Prime subgroup order, divides `p - 1`.
    pub q: BigUint,
    /// Element of order `q` modulo `p`.
    pub g: BigUint,
}

impl DomainParameters {
    /// Generates fresh parameters with the sizes and round counts in `config`.
    pub fn generate<R>(config: &ParamsConfig, rng: &mut R) -> Result<Self>
    where
        R: Rng + CryptoRng + ?Sized,
    {
        let q = generate_q(config, rng)?;
        let p = generate_p(config, &q, rng)?;
        let g = find_generator(&p, &q, config.generator_attempts, rng)?;
        info!(
            "generated domain parameters: p {} bits, q {} bits",
            p.bits(),
            q.bits()
        );
        Ok(DomainParameters { p, q, g })
    }

    /// Re-checks every invariant: `p` and `q` prime, `q | p-1`, `g != 1`,
    /// `g^q mod p == 1`.
    pub fn validate<R>(&self, rounds: usize, rng: &mut R) -> Result<()>
    where
        R: Rng + CryptoRng + ?Sized,
    {
        if !is_probable_prime(&self.q, rounds, rng)? {
            return Err(Error::invalid_argument("q is not prime"));
        }
        if !is_probable_prime(&self.p, rounds, rng)? {
            return Err(Error::invalid_argument("p is not prime"));
        }
        if !(&self.p - 1u32).is_multiple_of(&self.q) {
            return Err(Error::invalid_argument("q does not divide p - 1"));
        }
        if self.g <= BigUint::one() || self.g >= self.p {
            return Err(Error::invalid_argument("g outside [2, p-1]"));
        }
        if !mod_exp(&self.g, &self.q, &self.p)?.is_one() {
            return Err(Error::invalid_argument("g does not have order q"));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        storage::write_integers(path, &[&self.p, &self.q, &self.g])
    }

    pub fn load(path: &Path) -> Result<Self> {
        let mut v = storage::read_integers(path, 3)?.into_iter();
        match (v.next(), v.next(), v.next()) {
            (Some(p), Some(q), Some(g)) => Ok(DomainParameters { p, q, g }),
            _ => Err(Error::decode(format!(
                "{}: expected p, q, g records",
                path.display()
            ))),
        }
    }
}

fn check_sizes(config: &ParamsConfig) -> Result<()> {
    if config.q_bits < 2 {
        return Err(Error::invalid_argument(format!(
            "q must have at least 2 bits, got {}",
            config.q_bits
        )));
    }
    // k = (p-1)/q must be even and at least 2
    if config.p_bits < config.q_bits + 2 {
        return Err(Error::invalid_argument(format!(
            "p ({} bits) must be at least 2 bits longer than q ({} bits)",
            config.p_bits, config.q_bits
        )));
    }
    Ok(())
}

/// Samples odd `q_bits`-bit integers with the top bit set until one is prime.
pub fn generate_q<R>(config: &ParamsConfig, rng: &mut R) -> Result<BigUint>
where
    R: Rng + CryptoRng + ?Sized,
{
    check_sizes(config)?;
    for attempt in 1..=config.max_prime_candidates {
        let mut candidate = random_exact_bits(rng, config.q_bits as u64)?;
        candidate.set_bit(0, true);
        if has_small_factor(&candidate) {
            continue;
        }
        if is_probable_prime(&candidate, config.q_rounds, rng)? {
            debug!("q found after {} candidates", attempt);
            return Ok(candidate);
        }
    }
    Err(Error::exhausted("prime q", config.max_prime_candidates))
}

/// Samples even `k` so that `p = k*q + 1` has exactly `p_bits` bits, until `p` is prime.
pub fn generate_p<R>(config: &ParamsConfig, q: &BigUint, rng: &mut R) -> Result<BigUint>
where
    R: Rng + CryptoRng + ?Sized,
{
    check_sizes(config)?;
    if q.bits() as usize >= config.p_bits {
        return Err(Error::invalid_argument("q must be shorter than p"));
    }

    // 2^(p_bits-1) <= k*q + 1 <= 2^p_bits - 1
    let low = BigUint::one() << (config.p_bits - 1);
    let high = (BigUint::one() << config.p_bits) - 1u32;
    let k_min = (&low - 1u32).div_ceil(q);
    let k_max = (&high - 1u32) / q;
    if k_min > k_max {
        return Err(Error::invalid_argument(format!(
            "no multiple of q lands in a {}-bit p",
            config.p_bits
        )));
    }
    debug!("searching p with k of about {} bits", k_max.bits());

    for attempt in 1..=config.max_prime_candidates {
        let k = random_in_range(rng, &k_min, &k_max)?;
        if k.is_odd() {
            continue;
        }
        let p = &k * q + 1u32;
        if has_small_factor(&p) {
            continue;
        }
        if is_probable_prime(&p, config.p_rounds, rng)? {
            debug!("p found after {} candidates", attempt);
            return Ok(p);
        }
    }
    Err(Error::exhausted("prime p", config.max_prime_candidates))
}

/// Finds `g = h^((p-1)/q) mod p` with `g != 1` for random `h` in `[2, p-2]`.
///
/// Any such `g` satisfies `g^q = h^(p-1) = 1 mod p`, and since `q` is prime
/// its order is exactly `q`.
pub fn find_generator<R>(
    p: &BigUint,
    q: &BigUint,
    attempts: usize,
    rng: &mut R,
) -> Result<BigUint>
where
    R: Rng + CryptoRng + ?Sized,
{
    let four = BigUint::from(4u32);
    if p <= &four || q.is_zero() {
        return Err(Error::invalid_argument("p must exceed 4 and q must be positive"));
    }
    let p_minus_one = p - 1u32;
    let (cofactor, rem) = p_minus_one.div_rem(q);
    if !rem.is_zero() {
        return Err(Error::invalid_argument("q does not divide p - 1"));
    }

    let two = BigUint::from(2u32);
    let high = p - 2u32;
    for attempt in 1..=attempts {
        let h = random_in_range(rng, &two, &high)?;
        let g = mod_exp(&h, &cofactor, p)?;
        if !g.is_one() {
            debug!("generator found after {} candidates", attempt);
            return Ok(g);
        }
    }
    Err(Error::exhausted("generator", attempts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn small_config() -> ParamsConfig {
        ParamsConfig::new(256, 64).with_seed(42)
    }

    #[test]
    fn test_generate_small_parameters() {
        let cfg = small_config();
        let mut rng = cfg.rng();
        let params = DomainParameters::generate(&cfg, &mut rng).unwrap();

        assert_eq!(params.q.bits(), 64);
        assert_eq!(params.p.bits(), 256);
        assert!(is_probable_prime(&params.q, 20, &mut rng).unwrap());
        assert!(is_probable_prime(&params.p, 20, &mut rng).unwrap());
        assert!(((&params.p - 1u32) % &params.q).is_zero());
        assert!(mod_exp(&params.g, &params.q, &params.p).unwrap().is_one());
        assert!(!params.g.is_one());
        params.validate(20, &mut rng).unwrap();
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let cfg = ParamsConfig::new(128, 32).with_seed(5);
        let a = DomainParameters::generate(&cfg, &mut cfg.rng()).unwrap();
        let b = DomainParameters::generate(&cfg, &mut cfg.rng()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_bad_sizes() {
        let mut rng = StdRng::seed_from_u64(1);
        let cfg = ParamsConfig::new(64, 63);
        assert!(matches!(
            DomainParameters::generate(&cfg, &mut rng),
            Err(Error::InvalidArgument(_))
        ));
        let cfg = ParamsConfig::new(64, 1);
        assert!(matches!(
            generate_q(&cfg, &mut rng),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_find_generator_known_group() {
        // p = 23, q = 11: the order-11 subgroup is the quadratic residues
        let p = BigUint::from(23u32);
        let q = BigUint::from(11u32);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let g = find_generator(&p, &q, 100, &mut rng).unwrap();
            assert!(!g.is_one());
            assert!(mod_exp(&g, &q, &p).unwrap().is_one());
        }
    }

    #[test]
    fn test_find_generator_requires_divisor() {
        let mut rng = StdRng::seed_from_u64(3);
        let r = find_generator(&BigUint::from(23u32), &BigUint::from(7u32), 100, &mut rng);
        assert!(matches!(r, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_find_generator_exhausts() {
        let mut rng = StdRng::seed_from_u64(3);
        let r = find_generator(&BigUint::from(7u32), &BigUint::from(3u32), 0, &mut rng);
        assert!(matches!(
            r,
            Err(Error::GenerationExhausted { what: "generator", attempts: 0 })
        ));
    }

    #[test]
    fn test_prime_search_exhausts() {
        let mut cfg = ParamsConfig::new(128, 32);
        cfg.max_prime_candidates = 0;
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generate_q(&cfg, &mut rng),
            Err(Error::GenerationExhausted { what: "prime q", .. })
        ));
    }

    #[test]
    fn test_validate_catches_broken_generator() {
        let mut rng = StdRng::seed_from_u64(8);
        let params = DomainParameters {
            p: BigUint::from(23u32),
            q: BigUint::from(11u32),
            g: BigUint::from(5u32), // 5 is a non-residue mod 23, order 22
        };
        assert!(params.validate(10, &mut rng).is_err());

        let fixed = DomainParameters {
            g: BigUint::from(4u32),
            ..params
        };
        fixed.validate(10, &mut rng).unwrap();
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.bin");
        let params = DomainParameters {
            p: BigUint::from(23u32),
            q: BigUint::from(11u32),
            g: BigUint::from(4u32),
        };
        params.save(&path).unwrap();
        assert_eq!(DomainParameters::load(&path).unwrap(), params);

        storage::write_integer(&path, &BigUint::from(23u32)).unwrap();
        assert!(matches!(
            DomainParameters::load(&path),
            Err(Error::Decode(_))
        ));
    }
}
