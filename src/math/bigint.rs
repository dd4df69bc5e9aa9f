//! Thin helpers over `num-bigint` for sampling, inversion and fixed-width encoding.

use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::{CryptoRng, Rng};

use crate::error::{Error, Result};

/// Uniform draw from `[low, high]`, both ends inclusive.
pub fn random_in_range<R>(rng: &mut R, low: &BigUint, high: &BigUint) -> Result<BigUint>
where
    R: Rng + CryptoRng + ?Sized,
{
    if low > high {
        return Err(Error::invalid_argument(format!(
            "empty sampling range [{}, {}]",
            low, high
        )));
    }
    Ok(rng.gen_biguint_range(low, &(high + 1u32)))
}

/// Random integer of exactly `bits` bits: the top bit is always set.
pub fn random_exact_bits<R>(rng: &mut R, bits: u64) -> Result<BigUint>
where
    R: Rng + CryptoRng + ?Sized,
{
    if bits == 0 {
        return Err(Error::invalid_argument("bit length must be positive"));
    }
    let mut n = rng.gen_biguint(bits);
    n.set_bit(bits - 1, true);
    Ok(n)
}

/// Inverse of `a` modulo `m`, or `None` when `gcd(a, m) != 1`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }
    a.modinv(m)
}

/// Minimal big-endian magnitude, left-padded with zeros to `len` bytes.
pub fn to_fixed_be(n: &BigUint, len: usize) -> Result<Vec<u8>> {
    let bytes = n.to_bytes_be();
    if bytes.len() > len {
        return Err(Error::invalid_argument(format!(
            "{}-byte integer does not fit in {} bytes",
            bytes.len(),
            len
        )));
    }
    let mut out = vec![0u8; len - bytes.len()];
    out.extend_from_slice(&bytes);
    Ok(out)
}
