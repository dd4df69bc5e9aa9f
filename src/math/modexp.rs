use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::{Error, Result};

/// Computes `base^exponent mod modulus` by square-and-multiply.
///
/// The exponent is scanned from its least significant bit upward: each set bit
/// folds the current power of `base` into the accumulator, and the power is
/// squared once per bit. The result always lies in `[0, modulus)`, so a modulus
/// of one yields zero even for a zero exponent.
///
/// # Errors
/// `InvalidArgument` when `modulus` is zero.
///
/// # Examples
/// ```
/// use dhcert::math::mod_exp;
/// use num_bigint::BigUint;
///
/// let r = mod_exp(&BigUint::from(4u32), &BigUint::from(13u32), &BigUint::from(497u32)).unwrap();
/// assert_eq!(r, BigUint::from(445u32));
/// ```
pub fn mod_exp(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(Error::invalid_argument("mod_exp with modulus = 0"));
    }
    if modulus.is_one() {
        return Ok(BigUint::zero());
    }

    let mut result = BigUint::one();
    let mut power = base % modulus;
    let bits = exponent.bits();

    for i in 0..bits {
        if exponent.bit(i) {
            result = (&result * &power) % modulus;
        }
        // the last squaring would never be used
        if i + 1 < bits {
            power = (&power * &power) % modulus;
        }
    }
    Ok(result)
}
