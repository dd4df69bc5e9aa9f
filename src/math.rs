//! Arbitrary-precision arithmetic used by the key exchange.
//!
//! - `modexp`: square-and-multiply modular exponentiation
//! - `primality`: Miller-Rabin testing and small-prime screening
//! - `bigint`: sampling, inversion and encoding helpers over `num-bigint`

pub mod bigint;
pub mod modexp;
pub mod primality;

pub use bigint::{mod_inverse, random_exact_bits, random_in_range, to_fixed_be};
pub use modexp::mod_exp;
pub use primality::{has_small_factor, is_probable_prime};
