//! Per-party Diffie-Hellman key pairs.

use std::fmt;
use std::path::Path;

use num_bigint::BigUint;
use num_traits::One;
use rand::{CryptoRng, Rng};

use super::params::DomainParameters;
use crate::error::{Error, Result};
use crate::math::{mod_exp, random_in_range};
use crate::storage;

/// A private scalar in `[1, q-1]`. Never leaves its owner.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(BigUint);

/// `g^private mod p`, exported for certification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey(BigUint);

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

impl PrivateKey {
    pub fn from_value(x: BigUint) -> Self {
        PrivateKey(x)
    }

    pub fn value(&self) -> &BigUint {
        &self.0
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        storage::write_integer(path, &self.0)
    }

    pub fn load(path: &Path) -> Result<Self> {
        storage::read_integer(path).map(PrivateKey)
    }
}

impl PublicKey {
    pub fn from_value(y: BigUint) -> Self {
        PublicKey(y)
    }

    pub fn value(&self) -> &BigUint {
        &self.0
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        storage::write_integer(path, &self.0)
    }

    pub fn load(path: &Path) -> Result<Self> {
        storage::read_integer(path).map(PublicKey)
    }
}

/// Draws a private scalar uniformly from `[1, q-1]`.
pub fn derive_private<R>(q: &BigUint, rng: &mut R) -> Result<PrivateKey>
where
    R: Rng + CryptoRng + ?Sized,
{
    if q <= &BigUint::one() {
        return Err(Error::invalid_argument(format!(
            "subgroup order must exceed 1, got {}",
            q
        )));
    }
    let x = random_in_range(rng, &BigUint::one(), &(q - 1u32))?;
    Ok(PrivateKey(x))
}

/// `g^private mod p`.
pub fn derive_public(g: &BigUint, private: &PrivateKey, p: &BigUint) -> Result<PublicKey> {
    mod_exp(g, &private.0, p).map(PublicKey)
}

/// A private scalar together with the public value derived from it.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub private: PrivateKey,
    pub public: PublicKey,
}

impl KeyPair {
    pub fn generate<R>(params: &DomainParameters, rng: &mut R) -> Result<Self>
    where
        R: Rng + CryptoRng + ?Sized,
    {
        let private = derive_private(&params.q, rng)?;
        KeyPair::from_private(params, private)
    }

    /// Recomputes the public half from `private` under `params`.
    pub fn from_private(params: &DomainParameters, private: PrivateKey) -> Result<Self> {
        let public = derive_public(&params.g, &private, &params.p)?;
        Ok(KeyPair { private, public })
    }
}
